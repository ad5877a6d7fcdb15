use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::counters::Counters;

/// Enqueue `count` items, cycling through `symbols`, then close the queue by
/// dropping `tx`. Returns how many items were actually submitted.
pub async fn submit_items(
    tx: mpsc::Sender<String>,
    symbols: &[String],
    count: u64,
    counters: &Counters,
    cancel: &CancellationToken,
) -> u64 {
    if symbols.is_empty() {
        return 0;
    }

    let mut submitted = 0;
    for index in 0..count {
        let symbol = symbols[(index % symbols.len() as u64) as usize].clone();

        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            permit = tx.reserve() => permit,
        };

        match permit {
            Ok(permit) => {
                // Count before the item becomes visible so workers never see total < processed.
                counters.record_submitted();
                permit.send(symbol);
                submitted += 1;
            }
            Err(_) => {
                log::warn!("work queue closed after {submitted} items, stopping generator");
                break;
            }
        }
    }

    log::debug!("generator finished after submitting {submitted} items");
    submitted
}
