//! Pure batch planning for paginated ingestion.

/// Partitions pages `1..=total_count` into contiguous batches of
/// `batch_size` pages, optionally capped by `limit`.
///
/// Page numbers are 1-indexed and the concatenation of all batches covers
/// exactly `[1, min(limit, total_count)]` in order. Every batch holds
/// `batch_size` pages except possibly the last. An effective total of zero
/// yields no batches.
pub fn generate_batches(total_count: u32, batch_size: u32, limit: Option<u32>) -> Vec<Vec<u32>> {
    if batch_size == 0 {
        return Vec::new();
    }
    let effective_total = limit.map_or(total_count, |l| l.min(total_count));

    let mut batches = Vec::new();
    let mut start = 1u32;
    while start <= effective_total {
        let end = effective_total.min(start + batch_size - 1);
        batches.push((start..=end).collect());
        start = end + 1;
    }
    batches
}
