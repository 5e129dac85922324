//! Eviction policy: strict FIFO by creation order under a character budget.

use storage::{RecordId, StoredRecord};

/// Outcome of planning one eviction sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvictionPlan {
    /// Records to delete, oldest first.
    pub evict: Vec<RecordId>,
    pub total_before: usize,
    pub total_after: usize,
    pub remaining: usize,
}

/// Plans the sweep over `records` (oldest first): drop the oldest record while the total exceeds
/// `threshold`. The newest record is never dropped, so a single turn longer than the budget stays.
pub fn plan_eviction(records: &[StoredRecord], threshold: usize) -> EvictionPlan {
    let total_before: usize = records.iter().map(StoredRecord::char_len).sum();
    let mut total = total_before;
    let mut evict = Vec::new();

    for record in records {
        let remaining = records.len() - evict.len();
        if total <= threshold || remaining <= 1 {
            break;
        }
        total -= record.char_len();
        evict.push(record.id.clone());
    }

    EvictionPlan {
        remaining: records.len() - evict.len(),
        evict,
        total_before,
        total_after: total,
    }
}
