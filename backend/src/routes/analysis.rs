use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// =========================================================
// Analysis types
// =========================================================

/// Likes per UTC day, keyed `YYYY-MM-DD`, with the overall total.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyLikeCounts {
    pub counts: BTreeMap<String, u64>,
    pub total: u64,
}

impl From<BTreeMap<String, u64>> for DailyLikeCounts {
    fn from(counts: BTreeMap<String, u64>) -> Self {
        let total = counts.values().sum();
        Self { counts, total }
    }
}
