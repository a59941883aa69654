use serde::{Deserialize, Serialize};

/// Counters collected across the three pipeline stages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileStats {
    /// Records parsed from the alias file
    pub alias_rows: usize,

    /// Records ignored for having too few fields
    pub alias_rows_short: usize,

    /// Records ignored because the code normalized to nothing
    pub alias_rows_blank_key: usize,

    /// Records that replaced an earlier record with the same key
    pub alias_rows_overwritten: usize,

    /// Distinct keys in the index
    pub index_keys: usize,

    /// Lines read from the concepts file
    pub concept_lines: usize,

    /// Lines rewritten with an alias
    pub matched: usize,

    /// Lines copied unchanged
    pub unmatched: usize,

    /// Unmatched lines too short to carry a code
    pub short_lines: usize,

    /// Matched lines whose alias was wider than the code field
    pub widened_aliases: usize,

    /// Matched lines whose alias was cut to the code field
    pub truncated_aliases: usize,

    /// Index keys never seen in the concepts file
    pub unused_keys: usize,
}

impl ReconcileStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index keys referenced at least once
    pub fn used_keys(&self) -> usize {
        self.index_keys.saturating_sub(self.unused_keys)
    }
}
