use crate::alias_index::AliasIndex;
use crate::error::{ReconcileError, Result, Stage};
use crate::key::NormalizedKey;
use crate::stats::ReconcileStats;
use std::collections::HashSet;

/// Keys present in the index but never used, in ascending code-point order
pub fn unused_keys<'i>(
    index: &'i AliasIndex,
    used: &HashSet<NormalizedKey>,
) -> Vec<&'i NormalizedKey> {
    let mut keys: Vec<&NormalizedKey> = index.keys().filter(|key| !used.contains(*key)).collect();
    keys.sort_unstable();
    keys
}

/// Original alias-file lines of every unused key, sorted by key
pub fn unused_lines<'i>(
    index: &'i AliasIndex,
    used: &HashSet<NormalizedKey>,
    stats: &mut ReconcileStats,
) -> Result<Vec<&'i str>> {
    if let Some(stray) = used.iter().find(|key| !index.contains(key.as_str())) {
        return Err(ReconcileError::stage(
            Stage::Report,
            format!("used code {stray} is not in the alias index"),
        ));
    }

    let keys = unused_keys(index, used);
    let mut lines = Vec::with_capacity(keys.len());
    for key in keys {
        let record = index.get(key.as_str()).ok_or_else(|| {
            ReconcileError::stage(Stage::Report, format!("alias record for {key} disappeared"))
        })?;
        lines.push(record.original_line.as_str());
    }

    stats.unused_keys = lines.len();
    log::debug!("Unused alias codes: {}", lines.len());
    Ok(lines)
}
