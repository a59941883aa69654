use conceptmap_core::ReconcileStats;
use serde::Serialize;
use std::path::Path;

/// Output of `process --json`
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    /// Output directory or zip archive
    pub destination: &'a Path,
    /// Report file names in output order
    pub files: Vec<&'static str>,
    pub stats: &'a ReconcileStats,
}

/// Human-readable run summary printed by `process`
pub fn render_summary(stats: &ReconcileStats, destination: &Path) -> String {
    let mut text = String::new();
    text.push_str(&format!("Reports written to {}\n", destination.display()));
    text.push_str(&format!(
        "  alias rows:     {} ({} keys, {} too short, {} blank code, {} overwritten)\n",
        stats.alias_rows,
        stats.index_keys,
        stats.alias_rows_short,
        stats.alias_rows_blank_key,
        stats.alias_rows_overwritten
    ));
    text.push_str(&format!(
        "  concept lines:  {} ({} matched, {} unmatched, {} too short)\n",
        stats.concept_lines, stats.matched, stats.unmatched, stats.short_lines
    ));
    text.push_str(&format!(
        "  unused codes:   {} of {}\n",
        stats.unused_keys, stats.index_keys
    ));
    if stats.widened_aliases > 0 {
        text.push_str(&format!(
            "  warning: {} lines received an alias wider than the code field\n",
            stats.widened_aliases
        ));
    }
    if stats.truncated_aliases > 0 {
        text.push_str(&format!(
            "  note: {} lines received a truncated alias\n",
            stats.truncated_aliases
        ));
    }
    text
}
