use crate::alias_index::AliasIndex;
use crate::config::{AliasOverflow, FieldWindow, ReconcileConfig};
use crate::error::{ReconcileError, Result, Stage};
use crate::key::NormalizedKey;
use crate::lines::lines_with_ends;
use crate::stats::ReconcileStats;
use std::collections::HashSet;

/// Concepts lines split into the two output partitions
#[derive(Debug, Default)]
pub struct RewriteOutput<'t> {
    /// Rewritten lines, in input order
    pub matched: Vec<String>,
    /// Untouched lines, in input order
    pub unmatched: Vec<&'t str>,
    /// Keys that matched at least once
    pub used: HashSet<NormalizedKey>,
}

/// Result of looking at a single concepts line
#[derive(Debug, PartialEq, Eq)]
pub enum LineOutcome {
    Matched {
        line: String,
        key: NormalizedKey,
        fit: AliasFit,
    },
    /// Line is shorter than the end of the code field
    TooShort,
    /// Code field does not normalize to a known key
    NoMatch,
}

/// How the alias was fitted into the code field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasFit {
    Padded,
    Widened,
    Truncated,
}

pub struct ConceptRewriter<'a> {
    index: &'a AliasIndex,
    window: FieldWindow,
    overflow: AliasOverflow,
}

impl<'a> ConceptRewriter<'a> {
    pub fn new(index: &'a AliasIndex, config: &ReconcileConfig) -> Self {
        Self {
            index,
            window: config.code_field,
            overflow: config.alias_overflow,
        }
    }

    /// Partition every line of the concepts file.
    ///
    /// Every input line lands in exactly one of the two outputs. On error the
    /// partial output is dropped.
    pub fn rewrite<'t>(
        &self,
        text: &'t str,
        stats: &mut ReconcileStats,
    ) -> Result<RewriteOutput<'t>> {
        let mut out = RewriteOutput::default();
        let mut widened_keys: HashSet<NormalizedKey> = HashSet::new();

        for line in lines_with_ends(text) {
            stats.concept_lines += 1;
            match self.classify_line(line)? {
                LineOutcome::Matched { line, key, fit } => {
                    match fit {
                        AliasFit::Padded => {}
                        AliasFit::Widened => {
                            stats.widened_aliases += 1;
                            if !widened_keys.contains(&key) {
                                log::warn!(
                                    "Alias for {key} is wider than {} characters; field widened",
                                    self.window.width()
                                );
                                widened_keys.insert(key.clone());
                            }
                        }
                        AliasFit::Truncated => stats.truncated_aliases += 1,
                    }
                    out.matched.push(line);
                    out.used.insert(key);
                }
                LineOutcome::TooShort => {
                    stats.short_lines += 1;
                    out.unmatched.push(line);
                }
                LineOutcome::NoMatch => out.unmatched.push(line),
            }
        }

        stats.matched = out.matched.len();
        stats.unmatched = out.unmatched.len();
        log::debug!(
            "Concepts: {} lines, {} matched, {} unmatched ({} too short)",
            stats.concept_lines,
            stats.matched,
            stats.unmatched,
            stats.short_lines
        );
        Ok(out)
    }

    /// Rewrite one line if its code field maps to an alias.
    ///
    /// Length is measured in characters including the line terminator.
    pub fn classify_line(&self, line: &str) -> Result<LineOutcome> {
        let Some((start, end)) = window_bounds(line, self.window) else {
            return Ok(LineOutcome::TooShort);
        };

        let key = NormalizedKey::new(&line[start..end]);
        let Some(record) = self.index.get(key.as_str()) else {
            return Ok(LineOutcome::NoMatch);
        };

        let width = self.window.width();
        let alias_len = record.alias.chars().count();
        let (alias, fit) = if alias_len <= width {
            (record.alias.as_str(), AliasFit::Padded)
        } else {
            match self.overflow {
                AliasOverflow::Widen => (record.alias.as_str(), AliasFit::Widened),
                AliasOverflow::Truncate => {
                    let cut = record
                        .alias
                        .char_indices()
                        .nth(width)
                        .map_or(record.alias.len(), |(idx, _)| idx);
                    (&record.alias[..cut], AliasFit::Truncated)
                }
                AliasOverflow::Reject => {
                    return Err(ReconcileError::stage(
                        Stage::Rewrite,
                        format!(
                            "alias {:?} for code {key} is {alias_len} characters, field holds {width}",
                            record.alias
                        ),
                    ));
                }
            }
        };

        let padding = width.saturating_sub(alias.chars().count());
        let mut rewritten = String::with_capacity(line.len() + padding + alias.len());
        rewritten.push_str(&line[..start]);
        rewritten.push_str(alias);
        rewritten.extend(std::iter::repeat(' ').take(padding));
        rewritten.push_str(&line[end..]);

        Ok(LineOutcome::Matched {
            line: rewritten,
            key,
            fit,
        })
    }
}

/// Byte offsets of the character window, or `None` if the line is too short
fn window_bounds(line: &str, window: FieldWindow) -> Option<(usize, usize)> {
    let mut offsets = line
        .char_indices()
        .map(|(idx, _)| idx)
        .chain(std::iter::once(line.len()));
    let start = offsets.nth(window.start)?;
    let end = offsets.nth(window.width().checked_sub(1)?)?;
    Some((start, end))
}
