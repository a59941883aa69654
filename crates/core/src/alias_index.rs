use crate::config::ReconcileConfig;
use crate::error::{ReconcileError, Result, Stage};
use crate::key::{trim_blank, NormalizedKey};
use crate::stats::ReconcileStats;
use csv::StringRecord;
use std::collections::HashMap;

/// One usable row of the alias file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasRecord {
    pub employer_code: NormalizedKey,
    pub alias: String,
    /// Fields re-joined with the delimiter plus `\n`
    pub original_line: String,
}

impl AliasRecord {
    /// Returns `None` for records with too few fields or a blank code
    fn from_record(record: &StringRecord, config: &ReconcileConfig) -> Option<Self> {
        if record.len() < config.min_alias_fields() {
            return None;
        }
        let code = record.get(config.code_column)?;
        let alias = record.get(config.alias_column)?;

        let employer_code = NormalizedKey::new(code);
        if employer_code.is_empty() {
            return None;
        }

        Some(Self {
            employer_code,
            alias: trim_blank(alias).to_string(),
            original_line: canonical_line(record, config.delimiter),
        })
    }
}

fn canonical_line(record: &StringRecord, delimiter: char) -> String {
    let mut line = String::new();
    for (i, field) in record.iter().enumerate() {
        if i > 0 {
            line.push(delimiter);
        }
        line.push_str(field);
    }
    line.push('\n');
    line
}

/// Normalized employer code → alias record
#[derive(Debug, Clone, Default)]
pub struct AliasIndex {
    records: HashMap<NormalizedKey, AliasRecord>,
}

impl AliasIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the alias file.
    ///
    /// Quoted fields may contain the delimiter or line breaks. Outside quotes a
    /// bare `\r` ends the record like `\n` does. Records with
    /// fewer than [`ReconcileConfig::min_alias_fields`] fields, or whose code
    /// normalizes to an empty key, are skipped without error. Nothing is
    /// returned if the reader fails partway.
    pub fn build(text: &str, config: &ReconcileConfig, stats: &mut ReconcileStats) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(config.delimiter as u8)
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut index = Self::new();
        let mut record = StringRecord::new();
        loop {
            let more = reader
                .read_record(&mut record)
                .map_err(|err| ReconcileError::stage(Stage::AliasIndex, err))?;
            if !more {
                break;
            }
            stats.alias_rows += 1;

            if record.len() < config.min_alias_fields() {
                stats.alias_rows_short += 1;
                continue;
            }

            let Some(parsed) = AliasRecord::from_record(&record, config) else {
                stats.alias_rows_blank_key += 1;
                continue;
            };

            if let Some(previous) = index.insert(parsed) {
                stats.alias_rows_overwritten += 1;
                log::debug!(
                    "Alias row for {} replaces earlier row {:?}",
                    previous.employer_code,
                    previous.original_line.trim_end()
                );
            }
        }

        stats.index_keys = index.len();
        log::debug!(
            "Alias index: {} keys from {} rows ({} too short, {} blank keys)",
            index.len(),
            stats.alias_rows,
            stats.alias_rows_short,
            stats.alias_rows_blank_key
        );
        Ok(index)
    }

    /// Insert a record, replacing and returning any record with the same key
    pub fn insert(&mut self, record: AliasRecord) -> Option<AliasRecord> {
        self.records.insert(record.employer_code.clone(), record)
    }

    pub fn get(&self, key: &str) -> Option<&AliasRecord> {
        self.records.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &NormalizedKey> + '_ {
        self.records.keys()
    }

    pub fn records(&self) -> impl Iterator<Item = &AliasRecord> + '_ {
        self.records.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn build(text: &str) -> (AliasIndex, ReconcileStats) {
        let mut stats = ReconcileStats::new();
        let index = AliasIndex::build(text, &ReconcileConfig::default(), &mut stats).unwrap();
        (index, stats)
    }

    #[test]
    fn builds_keys_aliases_and_canonical_lines() {
        let (index, stats) = build("100;Acme;ALI1\r\n b200 ;Beta; ali2 ;extra\n");

        assert_eq!(index.len(), 2);
        let first = index.get("100").unwrap();
        assert_eq!(first.alias, "ALI1");
        assert_eq!(first.original_line, "100;Acme;ALI1\n");

        let second = index.get("B200").unwrap();
        assert_eq!(second.alias, "ali2");
        assert_eq!(second.original_line, " b200 ;Beta; ali2 ;extra\n");
        assert_eq!(stats.alias_rows, 2);
        assert_eq!(stats.index_keys, 2);
    }

    #[test]
    fn skips_short_and_blank_rows() {
        let (index, stats) = build("100;only-two\n\n ;X;ALI\n\0;X;ALI\n300;X;ALI3\n");

        assert_eq!(index.len(), 1);
        assert!(index.contains("300"));
        assert_eq!(stats.alias_rows_short, 1);
        assert_eq!(stats.alias_rows_blank_key, 2);
    }

    #[test]
    fn later_rows_overwrite_earlier_ones() {
        let (index, stats) = build("100;X;FIRST\n 100 ;Y;SECOND\n");

        assert_eq!(index.len(), 1);
        let record = index.get("100").unwrap();
        assert_eq!(record.alias, "SECOND");
        assert_eq!(record.original_line, " 100 ;Y;SECOND\n");
        assert_eq!(stats.alias_rows_overwritten, 1);
    }

    #[test]
    fn bare_carriage_return_ends_an_unquoted_row() {
        let (index, stats) = build("100;X;A\rLI\n200;Y;B\n");

        assert_eq!(index.len(), 2);
        let first = index.get("100").unwrap();
        assert_eq!(first.alias, "A");
        assert_eq!(first.original_line, "100;X;A\n");
        assert_eq!(index.get("200").unwrap().alias, "B");
        assert_eq!(stats.alias_rows, 3);
        assert_eq!(stats.alias_rows_short, 1);
    }

    #[test]
    fn quoted_fields_may_hold_delimiters_and_newlines() {
        let (index, _) = build("\"1;00\";\"two\nlines\";ALI\n");

        let record = index.get("1;00").unwrap();
        assert_eq!(record.alias, "ALI");
        assert_eq!(record.original_line, "1;00;two\nlines;ALI\n");
    }

    #[test]
    fn insert_reports_replaced_record() {
        let mut index = AliasIndex::new();
        let record = |alias: &str| AliasRecord {
            employer_code: NormalizedKey::new("7"),
            alias: alias.to_string(),
            original_line: format!("7;;{alias}\n"),
        };

        assert!(index.insert(record("A")).is_none());
        let replaced = index.insert(record("B")).unwrap();
        assert_eq!(replaced.alias, "A");
        assert_eq!(index.get("7").unwrap().alias, "B");
    }
}
