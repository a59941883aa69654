use crate::encoding::TextEncoding;
use crate::error::{ReconcileError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for both input layouts and the rewrite policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Field delimiter of the alias file
    pub delimiter: char,

    /// Alias-file column holding the employer code
    pub code_column: usize,

    /// Alias-file column holding the replacement alias
    pub alias_column: usize,

    /// What to do with aliases wider than the code window
    pub alias_overflow: AliasOverflow,

    /// Encoding of both inputs and all outputs
    pub encoding: TextEncoding,

    /// Character window of the employer code inside each concepts line
    pub code_field: FieldWindow,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            delimiter: ';',
            code_column: 0,
            alias_column: 2,
            alias_overflow: AliasOverflow::default(),
            encoding: TextEncoding::default(),
            code_field: FieldWindow::default(),
        }
    }
}

impl ReconcileConfig {
    /// Records with fewer fields than this contribute nothing to the index
    pub fn min_alias_fields(&self) -> usize {
        self.code_column.max(self.alias_column) + 1
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.delimiter.is_ascii() {
            return Err(ReconcileError::invalid_config(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            )));
        }

        if matches!(self.delimiter, '"' | '\r' | '\n') {
            return Err(ReconcileError::invalid_config(format!(
                "delimiter {:?} collides with quoting or record terminators",
                self.delimiter
            )));
        }

        if self.code_column == self.alias_column {
            return Err(ReconcileError::invalid_config(format!(
                "code_column and alias_column both point at column {}",
                self.code_column
            )));
        }

        if self.code_field.end <= self.code_field.start {
            return Err(ReconcileError::invalid_config(format!(
                "code_field end ({}) must be greater than start ({})",
                self.code_field.end, self.code_field.start
            )));
        }

        Ok(())
    }
}

/// Half-open character range `[start, end)` within a fixed-width line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldWindow {
    pub start: usize,
    pub end: usize,
}

impl FieldWindow {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Replacement width; aliases are space-padded to it
    pub const fn width(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

impl Default for FieldWindow {
    fn default() -> Self {
        Self::new(6, 16)
    }
}

/// Policy for aliases longer than the code window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasOverflow {
    /// Write the full alias; the field grows and shifts the rest of the line
    #[default]
    Widen,
    /// Cut the alias down to the window width
    Truncate,
    /// Fail the run
    Reject,
}

impl AliasOverflow {
    pub const fn as_str(self) -> &'static str {
        match self {
            AliasOverflow::Widen => "widen",
            AliasOverflow::Truncate => "truncate",
            AliasOverflow::Reject => "reject",
        }
    }
}
