//! # Conceptmap Core
//!
//! Rewrites employer codes embedded in a fixed-width concepts extract using an
//! alias mapping file, and reports which mappings were never used.
//!
//! ## Pipeline
//!
//! ```text
//! alias bytes ──decode──> Alias Index Builder
//!                              │  code → (alias, original row)
//!                              ▼
//! concepts bytes ─decode─> Concept Rewriter ──> matched / unmatched lines
//!                              │  used codes
//!                              ▼
//!                         Unused-Mapping Reporter ──> unused rows (sorted)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use conceptmap_core::{reconcile_text, ReconcileConfig};
//!
//! let alias = "100;Acme;ALI1\n200;Beta;ALI2\n";
//! let concepts = "000001       100 rest\n";
//!
//! let output = reconcile_text(alias, concepts, &ReconcileConfig::default()).unwrap();
//! assert_eq!(output.matched, "000001ALI1       rest\n");
//! assert_eq!(output.unused, "200;Beta;ALI2\n");
//! ```

mod alias_index;
mod config;
mod encoding;
mod error;
mod key;
mod lines;
mod pipeline;
mod report;
mod rewriter;
mod stats;

pub use alias_index::{AliasIndex, AliasRecord};
pub use config::{AliasOverflow, FieldWindow, ReconcileConfig};
pub use encoding::TextEncoding;
pub use error::{ErrorCategory, InputKind, ReconcileError, Result, Stage};
pub use key::NormalizedKey;
pub use lines::{lines_with_ends, LinesWithEnds};
pub use pipeline::{
    reconcile_bytes, reconcile_inputs, reconcile_text, EncodedOutput, OutputFile, ReconcileOutput,
    MATCHED_FILE_NAME, UNMATCHED_FILE_NAME, UNUSED_FILE_NAME,
};
pub use report::{unused_keys, unused_lines};
pub use rewriter::{AliasFit, ConceptRewriter, LineOutcome, RewriteOutput};
pub use stats::ReconcileStats;
