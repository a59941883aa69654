use crate::alias_index::AliasIndex;
use crate::config::ReconcileConfig;
use crate::error::{InputKind, ReconcileError, Result};
use crate::report::unused_lines;
use crate::rewriter::ConceptRewriter;
use crate::stats::ReconcileStats;

/// Rewritten concepts lines
pub const MATCHED_FILE_NAME: &str = "Relacion_de_Conceptos_COINCIDENTES.TXT";
/// Concepts lines left untouched
pub const UNMATCHED_FILE_NAME: &str = "Relacion_de_Conceptos_NO_COINCIDENTES.TXT";
/// Alias rows whose code never appeared in the concepts file
pub const UNUSED_FILE_NAME: &str = "Codigos_De_Mapeo_NO_ENCONTRADOS.TXT";

/// The three report texts of one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutput {
    pub matched: String,
    pub unmatched: String,
    pub unused: String,
    pub stats: ReconcileStats,
}

impl ReconcileOutput {
    /// `(file name, contents)` in fixed order: matched, unmatched, unused
    pub fn files(&self) -> [(&'static str, &str); 3] {
        [
            (MATCHED_FILE_NAME, self.matched.as_str()),
            (UNMATCHED_FILE_NAME, self.unmatched.as_str()),
            (UNUSED_FILE_NAME, self.unused.as_str()),
        ]
    }
}

/// One output file re-encoded for the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub name: &'static str,
    pub bytes: Vec<u8>,
}

/// Encoded outputs plus the statistics of the run
#[derive(Debug, Clone)]
pub struct EncodedOutput {
    pub files: Vec<OutputFile>,
    pub stats: ReconcileStats,
}

/// Run the three stages on already decoded text.
///
/// All-or-nothing: any stage failure returns an error and no output.
pub fn reconcile_text(
    alias: &str,
    concepts: &str,
    config: &ReconcileConfig,
) -> Result<ReconcileOutput> {
    config.validate()?;
    log::debug!(
        "Reconciling with delimiter {:?}, code field [{}, {}), overflow {}",
        config.delimiter,
        config.code_field.start,
        config.code_field.end,
        config.alias_overflow.as_str()
    );
    let mut stats = ReconcileStats::new();

    let index = AliasIndex::build(alias, config, &mut stats)?;
    let rewritten = ConceptRewriter::new(&index, config).rewrite(concepts, &mut stats)?;
    let unused = unused_lines(&index, &rewritten.used, &mut stats)?;

    log::info!(
        "Reconciled {} concept lines: {} matched, {} unmatched; {} of {} alias codes unused",
        stats.concept_lines,
        stats.matched,
        stats.unmatched,
        stats.unused_keys,
        stats.index_keys
    );

    Ok(ReconcileOutput {
        matched: rewritten.matched.concat(),
        unmatched: rewritten.unmatched.concat(),
        unused: unused.concat(),
        stats,
    })
}

/// Decode both inputs, reconcile, and re-encode the three outputs.
///
/// Decoding happens before any stage runs, so an undecodable input never
/// produces partial output.
pub fn reconcile_bytes(
    alias: &[u8],
    concepts: &[u8],
    config: &ReconcileConfig,
) -> Result<EncodedOutput> {
    let encoding = config.encoding;
    let alias = encoding.decode(alias, InputKind::Alias)?;
    let concepts = encoding.decode(concepts, InputKind::Concepts)?;

    let output = reconcile_text(&alias, &concepts, config)?;
    let files = output
        .files()
        .into_iter()
        .map(|(name, text)| {
            Ok(OutputFile {
                name,
                bytes: encoding.encode(text, name)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(EncodedOutput {
        files,
        stats: output.stats,
    })
}

/// Like [`reconcile_bytes`], for callers whose inputs may be absent
pub fn reconcile_inputs(
    alias: Option<&[u8]>,
    concepts: Option<&[u8]>,
    config: &ReconcileConfig,
) -> Result<EncodedOutput> {
    let alias = alias.ok_or(ReconcileError::MissingInput(InputKind::Alias))?;
    let concepts = concepts.ok_or(ReconcileError::MissingInput(InputKind::Concepts))?;
    reconcile_bytes(alias, concepts, config)
}
