use anyhow::{Context as AnyhowContext, Result};
use conceptmap_core::OutputFile;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Download name used by the upload server
pub(crate) const ARCHIVE_NAME: &str = "Reportes_Procesados.zip";

/// Pack the output files into an in-memory deflated zip, preserving order
pub(crate) fn build_zip(files: &[OutputFile]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for file in files {
        writer
            .start_file(file.name, options)
            .with_context(|| format!("Failed to add {} to archive", file.name))?;
        writer
            .write_all(&file.bytes)
            .with_context(|| format!("Failed to write {} into archive", file.name))?;
    }

    let cursor = writer.finish().context("Failed to finish zip archive")?;
    Ok(cursor.into_inner())
}
