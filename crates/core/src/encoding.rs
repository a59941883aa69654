use crate::error::{InputKind, ReconcileError, Result};
use serde::{Deserialize, Serialize};

/// Text encoding shared by both inputs and all outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextEncoding {
    /// ISO-8859-1: every byte is the code point of the same value
    #[default]
    #[serde(alias = "latin-1", alias = "iso-8859-1")]
    Latin1,
    /// Strict UTF-8
    #[serde(alias = "utf-8")]
    Utf8,
}

impl TextEncoding {
    pub const fn as_str(self) -> &'static str {
        match self {
            TextEncoding::Latin1 => "latin-1 (ISO-8859-1)",
            TextEncoding::Utf8 => "utf-8",
        }
    }

    /// Decode one input; the error names which input failed
    pub fn decode(self, bytes: &[u8], input: InputKind) -> Result<String> {
        match self {
            TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            TextEncoding::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|err| {
                ReconcileError::Decode {
                    input,
                    encoding: self.as_str(),
                    reason: err.utf8_error().to_string(),
                }
            }),
        }
    }

    /// Encode one output file
    pub fn encode(self, text: &str, file: &'static str) -> Result<Vec<u8>> {
        match self {
            TextEncoding::Latin1 => {
                let mut out = Vec::with_capacity(text.len());
                for (offset, ch) in text.chars().enumerate() {
                    let byte = u8::try_from(u32::from(ch)).map_err(|_| ReconcileError::Encode {
                        file,
                        encoding: self.as_str(),
                        reason: format!("character {ch:?} at position {offset} is outside latin-1"),
                    })?;
                    out.push(byte);
                }
                Ok(out)
            }
            TextEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
        }
    }
}
