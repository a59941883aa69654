use clap::ValueEnum;
use conceptmap_core::{AliasOverflow, TextEncoding};

#[derive(Copy, Clone, Debug, ValueEnum)]
pub(crate) enum EncodingFlag {
    Latin1,
    Utf8,
}

impl EncodingFlag {
    pub(crate) const fn as_domain(self) -> TextEncoding {
        match self {
            EncodingFlag::Latin1 => TextEncoding::Latin1,
            EncodingFlag::Utf8 => TextEncoding::Utf8,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub(crate) enum AliasOverflowFlag {
    Widen,
    Truncate,
    Reject,
}

impl AliasOverflowFlag {
    pub(crate) const fn as_domain(self) -> AliasOverflow {
        match self {
            AliasOverflowFlag::Widen => AliasOverflow::Widen,
            AliasOverflowFlag::Truncate => AliasOverflow::Truncate,
            AliasOverflowFlag::Reject => AliasOverflow::Reject,
        }
    }
}
