use crate::flags::{AliasOverflowFlag, EncodingFlag};
use anyhow::{Context as AnyhowContext, Result};
use conceptmap_core::ReconcileConfig;
use std::fs;
use std::path::{Path, PathBuf};

pub(crate) const CONFIG_ENV: &str = "CONCEPTMAP_CONFIG";

/// Flag values that take precedence over the config file
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ConfigOverrides {
    pub(crate) encoding: Option<EncodingFlag>,
    pub(crate) alias_overflow: Option<AliasOverflowFlag>,
}

/// Defaults, then the TOML file (`--config` or `CONCEPTMAP_CONFIG`), then flags
pub(crate) fn resolve_config(
    explicit: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<ReconcileConfig> {
    let env_path = std::env::var(CONFIG_ENV).ok();
    let mut config = match config_path(explicit, env_path.as_deref()) {
        Some(path) => load_config_file(&path)?,
        None => ReconcileConfig::default(),
    };

    if let Some(encoding) = overrides.encoding {
        config.encoding = encoding.as_domain();
    }
    if let Some(policy) = overrides.alias_overflow {
        config.alias_overflow = policy.as_domain();
    }

    config.validate()?;
    Ok(config)
}

fn config_path(explicit: Option<&Path>, env_value: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    env_value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

pub(crate) fn load_config_file(path: &Path) -> Result<ReconcileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Cannot read config file {}", path.display()))?;
    let config: ReconcileConfig = toml::from_str(&raw)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    log::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use conceptmap_core::{AliasOverflow, TextEncoding};
    use std::io::Write;

    #[test]
    fn flag_path_wins_over_env() {
        let explicit = Path::new("a.toml");
        assert_eq!(
            config_path(Some(explicit), Some("b.toml")),
            Some(PathBuf::from("a.toml"))
        );
        assert_eq!(config_path(None, Some(" b.toml ")), Some(PathBuf::from("b.toml")));
        assert_eq!(config_path(None, Some("  ")), None);
        assert_eq!(config_path(None, None), None);
    }

    #[test]
    fn overrides_apply_on_top_of_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "delimiter = \"|\"\nencoding = \"utf8\"\nalias_overflow = \"truncate\""
        )
        .unwrap();

        let config = resolve_config(
            Some(file.path()),
            ConfigOverrides {
                encoding: Some(EncodingFlag::Latin1),
                alias_overflow: None,
            },
        )
        .unwrap();

        assert_eq!(config.delimiter, '|');
        assert_eq!(config.encoding, TextEncoding::Latin1);
        assert_eq!(config.alias_overflow, AliasOverflow::Truncate);
    }

    #[test]
    fn invalid_file_is_reported_with_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[code_field]\nstart = 9\nend = 3").unwrap();

        let err = resolve_config(Some(file.path()), ConfigOverrides::default()).unwrap_err();
        assert!(err.to_string().contains("code_field"));
    }
}
