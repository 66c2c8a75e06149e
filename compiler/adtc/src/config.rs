//! Driver configuration, built from command-line flags.

use adt_diagnostic::{emitter::ColorMode, DiagnosticConfig};
use adt_ir::DerivationKind;

use crate::DriverError;

/// How diagnostics are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable, optionally colored.
    #[default]
    Terminal,
    /// One JSON array per run.
    Json,
}

impl OutputFormat {
    pub fn parse(text: &str) -> Option<OutputFormat> {
        match text {
            "terminal" => Some(OutputFormat::Terminal),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DriverConfig {
    /// Derivations for annotations that do not list any.
    pub derive_defaults: Vec<DerivationKind>,
    pub diagnostics: DiagnosticConfig,
    pub format: OutputFormat,
    pub color: ColorMode,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            derive_defaults: DerivationKind::ALL.to_vec(),
            diagnostics: DiagnosticConfig::default(),
            format: OutputFormat::default(),
            color: ColorMode::default(),
        }
    }
}

impl DriverConfig {
    /// Apply one `--flag=value` option.
    ///
    /// Returns `Ok(false)` when `arg` is not a configuration flag.
    pub fn apply_flag(&mut self, arg: &str) -> Result<bool, DriverError> {
        let Some((flag, value)) = arg.split_once('=') else {
            return Ok(false);
        };
        match flag {
            "--format" => {
                self.format = OutputFormat::parse(value).ok_or_else(|| {
                    DriverError::Usage(format!(
                        "unknown format `{value}` (expected terminal or json)"
                    ))
                })?;
            }
            "--color" => {
                self.color = ColorMode::parse(value).ok_or_else(|| {
                    DriverError::Usage(format!(
                        "unknown color mode `{value}` (expected auto, always or never)"
                    ))
                })?;
            }
            "--error-limit" => {
                self.diagnostics.error_limit = value.parse().map_err(|_| {
                    DriverError::Usage(format!("`--error-limit` takes a number, got `{value}`"))
                })?;
            }
            "--derive" => {
                self.derive_defaults = value
                    .split(',')
                    .filter(|s| !s.is_empty())
                    .map(|name| {
                        DerivationKind::from_name(name).ok_or_else(|| {
                            DriverError::Usage(format!("unknown derivation `{name}`"))
                        })
                    })
                    .collect::<Result<_, _>>()?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn flags_update_the_config() {
        let mut config = DriverConfig::default();
        assert!(config.apply_flag("--format=json").unwrap());
        assert!(config.apply_flag("--color=never").unwrap());
        assert!(config.apply_flag("--error-limit=3").unwrap());
        assert!(config.apply_flag("--derive=constructors,getters").unwrap());
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.color, ColorMode::Never);
        assert_eq!(config.diagnostics.error_limit, 3);
        assert_eq!(
            config.derive_defaults,
            vec![DerivationKind::Constructors, DerivationKind::Getters]
        );
    }

    #[test]
    fn unknown_flags_are_left_alone() {
        let mut config = DriverConfig::default();
        assert!(!config.apply_flag("-o").unwrap());
        assert!(!config.apply_flag("--verbose=1").unwrap());
        assert_eq!(config, DriverConfig::default());
    }

    #[test]
    fn bad_values_are_usage_errors() {
        let mut config = DriverConfig::default();
        let err = config.apply_flag("--format=xml").unwrap_err();
        assert!(matches!(err, DriverError::Usage(_)));
        assert!(config.apply_flag("--derive=everything").is_err());
    }
}
