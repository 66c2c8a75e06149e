//! Command implementations behind the `adtc` binary.

use std::io::{IsTerminal, Write};
use std::path::PathBuf;

use adt_diagnostic::ErrorCode;
use adt_ir::StringInterner;

use crate::{read_snapshot, report, DriverConfig, DriverError, DriverResult, Pipeline};

/// Arguments shared by `generate` and `check`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub snapshot: PathBuf,
    /// Directory for one `<type>.rs` per declaration; stdout when absent.
    pub output: Option<PathBuf>,
    pub config: DriverConfig,
}

impl Invocation {
    /// Parse the arguments following the command name.
    pub fn parse(args: &[String]) -> DriverResult<Invocation> {
        let mut snapshot = None;
        let mut output = None;
        let mut config = DriverConfig::default();
        let mut i = 0;
        while i < args.len() {
            let arg = &args[i];
            if arg == "-o" {
                let Some(dir) = args.get(i + 1) else {
                    return Err(DriverError::Usage("`-o` needs a directory".to_owned()));
                };
                output = Some(PathBuf::from(dir));
                i += 2;
                continue;
            }
            if !config.apply_flag(arg)? {
                if arg.starts_with('-') {
                    return Err(DriverError::Usage(format!("unknown option `{arg}`")));
                }
                if snapshot.is_some() {
                    return Err(DriverError::Usage(format!("unexpected argument `{arg}`")));
                }
                snapshot = Some(PathBuf::from(arg));
            }
            i += 1;
        }
        let Some(snapshot) = snapshot else {
            return Err(DriverError::Usage("missing snapshot path".to_owned()));
        };
        Ok(Invocation {
            snapshot,
            output,
            config,
        })
    }
}

/// Generate code for every declaration of the snapshot.
///
/// Returns whether the run was free of errors. Declarations that fail are
/// reported and skipped; the others are still written.
pub fn generate(inv: &Invocation) -> DriverResult<bool> {
    let interner = StringInterner::new();
    let snapshot = read_snapshot(&inv.snapshot, &interner)?;
    let run = Pipeline::new(&snapshot, &interner, &inv.config).run();

    match &inv.output {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|source| DriverError::Write {
                path: dir.clone(),
                source,
            })?;
            for module in &run.modules {
                let path = dir.join(format!("{}.rs", module.file_stem));
                std::fs::write(&path, &module.source)
                    .map_err(|source| DriverError::Write { path, source })?;
            }
            tracing::info!(
                modules = run.modules.len(),
                dir = %dir.display(),
                "modules written"
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(run.combined_source().as_bytes())
                .map_err(|source| DriverError::Write {
                    path: PathBuf::from("<stdout>"),
                    source,
                })?;
        }
    }

    let stderr = std::io::stderr();
    let is_tty = stderr.is_terminal();
    let summary = report(&run.messages, &snapshot, &inv.config, stderr.lock(), is_tty);
    Ok(summary.errors == 0)
}

/// Run the pipeline without writing any code.
pub fn check(inv: &Invocation) -> DriverResult<bool> {
    let interner = StringInterner::new();
    let snapshot = read_snapshot(&inv.snapshot, &interner)?;
    let run = Pipeline::new(&snapshot, &interner, &inv.config).run();

    let stderr = std::io::stderr();
    let is_tty = stderr.is_terminal();
    let summary = report(&run.messages, &snapshot, &inv.config, stderr.lock(), is_tty);
    if summary.errors == 0 {
        println!(
            "OK: {} ({} declarations)",
            inv.snapshot.display(),
            snapshot.declarations.len()
        );
    }
    Ok(summary.errors == 0)
}

/// Print what an error code means. Returns `false` for unknown codes.
pub fn explain(code: &str) -> bool {
    let Some(code) = ErrorCode::parse(code) else {
        eprintln!("Unknown error code: {code}");
        eprintln!();
        eprintln!("Codes look like E1001 (errors), W3001 (warnings) or I2001 (infos).");
        return false;
    };
    println!("{code} ({})", code.severity());
    println!();
    println!("{}", code.description());
    true
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests {
    use super::*;
    use crate::OutputFormat;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn invocation_collects_path_output_and_flags() {
        let inv = Invocation::parse(&args(&["decls.json", "-o", "gen", "--format=json"])).unwrap();
        assert_eq!(inv.snapshot, PathBuf::from("decls.json"));
        assert_eq!(inv.output, Some(PathBuf::from("gen")));
        assert_eq!(inv.config.format, OutputFormat::Json);
    }

    #[test]
    fn invocation_rejects_bad_arguments() {
        for bad in [
            &[][..],
            &["-o"][..],
            &["a.json", "b.json"][..],
            &["a.json", "--verbose"][..],
            &["a.json", "--format=xml"][..],
        ] {
            let err = Invocation::parse(&args(bad)).unwrap_err();
            assert!(matches!(err, DriverError::Usage(_)), "{bad:?}: {err}");
        }
    }

    #[test]
    fn explain_knows_every_code() {
        for code in ErrorCode::ALL {
            assert!(explain(code.as_str()));
        }
        assert!(!explain("E0000"));
    }
}
