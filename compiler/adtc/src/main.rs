//! adtgen command-line driver.

use std::process::ExitCode;

use adtc::commands::{check, explain, generate, Invocation};
use adtc::DriverResult;

fn main() -> ExitCode {
    adtc::init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let command = &args[1];

    match command.as_str() {
        "generate" | "gen" => {
            if args.len() < 3 {
                eprintln!("Usage: adtc generate <snapshot.json> [-o <dir>] [options]");
                return ExitCode::FAILURE;
            }
            finish(Invocation::parse(&args[2..]).and_then(|inv| generate(&inv)))
        }
        "check" => {
            if args.len() < 3 {
                eprintln!("Usage: adtc check <snapshot.json> [options]");
                return ExitCode::FAILURE;
            }
            finish(Invocation::parse(&args[2..]).and_then(|inv| check(&inv)))
        }
        "--explain" | "explain" => {
            if args.len() < 3 {
                eprintln!("Usage: adtc --explain <CODE>");
                eprintln!("Example: adtc --explain E2001");
                return ExitCode::FAILURE;
            }
            if explain(&args[2]) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "version" | "--version" | "-V" => {
            println!("adtc {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            ExitCode::FAILURE
        }
    }
}

/// Map a command outcome to the process exit code.
fn finish(result: DriverResult<bool>) -> ExitCode {
    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}

fn print_usage() {
    println!("adtc: algebraic data type code generator");
    println!();
    println!("Usage: adtc <command> [options]");
    println!();
    println!("Commands:");
    println!("  generate <snapshot.json>  Generate Rust modules for every declaration");
    println!("  check <snapshot.json>     Run every derivation without writing code");
    println!("  --explain <code>          Explain a diagnostic code (e.g., E2001)");
    println!("  help                      Show this help message");
    println!("  version                   Show version information");
    println!();
    println!("Options:");
    println!("  -o <dir>                  Write one <type>.rs per declaration into <dir>");
    println!("  --format=<fmt>            Diagnostics as: terminal (default), json");
    println!("  --color=<mode>            Colors: auto (default), always, never");
    println!("  --error-limit=<n>         Stop reporting after n errors (0 = unlimited)");
    println!("  --derive=<a,b,..>         Derivations for annotations that list none");
    println!();
    println!("Derivations:");
    println!("  matcher, constructors, lazy, case_of, destructure, getters, modifiers,");
    println!("  catamorphism, factory");
    println!();
    println!("Examples:");
    println!("  adtc generate decls.json                 # Print all modules");
    println!("  adtc generate decls.json -o src/gen      # One file per type");
    println!("  adtc check decls.json --format=json");
    println!("  adtc --explain W3001");
    println!();
    println!("Set RUST_LOG=adtc=debug for pipeline traces (ADTC_LOG_TREE=1 for a tree view).");
}
