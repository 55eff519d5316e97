use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use hclfmt_core::{Diagnostics, Severity};

/// hclfmt — canonical formatter for HCL configuration files
///
/// Rewrites legacy syntax (quoted interpolations, bare collection types,
/// unquoted block labels) into its modern form.
#[derive(Parser)]
#[command(name = "hclfmt", version, about, long_about = None)]
struct Cli {
    /// Suppress informational output and logging
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format a configuration file and print the result
    Fmt {
        /// Path to .tf/.hcl file, or `-` for stdin
        file: PathBuf,
        /// Rewrite the file in place
        #[arg(long, conflicts_with = "check")]
        write: bool,
        /// Exit 1 if the file is not already canonical
        #[arg(long)]
        check: bool,
        /// Refuse to format input with syntax errors
        #[arg(long)]
        strict: bool,
    },

    /// Report syntax problems in a configuration file
    Validate {
        /// Path to .tf/.hcl file, or `-` for stdin
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

const LOG_FILTER: &str = "RUST_LOG";

/// Install the stderr subscriber. `RUST_LOG` takes precedence over flags.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "off",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };

    let env_filter = match std::env::var_os(LOG_FILTER) {
        Some(_) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        None => EnvFilter::new(level),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let exit_code = match cli.command {
        Commands::Fmt {
            file,
            write,
            check,
            strict,
        } => cmd_fmt(&file, write, check, strict),
        Commands::Validate { file, json } => cmd_validate(&file, json, cli.quiet),
        Commands::Version => {
            println!(
                "hclfmt {} (hclfmt-core {})",
                env!("CARGO_PKG_VERSION"),
                hclfmt_core::VERSION
            );
            0
        }
    };

    process::exit(exit_code);
}

// ── Input ─────────────────────────────────────────────────

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn display_name(path: &Path) -> String {
    if is_stdin(path) {
        "<stdin>".to_string()
    } else {
        path.display().to_string()
    }
}

fn read_input(path: &Path) -> hclfmt_core::Result<Vec<u8>> {
    if is_stdin(path) {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .map_err(|e| hclfmt_core::Error::io("<stdin>", &e))?;
        Ok(buf)
    } else {
        std::fs::read(path).map_err(|e| hclfmt_core::Error::io(path.display().to_string(), &e))
    }
}

// ── Commands ──────────────────────────────────────────────

fn cmd_fmt(path: &Path, write: bool, check: bool, strict: bool) -> i32 {
    if write && is_stdin(path) {
        eprintln!("{} --write cannot be used with stdin", "error:".red().bold());
        return 2;
    }

    let src = match read_input(path) {
        Ok(src) => src,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            return 2;
        }
    };

    let output = if strict {
        match hclfmt_core::format_strict(&src) {
            Ok(output) => output,
            Err(e) => {
                eprintln!("{} {}: {}", "error:".red().bold(), display_name(path), e);
                return 1;
            }
        }
    } else {
        hclfmt_core::format_hcl(&src)
    };
    let changed = output != src;
    debug!(file = %display_name(path), changed, "formatted");

    if check {
        if changed {
            eprintln!("{}", display_name(path));
            return 1;
        }
        return 0;
    }

    if write {
        if changed {
            if let Err(e) = std::fs::write(path, &output) {
                let err = hclfmt_core::Error::io(path.display().to_string(), &e);
                eprintln!("{} {}", "error:".red().bold(), err);
                return 2;
            }
            info!("rewrote {}", path.display());
        }
        return 0;
    }

    let mut stdout = io::stdout().lock();
    if let Err(e) = stdout.write_all(&output).and_then(|_| stdout.flush()) {
        eprintln!("{} {}", "error:".red().bold(), e);
        return 2;
    }
    0
}

fn cmd_validate(path: &Path, json: bool, quiet: bool) -> i32 {
    let src = match read_input(path) {
        Ok(src) => src,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            return 2;
        }
    };

    let (_, diagnostics) = hclfmt_core::parse_config_bytes(&src);
    let valid = !diagnostics.has_errors();

    if json {
        print_json(&diagnostics, valid);
    } else {
        print_diagnostics(path, &diagnostics);
        if valid && !quiet {
            println!("{} {} is valid", "✓".green().bold(), display_name(path));
        }
    }

    if valid {
        0
    } else {
        1
    }
}

fn print_json(diagnostics: &Diagnostics, valid: bool) {
    let report = serde_json::json!({
        "valid": valid,
        "errors": diagnostics.errors().len(),
        "warnings": diagnostics.warnings().len(),
        "diagnostics": diagnostics.diagnostics,
    });
    match serde_json::to_string_pretty(&report) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("{} {}", "error:".red().bold(), e),
    }
}

fn print_diagnostics(path: &Path, diagnostics: &Diagnostics) {
    for diagnostic in diagnostics.iter() {
        let label = match diagnostic.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
        };
        let location = match diagnostic.span {
            Some(span) => format!("{}:{}", display_name(path), span),
            None => display_name(path),
        };
        eprintln!(
            "{} [{}] {}: {}",
            label, diagnostic.kind, location, diagnostic.message
        );
    }
}
