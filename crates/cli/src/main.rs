// PuffLab CLI - batch conversion of legacy puff-test workbooks
// into the canonical template layout.

mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};
use pufflab_engine::detect_format;
use pufflab_io::convert::{convert_with_options, ConvertOptions};
use pufflab_io::xlsx::load_grid;

#[derive(Parser)]
#[command(name = "pufflab")]
#[command(about = "Normalize legacy puff-test spreadsheets into the standard template")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert legacy workbooks into the canonical layout
    #[command(after_help = "\
Examples:
  pufflab convert 'old run 3.xlsx'
  pufflab convert data/*.xlsx --template resources/template.xlsx --out-dir converted
  pufflab convert run.xlsx --sheet 'Test 2' --json")]
    Convert {
        /// Legacy workbook files to convert
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Template workbook (must contain an 'Intense Test' sheet)
        #[arg(long)]
        template: Option<PathBuf>,

        /// Output directory (default: 'legacy data' beside each source)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Source sheet name (default: first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Accept anchors that are off the 12-column block boundaries
        #[arg(long)]
        no_alignment_check: bool,

        /// Emit reports as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Report the detected legacy format of each workbook
    Detect {
        /// Workbook files to inspect
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let code = match cli.command {
        None => {
            eprintln!("Usage: pufflab <command> [options]");
            eprintln!("       pufflab --help for more information");
            EXIT_USAGE
        }
        Some(Commands::Convert {
            files,
            template,
            out_dir,
            sheet,
            no_alignment_check,
            json,
        }) => cmd_convert(files, template, out_dir, sheet, no_alignment_check, json),
        Some(Commands::Detect { files }) => cmd_detect(files),
    };

    ExitCode::from(code)
}

/// Convert each file independently: a fatal error on one never stops the
/// rest of the batch.
fn cmd_convert(
    files: Vec<PathBuf>,
    template: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    sheet: Option<String>,
    no_alignment_check: bool,
    json: bool,
) -> u8 {
    let options = ConvertOptions {
        template,
        out_dir,
        sheet,
        strict_alignment: !no_alignment_check,
    };

    let mut failures = 0usize;
    let mut results = Vec::new();

    for file in &files {
        match convert_with_options(file, &options) {
            Ok(conversion) => {
                if json {
                    results.push(serde_json::json!({
                        "file": file.display().to_string(),
                        "ok": true,
                        "output": conversion.output_path.display().to_string(),
                        "report": conversion.report,
                    }));
                } else {
                    println!(
                        "{}: {} -> {}",
                        file.display(),
                        conversion.report.summary(),
                        conversion.output_path.display()
                    );
                    for warning in &conversion.report.warnings {
                        println!("  warning: {warning}");
                    }
                }
            }
            Err(e) => {
                failures += 1;
                if json {
                    results.push(serde_json::json!({
                        "file": file.display().to_string(),
                        "ok": false,
                        "error": e.to_string(),
                    }));
                } else {
                    eprintln!("{}: error: {e}", file.display());
                }
            }
        }
    }

    if json {
        match serde_json::to_string_pretty(&results) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("error: failed to serialize reports: {e}");
                return EXIT_ERROR;
            }
        }
    } else if files.len() > 1 {
        println!("{} of {} file(s) converted", files.len() - failures, files.len());
    }

    if failures > 0 {
        EXIT_ERROR
    } else {
        EXIT_SUCCESS
    }
}

fn cmd_detect(files: Vec<PathBuf>) -> u8 {
    let mut failures = 0usize;

    for file in &files {
        match load_grid(file, None) {
            Ok(grid) => {
                println!("{}: {}", file.display(), detect_format(&grid));
            }
            Err(e) => {
                failures += 1;
                eprintln!("{}: error: {e}", file.display());
            }
        }
    }

    if failures > 0 {
        EXIT_ERROR
    } else {
        EXIT_SUCCESS
    }
}
