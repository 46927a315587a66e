use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser};
use pdf_text_helper::{PdfExtractor, Session};
use tracing_subscriber::EnvFilter;

mod prompt;

use prompt::TerminalPrompt;

const EXAMPLES: &str = "Examples:
  pdf-text-helper reports/annual.pdf
  pdf-text-helper secure/file.pdf -p 123456
  pdf-text-helper report.pdf -o output.txt";

#[derive(Parser, Debug)]
#[command(name = "pdf-text-helper", version)]
#[command(about = "Extract text from PDF files", long_about = None)]
#[command(after_help = EXAMPLES)]
struct Args {
    /// PDF file to extract text from
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Password for encrypted PDFs (prompted for when omitted and needed)
    #[arg(short, long, env = "PDF_HELPER_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Write the report to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> anyhow::Result<ExitCode> {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    writeln!(stdout, "Reading PDF file: {}", args.file.display())?;
    stdout.flush()?;

    let extractor = PdfExtractor::default();
    let mut prompt = TerminalPrompt::new();
    let result = Session::new(&extractor, &args.file, args.password).run(&mut prompt);

    pdf_text_helper::report(&result, args.output.as_deref(), &mut stdout)
        .context("could not write report")?;

    Ok(if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("✗ {:#}", e);
            ExitCode::FAILURE
        }
    }
}
