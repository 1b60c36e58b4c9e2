//! Signal transpiler command line interface
//!
//! # Usage
//!
//! ```bash
//! # Transpile a signal from stdin
//! printf 'MARKET: BTC/USDT\nSTART AT: 2021-06-22\nENTER: NOW' | hts_cli
//!
//! # Transpile a file and print the full report as JSON
//! hts_cli --file signal.txt --format json
//!
//! # Use custom exchange registries
//! hts_cli --file signal.txt --config transpiler.yaml
//! ```

use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use signal_transpiler::{
    InputToken, SignalTranspiler, TokenType, TranspilerConfig, TranspilerOutput,
};

#[derive(Parser)]
#[command(name = "hts_cli")]
#[command(version)]
#[command(about = "Transpile trading signal text into a signal checker configuration")]
struct Cli {
    /// Input file (reads stdin if not provided)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Output format: pretty (default) or json
    #[arg(long, short = 'o', default_value = "pretty", value_enum)]
    format: OutputFormat,

    /// YAML file overriding the exchange registries and defaults
    #[arg(long, short, env = "HTS_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

// =============================================================================
// MAIN
// =============================================================================

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "signal_transpiler=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) if output.has_errors() => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<TranspilerOutput, String> {
    let config = match &cli.config {
        Some(path) => TranspilerConfig::from_yaml_file(path).map_err(|e| e.to_string())?,
        None => TranspilerConfig::default(),
    };
    let source = read_input(cli.file.as_ref())?;
    let output = SignalTranspiler::new(config).transpile(&source);

    match cli.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&output).map_err(|e| e.to_string())?;
            println!("{}", json);
        }
        OutputFormat::Pretty => print_pretty(&output),
    }
    Ok(output)
}

fn read_input(file: Option<&PathBuf>) -> Result<String, String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e)),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("Failed to read stdin: {}", e))?;
            Ok(buf)
        }
    }
}

// =============================================================================
// RENDERING
// =============================================================================

fn print_pretty(output: &TranspilerOutput) {
    for line in &output.tokenized_input {
        let rendered: String = line.iter().map(paint).collect();
        println!("{}", rendered);
    }
    println!();

    if output.errors.is_empty() {
        println!("{}", "✓ Signal is valid".green().bold());
        let signal = &output.signal_input;
        println!(
            "  {}/{} on {} ({})",
            signal.base_asset,
            signal.quote_asset,
            signal.exchange,
            if signal.is_short { "short" } else { "long" }
        );
    } else {
        println!("{}", format!("✗ {} error(s)", output.errors.len()).red().bold());
        for error in &output.errors {
            println!("  {} {}", "error:".red(), error);
        }
    }
    for warning in &output.warnings {
        println!("  {} {}", "warning:".yellow(), warning);
    }
}

fn paint(token: &InputToken) -> String {
    let text = token.input.as_str();
    match token.token_type {
        TokenType::Instruction => text.green().to_string(),
        TokenType::Expression => text.cyan().to_string(),
        TokenType::Error => text.red().underline().to_string(),
        TokenType::Comment => text.dimmed().to_string(),
        TokenType::Punctuation => text.to_string(),
    }
}
