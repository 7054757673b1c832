//! Command-line front end: read a request body, print the response.
//!
//! ```text
//! rossmann-predict --params parameter --model model/model_rossmann.json \
//!     --input test.csv --pretty
//! ```

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use rossmann_rs::dataset::{decode_csv, decode_json};
use rossmann_rs::service::error_body;
use rossmann_rs::{PredictionService, ServingConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    Json,
    Csv,
}

impl InputFormat {
    fn infer(path: Option<&Path>) -> Self {
        match path.and_then(|p| p.extension()).and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => InputFormat::Csv,
            _ => InputFormat::Json,
        }
    }
}

/// Predict daily store sales for a batch of records.
#[derive(Debug, Parser)]
#[command(name = "rossmann-predict", version, about)]
struct Cli {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Model artifact (.json or .bin). Overrides the configuration.
    #[arg(long)]
    model: Option<PathBuf>,

    /// Directory of parameter artifacts. Overrides the configuration.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Request file. Reads stdin when omitted.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Input format. Inferred from the input extension, else JSON.
    #[arg(long, value_enum)]
    format: Option<InputFormat>,

    /// Response file. Writes stdout when omitted.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Pretty-print the response.
    #[arg(long)]
    pretty: bool,
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => fs::read(path).with_context(|| format!("reading {}", path.display())),
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf).context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&Path>, body: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, format!("{}\n", body))
            .with_context(|| format!("writing {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", body).context("writing stdout")
        }
    }
}

/// Request failures are reported once, as an `{"error": ...}` body on stderr.
fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = ServingConfig::resolve(cli.config.as_deref())?;
    if let Some(model) = cli.model {
        config.model_path = model;
    }
    if let Some(params) = cli.params {
        config.parameter_dir = params;
    }
    init_tracing(&config.log_filter);
    debug!(?config, "resolved configuration");

    let service = PredictionService::from_config(&config).with_context(|| {
        format!(
            "loading model {} and parameters from {}",
            config.model_path.display(),
            config.parameter_dir.display()
        )
    })?;

    let input = read_input(cli.input.as_deref())?;
    let format = cli
        .format
        .unwrap_or_else(|| InputFormat::infer(cli.input.as_deref()));
    let request = match format {
        InputFormat::Json => {
            let text = String::from_utf8(input).context("request body is not UTF-8")?;
            decode_json(&text)
        }
        InputFormat::Csv => decode_csv(input.as_slice()),
    };

    let response = request.and_then(|request| service.handle_request(request));
    match response {
        Ok(response) => {
            let body = if cli.pretty {
                response.to_json_pretty()
            } else {
                response.to_json()
            };
            write_output(cli.output.as_deref(), &body)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}", error_body(&err));
            Ok(ExitCode::FAILURE)
        }
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
