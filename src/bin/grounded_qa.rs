//! grounded-qa：根据文档回答问题的命令行工具
//!
//! Usage:
//!   grounded-qa [--config <file.yaml>] <document-file | -> <question>...
//!
//! Answers each question strictly from the document text and prints
//! question/answer pairs. `-` reads the document from stdin.

use anyhow::Context;
use grounded_qa::{Error, QaClient, QaConfig};
use std::io::Read;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

struct Args {
    config: Option<String>,
    document: String,
    questions: Vec<String>,
}

fn print_usage() {
    println!(
        r#"grounded-qa: answer questions from a document

USAGE:
    grounded-qa [--config <file.yaml>] <document-file | -> <question>...

OPTIONS:
    --config <file>     YAML configuration file (environment still overrides it)
    -h, --help          Show this help message
    -V, --version       Show version information

ENVIRONMENT:
    GEMINI_API_KEY                 API key (GOOGLE_API_KEY is also accepted)
    GROUNDED_QA_MODEL              Model identifier (default gemini-2.0-flash)
    GROUNDED_QA_HTTP_TIMEOUT_SECS  Request timeout in seconds (default 30)
    GROUNDED_QA_CACHE_TTL_SECS     Answer cache TTL in seconds (default 300)
    RUST_LOG                       Log filter (default info)"#
    );
}

fn parse_args(raw: &[String]) -> Option<Args> {
    let mut config = None;
    let mut positional = Vec::new();
    let mut iter = raw.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => config = Some(iter.next()?.clone()),
            _ => positional.push(arg.clone()),
        }
    }
    if positional.len() < 2 {
        return None;
    }
    let document = positional.remove(0);
    Some(Args {
        config,
        document,
        questions: positional,
    })
}

fn read_document(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading document from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("reading document {}", source))
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => QaConfig::from_yaml_file(path)?,
        None => QaConfig::from_env()?,
    };
    let document = read_document(&args.document)?;
    let client = QaClient::from_config(&config)?;

    let results = client.ask(&document, &args.questions).await?;
    for result in results {
        println!("Q{}: {}", result.index + 1, result.question);
        println!("A{}: {}", result.index + 1, result.answer);
        println!();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    match raw.first().map(String::as_str) {
        Some("help" | "--help" | "-h") => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Some("--version" | "-V") => {
            println!("grounded-qa {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        _ => {}
    }

    let Some(args) = parse_args(&raw) else {
        print_usage();
        return ExitCode::from(2);
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<Error>() {
            Some(e @ (Error::InvalidInput { .. } | Error::NotConfigured { .. } | Error::Configuration { .. })) => {
                eprintln!("Error: {}", e.user_message());
                if !e.is_user_correctable() {
                    eprintln!("  {}", e);
                }
                ExitCode::from(2)
            }
            Some(e) => {
                eprintln!("Error: {}", e.user_message());
                eprintln!("  {}", e);
                ExitCode::FAILURE
            }
            None => {
                eprintln!("Error: {:#}", err);
                ExitCode::FAILURE
            }
        },
    }
}
