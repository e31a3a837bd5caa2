//! promql-assist - PromQL completion from the command line
//!
//! Classifies a cursor position against a live backend and prints the
//! suggestions as JSON.

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use promql_assist::client::Config;
use promql_assist::{
    CompletionSnapshot, LanguageProvider, PrometheusClient, PromQuery, classify,
};

/// PromQL completion engine
#[derive(Parser)]
#[command(name = "promql-assist")]
#[command(version)]
#[command(about = "Context-aware PromQL completion")]
struct Args {
    /// Config file (default: <config dir>/promql-assist/config.toml)
    #[arg(short, long, env = "PROMQL_ASSIST_CONFIG")]
    config: Option<PathBuf>,

    /// Backend URL, overriding the config file
    #[arg(short, long, env = "PROMQL_ASSIST_URL")]
    url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Suggest completions at a cursor position
    Complete {
        /// Query text (or omit to read from stdin)
        query: Option<String>,
        /// Cursor byte offset (default: end of query)
        #[arg(long)]
        cursor: Option<usize>,
        /// Label whose values are being completed
        #[arg(long)]
        label_key: Option<String>,
        /// Skip the metric-name preload
        #[arg(long)]
        no_preload: bool,
    },

    /// Print the label matchers of a query
    Export {
        /// Query text (or omit to read from stdin)
        query: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(url) = args.url {
        config.client.base_url = url;
    }

    match args.command {
        Command::Complete {
            query,
            cursor,
            label_key,
            no_preload,
        } => {
            let query = read_input(query)?;
            let client = PrometheusClient::new(config.client)?;
            let provider = LanguageProvider::builder(Arc::new(client))
                .config(config.provider)
                .build();

            if !no_preload {
                for task in provider.start(None).await? {
                    task.await?;
                }
            }

            let mut snapshot =
                CompletionSnapshot::from_text(query.as_str(), cursor.unwrap_or(query.len()));
            if let Some(key) = label_key {
                snapshot = snapshot.label_key(key);
            }

            let context = classify(&snapshot);
            let result = provider.provide_completion_items(&snapshot, &[]).await;
            let output = serde_json::json!({
                "context": context.kind(),
                "result": result,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Export { query } => {
            let query = read_input(query)?;
            let client = PrometheusClient::new(config.client)?;
            let provider = LanguageProvider::new(Arc::new(client));
            let exported = provider.export_to_abstract_query(&PromQuery::new("A", query.trim()));
            println!("{}", serde_json::to_string_pretty(&exported)?);
        }
    }

    Ok(())
}

/// Use the argument, or read stdin when it is piped.
fn read_input(arg: Option<String>) -> io::Result<String> {
    if let Some(text) = arg {
        return Ok(text);
    }
    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no query given and stdin is a terminal",
        ));
    }
    let mut buf = String::new();
    stdin.read_to_string(&mut buf)?;
    Ok(buf.trim_end_matches('\n').to_string())
}
