use std::io::Read as _;
use std::path::PathBuf;
use std::sync::Arc;

mod batch;
mod config;
mod errors;
mod health;
mod logging;
mod mcp;
mod summarize;

use crate::config::{AppConfig, Command};
use crate::mcp::StdioMcpServer;
use crate::summarize::{build_summarizer, stopwords, SegmenterMode, Summarizer, SummaryConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let cfg = AppConfig::from_env_and_args();
    if let Err(e) = cfg.validate() {
        tracing::error!(config_error=%e, "invalid config");
        anyhow::bail!(e);
    }

    // Loaded before any request; read-only afterwards
    let stopwords = stopwords::init(cfg.stopwords_file.as_deref());
    let mode: SegmenterMode = cfg.segmenter.into();
    let summarizer = build_summarizer(mode, stopwords.clone());

    let report = health::report(mode, &stopwords);
    tracing::info!(
        primary_segmenter_ok = report.primary_segmenter_ok,
        segmenter_mode = %report.segmenter_mode,
        stopwords = report.stopwords,
        stopwords_ok = report.stopwords_ok,
        "summarizer ready"
    );

    match cfg.command {
        Command::Summarize { text, file, length } => {
            summarize_one(summarizer.as_ref(), text, file, &length.into())
        }
        Command::Batch {
            input,
            output,
            length,
        } => {
            let n = batch::run(summarizer.as_ref(), &input, &output, &length.into())?;
            tracing::info!(conversations = n, "batch summarization completed");
            Ok(())
        }
        Command::Serve => {
            let server = StdioMcpServer::new(Arc::clone(&summarizer), stopwords, mode);
            // Not spawned: the run future holds stdio locks and is not Send
            tokio::select! {
                res = server.run() => {
                    if let Err(e) = &res { tracing::error!(error=?e, "server terminated with error") }
                    res
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("received shutdown signal");
                    Ok(())
                }
            }
        }
    }
}

fn summarize_one(
    summarizer: &dyn Summarizer,
    text: Option<String>,
    file: Option<PathBuf>,
    config: &SummaryConfig,
) -> anyhow::Result<()> {
    let text = match (text, file) {
        (Some(t), _) => t,
        (None, Some(path)) => std::fs::read_to_string(&path)?,
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let res = summarizer.summarize(&text, config)?;
    if res.is_unchanged() {
        tracing::info!(degradations=?res.degradations, "nothing to select, input returned unchanged");
    } else if !res.degradations.is_empty() {
        tracing::warn!(degradations=?res.degradations, "summary produced in degraded mode");
    }
    println!("{}", res.summary);
    Ok(())
}
