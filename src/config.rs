use crate::summarize::{SegmenterMode, SummaryConfig};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "freqsum")]
#[command(about = "Frequency-based extractive text summarizer", long_about = None)]
pub struct AppConfig {
    /// Stopword list, one word per line. Defaults to the built-in English list.
    #[arg(long, global = true, env = "FREQSUM_STOPWORDS")]
    pub stopwords_file: Option<PathBuf>,

    #[arg(long, global = true, env = "FREQSUM_SEGMENTER", value_enum, default_value_t = SegmenterArg::Auto)]
    pub segmenter: SegmenterArg,

    #[command(subcommand)]
    pub command: Command,
}

/// `--segmenter` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SegmenterArg {
    /// Unicode sentence boundaries, falling back to the punctuation splitter
    Auto,
    /// Punctuation splitter only
    Heuristic,
}

impl From<SegmenterArg> for SegmenterMode {
    fn from(arg: SegmenterArg) -> Self {
        match arg {
            SegmenterArg::Auto => SegmenterMode::Auto,
            SegmenterArg::Heuristic => SegmenterMode::Heuristic,
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Summarize one text from --text, --file or stdin
    Summarize {
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
        #[command(flatten)]
        length: LengthArgs,
    },
    /// Summarize every conversation in a CSV (or .jsonl) message file
    Batch {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
        #[command(flatten)]
        length: LengthArgs,
    },
    /// Run the MCP server over stdio
    Serve,
}

#[derive(Debug, Clone, Copy, Default, Args)]
pub struct LengthArgs {
    /// Number of sentences to keep (takes precedence over --ratio)
    #[arg(long, env = "FREQSUM_NUM_SENTENCES")]
    pub num_sentences: Option<usize>,

    /// Fraction of sentences to keep, in (0, 1]
    #[arg(long, env = "FREQSUM_RATIO")]
    pub ratio: Option<f64>,
}

impl From<LengthArgs> for SummaryConfig {
    fn from(args: LengthArgs) -> Self {
        SummaryConfig {
            num_sentences: args.num_sentences,
            ratio: args.ratio,
        }
    }
}

impl AppConfig {
    pub fn from_env_and_args() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> Result<(), String> {
        let length = match &self.command {
            Command::Summarize { length, .. } | Command::Batch { length, .. } => *length,
            Command::Serve => return Ok(()),
        };
        SummaryConfig::from(length)
            .validate()
            .map_err(|e| e.to_string())
    }
}
