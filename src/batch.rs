//! Per-conversation summaries for message logs.
//!
//! Input is a CSV with `conversation_id` and `message` columns (other columns
//! are ignored), or JSON Lines with the same two fields when the file ends in
//! `.jsonl`/`.ndjson`. Messages are grouped by conversation, joined with a
//! space and summarized; the report lists conversations in id order.

use crate::errors::{BatchError, SummarizeError};
use crate::summarize::{Degradation, Summarizer, SummaryConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::{BufRead, Read, Write};
use std::path::Path;

/// Numeric ids sort numerically and before textual ids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConversationId {
    Num(u64),
    Text(String),
}

impl From<String> for ConversationId {
    fn from(raw: String) -> Self {
        match raw.trim().parse::<u64>() {
            Ok(n) => ConversationId::Num(n),
            Err(_) => ConversationId::Text(raw),
        }
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationId::Num(n) => write!(f, "{n}"),
            ConversationId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    pub conversation_id: ConversationId,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    pub conversation_id: ConversationId,
    pub summary: String,
    pub degradations: Vec<Degradation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    JsonLines,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("jsonl") || ext.eq_ignore_ascii_case("ndjson") => {
                InputFormat::JsonLines
            }
            _ => InputFormat::Csv,
        }
    }
}

// CSV cells are all text; ids are typed afterwards.
#[derive(Debug, Deserialize)]
struct CsvRow {
    conversation_id: String,
    message: String,
}

pub fn read_csv_messages<R: Read>(reader: R) -> Result<Vec<MessageRecord>, BatchError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let mut records = Vec::new();
    for row in rdr.deserialize::<CsvRow>() {
        let row = row.map_err(|source| {
            let line = source.position().map_or(0, |p| p.line() as usize);
            BatchError::Csv { line, source }
        })?;
        records.push(MessageRecord {
            conversation_id: row.conversation_id.into(),
            message: row.message,
        });
    }
    Ok(records)
}

pub fn read_jsonl_messages<R: BufRead>(reader: R) -> Result<Vec<MessageRecord>, BatchError> {
    let mut records = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| BatchError::Parse {
            line: i + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}

pub fn group_conversations(records: Vec<MessageRecord>) -> BTreeMap<ConversationId, String> {
    let mut grouped: BTreeMap<ConversationId, Vec<String>> = BTreeMap::new();
    for r in records {
        grouped.entry(r.conversation_id).or_default().push(r.message);
    }
    grouped
        .into_iter()
        .map(|(id, messages)| (id, messages.join(" ")))
        .collect()
}

/// A conversation with unusable text keeps its original text; a bad config
/// fails the whole batch.
pub fn summarize_conversations(
    summarizer: &dyn Summarizer,
    conversations: BTreeMap<ConversationId, String>,
    config: &SummaryConfig,
) -> Result<Vec<ConversationSummary>, SummarizeError> {
    config.validate()?;
    let mut out = Vec::with_capacity(conversations.len());
    for (conversation_id, text) in conversations {
        let (summary, degradations) = match summarizer.summarize(&text, config) {
            Ok(res) => (res.summary, res.degradations),
            Err(SummarizeError::InvalidInput(reason)) => {
                tracing::warn!(%conversation_id, %reason, "conversation not summarized, keeping original text");
                (text, Vec::new())
            }
            Err(e) => return Err(e),
        };
        tracing::info!(%conversation_id, "processed conversation");
        out.push(ConversationSummary {
            conversation_id,
            summary,
            degradations,
        });
    }
    Ok(out)
}

pub fn write_report<W: Write>(writer: &mut W, summaries: &[ConversationSummary]) -> std::io::Result<()> {
    for s in summaries {
        write!(writer, "Conversation {}:\n{}\n\n", s.conversation_id, s.summary)?;
    }
    writer.flush()
}

/// Reads `input`, writes the report to `output` and returns the number of
/// conversations summarized.
pub fn run(
    summarizer: &dyn Summarizer,
    input: &Path,
    output: &Path,
    config: &SummaryConfig,
) -> Result<usize, BatchError> {
    let reader = std::io::BufReader::new(std::fs::File::open(input)?);
    let format = InputFormat::from_path(input);
    let records = match format {
        InputFormat::Csv => read_csv_messages(reader)?,
        InputFormat::JsonLines => read_jsonl_messages(reader)?,
    };
    tracing::info!(messages = records.len(), ?format, input=%input.display(), "read message log");

    let summaries = summarize_conversations(summarizer, group_conversations(records), config)?;

    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let mut writer = std::io::BufWriter::new(std::fs::File::create(output)?);
    write_report(&mut writer, &summaries)?;
    tracing::info!(conversations = summaries.len(), output=%output.display(), "summaries written");
    Ok(summaries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarize::{FrequencySummarizer, SegmenterMode, StopwordSet};
    use std::sync::Arc;

    fn summarizer() -> FrequencySummarizer {
        FrequencySummarizer::new(
            crate::summarize::segment::Segmenter::new(SegmenterMode::Auto),
            Arc::new(StopwordSet::english()),
        )
    }

    const LOG: &str = r#"{"conversation_id": 10, "message": "Cats are great."}
{"conversation_id": 2, "message": "Rust is fast."}

{"conversation_id": 10, "message": "Dogs are great too."}
{"conversation_id": "abc", "message": ""}
"#;

    const CSV_LOG: &str = "conversation_id,message,sentiment\n\
10,Cats are great.,Happy\n\
2,\"Rust is fast, really fast.\",Neutral\n\
10,Dogs are great too.,Happy\n";

    #[test]
    fn reads_csv_and_ignores_extra_columns() {
        let records = read_csv_messages(CSV_LOG.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].conversation_id, ConversationId::Num(10));
        assert_eq!(records[1].message, "Rust is fast, really fast.");
        let grouped = group_conversations(records);
        assert_eq!(
            grouped[&ConversationId::Num(10)],
            "Cats are great. Dogs are great too."
        );
    }

    #[test]
    fn malformed_csv_row_reports_line_number() {
        let err = read_csv_messages("conversation_id,message\n1,ok\n2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, BatchError::Csv { line: 3, .. }));
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(InputFormat::from_path(Path::new("a.csv")), InputFormat::Csv);
        assert_eq!(InputFormat::from_path(Path::new("a.JSONL")), InputFormat::JsonLines);
        assert_eq!(InputFormat::from_path(Path::new("a")), InputFormat::Csv);
        assert_eq!(ConversationId::from("abc".to_string()), ConversationId::Text("abc".into()));
    }

    #[test]
    fn groups_messages_in_id_order() {
        let records = read_jsonl_messages(LOG.as_bytes()).unwrap();
        assert_eq!(records.len(), 4);
        let grouped = group_conversations(records);
        let ids: Vec<String> = grouped.keys().map(ToString::to_string).collect();
        assert_eq!(ids, vec!["2", "10", "abc"]);
        assert_eq!(
            grouped[&ConversationId::Num(10)],
            "Cats are great. Dogs are great too."
        );
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let err = read_jsonl_messages("{\"conversation_id\": 1, \"message\": \"ok\"}\nnot json\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, BatchError::Parse { line: 2, .. }));
    }

    #[test]
    fn empty_conversation_keeps_original_text() {
        let grouped = group_conversations(read_jsonl_messages(LOG.as_bytes()).unwrap());
        let cfg = SummaryConfig {
            num_sentences: Some(1),
            ratio: None,
        };
        let out = summarize_conversations(&summarizer(), grouped, &cfg).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out[1].summary, "Cats are great.");
        assert_eq!(out[2].summary, "");
    }

    #[test]
    fn report_format_matches_conversation_blocks() {
        let summaries = vec![ConversationSummary {
            conversation_id: ConversationId::Num(7),
            summary: "Short.".into(),
            degradations: Vec::new(),
        }];
        let mut buf = Vec::new();
        write_report(&mut buf, &summaries).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Conversation 7:\nShort.\n\n");
    }

    #[test]
    fn run_writes_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("messages.jsonl");
        let output = dir.path().join("out/summaries.txt");
        std::fs::write(&input, LOG).unwrap();
        let n = run(&summarizer(), &input, &output, &SummaryConfig::default()).unwrap();
        assert_eq!(n, 3);
        let report = std::fs::read_to_string(&output).unwrap();
        assert!(report.starts_with("Conversation 2:\nRust is fast.\n\n"));

        let input = dir.path().join("messages.csv");
        std::fs::write(&input, CSV_LOG).unwrap();
        let n = run(&summarizer(), &input, &output, &SummaryConfig::default()).unwrap();
        assert_eq!(n, 2);
        let report = std::fs::read_to_string(&output).unwrap();
        assert!(report.starts_with("Conversation 2:\nRust is fast, really fast.\n\n"));
    }
}
