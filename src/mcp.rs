use crate::batch::{self, MessageRecord};
use crate::health;
use crate::summarize::{SegmenterMode, StopwordSet, Summarizer, SummaryConfig};
use serde::Deserialize;
use serde_json::json;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Set once a client sends bare JSON lines; replies then switch to ND-JSON.
static RAW_JSON_MODE: AtomicBool = AtomicBool::new(false);

const STOPWORDS_URI: &str = "mcp://freqsum/stopwords";

pub struct StdioMcpServer {
    summarizer: Arc<dyn Summarizer>,
    stopwords: Arc<StopwordSet>,
    mode: SegmenterMode,
}

impl StdioMcpServer {
    pub fn new(
        summarizer: Arc<dyn Summarizer>,
        stopwords: Arc<StopwordSet>,
        mode: SegmenterMode,
    ) -> Self {
        Self {
            summarizer,
            stopwords,
            mode,
        }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        let mut reader = std::io::BufReader::new(stdin.lock());
        let mut writer = std::io::BufWriter::new(stdout.lock());
        tracing::info!("run loop started: waiting for framed MCP requests on stdin");
        loop {
            let msg = match read_framed_message_buf(&mut reader) {
                Ok(m) => m,
                Err(e) => {
                    tracing::debug!(error=?e, "stdin closed or invalid frame");
                    break;
                }
            };
            let req: serde_json::Value = match serde_json::from_slice(&msg) {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!(error=?e, "invalid JSON");
                    continue;
                }
            };

            let method = req.get("method").and_then(|m| m.as_str()).unwrap_or("");
            let id_opt = req.get("id").cloned();
            // Notifications carry no id and get no reply
            let Some(id) = id_opt.filter(|v| !v.is_null()) else {
                tracing::debug!(%method, "notification received");
                continue;
            };
            tracing::info!(%method, %id, "received request");
            let params = req.get("params").cloned().unwrap_or(json!({}));
            match method {
                "initialize" => {
                    let client_proto = params
                        .get("protocolVersion")
                        .and_then(|x| x.as_str())
                        .unwrap_or("2024-11-05");
                    let result = json!({
                        "protocolVersion": client_proto,
                        "capabilities": {
                            "tools": {"list": true, "call": true},
                            "prompts": {"list": true},
                            "resources": {"list": true, "read": true, "subscribe": false}
                        },
                        "serverInfo": server_info()
                    });
                    write_response(&mut writer, id, result)?;
                }
                "server/info" => {
                    write_response(&mut writer, id, json!({"serverInfo": server_info()}))?;
                }
                "tools/list" => {
                    write_response(&mut writer, id, json!({"tools": list_tools_schema()}))?;
                }
                "prompts/list" => {
                    write_response(&mut writer, id, json!({"prompts": []}))?;
                }
                "resources/list" => {
                    let resources = vec![json!({
                        "uri": STOPWORDS_URI,
                        "name": "Stopword set",
                        "description": "Size and load status of the active stopword list",
                        "mimeType": "application/json"
                    })];
                    write_response(&mut writer, id, json!({"resources": resources}))?;
                }
                "resources/read" => {
                    let uri = params.get("uri").and_then(|x| x.as_str()).unwrap_or("");
                    if uri != STOPWORDS_URI {
                        write_error(&mut writer, id, -32602, "Unknown resource uri")?;
                        continue;
                    }
                    let text = serde_json::to_string_pretty(&json!({
                        "words": self.stopwords.len(),
                        "degraded": self.stopwords.is_degraded(),
                    }))?;
                    let contents = vec![json!({
                        "uri": uri,
                        "mimeType": "application/json",
                        "text": text
                    })];
                    write_response(&mut writer, id, json!({"contents": contents}))?;
                }
                "tools/call" => {
                    let name = params.get("name").and_then(|x| x.as_str()).unwrap_or("");
                    let arguments = params.get("arguments").cloned().unwrap_or(json!({}));
                    match self.dispatch_tool(name, arguments).await {
                        Ok(v) => write_response(
                            &mut writer,
                            id,
                            json!({"content": [{"type":"json","json": v}], "isError": false}),
                        )?,
                        Err(e) => write_error(&mut writer, id, -32001, &format!("{e}"))?,
                    }
                }
                _ => write_error(&mut writer, id, -32601, "method not found")?,
            }
        }
        Ok(())
    }

    async fn dispatch_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> anyhow::Result<serde_json::Value> {
        match name {
            "summarize_text" => {
                let p: SummarizeText = serde_json::from_value(arguments)?;
                let summarizer = self.summarizer.clone();
                let res = tokio::task::spawn_blocking(move || {
                    summarizer.summarize(&p.text, &p.length)
                })
                .await??;
                Ok(serde_json::to_value(res)?)
            }
            "summarize_conversations" => {
                let p: SummarizeConversations = serde_json::from_value(arguments)?;
                let summarizer = self.summarizer.clone();
                let summaries = tokio::task::spawn_blocking(move || {
                    let grouped = batch::group_conversations(p.messages);
                    batch::summarize_conversations(summarizer.as_ref(), grouped, &p.length)
                })
                .await??;
                Ok(json!({"conversations": summaries}))
            }
            "health_check" => {
                let report = health::report(self.mode, &self.stopwords);
                Ok(json!({
                    "health": report,
                    "server": server_info()
                }))
            }
            _ => anyhow::bail!("unknown tool: {name}"),
        }
    }
}

fn server_info() -> serde_json::Value {
    json!({"name": "freqsum", "version": env!("CARGO_PKG_VERSION")})
}

fn list_tools_schema() -> Vec<serde_json::Value> {
    let num_sentences = json!({"type":"integer","minimum":1});
    let ratio = json!({"type":"number","exclusiveMinimum":0,"maximum":1});
    vec![
        json!({"name":"summarize_text","description":"Extractive summary of a text, sentences kept in original order","inputSchema":{"type":"object","required":["text"],"properties":{
            "text": {"type":"string"},
            "num_sentences": num_sentences.clone(),
            "ratio": ratio.clone()
        }}}),
        json!({"name":"summarize_conversations","description":"Group messages by conversation id and summarize each conversation","inputSchema":{"type":"object","required":["messages"],"properties":{
            "messages": {"type":"array","items":{"type":"object","required":["conversation_id","message"],"properties":{
                "conversation_id": {"type":["integer","string"]},
                "message": {"type":"string"}
            }}},
            "num_sentences": num_sentences,
            "ratio": ratio
        }}}),
        json!({"name":"health_check","description":"Segmenter and stopword status","inputSchema":{"type":"object","properties":{}}}),
    ]
}

fn read_framed_message_buf<R: std::io::BufRead>(bufreader: &mut R) -> anyhow::Result<Vec<u8>> {
    let mut header = String::new();
    let mut content_length: Option<usize> = None;
    let mut header_lines: usize = 0;
    loop {
        header.clear();
        let n = bufreader.read_line(&mut header)?;
        if n == 0 {
            anyhow::bail!("eof");
        }
        let line = header.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            if header_lines == 0 {
                continue;
            }
            break;
        }
        header_lines += 1;
        tracing::trace!(%line, "framing header line");
        if header_lines == 1 && line.starts_with('{') {
            tracing::debug!("raw JSON line without Content-Length, accepting as body");
            RAW_JSON_MODE.store(true, Ordering::Relaxed);
            return Ok(line.as_bytes().to_vec());
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = Some(value.trim().parse::<usize>()?);
            }
        }
    }
    let len = content_length.ok_or_else(|| anyhow::anyhow!("missing Content-Length"))?;
    let mut body = vec![0u8; len];
    bufreader.read_exact(&mut body)?;
    tracing::trace!(header_lines, content_length = len, "framed message parsed");
    Ok(body)
}

fn write_response<W: Write>(
    writer: &mut W,
    id: serde_json::Value,
    result: serde_json::Value,
) -> anyhow::Result<()> {
    let resp = json!({"jsonrpc":"2.0","id": id, "result": result});
    write_framed(writer, &resp)
}

fn write_error<W: Write>(
    writer: &mut W,
    id: serde_json::Value,
    code: i64,
    message: &str,
) -> anyhow::Result<()> {
    let resp = json!({"jsonrpc":"2.0","id": id, "error": {"code": code, "message": message}});
    write_framed(writer, &resp)
}

fn write_framed<W: Write>(writer: &mut W, v: &serde_json::Value) -> anyhow::Result<()> {
    let s = serde_json::to_string(v)?;
    let force_ndjson = std::env::var("MCP_FORCE_NDJSON").ok().as_deref() == Some("1");
    if force_ndjson || RAW_JSON_MODE.load(Ordering::Relaxed) {
        writeln!(writer, "{s}")?;
    } else {
        write!(writer, "Content-Length: {}\r\n\r\n{}", s.len(), s)?;
    }
    writer.flush()?;
    Ok(())
}

// Wire structs for tool params
#[derive(Debug, Deserialize)]
struct SummarizeText {
    text: String,
    #[serde(flatten)]
    length: SummaryConfig,
}

#[derive(Debug, Deserialize)]
struct SummarizeConversations {
    messages: Vec<MessageRecord>,
    #[serde(flatten)]
    length: SummaryConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SummarizeError;
    use crate::summarize::{build_summarizer, SummarizeResult};

    struct DummySummarizer;
    impl Summarizer for DummySummarizer {
        fn summarize(
            &self,
            text: &str,
            config: &SummaryConfig,
        ) -> Result<SummarizeResult, SummarizeError> {
            Ok(SummarizeResult {
                summary: text.chars().take(8).collect(),
                sentences_total: 1,
                sentences_selected: config.num_sentences.unwrap_or(1),
                degradations: Vec::new(),
                backend: "dummy".into(),
            })
        }
    }

    fn server(summarizer: Arc<dyn Summarizer>) -> StdioMcpServer {
        StdioMcpServer::new(
            summarizer,
            Arc::new(StopwordSet::english()),
            SegmenterMode::Auto,
        )
    }

    #[test]
    fn framed_write_and_read_roundtrip() {
        let v = json!({"jsonrpc":"2.0","id":1,"result":{"ok":true}});
        let mut out = Vec::new();
        write_framed(&mut out, &v).expect("write");
        let mut bufreader = std::io::BufReader::new(std::io::Cursor::new(out));
        let body = read_framed_message_buf(&mut bufreader).expect("read");
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed, v);
    }

    #[tokio::test]
    async fn dispatch_summarize_text_passes_length_through() {
        let s = server(Arc::new(DummySummarizer));
        let res = s
            .dispatch_tool(
                "summarize_text",
                json!({"text": "abcdefghijk", "num_sentences": 4}),
            )
            .await
            .unwrap();
        assert_eq!(res["backend"], "dummy");
        assert_eq!(res["summary"], "abcdefgh");
        assert_eq!(res["sentences_selected"], 4);
    }

    #[tokio::test]
    async fn dispatch_summarize_text_surfaces_invalid_input() {
        let s = server(build_summarizer(
            SegmenterMode::Auto,
            Arc::new(StopwordSet::english()),
        ));
        let err = s
            .dispatch_tool("summarize_text", json!({"text": ""}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("invalid input"));
    }

    #[tokio::test]
    async fn dispatch_summarize_conversations_groups_by_id() {
        let s = server(build_summarizer(
            SegmenterMode::Auto,
            Arc::new(StopwordSet::english()),
        ));
        let res = s
            .dispatch_tool(
                "summarize_conversations",
                json!({
                    "num_sentences": 1,
                    "messages": [
                        {"conversation_id": 1, "message": "Cats are great."},
                        {"conversation_id": 1, "message": "Birds can fly high in the sky."},
                        {"conversation_id": "x", "message": "Rust is fast."}
                    ]
                }),
            )
            .await
            .unwrap();
        let convs = res["conversations"].as_array().unwrap();
        assert_eq!(convs.len(), 2);
        assert_eq!(convs[0]["conversation_id"], 1);
        assert_eq!(convs[0]["summary"], "Cats are great.");
        assert_eq!(convs[1]["conversation_id"], "x");
    }

    #[tokio::test]
    async fn dispatch_health_and_unknown_tool() {
        let s = server(Arc::new(DummySummarizer));
        let res = s.dispatch_tool("health_check", json!({})).await.unwrap();
        assert_eq!(res["server"]["name"], "freqsum");
        assert!(res["health"]["stopwords_ok"].as_bool().unwrap());
        assert!(s.dispatch_tool("nope", json!({})).await.is_err());
    }
}
