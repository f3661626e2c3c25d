//! Codex CLI output handling.
//!
//! In quiet mode codex prints one JSON event per line. Assistant replies are
//! `message` events whose content items carry `output_text`.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CodexEvent {
    #[serde(rename = "type")]
    kind: Option<String>,
    role: Option<String>,
    status: Option<String>,
    #[serde(default)]
    content: Vec<serde_json::Value>,
}

impl CodexEvent {
    fn is_completed_assistant_message(&self) -> bool {
        self.kind.as_deref() == Some("message")
            && self.role.as_deref() == Some("assistant")
            && self.status.as_deref() == Some("completed")
    }

    fn output_texts(&self) -> impl Iterator<Item = &str> {
        self.content.iter().filter_map(|item| {
            if item.get("type")?.as_str()? == "output_text" {
                item.get("text")?.as_str()
            } else {
                None
            }
        })
    }
}

/// Extract the assistant's reply text from raw codex stdout.
///
/// Completed assistant messages contribute their `output_text` items; plain
/// lines that do not look like JSON are kept as they are. When nothing is
/// collected the trimmed raw output is returned unchanged.
pub fn extract_reply(raw: &str) -> String {
    let mut replies = Vec::new();

    for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match serde_json::from_str::<CodexEvent>(line) {
            Ok(event) => {
                if event.is_completed_assistant_message() {
                    replies.extend(event.output_texts().map(|t| t.trim().to_string()));
                }
            }
            Err(_) => {
                if !line.starts_with('{') && !line.starts_with('[') {
                    replies.push(line.to_string());
                }
            }
        }
    }

    if replies.is_empty() {
        return raw.trim().to_string();
    }

    replies.join("\n")
}
