use crate::pipeline::error::PipelineError;
use crate::pipeline::types::{PipelineEvent, RunPhase, StagedFile};
use reqwest::multipart;
use serde::Serialize;
use serde_json::Value;
use std::sync::mpsc::Sender;
use std::time::Duration;

/// Accepted keys for the extracted text, in priority order. Compatibility
/// shim for varying OCR backend response shapes.
const TEXT_FIELDS: [&str; 4] = ["text", "extractedText", "result", "parsedText"];

const PLAIN_BODY_LIMIT: usize = 400;
const JSON_BODY_LIMIT: usize = 900;

/// Large scans can take a while upstream; the intake warning promises up to
/// three minutes, so leave headroom beyond that.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
}

/// Runs the two-stage pipeline: one OCR call per staged file, strictly in
/// order, then a single analyze call on the combined text. Any failure
/// aborts the whole run; there are no retries and no partial results.
pub struct PipelineRunner {
    base_url: String,
    client: reqwest::Client,
}

impl PipelineRunner {
    pub fn new(base_url: String) -> Result<Self, PipelineError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub async fn run(
        &self,
        files: &[StagedFile],
        events: &Sender<PipelineEvent>,
    ) -> Result<String, PipelineError> {
        let total = files.len();
        let mut extracted: Vec<(String, String)> = Vec::with_capacity(total);

        for (idx, file) in files.iter().enumerate() {
            let _ = events.send(PipelineEvent::Phase(RunPhase::ExtractingText {
                current: idx + 1,
                total,
            }));
            println!("OCR {}/{}: {}", idx + 1, total, file.name);
            let text = self.ocr_file(file).await?;
            extracted.push((file.name.clone(), text));
        }

        let combined = combine_documents(
            extracted
                .iter()
                .map(|(name, text)| (name.as_str(), text.as_str())),
        );

        let _ = events.send(PipelineEvent::Phase(RunPhase::Structuring));
        println!("Submitting {} characters for analysis", combined.len());
        self.analyze(&combined).await
    }

    async fn ocr_file(&self, file: &StagedFile) -> Result<String, PipelineError> {
        let part = multipart::Part::bytes(file.data.clone()).file_name(file.name.clone());
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/api/ocr", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(PipelineError::Upstream {
                stage: "OCR",
                status: status.as_u16(),
                detail: render_error_body(&body),
            });
        }

        let value: Value =
            serde_json::from_str(&body).map_err(|e| PipelineError::InvalidJson {
                stage: "OCR",
                source: e,
            })?;

        extract_text_field(&value).ok_or_else(|| PipelineError::EmptyResult {
            file: file.name.clone(),
        })
    }

    async fn analyze(&self, text: &str) -> Result<String, PipelineError> {
        let response = self
            .client
            .post(format!("{}/api/analyze", self.base_url))
            .json(&AnalyzeRequest { text })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(PipelineError::Upstream {
                stage: "Analysis",
                status: status.as_u16(),
                detail: render_error_body(&body),
            });
        }

        let value: Value =
            serde_json::from_str(&body).map_err(|e| PipelineError::InvalidJson {
                stage: "Analysis",
                source: e,
            })?;

        Ok(report_from_value(&value))
    }
}

/// First present, non-empty text field wins.
pub(crate) fn extract_text_field(value: &Value) -> Option<String> {
    TEXT_FIELDS.iter().find_map(|key| {
        value
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    })
}

/// One labeled block per document, blocks separated by a blank line, in
/// submission order.
pub(crate) fn combine_documents<'a, I>(docs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    docs.into_iter()
        .map(|(name, text)| format!("Document: {}\n\n{}\n", name, text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The `report` field if the backend sent one, otherwise the whole response
/// pretty-printed.
pub(crate) fn report_from_value(value: &Value) -> String {
    value
        .get("report")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        })
}

/// Renders an upstream error body for display: JSON bodies are
/// pretty-printed and capped at 900 chars, plain text at 400.
pub(crate) fn render_error_body(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => {
            let pretty =
                serde_json::to_string_pretty(&value).unwrap_or_else(|_| body.to_string());
            truncate_chars(&pretty, JSON_BODY_LIMIT)
        }
        Err(_) => truncate_chars(body, PLAIN_BODY_LIMIT),
    }
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max_chars).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn combined_text_uses_exact_block_format() {
        let combined = combine_documents([("A", "foo"), ("B", "bar")]);
        assert_eq!(combined, "Document: A\n\nfoo\n\n\nDocument: B\n\nbar\n");
    }

    #[test]
    fn single_document_block() {
        assert_eq!(
            combine_documents([("scan.pdf", "hello")]),
            "Document: scan.pdf\n\nhello\n"
        );
    }

    #[test]
    fn text_field_fallback_order() {
        assert_eq!(
            extract_text_field(&json!({"text": "primary", "result": "other"})),
            Some("primary".to_string())
        );
        assert_eq!(
            extract_text_field(&json!({"extractedText": "alt"})),
            Some("alt".to_string())
        );
        // Empty primary falls through to the next key.
        assert_eq!(
            extract_text_field(&json!({"text": "", "parsedText": "last"})),
            Some("last".to_string())
        );
        assert_eq!(extract_text_field(&json!({"text": "   "})), None);
        assert_eq!(extract_text_field(&json!({"pages": 3})), None);
    }

    #[test]
    fn report_field_is_used_verbatim() {
        assert_eq!(
            report_from_value(&json!({"report": "Patient summary..."})),
            "Patient summary..."
        );
    }

    #[test]
    fn missing_report_pretty_prints_response() {
        let rendered = report_from_value(&json!({"sections": ["a", "b"]}));
        assert!(rendered.contains("\"sections\""));
        assert!(rendered.contains('\n'));
    }

    #[test]
    fn json_error_body_is_pretty_printed() {
        let rendered = render_error_body("{\"message\":\"bad scan\"}");
        assert!(rendered.contains("\"message\": \"bad scan\""));
    }

    #[test]
    fn long_json_error_body_is_capped() {
        let body = serde_json::to_string(&json!({"detail": "x".repeat(2000)})).unwrap();
        let rendered = render_error_body(&body);
        assert!(rendered.chars().count() <= JSON_BODY_LIMIT + 1);
        assert!(rendered.ends_with('…'));
    }

    #[test]
    fn long_plain_error_body_is_capped() {
        let rendered = render_error_body(&"e".repeat(1000));
        assert!(rendered.chars().count() <= PLAIN_BODY_LIMIT + 1);
        assert!(rendered.ends_with('…'));
    }

    #[test]
    fn short_plain_error_body_passes_through() {
        assert_eq!(render_error_body("gateway timeout"), "gateway timeout");
    }

    #[test]
    fn runner_strips_trailing_slash_from_base() {
        let runner = PipelineRunner::new("http://localhost:8080/".to_string()).unwrap();
        assert_eq!(runner.base_url, "http://localhost:8080");
    }

    #[test]
    fn upstream_error_message_embeds_status_and_detail() {
        let err = PipelineError::Upstream {
            stage: "OCR",
            status: 500,
            detail: render_error_body("{\"message\":\"bad scan\"}"),
        };
        let msg = err.to_string();
        assert!(msg.contains("OCR"));
        assert!(msg.contains("500"));
        assert!(msg.contains("bad scan"));
    }
}
