use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::{json, Value};

use crate::core::config::Settings;
use crate::db::types::QuestionKind;

const GENERATOR_SYSTEM_PROMPT: &str = "You are an expert quiz generator. \
Create questions that test understanding of the document content.";

const FALLBACK_MCQ_OPTIONS: &[&str] = &[
    "Technology and innovation",
    "Business management",
    "Scientific research",
    "Historical events",
];
const FALLBACK_MCQ_CORRECT: &str = "Technology and innovation";
const FALLBACK_SHORT_ANSWER: &str = "The document discusses various topics including \
technology, innovation, and their applications in modern society.";

/// Most questions the fallback will derive from one document: up to ten MCQs
/// followed by up to three short-answer questions.
const FALLBACK_MAX_QUESTIONS: usize = 13;
const FALLBACK_MAX_MCQ: usize = 10;

#[derive(Debug, Clone)]
pub(crate) struct GeneratedQuestion {
    pub(crate) question_text: String,
    pub(crate) question_type: QuestionKind,
    pub(crate) options: Option<Vec<String>>,
    pub(crate) correct_answer: String,
    pub(crate) hint: String,
    pub(crate) citation: String,
    pub(crate) points: i64,
}

#[derive(Debug, Clone)]
pub(crate) struct QuestionGenService {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl QuestionGenService {
    pub(crate) fn from_settings(settings: &Settings) -> Result<Self> {
        let timeout = Duration::from_secs(settings.ai().ai_request_timeout);
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key: settings.ai().openai_api_key.clone(),
            base_url: settings.ai().openai_base_url.trim_end_matches('/').to_string(),
            model: settings.ai().ai_model.clone(),
            max_tokens: settings.ai().ai_max_tokens,
            temperature: settings.ai().ai_temperature,
        })
    }

    /// Generates the question list for a document. LLM failures of any kind
    /// (transport, timeout, unparsable output, schema violations) are
    /// swallowed here and replaced by the deterministic fallback, so this
    /// never errors. A well-formed LLM reply with zero questions is returned
    /// as-is; rejecting an empty quiz is the caller's decision.
    pub(crate) async fn generate(&self, text: &str) -> Vec<GeneratedQuestion> {
        match self.request_questions(text).await {
            Ok(questions) => questions,
            Err(err) => {
                tracing::warn!(error = %err, "LLM question generation failed; using fallback");
                generate_fallback(text)
            }
        }
    }

    async fn request_questions(&self, text: &str) -> Result<Vec<GeneratedQuestion>> {
        let payload = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": GENERATOR_SYSTEM_PROMPT},
                {"role": "user", "content": build_prompt(text)}
            ],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });

        // Single attempt on purpose: the deterministic fallback already
        // guarantees forward progress, so a retry loop buys nothing.
        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .context("Failed to call chat completion API")?;

        let status = response.status();
        let body: Value = response.json().await.context("Failed to read API response body")?;
        if !status.is_success() {
            anyhow::bail!("chat completion API error ({status}): {body}");
        }

        let content = body
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|value| value.as_str())
            .context("Missing chat completion content")?;

        parse_questions(content)
    }
}

fn build_prompt(text: &str) -> String {
    format!(
        r#"Based on the following document content, generate a comprehensive quiz with:
- At least 10 multiple choice questions (MCQs)
- At least 3 short answer questions
- Each question must include a citation (page and line reference)
- Each question must have a helpful hint that doesn't reveal the answer

Document content:
{text}

Generate the questions in the following JSON format:
{{
    "questions": [
        {{
            "question_text": "Question text here",
            "question_type": "mcq",
            "options": ["Option A", "Option B", "Option C", "Option D"],
            "correct_answer": "Correct option text",
            "hint": "Helpful hint that doesn't reveal the answer",
            "citation": "Page X, Lines Y-Z"
        }},
        {{
            "question_text": "Short answer question here",
            "question_type": "short_answer",
            "correct_answer": "Expected answer text",
            "hint": "Helpful hint that doesn't reveal the answer",
            "citation": "Page X, Lines Y-Z"
        }}
    ]
}}"#
    )
}

/// Parses the model's free-text reply: everything between the first `{` and
/// the last `}` is treated as the JSON document, then each entry is checked
/// against the per-kind schema. Any violation fails the whole batch so the
/// caller falls back.
fn parse_questions(raw: &str) -> Result<Vec<GeneratedQuestion>> {
    let start = raw.find('{').context("No JSON object in model output")?;
    let end = raw.rfind('}').context("No JSON object in model output")?;
    anyhow::ensure!(start < end, "No JSON object in model output");

    let document: Value =
        serde_json::from_str(&raw[start..=end]).context("Model output is not valid JSON")?;

    let entries = document
        .get("questions")
        .and_then(|value| value.as_array())
        .context("Model output has no questions array")?;

    entries.iter().map(validate_question).collect()
}

fn validate_question(entry: &Value) -> Result<GeneratedQuestion> {
    let question_text = require_string(entry, "question_text")?;
    let correct_answer = require_string(entry, "correct_answer")?;
    let hint = require_string(entry, "hint")?;
    let citation = require_string(entry, "citation")?;

    let kind = match require_string(entry, "question_type")?.as_str() {
        "mcq" => QuestionKind::Mcq,
        "short_answer" => QuestionKind::ShortAnswer,
        other => anyhow::bail!("Unknown question_type: {other}"),
    };

    let options = match kind {
        QuestionKind::Mcq => {
            let raw_options = entry
                .get("options")
                .and_then(|value| value.as_array())
                .context("MCQ question is missing options")?;
            let options: Vec<String> = raw_options
                .iter()
                .map(|option| {
                    option
                        .as_str()
                        .map(str::to_string)
                        .context("MCQ option is not a string")
                })
                .collect::<Result<_>>()?;
            anyhow::ensure!(!options.is_empty(), "MCQ question has an empty options list");
            Some(options)
        }
        QuestionKind::ShortAnswer => None,
    };

    Ok(GeneratedQuestion {
        question_text,
        question_type: kind,
        options,
        correct_answer,
        hint,
        citation,
        points: 1,
    })
}

fn require_string(entry: &Value, field: &'static str) -> Result<String> {
    entry
        .get(field)
        .and_then(|value| value.as_str())
        .map(str::to_string)
        .with_context(|| format!("Question is missing field {field}"))
}

/// Deterministic question set derived from the document text alone, used
/// whenever the LLM path is unavailable or produced unusable output. Splits
/// on blank lines and templates one question per paragraph.
pub(crate) fn generate_fallback(text: &str) -> Vec<GeneratedQuestion> {
    let paragraphs: Vec<&str> =
        text.split("\n\n").map(str::trim).filter(|paragraph| !paragraph.is_empty()).collect();

    paragraphs
        .iter()
        .take(FALLBACK_MAX_QUESTIONS)
        .enumerate()
        .map(|(index, _)| {
            if index < FALLBACK_MAX_MCQ {
                GeneratedQuestion {
                    question_text: "What is the main topic discussed in this document?"
                        .to_string(),
                    question_type: QuestionKind::Mcq,
                    options: Some(
                        FALLBACK_MCQ_OPTIONS.iter().map(|option| option.to_string()).collect(),
                    ),
                    correct_answer: FALLBACK_MCQ_CORRECT.to_string(),
                    hint: "Look at the overall theme and main concepts discussed".to_string(),
                    citation: "Page 1, Lines 1-10".to_string(),
                    points: 1,
                }
            } else {
                GeneratedQuestion {
                    question_text:
                        "Summarize the key points from this document in 2-3 sentences."
                            .to_string(),
                    question_type: QuestionKind::ShortAnswer,
                    options: None,
                    correct_answer: FALLBACK_SHORT_ANSWER.to_string(),
                    hint: "Focus on the main themes and important concepts mentioned".to_string(),
                    citation: "Page 1, Lines 1-20".to_string(),
                    points: 1,
                }
            }
        })
        .collect()
}
