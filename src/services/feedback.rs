//! Feedback classification through the Gemini `generateContent` API

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::FeedbackError;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

pub const SENTIMENTS: [&str; 3] = ["positive", "negative", "neutral"];
pub const CATEGORIES: [&str; 5] = ["Bug Report", "Feature Request", "UI/UX", "Praise", "Other"];

/// Shown whenever classification fails; the feedback itself still counts as received
pub const FALLBACK_MESSAGE: &str =
    "Sorry, we couldn't analyze your feedback right now. It has been submitted.";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Structured classification of a piece of feedback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackAnalysis {
    pub sentiment: String,
    pub category: String,
    pub summary: String,
}

/// What the submitter gets back
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FeedbackOutcome {
    Analyzed { analysis: FeedbackAnalysis },
    Received { message: String },
}

impl FeedbackOutcome {
    pub fn received() -> Self {
        Self::Received {
            message: FALLBACK_MESSAGE.to_string(),
        }
    }
}

/// HTTP client for the classification model
#[derive(Debug, Clone)]
pub struct FeedbackClassifier {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl FeedbackClassifier {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    /// Ask the model to classify `feedback`. No retries.
    pub async fn classify(&self, feedback: &str) -> Result<FeedbackAnalysis, FeedbackError> {
        debug!("Classifying feedback with {}", self.model);

        let response: GenerateContentResponse = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(feedback))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let text = response.first_text().ok_or(FeedbackError::EmptyResponse)?;
        parse_analysis(text)
    }
}

fn request_body(feedback: &str) -> Value {
    json!({
        "contents": [{
            "parts": [{
                "text": format!(
                    "Analyze the following user feedback and provide a structured JSON response. Feedback: \"{}\"",
                    feedback
                ),
            }],
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "sentiment": {
                        "type": "STRING",
                        "description": "The overall sentiment of the feedback. Must be one of: positive, negative, neutral.",
                        "enum": SENTIMENTS,
                    },
                    "category": {
                        "type": "STRING",
                        "description": "The primary category of the feedback. Must be one of: Bug Report, Feature Request, UI/UX, Praise, Other.",
                        "enum": CATEGORIES,
                    },
                    "summary": {
                        "type": "STRING",
                        "description": "A brief, one-sentence summary of the user's feedback.",
                    },
                },
                "required": ["sentiment", "category", "summary"],
            },
        },
    })
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find_map(|part| part.text.as_deref())
    }
}

/// Parse the model's JSON answer, requiring all three fields to be present.
/// Field values are passed through as-is.
pub fn parse_analysis(raw: &str) -> Result<FeedbackAnalysis, FeedbackError> {
    #[derive(Deserialize)]
    struct Partial {
        sentiment: Option<String>,
        category: Option<String>,
        summary: Option<String>,
    }

    fn present(value: Option<String>, field: &'static str) -> Result<String, FeedbackError> {
        value
            .filter(|v| !v.trim().is_empty())
            .ok_or(FeedbackError::MissingField(field))
    }

    let partial: Partial = serde_json::from_str(raw.trim())?;
    Ok(FeedbackAnalysis {
        sentiment: present(partial.sentiment, "sentiment")?,
        category: present(partial.category, "category")?,
        summary: present(partial.summary, "summary")?,
    })
}
