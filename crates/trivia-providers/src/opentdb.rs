//! Open Trivia DB question source.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use trivia_core::error::SourceError;
use trivia_core::model::{Difficulty, Question, QuestionQuery};
use trivia_core::traits::QuestionProvider;

pub const DEFAULT_BASE_URL: &str = "https://opentdb.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Human-readable message for a non-zero API response code.
pub fn response_code_message(code: u8) -> &'static str {
    match code {
        1 => "No results found. Try different settings.",
        2 => "Invalid parameter. Please check your settings.",
        3 => "Token not found.",
        4 => "Token empty.",
        5 => "Rate limit exceeded. Please wait.",
        _ => "Unknown error occurred.",
    }
}

/// Client for `GET {base_url}/api.php`.
pub struct OpenTdbProvider {
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl OpenTdbProvider {
    pub fn new(base_url: Option<String>, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("failed to build HTTP client with timeout: {e}");
                reqwest::Client::new()
            });

        Self {
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout_secs,
            client,
        }
    }

    /// Request URL for a query. `type=multiple` is always sent.
    pub fn request_url(&self, query: &QuestionQuery) -> Result<reqwest::Url, SourceError> {
        let query = query.normalized();
        let mut params = vec![
            ("amount", query.amount.to_string()),
            ("type", "multiple".to_string()),
        ];
        if let Some(category) = &query.category {
            params.push(("category", category.clone()));
        }
        if let Some(difficulty) = query.difficulty {
            params.push(("difficulty", difficulty.to_string()));
        }

        reqwest::Url::parse_with_params(&format!("{}/api.php", self.base_url), &params)
            .map_err(|e| SourceError::Decode(format!("invalid base URL {}: {e}", self.base_url)))
    }
}

#[derive(Deserialize)]
struct ApiResponse {
    response_code: u8,
    #[serde(default)]
    results: Vec<ApiQuestion>,
}

#[derive(Deserialize)]
struct ApiQuestion {
    question: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
    category: String,
    difficulty: Difficulty,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

impl From<ApiQuestion> for Question {
    fn from(q: ApiQuestion) -> Self {
        Question {
            prompt: q.question,
            correct_answer: q.correct_answer,
            incorrect_answers: q.incorrect_answers,
            category: q.category,
            difficulty: q.difficulty,
        }
    }
}

#[async_trait]
impl QuestionProvider for OpenTdbProvider {
    fn name(&self) -> &str {
        "opentdb"
    }

    #[instrument(skip(self), fields(amount = query.amount))]
    async fn fetch(&self, query: &QuestionQuery) -> anyhow::Result<Vec<Question>> {
        let url = self.request_url(query)?;

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(self.timeout_secs)
            } else {
                SourceError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::HttpStatus {
                status: status.as_u16(),
                message: body,
            }
            .into());
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))?;

        if api_response.response_code != 0 {
            let code = api_response.response_code;
            return Err(SourceError::ResponseCode {
                code,
                message: response_code_message(code).to_string(),
            }
            .into());
        }

        let questions: Vec<Question> = api_response
            .results
            .into_iter()
            .filter(|q| q.kind.as_deref().map_or(true, |k| k == "multiple"))
            .map(Question::from)
            .collect();

        tracing::debug!(count = questions.len(), "fetched questions");
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api_question(question: &str, correct: &str) -> serde_json::Value {
        serde_json::json!({
            "type": "multiple",
            "difficulty": "easy",
            "category": "Science &amp; Nature",
            "question": question,
            "correct_answer": correct,
            "incorrect_answers": ["a", "b", "c"]
        })
    }

    #[tokio::test]
    async fn successful_fetch() {
        let server = MockServer::start().await;

        let body = serde_json::json!({
            "response_code": 0,
            "results": [
                api_question("What is H&#039;2O?", "Water"),
                api_question("Closest star?", "The Sun")
            ]
        });

        Mock::given(method("GET"))
            .and(path("/api.php"))
            .and(query_param("amount", "2"))
            .and(query_param("type", "multiple"))
            .and(query_param("category", "17"))
            .and(query_param("difficulty", "easy"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OpenTdbProvider::new(Some(server.uri()), 5);
        let query = QuestionQuery {
            category: Some("17".into()),
            difficulty: Some(Difficulty::Easy),
            amount: 2,
        };

        let questions = provider.fetch(&query).await.unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].correct_answer, "Water");
        // Entities are kept raw; decoding happens at presentation.
        assert_eq!(questions[0].category, "Science &amp; Nature");
        assert_eq!(questions[1].difficulty, Difficulty::Easy);
    }

    #[tokio::test]
    async fn non_zero_response_code_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api.php"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"response_code": 1, "results": []})),
            )
            .mount(&server)
            .await;

        let provider = OpenTdbProvider::new(Some(server.uri()), 5);
        let err = provider.fetch(&QuestionQuery::default()).await.unwrap_err();
        let source = err.downcast_ref::<SourceError>().unwrap();
        assert!(source.is_api_failure());
        assert!(err.to_string().contains("No results found"));
    }

    #[tokio::test]
    async fn http_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api.php"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let provider = OpenTdbProvider::new(Some(server.uri()), 5);
        let err = provider.fetch(&QuestionQuery::default()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SourceError>(),
            Some(SourceError::HttpStatus { status: 503, .. })
        ));
    }

    #[test]
    fn request_url_omits_unset_filters() {
        let provider = OpenTdbProvider::new(Some("http://localhost:1/".into()), 5);
        let url = provider
            .request_url(&QuestionQuery {
                category: Some(String::new()),
                difficulty: None,
                amount: 7,
            })
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:1/api.php?amount=7&type=multiple");
    }

    #[test]
    fn response_code_messages() {
        assert_eq!(response_code_message(5), "Rate limit exceeded. Please wait.");
        assert_eq!(response_code_message(42), "Unknown error occurred.");
    }
}
