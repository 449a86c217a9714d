//! Workout routine suggestions from a hosted text-generation model.
//!
//! [`RoutineAdvisor::generate`] reports every failure as a
//! [`GenerationError`]; [`RoutineAdvisor::request_routine`] turns those into
//! a displayable fallback message so callers always get text back.

use crate::config::GeneratorConfig;
use crate::errors::GenerationError;
use serde_json::{Value, json};
use tracing::{info, warn};

pub const FALLBACK_EMPTY: &str = "The routine could not be generated. Please try again.";
pub const FALLBACK_UNAVAILABLE: &str =
    "Could not reach the routine assistant. Make sure a valid API key is configured.";

#[derive(Debug, Clone)]
pub struct RoutineRequest {
    pub profile_level: String,
    pub goal: String,
    pub days_per_week: u8,
    pub limitations: String,
}

pub fn build_prompt(gym_name: &str, request: &RoutineRequest) -> String {
    let limitations = match request.limitations.trim() {
        "" => "None",
        text => text,
    };

    format!(
        "Act as an expert personal trainer at \"{gym_name}\".\n\
         Create a detailed workout routine for a client with this profile:\n\
         \n\
         - Profile/level: {level}\n\
         - Goal: {goal}\n\
         - Frequency: {days} days per week\n\
         - Injuries/limitations: {limitations}\n\
         \n\
         Expected output format:\n\
         Answer in clean Markdown.\n\
         Include one table per training day with the columns: Exercise, Sets, Reps, Rest.\n\
         Finish with brief nutrition recommendations.\n",
        level = request.profile_level,
        goal = request.goal,
        days = request.days_per_week,
    )
}

#[derive(Debug, Clone)]
pub struct RoutineAdvisor {
    client: reqwest::Client,
    gym_name: String,
    config: GeneratorConfig,
}

impl RoutineAdvisor {
    pub fn new(gym_name: impl Into<String>, config: GeneratorConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            gym_name: gym_name.into(),
            config,
        }
    }

    pub async fn generate(&self, request: &RoutineRequest) -> Result<String, GenerationError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredentials)?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": build_prompt(&self.gym_name, request) }] }]
        });

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GenerationError::Status(response.status()));
        }

        let payload: Value = response.json().await?;
        let text = extract_text(&payload).ok_or(GenerationError::EmptyResponse)?;
        info!(model = %self.config.model, chars = text.len(), "routine generated");
        Ok(text)
    }

    /// Never fails: errors are logged and replaced by a fallback message.
    pub async fn request_routine(&self, request: &RoutineRequest) -> String {
        match self.generate(request).await {
            Ok(text) => text,
            Err(GenerationError::EmptyResponse) => {
                warn!("routine generator returned no text");
                FALLBACK_EMPTY.to_string()
            }
            Err(err) => {
                warn!(error = %err, "routine generation failed");
                FALLBACK_UNAVAILABLE.to_string()
            }
        }
    }
}

fn extract_text(payload: &Value) -> Option<String> {
    let parts = payload["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect();

    (!text.trim().is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, routing::post};

    fn request() -> RoutineRequest {
        RoutineRequest {
            profile_level: "Intermediate".to_string(),
            goal: "Lose weight and tone up".to_string(),
            days_per_week: 3,
            limitations: " ".to_string(),
        }
    }

    fn config(api_key: Option<&str>, base_url: &str) -> GeneratorConfig {
        GeneratorConfig {
            api_key: api_key.map(str::to_string),
            base_url: base_url.to_string(),
            model: "gemini-2.5-flash".to_string(),
        }
    }

    async fn serve_fixed(reply: Value) -> String {
        let app = Router::new().route(
            "/v1beta/models/:action",
            post(move || {
                let reply = reply.clone();
                async move { Json(reply) }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn prompt_carries_profile_and_defaults_limitations() {
        let prompt = build_prompt("Cross-X", &request());
        assert!(prompt.contains("\"Cross-X\""));
        assert!(prompt.contains("Profile/level: Intermediate"));
        assert!(prompt.contains("Goal: Lose weight and tone up"));
        assert!(prompt.contains("Frequency: 3 days per week"));
        assert!(prompt.contains("Injuries/limitations: None"));
        assert!(prompt.contains("Exercise, Sets, Reps, Rest"));
    }

    #[test]
    fn extract_joins_text_parts() {
        let payload = json!({
            "candidates": [{ "content": { "parts": [{ "text": "## Day 1\n" }, { "text": "| Squat |" }] } }]
        });
        assert_eq!(extract_text(&payload).as_deref(), Some("## Day 1\n| Squat |"));
        assert_eq!(extract_text(&json!({ "candidates": [] })), None);
    }

    #[tokio::test]
    async fn missing_key_falls_back() {
        let advisor = RoutineAdvisor::new("Cross-X", config(None, "http://127.0.0.1:1"));

        let err = advisor.generate(&request()).await.unwrap_err();
        assert!(matches!(err, GenerationError::MissingCredentials));
        assert_eq!(advisor.request_routine(&request()).await, FALLBACK_UNAVAILABLE);
    }

    #[tokio::test]
    async fn unreachable_service_falls_back() {
        let advisor = RoutineAdvisor::new("Cross-X", config(Some("key"), "http://127.0.0.1:1"));

        let text = advisor.request_routine(&request()).await;
        assert!(!text.is_empty());
        assert_eq!(text, FALLBACK_UNAVAILABLE);
    }

    #[tokio::test]
    async fn generated_text_is_returned() {
        let base_url = serve_fixed(json!({
            "candidates": [{ "content": { "parts": [{ "text": "## Day 1" }] } }]
        }))
        .await;
        let advisor = RoutineAdvisor::new("Cross-X", config(Some("key"), &base_url));

        assert_eq!(advisor.generate(&request()).await.unwrap(), "## Day 1");
    }

    #[tokio::test]
    async fn empty_answer_falls_back() {
        let base_url = serve_fixed(json!({ "candidates": [] })).await;
        let advisor = RoutineAdvisor::new("Cross-X", config(Some("key"), &base_url));

        let err = advisor.generate(&request()).await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));
        assert_eq!(advisor.request_routine(&request()).await, FALLBACK_EMPTY);
    }
}
