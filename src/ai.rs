use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use std::env;

use fanscore::{AnalysisError, Platform};

#[derive(Clone)]
pub struct AiValidator {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiValidation {
    pub is_valid: bool,
    pub confidence: f64,
    pub reason: Option<String>,
}

impl AiValidator {
    pub fn from_env(model_override: Option<String>) -> Option<Self> {
        let api_key = env::var("OPENAI_API_KEY").ok()?;
        let api_base =
            env::var("OPENAI_API_BASE").unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let model = model_override
            .or_else(|| env::var("OPENAI_MODEL").ok())
            .unwrap_or_else(|| "gpt-4o-mini".to_string());
        Some(Self {
            client: reqwest::Client::new(),
            api_key,
            api_base,
            model,
        })
    }

    /// Asks the model whether a profile is plausible for the platform and
    /// relevant to the user's interests. The response content must be a bare
    /// JSON object; anything else fails closed as `MalformedResponse` and the
    /// caller drops to [`fallback_validation`].
    pub async fn validate_profile(
        &self,
        platform: Platform,
        username: &str,
        profile_url: &str,
        interests: &[String],
    ) -> Result<AiValidation, AnalysisError> {
        let url = format!("{}/chat/completions", self.api_base.trim_end_matches('/'));
        let request = ChatRequest {
            model: self.model.clone(),
            temperature: 0.2,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: format!(
                        "Platform: {}\nUsername: {}\nProfile URL: {}\nUser interests: {}",
                        platform.label(),
                        username,
                        profile_url,
                        interests.join(", ")
                    ),
                },
            ],
        };

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|err| AnalysisError::UpstreamFetch(format!("OpenAI request failed: {}", err)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AnalysisError::UpstreamFetch(format!(
                "OpenAI API error: {} {}",
                status,
                detail.trim()
            )));
        }

        let body: ChatResponse = response.json().await.map_err(|err| {
            AnalysisError::MalformedResponse(format!("OpenAI response parse failed: {}", err))
        })?;

        let content = body
            .choices
            .first()
            .ok_or_else(|| {
                AnalysisError::MalformedResponse("OpenAI response missing choices".to_string())
            })?
            .message
            .content
            .trim()
            .to_string();

        parse_validation(&content)
    }
}

/// Strict parse of the model content. The content must be a bare JSON
/// object; markdown fences or prose fail closed as `MalformedResponse`.
fn parse_validation(content: &str) -> Result<AiValidation, AnalysisError> {
    let mut validation: AiValidation = serde_json::from_str(content.trim()).map_err(|err| {
        AnalysisError::MalformedResponse(format!("OpenAI validation JSON invalid: {}", err))
    })?;
    validation.confidence = validation.confidence.clamp(0.0, 1.0);
    Ok(validation)
}

/// Offline fallback when the model call fails: each platform maps to the
/// games it is known for, and the profile is accepted when the user's stated
/// interests overlap them.
pub fn fallback_validation(platform: Platform, interests: &[String]) -> AiValidation {
    let relevant_games = platform_games(platform);
    let overlaps = relevant_games.iter().any(|game| {
        interests
            .iter()
            .any(|interest| interest.eq_ignore_ascii_case(game))
    });

    if interests.is_empty() || relevant_games.is_empty() || overlaps {
        AiValidation {
            is_valid: true,
            confidence: 0.6,
            reason: Some("Validação básica aplicada devido a erro na IA".to_string()),
        }
    } else {
        AiValidation {
            is_valid: false,
            confidence: 0.7,
            reason: Some(format!(
                "Esta plataforma é mais relacionada a {}, que não estão nos seus interesses.",
                relevant_games.join(", ")
            )),
        }
    }
}

fn platform_games(platform: Platform) -> &'static [&'static str] {
    match platform {
        Platform::Faceit | Platform::GamersClub => &["CS2"],
        Platform::Steam => &["CS2", "Rainbow Six"],
        Platform::Riot => &["Valorant", "League of Legends"],
        Platform::Twitter | Platform::Instagram | Platform::Twitch => &[],
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interests(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn fallback_accepts_overlapping_interests() {
        let validation = fallback_validation(Platform::Riot, &interests(&["Valorant"]));
        assert!(validation.is_valid);
        assert!((validation.confidence - 0.6).abs() < 1e-6);
    }

    #[test]
    fn fallback_rejects_disjoint_interests() {
        let validation = fallback_validation(Platform::Faceit, &interests(&["League of Legends"]));
        assert!(!validation.is_valid);
        assert!((validation.confidence - 0.7).abs() < 1e-6);
        let reason = validation.reason.expect("reason expected");
        assert!(reason.contains("CS2"));
    }

    #[test]
    fn fallback_accepts_empty_interests() {
        let validation = fallback_validation(Platform::Steam, &[]);
        assert!(validation.is_valid);
        assert!((validation.confidence - 0.6).abs() < 1e-6);
    }

    #[test]
    fn fallback_accepts_platforms_with_no_game_mapping() {
        let validation = fallback_validation(Platform::Twitch, &interests(&["Fortnite"]));
        assert!(validation.is_valid);
    }

    #[test]
    fn non_json_content_fails_closed() {
        let err = parse_validation("The profile looks valid to me.").unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));

        let fenced = "```json\n{\"is_valid\": true, \"confidence\": 0.9}\n```";
        assert!(parse_validation(fenced).is_err());
    }

    #[test]
    fn bare_json_object_parses_and_clamps_confidence() {
        let validation =
            parse_validation("{\"is_valid\": true, \"confidence\": 1.7, \"reason\": \"ok\"}")
                .unwrap();
        assert!(validation.is_valid);
        assert!((validation.confidence - 1.0).abs() < 1e-6);
    }
}

fn system_prompt() -> String {
    let prompt = r#"You are a strict JSON-only validator for gaming profiles.
Return a single JSON object with these fields:
- is_valid (boolean): the profile plausibly belongs to the stated platform
- confidence (0..1)
- reason (short string, optional)
Rules:
- Output JSON only, no markdown or commentary.
- Use decimals with a leading 0 (e.g., 0.42).
"#;
    prompt.to_string()
}
