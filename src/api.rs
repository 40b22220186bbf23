use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ai::AiValidation;
use fanscore::{
    stable_profile_id, AnalysisError, DocumentVerificationResult, EngagementMetrics, Platform,
    ProfileSignal, ScoreResult,
};

#[derive(Debug, Deserialize)]
pub struct ApiAnalyzeRequest {
    pub platform: String,
    pub profile_url: String,
    pub username: Option<String>,
    pub followed_teams: Option<Vec<String>>,
    pub interactions: Option<String>,
    pub favorite_games: Option<Vec<String>>,
    pub followers: Option<u64>,
    pub posts: Option<u64>,
    pub avg_likes: Option<f64>,
    pub avg_interactions: Option<f64>,
    pub account_age_days: Option<u32>,
    pub fetch_metrics: Option<bool>,
    pub use_ai: Option<bool>,
}

impl ApiAnalyzeRequest {
    pub fn into_signal(self) -> Result<(ProfileSignal, AnalyzeOptions), AnalysisError> {
        let platform = Platform::parse(&self.platform)?;
        platform.validate_url(&self.profile_url)?;

        let username = self
            .username
            .filter(|value| !value.trim().is_empty())
            .or_else(|| platform.extract_username(&self.profile_url))
            .ok_or_else(|| AnalysisError::InvalidProfileUrl {
                platform: platform.label().to_string(),
                expected: format!("{} followed by a username", platform.expected_url_pattern()),
            })?;

        let mut signal = ProfileSignal::new(platform, username, self.profile_url);
        signal.followed_teams = self.followed_teams.unwrap_or_default();
        signal.free_text_interactions = self.interactions.unwrap_or_default();
        signal.favorite_games = self.favorite_games.unwrap_or_default();

        let manual_metrics = match (
            self.followers,
            self.posts,
            self.avg_likes,
            self.avg_interactions,
        ) {
            (None, None, None, None) => None,
            (followers, posts, avg_likes, avg_interactions) => Some(EngagementMetrics {
                follower_count: followers.unwrap_or(0),
                post_count: posts.unwrap_or(0),
                avg_likes: avg_likes.unwrap_or(0.0),
                avg_interactions: avg_interactions.unwrap_or(0.0),
                account_age_days: self.account_age_days,
            }),
        };

        let options = AnalyzeOptions {
            manual_metrics,
            fetch_metrics: self.fetch_metrics.unwrap_or(false),
            use_ai: self.use_ai.unwrap_or(false),
        };
        Ok((signal, options))
    }
}

#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub manual_metrics: Option<EngagementMetrics>,
    pub fetch_metrics: bool,
    pub use_ai: bool,
}

#[derive(Debug, Serialize)]
pub struct ApiAnalyzeResponse {
    pub profile_id: String,
    pub platform: String,
    pub username: String,
    pub relevance_score: u8,
    pub esports_score: u8,
    pub furia_score: u8,
    pub risk_level: String,
    pub keywords: Vec<String>,
    pub followed_teams: Vec<String>,
    pub recommendations: Vec<String>,
    pub flags: Vec<String>,
    pub ai_validation: Option<AiValidation>,
    pub warnings: Vec<String>,
}

impl ApiAnalyzeResponse {
    pub fn from_result(
        signal: &ProfileSignal,
        result: ScoreResult,
        ai_validation: Option<AiValidation>,
        warnings: Vec<String>,
    ) -> Self {
        Self {
            profile_id: stable_profile_id(signal.platform, &signal.username),
            platform: signal.platform.label().to_string(),
            username: signal.username.clone(),
            relevance_score: result.relevance_score,
            esports_score: result.esports_score,
            furia_score: result.furia_score,
            risk_level: result.risk_level.label().to_string(),
            keywords: result.keywords,
            followed_teams: result.followed_teams,
            recommendations: result.recommendations,
            flags: result.flags,
            ai_validation,
            warnings,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiVerifyRequest {
    /// OCR-extracted plain text, or a base64 payload of the same.
    pub text: Option<String>,
    pub base64: Option<String>,
    pub document_type: String,
}

#[derive(Debug, Serialize)]
pub struct ApiVerifyResponse {
    pub document_id: String,
    pub is_valid: bool,
    pub confidence: f64,
    pub extracted_fields: BTreeMap<String, Option<String>>,
    pub warning: Option<String>,
}

impl ApiVerifyResponse {
    pub fn from_result(document_id: String, result: DocumentVerificationResult) -> Self {
        Self {
            document_id,
            is_valid: result.is_valid,
            confidence: result.confidence,
            extracted_fields: result.extracted_fields,
            warning: result.warning,
        }
    }
}
