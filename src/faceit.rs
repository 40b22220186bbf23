use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use std::env;

use fanscore::{AnalysisError, EngagementMetrics};

#[derive(Clone)]
pub struct FaceitClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl FaceitClient {
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("FACEIT_API_KEY").ok()?;
        let api_base = env::var("FACEIT_API_BASE")
            .unwrap_or_else(|_| "https://open.faceit.com/data/v4".to_string());
        Some(Self {
            client: reqwest::Client::new(),
            api_base,
            api_key,
        })
    }

    /// Player lookup plus lifetime stats, mapped onto engagement metrics:
    /// match count stands in for post count, win rate for interaction rate.
    /// FACEIT exposes no audience or account-age signal.
    pub async fn fetch_engagement(
        &self,
        nickname: &str,
    ) -> Result<EngagementMetrics, AnalysisError> {
        let player = self.fetch_player(nickname).await?;
        let stats = self.fetch_lifetime_stats(&player.player_id).await?;

        let matches = stats
            .lifetime
            .matches
            .as_deref()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(0);
        let win_rate = stats
            .lifetime
            .win_rate_percent
            .as_deref()
            .and_then(|value| value.parse::<f64>().ok())
            .unwrap_or(0.0);

        Ok(EngagementMetrics {
            follower_count: 0,
            post_count: matches,
            avg_likes: 0.0,
            avg_interactions: win_rate,
            account_age_days: None,
        })
    }

    async fn fetch_player(&self, nickname: &str) -> Result<FaceitPlayer, AnalysisError> {
        let response = self
            .client
            .get(format!("{}/players", self.api_base.trim_end_matches('/')))
            .query(&[("nickname", nickname)])
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|err| AnalysisError::UpstreamFetch(format!("FACEIT request failed: {}", err)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AnalysisError::UpstreamFetch(format!(
                "FACEIT API error: {} {}",
                status,
                detail.trim()
            )));
        }

        response.json::<FaceitPlayer>().await.map_err(|err| {
            AnalysisError::MalformedResponse(format!("FACEIT player parse failed: {}", err))
        })
    }

    async fn fetch_lifetime_stats(&self, player_id: &str) -> Result<FaceitStats, AnalysisError> {
        let response = self
            .client
            .get(format!(
                "{}/players/{}/stats/cs2",
                self.api_base.trim_end_matches('/'),
                player_id
            ))
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|err| AnalysisError::UpstreamFetch(format!("FACEIT request failed: {}", err)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AnalysisError::UpstreamFetch(format!(
                "FACEIT API error: {} {}",
                status,
                detail.trim()
            )));
        }

        response.json::<FaceitStats>().await.map_err(|err| {
            AnalysisError::MalformedResponse(format!("FACEIT stats parse failed: {}", err))
        })
    }
}

#[derive(Deserialize)]
struct FaceitPlayer {
    player_id: String,
    #[allow(dead_code)]
    nickname: String,
}

#[derive(Deserialize)]
struct FaceitStats {
    lifetime: FaceitLifetime,
}

#[derive(Deserialize)]
struct FaceitLifetime {
    #[serde(rename = "Matches")]
    matches: Option<String>,
    #[serde(rename = "Win Rate %")]
    win_rate_percent: Option<String>,
}
