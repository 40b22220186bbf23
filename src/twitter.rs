use chrono::{DateTime, Utc};
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use std::env;

use fanscore::{AnalysisError, EngagementMetrics, ProfileTexts};

const USER_FIELDS: &str = "public_metrics,description,created_at";
const TWEET_FIELDS: &str = "public_metrics,created_at";
const DEFAULT_MAX_TWEETS: u32 = 100;

#[derive(Clone)]
pub struct TwitterClient {
    client: reqwest::Client,
    api_base: String,
    bearer_token: String,
}

impl TwitterClient {
    pub fn from_env() -> Option<Self> {
        let bearer_token = env::var("TWITTER_BEARER_TOKEN").ok()?;
        let api_base = env::var("TWITTER_API_BASE")
            .unwrap_or_else(|_| "https://api.twitter.com/2".to_string());
        Some(Self {
            client: reqwest::Client::new(),
            api_base,
            bearer_token: decode_bearer(bearer_token),
        })
    }

    /// Fetches profile + recent tweets and folds them into engagement
    /// metrics and a text corpus. A tweet-fetch failure degrades to an empty
    /// corpus; a profile-fetch failure is an `UpstreamFetch` error the caller
    /// recovers from with neutral metrics.
    pub async fn fetch_engagement(
        &self,
        username: &str,
    ) -> Result<(EngagementMetrics, ProfileTexts), AnalysisError> {
        let user = self.fetch_user(username).await?;
        let tweets = match self.fetch_recent_tweets(&user.id, DEFAULT_MAX_TWEETS).await {
            Ok(tweets) => tweets,
            Err(err) => {
                tracing::warn!(username, error = %err, "tweet fetch failed, scoring on profile only");
                Vec::new()
            }
        };

        let mut total_likes = 0u64;
        let mut total_retweets = 0u64;
        let mut total_replies = 0u64;
        for tweet in &tweets {
            if let Some(metrics) = &tweet.public_metrics {
                total_likes += metrics.like_count;
                total_retweets += metrics.retweet_count;
                total_replies += metrics.reply_count;
            }
        }
        let tweet_count = tweets.len().max(1) as u64;
        let avg_likes = (total_likes / tweet_count) as f64;
        let avg_interactions = ((total_retweets + total_replies) / tweet_count) as f64;

        let metrics = EngagementMetrics {
            follower_count: user
                .public_metrics
                .as_ref()
                .map(|m| m.followers_count)
                .unwrap_or(0),
            post_count: tweets.len() as u64,
            avg_likes,
            avg_interactions,
            account_age_days: user.created_at.as_deref().and_then(account_age_days),
        };
        let texts = ProfileTexts {
            bio: user.description.unwrap_or_default(),
            posts: tweets.into_iter().map(|tweet| tweet.text).collect(),
        };

        Ok((metrics, texts))
    }

    async fn fetch_user(&self, username: &str) -> Result<TwitterUser, AnalysisError> {
        let sanitized = username.trim_start_matches('@');
        let response = self
            .client
            .get(format!(
                "{}/users/by/username/{}",
                self.api_base.trim_end_matches('/'),
                sanitized
            ))
            .query(&[("user.fields", USER_FIELDS)])
            .header(AUTHORIZATION, format!("Bearer {}", self.bearer_token))
            .send()
            .await
            .map_err(|err| AnalysisError::UpstreamFetch(format!("Twitter request failed: {}", err)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AnalysisError::UpstreamFetch(format!(
                "Twitter API error: {} {}",
                status,
                detail.trim()
            )));
        }

        let body: TwitterUserResponse = response.json().await.map_err(|err| {
            AnalysisError::MalformedResponse(format!("Twitter user parse failed: {}", err))
        })?;

        body.data.ok_or_else(|| {
            AnalysisError::MalformedResponse("Twitter response missing user data".to_string())
        })
    }

    async fn fetch_recent_tweets(
        &self,
        user_id: &str,
        max_results: u32,
    ) -> Result<Vec<Tweet>, AnalysisError> {
        let response = self
            .client
            .get(format!(
                "{}/users/{}/tweets",
                self.api_base.trim_end_matches('/'),
                user_id
            ))
            .query(&[
                ("max_results", max_results.to_string().as_str()),
                ("tweet.fields", TWEET_FIELDS),
                ("exclude", "retweets,replies"),
            ])
            .header(AUTHORIZATION, format!("Bearer {}", self.bearer_token))
            .send()
            .await
            .map_err(|err| AnalysisError::UpstreamFetch(format!("Twitter request failed: {}", err)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AnalysisError::UpstreamFetch(format!(
                "Twitter API error: {} {}",
                status,
                detail.trim()
            )));
        }

        let body: TweetsResponse = response.json().await.map_err(|err| {
            AnalysisError::MalformedResponse(format!("Twitter tweets parse failed: {}", err))
        })?;

        Ok(body.data.unwrap_or_default())
    }
}

fn account_age_days(created_at: &str) -> Option<u32> {
    let created: DateTime<Utc> = created_at.parse().ok()?;
    let days = Utc::now().signed_duration_since(created).num_days();
    u32::try_from(days.max(0)).ok()
}

fn decode_bearer(value: String) -> String {
    if value.contains('%') {
        match urlencoding::decode(&value) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => value,
        }
    } else {
        value
    }
}

#[derive(Deserialize)]
struct TwitterUserResponse {
    data: Option<TwitterUser>,
}

#[derive(Deserialize)]
struct TwitterUser {
    id: String,
    #[allow(dead_code)]
    username: String,
    description: Option<String>,
    created_at: Option<String>,
    public_metrics: Option<UserPublicMetrics>,
}

#[derive(Deserialize)]
struct UserPublicMetrics {
    followers_count: u64,
}

#[derive(Deserialize)]
struct TweetsResponse {
    data: Option<Vec<Tweet>>,
}

#[derive(Deserialize)]
struct Tweet {
    text: String,
    public_metrics: Option<TweetPublicMetrics>,
}

#[derive(Deserialize)]
struct TweetPublicMetrics {
    retweet_count: u64,
    reply_count: u64,
    like_count: u64,
}
