pub mod config;
pub mod document;
pub mod error;
pub mod scoring;

use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use crate::scoring::{CompositeScorer, KeywordScorer, RecommendationCatalog};

pub use crate::document::{DocumentChecker, DocumentType, DocumentVerificationResult};
pub use crate::error::AnalysisError;

pub const FLAG_INSUFFICIENT_DATA: &str = "dados_insuficientes";
pub const FLAG_LOW_ACTIVITY: &str = "baixa_atividade_recente";
pub const FLAG_LOW_AUDIENCE: &str = "baixo_numero_de_seguidores";
pub const FLAG_NEW_ACCOUNT: &str = "conta_criada_recentemente";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Twitter,
    Instagram,
    Twitch,
    Faceit,
    Steam,
    GamersClub,
    Riot,
}

impl Platform {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "twitter" | "x" => Some(Platform::Twitter),
            "instagram" => Some(Platform::Instagram),
            "twitch" => Some(Platform::Twitch),
            "faceit" => Some(Platform::Faceit),
            "steam" => Some(Platform::Steam),
            "gamersclub" | "gc" => Some(Platform::GamersClub),
            "riot" | "riot games" => Some(Platform::Riot),
            _ => None,
        }
    }

    pub fn parse(value: &str) -> Result<Self, AnalysisError> {
        Platform::from_str(value)
            .ok_or_else(|| AnalysisError::UnsupportedPlatform(value.to_string()))
    }

    pub fn label(self) -> &'static str {
        match self {
            Platform::Twitter => "Twitter",
            Platform::Instagram => "Instagram",
            Platform::Twitch => "Twitch",
            Platform::Faceit => "FACEIT",
            Platform::Steam => "Steam",
            Platform::GamersClub => "GamersClub",
            Platform::Riot => "Riot Games",
        }
    }

    /// Structural markers a profile URL must contain for this platform.
    fn url_markers(self) -> &'static [&'static str] {
        match self {
            Platform::Twitter => &["twitter.com/", "x.com/"],
            Platform::Instagram => &["instagram.com/"],
            Platform::Twitch => &["twitch.tv/"],
            Platform::Faceit => &["faceit.com/"],
            Platform::Steam => &["steamcommunity.com/"],
            Platform::GamersClub => &["gamersclub.com.br/"],
            Platform::Riot => &["tracker.gg/valorant/"],
        }
    }

    pub fn expected_url_pattern(self) -> String {
        self.url_markers().join(" or ")
    }

    pub fn validate_url(self, url: &str) -> Result<(), AnalysisError> {
        let lower = url.to_ascii_lowercase();
        if self.url_markers().iter().any(|marker| lower.contains(marker)) {
            return Ok(());
        }
        Err(AnalysisError::InvalidProfileUrl {
            platform: self.label().to_string(),
            expected: self.expected_url_pattern(),
        })
    }

    /// Best-effort username extraction from a profile URL: the path segment
    /// right after the platform marker.
    pub fn extract_username(self, url: &str) -> Option<String> {
        // ASCII lowering keeps byte offsets aligned with the original string.
        let lower = url.to_ascii_lowercase();
        for marker in self.url_markers() {
            if let Some(start) = lower.find(marker) {
                let rest = &url[start + marker.len()..];
                let username: String = rest
                    .chars()
                    .take_while(|c| *c != '/' && *c != '?' && *c != '#')
                    .collect();
                let username = username.trim_start_matches('@').to_string();
                if !username.is_empty() {
                    return Some(username);
                }
            }
        }
        None
    }
}

/// Declared and observed signals for one linked fan profile. Immutable input
/// to a scoring call.
#[derive(Debug, Clone)]
pub struct ProfileSignal {
    pub platform: Platform,
    pub username: String,
    pub profile_url: String,
    pub followed_teams: Vec<String>,
    pub free_text_interactions: String,
    pub favorite_games: Vec<String>,
}

impl ProfileSignal {
    pub fn new(platform: Platform, username: impl Into<String>, profile_url: impl Into<String>) -> Self {
        Self {
            platform,
            username: username.into(),
            profile_url: profile_url.into(),
            followed_teams: Vec::new(),
            free_text_interactions: String::new(),
            favorite_games: Vec::new(),
        }
    }
}

/// Platform-sourced activity metrics. Absent metrics degrade to
/// [`EngagementMetrics::neutral`] rather than failing the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementMetrics {
    pub follower_count: u64,
    pub post_count: u64,
    pub avg_likes: f64,
    pub avg_interactions: f64,
    pub account_age_days: Option<u32>,
}

impl EngagementMetrics {
    pub fn neutral() -> Self {
        Self {
            follower_count: 0,
            post_count: 0,
            avg_likes: 0.0,
            avg_interactions: 0.0,
            account_age_days: None,
        }
    }
}

impl Default for EngagementMetrics {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Upstream text corpus for keyword matching: the profile bio plus recent
/// post bodies.
#[derive(Debug, Clone, Default)]
pub struct ProfileTexts {
    pub bio: String,
    pub posts: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

/// Derived, read-only scoring output, written once per analysis request and
/// persisted by the caller alongside the user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub relevance_score: u8,
    pub esports_score: u8,
    pub furia_score: u8,
    pub keywords: Vec<String>,
    pub followed_teams: Vec<String>,
    pub recommendations: Vec<String>,
    pub risk_level: RiskLevel,
    pub flags: Vec<String>,
}

/// Scores one profile. Pure and deterministic given identical inputs.
///
/// `metrics: None` means the upstream fetch failed or was skipped: neutral
/// metrics are substituted, the composite falls back to content-only weights,
/// and the result is flagged `dados_insuficientes`. Validation errors
/// (unknown platform was already rejected at parse time; a URL that fails the
/// platform's structural check) abort the call.
pub fn analyze_profile(
    signal: &ProfileSignal,
    metrics: Option<&EngagementMetrics>,
    texts: Option<&ProfileTexts>,
    config: &ScoringConfig,
) -> Result<ScoreResult, AnalysisError> {
    signal.platform.validate_url(&signal.profile_url)?;

    let keyword_scorer = KeywordScorer::new(config.keywords.clone());
    let composite_scorer = CompositeScorer::new(config.composite.clone());
    let catalog = RecommendationCatalog::new(config.recommendations.clone());

    let bio = texts.map(|t| t.bio.as_str()).unwrap_or("");
    let mut body_texts: Vec<String> = Vec::new();
    if !signal.free_text_interactions.trim().is_empty() {
        body_texts.push(signal.free_text_interactions.clone());
    }
    body_texts.extend(signal.favorite_games.iter().cloned());
    body_texts.extend(signal.followed_teams.iter().cloned());
    if let Some(texts) = texts {
        body_texts.extend(texts.posts.iter().cloned());
    }

    let matches = keyword_scorer.scan(bio, &body_texts);
    let esports_score = keyword_scorer.normalized_esports(&matches);
    let furia_score = keyword_scorer.normalized_org(&matches);

    let neutral = EngagementMetrics::neutral();
    let effective_metrics = metrics.unwrap_or(&neutral);

    let relevance_score = composite_scorer.relevance(effective_metrics, esports_score, furia_score);
    let risk_level = composite_scorer.bucket(relevance_score, &config.thresholds);
    let recommendations = catalog.select(&matches.matched);
    let flags = build_flags(metrics.is_some(), effective_metrics, config);

    Ok(ScoreResult {
        relevance_score,
        esports_score,
        furia_score,
        keywords: matches.matched,
        followed_teams: signal.followed_teams.clone(),
        recommendations,
        risk_level,
        flags,
    })
}

fn build_flags(
    metrics_present: bool,
    metrics: &EngagementMetrics,
    config: &ScoringConfig,
) -> Vec<String> {
    let mut flags = Vec::new();

    if !metrics_present {
        // Threshold flags would only echo the neutral defaults.
        flags.push(FLAG_INSUFFICIENT_DATA.to_string());
        return flags;
    }
    if metrics.post_count < config.flags.min_posts {
        flags.push(FLAG_LOW_ACTIVITY.to_string());
    }
    if metrics.follower_count < config.flags.min_followers {
        flags.push(FLAG_LOW_AUDIENCE.to_string());
    }
    if let Some(age) = metrics.account_age_days {
        if age < config.flags.min_account_age_days {
            flags.push(FLAG_NEW_ACCOUNT.to_string());
        }
    }

    flags
}

/// Stable identifier for an analyzed profile, replacing array-position
/// addressing of sub-records.
pub fn stable_profile_id(platform: Platform, username: &str) -> String {
    let payload = format!("{}:{}", platform.label(), username.to_lowercase());
    format!("prof_{:x}", stable_hash64(&payload))
}

/// Stable identifier for a verified document.
pub fn stable_document_id(doc_type: DocumentType, owner: &str) -> String {
    let payload = format!("{}:{}", doc_type.label(), owner);
    format!("doc_{:x}", stable_hash64(&payload))
}

fn stable_hash64(value: &str) -> u64 {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}
