use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    pub esports: Vec<String>,
    pub organization: Vec<String>,
    pub esports_bio_weight: f64,
    pub esports_body_weight: f64,
    pub org_bio_weight: f64,
    pub org_body_weight: f64,
    /// Stand-in for the size of a typical post corpus; keeps normalized
    /// scores stable across input sizes.
    pub body_scale: f64,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            esports: [
                "esports",
                "esport",
                "game",
                "gaming",
                "cs2",
                "csgo",
                "counter-strike",
                "lol",
                "league of legends",
                "valorant",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            organization: ["furia", "kscerato", "art", "yuurih", "vini", "drop", "chelo"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            esports_bio_weight: 2.0,
            esports_body_weight: 1.0,
            org_bio_weight: 3.0,
            org_body_weight: 1.5,
            body_scale: 25.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeWeights {
    pub audience: f64,
    pub engagement: f64,
    pub esports_content: f64,
    pub org_content: f64,
    /// Follower count at which the audience signal saturates.
    pub follower_cap: f64,
    /// Likes + interactions per post at which the engagement signal saturates.
    pub engagement_cap: f64,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            audience: 0.3,
            engagement: 0.3,
            esports_content: 0.2,
            org_content: 0.2,
            follower_cap: 10_000.0,
            engagement_cap: 200.0,
        }
    }
}

impl CompositeWeights {
    pub fn validate(&self) -> Result<(), String> {
        let sum = self.audience + self.engagement + self.esports_content + self.org_content;
        if (sum - 1.0).abs() > 1e-6 {
            return Err(format!("composite weights must sum to 1.0, got {}", sum));
        }
        if self.follower_cap <= 0.0 || self.engagement_cap <= 0.0 {
            return Err("saturation caps must be positive".to_string());
        }
        Ok(())
    }
}

/// Bucketing thresholds for the composite score. Relevance polarity: a highly
/// relevant fan lands in the High bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    pub low: u8,
    pub high: u8,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self { low: 50, high: 80 }
    }
}

impl RiskThresholds {
    pub fn validate(&self) -> Result<(), String> {
        if self.low > self.high {
            return Err(format!(
                "risk thresholds out of order: low {} exceeds high {}",
                self.low, self.high
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagThresholds {
    pub min_posts: u64,
    pub min_followers: u64,
    pub min_account_age_days: u32,
}

impl Default for FlagThresholds {
    fn default() -> Self {
        Self {
            min_posts: 5,
            min_followers: 50,
            min_account_age_days: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRule {
    /// Matched keywords that activate this recommendation.
    pub any_of: Vec<String>,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    pub specific: Vec<RecommendationRule>,
    pub generic: Vec<String>,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            specific: vec![
                RecommendationRule {
                    any_of: vec!["furia".to_string()],
                    text: "Acompanhe as próximas partidas da FURIA e ative as notificações dos canais oficiais.".to_string(),
                },
                RecommendationRule {
                    any_of: ["kscerato", "art", "yuurih", "vini", "chelo", "drop"]
                        .iter()
                        .map(|s| s.to_string())
                        .collect(),
                    text: "Siga os jogadores do elenco da FURIA para conteúdo exclusivo dos bastidores.".to_string(),
                },
                RecommendationRule {
                    any_of: ["cs2", "csgo", "counter-strike"]
                        .iter()
                        .map(|s| s.to_string())
                        .collect(),
                    text: "Participe das comunidades de Counter-Strike da FURIA e dos watch parties.".to_string(),
                },
            ],
            generic: vec![
                "Complete seu perfil de torcedor para receber recomendações personalizadas.".to_string(),
                "Vincule outros perfis de redes sociais para melhorar sua pontuação de engajamento.".to_string(),
                "Explore a loja e os eventos oficiais para torcedores.".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScoringConfig {
    pub keywords: KeywordConfig,
    pub composite: CompositeWeights,
    pub thresholds: RiskThresholds,
    pub flags: FlagThresholds,
    pub recommendations: RecommendationConfig,
}

impl ScoringConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), String> {
        let config_path = path.or_else(default_config_path);
        let mut config = if let Some(path) = config_path.as_ref() {
            if path.exists() {
                let contents = std::fs::read_to_string(path)
                    .map_err(|err| format!("failed to read config: {}", err))?;
                toml::from_str(&contents)
                    .map_err(|err| format!("failed to parse config: {}", err))?
            } else {
                ScoringConfig::default()
            }
        } else {
            ScoringConfig::default()
        };

        config.apply_env_overrides();
        config.composite.validate()?;
        config.thresholds.validate()?;
        Ok((config, config_path))
    }

    pub fn write(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create config dir: {}", err))?;
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| format!("failed to serialize config: {}", err))?;
        std::fs::write(path, payload).map_err(|err| format!("failed to write config: {}", err))?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("FANSCORE_RISK_LOW") {
            if let Ok(parsed) = value.parse::<u8>() {
                self.thresholds.low = parsed;
            }
        }
        if let Ok(value) = env::var("FANSCORE_RISK_HIGH") {
            if let Ok(parsed) = value.parse::<u8>() {
                self.thresholds.high = parsed;
            }
        }
        if let Ok(value) = env::var("FANSCORE_FOLLOWER_CAP") {
            if let Ok(parsed) = value.parse::<f64>() {
                self.composite.follower_cap = parsed;
            }
        }
        if let Ok(value) = env::var("FANSCORE_ENGAGEMENT_CAP") {
            if let Ok(parsed) = value.parse::<f64>() {
                self.composite.engagement_cap = parsed;
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("FANSCORE_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/scoring.toml")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_passes_validation() {
        let config = ScoringConfig::default();
        assert!(config.composite.validate().is_ok());
        assert!(config.thresholds.validate().is_ok());
    }

    #[test]
    fn out_of_order_thresholds_are_rejected() {
        let thresholds = RiskThresholds { low: 90, high: 80 };
        assert!(thresholds.validate().is_err());

        let equal = RiskThresholds { low: 80, high: 80 };
        assert!(equal.validate().is_ok());
    }

    #[test]
    fn composite_weights_must_sum_to_one() {
        let mut weights = CompositeWeights::default();
        weights.audience = 0.5;
        assert!(weights.validate().is_err());
    }

    #[test]
    fn partial_toml_sections_fall_back_to_defaults() {
        let config: ScoringConfig = toml::from_str("[thresholds]\nlow = 40\n").unwrap();
        assert_eq!(config.thresholds.low, 40);
        assert_eq!(config.thresholds.high, 80);
        assert_eq!(config.composite.follower_cap, 10_000.0);
    }
}
