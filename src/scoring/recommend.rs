use crate::config::RecommendationConfig;

/// Number of recommendations every score result carries.
pub const RECOMMENDATION_COUNT: usize = 3;

/// Picks recommendation strings based on which keyword buckets matched,
/// padding with generic entries so the output is always exactly three long.
#[derive(Debug, Clone)]
pub struct RecommendationCatalog {
    config: RecommendationConfig,
}

impl RecommendationCatalog {
    pub fn new(config: RecommendationConfig) -> Self {
        Self { config }
    }

    pub fn select(&self, matched_keywords: &[String]) -> Vec<String> {
        let mut recommendations = Vec::with_capacity(RECOMMENDATION_COUNT);

        for rule in &self.config.specific {
            if recommendations.len() == RECOMMENDATION_COUNT {
                break;
            }
            let activated = rule
                .any_of
                .iter()
                .any(|key| matched_keywords.iter().any(|m| m.eq_ignore_ascii_case(key)));
            if activated && !recommendations.contains(&rule.text) {
                recommendations.push(rule.text.clone());
            }
        }

        for generic in &self.config.generic {
            if recommendations.len() == RECOMMENDATION_COUNT {
                break;
            }
            if !recommendations.contains(generic) {
                recommendations.push(generic.clone());
            }
        }

        recommendations.truncate(RECOMMENDATION_COUNT);
        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> RecommendationCatalog {
        RecommendationCatalog::new(RecommendationConfig::default())
    }

    #[test]
    fn no_matches_yields_three_generics() {
        let recs = catalog().select(&[]);
        assert_eq!(recs.len(), RECOMMENDATION_COUNT);
    }

    #[test]
    fn org_match_puts_specific_first() {
        let recs = catalog().select(&["furia".to_string()]);
        assert_eq!(recs.len(), RECOMMENDATION_COUNT);
        assert!(recs[0].contains("FURIA"));
    }

    #[test]
    fn many_matches_still_returns_three() {
        let matched: Vec<String> = ["furia", "kscerato", "cs2", "valorant", "gaming"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(catalog().select(&matched).len(), RECOMMENDATION_COUNT);
    }
}
