use std::collections::HashSet;

use crate::config::KeywordConfig;

/// Raw keyword-match counters plus the distinct vocabulary words that hit.
#[derive(Debug, Clone)]
pub struct KeywordMatches {
    pub esports_raw: f64,
    pub org_raw: f64,
    pub matched: Vec<String>,
}

/// Scans bio and body text against the esports and organization
/// vocabularies. Bio matches weigh more than body matches: a keyword in a
/// stated identity is a stronger signal than an incidental mention.
#[derive(Debug, Clone)]
pub struct KeywordScorer {
    config: KeywordConfig,
}

impl KeywordScorer {
    pub fn new(config: KeywordConfig) -> Self {
        Self { config }
    }

    pub fn scan(&self, bio: &str, body_texts: &[String]) -> KeywordMatches {
        let bio_lower = bio.to_lowercase();
        let bodies_lower: Vec<String> = body_texts.iter().map(|t| t.to_lowercase()).collect();

        let mut esports_raw = 0.0;
        let mut org_raw = 0.0;
        let mut matched = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for keyword in &self.config.esports {
            let needle = keyword.to_lowercase();
            let mut hit = false;
            if bio_lower.contains(&needle) {
                esports_raw += self.config.esports_bio_weight;
                hit = true;
            }
            for body in &bodies_lower {
                if body.contains(&needle) {
                    esports_raw += self.config.esports_body_weight;
                    hit = true;
                }
            }
            if hit && seen.insert(needle.clone()) {
                matched.push(needle);
            }
        }

        for keyword in &self.config.organization {
            let needle = keyword.to_lowercase();
            let mut hit = false;
            if bio_lower.contains(&needle) {
                org_raw += self.config.org_bio_weight;
                hit = true;
            }
            for body in &bodies_lower {
                if body.contains(&needle) {
                    org_raw += self.config.org_body_weight;
                    hit = true;
                }
            }
            if hit && seen.insert(needle.clone()) {
                matched.push(needle);
            }
        }

        KeywordMatches {
            esports_raw,
            org_raw,
            matched,
        }
    }

    pub fn normalized_esports(&self, matches: &KeywordMatches) -> u8 {
        let len = self.config.esports.len() as f64;
        let max = self.config.esports_bio_weight * len
            + self.config.body_scale * self.config.esports_body_weight * len;
        normalize(matches.esports_raw, max)
    }

    pub fn normalized_org(&self, matches: &KeywordMatches) -> u8 {
        let len = self.config.organization.len() as f64;
        let max = self.config.org_bio_weight * len
            + self.config.body_scale * self.config.org_body_weight * len;
        normalize(matches.org_raw, max)
    }
}

fn normalize(raw: f64, max: f64) -> u8 {
    if max <= 0.0 || raw <= 0.0 {
        return 0;
    }
    let scaled = (raw / max * 100.0).floor();
    scaled.min(100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> KeywordScorer {
        KeywordScorer::new(KeywordConfig::default())
    }

    #[test]
    fn empty_text_scores_zero() {
        let matches = scorer().scan("", &[]);
        assert_eq!(matches.esports_raw, 0.0);
        assert_eq!(matches.org_raw, 0.0);
        assert!(matches.matched.is_empty());
    }

    #[test]
    fn bio_match_outweighs_body_match() {
        let s = scorer();
        let bio_hit = s.scan("jogo valorant todo dia", &[]);
        let body_hit = s.scan("", &["jogo valorant todo dia".to_string()]);
        assert!(bio_hit.esports_raw > body_hit.esports_raw);
    }

    #[test]
    fn matched_keywords_are_distinct() {
        let s = scorer();
        let matches = s.scan(
            "furia furia furia",
            &["vamos furia".to_string(), "furia top".to_string()],
        );
        assert_eq!(
            matches.matched.iter().filter(|k| *k == "furia").count(),
            1
        );
    }

    #[test]
    fn normalization_clamps_to_100() {
        let s = scorer();
        let matches = KeywordMatches {
            esports_raw: 1e9,
            org_raw: 1e9,
            matched: vec![],
        };
        assert_eq!(s.normalized_esports(&matches), 100);
        assert_eq!(s.normalized_org(&matches), 100);
    }
}
