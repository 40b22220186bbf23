use crate::config::{CompositeWeights, RiskThresholds};
use crate::{EngagementMetrics, RiskLevel};

/// Folds audience size, engagement rate, and content scores into the 0-100
/// composite relevance score. Each sub-signal saturates at its configured cap
/// so a huge account cannot dominate the composite.
#[derive(Debug, Clone)]
pub struct CompositeScorer {
    weights: CompositeWeights,
}

impl CompositeScorer {
    pub fn new(weights: CompositeWeights) -> Self {
        Self { weights }
    }

    pub fn relevance(&self, metrics: &EngagementMetrics, esports: u8, org: u8) -> u8 {
        let audience =
            saturate(metrics.follower_count as f64 / self.weights.follower_cap) * self.weights.audience;
        let engagement = saturate(
            (metrics.avg_likes + metrics.avg_interactions) / self.weights.engagement_cap,
        ) * self.weights.engagement;
        let content = (esports as f64 / 100.0) * self.weights.esports_content
            + (org as f64 / 100.0) * self.weights.org_content;

        let composite = (audience + engagement + content) * 100.0;
        composite.round().clamp(0.0, 100.0) as u8
    }

    pub fn bucket(&self, relevance: u8, thresholds: &RiskThresholds) -> RiskLevel {
        if relevance < thresholds.low {
            RiskLevel::Low
        } else if relevance < thresholds.high {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

fn saturate(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> CompositeScorer {
        CompositeScorer::new(CompositeWeights::default())
    }

    #[test]
    fn neutral_metrics_and_no_content_score_zero() {
        let relevance = scorer().relevance(&EngagementMetrics::neutral(), 0, 0);
        assert_eq!(relevance, 0);
    }

    #[test]
    fn maxed_inputs_score_100() {
        let metrics = EngagementMetrics {
            follower_count: 1_000_000,
            post_count: 500,
            avg_likes: 500.0,
            avg_interactions: 500.0,
            account_age_days: Some(3650),
        };
        assert_eq!(scorer().relevance(&metrics, 100, 100), 100);
    }

    #[test]
    fn audience_signal_saturates_at_cap() {
        let at_cap = EngagementMetrics {
            follower_count: 10_000,
            ..EngagementMetrics::neutral()
        };
        let over_cap = EngagementMetrics {
            follower_count: 10_000_000,
            ..EngagementMetrics::neutral()
        };
        let s = scorer();
        assert_eq!(s.relevance(&at_cap, 0, 0), s.relevance(&over_cap, 0, 0));
    }

    #[test]
    fn bucket_follows_thresholds() {
        let s = scorer();
        let thresholds = RiskThresholds::default();
        assert_eq!(s.bucket(0, &thresholds), RiskLevel::Low);
        assert_eq!(s.bucket(49, &thresholds), RiskLevel::Low);
        assert_eq!(s.bucket(50, &thresholds), RiskLevel::Medium);
        assert_eq!(s.bucket(79, &thresholds), RiskLevel::Medium);
        assert_eq!(s.bucket(80, &thresholds), RiskLevel::High);
        assert_eq!(s.bucket(100, &thresholds), RiskLevel::High);
    }
}
