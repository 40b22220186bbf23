use fanscore::config::ScoringConfig;
use fanscore::{
    analyze_profile, format_percent, stable_profile_id, AnalysisError, EngagementMetrics,
    Platform, ProfileSignal, ProfileTexts, RiskLevel, FLAG_INSUFFICIENT_DATA, FLAG_LOW_ACTIVITY,
    FLAG_LOW_AUDIENCE, FLAG_NEW_ACCOUNT,
};

fn twitter_signal() -> ProfileSignal {
    ProfileSignal::new(Platform::Twitter, "torcedor", "https://twitter.com/torcedor")
}

fn rich_metrics() -> EngagementMetrics {
    EngagementMetrics {
        follower_count: 20_000,
        post_count: 120,
        avg_likes: 150.0,
        avg_interactions: 80.0,
        account_age_days: Some(2000),
    }
}

#[test]
fn scores_stay_within_bounds() {
    let config = ScoringConfig::default();
    let mut signal = twitter_signal();
    signal.free_text_interactions =
        "furia furia kscerato yuurih cs2 csgo esports gaming valorant lol".to_string();
    let texts = ProfileTexts {
        bio: "esports fan, FURIA die hard, cs2 grinder".to_string(),
        posts: vec!["vamos furia".to_string(); 50],
    };

    let result = analyze_profile(&signal, Some(&rich_metrics()), Some(&texts), &config).unwrap();

    assert!(result.relevance_score <= 100);
    assert!(result.esports_score <= 100);
    assert!(result.furia_score <= 100);
}

#[test]
fn recommendations_always_three() {
    let config = ScoringConfig::default();

    let empty = analyze_profile(&twitter_signal(), None, None, &config).unwrap();
    assert_eq!(empty.recommendations.len(), 3);

    let mut loaded = twitter_signal();
    loaded.free_text_interactions = "furia kscerato cs2 valorant gaming esports".to_string();
    let result = analyze_profile(&loaded, Some(&rich_metrics()), None, &config).unwrap();
    assert_eq!(result.recommendations.len(), 3);
}

#[test]
fn identical_inputs_yield_identical_results() {
    let config = ScoringConfig::default();
    let mut signal = twitter_signal();
    signal.free_text_interactions = "acompanho a furia desde 2019".to_string();
    signal.followed_teams = vec!["FURIA".to_string()];
    let metrics = rich_metrics();

    let first = analyze_profile(&signal, Some(&metrics), None, &config).unwrap();
    let second = analyze_profile(&signal, Some(&metrics), None, &config).unwrap();

    assert_eq!(first, second);
}

#[test]
fn more_org_keyword_matches_never_decrease_furia_score() {
    let config = ScoringConfig::default();
    let metrics = rich_metrics();

    let interactions = [
        "",
        "furia",
        "furia kscerato",
        "furia kscerato yuurih chelo",
    ];

    let mut previous = 0u8;
    for text in interactions {
        let mut signal = twitter_signal();
        signal.free_text_interactions = text.to_string();
        let result = analyze_profile(&signal, Some(&metrics), None, &config).unwrap();
        assert!(
            result.furia_score >= previous,
            "furia_score dropped from {} to {} for {:?}",
            previous,
            result.furia_score,
            text
        );
        previous = result.furia_score;
    }
}

#[test]
fn all_empty_input_scores_low_without_error() {
    let config = ScoringConfig::default();
    let result = analyze_profile(&twitter_signal(), None, None, &config).unwrap();

    assert_eq!(result.relevance_score, 0);
    assert_eq!(result.esports_score, 0);
    assert_eq!(result.furia_score, 0);
    assert_eq!(result.risk_level, RiskLevel::Low);
    assert!(result.keywords.is_empty());
    assert!(result.flags.contains(&FLAG_INSUFFICIENT_DATA.to_string()));
}

#[test]
fn unsupported_platform_is_rejected_at_parse() {
    let err = Platform::parse("MySpace").unwrap_err();
    assert!(matches!(err, AnalysisError::UnsupportedPlatform(name) if name == "MySpace"));
}

#[test]
fn mismatched_url_aborts_the_call() {
    let config = ScoringConfig::default();
    let signal = ProfileSignal::new(
        Platform::Twitter,
        "torcedor",
        "https://instagram.com/torcedor",
    );

    let err = analyze_profile(&signal, Some(&rich_metrics()), None, &config).unwrap_err();
    match err {
        AnalysisError::InvalidProfileUrl { platform, expected } => {
            assert_eq!(platform, "Twitter");
            assert!(expected.contains("twitter.com/"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn absent_metrics_degrade_to_content_only_weights() {
    let config = ScoringConfig::default();
    let mut signal = twitter_signal();
    signal.free_text_interactions = "furia cs2 esports".to_string();
    let texts = ProfileTexts {
        bio: "furia esports cs2".to_string(),
        posts: vec![],
    };

    let result = analyze_profile(&signal, None, Some(&texts), &config).unwrap();

    // Content contributes at most 40% of the composite.
    assert!(result.relevance_score <= 40);
    assert!(result.relevance_score > 0);
    assert!(result.flags.contains(&FLAG_INSUFFICIENT_DATA.to_string()));
}

#[test]
fn risk_level_follows_configured_thresholds() {
    let config = ScoringConfig::default();

    let low = analyze_profile(&twitter_signal(), Some(&EngagementMetrics::neutral()), None, &config)
        .unwrap();
    assert_eq!(low.risk_level, RiskLevel::Low);

    let mut signal = twitter_signal();
    signal.free_text_interactions =
        "furia kscerato art yuurih vini drop chelo cs2 csgo counter-strike esports esport game gaming lol league of legends valorant"
            .to_string();
    let texts = ProfileTexts {
        bio: signal.free_text_interactions.clone(),
        posts: vec![signal.free_text_interactions.clone(); 40],
    };
    let metrics = EngagementMetrics {
        follower_count: 1_000_000,
        post_count: 500,
        avg_likes: 400.0,
        avg_interactions: 400.0,
        account_age_days: Some(3650),
    };
    let high = analyze_profile(&signal, Some(&metrics), Some(&texts), &config).unwrap();
    assert_eq!(high.risk_level, RiskLevel::High);
    assert!(high.relevance_score >= 80);
}

#[test]
fn low_activity_and_audience_flags_fire_under_thresholds() {
    let config = ScoringConfig::default();
    let metrics = EngagementMetrics {
        follower_count: 10,
        post_count: 2,
        avg_likes: 0.0,
        avg_interactions: 0.0,
        account_age_days: Some(15),
    };

    let result = analyze_profile(&twitter_signal(), Some(&metrics), None, &config).unwrap();

    assert!(result.flags.contains(&FLAG_LOW_ACTIVITY.to_string()));
    assert!(result.flags.contains(&FLAG_LOW_AUDIENCE.to_string()));
    assert!(result.flags.contains(&FLAG_NEW_ACCOUNT.to_string()));
    assert!(!result.flags.contains(&FLAG_INSUFFICIENT_DATA.to_string()));
}

#[test]
fn followed_teams_pass_through_and_count_as_signal() {
    let config = ScoringConfig::default();
    let mut signal = twitter_signal();
    signal.followed_teams = vec!["FURIA".to_string(), "MIBR".to_string()];

    let result = analyze_profile(&signal, Some(&rich_metrics()), None, &config).unwrap();

    assert_eq!(result.followed_teams, vec!["FURIA", "MIBR"]);
    assert!(result.keywords.contains(&"furia".to_string()));
}

#[test]
fn profile_ids_are_stable_and_platform_scoped() {
    let a = stable_profile_id(Platform::Twitter, "Torcedor");
    let b = stable_profile_id(Platform::Twitter, "torcedor");
    let c = stable_profile_id(Platform::Twitch, "torcedor");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a.starts_with("prof_"));
}

#[test]
fn only_data_availability_errors_are_recoverable() {
    assert!(AnalysisError::UpstreamFetch("timeout".to_string()).is_recoverable());
    assert!(AnalysisError::MalformedResponse("not json".to_string()).is_recoverable());
    assert!(!AnalysisError::UnsupportedPlatform("MySpace".to_string()).is_recoverable());
    assert!(!AnalysisError::InvalidProfileUrl {
        platform: "Twitter".to_string(),
        expected: "twitter.com/".to_string(),
    }
    .is_recoverable());
}

#[test]
fn percent_formatting_for_confidence_display() {
    assert_eq!(format_percent(0.85), "85.0%");
    assert_eq!(format_percent(0.0), "0.0%");
    assert_eq!(format_percent(1.0), "100.0%");
}

#[test]
fn username_extraction_from_profile_urls() {
    assert_eq!(
        Platform::Twitter.extract_username("https://twitter.com/@torcedor?lang=pt"),
        Some("torcedor".to_string())
    );
    assert_eq!(
        Platform::Faceit.extract_username("https://www.faceit.com/kscerato/stats"),
        Some("kscerato".to_string())
    );
    assert_eq!(Platform::Twitter.extract_username("https://twitter.com/"), None);
}
