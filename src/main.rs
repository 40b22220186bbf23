mod ai;
mod api;
mod faceit;
mod server;
mod twitter;

use clap::{Args, Parser, Subcommand};
use std::path::Path;

use fanscore::{
    analyze_profile, config::ScoringConfig, format_percent, stable_profile_id, DocumentChecker,
    DocumentType, EngagementMetrics, Platform, ProfileSignal, ProfileTexts,
};

#[derive(Parser)]
#[command(name = "fanscore", about = "Fan relevance scoring and document verification")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score a linked social or gaming profile
    Analyze(AnalyzeArgs),
    /// Verify OCR-extracted identity document text
    Verify(VerifyArgs),
    /// Run the HTTP API
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone)]
struct AnalyzeArgs {
    #[arg(long)]
    platform: String,
    #[arg(long)]
    url: String,
    #[arg(long)]
    username: Option<String>,
    #[arg(long = "team")]
    teams: Vec<String>,
    #[arg(long)]
    interactions: Option<String>,
    #[arg(long = "game")]
    games: Vec<String>,
    #[arg(long)]
    followers: Option<u64>,
    #[arg(long)]
    posts: Option<u64>,
    #[arg(long)]
    avg_likes: Option<f64>,
    #[arg(long)]
    avg_interactions: Option<f64>,
    #[arg(long)]
    account_age_days: Option<u32>,
    /// Fetch live metrics from the platform API
    #[arg(long)]
    fetch: bool,
    /// Validate the profile with the configured AI model
    #[arg(long)]
    ai: bool,
}

#[derive(Args, Debug, Clone)]
struct VerifyArgs {
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,
    #[arg(long)]
    file: Option<String>,
    #[arg(long)]
    doc_type: String,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    #[arg(long, default_value_t = 8787)]
    port: u16,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    match cli.command {
        Command::Analyze(args) => run_analyze(args).await,
        Command::Verify(args) => run_verify(args),
        Command::Serve(args) => server::serve(args).await,
    }
}

async fn run_analyze(args: AnalyzeArgs) -> Result<(), String> {
    let (config, _) = ScoringConfig::load(None)?;

    let platform = Platform::parse(&args.platform).map_err(|err| err.to_string())?;
    platform
        .validate_url(&args.url)
        .map_err(|err| err.to_string())?;

    let username = args
        .username
        .filter(|value| !value.trim().is_empty())
        .or_else(|| platform.extract_username(&args.url))
        .ok_or_else(|| "missing username: pass --username or a URL containing one".to_string())?;

    let mut signal = ProfileSignal::new(platform, username, args.url.clone());
    signal.followed_teams = args.teams;
    signal.free_text_interactions = args.interactions.unwrap_or_default();
    signal.favorite_games = args.games;

    let manual_metrics = match (args.followers, args.posts, args.avg_likes, args.avg_interactions)
    {
        (None, None, None, None) => None,
        (followers, posts, avg_likes, avg_interactions) => Some(EngagementMetrics {
            follower_count: followers.unwrap_or(0),
            post_count: posts.unwrap_or(0),
            avg_likes: avg_likes.unwrap_or(0.0),
            avg_interactions: avg_interactions.unwrap_or(0.0),
            account_age_days: args.account_age_days,
        }),
    };

    let mut texts: Option<ProfileTexts> = None;
    let metrics = if let Some(manual) = manual_metrics {
        Some(manual)
    } else if args.fetch {
        match fetch_metrics(platform, &signal.username).await {
            Ok((fetched, fetched_texts)) => {
                texts = fetched_texts;
                Some(fetched)
            }
            Err(err) => {
                eprintln!("Warning: {} (scoring with neutral metrics)", err);
                None
            }
        }
    } else {
        None
    };

    let ai_validation = if args.ai {
        let validator = ai::AiValidator::from_env(None)
            .ok_or_else(|| "OPENAI_API_KEY is not set".to_string())?;
        match validator
            .validate_profile(platform, &signal.username, &signal.profile_url, &signal.favorite_games)
            .await
        {
            Ok(validation) => Some(validation),
            Err(err) => {
                eprintln!("Warning: AI validation degraded: {}", err);
                Some(ai::fallback_validation(platform, &signal.favorite_games))
            }
        }
    } else {
        None
    };

    let result = analyze_profile(&signal, metrics.as_ref(), texts.as_ref(), &config)
        .map_err(|err| err.to_string())?;

    println!(
        "Profile: {} @{} ({})",
        platform.label(),
        signal.username,
        stable_profile_id(platform, &signal.username)
    );
    println!(
        "Relevance: {} ({}) | esports {} | FURIA {}",
        result.relevance_score,
        result.risk_level.label(),
        result.esports_score,
        result.furia_score
    );
    if !result.keywords.is_empty() {
        println!("Keywords: {}", result.keywords.join(", "));
    }
    if !result.flags.is_empty() {
        println!("Flags: {}", result.flags.join(", "));
    }
    if let Some(validation) = ai_validation {
        println!(
            "AI validation: {} (confidence {})",
            if validation.is_valid { "valid" } else { "invalid" },
            format_percent(validation.confidence)
        );
        if let Some(reason) = validation.reason {
            println!("  {}", reason);
        }
    }
    println!("\nRecommendations:");
    for recommendation in result.recommendations {
        println!("- {}", recommendation);
    }

    Ok(())
}

async fn fetch_metrics(
    platform: Platform,
    username: &str,
) -> Result<(EngagementMetrics, Option<ProfileTexts>), String> {
    match platform {
        Platform::Twitter => {
            let client = twitter::TwitterClient::from_env()
                .ok_or_else(|| "TWITTER_BEARER_TOKEN is not set".to_string())?;
            let (metrics, texts) = client
                .fetch_engagement(username)
                .await
                .map_err(|err| err.to_string())?;
            Ok((metrics, Some(texts)))
        }
        Platform::Faceit => {
            let client = faceit::FaceitClient::from_env()
                .ok_or_else(|| "FACEIT_API_KEY is not set".to_string())?;
            let metrics = client
                .fetch_engagement(username)
                .await
                .map_err(|err| err.to_string())?;
            Ok((metrics, None))
        }
        other => Err(format!("no metrics source available for {}", other.label())),
    }
}

fn run_verify(args: VerifyArgs) -> Result<(), String> {
    let doc_type = DocumentType::from_str(&args.doc_type)
        .ok_or_else(|| format!("unknown document type: {}", args.doc_type))?;

    let text = match (args.text, args.file) {
        (Some(text), _) if !text.trim().is_empty() => text,
        (_, Some(path)) => std::fs::read_to_string(&path)
            .map_err(|err| format!("failed to read {}: {}", path, err))?,
        _ => return Err("missing document text: pass --text or --file".to_string()),
    };

    let checker = DocumentChecker::new();
    let result = checker.verify(&text, doc_type);

    println!(
        "{}: {} (confidence {})",
        doc_type.label(),
        if result.is_valid { "valid" } else { "invalid" },
        format_percent(result.confidence)
    );
    for (field, value) in &result.extracted_fields {
        println!("  {}: {}", field, value.as_deref().unwrap_or("-"));
    }
    if let Some(warning) = result.warning {
        println!("  warning: {}", warning);
    }

    Ok(())
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
