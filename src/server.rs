use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::{net::SocketAddr, sync::Arc};

use crate::ai::{fallback_validation, AiValidator};
use crate::api::{ApiAnalyzeRequest, ApiAnalyzeResponse, ApiVerifyRequest, ApiVerifyResponse};
use crate::faceit::FaceitClient;
use crate::twitter::TwitterClient;
use fanscore::{
    analyze_profile, stable_document_id, AnalysisError, DocumentChecker, DocumentType,
    EngagementMetrics, Platform, ProfileTexts,
};

#[derive(Clone)]
struct AppState {
    config: Arc<fanscore::config::ScoringConfig>,
    checker: Arc<DocumentChecker>,
    twitter: Option<TwitterClient>,
    faceit: Option<FaceitClient>,
    ai: Option<AiValidator>,
}

pub async fn serve(args: crate::ServeArgs) -> Result<(), String> {
    let (config, config_path) = fanscore::config::ScoringConfig::load(None)?;
    if let Some(path) = config_path.as_ref() {
        tracing::info!(path = %path.display(), "scoring config loaded");
    }

    let state = AppState {
        config: Arc::new(config),
        checker: Arc::new(DocumentChecker::new()),
        twitter: TwitterClient::from_env(),
        faceit: FaceitClient::from_env(),
        ai: AiValidator::from_env(None),
    };

    if state.twitter.is_none() {
        tracing::warn!("TWITTER_BEARER_TOKEN not set, Twitter metrics fetch disabled");
    }
    if state.faceit.is_none() {
        tracing::warn!("FACEIT_API_KEY not set, FACEIT metrics fetch disabled");
    }

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/analyze", post(analyze_handler))
        .route("/api/verify-document", post(verify_handler))
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|err| format!("invalid bind address: {}", err))?;
    tracing::info!(%addr, "listening");

    axum::serve(
        tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|err| format!("failed to bind server: {}", err))?,
        app,
    )
    .await
    .map_err(|err| format!("server error: {}", err))?;

    Ok(())
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

async fn analyze_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiAnalyzeRequest>,
) -> Result<Json<ApiAnalyzeResponse>, (StatusCode, String)> {
    let (signal, options) = request
        .into_signal()
        .map_err(|err| (StatusCode::BAD_REQUEST, err.to_string()))?;

    tracing::info!(platform = signal.platform.label(), username = %signal.username, "analyze request");

    let mut warnings = Vec::new();
    let mut texts: Option<ProfileTexts> = None;

    // Manual metrics win over a live fetch; a failed fetch degrades to
    // neutral metrics instead of failing the request.
    let metrics: Option<EngagementMetrics> = if let Some(manual) = options.manual_metrics.clone() {
        Some(manual)
    } else if options.fetch_metrics {
        match fetch_metrics(&state, &signal.platform, &signal.username).await {
            Ok((fetched, fetched_texts)) => {
                texts = fetched_texts;
                Some(fetched)
            }
            Err(err) if err.is_recoverable() => {
                tracing::warn!(error = %err, "metrics fetch failed, degrading to neutral metrics");
                warnings.push(err.to_string());
                None
            }
            Err(err) => return Err((StatusCode::BAD_GATEWAY, err.to_string())),
        }
    } else {
        None
    };

    let ai_validation = if options.use_ai {
        match &state.ai {
            Some(validator) => {
                match validator
                    .validate_profile(
                        signal.platform,
                        &signal.username,
                        &signal.profile_url,
                        &signal.favorite_games,
                    )
                    .await
                {
                    Ok(validation) => Some(validation),
                    Err(err) => {
                        tracing::warn!(error = %err, "AI validation failed, using fallback");
                        warnings.push(format!("AI validation degraded: {}", err));
                        Some(fallback_validation(signal.platform, &signal.favorite_games))
                    }
                }
            }
            None => {
                warnings.push("AI validation not configured: set OPENAI_API_KEY".to_string());
                None
            }
        }
    } else {
        None
    };

    let result = analyze_profile(&signal, metrics.as_ref(), texts.as_ref(), &state.config)
        .map_err(|err| (StatusCode::BAD_REQUEST, err.to_string()))?;

    Ok(Json(ApiAnalyzeResponse::from_result(
        &signal,
        result,
        ai_validation,
        warnings,
    )))
}

async fn fetch_metrics(
    state: &AppState,
    platform: &Platform,
    username: &str,
) -> Result<(EngagementMetrics, Option<ProfileTexts>), AnalysisError> {
    match platform {
        Platform::Twitter => {
            let client = state.twitter.as_ref().ok_or_else(|| {
                AnalysisError::UpstreamFetch("Twitter client not configured".to_string())
            })?;
            let (metrics, texts) = client.fetch_engagement(username).await?;
            Ok((metrics, Some(texts)))
        }
        Platform::Faceit => {
            let client = state.faceit.as_ref().ok_or_else(|| {
                AnalysisError::UpstreamFetch("FACEIT client not configured".to_string())
            })?;
            let metrics = client.fetch_engagement(username).await?;
            Ok((metrics, None))
        }
        other => Err(AnalysisError::UpstreamFetch(format!(
            "no metrics source available for {}",
            other.label()
        ))),
    }
}

async fn verify_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiVerifyRequest>,
) -> Result<Json<ApiVerifyResponse>, (StatusCode, String)> {
    let doc_type = DocumentType::from_str(&request.document_type).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            format!("unknown document type: {}", request.document_type),
        )
    })?;

    let text = match (request.text, request.base64) {
        (Some(text), _) if !text.trim().is_empty() => text,
        (_, Some(encoded)) => {
            let bytes = BASE64.decode(encoded.trim()).map_err(|err| {
                (
                    StatusCode::BAD_REQUEST,
                    format!("invalid base64 payload: {}", err),
                )
            })?;
            String::from_utf8(bytes).map_err(|err| {
                (
                    StatusCode::BAD_REQUEST,
                    format!("base64 payload is not UTF-8 text: {}", err),
                )
            })?
        }
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                "either text or base64 is required".to_string(),
            ))
        }
    };

    tracing::info!(doc_type = doc_type.label(), chars = text.chars().count(), "verify request");

    let result = state.checker.verify(&text, doc_type);
    let document_id = stable_document_id(doc_type, &text);
    Ok(Json(ApiVerifyResponse::from_result(document_id, result)))
}
