use std::sync::Arc;

use actix_web::http::StatusCode;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};
use tracing::Instrument;

use crate::cache::{CacheStatus, MatchCache, MatchPayload};
use crate::error::UpstreamError;
use crate::fetcher::{HttpFetcher, OutboundRequest};
use crate::functions::common::{ALLOW_ORIGIN, JSON_CONTENT};
use crate::functions::{Function, FunctionRequest, FunctionResponse};

#[derive(Debug, Clone)]
pub struct FootballConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub competition: String,
}

impl FootballConfig {
    fn url(&self, resource: &str) -> String {
        format!(
            "{}/competitions/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.competition,
            resource
        )
    }
}

/// Serves fixtures and standings, refreshing from the provider at most once
/// per TTL window and falling back to the last payload when the provider is
/// down.
pub struct MatchDataHandler {
    fetcher: Arc<dyn HttpFetcher>,
    config: FootballConfig,
    cache: Arc<MatchCache>,
    cache_control: String,
    span: tracing::Span,
}

impl MatchDataHandler {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, config: FootballConfig, cache: Arc<MatchCache>) -> Self {
        let cache_control = format!("public, max-age={}", cache.ttl().num_seconds());
        Self {
            fetcher,
            config,
            cache,
            cache_control,
            span: tracing::info_span!("function", name = "matches"),
        }
    }

    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = span;
        self
    }

    pub fn cache(&self) -> &Arc<MatchCache> {
        &self.cache
    }

    pub async fn handle(&self) -> FunctionResponse {
        self.serve(Utc::now()).instrument(self.span.clone()).await
    }

    async fn serve(&self, now: DateTime<Utc>) -> FunctionResponse {
        let previous = match self.cache.lookup(now) {
            CacheStatus::Fresh(payload) => {
                tracing::info!("cache hit, serving match data from {}", payload.fetched_at);
                return self.respond(StatusCode::OK, &annotate(&payload, Some("cached")));
            }
            CacheStatus::Expired(payload) => Some(payload),
            CacheStatus::Empty => None,
        };

        tracing::info!("cache missed, refreshing match data");
        let err = match self.refresh(now).await {
            Ok(payload) => return self.respond(StatusCode::OK, &annotate(&payload, None)),
            Err(err) => err,
        };

        tracing::error!("failed to refresh match data: {}", err);
        match previous {
            Some(payload) => {
                tracing::warn!("serving stale match data from {}", payload.fetched_at);
                self.respond(StatusCode::OK, &annotate(&payload, Some("stale")))
            }
            None => self.respond(
                StatusCode::INTERNAL_SERVER_ERROR,
                &json!({
                    "error": "Failed to fetch match data",
                    "detail": err.to_string(),
                }),
            ),
        }
    }

    async fn refresh(&self, now: DateTime<Utc>) -> Result<Arc<MatchPayload>, UpstreamError> {
        let mut fixtures = self.fetch_json("matches").await?;
        if !fixtures.is_object() {
            return Err(UpstreamError::Shape("fixtures body is not an object"));
        }

        // Standings only exist once the group stage has started.
        let standings = match self.fetch_json("standings").await {
            Ok(mut body) => body.get_mut("standings").map(Value::take).filter(is_present),
            Err(err) => {
                tracing::warn!("standings unavailable: {}", err);
                None
            }
        };

        let matches = match fixtures.get_mut("matches").map(Value::take) {
            Some(Value::Array(matches)) => matches,
            _ => vec![],
        };

        let payload = MatchPayload {
            matches,
            standings,
            fetched_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        tracing::info!("refreshed match data with {} matches", payload.matches.len());

        Ok(self.cache.store(payload, now))
    }

    async fn fetch_json(&self, resource: &str) -> Result<Value, UpstreamError> {
        let mut request = OutboundRequest::get(self.config.url(resource));
        if let Some(api_key) = &self.config.api_key {
            request = request.header("X-Auth-Token", api_key.as_str());
        }

        let response = self.fetcher.fetch(request).await?;
        if !response.is_success() {
            return Err(UpstreamError::status(response.status));
        }

        Ok(serde_json::from_slice(&response.body)?)
    }

    fn respond(&self, status: StatusCode, body: &Value) -> FunctionResponse {
        FunctionResponse::json(
            status,
            &[
                ALLOW_ORIGIN,
                JSON_CONTENT,
                ("Cache-Control", self.cache_control.as_str()),
            ],
            body,
        )
    }
}

#[async_trait]
impl Function for MatchDataHandler {
    fn name(&self) -> &'static str {
        "matches"
    }

    async fn invoke(&self, _request: FunctionRequest) -> FunctionResponse {
        self.handle().await
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn annotate(payload: &MatchPayload, flag: Option<&str>) -> Value {
    let mut body = json!({
        "matches": payload.matches,
        "standings": payload.standings,
        "fetchedAt": payload.fetched_at,
    });
    if let (Some(flag), Some(object)) = (flag, body.as_object_mut()) {
        object.insert(flag.to_string(), Value::Bool(true));
    }
    body
}
