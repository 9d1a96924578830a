use std::sync::Arc;

use actix_web::http::{Method, StatusCode};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::Instrument;

use crate::error::SubscribeError;
use crate::fetcher::{HttpFetcher, OutboundRequest};
use crate::functions::common::{ALLOW_ORIGIN, JSON_CONTENT};
use crate::functions::{Function, FunctionRequest, FunctionResponse};

const CORS_HEADERS: [(&str, &str); 4] = [
    ALLOW_ORIGIN,
    ("Access-Control-Allow-Headers", "Content-Type"),
    ("Access-Control-Allow-Methods", "POST, OPTIONS"),
    JSON_CONTENT,
];

const UTM_SOURCE: &str = "wc26-pwa";
const UTM_MEDIUM: &str = "gate";

#[derive(Debug, Clone)]
pub struct SubscriptionConfig {
    pub api_key: Option<String>,
    pub publication_id: Option<String>,
    pub base_url: String,
}

impl SubscriptionConfig {
    fn credentials(&self) -> Option<(&str, &str)> {
        let api_key = self.api_key.as_deref().filter(|key| !key.is_empty())?;
        let publication_id = self.publication_id.as_deref().filter(|id| !id.is_empty())?;
        Some((api_key, publication_id))
    }
}

/// Forwards a validated email address to the newsletter provider.
pub struct SubscriptionHandler {
    fetcher: Arc<dyn HttpFetcher>,
    config: SubscriptionConfig,
    span: tracing::Span,
}

impl SubscriptionHandler {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, config: SubscriptionConfig) -> Self {
        Self {
            fetcher,
            config,
            span: tracing::info_span!("function", name = "subscribe"),
        }
    }

    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = span;
        self
    }

    pub async fn handle(&self, request: FunctionRequest) -> FunctionResponse {
        let span = self.span.clone();
        async move {
            if request.method == Method::OPTIONS {
                return FunctionResponse::empty(StatusCode::OK, &CORS_HEADERS);
            }

            match self.subscribe(&request).await {
                Ok(()) => {
                    FunctionResponse::json(StatusCode::OK, &CORS_HEADERS, &json!({ "success": true }))
                }
                Err(err) => {
                    let status = err.status_code();
                    if status.is_server_error() {
                        tracing::error!("subscription failed: {}", err);
                    } else {
                        tracing::warn!("subscription rejected: {}", err);
                    }
                    FunctionResponse::json(status, &CORS_HEADERS, &err.body())
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn subscribe(&self, request: &FunctionRequest) -> Result<(), SubscribeError> {
        if request.method != Method::POST {
            return Err(SubscribeError::MethodNotAllowed);
        }

        let email = parse_email(&request.body)?;
        let (api_key, publication_id) = self
            .config
            .credentials()
            .ok_or(SubscribeError::Configuration)?;

        let url = format!(
            "{}/v2/publications/{}/subscriptions",
            self.config.base_url.trim_end_matches('/'),
            publication_id
        );
        let outbound = OutboundRequest::post(
            url,
            json!({
                "email": email,
                "reactivate_existing": false,
                "send_welcome_email": true,
                "utm_source": UTM_SOURCE,
                "utm_medium": UTM_MEDIUM,
            }),
        )
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {}", api_key));

        let response = self.fetcher.fetch(outbound).await?;
        if response.is_success() {
            tracing::info!("subscribed new address");
            return Ok(());
        }

        let body = serde_json::from_slice::<Value>(&response.body).unwrap_or_else(|_| json!({}));
        tracing::error!("provider error {}: {}", response.status, body);
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
            .map(str::to_string);

        Err(SubscribeError::Provider {
            status: response.status,
            message,
        })
    }
}

#[async_trait]
impl Function for SubscriptionHandler {
    fn name(&self) -> &'static str {
        "subscribe"
    }

    async fn invoke(&self, request: FunctionRequest) -> FunctionResponse {
        self.handle(request).await
    }
}

fn parse_email(body: &[u8]) -> Result<String, SubscribeError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| SubscribeError::InvalidBody)?;
    if value.is_null() {
        return Err(SubscribeError::InvalidBody);
    }

    let email = value
        .get("email")
        .and_then(Value::as_str)
        .ok_or(SubscribeError::InvalidEmail)?;
    if !is_valid_email(email) {
        return Err(SubscribeError::InvalidEmail);
    }

    Ok(email.to_string())
}

/// Structural check only: `local@domain.tld` with no whitespace and a single `@`.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let clean = |part: &str| {
        !part.is_empty() && !part.contains(|c: char| c.is_whitespace() || c == '@')
    };

    clean(local)
        && clean(domain)
        && domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}
