use actix_web::http::{Method, StatusCode};
use actix_web::web::Bytes;
use actix_web::HttpResponse;
use serde_json::Value;

pub(crate) const ALLOW_ORIGIN: (&str, &str) = ("Access-Control-Allow-Origin", "*");
pub(crate) const JSON_CONTENT: (&str, &str) = ("Content-Type", "application/json");

#[derive(Debug, Clone)]
pub struct FunctionRequest {
    pub method: Method,
    pub body: Bytes,
}

impl FunctionRequest {
    pub fn new(method: Method, body: impl Into<Bytes>) -> Self {
        Self {
            method,
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionResponse {
    pub status: StatusCode,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

impl FunctionResponse {
    pub fn json(status: StatusCode, headers: &[(&'static str, &str)], body: &Value) -> Self {
        Self {
            status,
            headers: owned(headers),
            body: body.to_string(),
        }
    }

    pub fn empty(status: StatusCode, headers: &[(&'static str, &str)]) -> Self {
        Self {
            status,
            headers: owned(headers),
            body: String::new(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json_body(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.body)
    }
}

fn owned(headers: &[(&'static str, &str)]) -> Vec<(&'static str, String)> {
    headers
        .iter()
        .map(|(name, value)| (*name, value.to_string()))
        .collect()
}

impl From<FunctionResponse> for HttpResponse {
    fn from(response: FunctionResponse) -> Self {
        let mut builder = HttpResponse::build(response.status);
        for (name, value) in response.headers {
            builder.insert_header((name, value));
        }
        builder.body(response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn header_lookup_ignores_case() {
        let response = FunctionResponse::json(
            StatusCode::OK,
            &[ALLOW_ORIGIN, JSON_CONTENT],
            &json!({ "ok": true }),
        );
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.header("x-missing"), None);
        assert_eq!(response.json_body().unwrap(), json!({ "ok": true }));
    }

    #[test]
    fn converts_into_http_response() {
        let response = FunctionResponse::empty(StatusCode::NO_CONTENT, &[ALLOW_ORIGIN]);
        let http: HttpResponse = response.into();
        assert_eq!(http.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            http.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }
}
