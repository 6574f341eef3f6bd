#![allow(dead_code)]

use axum::body::Body;
use axum::http::Request;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

/// Unsigned token carrying `claims`; the gateway only decodes the payload.
pub fn bearer(claims: serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("Bearer {header}.{payload}.signature")
}

pub struct TestRequest<'a> {
    pub uri: &'a str,
    pub authorization: Option<String>,
    pub origin_service: Option<&'a str>,
    pub user_info: Option<&'a str>,
}

impl<'a> TestRequest<'a> {
    pub fn get(uri: &'a str) -> Self {
        Self {
            uri,
            authorization: None,
            origin_service: None,
            user_info: None,
        }
    }

    pub fn bearer(mut self, claims: serde_json::Value) -> Self {
        self.authorization = Some(bearer(claims));
        self
    }

    pub fn authorization(mut self, value: &str) -> Self {
        self.authorization = Some(value.to_string());
        self
    }

    pub fn origin(mut self, service: &'a str) -> Self {
        self.origin_service = Some(service);
        self
    }

    pub fn user_info(mut self, value: &'a str) -> Self {
        self.user_info = Some(value);
        self
    }

    pub fn build(self) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(self.uri);
        if let Some(value) = self.authorization {
            builder = builder.header("authorization", value);
        }
        if let Some(value) = self.origin_service {
            builder = builder.header("x-origin-service", value);
        }
        if let Some(value) = self.user_info {
            builder = builder.header("x-user-info", value);
        }
        builder.body(Body::empty()).expect("request")
    }
}
