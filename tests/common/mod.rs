#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};
use tower::ServiceExt;

use lifedrop_api::auth::{Claims, JwtVerifier};
use lifedrop_api::config::{IdentityConfig, ListingConfig, SecurityConfig};
use lifedrop_api::database::models::Role;
use lifedrop_api::database::{Collection, DocumentId, DocumentStore, MemoryStore};
use lifedrop_api::services::{
    PaymentError, PaymentGateway, PaymentIntent, Permissive, StatusTransitionPolicy,
};
use lifedrop_api::{app, AppState};

pub const SECRET: &str = "integration-test-secret";

/// Payment gateway that never leaves the process.
#[derive(Default)]
pub struct FakeGateway {
    pub calls: AtomicUsize,
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_intent(&self, amount: Decimal) -> Result<PaymentIntent, PaymentError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(PaymentIntent {
            id: Some(format!("pi_test_{}", n)),
            client_secret: format!("pi_test_{}_secret_{}", n, amount),
        })
    }
}

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub payments: Arc<FakeGateway>,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_transitions(Arc::new(Permissive))
    }

    pub fn with_transitions(transitions: Arc<dyn StatusTransitionPolicy>) -> Self {
        let store = Arc::new(MemoryStore::new());
        let payments = Arc::new(FakeGateway::default());
        let state = AppState {
            store: store.clone(),
            verifier: Arc::new(JwtVerifier::new(&IdentityConfig {
                jwt_secret: SECRET.to_string(),
                issuer: None,
                audience: None,
            })),
            payments: payments.clone(),
            transitions,
            listing: ListingConfig { default_limit: 10 },
        };
        let router = app(state, &SecurityConfig { cors_origins: vec![] });
        Self {
            store,
            payments,
            router,
        }
    }

    /// Insert an account directly, bypassing the API.
    pub async fn seed_account(&self, email: &str, role: Role) -> Result<DocumentId> {
        self.seed(
            Collection::Users,
            json!({
                "email": email,
                "name": email.split('@').next().unwrap_or(email),
                "role": role,
                "status": "active",
                "createdAt": "2024-01-01T00:00:00.000Z"
            }),
        )
        .await
    }

    pub async fn seed(&self, collection: Collection, body: Value) -> Result<DocumentId> {
        let body: Map<String, Value> = body.as_object().cloned().context("seed body must be an object")?;
        Ok(self.store.insert_one(collection, body).await?)
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        Ok((status, value))
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, uri, token, None).await
    }
}

/// Sign a token the test verifier accepts.
pub fn token_for(email: &str) -> String {
    sign(email, Duration::hours(1), SECRET)
}

pub fn sign(email: &str, expires_in: Duration, secret: &str) -> String {
    let now = Utc::now();
    let claims = Claims {
        sub: format!("uid-{}", email),
        email: Some(email.to_string()),
        name: Some("Test User".to_string()),
        exp: (now + expires_in).timestamp(),
        iat: Some(now.timestamp()),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .expect("failed to sign test token")
}
