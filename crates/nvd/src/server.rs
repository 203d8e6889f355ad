//! HTTP API: field encrypt/decrypt endpoints plus health and metrics.
//!
//! Endpoints:
//!   POST /api/encrypt  — { data: string | [string] } → { encrypted }
//!   POST /api/decrypt  — { data: string | [string] } → { decrypted }
//!   GET  /healthz      — liveness probe
//!   GET  /readyz       — readiness probe (key material self-test)
//!   GET  /metrics      — Prometheus text format
//!
//! Batch decrypt never fails per item — bad records come back as the
//! fallback sentinel so a list view stays renderable. Single-item
//! decrypt and every encrypt shape fail loudly instead.

use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use prometheus_client::{encoding::text::encode, registry::Registry};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

use nv_core::config::NvConfig;
use nv_crypto::{decrypt_field, encrypt_field, DECRYPT_SENTINEL};
use nv_session::{decrypt_batch, encrypt_batch, KeyProvider, MasterKeyProvider};

use crate::metrics::FieldMetrics;

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<MasterKeyProvider>,
    pub metrics: FieldMetrics,
    pub registry: Arc<Registry>,
}

/// Request body for both endpoints: one field value or an ordered batch.
#[derive(Debug, Deserialize)]
struct CryptoRequest {
    data: Option<Payload>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Payload {
    One(String),
    Many(Vec<String>),
}

pub async fn run(config: NvConfig, provider: MasterKeyProvider) -> Result<()> {
    let mut registry = Registry::default();
    let metrics = FieldMetrics::new(&mut registry);

    let state = AppState {
        provider: Arc::new(provider),
        metrics,
        registry: Arc::new(registry),
    };

    let listener = tokio::net::TcpListener::bind(&config.server.listen)
        .await
        .map_err(|e| anyhow::anyhow!("bind {}: {e}", config.server.listen))?;

    info!(addr = %config.server.listen, "nvd: listening");

    axum::serve(listener, router(state))
        .await
        .map_err(|e| anyhow::anyhow!("server: {e}"))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/encrypt", post(encrypt_handler))
        .route("/api/decrypt", post(decrypt_handler))
        .route("/healthz", get(healthz_handler))
        .route("/readyz", get(readyz_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

async fn encrypt_handler(
    State(state): State<AppState>,
    Json(req): Json<CryptoRequest>,
) -> Response {
    let Some(data) = req.data else {
        return missing_data();
    };

    match data {
        Payload::One(text) => {
            let result = state
                .provider
                .field_key()
                .and_then(|key| encrypt_field(&text, &key));
            match result {
                Ok(encrypted) => {
                    state.metrics.fields_encrypted.inc();
                    (StatusCode::OK, Json(json!({ "encrypted": encrypted }))).into_response()
                }
                Err(e) => {
                    state.metrics.encrypt_failures.inc();
                    error!(error = %e, "field encryption failed");
                    internal_error("encryption failed", &e)
                }
            }
        }
        Payload::Many(texts) => match encrypt_batch(&texts, state.provider.as_ref()).await {
            Ok(encrypted) => {
                state.metrics.fields_encrypted.inc_by(encrypted.len() as u64);
                (StatusCode::OK, Json(json!({ "encrypted": encrypted }))).into_response()
            }
            Err(e) => {
                state.metrics.encrypt_failures.inc();
                error!(items = texts.len(), error = %e, "batch encryption failed");
                internal_error("encryption failed", &e)
            }
        },
    }
}

async fn decrypt_handler(
    State(state): State<AppState>,
    Json(req): Json<CryptoRequest>,
) -> Response {
    let Some(data) = req.data else {
        return missing_data();
    };

    match data {
        Payload::One(text) => {
            let result = state
                .provider
                .field_key()
                .and_then(|key| decrypt_field(&text, &key));
            match result {
                Ok(decrypted) => {
                    state.metrics.fields_decrypted.inc();
                    (StatusCode::OK, Json(json!({ "decrypted": decrypted }))).into_response()
                }
                Err(e) => {
                    // Log the shape of the failure, never the data
                    state.metrics.decrypt_failures.inc();
                    if e.is_recoverable_read() {
                        warn!(len = text.len(), error = %e, "field decryption failed");
                    } else {
                        error!(error = %e, "decrypt rejected before reaching the cipher");
                    }
                    internal_error("decryption failed", &e)
                }
            }
        }
        Payload::Many(texts) => {
            let decrypted = decrypt_batch(&texts, state.provider.as_ref()).await;

            let failed = decrypted
                .iter()
                .filter(|value| value.as_str() == DECRYPT_SENTINEL)
                .count() as u64;
            state.metrics.decrypt_failures.inc_by(failed);
            state
                .metrics
                .fields_decrypted
                .inc_by(decrypted.len() as u64 - failed);

            (StatusCode::OK, Json(json!({ "decrypted": decrypted }))).into_response()
        }
    }
}

/// Liveness probe: returns 200 if the process is running.
async fn healthz_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Readiness probe: round-trips a probe value through the master key.
async fn readyz_handler(State(state): State<AppState>) -> impl IntoResponse {
    let probe = "nvd-readyz-probe";
    let ok = state
        .provider
        .field_key()
        .and_then(|key| {
            let stored = encrypt_field(probe, &key)?;
            decrypt_field(&stored, &key)
        })
        .map(|plaintext| plaintext == probe)
        .unwrap_or(false);

    if ok {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "key material unusable")
    }
}

async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut body = String::new();
    match encode(&mut body, &state.registry) {
        Ok(()) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4")],
            body,
        ),
        Err(e) => {
            error!("metrics encode failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                e.to_string(),
            )
        }
    }
}

fn missing_data() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "missing 'data' field" })),
    )
        .into_response()
}

fn internal_error(label: &str, e: &nv_crypto::CryptoError) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": label, "message": e.to_string() })),
    )
        .into_response()
}
