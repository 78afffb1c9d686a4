//! Integration test support for Tradewinds identity resolution.
//!
//! Provides [`SellerStub`], a scripted stand-in for the users service
//! bound to an ephemeral port, so the seller-status resolver can be
//! exercised end-to-end over real HTTP without a running backend.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tradewinds-integration-tests
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::json;
use tokio::sync::oneshot;
use url::Url;

use tradewinds_identity::IdentityConfig;

/// Scripted answer for one email address.
#[derive(Debug, Clone)]
pub enum SellerAnswer {
    /// 200 with a well-formed `{"isSeller": bool}` body.
    Registered(bool),
    /// 200 with a body that is not the wire format.
    Malformed,
    /// 500 with no body.
    ServerError,
    /// Well-formed answer, but only after the given delay.
    Slow(bool, Duration),
}

struct StubState {
    answers: HashMap<String, SellerAnswer>,
    requests: AtomicUsize,
}

/// A users-service stub serving `GET /users/seller/{email}`.
///
/// Binds to an ephemeral port on startup; shuts down gracefully when
/// dropped. Emails not present in the answer table get a 404.
pub struct SellerStub {
    addr: SocketAddr,
    state: Arc<StubState>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl SellerStub {
    /// Start the stub with a scripted answer table.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot bind; tests have no recovery path.
    pub async fn start<I, K>(answers: I) -> Self
    where
        I: IntoIterator<Item = (K, SellerAnswer)>,
        K: Into<String>,
    {
        let state = Arc::new(StubState {
            answers: answers
                .into_iter()
                .map(|(email, answer)| (email.into(), answer))
                .collect(),
            requests: AtomicUsize::new(0),
        });

        let router = Router::new()
            .route("/users/seller/{email}", get(seller_status))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind stub listener");
        let addr = listener.local_addr().expect("stub has no local address");

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("stub server failed");
        });

        Self {
            addr,
            state,
            shutdown: Some(shutdown_tx),
        }
    }

    /// Base URL the resolver should be pointed at.
    ///
    /// # Panics
    ///
    /// Panics if the bound address does not form a valid URL (it always
    /// does).
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).expect("stub address forms a valid URL")
    }

    /// An [`IdentityConfig`] pointing at this stub.
    #[must_use]
    pub fn config(&self) -> IdentityConfig {
        IdentityConfig {
            seller_api_base_url: self.base_url(),
            ..IdentityConfig::default()
        }
    }

    /// How many seller-status requests the stub has served.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }
}

impl Drop for SellerStub {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

async fn seller_status(
    State(state): State<Arc<StubState>>,
    Path(email): Path<String>,
) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    let Some(answer) = state.answers.get(&email).cloned() else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match answer {
        SellerAnswer::Registered(is_seller) => {
            Json(json!({ "isSeller": is_seller })).into_response()
        }
        SellerAnswer::Malformed => Json(json!({ "unexpected": "shape" })).into_response(),
        SellerAnswer::ServerError => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        SellerAnswer::Slow(is_seller, delay) => {
            tokio::time::sleep(delay).await;
            Json(json!({ "isSeller": is_seller })).into_response()
        }
    }
}

/// Initialize test logging from `RUST_LOG`; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tradewinds_identity=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

/// Poll until `predicate` holds, panicking after `timeout`.
///
/// # Panics
///
/// Panics with `what` in the message if the deadline passes first.
pub async fn eventually<F>(predicate: F, timeout: Duration, what: &str)
where
    F: Fn() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while !predicate() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for: {what}"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
