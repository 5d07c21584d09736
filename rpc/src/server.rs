//! Axum-based RPC server.

use std::future::Future;
use std::sync::Arc;

use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::Router;
use tracing::info;

use votedraw_resolution::ResolutionCoordinator;

use crate::error::RpcError;
use crate::handlers;
use crate::identity::{HeaderVoterResolver, VoterResolver};

/// Header carrying the admin token on `/admin/*` routes.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Shared state behind every handler.
pub struct RpcState {
    pub coordinator: Arc<ResolutionCoordinator>,
    pub resolver: Box<dyn VoterResolver>,
    /// When set, admin routes require a matching `x-admin-token`.
    pub admin_token: Option<String>,
}

impl RpcState {
    pub fn new(coordinator: Arc<ResolutionCoordinator>) -> Self {
        Self {
            coordinator,
            resolver: Box::new(HeaderVoterResolver::default()),
            admin_token: None,
        }
    }

    pub fn with_admin_token(mut self, token: impl Into<String>) -> Self {
        self.admin_token = Some(token.into());
        self
    }

    pub fn with_resolver(mut self, resolver: Box<dyn VoterResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub(crate) fn authorize_admin(&self, headers: &HeaderMap) -> Result<(), RpcError> {
        let Some(expected) = &self.admin_token else {
            return Ok(());
        };
        let presented = headers
            .get(ADMIN_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok());
        if presented == Some(expected.as_str()) {
            Ok(())
        } else {
            Err(RpcError::Unauthorized)
        }
    }
}

/// Build the router over `state`.
pub fn router(state: Arc<RpcState>) -> Router {
    Router::new()
        .route("/choices", get(handlers::get_choices))
        .route("/votes", post(handlers::cast_vote))
        .route("/votes/count", get(handlers::get_vote_count))
        .route("/tally", get(handlers::get_tally))
        .route("/draw", post(handlers::draw))
        .route("/session", get(handlers::get_session))
        .route("/session/seed", get(handlers::get_seed))
        .route("/ledger/export", get(handlers::export_ledger))
        .route("/admin/open", post(handlers::admin_open))
        .route("/admin/close", post(handlers::admin_close))
        .with_state(state)
}

/// The RPC server, configured with a bind address, port and shared state.
pub struct RpcServer {
    pub host: String,
    pub port: u16,
    pub state: Arc<RpcState>,
}

impl RpcServer {
    pub fn new(host: impl Into<String>, port: u16, state: Arc<RpcState>) -> Self {
        Self {
            host: host.into(),
            port,
            state,
        }
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests.
    pub async fn start<F>(&self, shutdown: F) -> Result<(), RpcError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = router(self.state.clone());

        let addr = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| RpcError::Server(format!("bind {addr}: {e}")))?;
        info!("RPC server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| RpcError::Server(e.to_string()))?;
        info!("RPC server stopped");
        Ok(())
    }
}
