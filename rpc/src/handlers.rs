//! RPC request handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use votedraw_ledger::LedgerExport;
use votedraw_resolution::{DrawOutcome, Winner};
use votedraw_types::SessionPhase;

use crate::error::RpcError;
use crate::server::RpcState;

// ── Choices ──────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
pub struct ChoicesResponse {
    pub choices: Vec<String>,
}

pub async fn get_choices(State(state): State<Arc<RpcState>>) -> Json<ChoicesResponse> {
    Json(ChoicesResponse {
        choices: state.coordinator.choices(),
    })
}

// ── Votes ────────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
pub struct VoteCountResponse {
    pub count: u64,
}

pub async fn get_vote_count(State(state): State<Arc<RpcState>>) -> Json<VoteCountResponse> {
    Json(VoteCountResponse {
        count: state.coordinator.vote_count(),
    })
}

#[derive(Serialize, Deserialize)]
pub struct CastVoteRequest {
    /// 0-based index into the choice list.
    pub choice: usize,
}

#[derive(Serialize, Deserialize)]
pub struct CastVoteResponse {
    pub total_votes: u64,
    pub choice: String,
}

pub async fn cast_vote(
    State(state): State<Arc<RpcState>>,
    headers: HeaderMap,
    body: Result<Json<CastVoteRequest>, JsonRejection>,
) -> Result<Json<CastVoteResponse>, RpcError> {
    let voter = state
        .resolver
        .resolve(&headers)
        .ok_or(RpcError::MissingIdentity)?;
    let Json(request) = body.map_err(|e| RpcError::InvalidRequest(e.body_text()))?;

    let total_votes = state.coordinator.cast_vote(&voter, request.choice)?;
    let choice = state
        .coordinator
        .choices()
        .get(request.choice)
        .cloned()
        .unwrap_or_default();
    Ok(Json(CastVoteResponse {
        total_votes,
        choice,
    }))
}

// ── Resolution ───────────────────────────────────────────────────────────

pub async fn draw(State(state): State<Arc<RpcState>>) -> Result<Json<DrawOutcome>, RpcError> {
    Ok(Json(state.coordinator.draw()?))
}

#[derive(Serialize, Deserialize)]
pub struct ChoiceCount {
    pub id: u32,
    pub label: String,
    pub votes: u64,
}

#[derive(Serialize, Deserialize)]
pub struct TallyResponse {
    pub phase: SessionPhase,
    pub total: u64,
    pub counts: Vec<ChoiceCount>,
    /// `None` until the first vote.
    pub winner: Option<Winner>,
}

pub async fn get_tally(State(state): State<Arc<RpcState>>) -> Json<TallyResponse> {
    let snapshot = state.coordinator.snapshot();
    let engine = votedraw_resolution::TallyEngine;
    let tally = engine.tally(&snapshot);
    let counts = snapshot
        .choices()
        .iter()
        .map(|choice| ChoiceCount {
            id: choice.id.as_u32(),
            label: choice.label.clone(),
            votes: tally.get(choice.id).unwrap_or(0),
        })
        .collect();
    Json(TallyResponse {
        phase: snapshot.phase(),
        total: tally.total(),
        counts,
        winner: engine.winner(&snapshot).ok(),
    })
}

// ── Session & audit ──────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
pub struct SessionResponse {
    pub phase: SessionPhase,
    pub vote_count: u64,
    pub choices: Vec<String>,
    pub seed_commitment: Option<String>,
    pub source: String,
}

pub async fn get_session(State(state): State<Arc<RpcState>>) -> Json<SessionResponse> {
    let coordinator = &state.coordinator;
    Json(SessionResponse {
        phase: coordinator.phase(),
        vote_count: coordinator.vote_count(),
        choices: coordinator.choices(),
        seed_commitment: coordinator.seed_commitment().map(|c| c.to_hex()),
        source: coordinator.source_name().to_string(),
    })
}

#[derive(Serialize, Deserialize)]
pub struct SeedResponse {
    pub seed: String,
    pub commitment: Option<String>,
}

pub async fn get_seed(State(state): State<Arc<RpcState>>) -> Result<Json<SeedResponse>, RpcError> {
    let seed = state
        .coordinator
        .revealed_seed()?
        .ok_or_else(|| RpcError::NotFound("randomness source has no seed".into()))?;
    Ok(Json(SeedResponse {
        seed: seed.to_hex(),
        commitment: state.coordinator.seed_commitment().map(|c| c.to_hex()),
    }))
}

pub async fn export_ledger(State(state): State<Arc<RpcState>>) -> Json<LedgerExport> {
    Json(state.coordinator.export())
}

// ── Admin ────────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
pub struct PhaseResponse {
    pub phase: SessionPhase,
}

pub async fn admin_open(
    State(state): State<Arc<RpcState>>,
    headers: HeaderMap,
) -> Result<Json<PhaseResponse>, RpcError> {
    state.authorize_admin(&headers)?;
    state.coordinator.open()?;
    info!("voting opened via rpc");
    Ok(Json(PhaseResponse {
        phase: state.coordinator.phase(),
    }))
}

pub async fn admin_close(
    State(state): State<Arc<RpcState>>,
    headers: HeaderMap,
) -> Result<Json<PhaseResponse>, RpcError> {
    state.authorize_admin(&headers)?;
    state.coordinator.close()?;
    info!(votes = state.coordinator.vote_count(), "voting closed via rpc");
    Ok(Json(PhaseResponse {
        phase: state.coordinator.phase(),
    }))
}
