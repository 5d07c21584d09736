//! Resolution of the caller's voter identity.
//!
//! Authentication happens upstream (a gateway, a wallet provider). By the
//! time a request reaches this server the identity is a trusted token in a
//! request header.

use axum::http::header::HeaderName;
use axum::http::HeaderMap;

use votedraw_types::VoterId;

/// Maps an incoming request to the voter it acts for.
pub trait VoterResolver: Send + Sync {
    fn resolve(&self, headers: &HeaderMap) -> Option<VoterId>;
}

/// Reads the identity from a header (`x-voter-id` by default).
pub struct HeaderVoterResolver {
    header: HeaderName,
}

impl HeaderVoterResolver {
    pub const DEFAULT_HEADER: &'static str = "x-voter-id";

    pub fn new(header: HeaderName) -> Self {
        Self { header }
    }
}

impl Default for HeaderVoterResolver {
    fn default() -> Self {
        Self::new(HeaderName::from_static(Self::DEFAULT_HEADER))
    }
}

impl VoterResolver for HeaderVoterResolver {
    fn resolve(&self, headers: &HeaderMap) -> Option<VoterId> {
        let raw = headers.get(&self.header)?.to_str().ok()?.trim();
        if raw.is_empty() {
            None
        } else {
            Some(VoterId::new(raw))
        }
    }
}
