//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, content lookup and player input
//! so clients can bubble them up with consistent context.

use battle_content::CatalogError;
use battle_core::SubmitError;
use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("player action provider not set")]
    ProviderNotSet,

    #[error("player action provider failed: {0}")]
    Provider(String),

    #[error("battle worker command channel closed")]
    CommandChannelClosed,

    #[error("battle worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("battle worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error(transparent)]
    Content(#[from] CatalogError),
}
