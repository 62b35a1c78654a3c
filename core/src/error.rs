//! Error taxonomy for the input-session controller.
//!
//! No variant is fatal: every failure path degrades to "let the host handle
//! the raw key" so the user can keep typing even with a broken engine.

use thiserror::Error;

/// Failures a single input turn can run into.
#[derive(Debug, Error)]
pub enum Error {
    /// The engine never initialized; every command is a no-op and keys fall
    /// through to the host.
    #[error("engine unavailable")]
    Unavailable,

    /// The request could not be encoded. Treated as unavailable for this
    /// turn only.
    #[error("failed to encode engine request: {0}")]
    Serialize(#[source] bincode::Error),

    /// The response bytes were malformed. The prior session state is kept
    /// and the turn is discarded.
    #[error("failed to decode engine response: {0}")]
    Decode(#[source] bincode::Error),

    /// A commit was attempted with no candidates and no display text.
    #[error("nothing to commit")]
    EmptyCommit,
}

pub type Result<T> = std::result::Result<T, Error>;
