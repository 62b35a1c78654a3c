//! Commit coordination.
//!
//! Executing a decided commit touches four things that must move together:
//! the host client receives the final text, the engine session is reset, the
//! local edit session is cleared, and the candidate window collapses. The
//! whole sequence is one logical unit; no other key handling may interleave.

use tracing::debug;

use crate::client::TextClient;
use crate::engine::EngineHandle;
use crate::error::{Error, Result};
use crate::session::{EditSession, InputMode};
use crate::window::WindowState;

/// Commit the current composition.
///
/// Manual mode commits the display text verbatim; Continuous and Classic
/// commit the focused candidate, falling back to the first when none is
/// focused. `suffix` is appended literally to the committed text (Manual
/// mode carries the flushing key's own character through, e.g. a space).
///
/// Returns [`Error::EmptyCommit`] with no state change when there is
/// nothing to commit.
pub fn commit_current(
    mode: InputMode,
    session: &mut EditSession,
    client: &mut dyn TextClient,
    engine: &mut EngineHandle,
    window: &mut WindowState,
    suffix: Option<char>,
) -> Result<()> {
    let mut text = match mode {
        InputMode::Manual => session.display_text(),
        InputMode::Continuous | InputMode::Classic => match session.candidates().commit_candidate()
        {
            Some(candidate) => candidate.value.clone(),
            None => return Err(Error::EmptyCommit),
        },
    };

    if text.is_empty() {
        return Err(Error::EmptyCommit);
    }

    if let Some(ch) = suffix {
        text.push(ch);
    }

    debug!(%text, ?mode, "committing composition");

    client.insert(&text);
    if let Err(e) = engine.reset() {
        // The local session still clears; an unreachable engine has no
        // composition left to desynchronize from.
        debug!("engine reset after commit failed: {e}");
    }
    session.clear();
    window.hide();
    Ok(())
}
