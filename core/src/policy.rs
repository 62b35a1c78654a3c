//! Mode policy.
//!
//! Pure decision table mapping `(mode, key event, edit state)` to an
//! [`Action`]. The dispatcher executes actions; nothing here touches the
//! engine, the session or the host client, which keeps the branching
//! independently testable.
//!
//! Per-mode behavior in brief:
//! - **Manual** treats the composition as transient: any non-letter key
//!   flushes it, with the trailing continuation marker (`-` or `·`) as the
//!   one escape hatch that keeps a composition open across word boundaries.
//! - **Continuous** hands everything to the engine while composing; enter is
//!   an engine command, arrows move candidate focus, space/tab page.
//! - **Classic** behaves like Continuous but is punctuation-heavy: the
//!   engine sees punctuation even with no composition pending, and shifted
//!   digits are remapped through a fixed substitution table.

use crate::key_event::{shifted_digit_punctuation, KeyEvent};
use crate::session::{EditState, InputMode};
use crate::SubstitutionPrecedence;

/// What the dispatcher should do with the current key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Send the key to the engine unchanged.
    Forward,
    /// Send a substituted punctuation character in place of the raw key.
    ForwardSubstituted(char),
    /// Commit the pending composition, then send this key to the engine as
    /// the start of a new composition.
    CommitThenForward,
    /// Commit the pending composition, appending an optional literal suffix,
    /// and consume the key.
    Commit { suffix: Option<char> },
    /// Commit the pending composition, then report the key unhandled so the
    /// host processes it natively.
    CommitThenPassThrough,
    /// Discard the pending composition, then report the key unhandled.
    DiscardThenPassThrough,
    /// Clear the composition, the engine session and any marked text.
    Reset,
    /// Not ours; the host handles the raw key. No state change.
    PassThrough,
    /// Switch input mode, routed through the engine.
    ToggleInputMode,
    /// Switch output mode, routed through the engine.
    ToggleOutputMode,
}

/// Per-keystroke facts the decision table needs beyond the key itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionContext {
    /// Physical shift state of the raw event (for digit substitution; letter
    /// case is already folded by the classifier).
    pub shifted: bool,
    /// The raw event carried a command/option chord the host owns.
    pub host_chord: bool,
    /// The Manual-mode display text currently ends with a continuation
    /// marker.
    pub trailing_continuation: bool,
    /// This key is the designated continuation key.
    pub continuation_key: bool,
    /// Whether the shifted-digit substitution checks shift before or after
    /// the mode.
    pub substitution: SubstitutionPrecedence,
}

fn substitution_applies(mode: InputMode, precedence: SubstitutionPrecedence) -> bool {
    match precedence {
        SubstitutionPrecedence::ShiftBeforeMode => true,
        SubstitutionPrecedence::ModeBeforeShift => mode == InputMode::Classic,
    }
}

/// Decide what to do with one classified key event.
pub fn decide(mode: InputMode, key: KeyEvent, state: EditState, ctx: &DecisionContext) -> Action {
    // Toggles and escape are unconditional, in every mode and state.
    match key {
        KeyEvent::ToggleInputMode => return Action::ToggleInputMode,
        KeyEvent::ToggleOutputMode => return Action::ToggleOutputMode,
        KeyEvent::Escape => return Action::Reset,
        _ => {}
    }

    let composing = state == EditState::Composing;

    // Host-owned shortcut chords never leave stale marked text behind:
    // flush (Manual) or discard (others), then yield the key to the host.
    if ctx.host_chord {
        if composing {
            return match mode {
                InputMode::Manual => Action::CommitThenPassThrough,
                _ => Action::DiscardThenPassThrough,
            };
        }
        return Action::PassThrough;
    }

    // Shifted digits may remap to punctuation before normal handling.
    let (key, substituted) = match key {
        KeyEvent::Digit(n) if ctx.shifted && substitution_applies(mode, ctx.substitution) => {
            match shifted_digit_punctuation(n) {
                Some(ch) => (KeyEvent::Punctuation(ch), Some(ch)),
                None => (key, None),
            }
        }
        _ => (key, None),
    };

    let action = match mode {
        InputMode::Manual => decide_manual(key, composing, ctx),
        InputMode::Continuous => decide_continuous(key, composing),
        InputMode::Classic => decide_classic(key, composing),
    };

    // A substituted character always reaches the engine; the remap bypasses
    // normal digit handling, including the pass-through-while-Empty branch.
    match (action, substituted) {
        (Action::Forward | Action::PassThrough, Some(ch)) => Action::ForwardSubstituted(ch),
        (action, _) => action,
    }
}

fn decide_manual(key: KeyEvent, composing: bool, ctx: &DecisionContext) -> Action {
    match key {
        // Letters always extend the composition; a trailing continuation
        // marker exists precisely to let the next word's letters follow.
        KeyEvent::Letter(_) => Action::Forward,
        KeyEvent::Digit(_) => {
            // After a trailing continuation marker, a digit is unrelated
            // typing: flush the held composition before starting fresh.
            if composing && ctx.trailing_continuation && !ctx.continuation_key {
                Action::CommitThenForward
            } else {
                Action::Forward
            }
        }
        KeyEvent::Punctuation(ch) => {
            if !composing {
                Action::PassThrough
            } else if ctx.continuation_key {
                Action::Forward
            } else {
                Action::Commit { suffix: Some(ch) }
            }
        }
        KeyEvent::Enter | KeyEvent::Arrow(_) => {
            if composing {
                Action::Commit { suffix: None }
            } else {
                Action::PassThrough
            }
        }
        KeyEvent::Space => {
            if composing {
                Action::Commit { suffix: Some(' ') }
            } else {
                Action::PassThrough
            }
        }
        KeyEvent::Tab => {
            if composing {
                Action::Commit { suffix: Some('\t') }
            } else {
                Action::PassThrough
            }
        }
        KeyEvent::Backspace => {
            if composing {
                Action::Forward
            } else {
                Action::PassThrough
            }
        }
        // Escape and the toggles were handled up front.
        _ => Action::PassThrough,
    }
}

fn decide_continuous(key: KeyEvent, composing: bool) -> Action {
    match key {
        KeyEvent::Letter(_) | KeyEvent::Digit(_) => Action::Forward,
        KeyEvent::Punctuation(_)
        | KeyEvent::Enter
        | KeyEvent::Space
        | KeyEvent::Tab
        | KeyEvent::Arrow(_)
        | KeyEvent::Backspace => {
            if composing {
                Action::Forward
            } else {
                Action::PassThrough
            }
        }
        _ => Action::PassThrough,
    }
}

fn decide_classic(key: KeyEvent, composing: bool) -> Action {
    match key {
        KeyEvent::Letter(_) | KeyEvent::Digit(_) => Action::Forward,
        // Classic is punctuation-heavy: the engine sees punctuation even
        // with nothing composing.
        KeyEvent::Punctuation(_) => Action::Forward,
        KeyEvent::Enter
        | KeyEvent::Space
        | KeyEvent::Tab
        | KeyEvent::Arrow(_)
        | KeyEvent::Backspace => {
            if composing {
                Action::Forward
            } else {
                Action::PassThrough
            }
        }
        _ => Action::PassThrough,
    }
}
