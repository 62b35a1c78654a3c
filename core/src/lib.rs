//! libtaigi-core
//!
//! Input-session state machine for a Taiwanese (Taigi) input method: key
//! classification, per-mode decision tables, the edit session, commit
//! coordination, candidate window placement and the byte-serialized engine
//! gateway. Platform shells adapt their native text client and engine
//! transport to the traits here; everything else is portable.
//!
//! Public API:
//! - `InputController` - Per-session dispatcher tying the pieces together
//! - `EditSession` - Per-keystroke snapshot of the engine's composition
//! - `decide` / `Action` - Pure per-mode decision tables
//! - `EngineHandle` / `EngineGateway` - Byte-serialized engine seam
//! - `TextClient` - Host text-input seam
//! - `Config` - Configuration with TOML load/save

use serde::{Deserialize, Serialize};

pub mod geometry;
pub use geometry::{Point, Rect};

pub mod key_event;
pub use key_event::{classify, Direction, KeyEvent, Modifiers};

pub mod session;
pub use session::{
    Candidate, CandidateList, EditSession, EditState, InputMode, OutputMode, PreeditSegment,
    SegmentStatus,
};

pub mod policy;
pub use policy::{decide, Action, DecisionContext};

pub mod protocol;
pub use protocol::{
    CommandType, EngineSettings, Request, Response, SpecialKey, WireKeyEvent,
};

pub mod engine;
pub use engine::{EngineGateway, EngineHandle, GatewayError};

pub mod client;
pub use client::{ClientBinding, TextClient};

pub mod commit;
pub use commit::commit_current;

pub mod window;
pub use window::{compute_frame, window_height, WindowState};

pub mod controller;
pub use controller::InputController;

pub mod error;
pub use error::{Error, Result};

/// Which modes flush a pending composition into the client on focus loss.
/// Modes outside the scope discard instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusCommitScope {
    /// Only Manual-mode compositions survive a focus change.
    ManualOnly,
    /// Every mode commits what it has (focused candidate or first).
    AllModes,
}

impl Default for FocusCommitScope {
    fn default() -> Self {
        Self::ManualOnly
    }
}

/// Ordering of the shifted-digit punctuation substitution check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubstitutionPrecedence {
    /// Substitute only in Classic mode, regardless of shift.
    ModeBeforeShift,
    /// Substitute whenever shift is held, in any mode.
    ShiftBeforeMode,
}

impl Default for SubstitutionPrecedence {
    fn default() -> Self {
        Self::ModeBeforeShift
    }
}

/// Shell-side configuration.
///
/// Holds only what the controller itself consults; engine-side tuning lives
/// with the engine. Loaded from and saved to TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Input mode restored on session activation.
    pub input_mode: InputMode,

    /// Output ordering restored on session activation.
    pub output_mode: OutputMode,

    /// The key that continues a Manual-mode composition across a word
    /// boundary instead of flushing it.
    pub continuation_key: char,

    /// Which modes commit (rather than discard) on focus loss.
    pub focus_commit: FocusCommitScope,

    /// Shifted-digit substitution ordering.
    pub substitution_precedence: SubstitutionPrecedence,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_mode: InputMode::Continuous,
            output_mode: OutputMode::HanjiFirst,
            continuation_key: '-',
            focus_commit: FocusCommitScope::ManualOnly,
            substitution_precedence: SubstitutionPrecedence::ModeBeforeShift,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
