//! Edit session state.
//!
//! The `EditSession` is the authoritative per-keystroke snapshot of what the
//! engine last told us: edit state, committed flag, preedit segments and the
//! candidate list. It is replaced wholesale after every successful engine
//! round-trip and cleared on reset; no partial mutation API is exposed, so a
//! turn is atomic from the session's point of view.

use serde::{Deserialize, Serialize};

use crate::protocol::Response;

/// The three mutually exclusive input modes.
///
/// Switching is an explicit user action (toggle chord or menu) and is always
/// routed through the engine so its composition rules stay in step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputMode {
    /// Compose verbatim romanization; flush on any non-letter key.
    Manual,
    /// Convert continuously; the engine owns candidate focus and paging.
    Continuous,
    /// Legacy punctuation-heavy behavior.
    Classic,
}

impl Default for InputMode {
    fn default() -> Self {
        Self::Continuous
    }
}

/// Output ordering preference, toggled through the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputMode {
    /// Prefer the target script (hanji) in candidates.
    HanjiFirst,
    /// Prefer the transliteration (lomaji) in candidates.
    LomajiFirst,
}

impl Default for OutputMode {
    fn default() -> Self {
        Self::HanjiFirst
    }
}

/// Whether the engine holds a pending composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditState {
    Empty,
    Composing,
}

impl Default for EditState {
    fn default() -> Self {
        Self::Empty
    }
}

/// Advisory styling status for a preedit segment. Carries no control-flow
/// weight in the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentStatus {
    Unmarked,
    Composing,
    Converted,
    Focused,
}

impl Default for SegmentStatus {
    fn default() -> Self {
        Self::Unmarked
    }
}

/// One segment of the engine's preedit. Concatenating segment text in order
/// yields the string marked in the host text client.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreeditSegment {
    pub text: String,
    pub status: SegmentStatus,
}

impl PreeditSegment {
    pub fn new<T: Into<String>>(text: T, status: SegmentStatus) -> Self {
        Self {
            text: text.into(),
            status,
        }
    }
}

/// A conversion candidate offered by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Candidate {
    pub value: String,
    pub annotation: String,
}

impl Candidate {
    pub fn new<T: Into<String>>(value: T, annotation: T) -> Self {
        Self {
            value: value.into(),
            annotation: annotation.into(),
        }
    }
}

/// The candidate list for the current turn. Replaced wholesale each engine
/// turn, never mutated incrementally.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CandidateList {
    pub candidates: Vec<Candidate>,
    /// Focused candidate index; −1 means no explicit focus.
    pub focused: i32,
    /// Current page, 0-based.
    pub page: u32,
}

impl CandidateList {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// The explicitly focused candidate, if any.
    pub fn focused_candidate(&self) -> Option<&Candidate> {
        if self.focused < 0 {
            return None;
        }
        self.candidates.get(self.focused as usize)
    }

    /// The candidate a commit should take: the focused one, falling back to
    /// the first when nothing is focused.
    pub fn commit_candidate(&self) -> Option<&Candidate> {
        let index = if self.focused < 0 {
            0
        } else {
            self.focused as usize
        };
        self.candidates.get(index)
    }
}

/// Per-keystroke snapshot of the engine's view of the composition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditSession {
    edit_state: EditState,
    committed: bool,
    preedit: Vec<PreeditSegment>,
    candidates: CandidateList,
}

impl EditSession {
    /// Create an empty session, as on session activation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole session state with the latest engine response.
    ///
    /// An Empty edit state carries no composition: any preedit or
    /// candidates on such a response are dropped here, except that a
    /// committed response keeps its preedit so the final text can be
    /// consumed. Candidates never survive an Empty state.
    pub fn apply(&mut self, response: Response) {
        self.edit_state = response.edit_state;
        self.committed = response.committed;
        if response.edit_state == EditState::Empty {
            self.preedit = if response.committed {
                response.preedit
            } else {
                Vec::new()
            };
            self.candidates = CandidateList::default();
        } else {
            self.preedit = response.preedit;
            self.candidates = response.candidate_list;
        }
    }

    /// Clear back to the empty state. Idempotent.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether the engine holds a pending composition.
    pub fn is_edited(&self) -> bool {
        self.edit_state != EditState::Empty
    }

    /// Whether the latest response finalized the composition. A committed
    /// response must be consumed exactly once and never rendered as marked
    /// text.
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    pub fn edit_state(&self) -> EditState {
        self.edit_state
    }

    pub fn preedit(&self) -> &[PreeditSegment] {
        &self.preedit
    }

    pub fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    /// The string shown to the user: preedit segment text concatenated in
    /// order.
    pub fn display_text(&self) -> String {
        let mut buffer = String::new();
        for segment in &self.preedit {
            buffer.push_str(&segment.text);
        }
        buffer
    }
}
