//! Engine wire protocol.
//!
//! The conversion engine is an opaque external collaborator reached through
//! a byte-serialized request/response exchange. The types here describe that
//! exchange; the bytes themselves are produced and consumed with bincode.
//!
//! A request carries a command tag and a payload (a key event, or the full
//! mode configuration on a switch). A response carries the engine's new view
//! of the session: edit state, committed flag, ordered preedit segments and
//! the candidate list.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::session::{CandidateList, EditState, InputMode, OutputMode, PreeditSegment};

/// Command tag for an engine request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandType {
    /// Drop the engine-side composition.
    Reset,
    /// Feed one key event into the composition.
    SendKey,
    /// Install a new input mode (full settings payload).
    SwitchInputMode,
    /// Install a new output mode (full settings payload).
    SwitchOutputMode,
}

/// Non-printing keys the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialKey {
    None,
    Space,
    Enter,
    Backspace,
    Tab,
    Up,
    Down,
}

impl Default for SpecialKey {
    fn default() -> Self {
        Self::None
    }
}

/// Key payload for a `SendKey` request. Exactly one of `key_code` (printable
/// ASCII) or `special_key` is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WireKeyEvent {
    pub key_code: i32,
    pub special_key: SpecialKey,
}

impl WireKeyEvent {
    pub fn char_key(ch: char) -> Self {
        Self {
            key_code: ch as i32,
            special_key: SpecialKey::None,
        }
    }

    pub fn special(key: SpecialKey) -> Self {
        Self {
            key_code: 0,
            special_key: key,
        }
    }
}

/// The full mode configuration carried on a switch request, so the engine's
/// composition rules always match the shell's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineSettings {
    pub input_mode: InputMode,
    pub output_mode: OutputMode,
}

/// A single engine request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: u32,
    pub command: CommandType,
    pub key_event: Option<WireKeyEvent>,
    pub settings: Option<EngineSettings>,
}

impl Request {
    pub fn reset(id: u32) -> Self {
        Self {
            id,
            command: CommandType::Reset,
            key_event: None,
            settings: None,
        }
    }

    pub fn send_key(id: u32, key: WireKeyEvent) -> Self {
        Self {
            id,
            command: CommandType::SendKey,
            key_event: Some(key),
            settings: None,
        }
    }

    pub fn switch_input_mode(id: u32, settings: EngineSettings) -> Self {
        Self {
            id,
            command: CommandType::SwitchInputMode,
            key_event: None,
            settings: Some(settings),
        }
    }

    pub fn switch_output_mode(id: u32, settings: EngineSettings) -> Self {
        Self {
            id,
            command: CommandType::SwitchOutputMode,
            key_event: None,
            settings: Some(settings),
        }
    }

    /// Encode to wire bytes.
    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        bincode::serialize(self).map_err(Error::Serialize)
    }

    /// Decode from wire bytes. Used by engine-side test doubles.
    pub fn decode(bytes: &[u8]) -> Result<Self, Error> {
        bincode::deserialize(bytes).map_err(Error::Decode)
    }
}

/// The engine's answer for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Response {
    pub edit_state: EditState,
    pub committed: bool,
    pub preedit: Vec<PreeditSegment>,
    pub candidate_list: CandidateList,
}

impl Response {
    /// The empty response an engine returns after a reset.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        bincode::serialize(self).map_err(Error::Serialize)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, Error> {
        bincode::deserialize(bytes).map_err(Error::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Candidate, SegmentStatus};

    #[test]
    fn test_request_wire_round_trip() {
        let req = Request::send_key(7, WireKeyEvent::char_key('h'));
        let bytes = req.encode().unwrap();
        let back = Request::decode(&bytes).unwrap();
        assert_eq!(back, req);
    }

    #[test]
    fn test_switch_mode_carries_full_settings() {
        let req = Request::switch_input_mode(
            1,
            EngineSettings {
                input_mode: InputMode::Manual,
                output_mode: OutputMode::LomajiFirst,
            },
        );
        assert_eq!(req.command, CommandType::SwitchInputMode);
        let settings = req.settings.unwrap();
        assert_eq!(settings.input_mode, InputMode::Manual);
        assert_eq!(settings.output_mode, OutputMode::LomajiFirst);
    }

    #[test]
    fn test_response_decode_rejects_garbage() {
        let err = Response::decode(&[0xFF; 3]).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_response_round_trip() {
        let resp = Response {
            edit_state: EditState::Composing,
            committed: false,
            preedit: vec![PreeditSegment::new("ho", SegmentStatus::Composing)],
            candidate_list: CandidateList {
                candidates: vec![Candidate::new("好", "ho")],
                focused: 0,
                page: 0,
            },
        };
        let bytes = resp.encode().unwrap();
        assert_eq!(Response::decode(&bytes).unwrap(), resp);
    }
}
