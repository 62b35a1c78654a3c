//! Shared fakes for the integration suites: a scripted in-process engine
//! gateway and a recording text client.

// Each suite compiles its own copy; not every suite uses every helper.
#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use libtaigi_core::{
    Candidate, CandidateList, CommandType, EditState, EngineGateway, EngineHandle, GatewayError,
    InputMode, Point, PreeditSegment, Rect, Request, Response, SegmentStatus, SpecialKey,
    TextClient, WireKeyEvent,
};

/// Observable state of the scripted engine, shared with the test body.
#[derive(Debug, Default)]
pub struct GatewayState {
    pub buffer: String,
    pub focused: i32,
    pub mode: InputMode,
    pub resets: usize,
    pub commands: Vec<CommandType>,
    /// Fail the next exchange at the transport level.
    pub fail_next: bool,
    /// Answer the next exchange with undecodable bytes.
    pub garbage_next: bool,
}

/// A deterministic engine good enough to exercise the controller: letters
/// accumulate into a buffer, backspace pops, arrows move candidate focus,
/// enter converts and commits. Candidates are fabricated from the buffer
/// (first the uppercased buffer, then the reversed one) so tests can assert
/// exact committed text.
pub struct FakeGateway(Rc<RefCell<GatewayState>>);

pub fn fake_engine(mode: InputMode) -> (EngineHandle, Rc<RefCell<GatewayState>>) {
    let state = Rc::new(RefCell::new(GatewayState {
        focused: -1,
        mode,
        ..GatewayState::default()
    }));
    let handle = EngineHandle::new(Box::new(FakeGateway(state.clone())));
    (handle, state)
}

fn candidates_for(state: &GatewayState) -> CandidateList {
    if state.mode == InputMode::Manual || state.buffer.is_empty() {
        return CandidateList::default();
    }
    CandidateList {
        candidates: vec![
            Candidate::new(state.buffer.to_uppercase(), state.buffer.clone()),
            Candidate::new(
                state.buffer.chars().rev().collect::<String>(),
                state.buffer.clone(),
            ),
        ],
        focused: state.focused,
        page: 0,
    }
}

fn composing(state: &GatewayState) -> Response {
    if state.buffer.is_empty() {
        return Response::empty();
    }
    Response {
        edit_state: EditState::Composing,
        committed: false,
        preedit: vec![PreeditSegment::new(
            state.buffer.clone(),
            SegmentStatus::Composing,
        )],
        candidate_list: candidates_for(state),
    }
}

fn handle_key(state: &mut GatewayState, key: WireKeyEvent) -> Response {
    match key.special_key {
        SpecialKey::None => {
            if let Some(ch) = char::from_u32(key.key_code as u32) {
                state.buffer.push(ch);
            }
            composing(state)
        }
        SpecialKey::Backspace => {
            state.buffer.pop();
            if state.buffer.is_empty() {
                state.focused = -1;
            }
            composing(state)
        }
        SpecialKey::Up => {
            state.focused = (state.focused - 1).max(-1);
            composing(state)
        }
        SpecialKey::Down => {
            state.focused = (state.focused + 1).min(1);
            composing(state)
        }
        SpecialKey::Enter => {
            // Convert and finalize: the committed text is candidate 0's value.
            let text = state.buffer.to_uppercase();
            state.buffer.clear();
            state.focused = -1;
            Response {
                edit_state: EditState::Empty,
                committed: true,
                preedit: vec![PreeditSegment::new(text, SegmentStatus::Converted)],
                candidate_list: CandidateList::default(),
            }
        }
        // Paging is not modelled; the turn changes nothing.
        SpecialKey::Space | SpecialKey::Tab => composing(state),
    }
}

impl EngineGateway for FakeGateway {
    fn send_command(&mut self, request: &[u8]) -> Result<Vec<u8>, GatewayError> {
        let request = Request::decode(request).map_err(|e| GatewayError(e.to_string()))?;
        let mut state = self.0.borrow_mut();

        if state.fail_next {
            state.fail_next = false;
            return Err(GatewayError("injected transport failure".into()));
        }
        if state.garbage_next {
            state.garbage_next = false;
            return Ok(vec![0xFF, 0xFF, 0xFF]);
        }

        state.commands.push(request.command);
        let response = match request.command {
            CommandType::Reset => {
                state.buffer.clear();
                state.focused = -1;
                state.resets += 1;
                Response::empty()
            }
            CommandType::SwitchInputMode => {
                if let Some(settings) = request.settings {
                    state.mode = settings.input_mode;
                }
                state.buffer.clear();
                state.focused = -1;
                Response::empty()
            }
            CommandType::SwitchOutputMode => Response::empty(),
            CommandType::SendKey => {
                let key = request.key_event.unwrap_or_default();
                handle_key(&mut state, key)
            }
        };
        response.encode().map_err(|e| GatewayError(e.to_string()))
    }
}

/// A recording host client.
pub struct FakeClient {
    pub id: String,
    pub marked: Vec<String>,
    pub inserted: Vec<String>,
    pub clear_count: usize,
    pub cursor: Point,
    pub screen: Rect,
}

impl FakeClient {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            marked: Vec::new(),
            inserted: Vec::new(),
            clear_count: 0,
            cursor: Point::new(400.0, 600.0),
            screen: Rect::new(0.0, 0.0, 1920.0, 1080.0),
        }
    }

    pub fn last_marked(&self) -> Option<&str> {
        self.marked.last().map(String::as_str)
    }

    pub fn committed_text(&self) -> String {
        self.inserted.concat()
    }
}

impl TextClient for FakeClient {
    fn client_id(&self) -> String {
        self.id.clone()
    }

    fn mark(&mut self, text: &str) {
        self.marked.push(text.to_string());
    }

    fn insert(&mut self, text: &str) {
        self.inserted.push(text.to_string());
    }

    fn clear_marked_text(&mut self) {
        self.clear_count += 1;
    }

    fn cursor_origin(&self) -> Point {
        self.cursor
    }

    fn screen_visible_frame(&self) -> Rect {
        self.screen
    }
}

/// Raw ANSI keycode for a typed character, for driving the controller the
/// way the host would.
pub fn keycode(ch: char) -> u16 {
    match ch {
        'a' => 0x00,
        's' => 0x01,
        'd' => 0x02,
        'f' => 0x03,
        'h' => 0x04,
        'g' => 0x05,
        'z' => 0x06,
        'x' => 0x07,
        'c' => 0x08,
        'v' => 0x09,
        'b' => 0x0B,
        'q' => 0x0C,
        'w' => 0x0D,
        'e' => 0x0E,
        'r' => 0x0F,
        'y' => 0x10,
        't' => 0x11,
        'o' => 0x1F,
        'u' => 0x20,
        'i' => 0x22,
        'p' => 0x23,
        'l' => 0x25,
        'j' => 0x26,
        'k' => 0x28,
        'n' => 0x2D,
        'm' => 0x2E,
        '1' => 0x12,
        '2' => 0x13,
        '3' => 0x14,
        '4' => 0x15,
        '5' => 0x17,
        '6' => 0x16,
        '7' => 0x1A,
        '8' => 0x1C,
        '9' => 0x19,
        '0' => 0x1D,
        '-' => 0x1B,
        '=' => 0x18,
        ',' => 0x2B,
        '.' => 0x2F,
        '/' => 0x2C,
        ';' => 0x29,
        '`' => 0x32,
        other => panic!("no keycode mapping for {other:?}"),
    }
}

pub const KC_RETURN: u16 = 0x24;
pub const KC_TAB: u16 = 0x30;
pub const KC_SPACE: u16 = 0x31;
pub const KC_GRAVE: u16 = 0x32;
pub const KC_BACKSPACE: u16 = 0x33;
pub const KC_ESCAPE: u16 = 0x35;
pub const KC_DOWN: u16 = 0x7D;
pub const KC_UP: u16 = 0x7E;
