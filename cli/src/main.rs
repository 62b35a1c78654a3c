//! Interactive harness for the input-session state machine.
//!
//! Runs the controller against an in-process demo engine and a stdout text
//! client, so the per-mode behavior can be exercised without a platform
//! shell. Each line of input is replayed as key events; the end of the line
//! acts as the enter key.

use std::io::{self, BufRead};

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use libtaigi_core::{
    CommandType, Config, EditState, EngineGateway, EngineHandle, GatewayError, InputController,
    InputMode, Modifiers, Point, PreeditSegment, Rect, Request, Response, SegmentStatus,
    SpecialKey, TextClient, WireKeyEvent,
};
use libtaigi_core::{Candidate, CandidateList};

const KC_RETURN: u16 = 0x24;
const KC_SPACE: u16 = 0x31;
const KC_GRAVE: u16 = 0x32;
const KC_BACKSPACE: u16 = 0x33;

#[derive(Parser)]
#[command(name = "taigi-repl", about = "Replay typed lines through the input controller")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Start in manual (verbatim) mode regardless of configuration.
    #[arg(long)]
    manual: bool,
}

/// A tiny built-in lexicon so conversion has something to convert.
const LEXICON: &[(&str, &str)] = &[
    ("ho", "好"),
    ("bo", "無"),
    ("li", "你"),
    ("gua", "我"),
    ("chiah", "食"),
    ("taigi", "台語"),
];

fn lookup(lomaji: &str) -> Option<&'static str> {
    LEXICON
        .iter()
        .find(|(key, _)| *key == lomaji)
        .map(|(_, value)| *value)
}

/// In-process demo engine: letters accumulate, enter converts through the
/// built-in lexicon, unknown words fall back to the raw buffer.
#[derive(Default)]
struct DemoGateway {
    buffer: String,
    mode: InputMode,
}

impl DemoGateway {
    fn composing(&self) -> Response {
        if self.buffer.is_empty() {
            return Response::empty();
        }
        let candidate_list = if self.mode == InputMode::Manual {
            CandidateList::default()
        } else {
            let mut candidates = Vec::new();
            if let Some(hanji) = lookup(&self.buffer) {
                candidates.push(Candidate::new(hanji.to_string(), self.buffer.clone()));
            }
            candidates.push(Candidate::new(self.buffer.clone(), self.buffer.clone()));
            CandidateList {
                candidates,
                focused: -1,
                page: 0,
            }
        };
        Response {
            edit_state: EditState::Composing,
            committed: false,
            preedit: vec![PreeditSegment::new(
                self.buffer.clone(),
                SegmentStatus::Composing,
            )],
            candidate_list,
        }
    }

    fn handle_key(&mut self, key: WireKeyEvent) -> Response {
        match key.special_key {
            SpecialKey::None => {
                if let Some(ch) = char::from_u32(key.key_code as u32) {
                    self.buffer.push(ch);
                }
                self.composing()
            }
            SpecialKey::Backspace => {
                self.buffer.pop();
                self.composing()
            }
            SpecialKey::Enter => {
                let text = lookup(&self.buffer)
                    .map(str::to_string)
                    .unwrap_or_else(|| self.buffer.clone());
                self.buffer.clear();
                Response {
                    edit_state: EditState::Empty,
                    committed: true,
                    preedit: vec![PreeditSegment::new(text, SegmentStatus::Converted)],
                    candidate_list: CandidateList::default(),
                }
            }
            _ => self.composing(),
        }
    }
}

impl EngineGateway for DemoGateway {
    fn send_command(&mut self, request: &[u8]) -> std::result::Result<Vec<u8>, GatewayError> {
        let request = Request::decode(request).map_err(|e| GatewayError(e.to_string()))?;
        let response = match request.command {
            CommandType::Reset => {
                self.buffer.clear();
                Response::empty()
            }
            CommandType::SwitchInputMode => {
                if let Some(settings) = request.settings {
                    self.mode = settings.input_mode;
                }
                self.buffer.clear();
                Response::empty()
            }
            CommandType::SwitchOutputMode => Response::empty(),
            CommandType::SendKey => {
                let key = request.key_event.unwrap_or_default();
                self.handle_key(key)
            }
        };
        response.encode().map_err(|e| GatewayError(e.to_string()))
    }
}

/// Text client that narrates what a host document would see.
#[derive(Default)]
struct ReplClient {
    marked: String,
}

impl TextClient for ReplClient {
    fn client_id(&self) -> String {
        "repl".to_string()
    }

    fn mark(&mut self, text: &str) {
        self.marked = text.to_string();
    }

    fn insert(&mut self, text: &str) {
        println!("committed: {text}");
        self.marked.clear();
    }

    fn clear_marked_text(&mut self) {
        self.marked.clear();
    }

    fn cursor_origin(&self) -> Point {
        Point::new(0.0, 800.0)
    }

    fn screen_visible_frame(&self) -> Rect {
        Rect::new(0.0, 0.0, 1920.0, 1080.0)
    }
}

/// Raw ANSI keycode plus shift state for one typed character.
fn keystroke_for(ch: char) -> Option<(u16, Modifiers)> {
    if ch == ' ' {
        return Some((KC_SPACE, Modifiers::none()));
    }
    let (base, shifted) = match ch {
        'A'..='Z' => (ch.to_ascii_lowercase(), true),
        '!' => ('1', true),
        '@' => ('2', true),
        '#' => ('3', true),
        '$' => ('4', true),
        '%' => ('5', true),
        '^' => ('6', true),
        '&' => ('7', true),
        '*' => ('8', true),
        '(' => ('9', true),
        ')' => ('0', true),
        _ => (ch, false),
    };
    let code = match base {
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
        '\'' => 0x27,
        '[' => 0x21,
        ']' => 0x1E,
        '\\' => 0x2A,
        '`' => KC_GRAVE,
        _ => return None,
    };
    let modifiers = if shifted {
        Modifiers::shift()
    } else {
        Modifiers::none()
    };
    Some((code, modifiers))
}

fn describe(controller: &InputController) {
    let session = controller.session();
    if !session.is_edited() {
        return;
    }
    println!("composing: {}", session.display_text());
    let list = session.candidates();
    for (index, candidate) in list.candidates.iter().enumerate() {
        let marker = if index as i32 == list.focused { ">" } else { " " };
        println!("  {marker} {}. {} ({})", index + 1, candidate.value, candidate.annotation);
    }
    if controller.window().is_visible() {
        let frame = controller.window().frame();
        println!(
            "  window at ({}, {}) {}x{}",
            frame.origin.x, frame.origin.y, frame.width, frame.height
        );
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => Config::load_toml(path).map_err(|e| anyhow::anyhow!("{e}"))?,
        None => Config::default(),
    };
    if args.manual {
        config.input_mode = InputMode::Manual;
    }

    let engine = EngineHandle::new(Box::<DemoGateway>::default());
    let mut controller = InputController::new(config, engine);
    let mut client = ReplClient::default();
    controller.activate(&mut client);
    info!(mode = ?controller.input_mode(), "session activated");

    println!("type text; end of line commits. :mode cycles modes, :reset clears, :quit exits");
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        match line.trim() {
            ":quit" | ":q" => break,
            ":reset" => {
                controller.reset(&mut client);
                continue;
            }
            ":mode" => {
                controller.handle_key(KC_GRAVE, Modifiers::option(), &mut client);
                println!("input mode: {:?}", controller.input_mode());
                continue;
            }
            ":back" => {
                controller.handle_key(KC_BACKSPACE, Modifiers::none(), &mut client);
                describe(&controller);
                continue;
            }
            _ => {}
        }

        for ch in line.chars() {
            if let Some((code, modifiers)) = keystroke_for(ch) {
                controller.handle_key(code, modifiers, &mut client);
            }
        }
        describe(&controller);
        controller.handle_key(KC_RETURN, Modifiers::none(), &mut client);
    }

    controller.deactivate(&mut client);
    Ok(())
}
