//! Key classification.
//!
//! Translates a raw hardware keycode plus modifier flags into a semantic
//! [`KeyEvent`]. Classification is a pure table lookup with no state; the
//! same raw event always classifies the same way. Mode-toggle chords are
//! detected first and short-circuit ordinary classification.
//!
//! The keycode tables use the macOS ANSI virtual keycodes, which is what
//! the input-method shell receives from the host.

use crate::session::InputMode;

/// Modifier flags captured alongside a raw key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub caps_lock: bool,
    pub control: bool,
    pub option: bool,
    pub command: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::default()
        }
    }

    pub fn option() -> Self {
        Self {
            option: true,
            ..Self::default()
        }
    }

    pub fn control() -> Self {
        Self {
            control: true,
            ..Self::default()
        }
    }

    pub fn command() -> Self {
        Self {
            command: true,
            ..Self::default()
        }
    }

    /// Effective letter-case shift: shift and caps-lock cancel out.
    pub fn case_shifted(&self) -> bool {
        self.shift != self.caps_lock
    }

    /// Whether this is a shortcut chord the host owns (any command or
    /// option combination other than the mode-toggle chords).
    pub fn host_reserved(&self) -> bool {
        self.command || self.option
    }
}

/// Arrow key direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// A classified key event. Produced fresh per raw hardware event and never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Letter(char),
    Digit(u8),
    Punctuation(char),
    Arrow(Direction),
    Enter,
    Backspace,
    Escape,
    Space,
    Tab,
    ToggleInputMode,
    ToggleOutputMode,
}

// macOS ANSI virtual keycodes.
const KC_RETURN: u16 = 0x24;
const KC_TAB: u16 = 0x30;
const KC_SPACE: u16 = 0x31;
const KC_GRAVE: u16 = 0x32;
const KC_BACKSPACE: u16 = 0x33;
const KC_ESCAPE: u16 = 0x35;
const KC_DOWN: u16 = 0x7D;
const KC_UP: u16 = 0x7E;

/// Raw keycode → lowercase letter, for the ANSI letter keys.
fn letter_for(code: u16) -> Option<char> {
    let ch = match code {
        0x00 => 'a',
        0x01 => 's',
        0x02 => 'd',
        0x03 => 'f',
        0x04 => 'h',
        0x05 => 'g',
        0x06 => 'z',
        0x07 => 'x',
        0x08 => 'c',
        0x09 => 'v',
        0x0B => 'b',
        0x0C => 'q',
        0x0D => 'w',
        0x0E => 'e',
        0x0F => 'r',
        0x10 => 'y',
        0x11 => 't',
        0x1F => 'o',
        0x20 => 'u',
        0x22 => 'i',
        0x23 => 'p',
        0x25 => 'l',
        0x26 => 'j',
        0x28 => 'k',
        0x2D => 'n',
        0x2E => 'm',
        _ => return None,
    };
    Some(ch)
}

/// Raw keycode → digit value 0-9.
fn digit_for(code: u16) -> Option<u8> {
    let n = match code {
        0x12 => 1,
        0x13 => 2,
        0x14 => 3,
        0x15 => 4,
        0x17 => 5,
        0x16 => 6,
        0x1A => 7,
        0x1C => 8,
        0x19 => 9,
        0x1D => 0,
        _ => return None,
    };
    Some(n)
}

/// Raw keycode → unshifted punctuation character.
fn punctuation_for(code: u16) -> Option<char> {
    let ch = match code {
        0x18 => '=',
        0x1B => '-',
        0x1E => ']',
        0x21 => '[',
        0x27 => '\'',
        0x29 => ';',
        0x2A => '\\',
        0x2B => ',',
        0x2C => '/',
        0x2F => '.',
        KC_GRAVE => '`',
        _ => return None,
    };
    Some(ch)
}

/// Classify a raw key event into a semantic [`KeyEvent`].
///
/// Returns `None` for keys that carry no meaning to the input method
/// (function keys, plain modifier presses, and so on); the host should
/// process those natively.
///
/// The mode-toggle chords take priority over everything else, including
/// the plain-character reading of the same physical key: option+backtick
/// toggles the input mode and control+backtick toggles the output mode.
/// Shift and caps-lock are folded into letter case here for Manual and
/// Classic modes only; Continuous mode defers case handling to the engine.
pub fn classify(raw_code: u16, modifiers: Modifiers, mode: InputMode) -> Option<KeyEvent> {
    if raw_code == KC_GRAVE {
        if modifiers.option {
            return Some(KeyEvent::ToggleInputMode);
        }
        if modifiers.control {
            return Some(KeyEvent::ToggleOutputMode);
        }
    }

    if let Some(ch) = letter_for(raw_code) {
        let folds_case = matches!(mode, InputMode::Manual | InputMode::Classic);
        let ch = if folds_case && modifiers.case_shifted() {
            ch.to_ascii_uppercase()
        } else {
            ch
        };
        return Some(KeyEvent::Letter(ch));
    }

    if let Some(n) = digit_for(raw_code) {
        return Some(KeyEvent::Digit(n));
    }

    if let Some(ch) = punctuation_for(raw_code) {
        return Some(KeyEvent::Punctuation(ch));
    }

    match raw_code {
        KC_RETURN => Some(KeyEvent::Enter),
        KC_BACKSPACE => Some(KeyEvent::Backspace),
        KC_ESCAPE => Some(KeyEvent::Escape),
        KC_SPACE => Some(KeyEvent::Space),
        KC_TAB => Some(KeyEvent::Tab),
        KC_UP => Some(KeyEvent::Arrow(Direction::Up)),
        KC_DOWN => Some(KeyEvent::Arrow(Direction::Down)),
        _ => None,
    }
}

/// The Classic-mode substitution for a shifted digit key, matching the
/// punctuation the same key produces on a US layout.
pub fn shifted_digit_punctuation(digit: u8) -> Option<char> {
    let ch = match digit {
        1 => '!',
        2 => '@',
        3 => '#',
        4 => '$',
        5 => '%',
        6 => '^',
        7 => '&',
        8 => '*',
        9 => '(',
        0 => ')',
        _ => return None,
    };
    Some(ch)
}
