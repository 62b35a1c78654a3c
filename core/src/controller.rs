//! Input controller.
//!
//! The dispatcher that ties the pieces together, one key event at a time:
//! classify the raw event, ask the mode policy for an action, execute it
//! against the engine and the host client, then bring the marked text and
//! the candidate window back in sync with the new session state.
//!
//! Everything is synchronous and serial. A key event is handled to
//! completion, including the engine round-trip, before the next one is
//! accepted; focus changes arrive serially too and flush any pending
//! composition before the controller rebinds.

use tracing::debug;

use crate::client::{ClientBinding, TextClient};
use crate::commit::commit_current;
use crate::engine::EngineHandle;
use crate::key_event::{classify, Direction, KeyEvent, Modifiers};
use crate::policy::{decide, Action, DecisionContext};
use crate::protocol::{EngineSettings, SpecialKey, WireKeyEvent};
use crate::session::{EditSession, InputMode, OutputMode};
use crate::window::{compute_frame, WindowState};
use crate::{Config, FocusCommitScope};

/// Characters that mark a deliberate continuation at the end of a
/// Manual-mode composition.
const CONTINUATION_MARKERS: [char; 2] = ['-', '·'];

fn ends_with_continuation(text: &str) -> bool {
    text.chars()
        .last()
        .map(|ch| CONTINUATION_MARKERS.contains(&ch))
        .unwrap_or(false)
}

/// The character a key event would contribute, for continuation-key
/// comparison against the configured mapping.
fn key_char(key: KeyEvent) -> Option<char> {
    match key {
        KeyEvent::Letter(ch) | KeyEvent::Punctuation(ch) => Some(ch),
        KeyEvent::Digit(n) => char::from_digit(n as u32, 10),
        _ => None,
    }
}

/// Wire representation of a key event, when it has one. Escape and the
/// toggles are never forwarded as keys.
fn wire_key(key: KeyEvent) -> Option<WireKeyEvent> {
    let wire = match key {
        KeyEvent::Letter(ch) | KeyEvent::Punctuation(ch) => WireKeyEvent::char_key(ch),
        KeyEvent::Digit(n) => WireKeyEvent::char_key(char::from_digit(n as u32, 10)?),
        KeyEvent::Enter => WireKeyEvent::special(SpecialKey::Enter),
        KeyEvent::Space => WireKeyEvent::special(SpecialKey::Space),
        KeyEvent::Tab => WireKeyEvent::special(SpecialKey::Tab),
        KeyEvent::Backspace => WireKeyEvent::special(SpecialKey::Backspace),
        KeyEvent::Arrow(Direction::Up) => WireKeyEvent::special(SpecialKey::Up),
        KeyEvent::Arrow(Direction::Down) => WireKeyEvent::special(SpecialKey::Down),
        KeyEvent::Escape | KeyEvent::ToggleInputMode | KeyEvent::ToggleOutputMode => return None,
    };
    Some(wire)
}

/// The input-session controller for one input-method session.
pub struct InputController {
    config: Config,
    input_mode: InputMode,
    output_mode: OutputMode,
    session: EditSession,
    engine: EngineHandle,
    window: WindowState,
    binding: Option<ClientBinding>,
}

impl InputController {
    /// Build a controller around an explicit engine handle. The handle is
    /// constructed once at process start; there is no global engine state.
    pub fn new(config: Config, engine: EngineHandle) -> Self {
        let input_mode = config.input_mode;
        let output_mode = config.output_mode;
        Self {
            config,
            input_mode,
            output_mode,
            session: EditSession::new(),
            engine,
            window: WindowState::new(),
            binding: None,
        }
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn window(&self) -> &WindowState {
        &self.window
    }

    pub fn is_manual_mode(&self) -> bool {
        self.input_mode == InputMode::Manual
    }

    fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            input_mode: self.input_mode,
            output_mode: self.output_mode,
        }
    }

    /// Begin a session against a newly focused client.
    pub fn activate(&mut self, client: &mut dyn TextClient) {
        self.input_mode = self.config.input_mode;
        self.output_mode = self.config.output_mode;
        self.session.clear();
        self.window.hide();
        if let Err(e) = self.engine.reset() {
            debug!("engine reset on activate failed: {e}");
        }
        if let Err(e) = self.engine.switch_input_mode(self.engine_settings()) {
            debug!("pushing configured modes to engine failed: {e}");
        }
        self.binding = Some(ClientBinding::of(client));
    }

    /// End the session for the currently bound client, flushing any pending
    /// composition into it first.
    pub fn deactivate(&mut self, client: &mut dyn TextClient) {
        if self.session.is_edited() {
            let commits = match self.config.focus_commit {
                FocusCommitScope::ManualOnly => self.input_mode == InputMode::Manual,
                FocusCommitScope::AllModes => true,
            };
            if commits {
                if let Err(e) = self.commit(client, None) {
                    debug!("flush on deactivate failed: {e}");
                    self.reset(client);
                }
            } else {
                self.reset(client);
            }
        }
        self.window.hide();
        self.binding = None;
    }

    /// Replace the configuration, pushing the configured modes to the
    /// engine so the two sides stay matched.
    pub fn reload_config(&mut self, config: Config) {
        self.config = config;
        self.input_mode = self.config.input_mode;
        self.output_mode = self.config.output_mode;
        if let Err(e) = self.engine.switch_input_mode(self.engine_settings()) {
            debug!("pushing reloaded modes to engine failed: {e}");
        }
    }

    /// Reset the session: engine, local state, marked text and window.
    ///
    /// Returns whether there was any state to drop. Idempotent; an engine
    /// reset is issued only on an actual state change, so back-to-back
    /// calls cost one reset, not two.
    pub fn reset(&mut self, client: &mut dyn TextClient) -> bool {
        if self.session == EditSession::new() && !self.window.is_visible() {
            return false;
        }
        self.session.clear();
        if let Err(e) = self.engine.reset() {
            debug!("engine reset failed: {e}");
        }
        client.clear_marked_text();
        self.window.hide();
        true
    }

    /// Handle one raw key event against the focused client.
    ///
    /// Returns `true` when the event was consumed; `false` hands it back to
    /// the host for native processing.
    pub fn handle_key(
        &mut self,
        raw_code: u16,
        modifiers: Modifiers,
        client: &mut dyn TextClient,
    ) -> bool {
        // No engine, no conversion: fall back to plain typing.
        if !self.engine.is_available() {
            return false;
        }

        self.rebind_if_changed(client);
        if let Some(binding) = self.binding.as_mut() {
            binding.cursor_origin = client.cursor_origin();
        }

        let key = match classify(raw_code, modifiers, self.input_mode) {
            Some(key) => key,
            None => {
                // Unknown keys never leave stale marked text behind either.
                if modifiers.host_reserved() && self.session.is_edited() {
                    self.flush_for_host(client);
                }
                return false;
            }
        };

        let host_chord = modifiers.host_reserved()
            && !matches!(key, KeyEvent::ToggleInputMode | KeyEvent::ToggleOutputMode);

        let ctx = DecisionContext {
            shifted: modifiers.shift,
            host_chord,
            trailing_continuation: ends_with_continuation(&self.session.display_text()),
            continuation_key: key_char(key) == Some(self.config.continuation_key),
            substitution: self.config.substitution_precedence,
        };

        let action = decide(self.input_mode, key, self.session.edit_state(), &ctx);
        debug!(?key, ?action, mode = ?self.input_mode, "dispatching key");
        self.execute(action, key, client)
    }

    fn execute(&mut self, action: Action, key: KeyEvent, client: &mut dyn TextClient) -> bool {
        match action {
            Action::Forward => self.forward(key, None, client),
            Action::ForwardSubstituted(ch) => self.forward(key, Some(ch), client),
            Action::CommitThenForward => {
                if let Err(e) = self.commit(client, None) {
                    debug!("forced commit failed: {e}");
                }
                self.forward(key, None, client)
            }
            Action::Commit { suffix } => match self.commit(client, suffix) {
                Ok(()) => true,
                Err(e) => {
                    debug!("commit failed: {e}");
                    false
                }
            },
            Action::CommitThenPassThrough => {
                if let Err(e) = self.commit(client, None) {
                    debug!("flush before host chord failed: {e}");
                }
                false
            }
            Action::DiscardThenPassThrough => {
                self.reset(client);
                false
            }
            // Escape with nothing composing belongs to the host.
            Action::Reset => self.reset(client),
            Action::PassThrough => false,
            Action::ToggleInputMode => self.toggle_input_mode(client),
            Action::ToggleOutputMode => self.toggle_output_mode(client),
        }
    }

    /// Forward one key to the engine and absorb the response. A failed turn
    /// is a no-op: the prior session survives and the key is reported
    /// unhandled.
    fn forward(
        &mut self,
        key: KeyEvent,
        substituted: Option<char>,
        client: &mut dyn TextClient,
    ) -> bool {
        let wire = match substituted {
            Some(ch) => Some(WireKeyEvent::char_key(ch)),
            None => wire_key(key),
        };
        let Some(wire) = wire else {
            return false;
        };

        match self.engine.send_key(wire) {
            Ok(response) => {
                self.session.apply(response);
                self.sync_turn(client);
                true
            }
            Err(e) => {
                debug!("engine turn discarded: {e}");
                false
            }
        }
    }

    /// Reconcile the host client with the session state after an engine
    /// turn: consume a committed response exactly once, or re-mark the
    /// composition and reposition the window.
    fn sync_turn(&mut self, client: &mut dyn TextClient) {
        if self.session.is_committed() {
            // Never render a committed response as marked text.
            let text = self.session.display_text();
            if !text.is_empty() {
                client.insert(&text);
            }
            self.session.clear();
            if let Err(e) = self.engine.reset() {
                debug!("engine reset after committed response failed: {e}");
            }
            self.window.hide();
            return;
        }

        if self.session.is_edited() {
            client.mark(&self.session.display_text());
            if self.session.candidates().is_empty() {
                self.window.hide();
            } else {
                let origin = self
                    .binding
                    .as_ref()
                    .map(|binding| binding.cursor_origin)
                    .unwrap_or_else(|| client.cursor_origin());
                self.window
                    .show_at(compute_frame(origin, client.screen_visible_frame()));
            }
        } else {
            client.clear_marked_text();
            self.window.hide();
        }
    }

    fn commit(
        &mut self,
        client: &mut dyn TextClient,
        suffix: Option<char>,
    ) -> crate::error::Result<()> {
        commit_current(
            self.input_mode,
            &mut self.session,
            client,
            &mut self.engine,
            &mut self.window,
            suffix,
        )
    }

    /// Flush a pending composition before yielding a host-owned chord:
    /// Manual commits, the other modes discard.
    fn flush_for_host(&mut self, client: &mut dyn TextClient) {
        if self.input_mode == InputMode::Manual {
            if let Err(e) = self.commit(client, None) {
                debug!("flush before host chord failed: {e}");
            }
        } else {
            self.reset(client);
        }
    }

    fn toggle_input_mode(&mut self, client: &mut dyn TextClient) -> bool {
        self.reset(client);
        let next = match self.input_mode {
            InputMode::Manual => InputMode::Continuous,
            InputMode::Continuous => InputMode::Classic,
            InputMode::Classic => InputMode::Manual,
        };
        self.set_input_mode(next)
    }

    /// Switch to an explicit input mode, telling the engine first. The mode
    /// only changes locally once the engine has acknowledged the switch.
    pub fn set_input_mode(&mut self, mode: InputMode) -> bool {
        let settings = EngineSettings {
            input_mode: mode,
            output_mode: self.output_mode,
        };
        match self.engine.switch_input_mode(settings) {
            Ok(_) => {
                self.input_mode = mode;
                debug!(?mode, "input mode switched");
                true
            }
            Err(e) => {
                debug!("input mode switch refused: {e}");
                false
            }
        }
    }

    fn toggle_output_mode(&mut self, client: &mut dyn TextClient) -> bool {
        self.reset(client);
        let next = match self.output_mode {
            OutputMode::HanjiFirst => OutputMode::LomajiFirst,
            OutputMode::LomajiFirst => OutputMode::HanjiFirst,
        };
        let settings = EngineSettings {
            input_mode: self.input_mode,
            output_mode: next,
        };
        match self.engine.switch_output_mode(settings) {
            Ok(_) => {
                self.output_mode = next;
                debug!(?next, "output mode switched");
                true
            }
            Err(e) => {
                debug!("output mode switch refused: {e}");
                false
            }
        }
    }

    /// Bind to `client` if focus has moved since the last event.
    ///
    /// The previous client's composition is flushed by `deactivate` before
    /// the host delivers events for a new client; anything still pending at
    /// this point can no longer reach the old client and is discarded so
    /// the engine and the session stay matched.
    fn rebind_if_changed(&mut self, client: &mut dyn TextClient) {
        let id = client.client_id();
        if let Some(binding) = &self.binding {
            if binding.client_id == id {
                return;
            }
        }
        if self.session.is_edited() {
            self.session.clear();
            if let Err(e) = self.engine.reset() {
                debug!("engine reset on rebind failed: {e}");
            }
        }
        self.window.hide();
        self.binding = Some(ClientBinding::of(client));
    }
}
