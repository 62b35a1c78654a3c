//! Manual-mode behavior end to end: verbatim composition, flush-on-boundary
//! keys, and the continuation marker that holds a word open.

mod common;

use common::{fake_engine, keycode, FakeClient, KC_RETURN, KC_SPACE};
use libtaigi_core::{Config, InputController, InputMode, Modifiers};

fn manual_controller() -> (InputController, FakeClient) {
    let config = Config {
        input_mode: InputMode::Manual,
        ..Config::default()
    };
    let (engine, _) = fake_engine(InputMode::Manual);
    let mut controller = InputController::new(config, engine);
    let mut client = FakeClient::new("pad");
    controller.activate(&mut client);
    (controller, client)
}

fn type_str(controller: &mut InputController, client: &mut FakeClient, text: &str) {
    for ch in text.chars() {
        controller.handle_key(keycode(ch), Modifiers::none(), client);
    }
}

#[test]
fn test_letters_compose_verbatim() {
    let (mut controller, mut client) = manual_controller();
    type_str(&mut controller, &mut client, "hello");

    assert!(controller.session().is_edited());
    assert_eq!(client.last_marked(), Some("hello"));
    assert!(client.inserted.is_empty());
}

#[test]
fn test_continuation_key_holds_the_word_open() {
    let (mut controller, mut client) = manual_controller();
    type_str(&mut controller, &mut client, "hel-lo");

    // One composition, no commit.
    assert!(client.inserted.is_empty());
    assert_eq!(controller.session().display_text(), "hel-lo");
}

#[test]
fn test_letter_after_trailing_marker_continues() {
    let (mut controller, mut client) = manual_controller();
    type_str(&mut controller, &mut client, "hel-");
    assert_eq!(controller.session().display_text(), "hel-");

    type_str(&mut controller, &mut client, "l");
    assert_eq!(controller.session().display_text(), "hel-l");
    assert!(client.inserted.is_empty());
}

#[test]
fn test_digit_after_trailing_marker_commits_then_starts_fresh() {
    let (mut controller, mut client) = manual_controller();
    type_str(&mut controller, &mut client, "hel-");

    let handled = controller.handle_key(keycode('9'), Modifiers::none(), &mut client);
    assert!(handled);
    assert_eq!(client.inserted, vec!["hel-"]);
    assert_eq!(controller.session().display_text(), "9");
}

#[test]
fn test_space_flushes_with_trailing_space() {
    let (mut controller, mut client) = manual_controller();
    type_str(&mut controller, &mut client, "ho");

    let handled = controller.handle_key(KC_SPACE, Modifiers::none(), &mut client);
    assert!(handled);
    assert_eq!(client.committed_text(), "ho ");
    assert!(!controller.session().is_edited());
}

#[test]
fn test_punctuation_flushes_with_its_own_character() {
    let (mut controller, mut client) = manual_controller();
    type_str(&mut controller, &mut client, "ho");

    let handled = controller.handle_key(keycode('.'), Modifiers::none(), &mut client);
    assert!(handled);
    assert_eq!(client.committed_text(), "ho.");
}

#[test]
fn test_enter_commits_without_a_newline() {
    let (mut controller, mut client) = manual_controller();
    type_str(&mut controller, &mut client, "ho");

    let handled = controller.handle_key(KC_RETURN, Modifiers::none(), &mut client);
    assert!(handled);
    assert_eq!(client.committed_text(), "ho");
    assert!(!controller.session().is_edited());
}

#[test]
fn test_boundary_keys_pass_through_while_empty() {
    let (mut controller, mut client) = manual_controller();

    assert!(!controller.handle_key(keycode('.'), Modifiers::none(), &mut client));
    assert!(!controller.handle_key(KC_RETURN, Modifiers::none(), &mut client));
    assert!(!controller.handle_key(KC_SPACE, Modifiers::none(), &mut client));
    assert!(client.inserted.is_empty());
    assert!(client.marked.is_empty());
}

#[test]
fn test_host_chord_commits_then_yields_the_key() {
    let (mut controller, mut client) = manual_controller();
    type_str(&mut controller, &mut client, "ho");

    let handled = controller.handle_key(keycode('c'), Modifiers::command(), &mut client);
    assert!(!handled);
    assert_eq!(client.committed_text(), "ho");
    assert!(!controller.session().is_edited());
}

#[test]
fn test_shift_produces_uppercase_letters() {
    let (mut controller, mut client) = manual_controller();
    controller.handle_key(keycode('t'), Modifiers::shift(), &mut client);
    controller.handle_key(keycode('a'), Modifiers::none(), &mut client);

    assert_eq!(controller.session().display_text(), "Ta");
}
