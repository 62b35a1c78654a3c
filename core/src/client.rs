//! Host text client seam.
//!
//! Exactly one client is bound at a time. The controller talks to it through
//! the [`TextClient`] trait: marked (uncommitted) text, final insertion, and
//! the caret position used for window placement. Platform shells adapt their
//! native text-input object to this trait; tests use a recording fake.

use crate::geometry::{Point, Rect};

/// The host text-input client the controller is currently talking to.
pub trait TextClient {
    /// Stable identifier for this client, used to detect focus changes.
    fn client_id(&self) -> String;

    /// Show `text` as the uncommitted (marked) composition.
    fn mark(&mut self, text: &str);

    /// Commit final text into the host document. Inserting replaces any
    /// marked text currently shown; adapters over hosts without that
    /// semantic must clear the marked text themselves.
    fn insert(&mut self, text: &str);

    /// Remove any marked text.
    fn clear_marked_text(&mut self);

    /// Screen position of the text caret.
    fn cursor_origin(&self) -> Point;

    /// Visible frame of the screen the caret is on.
    fn screen_visible_frame(&self) -> Rect;
}

/// Identity and caret position of the currently bound client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientBinding {
    pub client_id: String,
    pub cursor_origin: Point,
}

impl ClientBinding {
    pub fn of(client: &dyn TextClient) -> Self {
        Self {
            client_id: client.client_id(),
            cursor_origin: client.cursor_origin(),
        }
    }
}
