//! Engine gateway.
//!
//! The controller never links the conversion engine directly. It holds an
//! [`EngineHandle`] wrapping a boxed [`EngineGateway`], constructed once at
//! process start and passed in explicitly; tests substitute a fake gateway.
//!
//! A handle without a gateway models an engine that failed to initialize:
//! every command returns [`Error::Unavailable`] and the controller falls
//! back to passing keys through to the host.

use tracing::debug;

use crate::error::{Error, Result};
use crate::protocol::{EngineSettings, Request, Response, WireKeyEvent};

/// Transport-level failure reported by a gateway implementation.
#[derive(Debug, thiserror::Error)]
#[error("engine call failed: {0}")]
pub struct GatewayError(pub String);

/// The byte-level seam to the opaque conversion engine.
///
/// One synchronous exchange per call; no streaming, no partial results.
pub trait EngineGateway {
    fn send_command(&mut self, request: &[u8]) -> std::result::Result<Vec<u8>, GatewayError>;
}

/// Owns the gateway and the request/response serialization around it.
pub struct EngineHandle {
    gateway: Option<Box<dyn EngineGateway>>,
    next_id: u32,
}

impl EngineHandle {
    /// Wrap an initialized gateway.
    pub fn new(gateway: Box<dyn EngineGateway>) -> Self {
        Self {
            gateway: Some(gateway),
            next_id: 1,
        }
    }

    /// A handle for an engine that failed to initialize. Every command is a
    /// no-op returning [`Error::Unavailable`].
    pub fn unavailable() -> Self {
        Self {
            gateway: None,
            next_id: 1,
        }
    }

    pub fn is_available(&self) -> bool {
        self.gateway.is_some()
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    /// One full round-trip: encode, invoke, decode.
    ///
    /// On any failure the caller must treat the turn as a no-op and keep its
    /// prior session state.
    pub fn send(&mut self, request: Request) -> Result<Response> {
        let gateway = self.gateway.as_mut().ok_or(Error::Unavailable)?;

        let bytes = request.encode()?;
        let reply = gateway.send_command(&bytes).map_err(|e| {
            debug!("engine gateway failure: {e}");
            Error::Unavailable
        })?;
        let response = Response::decode(&reply)?;

        debug!(
            id = request.id,
            command = ?request.command,
            candidates = response.candidate_list.len(),
            "engine turn"
        );
        Ok(response)
    }

    /// Tell the engine to drop its composition.
    pub fn reset(&mut self) -> Result<Response> {
        let id = self.next_id();
        self.send(Request::reset(id))
    }

    /// Forward one key event.
    pub fn send_key(&mut self, key: WireKeyEvent) -> Result<Response> {
        let id = self.next_id();
        self.send(Request::send_key(id, key))
    }

    /// Install a new input mode, carrying the full settings payload.
    pub fn switch_input_mode(&mut self, settings: EngineSettings) -> Result<Response> {
        let id = self.next_id();
        self.send(Request::switch_input_mode(id, settings))
    }

    /// Install a new output mode, carrying the full settings payload.
    pub fn switch_output_mode(&mut self, settings: EngineSettings) -> Result<Response> {
        let id = self.next_id();
        self.send(Request::switch_output_mode(id, settings))
    }
}
