// spooltag-rs/spooltag/src/engine/mod.rs

//! Event-driven protocol engine.
//!
//! Each protocol is a small state machine fed one `PollerEvent` at a time.
//! `Engine` is the closed set of protocols a session can run.

pub mod detect;
pub mod read;
pub mod session;
#[cfg(test)]
pub(crate) mod testlog;
pub mod uid;
pub mod write;

pub use detect::{DetectProtocol, Detection, KeySource, WriteAuthorization};
pub use read::{PassOutcome, ReadProtocol, ReadResult};
pub use session::SessionState;
pub use uid::UidCapture;
pub use write::WriteProtocol;

use log::trace;

use crate::transport::{Directive, EventHandler, PollerEvent};

/// A protocol driven by poller events against a session.
pub trait Protocol {
    fn handle(&mut self, event: PollerEvent<'_>, session: &mut SessionState) -> Directive;
}

/// Protocols that run against an established session.
#[derive(Debug)]
pub enum Engine {
    Detect(DetectProtocol),
    Read(ReadProtocol),
    Write(WriteProtocol),
}

impl Engine {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Detect(_) => "detect",
            Self::Read(_) => "read",
            Self::Write(_) => "write",
        }
    }

    /// Classification produced by a detect run, if it completed.
    pub fn detection(&self) -> Option<Detection> {
        match self {
            Self::Detect(p) => p.detection(),
            Self::Read(_) | Self::Write(_) => None,
        }
    }

    /// Pass outcome for read and write protocols once finished.
    pub fn outcome(&self) -> Option<PassOutcome> {
        match self {
            Self::Detect(_) => None,
            Self::Read(p) => p.outcome(),
            Self::Write(p) => p.outcome(),
        }
    }
}

impl Protocol for Engine {
    fn handle(&mut self, event: PollerEvent<'_>, session: &mut SessionState) -> Directive {
        trace!("{}: {}", self.name(), event.kind());
        match self {
            Self::Detect(p) => p.handle(event, session),
            Self::Read(p) => p.handle(event, session),
            Self::Write(p) => p.handle(event, session),
        }
    }
}

impl From<DetectProtocol> for Engine {
    fn from(p: DetectProtocol) -> Self {
        Self::Detect(p)
    }
}

impl From<ReadProtocol> for Engine {
    fn from(p: ReadProtocol) -> Self {
        Self::Read(p)
    }
}

impl From<WriteProtocol> for Engine {
    fn from(p: WriteProtocol) -> Self {
        Self::Write(p)
    }
}

/// Binds a protocol to its session so a transport can drive it.
pub struct SessionHandler<'a, P: Protocol> {
    protocol: &'a mut P,
    session: &'a mut SessionState,
}

impl<'a, P: Protocol> SessionHandler<'a, P> {
    pub fn new(protocol: &'a mut P, session: &'a mut SessionState) -> Self {
        Self { protocol, session }
    }
}

impl<P: Protocol> EventHandler for SessionHandler<'_, P> {
    fn on_event(&mut self, event: PollerEvent<'_>) -> Directive {
        self.protocol.handle(event, self.session)
    }
}
