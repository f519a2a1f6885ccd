// spooltag-rs/spooltag/src/engine/uid.rs

use log::{debug, warn};

use crate::transport::{Directive, EventHandler, PollerEvent, PollerMode};
use crate::types::Uid;

/// Captures the UID of the first card presented.
///
/// Runs before a session exists, so it is an `EventHandler` rather than a
/// `Protocol`.
#[derive(Debug, Default)]
pub struct UidCapture {
    uid: Option<Uid>,
}

impl UidCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uid(&self) -> Option<Uid> {
        self.uid
    }
}

impl EventHandler for UidCapture {
    fn on_event(&mut self, event: PollerEvent<'_>) -> Directive {
        match event {
            PollerEvent::RequestMode(req) => {
                req.mode = PollerMode::Read;
                Directive::Continue
            }
            PollerEvent::CardDetected(poller) => {
                match Uid::try_from(poller.uid()) {
                    Ok(uid) => {
                        debug!("captured uid {}", uid);
                        self.uid = Some(uid);
                    }
                    Err(e) => warn!("ignoring card: {}", e),
                }
                Directive::Stop
            }
            PollerEvent::RequestSectorTrailer(_) | PollerEvent::RequestWriteBlock(_) => {
                Directive::Continue
            }
            PollerEvent::CardLost | PollerEvent::Success | PollerEvent::Failure => {
                Directive::Stop
            }
        }
    }
}
