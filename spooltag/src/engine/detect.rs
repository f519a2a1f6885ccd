// spooltag-rs/spooltag/src/engine/detect.rs

//! Tag type detection.
//!
//! One authentication against sector 0 with the derived key decides the
//! classification:
//!
//! | auth with derived key | trailer access bits | result                    |
//! |-----------------------|---------------------|---------------------------|
//! | refused               | -                   | Rewritable, default key   |
//! | accepted              | `FF 07 80`          | Rewritable, derived key   |
//! | accepted              | anything else       | Original                  |
//! | accepted              | unreadable          | Original                  |
//!
//! Any other failure (card gone, transport error) leaves the session
//! undetected.

use derive_more::Display;
use log::{debug, info, warn};

use crate::engine::session::SessionState;
use crate::engine::Protocol;
use crate::layout::trailer::has_writable_access_bits;
use crate::transport::{CardPoller, Directive, PollerEvent, PollerMode};
use crate::types::{CardClassification, KeyType, SectorKey, SectorPair};
use crate::Error;

/// Which key the data sectors currently answer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum KeySource {
    #[display(fmt = "default")]
    Default,
    #[display(fmt = "derived")]
    Derived,
}

/// Outcome of a completed detection. Only produced by `DetectProtocol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    classification: CardClassification,
    key_source: Option<KeySource>,
}

impl Detection {
    pub(crate) fn original() -> Self {
        Self {
            classification: CardClassification::Original,
            key_source: None,
        }
    }

    pub(crate) fn rewritable(key_source: KeySource) -> Self {
        Self {
            classification: CardClassification::Rewritable,
            key_source: Some(key_source),
        }
    }

    pub fn classification(&self) -> CardClassification {
        self.classification
    }

    /// Key source for rewritable cards; `None` for originals.
    pub fn key_source(&self) -> Option<KeySource> {
        self.key_source
    }

    pub fn use_default_key(&self) -> bool {
        self.key_source == Some(KeySource::Default)
    }

    pub fn is_writable(&self) -> bool {
        self.classification == CardClassification::Rewritable
    }

    /// Write passes need this token; originals never yield one.
    pub fn authorize_write(&self) -> Option<WriteAuthorization> {
        self.key_source.map(|key_source| WriteAuthorization { key_source })
    }
}

/// Proof that detection classified the card Rewritable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteAuthorization {
    key_source: KeySource,
}

impl WriteAuthorization {
    pub fn key_source(&self) -> KeySource {
        self.key_source
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingMode,
    AwaitingCard,
    Done,
}

/// Classifies the card in the field and records the result in the session.
#[derive(Debug)]
pub struct DetectProtocol {
    state: State,
    detection: Option<Detection>,
}

impl Default for DetectProtocol {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectProtocol {
    pub fn new() -> Self {
        Self {
            state: State::AwaitingMode,
            detection: None,
        }
    }

    /// Classification produced by this run, if it completed.
    pub fn detection(&self) -> Option<Detection> {
        self.detection
    }

    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    fn probe(poller: &mut dyn CardPoller, key: &SectorKey) -> Option<Detection> {
        let pair = SectorPair::Zero;
        match poller.authenticate(pair.first_block(), key, KeyType::A) {
            Ok(()) => {}
            Err(e) if e.is_auth_failure() => {
                warn!("derived key refused on {}: card still on the default key", pair);
                return Some(Detection::rewritable(KeySource::Default));
            }
            Err(e) => {
                warn!("detection aborted: {}", e);
                return None;
            }
        }

        match poller.read_block(pair.trailer_block()) {
            Ok(trailer) if has_writable_access_bits(&trailer) => {
                Some(Detection::rewritable(KeySource::Derived))
            }
            Ok(trailer) => {
                debug!("trailer access bits {} are not ours", trailer.to_hex());
                Some(Detection::original())
            }
            Err(Error::CardLost) => {
                warn!("card lost while reading trailer");
                None
            }
            Err(e) => {
                debug!("trailer unreadable ({}), assuming original", e);
                Some(Detection::original())
            }
        }
    }
}

impl Protocol for DetectProtocol {
    fn handle(&mut self, event: PollerEvent<'_>, session: &mut SessionState) -> Directive {
        match (self.state, event) {
            (State::AwaitingMode, PollerEvent::RequestMode(req)) => {
                req.mode = PollerMode::Read;
                req.uid = Some(*session.uid());
                self.state = State::AwaitingCard;
                Directive::Continue
            }
            (State::AwaitingCard, PollerEvent::CardDetected(poller)) => {
                let key = session.keys().for_pair(SectorPair::Zero);
                self.detection = Self::probe(poller, &key);
                if let Some(d) = self.detection {
                    if session.record_detection(d) {
                        info!("card {} classified {}", session.uid(), d.classification());
                    }
                }
                self.state = State::Done;
                Directive::Stop
            }
            (_, PollerEvent::RequestSectorTrailer(_) | PollerEvent::RequestWriteBlock(_)) => {
                Directive::Continue
            }
            (_, event) => {
                debug!("detect: session ended on {}", event.kind());
                self.state = State::Done;
                Directive::Stop
            }
        }
    }
}
