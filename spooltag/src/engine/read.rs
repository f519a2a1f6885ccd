// spooltag-rs/spooltag/src/engine/read.rs

use derive_more::Display;
use log::{debug, warn};

use crate::constants::{
    BLOCK_COLOR_WEIGHT, BLOCK_DETAIL, BLOCK_FILAMENT_TYPE, BLOCK_MANUFACTURER, BLOCK_MATERIAL,
};
use crate::engine::session::SessionState;
use crate::engine::Protocol;
use crate::transport::{CardPoller, Directive, PollerEvent, PollerMode};
use crate::types::{BlockData, KeyType, SectorPair};
use crate::Error;

/// Spool data captured from a card.
///
/// `valid` is set once sector 0 (material and filament type) was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadResult {
    pub material: BlockData,
    pub filament_type: BlockData,
    pub detail: BlockData,
    pub color_weight: BlockData,
    pub manufacturer: Option<BlockData>,
    pub valid: bool,
}

impl ReadResult {
    /// Store a data block. Returns false for blocks outside the layout.
    pub fn set_block(&mut self, block: u8, data: BlockData) -> bool {
        match block {
            BLOCK_MATERIAL => self.material = data,
            BLOCK_FILAMENT_TYPE => self.filament_type = data,
            BLOCK_DETAIL => self.detail = data,
            BLOCK_COLOR_WEIGHT => self.color_weight = data,
            BLOCK_MANUFACTURER => self.manufacturer = Some(data),
            _ => return false,
        }
        true
    }

    pub fn block(&self, block: u8) -> Option<BlockData> {
        match block {
            BLOCK_MATERIAL => Some(self.material),
            BLOCK_FILAMENT_TYPE => Some(self.filament_type),
            BLOCK_DETAIL => Some(self.detail),
            BLOCK_COLOR_WEIGHT => Some(self.color_weight),
            BLOCK_MANUFACTURER => self.manufacturer,
            _ => None,
        }
    }
}

/// Mandatory data blocks of a pair, in read order.
pub fn mandatory_blocks(pair: SectorPair) -> [u8; 2] {
    match pair {
        SectorPair::Zero => [BLOCK_MATERIAL, BLOCK_FILAMENT_TYPE],
        SectorPair::One => [BLOCK_DETAIL, BLOCK_COLOR_WEIGHT],
    }
}

/// Result of one read or write pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PassOutcome {
    #[display(fmt = "complete")]
    Complete,
    #[display(fmt = "authentication failed")]
    AuthFailed,
    #[display(fmt = "read failed at block {}", block)]
    ReadFailed { block: u8 },
    #[display(fmt = "write failed at block {}", block)]
    WriteFailed { block: u8 },
    #[display(fmt = "card lost")]
    CardLost,
    /// The session ended before the pass did its work.
    #[display(fmt = "incomplete")]
    Incomplete,
}

impl PassOutcome {
    pub fn is_complete(&self) -> bool {
        *self == Self::Complete
    }

    /// Convert a failed outcome to the matching error.
    pub fn into_result(self, pair: SectorPair) -> crate::Result<()> {
        match self {
            Self::Complete => Ok(()),
            Self::AuthFailed => Err(Error::AuthenticationFailed {
                block: pair.first_block(),
            }),
            Self::ReadFailed { block } => Err(Error::ReadFailed { block }),
            Self::WriteFailed { block } => Err(Error::WriteFailed { block }),
            Self::CardLost => Err(Error::CardLost),
            Self::Incomplete => Err(Error::Timeout),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingMode,
    AwaitingCard,
    Done(PassOutcome),
}

/// Reads the sector pair at the session cursor into the session buffers.
///
/// The target pair is taken from `SessionState::cursor` when the poller
/// asks for a mode, so the caller moves the cursor between passes.
#[derive(Debug)]
pub struct ReadProtocol {
    state: State,
    pair: Option<SectorPair>,
}

impl Default for ReadProtocol {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadProtocol {
    pub fn new() -> Self {
        Self {
            state: State::AwaitingMode,
            pair: None,
        }
    }

    /// Pair this pass targets, once the session has started.
    pub fn pair(&self) -> Option<SectorPair> {
        self.pair
    }

    pub fn outcome(&self) -> Option<PassOutcome> {
        match self.state {
            State::Done(outcome) => Some(outcome),
            _ => None,
        }
    }

    fn run_pass(
        pair: SectorPair,
        poller: &mut dyn CardPoller,
        session: &mut SessionState,
    ) -> PassOutcome {
        let key = session.keys().for_pair(pair);
        match poller.authenticate(pair.first_block(), &key, KeyType::A) {
            Ok(()) => {}
            Err(e) if e.is_auth_failure() => {
                warn!("read {}: derived key refused", pair);
                return PassOutcome::AuthFailed;
            }
            Err(e) => {
                warn!("read {}: {}", pair, e);
                return PassOutcome::CardLost;
            }
        }

        for block in mandatory_blocks(pair) {
            match poller.read_block(block) {
                Ok(data) => {
                    session.read_result_mut().set_block(block, data);
                }
                Err(Error::CardLost) => {
                    warn!("read {}: card lost at block {}", pair, block);
                    return PassOutcome::CardLost;
                }
                Err(e) => {
                    debug!("read {}: {}", pair, e);
                    return PassOutcome::ReadFailed { block };
                }
            }
        }

        if pair == SectorPair::One {
            // An erased manufacturer block means no manufacturer.
            let manufacturer = match poller.read_block(BLOCK_MANUFACTURER) {
                Ok(data) if data.is_zero() => None,
                Ok(data) => Some(data),
                Err(e) => {
                    warn!("manufacturer block unreadable: {}", e);
                    None
                }
            };
            session.read_result_mut().manufacturer = manufacturer;
        }

        if pair == SectorPair::Zero {
            session.read_result_mut().valid = true;
        }
        PassOutcome::Complete
    }
}

impl Protocol for ReadProtocol {
    fn handle(&mut self, event: PollerEvent<'_>, session: &mut SessionState) -> Directive {
        match (self.state, event) {
            (State::AwaitingMode, PollerEvent::RequestMode(req)) => {
                req.mode = PollerMode::Read;
                req.uid = Some(*session.uid());
                self.pair = Some(session.cursor());
                self.state = State::AwaitingCard;
                Directive::Continue
            }
            (State::AwaitingCard, PollerEvent::CardDetected(poller)) => {
                let pair = self.pair.unwrap_or_default();
                let outcome = Self::run_pass(pair, poller, session);
                debug!("read {}: {}", pair, outcome);
                self.state = State::Done(outcome);
                Directive::Stop
            }
            (_, PollerEvent::RequestSectorTrailer(_) | PollerEvent::RequestWriteBlock(_)) => {
                Directive::Continue
            }
            (State::Done(_), _) => Directive::Stop,
            (_, PollerEvent::CardLost) => {
                warn!("read: card lost before the pass ran");
                self.state = State::Done(PassOutcome::CardLost);
                Directive::Stop
            }
            (_, event) => {
                debug!("read: session ended on {}", event.kind());
                self.state = State::Done(PassOutcome::Incomplete);
                Directive::Stop
            }
        }
    }
}
