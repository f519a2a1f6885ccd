// spooltag-rs/spooltag/src/engine/write.rs

use log::{debug, info, warn};

use crate::engine::detect::{KeySource, WriteAuthorization};
use crate::engine::read::PassOutcome;
use crate::engine::session::SessionState;
use crate::engine::Protocol;
use crate::layout::blocks::TagPayload;
use crate::layout::trailer::render_trailer;
use crate::transport::{Directive, ModeRequest, PollerEvent, PollerMode};
use crate::types::{SectorKey, SectorPair};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingMode,
    Writing(SectorPair),
    Done(PassOutcome),
}

/// Programs the sector pair at the session cursor: its payload blocks, then
/// its trailer with the derived key.
///
/// Construction requires a `WriteAuthorization`, which only a Rewritable
/// detection produces.
#[derive(Debug)]
pub struct WriteProtocol {
    authorization: WriteAuthorization,
    payload: TagPayload,
    state: State,
    pair: Option<SectorPair>,
    trailer_provided: bool,
    provided: Vec<u8>,
}

impl WriteProtocol {
    pub fn new(authorization: WriteAuthorization, payload: TagPayload) -> Self {
        Self {
            authorization,
            payload,
            state: State::AwaitingMode,
            pair: None,
            trailer_provided: false,
            provided: Vec::new(),
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

    /// Blocks handed to the transport so far, in order.
    pub fn provided_blocks(&self) -> &[u8] {
        &self.provided
    }

    /// Stage the keys the transport authenticates with.
    ///
    /// A Derived detection only proves sector 0 is sealed. The target sector
    /// of a later pass may still be on the default key if an earlier write
    /// stopped after sector 0, so the default key is staged as its Key B and
    /// the transport falls back to it when the derived Key A is refused.
    fn stage_keys(&self, req: &mut ModeRequest, session: &SessionState, pair: SectorPair) {
        for (sector, derived) in session.keys().iter().enumerate() {
            let key = match self.authorization.key_source() {
                KeySource::Default => SectorKey::DEFAULT,
                KeySource::Derived => *derived,
            };
            req.set_keys(sector, key);
        }
        if self.authorization.key_source() == KeySource::Derived {
            req.key_b[pair.sector() as usize] = Some(SectorKey::DEFAULT);
        }
    }

    fn all_blocks_provided(&self, pair: SectorPair) -> bool {
        self.payload
            .blocks_for(pair)
            .iter()
            .all(|(block, _)| self.provided.contains(block))
    }

    /// Attribute a transport failure. The transport authenticates before it
    /// asks for blocks and writes the trailer right after the last block,
    /// so a trailer failure reports the last payload block handed out.
    fn failure_outcome(&self) -> PassOutcome {
        match self.provided.last() {
            Some(&block) => PassOutcome::WriteFailed { block },
            None if self.trailer_provided => PassOutcome::AuthFailed,
            None => PassOutcome::Incomplete,
        }
    }

    fn finish(&mut self, outcome: PassOutcome) -> Directive {
        let pair = self.pair.unwrap_or_default();
        match outcome {
            PassOutcome::Complete => info!("wrote {}", pair),
            PassOutcome::AuthFailed => warn!("write {}: authentication failed", pair),
            PassOutcome::CardLost => warn!("write {}: card lost", pair),
            other => debug!("write {}: {}", pair, other),
        }
        self.state = State::Done(outcome);
        Directive::Stop
    }
}

impl Protocol for WriteProtocol {
    fn handle(&mut self, event: PollerEvent<'_>, session: &mut SessionState) -> Directive {
        let pair = match self.state {
            State::Done(_) => return Directive::Stop,
            State::AwaitingMode => None,
            State::Writing(pair) => Some(pair),
        };
        match (pair, event) {
            (None, PollerEvent::RequestMode(req)) => {
                let pair = session.cursor();
                req.mode = PollerMode::Write;
                req.uid = Some(*session.uid());
                self.stage_keys(req, session, pair);
                req.blocks = self.payload.blocks_for(pair);
                self.pair = Some(pair);
                self.state = State::Writing(pair);
                Directive::Continue
            }
            (Some(pair), PollerEvent::RequestSectorTrailer(req)) => {
                if req.sector == pair.sector() {
                    let key = session.keys().for_pair(pair);
                    req.provide(render_trailer(&key));
                    self.trailer_provided = true;
                }
                Directive::Continue
            }
            (Some(pair), PollerEvent::RequestWriteBlock(req)) => {
                let wanted = self
                    .payload
                    .blocks_for(pair)
                    .into_iter()
                    .find(|(block, _)| *block == req.block);
                if let Some((block, data)) = wanted {
                    req.provide(data);
                    self.provided.push(block);
                }
                Directive::Continue
            }
            (_, PollerEvent::RequestSectorTrailer(_) | PollerEvent::RequestWriteBlock(_)) => {
                Directive::Continue
            }
            (_, PollerEvent::CardDetected(_)) => Directive::Continue,
            (Some(pair), PollerEvent::Success) => {
                let outcome = if self.trailer_provided && self.all_blocks_provided(pair) {
                    PassOutcome::Complete
                } else {
                    PassOutcome::Incomplete
                };
                self.finish(outcome)
            }
            (_, PollerEvent::Failure) => {
                let outcome = self.failure_outcome();
                self.finish(outcome)
            }
            (_, PollerEvent::CardLost) => self.finish(PassOutcome::CardLost),
            (_, PollerEvent::Success | PollerEvent::RequestMode(_)) => {
                self.finish(PassOutcome::Incomplete)
            }
        }
    }
}
