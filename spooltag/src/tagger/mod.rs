// spooltag-rs/spooltag/src/tagger/mod.rs

//! Caller-side sequencing of protocol passes over a transport.

pub mod builder;

pub use builder::{TaggerBuilder, TaggerConfig};

use log::{debug, info, warn};

use crate::dump::DumpStore;
use crate::engine::{
    DetectProtocol, Detection, Engine, PassOutcome, ReadProtocol, ReadResult, SessionHandler,
    SessionState, UidCapture, WriteProtocol,
};
use crate::layout::TagPayload;
use crate::transport::Transport;
use crate::types::SectorPair;
use crate::{Error, Result};

/// Outcome of the two-pass read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadReport {
    pub result: ReadResult,
    /// Final outcome per pass that ran; pair 1 is absent when pair 0 failed
    pub passes: Vec<(SectorPair, PassOutcome)>,
}

impl ReadReport {
    pub fn is_valid(&self) -> bool {
        self.result.valid
    }

    pub fn outcome(&self, pair: SectorPair) -> Option<PassOutcome> {
        self.passes.iter().find(|(p, _)| *p == pair).map(|(_, o)| *o)
    }
}

/// Outcome of the two-pass write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    pub passes: Vec<(SectorPair, PassOutcome)>,
}

impl WriteReport {
    /// True only if both sector pairs were written completely.
    pub fn success(&self) -> bool {
        SectorPair::ALL
            .iter()
            .all(|pair| self.outcome(*pair).is_some_and(|o| o.is_complete()))
    }

    pub fn outcome(&self, pair: SectorPair) -> Option<PassOutcome> {
        self.passes.iter().find(|(p, _)| *p == pair).map(|(_, o)| *o)
    }

    /// First failed pass as an error.
    pub fn into_result(self) -> Result<()> {
        for (pair, outcome) in &self.passes {
            outcome.into_result(*pair)?;
        }
        if self.success() {
            Ok(())
        } else {
            Err(Error::Timeout)
        }
    }
}

/// Runs detect, read and write flows against whatever card the transport
/// presents.
pub struct Tagger<T: Transport> {
    transport: T,
    config: TaggerConfig,
}

impl<T: Transport> Tagger<T> {
    pub fn new(transport: T, config: TaggerConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &TaggerConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Store configured by `dump_dir`, `dump_extension` and `max_saved_tags`.
    pub fn dump_store(&self) -> DumpStore {
        DumpStore::from_config(&self.config)
    }

    fn drive(&mut self, engine: &mut Engine, session: &mut SessionState) -> Result<()> {
        debug!("{} pass on {}", engine.name(), session.cursor());
        let mut handler = SessionHandler::new(engine, session);
        self.transport
            .run(&mut handler, self.config.session_timeout_ms)
    }

    /// Run one read or write pass against the session cursor. A session
    /// that never started counts as a lost card.
    fn run_pass(&mut self, mut engine: Engine, session: &mut SessionState) -> PassOutcome {
        match self.drive(&mut engine, session) {
            Ok(()) => engine.outcome().unwrap_or(PassOutcome::Incomplete),
            Err(e) => {
                warn!("{} {}: session did not start: {}", engine.name(), session.cursor(), e);
                PassOutcome::CardLost
            }
        }
    }

    /// Capture the UID of the card in the field and derive its keys.
    pub fn scan(&mut self) -> Result<SessionState> {
        debug!("waiting {:?} for a card", self.config.session_timeout());
        let mut capture = UidCapture::new();
        self.transport
            .run(&mut capture, self.config.session_timeout_ms)?;
        let uid = capture.uid().ok_or(Error::UidNotCaptured)?;
        info!("card {} in field", uid);
        Ok(SessionState::new(uid))
    }

    /// Classify the card. The session keeps the first classification it
    /// receives.
    pub fn detect(&mut self, session: &mut SessionState) -> Result<Detection> {
        let mut engine = Engine::from(DetectProtocol::new());
        session.set_cursor(SectorPair::Zero);
        self.drive(&mut engine, session)?;
        engine.detection().ok_or(Error::DetectionIncomplete)?;
        session
            .detection()
            .copied()
            .ok_or(Error::DetectionIncomplete)
    }

    fn read_pass(&mut self, session: &mut SessionState) -> PassOutcome {
        let mut outcome = PassOutcome::Incomplete;
        for attempt in 1..=self.config.read_pass_attempts {
            outcome = self.run_pass(ReadProtocol::new().into(), session);
            if outcome.is_complete() {
                break;
            }
            debug!(
                "read {} attempt {}/{}: {}",
                session.cursor(),
                attempt,
                self.config.read_pass_attempts,
                outcome
            );
        }
        outcome
    }

    /// Two-pass read into the session buffers. The result is valid once
    /// sector 0 was read, whatever happens to sector 1.
    pub fn read(&mut self, session: &mut SessionState) -> Result<ReadReport> {
        session.reset_read();
        let mut passes = Vec::with_capacity(SectorPair::ALL.len());
        let mut next = Some(SectorPair::Zero);
        while let Some(pair) = next {
            session.set_cursor(pair);
            let outcome = self.read_pass(session);
            passes.push((pair, outcome));
            next = pair.next();
            if !outcome.is_complete() {
                warn!("read {} failed: {}", pair, outcome);
                if pair == SectorPair::Zero {
                    break;
                }
            }
        }
        let result = *session.read_result();
        info!(
            "read {}: {}",
            session.uid(),
            if result.valid { "valid" } else { "invalid" }
        );
        Ok(ReadReport { result, passes })
    }

    /// Two-pass write of `payload`. Requires a Rewritable detection on the
    /// session; stops at the first failed pass.
    pub fn write(&mut self, session: &mut SessionState, payload: &TagPayload) -> Result<WriteReport> {
        let authorization = session.write_authorization()?;
        let mut passes = Vec::with_capacity(SectorPair::ALL.len());
        let mut next = Some(SectorPair::Zero);
        while let Some(pair) = next {
            session.set_cursor(pair);
            let outcome = self.run_pass(WriteProtocol::new(authorization, *payload).into(), session);
            passes.push((pair, outcome));
            if !outcome.is_complete() {
                warn!("write {} failed: {}", pair, outcome);
                break;
            }
            next = pair.next();
        }
        let report = WriteReport { passes };
        info!(
            "write {}: {}",
            session.uid(),
            if report.success() { "ok" } else { "failed" }
        );
        Ok(report)
    }

    /// Scan, then read.
    pub fn read_tag(&mut self) -> Result<(SessionState, ReadReport)> {
        let mut session = self.scan()?;
        let report = self.read(&mut session)?;
        Ok((session, report))
    }

    /// Scan, detect, then write. Original cards are refused with
    /// `Error::NotWritable` before anything is written.
    pub fn program(&mut self, payload: &TagPayload) -> Result<(SessionState, WriteReport)> {
        let mut session = self.scan()?;
        let detection = self.detect(&mut session)?;
        if !detection.is_writable() {
            warn!("card {} is an original tag", session.uid());
            return Err(Error::NotWritable);
        }
        let report = self.write(&mut session, payload)?;
        Ok((session, report))
    }
}
