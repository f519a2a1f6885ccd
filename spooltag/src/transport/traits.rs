// spooltag-rs/spooltag/src/transport/traits.rs

use crate::constants::NUM_SECTORS;
use crate::types::{BlockData, KeyType, SectorKey, Uid};
use crate::Result;

/// What the handler wants the transport to do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Continue,
    Stop,
}

/// Poller operating mode requested on `RequestMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollerMode {
    #[default]
    Read,
    Write,
}

/// Out-parameters for `PollerEvent::RequestMode`.
#[derive(Debug, Clone, Default)]
pub struct ModeRequest {
    pub mode: PollerMode,
    pub uid: Option<Uid>,
    /// Known Key A per sector; the transport authenticates with these in write mode
    pub key_a: [Option<SectorKey>; NUM_SECTORS],
    /// Known Key B per sector
    pub key_b: [Option<SectorKey>; NUM_SECTORS],
    /// Payload staged for write mode, for pollers that preload card data
    pub blocks: Vec<(u8, BlockData)>,
}

impl ModeRequest {
    /// Program both keys of `sector`. Out-of-range sectors are ignored.
    pub fn set_keys(&mut self, sector: usize, key: SectorKey) {
        if sector < NUM_SECTORS {
            self.key_a[sector] = Some(key);
            self.key_b[sector] = Some(key);
        }
    }

    pub fn key(&self, sector: usize, key_type: KeyType) -> Option<SectorKey> {
        let keys = match key_type {
            KeyType::A => &self.key_a,
            KeyType::B => &self.key_b,
        };
        keys.get(sector).copied().flatten()
    }
}

/// Out-parameters for `PollerEvent::RequestSectorTrailer`.
#[derive(Debug, Clone)]
pub struct SectorTrailerRequest {
    pub sector: u8,
    pub trailer: BlockData,
    pub provided: bool,
}

impl SectorTrailerRequest {
    pub fn new(sector: u8) -> Self {
        Self {
            sector,
            trailer: BlockData::ZERO,
            provided: false,
        }
    }

    pub fn provide(&mut self, trailer: BlockData) {
        self.trailer = trailer;
        self.provided = true;
    }
}

/// Out-parameters for `PollerEvent::RequestWriteBlock`.
#[derive(Debug, Clone)]
pub struct WriteBlockRequest {
    pub block: u8,
    pub data: BlockData,
    pub provided: bool,
}

impl WriteBlockRequest {
    pub fn new(block: u8) -> Self {
        Self {
            block,
            data: BlockData::ZERO,
            provided: false,
        }
    }

    pub fn provide(&mut self, data: BlockData) {
        self.data = data;
        self.provided = true;
    }
}

/// Discrete card operations available while a card is in the field.
pub trait CardPoller {
    /// UID reported by anticollision
    fn uid(&self) -> &[u8];

    /// Authenticate the sector containing `block`.
    fn authenticate(&mut self, block: u8, key: &SectorKey, key_type: KeyType) -> Result<()>;

    /// Read one block of an authenticated sector.
    fn read_block(&mut self, block: u8) -> Result<BlockData>;
}

/// One event of a poller session. Request variants carry the out-parameters
/// the handler fills in for the next physical exchange.
pub enum PollerEvent<'a> {
    RequestMode(&'a mut ModeRequest),
    CardDetected(&'a mut dyn CardPoller),
    CardLost,
    RequestSectorTrailer(&'a mut SectorTrailerRequest),
    RequestWriteBlock(&'a mut WriteBlockRequest),
    Success,
    Failure,
}

impl PollerEvent<'_> {
    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RequestMode(_) => "request-mode",
            Self::CardDetected(_) => "card-detected",
            Self::CardLost => "card-lost",
            Self::RequestSectorTrailer(_) => "request-sector-trailer",
            Self::RequestWriteBlock(_) => "request-write-block",
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

/// Receives poller events one at a time.
pub trait EventHandler {
    fn on_event(&mut self, event: PollerEvent<'_>) -> Directive;
}

/// Transport trait abstracts the poller/scanner stack away from the
/// protocol engine.
pub trait Transport {
    /// Wait for a card and run one poller session, delivering events to
    /// `handler` until it returns `Directive::Stop` or the poller finishes.
    ///
    /// Card-interaction outcomes (auth failure, card lost) are delivered as
    /// events; `Err` is reserved for the session not starting at all.
    fn run(&mut self, handler: &mut dyn EventHandler, timeout_ms: u64) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn run(&mut self, handler: &mut dyn EventHandler, timeout_ms: u64) -> Result<()> {
        (**self).run(handler, timeout_ms)
    }
}
