// spooltag-rs/spooltag/src/transport/mock.rs

use log::{debug, trace};

use crate::constants::{BLOCKS_PER_SECTOR, BLOCK_SIZE, KEY_SIZE, NUM_BLOCKS, NUM_SECTORS};
use crate::crypto::derive_keys;
use crate::layout::trailer::{has_writable_access_bits, render_trailer, ACCESS_BITS_OFFSET};
use crate::transport::traits::{
    CardPoller, Directive, EventHandler, ModeRequest, PollerEvent, PollerMode,
    SectorTrailerRequest, Transport, WriteBlockRequest,
};
use crate::types::{sector_of, BlockData, KeyType, SectorKey, Uid};
use crate::{Error, Result};

/// Access bits found on factory programmed tags
pub const ORIGINAL_ACCESS_BITS: [u8; 4] = [0x87, 0x87, 0x87, 0x69];

/// In-memory MIFARE Classic 1K image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimCard {
    uid: Uid,
    blocks: [[u8; BLOCK_SIZE]; NUM_BLOCKS],
}

impl SimCard {
    /// Factory blank: every sector on the default key with writable bits.
    pub fn blank(uid: Uid) -> Self {
        let mut blocks = [[0u8; BLOCK_SIZE]; NUM_BLOCKS];
        let trailer = render_trailer(&SectorKey::DEFAULT);
        for sector in 0..NUM_SECTORS {
            blocks[sector * BLOCKS_PER_SECTOR + BLOCKS_PER_SECTOR - 1] = *trailer.as_bytes();
        }
        let mut card = Self { uid, blocks };
        card.write_manufacturer_block();
        card
    }

    /// Previously programmed by us: data sectors on derived keys.
    pub fn claimed(uid: Uid) -> Self {
        let mut card = Self::blank(uid);
        let keys = derive_keys(&uid);
        for sector in 0..2u8 {
            let key = keys.as_slice()[sector as usize];
            card.set_trailer(sector, *render_trailer(&key).as_bytes());
        }
        card
    }

    /// Factory programmed spool tag: derived keys, protected access bits.
    pub fn original(uid: Uid) -> Self {
        let mut card = Self::blank(uid);
        let keys = derive_keys(&uid);
        for (sector, key) in keys.iter().enumerate() {
            let mut trailer = *render_trailer(key).as_bytes();
            trailer[ACCESS_BITS_OFFSET..ACCESS_BITS_OFFSET + 4]
                .copy_from_slice(&ORIGINAL_ACCESS_BITS);
            card.set_trailer(sector as u8, trailer);
        }
        card
    }

    pub fn with_block(mut self, block: u8, data: BlockData) -> Self {
        if (block as usize) < NUM_BLOCKS {
            self.blocks[block as usize] = *data.as_bytes();
        }
        self
    }

    pub fn uid(&self) -> Uid {
        self.uid
    }

    /// Raw block content, keys included.
    pub fn block(&self, block: u8) -> BlockData {
        BlockData::from_bytes(self.blocks[block as usize % NUM_BLOCKS])
    }

    pub fn trailer(&self, sector: u8) -> BlockData {
        self.block(sector * BLOCKS_PER_SECTOR as u8 + BLOCKS_PER_SECTOR as u8 - 1)
    }

    /// Key currently stored in the trailer of `sector`.
    pub fn key(&self, sector: u8, key_type: KeyType) -> SectorKey {
        let t = self.trailer(sector);
        let off = match key_type {
            KeyType::A => 0,
            KeyType::B => BLOCK_SIZE - KEY_SIZE,
        };
        let mut k = [0u8; KEY_SIZE];
        k.copy_from_slice(&t.as_bytes()[off..off + KEY_SIZE]);
        SectorKey::from_bytes(k)
    }

    fn set_trailer(&mut self, sector: u8, trailer: [u8; BLOCK_SIZE]) {
        let idx = sector as usize * BLOCKS_PER_SECTOR + BLOCKS_PER_SECTOR - 1;
        self.blocks[idx] = trailer;
    }

    fn write_manufacturer_block(&mut self) {
        let uid = self.uid.as_bytes();
        let n = uid.len().min(BLOCK_SIZE);
        self.blocks[0][..n].copy_from_slice(&uid[..n]);
    }
}

/// Card operation recorded by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardOp {
    Auth {
        block: u8,
        key: SectorKey,
        key_type: KeyType,
        ok: bool,
    },
    Read {
        block: u8,
    },
    Write {
        block: u8,
        data: BlockData,
    },
}

/// Mock transport for unit tests. It simulates one card in the field,
/// records every card operation and event, and injects failures on request.
#[derive(Debug, Default)]
pub struct MockTransport {
    pub card: Option<SimCard>,
    pub ops: Vec<CardOp>,
    /// Kinds of every event delivered, in order
    pub events: Vec<&'static str>,
    /// Mode requests received, one per started session
    pub mode_requests: Vec<ModeRequest>,
    pub sessions: usize,
    /// Testing hook: sectors whose authentication fails whatever the key
    pub auth_failures: Vec<u8>,
    /// Testing hook: blocks whose reads always fail
    pub read_failures: Vec<u8>,
    /// Testing hook: number of subsequent block reads that should fail
    pub flaky_reads: usize,
    /// Testing hook: blocks whose writes fail
    pub write_failures: Vec<u8>,
    /// Testing hook: the card leaves the field once this many operations ran
    pub lose_card_after: Option<usize>,
    card_lost: bool,
}

impl MockTransport {
    pub fn new(card: SimCard) -> Self {
        Self {
            card: Some(card),
            ..Self::default()
        }
    }

    /// No card in the field.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Put a card (back) into the field.
    pub fn present(&mut self, card: SimCard) {
        self.card = Some(card);
        self.card_lost = false;
        self.lose_card_after = None;
    }

    pub fn is_card_lost(&self) -> bool {
        self.card_lost
    }

    pub fn writes(&self) -> Vec<(u8, BlockData)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                CardOp::Write { block, data } => Some((*block, *data)),
                _ => None,
            })
            .collect()
    }

    fn tick(&mut self) -> Result<()> {
        if self.card_lost {
            return Err(Error::CardLost);
        }
        if let Some(n) = self.lose_card_after {
            if self.ops.len() >= n {
                debug!("mock: card left the field after {} operations", n);
                self.card_lost = true;
                return Err(Error::CardLost);
            }
        }
        Ok(())
    }

    fn op_auth(
        &mut self,
        authed: &mut Option<u8>,
        block: u8,
        key: &SectorKey,
        key_type: KeyType,
    ) -> Result<()> {
        self.tick()?;
        let sector = sector_of(block)?;
        let card = self.card.as_ref().ok_or(Error::NoCard)?;
        let ok = card.key(sector, key_type) == *key && !self.auth_failures.contains(&sector);
        self.ops.push(CardOp::Auth {
            block,
            key: *key,
            key_type,
            ok,
        });
        trace!("mock: auth block {} key {} -> {}", block, key.to_hex(), ok);
        if ok {
            *authed = Some(sector);
            Ok(())
        } else {
            *authed = None;
            Err(Error::AuthenticationFailed { block })
        }
    }

    fn op_read(&mut self, authed: Option<u8>, block: u8) -> Result<BlockData> {
        self.tick()?;
        self.ops.push(CardOp::Read { block });
        if authed != Some(sector_of(block)?) || self.read_failures.contains(&block) {
            return Err(Error::ReadFailed { block });
        }
        if self.flaky_reads > 0 {
            self.flaky_reads -= 1;
            return Err(Error::ReadFailed { block });
        }
        let card = self.card.as_ref().ok_or(Error::NoCard)?;
        let mut data = *card.block(block).as_bytes();
        if crate::types::is_trailer(block) {
            // Key A never reads back.
            data[..KEY_SIZE].fill(0);
        }
        Ok(BlockData::from_bytes(data))
    }

    fn op_write(&mut self, authed: Option<u8>, block: u8, data: BlockData) -> Result<()> {
        self.tick()?;
        self.ops.push(CardOp::Write { block, data });
        let sector = sector_of(block)?;
        let card = self.card.as_mut().ok_or(Error::NoCard)?;
        if block == 0
            || authed != Some(sector)
            || !has_writable_access_bits(&card.trailer(sector))
            || self.write_failures.contains(&block)
        {
            return Err(Error::WriteFailed { block });
        }
        card.blocks[block as usize] = *data.as_bytes();
        Ok(())
    }

    fn deliver(&mut self, handler: &mut dyn EventHandler, event: PollerEvent<'_>) -> Directive {
        self.events.push(event.kind());
        handler.on_event(event)
    }

    fn fail(&mut self, handler: &mut dyn EventHandler, err: Error) {
        debug!("mock: session failed: {}", err);
        let event = match err {
            Error::CardLost => PollerEvent::CardLost,
            _ => PollerEvent::Failure,
        };
        self.deliver(handler, event);
    }

    fn run_read(&mut self, handler: &mut dyn EventHandler, uid: Uid) {
        self.events.push("card-detected");
        let directive = {
            let mut poller = SimPoller {
                mock: self,
                uid,
                authed: None,
            };
            handler.on_event(PollerEvent::CardDetected(&mut poller))
        };
        if directive == Directive::Continue {
            let event = if self.card_lost {
                PollerEvent::CardLost
            } else {
                PollerEvent::Success
            };
            self.deliver(handler, event);
        }
    }

    fn run_write(&mut self, handler: &mut dyn EventHandler, req: &ModeRequest) {
        for sector in 0..NUM_SECTORS as u8 {
            let mut treq = SectorTrailerRequest::new(sector);
            if self.deliver(handler, PollerEvent::RequestSectorTrailer(&mut treq))
                == Directive::Stop
            {
                return;
            }
            if !treq.provided {
                continue;
            }

            let first = sector * BLOCKS_PER_SECTOR as u8;
            let mut authed = None;
            if let Err(e) = self.auth_with(&mut authed, req, first) {
                self.fail(handler, e);
                return;
            }

            for block in first..first + BLOCKS_PER_SECTOR as u8 - 1 {
                if block == 0 {
                    continue;
                }
                let mut wreq = WriteBlockRequest::new(block);
                if self.deliver(handler, PollerEvent::RequestWriteBlock(&mut wreq))
                    == Directive::Stop
                {
                    return;
                }
                if !wreq.provided {
                    continue;
                }
                if let Err(e) = self.op_write(authed, block, wreq.data) {
                    self.fail(handler, e);
                    return;
                }
            }

            if let Err(e) = self.op_write(authed, first + BLOCKS_PER_SECTOR as u8 - 1, treq.trailer)
            {
                self.fail(handler, e);
                return;
            }
        }
        self.deliver(handler, PollerEvent::Success);
    }

    fn auth_with(&mut self, authed: &mut Option<u8>, req: &ModeRequest, block: u8) -> Result<()> {
        let sector = (block as usize) / BLOCKS_PER_SECTOR;
        let mut result = Err(Error::AuthenticationFailed { block });
        for key_type in [KeyType::A, KeyType::B] {
            if let Some(key) = req.key(sector, key_type) {
                result = self.op_auth(authed, block, &key, key_type);
                match &result {
                    Ok(()) => break,
                    Err(e) if e.is_auth_failure() => continue,
                    Err(_) => break,
                }
            }
        }
        result
    }
}

impl Transport for MockTransport {
    fn run(&mut self, handler: &mut dyn EventHandler, timeout_ms: u64) -> Result<()> {
        self.sessions += 1;
        let uid = match (&self.card, self.card_lost) {
            (Some(card), false) => card.uid(),
            _ => {
                debug!("mock: no card within {} ms", timeout_ms);
                return Err(Error::NoCard);
            }
        };

        let mut req = ModeRequest::default();
        if self.deliver(handler, PollerEvent::RequestMode(&mut req)) == Directive::Stop {
            return Ok(());
        }
        self.mode_requests.push(req.clone());

        if req.uid.is_some_and(|u| u != uid) {
            debug!("mock: session bound to {:?}, card is {}", req.uid, uid);
            self.deliver(handler, PollerEvent::Failure);
            return Ok(());
        }

        match req.mode {
            PollerMode::Read => self.run_read(handler, uid),
            PollerMode::Write => self.run_write(handler, &req),
        }
        Ok(())
    }
}

/// Direct-operation view of the simulated card for read mode.
struct SimPoller<'a> {
    mock: &'a mut MockTransport,
    uid: Uid,
    authed: Option<u8>,
}

impl CardPoller for SimPoller<'_> {
    fn uid(&self) -> &[u8] {
        self.uid.as_bytes()
    }

    fn authenticate(&mut self, block: u8, key: &SectorKey, key_type: KeyType) -> Result<()> {
        self.mock.op_auth(&mut self.authed, block, key, key_type)
    }

    fn read_block(&mut self, block: u8) -> Result<BlockData> {
        self.mock.op_read(self.authed, block)
    }
}
