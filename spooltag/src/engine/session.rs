// spooltag-rs/spooltag/src/engine/session.rs

use log::debug;

use crate::crypto::derive_keys;
use crate::engine::detect::{Detection, WriteAuthorization};
use crate::engine::read::ReadResult;
use crate::types::{CardClassification, SectorKeySet, SectorPair, Uid};
use crate::{Error, Result};

/// State shared by every protocol run against one physical card.
///
/// The UID is fixed at construction and the key set is derived from it
/// immediately, so keys and UID can never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    uid: Uid,
    keys: SectorKeySet,
    detection: Option<Detection>,
    read: ReadResult,
    cursor: SectorPair,
}

impl SessionState {
    pub fn new(uid: Uid) -> Self {
        let keys = derive_keys(&uid);
        debug!("session for {}: sector 0 key {}", uid, keys.for_pair(SectorPair::Zero).to_hex());
        Self {
            uid,
            keys,
            detection: None,
            read: ReadResult::default(),
            cursor: SectorPair::Zero,
        }
    }

    pub fn uid(&self) -> &Uid {
        &self.uid
    }

    pub fn keys(&self) -> &SectorKeySet {
        &self.keys
    }

    /// Sector pair the next read or write pass targets.
    pub fn cursor(&self) -> SectorPair {
        self.cursor
    }

    pub fn set_cursor(&mut self, pair: SectorPair) {
        self.cursor = pair;
    }

    pub fn detection(&self) -> Option<&Detection> {
        self.detection.as_ref()
    }

    pub fn classification(&self) -> CardClassification {
        self.detection
            .map(|d| d.classification())
            .unwrap_or_default()
    }

    /// `None` until detection has completed.
    pub fn use_default_key(&self) -> Option<bool> {
        self.detection.map(|d| d.use_default_key())
    }

    /// Record a detection outcome. The first outcome sticks; a later
    /// detection in the same session does not revert it.
    pub(crate) fn record_detection(&mut self, detection: Detection) -> bool {
        if self.detection.is_some() {
            return false;
        }
        self.detection = Some(detection);
        true
    }

    /// Token required to start a write pass.
    pub fn write_authorization(&self) -> Result<WriteAuthorization> {
        let detection = self.detection.ok_or(Error::DetectionIncomplete)?;
        detection.authorize_write().ok_or(Error::NotWritable)
    }

    pub fn read_result(&self) -> &ReadResult {
        &self.read
    }

    pub(crate) fn read_result_mut(&mut self) -> &mut ReadResult {
        &mut self.read
    }

    /// Clear captured blocks before a new read.
    pub fn reset_read(&mut self) {
        self.read = ReadResult::default();
    }
}
