// spooltag-rs/spooltag/src/tagger/builder.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_DUMP_DIR, DEFAULT_DUMP_EXTENSION, DEFAULT_MAX_SAVED_TAGS, DEFAULT_WEIGHT_GRAMS,
};
use crate::layout::FilamentSelection;
use crate::tagger::Tagger;
use crate::transport::Transport;
use crate::utils::timeout::{ms, DEFAULT_SESSION_TIMEOUT_MS};
use crate::{Error, Result};

/// Tunables for a `Tagger`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggerConfig {
    /// Timeout handed to `Transport::run` for every session
    pub session_timeout_ms: u64,
    /// Attempts per read pass; at least 1
    pub read_pass_attempts: u32,
    pub default_weight_grams: u16,
    pub dump_dir: PathBuf,
    pub dump_extension: String,
    pub max_saved_tags: usize,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            session_timeout_ms: DEFAULT_SESSION_TIMEOUT_MS,
            read_pass_attempts: 1,
            default_weight_grams: DEFAULT_WEIGHT_GRAMS,
            dump_dir: PathBuf::from(DEFAULT_DUMP_DIR),
            dump_extension: DEFAULT_DUMP_EXTENSION.to_string(),
            max_saved_tags: DEFAULT_MAX_SAVED_TAGS,
        }
    }
}

impl TaggerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.read_pass_attempts == 0 {
            return Err(Error::InvalidConfig(
                "read_pass_attempts must be at least 1".into(),
            ));
        }
        if self.max_saved_tags == 0 {
            return Err(Error::InvalidConfig(
                "max_saved_tags must be at least 1".into(),
            ));
        }
        if !self.dump_extension.starts_with('.') {
            return Err(Error::InvalidConfig(format!(
                "dump extension {:?} must start with '.'",
                self.dump_extension
            )));
        }
        Ok(())
    }

    pub fn session_timeout(&self) -> Duration {
        ms(self.session_timeout_ms)
    }

    /// Catalog selection at the configured default spool weight.
    pub fn selection(&self, filament_index: usize, color_index: usize) -> FilamentSelection {
        FilamentSelection::new(filament_index, color_index, self.default_weight_grams)
    }
}

/// Helper to construct a Tagger with optional configuration.
pub struct TaggerBuilder<T> {
    transport: Option<T>,
    config: TaggerConfig,
}

impl<T: Transport> Default for TaggerBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> TaggerBuilder<T> {
    pub fn new() -> Self {
        Self {
            transport: None,
            config: TaggerConfig::default(),
        }
    }

    /// Provide an already-created transport instance (e.g. MockTransport)
    pub fn with_transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_config(mut self, config: TaggerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn session_timeout_ms(mut self, ms: u64) -> Self {
        self.config.session_timeout_ms = ms;
        self
    }

    pub fn read_pass_attempts(mut self, attempts: u32) -> Self {
        self.config.read_pass_attempts = attempts;
        self
    }

    pub fn default_weight_grams(mut self, grams: u16) -> Self {
        self.config.default_weight_grams = grams;
        self
    }

    pub fn dump_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.dump_dir = dir.into();
        self
    }

    pub fn max_saved_tags(mut self, max: usize) -> Self {
        self.config.max_saved_tags = max;
        self
    }

    /// Consume the builder. Requires a transport and a valid config.
    pub fn build(self) -> Result<Tagger<T>> {
        self.config.validate()?;
        match self.transport {
            Some(t) => Ok(Tagger::new(t, self.config)),
            None => Err(Error::InvalidConfig("no transport configured".into())),
        }
    }
}
