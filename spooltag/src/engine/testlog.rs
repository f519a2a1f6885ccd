//! Captures `log` records so tests can check what was reported and at
//! which level.

use std::sync::{Mutex, Once};

use log::{Level, Log, Metadata, Record};

struct Capture {
    records: Mutex<Vec<(Level, String)>>,
}

impl Log for Capture {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        if let Ok(mut records) = self.records.lock() {
            records.push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static CAPTURE: Capture = Capture {
    records: Mutex::new(Vec::new()),
};
static INIT: Once = Once::new();

pub(crate) fn install() {
    INIT.call_once(|| {
        if log::set_logger(&CAPTURE).is_ok() {
            log::set_max_level(log::LevelFilter::Trace);
        }
    });
}

/// True if some record at `level` contains `needle`. Tests run in
/// parallel, so needles should name something unique to the test.
pub(crate) fn logged(level: Level, needle: &str) -> bool {
    CAPTURE
        .records
        .lock()
        .map(|records| records.iter().any(|(l, m)| *l == level && m.contains(needle)))
        .unwrap_or(false)
}
