// spooltag-rs/spooltag/src/transport/mod.rs

pub mod mock;
pub mod traits;

pub use mock::{CardOp, MockTransport, SimCard};
pub use traits::{
    CardPoller, Directive, EventHandler, ModeRequest, PollerEvent, PollerMode,
    SectorTrailerRequest, Transport, WriteBlockRequest,
};
