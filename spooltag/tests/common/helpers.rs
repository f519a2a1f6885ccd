// helpers.rs: transport and session setup shared by integration tests

use spooltag::engine::{Protocol, SessionHandler, SessionState};
use spooltag::tagger::{Tagger, TaggerBuilder};
use spooltag::transport::{MockTransport, SimCard, Transport};
use spooltag::Result;

/// Surface `log` output when RUST_LOG is set.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn tagger_with(card: SimCard) -> Tagger<MockTransport> {
    init_logger();
    TaggerBuilder::new()
        .with_transport(MockTransport::new(card))
        .build()
        .unwrap()
}

/// Drive one protocol directly over a mock, bypassing the orchestrator.
pub fn drive<P: Protocol>(
    mock: &mut MockTransport,
    protocol: &mut P,
    session: &mut SessionState,
) -> Result<()> {
    let mut handler = SessionHandler::new(protocol, session);
    mock.run(&mut handler, 1000)
}
