#[path = "../common/mod.rs"]
mod common;

use spooltag::engine::{PassOutcome, ReadProtocol, SessionState};
use spooltag::layout::TagPayload;
use spooltag::test_support::pla_black_payload;
use spooltag::transport::{CardOp, MockTransport, SimCard};
use spooltag::types::SectorPair;

fn programmed_card(payload: &TagPayload) -> SimCard {
    let mut card = SimCard::claimed(common::fixtures::uid_aabbccdd());
    for pair in SectorPair::ALL {
        for (block, data) in payload.blocks_for(pair) {
            card = card.with_block(block, data);
        }
    }
    card
}

fn read_pass(mock: &mut MockTransport, session: &mut SessionState, pair: SectorPair) -> PassOutcome {
    session.set_cursor(pair);
    let mut protocol = ReadProtocol::new();
    common::helpers::drive(mock, &mut protocol, session).unwrap();
    protocol.outcome().unwrap()
}

#[test]
fn both_passes_capture_all_blocks() {
    let payload = pla_black_payload();
    let mut mock = MockTransport::new(programmed_card(&payload));
    let mut session = SessionState::new(common::fixtures::uid_aabbccdd());

    assert_eq!(read_pass(&mut mock, &mut session, SectorPair::Zero), PassOutcome::Complete);
    assert_eq!(read_pass(&mut mock, &mut session, SectorPair::One), PassOutcome::Complete);

    let read = session.read_result();
    assert!(read.valid);
    assert_eq!(read.material, payload.material);
    assert_eq!(read.filament_type, common::fixtures::text_block("PLA"));
    assert_eq!(read.detail, common::fixtures::text_block("PLA Basic"));
    assert_eq!(read.color_weight, common::fixtures::black_1000g_block());
    // Block 6 is written erased when there is no manufacturer.
    assert_eq!(read.manufacturer, None);
}

#[test]
fn blank_card_refuses_derived_key() {
    let mut mock = MockTransport::new(SimCard::blank(common::fixtures::uid_aabbccdd()));
    let mut session = SessionState::new(common::fixtures::uid_aabbccdd());
    assert_eq!(read_pass(&mut mock, &mut session, SectorPair::Zero), PassOutcome::AuthFailed);
    assert!(!session.read_result().valid);
}

#[test]
fn manufacturer_failure_keeps_pass_complete() {
    let mut mock = MockTransport::new(programmed_card(&pla_black_payload()));
    mock.read_failures = vec![6];
    let mut session = SessionState::new(common::fixtures::uid_aabbccdd());
    assert_eq!(read_pass(&mut mock, &mut session, SectorPair::One), PassOutcome::Complete);
    assert_eq!(session.read_result().manufacturer, None);
}

#[test]
fn card_lost_mid_pass_keeps_earlier_blocks() {
    let payload = pla_black_payload();
    let mut mock = MockTransport::new(programmed_card(&payload));
    // auth, read block 4, then the card is gone
    mock.lose_card_after = Some(2);
    let mut session = SessionState::new(common::fixtures::uid_aabbccdd());
    assert_eq!(read_pass(&mut mock, &mut session, SectorPair::One), PassOutcome::CardLost);
    assert_eq!(session.read_result().detail, payload.detail);
    assert!(session.read_result().color_weight.is_zero());
    assert_eq!(mock.events.last(), Some(&"card-detected"));
}

#[test]
fn read_pass_targets_session_cursor() {
    let mut mock = MockTransport::new(programmed_card(&pla_black_payload()));
    let mut session = SessionState::new(common::fixtures::uid_aabbccdd());
    session.set_cursor(SectorPair::One);
    let mut protocol = ReadProtocol::new();
    common::helpers::drive(&mut mock, &mut protocol, &mut session).unwrap();

    assert_eq!(protocol.pair(), Some(SectorPair::One));
    assert_eq!(protocol.outcome(), Some(PassOutcome::Complete));
    assert!(matches!(mock.ops[0], CardOp::Auth { block: 4, ok: true, .. }));
    assert!(!session.read_result().valid);
    assert_eq!(mock.mode_requests[0].uid, Some(common::fixtures::uid_aabbccdd()));

    // Moving the cursor moves the next pass.
    session.set_cursor(SectorPair::Zero);
    let before = mock.ops.len();
    let mut protocol = ReadProtocol::new();
    common::helpers::drive(&mut mock, &mut protocol, &mut session).unwrap();
    assert!(matches!(mock.ops[before], CardOp::Auth { block: 0, ok: true, .. }));
    assert!(session.read_result().valid);
}
