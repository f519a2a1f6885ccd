#[path = "../common/mod.rs"]
mod common;

use spooltag::engine::{DetectProtocol, Engine, KeySource, SessionState};
use spooltag::transport::{CardOp, MockTransport, SimCard};
use spooltag::types::{CardClassification, KeyType, SectorPair};

fn detect(card: SimCard) -> (SessionState, MockTransport) {
    common::helpers::init_logger();
    let uid = card.uid();
    let mut mock = MockTransport::new(card);
    let mut session = SessionState::new(uid);
    let mut protocol = DetectProtocol::new();
    common::helpers::drive(&mut mock, &mut protocol, &mut session).unwrap();
    (session, mock)
}

#[test]
fn blank_card_is_rewritable_with_default_key() {
    let (session, mock) = detect(SimCard::blank(common::fixtures::uid_aabbccdd()));
    assert_eq!(session.classification(), CardClassification::Rewritable);
    assert_eq!(session.use_default_key(), Some(true));
    // One authentication with the derived sector 0 key, refused.
    assert_eq!(
        mock.ops,
        vec![CardOp::Auth {
            block: 0,
            key: session.keys().for_pair(SectorPair::Zero),
            key_type: KeyType::A,
            ok: false,
        }]
    );
}

#[test]
fn claimed_card_is_rewritable_with_derived_key() {
    let (session, mock) = detect(SimCard::claimed(common::fixtures::uid_aabbccdd()));
    assert_eq!(session.classification(), CardClassification::Rewritable);
    assert_eq!(session.use_default_key(), Some(false));
    assert_eq!(
        session.detection().unwrap().key_source(),
        Some(KeySource::Derived)
    );
    assert!(mock.ops.contains(&CardOp::Read { block: 3 }));
}

#[test]
fn original_card_is_not_writable() {
    let (session, _) = detect(SimCard::original(common::fixtures::uid_aabbccdd()));
    assert_eq!(session.classification(), CardClassification::Original);
    assert!(session.write_authorization().is_err());
}

#[test]
fn unreadable_trailer_degrades_to_original() {
    let uid = common::fixtures::uid_aabbccdd();
    let mut mock = MockTransport::new(SimCard::claimed(uid));
    mock.read_failures = vec![3];
    let mut session = SessionState::new(uid);
    common::helpers::drive(&mut mock, &mut DetectProtocol::new(), &mut session).unwrap();
    assert_eq!(session.classification(), CardClassification::Original);
}

#[test]
fn card_lost_during_auth_leaves_unknown() {
    let uid = common::fixtures::uid_aabbccdd();
    let mut mock = MockTransport::new(SimCard::blank(uid));
    mock.lose_card_after = Some(0);
    let mut session = SessionState::new(uid);
    let mut protocol = DetectProtocol::new();
    common::helpers::drive(&mut mock, &mut protocol, &mut session).unwrap();
    assert!(protocol.detection().is_none());
    assert_eq!(session.classification(), CardClassification::Unknown);
}

#[test]
fn detection_is_idempotent() {
    for card in [
        SimCard::blank(common::fixtures::uid_04123456()),
        SimCard::claimed(common::fixtures::uid_seven_bytes()),
        SimCard::original(common::fixtures::uid_ten_bytes()),
    ] {
        let (first, _) = detect(card.clone());
        let (second, _) = detect(card);
        assert_eq!(first.detection(), second.detection());
    }
}

#[test]
fn engine_enum_runs_detection() {
    let uid = common::fixtures::uid_aabbccdd();
    let mut mock = MockTransport::new(SimCard::blank(uid));
    let mut session = SessionState::new(uid);
    let mut engine = Engine::from(DetectProtocol::new());
    common::helpers::drive(&mut mock, &mut engine, &mut session).unwrap();
    assert_eq!(session.classification(), CardClassification::Rewritable);
    assert_eq!(mock.events, vec!["request-mode", "card-detected"]);
    assert!(engine.outcome().is_none());
}
