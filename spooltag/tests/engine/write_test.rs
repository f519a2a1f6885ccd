#[path = "../common/mod.rs"]
mod common;

use spooltag::engine::{PassOutcome, SessionState, WriteProtocol};
use spooltag::layout::render_trailer;
use spooltag::test_support::{detected_session, mock_tagger, pla_black_payload};
use spooltag::transport::SimCard;
use spooltag::types::{KeyType, SectorKey, SectorPair};

fn write_pass(
    tagger: &mut spooltag::tagger::Tagger<spooltag::transport::MockTransport>,
    session: &mut SessionState,
    pair: SectorPair,
) -> PassOutcome {
    let auth = session.write_authorization().unwrap();
    session.set_cursor(pair);
    let mut protocol = WriteProtocol::new(auth, pla_black_payload());
    common::helpers::drive(tagger.transport_mut(), &mut protocol, session).unwrap();
    protocol.outcome().unwrap()
}

#[test]
fn pass_writes_payload_then_trailer() {
    let mut tagger = mock_tagger(SimCard::blank(common::fixtures::uid_aabbccdd()));
    let mut session = detected_session(&mut tagger).unwrap();
    let before = tagger.transport().ops.len();

    assert_eq!(write_pass(&mut tagger, &mut session, SectorPair::Zero), PassOutcome::Complete);

    let writes: Vec<u8> = tagger.transport().writes().iter().map(|(b, _)| *b).collect();
    assert_eq!(writes, vec![1, 2, 3]);
    let card = tagger.transport().card.as_ref().unwrap();
    let key0 = session.keys().for_pair(SectorPair::Zero);
    assert_eq!(card.trailer(0), render_trailer(&key0));
    assert_eq!(card.key(0, KeyType::B), key0);
    // Sector 1 untouched.
    assert_eq!(card.key(1, KeyType::A), SectorKey::DEFAULT);
    assert!(tagger.transport().ops.len() > before);
}

#[test]
fn trailer_failure_fails_the_whole_pass() {
    let mut tagger = mock_tagger(SimCard::blank(common::fixtures::uid_aabbccdd()));
    let mut session = detected_session(&mut tagger).unwrap();
    tagger.transport_mut().write_failures = vec![7];

    let outcome = write_pass(&mut tagger, &mut session, SectorPair::One);
    assert_eq!(outcome, PassOutcome::WriteFailed { block: 6 });
    assert!(!outcome.is_complete());
    // Payload blocks did land, the pass is still reported failed.
    let writes: Vec<u8> = tagger.transport().writes().iter().map(|(b, _)| *b).collect();
    assert_eq!(writes, vec![4, 5, 6, 7]);
}

#[test]
fn payload_failure_is_attributed_to_its_block() {
    let mut tagger = mock_tagger(SimCard::claimed(common::fixtures::uid_aabbccdd()));
    let mut session = detected_session(&mut tagger).unwrap();
    tagger.transport_mut().write_failures = vec![1];
    assert_eq!(
        write_pass(&mut tagger, &mut session, SectorPair::Zero),
        PassOutcome::WriteFailed { block: 1 }
    );
    // Nothing after the failed block is written.
    let writes: Vec<u8> = tagger.transport().writes().iter().map(|(b, _)| *b).collect();
    assert_eq!(writes, vec![1]);
}

#[test]
fn refused_auth_fails_before_any_write() {
    let mut tagger = mock_tagger(SimCard::blank(common::fixtures::uid_aabbccdd()));
    let mut session = detected_session(&mut tagger).unwrap();
    tagger.transport_mut().auth_failures = vec![0];
    assert_eq!(
        write_pass(&mut tagger, &mut session, SectorPair::Zero),
        PassOutcome::AuthFailed
    );
    assert!(tagger.transport().writes().is_empty());
}

#[test]
fn card_lost_mid_write() {
    let mut tagger = mock_tagger(SimCard::blank(common::fixtures::uid_aabbccdd()));
    let mut session = detected_session(&mut tagger).unwrap();
    let ops = tagger.transport().ops.len();
    // auth and block 1 succeed, then the card leaves
    tagger.transport_mut().lose_card_after = Some(ops + 2);
    assert_eq!(
        write_pass(&mut tagger, &mut session, SectorPair::Zero),
        PassOutcome::CardLost
    );
}
