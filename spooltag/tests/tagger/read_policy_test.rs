#[path = "../common/mod.rs"]
mod common;

use spooltag::engine::PassOutcome;
use spooltag::tagger::TaggerBuilder;
use spooltag::test_support::pla_black_payload;
use spooltag::transport::{MockTransport, SimCard};
use spooltag::types::SectorPair;

fn programmed_claimed_card() -> SimCard {
    let payload = pla_black_payload();
    let mut card = SimCard::claimed(common::fixtures::uid_aabbccdd());
    for pair in SectorPair::ALL {
        for (block, data) in payload.blocks_for(pair) {
            card = card.with_block(block, data);
        }
    }
    card
}

#[test]
fn sector_one_lost_still_valid() {
    let mut tagger = common::helpers::tagger_with(programmed_claimed_card());
    let mut session = tagger.scan().unwrap();
    // Pair 0 takes auth + 2 reads; the card leaves before pair 1 starts.
    tagger.transport_mut().lose_card_after = Some(3);
    let report = tagger.read(&mut session).unwrap();

    assert!(report.is_valid());
    assert_eq!(report.outcome(SectorPair::Zero), Some(PassOutcome::Complete));
    assert_eq!(report.outcome(SectorPair::One), Some(PassOutcome::CardLost));
    assert_eq!(report.result.filament_type, pla_black_payload().filament_type);
    assert!(report.result.detail.is_zero());
    assert!(report.result.color_weight.is_zero());
    assert_eq!(report.result.manufacturer, None);
}

#[test]
fn sector_zero_failure_invalidates_the_read() {
    let mut tagger = common::helpers::tagger_with(programmed_claimed_card());
    tagger.transport_mut().read_failures = vec![2];
    let (_, report) = tagger.read_tag().unwrap();

    assert!(!report.is_valid());
    assert_eq!(
        report.outcome(SectorPair::Zero),
        Some(PassOutcome::ReadFailed { block: 2 })
    );
    // Pair 1 never runs.
    assert_eq!(report.outcome(SectorPair::One), None);
}

#[test]
fn blank_card_is_not_readable() {
    let mut tagger = common::helpers::tagger_with(SimCard::blank(common::fixtures::uid_aabbccdd()));
    let (_, report) = tagger.read_tag().unwrap();
    assert!(!report.is_valid());
    assert_eq!(report.outcome(SectorPair::Zero), Some(PassOutcome::AuthFailed));
}

#[test]
fn retries_are_bounded_by_config() {
    let mut tagger = TaggerBuilder::new()
        .with_transport(MockTransport::new(programmed_claimed_card()))
        .read_pass_attempts(3)
        .build()
        .unwrap();
    tagger.transport_mut().read_failures = vec![1];
    let (_, report) = tagger.read_tag().unwrap();
    assert!(!report.is_valid());
    // One scan session plus three read attempts.
    assert_eq!(tagger.transport().sessions, 4);
}

#[test]
fn transient_failure_recovers_with_retry() {
    let mut tagger = TaggerBuilder::new()
        .with_transport(MockTransport::new(programmed_claimed_card()))
        .read_pass_attempts(2)
        .build()
        .unwrap();
    tagger.transport_mut().flaky_reads = 1;
    let (_, report) = tagger.read_tag().unwrap();
    assert!(report.is_valid());
    assert_eq!(report.outcome(SectorPair::One), Some(PassOutcome::Complete));
}

#[test]
fn read_resets_previous_buffers() {
    let mut tagger = common::helpers::tagger_with(programmed_claimed_card());
    let mut session = tagger.scan().unwrap();
    assert!(tagger.read(&mut session).unwrap().is_valid());

    tagger.transport_mut().read_failures = vec![1];
    let report = tagger.read(&mut session).unwrap();
    assert!(!report.is_valid());
    assert!(report.result.detail.is_zero());
}
