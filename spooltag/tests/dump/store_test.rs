#[path = "../common/mod.rs"]
mod common;

use spooltag::dump::{DumpStore, TagDump};
use spooltag::tagger::TaggerBuilder;
use spooltag::test_support::pla_black_payload;
use spooltag::transport::{MockTransport, SimCard};
use spooltag::types::SectorPair;
use tempfile::TempDir;

#[test]
fn read_then_save_then_load() {
    let temp_dir = TempDir::new().unwrap();
    let uid = common::fixtures::uid_seven_bytes();
    let payload = pla_black_payload();
    let mut card = SimCard::claimed(uid);
    for pair in SectorPair::ALL {
        for (block, data) in payload.blocks_for(pair) {
            card = card.with_block(block, data);
        }
    }
    let mut tagger = TaggerBuilder::new()
        .with_transport(MockTransport::new(card))
        .dump_dir(temp_dir.path().join("bambu_tagger"))
        .build()
        .unwrap();

    let (session, report) = tagger.read_tag().unwrap();
    assert!(report.is_valid());

    let store = tagger.dump_store();
    let dump = TagDump::from_session(&session);
    let path = store.save(&dump).unwrap();
    assert!(path.ends_with("04112233445566.btag"));

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("Filetype: Bambu Tag\nVersion: 1\nUID: 04 11 22 33 44 55 66\nUID_len: 7\n"));
    assert!(text.contains("Block_5: 00 00 00 FF E8 03 00 00 00 00 00 00 00 00 00 00\n"));

    assert_eq!(store.list().unwrap(), vec!["04112233445566.btag"]);
    assert_eq!(store.load("04112233445566.btag").unwrap(), dump);
}

#[test]
fn store_ignores_foreign_files_and_directories() {
    let temp_dir = TempDir::new().unwrap();
    let store = DumpStore::new(temp_dir.path());
    std::fs::create_dir(temp_dir.path().join("sub.btag")).unwrap();
    std::fs::write(temp_dir.path().join(".btag"), "").unwrap();
    std::fs::write(temp_dir.path().join("x.nfc"), "").unwrap();
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn corrupt_dump_is_a_format_error() {
    let temp_dir = TempDir::new().unwrap();
    let store = DumpStore::new(temp_dir.path());
    std::fs::write(temp_dir.path().join("BAD.btag"), "Filetype: Bambu Tag\nUID: AA BB\n").unwrap();
    assert!(matches!(
        store.load("BAD.btag"),
        Err(spooltag::Error::DumpFormat(_))
    ));
}
