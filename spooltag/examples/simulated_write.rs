//! Program a simulated blank card, read it back and save a dump.
//!
//! Run with `RUST_LOG=debug cargo run --example simulated_write`.

use spooltag::prelude::*;
use spooltag::transport::{MockTransport, SimCard};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let uid = Uid::try_from(&[0x04, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66][..])?;
    let dump_dir = std::env::temp_dir().join("spooltag-demo");
    let mut tagger = TaggerBuilder::new()
        .with_transport(MockTransport::new(SimCard::blank(uid)))
        .dump_dir(&dump_dir)
        .build()?;

    let selection = tagger.config().selection(0, 0).with_manufacturer("DEMO");
    let payload = TagPayload::from_selection(&selection)?;
    let (_, report) = tagger.program(&payload)?;
    report.into_result()?;

    let (session, read) = tagger.read_tag()?;
    let summary = TagSummary::parse(&read.result)?;
    println!(
        "{}: {} {} {} {} g",
        session.uid(),
        summary.material_id,
        summary.detail,
        summary.color_hex(),
        summary.weight_grams
    );

    let path = tagger.dump_store().save(&TagDump::from_session(&session))?;
    println!("saved {}", path.display());
    Ok(())
}
