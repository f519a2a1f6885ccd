#[path = "../common/mod.rs"]
mod common;

use proptest::prelude::*;
use spooltag::crypto::derive_keys;
use spooltag::engine::SessionState;
use spooltag::types::{SectorPair, Uid};

#[test]
fn golden_vectors() {
    for (uid_hex, k0, k1, k15) in common::fixtures::GOLDEN_KEYS {
        let uid = Uid::try_from(hex::decode(uid_hex).unwrap().as_slice()).unwrap();
        let keys = derive_keys(&uid);
        assert_eq!(hex::encode_upper(keys.as_slice()[0].as_bytes()), k0, "uid {}", uid_hex);
        assert_eq!(keys.as_slice()[1].to_hex(), k1, "uid {}", uid_hex);
        assert_eq!(keys.as_slice()[15].to_hex(), k15, "uid {}", uid_hex);
    }
}

#[test]
fn session_keys_match_derivation_for_every_uid_length() {
    for uid in [
        common::fixtures::uid_04123456(),
        common::fixtures::uid_seven_bytes(),
        common::fixtures::uid_ten_bytes(),
    ] {
        let session = SessionState::new(uid);
        assert_eq!(session.keys(), &derive_keys(&uid));
        assert_eq!(
            session.keys().for_pair(SectorPair::One),
            derive_keys(&uid).as_slice()[1]
        );
    }
}

#[test]
fn uid_length_bounds() {
    assert!(Uid::try_from(&[1u8, 2, 3][..]).is_err());
    assert!(Uid::try_from(&[0u8; 11][..]).is_err());
    assert_eq!(common::fixtures::uid_ten_bytes().len(), 10);
}

proptest! {
    #[test]
    fn derivation_is_deterministic(bytes in proptest::collection::vec(any::<u8>(), 4..=10)) {
        let uid = Uid::try_from(bytes.as_slice()).unwrap();
        prop_assert_eq!(derive_keys(&uid), derive_keys(&uid));
    }

    #[test]
    fn different_uids_give_different_sector_zero_keys(a in any::<[u8; 4]>(), b in any::<[u8; 4]>()) {
        prop_assume!(a != b);
        let ka = derive_keys(&Uid::try_from(&a[..]).unwrap());
        let kb = derive_keys(&Uid::try_from(&b[..]).unwrap());
        prop_assert_ne!(ka.as_slice()[0], kb.as_slice()[0]);
    }
}
