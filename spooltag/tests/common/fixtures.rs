// fixtures.rs: provides commonly used UIDs, keys and blocks

use spooltag::types::{BlockData, Uid};

pub fn uid_aabbccdd() -> Uid {
    Uid::try_from(&[0xAA, 0xBB, 0xCC, 0xDD][..]).unwrap()
}

pub fn uid_04123456() -> Uid {
    Uid::try_from(&[0x04, 0x12, 0x34, 0x56][..]).unwrap()
}

pub fn uid_seven_bytes() -> Uid {
    Uid::try_from(&[0x04, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66][..]).unwrap()
}

pub fn uid_ten_bytes() -> Uid {
    Uid::try_from(&[0x04, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09][..]).unwrap()
}

/// (uid hex, key 0, key 1, key 15)
pub const GOLDEN_KEYS: [(&str, &str, &str, &str); 3] = [
    ("04123456", "01CA90ABBF72", "93D44C7A2403", "9D54B01733A2"),
    ("AABBCCDD", "C792D1FE6973", "CEDCEAE708EE", "CD804F289176"),
    ("04112233445566", "8B98C0AA4346", "7C1DDC9371FD", "0E4BEA4999C2"),
];

/// Block 5 for Black at 1000 g.
pub fn black_1000g_block() -> BlockData {
    BlockData::from_bytes([
        0x00, 0x00, 0x00, 0xFF, 0xE8, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00,
    ])
}

pub fn text_block(s: &str) -> BlockData {
    let mut b = [0u8; 16];
    b[..s.len()].copy_from_slice(s.as_bytes());
    BlockData::from_bytes(b)
}
