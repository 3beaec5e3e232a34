#![no_main]

use libfuzzer_sys::fuzz_target;
use yaml_scanner::{Scanner, TokenData};

fuzz_target!(|data: &[u8]| fuzz_target(data));

fn fuzz_target(mut data: &[u8]) {
    let mut scanner = Scanner::new();
    scanner.set_input(&mut data);

    let mut open = 0usize;
    for token in scanner.by_ref() {
        let Ok(token) = token else {
            return;
        };
        match token.data {
            TokenData::BlockSequenceStart | TokenData::BlockMappingStart => open += 1,
            TokenData::BlockEnd => {
                open = open
                    .checked_sub(1)
                    .expect("block end without a matching start");
            }
            TokenData::StreamEnd => assert_eq!(open, 0, "unclosed block collections"),
            _ => {}
        }
    }
    assert!(!scanner.has_next());
}
