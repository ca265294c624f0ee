#![no_main]

use cedar_codecs::codec::mpeg12::parser::find_start_code;
use cedar_codecs::codec::mpeg12::parser::payload_offset;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let offset = payload_offset(data);

    match find_start_code(data) {
        Ok(found) => {
            assert_eq!(found, offset);
            assert!(found + 4 <= data.len());
            assert_eq!(&data[found..found + 3], &[0x00, 0x00, 0x01]);
            assert!((0x01..=0xaf).contains(&data[found + 3]));
        }
        Err(_) => assert_eq!(offset, 0),
    }
});
