#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let bytes = huffzip::compress_to_vec(text).expect("compression of valid text must succeed");
    let decoded = huffzip::decompress_from_slice(&bytes).expect("own artifact must decode");
    assert_eq!(decoded, text);
});
