#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Parsing and decoding may fail on invalid input - that's OK
    // We're looking for panics/crashes, not errors
    let _ = huffzip::decompress_from_slice(data);
});
