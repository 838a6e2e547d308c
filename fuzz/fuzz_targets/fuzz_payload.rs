#![no_main]

use huffzip::{CodeTable, FrequencyTable, HuffmanDecoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // Decode arbitrary payload bytes against a fixed, valid table
    let table = CodeTable::from_frequencies(&FrequencyTable::from_text("aaaabbbccd"));
    let _ = HuffmanDecoder::new(&table).decode(data);
});
