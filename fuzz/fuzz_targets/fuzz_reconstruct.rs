#![no_main]

use libfuzzer_sys::fuzz_target;
use prime_share::{ShamirShare, Share};

// Fuzzing target for share decoding and reconstruction
//
// The first byte picks a record length; the rest of the input is cut into
// records of that length and handed to the decoder and the reconstructor.
// Covers truncated records, zero and duplicate indices, values at or above
// the field modulus, and mixed widths. Every path must return a Result and
// never panic.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // Keep widths small so the modulus search stays cheap
    let record_len = (data[0] % 24) as usize + 1;
    let body = &data[1..];

    let records: Vec<&[u8]> = body.chunks(record_len).take(16).collect();
    let _result = ShamirShare::reconstruct_encoded(&records);

    let shares: Vec<Share> = records
        .iter()
        .filter_map(|r| Share::from_bytes(r).ok())
        .collect();
    let _result = ShamirShare::reconstruct(&shares);

    if !shares.is_empty() {
        let _result = ShamirShare::reconstruct(&shares[0..1]);

        let duplicate = vec![shares[0].clone(), shares[0].clone()];
        let _result = ShamirShare::reconstruct(&duplicate);

        let mut zero_index = shares.clone();
        zero_index[0].index = 0;
        let _result = ShamirShare::reconstruct(&zero_index);
    }

    // Anything that decodes must encode back to the same bytes
    for record in &records {
        if let Ok(share) = Share::from_bytes(record) {
            if let Ok(encoded) = share.to_bytes() {
                assert_eq!(&encoded[..], *record);
            }
        }
    }
});
