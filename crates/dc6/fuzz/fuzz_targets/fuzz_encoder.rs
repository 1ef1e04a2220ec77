#![no_main]

use libfuzzer_sys::fuzz_target;
use dc6::encode_rle;
use arbitrary::Arbitrary;

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    width: u8,
    height: u8,
    pixels: Vec<u8>,
}

fuzz_target!(|input: FuzzInput| {
    let width = input.width as usize;
    let height = input.height as usize;

    // Mismatched buffers must be rejected, never panic
    let _ = encode_rle(&input.pixels, width, height);

    if input.pixels.len() >= width * height {
        let rle = encode_rle(&input.pixels[..width * height], width, height);
        assert!(rle.is_ok());
    }
});
