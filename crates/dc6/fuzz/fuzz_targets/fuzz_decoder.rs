#![no_main]

use libfuzzer_sys::fuzz_target;
use dc6::{compose_direction, dc6_decode, Palette, MAX_CANVAS_BYTES};

fuzz_target!(|data: &[u8]| {
    // The decoder should never panic, regardless of input
    if let Ok(image) = dc6_decode(data) {
        let palette = Palette::grayscale();
        for frames in image.iter_directions() {
            let _ = compose_direction(frames, &palette, MAX_CANVAS_BYTES);
        }
    }
});
