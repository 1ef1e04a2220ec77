#![no_main]

use libfuzzer_sys::fuzz_target;
use dc6::{dc6_decode, dc6_encode, encode_rle, EncodeFrame};
use arbitrary::Arbitrary;

#[derive(Arbitrary, Debug)]
struct FuzzFrame {
    width: u8,
    height: u8,
    offset_x: i16,
    offset_y: i16,
    flip: bool,
    pixels: Vec<u8>,
}

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    directions: u8,
    frames_per_direction: u8,
    frames: Vec<FuzzFrame>,
}

fuzz_target!(|input: FuzzInput| {
    let directions = (input.directions % 4).max(1) as u32;
    let per = (input.frames_per_direction % 4).max(1) as u32;
    let count = (directions * per) as usize;
    if input.frames.len() < count {
        return;
    }

    let frames: Vec<EncodeFrame> = input.frames[..count]
        .iter()
        .map(|f| {
            let (w, h) = (f.width as usize, f.height as usize);
            let mut pixels = f.pixels.clone();
            pixels.resize(w * h, 0);
            EncodeFrame::new(w as u32, h as u32, pixels)
                .with_offset(f.offset_x as i32, f.offset_y as i32)
                .with_flip(f.flip as u32)
        })
        .collect();

    let data = dc6_encode(directions, per, &frames).expect("consistent frames encode");
    let image = dc6_decode(&data).expect("encoder output must decode");

    assert_eq!(image.frame_count(), count);
    for (decoded, original) in image.frames().iter().zip(&frames) {
        assert_eq!(decoded.pixels(), &original.pixels[..]);
        let rle = encode_rle(decoded.pixels(), decoded.width(), decoded.height()).unwrap();
        assert_eq!(rle.len(), decoded.header().length as usize);
    }
});
