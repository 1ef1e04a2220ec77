//! PNG and GIF writers behind the library's `PixelSink` trait.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use dc6::{Animation, Disposal, PixelSink, StillFrame};
use log::{info, warn};

use crate::CliError;

/// GIF encoder speed passed to `gif::Frame::from_rgba_speed` (1 best .. 30 fastest).
const GIF_SPEED: i32 = 10;

/// Writes converted frames next to each other in `dir`, named after `stem`.
pub struct ImageFileSink {
    dir: PathBuf,
    stem: String,
    saved: Vec<PathBuf>,
}

impl ImageFileSink {
    pub fn new(dir: &Path, stem: &str) -> Self {
        Self {
            dir: dir.to_path_buf(),
            stem: stem.to_string(),
            saved: Vec::new(),
        }
    }

    pub fn into_saved(self) -> Vec<PathBuf> {
        self.saved
    }

    fn still_path(&self, still: &StillFrame<'_>) -> PathBuf {
        if still.frame_count == 1 {
            self.dir.join(format!("{}.png", self.stem))
        } else {
            self.dir.join(format!("{}_frame{}.png", self.stem, still.index))
        }
    }

    fn animation_path(&self, animation: &Animation<'_>) -> PathBuf {
        if animation.directions == 1 {
            self.dir.join(format!("{}.gif", self.stem))
        } else {
            self.dir
                .join(format!("{}_dir{}.gif", self.stem, animation.direction))
        }
    }

    fn record(&mut self, path: PathBuf) {
        info!("  image saved: {}", path.display());
        self.saved.push(path);
    }
}

impl PixelSink for ImageFileSink {
    type Error = CliError;

    fn write_still(&mut self, still: &StillFrame<'_>) -> Result<(), CliError> {
        let path = self.still_path(still);
        let image = still.image;
        if image.width == 0 || image.height == 0 {
            warn!("  skipping empty frame {} of {}", still.index, self.stem);
            return Ok(());
        }

        image::save_buffer(
            &path,
            &image.pixels,
            image.width as u32,
            image.height as u32,
            image::ExtendedColorType::Rgba8,
        )?;
        self.record(path);
        Ok(())
    }

    fn write_animation(&mut self, animation: &Animation<'_>) -> Result<(), CliError> {
        let path = self.animation_path(animation);
        if animation.width == 0 || animation.height == 0 {
            warn!(
                "  skipping empty direction {} of {}",
                animation.direction, self.stem
            );
            return Ok(());
        }
        let (width, height) = match (
            u16::try_from(animation.width),
            u16::try_from(animation.height),
        ) {
            (Ok(w), Ok(h)) => (w, h),
            _ => {
                return Err(CliError::GifDimensions {
                    width: animation.width,
                    height: animation.height,
                })
            }
        };

        let file = File::create(&path).map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?;
        let mut encoder = gif::Encoder::new(BufWriter::new(file), width, height, &[])?;
        encoder.set_repeat(gif::Repeat::Infinite)?;

        for frame in animation.frames {
            let mut pixels = frame.image.pixels.clone();
            let mut gif_frame = gif::Frame::from_rgba_speed(width, height, &mut pixels, GIF_SPEED);
            gif_frame.delay = frame.delay;
            gif_frame.dispose = match frame.disposal {
                Disposal::Keep => gif::DisposalMethod::Keep,
                Disposal::RestoreToBackground => gif::DisposalMethod::Background,
            };
            encoder.write_frame(&gif_frame)?;
        }
        encoder
            .into_inner()
            .and_then(|mut writer| writer.flush())
            .map_err(|source| CliError::Io {
                path: path.clone(),
                source,
            })?;

        self.record(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dc6::{AnimatedFrame, RgbaFrame};
    use pretty_assertions::assert_eq;

    fn animation_frames() -> Vec<AnimatedFrame> {
        let mut image = RgbaFrame::transparent(4, 4);
        image.pixels[..4].copy_from_slice(&[200, 100, 50, 255]);
        vec![AnimatedFrame {
            image,
            delay: 10,
            disposal: Disposal::RestoreToBackground,
        }]
    }

    #[test]
    fn writes_single_direction_gif() {
        let tmp = tempfile::tempdir().unwrap();
        let frames = animation_frames();
        let mut sink = ImageFileSink::new(tmp.path(), "walk");
        sink.write_animation(&Animation {
            direction: 0,
            directions: 1,
            width: 4,
            height: 4,
            frames: &frames,
        })
        .unwrap();

        let saved = sink.into_saved();
        assert_eq!(saved, vec![tmp.path().join("walk.gif")]);
        let bytes = std::fs::read(&saved[0]).unwrap();
        assert!(bytes.starts_with(b"GIF89a"));
        assert_eq!(bytes.last(), Some(&0x3b));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn gif_flush_failure_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink("/dev/full", tmp.path().join("walk.gif")).unwrap();

        let frames = animation_frames();
        let mut sink = ImageFileSink::new(tmp.path(), "walk");
        let result = sink.write_animation(&Animation {
            direction: 0,
            directions: 1,
            width: 4,
            height: 4,
            frames: &frames,
        });

        assert!(matches!(result, Err(CliError::Io { .. })));
        assert!(sink.into_saved().is_empty());
    }
}
