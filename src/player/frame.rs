use egui::{Color32, ColorImage};
use image::{ColorType, ImageFormat};
use std::path::Path;
use std::sync::Arc;

use crate::error::{LoadError, PlayerError, Result};

const CHANNELS: usize = 3;

/// A decoded video frame, packed 8-bit RGB, never mutated after creation.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    rgb: Arc<[u8]>,
}

impl Frame {
    /// Wrap a tightly packed RGB buffer (`width * height * 3` bytes).
    pub fn from_rgb(width: u32, height: u32, rgb: Vec<u8>) -> Result<Self, LoadError> {
        let expected = width as usize * height as usize * CHANNELS;
        if rgb.len() != expected {
            return Err(LoadError::FrameSize {
                expected,
                actual: rgb.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgb: rgb.into(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGB bytes, row-major, no padding.
    pub fn rgb(&self) -> &[u8] {
        &self.rgb
    }

    pub fn to_color_image(&self) -> ColorImage {
        let pixels = self
            .rgb
            .chunks_exact(CHANNELS)
            .map(|px| Color32::from_rgb(px[0], px[1], px[2]))
            .collect();
        ColorImage {
            size: [self.width as usize, self.height as usize],
            pixels,
        }
    }

    /// Write the frame as PNG or JPEG, picked from the file extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        let format = match ImageFormat::from_path(path) {
            Ok(format @ (ImageFormat::Png | ImageFormat::Jpeg)) => format,
            _ => {
                return Err(PlayerError::UnsupportedImageFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        image::save_buffer_with_format(
            path,
            &self.rgb,
            self.width,
            self.height,
            ColorType::Rgb8,
            format,
        )
        .map_err(|source| PlayerError::Save {
            path: path.to_path_buf(),
            source,
        })?;

        log::info!(
            "Saved {}x{} frame to {}",
            self.width,
            self.height,
            path.display()
        );
        Ok(())
    }
}

/// Fixed-length, fully decoded video at its native frame rate.
///
/// Never empty: construction fails with [`LoadError::Empty`] so a controller
/// can only ever be built over at least one frame.
#[derive(Clone, Debug)]
pub struct FrameSequence {
    frames: Arc<[Frame]>,
    fps: f64,
}

impl FrameSequence {
    pub fn new(frames: Vec<Frame>, fps: f64) -> Result<Self, LoadError> {
        if frames.is_empty() {
            return Err(LoadError::Empty);
        }
        if !fps.is_finite() || fps <= 0.0 {
            return Err(LoadError::InvalidFrameRate(fps));
        }
        Ok(Self {
            frames: frames.into(),
            fps,
        })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Size of the first frame; all frames of one video share it.
    pub fn frame_size(&self) -> (u32, u32) {
        self.frames[0].size()
    }
}

#[cfg(test)]
pub(crate) fn solid_frame(width: u32, height: u32, rgb: [u8; 3]) -> Frame {
    let data = rgb
        .iter()
        .copied()
        .cycle()
        .take(width as usize * height as usize * CHANNELS)
        .collect();
    Frame::from_rgb(width, height, data).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_rejects_wrong_buffer_size() {
        let err = Frame::from_rgb(4, 4, vec![0; 10]).unwrap_err();
        assert!(matches!(
            err,
            LoadError::FrameSize {
                expected: 48,
                actual: 10
            }
        ));
    }

    #[test]
    fn test_color_image_matches_frame() {
        let frame = solid_frame(3, 2, [10, 20, 30]);
        let image = frame.to_color_image();
        assert_eq!(image.size, [3, 2]);
        assert!(image
            .pixels
            .iter()
            .all(|&p| p == Color32::from_rgb(10, 20, 30)));
    }

    #[test]
    fn test_sequence_rejects_empty() {
        assert!(matches!(
            FrameSequence::new(Vec::new(), 25.0),
            Err(LoadError::Empty)
        ));
    }

    #[test]
    fn test_sequence_rejects_bad_fps() {
        let frames = vec![solid_frame(1, 1, [0, 0, 0])];
        assert!(matches!(
            FrameSequence::new(frames.clone(), 0.0),
            Err(LoadError::InvalidFrameRate(_))
        ));
        assert!(matches!(
            FrameSequence::new(frames, f64::NAN),
            Err(LoadError::InvalidFrameRate(_))
        ));
    }

    #[test]
    fn test_save_png_round_trips_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let frame = solid_frame(4, 3, [200, 100, 50]);

        frame.save(&path).unwrap();

        let saved = image::open(&path).unwrap().to_rgb8();
        assert_eq!(saved.dimensions(), (4, 3));
        assert_eq!(saved.as_raw().as_slice(), frame.rgb());
    }

    #[test]
    fn test_save_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.jpg");
        solid_frame(8, 8, [0, 128, 255]).save(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_save_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.txt");
        let err = solid_frame(2, 2, [0, 0, 0]).save(&path).unwrap_err();
        assert!(matches!(err, PlayerError::UnsupportedImageFormat { .. }));
        assert!(!path.exists());
    }
}
