use egui::{ColorImage, Pos2, Rect, Vec2};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use std::path::Path;

/// Where a freshly created overlay sits, relative to the displayed image.
pub const DEFAULT_POSITION: Pos2 = Pos2::new(10.0, 10.0);

/// Draggable marker drawn over the displayed frame.
///
/// Position and size are in surface points, measured from the top-left of
/// the displayed image, so the marker looks the same whatever the video
/// resolution or window size. The position is not clamped; the marker may
/// sit partly or wholly outside the image, in which case only the visible
/// part is drawn.
pub struct Overlay {
    position: Pos2,
    marker: RgbaImage,
}

impl Overlay {
    pub fn new(marker: RgbaImage) -> Self {
        Self {
            position: DEFAULT_POSITION,
            marker,
        }
    }

    /// Build from a marker image file scaled to `width`, falling back to a
    /// generated marker when the file cannot be read.
    pub fn from_asset(path: &Path, width: u32) -> Self {
        let marker = match load_marker(path, width) {
            Ok(marker) => marker,
            Err(e) => {
                log::warn!(
                    "Overlay asset {} unavailable ({}), using built-in marker",
                    path.display(),
                    e
                );
                default_marker(width)
            }
        };
        Self::new(marker)
    }

    pub fn position(&self) -> Pos2 {
        self.position
    }

    pub fn set_position(&mut self, position: Pos2) {
        self.position = position;
    }

    pub fn marker_size(&self) -> (u32, u32) {
        self.marker.dimensions()
    }

    /// Marker pixels ready for texture upload.
    pub fn marker_image(&self) -> ColorImage {
        let (w, h) = self.marker.dimensions();
        ColorImage::from_rgba_unmultiplied([w as usize, h as usize], self.marker.as_raw())
    }

    /// Screen rectangle of the marker over an image displayed at `image_rect`.
    /// One marker pixel is one point regardless of how the image is scaled.
    pub fn marker_rect(&self, image_rect: Rect) -> Rect {
        let (w, h) = self.marker.dimensions();
        Rect::from_min_size(
            image_rect.min + self.position.to_vec2(),
            Vec2::new(w as f32, h as f32),
        )
    }
}

/// Load a marker image and scale it to `width`, keeping its aspect ratio.
pub fn load_marker(path: &Path, width: u32) -> image::ImageResult<RgbaImage> {
    let source = image::open(path)?.into_rgba8();
    let (w, h) = source.dimensions();
    let height = ((u64::from(h) * u64::from(width)) / u64::from(w.max(1))).max(1) as u32;
    Ok(imageops::resize(&source, width, height, FilterType::Triangle))
}

/// Square ring marker used when no asset is available.
pub fn default_marker(width: u32) -> RgbaImage {
    let center = width as f32 / 2.0;
    let outer = center;
    let inner = (center - (width as f32 / 10.0).max(1.0)).max(0.0);
    RgbaImage::from_fn(width, width, |x, y| {
        let dx = x as f32 + 0.5 - center;
        let dy = y as f32 + 0.5 - center;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance <= outer && distance >= inner {
            Rgba([255, 40, 40, 220])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}
