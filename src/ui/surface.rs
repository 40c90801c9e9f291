use egui::{pos2, Color32, Image, Pos2, Rect, Sense, TextureHandle, TextureOptions, Ui, Vec2};

use crate::overlay::Overlay;
use crate::player::{PlaybackController, Scheduler};

/// Displays the presented frame with the overlay marker drawn on top and
/// forwards left-button presses and drags to the overlay.
#[derive(Default)]
pub struct VideoSurface {
    texture: Option<TextureHandle>,
    marker: Option<TextureHandle>,
    shown_version: Option<u64>,
}

impl VideoSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the uploaded frame, e.g. after a different video was loaded.
    pub fn reset(&mut self) {
        self.shown_version = None;
    }

    /// Draw the current frame. The overlay only follows the pointer while
    /// `interactive` is set.
    pub fn show<S: Scheduler>(
        &mut self,
        ui: &mut Ui,
        player: &PlaybackController<S>,
        overlay: &mut Overlay,
        interactive: bool,
    ) {
        let Some(frame) = player.presented_frame() else {
            return;
        };

        // Upload only when the controller presented a new frame
        let version = player.frame_version();
        if self.shown_version != Some(version) {
            let image = frame.to_color_image();
            match self.texture {
                Some(ref mut texture) => texture.set(image, TextureOptions::LINEAR),
                None => {
                    self.texture = Some(ui.ctx().load_texture(
                        "video_frame",
                        image,
                        TextureOptions::LINEAR,
                    ))
                }
            }
            self.shown_version = Some(version);
        }
        let marker = self.marker.get_or_insert_with(|| {
            ui.ctx().load_texture(
                "overlay_marker",
                overlay.marker_image(),
                TextureOptions::LINEAR,
            )
        });

        let Some(texture) = self.texture.as_ref() else {
            return;
        };

        // Scale to fit while maintaining aspect ratio
        let display_size = fit_to(ui.available_size(), frame.size());
        let response = ui
            .centered_and_justified(|ui| {
                ui.add(Image::new((texture.id(), display_size)).sense(Sense::click_and_drag()))
            })
            .inner;
        let image_rect = Rect::from_center_size(response.rect.center(), display_size);

        let pressed =
            response.is_pointer_button_down_on() && ui.input(|i| i.pointer.primary_down());
        let pointer = response.interact_pointer_pos();
        if let Some(position) = drag_target(interactive && pressed, pointer, image_rect) {
            overlay.set_position(position);
        }

        // Fixed on-screen size, clipped to the image
        ui.painter_at(image_rect).image(
            marker.id(),
            overlay.marker_rect(image_rect),
            Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
            Color32::WHITE,
        );
    }
}

/// Largest size with the frame's aspect ratio that fits in `available`.
pub fn fit_to(available: Vec2, frame_size: (u32, u32)) -> Vec2 {
    let (w, h) = (frame_size.0.max(1) as f32, frame_size.1.max(1) as f32);
    let aspect = w / h;
    let available_aspect = available.x / available.y;

    if aspect > available_aspect {
        Vec2::new(available.x, available.x / aspect)
    } else {
        Vec2::new(available.y * aspect, available.y)
    }
}

/// Map a screen point into coordinates relative to the displayed image.
/// Points outside the image map outside it; nothing is clamped.
pub fn surface_to_local(pointer: Pos2, image_rect: Rect) -> Pos2 {
    (pointer - image_rect.min).to_pos2()
}

/// New overlay position for a press or drag, `None` when the overlay stays put.
pub fn drag_target(active: bool, pointer: Option<Pos2>, image_rect: Rect) -> Option<Pos2> {
    if !active {
        return None;
    }
    pointer.map(|p| surface_to_local(p, image_rect))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_wide_frame_into_square() {
        let size = fit_to(Vec2::new(400.0, 400.0), (1920, 1080));
        assert_eq!(size.x, 400.0);
        assert!((size.y - 225.0).abs() < 0.01);
    }

    #[test]
    fn test_fit_tall_frame_into_wide_area() {
        let size = fit_to(Vec2::new(1000.0, 500.0), (500, 1000));
        assert_eq!(size, Vec2::new(250.0, 500.0));
    }

    #[test]
    fn test_surface_to_local_is_unscaled() {
        let rect = Rect::from_min_size(Pos2::new(100.0, 50.0), Vec2::new(320.0, 180.0));
        let p = surface_to_local(Pos2::new(260.0, 140.0), rect);
        assert_eq!(p, Pos2::new(160.0, 90.0));
    }

    #[test]
    fn test_surface_to_local_allows_outside_points() {
        let rect = Rect::from_min_size(Pos2::new(0.0, 0.0), Vec2::new(100.0, 100.0));
        let p = surface_to_local(Pos2::new(-10.0, 150.0), rect);
        assert_eq!(p, Pos2::new(-10.0, 150.0));
    }

    #[test]
    fn test_marker_extent_independent_of_frame_resolution() {
        let available = Vec2::new(1280.0, 720.0);
        let overlay = Overlay::new(image::RgbaImage::new(100, 100));

        let extent = |frame_size: (u32, u32)| {
            let image_rect = Rect::from_center_size(Pos2::ZERO, fit_to(available, frame_size));
            let marker = overlay.marker_rect(image_rect);
            (marker.min - image_rect.min, marker.size())
        };

        let uhd = extent((3840, 2160));
        let small = extent((320, 240));
        assert_eq!(uhd, small);
        assert_eq!(uhd, (Vec2::new(10.0, 10.0), Vec2::new(100.0, 100.0)));
    }

    #[test]
    fn test_drag_moves_overlay_in_surface_points() {
        let rect = Rect::from_min_size(Pos2::new(40.0, 0.0), Vec2::new(1200.0, 675.0));
        let mut overlay = Overlay::new(image::RgbaImage::new(100, 100));

        let target = drag_target(true, Some(Pos2::new(140.0, 60.0)), rect).unwrap();
        overlay.set_position(target);

        assert_eq!(overlay.position(), Pos2::new(100.0, 60.0));
        assert_eq!(overlay.marker_rect(rect).min, Pos2::new(140.0, 60.0));
    }

    #[test]
    fn test_drag_ignored_while_not_interactive() {
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(100.0, 100.0));
        assert_eq!(drag_target(false, Some(Pos2::new(5.0, 5.0)), rect), None);
        assert_eq!(drag_target(true, None, rect), None);
    }
}
