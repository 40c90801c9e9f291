use crate::config::{speed_multiplier, speed_percent, DEFAULT_SPEED_PERCENT, SPEED_PERCENT_RANGE};
use crate::player::{PlaybackController, PlayerState, Scheduler};
use crate::ui::context::AppContext;
use egui::{Slider, Ui};

/// Requests the control bar cannot fulfil on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlAction {
    /// Ask the user for a path and save the current frame there.
    SaveFrame,
}

pub struct PlayerControls;

impl PlayerControls {
    /// Draw the control bar. Widgets other than reverse play stay disabled
    /// until a video is loaded.
    pub fn show<S: Scheduler>(
        ui: &mut Ui,
        mut player: Option<&mut PlaybackController<S>>,
        app: &mut AppContext,
    ) -> Option<ControlAction> {
        let mut action = None;
        let loaded = player.is_some();

        ui.horizontal(|ui| {
            // Play/Pause button
            let play_pause_text = match player.as_ref().map(|p| p.state()) {
                Some(PlayerState::PlayingForward) => "⏸ Pause",
                _ => "▶ Play",
            };
            if ui.add_enabled(loaded, egui::Button::new(play_pause_text)).clicked() {
                if let Some(player) = player.as_deref_mut() {
                    if let Err(e) = player.toggle_play_pause() {
                        app.notify("Playback", e.to_string());
                    }
                }
            }

            if ui.button("◀ Play Reverse").clicked() {
                play_reverse(player.as_deref_mut(), app);
            }

            ui.separator();

            // Frame slider
            ui.label("Frame:");
            let last_index = player.as_ref().map_or(0, |p| p.len().saturating_sub(1));
            let mut position = player.as_ref().map_or(0, |p| p.slider_position());
            let slider_response = ui.add_enabled(
                loaded,
                Slider::new(&mut position, 0..=last_index)
                    .show_value(false)
                    .trailing_fill(true),
            );
            if slider_response.changed() {
                if let Some(player) = player.as_deref_mut() {
                    if let Err(e) = player.seek(position) {
                        app.notify("Seek", e.to_string());
                    }
                }
            }
            ui.label(format_frame(position, player.as_ref().map_or(0, |p| p.len())));

            ui.separator();

            // Speed control
            ui.label("Playback Speed:");
            let mut percent = player
                .as_ref()
                .map_or(DEFAULT_SPEED_PERCENT, |p| speed_percent(p.speed()));
            let speed_response = ui.add_enabled(
                loaded,
                Slider::new(&mut percent, SPEED_PERCENT_RANGE).suffix("%"),
            );
            if speed_response.changed() {
                if let Some(player) = player.as_deref_mut() {
                    if let Err(e) = player.set_speed(speed_multiplier(percent)) {
                        app.notify("Playback Speed", e.to_string());
                    }
                }
            }

            ui.separator();

            if ui
                .add_enabled(loaded, egui::Button::new("Save Frame"))
                .clicked()
            {
                action = Some(ControlAction::SaveFrame);
            }
        });

        action
    }
}

/// Start reverse playback, or tell the user a video has to be loaded first.
pub fn play_reverse<S: Scheduler>(
    player: Option<&mut PlaybackController<S>>,
    app: &mut AppContext,
) {
    match player.map(|p| p.play_reverse()) {
        Some(Ok(())) => {}
        Some(Err(e)) => app.notify("Playback", e.to_string()),
        None => app.notify("File not found", "Load the video file first"),
    }
}

fn format_frame(position: usize, len: usize) -> String {
    if len == 0 {
        "- / -".to_string()
    } else {
        format!("{} / {}", position + 1, len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::frame::solid_frame;
    use crate::player::{FrameSequence, ManualScheduler};

    #[test]
    fn test_format_frame() {
        assert_eq!(format_frame(0, 0), "- / -");
        assert_eq!(format_frame(0, 10), "1 / 10");
        assert_eq!(format_frame(9, 10), "10 / 10");
    }

    #[test]
    fn test_play_reverse_without_video_notifies() {
        let mut app = AppContext::new();
        play_reverse::<ManualScheduler>(None, &mut app);
        assert_eq!(
            app.current_notice().unwrap().message,
            "Load the video file first"
        );
    }

    #[test]
    fn test_play_reverse_with_video_starts_playback() {
        let mut app = AppContext::new();
        let mut player = PlaybackController::new(ManualScheduler::new());
        let frames = vec![solid_frame(1, 1, [0, 0, 0]); 4];
        player.load(FrameSequence::new(frames, 24.0).unwrap());

        play_reverse(Some(&mut player), &mut app);

        assert!(!app.has_notice());
        assert_eq!(player.state(), PlayerState::PlayingReverse);
    }
}
