use egui::{CentralPanel, Color32, Key, KeyboardShortcut, Modifiers, TopBottomPanel, Window};
use egui_frame_player::config::{Args, VIDEO_EXTENSIONS};
use egui_frame_player::ui::controls;
use egui_frame_player::{
    AppContext, ControlAction, Overlay, PlaybackController, PlayerControls, VideoSurface,
};
use std::path::PathBuf;

const OPEN_SHORTCUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::O);
const QUIT_SHORTCUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Q);
const REVERSE_SHORTCUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::R);

const SHORTCUT_HELP: &str = "Shortcuts:\nOpen: Ctrl + O\nQuit: Ctrl + Q\nPlay Reverse: Ctrl + R";

pub struct FramePlayerApp {
    player: Option<PlaybackController>,
    overlay: Overlay,
    surface: VideoSurface,
    app: AppContext,
    show_shortcut_help: bool,
}

impl FramePlayerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, args: Args) -> Self {
        let mut app = Self {
            player: None,
            overlay: Overlay::from_asset(&args.overlay, args.overlay_width),
            surface: VideoSurface::new(),
            app: AppContext::new(),
            show_shortcut_help: false,
        };
        if let Some(path) = args.file {
            app.load_video(path);
        }
        app
    }

    fn open_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .set_title("Open Video File")
            .add_filter("Video Files", VIDEO_EXTENSIONS)
            .pick_file()
        {
            self.load_video(path);
        }
    }

    /// Decode the whole file; the UI is blocked until it finishes.
    fn load_video(&mut self, path: PathBuf) {
        log::info!("Opening {}", path.display());
        match PlaybackController::open(&path) {
            Ok(player) => {
                self.player = Some(player);
                self.surface.reset();
            }
            Err(e) => {
                self.app
                    .notify("Failed to open video", format!("{}: {}", path.display(), e));
            }
        }
    }

    fn save_frame(&mut self) {
        if self.player.as_ref().and_then(|p| p.current_frame()).is_none() {
            self.app.notify("Error", "No frame to save.");
            return;
        }
        let Some(path) = rfd::FileDialog::new()
            .set_title("Save Frame")
            .add_filter("PNG Files", &["png"])
            .add_filter("JPEG Files", &["jpg", "jpeg"])
            .set_file_name("frame.png")
            .save_file()
        else {
            return;
        };

        if let Some(ref player) = self.player {
            if let Err(e) = player.save_current_frame(&path) {
                self.app.notify("Error", e.to_string());
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if self.app.has_notice() {
            return;
        }
        let (open, quit, reverse) = ctx.input_mut(|i| {
            (
                i.consume_shortcut(&OPEN_SHORTCUT),
                i.consume_shortcut(&QUIT_SHORTCUT),
                i.consume_shortcut(&REVERSE_SHORTCUT),
            )
        });
        if open {
            self.open_file();
        }
        if quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        if reverse {
            controls::play_reverse(self.player.as_mut(), &mut self.app);
        }
    }
}

impl eframe::App for FramePlayerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Advance playback before drawing so the surface shows the latest frame
        if let Some(ref mut player) = self.player {
            player.run_due_ticks();
        }

        self.handle_shortcuts(ctx);
        let blocked = self.app.has_notice();

        // Menu bar
        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            ui.add_enabled_ui(!blocked, |ui| {
                egui::menu::bar(ui, |ui| {
                    ui.menu_button("File", |ui| {
                        let open = egui::Button::new("Open...")
                            .shortcut_text(ctx.format_shortcut(&OPEN_SHORTCUT));
                        if ui.add(open).clicked() {
                            ui.close_menu();
                            self.open_file();
                        }
                        let quit = egui::Button::new("Quit")
                            .shortcut_text(ctx.format_shortcut(&QUIT_SHORTCUT));
                        if ui.add(quit).clicked() {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                    ui.menu_button("Tool", |ui| {
                        let reverse = egui::Button::new("Play Reverse")
                            .shortcut_text(ctx.format_shortcut(&REVERSE_SHORTCUT));
                        if ui.add(reverse).clicked() {
                            ui.close_menu();
                            controls::play_reverse(self.player.as_mut(), &mut self.app);
                        }
                    });
                    ui.menu_button("Help", |ui| {
                        if ui.button("Shortcut Help").clicked() {
                            ui.close_menu();
                            self.show_shortcut_help = true;
                        }
                    });
                });
            });
        });

        // Control bar at bottom
        let mut action = None;
        TopBottomPanel::bottom("controls").show(ctx, |ui| {
            ui.add_enabled_ui(!blocked, |ui| {
                action = PlayerControls::show(ui, self.player.as_mut(), &mut self.app);
            });
        });
        if action == Some(ControlAction::SaveFrame) {
            self.save_frame();
        }

        // Video display area
        CentralPanel::default().show(ctx, |ui| {
            if let Some(ref player) = self.player {
                self.surface.show(ui, player, &mut self.overlay, !blocked);
            } else {
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(ui.available_height() / 3.0);
                        ui.heading("No video loaded");
                        ui.add_space(10.0);

                        let open = egui::Button::new("Open Video File...");
                        if ui.add_enabled(!blocked, open).clicked() {
                            self.open_file();
                        }

                        ui.add_space(10.0);
                        ui.colored_label(Color32::GRAY, "Or drag and drop a video file");
                    });
                });
            }
        });

        // Handle file drops
        let dropped = ctx.input(|i| i.raw.dropped_files.first().and_then(|f| f.path.clone()));
        if let Some(path) = self.app.unless_blocked(dropped) {
            self.load_video(path);
        }

        Window::new("Shortcut Help")
            .open(&mut self.show_shortcut_help)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(SHORTCUT_HELP);
            });

        self.app.show(ctx);

        // Wake up in time for the next playback tick
        if let Some(delay) = self.player.as_ref().and_then(|p| p.next_tick_in()) {
            ctx.request_repaint_after(delay);
        }
    }
}
