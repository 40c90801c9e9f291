use egui::{Align2, Context, Window};
use std::collections::VecDeque;

/// A message the user has to acknowledge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

/// Application-wide UI services handed to whatever needs to talk to the user.
///
/// Created once by the shell and passed by reference; currently it owns the
/// queue of blocking notices.
#[derive(Debug, Default)]
pub struct AppContext {
    notices: VecDeque<Notice>,
}

impl AppContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a notice; it stays up until dismissed.
    pub fn notify(&mut self, title: impl Into<String>, message: impl Into<String>) {
        let notice = Notice {
            title: title.into(),
            message: message.into(),
        };
        log::warn!("{}: {}", notice.title, notice.message);
        self.notices.push_back(notice);
    }

    /// Notice currently shown, oldest first.
    pub fn current_notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn has_notice(&self) -> bool {
        !self.notices.is_empty()
    }

    /// Pass input meant for the main window through, or drop it while a
    /// notice is waiting to be acknowledged.
    pub fn unless_blocked<T>(&self, input: Option<T>) -> Option<T> {
        input.filter(|_| !self.has_notice())
    }

    pub fn dismiss(&mut self) -> Option<Notice> {
        self.notices.pop_front()
    }

    /// Draw the current notice as a centered window with an OK button.
    pub fn show(&mut self, ctx: &Context) {
        let Some(notice) = self.notices.front() else {
            return;
        };

        let mut dismissed = false;
        Window::new(notice.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(notice.message.as_str());
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });

        if dismissed {
            self.dismiss();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notices_are_shown_in_order() {
        let mut app = AppContext::new();
        assert!(!app.has_notice());

        app.notify("File not found", "Load the video file first");
        app.notify("Error", "No frame to save.");

        assert_eq!(app.current_notice().unwrap().title, "File not found");
        assert_eq!(app.dismiss().unwrap().message, "Load the video file first");
        assert_eq!(app.current_notice().unwrap().message, "No frame to save.");
        app.dismiss();
        assert!(app.dismiss().is_none());
        assert!(!app.has_notice());
    }

    #[test]
    fn test_input_dropped_while_notice_is_up() {
        let mut app = AppContext::new();
        let dropped = Some(std::path::PathBuf::from("clip.mp4"));
        assert_eq!(app.unless_blocked(dropped.clone()), dropped);

        app.notify("Failed to open video", "clip.avi: Invalid data");
        assert_eq!(app.unless_blocked(dropped.clone()), None);

        app.dismiss();
        assert_eq!(app.unless_blocked(dropped.clone()), dropped);
    }
}
