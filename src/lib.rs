pub mod config;
pub mod error;
pub mod overlay;
pub mod player;
pub mod ui;

pub use error::{LoadError, PlayerError};
pub use overlay::Overlay;
pub use player::{
    Direction, Frame, FrameSequence, PlaybackController, PlaybackState, PlayerState, Scheduler,
};
pub use ui::context::AppContext;
pub use ui::controls::{ControlAction, PlayerControls};
pub use ui::surface::VideoSurface;
