use clap::Parser;
use std::ops::RangeInclusive;
use std::path::PathBuf;

/// Speed slider range in percent, 100 = native frame rate.
pub const SPEED_PERCENT_RANGE: RangeInclusive<u32> = 50..=200;
pub const DEFAULT_SPEED_PERCENT: u32 = 100;

/// Extensions offered by the open dialog.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov"];

/// Frame-by-frame video player
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Video file to open at startup - optional, can also use File > Open or drag-and-drop
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Image drawn as the draggable overlay marker
    #[arg(long, value_name = "PATH", default_value = "Overlay.PNG")]
    pub overlay: PathBuf,

    /// On-screen width of the overlay marker in pixels
    #[arg(
        long,
        value_name = "PX",
        default_value_t = 100,
        value_parser = clap::value_parser!(u32).range(1..=4096)
    )]
    pub overlay_width: u32,
}

/// Convert a speed slider value into a multiplier.
pub fn speed_multiplier(percent: u32) -> f64 {
    f64::from(percent) / 100.0
}

/// Convert a multiplier back into the nearest slider value.
pub fn speed_percent(multiplier: f64) -> u32 {
    (multiplier * 100.0).round().clamp(0.0, f64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["frame-player"]).unwrap();
        assert!(args.file.is_none());
        assert_eq!(args.overlay, PathBuf::from("Overlay.PNG"));
        assert_eq!(args.overlay_width, 100);
    }

    #[test]
    fn test_file_and_overlay_options() {
        let args = Args::try_parse_from([
            "frame-player",
            "clip.mp4",
            "--overlay",
            "marker.png",
            "--overlay-width",
            "64",
        ])
        .unwrap();
        assert_eq!(args.file, Some(PathBuf::from("clip.mp4")));
        assert_eq!(args.overlay, PathBuf::from("marker.png"));
        assert_eq!(args.overlay_width, 64);
    }

    #[test]
    fn test_zero_overlay_width_rejected() {
        assert!(Args::try_parse_from(["frame-player", "--overlay-width", "0"]).is_err());
    }

    #[test]
    fn test_speed_conversion() {
        assert_eq!(speed_multiplier(DEFAULT_SPEED_PERCENT), 1.0);
        assert_eq!(speed_multiplier(*SPEED_PERCENT_RANGE.start()), 0.5);
        assert_eq!(speed_multiplier(*SPEED_PERCENT_RANGE.end()), 2.0);
        assert_eq!(speed_percent(1.5), 150);
        assert_eq!(speed_percent(speed_multiplier(73)), 73);
    }
}
