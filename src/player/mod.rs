mod decoder;
pub(crate) mod frame;
mod scheduler;

use std::path::Path;
use std::time::Duration;

use crate::error::{PlayerError, Result};

pub use decoder::load_frames;
pub use frame::{Frame, FrameSequence};
pub use scheduler::{
    IntervalScheduler, ManualScheduler, ScheduleHandle, Scheduler, Tick, MAX_INTERVAL,
    MIN_INTERVAL,
};

/// Playback direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

/// Player state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerState {
    /// Nothing loaded
    Idle,
    Paused,
    PlayingForward,
    PlayingReverse,
}

/// Snapshot of the values that drive playback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackState {
    pub current_index: usize,
    pub direction: Direction,
    pub speed: f64,
    pub is_playing: bool,
}

/// Walks an in-memory frame sequence forward or backward on scheduler ticks.
///
/// At most one periodic schedule is live at a time: starting either direction
/// cancels whatever schedule was running before.
pub struct PlaybackController<S: Scheduler = IntervalScheduler> {
    scheduler: S,
    sequence: Option<FrameSequence>,

    // Playback state
    current_index: usize,
    direction: Direction,
    speed: f64,
    is_playing: bool,
    schedule: Option<ScheduleHandle>,

    // Render output
    presented: Option<usize>,
    frame_version: u64,
}

impl PlaybackController<IntervalScheduler> {
    /// Decode `path` fully and return a paused controller over its frames.
    pub fn open(path: &Path) -> Result<Self> {
        let sequence = load_frames(path)?;
        let mut controller = Self::new(IntervalScheduler::new());
        controller.load(sequence);
        Ok(controller)
    }
}

impl<S: Scheduler> PlaybackController<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            sequence: None,
            current_index: 0,
            direction: Direction::Forward,
            speed: 1.0,
            is_playing: false,
            schedule: None,
            presented: None,
            frame_version: 0,
        }
    }

    /// Replace the loaded sequence and reset playback to the first frame, paused.
    pub fn load(&mut self, sequence: FrameSequence) {
        self.cancel_schedule();
        log::info!(
            "Loaded {} frames ({}x{}) at {:.3} fps",
            sequence.len(),
            sequence.frame_size().0,
            sequence.frame_size().1,
            sequence.fps()
        );
        self.sequence = Some(sequence);
        self.current_index = 0;
        self.direction = Direction::Forward;
        self.speed = 1.0;
        self.is_playing = false;
        self.present(0);
    }

    /// Start forward playback, or pause it if it is already running.
    ///
    /// A running reverse schedule is stopped before forward playback starts.
    pub fn toggle_play_pause(&mut self) -> Result<()> {
        let interval = self.interval()?;

        if self.state() == PlayerState::PlayingForward {
            self.stop();
            return Ok(());
        }

        self.cancel_schedule();
        self.direction = Direction::Forward;
        self.is_playing = true;
        self.schedule = Some(self.scheduler.schedule_periodic(interval, Tick::Forward));
        log::debug!(
            "Playing forward from frame {} every {:?}",
            self.current_index,
            interval
        );
        Ok(())
    }

    /// Start reverse playback from the current position.
    pub fn play_reverse(&mut self) -> Result<()> {
        let interval = self.interval()?;

        self.cancel_schedule();
        self.direction = Direction::Reverse;
        self.is_playing = true;
        self.schedule = Some(self.scheduler.schedule_periodic(interval, Tick::Reverse));
        log::debug!(
            "Playing reverse from frame {} every {:?}",
            self.current_index,
            interval
        );
        Ok(())
    }

    /// Stop whichever schedule is running and keep the current position.
    pub fn stop(&mut self) {
        if self.cancel_schedule() {
            log::debug!("Playback stopped at frame {}", self.current_index);
        }
        self.is_playing = false;
    }

    /// Jump to `index`, clamped to the loaded range. Playing state is untouched.
    pub fn seek(&mut self, index: usize) -> Result<()> {
        let len = self.sequence.as_ref().ok_or(PlayerError::NotLoaded)?.len();
        let index = index.min(len - 1);
        self.current_index = index;
        self.present(index);
        Ok(())
    }

    /// Set the speed multiplier (slider percent / 100).
    ///
    /// Only schedules started after this call use the new speed; a running
    /// schedule keeps its interval.
    pub fn set_speed(&mut self, multiplier: f64) -> Result<()> {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(PlayerError::InvalidSpeed(multiplier));
        }
        self.speed = multiplier;
        Ok(())
    }

    /// One forward step: show the frame at the current index, then advance.
    /// Playback stops once the index runs past the last frame.
    pub fn tick_forward(&mut self) {
        let len = self.len();
        if self.current_index < len {
            self.present(self.current_index);
            self.current_index += 1;
        }
        if self.current_index >= len {
            self.stop();
        }
    }

    /// One reverse step: step back and show that frame, then step back again.
    ///
    /// Each tick moves the index back by two while showing every other frame.
    /// Playback stops when the index reaches zero; it never goes negative.
    pub fn tick_reverse(&mut self) {
        let Some(shown) = self.current_index.min(self.len()).checked_sub(1) else {
            self.current_index = 0;
            self.stop();
            return;
        };
        self.present(shown);

        match shown.checked_sub(1) {
            Some(next) if next > 0 => self.current_index = next,
            _ => {
                self.current_index = 0;
                self.stop();
            }
        }
    }

    /// Run every tick the scheduler has due, one at a time.
    pub fn run_due_ticks(&mut self) -> usize {
        let mut ran = 0;
        while let Some(tick) = self.scheduler.poll_due() {
            match tick {
                Tick::Forward => self.tick_forward(),
                Tick::Reverse => self.tick_reverse(),
            }
            ran += 1;
        }
        ran
    }

    /// Save the frame at the current index as PNG or JPEG.
    pub fn save_current_frame(&self, path: &Path) -> Result<()> {
        let frame = self.current_frame().ok_or(PlayerError::NoFrame {
            index: self.current_index,
        })?;
        frame.save(path)
    }

    /// Frame at the current index; `None` past the end or when nothing is loaded.
    pub fn current_frame(&self) -> Option<&Frame> {
        self.sequence.as_ref()?.get(self.current_index)
    }

    /// Tick interval for the current frame rate and speed.
    pub fn interval(&self) -> Result<Duration> {
        let fps = self.fps().ok_or(PlayerError::NotLoaded)?;
        let interval =
            Duration::try_from_secs_f64(1.0 / (fps * self.speed)).unwrap_or(MAX_INTERVAL);
        Ok(interval.clamp(MIN_INTERVAL, MAX_INTERVAL))
    }

    /// Interval of the schedule currently running, if any.
    pub fn active_interval(&self) -> Option<Duration> {
        self.schedule.and_then(|h| self.scheduler.interval_of(h))
    }

    /// Time until the next tick is due.
    pub fn next_tick_in(&self) -> Option<Duration> {
        self.schedule.and(self.scheduler.next_due_in())
    }

    fn present(&mut self, index: usize) {
        self.presented = Some(index);
        self.frame_version += 1;
    }

    fn cancel_schedule(&mut self) -> bool {
        match self.schedule.take() {
            Some(handle) => {
                self.scheduler.cancel(handle);
                true
            }
            None => false,
        }
    }

    pub fn state(&self) -> PlayerState {
        match (&self.sequence, self.is_playing, self.direction) {
            (None, _, _) => PlayerState::Idle,
            (Some(_), false, _) => PlayerState::Paused,
            (Some(_), true, Direction::Forward) => PlayerState::PlayingForward,
            (Some(_), true, Direction::Reverse) => PlayerState::PlayingReverse,
        }
    }

    pub fn playback_state(&self) -> PlaybackState {
        PlaybackState {
            current_index: self.current_index,
            direction: self.direction,
            speed: self.speed,
            is_playing: self.is_playing,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.sequence.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Next index a forward tick will show; equals `len()` once playback ran off the end.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn fps(&self) -> Option<f64> {
        self.sequence.as_ref().map(FrameSequence::fps)
    }

    /// Number of frames, zero when nothing is loaded.
    pub fn len(&self) -> usize {
        self.sequence.as_ref().map_or(0, FrameSequence::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index of the frame last handed to the display.
    pub fn presented_index(&self) -> Option<usize> {
        self.presented
    }

    pub fn presented_frame(&self) -> Option<&Frame> {
        let index = self.presented?;
        self.sequence.as_ref()?.get(index)
    }

    /// Bumped every time a frame is presented.
    pub fn frame_version(&self) -> u64 {
        self.frame_version
    }

    /// Value for a frame slider: the presented frame, or the current index
    /// clamped into range.
    pub fn slider_position(&self) -> usize {
        self.presented
            .unwrap_or(self.current_index)
            .min(self.len().saturating_sub(1))
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}
