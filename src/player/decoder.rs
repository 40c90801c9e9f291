use ffmpeg_next::format::Pixel;
use ffmpeg_next::frame::Video as VideoFrame;
use ffmpeg_next::media::Type;
use ffmpeg_next::software::scaling::{Context as ScalerContext, Flags};
use ffmpeg_next::{codec, decoder, Packet, Rational};
use std::path::Path;
use std::time::Instant;

use super::frame::{Frame, FrameSequence};
use crate::error::LoadError;

/// Give up after this many unreadable packets in a row.
const MAX_CONSECUTIVE_READ_ERRORS: usize = 16;

/// Decode every frame of `path` into memory as packed RGB.
///
/// Blocks until the whole file is decoded. Memory use grows with the number
/// of frames; there is no progressive loading.
pub fn load_frames(path: &Path) -> Result<FrameSequence, LoadError> {
    let started = Instant::now();
    let mut input = ffmpeg_next::format::input(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let video_stream = input
        .streams()
        .best(Type::Video)
        .ok_or(LoadError::NoVideoStream)?;
    let video_stream_index = video_stream.index();
    let stream_rates = [video_stream.avg_frame_rate(), video_stream.rate()];

    let mut video_decoder = codec::Context::from_parameters(video_stream.parameters())?
        .decoder()
        .video()?;

    let fps = stream_rates
        .into_iter()
        .chain(video_decoder.frame_rate())
        .find_map(rational_to_fps)
        .ok_or(LoadError::InvalidFrameRate(0.0))?;

    let mut converter = RgbConverter::new(&video_decoder)?;
    let mut frames = Vec::new();
    let mut read_errors = 0;

    loop {
        let mut packet = Packet::empty();
        match packet.read(&mut input) {
            Ok(()) => {
                read_errors = 0;
                if packet.stream() != video_stream_index {
                    continue;
                }
                video_decoder.send_packet(&packet)?;
                converter.drain(&mut video_decoder, &mut frames)?;
            }
            Err(ffmpeg_next::Error::Eof) => break,
            Err(e) => {
                read_errors += 1;
                log::warn!("Skipping unreadable packet: {}", e);
                if read_errors >= MAX_CONSECUTIVE_READ_ERRORS {
                    return Err(LoadError::Decode(e));
                }
            }
        }
    }

    // Flush frames still buffered in the decoder
    video_decoder.send_eof()?;
    converter.drain(&mut video_decoder, &mut frames)?;

    log::info!(
        "Decoded {} frames at {:.3} fps from {} in {:.2?}",
        frames.len(),
        fps,
        path.display(),
        started.elapsed()
    );

    FrameSequence::new(frames, fps)
}

fn rational_to_fps(rate: Rational) -> Option<f64> {
    if rate.numerator() <= 0 || rate.denominator() <= 0 {
        return None;
    }
    let fps = f64::from(rate);
    (fps.is_finite() && fps > 0.0).then_some(fps)
}

/// Scales decoded frames of any pixel format into packed RGB24.
struct RgbConverter {
    scaler: ScalerContext,
    decoded: VideoFrame,
    rgb: VideoFrame,
}

impl RgbConverter {
    fn new(video_decoder: &decoder::Video) -> Result<Self, LoadError> {
        let scaler = ScalerContext::get(
            video_decoder.format(),
            video_decoder.width(),
            video_decoder.height(),
            Pixel::RGB24,
            video_decoder.width(),
            video_decoder.height(),
            Flags::BILINEAR,
        )?;

        Ok(Self {
            scaler,
            decoded: VideoFrame::empty(),
            rgb: VideoFrame::empty(),
        })
    }

    /// Pull every frame the decoder has ready and append it to `frames`.
    fn drain(
        &mut self,
        video_decoder: &mut decoder::Video,
        frames: &mut Vec<Frame>,
    ) -> Result<(), LoadError> {
        while video_decoder.receive_frame(&mut self.decoded).is_ok() {
            self.scaler.run(&self.decoded, &mut self.rgb)?;
            frames.push(self.packed_frame()?);
        }
        Ok(())
    }

    /// Copy the scaled frame out, dropping the per-row stride padding.
    fn packed_frame(&self) -> Result<Frame, LoadError> {
        let width = self.rgb.width();
        let height = self.rgb.height();
        let row_bytes = width as usize * 3;
        let stride = self.rgb.stride(0);
        let data = self.rgb.data(0);

        let mut rgb = Vec::with_capacity(row_bytes * height as usize);
        for row in data.chunks(stride).take(height as usize) {
            rgb.extend_from_slice(&row[..row_bytes]);
        }

        Frame::from_rgb(width, height, rgb)
    }
}
