//! Whole-file decoding for looped ambient clips
//!
//! Ambient loops are short, so each source is decoded once into memory as
//! interleaved stereo f32 at the output device rate. Mono is duplicated to
//! both channels; extra channels beyond the first two are dropped.

use crate::error::{AudioError, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;

/// Decoded clip: interleaved stereo samples at `sample_rate`
#[derive(Debug, Clone)]
pub struct DecodedClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl DecodedClip {
    /// Number of stereo frames
    pub fn frames(&self) -> usize {
        self.samples.len() / 2
    }
}

/// Decode a file and convert it to `target_rate`
pub fn decode_file(path: impl AsRef<Path>, target_rate: u32) -> Result<DecodedClip> {
    let clip = decode_native(path)?;
    if clip.sample_rate == target_rate {
        return Ok(clip);
    }

    let samples = resample_stereo(&clip.samples, clip.sample_rate, target_rate)?;
    Ok(DecodedClip {
        samples,
        sample_rate: target_rate,
    })
}

/// Decode a file at its own sample rate
pub fn decode_native(path: impl AsRef<Path>) -> Result<DecodedClip> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let detected = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = detected.format;

    let track = format
        .default_track()
        .ok_or_else(|| AudioError::DecodeError("No audio tracks found".into()))?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| AudioError::DecodeError("Unknown sample rate".into()))?;

    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut samples = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => append_stereo(decoded, &mut samples),
            Err(SymphoniaError::DecodeError(e)) => {
                // Corrupt packet: skip it and keep going
                tracing::warn!("Skipping bad packet in {}: {}", path.display(), e);
            }
            Err(e) => return Err(e.into()),
        }
    }

    if samples.is_empty() {
        return Err(AudioError::DecodeError(format!(
            "No audio frames in {}",
            path.display()
        )));
    }

    tracing::debug!(
        "Decoded {} ({} frames at {} Hz)",
        path.display(),
        samples.len() / 2,
        sample_rate
    );

    Ok(DecodedClip {
        samples,
        sample_rate,
    })
}

/// Append a decoded buffer as interleaved stereo f32
fn append_stereo(decoded: AudioBufferRef, out: &mut Vec<f32>) {
    match decoded {
        AudioBufferRef::F32(buf) => interleave(&buf, out, |s| s),
        AudioBufferRef::F64(buf) => interleave(&buf, out, |s| s as f32),
        AudioBufferRef::S8(buf) => interleave(&buf, out, |s| s as f32 / i8::MAX as f32),
        AudioBufferRef::S16(buf) => interleave(&buf, out, |s| s as f32 / i16::MAX as f32),
        AudioBufferRef::S24(buf) => interleave(&buf, out, |s| s.inner() as f32 / 8_388_607.0),
        AudioBufferRef::S32(buf) => interleave(&buf, out, |s| s as f32 / i32::MAX as f32),
        AudioBufferRef::U8(buf) => {
            interleave(&buf, out, |s| (s as f32 / u8::MAX as f32) * 2.0 - 1.0)
        }
        AudioBufferRef::U16(buf) => {
            interleave(&buf, out, |s| (s as f32 / u16::MAX as f32) * 2.0 - 1.0)
        }
        AudioBufferRef::U24(buf) => {
            interleave(&buf, out, |s| (s.inner() as f32 / 16_777_215.0) * 2.0 - 1.0)
        }
        AudioBufferRef::U32(buf) => {
            interleave(&buf, out, |s| (s as f32 / u32::MAX as f32) * 2.0 - 1.0)
        }
    }
}

fn interleave<T, F>(buf: &AudioBuffer<T>, out: &mut Vec<f32>, normalize: F)
where
    T: Sample,
    F: Fn(T) -> f32,
{
    let channels = buf.spec().channels.count();
    let frames = buf.frames();
    if channels == 0 {
        return;
    }

    out.reserve(frames * 2);
    let left = buf.chan(0);
    let right = if channels > 1 { buf.chan(1) } else { left };
    for frame in 0..frames {
        out.push(normalize(left[frame]));
        out.push(normalize(right[frame]));
    }
}

/// Input frames wrapped around each end of a clip before resampling
const LOOP_PAD_FRAMES: usize = 512;

/// Resample an interleaved stereo loop in one pass
///
/// The clip is padded with its own tail in front and its own head behind, so
/// the filter sees the loop as periodic and the seam stays continuous. The
/// resampler delay is dropped and the result trimmed to exactly
/// `round(frames * ratio)` frames.
fn resample_stereo(samples: &[f32], source_rate: u32, target_rate: u32) -> Result<Vec<f32>> {
    let frames = samples.len() / 2;
    if frames == 0 {
        return Ok(Vec::new());
    }

    let ratio = target_rate as f64 / source_rate as f64;
    let expected = (frames as f64 * ratio).round() as usize;

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let padded_frames = frames + 2 * LOOP_PAD_FRAMES;
    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, padded_frames, 2)
        .map_err(|e| AudioError::ResampleError(e.to_string()))?;

    let mut planar = vec![Vec::with_capacity(padded_frames); 2];
    let lead_in = (frames * LOOP_PAD_FRAMES - LOOP_PAD_FRAMES..frames * LOOP_PAD_FRAMES)
        .map(|i| i % frames);
    let lead_out = (0..LOOP_PAD_FRAMES).map(|i| i % frames);
    for frame in lead_in.chain(0..frames).chain(lead_out) {
        planar[0].push(samples[frame * 2]);
        planar[1].push(samples[frame * 2 + 1]);
    }

    // Output frame that lines up with the clip's first input frame
    let offset = resampler.output_delay() + (LOOP_PAD_FRAMES as f64 * ratio).round() as usize;

    let mut resampled = resampler
        .process(&planar, None)
        .map_err(|e| AudioError::ResampleError(e.to_string()))?;

    // Flush the samples still held by the filter
    while resampled[0].len() < offset + expected {
        let flushed = resampler
            .process_partial(None::<&[Vec<f32>]>, None)
            .map_err(|e| AudioError::ResampleError(e.to_string()))?;
        if flushed[0].is_empty() {
            break;
        }
        for (channel, more) in resampled.iter_mut().zip(flushed) {
            channel.extend(more);
        }
    }

    let available = resampled[0].len().saturating_sub(offset).min(expected);
    let mut interleaved = Vec::with_capacity(available * 2);
    for frame in offset..offset + available {
        interleaved.push(resampled[0][frame]);
        interleaved.push(resampled[1][frame]);
    }

    tracing::debug!(
        "Resampled {} -> {} frames ({} Hz -> {} Hz)",
        frames,
        available,
        source_rate,
        target_rate
    );

    Ok(interleaved)
}
