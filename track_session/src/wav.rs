//! WAV playback over a cpal output stream.
//!
//! Decoded samples live in memory; the stream callback walks a fractional
//! cursor through them, so position, seeking, looping and the ended flag are
//! all just cursor state shared behind a mutex.

use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::playback::{Playback, PlaybackError};

/// State shared between the control side and the output callback.
struct Shared {
    /// Interleaved stereo frames at `sample_rate`.
    samples: Vec<f32>,
    sample_rate: u32,
    /// Fractional frame index into `samples`.
    cursor: f64,
    playing: bool,
    looping: bool,
    volume: f32,
    ended: bool,
}

impl Shared {
    fn frames(&self) -> usize {
        self.samples.len() / 2
    }
}

pub struct WavPlayback {
    shared: Arc<Mutex<Shared>>,
    device_rate: u32,
    ready: bool,
    // Dropping the stream stops output.
    _stream: cpal::Stream,
}

impl WavPlayback {
    /// Build an output stream on the default device.
    pub fn open() -> Result<Self, PlaybackError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| PlaybackError::Unavailable("no output device".into()))?;
        let config = device
            .default_output_config()
            .map_err(|e| PlaybackError::Unavailable(e.to_string()))?;

        let device_rate = config.sample_rate().0;
        let channels = config.channels() as usize;

        let shared = Arc::new(Mutex::new(Shared {
            samples: Vec::new(),
            sample_rate: device_rate,
            cursor: 0.0,
            playing: false,
            looping: false,
            volume: 1.0,
            ended: false,
        }));
        let cb_shared = Arc::clone(&shared);

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut s = cb_shared.lock().unwrap();
                    let frames = s.frames();
                    let step = if device_rate > 0 {
                        s.sample_rate as f64 / device_rate as f64
                    } else {
                        1.0
                    };

                    for frame in data.chunks_mut(channels) {
                        let (l, r) = if s.playing && frames > 0 {
                            let idx = s.cursor as usize;
                            let l = s.samples[idx * 2] * s.volume;
                            let r = s.samples[idx * 2 + 1] * s.volume;
                            s.cursor += step;
                            if s.cursor as usize >= frames {
                                if s.looping {
                                    s.cursor = 0.0;
                                } else {
                                    s.cursor = 0.0;
                                    s.playing = false;
                                    s.ended = true;
                                }
                            }
                            (l, r)
                        } else {
                            (0.0, 0.0)
                        };
                        frame[0] = l;
                        if channels > 1 {
                            frame[1] = r;
                        }
                        for extra in frame.iter_mut().skip(2) {
                            *extra = 0.0;
                        }
                    }
                },
                |err| log::error!("audio stream error: {err}"),
                None,
            )
            .map_err(|e| PlaybackError::Unavailable(e.to_string()))?;

        stream
            .play()
            .map_err(|e| PlaybackError::Unavailable(e.to_string()))?;

        log::info!(
            "audio output: {} @ {device_rate}Hz",
            device.name().unwrap_or_else(|_| "unknown".into())
        );

        Ok(WavPlayback {
            shared,
            device_rate,
            ready: false,
            _stream: stream,
        })
    }
}

impl Playback for WavPlayback {
    fn set_source(&mut self, path: &str) {
        let mut s = self.shared.lock().unwrap();
        s.playing = false;
        s.cursor = 0.0;
        s.ended = false;
        match decode_wav(path) {
            Ok((samples, rate)) => {
                s.samples = samples;
                s.sample_rate = rate;
                self.ready = true;
            }
            Err(e) => {
                // Fail closed: unit stays silent, session state is untouched.
                log::warn!("{e}");
                s.samples = Vec::new();
                s.sample_rate = self.device_rate;
                self.ready = false;
            }
        }
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        let mut s = self.shared.lock().unwrap();
        if s.samples.is_empty() {
            return Err(PlaybackError::Unavailable("no source loaded".into()));
        }
        s.ended = false;
        s.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.shared.lock().unwrap().playing = false;
    }

    fn position(&self) -> f32 {
        let s = self.shared.lock().unwrap();
        if s.sample_rate == 0 {
            return 0.0;
        }
        (s.cursor / s.sample_rate as f64) as f32
    }

    fn seek(&mut self, seconds: f32) {
        let mut s = self.shared.lock().unwrap();
        let frame = (seconds.max(0.0) as f64 * s.sample_rate as f64) as usize;
        s.cursor = frame.min(s.frames().saturating_sub(1)) as f64;
    }

    fn set_looping(&mut self, looping: bool) {
        self.shared.lock().unwrap().looping = looping;
    }

    fn set_volume(&mut self, volume: f32) {
        self.shared.lock().unwrap().volume = volume.clamp(0.0, 1.0);
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn take_ended(&mut self) -> bool {
        let mut s = self.shared.lock().unwrap();
        std::mem::take(&mut s.ended)
    }
}

/// Decode a WAV file into interleaved stereo f32 at its native rate.
fn decode_wav(path: &str) -> Result<(Vec<f32>, u32), PlaybackError> {
    let bad = |reason: String| PlaybackError::BadSource {
        path: path.to_string(),
        reason,
    };

    let mut reader = hound::WavReader::open(path).map_err(|e| bad(e.to_string()))?;
    let spec = reader.spec();

    let raw: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| bad(e.to_string()))?,
        hound::SampleFormat::Int => {
            let full_scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / full_scale))
                .collect::<Result<_, _>>()
                .map_err(|e| bad(e.to_string()))?
        }
    };

    let channels = spec.channels.max(1) as usize;
    let mut stereo = Vec::with_capacity(raw.len() / channels * 2);
    for frame in raw.chunks_exact(channels) {
        let l = frame[0];
        let r = if channels > 1 { frame[1] } else { frame[0] };
        stereo.push(l);
        stereo.push(r);
    }

    if stereo.is_empty() {
        return Err(bad("empty file".into()));
    }
    Ok((stereo, spec.sample_rate))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn write_test_wav(path: &std::path::Path, frames: usize) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut w = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..frames {
            w.write_sample(((i % 64) as i16 - 32) * 256).unwrap();
        }
        w.finalize().unwrap();
    }

    #[test]
    fn decode_mono_is_widened_to_stereo() {
        let dir = std::env::temp_dir();
        let path = dir.join("track_session_decode_test.wav");
        write_test_wav(&path, 100);

        let (stereo, rate) = decode_wav(path.to_str().unwrap()).unwrap();
        assert_eq!(rate, 8_000);
        assert_eq!(stereo.len(), 200);
        // Mono duplicated into both channels
        assert_eq!(stereo[0], stereo[1]);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn decode_missing_file_fails() {
        assert!(decode_wav("definitely/not/here.wav").is_err());
    }
}
