//! Playback backend abstraction.
//!
//! [`AudioSession`](crate::session::AudioSession) never talks to an audio
//! device directly; it drives a [`Playback`] unit per track slot. The real
//! backend is [`WavPlayback`](crate::wav::WavPlayback); [`NullPlayback`]
//! stands in when no output device exists so the rest of the app keeps
//! working silently.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No output device / stream could not be built.
    #[error("audio output unavailable: {0}")]
    Unavailable(String),
    /// The loaded source could not be decoded.
    #[error("could not decode {path}: {reason}")]
    BadSource { path: String, reason: String },
}

// ════════════════════════════════════════════════════════════════════════════
// Playback trait — one playable unit (theme or flowers)
// ════════════════════════════════════════════════════════════════════════════

/// A single playable audio unit.
///
/// The contract mirrors an HTML-audio-like element: load a source, start and
/// pause, seek, loop, set volume, and observe "ready" / "ended" edges.
/// `play()` may be refused by the environment; callers must not assume
/// immediate audibility and must tolerate failure.
///
/// Units are owned and driven by the single app thread; the cpal backend
/// holds a stream handle that is not `Send`, so the trait carries no thread
/// bound.
pub trait Playback {
    /// Load a source. Resets the position to 0 and clears the ended flag.
    fn set_source(&mut self, path: &str);

    /// Request playback from the current position.
    fn play(&mut self) -> Result<(), PlaybackError>;

    fn pause(&mut self);

    /// Current position in seconds.
    fn position(&self) -> f32;

    /// Jump to an absolute position in seconds.
    fn seek(&mut self, seconds: f32);

    fn set_looping(&mut self, looping: bool);

    /// Volume in 0.0–1.0.
    fn set_volume(&mut self, volume: f32);

    /// True once the loaded source can start playing.
    fn is_ready(&self) -> bool;

    /// Edge-triggered end-of-source notification: returns true at most once
    /// per natural (non-looping) end.
    fn take_ended(&mut self) -> bool;
}

// ════════════════════════════════════════════════════════════════════════════
// NullPlayback — silent fallback
// ════════════════════════════════════════════════════════════════════════════

/// Backend used when no audio device is available. Accepts every call and
/// never becomes audible; `play()` reports the refusal so the session can
/// keep `theme_playing` false.
#[derive(Debug, Default)]
pub struct NullPlayback {
    source: Option<String>,
}

impl Playback for NullPlayback {
    fn set_source(&mut self, path: &str) {
        self.source = Some(path.to_string());
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        Err(PlaybackError::Unavailable("null output".into()))
    }

    fn pause(&mut self) {}

    fn position(&self) -> f32 {
        0.0
    }

    fn seek(&mut self, _seconds: f32) {}

    fn set_looping(&mut self, _looping: bool) {}

    fn set_volume(&mut self, _volume: f32) {}

    fn is_ready(&self) -> bool {
        self.source.is_some()
    }

    fn take_ended(&mut self) -> bool {
        false
    }
}

// ════════════════════════════════════════════════════════════════════════════
// open_playback — pick the best available backend
// ════════════════════════════════════════════════════════════════════════════

/// Open a playback unit on the default output device, falling back to
/// [`NullPlayback`] with a warning when the device or stream is unavailable.
pub fn open_playback() -> Box<dyn Playback> {
    match crate::wav::WavPlayback::open() {
        Ok(p) => Box::new(p),
        Err(e) => {
            log::warn!("no audio output ({e}) — continuing silently");
            Box::new(NullPlayback::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_playback_refuses_play_but_loads() {
        let mut p = NullPlayback::default();
        assert!(!p.is_ready());
        p.set_source("x.wav");
        assert!(p.is_ready());
        assert!(p.play().is_err());
        assert!(!p.take_ended());
    }
}
