//! # track_session
//!
//! The audio half of the site: one looping **theme track** shared by every
//! page, a dedicated **flowers track** that temporarily displaces it, and the
//! **music page** rules that turn looping off while the listener browses.
//!
//! ## Session rules
//!
//! | Event | Effect |
//! |---|---|
//! | First user interaction | Theme starts, looped, full volume |
//! | Switch track on music page | New track becomes the theme, plays from 0 once loaded |
//! | Enter music page | Loop off (track end advances to the next track) |
//! | Leave music page | Loop back on; current track stays the theme |
//! | Enter flowers page | Theme paused, position captured; flowers track plays from 0, looped |
//! | Leave flowers page | Flowers stopped + rewound; theme resumes at the captured position, loop forced on |
//!
//! Exactly one of {theme, flowers} is ever audible. Playback-start failures
//! (no device, output refused) are swallowed: the session keeps its logical
//! state, `theme_playing()` stays false, and the listener can retry from the
//! player controls. Audio is decoration, never load-bearing.
//!
//! The playback backend is pluggable via [`playback::Playback`]: a real
//! WAV-over-cpal implementation ([`wav::WavPlayback`]) and a silent
//! [`playback::NullPlayback`] used when no output device exists (and by the
//! tests).

pub mod catalog;
pub mod playback;
pub mod session;
pub mod wav;

pub use catalog::{flowers_track, next_index, prev_index, theme_tracks, Track};
pub use playback::{open_playback, NullPlayback, Playback, PlaybackError};
pub use session::AudioSession;
pub use wav::WavPlayback;
