//! The fixed track catalog.
//!
//! Tracks are referenced everywhere by index into [`theme_tracks`]; the
//! flowers page has its own single track outside the catalog.

/// One playable track. `source` is a path handed to the playback backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Track {
    pub title: &'static str,
    pub artist: &'static str,
    pub source: &'static str,
}

/// The ordered theme catalog shown on the music page.
const THEME_TRACKS: &[Track] = &[
    Track {
        title: "kota ini tak sama tanpamu",
        artist: "Nadhif Basalamah",
        source: "assets/audio/kota-ini-tak-sama-tanpamu.wav",
    },
    Track {
        title: "Reality",
        artist: "Alexandra - Reality Club",
        source: "assets/audio/reality.wav",
    },
    Track {
        title: "Bercinta Lewat Kata",
        artist: "Donne Maula",
        source: "assets/audio/bercinta-lewat-kata.wav",
    },
    Track {
        title: "Cincin",
        artist: "Hindia",
        source: "assets/audio/cincin.wav",
    },
    Track {
        title: "everything u are",
        artist: "Hindia",
        source: "assets/audio/everything-u-are.wav",
    },
    Track {
        title: "Oh, Bella",
        artist: "Reality Club",
        source: "assets/audio/oh-bella.wav",
    },
    Track {
        title: "Besok Kita Pergi Makan",
        artist: "Sal Priadi",
        source: "assets/audio/besok-kita-pergi-makan.wav",
    },
    Track {
        title: "Kita usahakan rumah itu",
        artist: "Sal Priadi",
        source: "assets/audio/kita-usahakan-rumah-itu.wav",
    },
];

/// The dedicated flowers-page track. Always restarts from 0 on entry.
const FLOWERS_TRACK: Track = Track {
    title: "flowers",
    artist: "—",
    source: "assets/audio/flowers-music.wav",
};

pub fn theme_tracks() -> &'static [Track] {
    THEME_TRACKS
}

pub fn flowers_track() -> Track {
    FLOWERS_TRACK
}

/// Next catalog index, wrapping at the end.
pub fn next_index(index: usize, len: usize) -> usize {
    (index + 1) % len.max(1)
}

/// Previous catalog index, wrapping at the start.
pub fn prev_index(index: usize, len: usize) -> usize {
    let len = len.max(1);
    (index + len - 1) % len
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_nonempty_and_first_is_default_theme() {
        let tracks = theme_tracks();
        assert!(!tracks.is_empty());
        assert_eq!(tracks[0].title, "kota ini tak sama tanpamu");
    }

    #[test]
    fn next_wraps_at_end() {
        let n = theme_tracks().len();
        assert_eq!(next_index(n - 1, n), 0);
        assert_eq!(next_index(0, n), 1);
    }

    #[test]
    fn prev_wraps_at_start() {
        let n = theme_tracks().len();
        assert_eq!(prev_index(0, n), n - 1);
        assert_eq!(prev_index(3, n), 2);
    }

    #[test]
    fn wrap_helpers_tolerate_degenerate_len() {
        assert_eq!(next_index(0, 0), 0);
        assert_eq!(prev_index(0, 0), 0);
    }
}
