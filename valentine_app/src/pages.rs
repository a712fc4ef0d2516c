//! Page identities and the static/per-page state that isn't audio or
//! particles: menu entries, the flowers story, the secret page's stages and
//! pin lock, and the scene color presets.

/// Every destination in the site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Home,
    Menu,
    Quiz,
    Flowers,
    Music,
    Secret,
}

// ════════════════════════════════════════════════════════════════════════════
// Home
// ════════════════════════════════════════════════════════════════════════════

/// Home runs through three beats before the menu opens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HomeStage {
    /// Short "preparing something special" intro.
    Loading,
    /// Asks for the interaction that is allowed to start audio.
    MusicPrompt,
    /// The greeting itself.
    Message,
}

/// Seconds the loading beat holds before the music prompt.
pub const HOME_LOADING_SECS: f32 = 3.5;

pub const HOME_LOADING_TEXT: &str = "Menyiapkan sesuatu yang spesial untuk Kayla...";
pub const HOME_TITLE: &str = "Happy Val's Day, Kayla Saldrina";

// ════════════════════════════════════════════════════════════════════════════
// Menu
// ════════════════════════════════════════════════════════════════════════════

pub struct MenuItem {
    pub title: &'static str,
    pub blurb: &'static str,
    pub page: Page,
}

pub static MENU_ITEMS: [MenuItem; 4] = [
    MenuItem {
        title: "Quiz Match",
        blurb: "Want to try your luck?",
        page: Page::Quiz,
    },
    MenuItem {
        title: "Flowers",
        blurb: "A garden inspired by you",
        page: Page::Flowers,
    },
    MenuItem {
        title: "Music",
        blurb: "Songs that remind me of us",
        page: Page::Music,
    },
    MenuItem {
        title: "Secret",
        blurb: "Something special awaits...",
        page: Page::Secret,
    },
];

// ════════════════════════════════════════════════════════════════════════════
// Flowers
// ════════════════════════════════════════════════════════════════════════════

pub struct Flower {
    pub name: &'static str,
    pub color: u32,
}

/// One flower per story step, in order — one for each letter of her name.
pub static FLOWER_POOL: [Flower; 5] = [
    Flower { name: "Blue Tulip", color: 0xFF64B5F6 },
    Flower { name: "Pink Branch", color: 0xFFF06292 },
    Flower { name: "Pink Bloom", color: 0xFFF8BBD0 },
    Flower { name: "Purple Tulip", color: 0xFFBA68C8 },
    Flower { name: "Red Rose", color: 0xFFEF5350 },
];

pub const STORY_STEPS: &[&[&str]] = &[
    &[
        "I made this cute little Valentine quiz.",
        "Just harmless questions.",
        "Nothing serious.",
        "Absolutely normal behavior.",
    ],
    &[
        "Then I added:",
        "\"What's your love language?\"",
        "\"Is Abid your favorite person?\"",
        "\"On a scale of 1-10, how annoying is Abid?\"",
        "Totally subtle. Very neutral. Very unbiased.",
    ],
    &[
        "She starts answering seriously.",
        "Thinking deeply.",
        "Reflecting on life.",
        "Meanwhile, I'm just waiting for one answer:",
        "\"Of course Abid.\"",
    ],
    &[
        "What if she chooses 5 on the annoying scale?",
        "What if I'm not her favorite person?",
        "What if... I accidentally exposed my feelings?",
        "Why is this quiz stressing me out?",
    ],
    &[
        "But honestly...",
        "It was never about the quiz.",
        "I just wanted to know",
        "if I matter to her",
        "the way she matters to me.",
    ],
];

/// Flower granted after finishing `step` (steps are 0-based). Past the pool,
/// the order just wraps.
pub fn flower_for_step(step: usize) -> &'static Flower {
    &FLOWER_POOL[step % FLOWER_POOL.len()]
}

// ════════════════════════════════════════════════════════════════════════════
// Secret page
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SecretStage {
    /// "Are you sure?" gate.
    Warning,
    /// Six-digit pin lock.
    Pin,
    /// The particle scene (tracker running).
    Scene,
}

pub struct ColorPreset {
    pub name: &'static str,
    pub rgb: [f32; 3],
}

pub static COLOR_PRESETS: [ColorPreset; 8] = [
    ColorPreset { name: "Cherry Blossom", rgb: [1.0, 0.718, 0.773] },
    ColorPreset { name: "Royal Purple", rgb: [0.659, 0.333, 0.969] },
    ColorPreset { name: "Ocean Blue", rgb: [0.231, 0.510, 0.965] },
    ColorPreset { name: "Emerald", rgb: [0.063, 0.725, 0.506] },
    ColorPreset { name: "Sunset Gold", rgb: [0.961, 0.620, 0.043] },
    ColorPreset { name: "Rose Red", rgb: [0.937, 0.267, 0.267] },
    ColorPreset { name: "Ice White", rgb: [0.886, 0.910, 0.941] },
    ColorPreset { name: "Neon Pink", rgb: [0.925, 0.282, 0.600] },
];

/// Secret-message overlay lines, shown while both hands are up.
pub const SECRET_MESSAGE_LINES: [&str; 4] = [
    "when both of your hands are here...",
    "it feels like your whole heart is too.",
    "and that's all I ever needed.",
    "i miss you so bad kay.",
];

// ════════════════════════════════════════════════════════════════════════════
// Pin lock
// ════════════════════════════════════════════════════════════════════════════

const SECRET_PIN: [u8; 6] = [2, 3, 0, 8, 2, 3];

/// Seconds the error flash holds before the digits clear.
const PIN_ERROR_SECS: f32 = 0.6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinState {
    Entering,
    /// Wrong code; flashes briefly, then the digits clear.
    Error,
    Unlocked,
}

pub struct PinLock {
    digits: Vec<u8>,
    state: PinState,
    error_timer: f32,
}

impl Default for PinLock {
    fn default() -> Self {
        Self::new()
    }
}

impl PinLock {
    pub fn new() -> Self {
        PinLock {
            digits: Vec::with_capacity(SECRET_PIN.len()),
            state: PinState::Entering,
            error_timer: 0.0,
        }
    }

    pub fn push_digit(&mut self, digit: u8) {
        if self.state != PinState::Entering || self.digits.len() >= SECRET_PIN.len() {
            return;
        }
        self.digits.push(digit);
        if self.digits.len() == SECRET_PIN.len() {
            if self.digits == SECRET_PIN {
                self.state = PinState::Unlocked;
            } else {
                self.state = PinState::Error;
                self.error_timer = PIN_ERROR_SECS;
            }
        }
    }

    pub fn delete(&mut self) {
        if self.state == PinState::Entering {
            self.digits.pop();
        }
    }

    /// Advance the error flash; clears the digits once it runs out.
    pub fn tick(&mut self, dt: f32) {
        if self.state == PinState::Error {
            self.error_timer -= dt;
            if self.error_timer <= 0.0 {
                self.digits.clear();
                self.state = PinState::Entering;
            }
        }
    }

    pub fn state(&self) -> PinState {
        self.state
    }

    pub fn entered(&self) -> usize {
        self.digits.len()
    }

    pub fn capacity(&self) -> usize {
        SECRET_PIN.len()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
