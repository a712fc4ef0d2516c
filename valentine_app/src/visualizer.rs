//! Software-rendered window using `minifb`.
//!
//! One ARGB framebuffer, one draw routine per page, bitmap-font labels. The
//! secret scene projects the particle cloud through a fixed camera and
//! composites it with saturating additive blending; everything else is flat
//! panels and text.
//!
//! The visualizer also owns input translation: page-agnostic [`AppInput`]s
//! for the app state machine, and raw [`SimInput`]s forwarded to the pointer
//! sample source while the scene is up.

use std::sync::mpsc::Sender;

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use hand_gesture::{Gesture, GestureSample, SimInput, SimKey};
use particle_field::{font, ParticleField};

use crate::pages::{
    ColorPreset, HomeStage, PinLock, PinState, FLOWER_POOL, HOME_LOADING_TEXT, HOME_TITLE,
    MENU_ITEMS, SECRET_MESSAGE_LINES, STORY_STEPS,
};
use crate::quiz::{QuestionKind, QuizFlow, QuizStage};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W: usize = 960;
pub const WIN_H: usize = 600;

const BG_COLOR: u32 = 0xFF1A1024;
const PANEL_BG: u32 = 0xFF2A1838;
const ACCENT: u32 = 0xFFFF8FAB;
const ACCENT_DIM: u32 = 0xFFB06090;
const TEXT_MAIN: u32 = 0xFFEEE6F0;
const TEXT_DIM: u32 = 0xFF9080A0;
const GOLD: u32 = 0xFFFFD700;
const ERROR_RED: u32 = 0xFFE05252;
const OK_GREEN: u32 = 0xFF50C878;

// ════════════════════════════════════════════════════════════════════════════
// Input translation
// ════════════════════════════════════════════════════════════════════════════

/// What the key handling should mean right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    /// Menus and read-through pages: navigation keys only.
    Nav,
    /// An essay field is focused: letters type.
    Text,
    /// Pin entry: digits only.
    Pin,
    /// The particle scene: gesture hot-keys + scene controls, mouse feeds
    /// the sample source.
    Scene,
}

/// Page-agnostic input event for the app state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppInput {
    Quit,
    Back,
    Confirm,
    Up,
    Down,
    Digit(u8),
    Char(char),
    Delete,
    PlayPause,
    NextTrack,
    PrevTrack,
    SeekForward,
    SeekBack,
    CyclePreset,
    CycleShape,
    IntensityUp,
    IntensityDown,
    Explode,
}

const DIGIT_KEYS: [(Key, u8); 10] = [
    (Key::Key0, 0),
    (Key::Key1, 1),
    (Key::Key2, 2),
    (Key::Key3, 3),
    (Key::Key4, 4),
    (Key::Key5, 5),
    (Key::Key6, 6),
    (Key::Key7, 7),
    (Key::Key8, 8),
    (Key::Key9, 9),
];

const LETTER_KEYS: [(Key, char); 26] = [
    (Key::A, 'a'),
    (Key::B, 'b'),
    (Key::C, 'c'),
    (Key::D, 'd'),
    (Key::E, 'e'),
    (Key::F, 'f'),
    (Key::G, 'g'),
    (Key::H, 'h'),
    (Key::I, 'i'),
    (Key::J, 'j'),
    (Key::K, 'k'),
    (Key::L, 'l'),
    (Key::M, 'm'),
    (Key::N, 'n'),
    (Key::O, 'o'),
    (Key::P, 'p'),
    (Key::Q, 'q'),
    (Key::R, 'r'),
    (Key::S, 's'),
    (Key::T, 't'),
    (Key::U, 'u'),
    (Key::V, 'v'),
    (Key::W, 'w'),
    (Key::X, 'x'),
    (Key::Y, 'y'),
    (Key::Z, 'z'),
];

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf: Vec<u32>,
    sim_tx: Sender<SimInput>,
    prev_mouse: (f32, f32),
    mouse_was_down: bool,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimInput>) -> Result<Self, String> {
        let mut window = Window::new(
            "For Kayla",
            WIN_W,
            WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| e.to_string())?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            sim_tx,
            prev_mouse: (0.5, 0.5),
            mouse_was_down: false,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Swap in a fresh simulator channel (the old source consumed the last
    /// receiver when the scene was previously open).
    pub fn attach_sim(&mut self, tx: Sender<SimInput>) {
        self.sim_tx = tx;
    }

    /// Poll the keyboard (and, in scene mode, the mouse) and translate.
    pub fn poll_input(&mut self, mode: InputMode) -> Vec<AppInput> {
        let mut out = Vec::new();
        if !self.window.is_open() {
            out.push(AppInput::Quit);
            return out;
        }

        let pressed = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
        let repeating = |k: Key| self.window.is_key_pressed(k, KeyRepeat::Yes);

        if pressed(Key::Backspace) && mode != InputMode::Text && mode != InputMode::Pin {
            out.push(AppInput::Back);
        }
        if pressed(Key::Escape) {
            out.push(AppInput::Back);
        }
        if pressed(Key::Enter) {
            out.push(AppInput::Confirm);
        }

        match mode {
            InputMode::Nav => {
                if pressed(Key::Q) {
                    out.push(AppInput::Quit);
                }
                if repeating(Key::Up) {
                    out.push(AppInput::Up);
                }
                if repeating(Key::Down) {
                    out.push(AppInput::Down);
                }
                if repeating(Key::Left) {
                    out.push(AppInput::SeekBack);
                }
                if repeating(Key::Right) {
                    out.push(AppInput::SeekForward);
                }
                if pressed(Key::Space) {
                    out.push(AppInput::PlayPause);
                }
                if pressed(Key::N) {
                    out.push(AppInput::NextTrack);
                }
                if pressed(Key::P) {
                    out.push(AppInput::PrevTrack);
                }
                for (key, d) in DIGIT_KEYS {
                    if pressed(key) {
                        out.push(AppInput::Digit(d));
                    }
                }
            }
            InputMode::Text => {
                for (key, c) in LETTER_KEYS {
                    if repeating(key) {
                        out.push(AppInput::Char(c));
                    }
                }
                for (key, d) in DIGIT_KEYS {
                    if repeating(key) {
                        out.push(AppInput::Char((b'0' + d) as char));
                    }
                }
                if repeating(Key::Space) {
                    out.push(AppInput::Char(' '));
                }
                if repeating(Key::Backspace) {
                    out.push(AppInput::Delete);
                }
                if repeating(Key::Up) {
                    out.push(AppInput::Up);
                }
                if repeating(Key::Down) {
                    out.push(AppInput::Down);
                }
            }
            InputMode::Pin => {
                for (key, d) in DIGIT_KEYS {
                    if pressed(key) {
                        out.push(AppInput::Digit(d));
                    }
                }
                if pressed(Key::Backspace) {
                    out.push(AppInput::Delete);
                }
            }
            InputMode::Scene => {
                if pressed(Key::Q) {
                    out.push(AppInput::Quit);
                }
                if pressed(Key::C) {
                    out.push(AppInput::CyclePreset);
                }
                if pressed(Key::Tab) {
                    out.push(AppInput::CycleShape);
                }
                if pressed(Key::LeftBracket) {
                    out.push(AppInput::IntensityDown);
                }
                if pressed(Key::RightBracket) {
                    out.push(AppInput::IntensityUp);
                }
                if pressed(Key::X) {
                    out.push(AppInput::Explode);
                }
                self.poll_scene_pointer();
            }
        }

        out
    }

    /// Mouse + gesture hot-keys for the scene, forwarded to the sim source.
    fn poll_scene_pointer(&mut self) {
        let pressed = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
        let keys = [
            (Key::Key1, SimKey::OneFinger),
            (Key::Key2, SimKey::TwoFingers),
            (Key::H, SimKey::BothHands),
            (Key::I, SimKey::Idle),
        ];
        for (key, sim) in keys {
            if pressed(key) {
                let _ = self.sim_tx.send(SimInput::Key(sim));
            }
        }

        if let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Clamp) {
            let x = (mx / WIN_W as f32).clamp(0.0, 1.0);
            let y = (my / WIN_H as f32).clamp(0.0, 1.0);
            // Only actual movement goes through; stillness is how the
            // simulator's idle timeout fires.
            if (x - self.prev_mouse.0).abs() > 1e-4 || (y - self.prev_mouse.1).abs() > 1e-4 {
                self.prev_mouse = (x, y);
                let _ = self.sim_tx.send(SimInput::PointerMove { x, y });
            }
        }

        let down = self.window.get_mouse_down(MouseButton::Left);
        if down != self.mouse_was_down {
            self.mouse_was_down = down;
            let _ = self.sim_tx.send(if down {
                SimInput::ButtonDown
            } else {
                SimInput::ButtonUp
            });
        }
    }

    // ════════════════════════════════════════════════════════════════════
    // Page rendering
    // ════════════════════════════════════════════════════════════════════

    pub fn begin_frame(&mut self) {
        self.buf.fill(BG_COLOR);
    }

    pub fn end_frame(&mut self) {
        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    pub fn render_home(&mut self, stage: HomeStage, clock: f32) {
        self.draw_hearts(clock, 20);
        match stage {
            HomeStage::Loading => {
                self.draw_label_scaled(HOME_LOADING_TEXT, center_x(HOME_LOADING_TEXT, 2), 260, 2, TEXT_MAIN);
                let dots = (clock * 2.0) as usize % 4;
                self.draw_label(&".".repeat(dots), WIN_W / 2 - 8, 300, ACCENT);
            }
            HomeStage::MusicPrompt => {
                self.panel(WIN_W / 2 - 220, 200, 440, 170);
                self.draw_label_scaled("Before We Continue...", WIN_W / 2 - 150, 230, 2, ACCENT);
                self.draw_label(
                    "this site plays music. press Enter to let it sing.",
                    WIN_W / 2 - 190,
                    290,
                    TEXT_MAIN,
                );
            }
            HomeStage::Message => {
                self.draw_label_scaled(HOME_TITLE, center_x(HOME_TITLE, 2), 240, 2, ACCENT);
                self.draw_label(
                    "press Enter to explore",
                    WIN_W / 2 - 85,
                    320,
                    TEXT_DIM,
                );
            }
        }
        self.legend("Enter=continue  Q=quit");
    }

    pub fn render_menu(&mut self, selected: usize, clock: f32) {
        self.draw_hearts(clock, 12);
        self.draw_label_scaled(HOME_TITLE, center_x(HOME_TITLE, 2), 60, 2, ACCENT);
        self.draw_label(
            "Choose what you'd like to explore",
            WIN_W / 2 - 130,
            110,
            TEXT_DIM,
        );

        for (i, item) in MENU_ITEMS.iter().enumerate() {
            let y = 170 + i * 90;
            let bg = if i == selected { PANEL_BG } else { 0xFF221230 };
            self.fill_rect(WIN_W / 2 - 260, y, 520, 70, bg);
            if i == selected {
                self.draw_border(WIN_W / 2 - 260, y, 520, 70, ACCENT);
            }
            self.draw_label_scaled(item.title, WIN_W / 2 - 240, y + 16, 2, TEXT_MAIN);
            self.draw_label(item.blurb, WIN_W / 2 - 240, y + 46, TEXT_DIM);
        }
        self.legend("Up/Down=select  Enter=open  Q=quit");
    }

    pub fn render_quiz(&mut self, flow: &QuizFlow) {
        match flow.stage() {
            QuizStage::Welcome => {
                self.panel(WIN_W / 2 - 250, 180, 500, 200);
                self.draw_label_scaled("Quiz Match", WIN_W / 2 - 70, 210, 2, ACCENT);
                self.draw_label(
                    "ten questions. answer honestly. no pressure.",
                    WIN_W / 2 - 170,
                    270,
                    TEXT_MAIN,
                );
                self.draw_label("(okay, a little pressure)", WIN_W / 2 - 90, 295, TEXT_DIM);
                self.legend("Enter=start  Backspace=menu");
            }
            QuizStage::Question => {
                let q = flow.question();
                self.draw_label(
                    &format!("question {} / {}", flow.question_number(), flow.total()),
                    40,
                    40,
                    TEXT_DIM,
                );
                self.draw_label_wrapped(q.question, 40, 70, WIN_W - 80, TEXT_MAIN);

                match q.kind {
                    QuestionKind::MultipleChoice => {
                        for (i, option) in q.options.iter().enumerate() {
                            let y = 160 + i * 40;
                            let color = if i == flow.selected() { ACCENT } else { TEXT_DIM };
                            if i == flow.selected() {
                                self.fill_rect(36, y - 6, WIN_W - 72, 28, PANEL_BG);
                            }
                            self.draw_label(
                                &format!("{}. {}", option.label, option.text),
                                48,
                                y,
                                color,
                            );
                        }
                    }
                    QuestionKind::Slider => {
                        let value = flow.slider();
                        let label = q
                            .slider_labels
                            .iter()
                            .find(|(v, _)| *v == value)
                            .map(|(_, l)| *l)
                            .unwrap_or("");
                        self.draw_label_scaled(&format!("{value}"), WIN_W / 2 - 10, 200, 3, GOLD);
                        self.draw_label(label, center_x(label, 1), 260, TEXT_MAIN);
                        let w = (WIN_W - 200) * value as usize / q.slider_max as usize;
                        self.fill_rect(100, 300, WIN_W - 200, 8, PANEL_BG);
                        self.fill_rect(100, 300, w, 8, ACCENT);
                        self.draw_label("press 1-9, 0 for ten", WIN_W / 2 - 80, 330, TEXT_DIM);
                    }
                    QuestionKind::Essay => {}
                }

                if flow.wants_text() {
                    let y = WIN_H - 140;
                    self.fill_rect(40, y, WIN_W - 80, 30, PANEL_BG);
                    self.draw_label(&format!("> {}_", flow.essay()), 48, y + 10, TEXT_MAIN);
                }
                if let Some(notice) = flow.notice() {
                    self.draw_label(notice, center_x(notice, 1), WIN_H - 90, ERROR_RED);
                }
                self.legend("type/select  Enter=answer  Esc=menu");
            }
            QuizStage::Summary => {
                self.draw_label_scaled("all done!", WIN_W / 2 - 60, 50, 2, ACCENT);
                for (i, a) in flow.answers().iter().enumerate().take(10) {
                    let y = 100 + i * 42;
                    self.draw_label(&format!("Q{}: {}", i + 1, a.question), 40, y, TEXT_DIM);
                    let line = match &a.selected_option {
                        Some(l) => format!("[{}] {}", l, a.answer),
                        None => a.answer.clone(),
                    };
                    self.draw_label(&line, 60, y + 16, TEXT_MAIN);
                }
                self.legend("Enter=send answers");
            }
            QuizStage::Done => {
                self.panel(WIN_W / 2 - 230, 220, 460, 120);
                self.draw_label_scaled("sent with love", WIN_W / 2 - 95, 250, 2, OK_GREEN);
                self.draw_label("thank you for playing", WIN_W / 2 - 85, 300, TEXT_DIM);
                self.legend("Backspace=menu");
            }
        }
    }

    pub fn render_flowers(&mut self, step: usize, line: usize, collected: usize, clock: f32) {
        self.draw_hearts(clock, 6);
        self.draw_label_scaled("Flowers", WIN_W / 2 - 50, 40, 2, ACCENT);

        let story = STORY_STEPS[step.min(STORY_STEPS.len() - 1)];
        for (i, text) in story.iter().take(line + 1).enumerate() {
            self.draw_label(text, center_x(text, 1), 140 + i * 30, TEXT_MAIN);
        }

        // The vase so far: one square per collected flower
        for (i, flower) in FLOWER_POOL.iter().take(collected).enumerate() {
            let x = WIN_W / 2 - (collected * 60) / 2 + i * 60;
            self.fill_rect(x, WIN_H - 180, 44, 44, flower.color);
            self.draw_border(x, WIN_H - 180, 44, 44, TEXT_MAIN);
        }
        if collected > 0 {
            let latest = FLOWER_POOL[(collected - 1).min(FLOWER_POOL.len() - 1)].name;
            self.draw_label(latest, center_x(latest, 1), WIN_H - 120, TEXT_DIM);
        }

        self.legend("Enter=next  Backspace=menu (theme resumes)");
    }

    #[allow(clippy::too_many_arguments)]
    pub fn render_music(
        &mut self,
        title: &str,
        artist: &str,
        index: usize,
        total: usize,
        playing: bool,
        position: f32,
        clock: f32,
    ) {
        self.draw_hearts(clock, 6);
        self.draw_label_scaled("Music", WIN_W / 2 - 40, 50, 2, ACCENT);

        self.panel(WIN_W / 2 - 210, 150, 420, 220);
        self.draw_label_scaled(title, center_x(title, 2), 190, 2, TEXT_MAIN);
        self.draw_label(artist, center_x(artist, 1), 230, TEXT_DIM);
        self.draw_label(
            &format!("track {} / {}", index + 1, total),
            WIN_W / 2 - 50,
            260,
            TEXT_DIM,
        );

        let mins = (position / 60.0) as u32;
        let secs = (position % 60.0) as u32;
        self.draw_label(&format!("{mins}:{secs:02}"), WIN_W / 2 - 190, 300, TEXT_MAIN);
        let state = if playing { "playing" } else { "paused" };
        self.draw_label(state, WIN_W / 2 + 130, 300, if playing { OK_GREEN } else { GOLD });

        self.draw_label("loop off - track end plays the next song", WIN_W / 2 - 150, 340, TEXT_DIM);
        self.legend("Space=play/pause  N/P=next/prev  Left/Right=seek  Backspace=menu");
    }

    #[allow(clippy::too_many_arguments)]
    pub fn render_secret(
        &mut self,
        stage: crate::pages::SecretStage,
        pin: &PinLock,
        field: &ParticleField,
        sample: &GestureSample,
        preset: &ColorPreset,
        intensity: f32,
        tracking_label: &str,
    ) {
        use crate::pages::SecretStage;
        match stage {
            SecretStage::Warning => {
                self.panel(WIN_W / 2 - 240, 200, 480, 160);
                self.draw_label_scaled("Something special awaits...", WIN_W / 2 - 180, 230, 2, ACCENT);
                self.draw_label(
                    "this page wants to see your hands. ready?",
                    WIN_W / 2 - 165,
                    290,
                    TEXT_MAIN,
                );
                self.legend("Enter=continue  Backspace=menu");
            }
            SecretStage::Pin => {
                self.panel(WIN_W / 2 - 180, 180, 360, 200);
                self.draw_label_scaled("Enter Secret Code", WIN_W / 2 - 110, 210, 2, TEXT_MAIN);
                self.draw_label("masukkan 6 digit kode rahasia", WIN_W / 2 - 110, 250, TEXT_DIM);

                let color = match pin.state() {
                    PinState::Error => ERROR_RED,
                    PinState::Unlocked => OK_GREEN,
                    PinState::Entering => ACCENT,
                };
                for i in 0..pin.capacity() {
                    let x = WIN_W / 2 - 90 + i * 32;
                    if i < pin.entered() {
                        self.fill_rect(x, 290, 16, 16, color);
                    } else {
                        self.draw_border(x, 290, 16, 16, TEXT_DIM);
                    }
                }
                self.legend("0-9=digits  Backspace=delete  Esc=menu");
            }
            SecretStage::Scene => {
                self.draw_particles(field);
                if sample.gesture == Gesture::BothHands {
                    self.draw_secret_message();
                }
                self.draw_label(tracking_label, 10, 10, TEXT_DIM);
                let shape = field
                    .current_shape()
                    .map(|s| s.label())
                    .unwrap_or("-");
                self.draw_label(
                    &format!(
                        "{}  shape:{}  intensity:{:.1}",
                        preset.name, shape, intensity
                    ),
                    10,
                    WIN_H - 34,
                    TEXT_DIM,
                );
                self.legend("move=steer  hold=fist  1 2 H I=gestures  Tab=shape  C=color  [ ]=intensity  X=burst  Esc=menu");
            }
        }
    }

    // ── particle projection ───────────────────────────────────────────────

    /// Project the cloud through a camera at z = 7 with a 60 degree fov and
    /// composite with additive blending.
    fn draw_particles(&mut self, field: &ParticleField) {
        let focal = (WIN_H as f32 / 2.0) / (30.0_f32).to_radians().tan();
        let (sin_r, cos_r) = field.rotation().sin_cos();

        let positions = field.positions();
        let colors = field.colors();
        let sizes = field.sizes();

        for i in 0..positions.len() {
            let [x, y, z] = positions[i];
            // Rotate the whole set about the vertical axis
            let rx = x * cos_r + z * sin_r;
            let rz = -x * sin_r + z * cos_r;

            let depth = 7.0 - rz;
            if depth < 0.5 {
                continue;
            }
            let sx = WIN_W as f32 / 2.0 + rx * focal / depth;
            let sy = WIN_H as f32 / 2.0 - y * focal / depth;
            if sx < 0.0 || sy < 0.0 || sx >= WIN_W as f32 || sy >= WIN_H as f32 {
                continue;
            }

            let glow = (sizes[i] / 3.5) * (7.0 / depth).clamp(0.4, 1.6) * 0.55;
            let c = colors[i];
            let px = sx as usize;
            let py = sy as usize;
            self.add_pixel(px, py, c, glow);
            // Near particles get a second pixel of spread
            if depth < 6.0 {
                self.add_pixel(px + 1, py, c, glow * 0.5);
                self.add_pixel(px, py + 1, c, glow * 0.5);
            }
        }
    }

    /// Saturating additive blend of a scaled color into one pixel.
    fn add_pixel(&mut self, x: usize, y: usize, rgb: [f32; 3], scale: f32) {
        if x >= WIN_W || y >= WIN_H {
            return;
        }
        let idx = y * WIN_W + x;
        let prev = self.buf[idx];
        let add = |channel: u32, v: f32| -> u32 {
            (channel + (v.clamp(0.0, 1.0) * scale * 255.0) as u32).min(255)
        };
        let r = add((prev >> 16) & 0xFF, rgb[0]);
        let g = add((prev >> 8) & 0xFF, rgb[1]);
        let b = add(prev & 0xFF, rgb[2]);
        self.buf[idx] = 0xFF000000 | (r << 16) | (g << 8) | b;
    }

    fn draw_secret_message(&mut self) {
        let h = SECRET_MESSAGE_LINES.len() * 30 + 40;
        let y0 = WIN_H / 2 - h / 2;
        self.fill_rect(WIN_W / 2 - 230, y0, 460, h, PANEL_BG);
        self.draw_border(WIN_W / 2 - 230, y0, 460, h, ACCENT_DIM);
        for (i, line) in SECRET_MESSAGE_LINES.iter().enumerate() {
            let color = if i == SECRET_MESSAGE_LINES.len() - 1 {
                ACCENT
            } else {
                TEXT_MAIN
            };
            self.draw_label(line, center_x(line, 1), y0 + 24 + i * 30, color);
        }
    }

    // ── decoration ────────────────────────────────────────────────────────

    /// Drifting heart sparks; purely time-driven so no state is kept.
    fn draw_hearts(&mut self, clock: f32, count: usize) {
        for i in 0..count {
            let fi = i as f32;
            let x = ((fi * 0.618).fract() * WIN_W as f32
                + (clock * 0.3 + fi).sin() * 18.0) as isize;
            let speed = 18.0 + (fi * 7.7).fract() * 22.0;
            let y = WIN_H as f32 - ((clock * speed + fi * 97.0) % (WIN_H as f32 + 20.0));
            if x >= 0 && (x as usize) < WIN_W {
                self.draw_label("<3", x as usize, y as usize, 0xFF50304A);
            }
        }
    }

    // ── primitive helpers ─────────────────────────────────────────────────

    fn panel(&mut self, x: usize, y: usize, w: usize, h: usize) {
        self.fill_rect(x, y, w, h, PANEL_BG);
        self.draw_border(x, y, w, h, ACCENT_DIM);
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(WIN_H) {
            for col in x..(x + w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for col in x..(x + w).min(WIN_W) {
            if y < WIN_H {
                self.buf[y * WIN_W + col] = color;
            }
            if y + h >= 1 && y + h - 1 < WIN_H {
                self.buf[(y + h - 1) * WIN_W + col] = color;
            }
        }
        for row in y..(y + h).min(WIN_H) {
            if x < WIN_W {
                self.buf[row * WIN_W + x] = color;
            }
            if x + w >= 1 && x + w - 1 < WIN_W {
                self.buf[row * WIN_W + x + w - 1] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    /// 3×5 bitmap-font label (the same font the message shape rasterizes).
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        self.draw_label_scaled(text, x, y, 1, color);
    }

    fn draw_label_scaled(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = font::glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        for dy in 0..scale {
                            for dx in 0..scale {
                                self.set_pixel(
                                    cx + col * scale + dx,
                                    y + row * scale + dy,
                                    color,
                                );
                            }
                        }
                    }
                }
            }
            cx += 4 * scale;
            if cx + 4 * scale > WIN_W {
                break;
            }
        }
    }

    /// Word-wrapped label; lines advance by 14 px.
    fn draw_label_wrapped(&mut self, text: &str, x: usize, y: usize, max_w: usize, color: u32) {
        let chars_per_line = (max_w / 4).max(1);
        let mut line = String::new();
        let mut cy = y;
        for word in text.split_whitespace() {
            if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > chars_per_line
            {
                self.draw_label(&line, x, cy, color);
                cy += 14;
                line.clear();
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        if !line.is_empty() {
            self.draw_label(&line, x, cy, color);
        }
    }

    fn legend(&mut self, text: &str) {
        self.draw_label(text, 10, WIN_H - 16, 0xFF887898);
    }
}

/// Left edge that centres `text` at the given font scale.
fn center_x(text: &str, scale: usize) -> usize {
    let w = text.chars().count() * 4 * scale;
    (WIN_W.saturating_sub(w)) / 2
}
