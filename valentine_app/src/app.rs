//! Top-level application state machine.
//!
//! `AppState` owns the audio session, the particle field, and every page's
//! small state. All page changes funnel through [`AppState::goto`], which
//! fires the matching leave/enter pair exactly once — that is what keeps the
//! audio session's single-writer invariants intact no matter how the user
//! bounces around.

use std::sync::mpsc;
use std::time::Instant;

use hand_gesture::{GestureSample, PointerSim, SampleSlot, SourceHandle};
use particle_field::{ParticleField, Shape};
use track_session::{open_playback, theme_tracks, AudioSession};

use crate::mail;
use crate::pages::{
    flower_for_step, HomeStage, Page, PinLock, PinState, SecretStage, COLOR_PRESETS,
    HOME_LOADING_SECS, MENU_ITEMS, STORY_STEPS,
};
use crate::quiz::{QuestionKind, QuizFlow, QuizStage};
use crate::visualizer::{AppInput, InputMode, Visualizer};

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

pub struct AppConfig {
    /// Catalog index of the first theme track.
    pub start_track: usize,
    /// Index into [`COLOR_PRESETS`] for the particle scene.
    pub color_preset: usize,
    /// Particle convergence intensity, 0.0–1.0.
    pub intensity: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            start_track: 0,
            color_preset: 0,
            intensity: 0.5,
        }
    }
}

/// Seconds between a correct pin and the scene opening.
const UNLOCK_DELAY_SECS: f32 = 0.4;

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    session: AudioSession,
    field: ParticleField,

    page: Page,
    clock: f32,
    quit: bool,

    // ── home ─────────────────────────────────────────────────────────────
    home_stage: HomeStage,
    home_clock: f32,

    // ── menu ─────────────────────────────────────────────────────────────
    menu_selected: usize,

    // ── quiz ─────────────────────────────────────────────────────────────
    quiz: QuizFlow,

    // ── flowers ──────────────────────────────────────────────────────────
    flowers_step: usize,
    flowers_line: usize,
    flowers_collected: usize,

    // ── secret ───────────────────────────────────────────────────────────
    secret_stage: SecretStage,
    pin: PinLock,
    unlock_timer: f32,
    preset_index: usize,
    shape_index: usize,
    intensity: f32,

    // ── tracking ─────────────────────────────────────────────────────────
    slot: Option<SampleSlot>,
    last_sample: GestureSample,
}

impl AppState {
    pub fn new(cfg: AppConfig, session: AudioSession) -> Self {
        let preset_index = cfg.color_preset % COLOR_PRESETS.len();
        let mut state = AppState {
            field: ParticleField::new(COLOR_PRESETS[preset_index].rgb),
            session,
            page: Page::Home,
            clock: 0.0,
            quit: false,
            home_stage: HomeStage::Loading,
            home_clock: 0.0,
            menu_selected: 0,
            quiz: QuizFlow::new(),
            flowers_step: 0,
            flowers_line: 0,
            flowers_collected: 0,
            secret_stage: SecretStage::Warning,
            pin: PinLock::new(),
            unlock_timer: 0.0,
            preset_index,
            shape_index: 0,
            intensity: cfg.intensity.clamp(0.0, 1.0),
            slot: None,
            last_sample: GestureSample::default(),
        };
        if cfg.start_track < theme_tracks().len() {
            state.session.play_track(cfg.start_track);
        }
        state
    }

    // ── page navigation ──────────────────────────────────────────────────

    /// The single page-change funnel: leaves the old page, enters the new
    /// one, exactly once each.
    fn goto(&mut self, next: Page) {
        if next == self.page {
            return;
        }

        match self.page {
            Page::Music => self.session.leave_music_page(),
            Page::Flowers => self.session.leave_flowers_page(),
            Page::Secret => {
                // Tracker shutdown is handled by the run loop reacting to
                // wants_tracking() going false.
                self.slot = None;
                self.last_sample = GestureSample::default();
            }
            _ => {}
        }

        match next {
            Page::Music => self.session.enter_music_page(),
            Page::Flowers => {
                self.flowers_step = 0;
                self.flowers_line = 0;
                self.flowers_collected = 0;
                self.session.enter_flowers_page();
            }
            Page::Quiz => self.quiz = QuizFlow::new(),
            Page::Secret => {
                self.secret_stage = SecretStage::Warning;
                self.pin = PinLock::new();
                self.unlock_timer = 0.0;
            }
            _ => {}
        }

        self.page = next;
    }

    // ── input ────────────────────────────────────────────────────────────

    pub fn input_mode(&self) -> InputMode {
        match self.page {
            Page::Quiz if self.quiz.stage() == QuizStage::Question && self.quiz.wants_text() => {
                InputMode::Text
            }
            Page::Secret => match self.secret_stage {
                SecretStage::Pin => InputMode::Pin,
                SecretStage::Scene => InputMode::Scene,
                SecretStage::Warning => InputMode::Nav,
            },
            _ => InputMode::Nav,
        }
    }

    pub fn handle_input(&mut self, input: AppInput) {
        if input == AppInput::Quit {
            self.quit = true;
            return;
        }
        match self.page {
            Page::Home => self.handle_home(input),
            Page::Menu => self.handle_menu(input),
            Page::Quiz => self.handle_quiz(input),
            Page::Flowers => self.handle_flowers(input),
            Page::Music => self.handle_music(input),
            Page::Secret => self.handle_secret(input),
        }
    }

    fn handle_home(&mut self, input: AppInput) {
        if input != AppInput::Confirm {
            return;
        }
        match self.home_stage {
            HomeStage::Loading => self.home_stage = HomeStage::MusicPrompt,
            HomeStage::MusicPrompt => {
                // The first real interaction — the only moment audio is
                // allowed to start.
                self.session.start_theme();
                self.home_stage = HomeStage::Message;
            }
            HomeStage::Message => self.goto(Page::Menu),
        }
    }

    fn handle_menu(&mut self, input: AppInput) {
        match input {
            AppInput::Up => {
                self.menu_selected =
                    (self.menu_selected + MENU_ITEMS.len() - 1) % MENU_ITEMS.len();
            }
            AppInput::Down => {
                self.menu_selected = (self.menu_selected + 1) % MENU_ITEMS.len();
            }
            AppInput::Confirm => self.goto(MENU_ITEMS[self.menu_selected].page),
            AppInput::Back => self.goto(Page::Home),
            _ => {}
        }
    }

    fn handle_quiz(&mut self, input: AppInput) {
        if input == AppInput::Back {
            self.goto(Page::Menu);
            return;
        }
        match self.quiz.stage() {
            QuizStage::Welcome => {
                if input == AppInput::Confirm {
                    self.quiz.begin();
                }
            }
            QuizStage::Question => match input {
                AppInput::Up => self.quiz.move_selection(-1),
                AppInput::Down => self.quiz.move_selection(1),
                AppInput::Char(c) => self.quiz.push_char(c),
                AppInput::Delete => self.quiz.pop_char(),
                AppInput::Digit(d) if self.quiz.question().kind == QuestionKind::Slider => {
                    // 0 means ten on a 1–10 scale
                    self.quiz.set_slider(if d == 0 { 10 } else { d });
                }
                AppInput::Confirm => self.quiz.submit(),
                _ => {}
            },
            QuizStage::Summary => {
                if input == AppInput::Confirm {
                    if let Some(answers) = self.quiz.confirm() {
                        mail::deliver(answers);
                    }
                }
            }
            QuizStage::Done => {
                if input == AppInput::Confirm {
                    self.goto(Page::Menu);
                }
            }
        }
    }

    fn handle_flowers(&mut self, input: AppInput) {
        match input {
            AppInput::Back => self.goto(Page::Menu),
            AppInput::Confirm => {
                let story = STORY_STEPS[self.flowers_step.min(STORY_STEPS.len() - 1)];
                if self.flowers_line + 1 < story.len() {
                    self.flowers_line += 1;
                } else if self.flowers_step + 1 < STORY_STEPS.len() {
                    // Step finished: a flower joins the vase.
                    self.flowers_collected += 1;
                    log::debug!("collected {}", flower_for_step(self.flowers_step).name);
                    self.flowers_step += 1;
                    self.flowers_line = 0;
                } else {
                    self.flowers_collected = self.flowers_collected.max(STORY_STEPS.len());
                    self.goto(Page::Menu);
                }
            }
            _ => {}
        }
    }

    fn handle_music(&mut self, input: AppInput) {
        match input {
            AppInput::Back => self.goto(Page::Menu),
            AppInput::PlayPause => {
                // Also the explicit retry control when autoplay was refused.
                if self.session.theme_started() {
                    self.session.toggle_play();
                } else {
                    self.session.start_theme();
                }
            }
            AppInput::NextTrack => self.session.next_track(),
            AppInput::PrevTrack => self.session.prev_track(),
            AppInput::SeekForward => {
                let p = self.session.theme_position();
                self.session.seek_theme(p + 5.0);
            }
            AppInput::SeekBack => {
                let p = self.session.theme_position();
                self.session.seek_theme((p - 5.0).max(0.0));
            }
            AppInput::Digit(d) if d >= 1 && (d as usize) <= theme_tracks().len() => {
                self.session.play_track(d as usize - 1);
            }
            _ => {}
        }
    }

    fn handle_secret(&mut self, input: AppInput) {
        if input == AppInput::Back {
            self.goto(Page::Menu);
            return;
        }
        match self.secret_stage {
            SecretStage::Warning => {
                if input == AppInput::Confirm {
                    self.secret_stage = SecretStage::Pin;
                }
            }
            SecretStage::Pin => match input {
                AppInput::Digit(d) => {
                    self.pin.push_digit(d);
                    if self.pin.state() == PinState::Unlocked {
                        self.unlock_timer = UNLOCK_DELAY_SECS;
                    }
                }
                AppInput::Delete => self.pin.delete(),
                _ => {}
            },
            SecretStage::Scene => match input {
                AppInput::CyclePreset => {
                    self.preset_index = (self.preset_index + 1) % COLOR_PRESETS.len();
                }
                AppInput::CycleShape => {
                    self.shape_index = (self.shape_index + 1) % Shape::ALL.len();
                    self.field.select_shape(Shape::ALL[self.shape_index]);
                }
                AppInput::IntensityUp => {
                    self.intensity = (self.intensity + 0.1).min(1.0);
                }
                AppInput::IntensityDown => {
                    self.intensity = (self.intensity - 0.1).max(0.0);
                }
                AppInput::Explode => self.field.explode(),
                _ => {}
            },
        }
    }

    // ── per-frame tick ───────────────────────────────────────────────────

    pub fn tick(&mut self, dt: f32) {
        self.clock += dt;

        if self.page == Page::Home && self.home_stage == HomeStage::Loading {
            self.home_clock += dt;
            if self.home_clock >= HOME_LOADING_SECS {
                self.home_stage = HomeStage::MusicPrompt;
            }
        }

        if self.page == Page::Secret {
            self.pin.tick(dt);
            if self.pin.state() == PinState::Unlocked && self.secret_stage == SecretStage::Pin {
                self.unlock_timer -= dt;
                if self.unlock_timer <= 0.0 {
                    self.secret_stage = SecretStage::Scene;
                }
            }
            if self.secret_stage == SecretStage::Scene {
                if let Some(slot) = &self.slot {
                    self.last_sample = slot.latest();
                }
                let sample = self.last_sample;
                self.field.update(
                    dt,
                    &sample,
                    self.intensity,
                    COLOR_PRESETS[self.preset_index].rgb,
                );
            }
        }

        self.session.poll();
    }

    // ── tracking wiring (driven by the run loop) ─────────────────────────

    /// True while the particle scene needs a live sample source.
    pub fn wants_tracking(&self) -> bool {
        self.page == Page::Secret && self.secret_stage == SecretStage::Scene
    }

    pub fn has_tracking(&self) -> bool {
        self.slot.is_some()
    }

    pub fn attach_slot(&mut self, slot: SampleSlot) {
        self.slot = Some(slot);
    }

    // ── rendering ────────────────────────────────────────────────────────

    pub fn render(&self, vis: &mut Visualizer) {
        vis.begin_frame();
        match self.page {
            Page::Home => vis.render_home(self.home_stage, self.clock),
            Page::Menu => vis.render_menu(self.menu_selected, self.clock),
            Page::Quiz => vis.render_quiz(&self.quiz),
            Page::Flowers => vis.render_flowers(
                self.flowers_step,
                self.flowers_line,
                self.flowers_collected,
                self.clock,
            ),
            Page::Music => {
                let track = self.session.current_track();
                vis.render_music(
                    track.title,
                    track.artist,
                    self.session.theme_index(),
                    theme_tracks().len(),
                    self.session.theme_playing(),
                    self.session.theme_position(),
                    self.clock,
                );
            }
            Page::Secret => vis.render_secret(
                self.secret_stage,
                &self.pin,
                &self.field,
                &self.last_sample,
                &COLOR_PRESETS[self.preset_index],
                self.intensity,
                tracking_label(),
            ),
        }
        vis.end_frame();
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    // Accessors used by tests and main
    pub fn page(&self) -> Page {
        self.page
    }

    pub fn session(&self) -> &AudioSession {
        &self.session
    }
}

fn tracking_label() -> &'static str {
    if cfg!(feature = "leap") {
        "hand tracking active"
    } else {
        "mouse mode | move=follow hold=fist 1=rose 2=butterfly H=heart I=message"
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the site. Creates the window, wires the sample source whenever the
/// secret scene is up, and drives input → tick → render at ~60 fps.
pub fn run(cfg: AppConfig) -> Result<(), String> {
    let (sim_tx, sim_rx) = mpsc::channel();
    let mut vis = Visualizer::new(sim_tx)?;
    let mut first_rx = Some(sim_rx);

    let session = AudioSession::new(open_playback(), open_playback());
    let mut app = AppState::new(cfg, session);

    // The capture handle lives here so leaving the scene — or the loop —
    // stops it exactly once (Drop covers the quit path).
    let mut tracker: Option<SourceHandle> = None;

    let mut last = Instant::now();
    while vis.is_open() && !app.should_quit() {
        let dt = last.elapsed().as_secs_f32().min(0.1);
        last = Instant::now();

        for input in vis.poll_input(app.input_mode()) {
            app.handle_input(input);
        }

        // Tracker lifecycle follows the scene.
        if app.wants_tracking() && tracker.is_none() {
            let (slot, handle) = spawn_tracker(&mut vis, &mut first_rx);
            app.attach_slot(slot);
            tracker = Some(handle);
        } else if !app.wants_tracking() {
            if let Some(handle) = tracker.take() {
                handle.stop();
            }
        }

        app.tick(dt);
        app.render(&mut vis);
    }

    Ok(())
}

/// Spawn the right sample source for this build. The pointer simulator eats
/// the window's event channel; re-entering the scene wires a fresh one into
/// the visualizer. The hardware source carries the simulator as its
/// degradation path, so the scene always gets a sample stream.
fn spawn_tracker(
    vis: &mut Visualizer,
    first_rx: &mut Option<mpsc::Receiver<hand_gesture::SimInput>>,
) -> (SampleSlot, SourceHandle) {
    let rx = match first_rx.take() {
        Some(rx) => rx,
        None => {
            let (tx, rx) = mpsc::channel();
            vis.attach_sim(tx);
            rx
        }
    };
    let sim = PointerSim { rx };

    #[cfg(feature = "leap")]
    {
        hand_gesture::spawn_sample_source(hand_gesture::source::LeapSource {
            fallback: Some(sim),
        })
    }
    #[cfg(not(feature = "leap"))]
    {
        hand_gesture::spawn_sample_source(sim)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
