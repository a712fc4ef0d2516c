//! The particle engine: one fixed-size cloud easing toward gesture-selected
//! shape targets, frame by frame.
//!
//! All state is owned by the render thread; `update` is the only mutator and
//! never blocks. The one "deferred" behavior — the galaxy's converge phase
//! 800 ms after its scatter — is a pending record carrying an epoch token,
//! checked when the clock passes it. A stale token (any shape change in
//! between) makes it a no-op.

use rand::Rng;

use hand_gesture::{Gesture, GestureSample};

use crate::font;
use crate::shapes::{self, Shape};

pub const PARTICLE_COUNT: usize = 3500;

/// The fixed message rendered by the `Message` shape.
const MESSAGE: &str = "Hi Kay! ini Abid";

/// Delay between the galaxy's scatter and its convergence.
const SCATTER_DELAY: f32 = 0.8;

/// Interpolation rate while an explode burst is active.
const EXPLODE_SPEED: f32 = 8.0;
const EXPLODE_TIME: f32 = 0.6;

struct PendingConverge {
    fire_at: f32,
    epoch: u64,
}

pub struct ParticleField {
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 3]>,
    sizes: Vec<f32>,
    targets: Vec<[f32; 3]>,

    shape: Option<Shape>,
    epoch: u64,
    pending: Option<PendingConverge>,
    explode_until: f32,

    zoom: f32,
    rotation: f32,
    clock: f32,

    /// Rasterized message points, computed on first use.
    message: Option<Vec<(f32, f32)>>,
}

impl ParticleField {
    pub fn new(base_color: [f32; 3]) -> Self {
        let mut rng = rand::rng();
        let mut positions = Vec::with_capacity(PARTICLE_COUNT);
        let mut colors = Vec::with_capacity(PARTICLE_COUNT);
        let mut sizes = Vec::with_capacity(PARTICLE_COUNT);

        let (h, s, l) = rgb_to_hsl(base_color);
        for _ in 0..PARTICLE_COUNT {
            positions.push([
                (rng.random::<f32>() - 0.5) * 8.0,
                (rng.random::<f32>() - 0.5) * 6.0,
                (rng.random::<f32>() - 0.5) * 4.0,
            ]);
            colors.push(hsl_to_rgb(
                h + (rng.random::<f32>() - 0.5) * 0.08,
                (s + (rng.random::<f32>() - 0.5) * 0.2).clamp(0.0, 1.0),
                (l + (rng.random::<f32>() - 0.5) * 0.15).clamp(0.0, 1.0),
            ));
            sizes.push(1.0 + rng.random::<f32>() * 2.5);
        }

        ParticleField {
            positions,
            colors,
            sizes,
            targets: vec![[0.0; 3]; PARTICLE_COUNT],
            shape: None,
            epoch: 0,
            pending: None,
            explode_until: 0.0,
            zoom: 1.0,
            rotation: 0.0,
            clock: 0.0,
            message: None,
        }
    }

    // ── shape selection ──────────────────────────────────────────────────

    /// Shape asked for by a gesture. `Move` keeps whatever is active (Heart
    /// if nothing is yet); everything else has a fixed mapping.
    fn mapped_shape(&self, gesture: Gesture) -> Option<Shape> {
        match gesture {
            Gesture::Idle => Some(Shape::Message),
            Gesture::OneFinger => Some(Shape::Rose),
            Gesture::TwoFingers => Some(Shape::Butterfly),
            Gesture::BothHands => Some(Shape::Heart),
            Gesture::Fist => Some(Shape::Earth),
            Gesture::OpenHand => Some(Shape::Galaxy),
            Gesture::Move => {
                if self.shape.is_none() {
                    Some(Shape::Heart)
                } else {
                    None
                }
            }
        }
    }

    /// Force a catalog shape (the pattern picker). Gesture-driven changes
    /// still apply on the next sample.
    pub fn select_shape(&mut self, shape: Shape) {
        if self.shape != Some(shape) {
            self.transition(shape);
        }
    }

    fn transition(&mut self, shape: Shape) {
        self.epoch += 1;
        self.pending = None;

        if shape == Shape::Galaxy {
            // Two-phase entry: scatter now, converge after the delay —
            // but only if the galaxy is still current when the delay ends.
            let mut rng = rand::rng();
            for t in self.targets.iter_mut() {
                *t = shapes::shell(&mut rng, 5.0, 8.0);
            }
            self.pending = Some(PendingConverge {
                fire_at: self.clock + SCATTER_DELAY,
                epoch: self.epoch,
            });
        } else {
            self.regenerate(shape);
        }
        log::debug!("shape -> {}", shape.label());
        self.shape = Some(shape);
    }

    fn regenerate(&mut self, shape: Shape) {
        if shape == Shape::Message && self.message.is_none() {
            // Rasterized once, lazily; never on the per-frame path again.
            self.message = Some(font::message_points(MESSAGE));
        }
        let mut rng = rand::rng();
        let n = PARTICLE_COUNT;
        for (i, t) in self.targets.iter_mut().enumerate() {
            *t = match shape {
                Shape::Heart => shapes::heart(i, n, &mut rng),
                Shape::Rose => shapes::rose(i, n, &mut rng),
                Shape::Earth => shapes::earth(&mut rng),
                Shape::Galaxy => shapes::galaxy(&mut rng),
                Shape::Butterfly => shapes::butterfly(i, n, &mut rng),
                Shape::Dna => shapes::dna(i, n),
                Shape::Message => {
                    shapes::message(i, self.message.as_deref().unwrap_or(&[]), &mut rng)
                }
            };
        }
    }

    /// One-shot burst: throw every particle onto an outer shell at the fast
    /// rate. The next gesture sample re-asserts a shape.
    pub fn explode(&mut self) {
        self.epoch += 1;
        self.pending = None;
        self.shape = None;
        let mut rng = rand::rng();
        for t in self.targets.iter_mut() {
            *t = shapes::shell(&mut rng, 4.0, 6.0);
        }
        self.explode_until = self.clock + EXPLODE_TIME;
    }

    // ── per-frame update ─────────────────────────────────────────────────

    /// Advance the cloud by `dt` seconds against the newest sample.
    /// `intensity` (0..1) scales the convergence speed; `base_color` is the
    /// hue every particle drifts toward.
    pub fn update(&mut self, dt: f32, sample: &GestureSample, intensity: f32, base_color: [f32; 3]) {
        self.clock += dt;

        // Depth → zoom, smoothed independently of frame rate.
        let zoom_target = 0.6 + (1.0 - sample.depth) * 0.8;
        self.zoom += (zoom_target - self.zoom) * (dt * 2.0).min(1.0);

        if let Some(shape) = self.mapped_shape(sample.gesture) {
            if self.shape != Some(shape) {
                self.transition(shape);
            }
        }

        // Deferred galaxy convergence, epoch-guarded.
        let converge_due = matches!(&self.pending, Some(p) if self.clock >= p.fire_at);
        if converge_due {
            if let Some(p) = self.pending.take() {
                if p.epoch == self.epoch && self.shape == Some(Shape::Galaxy) {
                    self.regenerate(Shape::Galaxy);
                }
            }
        }

        let base_speed = if self.clock < self.explode_until {
            EXPLODE_SPEED
        } else {
            1.5 + intensity.clamp(0.0, 1.0) * 2.5
        };
        let step = (dt * base_speed).min(1.0);
        let color_step = (dt * 2.0).min(1.0);

        let follow_hand = matches!(sample.gesture, Gesture::Move | Gesture::OpenHand);
        let hand_x = (sample.x - 0.5) * 8.0 * 0.35;
        let hand_y = -(sample.y - 0.5) * 6.0 * 0.35;

        let t = self.clock;
        for i in 0..PARTICLE_COUNT {
            let target = self.targets[i];
            let mut dx = target[0] * self.zoom;
            let mut dy = target[1] * self.zoom;
            let dz = target[2] * self.zoom;

            if follow_hand {
                dx += hand_x;
                dy += hand_y;
            }

            // Ambient float
            let fi = i as f32;
            dx += (t * 0.4 + fi * 0.08).sin() * 0.04;
            dy += (t * 0.25 + fi * 0.12).cos() * 0.04;

            let p = &mut self.positions[i];
            p[0] += (dx - p[0]) * step;
            p[1] += (dy - p[1]) * step;
            p[2] += (dz - p[2]) * step;

            let c = &mut self.colors[i];
            let cr = (base_color[0] + (fi * 0.5).sin() * 0.08).clamp(0.0, 1.0);
            let cg = (base_color[1] + (fi * 0.3).cos() * 0.08).clamp(0.0, 1.0);
            let cb = (base_color[2] + (fi * 0.7).sin() * 0.04).clamp(0.0, 1.0);
            c[0] += (cr - c[0]) * color_step;
            c[1] += (cg - c[1]) * color_step;
            c[2] += (cb - c[2]) * color_step;
        }

        // Slow ambient rotation, independent of gesture and intensity.
        self.rotation += dt * 0.06;
    }

    // ── accessors for the renderer ───────────────────────────────────────

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn current_shape(&self) -> Option<Shape> {
        self.shape
    }

    #[cfg(test)]
    fn target_radii(&self) -> Vec<f32> {
        self.targets
            .iter()
            .map(|t| (t[0] * t[0] + t[1] * t[1] + t[2] * t[2]).sqrt())
            .collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Color helpers
// ════════════════════════════════════════════════════════════════════════════

fn rgb_to_hsl([r, g, b]: [f32; 3]) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    if (max - min).abs() < f32::EPSILON {
        return (0.0, 0.0, l);
    }
    let d = max - min;
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let h = if max == r {
        ((g - b) / d + if g < b { 6.0 } else { 0.0 }) / 6.0
    } else if max == g {
        ((b - r) / d + 2.0) / 6.0
    } else {
        ((r - g) / d + 4.0) / 6.0
    };
    (h, s, l)
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    let h = h.rem_euclid(1.0);
    if s <= 0.0 {
        return [l, l, l];
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let hue = |mut t: f32| {
        t = t.rem_euclid(1.0);
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    };
    [hue(h + 1.0 / 3.0), hue(h), hue(h - 1.0 / 3.0)]
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const PINK: [f32; 3] = [1.0, 0.72, 0.77];

    fn sample(gesture: Gesture) -> GestureSample {
        GestureSample {
            gesture,
            ..GestureSample::default()
        }
    }

    fn step(field: &mut ParticleField, gesture: Gesture, dt: f32) {
        field.update(dt, &sample(gesture), 0.5, PINK);
    }

    #[test]
    fn cloud_is_fixed_size() {
        let f = ParticleField::new(PINK);
        assert_eq!(f.positions().len(), PARTICLE_COUNT);
        assert_eq!(f.colors().len(), PARTICLE_COUNT);
        assert_eq!(f.sizes().len(), PARTICLE_COUNT);
    }

    #[test]
    fn gestures_map_to_their_shapes() {
        let table = [
            (Gesture::Idle, Shape::Message),
            (Gesture::OneFinger, Shape::Rose),
            (Gesture::TwoFingers, Shape::Butterfly),
            (Gesture::BothHands, Shape::Heart),
            (Gesture::Fist, Shape::Earth),
            (Gesture::OpenHand, Shape::Galaxy),
        ];
        for (gesture, shape) in table {
            let mut f = ParticleField::new(PINK);
            step(&mut f, gesture, 0.016);
            assert_eq!(f.current_shape(), Some(shape), "{gesture:?}");
        }
    }

    #[test]
    fn move_selects_heart_only_when_nothing_is_active() {
        let mut f = ParticleField::new(PINK);
        step(&mut f, Gesture::Move, 0.016);
        assert_eq!(f.current_shape(), Some(Shape::Heart));

        step(&mut f, Gesture::OneFinger, 0.016);
        assert_eq!(f.current_shape(), Some(Shape::Rose));
        // Move must not knock an active shape back to heart
        step(&mut f, Gesture::Move, 0.016);
        assert_eq!(f.current_shape(), Some(Shape::Rose));
    }

    #[test]
    fn two_hands_from_rose_switches_immediately_without_scatter() {
        let mut f = ParticleField::new(PINK);
        step(&mut f, Gesture::OneFinger, 0.016);
        step(&mut f, Gesture::BothHands, 0.016);
        assert_eq!(f.current_shape(), Some(Shape::Heart));
        // No pending converge, and heart targets are heart-sized, not shell-sized
        assert!(f.pending.is_none());
        let max_r = f.target_radii().into_iter().fold(0.0, f32::max);
        assert!(max_r < 4.0, "heart targets should be near the origin, got {max_r}");
    }

    #[test]
    fn galaxy_scatters_then_converges_after_the_delay() {
        let mut f = ParticleField::new(PINK);
        step(&mut f, Gesture::OpenHand, 0.016);
        assert_eq!(f.current_shape(), Some(Shape::Galaxy));

        // Phase 1: scatter shell, radius 5..13
        let radii = f.target_radii();
        assert!(radii.iter().all(|r| (4.9..13.1).contains(r)));

        // Phase 2: after 800 ms with the gesture held, the real galaxy lands
        for _ in 0..60 {
            step(&mut f, Gesture::OpenHand, 0.016);
        }
        assert!(f.pending.is_none());
        let radii = f.target_radii();
        assert!(
            radii.iter().all(|r| *r <= 4.1),
            "converged targets should be galaxy-sized"
        );
    }

    #[test]
    fn leaving_open_hand_before_the_delay_cancels_convergence() {
        let mut f = ParticleField::new(PINK);
        step(&mut f, Gesture::OpenHand, 0.016);
        // Switch away well inside the 800 ms window
        step(&mut f, Gesture::BothHands, 0.1);
        assert_eq!(f.current_shape(), Some(Shape::Heart));

        // Cross the original deadline; the stale converge must not fire
        for _ in 0..60 {
            step(&mut f, Gesture::BothHands, 0.016);
        }
        assert_eq!(f.current_shape(), Some(Shape::Heart));
        let max_r = f.target_radii().into_iter().fold(0.0, f32::max);
        assert!(max_r < 4.0, "targets must still be the heart, got {max_r}");
    }

    #[test]
    fn reselecting_open_hand_after_another_gesture_scatters_again() {
        let mut f = ParticleField::new(PINK);
        step(&mut f, Gesture::OpenHand, 0.016);
        for _ in 0..60 {
            step(&mut f, Gesture::OpenHand, 0.016);
        }
        step(&mut f, Gesture::Fist, 0.016);
        assert_eq!(f.current_shape(), Some(Shape::Earth));

        // Open hand again: the scatter phase re-runs
        step(&mut f, Gesture::OpenHand, 0.016);
        assert!(f.pending.is_some());
        let radii = f.target_radii();
        assert!(radii.iter().all(|r| (4.9..13.1).contains(r)));
    }

    #[test]
    fn near_hand_zooms_in_far_hand_zooms_out() {
        let mut f = ParticleField::new(PINK);
        let near = GestureSample {
            depth: 0.0,
            gesture: Gesture::Fist,
            ..GestureSample::default()
        };
        for _ in 0..120 {
            f.update(0.016, &near, 0.5, PINK);
        }
        assert_relative_eq!(f.zoom(), 1.4, epsilon = 0.05);

        let far = GestureSample {
            depth: 1.0,
            gesture: Gesture::Fist,
            ..GestureSample::default()
        };
        for _ in 0..240 {
            f.update(0.016, &far, 0.5, PINK);
        }
        assert_relative_eq!(f.zoom(), 0.6, epsilon = 0.05);
    }

    #[test]
    fn particles_converge_toward_targets() {
        let mut f = ParticleField::new(PINK);
        for _ in 0..600 {
            step(&mut f, Gesture::Fist, 0.016);
        }
        // Earth radius 2.2, zoom ~1.0 at default depth 0.5 → well within 4
        let max_r = f
            .positions()
            .iter()
            .map(|p| (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt())
            .fold(0.0, f32::max);
        assert!(max_r < 4.5, "cloud did not converge, max radius {max_r}");
    }

    #[test]
    fn colors_drift_toward_the_base_color() {
        let mut f = ParticleField::new([0.1, 0.1, 0.1]);
        for _ in 0..600 {
            f.update(0.016, &sample(Gesture::Fist), 0.5, [1.0, 0.0, 0.0]);
        }
        let avg_r: f32 =
            f.colors().iter().map(|c| c[0]).sum::<f32>() / PARTICLE_COUNT as f32;
        let avg_g: f32 =
            f.colors().iter().map(|c| c[1]).sum::<f32>() / PARTICLE_COUNT as f32;
        assert!(avg_r > 0.8 && avg_g < 0.2);
    }

    #[test]
    fn explode_throws_the_cloud_outward_and_clears_the_shape() {
        let mut f = ParticleField::new(PINK);
        step(&mut f, Gesture::Fist, 0.016);
        f.explode();
        assert_eq!(f.current_shape(), None);
        let radii = f.target_radii();
        assert!(radii.iter().all(|r| (3.9..10.1).contains(r)));
        // The next gesture re-asserts a shape
        step(&mut f, Gesture::Move, 0.016);
        assert_eq!(f.current_shape(), Some(Shape::Heart));
    }

    #[test]
    fn rotation_advances_steadily() {
        let mut f = ParticleField::new(PINK);
        step(&mut f, Gesture::Fist, 0.5);
        assert_relative_eq!(f.rotation(), 0.03, epsilon = 1e-6);
    }

    #[test]
    fn pattern_picker_can_force_the_reserved_dna_shape() {
        let mut f = ParticleField::new(PINK);
        f.select_shape(Shape::Dna);
        assert_eq!(f.current_shape(), Some(Shape::Dna));
    }

    #[test]
    fn hsl_round_trip() {
        for color in [[1.0, 0.0, 0.0], [0.3, 0.6, 0.9], [0.5, 0.5, 0.5]] {
            let (h, s, l) = rgb_to_hsl(color);
            let back = hsl_to_rgb(h, s, l);
            for k in 0..3 {
                assert_relative_eq!(color[k], back[k], epsilon = 1e-4);
            }
        }
    }
}
