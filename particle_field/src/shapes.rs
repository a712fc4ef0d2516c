//! The shape catalog: deterministic-with-jitter generators mapping a
//! particle index to a target coordinate.

use rand::Rng;

use std::f32::consts::PI;

/// A nameable pattern the cloud can converge on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Heart,
    Rose,
    Earth,
    Galaxy,
    Butterfly,
    Dna,
    Message,
}

impl Shape {
    pub const ALL: [Shape; 7] = [
        Shape::Heart,
        Shape::Rose,
        Shape::Earth,
        Shape::Galaxy,
        Shape::Butterfly,
        Shape::Dna,
        Shape::Message,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Shape::Heart => "heart",
            Shape::Rose => "rose",
            Shape::Earth => "earth",
            Shape::Galaxy => "galaxy",
            Shape::Butterfly => "butterfly",
            Shape::Dna => "dna",
            Shape::Message => "message",
        }
    }
}

/// Classic parametric heart, lifted slightly and squashed into view.
pub fn heart<R: Rng>(i: usize, n: usize, rng: &mut R) -> [f32; 3] {
    let t = (i as f32 / n as f32) * PI * 2.0;
    let x = 16.0 * t.sin().powi(3);
    let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
    let z = (rng.random::<f32>() - 0.5) * 2.0;
    [x * 0.12, y * 0.12 + 0.5, z * 0.3]
}

/// Rose curve on a stem: the first 12% of particles form the stem, the rest
/// trace `r = cos(0.8 t) · 1.8 + 1.2` over six turns.
pub fn rose<R: Rng>(i: usize, n: usize, rng: &mut R) -> [f32; 3] {
    let stem = n as f32 * 0.12;
    if (i as f32) < stem {
        return [
            (rng.random::<f32>() - 0.5) * 0.15,
            -1.5 - (i as f32 / stem) * 2.5,
            (rng.random::<f32>() - 0.5) * 0.15,
        ];
    }
    let t = ((i as f32 - stem) / (n as f32 * 0.88)) * PI * 6.0;
    let r = (t * 0.8).cos() * 1.8 + 1.2;
    [
        r * t.cos() * 0.5,
        r * t.sin() * 0.5,
        (rng.random::<f32>() - 0.5) * 0.4,
    ]
}

/// Uniform sampling on a slightly fuzzy sphere.
pub fn earth<R: Rng>(rng: &mut R) -> [f32; 3] {
    let theta = rng.random::<f32>() * PI * 2.0;
    let phi = (2.0 * rng.random::<f32>() - 1.0).acos();
    let r = 2.2 + (rng.random::<f32>() - 0.5) * 0.2;
    [
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    ]
}

/// Three spiral arms with radial and angular jitter, flattened in y.
pub fn galaxy<R: Rng>(rng: &mut R) -> [f32; 3] {
    let arm = (rng.random::<f32>() * 3.0).floor();
    let arm_angle = (arm / 3.0) * PI * 2.0;
    let dist = rng.random::<f32>().sqrt() * 4.0;
    let angle = arm_angle + dist * 0.8 + (rng.random::<f32>() - 0.5) * 0.4;
    [
        angle.cos() * dist,
        (rng.random::<f32>() - 0.5) * 0.3,
        angle.sin() * dist,
    ]
}

/// The butterfly curve, a quartic polar classic.
pub fn butterfly<R: Rng>(i: usize, n: usize, rng: &mut R) -> [f32; 3] {
    let t = (i as f32 / n as f32) * PI * 12.0;
    let r = t.cos().exp() - 2.0 * (4.0 * t).cos() + (t / 12.0).sin().powi(5);
    [
        t.sin() * r * 0.8,
        t.cos() * r * 0.8,
        (rng.random::<f32>() - 0.5) * 0.3,
    ]
}

/// Two counter-phased strands stacked along y.
pub fn dna(i: usize, n: usize) -> [f32; 3] {
    let t = (i as f32 / n as f32) * PI * 8.0;
    let y = (i as f32 / n as f32) * 6.0 - 3.0;
    let strand = if i % 2 == 0 { 1.0 } else { -1.0 };
    [t.cos() * strand * 1.2, y, t.sin() * strand * 1.2]
}

/// A point from the rasterized message cloud, cycling through the pixel
/// list with a little jitter so overlapping particles don't stack exactly.
pub fn message<R: Rng>(i: usize, points: &[(f32, f32)], rng: &mut R) -> [f32; 3] {
    if points.is_empty() {
        return [0.0, 0.0, 0.0];
    }
    let (x, y) = points[i % points.len()];
    [
        x + (rng.random::<f32>() - 0.5) * 0.02,
        y + (rng.random::<f32>() - 0.5) * 0.02,
        (rng.random::<f32>() - 0.5) * 0.1,
    ]
}

/// Uniform direction scaled to a radius in `min_r .. min_r + spread` — the
/// scatter shell used between shapes and for the explode burst.
pub fn shell<R: Rng>(rng: &mut R, min_r: f32, spread: f32) -> [f32; 3] {
    let a1 = rng.random::<f32>() * PI * 2.0;
    let a2 = rng.random::<f32>() * PI * 2.0;
    let d = min_r + rng.random::<f32>() * spread;
    [a1.sin() * a2.cos() * d, a1.sin() * a2.sin() * d, a1.cos() * d]
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn len3(p: [f32; 3]) -> f32 {
        (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt()
    }

    #[test]
    fn rose_stem_sits_below_the_bloom() {
        let mut rng = rand::rng();
        let n = 1000;
        // Stem particles (first 12%) all hang below y = -1.5
        for i in 0..(n as f32 * 0.12) as usize {
            let p = rose(i, n, &mut rng);
            assert!(p[1] <= -1.5, "stem particle {i} at y={}", p[1]);
            assert!(p[0].abs() <= 0.075 + f32::EPSILON);
        }
        // Bloom particles stay near the xy plane
        let p = rose(n - 1, n, &mut rng);
        assert!(p[2].abs() <= 0.2 + f32::EPSILON);
    }

    #[test]
    fn earth_radius_is_bounded() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let r = len3(earth(&mut rng));
            assert!((2.1..=2.3).contains(&r), "r = {r}");
        }
    }

    #[test]
    fn galaxy_is_flat_and_bounded() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let p = galaxy(&mut rng);
            assert!(p[1].abs() <= 0.15 + f32::EPSILON);
            let planar = (p[0] * p[0] + p[2] * p[2]).sqrt();
            assert!(planar <= 4.0 + f32::EPSILON);
        }
    }

    #[test]
    fn shell_radius_range() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let r = len3(shell(&mut rng, 5.0, 8.0));
            assert!((5.0..=13.0 + 1e-3).contains(&r), "r = {r}");
        }
    }

    #[test]
    fn dna_has_two_strands_spanning_y() {
        let n = 500;
        let top = dna(n - 1, n);
        let bottom = dna(0, n);
        assert!(bottom[1] < -2.9 && top[1] > 2.9);
        // Adjacent particles alternate strands
        let a = dna(10, n);
        let b = dna(11, n);
        assert!(a[0].signum() != b[0].signum() || a[2].signum() != b[2].signum());
    }

    #[test]
    fn message_cycles_and_jitters_mildly() {
        let mut rng = rand::rng();
        let points = vec![(1.0, 2.0), (-1.0, -2.0)];
        let p = message(5, &points, &mut rng);
        assert!((p[0] - (-1.0)).abs() < 0.02);
        assert!((p[1] - (-2.0)).abs() < 0.02);
        // Empty point list fails closed to the origin
        assert_eq!(message(3, &[], &mut rng), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn heart_is_heart_sized() {
        let mut rng = rand::rng();
        let n = 100;
        for i in 0..n {
            let p = heart(i, n, &mut rng);
            assert!(p[0].abs() <= 2.0);
            assert!(p[1].abs() <= 3.0);
        }
    }
}
