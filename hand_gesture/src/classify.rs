//! Landmark-frame gesture classifier.
//!
//! Works on already-normalized landmark data so it is identical for every
//! capture backend that can see real hands. The classifier itself keeps only
//! the previous palm position and a last-significant-motion timestamp; given
//! those, classification is a pure function of the current frame.

use std::time::Duration;

use crate::sample::{Gesture, GestureSample};

/// Idle timeout for camera-style sources.
pub const CAMERA_IDLE_MS: u64 = 2000;

/// Palm movement below this is noise and does not reset the idle clock.
const SIGNIFICANT_MOTION: f32 = 0.005;

/// Palm velocity above this classifies as `Move`.
const MOVE_VELOCITY: f32 = 0.05;

/// One finger: tip and second-joint heights in normalized image space
/// (y grows downward, so extended means `tip_y < pip_y`).
#[derive(Clone, Copy, Debug)]
pub struct FingerPose {
    pub tip_y: f32,
    pub pip_y: f32,
}

/// One visible hand: palm position, wrist depth, and the four non-thumb
/// fingers (index, middle, ring, pinky).
#[derive(Clone, Copy, Debug)]
pub struct HandPose {
    pub palm_x: f32,
    pub palm_y: f32,
    pub wrist_z: f32,
    pub fingers: [FingerPose; 4],
}

/// Everything a capture backend saw in one frame.
#[derive(Clone, Debug, Default)]
pub struct HandFrame {
    pub hands: Vec<HandPose>,
}

/// Count extended fingers; the thumb is deliberately excluded.
pub fn extended_fingers(hand: &HandPose) -> u8 {
    hand.fingers.iter().filter(|f| f.tip_y < f.pip_y).count() as u8
}

/// Remap a wrist z coordinate (≈ −0.3 near .. 0.1 far) into 0..1.
pub fn hand_depth(wrist_z: f32) -> f32 {
    ((wrist_z + 0.3) / 0.4).clamp(0.0, 1.0)
}

// ════════════════════════════════════════════════════════════════════════════
// Classifier
// ════════════════════════════════════════════════════════════════════════════

pub struct Classifier {
    prev_x: f32,
    prev_y: f32,
    last_motion: Duration,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    pub fn new() -> Self {
        Classifier {
            prev_x: 0.5,
            prev_y: 0.5,
            last_motion: Duration::ZERO,
        }
    }

    /// Classify one frame. `now` is monotonic sample time; rule order
    /// matters (fist is tested before the finger counts, velocity before the
    /// open-hand count).
    pub fn classify(&mut self, frame: &HandFrame, now: Duration) -> GestureSample {
        if frame.hands.is_empty() {
            let since = now.saturating_sub(self.last_motion);
            let gesture = if since.as_millis() as u64 > CAMERA_IDLE_MS {
                Gesture::Idle
            } else {
                Gesture::Move
            };
            return GestureSample {
                x: self.prev_x,
                y: self.prev_y,
                depth: 0.5,
                gesture,
                finger_count: 0,
                hand_count: 0,
                velocity: 0.0,
            };
        }

        if frame.hands.len() >= 2 {
            let hand = &frame.hands[0];
            self.last_motion = now;
            return GestureSample {
                x: hand.palm_x,
                y: hand.palm_y,
                depth: hand_depth(hand.wrist_z),
                gesture: Gesture::BothHands,
                finger_count: 10,
                hand_count: 2,
                velocity: 0.0,
            };
        }

        let hand = &frame.hands[0];
        let dx = hand.palm_x - self.prev_x;
        let dy = hand.palm_y - self.prev_y;
        let velocity = (dx * dx + dy * dy).sqrt();
        self.prev_x = hand.palm_x;
        self.prev_y = hand.palm_y;

        if velocity > SIGNIFICANT_MOTION {
            self.last_motion = now;
        }
        let since = now.saturating_sub(self.last_motion);

        let fingers = extended_fingers(hand);
        let gesture = if since.as_millis() as u64 > CAMERA_IDLE_MS {
            Gesture::Idle
        } else if fingers == 0 {
            Gesture::Fist
        } else if fingers == 1 {
            Gesture::OneFinger
        } else if fingers == 2 {
            Gesture::TwoFingers
        } else if velocity > MOVE_VELOCITY {
            Gesture::Move
        } else if fingers >= 4 {
            Gesture::OpenHand
        } else {
            Gesture::Move
        };

        GestureSample {
            x: hand.palm_x,
            y: hand.palm_y,
            depth: hand_depth(hand.wrist_z),
            gesture,
            finger_count: fingers,
            hand_count: 1,
            velocity,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn finger(extended: bool) -> FingerPose {
        if extended {
            FingerPose { tip_y: 0.3, pip_y: 0.5 }
        } else {
            FingerPose { tip_y: 0.6, pip_y: 0.5 }
        }
    }

    fn hand_at(x: f32, y: f32, extended: [bool; 4]) -> HandPose {
        HandPose {
            palm_x: x,
            palm_y: y,
            wrist_z: -0.1,
            fingers: [
                finger(extended[0]),
                finger(extended[1]),
                finger(extended[2]),
                finger(extended[3]),
            ],
        }
    }

    fn frame(hands: Vec<HandPose>) -> HandFrame {
        HandFrame { hands }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn fist_wins_over_velocity() {
        let mut c = Classifier::new();
        // Large palm jump, zero fingers: rule order says Fist, not Move.
        let s = c.classify(&frame(vec![hand_at(0.9, 0.9, [false; 4])]), ms(100));
        assert_eq!(s.gesture, Gesture::Fist);
        assert!(s.velocity > MOVE_VELOCITY);
    }

    #[test]
    fn finger_counts_map_to_gestures() {
        let mut c = Classifier::new();
        let s1 = c.classify(
            &frame(vec![hand_at(0.5, 0.5, [true, false, false, false])]),
            ms(100),
        );
        assert_eq!(s1.gesture, Gesture::OneFinger);
        let s2 = c.classify(
            &frame(vec![hand_at(0.5, 0.5, [true, true, false, false])]),
            ms(200),
        );
        assert_eq!(s2.gesture, Gesture::TwoFingers);
    }

    #[test]
    fn slow_open_hand_is_open_fast_is_move() {
        let mut c = Classifier::new();
        c.classify(&frame(vec![hand_at(0.5, 0.5, [true; 4])]), ms(100));
        // Stationary open hand
        let s = c.classify(&frame(vec![hand_at(0.5, 0.5, [true; 4])]), ms(200));
        assert_eq!(s.gesture, Gesture::OpenHand);
        // Fast open hand: velocity rule fires first
        let s = c.classify(&frame(vec![hand_at(0.9, 0.5, [true; 4])]), ms(300));
        assert_eq!(s.gesture, Gesture::Move);
    }

    #[test]
    fn three_fingers_fall_through_to_move() {
        let mut c = Classifier::new();
        let s = c.classify(
            &frame(vec![hand_at(0.5, 0.5, [true, true, true, false])]),
            ms(100),
        );
        assert_eq!(s.gesture, Gesture::Move);
    }

    #[test]
    fn two_hands_classify_immediately() {
        let mut c = Classifier::new();
        let s = c.classify(
            &frame(vec![hand_at(0.4, 0.5, [true; 4]), hand_at(0.6, 0.5, [true; 4])]),
            ms(100),
        );
        assert_eq!(s.gesture, Gesture::BothHands);
        assert_eq!(s.hand_count, 2);
        assert_eq!(s.finger_count, 10);
    }

    #[test]
    fn motion_gap_becomes_idle() {
        let mut c = Classifier::new();
        // A few moving samples...
        c.classify(&frame(vec![hand_at(0.2, 0.5, [true; 4])]), ms(0));
        c.classify(&frame(vec![hand_at(0.4, 0.5, [true; 4])]), ms(100));
        c.classify(&frame(vec![hand_at(0.6, 0.5, [true; 4])]), ms(200));
        // ...then the hands disappear and the idle window elapses.
        let s = c.classify(&frame(vec![]), ms(200 + CAMERA_IDLE_MS + 1));
        assert_eq!(s.gesture, Gesture::Idle);
        assert_eq!(s.hand_count, 0);
    }

    #[test]
    fn no_hands_before_timeout_is_move_holding_last_position() {
        let mut c = Classifier::new();
        c.classify(&frame(vec![hand_at(0.3, 0.7, [true; 4])]), ms(100));
        let s = c.classify(&frame(vec![]), ms(500));
        assert_eq!(s.gesture, Gesture::Move);
        assert_eq!((s.x, s.y), (0.3, 0.7));
    }

    #[test]
    fn stationary_hand_goes_idle_after_timeout() {
        let mut c = Classifier::new();
        c.classify(&frame(vec![hand_at(0.5, 0.5, [true; 4])]), ms(0));
        let s = c.classify(
            &frame(vec![hand_at(0.5, 0.5, [true; 4])]),
            ms(CAMERA_IDLE_MS + 1),
        );
        assert_eq!(s.gesture, Gesture::Idle);
    }

    #[test]
    fn depth_is_clamped() {
        assert_eq!(hand_depth(-1.0), 0.0);
        assert_eq!(hand_depth(1.0), 1.0);
        let mid = hand_depth(-0.1);
        assert!(mid > 0.0 && mid < 1.0);
    }

    #[test]
    fn classification_is_deterministic() {
        let seq = [
            frame(vec![hand_at(0.2, 0.2, [true, false, false, false])]),
            frame(vec![hand_at(0.8, 0.8, [true; 4])]),
            frame(vec![]),
        ];
        let mut a = Classifier::new();
        let mut b = Classifier::new();
        for (i, f) in seq.iter().enumerate() {
            let t = ms(i as u64 * 100);
            assert_eq!(a.classify(f, t), b.classify(f, t));
        }
    }
}
