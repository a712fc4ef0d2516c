//! Single-slot sample mailbox.
//!
//! Capture runs at its own cadence; the render tick runs at another. The
//! slot keeps exactly the newest sample — latest value wins, no queue, no
//! backlog — so the consumer reads without ever waiting on capture.

use std::sync::{Arc, Mutex};

use crate::sample::GestureSample;

#[derive(Clone, Default)]
pub struct SampleSlot(Arc<Mutex<GestureSample>>);

impl SampleSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the slot with a fresh sample.
    pub fn publish(&self, sample: GestureSample) {
        *self.0.lock().unwrap() = sample;
    }

    /// Copy out the newest sample.
    pub fn latest(&self) -> GestureSample {
        *self.0.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::Gesture;

    #[test]
    fn latest_value_wins() {
        let slot = SampleSlot::new();
        assert_eq!(slot.latest().gesture, Gesture::Idle);

        for (i, g) in [Gesture::Move, Gesture::Fist, Gesture::OpenHand]
            .into_iter()
            .enumerate()
        {
            slot.publish(GestureSample {
                x: i as f32 * 0.1,
                gesture: g,
                ..GestureSample::default()
            });
        }
        let s = slot.latest();
        assert_eq!(s.gesture, Gesture::OpenHand);
        assert_eq!(s.x, 0.2);
    }

    #[test]
    fn clones_share_the_slot() {
        let a = SampleSlot::new();
        let b = a.clone();
        b.publish(GestureSample {
            gesture: Gesture::Fist,
            ..GestureSample::default()
        });
        assert_eq!(a.latest().gesture, Gesture::Fist);
    }
}
