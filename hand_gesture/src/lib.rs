//! # hand_gesture
//!
//! Continuous hand (or pointer) input distilled into one [`GestureSample`]
//! at a time. Consumers don't need to know whether samples came from real
//! hand-tracking hardware or from the mouse/keyboard simulator.
//!
//! ## Gesture classification
//!
//! | Priority | Condition | Gesture |
//! |---|---|---|
//! | 1 | no hands, >2 s since last motion | `Idle` |
//! | 2 | two hands visible | `BothHands` |
//! | 3 | 0 extended fingers | `Fist` |
//! | 4 | 1 / 2 extended fingers | `OneFinger` / `TwoFingers` |
//! | 5 | palm velocity > 0.05 | `Move` |
//! | 6 | ≥4 extended fingers | `OpenHand` |
//! | 7 | otherwise | `Move` |
//!
//! A finger counts as extended when its tip sits above its second joint.
//! Depth comes from the wrist's z coordinate, remapped into 0 (near) .. 1
//! (far).
//!
//! ## Sources
//!
//! * [`source::PointerSim`] (default) — mouse movement ⇒ `Move`/`OpenHand`,
//!   button held ⇒ `Fist`, hot-keys `1`/`2`/`H`/`I` force
//!   `OneFinger`/`TwoFingers`/`BothHands`/`Idle`. Idle timeout **3000 ms**.
//! * `source::LeapSource` (feature `leap`) — polls hand frames from LeapC at
//!   ~10 Hz and runs the landmark classifier. Idle timeout **2000 ms**.
//!
//! The two timeouts intentionally differ; both are named constants.
//!
//! Samples land in a [`slot::SampleSlot`] — a single-slot, latest-value-wins
//! mailbox. The render tick reads the newest sample and never drains a
//! backlog, so it can never block on capture.

pub mod classify;
pub mod sample;
pub mod slot;
pub mod source;

pub use classify::{Classifier, FingerPose, HandFrame, HandPose, CAMERA_IDLE_MS};
pub use sample::{Gesture, GestureSample};
pub use slot::SampleSlot;
pub use source::{
    spawn_sample_source, PointerSim, SampleSource, SimInput, SimKey, SourceHandle,
    POINTER_IDLE_MS,
};
