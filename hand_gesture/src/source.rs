//! Sample capture sources — real hand tracking and the pointer simulator.
//!
//! Both sides of the fence implement [`SampleSource`] and publish into a
//! [`SampleSlot`]; consumers never learn which one is running. Capture stops
//! when the paired [`SourceHandle`] is dropped or explicitly stopped, so a
//! page unmount releases the device deterministically.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::sample::{Gesture, GestureSample};
use crate::slot::SampleSlot;

/// Idle timeout for the pointer fallback. Deliberately longer than the
/// camera classifier's [`CAMERA_IDLE_MS`](crate::classify::CAMERA_IDLE_MS).
pub const POINTER_IDLE_MS: u64 = 3000;

/// Pointer velocity above this reads as deliberate movement.
const SIM_MOVE_VELOCITY: f32 = 0.02;

// ════════════════════════════════════════════════════════════════════════════
// SampleSource trait + spawn helper
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can feed a [`SampleSlot`] from its own thread.
pub trait SampleSource: Send + 'static {
    fn run(self: Box<Self>, slot: SampleSlot, active: Arc<AtomicBool>);
}

/// Keeps a capture thread alive; stopping (or dropping) the handle asks the
/// thread to wind down.
pub struct SourceHandle {
    active: Arc<AtomicBool>,
}

impl SourceHandle {
    pub fn stop(&self) {
        self.active.store(false, Ordering::Relaxed);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }
}

impl Drop for SourceHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Spawn a capture source on its own thread; returns the slot it publishes
/// into and the handle that stops it.
pub fn spawn_sample_source<S: SampleSource>(source: S) -> (SampleSlot, SourceHandle) {
    let slot = SampleSlot::new();
    let active = Arc::new(AtomicBool::new(true));
    let thread_slot = slot.clone();
    let thread_active = Arc::clone(&active);
    thread::spawn(move || Box::new(source).run(thread_slot, thread_active));
    (slot, SourceHandle { active })
}

// ════════════════════════════════════════════════════════════════════════════
// PointerSim — mouse/keyboard fallback (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the window, forwarded to the simulator.
#[derive(Clone, Copy, Debug)]
pub enum SimInput {
    PointerMove { x: f32, y: f32 },
    ButtonDown,
    ButtonUp,
    Key(SimKey),
}

/// Hot-keys that force a gesture directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimKey {
    OneFinger,
    TwoFingers,
    BothHands,
    Idle,
}

/// Pointer-driven sample source. The window event loop sends [`SimInput`]s
/// here; this translator produces the identical classification contract the
/// camera path does: movement ⇒ `Move`/`OpenHand`, button held ⇒ `Fist`,
/// hot-keys force their gesture, and [`POINTER_IDLE_MS`] of stillness ⇒
/// `Idle`.
pub struct PointerSim {
    pub rx: Receiver<SimInput>,
}

/// Gesture for a pointer update while tracking the cursor.
fn pointer_gesture(button_down: bool, velocity: f32) -> Gesture {
    if button_down {
        Gesture::Fist
    } else if velocity > SIM_MOVE_VELOCITY {
        Gesture::Move
    } else {
        Gesture::OpenHand
    }
}

/// Sample for a forced hot-key gesture at the last pointer position.
fn key_sample(key: SimKey, x: f32, y: f32) -> GestureSample {
    let (gesture, finger_count, hand_count) = match key {
        SimKey::OneFinger => (Gesture::OneFinger, 1, 1),
        SimKey::TwoFingers => (Gesture::TwoFingers, 2, 1),
        SimKey::BothHands => (Gesture::BothHands, 10, 2),
        SimKey::Idle => (Gesture::Idle, 0, 0),
    };
    GestureSample {
        x,
        y,
        depth: 0.5,
        gesture,
        finger_count,
        hand_count,
        velocity: 0.0,
    }
}

impl SampleSource for PointerSim {
    fn run(self: Box<Self>, slot: SampleSlot, active: Arc<AtomicBool>) {
        let mut prev = (0.5_f32, 0.5_f32);
        let mut button_down = false;
        // Armed while we still owe an idle sample for the current stillness.
        let mut idle_deadline = Some(Instant::now() + Duration::from_millis(POINTER_IDLE_MS));

        while active.load(Ordering::Relaxed) {
            match self.rx.recv_timeout(Duration::from_millis(100)) {
                Ok(SimInput::PointerMove { x, y }) => {
                    let dx = x - prev.0;
                    let dy = y - prev.1;
                    let velocity = (dx * dx + dy * dy).sqrt();
                    prev = (x, y);
                    idle_deadline =
                        Some(Instant::now() + Duration::from_millis(POINTER_IDLE_MS));

                    slot.publish(GestureSample {
                        x,
                        y,
                        depth: 0.5,
                        gesture: pointer_gesture(button_down, velocity),
                        finger_count: if button_down { 0 } else { 5 },
                        hand_count: 1,
                        velocity,
                    });
                }
                Ok(SimInput::ButtonDown) => {
                    button_down = true;
                    slot.publish(GestureSample {
                        x: prev.0,
                        y: prev.1,
                        depth: 0.5,
                        gesture: Gesture::Fist,
                        finger_count: 0,
                        hand_count: 1,
                        velocity: 0.0,
                    });
                }
                Ok(SimInput::ButtonUp) => {
                    button_down = false;
                }
                Ok(SimInput::Key(key)) => {
                    slot.publish(key_sample(key, prev.0, prev.1));
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return,
            }

            if let Some(deadline) = idle_deadline {
                if Instant::now() >= deadline {
                    // Fire once, then stay quiet until the pointer moves again.
                    idle_deadline = None;
                    slot.publish(key_sample(SimKey::Idle, prev.0, prev.1));
                }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapSource — real hand capture (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Hand capture backed by a LeapC connection, polled at ~10 Hz and run
/// through the shared [`Classifier`](crate::classify::Classifier).
///
/// Capability loss is never fatal: if the device cannot be opened, the
/// carried `fallback` pointer simulator takes over the slot, so consumers
/// always see a valid sample stream.
#[cfg(feature = "leap")]
pub struct LeapSource {
    pub fallback: Option<PointerSim>,
}

#[cfg(feature = "leap")]
impl SampleSource for LeapSource {
    fn run(mut self: Box<Self>, slot: SampleSlot, active: Arc<AtomicBool>) {
        use crate::classify::{Classifier, FingerPose, HandFrame, HandPose};
        use leaprs::*;

        // Throttle publishing to bound the consumer's cost.
        const SAMPLE_INTERVAL: Duration = Duration::from_millis(100);

        fn degrade(fallback: Option<PointerSim>, slot: SampleSlot, active: Arc<AtomicBool>) {
            if let Some(sim) = fallback {
                log::warn!("hand capture unavailable — pointer simulation takes over");
                Box::new(sim).run(slot, active);
            }
        }

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("LeapC connection failed: {e:?}");
                return degrade(self.fallback.take(), slot, active);
            }
        };
        if let Err(e) = connection.open() {
            log::warn!("LeapC device open failed: {e:?}");
            return degrade(self.fallback.take(), slot, active);
        }

        // Leap interaction volume in mm, mapped into normalized image space
        // (y flipped: leap y grows up, image y grows down).
        fn norm_x(mm: f32) -> f32 {
            (mm / 400.0 + 0.5).clamp(0.0, 1.0)
        }
        fn norm_y(mm: f32) -> f32 {
            (1.0 - (mm - 100.0) / 300.0).clamp(0.0, 1.0)
        }

        let started = Instant::now();
        let mut classifier = Classifier::new();
        let mut last_sample = Instant::now() - SAMPLE_INTERVAL;

        while active.load(Ordering::Relaxed) {
            let msg = match connection.poll(100) {
                Ok(m) => m,
                Err(_) => continue,
            };

            if let Event::Tracking(tracking) = msg.event() {
                if last_sample.elapsed() < SAMPLE_INTERVAL {
                    continue;
                }
                last_sample = Instant::now();

                let hands: Vec<HandPose> = tracking
                    .hands()
                    .take(2)
                    .map(|hand| {
                        let palm = hand.palm().position();
                        let mut fingers = [FingerPose { tip_y: 0.0, pip_y: 0.0 }; 4];
                        // Skip the thumb; the classifier counts index..pinky.
                        for (pose, digit) in fingers.iter_mut().zip(hand.digits().skip(1)) {
                            let tip = digit.distal().next_joint();
                            let pip = digit.proximal().next_joint();
                            *pose = FingerPose {
                                tip_y: norm_y(tip.y),
                                pip_y: norm_y(pip.y),
                            };
                        }
                        HandPose {
                            palm_x: norm_x(palm.x),
                            palm_y: norm_y(palm.y),
                            wrist_z: palm.z / 500.0,
                            fingers,
                        }
                    })
                    .collect();

                let frame = HandFrame { hands };
                slot.publish(classifier.classify(&frame, started.elapsed()));
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn pointer_gesture_table() {
        assert_eq!(pointer_gesture(true, 0.5), Gesture::Fist);
        assert_eq!(pointer_gesture(false, 0.5), Gesture::Move);
        assert_eq!(pointer_gesture(false, 0.0), Gesture::OpenHand);
        // Button wins over velocity
        assert_eq!(pointer_gesture(true, 0.0), Gesture::Fist);
    }

    #[test]
    fn key_samples_carry_their_gesture() {
        let s = key_sample(SimKey::BothHands, 0.3, 0.4);
        assert_eq!(s.gesture, Gesture::BothHands);
        assert_eq!((s.hand_count, s.finger_count), (2, 10));
        assert_eq!((s.x, s.y), (0.3, 0.4));

        let s = key_sample(SimKey::Idle, 0.5, 0.5);
        assert_eq!(s.gesture, Gesture::Idle);
        assert_eq!(s.hand_count, 0);
    }

    #[test]
    fn pointer_sim_publishes_moves_into_the_slot() {
        let (tx, rx) = mpsc::channel();
        let (slot, handle) = spawn_sample_source(PointerSim { rx });

        tx.send(SimInput::PointerMove { x: 0.8, y: 0.2 }).unwrap();
        // Give the capture thread a moment to drain.
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            let s = slot.latest();
            if s.x == 0.8 {
                assert_eq!(s.gesture, Gesture::Move);
                break;
            }
            assert!(Instant::now() < deadline, "sample never arrived");
            thread::sleep(Duration::from_millis(5));
        }

        handle.stop();
        assert!(!handle.is_active());
    }

    #[test]
    fn button_down_reads_as_fist() {
        let (tx, rx) = mpsc::channel();
        let (slot, _handle) = spawn_sample_source(PointerSim { rx });

        tx.send(SimInput::ButtonDown).unwrap();
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            if slot.latest().gesture == Gesture::Fist {
                break;
            }
            assert!(Instant::now() < deadline, "fist never arrived");
            thread::sleep(Duration::from_millis(5));
        }
    }
}
