// Spy collaborators shared by the host-side tests.

#![allow(dead_code)]

use glam::Vec3;
use starlit_journey::core::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub enum AudioCall {
    Crossfade {
        from: Option<TrackId>,
        to: TrackId,
        duration: Duration,
    },
    OneShot {
        track: TrackId,
        origin: Vec3,
        delay: Duration,
    },
}

#[derive(Default)]
pub struct RecordingAudio {
    calls: RefCell<Vec<AudioCall>>,
    stopped: Rc<RefCell<Vec<TrackId>>>,
}

impl RecordingAudio {
    pub fn calls(&self) -> Vec<AudioCall> {
        self.calls.borrow().clone()
    }

    /// One-shots whose stop handle was called.
    pub fn stopped(&self) -> Vec<TrackId> {
        self.stopped.borrow().clone()
    }

    pub fn crossfades(&self) -> Vec<AudioCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, AudioCall::Crossfade { .. }))
            .collect()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl AudioDirector for RecordingAudio {
    fn crossfade(&self, from: Option<TrackId>, to: TrackId, duration: Duration) {
        self.calls
            .borrow_mut()
            .push(AudioCall::Crossfade { from, to, duration });
    }

    fn play_one_shot(&self, track: TrackId, origin: Vec3, delay: Duration) -> Option<StopOneShot> {
        self.calls.borrow_mut().push(AudioCall::OneShot {
            track,
            origin,
            delay,
        });
        let stopped = self.stopped.clone();
        Some(Box::new(move || stopped.borrow_mut().push(track)))
    }
}

/// Disposable that counts how many times it was released.
pub struct CountingHandle(pub Rc<Cell<u32>>);

impl Disposable for CountingHandle {
    fn dispose(self: Box<Self>) {
        self.0.set(self.0.get() + 1);
    }
}

pub fn counter() -> Rc<Cell<u32>> {
    Rc::new(Cell::new(0))
}

/// Listener target that records what is attached right now.
#[derive(Clone, Default)]
pub struct FakeTarget {
    pub attached: Rc<RefCell<Vec<(String, u32)>>>,
    pub detach_calls: Rc<Cell<u32>>,
}

impl ListenerTarget for FakeTarget {
    type Handler = u32;

    fn attach(&self, event: &str, handler: &u32) {
        self.attached.borrow_mut().push((event.to_string(), *handler));
    }

    fn detach(&self, event: &str, handler: &u32) {
        self.detach_calls.set(self.detach_calls.get() + 1);
        self.attached
            .borrow_mut()
            .retain(|(e, h)| !(e == event && h == handler));
    }
}

pub struct Harness {
    pub seq: Sequencer,
    pub audio: Rc<RecordingAudio>,
    pub timers: Rc<ManualTimers>,
}

pub fn harness_with(registry: SceneRegistry, timing: TransitionTiming) -> Harness {
    let audio = Rc::new(RecordingAudio::default());
    let timers = Rc::new(ManualTimers::new());
    let seq = Sequencer::new(
        registry,
        audio.clone() as Rc<dyn AudioDirector>,
        timers.clone() as Rc<dyn Timers>,
        timing,
    )
    .expect("non-empty registry");
    Harness { seq, audio, timers }
}

pub fn harness(timing: TransitionTiming) -> Harness {
    harness_with(SceneRegistry::journey(), timing)
}

impl Harness {
    /// Let any pending commit fire.
    pub fn settle(&self) {
        self.timers.run_all();
    }
}
