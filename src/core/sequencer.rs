//! The scene state machine.
//!
//! A [`Sequencer`] walks the journey one scene at a time. Every change drains
//! the outgoing scene's [`CleanupRegistry`], installs a fresh one for the
//! incoming scene, starts the audio crossfade and, after the commit delay,
//! makes the incoming scene current. Only one change is ever in flight; extra
//! requests during that window are dropped, not queued.
//!
//! The sequencer is a cheap `Rc` handle. Clone it into whatever UI callbacks
//! need to read state or request transitions.

use crate::core::audio::AudioDirector;
use crate::core::cleanup::CleanupRegistry;
use crate::core::constants::{TransitionTiming, WHISPER_ORIGIN};
use crate::core::error::JourneyError;
use crate::core::scenes::{SceneDescriptor, SceneId, SceneRegistry};
use crate::core::timers::Timers;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

pub type SharedCleanup = Rc<RefCell<CleanupRegistry>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle(SceneId),
    Transitioning { from: SceneId, to: SceneId },
}

/// Result of a transition request that was not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Started { from: SceneId, to: SceneId },
    /// Target was already the current scene.
    Unchanged,
    /// `next` at the last scene or `previous` at the first.
    EndOfJourney,
}

/// Read-only view handed to subscribers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneSnapshot {
    pub current: SceneId,
    pub previous: Option<SceneId>,
    pub transitioning: bool,
    pub progress: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Rc<dyn Fn(&SceneSnapshot)>;

struct State {
    current: SceneId,
    previous: Option<SceneId>,
    in_flight: Option<(SceneId, SceneId)>,
    progress: f32,
    cleanup: SharedCleanup,
    started_at: Option<Instant>,
}

struct Inner {
    registry: SceneRegistry,
    timing: TransitionTiming,
    audio: Rc<dyn AudioDirector>,
    timers: Rc<dyn Timers>,
    state: RefCell<State>,
    subscribers: RefCell<Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: Cell<u64>,
    // Snapshots waiting for delivery, oldest first.
    outbox: RefCell<VecDeque<SceneSnapshot>>,
    delivering: Cell<bool>,
    audio_started: Cell<bool>,
}

#[derive(Clone)]
pub struct Sequencer {
    inner: Rc<Inner>,
}

impl Sequencer {
    /// Sequencer positioned at the first scene of `registry`.
    pub fn new(
        registry: SceneRegistry,
        audio: Rc<dyn AudioDirector>,
        timers: Rc<dyn Timers>,
        timing: TransitionTiming,
    ) -> Result<Self, JourneyError> {
        let first = registry.first().ok_or(JourneyError::EmptyJourney)?.id;
        let progress = registry.progress_of(first)?;
        let cleanup = Rc::new(RefCell::new(CleanupRegistry::for_scene(
            first,
            timers.clone(),
        )));
        log::info!(
            "[sequencer] ready at `{}` ({} scenes, commit {:?}, crossfade {:?})",
            first,
            registry.len(),
            timing.commit_delay,
            timing.crossfade
        );
        Ok(Self {
            inner: Rc::new(Inner {
                registry,
                timing,
                audio,
                timers,
                state: RefCell::new(State {
                    current: first,
                    previous: None,
                    in_flight: None,
                    progress,
                    cleanup,
                    started_at: None,
                }),
                subscribers: RefCell::new(Vec::new()),
                next_subscription: Cell::new(0),
                outbox: RefCell::new(VecDeque::new()),
                delivering: Cell::new(false),
                audio_started: Cell::new(false),
            }),
        })
    }

    /// Sequencer over the full journey.
    pub fn journey(
        audio: Rc<dyn AudioDirector>,
        timers: Rc<dyn Timers>,
        timing: TransitionTiming,
    ) -> Result<Self, JourneyError> {
        Self::new(SceneRegistry::journey(), audio, timers, timing)
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.inner.registry
    }

    pub fn timing(&self) -> TransitionTiming {
        self.inner.timing
    }

    pub fn current(&self) -> SceneId {
        self.inner.state.borrow().current
    }

    pub fn previous_scene(&self) -> Option<SceneId> {
        self.inner.state.borrow().previous
    }

    pub fn is_transitioning(&self) -> bool {
        self.inner.state.borrow().in_flight.is_some()
    }

    pub fn progress(&self) -> f32 {
        self.inner.state.borrow().progress
    }

    pub fn phase(&self) -> Phase {
        let state = self.inner.state.borrow();
        match state.in_flight {
            Some((from, to)) => Phase::Transitioning { from, to },
            None => Phase::Idle(state.current),
        }
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        snapshot_of(&self.inner.state.borrow())
    }

    /// Descriptor of the current scene.
    pub fn descriptor(&self) -> Result<&SceneDescriptor, JourneyError> {
        self.inner.registry.get(self.current())
    }

    /// Registry that mounted scene components register their resources into.
    ///
    /// Replaced on every transition; fetch it when mounting, do not cache it
    /// across scenes.
    pub fn active_cleanup(&self) -> SharedCleanup {
        self.inner.state.borrow().cleanup.clone()
    }

    /// Call `f` on every transition start and commit.
    pub fn subscribe(&self, f: impl Fn(&SceneSnapshot) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_subscription.get());
        self.inner.next_subscription.set(id.0 + 1);
        let f: Subscriber = Rc::new(f);
        self.inner.subscribers.borrow_mut().push((id, f));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.inner.subscribers.borrow_mut();
        let before = subs.len();
        subs.retain(|(sid, _)| *sid != id);
        subs.len() != before
    }

    /// Start the current scene's ambient track (and whisper) from silence.
    ///
    /// Browsers only allow audio after a user gesture, so the shell calls this
    /// from its first click. Later calls do nothing.
    pub fn start(&self) {
        if self.inner.audio_started.replace(true) {
            log::debug!("[sequencer] audio already started");
            return;
        }
        let current = self.current();
        match self.inner.registry.get(current) {
            Ok(desc) => {
                log::info!("[sequencer] starting audio for `{}`", current);
                self.inner
                    .audio
                    .crossfade(None, desc.ambient_track, self.inner.timing.crossfade);
                self.schedule_whisper(desc);
            }
            Err(e) => log::warn!("[sequencer] cannot start audio: {}", e),
        }
    }

    /// Move to `target`.
    ///
    /// Requests during an in-flight transition are rejected, unknown scenes
    /// leave everything untouched, and the current scene is a no-op. All three
    /// are logged here; UI callers may ignore the result.
    pub fn set_scene(&self, target: SceneId) -> Result<Transition, JourneyError> {
        let from = {
            let state = self.inner.state.borrow();
            if let Some((from, to)) = state.in_flight {
                log::info!(
                    "[sequencer] ignoring `{}`: already moving `{}` -> `{}`",
                    target,
                    from,
                    to
                );
                return Err(JourneyError::TransitionRejected {
                    requested: target,
                    from,
                    to,
                });
            }
            if let Err(e) = self.inner.registry.get(target) {
                log::warn!("[sequencer] {}", e);
                return Err(e);
            }
            if target == state.current {
                log::debug!("[sequencer] already at `{}`", target);
                return Ok(Transition::Unchanged);
            }
            state.current
        };

        let (outgoing, incoming) = match (
            self.inner.registry.get(from),
            self.inner.registry.get(target),
        ) {
            (Ok(o), Ok(i)) => (o, i),
            (Err(e), _) | (_, Err(e)) => return Err(e),
        };
        let progress = self.inner.registry.progress_of(target)?;

        let outgoing_cleanup = {
            let mut state = self.inner.state.borrow_mut();
            state.previous = Some(from);
            state.in_flight = Some((from, target));
            state.started_at = Some(Instant::now());
            state.cleanup.clone()
        };
        log::info!("[sequencer] `{}` -> `{}`", from, target);

        // Outgoing resources are gone before the incoming scene can allocate.
        match outgoing_cleanup.try_borrow_mut() {
            Ok(mut reg) => {
                reg.cleanup();
            }
            Err(_) => log::error!(
                "[sequencer] cleanup for `{}` is borrowed; it will drain when released",
                from
            ),
        }
        drop(outgoing_cleanup);

        let fresh = Rc::new(RefCell::new(CleanupRegistry::for_scene(
            target,
            self.inner.timers.clone(),
        )));
        {
            let mut state = self.inner.state.borrow_mut();
            state.cleanup = fresh;
            state.progress = progress;
        }

        self.inner.audio.crossfade(
            Some(outgoing.ambient_track),
            incoming.ambient_track,
            self.inner.timing.crossfade,
        );
        self.inner.audio_started.set(true);
        self.schedule_whisper(incoming);
        notify(&self.inner);

        let weak: Weak<Inner> = Rc::downgrade(&self.inner);
        self.inner.timers.set_timeout(
            self.inner.timing.commit_delay,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    commit(&inner, target);
                }
            }),
        );

        Ok(Transition::Started { from, to: target })
    }

    pub fn next(&self) -> Result<Transition, JourneyError> {
        let current = self.current();
        match self.inner.registry.next(current)? {
            Some(desc) => self.set_scene(desc.id),
            None => {
                log::info!("[sequencer] `{}` is the last scene", current);
                Ok(Transition::EndOfJourney)
            }
        }
    }

    pub fn previous(&self) -> Result<Transition, JourneyError> {
        let current = self.current();
        match self.inner.registry.previous(current)? {
            Some(desc) => self.set_scene(desc.id),
            None => {
                log::info!("[sequencer] `{}` is the first scene", current);
                Ok(Transition::EndOfJourney)
            }
        }
    }

    /// Queue the scene's whisper; leaving the scene early silences it.
    fn schedule_whisper(&self, desc: &SceneDescriptor) {
        let Some(whisper) = desc.whisper_track else {
            return;
        };
        let offset = self.inner.timing.whisper_offset;
        let Some(stop) = self.inner.audio.play_one_shot(whisper, WHISPER_ORIGIN, offset) else {
            return;
        };
        let cleanup = self.active_cleanup();
        match cleanup.try_borrow_mut() {
            Ok(mut reg) => reg.register_custom_cleanup(move || {
                stop();
                Ok(())
            }),
            Err(_) => log::warn!(
                "[sequencer] cleanup for `{}` is borrowed; whisper {} cannot be stopped early",
                desc.id,
                whisper
            ),
        };
    }
}

fn snapshot_of(state: &State) -> SceneSnapshot {
    SceneSnapshot {
        current: state.current,
        previous: state.previous,
        transitioning: state.in_flight.is_some(),
        progress: state.progress,
    }
}

fn commit(inner: &Inner, to: SceneId) {
    {
        let mut state = inner.state.borrow_mut();
        state.current = to;
        state.in_flight = None;
        let elapsed = state.started_at.take().map(|t| t.elapsed());
        log::info!("[sequencer] now at `{}` after {:?}", to, elapsed.unwrap_or_default());
    }
    notify(inner);
}

/// Deliver the current state to every subscriber.
///
/// A subscriber that requests a transition triggers a nested notify; that
/// snapshot is queued and delivered once the running pass is finished, so
/// every subscriber sees states in the order they happened.
fn notify(inner: &Inner) {
    let snapshot = snapshot_of(&inner.state.borrow());
    inner.outbox.borrow_mut().push_back(snapshot);
    if inner.delivering.replace(true) {
        return;
    }
    loop {
        let next = inner.outbox.borrow_mut().pop_front();
        let Some(snapshot) = next else {
            break;
        };
        // Subscribers may subscribe or request transitions; iterate over a copy.
        let subs: Vec<Subscriber> = inner
            .subscribers
            .borrow()
            .iter()
            .map(|(_, f)| f.clone())
            .collect();
        for f in subs {
            f(&snapshot);
        }
    }
    inner.delivering.set(false);
}
