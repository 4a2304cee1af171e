//! Per-scene bag of resources released together when the scene is left.
//!
//! A registry is populated while its scene is mounted and drained exactly once
//! by the sequencer. After the drain nothing can be added to it: late
//! registrations are released on the spot instead of being kept.

use crate::core::scenes::SceneId;
use crate::core::timers::{FrameHandle, TimerHandle, Timers};
use smallvec::SmallVec;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

/// A resource that must be released explicitly (GPU buffers, textures, ...).
///
/// `dispose` consumes the handle, so each handle is released at most once.
pub trait Disposable {
    fn dispose(self: Box<Self>);
}

/// Something listeners can be attached to and detached from.
pub trait ListenerTarget {
    type Handler;
    fn attach(&self, event: &str, handler: &Self::Handler);
    fn detach(&self, event: &str, handler: &Self::Handler);
}

pub type CleanupFn = Box<dyn FnOnce() -> anyhow::Result<()>>;

trait AttachedListener {
    fn event(&self) -> &str;
    fn detach(self: Box<Self>);
}

struct ListenerRecord<T: ListenerTarget> {
    target: T,
    event: String,
    handler: T::Handler,
}

impl<T: ListenerTarget> AttachedListener for ListenerRecord<T> {
    fn event(&self) -> &str {
        &self.event
    }

    fn detach(self: Box<Self>) {
        self.target.detach(&self.event, &self.handler);
    }
}

/// What a single `cleanup()` released.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub geometries: usize,
    pub materials: usize,
    pub textures: usize,
    pub render_targets: usize,
    pub listeners: usize,
    pub timeouts: usize,
    pub intervals: usize,
    pub animation_frames: usize,
    pub callbacks: usize,
    pub failed_callbacks: usize,
}

impl CleanupReport {
    pub fn total(&self) -> usize {
        self.geometries
            + self.materials
            + self.textures
            + self.render_targets
            + self.listeners
            + self.timeouts
            + self.intervals
            + self.animation_frames
            + self.callbacks
    }
}

type DisposableBag = SmallVec<[Box<dyn Disposable>; 8]>;

pub struct CleanupRegistry {
    scene: Option<SceneId>,
    timers: Rc<dyn Timers>,
    geometries: DisposableBag,
    materials: DisposableBag,
    textures: DisposableBag,
    render_targets: DisposableBag,
    listeners: Vec<Box<dyn AttachedListener>>,
    timeouts: SmallVec<[TimerHandle; 8]>,
    intervals: SmallVec<[TimerHandle; 4]>,
    animation_frames: SmallVec<[FrameHandle; 4]>,
    callbacks: Vec<CleanupFn>,
    drained: bool,
}

impl CleanupRegistry {
    pub fn new(timers: Rc<dyn Timers>) -> Self {
        Self {
            scene: None,
            timers,
            geometries: SmallVec::new(),
            materials: SmallVec::new(),
            textures: SmallVec::new(),
            render_targets: SmallVec::new(),
            listeners: Vec::new(),
            timeouts: SmallVec::new(),
            intervals: SmallVec::new(),
            animation_frames: SmallVec::new(),
            callbacks: Vec::new(),
            drained: false,
        }
    }

    /// Registry owned by `scene`; the id only labels log lines.
    pub fn for_scene(scene: SceneId, timers: Rc<dyn Timers>) -> Self {
        let mut registry = Self::new(timers);
        registry.scene = Some(scene);
        registry
    }

    pub fn scene(&self) -> Option<SceneId> {
        self.scene
    }

    pub fn is_drained(&self) -> bool {
        self.drained
    }

    /// Number of resources currently held.
    pub fn len(&self) -> usize {
        self.geometries.len()
            + self.materials.len()
            + self.textures.len()
            + self.render_targets.len()
            + self.listeners.len()
            + self.timeouts.len()
            + self.intervals.len()
            + self.animation_frames.len()
            + self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Event names of the listeners currently attached through this registry.
    pub fn listener_events(&self) -> Vec<&str> {
        self.listeners.iter().map(|l| l.event()).collect()
    }

    pub fn register_geometry(&mut self, handle: impl Disposable + 'static) {
        if self.reject_late("geometry") {
            Box::new(handle).dispose();
            return;
        }
        self.geometries.push(Box::new(handle));
    }

    pub fn register_material(&mut self, handle: impl Disposable + 'static) {
        if self.reject_late("material") {
            Box::new(handle).dispose();
            return;
        }
        self.materials.push(Box::new(handle));
    }

    pub fn register_texture(&mut self, handle: impl Disposable + 'static) {
        if self.reject_late("texture") {
            Box::new(handle).dispose();
            return;
        }
        self.textures.push(Box::new(handle));
    }

    pub fn register_render_target(&mut self, handle: impl Disposable + 'static) {
        if self.reject_late("render target") {
            Box::new(handle).dispose();
            return;
        }
        self.render_targets.push(Box::new(handle));
    }

    /// Attach `handler` to `target` and take ownership of its lifetime.
    ///
    /// This is the only place listeners are attached: registered implies
    /// attached, and `cleanup()` implies detached.
    pub fn register_event_listener<T>(&mut self, target: T, event: &str, handler: T::Handler)
    where
        T: ListenerTarget + 'static,
        T::Handler: 'static,
    {
        if self.reject_late("listener") {
            return;
        }
        target.attach(event, &handler);
        self.listeners.push(Box::new(ListenerRecord {
            target,
            event: event.to_string(),
            handler,
        }));
    }

    pub fn register_timeout(&mut self, handle: TimerHandle) {
        if self.reject_late("timeout") {
            self.timers.clear_timeout(handle);
            return;
        }
        self.timeouts.push(handle);
    }

    pub fn register_interval(&mut self, handle: TimerHandle) {
        if self.reject_late("interval") {
            self.timers.clear_interval(handle);
            return;
        }
        self.intervals.push(handle);
    }

    pub fn register_animation_frame(&mut self, handle: FrameHandle) {
        if self.reject_late("animation frame") {
            self.timers.cancel_animation_frame(handle);
            return;
        }
        self.animation_frames.push(handle);
    }

    /// Arbitrary teardown run after every typed resource has been released.
    pub fn register_custom_cleanup(
        &mut self,
        callback: impl FnOnce() -> anyhow::Result<()> + 'static,
    ) {
        if self.reject_late("cleanup callback") {
            run_callback(Box::new(callback));
            return;
        }
        self.callbacks.push(Box::new(callback));
    }

    /// Release everything registered so far.
    ///
    /// Graphics handles go first, then listeners, timers and frames, then the
    /// custom callbacks. A failing callback is logged and counted and the rest
    /// still run. Calling this again releases nothing.
    pub fn cleanup(&mut self) -> CleanupReport {
        let already_drained = self.drained;
        self.drained = true;
        let mut report = CleanupReport::default();

        report.geometries = dispose_all(&mut self.geometries);
        report.materials = dispose_all(&mut self.materials);
        report.textures = dispose_all(&mut self.textures);
        report.render_targets = dispose_all(&mut self.render_targets);

        for listener in std::mem::take(&mut self.listeners) {
            listener.detach();
            report.listeners += 1;
        }
        for handle in std::mem::take(&mut self.timeouts) {
            self.timers.clear_timeout(handle);
            report.timeouts += 1;
        }
        for handle in std::mem::take(&mut self.intervals) {
            self.timers.clear_interval(handle);
            report.intervals += 1;
        }
        for handle in std::mem::take(&mut self.animation_frames) {
            self.timers.cancel_animation_frame(handle);
            report.animation_frames += 1;
        }
        for callback in std::mem::take(&mut self.callbacks) {
            report.callbacks += 1;
            if !run_callback(callback) {
                report.failed_callbacks += 1;
            }
        }

        if already_drained {
            log::debug!("[cleanup] {} already drained", self.label());
        } else {
            log::info!(
                "[cleanup] {} released {} resources ({} callback failures)",
                self.label(),
                report.total(),
                report.failed_callbacks
            );
        }
        report
    }

    fn reject_late(&self, kind: &str) -> bool {
        if self.drained {
            log::warn!(
                "[cleanup] {} registered after drain on {}; releasing immediately",
                kind,
                self.label()
            );
        }
        self.drained
    }

    fn label(&self) -> String {
        match self.scene {
            Some(id) => format!("scene `{id}`"),
            None => "registry".to_string(),
        }
    }
}

impl Drop for CleanupRegistry {
    fn drop(&mut self) {
        if !self.drained {
            self.cleanup();
        }
    }
}

fn dispose_all(bag: &mut DisposableBag) -> usize {
    let items = std::mem::take(bag);
    let n = items.len();
    for item in items {
        item.dispose();
    }
    n
}

/// Run one callback, containing `Err` returns and, where unwinding is
/// available, panics.
///
/// `wasm32-unknown-unknown` builds abort on panic, so in the browser only the
/// `Err` path is contained; callbacks there must report failure by returning it.
fn run_callback(callback: CleanupFn) -> bool {
    match catch_unwind(AssertUnwindSafe(callback)) {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            log::error!("[cleanup] callback failed: {:#}", e);
            false
        }
        Err(payload) => {
            log::error!("[cleanup] callback panicked: {}", panic_message(&*payload));
            false
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::timers::ManualTimers;
    use std::cell::Cell;

    struct Counted(Rc<Cell<u32>>);

    impl Disposable for Counted {
        fn dispose(self: Box<Self>) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn report_counts_every_category() {
        let timers = Rc::new(ManualTimers::new());
        let mut reg = CleanupRegistry::new(timers.clone());
        let hits = Rc::new(Cell::new(0));
        reg.register_geometry(Counted(hits.clone()));
        reg.register_material(Counted(hits.clone()));
        reg.register_texture(Counted(hits.clone()));
        reg.register_render_target(Counted(hits.clone()));
        reg.register_timeout(TimerHandle(1));
        reg.register_interval(TimerHandle(2));
        reg.register_animation_frame(FrameHandle(3));
        reg.register_custom_cleanup(|| Ok(()));
        assert_eq!(reg.len(), 8);

        let report = reg.cleanup();
        assert_eq!(report.total(), 8);
        assert_eq!(report.failed_callbacks, 0);
        assert_eq!(hits.get(), 4);
        assert_eq!(timers.cleared(), vec![TimerHandle(1), TimerHandle(2)]);
        assert_eq!(timers.cancelled_frames(), vec![FrameHandle(3)]);
        assert!(reg.is_empty());
    }

    #[test]
    fn drop_drains_an_undrained_registry() {
        let hits = Rc::new(Cell::new(0));
        {
            let mut reg = CleanupRegistry::new(Rc::new(ManualTimers::new()));
            reg.register_texture(Counted(hits.clone()));
        }
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn panic_message_reads_str_and_string_payloads() {
        let a: Box<dyn Any + Send> = Box::new("boom");
        let b: Box<dyn Any + Send> = Box::new(String::from("bang"));
        let c: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(&*a), "boom");
        assert_eq!(panic_message(&*b), "bang");
        assert_eq!(panic_message(&*c), "non-string panic payload");
    }
}
