// Host-side tests for page teardown on `pagehide`.

mod common;

use common::{counter, harness, CountingHandle, FakeTarget};
use starlit_journey::core::*;
use starlit_journey::events::release_on_pagehide;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn cached_page_keeps_listeners_and_scene() {
    let h = harness(TransitionTiming::instant());
    let timers: Rc<dyn Timers> = h.timers.clone();
    let app = RefCell::new(CleanupRegistry::new(timers));
    let keys = FakeTarget::default();
    app.borrow_mut().register_event_listener(keys.clone(), "keydown", 1);
    let hits = counter();
    h.seq
        .active_cleanup()
        .borrow_mut()
        .register_geometry(CountingHandle(hits.clone()));

    assert!(!release_on_pagehide(true, &h.seq, &app));
    assert_eq!(keys.attached.borrow().len(), 1);
    assert!(!app.borrow().is_drained());
    assert!(!h.seq.active_cleanup().borrow().is_drained());
    assert_eq!(hits.get(), 0);

    // Navigation still works after the page comes back.
    h.seq.next().unwrap();
    h.settle();
    assert_eq!(h.seq.current(), SceneId::Hero);
}

#[test]
fn unloading_page_releases_everything() {
    let h = harness(TransitionTiming::instant());
    let timers: Rc<dyn Timers> = h.timers.clone();
    let app = RefCell::new(CleanupRegistry::new(timers));
    let keys = FakeTarget::default();
    app.borrow_mut().register_event_listener(keys.clone(), "keydown", 1);
    app.borrow_mut().register_event_listener(keys.clone(), "click", 2);
    let hits = counter();
    h.seq
        .active_cleanup()
        .borrow_mut()
        .register_texture(CountingHandle(hits.clone()));

    assert!(release_on_pagehide(false, &h.seq, &app));
    assert!(keys.attached.borrow().is_empty());
    assert!(app.borrow().is_drained());
    assert!(h.seq.active_cleanup().borrow().is_drained());
    assert_eq!(hits.get(), 1);
}
