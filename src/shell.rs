//! Presentation shell: start overlay, transition veil, title and progress.

use crate::constants::{
    CAPTION_DELAY_SEC, CAPTION_ID, HIDDEN_CLASS, PROGRESS_ID, STAGE_ID, START_OVERLAY_ID,
    TITLE_ID, VEIL_ACTIVE_CLASS, VEIL_ID,
};
use crate::core::{SceneSnapshot, Sequencer, Timers};
use crate::dom;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn show(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(START_OVERLAY_ID) {
        _ = el.class_list().remove_1(HIDDEN_CLASS);
        // fallback for environments without CSS class
        _ = el.set_attribute("style", "");
    }
}

#[inline]
pub fn hide(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(START_OVERLAY_ID) {
        _ = el.class_list().add_1(HIDDEN_CLASS);
        // fallback
        _ = el.set_attribute("style", "display:none");
    }
}

#[inline]
pub fn is_hidden(document: &web::Document) -> bool {
    if let Some(el) = document.get_element_by_id(START_OVERLAY_ID) {
        if el.class_list().contains(HIDDEN_CLASS) {
            return true;
        }
        return el
            .get_attribute("style")
            .map(|s| s.contains("display:none"))
            .unwrap_or(false);
    }
    false
}

#[inline]
pub fn toggle(document: &web::Document) {
    if is_hidden(document) {
        show(document);
    } else {
        hide(document);
    }
}

pub fn set_veil(document: &web::Document, active: bool) {
    dom::set_class(document, VEIL_ID, VEIL_ACTIVE_CLASS, active);
}

fn set_progress(document: &web::Document, progress: f32) {
    let Some(el) = document.get_element_by_id(PROGRESS_ID) else {
        return;
    };
    let pct = format!("{:.1}%", progress.clamp(0.0, 1.0) * 100.0);
    if let Some(html) = el.dyn_ref::<web::HtmlElement>() {
        _ = html.style().set_property("width", &pct);
    }
    _ = el.set_attribute("aria-valuenow", &format!("{:.0}", progress * 100.0));
}

/// Reflect a snapshot in the page: veil while moving, stage/title once committed.
pub fn render(document: &web::Document, sequencer: &Sequencer, snapshot: &SceneSnapshot) {
    set_veil(document, snapshot.transitioning);
    set_progress(document, snapshot.progress);
    if snapshot.transitioning {
        return;
    }
    if let Some(stage) = document.get_element_by_id(STAGE_ID) {
        _ = stage.set_attribute("data-scene", snapshot.current.as_str());
    }
    if let Ok(desc) = sequencer.registry().get(snapshot.current) {
        dom::set_text(document, TITLE_ID, desc.name);
    }
}

/// Mount the shell's own per-scene pieces into the active cleanup registry.
///
/// The caption appears a moment after the scene commits and is cleared when
/// the scene is left, whether or not it had appeared yet.
fn mount_caption(document: &web::Document, sequencer: &Sequencer, timers: &Rc<dyn Timers>) {
    let Ok(desc) = sequencer.descriptor() else {
        return;
    };
    let text = desc.description;
    let doc = document.clone();
    let handle = timers.set_timeout(
        Duration::from_secs_f32(CAPTION_DELAY_SEC),
        Box::new(move || dom::set_text(&doc, CAPTION_ID, text)),
    );
    let cleanup = sequencer.active_cleanup();
    let mut cleanup = cleanup.borrow_mut();
    cleanup.register_timeout(handle);
    let doc = document.clone();
    cleanup.register_custom_cleanup(move || {
        dom::set_text(&doc, CAPTION_ID, "");
        Ok(())
    });
}

/// Keep the page in step with the sequencer.
pub fn wire_presentation(document: &web::Document, sequencer: &Sequencer, timers: Rc<dyn Timers>) {
    let snapshot = sequencer.snapshot();
    render(document, sequencer, &snapshot);
    mount_caption(document, sequencer, &timers);

    let doc = document.clone();
    let seq = sequencer.clone();
    let was_transitioning = Cell::new(snapshot.transitioning);
    sequencer.subscribe(move |snap| {
        render(&doc, &seq, snap);
        // Mount on the commit edge only.
        if was_transitioning.replace(snap.transitioning) && !snap.transitioning {
            mount_caption(&doc, &seq, &timers);
        }
    });
}
