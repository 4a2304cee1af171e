use super::keys::{command_for_key, NavCommand};
use crate::audio::WebAudioDirector;
use crate::constants::{BEGIN_BUTTON_ID, NEXT_BUTTON_ID, PREV_BUTTON_ID};
use crate::core::{CleanupRegistry, Sequencer};
use crate::{dom, shell};
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn handle_navigation_keydown(
    ev: &web::KeyboardEvent,
    sequencer: &Sequencer,
    audio: Option<&WebAudioDirector>,
) {
    if ev.repeat() || ev.ctrl_key() || ev.meta_key() || ev.alt_key() {
        return;
    }
    let key = ev.key();
    if let Some(cmd) = command_for_key(&key) {
        // Any navigation counts as the gesture that unlocks audio.
        if let Some(a) = audio {
            a.resume();
        }
        sequencer.start();
        if let Err(e) = cmd.apply(sequencer) {
            log::debug!("[keys] {:?}: {}", cmd, e);
        }
        ev.prevent_default();
        return;
    }
    match key.as_str() {
        "ArrowUp" => {
            if let Some(a) = audio {
                a.nudge_volume(true);
            }
            ev.prevent_default();
        }
        "ArrowDown" => {
            if let Some(a) = audio {
                a.nudge_volume(false);
            }
            ev.prevent_default();
        }
        _ => {}
    }
}

pub fn wire_navigation_keys(
    cleanup: &mut CleanupRegistry,
    sequencer: &Sequencer,
    audio: Option<WebAudioDirector>,
) {
    let Some(window) = web::window() else {
        return;
    };
    let seq = sequencer.clone();
    dom::listen(cleanup, window.as_ref(), "keydown", move |ev: web::Event| {
        if let Some(kev) = ev.dyn_ref::<web::KeyboardEvent>() {
            handle_navigation_keydown(kev, &seq, audio.as_ref());
        }
    });
}

// Wire an 'H' key handler to toggle the overlay without affecting navigation
pub fn wire_overlay_toggle_h(cleanup: &mut CleanupRegistry, document: &web::Document) {
    let Some(window) = web::window() else {
        return;
    };
    let doc = document.clone();
    dom::listen(cleanup, window.as_ref(), "keydown", move |ev: web::Event| {
        if let Some(kev) = ev.dyn_ref::<web::KeyboardEvent>() {
            let key = kev.key();
            if key == "h" || key == "H" {
                shell::toggle(&doc);
                kev.prevent_default();
            }
        }
    });
}

pub fn wire_navigation_buttons(
    cleanup: &mut CleanupRegistry,
    document: &web::Document,
    sequencer: &Sequencer,
    audio: Option<WebAudioDirector>,
) {
    let seq = sequencer.clone();
    let doc = document.clone();
    let begin_audio = audio.clone();
    dom::add_click_listener(cleanup, document, BEGIN_BUTTON_ID, move || {
        if let Some(a) = &begin_audio {
            a.resume();
        }
        seq.start();
        shell::hide(&doc);
    });

    for (id, cmd) in [(NEXT_BUTTON_ID, NavCommand::Next), (PREV_BUTTON_ID, NavCommand::Previous)] {
        let seq = sequencer.clone();
        let audio = audio.clone();
        dom::add_click_listener(cleanup, document, id, move || {
            if let Some(a) = &audio {
                a.resume();
            }
            seq.start();
            _ = cmd.apply(&seq);
        });
    }
}
