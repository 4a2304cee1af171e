//! A scripted, multi-scene journey for the browser.
//!
//! [`core`] holds the scene catalogue, the transition sequencer and the
//! per-scene cleanup registry, and runs anywhere. The remaining modules are the
//! WASM shell that binds them to WebAudio, the DOM and the window's timers.

pub mod constants;
pub mod core;
pub mod events;
pub mod gpu;

#[cfg(target_arch = "wasm32")]
mod audio;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod shell;
#[cfg(target_arch = "wasm32")]
mod timers;

#[cfg(target_arch = "wasm32")]
pub use web_entry::start;

#[cfg(target_arch = "wasm32")]
mod web_entry {
    use crate::core::{
        AudioDirector, CleanupRegistry, Sequencer, SilentAudio, Timers, TransitionTiming,
    };
    use crate::{audio, dom, events, shell, timers};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::spawn_local;
    use web_sys as web;

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
        log::info!("starlit-journey starting");

        spawn_local(async move {
            if let Err(e) = init().await {
                log::error!("init error: {:?}", e);
            }
        });
        Ok(())
    }

    /// Release the page-lifetime listeners and the mounted scene on unload.
    fn wire_teardown(
        window: &web::Window,
        app_cleanup: Rc<RefCell<CleanupRegistry>>,
        sequencer: Sequencer,
    ) {
        let closure = Closure::wrap(Box::new(move |ev: web::Event| {
            let persisted = ev
                .dyn_ref::<web::PageTransitionEvent>()
                .is_some_and(|p| p.persisted());
            events::release_on_pagehide(persisted, &sequencer, &app_cleanup);
        }) as Box<dyn FnMut(web::Event)>);
        _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    async fn init() -> anyhow::Result<()> {
        static STARTED: AtomicBool = AtomicBool::new(false);
        if STARTED.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;

        let timers: Rc<dyn Timers> = Rc::new(timers::WebTimers::new()?);
        let director = match audio::WebAudioDirector::new() {
            Ok(d) => Some(d),
            Err(e) => {
                log::warn!("[audio] unavailable, continuing silently: {:#}", e);
                None
            }
        };
        let audio_dyn: Rc<dyn AudioDirector> = match &director {
            Some(d) => Rc::new(d.clone()),
            None => Rc::new(SilentAudio),
        };

        let sequencer =
            Sequencer::journey(audio_dyn, timers.clone(), TransitionTiming::default())?;
        if let Some(d) = &director {
            d.preload(sequencer.registry().iter().take(2).map(|s| s.ambient_track));
        }

        shell::wire_presentation(&document, &sequencer, timers.clone());
        shell::show(&document);

        // Listeners that live as long as the page.
        let app_cleanup = Rc::new(RefCell::new(CleanupRegistry::new(timers.clone())));
        {
            let mut reg = app_cleanup.borrow_mut();
            events::wire_navigation_keys(&mut reg, &sequencer, director.clone());
            events::wire_overlay_toggle_h(&mut reg, &document);
            events::wire_navigation_buttons(&mut reg, &document, &sequencer, director.clone());
            log::info!("[shell] {} page listeners", reg.len());
        }
        wire_teardown(&window, app_cleanup, sequencer);
        Ok(())
    }
}
