use crate::core::{FrameHandle, OnceCallback, TimerHandle, Timers};
use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

/// [`Timers`] backed by the window's event loop.
pub struct WebTimers {
    window: web::Window,
}

impl WebTimers {
    pub fn new() -> anyhow::Result<Self> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        Ok(Self { window })
    }
}

impl Timers for WebTimers {
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle {
        let callback = OnceCallback::new(callback);
        let timer_callback = callback.clone();
        let f = Closure::once_into_js(move || {
            timer_callback.fire();
        });
        let ms = delay.as_millis().min(i32::MAX as u128) as i32;
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(f.unchecked_ref(), ms)
        {
            Ok(id) => TimerHandle(id),
            Err(e) => {
                // Callbacks are never dropped; fall back to the next tick.
                log::error!("[timers] setTimeout failed, running on the next tick: {:?}", e);
                spawn_local(async move {
                    callback.fire();
                });
                TimerHandle(-1)
            }
        }
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        self.window.clear_timeout_with_handle(handle.0);
    }

    fn clear_interval(&self, handle: TimerHandle) {
        self.window.clear_interval_with_handle(handle.0);
    }

    fn cancel_animation_frame(&self, handle: FrameHandle) {
        _ = self.window.cancel_animation_frame(handle.0);
    }
}
