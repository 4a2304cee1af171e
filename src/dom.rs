use crate::core::{CleanupRegistry, ListenerTarget};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub type DomHandler = Closure<dyn FnMut(web::Event)>;

impl ListenerTarget for web::EventTarget {
    type Handler = DomHandler;

    fn attach(&self, event: &str, handler: &Self::Handler) {
        if let Err(e) =
            self.add_event_listener_with_callback(event, handler.as_ref().unchecked_ref())
        {
            log::error!("[dom] add {} listener: {:?}", event, e);
        }
    }

    fn detach(&self, event: &str, handler: &Self::Handler) {
        if let Err(e) =
            self.remove_event_listener_with_callback(event, handler.as_ref().unchecked_ref())
        {
            log::error!("[dom] remove {} listener: {:?}", event, e);
        }
    }
}

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Attach `handler` for `event` on `target`, owned by `cleanup`.
pub fn listen(
    cleanup: &mut CleanupRegistry,
    target: &web::EventTarget,
    event: &str,
    handler: impl FnMut(web::Event) + 'static,
) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
    cleanup.register_event_listener(target.clone(), event, closure);
}

#[inline]
pub fn add_click_listener(
    cleanup: &mut CleanupRegistry,
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    match document.get_element_by_id(element_id) {
        Some(el) => listen(cleanup, el.as_ref(), "click", move |_| handler()),
        None => log::warn!("[dom] missing #{}", element_id),
    }
}

pub fn set_text(document: &web::Document, element_id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(element_id) {
        el.set_text_content(Some(text));
    }
}

pub fn set_class(document: &web::Document, element_id: &str, class: &str, on: bool) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let cl = el.class_list();
        _ = if on { cl.add_1(class) } else { cl.remove_1(class) };
    }
}
