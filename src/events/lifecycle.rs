use crate::core::{CleanupRegistry, Sequencer};
use std::cell::RefCell;

/// Handle `pagehide`: release the mounted scene and the page listeners.
///
/// When the page is only parked in the back/forward cache (`persisted`)
/// everything stays attached so the restored page keeps navigating.
/// Returns whether anything was released.
pub fn release_on_pagehide(
    persisted: bool,
    sequencer: &Sequencer,
    app_cleanup: &RefCell<CleanupRegistry>,
) -> bool {
    if persisted {
        log::info!("[lifecycle] page cached, keeping `{}` mounted", sequencer.current());
        return false;
    }
    let scene = sequencer.active_cleanup();
    for (label, reg) in [("scene", &*scene), ("page", app_cleanup)] {
        match reg.try_borrow_mut() {
            Ok(mut reg) => {
                reg.cleanup();
            }
            Err(_) => log::error!("[lifecycle] {} cleanup is borrowed, skipping", label),
        }
    }
    true
}
