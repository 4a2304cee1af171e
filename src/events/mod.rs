pub mod keys;
pub mod lifecycle;
#[cfg(target_arch = "wasm32")]
pub mod keyboard;

pub use keys::{command_for_key, scene_for_digit, NavCommand};
pub use lifecycle::release_on_pagehide;
#[cfg(target_arch = "wasm32")]
pub use keyboard::{wire_navigation_buttons, wire_navigation_keys, wire_overlay_toggle_h};
