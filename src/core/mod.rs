//! Platform-independent journey logic: scene catalogue, sequencer, cleanup.
//!
//! Nothing here touches `web-sys`; the browser shell plugs in through the
//! [`AudioDirector`], [`Timers`], [`Disposable`] and [`ListenerTarget`] traits.

pub mod audio;
pub mod cleanup;
pub mod constants;
pub mod error;
pub mod procedural;
pub mod scenes;
pub mod sequencer;
pub mod timers;

pub use audio::*;
pub use cleanup::*;
pub use constants::*;
pub use error::*;
pub use scenes::*;
pub use sequencer::*;
pub use timers::*;
