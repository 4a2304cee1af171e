use crate::core::TrackId;

// Shell wiring: DOM ids and classes the page is expected to provide.

pub const STAGE_ID: &str = "stage"; // carries `data-scene` for CSS and scene components
pub const VEIL_ID: &str = "transition-veil";
pub const TITLE_ID: &str = "scene-title";
pub const CAPTION_ID: &str = "scene-caption";
pub const PROGRESS_ID: &str = "journey-progress";
pub const START_OVERLAY_ID: &str = "start-overlay";
pub const BEGIN_BUTTON_ID: &str = "begin-journey";
pub const NEXT_BUTTON_ID: &str = "next-scene";
pub const PREV_BUTTON_ID: &str = "prev-scene";

pub const HIDDEN_CLASS: &str = "hidden";
pub const VEIL_ACTIVE_CLASS: &str = "active";

// Caption fades in a little after the scene commits
pub const CAPTION_DELAY_SEC: f32 = 1.2;

// Audio assets live next to the page as `<base><track>.<ext>`
pub const AUDIO_BASE_PATH: &str = "audio/";
pub const AUDIO_EXTENSION: &str = "mp3";

// Mix levels
pub const MASTER_GAIN: f32 = 0.8;
pub const AMBIENT_GAIN: f32 = 0.6;
pub const WHISPER_GAIN: f32 = 1.0;
pub const VOLUME_STEP: f32 = 0.05;

// Listener sits slightly in front of the whisper origin
pub const LISTENER_Z: f32 = 1.5;
pub const PANNER_REF_DISTANCE: f32 = 0.5;
pub const PANNER_MAX_DISTANCE: f32 = 50.0;

// Extra time after a fade before the old source is stopped
pub const STOP_TAIL_SEC: f64 = 0.05;

pub fn track_url(track: TrackId) -> String {
    format!("{AUDIO_BASE_PATH}{track}.{AUDIO_EXTENSION}")
}
