use glam::Vec3;
use std::time::Duration;

// Transition tuning shared by the sequencer and its hosts.
//
// The three durations are tuned by feel and are independent of one another:
// the commit lands somewhere inside the crossfade, not at a derived point.

pub const CROSSFADE_SEC: f32 = 3.5; // ambient blend from outgoing to incoming track
pub const WHISPER_OFFSET_SEC: f32 = 4.0; // whisper start, measured from crossfade start
pub const COMMIT_DELAY_SEC: f32 = 1.5; // visual cut, measured from transition start

// Whispers are narrated from a neutral point in front of the listener
pub const WHISPER_ORIGIN: Vec3 = Vec3::ZERO;

/// Durations the sequencer waits on around every scene change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionTiming {
    pub crossfade: Duration,
    pub whisper_offset: Duration,
    pub commit_delay: Duration,
}

impl TransitionTiming {
    /// Zero-length timings; commits fire on the next timer turn.
    pub fn instant() -> Self {
        Self {
            crossfade: Duration::ZERO,
            whisper_offset: Duration::ZERO,
            commit_delay: Duration::ZERO,
        }
    }

    /// Scale every duration by `factor` (e.g. reduced-motion or fast preview).
    pub fn scaled(&self, factor: f32) -> Self {
        let f = factor.max(0.0);
        Self {
            crossfade: self.crossfade.mul_f32(f),
            whisper_offset: self.whisper_offset.mul_f32(f),
            commit_delay: self.commit_delay.mul_f32(f),
        }
    }
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            crossfade: Duration::from_secs_f32(CROSSFADE_SEC),
            whisper_offset: Duration::from_secs_f32(WHISPER_OFFSET_SEC),
            commit_delay: Duration::from_secs_f32(COMMIT_DELAY_SEC),
        }
    }
}
