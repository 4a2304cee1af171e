use crate::core::scenes::TrackId;
use glam::Vec3;
use std::time::Duration;

/// Stops a scheduled one-shot that has not finished yet.
pub type StopOneShot = Box<dyn FnOnce()>;

/// Playback side of a scene change. Mixing, loading and spatialization are
/// the implementor's business; the sequencer only says what and when.
pub trait AudioDirector {
    /// Blend from `from` (nothing playing if `None`) to the looping `to` track.
    fn crossfade(&self, from: Option<TrackId>, to: TrackId, duration: Duration);
    /// Play `track` once, `delay` from now, positioned at `origin`.
    ///
    /// The returned stop handle silences the one-shot whether it is still
    /// waiting, loading or playing.
    fn play_one_shot(&self, track: TrackId, origin: Vec3, delay: Duration) -> Option<StopOneShot>;
}

/// Director that plays nothing; used when no audio device is available.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentAudio;

impl AudioDirector for SilentAudio {
    fn crossfade(&self, from: Option<TrackId>, to: TrackId, _duration: Duration) {
        log::debug!("[audio] (silent) crossfade {:?} -> {}", from, to);
    }

    fn play_one_shot(
        &self,
        track: TrackId,
        _origin: Vec3,
        _delay: Duration,
    ) -> Option<StopOneShot> {
        log::debug!("[audio] (silent) one-shot {}", track);
        None
    }
}
