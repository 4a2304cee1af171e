use crate::core::scenes::SceneId;
use thiserror::Error;

/// Conditions the journey core reports instead of panicking.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum JourneyError {
    #[error("scene `{0}` is not in the journey")]
    SceneNotFound(SceneId),
    #[error("transition to `{requested}` rejected while moving `{from}` -> `{to}`")]
    TransitionRejected {
        requested: SceneId,
        from: SceneId,
        to: SceneId,
    },
    #[error("scene `{0}` is described more than once")]
    DuplicateScene(SceneId),
    #[error("journey has no scenes")]
    EmptyJourney,
}
