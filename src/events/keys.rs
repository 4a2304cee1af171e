use crate::core::{JourneyError, SceneId, Sequencer, Transition};

/// Navigation requested from the keyboard or the on-screen buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavCommand {
    Next,
    Previous,
    First,
    Last,
    Jump(SceneId),
}

#[inline]
pub fn scene_for_digit(key: &str) -> Option<SceneId> {
    let digit = key.parse::<usize>().ok()?;
    if digit == 0 {
        return None;
    }
    SceneId::ALL.get(digit - 1).copied()
}

#[inline]
pub fn command_for_key(key: &str) -> Option<NavCommand> {
    if let Some(id) = scene_for_digit(key) {
        return Some(NavCommand::Jump(id));
    }
    match key {
        "ArrowRight" | " " | "PageDown" | "n" | "N" => Some(NavCommand::Next),
        "ArrowLeft" | "PageUp" | "p" | "P" => Some(NavCommand::Previous),
        "Home" => Some(NavCommand::First),
        "End" => Some(NavCommand::Last),
        _ => None,
    }
}

impl NavCommand {
    pub fn apply(self, sequencer: &Sequencer) -> Result<Transition, JourneyError> {
        match self {
            NavCommand::Next => sequencer.next(),
            NavCommand::Previous => sequencer.previous(),
            NavCommand::First => match sequencer.registry().first() {
                Some(d) => sequencer.set_scene(d.id),
                None => Err(JourneyError::EmptyJourney),
            },
            NavCommand::Last => match sequencer.registry().last() {
                Some(d) => sequencer.set_scene(d.id),
                None => Err(JourneyError::EmptyJourney),
            },
            NavCommand::Jump(id) => sequencer.set_scene(id),
        }
    }
}
