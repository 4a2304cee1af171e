//! The fixed catalogue of scenes and lookups over it.
//!
//! Scene ids are an enum so every table keyed by them is exhaustive at compile
//! time. The registry still checks lookups at runtime because a registry can be
//! built from a partial descriptor list (previews, tests).

use crate::core::error::JourneyError;
use fnv::FnvHashMap;
use std::fmt;
use std::str::FromStr;

pub type TrackId = &'static str;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SceneId {
    Calibration,
    Hero,
    Galaxy,
    Globe,
    Constellation,
    Garden,
    Sanctuary,
    Melody,
    Finale,
}

impl SceneId {
    /// Journey order.
    pub const ALL: [SceneId; 9] = [
        SceneId::Calibration,
        SceneId::Hero,
        SceneId::Galaxy,
        SceneId::Globe,
        SceneId::Constellation,
        SceneId::Garden,
        SceneId::Sanctuary,
        SceneId::Melody,
        SceneId::Finale,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SceneId::Calibration => "calibration",
            SceneId::Hero => "hero",
            SceneId::Galaxy => "galaxy",
            SceneId::Globe => "globe",
            SceneId::Constellation => "constellation",
            SceneId::Garden => "garden",
            SceneId::Sanctuary => "sanctuary",
            SceneId::Melody => "melody",
            SceneId::Finale => "finale",
        }
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SceneId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SceneId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown scene id `{s}`"))
    }
}

/// Mood tag carried for styling and audio selection downstream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Emotion {
    Joy,
    Tenderness,
    Longing,
    Awe,
    Serenity,
    Elation,
    Nostalgia,
    Completion,
    Wonder,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneDescriptor {
    pub id: SceneId,
    pub name: &'static str,
    pub description: &'static str,
    pub ambient_track: TrackId,
    pub whisper_track: Option<TrackId>,
    pub emotion: Emotion,
}

/// Descriptor for every scene id. Adding a variant without a row here fails to compile.
pub fn descriptor_for(id: SceneId) -> SceneDescriptor {
    let (name, description, ambient_track, whisper_track, emotion) = match id {
        SceneId::Calibration => (
            "Calibration",
            "Headphones on, lights low; the stars tune themselves to you",
            "intro_theme",
            None,
            Emotion::Wonder,
        ),
        SceneId::Hero => (
            "The Beginning",
            "A name written in light across the dark",
            "hero_heartbeat",
            Some("whisper_hero"),
            Emotion::Joy,
        ),
        SceneId::Galaxy => (
            "Galaxy of Wishes",
            "Every star a wish, every wish for you",
            "galaxy_wonder",
            Some("whisper_galaxy"),
            Emotion::Awe,
        ),
        SceneId::Globe => (
            "Across the World",
            "The distance between us, drawn as a single arc",
            "globe_distance",
            Some("whisper_globe"),
            Emotion::Longing,
        ),
        SceneId::Constellation => (
            "Constellation of Memories",
            "Photographs orbiting like small moons",
            "constellation_memories",
            Some("whisper_constellation"),
            Emotion::Nostalgia,
        ),
        SceneId::Garden => (
            "The Garden",
            "Petals falling slowly, one for each promise",
            "garden_bloom",
            Some("whisper_garden"),
            Emotion::Tenderness,
        ),
        SceneId::Sanctuary => (
            "Sanctuary",
            "A quiet room where words float and wait",
            "sanctuary_calm",
            Some("whisper_sanctuary"),
            Emotion::Serenity,
        ),
        SceneId::Melody => (
            "Our Melody",
            "The song that was playing, played again",
            "melody_ours",
            Some("whisper_melody"),
            Emotion::Elation,
        ),
        SceneId::Finale => (
            "Forever",
            "Everything gathers into one heart",
            "finale_forever",
            Some("whisper_finale"),
            Emotion::Completion,
        ),
    };
    SceneDescriptor {
        id,
        name,
        description,
        ambient_track,
        whisper_track,
        emotion,
    }
}

/// The full journey in order.
pub fn journey_scenes() -> Vec<SceneDescriptor> {
    SceneId::ALL.iter().copied().map(descriptor_for).collect()
}

/// Ordered, immutable list of scenes with O(1) lookup by id.
#[derive(Clone, Debug, Default)]
pub struct SceneRegistry {
    scenes: Vec<SceneDescriptor>,
    index: FnvHashMap<SceneId, usize>,
}

impl SceneRegistry {
    /// Empty registry; call [`SceneRegistry::initialize`] to load the journey.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the full journey.
    pub fn journey() -> Self {
        let mut registry = Self::new();
        registry.initialize();
        registry
    }

    /// Build from an explicit list; ids must be unique and the list non-empty.
    pub fn with_scenes(scenes: Vec<SceneDescriptor>) -> Result<Self, JourneyError> {
        if scenes.is_empty() {
            return Err(JourneyError::EmptyJourney);
        }
        let mut index = FnvHashMap::default();
        for (i, s) in scenes.iter().enumerate() {
            if index.insert(s.id, i).is_some() {
                return Err(JourneyError::DuplicateScene(s.id));
            }
        }
        Ok(Self { scenes, index })
    }

    /// Load the static journey. Calling it again leaves the registry unchanged.
    pub fn initialize(&mut self) {
        if !self.scenes.is_empty() {
            log::debug!("[scenes] already initialized ({} scenes)", self.scenes.len());
            return;
        }
        self.scenes = journey_scenes();
        self.index = self
            .scenes
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id, i))
            .collect();
        log::info!("[scenes] initialized {} scenes", self.scenes.len());
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneDescriptor> {
        self.scenes.iter()
    }

    pub fn contains(&self, id: SceneId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: SceneId) -> Result<&SceneDescriptor, JourneyError> {
        self.index_of(id).map(|i| &self.scenes[i])
    }

    pub fn index_of(&self, id: SceneId) -> Result<usize, JourneyError> {
        self.index
            .get(&id)
            .copied()
            .ok_or(JourneyError::SceneNotFound(id))
    }

    pub fn first(&self) -> Option<&SceneDescriptor> {
        self.scenes.first()
    }

    pub fn last(&self) -> Option<&SceneDescriptor> {
        self.scenes.last()
    }

    /// Scene after `id`, or `None` at the end of the journey.
    pub fn next(&self, id: SceneId) -> Result<Option<&SceneDescriptor>, JourneyError> {
        let i = self.index_of(id)?;
        Ok(self.scenes.get(i + 1))
    }

    /// Scene before `id`, or `None` at the start of the journey.
    pub fn previous(&self, id: SceneId) -> Result<Option<&SceneDescriptor>, JourneyError> {
        let i = self.index_of(id)?;
        Ok(i.checked_sub(1).and_then(|p| self.scenes.get(p)))
    }

    /// Fraction of the journey completed once `id` is showing, in [0, 1].
    ///
    /// A single-scene journey is complete as soon as it starts.
    pub fn progress_of(&self, id: SceneId) -> Result<f32, JourneyError> {
        let i = self.index_of(id)?;
        let span = self.scenes.len().saturating_sub(1);
        if span == 0 {
            return Ok(1.0);
        }
        Ok(i as f32 / span as f32)
    }
}
