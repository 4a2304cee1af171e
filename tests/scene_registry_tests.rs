// Host-side tests for the scene catalogue and its lookups.

use starlit_journey::core::*;
use std::collections::HashSet;

fn registry_without(missing: SceneId) -> SceneRegistry {
    let scenes = journey_scenes()
        .into_iter()
        .filter(|s| s.id != missing)
        .collect();
    SceneRegistry::with_scenes(scenes).unwrap()
}

#[test]
fn journey_is_a_strict_linear_path() {
    let reg = SceneRegistry::journey();
    let ids: Vec<SceneId> = reg.iter().map(|s| s.id).collect();
    assert_eq!(ids, SceneId::ALL.to_vec());

    assert_eq!(reg.index_of(SceneId::Calibration), Ok(0));
    assert_eq!(reg.index_of(SceneId::Finale), Ok(reg.len() - 1));
    for pair in ids.windows(2) {
        assert_eq!(reg.next(pair[0]).unwrap().map(|d| d.id), Some(pair[1]));
        assert_eq!(reg.previous(pair[1]).unwrap().map(|d| d.id), Some(pair[0]));
    }
}

#[test]
fn ends_of_the_journey_have_no_neighbour() {
    let reg = SceneRegistry::journey();
    assert_eq!(reg.previous(SceneId::Calibration), Ok(None));
    assert_eq!(reg.next(SceneId::Finale), Ok(None));
    assert_eq!(reg.first().map(|d| d.id), Some(SceneId::Calibration));
    assert_eq!(reg.last().map(|d| d.id), Some(SceneId::Finale));
}

#[test]
fn initialize_twice_does_not_duplicate() {
    let mut reg = SceneRegistry::new();
    assert!(reg.is_empty());
    reg.initialize();
    reg.initialize();
    assert_eq!(reg.len(), SceneId::ALL.len());
}

#[test]
fn unknown_scene_is_reported_not_defaulted() {
    let reg = registry_without(SceneId::Globe);
    assert!(!reg.contains(SceneId::Globe));
    assert_eq!(
        reg.get(SceneId::Globe).unwrap_err(),
        JourneyError::SceneNotFound(SceneId::Globe)
    );
    assert_eq!(
        reg.index_of(SceneId::Globe),
        Err(JourneyError::SceneNotFound(SceneId::Globe))
    );
    assert!(reg.next(SceneId::Globe).is_err());
    // Neighbours close the gap.
    assert_eq!(
        reg.next(SceneId::Galaxy).unwrap().map(|d| d.id),
        Some(SceneId::Constellation)
    );
}

#[test]
fn with_scenes_rejects_duplicates_and_empty_lists() {
    let mut scenes = journey_scenes();
    scenes.push(descriptor_for(SceneId::Hero));
    assert_eq!(
        SceneRegistry::with_scenes(scenes).unwrap_err(),
        JourneyError::DuplicateScene(SceneId::Hero)
    );
    assert_eq!(
        SceneRegistry::with_scenes(Vec::new()).unwrap_err(),
        JourneyError::EmptyJourney
    );
}

#[test]
fn progress_spans_zero_to_one() {
    let reg = SceneRegistry::journey();
    assert_eq!(reg.progress_of(SceneId::Calibration), Ok(0.0));
    assert_eq!(reg.progress_of(SceneId::Galaxy), Ok(2.0 / 8.0));
    assert_eq!(reg.progress_of(SceneId::Finale), Ok(1.0));

    let single = SceneRegistry::with_scenes(vec![descriptor_for(SceneId::Finale)]).unwrap();
    assert_eq!(single.progress_of(SceneId::Finale), Ok(1.0));
}

#[test]
fn descriptors_carry_their_audio() {
    let reg = SceneRegistry::journey();
    let calibration = reg.get(SceneId::Calibration).unwrap();
    assert_eq!(calibration.ambient_track, "intro_theme");
    assert_eq!(calibration.whisper_track, None);

    let galaxy = reg.get(SceneId::Galaxy).unwrap();
    assert_eq!(galaxy.ambient_track, "galaxy_wonder");
    assert_eq!(galaxy.whisper_track, Some("whisper_galaxy"));
    assert_eq!(galaxy.emotion, Emotion::Awe);

    let ambients: HashSet<_> = reg.iter().map(|d| d.ambient_track).collect();
    assert_eq!(ambients.len(), reg.len(), "ambient tracks should be distinct");
}

#[test]
fn scene_ids_parse_from_their_names() {
    for id in SceneId::ALL {
        assert_eq!(id.as_str().parse::<SceneId>(), Ok(id));
        assert_eq!(id.to_string(), id.as_str());
    }
    assert!("prologue".parse::<SceneId>().is_err());
}
