use atelier_master::{
    LayerInfo, LayerKind, LayerStack, ProjectStatus, ProjectStore, BASE_LAYER_NAME,
};
use uuid::Uuid;

#[test]
fn test_samples_match_the_studio_catalog() {
    let store = ProjectStore::with_samples();
    let titles: Vec<&str> = store
        .projects()
        .iter()
        .map(|project| project.title.as_str())
        .collect();
    assert_eq!(
        titles,
        ["Autumn Gala Gown", "Avant-Garde Structure", "Minimalist Silk Set"]
    );

    let gown = &store.projects()[0];
    assert_eq!(gown.status, ProjectStatus::ReadyForPolish);
    assert_eq!(gown.layers.len(), 2);
    assert_eq!(gown.layers[1].kind, LayerKind::AiPolish);
    assert!(!gown.layers[1].visible);

    let silk = &store.projects()[2];
    assert_eq!(silk.status, ProjectStatus::Polished);
}

#[test]
fn test_create_makes_a_draft_with_the_base_layer() {
    let mut store = ProjectStore::new();
    let id = store.create("Runway Cape");

    let project = store.find(id).unwrap();
    assert_eq!(project.title, "Runway Cape");
    assert_eq!(project.status, ProjectStatus::Draft);
    assert_eq!(project.layers.len(), 1);
    assert_eq!(project.layers[0].name, BASE_LAYER_NAME);
    assert_eq!(project.last_synced, "just now");
}

#[test]
fn test_blank_titles_fall_back_to_untitled_numbering() {
    let mut store = ProjectStore::new();
    let first = store.create("");
    let second = store.create("   ");

    assert_eq!(store.find(first).unwrap().title, "Untitled-1");
    assert_eq!(store.find(second).unwrap().title, "Untitled-2");
}

#[test]
fn test_refresh_sync_stamps_just_now() {
    let mut store = ProjectStore::with_samples();
    let id = store.projects()[0].id;

    assert!(store.refresh_sync(id));
    assert_eq!(store.find(id).unwrap().last_synced, "just now");

    // Unknown ids are reported, not fatal.
    assert!(!store.refresh_sync(Uuid::new_v4()));
}

#[test]
fn test_set_thumbnail_promotes_a_draft_to_ready() {
    let mut store = ProjectStore::new();
    let id = store.create("Cape");

    assert!(store.set_thumbnail(id, "data:image/png;base64,xyz"));
    let project = store.find(id).unwrap();
    assert_eq!(project.image_url, "data:image/png;base64,xyz");
    assert_eq!(project.status, ProjectStatus::ReadyForPolish);
}

#[test]
fn test_set_thumbnail_never_demotes_a_polished_project() {
    let mut store = ProjectStore::new();
    let id = store.create("Cape");
    store.find_mut(id).unwrap().status = ProjectStatus::Polished;

    assert!(store.set_thumbnail(id, "data:image/png;base64,xyz"));
    assert_eq!(store.find(id).unwrap().status, ProjectStatus::Polished);
}

#[test]
fn test_json_snapshot_round_trips() {
    let store = ProjectStore::with_samples();
    let json = store.to_json().unwrap();
    assert!(json.contains("\"Ready for Polish\""));
    assert!(json.contains("\"ai-polish\""));

    let restored = ProjectStore::from_json(&json).unwrap();
    assert_eq!(restored.projects().len(), 3);
    assert_eq!(restored.projects()[2].status, ProjectStatus::Polished);
    assert_eq!(restored.projects()[0].title, "Autumn Gala Gown");
}

#[test]
fn test_layer_infos_project_from_a_live_stack() {
    let mut stack = LayerStack::new(4, 4);
    let top = stack.add_layer_named("Silk Rendering", LayerKind::AiPolish);
    stack.toggle_visible(top).unwrap();

    let infos: Vec<LayerInfo> = stack.layers().iter().map(LayerInfo::from_layer).collect();
    assert_eq!(infos[0].name, BASE_LAYER_NAME);
    assert!(infos[0].visible);
    assert_eq!(infos[1].name, "Silk Rendering");
    assert!(!infos[1].visible);
    assert_eq!(infos[1].kind, LayerKind::AiPolish);
}
