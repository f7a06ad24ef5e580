//! Asset Loader Tests
//!
//! Tests for:
//! - Container magic correction on packaged assets
//! - End-to-end load from memory and from the file system
//! - External `.bin` buffer resolution
//! - Failure paths: wrong magic, missing file, corrupt document, malformed
//!   keyframe data
//! - Animation targets resolved by node index
//! - AssetEvent broadcast for ready and failed loads

mod common;

use glam::Vec3;
use serde_json::json;

use vitrine::animation::AnimationSequencer;
use vitrine::assets::{AssetEvent, AssetLoader, MemoryAssetReader};
use vitrine::errors::VitrineError;
use vitrine::scene::{NodeHandle, NodeKind, Scene};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn memory_reader() -> MemoryAssetReader {
    MemoryAssetReader::new().with_file(common::ASSET_URI, common::packaged_box())
}

// ============================================================================
// Successful loads
// ============================================================================

#[tokio::test]
async fn load_attaches_single_root_named_after_file() {
    let loader = AssetLoader::new();
    let mut scene = Scene::new();

    let handle = loader
        .load(&memory_reader(), common::ASSET_URI, &mut scene)
        .await
        .unwrap();

    assert_eq!(scene.root_nodes, vec![handle.root()]);
    let root = scene.get_node(handle.root()).unwrap();
    assert_eq!(root.name, common::ASSET_URI);
    assert_eq!(handle.source(), common::ASSET_URI);

    let box_node = scene.find_node_by_name(handle.root(), "box").unwrap();
    assert_eq!(scene.get_node(box_node).unwrap().children().len(), 2);
    assert!(scene.find_node_by_name(handle.root(), "lid").is_some());
}

#[tokio::test]
async fn load_exposes_clips_in_file_order() {
    let loader = AssetLoader::new();
    let mut scene = Scene::new();

    let handle = loader
        .load(&memory_reader(), common::ASSET_URI, &mut scene)
        .await
        .unwrap();

    assert_eq!(handle.clip_names(), vec!["open_animation"]);
    let clip = handle.clip("open_animation").unwrap();
    assert!(approx(clip.duration, 1.0), "duration = {}", clip.duration);
    assert_eq!(clip.tracks.len(), 1);
    assert_eq!(clip.tracks[0].meta.node_name, "lid");
    assert_eq!(clip.tracks[0].meta.node_index, Some(1));
}

#[tokio::test]
async fn mesh_nodes_carry_bounds() {
    let loader = AssetLoader::new();
    let mut scene = Scene::new();
    let handle = loader
        .load(&memory_reader(), common::ASSET_URI, &mut scene)
        .await
        .unwrap();

    let jar = scene.find_node_by_name(handle.root(), "jar").unwrap();
    match &scene.get_node(jar).unwrap().kind {
        NodeKind::Mesh(bounds) => {
            assert_eq!(bounds.min, Vec3::new(-0.5, 0.0, -0.5));
            assert_eq!(bounds.max, Vec3::new(0.5, 1.0, 0.5));
        }
        other => panic!("expected mesh node, got {other:?}"),
    }
}

#[tokio::test]
async fn external_buffer_is_read_relative_to_asset() {
    let (glb, bin) = common::packaged_box_external();
    let reader = MemoryAssetReader::new()
        .with_file(common::ASSET_URI, glb)
        .with_file(common::BIN_URI, bin);

    let loader = AssetLoader::new();
    let mut scene = Scene::new();
    let handle = loader.load(&reader, common::ASSET_URI, &mut scene).await.unwrap();
    assert_eq!(handle.clip_names(), vec!["open_animation"]);
}

#[tokio::test]
async fn load_source_reads_from_file_system() {
    let dir = std::env::temp_dir().join(format!("vitrine-asset-{}", std::process::id()));
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let path = dir.join(common::ASSET_URI);
    tokio::fs::write(&path, common::packaged_box()).await.unwrap();

    let loader = AssetLoader::new();
    let mut scene = Scene::new();
    let handle = loader
        .load_source(path.to_str().unwrap(), &mut scene)
        .await
        .unwrap();
    assert_eq!(scene.get_node(handle.root()).unwrap().name, common::ASSET_URI);

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn canonical_header_is_rejected_and_scene_untouched() {
    let reader = MemoryAssetReader::new().with_file(common::ASSET_URI, common::canonical_box());
    let loader = AssetLoader::new();
    let mut scene = Scene::new();
    scene.create_node_with_name("existing");

    let err = loader.load(&reader, common::ASSET_URI, &mut scene).await.unwrap_err();
    assert!(matches!(err, VitrineError::Format(_)), "got {err:?}");
    assert!(err.is_load_failure());
    assert_eq!(scene.root_nodes.len(), 1);
    assert_eq!(scene.node_count(), 1);
}

#[tokio::test]
async fn corrupt_body_fails_parse_without_partial_attach() {
    let mut bytes = common::packaged_box();
    // Clobber the JSON chunk.
    for b in &mut bytes[20..60] {
        *b = b'#';
    }
    let reader = MemoryAssetReader::new().with_file(common::ASSET_URI, bytes);
    let loader = AssetLoader::new();
    let mut scene = Scene::new();

    let err = loader.load(&reader, common::ASSET_URI, &mut scene).await.unwrap_err();
    assert!(matches!(err, VitrineError::Parse(_)), "got {err:?}");
    assert_eq!(scene.node_count(), 0);
}

#[tokio::test]
async fn missing_file_is_a_load_error() {
    let loader = AssetLoader::new();
    let mut scene = Scene::new();
    let err = loader
        .load(&MemoryAssetReader::new(), "nowhere.glb", &mut scene)
        .await
        .unwrap_err();
    assert!(matches!(err, VitrineError::Load { .. }), "got {err:?}");
}

#[tokio::test]
async fn missing_external_buffer_fails_whole_load() {
    let (glb, _) = common::packaged_box_external();
    let reader = MemoryAssetReader::new().with_file(common::ASSET_URI, glb);
    let loader = AssetLoader::new();
    let mut scene = Scene::new();

    assert!(loader.load(&reader, common::ASSET_URI, &mut scene).await.is_err());
    assert_eq!(scene.node_count(), 0);
}

// ============================================================================
// Events
// ============================================================================

#[tokio::test]
async fn events_report_ready_and_failed() {
    let loader = AssetLoader::new();
    let events = loader.events();
    let mut scene = Scene::new();

    let handle = loader
        .load(&memory_reader(), common::ASSET_URI, &mut scene)
        .await
        .unwrap();
    assert_eq!(
        events.try_recv().unwrap(),
        AssetEvent::Ready {
            root: handle.root(),
            clips: vec!["open_animation".to_string()],
        }
    );

    let _ = loader
        .load(&MemoryAssetReader::new(), "gone.glb", &mut scene)
        .await;
    match events.try_recv().unwrap() {
        AssetEvent::Failed { source, reason } => {
            assert_eq!(source, "gone.glb");
            assert!(reason.contains("gone.glb"), "reason = {reason}");
        }
        other => panic!("expected failure event, got {other:?}"),
    }
    assert!(events.try_recv().is_err());
}

#[test]
fn parse_restores_header_before_decoding() {
    let gltf = AssetLoader::parse(common::packaged_box()).unwrap();
    assert_eq!(gltf.nodes().count(), 3);
    assert!(AssetLoader::parse(common::canonical_box()).is_err());
}

#[test]
fn fetch_prefab_runs_on_any_executor() {
    let prefab = futures::executor::block_on(AssetLoader::fetch_prefab(&memory_reader(), common::ASSET_URI)).unwrap();
    assert_eq!(prefab.nodes.len(), 3);
    assert_eq!(prefab.root_indices, vec![0]);
    assert_eq!(prefab.animations.len(), 1);
}

// ============================================================================
// Keyframe data
// ============================================================================

async fn load_altered(json: &serde_json::Value, bin: Vec<u8>, scene: &mut Scene) -> Result<vitrine::AssetHandle, VitrineError> {
    let reader = MemoryAssetReader::new().with_file("altered.glb", common::package(json, bin));
    AssetLoader::new().load(&reader, "altered.glb", scene).await
}

#[tokio::test]
async fn fewer_values_than_times_is_parse_error() {
    let (mut doc, bin) = common::box_parts();
    // Two keyframe times, one translation.
    doc["accessors"][1]["count"] = json!(1);

    let mut scene = Scene::new();
    let err = load_altered(&doc, bin, &mut scene).await.unwrap_err();

    assert!(matches!(err, VitrineError::Parse(_)), "got {err:?}");
    assert!(scene.root_nodes.is_empty());
    assert_eq!(scene.node_count(), 0);
}

#[tokio::test]
async fn decreasing_keyframe_times_is_parse_error() {
    let (doc, mut bin) = common::box_parts();
    bin[0..4].copy_from_slice(&1.0_f32.to_le_bytes());
    bin[4..8].copy_from_slice(&0.0_f32.to_le_bytes());

    let mut scene = Scene::new();
    let err = load_altered(&doc, bin, &mut scene).await.unwrap_err();

    assert!(matches!(err, VitrineError::Parse(_)), "got {err:?}");
    assert!(scene.root_nodes.is_empty());
}

#[tokio::test]
async fn clip_drives_indexed_node_when_names_repeat() {
    let (mut doc, bin) = common::box_parts();
    doc["scenes"] = json!([{ "nodes": [0, 1] }]);
    doc["nodes"] = json!([
        { "name": "Cube" },
        { "name": "Cube", "translation": [5.0, 0.0, 0.0] }
    ]);
    doc.as_object_mut().unwrap().remove("meshes");

    let mut scene = Scene::new();
    let handle = load_altered(&doc, bin, &mut scene).await.unwrap();
    let first = handle.node(0).unwrap();
    let second = handle.node(1).unwrap();

    let mut sequencer = AnimationSequencer::new();
    sequencer.attach(&handle, &scene);
    assert!(sequencer.play("open_animation", None));
    sequencer.tick(2.0, &mut scene);

    let position = |node: NodeHandle| scene.get_node(node).unwrap().transform.position;
    assert_eq!(position(first), Vec3::ZERO);
    assert!(position(second).abs_diff_eq(Vec3::Y, EPSILON), "got {}", position(second));
}
