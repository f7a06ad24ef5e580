//! Proxy Region Tests
//!
//! Tests for:
//! - Spawning: missing scene, invalid dimensions, opacity range
//! - Hide/show and pickability
//! - Opacity pulse curve
//! - Click detection by node name and listener replacement
//! - RegionManager name lookup

use std::cell::Cell;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};
use std::rc::Rc;

use glam::Vec3;

use vitrine::errors::VitrineError;
use vitrine::interaction::proxy::{PULSE_AMPLITUDE, pulse_opacity};
use vitrine::interaction::{ProxyRegion, RegionDesc, RegionManager};
use vitrine::scene::{Ray, Scene, Shape};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn jar_shape() -> Shape {
    Shape::Cylinder {
        radius_top: 0.35,
        radius_bottom: 0.35,
        height: 0.55,
    }
}

/// Ray from +Z straight at the origin.
fn ray_at_origin() -> Ray {
    Ray::new(Vec3::new(0.0, 0.0, 10.0), -Vec3::Z)
}

fn counter() -> (Rc<Cell<u32>>, impl FnMut() + 'static) {
    let count = Rc::new(Cell::new(0));
    let c = Rc::clone(&count);
    (count, move || c.set(c.get() + 1))
}

// ============================================================================
// Spawning
// ============================================================================

#[test]
fn spawn_without_scene_is_config_error() {
    let desc = RegionDesc::new("cream01Proxy", jar_shape(), Vec3::ZERO);
    let err = ProxyRegion::spawn(None, &desc).err().unwrap();
    assert!(matches!(err, VitrineError::Config(_)), "got {err:?}");
}

#[test]
fn spawn_rejects_invalid_dimensions() {
    let mut scene = Scene::new();
    let desc = RegionDesc::new(
        "flat",
        Shape::Cylinder {
            radius_top: 0.3,
            radius_bottom: 0.3,
            height: 0.0,
        },
        Vec3::ZERO,
    );
    assert!(matches!(
        ProxyRegion::spawn(Some(&mut scene), &desc),
        Err(VitrineError::Config(_))
    ));
    assert_eq!(scene.node_count(), 0);
}

#[test]
fn spawn_rejects_out_of_range_opacity() {
    let mut scene = Scene::new();
    let mut desc = RegionDesc::new("r", jar_shape(), Vec3::ZERO);
    desc.opacity = 1.5;
    assert!(ProxyRegion::spawn(Some(&mut scene), &desc).is_err());
}

#[test]
fn spawn_places_transparent_volume() {
    let mut scene = Scene::new();
    let mut desc = RegionDesc::new("cream01Proxy", jar_shape(), Vec3::new(0.38, 0.38, -0.33));
    desc.rotation = Vec3::new(0.0, 0.0, FRAC_PI_2);
    let region = ProxyRegion::spawn(Some(&mut scene), &desc).unwrap();

    let node = scene.get_node(region.node()).unwrap();
    assert_eq!(node.name, "cream01Proxy");
    assert_eq!(node.transform.position, Vec3::new(0.38, 0.38, -0.33));
    assert!(approx(node.transform.rotation_euler().z, FRAC_PI_2));

    let material = node.volume_material().unwrap();
    assert!(approx(material.opacity, 0.0));
    assert!(material.transparent);
    assert!(region.is_visible(&scene));
    assert!(region.is_pickable(&scene));
}

#[test]
fn spawn_hidden_region() {
    let mut scene = Scene::new();
    let mut desc = RegionDesc::new("r", jar_shape(), Vec3::ZERO);
    desc.hidden = true;
    let region = ProxyRegion::spawn(Some(&mut scene), &desc).unwrap();
    assert!(!region.is_visible(&scene));
    assert!(!region.is_pickable(&scene));
}

// ============================================================================
// Hide / Show
// ============================================================================

#[test]
fn transparent_region_is_hit_until_hidden() {
    let mut scene = Scene::new();
    let mut region = ProxyRegion::spawn(Some(&mut scene), &RegionDesc::new("r", jar_shape(), Vec3::ZERO)).unwrap();

    assert!(scene.raycast_all(&ray_at_origin()).is_some(), "opacity 0 is still hittable");

    region.hide(&mut scene);
    assert!(scene.raycast_all(&ray_at_origin()).is_none());
    assert!(
        scene.raycast(&ray_at_origin(), &[region.node()]).is_none(),
        "hidden region is skipped even when targeted directly"
    );

    region.show(&mut scene);
    let hit = scene.raycast_all(&ray_at_origin()).unwrap();
    assert_eq!(hit.node, region.node());
    assert!((hit.distance - (10.0 - 0.35)).abs() < 1e-3, "distance = {}", hit.distance);
}

#[test]
fn set_rotation_changes_hit_profile() {
    let mut scene = Scene::new();
    let shape = Shape::Cylinder {
        radius_top: 0.1,
        radius_bottom: 0.1,
        height: 2.0,
    };
    let mut region = ProxyRegion::spawn(Some(&mut scene), &RegionDesc::new("r", shape, Vec3::ZERO)).unwrap();

    // Upright thin cylinder: a ray at y = 0, x = 0.8 misses.
    let ray = Ray::new(Vec3::new(0.8, 0.0, 10.0), -Vec3::Z);
    assert!(scene.raycast_all(&ray).is_none());

    // Lying along X, the same ray passes through its side.
    region.set_rotation(&mut scene, 0.0, 0.0, FRAC_PI_2);
    assert!(scene.raycast_all(&ray).is_some());
}

// ============================================================================
// Pulse
// ============================================================================

#[test]
fn pulse_curve_values() {
    assert!(approx(pulse_opacity(0.0), 0.0));
    assert!(approx(pulse_opacity(FRAC_PI_4), PULSE_AMPLITUDE));
    assert!(approx(pulse_opacity(FRAC_PI_2), 0.0));
    // Absolute value: never negative
    assert!(approx(pulse_opacity(3.0 * FRAC_PI_4), PULSE_AMPLITUDE));
    for i in 0..100 {
        let v = pulse_opacity(i as f32 * 0.07);
        assert!((0.0..=PULSE_AMPLITUDE + EPSILON).contains(&v));
    }
}

#[test]
fn pulse_drives_material_opacity() {
    let mut scene = Scene::new();
    let mut region = ProxyRegion::spawn(Some(&mut scene), &RegionDesc::new("r", jar_shape(), Vec3::ZERO)).unwrap();

    region.update(1.0, &mut scene);
    assert!(approx(region.opacity(&scene).unwrap(), 0.0), "not pulsing yet");

    region.set_opacity_pulse(true);
    region.update(FRAC_PI_4, &mut scene);
    assert!(approx(region.opacity(&scene).unwrap(), PULSE_AMPLITUDE));

    region.set_opacity_pulse(false);
    region.update(PI, &mut scene);
    assert!(approx(region.opacity(&scene).unwrap(), PULSE_AMPLITUDE), "frozen when stopped");
}

// ============================================================================
// Detection
// ============================================================================

#[test]
fn detection_fires_only_for_matching_name() {
    let mut scene = Scene::new();
    let mut region =
        ProxyRegion::spawn(Some(&mut scene), &RegionDesc::new("cap01Proxy", jar_shape(), Vec3::ZERO)).unwrap();

    let (count, callback) = counter();
    region.proxy_detection("someOtherName", callback);
    assert!(!region.handle_click(&scene, &ray_at_origin()));
    assert_eq!(count.get(), 0);

    let (count, callback) = counter();
    region.proxy_detection("cap01Proxy", callback);
    assert!(region.handle_click(&scene, &ray_at_origin()));
    assert_eq!(count.get(), 1);
}

#[test]
fn detection_replaces_previous_callback() {
    let mut scene = Scene::new();
    let mut region = ProxyRegion::spawn(Some(&mut scene), &RegionDesc::new("r", jar_shape(), Vec3::ZERO)).unwrap();

    let (first, first_cb) = counter();
    let (second, second_cb) = counter();
    region.proxy_detection("r", first_cb);
    region.proxy_detection("r", second_cb);

    region.handle_click(&scene, &ray_at_origin());
    assert_eq!(first.get(), 0);
    assert_eq!(second.get(), 1);
}

#[test]
fn hidden_region_does_not_fire() {
    let mut scene = Scene::new();
    let mut region = ProxyRegion::spawn(Some(&mut scene), &RegionDesc::new("r", jar_shape(), Vec3::ZERO)).unwrap();
    let (count, callback) = counter();
    region.proxy_detection("r", callback);

    region.hide(&mut scene);
    assert!(!region.handle_click(&scene, &ray_at_origin()));
    assert_eq!(count.get(), 0);
    assert!(region.has_listener());
}

// ============================================================================
// RegionManager
// ============================================================================

#[test]
fn manager_rejects_duplicates_and_ignores_unknown_names() {
    let mut scene = Scene::new();
    let mut manager = RegionManager::new();
    manager.add(&mut scene, &RegionDesc::new("a", jar_shape(), Vec3::ZERO)).unwrap();

    assert!(matches!(
        manager.add(&mut scene, &RegionDesc::new("a", jar_shape(), Vec3::ONE)),
        Err(VitrineError::Config(_))
    ));
    assert!(!manager.show(&mut scene, "ghost"));
    assert!(!manager.hide(&mut scene, "ghost"));
    assert!(!manager.set_opacity_pulse("ghost", true));
    assert!(!manager.proxy_detection("ghost", || {}));
    assert_eq!(manager.len(), 1);
}

#[test]
fn manager_click_reports_fired_regions() {
    let mut scene = Scene::new();
    let mut manager = RegionManager::new();
    manager.add(&mut scene, &RegionDesc::new("near", jar_shape(), Vec3::ZERO)).unwrap();
    manager
        .add(&mut scene, &RegionDesc::new("far", jar_shape(), Vec3::new(5.0, 0.0, 0.0)))
        .unwrap();

    let (near_count, near_cb) = counter();
    let (far_count, far_cb) = counter();
    manager.proxy_detection("near", near_cb);
    manager.proxy_detection("far", far_cb);
    assert_eq!(manager.listener_count(), 2);

    assert_eq!(manager.handle_click(&scene, &ray_at_origin()), vec!["near"]);
    assert_eq!(near_count.get(), 1);
    assert_eq!(far_count.get(), 0);
}

#[test]
fn manager_update_all_pulses_enabled_regions() {
    let mut scene = Scene::new();
    let mut manager = RegionManager::new();
    manager.add(&mut scene, &RegionDesc::new("a", jar_shape(), Vec3::ZERO)).unwrap();
    manager.add(&mut scene, &RegionDesc::new("b", jar_shape(), Vec3::X)).unwrap();

    manager.set_opacity_pulse("a", true);
    manager.update_all(FRAC_PI_4, &mut scene);

    assert!(approx(manager.get("a").unwrap().opacity(&scene).unwrap(), PULSE_AMPLITUDE));
    assert!(approx(manager.get("b").unwrap().opacity(&scene).unwrap(), 0.0));
}
