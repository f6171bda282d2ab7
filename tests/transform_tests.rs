//! Transform Hierarchy Tests
//!
//! Tests for:
//! - Dirty flag: setters raise it, reading the local matrix clears it
//! - TRS composition order of the local matrix
//! - add_* variants composing with the current value
//! - World matrices composed root-to-leaf through a chain of parents

use std::f32::consts::FRAC_PI_2;

use arbor::math::{Matrix3, Matrix4, Vector3};
use arbor::scene::{Scene, Transform};

const EPSILON: f32 = 1e-5;

fn approx_vec(a: Vector3, b: Vector3) -> bool {
    a.equal_to(&b, EPSILON)
}

// ============================================================================
// Dirty flag
// ============================================================================

#[test]
fn new_transform_starts_dirty() {
    let mut transform = Transform::new();
    assert!(transform.needs_update());
    assert!(transform.local_matrix().is_identity(0.0));
    assert!(!transform.needs_update());
}

#[test]
fn setters_mark_dirty_and_read_clears() {
    let mut transform = Transform::new();
    let _ = transform.local_matrix();

    transform.set_position(Vector3::new(1.0, 0.0, 0.0));
    assert!(transform.needs_update());
    assert!(transform.cached_local_matrix().is_none());

    let _ = transform.local_matrix();
    assert!(!transform.needs_update());
    assert!(transform.cached_local_matrix().is_some());

    transform.add_scale(Vector3::splat(2.0));
    assert!(transform.needs_update());
}

#[test]
fn clean_read_returns_same_matrix() {
    let mut transform = Transform::new();
    transform.set_position(Vector3::new(4.0, 5.0, 6.0));
    let first = transform.local_matrix().clone();
    let second = transform.local_matrix().clone();
    assert_eq!(first, second);
}

// ============================================================================
// Local matrix
// ============================================================================

#[test]
fn local_matrix_is_translation_rotation_scale() {
    let rotation = Matrix3::rotation_y(0.4);
    let mut transform = Transform::new();
    transform.set_position(Vector3::new(1.0, 2.0, 3.0));
    transform.set_rotation(rotation.clone());
    transform.set_scale(Vector3::new(2.0, 3.0, 4.0));

    let expected = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0))
        .multiply(&Matrix4::from_rotation(&rotation))
        .multiply(&Matrix4::from_scale(Vector3::new(2.0, 3.0, 4.0)));
    assert!(transform.local_matrix().equal_to(&expected, EPSILON));
}

#[test]
fn scale_applies_before_translation() {
    let mut transform = Transform::new();
    transform.set_position(Vector3::new(10.0, 0.0, 0.0));
    transform.set_scale(Vector3::splat(2.0));
    let p = transform.local_matrix().transform_position(Vector3::new(1.0, 1.0, 1.0));
    assert!(approx_vec(p, Vector3::new(12.0, 2.0, 2.0)));
}

// ============================================================================
// add_* composition
// ============================================================================

#[test]
fn add_position_accumulates() {
    let mut transform = Transform::new();
    transform.add_position(Vector3::new(1.0, 2.0, 3.0));
    transform.add_position(Vector3::new(1.0, 2.0, 3.0));
    assert_eq!(transform.position(), Vector3::new(2.0, 4.0, 6.0));
}

#[test]
fn add_scale_multiplies_componentwise() {
    let mut transform = Transform::new();
    transform.set_scale(Vector3::new(2.0, 3.0, 4.0));
    transform.add_scale(Vector3::new(0.5, 2.0, 1.0));
    assert_eq!(transform.scale(), Vector3::new(1.0, 6.0, 4.0));
}

#[test]
fn add_rotation_applies_delta_in_local_space_first() {
    let mut transform = Transform::new();
    transform.set_rotation(Matrix3::rotation_z(FRAC_PI_2));
    transform.add_rotation(&Matrix3::rotation_x(FRAC_PI_2));

    // X about local X stays X, then the existing Z turn maps it to Y.
    let mapped = transform.rotation().transform(Vector3::X);
    assert!(approx_vec(mapped, Vector3::Y));
    // Y turns to Z about local X; Z is unchanged by the Z turn.
    let mapped = transform.rotation().transform(Vector3::Y);
    assert!(approx_vec(mapped, Vector3::Z));
}

// ============================================================================
// World matrices
// ============================================================================

#[test]
fn world_matrix_composes_chain_root_to_leaf() {
    let mut scene = Scene::new();
    let a = scene.create_group("A");
    let b = scene.create_group("B");
    let c = scene.create_group("C");
    scene.add_to_root(a).unwrap();
    scene.add(a, b).unwrap();
    scene.add(b, c).unwrap();
    for handle in [a, b, c] {
        scene
            .entity_mut(handle)
            .unwrap()
            .set_position(Vector3::new(1.0, 2.0, 3.0))
            .unwrap();
    }

    let origin = Vector3::ZERO;
    let world = |scene: &mut Scene, h| scene.world_matrix(h).unwrap().transform_position(origin);
    assert!(approx_vec(world(&mut scene, c), Vector3::new(3.0, 6.0, 9.0)));
    assert!(approx_vec(world(&mut scene, b), Vector3::new(2.0, 4.0, 6.0)));
    assert!(approx_vec(world(&mut scene, a), Vector3::new(1.0, 2.0, 3.0)));
}

#[test]
fn world_matrix_applies_parent_rotation_to_child_offset() {
    let mut scene = Scene::new();
    let parent = scene.create_group("parent");
    let child = scene.create_group("child");
    scene.add_to_root(parent).unwrap();
    scene.add(parent, child).unwrap();

    scene
        .entity_mut(parent)
        .unwrap()
        .set_rotation(Matrix3::rotation_z(FRAC_PI_2))
        .unwrap();
    scene
        .entity_mut(child)
        .unwrap()
        .set_position(Vector3::new(1.0, 0.0, 0.0))
        .unwrap();

    let p = scene.world_matrix(child).unwrap().transform_position(Vector3::ZERO);
    assert!(approx_vec(p, Vector3::new(0.0, 1.0, 0.0)));
}

#[test]
fn world_matrix_reflects_later_parent_change() {
    let mut scene = Scene::new();
    let parent = scene.create_group("parent");
    let child = scene.create_group("child");
    scene.add_to_root(parent).unwrap();
    scene.add(parent, child).unwrap();

    let _ = scene.world_matrix(child).unwrap();
    scene
        .entity_mut(parent)
        .unwrap()
        .set_position(Vector3::new(0.0, 0.0, -5.0))
        .unwrap();

    let p = scene.world_matrix(child).unwrap().translation();
    assert!(approx_vec(p, Vector3::new(0.0, 0.0, -5.0)));
}
