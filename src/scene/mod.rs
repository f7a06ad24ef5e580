//! Scene graph module.
//!
//! - Node: scene node with parent/child links, transform and payload
//! - Transform: TRS with cached matrices
//! - Scene: node arena, sprite/volume constructors and ray queries
//! - Camera: projection and picking-ray construction
//! - CameraRig: smooth orbit-target re-focusing
//! - Shape / raycast: analytic hit volumes

pub mod camera;
pub mod camera_rig;
pub mod node;
pub mod raycast;
pub mod scene;
pub mod shape;
pub mod transform;

pub use camera::{Camera, ProjectionType};
pub use camera_rig::CameraRig;
pub use node::{MeshBounds, Node, NodeKind, Sprite, Volume, VolumeMaterial};
pub use raycast::{Hit, Ray};
pub use scene::Scene;
pub use shape::Shape;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct CameraKey;
}
