//! Exhibit configuration.
//!
//! An [`ExhibitConfig`] describes everything an exhibit needs besides the
//! asset bytes: where the asset lives, the camera, the hotspots and the
//! narrative. It round-trips through JSON.
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrine::ExhibitConfig;
//!
//! // The built-in unboxing narrative with a different asset
//! let config = ExhibitConfig {
//!     asset: "/model/another_box.glb".into(),
//!     ..ExhibitConfig::unboxing()
//! };
//! ```

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::choreography::script::{CAP_PROXY, CREAM_PROXY, CREAM_PROXY_ROTATION, ChoreographyScript};
use crate::errors::Result;
use crate::interaction::annotation::{AnnotationDesc, DEFAULT_ANNOTATION_SIZE};
use crate::interaction::proxy::{DEFAULT_REGION_COLOR, RegionDesc};
use crate::scene::Shape;

/// Perspective camera placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    /// Initial orbit target.
    pub target: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(-3.0, 3.0, 3.0),
            target: Vec3::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExhibitConfig {
    /// Path or `http(s)://` URL of the packaged asset.
    pub asset: String,

    /// Initial viewport size in pixels.
    pub viewport: [u32; 2],

    pub camera: CameraConfig,

    pub annotations: Vec<AnnotationDesc>,

    pub regions: Vec<RegionDesc>,

    pub script: ChoreographyScript,
}

impl Default for ExhibitConfig {
    fn default() -> Self {
        Self {
            asset: String::new(),
            viewport: [1280, 720],
            camera: CameraConfig::default(),
            annotations: Vec::new(),
            regions: Vec::new(),
            script: ChoreographyScript::default(),
        }
    }
}

impl ExhibitConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn default_annotations() -> Vec<AnnotationDesc> {
        vec![
            AnnotationDesc {
                name: "open".into(),
                position: Vec3::new(0.0, 1.5, 0.0),
                icon: "/icon/unboxing.png".into(),
                width: DEFAULT_ANNOTATION_SIZE,
                height: DEFAULT_ANNOTATION_SIZE,
                visible: true,
            },
            AnnotationDesc {
                name: "close".into(),
                position: Vec3::new(3.0, 2.0, 0.0),
                icon: "/icon/box.png".into(),
                width: DEFAULT_ANNOTATION_SIZE,
                height: DEFAULT_ANNOTATION_SIZE,
                visible: false,
            },
        ]
    }

    /// Open and close the cardboard box.
    #[must_use]
    pub fn open_close() -> Self {
        Self {
            asset: "/model/cardboard_box_5_2.glb".into(),
            annotations: Self::default_annotations(),
            script: ChoreographyScript::open_close(),
            ..Self::default()
        }
    }

    /// Full unboxing narrative with the cream jar and cap regions.
    #[must_use]
    pub fn unboxing() -> Self {
        let cream = RegionDesc {
            name: CREAM_PROXY.into(),
            shape: Shape::Cylinder {
                radius_top: 0.35,
                radius_bottom: 0.35,
                height: 0.55,
            },
            position: Vec3::new(0.38, 0.38, -0.33),
            rotation: CREAM_PROXY_ROTATION,
            opacity: 0.0,
            color: DEFAULT_REGION_COLOR,
            hidden: true,
        };
        let cap = RegionDesc {
            name: CAP_PROXY.into(),
            shape: Shape::Cylinder {
                radius_top: 0.35,
                radius_bottom: 0.35,
                height: 0.23,
            },
            position: Vec3::new(0.125, 2.34, 0.006),
            rotation: Vec3::ZERO,
            opacity: 0.0,
            color: DEFAULT_REGION_COLOR,
            hidden: true,
        };

        Self {
            asset: "/model/cardboard_box_5_2.glb".into(),
            annotations: Self::default_annotations(),
            regions: vec![cream, cap],
            script: ChoreographyScript::unboxing(),
            ..Self::default()
        }
    }
}
