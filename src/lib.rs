#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod animation;
pub mod assets;
pub mod choreography;
pub mod config;
pub mod errors;
pub mod exhibit;
pub mod interaction;
pub mod scene;
pub mod utils;

pub use animation::{AnimationAction, AnimationClip, AnimationMixer, AnimationSequencer, Binder};
pub use assets::{AssetEvent, AssetHandle, AssetLoader, AssetReader, AssetReaderVariant, FileAssetReader, MemoryAssetReader};
pub use choreography::{Action, ChoreographyScript, Choreographer, TimedAction, Transition, Trigger};
pub use config::{CameraConfig, ExhibitConfig};
pub use errors::{Result, VitrineError};
pub use exhibit::Exhibit;
pub use interaction::{AnnotationDesc, AnnotationManager, ProxyRegion, RegionDesc, RegionManager};
pub use scene::{Camera, CameraRig, Node, NodeHandle, Scene, Shape};
pub use utils::interner;
