//! Asset loading.
//!
//! - `io`: byte sources (file system, HTTP, memory)
//! - `container`: magic-byte correction of distributed assets
//! - `loaders`: glTF decoding into a [`Prefab`]
//! - `loader`: the end-to-end pipeline and its event channel

pub mod container;
pub mod handle;
pub mod io;
pub mod loader;
pub mod loaders;
pub mod prefab;

pub use handle::AssetHandle;
#[cfg(feature = "http")]
pub use io::HttpAssetReader;
pub use io::{AssetReader, AssetReaderVariant, FileAssetReader, MemoryAssetReader};
pub use loader::{AssetEvent, AssetLoader};
pub use loaders::GltfLoader;
pub use prefab::{Prefab, PrefabInstance, PrefabNode};
