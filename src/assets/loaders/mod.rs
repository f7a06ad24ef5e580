pub mod gltf;

pub use gltf::{GltfLoader, load_buffers};
