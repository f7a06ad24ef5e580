//! Asset loading pipeline.
//!
//! fetch -> restore container magic -> parse -> resolve buffers -> decode to
//! [`Prefab`] -> instantiate. Every step up to instantiation works on owned
//! data only; the scene is touched exactly once, after everything else has
//! succeeded.

use crate::assets::container;
use crate::assets::handle::AssetHandle;
use crate::assets::io::{AssetReader, AssetReaderVariant};
use crate::assets::loaders::{GltfLoader, load_buffers};
use crate::assets::prefab::Prefab;
use crate::errors::Result;
use crate::scene::{NodeHandle, Scene};

/// Outcome notifications for listeners that do not await the load.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetEvent {
    Ready { root: NodeHandle, clips: Vec<String> },
    Failed { source: String, reason: String },
}

/// Loads exhibit assets and broadcasts the outcome on a channel.
pub struct AssetLoader {
    event_tx: flume::Sender<AssetEvent>,
    event_rx: flume::Receiver<AssetEvent>,
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetLoader {
    #[must_use]
    pub fn new() -> Self {
        let (event_tx, event_rx) = flume::unbounded();
        Self { event_tx, event_rx }
    }

    /// A receiver for load outcomes. Every clone sees each event at most once.
    #[must_use]
    pub fn events(&self) -> flume::Receiver<AssetEvent> {
        self.event_rx.clone()
    }

    /// Restores the container header and parses the document.
    pub fn parse(mut bytes: Vec<u8>) -> Result<gltf::Gltf> {
        container::restore_magic(&mut bytes)?;
        Ok(gltf::Gltf::from_slice(&bytes)?)
    }

    /// Fetches and decodes `uri` without touching any scene.
    pub async fn fetch_prefab<R: AssetReader>(reader: &R, uri: &str) -> Result<Prefab> {
        let bytes = reader.read_bytes(uri).await?;
        let gltf = Self::parse(bytes)?;
        let buffers = load_buffers(&gltf, reader).await?;
        GltfLoader::new(&gltf, &buffers).decode()
    }

    /// Loads `uri` through `reader` and attaches it to `scene`.
    ///
    /// On failure the scene is left untouched and an [`AssetEvent::Failed`]
    /// is emitted alongside the returned error.
    pub async fn load<R: AssetReader>(&self, reader: &R, uri: &str, scene: &mut Scene) -> Result<AssetHandle> {
        log::info!("Loading asset '{uri}'");
        match Self::fetch_prefab(reader, uri).await {
            Ok(prefab) => Ok(self.install(&prefab, uri, scene)),
            Err(err) => {
                log::error!("Failed to load '{uri}': {err}");
                self.emit(AssetEvent::Failed {
                    source: uri.to_string(),
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Loads from a path or URL, choosing the reader from the source string.
    pub async fn load_source(&self, source: &str, scene: &mut Scene) -> Result<AssetHandle> {
        let reader = match AssetReaderVariant::from_source(source) {
            Ok(reader) => reader,
            Err(err) => {
                self.emit(AssetEvent::Failed {
                    source: source.to_string(),
                    reason: err.to_string(),
                });
                return Err(err);
            }
        };
        let file_name = AssetReaderVariant::source_filename(source);
        self.load(&reader, file_name, scene).await
    }

    /// Instantiates an already decoded prefab.
    pub fn install(&self, prefab: &Prefab, source: &str, scene: &mut Scene) -> AssetHandle {
        let root_name = AssetReaderVariant::source_filename(source);
        let instance = prefab.instantiate(scene, root_name);
        let root = instance.root;
        let handle = AssetHandle::new(root, prefab.animations.clone(), source).with_nodes(instance.nodes);

        log::info!(
            "Asset '{source}' ready: {} node(s), clips {:?}",
            prefab.nodes.len(),
            handle.clip_names()
        );
        self.emit(AssetEvent::Ready {
            root,
            clips: handle.clip_names(),
        });
        handle
    }

    fn emit(&self, event: AssetEvent) {
        // The loader owns a receiver, so the channel never disconnects.
        let _ = self.event_tx.send(event);
    }
}
