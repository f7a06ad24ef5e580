use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::{Result, VitrineError};

/// Asynchronous byte source for assets and their external buffers.
pub trait AssetReader: Send + Sync {
    /// Reads the resource at `uri`, relative to the reader's root.
    fn read_bytes(&self, uri: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

/// Reads from the local file system.
pub struct FileAssetReader {
    root_path: PathBuf,
}

impl FileAssetReader {
    /// `path` may be a directory or a file; for a file its parent becomes the
    /// root.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let root_path = if path.is_file() {
            path.parent().unwrap_or(Path::new(".")).to_path_buf()
        } else {
            path.to_path_buf()
        };
        Self { root_path }
    }

    #[inline]
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }
}

impl AssetReader for FileAssetReader {
    async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        let path = self.root_path.join(uri);
        tokio::fs::read(&path)
            .await
            .map_err(|e| VitrineError::load(path.display().to_string(), e.to_string()))
    }
}

/// Reads over HTTP(S). No retry and no timeout are applied.
#[cfg(feature = "http")]
pub struct HttpAssetReader {
    root_url: url::Url,
}

#[cfg(feature = "http")]
impl HttpAssetReader {
    pub fn new(url_str: &str) -> Result<Self> {
        let url = url::Url::parse(url_str)?;
        let root_url = if url.path().ends_with('/') {
            url
        } else {
            let mut u = url.clone();
            if let Ok(mut segments) = u.path_segments_mut() {
                segments.pop();
                segments.push("");
            }
            u
        };
        Ok(Self { root_url })
    }

    #[inline]
    #[must_use]
    pub fn root_url(&self) -> &url::Url {
        &self.root_url
    }
}

#[cfg(feature = "http")]
impl AssetReader for HttpAssetReader {
    async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        let url = self.root_url.join(uri)?;
        let request = ehttp::Request::get(url.as_str());
        let response = ehttp::fetch_async(request)
            .await
            .map_err(|reason| VitrineError::load(url.as_str(), reason))?;
        if !response.ok {
            return Err(VitrineError::HttpResponse {
                status: response.status,
            });
        }
        Ok(response.bytes)
    }
}

/// Reader chosen from a source string, avoiding a trait object.
#[derive(Clone)]
pub enum AssetReaderVariant {
    File(Arc<FileAssetReader>),
    #[cfg(feature = "http")]
    Http(Arc<HttpAssetReader>),
}

impl AssetReaderVariant {
    /// `http://` and `https://` sources use HTTP, anything else the file
    /// system.
    pub fn from_source(source: &str) -> Result<Self> {
        if is_remote(source) {
            #[cfg(feature = "http")]
            {
                Ok(Self::Http(Arc::new(HttpAssetReader::new(source)?)))
            }
            #[cfg(not(feature = "http"))]
            {
                Err(VitrineError::Config(
                    "HTTP feature is not enabled. Enable it with `features = [\"http\"]`".into(),
                ))
            }
        } else {
            Ok(Self::File(Arc::new(FileAssetReader::new(source))))
        }
    }

    pub async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        match self {
            Self::File(r) => r.read_bytes(uri).await,
            #[cfg(feature = "http")]
            Self::Http(r) => r.read_bytes(uri).await,
        }
    }

    /// File-name part of a path or URL.
    #[must_use]
    pub fn source_filename(source: &str) -> &str {
        if is_remote(source) {
            source.rsplit('/').next().unwrap_or(source)
        } else {
            Path::new(source)
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or(source)
        }
    }
}

impl AssetReader for AssetReaderVariant {
    async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        AssetReaderVariant::read_bytes(self, uri).await
    }
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// In-memory reader keyed by URI. Handy for tests and embedded assets.
#[derive(Default, Clone)]
pub struct MemoryAssetReader {
    files: rustc_hash::FxHashMap<String, Arc<[u8]>>,
}

impl MemoryAssetReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_file(mut self, uri: &str, bytes: impl Into<Arc<[u8]>>) -> Self {
        self.files.insert(uri.to_string(), bytes.into());
        self
    }
}

impl AssetReader for MemoryAssetReader {
    async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        self.files
            .get(uri)
            .map(|b| b.to_vec())
            .ok_or_else(|| VitrineError::load(uri, "not found"))
    }
}
