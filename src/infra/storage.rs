//! Filesystem-backed media store for the image library.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use url::Url;

use crate::application::repos::{MediaStore, MediaStoreError};

/// All library objects live under this key prefix, mirroring the layout the
/// site has always used for blog media.
pub const LIBRARY_PREFIX: &str = "st_blog/library";

/// Media store rooted at a local directory, with download URLs resolved
/// against the public site address.
pub struct FsMediaStore {
    root: PathBuf,
    public_base: Url,
}

impl FsMediaStore {
    /// Initialise storage rooted at the provided directory, creating the
    /// library prefix if necessary.
    pub fn new(root: PathBuf, public_base: Url) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(root.join(LIBRARY_PREFIX))?;
        Ok(Self { root, public_base })
    }

    fn resolve(&self, filename: &str) -> Result<PathBuf, MediaStoreError> {
        let relative = Path::new(filename);
        if relative.is_absolute()
            || relative.components().any(|component| {
                matches!(component, Component::ParentDir | Component::Prefix(_))
            })
        {
            return Err(MediaStoreError::InvalidKey);
        }

        Ok(self.root.join(LIBRARY_PREFIX).join(relative))
    }
}

#[async_trait]
impl MediaStore for FsMediaStore {
    async fn put(&self, filename: &str, bytes: Bytes) -> Result<(), MediaStoreError> {
        let absolute = self.resolve(filename)?;
        if let Some(parent) = absolute.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|err| MediaStoreError::Io(err.to_string()))?;
        }

        fs::write(&absolute, &bytes)
            .await
            .map_err(|err| MediaStoreError::Io(err.to_string()))
    }

    async fn read(&self, filename: &str) -> Result<Bytes, MediaStoreError> {
        let absolute = self.resolve(filename)?;
        match fs::read(&absolute).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(MediaStoreError::NotFound)
            }
            Err(err) => Err(MediaStoreError::Io(err.to_string())),
        }
    }

    async fn delete(&self, filename: &str) -> Result<(), MediaStoreError> {
        let absolute = self.resolve(filename)?;
        match fs::remove_file(&absolute).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(MediaStoreError::NotFound)
            }
            Err(err) => Err(MediaStoreError::Io(err.to_string())),
        }
    }

    fn download_url(&self, filename: &str) -> String {
        let mut url = self.public_base.clone();
        {
            let mut segments = url.path_segments_mut().expect("http base url has path segments");
            segments.pop_if_empty().push("media");
            for part in LIBRARY_PREFIX.split('/') {
                segments.push(part);
            }
            segments.push(filename);
        }
        url.to_string()
    }
}
