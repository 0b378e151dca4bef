// src/services/media_store.rs
// DOCUMENTATION: Hierarchical media storage
// PURPOSE: Collections, files and link sharing for uploaded booking images

use crate::errors::BookingError;
use crate::models::{CollectionHandle, ImageBlob, StoredFile};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Marker written next to an entry once it is viewable by anyone with the link
const SHARED_MARKER_SUFFIX: &str = ".shared";

/// Media store port
/// DOCUMENTATION: Only the intake service creates entries or changes their sharing.
/// `ensure_collection` is lookup-or-create by name and safe to call on every write.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn ensure_collection(
        &self,
        parent: Option<&CollectionHandle>,
        name: &str,
    ) -> Result<CollectionHandle, BookingError>;

    async fn create_file(
        &self,
        collection: &CollectionHandle,
        blob: ImageBlob,
    ) -> Result<StoredFile, BookingError>;

    /// Make the file viewable by anyone with the link; returns the link
    async fn share_file(&self, file: &StoredFile) -> Result<String, BookingError>;

    /// Make the collection viewable by anyone with the link; returns the link
    async fn share_collection(&self, collection: &CollectionHandle) -> Result<String, BookingError>;
}

/// Filesystem-backed media store
pub struct LocalMediaStore {
    root: PathBuf,
    base_url: String,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    /// Absolute path of a store-relative path
    pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let mut path = self.root.clone();
        for segment in relative.split('/').filter(|s| !s.is_empty()) {
            if segment == "." || segment == ".." || segment.ends_with(SHARED_MARKER_SUFFIX) {
                return None;
            }
            path.push(segment);
        }
        Some(path)
    }

    /// Whether a store-relative path has been shared
    pub async fn is_shared(&self, relative: &str) -> bool {
        match self.resolve(relative) {
            Some(path) => tokio::fs::metadata(marker_path(&path)).await.is_ok(),
            None => false,
        }
    }

    /// Public link for a store-relative path
    pub fn link_for(&self, relative: &str) -> String {
        let segments = relative.split('/').filter(|s| !s.is_empty());
        match url::Url::parse(&self.base_url) {
            Ok(mut url) if !url.cannot_be_a_base() => {
                if let Ok(mut path) = url.path_segments_mut() {
                    path.pop_if_empty().extend(segments);
                }
                url.to_string()
            }
            _ => {
                let encoded: Vec<String> = segments
                    .map(|s| {
                        url::form_urlencoded::byte_serialize(s.as_bytes())
                            .collect::<String>()
                            .replace('+', "%20")
                    })
                    .collect();
                format!("/media/{}", encoded.join("/"))
            }
        }
    }

    /// Links of the shared entries directly inside a collection
    pub async fn shared_entries(&self, relative: &str) -> Result<Vec<String>, BookingError> {
        let path = self
            .resolve(relative)
            .ok_or_else(|| BookingError::StoreOperation(format!("Invalid media path: {}", relative)))?;

        let mut entries = tokio::fs::read_dir(&path).await?;
        let mut links = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(SHARED_MARKER_SUFFIX) {
                continue;
            }
            let child = format!("{}/{}", relative.trim_end_matches('/'), name);
            if self.is_shared(&child).await {
                links.push(self.link_for(&child));
            }
        }
        links.sort();
        Ok(links)
    }

    async fn mark_shared(&self, relative: &str) -> Result<(), BookingError> {
        let path = self
            .resolve(relative)
            .ok_or_else(|| BookingError::StoreOperation(format!("Invalid media path: {}", relative)))?;
        tokio::fs::write(marker_path(&path), b"anyone-with-link:view").await?;
        Ok(())
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn ensure_collection(
        &self,
        parent: Option<&CollectionHandle>,
        name: &str,
    ) -> Result<CollectionHandle, BookingError> {
        let name = sanitize_name(name);
        let relative = match parent {
            Some(parent) => format!("{}/{}", parent.path, name),
            None => name.clone(),
        };
        let path = self
            .resolve(&relative)
            .ok_or_else(|| BookingError::StoreOperation(format!("Invalid collection: {}", relative)))?;

        if tokio::fs::metadata(&path).await.is_err() {
            tokio::fs::create_dir_all(&path).await.map_err(|e| {
                log::error!("Failed to create collection {}: {}", relative, e);
                BookingError::StoreOperation(format!("Create collection failed: {}", e))
            })?;
            log::info!("Created media collection: {}", relative);
        }

        Ok(CollectionHandle {
            path: relative,
            name,
        })
    }

    async fn create_file(
        &self,
        collection: &CollectionHandle,
        blob: ImageBlob,
    ) -> Result<StoredFile, BookingError> {
        let id = Uuid::new_v4().to_string();
        let name = sanitize_name(&blob.name);
        let relative = format!("{}/{}_{}", collection.path, &id[..8], name);
        let path = self
            .resolve(&relative)
            .ok_or_else(|| BookingError::StoreOperation(format!("Invalid file path: {}", relative)))?;

        tokio::fs::write(&path, &blob.bytes).await.map_err(|e| {
            log::error!("Failed to write media file {}: {}", relative, e);
            BookingError::StoreOperation(format!("Create file failed: {}", e))
        })?;

        Ok(StoredFile {
            id,
            name,
            mime_type: blob.mime_type,
            path: relative,
        })
    }

    async fn share_file(&self, file: &StoredFile) -> Result<String, BookingError> {
        self.mark_shared(&file.path).await?;
        Ok(self.link_for(&file.path))
    }

    async fn share_collection(&self, collection: &CollectionHandle) -> Result<String, BookingError> {
        self.mark_shared(&collection.path).await?;
        Ok(self.link_for(&collection.path))
    }
}

fn marker_path(path: &Path) -> PathBuf {
    let mut marker = path.as_os_str().to_owned();
    marker.push(SHARED_MARKER_SUFFIX);
    PathBuf::from(marker)
}

/// Single path segment safe for the filesystem
fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();

    match cleaned.trim_matches('.') {
        "" => "unnamed".to_string(),
        _ if cleaned.ends_with(SHARED_MARKER_SUFFIX) => format!("{}_", cleaned),
        _ => cleaned,
    }
}
