// src/services/media_service.rs
// DOCUMENTATION: Image persistence for booking uploads
// PURPOSE: Decode inline images, place them per policy, share them, collect links

use crate::errors::BookingError;
use crate::models::{CollectionHandle, ImageBlob, ImagePayload, PlacementPolicy};
use crate::services::MediaStore;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;

/// Every blob is tagged as JPEG regardless of the uploaded format
pub const STORED_MIME_TYPE: &str = "image/jpeg";

pub struct MediaService {
    store: Arc<dyn MediaStore>,
    root_collection: String,
    policy: PlacementPolicy,
}

impl MediaService {
    pub fn new(
        store: Arc<dyn MediaStore>,
        root_collection: impl Into<String>,
        policy: PlacementPolicy,
    ) -> Self {
        Self {
            store,
            root_collection: root_collection.into(),
            policy,
        }
    }

    pub fn policy(&self) -> PlacementPolicy {
        self.policy
    }

    /// Persist a batch of images and return their link(s)
    /// DOCUMENTATION: Bad items are logged and skipped; a batch where nothing
    /// persists returns an empty list instead of an error.
    pub async fn save_images(&self, images: &[ImagePayload], customer_key: &str) -> Vec<String> {
        if images.is_empty() {
            return Vec::new();
        }

        let root = match self.store.ensure_collection(None, &self.root_collection).await {
            Ok(root) => root,
            Err(e) => {
                log::error!("Error creating root collection: {}", e);
                return Vec::new();
            }
        };

        match self.policy {
            PlacementPolicy::SizeBased if images.len() == 1 => {
                self.persist_batch(&root, images).await
            }
            PlacementPolicy::SizeBased => {
                let Some(folder) = self.customer_collection(&root, customer_key).await else {
                    return Vec::new();
                };
                let saved = self.persist_batch(&folder, images).await.len();
                if saved == 0 {
                    return Vec::new();
                }
                match self.store.share_collection(&folder).await {
                    Ok(link) => {
                        log::info!("{}", folder_summary(saved, images.len(), &link));
                        vec![link]
                    }
                    Err(e) => {
                        log::error!("Error sharing customer folder {}: {}", folder.path, e);
                        Vec::new()
                    }
                }
            }
            PlacementPolicy::CustomerKeyed => {
                match self.customer_collection(&root, customer_key).await {
                    Some(folder) => self.persist_batch(&folder, images).await,
                    None => Vec::new(),
                }
            }
        }
    }

    async fn customer_collection(
        &self,
        root: &CollectionHandle,
        customer_key: &str,
    ) -> Option<CollectionHandle> {
        match self.store.ensure_collection(Some(root), customer_key).await {
            Ok(folder) => Some(folder),
            Err(e) => {
                log::error!("Error creating customer collection {}: {}", customer_key, e);
                None
            }
        }
    }

    /// Persist each item into `collection`; one link per persisted file
    async fn persist_batch(
        &self,
        collection: &CollectionHandle,
        images: &[ImagePayload],
    ) -> Vec<String> {
        let mut links = Vec::with_capacity(images.len());

        for (index, image) in images.iter().enumerate() {
            match self.persist_one(collection, image).await {
                Ok(link) => {
                    log::info!("Image {} saved: {}", index + 1, link);
                    links.push(link);
                }
                Err(e) => log::error!("Skipping image {} ({}): {}", index + 1, image.name, e),
            }
        }

        links
    }

    async fn persist_one(
        &self,
        collection: &CollectionHandle,
        image: &ImagePayload,
    ) -> Result<String, BookingError> {
        let blob = decode_image(image)?;
        let file = self
            .store
            .create_file(collection, blob)
            .await
            .map_err(|e| BookingError::ImagePersistence(e.to_string()))?;
        self.store
            .share_file(&file)
            .await
            .map_err(|e| BookingError::ImagePersistence(e.to_string()))
    }
}

/// Decode an inline image into a JPEG-tagged blob
pub fn decode_image(image: &ImagePayload) -> Result<ImageBlob, BookingError> {
    let data = image
        .data
        .as_deref()
        .ok_or_else(|| BookingError::ImagePersistence("image has no data".to_string()))?;

    let encoded = strip_data_url_prefix(data).trim();
    if encoded.is_empty() {
        return Err(BookingError::ImagePersistence("image data is empty".to_string()));
    }

    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| BookingError::Decode(e.to_string()))?;

    Ok(ImageBlob {
        name: image.name.clone(),
        mime_type: STORED_MIME_TYPE.to_string(),
        bytes,
    })
}

/// Log line for a shared customer folder; counts only files that were persisted
fn folder_summary(saved: usize, submitted: usize, link: &str) -> String {
    if saved == submitted {
        format!("{} images saved to folder: {}", saved, link)
    } else {
        format!(
            "{} of {} images saved to folder: {}",
            saved, submitted, link
        )
    }
}

/// Strip a leading `data:image/<subtype>;base64,` where subtype is lowercase letters
pub fn strip_data_url_prefix(data: &str) -> &str {
    let Some(rest) = data.strip_prefix("data:image/") else {
        return data;
    };
    let Some((subtype, payload)) = rest.split_once(";base64,") else {
        return data;
    };
    if !subtype.is_empty() && subtype.bytes().all(|b| b.is_ascii_lowercase()) {
        payload
    } else {
        data
    }
}

#[cfg(test)]
pub(crate) const TINY_JPEG: &str = "data:image/jpeg;base64,/9j/4AAQSkZJRgABAQAAAQABAAD/2wBDAAYEBQYFBAYGBQYHBwYIChAKCgkJChQODwwQFxQYGBcUFhYaHSUfGhsjHBYWICwgIyYnKSopGR8tMC0oMCUoKSj/2wBDAQcHBwoIChMKChMoGhYaKCgoKCgoKCgoKCgoKCgoKCgoKCgoKCgoKCgoKCgoKCgoKCgoKCgoKCgoKCgoKCgoKCj/wAARCAABAAEDASIAAhEBAxEB/8QAFQABAQAAAAAAAAAAAAAAAAAAAAv/xAAUEAEAAAAAAAAAAAAAAAAAAAAA/8QAFQEBAQAAAAAAAAAAAAAAAAAAAAX/xAAUEQEAAAAAAAAAAAAAAAAAAAAA/9oADAMBAAIRAxEAPwCdABmX/9k=";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::LocalMediaStore;

    fn image(name: &str, data: Option<&str>) -> ImagePayload {
        ImagePayload {
            name: name.to_string(),
            data: data.map(str::to_string),
        }
    }

    fn service(dir: &std::path::Path, policy: PlacementPolicy) -> MediaService {
        let store = Arc::new(LocalMediaStore::new(dir, "http://localhost/media"));
        MediaService::new(store, "Optimum Electricals Bookings", policy)
    }

    #[test]
    fn test_strip_prefix() {
        assert_eq!(strip_data_url_prefix("data:image/png;base64,QUJD"), "QUJD");
        assert_eq!(strip_data_url_prefix("QUJD"), "QUJD");
        assert_eq!(
            strip_data_url_prefix("data:image/svg+xml;base64,QUJD"),
            "data:image/svg+xml;base64,QUJD"
        );
    }

    #[test]
    fn test_decode_tags_jpeg() {
        let blob = decode_image(&image("shot.png", Some("data:image/png;base64,QUJD"))).unwrap();
        assert_eq!(blob.bytes, b"ABC");
        assert_eq!(blob.mime_type, "image/jpeg");
    }

    #[test]
    fn test_decode_failures() {
        assert!(matches!(
            decode_image(&image("a", None)),
            Err(BookingError::ImagePersistence(_))
        ));
        assert!(matches!(
            decode_image(&image("a", Some("data:image/jpeg;base64,"))),
            Err(BookingError::ImagePersistence(_))
        ));
        assert!(matches!(
            decode_image(&image("a", Some("!!not base64!!"))),
            Err(BookingError::Decode(_))
        ));
    }

    #[actix_rt::test]
    async fn test_single_image_goes_to_root() {
        let dir = tempfile::tempdir().unwrap();
        let media = service(dir.path(), PlacementPolicy::SizeBased);

        let links = media
            .save_images(&[image("a.jpg", Some(TINY_JPEG))], "Test Customer_9876543210")
            .await;

        assert_eq!(links.len(), 1);
        assert!(links[0].starts_with("http://localhost/media/Optimum%20Electricals%20Bookings/"));
        assert!(links[0].ends_with("_a.jpg"));
        assert!(!dir
            .path()
            .join("Optimum Electricals Bookings/Test Customer_9876543210")
            .exists());
    }

    #[actix_rt::test]
    async fn test_multiple_images_return_folder_link() {
        let dir = tempfile::tempdir().unwrap();
        let media = service(dir.path(), PlacementPolicy::SizeBased);

        let links = media
            .save_images(
                &[
                    image("a.jpg", Some(TINY_JPEG)),
                    image("b.jpg", Some("@@@")),
                    image("c.jpg", Some(TINY_JPEG)),
                ],
                "Asha_9876543210",
            )
            .await;

        assert_eq!(
            links,
            vec!["http://localhost/media/Optimum%20Electricals%20Bookings/Asha_9876543210".to_string()]
        );
        let files = std::fs::read_dir(dir.path().join("Optimum Electricals Bookings/Asha_9876543210"))
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| !e.file_name().to_string_lossy().ends_with(".shared"))
            .count();
        assert_eq!(files, 2);
    }

    #[actix_rt::test]
    async fn test_all_invalid_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let media = service(dir.path(), PlacementPolicy::SizeBased);

        let single = media.save_images(&[image("a.jpg", None)], "x_1").await;
        assert!(single.is_empty());

        let many = media
            .save_images(&[image("a.jpg", Some("")), image("b.jpg", None)], "x_1")
            .await;
        assert!(many.is_empty());
    }

    #[actix_rt::test]
    async fn test_customer_keyed_returns_each_link() {
        let dir = tempfile::tempdir().unwrap();
        let media = service(dir.path(), PlacementPolicy::CustomerKeyed);

        let links = media
            .save_images(
                &[image("a.jpg", Some(TINY_JPEG)), image("b.jpg", None)],
                "Asha_9876543210",
            )
            .await;
        assert_eq!(links.len(), 1);
        assert!(links[0].contains("/Asha_9876543210/"));

        let single = media
            .save_images(&[image("c.jpg", Some(TINY_JPEG))], "Asha_9876543210")
            .await;
        assert_eq!(single.len(), 1);
        assert!(single[0].contains("/Asha_9876543210/"));
    }

    #[test]
    fn test_folder_summary_counts_persisted_files() {
        assert_eq!(folder_summary(3, 3, "L"), "3 images saved to folder: L");
        assert_eq!(folder_summary(2, 3, "L"), "2 of 3 images saved to folder: L");
    }
}
