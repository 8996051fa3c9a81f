// ABOUTME: Photo gallery with a fixed capacity and image ingest.
// ABOUTME: Filters non-image files, enforces capacity, encodes accepted files as data URLs.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::photo::{ImageRef, Photo, PhotoId};

/// A file handed over by the platform (file picker or drop)
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub filename: String,
    /// Declared MIME type, if the platform reported one
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(filename: impl Into<String>, mime: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime,
            bytes,
        }
    }

    /// True if the declared MIME type (or, lacking one, the content) is an image
    pub fn looks_like_image(&self) -> bool {
        match &self.mime {
            Some(mime) => mime.starts_with("image/"),
            None => image::guess_format(&self.bytes).is_ok(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("{filename}: unrecognised image data")]
    UnknownFormat { filename: String },

    #[error("{filename}: {message}")]
    Decode { filename: String, message: String },
}

/// Turns raw file bytes into a displayable reference
pub trait ImageDecoder {
    fn decode(&self, file: &SourceFile) -> Result<ImageRef, IngestError>;
}

/// Encodes image bytes as a `data:` URL after sniffing the format
#[derive(Debug, Default, Clone, Copy)]
pub struct DataUrlDecoder;

impl ImageDecoder for DataUrlDecoder {
    fn decode(&self, file: &SourceFile) -> Result<ImageRef, IngestError> {
        let format = image::guess_format(&file.bytes).map_err(|_| IngestError::UnknownFormat {
            filename: file.filename.clone(),
        })?;
        Ok(ImageRef(format!(
            "data:{};base64,{}",
            format.to_mime_type(),
            STANDARD.encode(&file.bytes)
        )))
    }
}

/// Outcome of a batch ingest
#[derive(Debug, Default)]
pub struct IngestReport {
    pub accepted: Vec<PhotoId>,
    pub rejected_non_image: usize,
    pub rejected_over_capacity: usize,
    pub failed: Vec<IngestError>,
}

impl IngestReport {
    pub fn rejected(&self) -> usize {
        self.rejected_non_image + self.rejected_over_capacity + self.failed.len()
    }
}

/// The sidebar collection of photos available for placement
#[derive(Debug, Clone)]
pub struct PhotoGallery {
    photos: Vec<Photo>,
    max_photos: usize,
}

impl PhotoGallery {
    pub fn new(max_photos: usize) -> Self {
        Self {
            photos: Vec::new(),
            max_photos,
        }
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn max_photos(&self) -> usize {
        self.max_photos
    }

    pub fn remaining_capacity(&self) -> usize {
        self.max_photos.saturating_sub(self.photos.len())
    }

    pub fn get(&self, id: &PhotoId) -> Option<&Photo> {
        self.photos.iter().find(|p| &p.id == id)
    }

    /// Remove a photo from the gallery. Cells referencing it are untouched.
    pub fn remove(&mut self, id: &PhotoId) -> Option<Photo> {
        let idx = self.photos.iter().position(|p| &p.id == id)?;
        Some(self.photos.remove(idx))
    }

    /// Replace the whole collection (used when loading a saved layout)
    pub fn replace_all(&mut self, photos: Vec<Photo>) {
        self.photos = photos;
    }

    /// Add an already-decoded photo, respecting capacity
    pub fn push(&mut self, photo: Photo) -> bool {
        if self.remaining_capacity() == 0 {
            return false;
        }
        self.photos.push(photo);
        true
    }

    /// Decode and add a batch of files.
    ///
    /// Non-image files are skipped first; of the remaining images only as
    /// many as fit the remaining capacity are decoded, in input order.
    pub fn ingest<D: ImageDecoder + ?Sized>(
        &mut self,
        files: impl IntoIterator<Item = SourceFile>,
        decoder: &D,
    ) -> IngestReport {
        let mut report = IngestReport::default();
        let mut slots = self.remaining_capacity();

        for file in files {
            if !file.looks_like_image() {
                report.rejected_non_image += 1;
                continue;
            }
            if slots == 0 {
                report.rejected_over_capacity += 1;
                continue;
            }
            match decoder.decode(&file) {
                Ok(image) => {
                    let photo = Photo::new(PhotoId::generate(), image, file.filename);
                    report.accepted.push(photo.id.clone());
                    self.photos.push(photo);
                    slots -= 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to read photo: {}", e);
                    report.failed.push(e);
                }
            }
        }

        tracing::debug!(
            accepted = report.accepted.len(),
            rejected = report.rejected(),
            total = self.photos.len(),
            "ingested photos"
        );
        report
    }
}

impl Default for PhotoGallery {
    fn default() -> Self {
        Self::new(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    fn png(name: &str) -> SourceFile {
        SourceFile::new(name, Some("image/png".into()), PNG_MAGIC.to_vec())
    }

    #[test]
    fn ingest_skips_non_images() {
        let mut gallery = PhotoGallery::new(4);
        let files = vec![
            png("a.png"),
            SourceFile::new("notes.txt", Some("text/plain".into()), b"hello".to_vec()),
        ];
        let report = gallery.ingest(files, &DataUrlDecoder);
        assert_eq!(report.accepted.len(), 1);
        assert_eq!(report.rejected_non_image, 1);
        assert_eq!(gallery.len(), 1);
        assert!(gallery.photos()[0].image.as_str().starts_with("data:image/png;base64,"));
        assert_eq!(gallery.photos()[0].original_filename, "a.png");
    }

    #[test]
    fn ingest_respects_capacity() {
        let mut gallery = PhotoGallery::new(2);
        let report = gallery.ingest(vec![png("a"), png("b"), png("c")], &DataUrlDecoder);
        assert_eq!(report.accepted.len(), 2);
        assert_eq!(report.rejected_over_capacity, 1);
        assert_eq!(gallery.remaining_capacity(), 0);
    }

    #[test]
    fn sniffs_content_without_mime() {
        let file = SourceFile::new("blob", None, PNG_MAGIC.to_vec());
        assert!(file.looks_like_image());
        let file = SourceFile::new("blob", None, b"plain".to_vec());
        assert!(!file.looks_like_image());
    }

    #[test]
    fn decode_failure_is_reported_not_fatal() {
        let mut gallery = PhotoGallery::new(4);
        let bogus = SourceFile::new("fake.jpg", Some("image/jpeg".into()), b"nope".to_vec());
        let report = gallery.ingest(vec![bogus, png("ok.png")], &DataUrlDecoder);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.accepted.len(), 1);
    }

    #[test]
    fn remove_returns_photo() {
        let mut gallery = PhotoGallery::new(4);
        let report = gallery.ingest(vec![png("a")], &DataUrlDecoder);
        let id = report.accepted[0].clone();
        assert!(gallery.remove(&id).is_some());
        assert!(gallery.get(&id).is_none());
        assert!(gallery.remove(&id).is_none());
    }
}
