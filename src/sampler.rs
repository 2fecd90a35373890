//! Stateless random sampling for the two periodic dashboard panels.
//!
//! Each refresh tick re-samples independently; nothing is remembered
//! between ticks and nothing here touches the aggregation paths.

use std::fs;
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::Result;
use crate::ingest::MessageTable;
use crate::models::{MessageSample, SampleLine};

/// One servable image file.
#[derive(Debug, Clone)]
pub struct Photo {
    /// Path on disk
    pub path: PathBuf,
    /// MIME type derived from the file extension
    pub content_type: &'static str,
}

/// The image files found in the photo directory at startup.
#[derive(Debug, Clone, Default)]
pub struct PhotoLibrary {
    photos: Vec<Photo>,
}

impl PhotoLibrary {
    /// Enumerate image files in `dir` once. Non-image files are skipped.
    pub fn scan(dir: &Path) -> Result<Self> {
        let mut photos = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if let Some(content_type) = image_content_type(&path) {
                photos.push(Photo { path, content_type });
            }
        }
        photos.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(Self { photos })
    }

    /// A library with no photos; the panel endpoint answers 404.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of photos found.
    #[must_use]
    pub fn len(&self) -> usize {
        self.photos.len()
    }

    /// True when no photos were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Pick one photo uniformly at random.
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Photo> {
        self.photos.choose(rng)
    }
}

/// Draw up to `k` distinct messages with non-empty text, in random order.
/// The first draw's day labels the panel.
pub fn sample_messages<R: Rng + ?Sized>(
    table: &MessageTable,
    k: usize,
    rng: &mut R,
) -> MessageSample {
    let candidates: Vec<usize> = table
        .messages()
        .iter()
        .enumerate()
        .filter(|(_, m)| m.text.as_deref().is_some_and(|t| !t.trim().is_empty()))
        .map(|(i, _)| i)
        .collect();

    let picked: Vec<usize> = candidates.choose_multiple(rng, k).copied().collect();
    let lines = picked
        .iter()
        .map(|&i| {
            let message = &table.messages()[i];
            SampleLine {
                party: table.labels().label(message.party).to_string(),
                text: message.text.clone().unwrap_or_default(),
            }
        })
        .collect();

    MessageSample {
        day: picked.first().map(|&i| table.messages()[i].day),
        lines,
    }
}

fn image_content_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}
