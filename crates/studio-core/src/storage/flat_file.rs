use std::path::{Path, PathBuf};
use tokio::fs;

use super::conversation::ConversationFormat;
use crate::error::{StoreError, StoreResult};
use crate::models::{Exchange, ImageManifest, ImageSuggestion, TopicEntry, TopicKind};

const CONVERSATIONS_DIR: &str = "conversations";
const IMAGES_DIR: &str = "images";
const IMAGES_FILE: &str = "images.txt";
const MANIFEST_SEPARATOR: &str = ": ";

/// Whole-file storage for generated content, rooted at one directory.
///
/// There is no locking: a single writer is assumed.
#[derive(Debug, Clone)]
pub struct FlatFileStore {
    root: PathBuf,
    format: ConversationFormat,
    http: reqwest::Client,
}

impl FlatFileStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            format: ConversationFormat::default(),
            http: reqwest::Client::new(),
        }
    }

    pub fn with_format(mut self, format: ConversationFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub async fn init(&self) -> StoreResult<()> {
        fs::create_dir_all(self.conversations_dir()).await?;
        fs::create_dir_all(self.images_dir()).await?;
        Ok(())
    }

    // ---- single-slot text ----

    pub async fn save_text(&self, name: &str, content: &str) -> StoreResult<()> {
        fs::create_dir_all(&self.root).await?;
        fs::write(self.root.join(name), content).await?;
        Ok(())
    }

    /// Missing files read as empty content.
    pub async fn load_text(&self, name: &str) -> StoreResult<String> {
        match fs::read_to_string(self.root.join(name)).await {
            Ok(content) => Ok(content),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(error) => Err(error.into()),
        }
    }

    pub async fn save_topic(&self, kind: TopicKind, entry: &TopicEntry) -> StoreResult<()> {
        self.save_text(kind.file_name(), &entry.encode()).await
    }

    pub async fn load_topic(&self, kind: TopicKind) -> StoreResult<Option<TopicEntry>> {
        let content = self.load_text(kind.file_name()).await?;
        Ok(TopicEntry::decode(&content))
    }

    // ---- conversations ----

    /// Returns one past the highest existing ID; freed IDs are never reused.
    pub async fn next_conversation_id(&self) -> StoreResult<u64> {
        let ids = self.list_conversations().await?;
        match ids.last() {
            None => Ok(1),
            Some(&max) => max
                .checked_add(1)
                .ok_or(StoreError::ConversationIdsExhausted(max)),
        }
    }

    /// IDs of every conversation file, ascending.
    pub async fn list_conversations(&self) -> StoreResult<Vec<u64>> {
        let dir = self.conversations_dir();
        fs::create_dir_all(&dir).await?;

        let mut ids = Vec::new();
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(self.format.extension()) {
                continue;
            }
            if let Some(id) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(parse_conversation_id)
            {
                ids.push(id);
            }
        }

        ids.sort_unstable();
        Ok(ids)
    }

    pub async fn save_conversation(&self, id: u64, exchanges: &[Exchange]) -> StoreResult<()> {
        fs::create_dir_all(self.conversations_dir()).await?;
        let content = self.format.encode(exchanges)?;
        fs::write(self.conversation_path(id), content).await?;
        log::debug!("Saved conversation {} ({} exchanges)", id, exchanges.len());
        Ok(())
    }

    /// A conversation without a backing file has no exchanges.
    pub async fn load_conversation(&self, id: u64) -> StoreResult<Vec<Exchange>> {
        match fs::read_to_string(self.conversation_path(id)).await {
            Ok(content) => self.format.decode(&content),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(error) => Err(error.into()),
        }
    }

    /// Returns whether a file was removed. Absent conversations are not an error.
    pub async fn delete_conversation(&self, id: u64) -> StoreResult<bool> {
        match fs::remove_file(self.conversation_path(id)).await {
            Ok(()) => Ok(true),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(error) => Err(error.into()),
        }
    }

    // ---- images ----

    /// Writes the manifest, then caches each image as `images/{n}.jpg`.
    ///
    /// The manifest always lists every slot; downloads that fail are only logged
    /// and leave no file behind, so a slot never shows an earlier prompt's image.
    pub async fn save_image_manifest(
        &self,
        prompt: &str,
        images: &[ImageSuggestion],
    ) -> StoreResult<ImageManifest> {
        let images_dir = self.images_dir();
        fs::create_dir_all(&images_dir).await?;

        let paths: Vec<PathBuf> = (1..=images.len())
            .map(|index| self.image_path(index))
            .collect();

        let mut content = single_line(prompt);
        content.push('\n');
        for (index, path) in paths.iter().enumerate() {
            content.push_str(&format!(
                "{}{}{}\n",
                index + 1,
                MANIFEST_SEPARATOR,
                path.display()
            ));
        }
        fs::write(self.root.join(IMAGES_FILE), content).await?;

        for (path, image) in paths.iter().zip(images) {
            self.download_image(&image.image_url, path).await;
        }

        Ok(ImageManifest {
            prompt: single_line(prompt),
            paths,
        })
    }

    pub async fn load_image_manifest(&self) -> StoreResult<ImageManifest> {
        let content = self.load_text(IMAGES_FILE).await?;
        let mut lines = content.lines();

        let Some(prompt) = lines.next() else {
            return Ok(ImageManifest::default());
        };

        let paths = lines
            .filter_map(|line| line.split_once(MANIFEST_SEPARATOR))
            .map(|(_, path)| PathBuf::from(path.trim()))
            .collect();

        Ok(ImageManifest {
            prompt: prompt.trim().to_string(),
            paths,
        })
    }

    async fn download_image(&self, url: &str, path: &Path) {
        if let Err(error) = fs::remove_file(path).await {
            if error.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to remove stale image {:?}: {}", path, error);
            }
        }

        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(error) => {
                log::warn!("Failed to download image {}: {}", url, error);
                return;
            }
        };

        if !response.status().is_success() {
            log::warn!(
                "Skipping image {}: server returned {}",
                url,
                response.status()
            );
            return;
        }

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(error) => {
                log::warn!("Failed to read image body {}: {}", url, error);
                return;
            }
        };

        if let Err(error) = fs::write(path, &bytes).await {
            log::warn!("Failed to write image {:?}: {}", path, error);
        }
    }

    fn conversations_dir(&self) -> PathBuf {
        self.root.join(CONVERSATIONS_DIR)
    }

    fn conversation_path(&self, id: u64) -> PathBuf {
        self.conversations_dir()
            .join(format!("{}.{}", id, self.format.extension()))
    }

    fn images_dir(&self) -> PathBuf {
        self.root.join(IMAGES_DIR)
    }

    fn image_path(&self, index: usize) -> PathBuf {
        self.images_dir().join(format!("{}.jpg", index))
    }
}

fn parse_conversation_id(stem: &str) -> Option<u64> {
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}

/// The manifest prompt occupies exactly one line.
fn single_line(prompt: &str) -> String {
    prompt.lines().map(str::trim).collect::<Vec<_>>().join(" ").trim().to_string()
}
