use std::collections::HashMap;
use studio_core::{Exchange, ImageManifest, TopicEntry, TopicKind};

/// In-memory view of what has been read from the store during this session.
///
/// Entries are filled lazily. Conversation entries are keyed by ID and are
/// invalidated when a conversation is created or deleted.
#[derive(Debug, Default)]
pub struct SessionState {
    conversation_ids: Option<Vec<u64>>,
    exchanges: HashMap<u64, Vec<Exchange>>,
    topics: HashMap<TopicKind, Option<TopicEntry>>,
    images: Option<ImageManifest>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conversation_ids(&self) -> Option<&[u64]> {
        self.conversation_ids.as_deref()
    }

    pub fn set_conversation_ids(&mut self, mut ids: Vec<u64>) {
        ids.sort_unstable();
        ids.dedup();
        self.conversation_ids = Some(ids);
    }

    pub fn exchanges(&self, id: u64) -> Option<&[Exchange]> {
        self.exchanges.get(&id).map(Vec::as_slice)
    }

    pub fn set_exchanges(&mut self, id: u64, exchanges: Vec<Exchange>) {
        self.exchanges.insert(id, exchanges);
    }

    /// A new conversation starts empty; the ID list is refreshed with it.
    pub fn conversation_created(&mut self, id: u64, ids: Vec<u64>) {
        self.set_conversation_ids(ids);
        self.exchanges.insert(id, Vec::new());
    }

    pub fn conversation_deleted(&mut self, id: u64) {
        if let Some(ids) = self.conversation_ids.as_mut() {
            ids.retain(|existing| *existing != id);
        }
        self.exchanges.remove(&id);
    }

    /// `None` means not loaded yet; `Some(None)` means nothing is stored.
    pub fn topic(&self, kind: TopicKind) -> Option<Option<&TopicEntry>> {
        self.topics.get(&kind).map(Option::as_ref)
    }

    pub fn set_topic(&mut self, kind: TopicKind, entry: Option<TopicEntry>) {
        self.topics.insert(kind, entry);
    }

    pub fn images(&self) -> Option<&ImageManifest> {
        self.images.as_ref()
    }

    pub fn set_images(&mut self, manifest: ImageManifest) {
        self.images = Some(manifest);
    }
}
