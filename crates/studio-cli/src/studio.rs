//! Client-side workflow: call the server, persist successes, fall back on failure.

use studio_core::{
    Exchange, FlatFileStore, ImageManifest, StoreError, TopicEntry, TopicKind,
};
use thiserror::Error;

use crate::api::{ApiClient, ClientError};
use crate::session::SessionState;

pub const NEW_CONVERSATION_NAME: &str = "New Conversation";

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("conversation {0} does not exist")]
    UnknownConversation(u64),
}

pub type Result<T> = std::result::Result<T, StudioError>;

/// Result of a generation request.
///
/// A failed call is not fatal: the caller gets the error together with the
/// last content that was persisted for the same slot, if any.
#[derive(Debug)]
pub enum Generation<T> {
    Fresh(T),
    Fallback {
        error: ClientError,
        previous: Option<T>,
    },
}

impl<T> Generation<T> {
    pub fn is_fresh(&self) -> bool {
        matches!(self, Generation::Fresh(_))
    }
}

pub struct Studio {
    api: ApiClient,
    store: FlatFileStore,
    session: SessionState,
}

impl Studio {
    pub fn new(api: ApiClient, store: FlatFileStore) -> Self {
        Self {
            api,
            store,
            session: SessionState::new(),
        }
    }

    pub fn store(&self) -> &FlatFileStore {
        &self.store
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    // ---- essays and poems ----

    pub async fn last_topic(&mut self, kind: TopicKind) -> Result<Option<TopicEntry>> {
        if let Some(cached) = self.session.topic(kind) {
            return Ok(cached.cloned());
        }
        let entry = self.store.load_topic(kind).await?;
        self.session.set_topic(kind, entry.clone());
        Ok(entry)
    }

    pub async fn generate_topic(
        &mut self,
        kind: TopicKind,
        topic: &str,
        length: u32,
    ) -> Result<Generation<TopicEntry>> {
        let reply = match kind {
            TopicKind::Essay => self.api.essay(topic, length).await,
            TopicKind::Poem => self.api.poem(topic, length).await,
        };

        match reply {
            Ok(text) => {
                let entry = TopicEntry::new(topic, text);
                self.store.save_topic(kind, &entry).await?;
                self.session.set_topic(kind, Some(entry.clone()));
                Ok(Generation::Fresh(entry))
            }
            Err(error) => {
                log::warn!("Failed to generate {}: {}", kind, error);
                Ok(Generation::Fallback {
                    error,
                    previous: self.last_topic(kind).await?,
                })
            }
        }
    }

    // ---- images ----

    pub async fn last_images(&mut self) -> Result<ImageManifest> {
        if let Some(cached) = self.session.images() {
            return Ok(cached.clone());
        }
        let manifest = self.store.load_image_manifest().await?;
        self.session.set_images(manifest.clone());
        Ok(manifest)
    }

    pub async fn generate_images(
        &mut self,
        prompt: &str,
        num_images: u32,
    ) -> Result<Generation<ImageManifest>> {
        match self.api.generate_image(prompt, num_images).await {
            Ok(reply) => {
                let manifest = self.store.save_image_manifest(prompt, &reply.images).await?;
                self.session.set_images(manifest.clone());
                Ok(Generation::Fresh(manifest))
            }
            Err(error) => {
                log::warn!("Failed to generate images: {}", error);
                let previous = self.last_images().await?;
                Ok(Generation::Fallback {
                    error,
                    previous: (!previous.is_empty()).then_some(previous),
                })
            }
        }
    }

    // ---- conversations ----

    pub async fn conversation_ids(&mut self) -> Result<Vec<u64>> {
        if let Some(ids) = self.session.conversation_ids() {
            return Ok(ids.to_vec());
        }
        let ids = self.store.list_conversations().await?;
        self.session.set_conversation_ids(ids.clone());
        Ok(ids)
    }

    pub async fn new_conversation(&mut self) -> Result<u64> {
        let id = self.store.next_conversation_id().await?;
        self.store.save_conversation(id, &[]).await?;
        let ids = self.store.list_conversations().await?;
        self.session.conversation_created(id, ids);
        log::info!("Created conversation {}", id);
        Ok(id)
    }

    pub async fn delete_conversation(&mut self, id: u64) -> Result<bool> {
        let removed = self.store.delete_conversation(id).await?;
        self.session.conversation_deleted(id);
        Ok(removed)
    }

    pub async fn exchanges(&mut self, id: u64) -> Result<Vec<Exchange>> {
        if let Some(cached) = self.session.exchanges(id) {
            return Ok(cached.to_vec());
        }
        let exchanges = self.store.load_conversation(id).await?;
        self.session.set_exchanges(id, exchanges.clone());
        Ok(exchanges)
    }

    /// The first prompt of a conversation doubles as its title.
    pub async fn conversation_name(&mut self, id: u64) -> Result<String> {
        let exchanges = self.exchanges(id).await?;
        Ok(exchanges
            .first()
            .map(|exchange| exchange.prompt.as_str())
            .filter(|prompt| !prompt.is_empty())
            .unwrap_or(NEW_CONVERSATION_NAME)
            .to_string())
    }

    /// Sends `prompt` with the running summaries of earlier turns and appends
    /// the reply to the conversation. Nothing is written on failure.
    pub async fn send(&mut self, id: u64, prompt: &str) -> Result<Generation<Exchange>> {
        if !self.conversation_ids().await?.contains(&id) {
            return Err(StudioError::UnknownConversation(id));
        }

        let mut exchanges = self.exchanges(id).await?;
        let context = memory_context(&exchanges);

        match self.api.companion(prompt, &context).await {
            Ok(reply) => {
                let exchange = Exchange::new(prompt, reply.answer, reply.context_summary);
                exchanges.push(exchange.clone());
                self.store.save_conversation(id, &exchanges).await?;
                self.session.set_exchanges(id, exchanges);
                Ok(Generation::Fresh(exchange))
            }
            Err(error) => {
                log::warn!("Companion call for conversation {} failed: {}", id, error);
                Ok(Generation::Fallback {
                    error,
                    previous: None,
                })
            }
        }
    }
}

fn memory_context(exchanges: &[Exchange]) -> String {
    exchanges
        .iter()
        .map(|exchange| exchange.context.as_str())
        .filter(|context| !context.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_context_joins_summaries_with_spaces() {
        let exchanges = vec![
            Exchange::new("a", "b", "First summary."),
            Exchange::new("c", "d", ""),
            Exchange::new("e", "f", "Second summary."),
        ];
        assert_eq!(memory_context(&exchanges), "First summary. Second summary.");
        assert_eq!(memory_context(&[]), "");
    }
}
