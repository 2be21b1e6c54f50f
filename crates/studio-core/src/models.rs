use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Separator between topic and body in the essay/poem cache files.
pub const TOPIC_SEPARATOR: &str = "\n---\n";

/// One prompt/answer turn of a companion conversation.
///
/// `context` holds the short running summary the model produced for this turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub prompt: String,
    pub answer: String,
    pub context: String,
}

impl Exchange {
    pub fn new(
        prompt: impl Into<String>,
        answer: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            answer: answer.into(),
            context: context.into(),
        }
    }
}

/// Model output split into the visible answer and the trailing summary line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    pub answer: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSuggestion {
    pub prompt: String,
    pub image_url: String,
}

/// The last generated image set: the user prompt and the cached files, 1-indexed on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageManifest {
    pub prompt: String,
    pub paths: Vec<PathBuf>,
}

impl ImageManifest {
    pub fn is_empty(&self) -> bool {
        self.prompt.is_empty() && self.paths.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopicKind {
    Essay,
    Poem,
}

impl TopicKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            TopicKind::Essay => "essay.txt",
            TopicKind::Poem => "poem.txt",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TopicKind::Essay => "essay",
            TopicKind::Poem => "poem",
        }
    }
}

impl fmt::Display for TopicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single-slot essay or poem cache entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicEntry {
    pub topic: String,
    pub text: String,
}

impl TopicEntry {
    pub fn new(topic: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            text: text.into(),
        }
    }

    pub fn encode(&self) -> String {
        format!("{}{}{}", self.topic, TOPIC_SEPARATOR, self.text)
    }

    /// Splits on the first separator; anything without one is not a valid entry.
    pub fn decode(content: &str) -> Option<Self> {
        let (topic, text) = content.split_once(TOPIC_SEPARATOR)?;
        Some(Self::new(topic, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_entry_decode_splits_on_first_separator_only() {
        let entry = TopicEntry::decode("rivers\n---\nfirst\n---\nsecond").unwrap();
        assert_eq!(entry.topic, "rivers");
        assert_eq!(entry.text, "first\n---\nsecond");
    }

    #[test]
    fn topic_entry_decode_rejects_missing_separator() {
        assert!(TopicEntry::decode("just some text").is_none());
        assert!(TopicEntry::decode("").is_none());
    }

    #[test]
    fn topic_entry_encode_matches_cache_layout() {
        let entry = TopicEntry::new("monsoon", "Rain on the roof.");
        assert_eq!(entry.encode(), "monsoon\n---\nRain on the roof.");
    }
}
