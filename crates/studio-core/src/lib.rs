pub mod error;
pub mod models;
pub mod parser;
pub mod storage;

pub use error::{ParseError, StoreError};
pub use models::{Exchange, ImageManifest, ImageSuggestion, ParsedResponse, TopicEntry, TopicKind};
pub use parser::{
    contains_provider_key_error, image_url_for, parse_companion_response, parse_image_prompts,
    SUMMARY_MARKER,
};
pub use storage::{ConversationFormat, FlatFileStore};
