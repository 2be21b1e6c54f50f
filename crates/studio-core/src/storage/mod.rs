mod conversation;
mod flat_file;

pub use conversation::ConversationFormat;
pub use flat_file::FlatFileStore;
