pub mod api;
pub mod session;
pub mod studio;

pub use api::{ApiClient, ClientError, CompanionReply, ImageReply};
pub use session::SessionState;
pub use studio::{Generation, Studio, StudioError};
