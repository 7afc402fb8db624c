pub mod history;
pub mod models;
pub mod session;

pub use history::HistoryDir;
pub use models::{ChatMessage, Transcript, to_display_line};
pub use session::{ChatSession, Command, Outcome, SessionState};
