pub mod error;
pub mod session;
pub mod types;

pub use error::Error;
pub use session::{MemorySession, SessionStore};
pub use types::{
    NewsArticle, SavedArticle, Sentiment, Session, SignUpOutcome, User, UserPreferences,
};

pub type Result<T> = std::result::Result<T, Error>;
