pub mod articles;
pub mod auth;
pub mod graphql;
pub mod memory;

pub use articles::{ArticleScope, GraphqlNewsApi, NewsApi};
pub use auth::{AuthProvider, HttpAuthProvider};
pub use graphql::GraphqlClient;
pub use memory::MemoryBackend;

pub mod prelude {
    pub use crate::articles::{ArticleScope, NewsApi};
    pub use crate::auth::AuthProvider;
    pub use nd_core::{Error, Result};
}
