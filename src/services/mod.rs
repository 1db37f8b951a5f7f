// Service exports
pub mod cache;
pub mod directory;
pub mod memory;
pub mod notifier;
pub mod postgres;

pub use cache::{CacheError, ProfileCache};
pub use directory::{DirectoryClient, DirectoryError};
pub use memory::{CountingNotifier, InMemoryMatches, InMemoryProfiles, InMemorySwipes};
pub use notifier::{NoopNotifier, NotifierError, WebhookNotifier};
pub use postgres::{PgStore, PostgresError};
