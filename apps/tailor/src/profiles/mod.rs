// Upstream profile access: the store collaborator and the explicit cache in front of it.

pub mod cache;
pub mod store;

pub use cache::ProfileCache;
pub use store::{FileProfileStore, ProfileError, ProfileStore};
