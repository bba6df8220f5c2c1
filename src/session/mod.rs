mod registry;
mod store;

pub use registry::SessionRegistry;
pub use store::{InMemorySessionStore, SessionStore};
