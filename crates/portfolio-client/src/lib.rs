pub mod http;
pub mod session;
pub mod store;

pub use http::HttpAuthApi;
pub use session::{AuthApi, AuthError, SessionEvent, SessionGate, SessionState, transition};
pub use store::{CredentialStore, FileStore, MemoryStore};
