pub mod book;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod session;
pub mod storage;

pub use book::EventBook;
pub use error::{BookError, EntityKind};
pub use session::Session;
pub use storage::JsonStorage;
