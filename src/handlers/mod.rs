// Handler modules
pub mod cache;
pub mod services;

// Re-export all handler functions
pub use cache::{handle_cache_clear, handle_cache_show};
pub use services::{handle_check, handle_ensure, handle_link};
