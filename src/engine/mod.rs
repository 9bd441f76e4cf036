pub mod messages;
pub mod worker;

// Re-export key components
pub use messages::{ScreenEvent, ScreenJob};
pub use worker::spawn_screen_worker;
