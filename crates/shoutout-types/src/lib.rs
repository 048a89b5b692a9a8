pub mod api;
pub mod events;
pub mod frames;
pub mod models;

pub use frames::{FRAMES, ShoutoutFrame};
pub use models::{NewShoutout, Shoutout};
