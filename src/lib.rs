pub mod config;
pub mod error;
pub mod event;
pub mod playback;
pub mod render;
pub mod timeline;

pub use error::Error;

#[cfg(test)]
mod test;
