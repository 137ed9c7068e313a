pub mod android_jni;
pub mod config;
pub mod distance;
pub mod error;
pub mod location;
pub mod map;
pub mod recorder;
pub mod replay;
pub mod screen;
pub mod trips;

pub use error::{Error, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
