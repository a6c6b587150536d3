pub mod config;
pub mod evidence;
pub mod proximity;

pub use config::TrackerConfig;
pub use evidence::EvidenceWindow;
pub use proximity::{resolve, Proximity};
