pub mod config;

pub use config::Config;
pub use config::RootFs;
