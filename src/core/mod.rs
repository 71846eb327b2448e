//! 核心逻辑 (模块原则：清晰分离的发现与协调)

pub mod discovery;
pub mod env_file;
pub mod reconcile;
pub mod secrets;
