//! envdeploy - 聊天应用本地部署工具
//!
//! 分层结构：
//! - core: 变量发现、密钥生成、协调
//! - deploy: 部署流程与编排协作者
//! - commands: 命令处理器

// 基础类型
pub mod error;
pub mod types;

// 配置与文件格式
pub mod config;

// 核心逻辑
pub mod core;

// 部署流程
pub mod deploy;

// 工具
pub mod output;
pub mod utils;

// 命令层
pub mod cli;
pub mod commands;

#[cfg(test)]
pub(crate) mod test_utils;

// 重新导出常用类型
pub use error::{DeployError, Result};
pub use types::{OutputFormat, SecretSpec, Stage, VariableName};
