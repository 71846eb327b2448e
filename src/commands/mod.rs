//! 命令处理器
//!
//! 每个命令一个模块，实现 CommandHandler trait

use crate::config::DeployConfig;
use crate::error::Result;
use crate::output::Console;
use std::path::PathBuf;

pub mod check;
pub mod deploy;
pub mod discover;
pub mod secrets;
pub mod stop;

/// 命令上下文
#[derive(Debug)]
pub struct CommandContext {
    pub verbose: bool,
    /// 项目目录，所有相对路径基于它解析
    pub project_dir: PathBuf,
    pub config: DeployConfig,
    pub console: Console,
}

impl CommandContext {
    /// 解析配置中的相对路径
    pub fn path(&self, relative: &std::path::Path) -> PathBuf {
        self.config.resolve(&self.project_dir, relative)
    }
}

/// 命令处理器 trait
pub trait CommandHandler {
    /// 执行命令
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}
