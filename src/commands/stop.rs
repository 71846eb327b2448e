//! stop 命令处理器

use super::{CommandContext, CommandHandler};
use crate::deploy::compose::Compose;
use crate::error::{DeployError, Result};
use crate::utils::executor::SystemRunner;

/// stop 命令
pub struct StopCommand;

impl CommandHandler for StopCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let runner = SystemRunner::in_dir(&ctx.project_dir);
        let compose = Compose::new(&ctx.config.compose, &runner);

        ctx.console.step("停止服务");
        if compose.down()? {
            ctx.console.success("服务已停止");
            Ok(())
        } else {
            Err(DeployError::CommandExecutionFailed("停止服务失败".to_string()))
        }
    }
}
