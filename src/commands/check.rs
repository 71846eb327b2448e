//! check 命令处理器
//!
//! 非交互校验，不修改任何文件

use super::{CommandContext, CommandHandler};
use crate::core::discovery::discover_files;
use crate::core::env_file::EnvFile;
use crate::core::reconcile::{Reconciler, check_critical};
use crate::error::{DeployError, Result};
use crate::utils::paths::file_exists;

/// check 命令
pub struct CheckCommand;

impl CommandHandler for CheckCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let env_path = ctx.path(&ctx.config.paths.env_file);
        if !file_exists(&env_path) {
            return Err(DeployError::EnvFileMissing(env_path));
        }
        let env = EnvFile::load(&env_path)?;

        let discovered = discover_files(
            &ctx.path(&ctx.config.paths.topology),
            &ctx.path(&ctx.config.paths.app_config),
        )?;
        let required =
            Reconciler::required(&discovered, ctx.config.secret_names(), &ctx.config.critical);

        let missing_secrets: Vec<&str> = ctx
            .config
            .secret_names()
            .filter(|name| !env.is_set(name))
            .collect();
        if !missing_secrets.is_empty() {
            ctx.console.warning(&format!(
                "以下密钥尚未生成: {} (运行 secrets 命令生成)",
                missing_secrets.join(", ")
            ));
        }

        let missing: Vec<&str> = required
            .iter()
            .map(String::as_str)
            .filter(|name| !env.is_set(name))
            .collect();

        if missing.is_empty() {
            ctx.console
                .success(&format!("{} 个必需变量均已设置", required.len()));
        } else {
            ctx.console
                .warning(&format!("以下变量仍未设置: {}", missing.join(", ")));
        }

        check_critical(&env, &ctx.config.critical)
    }
}
