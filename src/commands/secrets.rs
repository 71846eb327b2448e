//! secrets 命令处理器

use super::{CommandContext, CommandHandler};
use crate::core::env_file::EnvFile;
use crate::core::secrets::generate_secrets;
use crate::error::Result;
use crate::utils::paths::copy_if_absent;
use ring::rand::SystemRandom;

/// secrets 命令：只生成缺失的密钥
pub struct SecretsCommand;

impl CommandHandler for SecretsCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let env_path = ctx.path(&ctx.config.paths.env_file);
        let template = ctx.path(&ctx.config.paths.env_template);

        if copy_if_absent(&template, &env_path)? {
            ctx.console
                .success(&format!("已从 {} 创建 {}", template.display(), env_path.display()));
        }

        let mut env = EnvFile::load(&env_path)?;
        let generated = generate_secrets(&mut env, &ctx.config.secrets, &SystemRandom::new())?;
        env.save()?;

        if generated.is_empty() {
            ctx.console.info("所有密钥均已存在");
        } else {
            for name in &generated {
                ctx.console.success(&format!("已生成 {name}"));
            }
        }
        Ok(())
    }
}
