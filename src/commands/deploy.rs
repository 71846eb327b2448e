//! deploy 命令处理器

use super::{CommandContext, CommandHandler};
use crate::deploy::{DeployOptions, Deployer};
use crate::error::Result;
use crate::utils::executor::SystemRunner;
use crate::utils::prompt::{NonInteractivePrompter, Prompter, TerminalPrompter};
use ring::rand::SystemRandom;

/// deploy 命令
pub struct DeployCommand {
    options: DeployOptions,
    interactive: bool,
}

impl DeployCommand {
    pub fn new(options: DeployOptions, interactive: bool) -> Self {
        Self {
            options,
            interactive,
        }
    }
}

impl CommandHandler for DeployCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let runner = SystemRunner::in_dir(&ctx.project_dir);
        let rng = SystemRandom::new();
        let mut prompter: Box<dyn Prompter> = if self.interactive {
            Box::new(TerminalPrompter)
        } else {
            Box::new(NonInteractivePrompter)
        };

        let outcome = Deployer::new(&ctx.project_dir, &ctx.config, &runner, &rng, ctx.console)
            .run(&self.options, prompter.as_mut())?;

        if ctx.verbose {
            println!(
                "首次运行: {} | 新生成密钥: {} | 本次填写: {} | 跳过: {}",
                outcome.first_run,
                outcome.generated.len(),
                outcome.report.provided.len(),
                outcome.report.skipped.len()
            );
        }
        Ok(())
    }
}
