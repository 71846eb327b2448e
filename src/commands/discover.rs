//! discover 命令处理器

use super::{CommandContext, CommandHandler};
use crate::core::discovery::discover_files;
use crate::error::Result;
use crate::types::OutputFormat;

/// discover 命令
pub struct DiscoverCommand {
    format: OutputFormat,
}

impl DiscoverCommand {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl CommandHandler for DiscoverCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let names = discover_files(
            &ctx.path(&ctx.config.paths.topology),
            &ctx.path(&ctx.config.paths.app_config),
        )?;

        match self.format {
            OutputFormat::Env => {
                for name in &names {
                    println!("{}", name);
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&names)?);
            }
        }

        Ok(())
    }
}
