//! envdeploy 主程序入口
//!
//! 设计原则：
//! - 模块化：入口代码简洁，逻辑委托给各命令处理器
//! - 错误处理：详细/安静错误模式，通过 --verbose 切换

use clap::Parser;
use envdeploy::cli::{Cli, Commands};
use envdeploy::commands::check::CheckCommand;
use envdeploy::commands::deploy::DeployCommand;
use envdeploy::commands::discover::DiscoverCommand;
use envdeploy::commands::secrets::SecretsCommand;
use envdeploy::commands::stop::StopCommand;
use envdeploy::commands::{CommandContext, CommandHandler};
use envdeploy::config::DeployConfig;
use envdeploy::deploy::DeployOptions;
use envdeploy::output::Console;
use envdeploy::{OutputFormat, Result};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let ctx = match init_context(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            e.report(cli.verbose);
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, &ctx) {
        e.report(ctx.verbose);
        std::process::exit(1);
    }
}

/// 初始化诊断日志，`RUST_LOG` 优先
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// 加载配置，构造命令上下文
fn init_context(cli: &Cli) -> Result<CommandContext> {
    let config = DeployConfig::load(&cli.dir, cli.config.as_deref())?;
    // discover 的输出需要保持可被脚本解析
    let quiet = matches!(cli.command, Commands::Discover { .. });

    Ok(CommandContext {
        verbose: cli.verbose,
        project_dir: cli.dir.clone(),
        config,
        console: Console::new(quiet),
    })
}

/// 运行具体命令
fn run_command(command: Commands, ctx: &CommandContext) -> Result<()> {
    let handler: Box<dyn CommandHandler> = match command {
        Commands::Deploy {
            non_interactive,
            no_start,
            pull,
            skip_user,
        } => Box::new(DeployCommand::new(
            DeployOptions {
                no_start,
                pull,
                skip_user: skip_user || non_interactive,
            },
            !non_interactive,
        )),
        Commands::Discover { format } => {
            Box::new(DiscoverCommand::new(OutputFormat::from(format.as_str())))
        }
        Commands::Secrets => Box::new(SecretsCommand),
        Commands::Check => Box::new(CheckCommand),
        Commands::Stop => Box::new(StopCommand),
    };

    handler.execute(ctx)
}
