//! CLI 参数定义

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// envdeploy - 聊天应用本地部署工具
#[derive(Parser)]
#[command(
    name = "envdeploy",
    version,
    about = "聊天应用本地部署工具",
    long_about = "扫描编排与应用配置中的 ${VAR} 引用，生成密钥、补全环境文件并启动容器服务"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 详细输出模式
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 项目目录
    #[arg(short, long, global = true, default_value = ".")]
    pub dir: PathBuf,

    /// 配置文件 (默认 <dir>/envdeploy.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 完整部署流程
    Deploy {
        /// 不询问任何输入，缺失的变量保持未设置
        #[arg(long)]
        non_interactive: bool,
        /// 只准备环境文件，不启动服务
        #[arg(long)]
        no_start: bool,
        /// 启动前拉取镜像
        #[arg(long)]
        pull: bool,
        /// 不询问创建管理员
        #[arg(long)]
        skip_user: bool,
    },

    /// 列出配置源引用的变量
    Discover {
        /// 输出格式 (env/json)
        #[arg(short, long, default_value = "env")]
        format: String,
    },

    /// 生成缺失的密钥
    Secrets,

    /// 检查环境文件（不修改任何文件）
    Check,

    /// 停止服务
    Stop,
}
