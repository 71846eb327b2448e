//! 外部命令执行器
//!
//! 容器编排与用户创建都是不透明的外部调用，
//! 成功与否只看退出状态和输出文本

use crate::error::{DeployError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// 捕获的命令输出
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// 外部命令接口
pub trait CommandRunner {
    /// 执行命令并捕获输出
    fn output(&self, program: &str, args: &[String]) -> Result<CommandOutput>;

    /// 执行命令，继承标准流，返回是否成功
    fn status(&self, program: &str, args: &[String]) -> Result<bool>;
}

/// 基于 `std::process` 的实现
#[derive(Debug, Default)]
pub struct SystemRunner {
    /// 子进程工作目录，`None` 时继承当前目录
    dir: Option<PathBuf>,
}

impl SystemRunner {
    /// 在指定目录下执行命令
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            dir: Some(dir.to_path_buf()),
        }
    }

    fn command(&self, program: &str, args: &[String]) -> Command {
        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(dir) = &self.dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    fn not_found(program: &str, err: std::io::Error) -> DeployError {
        DeployError::CommandNotFound(format!(
            "{}: {} (请确保命令在 PATH 中或使用完整路径)",
            program, err
        ))
    }
}

impl CommandRunner for SystemRunner {
    fn output(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        // 参数可能含有密码，只记录个数
        tracing::debug!(program, argc = args.len(), "执行命令");

        let output = self
            .command(program, args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Self::not_found(program, e))?;

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn status(&self, program: &str, args: &[String]) -> Result<bool> {
        tracing::debug!(program, argc = args.len(), "执行命令 (继承标准流)");

        let status = self
            .command(program, args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| Self::not_found(program, e))?;

        Ok(status.success())
    }
}
