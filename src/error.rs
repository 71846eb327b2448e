//! 错误处理模块 (修复原则：明确抛出异常)

use std::error::Error;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("文件IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置源不存在: {0}")]
    SourceNotFound(PathBuf),

    #[error("环境模板不存在: {0}")]
    TemplateNotFound(PathBuf),

    #[error("环境文件不存在: {0} (请先运行 deploy 或 secrets)")]
    EnvFileMissing(PathBuf),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("无效的变量名: {0}")]
    InvalidVariableName(String),

    #[error("关键变量未设置: {}", .0.join(", "))]
    MissingCritical(Vec<String>),

    #[error("随机数生成失败")]
    Random,

    #[error("交互输入失败: {0}")]
    Prompt(String),

    #[error("命令未找到: {0}")]
    CommandNotFound(String),

    #[error("服务启动失败: {0}")]
    ServiceStartFailed(String),

    #[error("命令执行失败: {0}")]
    CommandExecutionFailed(String),

    #[error("JSON序列化错误: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<dialoguer::Error> for DeployError {
    fn from(err: dialoguer::Error) -> Self {
        DeployError::Prompt(err.to_string())
    }
}

impl From<ring::error::Unspecified> for DeployError {
    fn from(_: ring::error::Unspecified) -> Self {
        DeployError::Random
    }
}

/// 详细的错误报告函数 (透明原则)
impl DeployError {
    /// 报告错误，支持详细/安静模式
    /// verbose = true: 详细错误链
    /// verbose = false: 关键信息，安静模式
    pub fn report(&self, verbose: bool) {
        if verbose {
            eprintln!("❌ 错误: {}", self);

            if let Some(source) = self.source() {
                eprintln!("  └─ 原因: {}", source);
                let mut current = source.source();
                while let Some(next) = current {
                    eprintln!("     └─ {}", next);
                    current = next.source();
                }
            }
        } else {
            match self {
                DeployError::MissingCritical(names) => {
                    eprintln!("关键变量未设置: {}", names.join(", "));
                    eprintln!("请编辑环境文件填入这些变量后重新运行");
                }
                DeployError::SourceNotFound(path) => {
                    eprintln!("配置源不存在: {}", path.display())
                }
                DeployError::TemplateNotFound(path) => {
                    eprintln!("环境模板不存在: {}", path.display())
                }
                DeployError::Io(err) => eprintln!("文件错误: {}", err),
                _ => eprintln!("错误: {}", self),
            }
        }
    }
}

/// 简化 Result 类型别名
pub type Result<T> = std::result::Result<T, DeployError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_critical_names_variables() {
        let err = DeployError::MissingCritical(vec!["API_KEY".to_string()]);
        assert!(err.to_string().contains("API_KEY"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: DeployError = io.into();
        assert!(matches!(err, DeployError::Io(_)));
    }
}
