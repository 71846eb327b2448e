//! 核心数据结构定义 (表达原则：用数据结构表达逻辑)

use serde::{Deserialize, Serialize};
use std::fmt;

/// 变量名：`[A-Z_][A-Z0-9_]*`
///
/// 只能通过 [`VariableName::parse`] 构造，保证语法合法。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct VariableName(String);

impl VariableName {
    /// 校验并构造变量名
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let first = chars.next()?;
        if !(first.is_ascii_uppercase() || first == '_') {
            return None;
        }
        if chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_') {
            Some(Self(s.to_string()))
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VariableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// 需要自动生成的密钥：(变量名, 字节数)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretSpec {
    pub name: String,
    pub bytes: usize,
}

impl SecretSpec {
    pub fn new(name: &str, bytes: usize) -> Self {
        Self {
            name: name.to_string(),
            bytes,
        }
    }
}

/// 部署流程阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    DirectoriesReady,
    EnvFileReady,
    SecretsGenerated,
    Validated,
    ServicesStarted,
    FirstRunUserPrompt,
    ApiRestarted,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::DirectoriesReady => "directories-ready",
            Stage::EnvFileReady => "env-file-ready",
            Stage::SecretsGenerated => "secrets-generated",
            Stage::Validated => "validated",
            Stage::ServicesStarted => "services-started",
            Stage::FirstRunUserPrompt => "first-run-user-prompt",
            Stage::ApiRestarted => "api-restarted",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// 输出格式类型
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Env,
    Json,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" | "j" => OutputFormat::Json,
            _ => OutputFormat::Env,
        }
    }
}
