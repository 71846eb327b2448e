//! 工具配置
//!
//! 从项目目录下的 `envdeploy.toml` 加载；文件不存在时使用内置默认值。
//!
//! ```toml
//! critical = ["OPENAI_API_KEY"]
//!
//! [paths]
//! topology = "docker-compose.yml"
//! env_file = ".env"
//!
//! [[secrets]]
//! name = "JWT_SECRET"
//! bytes = 32
//!
//! [prompt.defaults]
//! OPENAI_BASE_URL = "https://api.openai.com/v1"
//! ```

pub mod format;

use crate::core::secrets::default_secrets;
use crate::error::{DeployError, Result};
use crate::types::{SecretSpec, VariableName};
use crate::utils::paths::{file_exists, read_file};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// 默认配置文件名
pub const CONFIG_FILE_NAME: &str = "envdeploy.toml";

/// 工具全局配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// 无论是否被发现都必须有值的变量
    pub critical: Vec<String>,
    pub paths: PathsConfig,
    /// 自动生成的密钥
    pub secrets: Vec<SecretSpec>,
    pub prompt: PromptConfig,
    pub compose: ComposeConfig,
    pub admin: AdminConfig,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            critical: vec!["OPENAI_API_KEY".to_string()],
            paths: PathsConfig::default(),
            secrets: default_secrets(),
            prompt: PromptConfig::default(),
            compose: ComposeConfig::default(),
            admin: AdminConfig::default(),
        }
    }
}

/// 文件与目录布局（相对于项目目录）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// 服务拓扑描述（必需）
    pub topology: PathBuf,
    /// 应用配置描述（可选）
    pub app_config: PathBuf,
    pub env_template: PathBuf,
    pub env_file: PathBuf,
    /// 需要预先创建的数据目录
    pub directories: Vec<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            topology: PathBuf::from("docker-compose.yml"),
            app_config: PathBuf::from("librechat.yaml"),
            env_template: PathBuf::from(".env.example"),
            env_file: PathBuf::from(".env"),
            directories: ["data-node", "meili_data_v1.12", "logs", "uploads", "images"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

/// 提示设置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// 变量名包含这些片段时使用不回显输入
    pub sensitive: Vec<String>,
    /// 提示时展示的默认值
    pub defaults: BTreeMap<String, String>,
}

impl Default for PromptConfig {
    fn default() -> Self {
        let mut defaults = BTreeMap::new();
        defaults.insert(
            "OPENAI_BASE_URL".to_string(),
            "https://api.openai.com/v1".to_string(),
        );
        Self {
            sensitive: ["KEY", "SECRET", "PASSWORD", "TOKEN"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            defaults,
        }
    }
}

impl PromptConfig {
    /// 变量是否需要不回显输入
    pub fn is_sensitive(&self, name: &str) -> bool {
        self.sensitive.iter().any(|frag| name.contains(frag.as_str()))
    }
}

/// 容器编排命令
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeConfig {
    pub program: String,
    /// 每条编排命令的前置参数
    pub args: Vec<String>,
    pub api_service: String,
    /// 部署完成后展示的访问地址
    pub app_url: String,
    pub readiness: ReadinessConfig,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            program: "docker".to_string(),
            args: vec!["compose".to_string()],
            api_service: "api".to_string(),
            app_url: "http://localhost:3080".to_string(),
            readiness: ReadinessConfig::default(),
        }
    }
}

/// 服务就绪轮询
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    pub retries: u32,
    pub interval_ms: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            retries: 30,
            interval_ms: 2000,
        }
    }
}

/// 管理员用户创建
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// 统计已有用户数量的编排子命令，输出最后一行应为整数
    pub count_users: Vec<String>,
    /// 创建用户的编排子命令，其后追加位置参数
    pub create_user: Vec<String>,
    pub verified_flag: String,
    /// 创建成功时输出中包含的文本
    pub success_marker: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        let to_vec = |items: &[&str]| items.iter().map(|s| (*s).to_string()).collect();
        Self {
            count_users: to_vec(&[
                "exec",
                "-T",
                "mongodb",
                "mongosh",
                "LibreChat",
                "--quiet",
                "--eval",
                "db.users.countDocuments()",
            ]),
            create_user: to_vec(&["exec", "-T", "api", "npm", "run", "create-user"]),
            verified_flag: "--email-verified=true".to_string(),
            success_marker: "User created successfully".to_string(),
        }
    }
}

impl DeployConfig {
    /// 加载配置
    ///
    /// - 显式指定的文件必须存在
    /// - 否则读取项目目录下的 `envdeploy.toml`，不存在则使用默认值
    pub fn load(project_dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !file_exists(path) {
                    return Err(DeployError::Config(format!(
                        "配置文件不存在: {}",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => {
                let path = project_dir.join(CONFIG_FILE_NAME);
                if !file_exists(&path) {
                    tracing::debug!("未找到 {}，使用默认配置", CONFIG_FILE_NAME);
                    return Ok(Self::default());
                }
                path
            }
        };

        let content = read_file(&path)?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "已加载配置");
        Ok(config)
    }

    /// 解析并校验 TOML 配置
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| DeployError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 校验变量名语法与密钥长度
    pub fn validate(&self) -> Result<()> {
        let names = self
            .secrets
            .iter()
            .map(|s| &s.name)
            .chain(&self.critical)
            .chain(self.prompt.defaults.keys());
        for name in names {
            if VariableName::parse(name).is_none() {
                return Err(DeployError::InvalidVariableName(name.clone()));
            }
        }

        if let Some(spec) = self.secrets.iter().find(|s| s.bytes == 0) {
            return Err(DeployError::Config(format!(
                "密钥 {} 的字节数必须大于 0",
                spec.name
            )));
        }

        if self.compose.program.trim().is_empty() {
            return Err(DeployError::Config("compose.program 不能为空".to_string()));
        }

        Ok(())
    }

    /// 自动生成的变量名
    pub fn secret_names(&self) -> impl Iterator<Item = &str> {
        self.secrets.iter().map(|s| s.name.as_str())
    }

    /// 将相对路径解析到项目目录
    pub fn resolve(&self, project_dir: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            project_dir.join(path)
        }
    }
}
