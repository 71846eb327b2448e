//! 协调 / 验证
//!
//! `required = 发现的变量 − 自动生成的密钥`，对未满足的变量逐个询问操作员。

use crate::config::PromptConfig;
use crate::core::env_file::EnvFile;
use crate::error::{DeployError, Result};
use crate::types::VariableName;
use crate::utils::prompt::Prompter;
use std::collections::BTreeSet;

/// 协调结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    /// 协调前已有值
    pub satisfied: Vec<String>,
    /// 本次由操作员提供（或接受默认值）
    pub provided: Vec<String>,
    /// 操作员跳过
    pub skipped: Vec<String>,
    /// 提示结束后仍未设置
    pub still_missing: Vec<String>,
}

/// 变量协调器
pub struct Reconciler<'a> {
    prompt: &'a PromptConfig,
    prompter: &'a mut dyn Prompter,
}

impl<'a> Reconciler<'a> {
    pub fn new(prompt: &'a PromptConfig, prompter: &'a mut dyn Prompter) -> Self {
        Self { prompt, prompter }
    }

    /// 计算需要操作员提供的变量
    ///
    /// 关键变量总是包含在内，即使没有被任何配置源引用
    pub fn required<'n>(
        discovered: &BTreeSet<VariableName>,
        generated: impl IntoIterator<Item = &'n str>,
        critical: &[String],
    ) -> BTreeSet<String> {
        let generated: BTreeSet<&str> = generated.into_iter().collect();
        discovered
            .iter()
            .map(VariableName::as_str)
            .filter(|name| !generated.contains(name))
            .map(str::to_string)
            .chain(critical.iter().cloned())
            .collect()
    }

    /// 逐个询问未满足的变量，写入 `env`（不写回磁盘）
    pub fn reconcile(
        &mut self,
        env: &mut EnvFile,
        required: &BTreeSet<String>,
    ) -> Result<ReconcileReport> {
        let mut report = ReconcileReport::default();

        for name in required {
            if env.is_set(name) {
                report.satisfied.push(name.clone());
                continue;
            }

            let value = self.ask(name)?;
            if value.is_empty() {
                tracing::debug!(name = %name, "变量被跳过");
                report.skipped.push(name.clone());
            } else {
                env.set(name, &value);
                report.provided.push(name.clone());
            }
        }

        report.still_missing = required
            .iter()
            .filter(|name| !env.is_set(name))
            .cloned()
            .collect();

        Ok(report)
    }

    fn ask(&mut self, name: &str) -> Result<String> {
        let default = self.prompt.defaults.get(name).map(String::as_str);
        let value = if self.prompt.is_sensitive(name) && default.is_none() {
            self.prompter.secret(&format!("请输入 {name} (留空跳过)"))?
        } else {
            self.prompter
                .input(&format!("请输入 {name} (留空跳过)"), default)?
        };
        Ok(value.trim().to_string())
    }
}

/// 检查关键变量，任一为空即失败
pub fn check_critical(env: &EnvFile, critical: &[String]) -> Result<()> {
    let missing: Vec<String> = critical
        .iter()
        .filter(|name| !env.is_set(name))
        .cloned()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DeployError::MissingCritical(missing))
    }
}
