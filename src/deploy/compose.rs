//! 容器编排命令
//!
//! 只把编排工具当作不透明的外部调用：成功与否看退出状态

use crate::config::ComposeConfig;
use crate::error::{DeployError, Result};
use crate::utils::executor::{CommandOutput, CommandRunner};
use std::time::Duration;

/// `docker compose` 封装
pub struct Compose<'a> {
    config: &'a ComposeConfig,
    runner: &'a dyn CommandRunner,
}

impl<'a> Compose<'a> {
    pub fn new(config: &'a ComposeConfig, runner: &'a dyn CommandRunner) -> Self {
        Self { config, runner }
    }

    fn args<S: AsRef<str>>(&self, extra: &[S]) -> Vec<String> {
        self.config
            .args
            .iter()
            .cloned()
            .chain(extra.iter().map(|s| s.as_ref().to_string()))
            .collect()
    }

    /// 拉取镜像
    pub fn pull(&self) -> Result<bool> {
        self.runner.status(&self.config.program, &self.args(&["pull"]))
    }

    /// 后台启动所有服务
    pub fn up(&self) -> Result<()> {
        if self.runner.status(&self.config.program, &self.args(&["up", "-d"]))? {
            Ok(())
        } else {
            Err(DeployError::ServiceStartFailed(format!(
                "{} {} up -d 返回非零状态",
                self.config.program,
                self.config.args.join(" ")
            )))
        }
    }

    /// 重启 API 服务
    pub fn restart_api(&self) -> Result<()> {
        let api = self.config.api_service.as_str();
        if self.runner.status(&self.config.program, &self.args(&["restart", api]))? {
            Ok(())
        } else {
            Err(DeployError::ServiceStartFailed(format!("无法重启服务 {api}")))
        }
    }

    /// 停止并移除所有服务
    pub fn down(&self) -> Result<bool> {
        self.runner.status(&self.config.program, &self.args(&["down"]))
    }

    /// 正在运行的服务名
    pub fn running_services(&self) -> Result<Vec<String>> {
        let out = self.runner.output(
            &self.config.program,
            &self.args(&["ps", "--status", "running", "--services"]),
        )?;
        if !out.success {
            return Ok(Vec::new());
        }
        Ok(out
            .stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// 轮询直到 API 服务处于运行状态，超出重试次数返回 `false`
    pub fn wait_ready(&self) -> Result<bool> {
        let readiness = &self.config.readiness;
        for attempt in 1..=readiness.retries {
            if self
                .running_services()?
                .iter()
                .any(|s| s == &self.config.api_service)
            {
                tracing::debug!(attempt, "API 服务已就绪");
                return Ok(true);
            }
            tracing::debug!(attempt, retries = readiness.retries, "等待 API 服务");
            std::thread::sleep(Duration::from_millis(readiness.interval_ms));
        }
        Ok(false)
    }

    /// 执行任意编排子命令并捕获输出
    pub fn exec(&self, sub: &[String]) -> Result<CommandOutput> {
        self.runner.output(&self.config.program, &self.args(sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReadinessConfig;
    use crate::test_utils::FakeRunner;

    fn config() -> ComposeConfig {
        ComposeConfig {
            readiness: ReadinessConfig {
                retries: 3,
                interval_ms: 0,
            },
            ..ComposeConfig::default()
        }
    }

    #[test]
    fn test_up_success() {
        let config = config();
        let runner = FakeRunner::new();
        Compose::new(&config, &runner).up().unwrap();
        assert_eq!(runner.calls(), vec!["docker compose up -d"]);
    }

    #[test]
    fn test_up_failure_is_fatal() {
        let config = config();
        let runner = FakeRunner::new().on("up -d", false, "");
        let result = Compose::new(&config, &runner).up();
        assert!(matches!(result, Err(DeployError::ServiceStartFailed(_))));
    }

    #[test]
    fn test_wait_ready_finds_api() {
        let config = config();
        let runner = FakeRunner::new().on("ps --status running", true, "mongodb\napi\n");
        assert!(Compose::new(&config, &runner).wait_ready().unwrap());
        assert_eq!(runner.calls().len(), 1);
    }

    #[test]
    fn test_wait_ready_gives_up() {
        let config = config();
        let runner = FakeRunner::new().on("ps --status running", true, "mongodb\n");
        assert!(!Compose::new(&config, &runner).wait_ready().unwrap());
        assert_eq!(runner.calls().len(), 3);
    }

    #[test]
    fn test_restart_uses_api_service() {
        let config = ComposeConfig {
            api_service: "backend".to_string(),
            ..config()
        };
        let runner = FakeRunner::new();
        Compose::new(&config, &runner).restart_api().unwrap();
        assert!(runner.called("docker compose restart backend"));
    }

    #[test]
    fn test_custom_program() {
        let config = ComposeConfig {
            program: "podman-compose".to_string(),
            args: vec![],
            ..config()
        };
        let runner = FakeRunner::new();
        Compose::new(&config, &runner).down().unwrap();
        assert_eq!(runner.calls(), vec!["podman-compose down"]);
    }
}
