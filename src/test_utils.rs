//! 测试工具模块
//!
//! 提供脚本化的提示器、可编程的命令执行器和临时项目目录

use crate::error::Result;
use crate::utils::executor::{CommandOutput, CommandRunner};
use crate::utils::prompt::Prompter;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// 按顺序回放预设答案的提示器
///
/// 答案用尽或为空时取默认值
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    prompts: Vec<String>,
    secret_prompts: usize,
}

impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|s| (*s).to_string()).collect(),
            ..Self::default()
        }
    }

    /// 已经展示过的提示
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn secret_prompts(&self) -> usize {
        self.secret_prompts
    }

    fn next(&mut self, prompt: &str) -> Option<String> {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front().filter(|a| !a.is_empty())
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&mut self, prompt: &str, default: Option<&str>) -> Result<String> {
        Ok(self
            .next(prompt)
            .unwrap_or_else(|| default.unwrap_or_default().to_string()))
    }

    fn secret(&mut self, prompt: &str) -> Result<String> {
        self.secret_prompts += 1;
        Ok(self.next(prompt).unwrap_or_default())
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        Ok(match self.next(prompt).as_deref() {
            Some("y" | "yes") => true,
            Some(_) => false,
            None => default,
        })
    }
}

/// 记录调用并按规则返回结果的命令执行器
///
/// 规则按注册顺序匹配：参数拼接后包含 `pattern` 即命中
#[derive(Debug, Default)]
pub struct FakeRunner {
    rules: Vec<(String, CommandOutput)>,
    calls: RefCell<Vec<String>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册一条响应规则
    pub fn on(mut self, pattern: &str, success: bool, stdout: &str) -> Self {
        self.rules.push((
            pattern.to_string(),
            CommandOutput {
                success,
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
        ));
        self
    }

    /// 所有调用（`program arg1 arg2 ...`）
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// 是否有调用包含 `pattern`
    pub fn called(&self, pattern: &str) -> bool {
        self.calls.borrow().iter().any(|c| c.contains(pattern))
    }

    fn respond(&self, program: &str, args: &[String]) -> CommandOutput {
        let line = std::iter::once(program.to_string())
            .chain(args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.borrow_mut().push(line.clone());

        self.rules
            .iter()
            .find(|(pattern, _)| line.contains(pattern.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or(CommandOutput {
                success: true,
                stdout: String::new(),
                stderr: String::new(),
            })
    }
}

impl CommandRunner for FakeRunner {
    fn output(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        Ok(self.respond(program, args))
    }

    fn status(&self, program: &str, args: &[String]) -> Result<bool> {
        Ok(self.respond(program, args).success)
    }
}

/// 临时项目目录
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    /// 创建包含拓扑、应用配置与模板的项目
    pub fn new(topology: &str, app_config: Option<&str>, template: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("docker-compose.yml"), topology).unwrap();
        if let Some(config) = app_config {
            std::fs::write(dir.path().join("librechat.yaml"), config).unwrap();
        }
        std::fs::write(dir.path().join(".env.example"), template).unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, name: &str, content: &str) {
        std::fs::write(self.dir.path().join(name), content).unwrap();
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).unwrap()
    }
}

/// 写入共享缓冲区的日志输出
#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// 在 debug 级别的订阅器下运行 `f`，返回期间产生的全部日志文本
pub fn capture_debug_log<F: FnOnce()>(f: F) -> String {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, f);

    let bytes = log.0.lock().unwrap().clone();
    String::from_utf8_lossy(&bytes).into_owned()
}
