//! 操作员交互
//!
//! 所有交互都经过 `Prompter` trait，便于测试与非交互模式替换

use crate::error::Result;
use dialoguer::{Confirm, Input, Password};

/// 交互式提示接口
pub trait Prompter {
    /// 读取一行输入；`default` 为回车时采用的值
    fn input(&mut self, prompt: &str, default: Option<&str>) -> Result<String>;

    /// 读取不回显的输入
    fn secret(&mut self, prompt: &str) -> Result<String>;

    /// 是/否确认
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;
}

/// 终端提示（dialoguer 实现）
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn input(&mut self, prompt: &str, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        Ok(input.interact_text()?.trim().to_string())
    }

    fn secret(&mut self, prompt: &str) -> Result<String> {
        Ok(Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()?)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        Ok(Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }
}

/// 非交互模式：输入取默认值或空，确认一律拒绝
#[derive(Debug, Default)]
pub struct NonInteractivePrompter;

impl Prompter for NonInteractivePrompter {
    fn input(&mut self, _prompt: &str, default: Option<&str>) -> Result<String> {
        Ok(default.unwrap_or_default().to_string())
    }

    fn secret(&mut self, _prompt: &str) -> Result<String> {
        Ok(String::new())
    }

    fn confirm(&mut self, _prompt: &str, _default: bool) -> Result<bool> {
        Ok(false)
    }
}
