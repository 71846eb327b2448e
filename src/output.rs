//! 控制台输出
//!
//! 分级展示：info / success / warning / error / step

use owo_colors::OwoColorize as _;

/// 面向操作员的控制台输出
#[derive(Debug, Clone, Copy, Default)]
pub struct Console {
    /// 安静模式下只输出 warning 和 error
    pub quiet: bool,
}

impl Console {
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// 阶段标题
    pub fn step(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", "→".cyan(), message.bold());
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("  {} {message}", "ℹ".blue());
        }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("  {} {message}", "✓".green());
        }
    }

    pub fn warning(&self, message: &str) {
        eprintln!("  {} {message}", "⚠".yellow());
    }

    pub fn error(&self, message: &str) {
        eprintln!("  {} {message}", "✗".red());
    }
}
