//! 管理员用户创建
//!
//! 可选步骤：任何失败都只降级为警告

use crate::config::AdminConfig;
use crate::deploy::compose::Compose;
use crate::error::Result;
use crate::output::Console;
use crate::utils::prompt::Prompter;

/// 用户存在性检查结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserState {
    Exists(u64),
    Empty,
    Unknown,
}

/// 管理员账号信息
#[derive(Clone, PartialEq)]
pub struct AdminAccount {
    pub email: String,
    pub name: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AdminAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAccount")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// 用户创建流程
pub struct AdminSetup<'a> {
    config: &'a AdminConfig,
    compose: &'a Compose<'a>,
    console: Console,
}

impl<'a> AdminSetup<'a> {
    pub fn new(config: &'a AdminConfig, compose: &'a Compose<'a>, console: Console) -> Self {
        Self {
            config,
            compose,
            console,
        }
    }

    /// 查询已有用户数量
    pub fn user_state(&self) -> UserState {
        let output = match self.compose.exec(&self.config.count_users) {
            Ok(output) if output.success => output,
            Ok(output) => {
                tracing::debug!(stderr = %output.stderr.trim(), "用户计数命令失败");
                return UserState::Unknown;
            }
            Err(e) => {
                tracing::debug!(error = %e, "用户计数命令无法执行");
                return UserState::Unknown;
            }
        };

        // 只看最后一个非空行，前面可能是容器输出的提示信息
        match output
            .stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .and_then(|l| l.parse::<u64>().ok())
        {
            Some(0) => UserState::Empty,
            Some(n) => UserState::Exists(n),
            None => UserState::Unknown,
        }
    }

    /// 根据用户状态决定是否创建管理员，返回是否创建成功
    pub fn run(&self, prompter: &mut dyn Prompter) -> Result<bool> {
        let wanted = match self.user_state() {
            UserState::Exists(n) => {
                self.console.info(&format!("已存在 {n} 个用户，跳过管理员创建"));
                return Ok(false);
            }
            UserState::Empty => prompter.confirm("尚无用户，是否创建管理员账号?", true)?,
            UserState::Unknown => {
                self.console.warning("无法确认是否已存在用户");
                prompter.confirm("是否创建管理员账号?", false)?
            }
        };

        if !wanted {
            return Ok(false);
        }

        let Some(account) = self.collect(prompter)? else {
            return Ok(false);
        };
        self.create(&account)
    }

    /// 询问账号信息；信息不完整时返回 `None`
    pub fn collect(&self, prompter: &mut dyn Prompter) -> Result<Option<AdminAccount>> {
        let email = prompter.input("管理员邮箱", None)?;
        if !email.contains('@') {
            self.console.warning("邮箱无效，跳过管理员创建");
            return Ok(None);
        }

        let default_username = email.split('@').next().unwrap_or_default().to_string();
        let name = prompter.input("显示名称", Some(&default_username))?;
        let username = prompter.input("用户名", Some(&default_username))?;

        let password = prompter.secret("密码")?;
        if password.is_empty() {
            self.console.warning("密码为空，跳过管理员创建");
            return Ok(None);
        }
        let confirm = prompter.secret("确认密码")?;
        if password != confirm {
            self.console.warning("两次输入的密码不一致，跳过管理员创建");
            return Ok(None);
        }

        Ok(Some(AdminAccount {
            email,
            name,
            username,
            password,
        }))
    }

    /// 调用创建子进程，输出包含确认文本即成功
    pub fn create(&self, account: &AdminAccount) -> Result<bool> {
        let mut args = self.config.create_user.clone();
        args.extend([
            account.email.clone(),
            account.name.clone(),
            account.username.clone(),
            account.password.clone(),
            self.config.verified_flag.clone(),
        ]);

        let output = match self.compose.exec(&args) {
            Ok(output) => output,
            Err(e) => {
                self.console.warning(&format!("管理员创建失败: {e}"));
                return Ok(false);
            }
        };

        if output.stdout.contains(&self.config.success_marker)
            || output.stderr.contains(&self.config.success_marker)
        {
            self.console
                .success(&format!("管理员 {} 创建成功", account.email));
            Ok(true)
        } else {
            self.console.warning("管理员创建失败，可稍后手动创建");
            // 脚本输出可能回显提交的账号参数，不写入日志
            tracing::debug!(
                exit_ok = output.success,
                stdout_bytes = output.stdout.len(),
                stderr_bytes = output.stderr.len(),
                "创建用户未返回成功标记"
            );
            Ok(false)
        }
    }
}
