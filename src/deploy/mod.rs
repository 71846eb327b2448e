//! 部署流程
//!
//! `Init → DirectoriesReady → EnvFileReady → SecretsGenerated → Validated
//!  → (ServicesStarted → [FirstRunUserPrompt] → ApiRestarted → Done) | Fatal`
//!
//! `ServicesStarted` 之前缺失必需文件或关键变量直接中止；
//! 之后服务启动失败同样中止；可选子步骤失败只发出警告。

pub mod admin;
pub mod compose;

use crate::config::DeployConfig;
use crate::core::discovery::discover_files;
use crate::core::env_file::EnvFile;
use crate::core::reconcile::{ReconcileReport, Reconciler, check_critical};
use crate::core::secrets::generate_secrets;
use crate::error::Result;
use crate::output::Console;
use crate::types::Stage;
use crate::utils::executor::CommandRunner;
use crate::utils::paths::{copy_if_absent, ensure_dirs};
use crate::utils::prompt::Prompter;
use admin::AdminSetup;
use compose::Compose;
use ring::rand::SecureRandom;
use std::path::{Path, PathBuf};

/// 部署选项（来自命令行）
#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    /// 只准备环境文件，不启动服务
    pub no_start: bool,
    /// 启动前拉取镜像
    pub pull: bool,
    /// 不询问创建管理员
    pub skip_user: bool,
}

/// 部署结果摘要
#[derive(Debug, Clone, PartialEq)]
pub struct DeployOutcome {
    pub stage: Stage,
    pub first_run: bool,
    pub generated: Vec<String>,
    pub report: ReconcileReport,
    pub admin_created: bool,
}

/// 部署编排器
pub struct Deployer<'a> {
    project_dir: PathBuf,
    config: &'a DeployConfig,
    runner: &'a dyn CommandRunner,
    rng: &'a dyn SecureRandom,
    console: Console,
    stage: Stage,
}

impl<'a> Deployer<'a> {
    pub fn new(
        project_dir: &Path,
        config: &'a DeployConfig,
        runner: &'a dyn CommandRunner,
        rng: &'a dyn SecureRandom,
        console: Console,
    ) -> Self {
        Self {
            project_dir: project_dir.to_path_buf(),
            config,
            runner,
            rng,
            console,
            stage: Stage::Init,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn advance(&mut self, stage: Stage) {
        tracing::info!(from = %self.stage, to = %stage, "阶段迁移");
        self.stage = stage;
    }

    fn path(&self, relative: &Path) -> PathBuf {
        self.config.resolve(&self.project_dir, relative)
    }

    /// 创建数据目录
    pub fn prepare_directories(&mut self) -> Result<()> {
        self.console.step("准备数据目录");
        let created = ensure_dirs(&self.project_dir, &self.config.paths.directories)?;
        for dir in &created {
            self.console.success(&format!("已创建 {}", dir.display()));
        }
        if created.is_empty() {
            self.console.info("数据目录已存在");
        }
        self.advance(Stage::DirectoriesReady);
        Ok(())
    }

    /// 首次运行时从模板复制环境文件，返回 (环境文件, 是否首次运行)
    pub fn prepare_env_file(&mut self) -> Result<(EnvFile, bool)> {
        self.console.step("准备环境文件");
        let env_path = self.path(&self.config.paths.env_file);
        let template = self.path(&self.config.paths.env_template);

        let first_run = copy_if_absent(&template, &env_path)?;
        if first_run {
            self.console.success(&format!(
                "已从 {} 创建 {}",
                template.display(),
                env_path.display()
            ));
        } else {
            self.console
                .info(&format!("使用已有的 {}", env_path.display()));
        }

        let env = EnvFile::load(&env_path)?;
        self.advance(Stage::EnvFileReady);
        Ok((env, first_run))
    }

    /// 为缺失的密钥生成随机值并写回
    pub fn generate(&mut self, env: &mut EnvFile) -> Result<Vec<String>> {
        self.console.step("生成密钥");
        let generated = generate_secrets(env, &self.config.secrets, self.rng)?;
        env.save()?;
        if generated.is_empty() {
            self.console.info("所有密钥均已存在");
        } else {
            self.console
                .success(&format!("已生成: {}", generated.join(", ")));
        }
        self.advance(Stage::SecretsGenerated);
        Ok(generated)
    }

    /// 发现变量、询问缺失值、检查关键变量
    pub fn validate(
        &mut self,
        env: &mut EnvFile,
        prompter: &mut dyn Prompter,
    ) -> Result<ReconcileReport> {
        self.console.step("检查配置变量");
        let discovered = discover_files(
            &self.path(&self.config.paths.topology),
            &self.path(&self.config.paths.app_config),
        )?;
        self.console
            .info(&format!("配置源共引用 {} 个变量", discovered.len()));

        let required = Reconciler::required(
            &discovered,
            self.config.secret_names(),
            &self.config.critical,
        );
        let report =
            Reconciler::new(&self.config.prompt, prompter).reconcile(env, &required)?;
        env.save()?;

        if !report.still_missing.is_empty() {
            self.console.warning(&format!(
                "以下变量仍未设置: {}",
                report.still_missing.join(", ")
            ));
        }

        check_critical(env, &self.config.critical)?;
        self.console.success("配置变量检查完成");
        self.advance(Stage::Validated);
        Ok(report)
    }

    /// 启动服务、首次运行时可选创建管理员、重启 API
    pub fn start_services(
        &mut self,
        options: &DeployOptions,
        first_run: bool,
        prompter: &mut dyn Prompter,
    ) -> Result<bool> {
        let config = self.config;
        let compose = Compose::new(&config.compose, self.runner);

        if options.pull {
            self.console.step("拉取镜像");
            if !compose.pull()? {
                self.console.warning("镜像拉取失败，使用本地已有镜像继续");
            }
        }

        self.console.step("启动服务");
        compose.up()?;
        self.advance(Stage::ServicesStarted);

        if !compose.wait_ready()? {
            self.console.warning(&format!(
                "等待 {} 服务就绪超时，继续执行",
                config.compose.api_service
            ));
        }

        let mut admin_created = false;
        if !first_run {
            tracing::debug!("环境文件已存在，跳过管理员创建");
        } else if !options.skip_user {
            self.advance(Stage::FirstRunUserPrompt);
            let setup = AdminSetup::new(&config.admin, &compose, self.console);
            admin_created = setup.run(prompter)?;
        }

        self.console.step("重启 API 服务");
        compose.restart_api()?;
        self.advance(Stage::ApiRestarted);

        Ok(admin_created)
    }

    /// 完整部署流程
    pub fn run(
        &mut self,
        options: &DeployOptions,
        prompter: &mut dyn Prompter,
    ) -> Result<DeployOutcome> {
        self.prepare_directories()?;
        let (mut env, first_run) = self.prepare_env_file()?;
        let generated = self.generate(&mut env)?;
        let report = self.validate(&mut env, prompter)?;

        let admin_created = if options.no_start {
            self.console.info("已跳过服务启动 (--no-start)");
            false
        } else {
            self.start_services(options, first_run, prompter)?
        };

        self.advance(Stage::Done);
        if !options.no_start {
            self.console.success(&format!(
                "部署完成，访问 {}",
                self.config.compose.app_url
            ));
        }

        Ok(DeployOutcome {
            stage: self.stage,
            first_run,
            generated,
            report,
            admin_created,
        })
    }
}
