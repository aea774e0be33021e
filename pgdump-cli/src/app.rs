use anyhow::{Context, Result};
use pgdump_core::{
    config::AppConfig,
    container::DockerClient,
    generator::DumpGenerator,
    orchestrator::{Orchestrator, RunOptions},
    storage::S3Store,
    target::LabelKeys,
};
use std::path::Path;

use crate::cli::Commands;
use crate::commands;

/// 使用 Docker CLI 和 S3 存储的编排器
pub type DockerOrchestrator = Orchestrator<DockerClient, DockerClient, S3Store>;

pub struct CliApp {
    pub config: AppConfig,
}

impl CliApp {
    /// 加载配置并初始化 CLI 应用
    pub fn load(config_path: &Path) -> Result<Self> {
        let config = AppConfig::load(config_path)
            .with_context(|| format!("加载配置文件 {} 失败", config_path.display()))?;

        Ok(Self { config })
    }

    pub fn label_keys(&self) -> LabelKeys {
        LabelKeys::new(&self.config.docker.label_namespace)
    }

    pub fn docker_client(&self) -> DockerClient {
        DockerClient::new(
            self.label_keys().marker,
            self.config.command_timeout(),
        )
    }

    /// 创建对象存储客户端，未配置存储时直接失败
    pub fn store(&self) -> Result<S3Store> {
        let storage = self.config.require_storage()?;
        S3Store::from_config(storage).context("创建对象存储客户端失败")
    }

    /// 检查 Docker 可用后创建编排器
    pub async fn orchestrator(&self, dry_run: bool) -> Result<DockerOrchestrator> {
        let store = self.store()?;
        let docker = self.docker_client();
        docker
            .check_docker_status()
            .await
            .context("Docker 不可用")?;

        let scratch_dir = self
            .config
            .ensure_scratch_dir()
            .context("创建本地备份目录失败")?;

        Ok(Orchestrator::new(
            docker.clone(),
            DumpGenerator::new(docker, scratch_dir),
            store,
            RunOptions {
                label_keys: self.label_keys(),
                dry_run: dry_run || self.config.schedule.dry_run,
            },
        ))
    }

    /// 运行应用命令
    pub async fn run_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Init { .. } => unreachable!(), // 已经在 main.rs 中处理
            Commands::Run { dry_run } => commands::run_once(self, dry_run).await,
            Commands::Daemon => commands::run_daemon(self).await,
            Commands::Targets => commands::show_targets(self).await,
            Commands::ListDumps { prefix } => commands::list_dumps(self, prefix.as_deref()).await,
        }
    }
}
