use crate::project_info::{metadata, version_info};
use clap::{Parser, Subcommand};
use pgdump_core::constants::config;
use std::path::PathBuf;

/// pgdump CLI - PostgreSQL 容器定时备份工具
#[derive(Parser, Debug)]
#[command(name = "pgdump-cli")]
#[command(about = metadata::PROJECT_DESCRIPTION)]
#[command(version = version_info::CLI_VERSION)]
#[command(long_about = metadata::display::DESCRIPTION_LONG)]
#[command(author = metadata::PROJECT_AUTHORS)]
pub struct Cli {
    /// 配置文件路径
    #[arg(short, long, default_value = config::CONFIG_FILE_NAME)]
    pub config: PathBuf,

    /// 详细输出
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// 创建配置文件模板和本地备份目录
    Init {
        /// 如果配置文件已存在，强制覆盖
        #[arg(long)]
        force: bool,
    },
    /// 立即执行一轮备份
    Run {
        /// 只显示计划，不生成、不上传、不删除
        #[arg(long)]
        dry_run: bool,
    },
    /// 按配置的间隔持续执行备份，Ctrl-C 退出
    Daemon,
    /// 列出发现的备份目标和被拒绝的容器
    Targets,
    /// 列出远端存储中的备份文件
    ListDumps {
        /// 只显示指定前缀的备份
        #[arg(long)]
        prefix: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_config_path() {
        let cli = Cli::try_parse_from(["pgdump-cli", "run"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("pgdump.toml"));
        assert!(!cli.verbose);
        assert_eq!(cli.command, Commands::Run { dry_run: false });
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["pgdump-cli", "-c", "/etc/pgdump.toml", "-v", "run", "--dry-run"])
            .unwrap();
        assert_eq!(cli.config, PathBuf::from("/etc/pgdump.toml"));
        assert!(cli.verbose);
        assert_eq!(cli.command, Commands::Run { dry_run: true });

        let cli = Cli::try_parse_from(["pgdump-cli", "list-dumps", "--prefix", "app"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::ListDumps {
                prefix: Some("app".to_string())
            }
        );

        let cli = Cli::try_parse_from(["pgdump-cli", "init", "--force"]).unwrap();
        assert_eq!(cli.command, Commands::Init { force: true });

        let cli = Cli::try_parse_from(["pgdump-cli", "daemon"]).unwrap();
        assert_eq!(cli.command, Commands::Daemon);
    }

    #[test]
    fn test_missing_subcommand() {
        assert!(Cli::try_parse_from(["pgdump-cli"]).is_err());
    }
}
