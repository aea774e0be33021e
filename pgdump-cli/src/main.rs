use clap::Parser;
use pgdump_cli::{Cli, CliApp, Commands, run_init, setup_logging};
use tracing::error;

#[tokio::main]
async fn main() {
    // 解析命令行参数
    let cli = Cli::parse();

    // 设置日志记录，guard 释放时刷新文件日志
    let log_guard = setup_logging(cli.verbose);

    let success = run(cli).await;

    drop(log_guard);
    if !success {
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> bool {
    // `init` 命令是特例，它不需要预先加载配置
    if let Commands::Init { force } = cli.command {
        if let Err(e) = run_init(&cli.config, force).await {
            error!("❌ 初始化失败: {:#}", e);
            return false;
        }
        return true;
    }

    let app = match CliApp::load(&cli.config) {
        Ok(app) => app,
        Err(e) => {
            error!("❌ 应用初始化失败: {:#}", e);
            error!("👉 请检查配置文件，或先运行 'pgdump-cli init' 命令来创建配置文件。");
            return false;
        }
    };

    // 运行命令
    if let Err(e) = app.run_command(cli.command).await {
        error!("❌ 操作失败: {:#}", e);
        return false;
    }
    true
}
