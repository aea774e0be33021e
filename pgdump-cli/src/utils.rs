use tracing_appender::non_blocking::WorkerGuard;

/// 日志文件路径，设置后日志追加写入该文件
pub const LOG_FILE_ENV: &str = "PGDUMP_LOG_FILE";

/// 日志目录，设置后按天滚动写入该目录
pub const LOG_DIR_ENV: &str = "PGDUMP_LOG_DIR";

const LOG_FILE_PREFIX: &str = "pgdump.log";

/// 设置日志记录系统
///
/// - 库代码只使用 tracing 宏记录日志，在应用入口配置输出
/// - 支持 RUST_LOG 环境变量控制日志级别，`-v` 时默认 debug
/// - `PGDUMP_LOG_FILE`：追加写入单个文件，包含模块路径和行号
/// - `PGDUMP_LOG_DIR`：按天滚动写入目录
/// - 默认输出到终端，使用紧凑格式
///
/// 返回的 guard 需要在 main 中一直持有，释放时会刷新尚未写出的日志。
pub fn setup_logging(verbose: bool) -> Option<WorkerGuard> {
    use tracing_subscriber::{EnvFilter, fmt};

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if let Some(dir) = non_empty_env(LOG_DIR_ENV) {
        let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        fmt()
            .with_env_filter(env_filter)
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .with_line_number(true)
            .init();
        return Some(guard);
    }

    if let Some(log_file) = non_empty_env(LOG_FILE_ENV) {
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
        {
            Ok(file) => {
                let (writer, guard) = tracing_appender::non_blocking(file);
                fmt()
                    .with_env_filter(env_filter)
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(true)
                    .with_thread_names(true)
                    .with_line_number(true)
                    .init();
                return Some(guard);
            }
            Err(e) => {
                eprintln!("⚠️  无法打开日志文件 {log_file}: {e}，改为输出到终端");
            }
        }
    }

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_names(false)
        .with_line_number(false)
        .compact()
        .init();
    None
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
