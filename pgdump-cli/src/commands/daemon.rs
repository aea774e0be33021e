use crate::app::CliApp;
use crate::commands::print_report;
use crate::project_info::get_version_string;
use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

/// 按配置的间隔持续执行备份，直到收到 Ctrl-C
///
/// 单轮失败只记录日志，下一轮照常执行。执行中收到 Ctrl-C 会立即中断本轮，
/// 正在运行的 docker 子进程随之终止，未完成的备份在下次启动后重新生成。
pub async fn run_daemon(app: &CliApp) -> Result<()> {
    let orchestrator = app.orchestrator(false).await?;

    info!("🚀 {} 守护模式启动", get_version_string());
    info!(
        "   每 {} 分钟执行一次，时区: {}",
        app.config.schedule.interval_minutes,
        app.config.schedule.timezone.as_str()
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "监听退出信号失败");
        }
    };

    let orchestrator = &orchestrator;
    let interrupted = run_until(app.config.interval(), shutdown, move || async move {
        let now = app.config.schedule.timezone.now();
        match orchestrator.run_once(now).await {
            Ok(report) => print_report(&report),
            Err(e) => error!(error = %e, "❌ 本轮备份任务失败"),
        }
    })
    .await;

    if interrupted {
        warn!("⚠️  本轮备份被中断");
    }
    info!("👋 收到退出信号，守护模式结束");
    Ok(())
}

/// 每隔 `period` 执行一次 `tick`，直到 `shutdown` 完成
///
/// 执行中的 tick 同样会被 `shutdown` 打断；返回 true 表示退出时有一轮正在执行。
async fn run_until<S, T, F>(period: Duration, shutdown: S, mut tick: T) -> bool
where
    S: Future<Output = ()>,
    T: FnMut() -> F,
    F: Future<Output = ()>,
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = &mut shutdown => return false,
        }

        tokio::select! {
            _ = tick() => {}
            _ = &mut shutdown => return true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_shutdown_interrupts_running_tick() {
        let started = Arc::new(AtomicUsize::new(0));
        let counter = started.clone();

        let interrupted = tokio::time::timeout(
            Duration::from_secs(5),
            run_until(
                Duration::from_secs(3600),
                tokio::time::sleep(Duration::from_millis(50)),
                move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    std::future::pending::<()>()
                },
            ),
        )
        .await
        .unwrap();

        assert!(interrupted);
        assert_eq!(started.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_shutdown_between_ticks() {
        let started = Arc::new(AtomicUsize::new(0));
        let counter = started.clone();

        let interrupted = tokio::time::timeout(
            Duration::from_secs(5),
            run_until(
                Duration::from_secs(3600),
                tokio::time::sleep(Duration::from_millis(50)),
                move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    std::future::ready(())
                },
            ),
        )
        .await
        .unwrap();

        // 第一轮立即执行并完成，之后在等待下一轮时退出
        assert!(!interrupted);
        assert_eq!(started.load(Ordering::SeqCst), 1);
    }
}
