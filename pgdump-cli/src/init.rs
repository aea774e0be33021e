use crate::project_info::{get_copyright_info, get_version_string};
use anyhow::{Context, Result};
use pgdump_core::config::AppConfig;
use std::path::Path;
use tracing::{info, warn};

/// 运行独立的初始化流程
pub async fn run_init(config_path: &Path, force: bool) -> Result<()> {
    info!("🐘 {} 初始化", get_version_string());
    info!("======================");

    info!("📋 步骤 1: 创建配置文件");
    let config = AppConfig::default();
    if !write_config(config_path, &config, force)? {
        warn!("⚠️  配置文件 {} 已存在", config_path.display());
        info!("如果您要重新初始化，请使用 --force 参数");
        info!("示例: pgdump-cli init --force");
        return Ok(());
    }
    info!("   ✅ 创建配置文件: {}", config_path.display());

    info!("📋 步骤 2: 创建本地备份目录");
    match config.ensure_scratch_dir() {
        Ok(dir) => info!("   ✅ 本地备份目录: {}", dir.display()),
        Err(e) => {
            warn!("   ⚠️  无法创建本地备份目录 {}: {}", config.dumps.scratch_dir, e);
            info!("   💡 可在配置文件 [dumps] 中修改 scratch_dir，或设置 DUMPS_PATH 环境变量");
        }
    }

    info!("🎉 初始化完成！");
    info!("");
    info!("📝 接下来的步骤:");
    info!("   1️⃣  在 {} 的 [storage] 中填写 S3 存储信息", config_path.display());
    info!("       - 或者设置 S3_API_ENDPOINT / S3_API_KEY / S3_API_SECRET / S3_BUCKET_NAME");
    info!("   2️⃣  为需要备份的容器添加标签:");
    info!("       - pgdump=true");
    info!("       - pgdump.username=postgres");
    info!("       - pgdump.prefix=<唯一前缀>");
    info!("   3️⃣  运行 'pgdump-cli targets' 检查发现的备份目标");
    info!("   4️⃣  运行 'pgdump-cli daemon' 开始定时备份");
    info!("");
    info!("{}", get_copyright_info());

    Ok(())
}

/// 写入配置模板，文件已存在且未指定 force 时返回 false
fn write_config(path: &Path, config: &AppConfig, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("创建目录 {} 失败", parent.display()))?;
    }

    config
        .save_to_file(path)
        .with_context(|| format!("写入配置文件 {} 失败", path.display()))?;
    Ok(true)
}
