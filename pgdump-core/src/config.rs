use crate::constants::{config, labels, timeout};
use crate::error::{DumpError, Result};
use chrono::{Local, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 应用配置结构
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub dumps: DumpsConfig,
    #[serde(default)]
    pub docker: DockerConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// 未配置时需要存储的命令会在启动时直接失败
    #[serde(default)]
    pub storage: Option<StorageConfig>,
}

/// 本地备份文件相关配置
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DumpsConfig {
    pub scratch_dir: String,
}

/// Docker相关配置
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DockerConfig {
    pub label_namespace: String,
    pub command_timeout_secs: u64,
}

/// 定时执行相关配置
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ScheduleConfig {
    pub interval_minutes: u64,
    pub timezone: TimeZoneSetting,
    pub dry_run: bool,
}

/// 对象存储相关配置
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StorageConfig {
    pub endpoint: String,
    #[serde(default = "default_region")]
    pub region: String,
    pub bucket: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    #[serde(default)]
    pub allow_http: bool,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// 生成文件名时使用的时区
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeZoneSetting {
    #[default]
    Local,
    Utc,
}

impl TimeZoneSetting {
    /// 当前时区下的墙上时间
    pub fn now(&self) -> NaiveDateTime {
        match self {
            TimeZoneSetting::Local => Local::now().naive_local(),
            TimeZoneSetting::Utc => Utc::now().naive_utc(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeZoneSetting::Local => "local",
            TimeZoneSetting::Utc => "utc",
        }
    }
}

fn default_region() -> String {
    config::DEFAULT_REGION.to_string()
}

fn default_request_timeout() -> u64 {
    timeout::DEFAULT_REQUEST_TIMEOUT
}

impl Default for DumpsConfig {
    fn default() -> Self {
        Self {
            scratch_dir: config::DEFAULT_SCRATCH_DIR.to_string(),
        }
    }
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            label_namespace: labels::DEFAULT_NAMESPACE.to_string(),
            command_timeout_secs: timeout::DEFAULT_COMMAND_TIMEOUT,
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_minutes: config::DEFAULT_INTERVAL_MINUTES,
            timezone: TimeZoneSetting::default(),
            dry_run: false,
        }
    }
}

impl AppConfig {
    /// 加载配置文件并应用环境变量覆盖
    ///
    /// 配置文件不存在时使用默认配置，存储配置可以完全来自环境变量。
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            tracing::info!("找到配置文件: {}", path.display());
            Self::load_from_file(path)?
        } else {
            tracing::warn!("未找到配置文件 {}，使用默认配置", path.display());
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// 从指定文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let config: AppConfig = toml::from_str(&content)?;

        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml_with_comments();
        fs::write(&path, content)?;
        Ok(())
    }

    /// 生成带注释的TOML配置
    fn to_toml_with_comments(&self) -> String {
        const TEMPLATE: &str = include_str!("../templates/config.toml.template");

        TEMPLATE
            .replace("{scratch_dir}", &self.dumps.scratch_dir)
            .replace("{label_namespace}", &self.docker.label_namespace)
            .replace(
                "{command_timeout_secs}",
                &self.docker.command_timeout_secs.to_string(),
            )
            .replace(
                "{interval_minutes}",
                &self.schedule.interval_minutes.to_string(),
            )
            .replace("{timezone}", self.schedule.timezone.as_str())
            .replace("{dry_run}", &self.schedule.dry_run.to_string())
    }

    /// 使用环境变量覆盖配置项
    ///
    /// 只有 S3 相关变量全部齐全（或配置文件中已有对应值）时才会得到有效的存储配置。
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        use config::env;

        let lookup = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(dir) = lookup(env::DUMPS_PATH) {
            self.dumps.scratch_dir = dir;
        }

        let endpoint = lookup(env::S3_API_ENDPOINT);
        let bucket = lookup(env::S3_BUCKET_NAME);
        let access_key_id = lookup(env::S3_API_KEY);
        let secret_access_key = lookup(env::S3_API_SECRET);
        let region = lookup(env::S3_REGION);

        let any_set = endpoint.is_some()
            || bucket.is_some()
            || access_key_id.is_some()
            || secret_access_key.is_some()
            || region.is_some();
        if !any_set {
            return;
        }

        let storage = self.storage.get_or_insert_with(|| StorageConfig {
            endpoint: String::new(),
            region: default_region(),
            bucket: String::new(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            allow_http: false,
            request_timeout_secs: default_request_timeout(),
        });

        if let Some(value) = endpoint {
            storage.allow_http = value.starts_with("http://");
            storage.endpoint = value;
        }
        if let Some(value) = bucket {
            storage.bucket = value;
        }
        if let Some(value) = access_key_id {
            storage.access_key_id = value;
        }
        if let Some(value) = secret_access_key {
            storage.secret_access_key = value;
        }
        if let Some(value) = region {
            storage.region = value;
        }
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if self.dumps.scratch_dir.trim().is_empty() {
            return Err(DumpError::invalid_config("dumps.scratch_dir 不能为空"));
        }
        if self.docker.label_namespace.trim().is_empty() {
            return Err(DumpError::invalid_config("docker.label_namespace 不能为空"));
        }
        if self.docker.command_timeout_secs == 0 {
            return Err(DumpError::invalid_config(
                "docker.command_timeout_secs 必须大于 0",
            ));
        }
        if self.schedule.interval_minutes == 0 {
            return Err(DumpError::invalid_config(
                "schedule.interval_minutes 必须大于 0",
            ));
        }
        if self.schedule.interval_minutes.checked_mul(60).is_none() {
            return Err(DumpError::invalid_config(format!(
                "schedule.interval_minutes 过大: {}",
                self.schedule.interval_minutes
            )));
        }

        if let Some(storage) = &self.storage {
            let required = [
                ("storage.endpoint", &storage.endpoint),
                ("storage.bucket", &storage.bucket),
                ("storage.access_key_id", &storage.access_key_id),
                ("storage.secret_access_key", &storage.secret_access_key),
            ];
            for (name, value) in required {
                if value.trim().is_empty() {
                    return Err(DumpError::invalid_config(format!("{name} 不能为空")));
                }
            }
            if storage.request_timeout_secs == 0 {
                return Err(DumpError::invalid_config(
                    "storage.request_timeout_secs 必须大于 0",
                ));
            }
        }

        Ok(())
    }

    /// 获取存储配置，未配置时返回错误
    pub fn require_storage(&self) -> Result<&StorageConfig> {
        self.storage.as_ref().ok_or_else(|| {
            DumpError::invalid_config(
                "未配置对象存储，请在配置文件 [storage] 中填写或设置 S3_* 环境变量",
            )
        })
    }

    /// 确保本地临时备份目录存在
    pub fn ensure_scratch_dir(&self) -> Result<PathBuf> {
        let dir = self.get_scratch_dir();
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
            tracing::info!("已创建本地备份目录: {}", dir.display());
        }
        Ok(dir)
    }

    /// 获取本地临时备份目录
    pub fn get_scratch_dir(&self) -> PathBuf {
        PathBuf::from(&self.dumps.scratch_dir)
    }

    /// 执行间隔
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.schedule.interval_minutes.saturating_mul(60))
    }

    /// 单个 Docker 命令的超时时间
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.docker.command_timeout_secs)
    }
}
