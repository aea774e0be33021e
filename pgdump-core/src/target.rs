//! 备份目标的解析与校验
//!
//! 每轮执行时根据容器标签重新构建 [`Target`]，校验失败的容器只记录诊断信息，
//! 不会影响同一批次中其他容器的处理。

use crate::constants::{labels, policy};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

static RETENTION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+$").expect("retention pattern is a valid regex"));

/// 前缀会原样出现在对象存储的 key 中，只允许存储端不会转义的字符
static PREFIX_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("prefix pattern is a valid regex"));

/// 备份频率
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Frequency {
    Hourly,
    #[default]
    Daily,
    /// 目前与 Daily 使用相同的周期粒度
    Weekly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Hourly => "hourly",
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
        }
    }
}

impl FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hourly" => Ok(Frequency::Hourly),
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            other => Err(ValidationError::InvalidFrequency(other.to_string())),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一个备份目标（一个数据库容器及其备份策略）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub id: String,
    pub username: String,
    pub prefix: String,
    pub frequency: Frequency,
    pub retention_days: u32,
}

/// 容器检查结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkloadMetadata {
    pub id: String,
    pub labels: HashMap<String, String>,
}

impl WorkloadMetadata {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            labels: HashMap::new(),
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}

/// 标签校验错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("容器缺少备份标记标签")]
    MissingMarker,

    #[error("容器必须设置非空的 username 标签")]
    MissingUsername,

    #[error("容器必须设置非空的 prefix 标签")]
    MissingPrefix,

    #[error("prefix 只能包含字母、数字、点、下划线和连字符: {0}")]
    InvalidPrefix(String),

    #[error("前缀 {0} 已被其他容器使用")]
    DuplicatePrefix(String),

    #[error("不支持的备份频率: {0}")]
    InvalidFrequency(String),

    #[error("无效的 daysRetention 值: {0}")]
    InvalidRetention(String),
}

/// 被拒绝的容器及原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub workload_id: String,
    pub error: ValidationError,
}

/// 一次发现的结果
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub targets: Vec<Target>,
    pub rejections: Vec<Rejection>,
}

/// 备份相关的标签名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelKeys {
    pub marker: String,
    pub username: String,
    pub prefix: String,
    pub frequency: String,
    pub days_retention: String,
}

impl LabelKeys {
    pub fn new(namespace: &str) -> Self {
        Self {
            marker: namespace.to_string(),
            username: format!("{namespace}.{}", labels::USERNAME),
            prefix: format!("{namespace}.{}", labels::PREFIX),
            frequency: format!("{namespace}.{}", labels::FREQUENCY),
            days_retention: format!("{namespace}.{}", labels::DAYS_RETENTION),
        }
    }
}

impl Default for LabelKeys {
    fn default() -> Self {
        Self::new(labels::DEFAULT_NAMESPACE)
    }
}

/// 按发现顺序校验所有容器，前缀先到先得
pub fn validate_records(records: &[WorkloadMetadata], keys: &LabelKeys) -> Discovery {
    let mut discovery = Discovery::default();
    let mut accepted_prefixes = HashSet::new();

    for record in records {
        match validate_record(record, keys, &accepted_prefixes) {
            Ok(target) => {
                accepted_prefixes.insert(target.prefix.clone());
                discovery.targets.push(target);
            }
            Err(error) => discovery.rejections.push(Rejection {
                workload_id: record.id.clone(),
                error,
            }),
        }
    }

    discovery
}

/// 校验单个容器的标签
pub fn validate_record(
    record: &WorkloadMetadata,
    keys: &LabelKeys,
    accepted_prefixes: &HashSet<String>,
) -> Result<Target, ValidationError> {
    let labels = &record.labels;

    if !labels.contains_key(&keys.marker) {
        return Err(ValidationError::MissingMarker);
    }

    let username = non_empty(labels.get(&keys.username)).ok_or(ValidationError::MissingUsername)?;
    let prefix = non_empty(labels.get(&keys.prefix)).ok_or(ValidationError::MissingPrefix)?;
    if !PREFIX_PATTERN.is_match(prefix) {
        return Err(ValidationError::InvalidPrefix(prefix.to_string()));
    }

    if accepted_prefixes.contains(prefix) {
        return Err(ValidationError::DuplicatePrefix(prefix.to_string()));
    }

    let frequency = match labels.get(&keys.frequency) {
        Some(value) => value.parse::<Frequency>()?,
        None => Frequency::default(),
    };

    let retention_days = match labels.get(&keys.days_retention) {
        Some(value) => parse_retention(value)?,
        None => policy::DEFAULT_RETENTION_DAYS,
    };

    Ok(Target {
        id: record.id.clone(),
        username: username.to_string(),
        prefix: prefix.to_string(),
        frequency,
        retention_days,
    })
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

fn parse_retention(value: &str) -> Result<u32, ValidationError> {
    if !RETENTION_PATTERN.is_match(value) {
        return Err(ValidationError::InvalidRetention(value.to_string()));
    }
    value
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidRetention(value.to_string()))
}
