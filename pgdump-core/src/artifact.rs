//! 备份文件命名规则
//!
//! 文件名格式为 `pgdump_<prefix>_<timestamp>.sql`，时间戳定长、补零、高位在前，
//! 因此同一前缀下文件名的字符串顺序就是时间顺序，过期清理直接比较字符串。

use crate::constants::artifact::{
    DAILY_FORMAT, DATETIME_FORMAT, DATETIME_LEN, HOURLY_FORMAT, KEY_PREFIX, KEY_SUFFIX,
};
use crate::target::{Frequency, Target};
use chrono::{NaiveDateTime, TimeDelta};

/// 某个前缀下所有备份文件共享的开头 `pgdump_<prefix>_`
pub fn key_prefix(prefix: &str) -> String {
    format!("{KEY_PREFIX}_{prefix}_")
}

/// 完整的备份文件名
pub fn artifact_key(prefix: &str, at: NaiveDateTime) -> String {
    format!("{}{}{KEY_SUFFIX}", key_prefix(prefix), at.format(DATETIME_FORMAT))
}

/// 当前周期的搜索前缀，不带 `.sql` 后缀，只用于 starts-with 匹配
pub fn period_key(target: &Target, now: NaiveDateTime) -> String {
    let layout = match target.frequency {
        Frequency::Hourly => HOURLY_FORMAT,
        Frequency::Daily | Frequency::Weekly => DAILY_FORMAT,
    };
    format!("{}{}", key_prefix(&target.prefix), now.format(layout))
}

/// 过期截止点，早于它的备份会被删除；超出日历范围时返回 None
pub fn retention_cutoff_key(target: &Target, now: NaiveDateTime) -> Option<String> {
    let window = TimeDelta::try_days(i64::from(target.retention_days))?;
    let cutoff = now.checked_sub_signed(window)?;
    Some(artifact_key(&target.prefix, cutoff))
}

/// 判断文件名是否为该前缀生成的备份（前缀后紧跟完整时间戳）
pub fn belongs_to(prefix: &str, key: &str) -> bool {
    let Some(rest) = key.strip_prefix(&key_prefix(prefix)) else {
        return false;
    };
    let Some(timestamp) = rest.strip_suffix(KEY_SUFFIX) else {
        return false;
    };
    timestamp.len() == DATETIME_LEN
        && NaiveDateTime::parse_from_str(timestamp, DATETIME_FORMAT).is_ok()
}
