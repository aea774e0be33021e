use crate::inventory::RemoteInventory;

/// 当前周期是否还需要备份
///
/// 远端已存在以周期 key 开头的文件时说明本周期已备份，同一周期内重复执行不会产生新文件。
pub fn is_due(period_key: &str, inventory: &RemoteInventory) -> bool {
    !inventory.any_starts_with(period_key)
}
