// ==========================================
// 产线点检系统 - 写操作结果
// ==========================================
// 职责: 业务写入成功后，附带操作日志是否落库
// 约定: 业务写入已提交时不因日志失败而返回 Err
// ==========================================

use std::ops::Deref;

use serde::Serialize;

/// 已提交的写操作结果
///
/// `action_logged == false` 表示业务数据已写入，但操作轨迹缺失，
/// 调用方可据此提示或补记。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recorded<T> {
    pub value: T,
    pub action_logged: bool,
}

impl<T> Recorded<T> {
    pub fn new(value: T, action_logged: bool) -> Self {
        Self { value, action_logged }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> Deref for Recorded<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}
