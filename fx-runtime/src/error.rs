//! # Error 模块
//!
//! 定义 fx-runtime 中使用的错误类型。
//!
//! 调度入口都是全函数：除这里列出的两种拒绝之外，
//! 误用一律按防御性无操作处理，不报错也不崩溃。

use thiserror::Error;

use crate::effect::Effect;

/// 效果调度错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EffectError {
    /// 请求了不可调度的类别（`Effect::None`）
    #[error("无法调度空效果 (Effect::None)")]
    InvalidEffect,

    /// 上下文已被 kill，不再接受调度
    #[error("效果上下文已终结，拒绝调度 '{effect}'")]
    Killed { effect: Effect },
}

/// Result 类型别名
pub type FxResult<T> = Result<T, EffectError>;
