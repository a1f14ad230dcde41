//! # Diagnostic 模块
//!
//! 调度状态的可序列化快照，纯观测、不影响行为。
//! 宿主的 headless 模式用它逐帧输出 JSON 轨迹来排查动画问题。

use serde::{Deserialize, Serialize};

use crate::context::{EffectContext, Phase};
use crate::effect::Effect;
use crate::geometry::IconGeometry;

/// 某一时刻的效果调度快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSnapshot {
    /// 当前在播效果
    pub current: Effect,
    /// 排队槽位
    pub scheduled: Option<Effect>,
    /// 生命周期阶段
    pub phase: Phase,
    /// 周期内帧计数
    pub count: u32,
    /// 是否有效果在动
    pub is_active: bool,
    /// 首次显示压制是否仍然待命
    pub first_run: bool,
    /// 几何状态
    pub geometry: IconGeometry,
}

impl EffectSnapshot {
    /// 从上下文拍快照
    pub(crate) fn capture(ctx: &EffectContext) -> Self {
        Self {
            current: ctx.current,
            scheduled: ctx.scheduled,
            phase: ctx.phase,
            count: ctx.count,
            is_active: ctx.is_active,
            first_run: ctx.first_run,
            geometry: ctx.geometry.clone(),
        }
    }

    /// 序列化成单行 JSON（轨迹输出用）
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
