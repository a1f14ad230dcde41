//! # Effect 模块
//!
//! 效果类别定义与优先级规则。
//! 这是所有效果标识、优先级数值的**唯一来源**。

use serde::{Deserialize, Serialize};

/// 效果类别
///
/// 标识一种图标动画。枚举顺序是稳定的对外契约，
/// 调度冲突由 [`priority`](Effect::priority) 的优先级带决定。
///
/// ## 语义说明
///
/// - `Opening`：图标首次出现（上浮 + 淡入）
/// - `Launching`：应用启动中的短弹跳
/// - `Hover`：指针悬停弹跳，进入/离开通知驱动
/// - `Attention`：请求注意的脉冲（尺寸 + 聚光）
/// - `Closing`：图标移除前的下沉 + 淡出
/// - `ChangeName`：改名时的淡出换名再淡入
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    /// 无效果（空闲）
    None,
    /// 打开动画
    Opening,
    /// 启动动画
    Launching,
    /// 悬停动画
    Hover,
    /// 请求注意
    Attention,
    /// 关闭动画
    Closing,
    /// 改名动画
    ChangeName,
}

impl Effect {
    /// 全部可调度类别（不含 `None`），顺序即描述符表的槽位顺序
    pub const ALL: [Effect; 6] = [
        Effect::Opening,
        Effect::Launching,
        Effect::Hover,
        Effect::Attention,
        Effect::Closing,
        Effect::ChangeName,
    ];

    /// 调度优先级
    ///
    /// 优先级带：Closing > Opening > Attention >
    /// Hover / ChangeName / Launching > None。
    /// 高优先级请求抢占正在播放的低优先级效果；
    /// 低/同优先级请求进入排队槽位等待。
    pub fn priority(self) -> u8 {
        match self {
            Effect::None => 0,
            Effect::Hover | Effect::ChangeName | Effect::Launching => 1,
            Effect::Attention => 2,
            Effect::Opening => 3,
            Effect::Closing => 4,
        }
    }

    /// 是否能抢占 `other`（严格大于才抢占）
    pub fn preempts(self, other: Effect) -> bool {
        self.priority() > other.priority()
    }

    /// 是否为可调度类别（`None` 不可调度）
    pub fn is_schedulable(self) -> bool {
        self != Effect::None
    }

    /// 描述符表中的槽位下标；`None` 没有槽位
    pub(crate) fn slot(self) -> Option<usize> {
        match self {
            Effect::None => None,
            Effect::Opening => Some(0),
            Effect::Launching => Some(1),
            Effect::Hover => Some(2),
            Effect::Attention => Some(3),
            Effect::Closing => Some(4),
            Effect::ChangeName => Some(5),
        }
    }
}

impl std::fmt::Display for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Effect::None => "none",
            Effect::Opening => "opening",
            Effect::Launching => "launching",
            Effect::Hover => "hover",
            Effect::Attention => "attention",
            Effect::Closing => "closing",
            Effect::ChangeName => "change_name",
        };
        write!(f, "{}", name)
    }
}
