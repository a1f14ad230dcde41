//! # Context 模块
//!
//! 每个图标一份的效果聚合状态。
//!
//! ## 生命周期状态机
//!
//! ```text
//! Idle ──start──► Animating ──stop──► Terminating ──循环边界──► Idle
//!   ▲                                                            │
//!   └──────────────── 排队请求解析 / 空闲 ◄──────────────────────┘
//! ```
//!
//! `Terminating` 表示收到了优雅停止请求：在途循环照常数完，
//! 终止动作发生在下一个循环边界，绝不在帧中间截断。
//!
//! `effect_lock` 与状态机相互独立，专职重入保护：帧推进或
//! 它派发的回调在途时置位；此时到来的 tick 被整帧跳过，
//! 到来的 start 进入 `scheduled` 槽位等待解锁后解析。

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::descriptor::DescriptorTable;
use crate::effect::Effect;
use crate::geometry::IconGeometry;
use crate::traits::{EffectHost, HandlerId, PointerSource, TitleSurface};

/// 生命周期阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// 空闲，无效果在播
    #[default]
    Idle,
    /// 有效果逐帧推进中
    Animating,
    /// 已请求优雅停止，等待循环边界
    Terminating,
}

/// 标题挂钩：展示面 + 惰性取文案的回调
pub(crate) struct TitleHook {
    /// 标题展示面
    pub surface: Rc<dyn TitleSurface>,
    /// 取标题文案；只在需要显示时才调用
    pub text: Rc<dyn Fn() -> String>,
}

/// 每图标的效果上下文
///
/// 由 [`IconEffects`](crate::scheduler::IconEffects) 包在
/// `Rc<RefCell<..>>` 里持有；所有字段只在单线程事件循环上变更。
pub(crate) struct EffectContext {
    /// 宿主能力（重绘请求）
    pub host: Rc<dyn EffectHost>,
    /// 标题挂钩
    pub title: Option<TitleHook>,
    /// 按类别索引的描述符表
    pub descriptors: DescriptorTable,
    /// 生命周期阶段
    pub phase: Phase,
    /// 重入保护：帧推进在途
    pub effect_lock: bool,
    /// 排队槽位：待解析的下一个效果请求
    pub scheduled: Option<Effect>,
    /// 当前在播效果（空闲时为 `None`）
    pub current: Effect,
    /// 是否有效果真正在动（区别于"已排队但被挡"）
    pub is_active: bool,
    /// 首次显示压制打开动画
    pub first_run: bool,
    /// 终结标志：置位后上下文永久失活
    pub killed: bool,
    /// 振荡效果的相位符号
    pub direction: i32,
    /// 周期内帧计数（区别于描述符的 loop_count）
    pub count: u32,
    /// 几何动画状态
    pub geometry: IconGeometry,
    /// 指针通知来源（注册后持有，用于注销）
    pub pointer: Option<Rc<dyn PointerSource>>,
    /// 进入通知句柄
    pub enter_notify: Option<HandlerId>,
    /// 离开通知句柄
    pub leave_notify: Option<HandlerId>,
}

impl EffectContext {
    /// 零值初始化：全部类别未激活、无当前效果、首次显示待压制
    pub fn new(host: Rc<dyn EffectHost>, icon_width: f32, icon_height: f32) -> Self {
        Self {
            host,
            title: None,
            descriptors: DescriptorTable::new(),
            phase: Phase::Idle,
            effect_lock: false,
            scheduled: None,
            current: Effect::None,
            is_active: false,
            first_run: true,
            killed: false,
            direction: 1,
            count: 0,
            geometry: IconGeometry::new(icon_width, icon_height),
            pointer: None,
            enter_notify: None,
            leave_notify: None,
        }
    }

    /// 写入排队槽位
    ///
    /// 单槽位，高优先级者胜；同优先级后来者居上。
    pub fn enqueue_scheduled(&mut self, effect: Effect) {
        match self.scheduled {
            Some(pending) if pending.priority() > effect.priority() => {}
            _ => self.scheduled = Some(effect),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct NullHost;

    impl EffectHost for NullHost {
        fn queue_repaint(&self) {}
    }

    fn ctx() -> EffectContext {
        EffectContext::new(Rc::new(NullHost), 48.0, 48.0)
    }

    #[test]
    fn test_new_is_idle() {
        let c = ctx();
        assert_eq!(c.phase, Phase::Idle);
        assert_eq!(c.current, Effect::None);
        assert!(c.first_run);
        assert!(!c.is_active);
        assert_eq!(c.descriptors.active_count(), 0);
    }

    #[test]
    fn test_enqueue_keeps_higher_priority() {
        let mut c = ctx();

        c.enqueue_scheduled(Effect::Attention);
        // 低优先级不顶掉高优先级
        c.enqueue_scheduled(Effect::Hover);
        assert_eq!(c.scheduled, Some(Effect::Attention));

        // 高优先级顶掉低优先级
        c.enqueue_scheduled(Effect::Closing);
        assert_eq!(c.scheduled, Some(Effect::Closing));
    }

    #[test]
    fn test_enqueue_same_priority_newest_wins() {
        let mut c = ctx();
        c.enqueue_scheduled(Effect::Hover);
        c.enqueue_scheduled(Effect::Launching);
        assert_eq!(c.scheduled, Some(Effect::Launching));
    }

    #[test]
    fn test_host_capability_is_reachable() {
        struct CountingHost {
            calls: Cell<u32>,
        }
        impl EffectHost for CountingHost {
            fn queue_repaint(&self) {
                self.calls.set(self.calls.get() + 1);
            }
        }

        let host = Rc::new(CountingHost { calls: Cell::new(0) });
        let c = EffectContext::new(host.clone(), 48.0, 48.0);
        c.host.queue_repaint();
        assert_eq!(host.calls.get(), 1);
    }
}
