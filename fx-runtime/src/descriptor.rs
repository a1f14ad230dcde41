//! # Descriptor 模块
//!
//! 每个效果类别的调度簿记：激活标志、回调、循环计数。
//!
//! ## 设计说明
//!
//! 六个类别共用同一个 `Descriptor` 记录，集中放在按类别索引的
//! `DescriptorTable` 里，而不是一组同形的具名字段。
//!
//! 回调分两份保存：`configured` 是 `set_notify` 安装的配置，
//! `running` 是类别启动时拍下的快照。动画进行中重新 `set_notify`
//! 不影响在途这一轮 —— 新配置从下一次启动生效，避免新旧
//! `on_stop` 错配。

use std::rc::Rc;

use crate::effect::Effect;

/// 效果事件回调
pub type EventCallback = Rc<dyn Fn()>;

/// 循环继续条件；返回 `false` 时效果在循环边界终止
pub type ConditionFn = Rc<dyn Fn() -> bool>;

/// 一个类别的回调与循环策略
#[derive(Clone, Default)]
pub struct EffectHooks {
    /// 动画开始时调用一次
    pub on_start: Option<EventCallback>,
    /// 动画结束（自然结束或被抢占）时调用一次
    pub on_stop: Option<EventCallback>,
    /// 每个循环边界求值一次的继续条件
    pub condition: Option<ConditionFn>,
    /// 最大循环次数，0 表示不限
    pub loop_limit: u32,
}

impl std::fmt::Debug for EffectHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHooks")
            .field("on_start", &self.on_start.is_some())
            .field("on_stop", &self.on_stop.is_some())
            .field("condition", &self.condition.is_some())
            .field("loop_limit", &self.loop_limit)
            .finish()
    }
}

/// 类别的默认循环上限
///
/// 一次性效果（打开/关闭/改名）默认播一轮；
/// 持续性效果（悬停/注意/启动）默认循环到被叫停。
pub fn default_loop_limit(effect: Effect) -> u32 {
    match effect {
        Effect::Opening | Effect::Closing | Effect::ChangeName => 1,
        Effect::Hover | Effect::Attention | Effect::Launching => 0,
        Effect::None => 0,
    }
}

/// 单个类别的调度记录
#[derive(Debug)]
pub struct Descriptor {
    /// 该类别是否持有"当前效果"槽位
    pub active: bool,
    /// 已完成的循环数；(重新)启动时归零
    pub loop_count: u32,
    /// `set_notify` 安装的配置
    pub configured: EffectHooks,
    /// 启动时拍下的快照，在途动画用它
    pub running: Option<EffectHooks>,
}

impl Descriptor {
    fn new(effect: Effect) -> Self {
        Self {
            active: false,
            loop_count: 0,
            configured: EffectHooks {
                loop_limit: default_loop_limit(effect),
                ..EffectHooks::default()
            },
            running: None,
        }
    }

    /// 启动：拍下配置快照并占有槽位
    pub fn begin(&mut self) {
        self.running = Some(self.configured.clone());
        self.active = true;
        self.loop_count = 0;
    }

    /// 归还槽位并清空在途状态
    pub fn clear(&mut self) {
        self.active = false;
        self.loop_count = 0;
        self.running = None;
    }
}

/// 按效果类别索引的描述符表
#[derive(Debug)]
pub struct DescriptorTable {
    slots: [Descriptor; 6],
}

impl DescriptorTable {
    /// 创建全部类别均未激活的表
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|i| Descriptor::new(Effect::ALL[i])),
        }
    }

    /// 取某个类别的记录；`Effect::None` 没有记录
    pub fn get(&self, effect: Effect) -> Option<&Descriptor> {
        effect.slot().map(|i| &self.slots[i])
    }

    /// 取某个类别的可变记录
    pub fn get_mut(&mut self, effect: Effect) -> Option<&mut Descriptor> {
        effect.slot().map(|i| &mut self.slots[i])
    }

    /// 激活中的类别数量（不变式：任何时刻至多 1）
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|d| d.active).count()
    }
}

impl Default for DescriptorTable {
    fn default() -> Self {
        Self::new()
    }
}
