//! # Traits 模块
//!
//! 调度器依赖的宿主能力接口。
//!
//! 调度器不认识任何具体的控件体系：拥有图标的对象通过这几个
//! 窄接口提供重绘、标题展示和指针通知能力。

/// 通知句柄
///
/// 由 [`PointerSource`] 在连接回调时分配，注销时原样交还。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

impl HandlerId {
    /// 创建句柄（由 `PointerSource` 实现方分配）
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// 获取内部 ID 值
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// 拥有图标的宿主对象能力
pub trait EffectHost {
    /// 请求一次重绘
    ///
    /// 异步语义：把重绘排进事件循环而不是同步作画。
    /// 同一轮事件循环内的多次请求可以合并，但不允许丢弃。
    fn queue_repaint(&self);
}

/// 标题（tooltip）展示面
pub trait TitleSurface {
    /// 显示标题文本
    fn show(&self, text: &str);

    /// 隐藏标题
    fn hide(&self);
}

/// 指针进入/离开通知的订阅原语
pub trait PointerSource {
    /// 订阅指针进入通知
    fn connect_enter(&self, callback: Box<dyn Fn()>) -> HandlerId;

    /// 订阅指针离开通知
    fn connect_leave(&self, callback: Box<dyn Fn()>) -> HandlerId;

    /// 取消订阅；未知句柄应当被静默忽略
    fn disconnect(&self, id: HandlerId);
}
