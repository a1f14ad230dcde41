//! # Panel 模块
//!
//! 宿主侧的面板模型：把 fx-runtime 的能力接口接到具体实现上。
//!
//! - [`RepaintQueue`]：重绘请求的合并队列（`EffectHost` 实现）
//! - [`PointerBus`]：指针进入/离开事件总线（`PointerSource` 实现）
//! - [`TitleBar`]：标题展示面（`TitleSurface` 实现）
//! - [`DockIcon`]：一个图标 = 效果句柄 + 指针总线 + 名字
//! - [`Panel`]：图标集合 + 背景 + 帧驱动

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use tracing::warn;

use fx_runtime::{Effect, EffectHost, HandlerId, IconEffects, PointerSource, TitleSurface};

use crate::config::PanelConfig;
use crate::renderer::background::{LucidoBackground, Padding, Surface};
use crate::renderer::lucido::ExpanderLayout;

/// 重绘请求队列
///
/// 重绘请求是异步的：这里只累计并标脏，真正的重绘由事件循环
/// 每轮 [`drain`](RepaintQueue::drain) 一次。多次请求合并成一次
/// 重绘，但请求计数不丢，次数可供测试与诊断检查。
pub struct RepaintQueue {
    dirty: Cell<bool>,
    requests: Cell<u64>,
}

impl RepaintQueue {
    /// 创建空队列
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            dirty: Cell::new(false),
            requests: Cell::new(0),
        })
    }

    /// 取走脏标志：该不该重绘这一帧
    pub fn drain(&self) -> bool {
        self.dirty.replace(false)
    }

    /// 累计的重绘请求数
    pub fn request_count(&self) -> u64 {
        self.requests.get()
    }
}

impl EffectHost for RepaintQueue {
    fn queue_repaint(&self) {
        self.requests.set(self.requests.get() + 1);
        self.dirty.set(true);
    }
}

/// 指针进入/离开事件总线
///
/// 真实宿主里这是控件系统的事件订阅；headless 模式下由驱动
/// 程序调用 [`emit_enter`](PointerBus::emit_enter) /
/// [`emit_leave`](PointerBus::emit_leave) 模拟指针。
pub struct PointerBus {
    next_id: Cell<u64>,
    enter: RefCell<BTreeMap<u64, Rc<dyn Fn()>>>,
    leave: RefCell<BTreeMap<u64, Rc<dyn Fn()>>>,
}

impl PointerBus {
    /// 创建空总线
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            next_id: Cell::new(1),
            enter: RefCell::new(BTreeMap::new()),
            leave: RefCell::new(BTreeMap::new()),
        })
    }

    fn alloc_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    /// 派发指针进入事件
    pub fn emit_enter(&self) {
        // 先收集再调用：回调里可能重新接线
        let callbacks: Vec<Rc<dyn Fn()>> = self.enter.borrow().values().cloned().collect();
        for cb in callbacks {
            cb();
        }
    }

    /// 派发指针离开事件
    pub fn emit_leave(&self) {
        let callbacks: Vec<Rc<dyn Fn()>> = self.leave.borrow().values().cloned().collect();
        for cb in callbacks {
            cb();
        }
    }

    /// 已连接的回调数
    pub fn handler_count(&self) -> usize {
        self.enter.borrow().len() + self.leave.borrow().len()
    }
}

impl PointerSource for PointerBus {
    fn connect_enter(&self, callback: Box<dyn Fn()>) -> HandlerId {
        let id = self.alloc_id();
        self.enter.borrow_mut().insert(id, Rc::from(callback));
        HandlerId::new(id)
    }

    fn connect_leave(&self, callback: Box<dyn Fn()>) -> HandlerId {
        let id = self.alloc_id();
        self.leave.borrow_mut().insert(id, Rc::from(callback));
        HandlerId::new(id)
    }

    fn disconnect(&self, id: HandlerId) {
        self.enter.borrow_mut().remove(&id.value());
        self.leave.borrow_mut().remove(&id.value());
    }
}

/// 标题展示面
pub struct TitleBar {
    visible: RefCell<Option<String>>,
}

impl TitleBar {
    /// 创建隐藏状态的标题面
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            visible: RefCell::new(None),
        })
    }

    /// 当前显示的文案
    pub fn current(&self) -> Option<String> {
        self.visible.borrow().clone()
    }

    /// 是否可见
    pub fn is_visible(&self) -> bool {
        self.visible.borrow().is_some()
    }
}

impl TitleSurface for TitleBar {
    fn show(&self, text: &str) {
        *self.visible.borrow_mut() = Some(text.to_string());
    }

    fn hide(&self) {
        *self.visible.borrow_mut() = None;
    }
}

/// 面板上的一个图标
pub struct DockIcon {
    name: Rc<RefCell<String>>,
    /// 效果调度句柄
    pub effects: IconEffects,
    /// 该图标的指针事件总线
    pub pointer: Rc<PointerBus>,
}

impl DockIcon {
    fn new(
        name: &str,
        icon_size: f32,
        repaint: Rc<RepaintQueue>,
        title: Rc<TitleBar>,
    ) -> Self {
        let name = Rc::new(RefCell::new(name.to_string()));
        let effects = IconEffects::with_icon_size(repaint, icon_size, icon_size);

        // 标题文案惰性读取当前名字
        let reader = name.clone();
        effects.set_title(title, Rc::new(move || reader.borrow().clone()));

        // 指针进入/离开接到悬停效果
        let pointer = PointerBus::new();
        effects.register_effects(pointer.clone());

        Self {
            name,
            effects,
            pointer,
        }
    }

    /// 图标名字
    pub fn name(&self) -> String {
        self.name.borrow().clone()
    }

    /// 图标显示（首次显示不播打开动画）
    pub fn shown(&self) {
        self.effects.icon_shown();
    }

    /// 改名并播放改名动画
    pub fn rename(&self, new_name: &str) {
        *self.name.borrow_mut() = new_name.to_string();
        if let Err(e) = self.effects.start(Effect::ChangeName) {
            warn!(icon = %self.name(), "改名动画被拒绝: {}", e);
        }
    }

    /// 应用启动：开始启动弹跳
    pub fn launch(&self) {
        if let Err(e) = self.effects.start(Effect::Launching) {
            warn!(icon = %self.name(), "启动动画被拒绝: {}", e);
        }
    }

    /// 应用就绪：停掉启动弹跳
    pub fn launch_done(&self) {
        self.effects.stop(Effect::Launching);
    }

    /// 请求注意
    pub fn ask_attention(&self) {
        if let Err(e) = self.effects.start(Effect::Attention) {
            warn!(icon = %self.name(), "注意动画被拒绝: {}", e);
        }
    }

    /// 注意已被响应
    pub fn attention_done(&self) {
        self.effects.stop(Effect::Attention);
    }

    /// 图标移除：播放关闭动画
    pub fn close(&self) {
        if let Err(e) = self.effects.start(Effect::Closing) {
            warn!(icon = %self.name(), "关闭动画被拒绝: {}", e);
        }
    }

    /// 立即销毁：终止一切动画并释放接线
    pub fn remove(&self) {
        self.effects.kill();
    }
}

/// 面板：图标集合 + 背景 + 帧驱动
pub struct Panel {
    config: PanelConfig,
    repaint: Rc<RepaintQueue>,
    title: Rc<TitleBar>,
    background: LucidoBackground,
    expanders: ExpanderLayout,
    icons: Vec<DockIcon>,
}

impl Panel {
    /// 按配置创建空面板
    pub fn new(config: PanelConfig) -> Self {
        let background = LucidoBackground::new(config.background.clone(), config.expanded);
        Self {
            repaint: RepaintQueue::new(),
            title: TitleBar::new(),
            background,
            expanders: ExpanderLayout::empty(),
            icons: Vec::new(),
            config,
        }
    }

    /// 添加图标，返回其下标
    ///
    /// 新图标立即收到显示通知（首次显示不播打开动画）。
    pub fn add_icon(&mut self, name: &str) -> usize {
        let icon = DockIcon::new(
            name,
            self.config.icon_size as f32,
            self.repaint.clone(),
            self.title.clone(),
        );

        // 配置里的循环上限覆盖默认值
        if self.config.effects.attention_loops > 0 {
            icon.effects
                .set_notify(Effect::Attention, None, None, self.config.effects.attention_loops);
        }
        if self.config.effects.launch_loops > 0 {
            icon.effects
                .set_notify(Effect::Launching, None, None, self.config.effects.launch_loops);
        }

        icon.shown();
        self.icons.push(icon);
        self.icons.len() - 1
    }

    /// 取图标
    pub fn icon(&self, index: usize) -> Option<&DockIcon> {
        self.icons.get(index)
    }

    /// 图标数
    pub fn icon_count(&self) -> usize {
        self.icons.len()
    }

    /// 标题面
    pub fn title_bar(&self) -> &Rc<TitleBar> {
        &self.title
    }

    /// 面板配置
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// 更新 expander 布局（影响自动条带背景）
    pub fn set_expanders(&mut self, layout: ExpanderLayout) {
        self.expanders = layout;
    }

    /// 推进一帧：驱动所有图标，返回本帧是否需要重绘
    pub fn tick(&mut self) -> bool {
        for icon in &self.icons {
            icon.effects.tick();
        }
        self.repaint.drain()
    }

    /// 是否有图标在动
    pub fn is_animating(&self) -> bool {
        self.icons.iter().any(|icon| icon.effects.is_active())
    }

    /// 累计的重绘请求数
    pub fn repaint_requests(&self) -> u64 {
        self.repaint.request_count()
    }

    /// 取本帧背景面（几何没变就复用缓存）
    pub fn render_background(&mut self, width: f32, height: f32) -> &Surface {
        self.background.draw(width, height, &self.expanders)
    }

    /// 面板各边留白
    pub fn padding(&self) -> Padding {
        self.background
            .padding(self.config.position, self.config.align, self.config.rtl)
    }

    /// 动画帧周期
    pub fn frame_time(&self) -> Duration {
        self.config.frame_time()
    }
}
