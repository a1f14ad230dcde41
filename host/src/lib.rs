//! # Host 层
//!
//! Dock 效果引擎的宿主层实现。
//!
//! ## 架构说明
//!
//! Host 层负责：
//! - 面板与图标的聚合模型
//! - 指针事件接线与标题展示
//! - 背景轮廓构造与离屏缓存
//! - 配置加载
//! - 按帧周期驱动 fx-runtime
//!
//! Host 层不包含调度逻辑：效果的优先级、排队、循环、终止
//! 全部在 `fx-runtime` 里，这里只提供能力接口的具体实现。

pub mod config;
pub mod panel;
pub mod renderer;

pub use config::{BackgroundConfig, ConfigError, EffectsConfig, PanelConfig, PanelPosition};
pub use panel::{DockIcon, Panel, PointerBus, RepaintQueue, TitleBar};
pub use renderer::{
    Color, ExpanderLayout, ExpanderSpan, LucidoBackground, Padding, Surface,
};
