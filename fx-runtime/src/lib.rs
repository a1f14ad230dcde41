//! # FX Runtime
//!
//! Dock 图标效果引擎的核心运行时库。
//!
//! ## 架构概述
//!
//! `fx-runtime` 是纯逻辑核心，不依赖任何 IO、渲染引擎或时钟。
//! 它通过**能力接口**与宿主层（Host）通信：
//!
//! ```text
//! Host                               Runtime
//!   │                                   │
//!   │── start / stop / 指针事件 ──────►│
//!   │── tick()（固定帧周期） ─────────►│ 推进曲线、解析冲突
//!   │◄── queue_repaint / 标题显隐 ─────│
//!   │                                   │
//!   │   渲染时读取 geometry() 摆放图标 │
//! ```
//!
//! ## 核心类型
//!
//! - [`Effect`]：效果类别与优先级
//! - [`IconEffects`]：每图标的调度句柄
//! - [`IconGeometry`]：渲染方读取的几何动画状态
//! - [`EffectHost`] / [`TitleSurface`] / [`PointerSource`]：宿主能力接口
//!
//! ## 调度语义速览
//!
//! - 高优先级抢占在播效果，旧 `on_stop` 先于新 `on_start`；
//! - 低/同优先级请求进入单槽位排队，在播效果终止后解析；
//! - 优雅停止在循环边界生效，绝不截断在途循环；
//! - `kill` 立即终止一切并永久失活上下文；
//! - 每次 tick 收尾请求一次重绘，终帧也不例外。
//!
//! ## 模块结构
//!
//! - [`effect`]：效果类别与优先级
//! - [`descriptor`]：每类别的回调与循环簿记
//! - [`curves`] / [`easing`]：逐帧动画曲线
//! - [`geometry`]：几何动画状态
//! - [`context`]：每图标聚合状态与生命周期状态机
//! - [`scheduler`]：调度器本体
//! - [`traits`]：宿主能力接口
//! - [`diagnostic`]：可序列化的调度快照
//! - [`error`]：错误类型定义

pub mod context;
pub mod curves;
pub mod descriptor;
pub mod diagnostic;
pub mod easing;
pub mod effect;
pub mod error;
pub mod geometry;
pub mod scheduler;
pub mod traits;

// 重导出核心类型
pub use context::Phase;
pub use descriptor::{ConditionFn, DescriptorTable, EffectHooks, EventCallback};
pub use diagnostic::EffectSnapshot;
pub use easing::EasingFunction;
pub use effect::Effect;
pub use error::{EffectError, FxResult};
pub use geometry::IconGeometry;
pub use scheduler::IconEffects;
pub use traits::{EffectHost, HandlerId, PointerSource, TitleSurface};
