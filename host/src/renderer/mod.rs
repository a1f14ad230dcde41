//! # Renderer 模块
//!
//! 面板背景的几何构造与离屏缓存。
//!
//! ## 分工
//!
//! - [`path`]：路径类型与构建器（直线/中线贝塞尔）
//! - [`lucido`]：面板轮廓的参数化构造（手动/自动条带）
//! - [`background`]：分层填充 + 指纹缓存
//!
//! 图标本身怎么画不归这里管：渲染方拿着
//! `fx_runtime::IconGeometry` 自行摆放图标。

pub mod background;
pub mod lucido;
pub mod path;

pub use background::{Color, Layer, LucidoBackground, Padding, Paint, Surface};
pub use lucido::{ExpanderLayout, ExpanderSpan, LucidoParams, PathLayer, build_lucido_path};
pub use path::{Path, PathBuilder, PathSegment, Point};
