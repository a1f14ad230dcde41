//! # Background 模块
//!
//! Lucido 面板背景：分层填充 + 离屏缓存。
//!
//! ## 缓存策略
//!
//! 背景几何只取决于 `(宽, 高, expander 终边之和)` 这组指纹。
//! 每次重绘先比对指纹：没变就直接贴缓存面；变了才重建一次。
//! 面携带代数计数器，重建恰好加一，缓存不变式由此可观测。

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::lucido::{ExpanderLayout, LucidoParams, PathLayer, build_lucido_path};
use super::path::{Path, Point, rectangle};
use crate::config::{BackgroundConfig, PanelPosition};

/// RGBA 颜色（分量 0.0 - 1.0）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// 创建颜色
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// 填充方式
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    /// 纯色
    Solid(Color),
    /// 线性渐变
    LinearGradient {
        from: Point,
        to: Point,
        stops: Vec<(f32, Color)>,
    },
}

/// 一层填充：路径 + 颜料
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub path: Path,
    pub paint: Paint,
}

/// 离屏缓存面
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
    pub layers: Vec<Layer>,
    /// 重建代数；每次重新生成恰好加一
    pub generation: u64,
}

impl Surface {
    fn empty() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            layers: Vec::new(),
            generation: 0,
        }
    }
}

/// 四边留白
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

/// 面板贴边的固定留白（像素）
const TOP_PADDING: u32 = 2;

/// Lucido 面板背景
pub struct LucidoBackground {
    config: BackgroundConfig,
    expanded: bool,
    needs_redraw: bool,
    // 缓存指纹
    old_width: f32,
    old_height: f32,
    old_edge_sum: f32,
    generation: u64,
    surface: Surface,
}

impl LucidoBackground {
    /// 创建背景；首次 `draw` 必然重建
    pub fn new(config: BackgroundConfig, expanded: bool) -> Self {
        Self {
            config,
            expanded,
            needs_redraw: true,
            old_width: 0.0,
            old_height: 0.0,
            old_edge_sum: 0.0,
            generation: 0,
            surface: Surface::empty(),
        }
    }

    /// 标脏：下次 `draw` 强制重建（配色等非几何输入变了）
    pub fn invalidate(&mut self) {
        self.needs_redraw = true;
    }

    /// 当前重建代数
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 取本帧背景面；几何指纹没变就复用缓存
    pub fn draw(&mut self, width: f32, height: f32, layout: &ExpanderLayout) -> &Surface {
        let edge_sum = layout.edge_sum();
        let dirty = self.needs_redraw
            || self.old_width != width
            || self.old_height != height
            || self.old_edge_sum != edge_sum;

        if dirty {
            debug!(width, height, edge_sum, "背景几何变化，重建缓存面");
            self.needs_redraw = false;
            self.old_width = width;
            self.old_height = height;
            self.old_edge_sum = edge_sum;
            self.generation += 1;
            self.surface = self.render(width, height, layout);
            self.surface.generation = self.generation;
        }
        &self.surface
    }

    /// 生成各层填充
    fn render(&self, width: f32, height: f32, layout: &ExpanderLayout) -> Surface {
        let params = LucidoParams {
            top: 0.0,
            width,
            height,
            stripe: self.config.stripe_width,
            curve_width: self.config.curviness,
            corner_width: self.config.curviness,
            symmetry: self.config.curves_symmetry,
            expanded: self.expanded,
        };

        let internal = build_lucido_path(&params, PathLayer::Internal, layout);
        let external = build_lucido_path(&params, PathLayer::External, layout);

        let mut layers = Vec::new();

        // 内层：条带渐变
        if !internal.is_empty() {
            layers.push(Layer {
                path: internal,
                paint: vertical_gradient(
                    height,
                    self.config.border_color,
                    self.config.hilight_color,
                ),
            });
        }

        // 外层：面板主体渐变
        layers.push(Layer {
            path: external.clone(),
            paint: vertical_gradient(height, self.config.g_step_1, self.config.g_step_2),
        });

        // 顶部三分之一的高光；展开时改用整宽矩形
        let hi_path = if self.expanded {
            rectangle(0.0, 0.0, width, height / 3.0)
        } else {
            external
        };
        layers.push(Layer {
            path: hi_path,
            paint: Paint::LinearGradient {
                from: Point::new(0.0, 0.0),
                to: Point::new(0.0, height / 3.0),
                stops: vec![
                    (0.0, self.config.g_histep_1),
                    (1.0, self.config.g_histep_2),
                ],
            },
        });

        Surface {
            width,
            height,
            layers,
            generation: 0,
        }
    }

    /// 面板各边需要的留白
    ///
    /// 贴边方向固定 2 像素；收拢时两侧各留 `curviness` 容纳圆角，
    /// 展开时不留。RTL 且贴齐到边缘时两侧的留白互换。
    pub fn padding(&self, position: PanelPosition, align: f32, rtl: bool) -> Padding {
        let mut side = if self.expanded {
            0
        } else {
            self.config.curviness as u32
        };
        let mut zero = 0;

        if rtl && (align <= 0.0 || align >= 1.0) {
            std::mem::swap(&mut side, &mut zero);
        }

        let head = if align == 0.0 { zero } else { side };
        let tail = if align == 1.0 { zero } else { side };

        match position {
            PanelPosition::Top => Padding {
                top: 0,
                bottom: TOP_PADDING,
                left: head,
                right: tail,
            },
            PanelPosition::Bottom => Padding {
                top: TOP_PADDING,
                bottom: 0,
                left: head,
                right: tail,
            },
            PanelPosition::Left => Padding {
                top: head,
                bottom: tail,
                left: 0,
                right: TOP_PADDING,
            },
            PanelPosition::Right => Padding {
                top: head,
                bottom: tail,
                left: TOP_PADDING,
                right: 0,
            },
        }
    }
}

/// 自上而下的两段线性渐变
fn vertical_gradient(height: f32, from: Color, to: Color) -> Paint {
    Paint::LinearGradient {
        from: Point::new(0.0, 0.0),
        to: Point::new(0.0, height),
        stops: vec![(0.0, from), (1.0, to)],
    }
}
