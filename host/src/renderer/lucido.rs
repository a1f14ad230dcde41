//! # Lucido 模块
//!
//! 面板背景轮廓的参数化构造。
//!
//! 轮廓分两层：外层（整块面板）与内层（条带）。条带宽度
//! 可以手动指定（`stripe > 0`，按对称系数摆放），也可以自动
//! 推导（`stripe == 0`）：自动模式下扫描面板上的 expander
//! 控件布局，每个 expander 贡献一组进出曲线，奇偶交替决定
//! 曲线贴在 expander 的哪一侧。
//!
//! 本模块是纯函数：同样的参数与布局永远产出逐位相同的路径。
//! 调用方负责把朝向归一化到"底边水平"坐标系（原实现在进入
//! 路径构造前就旋转了绘图上下文），expander 坐标一律取主轴值。

use super::path::{Path, PathBuilder};

/// 条带在轮廓底边上的下陷深度（像素）
pub const STRIPE_DEPTH: f32 = 5.0;

/// 轮廓层
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathLayer {
    /// 内层：条带本体
    Internal,
    /// 外层：整块面板
    External,
}

/// 轮廓构造参数
#[derive(Debug, Clone, PartialEq)]
pub struct LucidoParams {
    /// 面板矩形的顶边坐标
    pub top: f32,
    /// 面板宽度
    pub width: f32,
    /// 面板高度
    pub height: f32,
    /// 条带宽度占比 (0.0 - 1.0)；0 表示自动条带
    pub stripe: f32,
    /// 每段进出曲线的宽度
    pub curve_width: f32,
    /// 收拢且自动模式下外侧圆角的宽度
    pub corner_width: f32,
    /// 手动条带的对称系数 (0.0 - 1.0)
    pub symmetry: f32,
    /// 面板是否铺满整条屏幕边
    pub expanded: bool,
}

/// 一个 expander 控件在主轴上的跨度
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpanderSpan {
    /// 主轴起点
    pub offset: f32,
    /// 主轴长度
    pub extent: f32,
}

/// 面板上 expander 控件的布局
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpanderLayout {
    /// 各 expander 的主轴跨度，按排列顺序
    pub spans: Vec<ExpanderSpan>,
    /// 面板第一个控件就是 expander
    pub leading: bool,
}

impl ExpanderLayout {
    /// 无 expander 的布局
    pub fn empty() -> Self {
        Self::default()
    }

    /// 布局指纹：各 expander 终边坐标之和
    ///
    /// 背景缓存用它判断 expander 排布是否变化。
    pub fn edge_sum(&self) -> f32 {
        self.spans.iter().map(|s| s.offset + s.extent).sum()
    }
}

/// 构造面板轮廓
///
/// # 参数
/// - `params`: 几何参数
/// - `layer`: 要哪一层轮廓
/// - `layout`: expander 布局，只在自动条带模式下参与造型
///
/// # 返回
/// 闭合路径；自动条带且收拢的内层没有条带可画，返回空路径。
pub fn build_lucido_path(
    params: &LucidoParams,
    layer: PathLayer,
    layout: &ExpanderLayout,
) -> Path {
    let mut pb = PathBuilder::new();
    let y = params.top;
    let w = params.width;
    let y3 = y + params.height;
    let y2 = y3 - STRIPE_DEPTH;
    let stripe = w * params.stripe;
    let d = params.curve_width;
    let dc = params.corner_width;
    let sym = params.symmetry;
    let internal = layer == PathLayer::Internal;

    if stripe > 0.0 {
        if params.expanded {
            if internal {
                // 手动条带 & 展开 & 内层
                pb.move_to(stripe * sym, y);
                pb.edge_to(stripe * sym + d, y2);
                pb.edge_to(w - stripe * (1.0 - sym) - d, y2);
                pb.edge_to(w - stripe * (1.0 - sym), y);
                pb.close();
            } else {
                // 手动条带 & 展开 & 外层
                pb.move_to(0.0, y3);
                pb.edge_to(0.0, y);
                pb.edge_to(stripe * sym, y);
                pb.edge_to(stripe * sym + d, y2);
                pb.edge_to(w - stripe * (1.0 - sym) - d, y2);
                pb.edge_to(w - stripe * (1.0 - sym), y);
                pb.edge_to(w, y);
                pb.edge_to(w, y3);
                pb.close();
            }
        } else if internal {
            // 手动条带 & 收拢 & 内层
            pb.move_to(stripe * sym + dc, y);
            pb.edge_to(stripe * sym + dc + d, y2);
            pb.edge_to(w - stripe * (1.0 - sym) - dc - d, y2);
            pb.edge_to(w - stripe * (1.0 - sym) - dc, y);
            pb.close();
        } else {
            // 手动条带 & 收拢 & 外层
            pb.move_to(0.0, y3);
            pb.edge_to(dc, y);
            pb.edge_to(stripe * sym + dc, y);
            pb.edge_to(stripe * sym + dc + d, y2);
            pb.edge_to(w - stripe * (1.0 - sym) - dc - d, y2);
            pb.edge_to(w - stripe * (1.0 - sym) - dc, y);
            pb.edge_to(w - dc, y);
            pb.edge_to(w, y3);
            pb.close();
        }
    } else if params.expanded {
        build_auto_stripe(&mut pb, layout, internal, w, d, y, y2, y3);
    } else if !internal {
        // 自动条带 & 收拢 & 外层
        pb.move_to(0.0, y3);
        pb.edge_to(dc, y);
        pb.edge_to(w - dc, y);
        pb.edge_to(w, y3);
        pb.close();
    }
    // 自动条带 & 收拢 & 内层：没有条带可画

    pb.build()
}

/// 自动条带造型：每个 expander 一组曲线，奇偶交替贴边
fn build_auto_stripe(
    pb: &mut PathBuilder,
    layout: &ExpanderLayout,
    internal: bool,
    w: f32,
    d: f32,
    y: f32,
    y2: f32,
    y3: f32,
) {
    let mut exps_found: usize = 0;

    if internal {
        // 首个控件是 expander 就从下陷处起笔，否则等第一个 expander
        if layout.leading {
            pb.move_to(0.0, y);
            pb.edge_to(0.0, y2);
            exps_found += 1;
        }
    } else {
        pb.move_to(0.0, y3);
        if layout.leading {
            pb.edge_to(0.0, y2);
            exps_found += 1;
        } else {
            pb.edge_to(0.0, y);
        }
    }

    for span in &layout.spans {
        // 奇数个已见：曲线贴 expander 终边；偶数个：贴起边
        let mut curx = span.offset;
        if exps_found % 2 != 0 {
            curx += span.extent;
        }
        if curx < 0.0 {
            continue;
        }

        if internal && exps_found == 0 {
            // 内层的第一个 expander 处起笔
            pb.move_to(curx, y);
            pb.edge_to(curx + d, y2);
        } else if exps_found % 2 != 0 {
            pb.edge_to(curx - d, y2);
            pb.edge_to(curx, y);
        } else {
            pb.edge_to(curx, y);
            pb.edge_to(curx + d, y2);
        }
        exps_found += 1;
    }

    // 收到右边缘
    let ly = pb.cursor().y;
    pb.edge_to(w, ly);

    if internal {
        if exps_found % 2 != 0 {
            pb.edge_to(w, y);
        }
    } else {
        pb.edge_to(w, y3);
    }
    pb.close();
}
