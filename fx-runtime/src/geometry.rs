//! # Geometry 模块
//!
//! 单个图标的几何动画状态。
//!
//! 这些字段只由调度器的帧推进路径写入；
//! 渲染方每次重绘时读取当前值来摆放图标。

use serde::{Deserialize, Serialize};

/// 图标几何状态
///
/// `normal_*` 是图标的自然尺寸；`current_*` 是动画中的即时尺寸。
/// `previous_*` 记录上一帧的值，供渲染方做脏区计算。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconGeometry {
    /// 水平偏移
    pub x_offset: f32,
    /// 垂直偏移（打开/关闭动画的升降量）
    pub y_offset: f32,
    /// 弹跳高度（悬停/启动动画）
    pub bounce_offset: f32,
    /// 本帧作用在图标上的纵向位移
    pub effect_y_offset: f32,
    /// 上一帧的纵向位移
    pub previous_effect_y_offset: f32,
    /// 旋转角度（度）
    pub rotate_degrees: f32,
    /// 透明度 (0.0 - 1.0)
    pub alpha: f32,
    /// 聚光强度 (0.0 - 1.0)
    pub spotlight_alpha: f32,
    /// 当前宽度
    pub current_width: f32,
    /// 当前高度
    pub current_height: f32,
    /// 自然宽度
    pub normal_width: f32,
    /// 自然高度
    pub normal_height: f32,
    /// 上一帧宽度
    pub previous_width: f32,
    /// 上一帧高度
    pub previous_height: f32,
}

impl IconGeometry {
    /// 创建处于静止姿态的几何状态
    pub fn new(normal_width: f32, normal_height: f32) -> Self {
        Self {
            x_offset: 0.0,
            y_offset: 0.0,
            bounce_offset: 0.0,
            effect_y_offset: 0.0,
            previous_effect_y_offset: 0.0,
            rotate_degrees: 0.0,
            alpha: 1.0,
            spotlight_alpha: 0.0,
            current_width: normal_width,
            current_height: normal_height,
            normal_width,
            normal_height,
            previous_width: normal_width,
            previous_height: normal_height,
        }
    }

    /// 回到静止姿态（保留自然尺寸）
    pub fn rest(&mut self) {
        let w = self.normal_width;
        let h = self.normal_height;
        *self = Self::new(w, h);
    }

    /// 更新自然尺寸（图标缩放配置变化时调用）
    pub fn resize(&mut self, normal_width: f32, normal_height: f32) {
        self.normal_width = normal_width;
        self.normal_height = normal_height;
        self.current_width = normal_width;
        self.current_height = normal_height;
        self.previous_width = normal_width;
        self.previous_height = normal_height;
    }

    /// 记录上一帧的值，随后再写入本帧
    pub(crate) fn remember_frame(&mut self) {
        self.previous_effect_y_offset = self.effect_y_offset;
        self.previous_width = self.current_width;
        self.previous_height = self.current_height;
    }

    /// 是否处于静止姿态
    pub fn is_resting(&self) -> bool {
        self.y_offset == 0.0
            && self.bounce_offset == 0.0
            && self.rotate_degrees == 0.0
            && self.alpha == 1.0
            && self.spotlight_alpha == 0.0
            && self.current_width == self.normal_width
            && self.current_height == self.normal_height
    }
}

impl Default for IconGeometry {
    fn default() -> Self {
        Self::new(48.0, 48.0)
    }
}
