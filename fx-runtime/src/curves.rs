//! # Curves 模块
//!
//! 各效果类别的逐帧动画曲线。
//! 这是所有周期长度、振幅参数的**唯一来源**。
//!
//! ## 设计说明
//!
//! 每条曲线都是 `(count, direction, 自然尺寸)` 的确定性闭式函数：
//! 同样的输入永远得到同样的几何状态，帧推进不携带隐藏状态。
//! `count` 从 1 数到周期长度，数满即一个循环结束；
//! 循环收尾那一帧的取值就是静止姿态，终帧重绘直接画出静止结果。

use std::f32::consts::PI;

use crate::easing::EasingFunction;
use crate::effect::Effect;
use crate::geometry::IconGeometry;

/// 各效果的周期与振幅参数
pub mod defaults {
    /// 打开动画周期（帧）
    pub const OPENING_FRAMES: u32 = 20;
    /// 关闭动画周期（帧）
    pub const CLOSING_FRAMES: u32 = 20;
    /// 悬停弹跳周期（帧）
    pub const HOVER_FRAMES: u32 = 20;
    /// 启动弹跳周期（帧）
    pub const LAUNCHING_FRAMES: u32 = 12;
    /// 注意脉冲周期（帧）
    pub const ATTENTION_FRAMES: u32 = 20;
    /// 改名动画周期（帧），前半淡出后半淡入
    pub const CHANGE_NAME_FRAMES: u32 = 40;

    /// 悬停弹跳高度 = 自然高度 × 此系数
    pub const HOVER_BOUNCE_RATIO: f32 = 1.0 / 3.0;
    /// 启动弹跳高度 = 自然高度 × 此系数
    pub const LAUNCH_BOUNCE_RATIO: f32 = 1.0 / 6.0;
    /// 注意脉冲的尺寸摆幅系数
    pub const ATTENTION_PULSE_RATIO: f32 = 1.0 / 8.0;
    /// 注意脉冲的摇摆角度（度）
    pub const ATTENTION_ROCK_DEGREES: f32 = 4.0;
}

/// 一个循环的帧数
pub fn cycle_frames(effect: Effect) -> u32 {
    match effect {
        Effect::None => 0,
        Effect::Opening => defaults::OPENING_FRAMES,
        Effect::Closing => defaults::CLOSING_FRAMES,
        Effect::Hover => defaults::HOVER_FRAMES,
        Effect::Launching => defaults::LAUNCHING_FRAMES,
        Effect::Attention => defaults::ATTENTION_FRAMES,
        Effect::ChangeName => defaults::CHANGE_NAME_FRAMES,
    }
}

/// 启动时摆出曲线的初始姿态
pub fn prepare(effect: Effect, geo: &mut IconGeometry) {
    geo.rest();
    if effect == Effect::Opening {
        // 从面板下方升起：先沉到底、完全透明
        geo.y_offset = geo.normal_height;
        geo.effect_y_offset = geo.normal_height;
        geo.alpha = 0.0;
    }
}

/// 推进一帧
///
/// # 参数
/// - `count`: 周期内的帧序号（1..=周期长度）
/// - `direction`: 振荡效果的相位符号（注意脉冲按循环交替胀缩）
pub fn advance(effect: Effect, geo: &mut IconGeometry, count: u32, direction: i32) {
    let cycle = cycle_frames(effect);
    if cycle == 0 {
        return;
    }
    let t = count as f32 / cycle as f32;

    geo.remember_frame();

    match effect {
        Effect::None => {}

        Effect::Opening => {
            let e = EasingFunction::EaseOut.apply(t);
            geo.y_offset = (1.0 - e) * geo.normal_height;
            geo.effect_y_offset = geo.y_offset;
            geo.alpha = e;
        }

        Effect::Closing => {
            let e = EasingFunction::EaseIn.apply(t);
            geo.y_offset = e * geo.normal_height;
            geo.effect_y_offset = geo.y_offset;
            geo.alpha = 1.0 - e;
        }

        Effect::Hover => {
            geo.bounce_offset = (PI * t).sin() * geo.normal_height * defaults::HOVER_BOUNCE_RATIO;
            geo.effect_y_offset = -geo.bounce_offset;
        }

        Effect::Launching => {
            let s = (PI * t).sin();
            geo.bounce_offset = s * geo.normal_height * defaults::LAUNCH_BOUNCE_RATIO;
            geo.effect_y_offset = -geo.bounce_offset;
            geo.spotlight_alpha = s;
        }

        Effect::Attention => {
            let s = (PI * t).sin();
            let factor = 1.0 + direction as f32 * s * defaults::ATTENTION_PULSE_RATIO;
            geo.current_width = geo.normal_width * factor;
            geo.current_height = geo.normal_height * factor;
            geo.spotlight_alpha = s;
            // 轻微摇摆，相位跟着胀缩方向走
            geo.rotate_degrees =
                direction as f32 * (2.0 * PI * t).sin() * defaults::ATTENTION_ROCK_DEGREES;
        }

        Effect::ChangeName => {
            let half = cycle / 2;
            if count <= half {
                // 前半程淡出
                let t2 = count as f32 / half as f32;
                geo.alpha = 1.0 - EasingFunction::EaseInOut.apply(t2);
            } else {
                // 后半程淡入
                let t2 = (count - half) as f32 / (cycle - half) as f32;
                geo.alpha = EasingFunction::EaseInOut.apply(t2);
            }
        }
    }
}

/// 终止后的落点姿态
///
/// 关闭动画收尾时图标保持沉底且全透明（马上要被移除，
/// 不能闪回可见状态）；其余效果回到静止姿态。
pub fn settle(effect: Effect, geo: &mut IconGeometry) {
    geo.rest();
    if effect == Effect::Closing {
        geo.alpha = 0.0;
        geo.y_offset = geo.normal_height;
        geo.effect_y_offset = geo.normal_height;
    }
}
