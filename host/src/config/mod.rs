//! # Config 模块
//!
//! 面板运行配置，集中管理所有配置项。
//!
//! ## 配置优先级
//!
//! 1. 配置文件 (config.json)
//! 2. 默认值

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::renderer::background::Color;

/// 面板贴靠的屏幕边
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PanelPosition {
    /// 顶边
    Top,
    /// 底边
    #[default]
    Bottom,
    /// 左边
    Left,
    /// 右边
    Right,
}

/// 面板配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    /// 面板贴靠位置
    #[serde(default)]
    pub position: PanelPosition,

    /// 图标自然尺寸（像素）
    #[serde(default = "default_icon_size")]
    pub icon_size: u32,

    /// 动画帧周期（毫秒）
    ///
    /// 效果在播期间按此周期驱动 tick；默认 40ms（25 帧/秒）。
    #[serde(default = "default_frame_time_ms")]
    pub frame_time_ms: u64,

    /// 面板是否铺满整条屏幕边
    #[serde(default)]
    pub expanded: bool,

    /// 收拢时在屏幕边上的对齐位置 (0.0 - 1.0)
    #[serde(default = "default_align")]
    pub align: f32,

    /// 从右到左布局
    #[serde(default)]
    pub rtl: bool,

    /// 背景配置
    #[serde(default)]
    pub background: BackgroundConfig,

    /// 效果配置
    #[serde(default)]
    pub effects: EffectsConfig,
}

/// 背景配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundConfig {
    /// 条带宽度占比 (0.0 - 1.0)；0 表示按 expander 布局自动推导
    #[serde(default)]
    pub stripe_width: f32,

    /// 每段进出曲线的宽度（像素）
    #[serde(default = "default_curviness")]
    pub curviness: f32,

    /// 手动条带的对称系数 (0.0 - 1.0)
    #[serde(default = "default_curves_symmetry")]
    pub curves_symmetry: f32,

    /// 条带渐变顶色
    #[serde(default = "default_border_color")]
    pub border_color: Color,

    /// 条带渐变底色
    #[serde(default = "default_hilight_color")]
    pub hilight_color: Color,

    /// 面板主体渐变顶色
    #[serde(default = "default_g_step_1")]
    pub g_step_1: Color,

    /// 面板主体渐变底色
    #[serde(default = "default_g_step_2")]
    pub g_step_2: Color,

    /// 顶部高光渐变顶色
    #[serde(default = "default_g_histep_1")]
    pub g_histep_1: Color,

    /// 顶部高光渐变底色
    #[serde(default = "default_g_histep_2")]
    pub g_histep_2: Color,
}

/// 效果配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectsConfig {
    /// 注意脉冲的循环上限；0 表示循环到被叫停
    #[serde(default)]
    pub attention_loops: u32,

    /// 启动弹跳的循环上限；0 表示循环到被叫停
    #[serde(default)]
    pub launch_loops: u32,
}

// 默认值函数
fn default_icon_size() -> u32 {
    48
}

fn default_frame_time_ms() -> u64 {
    40
}

fn default_align() -> f32 {
    0.5
}

fn default_curviness() -> f32 {
    10.0
}

fn default_curves_symmetry() -> f32 {
    0.5
}

fn default_border_color() -> Color {
    Color::rgba(0.06, 0.06, 0.06, 0.85)
}

fn default_hilight_color() -> Color {
    Color::rgba(0.25, 0.25, 0.25, 0.60)
}

fn default_g_step_1() -> Color {
    Color::rgba(0.12, 0.12, 0.12, 0.90)
}

fn default_g_step_2() -> Color {
    Color::rgba(0.02, 0.02, 0.02, 0.95)
}

fn default_g_histep_1() -> Color {
    Color::rgba(1.0, 1.0, 1.0, 0.18)
}

fn default_g_histep_2() -> Color {
    Color::rgba(1.0, 1.0, 1.0, 0.02)
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            position: PanelPosition::default(),
            icon_size: default_icon_size(),
            frame_time_ms: default_frame_time_ms(),
            expanded: false,
            align: default_align(),
            rtl: false,
            background: BackgroundConfig::default(),
            effects: EffectsConfig::default(),
        }
    }
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            stripe_width: 0.0,
            curviness: default_curviness(),
            curves_symmetry: default_curves_symmetry(),
            border_color: default_border_color(),
            hilight_color: default_hilight_color(),
            g_step_1: default_g_step_1(),
            g_step_2: default_g_step_2(),
            g_histep_1: default_g_histep_1(),
            g_histep_2: default_g_histep_2(),
        }
    }
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            attention_loops: 0,
            launch_loops: 0,
        }
    }
}

impl PanelConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并打印警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            println!("⚠️ 配置文件不存在: {:?}，使用默认配置", path);
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    println!("✅ 配置文件加载成功: {:?}", path);
                    config
                }
                Err(e) => {
                    eprintln!("⚠️ 配置文件解析失败: {}，使用默认配置", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("⚠️ 配置文件读取失败: {}，使用默认配置", e);
                Self::default()
            }
        }
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::Io(e.to_string()))?;

        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_time_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "帧周期必须大于 0".to_string(),
            ));
        }

        if self.icon_size == 0 {
            return Err(ConfigError::ValidationFailed(
                "图标尺寸必须大于 0".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.align) {
            return Err(ConfigError::ValidationFailed(
                "对齐位置必须在 0.0 - 1.0 之间".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.background.stripe_width) {
            return Err(ConfigError::ValidationFailed(
                "条带宽度占比必须在 0.0 - 1.0 之间".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.background.curves_symmetry) {
            return Err(ConfigError::ValidationFailed(
                "条带对称系数必须在 0.0 - 1.0 之间".to_string(),
            ));
        }

        if self.background.curviness < 0.0 {
            return Err(ConfigError::ValidationFailed(
                "曲线宽度不能为负".to_string(),
            ));
        }

        Ok(())
    }

    /// 动画帧周期
    pub fn frame_time(&self) -> Duration {
        Duration::from_millis(self.frame_time_ms)
    }
}

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    SerializationFailed(String),

    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    Io(String),

    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}
