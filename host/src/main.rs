//! Dock 效果引擎 - Headless 演示驱动
//!
//! 不挂真实控件系统：用脚本化的场景驱动一块面板跑若干帧，
//! 指针事件由 [`PointerBus`](host::PointerBus) 模拟，动画
//! 生命周期通过 tracing 输出，`--trace` 时逐帧打印 JSON 快照。

use std::path::PathBuf;
use std::thread;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use host::{Panel, PanelConfig};

#[derive(Parser)]
#[command(name = "dock-fx", about = "Dock 图标效果引擎 headless 演示")]
struct Args {
    /// 配置文件路径
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// 模拟帧数
    #[arg(long, default_value_t = 200)]
    frames: u32,

    /// 逐帧输出各图标的 JSON 快照
    #[arg(long)]
    trace: bool,

    /// 按配置的帧周期实时推进（默认全速跑完）
    #[arg(long)]
    realtime: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_ansi(true).init();

    let args = Args::parse();
    let config = PanelConfig::load(&args.config);
    config.validate()?;

    let frame_time = config.frame_time();
    let mut panel = Panel::new(config);
    let files = panel.add_icon("文件");
    let terminal = panel.add_icon("终端");
    let mail = panel.add_icon("邮件");
    info!(icons = panel.icon_count(), "面板就绪");

    let mut repaints: u64 = 0;
    let mut background_generation = 0;

    for frame in 0..args.frames {
        play_scenario(&panel, frame, files, terminal, mail);

        if panel.tick() {
            repaints += 1;
            let surface = panel.render_background(800.0, 48.0);
            if surface.generation != background_generation {
                background_generation = surface.generation;
                info!(frame, generation = background_generation, "背景缓存重建");
            }
        }

        if args.trace {
            for index in 0..panel.icon_count() {
                if let Some(icon) = panel.icon(index) {
                    println!("{}", icon.effects.snapshot().to_json()?);
                }
            }
        }

        if args.realtime {
            thread::sleep(frame_time);
        }
    }

    info!(
        frames = args.frames,
        repaints,
        requests = panel.repaint_requests(),
        "模拟结束"
    );
    Ok(())
}

/// 脚本化场景：打开 → 悬停 → 启动 → 注意 → 改名 → 关闭
fn play_scenario(panel: &Panel, frame: u32, files: usize, terminal: usize, mail: usize) {
    match frame {
        5 => {
            if let Some(icon) = panel.icon(files) {
                info!(icon = %icon.name(), "再次显示，播放打开动画");
                icon.shown();
            }
        }
        30 => {
            if let Some(icon) = panel.icon(files) {
                info!(icon = %icon.name(), "指针进入");
                icon.pointer.emit_enter();
            }
        }
        70 => {
            if let Some(icon) = panel.icon(files) {
                info!(icon = %icon.name(), "指针离开");
                icon.pointer.emit_leave();
            }
        }
        80 => {
            if let Some(icon) = panel.icon(terminal) {
                info!(icon = %icon.name(), "应用启动");
                icon.launch();
            }
        }
        120 => {
            if let Some(icon) = panel.icon(terminal) {
                info!(icon = %icon.name(), "应用就绪");
                icon.launch_done();
            }
        }
        125 => {
            if let Some(icon) = panel.icon(mail) {
                info!(icon = %icon.name(), "请求注意");
                icon.ask_attention();
            }
        }
        160 => {
            if let Some(icon) = panel.icon(mail) {
                icon.attention_done();
            }
        }
        165 => {
            if let Some(icon) = panel.icon(files) {
                info!(icon = %icon.name(), "改名");
                icon.rename("文档");
            }
        }
        180 => {
            if let Some(icon) = panel.icon(terminal) {
                info!(icon = %icon.name(), "关闭");
                icon.close();
            }
        }
        _ => {}
    }
}
