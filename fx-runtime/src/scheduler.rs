//! # Scheduler 模块
//!
//! 效果调度器：启动/停止、冲突解析、逐帧推进。
//!
//! ## 调度规则
//!
//! 1. 空闲时的请求立即开播；
//! 2. 高优先级请求**抢占**在播效果：旧类别的 `on_stop` 先于
//!    新类别的 `on_start` 恰好各触发一次；
//! 3. 低/同优先级请求进入单槽位排队，在播效果终止后自动解析；
//! 4. 优雅停止在循环边界生效，绝不在帧中间截断；
//! 5. `kill` 立即终止一切并永久失活上下文。
//!
//! ## 重入纪律
//!
//! 所有用户回调（`on_start` / `on_stop` / 继续条件 / 标题）都在
//! `RefCell` 借用之外派发。帧推进期间 `effect_lock` 置位，
//! 此时重入的 `start` 只会写入排队槽位，`tick` 被整帧跳过 ——
//! 嵌套回调无法造成状态的双重推进。
//!
//! ## 驱动方式
//!
//! 运行时本身不带时钟。宿主在有效果在播期间按固定帧周期调用
//! [`tick`](IconEffects::tick)；每次 tick 收尾都会请求一次重绘，
//! 终帧也不例外，保证静止姿态被画出来。

use std::cell::RefCell;
use std::rc::Rc;

use crate::context::{EffectContext, Phase, TitleHook};
use crate::curves;
use crate::descriptor::{ConditionFn, EventCallback};
use crate::diagnostic::EffectSnapshot;
use crate::effect::Effect;
use crate::error::{EffectError, FxResult};
use crate::geometry::IconGeometry;
use crate::traits::{EffectHost, PointerSource, TitleSurface};

/// 待派发的回调队列；全部在借用之外执行
type FireList = Vec<Box<dyn FnOnce()>>;

fn run_callbacks(fires: FireList) {
    for fire in fires {
        fire();
    }
}

fn push_event(fires: &mut FireList, callback: &Option<EventCallback>) {
    if let Some(cb) = callback {
        let cb = cb.clone();
        fires.push(Box::new(move || cb()));
    }
}

fn push_title_show(fires: &mut FireList, ctx: &EffectContext) {
    if let Some(hook) = &ctx.title {
        let surface = hook.surface.clone();
        let text = hook.text.clone();
        // 文案惰性求值：真正显示时才调用
        fires.push(Box::new(move || surface.show(&text())));
    }
}

fn push_title_hide(fires: &mut FireList, ctx: &EffectContext) {
    if let Some(hook) = &ctx.title {
        let surface = hook.surface.clone();
        fires.push(Box::new(move || surface.hide()));
    }
}

/// 终止当前效果：`on_stop` 恰好一次，归还槽位，摆出落点姿态
fn terminate_current(ctx: &mut EffectContext) -> FireList {
    let mut fires = FireList::new();
    let effect = ctx.current;
    if effect == Effect::None {
        return fires;
    }

    if let Some(descriptor) = ctx.descriptors.get_mut(effect) {
        if let Some(running) = descriptor.running.take() {
            push_event(&mut fires, &running.on_stop);
        }
        descriptor.clear();
    }
    if effect == Effect::Hover {
        push_title_hide(&mut fires, ctx);
    }

    curves::settle(effect, &mut ctx.geometry);
    ctx.current = Effect::None;
    ctx.phase = Phase::Idle;
    ctx.is_active = false;
    ctx.count = 0;
    ctx.direction = 1;
    fires
}

/// 开播新效果；若有在播效果则先走终止路径（抢占）
fn begin_effect(ctx: &mut EffectContext, effect: Effect) -> FireList {
    // 旧 on_stop 先于新 on_start
    let mut fires = terminate_current(ctx);

    let Some(descriptor) = ctx.descriptors.get_mut(effect) else {
        return fires;
    };
    descriptor.begin();
    let on_start = descriptor
        .running
        .as_ref()
        .and_then(|running| running.on_start.clone());

    ctx.current = effect;
    ctx.phase = Phase::Animating;
    ctx.is_active = true;
    ctx.count = 0;
    ctx.direction = if effect == Effect::ChangeName { -1 } else { 1 };
    curves::prepare(effect, &mut ctx.geometry);

    push_event(&mut fires, &on_start);
    if effect == Effect::Hover {
        push_title_show(&mut fires, ctx);
    }
    fires
}

/// 每图标的效果调度句柄
///
/// `Rc` 包装的轻量句柄，clone 共享同一份上下文。
/// 事件接线的闭包、宿主的帧驱动各持一份即可。
///
/// # 使用示例
///
/// ```ignore
/// let fx = IconEffects::new(host.clone());
/// fx.set_notify(Effect::Attention, None, Some(on_stop), 3);
///
/// fx.start(Effect::Attention)?;
/// loop {
///     fx.tick();                    // 宿主按帧周期驱动
///     if !fx.is_active() { break; }
/// }
/// ```
#[derive(Clone)]
pub struct IconEffects {
    inner: Rc<RefCell<EffectContext>>,
}

impl IconEffects {
    /// 初始化上下文：全部类别未激活、无当前效果、首次显示待压制
    pub fn new(host: Rc<dyn EffectHost>) -> Self {
        Self::with_icon_size(host, 48.0, 48.0)
    }

    /// 以指定图标尺寸初始化
    pub fn with_icon_size(host: Rc<dyn EffectHost>, width: f32, height: f32) -> Self {
        Self {
            inner: Rc::new(RefCell::new(EffectContext::new(host, width, height))),
        }
    }

    // ========== 调度入口 ==========

    /// 请求启动一个效果
    ///
    /// # 错误
    /// - [`EffectError::InvalidEffect`]：请求了 `Effect::None`
    /// - [`EffectError::Killed`]：上下文已终结
    ///
    /// 其余情形总是成功：要么立即开播（空闲或抢占），
    /// 要么写入排队槽位等待在播效果终止。
    pub fn start(&self, effect: Effect) -> FxResult<()> {
        let fires = {
            let mut ctx = self.inner.borrow_mut();
            if !effect.is_schedulable() {
                return Err(EffectError::InvalidEffect);
            }
            if ctx.killed {
                return Err(EffectError::Killed { effect });
            }

            if ctx.effect_lock {
                // 帧推进在途：挂入排队槽位，解锁后解析
                ctx.enqueue_scheduled(effect);
                return Ok(());
            }

            if ctx.current == Effect::Hover && effect == Effect::Hover {
                // 悬停重复启动幂等；若正走优雅停止则撤销停止请求
                if ctx.phase == Phase::Terminating {
                    ctx.phase = Phase::Animating;
                }
                return Ok(());
            }

            if ctx.current == Effect::None || effect.preempts(ctx.current) {
                begin_effect(&mut ctx, effect)
            } else {
                ctx.enqueue_scheduled(effect);
                FireList::new()
            }
        };
        run_callbacks(fires);
        self.request_repaint();
        Ok(())
    }

    /// 请求停止一个效果
    ///
    /// 只对当前在播的类别生效：在途循环数完后在循环边界终止。
    /// 顺带清掉同类别的排队请求；其余情形是无操作。
    pub fn stop(&self, effect: Effect) {
        let mut ctx = self.inner.borrow_mut();
        if !effect.is_schedulable() {
            return;
        }
        if ctx.scheduled == Some(effect) {
            ctx.scheduled = None;
        }
        if ctx.current == effect && ctx.phase == Phase::Animating {
            ctx.phase = Phase::Terminating;
        }
    }

    /// 图标显示通知
    ///
    /// 首次显示压制打开动画（图标直接出现）；之后的每次显示
    /// 正常播放 [`Effect::Opening`]。
    pub fn icon_shown(&self) {
        {
            let mut ctx = self.inner.borrow_mut();
            if ctx.killed {
                return;
            }
            if ctx.first_run {
                ctx.first_run = false;
                ctx.geometry.rest();
                return;
            }
        }
        let _ = self.start(Effect::Opening);
    }

    /// 推进一帧
    ///
    /// 宿主在有效果在播期间按固定帧周期调用。
    /// `effect_lock` 在途时本帧被跳过（重入保护），下个周期自愈。
    pub fn tick(&self) {
        // ── 帧推进（取锁） ──
        let mut midpoint_fires = FireList::new();
        let (effect, cycle_done, condition) = {
            let mut ctx = self.inner.borrow_mut();
            if ctx.effect_lock {
                return;
            }
            if ctx.killed || ctx.current == Effect::None {
                return;
            }
            ctx.effect_lock = true;

            let effect = ctx.current;
            let cycle = curves::cycle_frames(effect);
            ctx.count += 1;
            let count = ctx.count;
            let direction = ctx.direction;
            curves::advance(effect, &mut ctx.geometry, count, direction);

            // 改名动画中点：旧名隐去、新名亮出、相位翻正
            if effect == Effect::ChangeName && count == cycle / 2 {
                ctx.direction = 1;
                push_title_hide(&mut midpoint_fires, &ctx);
                push_title_show(&mut midpoint_fires, &ctx);
            }

            let cycle_done = count >= cycle;
            let condition = if cycle_done {
                ctx.descriptors
                    .get(effect)
                    .and_then(|d| d.running.as_ref())
                    .and_then(|running| running.condition.clone())
            } else {
                None
            };
            (effect, cycle_done, condition)
        };
        run_callbacks(midpoint_fires);

        // 继续条件在借用之外求值（回调可能重入调度）
        let condition_stops = condition.map(|cond| !cond()).unwrap_or(false);

        // ── 循环边界判定 ──
        let fires = {
            let mut ctx = self.inner.borrow_mut();
            let mut fires = FireList::new();
            // 回调里可能已 kill；current 变了就不再收尾
            if cycle_done && ctx.current == effect {
                ctx.count = 0;
                let mut finished =
                    ctx.phase == Phase::Terminating || condition_stops || ctx.killed;
                if let Some(descriptor) = ctx.descriptors.get_mut(effect) {
                    descriptor.loop_count += 1;
                    let limit = descriptor
                        .running
                        .as_ref()
                        .map(|running| running.loop_limit)
                        .unwrap_or(0);
                    if limit > 0 && descriptor.loop_count >= limit {
                        finished = true;
                    }
                }
                if finished {
                    fires = terminate_current(&mut ctx);
                } else if effect == Effect::Attention {
                    // 注意脉冲逐循环交替胀缩
                    ctx.direction = -ctx.direction;
                }
            }
            fires
        };
        // on_stop 在锁内派发：重入的 start 只会排队
        run_callbacks(fires);

        // ── 解锁并解析排队请求 ──
        let fires = {
            let mut ctx = self.inner.borrow_mut();
            ctx.effect_lock = false;
            // 空闲槽位直接开播；锁内攒下的高优先级请求此刻补行抢占
            match ctx.scheduled {
                Some(next)
                    if !ctx.killed
                        && (ctx.current == Effect::None || next.preempts(ctx.current)) =>
                {
                    ctx.scheduled = None;
                    begin_effect(&mut ctx, next)
                }
                _ => FireList::new(),
            }
        };
        run_callbacks(fires);

        // ── 每帧必然请求重绘（包括终帧，静止姿态要被画出来） ──
        self.request_repaint();
    }

    /// 立即终止一切动画并永久失活
    ///
    /// 在播类别的 `on_stop` 同步触发恰好一次，排队请求作废，
    /// 指针通知句柄同路释放。此后 `start` 返回
    /// [`EffectError::Killed`]，`tick` 是无操作。
    pub fn kill(&self) {
        let (fires, pointer, enter, leave) = {
            let mut ctx = self.inner.borrow_mut();
            if ctx.killed {
                return;
            }
            ctx.killed = true;
            ctx.scheduled = None;
            let fires = terminate_current(&mut ctx);
            (
                fires,
                ctx.pointer.take(),
                ctx.enter_notify.take(),
                ctx.leave_notify.take(),
            )
        };
        run_callbacks(fires);
        if let Some(source) = pointer {
            if let Some(id) = enter {
                source.disconnect(id);
            }
            if let Some(id) = leave {
                source.disconnect(id);
            }
        }
    }

    // ========== 事件接线 ==========

    /// 注册指针进入/离开通知
    ///
    /// 进入触发 `start(Hover)`，离开触发 `stop(Hover)`。
    /// 重复注册先释放旧句柄再接新的。
    pub fn register_effects(&self, source: Rc<dyn PointerSource>) {
        if self.inner.borrow().killed {
            return;
        }
        self.unregister_effects();

        let enter = {
            let fx = self.clone();
            source.connect_enter(Box::new(move || {
                let _ = fx.start(Effect::Hover);
            }))
        };
        let leave = {
            let fx = self.clone();
            source.connect_leave(Box::new(move || fx.stop(Effect::Hover)))
        };

        let mut ctx = self.inner.borrow_mut();
        ctx.pointer = Some(source);
        ctx.enter_notify = Some(enter);
        ctx.leave_notify = Some(leave);
    }

    /// 注销指针通知；从未注册过也可以安全调用（幂等无操作）
    pub fn unregister_effects(&self) {
        let (pointer, enter, leave) = {
            let mut ctx = self.inner.borrow_mut();
            (
                ctx.pointer.take(),
                ctx.enter_notify.take(),
                ctx.leave_notify.take(),
            )
        };
        if let Some(source) = pointer {
            if let Some(id) = enter {
                source.disconnect(id);
            }
            if let Some(id) = leave {
                source.disconnect(id);
            }
        }
    }

    // ========== 配置 ==========

    /// 安装某类别的回调与循环上限
    ///
    /// 在途动画继续使用启动时拍下的快照；
    /// 新配置从该类别下一次启动生效。
    pub fn set_notify(
        &self,
        effect: Effect,
        on_start: Option<EventCallback>,
        on_stop: Option<EventCallback>,
        loop_limit: u32,
    ) {
        let mut ctx = self.inner.borrow_mut();
        if let Some(descriptor) = ctx.descriptors.get_mut(effect) {
            descriptor.configured.on_start = on_start;
            descriptor.configured.on_stop = on_stop;
            descriptor.configured.loop_limit = loop_limit;
        }
    }

    /// 安装某类别的循环继续条件
    ///
    /// 每个循环边界求值一次，返回 `false` 时效果终止。
    pub fn set_condition(&self, effect: Effect, condition: Option<ConditionFn>) {
        let mut ctx = self.inner.borrow_mut();
        if let Some(descriptor) = ctx.descriptors.get_mut(effect) {
            descriptor.configured.condition = condition;
        }
    }

    /// 挂接标题展示面与惰性文案回调
    pub fn set_title(&self, surface: Rc<dyn TitleSurface>, text: Rc<dyn Fn() -> String>) {
        self.inner.borrow_mut().title = Some(TitleHook { surface, text });
    }

    /// 更新图标自然尺寸
    pub fn set_icon_size(&self, width: f32, height: f32) {
        self.inner.borrow_mut().geometry.resize(width, height);
    }

    // ========== 查询 ==========

    /// 当前在播效果（空闲时为 `Effect::None`）
    pub fn current_effect(&self) -> Effect {
        self.inner.borrow().current
    }

    /// 是否有效果真正在动
    pub fn is_active(&self) -> bool {
        self.inner.borrow().is_active
    }

    /// 排队槽位里的待解析请求
    pub fn scheduled_effect(&self) -> Option<Effect> {
        self.inner.borrow().scheduled
    }

    /// 某类别已完成的循环数
    pub fn loop_count(&self, effect: Effect) -> u32 {
        self.inner
            .borrow()
            .descriptors
            .get(effect)
            .map(|d| d.loop_count)
            .unwrap_or(0)
    }

    /// 当前几何状态的拷贝
    pub fn geometry(&self) -> IconGeometry {
        self.inner.borrow().geometry.clone()
    }

    /// 是否已被终结
    pub fn is_killed(&self) -> bool {
        self.inner.borrow().killed
    }

    /// 诊断快照
    pub fn snapshot(&self) -> EffectSnapshot {
        EffectSnapshot::capture(&self.inner.borrow())
    }

    fn request_repaint(&self) {
        let host = self.inner.borrow().host.clone();
        host.queue_repaint();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::cycle_frames;
    use crate::traits::HandlerId;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    /// 记录重绘请求次数的宿主
    struct RecordingHost {
        repaints: Cell<u32>,
    }

    impl RecordingHost {
        fn new() -> Rc<Self> {
            Rc::new(Self {
                repaints: Cell::new(0),
            })
        }
    }

    impl EffectHost for RecordingHost {
        fn queue_repaint(&self) {
            self.repaints.set(self.repaints.get() + 1);
        }
    }

    /// 记录显示/隐藏调用的标题面
    struct RecordingTitle {
        log: RefCell<Vec<String>>,
    }

    impl RecordingTitle {
        fn new() -> Rc<Self> {
            Rc::new(Self {
                log: RefCell::new(Vec::new()),
            })
        }
    }

    impl TitleSurface for RecordingTitle {
        fn show(&self, text: &str) {
            self.log.borrow_mut().push(format!("show:{}", text));
        }

        fn hide(&self) {
            self.log.borrow_mut().push("hide".to_string());
        }
    }

    /// 测试用指针事件总线
    struct TestPointerBus {
        next_id: Cell<u64>,
        enter: RefCell<HashMap<u64, Box<dyn Fn()>>>,
        leave: RefCell<HashMap<u64, Box<dyn Fn()>>>,
    }

    impl TestPointerBus {
        fn new() -> Rc<Self> {
            Rc::new(Self {
                next_id: Cell::new(1),
                enter: RefCell::new(HashMap::new()),
                leave: RefCell::new(HashMap::new()),
            })
        }

        fn emit_enter(&self) {
            let callbacks: Vec<_> = {
                let map = self.enter.borrow();
                map.keys().copied().collect()
            };
            for id in callbacks {
                let cb = self.enter.borrow_mut().remove(&id);
                if let Some(cb) = cb {
                    cb();
                    self.enter.borrow_mut().insert(id, cb);
                }
            }
        }

        fn emit_leave(&self) {
            let callbacks: Vec<_> = {
                let map = self.leave.borrow();
                map.keys().copied().collect()
            };
            for id in callbacks {
                let cb = self.leave.borrow_mut().remove(&id);
                if let Some(cb) = cb {
                    cb();
                    self.leave.borrow_mut().insert(id, cb);
                }
            }
        }

        fn handler_count(&self) -> usize {
            self.enter.borrow().len() + self.leave.borrow().len()
        }
    }

    impl PointerSource for TestPointerBus {
        fn connect_enter(&self, callback: Box<dyn Fn()>) -> HandlerId {
            let id = self.next_id.get();
            self.next_id.set(id + 1);
            self.enter.borrow_mut().insert(id, callback);
            HandlerId::new(id)
        }

        fn connect_leave(&self, callback: Box<dyn Fn()>) -> HandlerId {
            let id = self.next_id.get();
            self.next_id.set(id + 1);
            self.leave.borrow_mut().insert(id, callback);
            HandlerId::new(id)
        }

        fn disconnect(&self, id: HandlerId) {
            self.enter.borrow_mut().remove(&id.value());
            self.leave.borrow_mut().remove(&id.value());
        }
    }

    fn fx() -> (IconEffects, Rc<RecordingHost>) {
        let host = RecordingHost::new();
        (IconEffects::new(host.clone()), host)
    }

    /// 安装往事件日志里追加 "<name>:start" / "<name>:stop" 的回调
    fn log_hooks(
        fx: &IconEffects,
        effect: Effect,
        log: &Rc<RefCell<Vec<String>>>,
        name: &'static str,
        loop_limit: u32,
    ) {
        let start_log = log.clone();
        let stop_log = log.clone();
        fx.set_notify(
            effect,
            Some(Rc::new(move || {
                start_log.borrow_mut().push(format!("{}:start", name))
            })),
            Some(Rc::new(move || {
                stop_log.borrow_mut().push(format!("{}:stop", name))
            })),
            loop_limit,
        );
    }

    fn run_frames(fx: &IconEffects, frames: u32) {
        for _ in 0..frames {
            fx.tick();
        }
    }

    fn active_descriptors(fx: &IconEffects) -> usize {
        fx.inner.borrow().descriptors.active_count()
    }

    // ========== 基本调度 ==========

    #[test]
    fn test_start_none_rejected() {
        let (fx, _) = fx();
        assert_eq!(fx.start(Effect::None), Err(EffectError::InvalidEffect));
        assert_eq!(fx.current_effect(), Effect::None);
        assert!(!fx.is_active());
    }

    #[test]
    fn test_start_when_idle() {
        let (fx, _) = fx();
        let log = Rc::new(RefCell::new(Vec::new()));
        log_hooks(&fx, Effect::Hover, &log, "hover", 0);

        fx.start(Effect::Hover).unwrap();
        assert_eq!(fx.current_effect(), Effect::Hover);
        assert!(fx.is_active());
        assert_eq!(*log.borrow(), vec!["hover:start"]);
    }

    #[test]
    fn test_at_most_one_active_descriptor() {
        let (fx, _) = fx();
        fx.start(Effect::Hover).unwrap();
        assert_eq!(active_descriptors(&fx), 1);

        // 抢占后仍然只有一个激活
        fx.start(Effect::Closing).unwrap();
        assert_eq!(active_descriptors(&fx), 1);

        // 排队不占槽位
        let _ = fx.start(Effect::Hover);
        assert_eq!(active_descriptors(&fx), 1);
    }

    #[test]
    fn test_preemption_fires_stop_before_start() {
        let (fx, _) = fx();
        let log = Rc::new(RefCell::new(Vec::new()));
        log_hooks(&fx, Effect::Hover, &log, "hover", 0);
        log_hooks(&fx, Effect::Closing, &log, "closing", 1);

        fx.start(Effect::Hover).unwrap();
        fx.start(Effect::Closing).unwrap();

        // 立即抢占；旧 on_stop 恰好一次且在新 on_start 之前
        assert_eq!(fx.current_effect(), Effect::Closing);
        assert_eq!(
            *log.borrow(),
            vec!["hover:start", "hover:stop", "closing:start"]
        );
    }

    #[test]
    fn test_lower_priority_is_queued() {
        let (fx, _) = fx();
        fx.start(Effect::Closing).unwrap();
        fx.start(Effect::Hover).unwrap();

        assert_eq!(fx.current_effect(), Effect::Closing);
        assert_eq!(fx.scheduled_effect(), Some(Effect::Hover));
    }

    #[test]
    fn test_equal_priority_is_queued() {
        let (fx, _) = fx();
        fx.start(Effect::Hover).unwrap();
        fx.start(Effect::Launching).unwrap();

        assert_eq!(fx.current_effect(), Effect::Hover);
        assert_eq!(fx.scheduled_effect(), Some(Effect::Launching));
    }

    // ========== 循环与终止 ==========

    #[test]
    fn test_loop_limit_exact_cycle_count() {
        let (fx, _) = fx();
        let log = Rc::new(RefCell::new(Vec::new()));
        log_hooks(&fx, Effect::Attention, &log, "attention", 3);

        fx.start(Effect::Attention).unwrap();
        let cycle = cycle_frames(Effect::Attention);

        // 差一帧时还在播
        run_frames(&fx, cycle * 3 - 1);
        assert!(fx.is_active());
        assert_eq!(log.borrow().iter().filter(|e| *e == "attention:stop").count(), 0);

        // 数满三个循环恰好终止
        fx.tick();
        assert!(!fx.is_active());
        assert_eq!(fx.current_effect(), Effect::None);
        assert_eq!(
            log.borrow().iter().filter(|e| *e == "attention:stop").count(),
            1
        );
    }

    #[test]
    fn test_unbounded_loops_never_exhaust() {
        let (fx, _) = fx();
        fx.start(Effect::Hover).unwrap();

        // loop_limit = 0：跑十个循环也不会自行终止
        run_frames(&fx, cycle_frames(Effect::Hover) * 10);
        assert!(fx.is_active());
        assert_eq!(fx.loop_count(Effect::Hover), 10);
    }

    #[test]
    fn test_opening_single_cycle_scenario() {
        let (fx, _) = fx();
        let log = Rc::new(RefCell::new(Vec::new()));
        log_hooks(&fx, Effect::Opening, &log, "opening", 1);

        fx.start(Effect::Opening).unwrap();
        run_frames(&fx, cycle_frames(Effect::Opening));

        assert_eq!(fx.current_effect(), Effect::None);
        assert_eq!(active_descriptors(&fx), 0);
        assert_eq!(*log.borrow(), vec!["opening:start", "opening:stop"]);
        // 终帧落在静止姿态
        assert!(fx.geometry().is_resting());
    }

    #[test]
    fn test_stop_terminates_at_cycle_boundary() {
        let (fx, _) = fx();
        let log = Rc::new(RefCell::new(Vec::new()));
        log_hooks(&fx, Effect::Hover, &log, "hover", 0);

        fx.start(Effect::Hover).unwrap();
        run_frames(&fx, 5);
        fx.stop(Effect::Hover);

        // 停止请求不立即生效：在途循环照常数完
        assert!(fx.is_active());
        run_frames(&fx, cycle_frames(Effect::Hover) - 5 - 1);
        assert!(fx.is_active());

        fx.tick();
        assert!(!fx.is_active());
        assert_eq!(
            log.borrow().iter().filter(|e| *e == "hover:stop").count(),
            1
        );
    }

    #[test]
    fn test_stop_inactive_is_noop() {
        let (fx, _) = fx();
        let log = Rc::new(RefCell::new(Vec::new()));
        log_hooks(&fx, Effect::Hover, &log, "hover", 0);

        fx.stop(Effect::Hover);
        assert_eq!(fx.current_effect(), Effect::None);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_stop_clears_queued_request() {
        let (fx, _) = fx();
        fx.start(Effect::Closing).unwrap();
        fx.start(Effect::Hover).unwrap();
        assert_eq!(fx.scheduled_effect(), Some(Effect::Hover));

        // 排队中的请求也能被叫停
        fx.stop(Effect::Hover);
        assert_eq!(fx.scheduled_effect(), None);
        assert_eq!(fx.current_effect(), Effect::Closing);
    }

    #[test]
    fn test_condition_false_terminates() {
        let (fx, _) = fx();
        let log = Rc::new(RefCell::new(Vec::new()));
        log_hooks(&fx, Effect::Launching, &log, "launching", 0);

        // 两个循环后条件不再成立
        let remaining = Rc::new(Cell::new(2u32));
        let gate = remaining.clone();
        fx.set_condition(
            Effect::Launching,
            Some(Rc::new(move || {
                let left = gate.get();
                if left == 0 {
                    false
                } else {
                    gate.set(left - 1);
                    true
                }
            })),
        );

        fx.start(Effect::Launching).unwrap();
        run_frames(&fx, cycle_frames(Effect::Launching) * 3);

        assert!(!fx.is_active());
        assert_eq!(
            log.borrow().iter().filter(|e| *e == "launching:stop").count(),
            1
        );
    }

    // ========== 幂等与排队解析 ==========

    #[test]
    fn test_hover_restart_is_idempotent() {
        let (fx, _) = fx();
        let log = Rc::new(RefCell::new(Vec::new()));
        log_hooks(&fx, Effect::Hover, &log, "hover", 0);

        fx.start(Effect::Hover).unwrap();
        run_frames(&fx, cycle_frames(Effect::Hover) + 3);
        let loops_before = fx.loop_count(Effect::Hover);
        let count_before = fx.inner.borrow().count;

        // 重复启动：loop_count / count / active 均不变，不重复触发回调
        fx.start(Effect::Hover).unwrap();
        assert_eq!(fx.loop_count(Effect::Hover), loops_before);
        assert_eq!(fx.inner.borrow().count, count_before);
        assert!(fx.is_active());
        assert_eq!(*log.borrow(), vec!["hover:start"]);
    }

    #[test]
    fn test_hover_reenter_cancels_graceful_stop() {
        let (fx, _) = fx();
        fx.start(Effect::Hover).unwrap();
        fx.stop(Effect::Hover);
        assert_eq!(fx.inner.borrow().phase, Phase::Terminating);

        // 指针回来了：撤销停止请求，继续弹跳
        fx.start(Effect::Hover).unwrap();
        assert_eq!(fx.inner.borrow().phase, Phase::Animating);
        run_frames(&fx, cycle_frames(Effect::Hover));
        assert!(fx.is_active());
    }

    #[test]
    fn test_queued_effect_starts_after_current_finishes() {
        let (fx, _) = fx();
        let log = Rc::new(RefCell::new(Vec::new()));
        log_hooks(&fx, Effect::Closing, &log, "closing", 1);
        log_hooks(&fx, Effect::Hover, &log, "hover", 0);

        // 关闭动画在播时指针进入：悬停排队而不是开播
        fx.start(Effect::Closing).unwrap();
        fx.start(Effect::Hover).unwrap();
        assert_eq!(fx.current_effect(), Effect::Closing);

        // 关闭收尾后悬停自动开播
        run_frames(&fx, cycle_frames(Effect::Closing));
        assert_eq!(fx.current_effect(), Effect::Hover);
        assert_eq!(
            *log.borrow(),
            vec!["closing:start", "closing:stop", "hover:start"]
        );
    }

    #[test]
    fn test_start_from_callback_is_deferred() {
        let (fx, _) = fx();
        let log = Rc::new(RefCell::new(Vec::new()));
        log_hooks(&fx, Effect::Hover, &log, "hover", 0);

        // opening 的 on_stop 里重入调度：锁内只能排队，本轮 tick 收尾解析
        let chained = fx.clone();
        let stop_log = log.clone();
        fx.set_notify(
            Effect::Opening,
            None,
            Some(Rc::new(move || {
                stop_log.borrow_mut().push("opening:stop".to_string());
                let _ = chained.start(Effect::Hover);
            })),
            1,
        );

        fx.start(Effect::Opening).unwrap();
        run_frames(&fx, cycle_frames(Effect::Opening));

        assert_eq!(fx.current_effect(), Effect::Hover);
        assert_eq!(*log.borrow(), vec!["opening:stop", "hover:start"]);
    }

    // ========== kill ==========

    #[test]
    fn test_kill_fires_stop_once_and_deactivates() {
        let (fx, _) = fx();
        let log = Rc::new(RefCell::new(Vec::new()));
        log_hooks(&fx, Effect::Hover, &log, "hover", 0);

        fx.start(Effect::Hover).unwrap();
        fx.kill();

        assert_eq!(
            log.borrow().iter().filter(|e| *e == "hover:stop").count(),
            1
        );
        assert_eq!(fx.current_effect(), Effect::None);
        assert!(!fx.is_active());

        // 再 kill 一次不重复触发
        fx.kill();
        assert_eq!(
            log.borrow().iter().filter(|e| *e == "hover:stop").count(),
            1
        );
    }

    #[test]
    fn test_no_start_after_kill() {
        let (fx, _) = fx();
        let log = Rc::new(RefCell::new(Vec::new()));
        log_hooks(&fx, Effect::Attention, &log, "attention", 0);

        fx.kill();
        assert_eq!(
            fx.start(Effect::Attention),
            Err(EffectError::Killed {
                effect: Effect::Attention
            })
        );
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_no_tick_after_kill() {
        let (fx, host) = fx();
        fx.start(Effect::Hover).unwrap();
        fx.kill();

        let repaints = host.repaints.get();
        run_frames(&fx, 10);
        // kill 之后 tick 是无操作，连重绘都不再请求
        assert_eq!(host.repaints.get(), repaints);
    }

    #[test]
    fn test_kill_discards_queued_request() {
        let (fx, _) = fx();
        let log = Rc::new(RefCell::new(Vec::new()));
        log_hooks(&fx, Effect::Hover, &log, "hover", 0);

        fx.start(Effect::Closing).unwrap();
        fx.start(Effect::Hover).unwrap();
        fx.kill();

        // 排队的悬停随 kill 作废，不会再有 on_start
        assert_eq!(fx.scheduled_effect(), None);
        assert!(!log.borrow().iter().any(|e| e == "hover:start"));
    }

    // ========== set_notify 的快照语义 ==========

    #[test]
    fn test_set_notify_mid_flight_applies_next_start() {
        let (fx, _) = fx();
        let log = Rc::new(RefCell::new(Vec::new()));
        log_hooks(&fx, Effect::Hover, &log, "old", 0);

        fx.start(Effect::Hover).unwrap();
        run_frames(&fx, 3);

        // 动画途中换回调：在途这一轮仍用旧的
        log_hooks(&fx, Effect::Hover, &log, "new", 0);
        fx.stop(Effect::Hover);
        run_frames(&fx, cycle_frames(Effect::Hover));

        assert_eq!(*log.borrow(), vec!["old:start", "old:stop"]);

        // 下一次启动用新配置
        fx.start(Effect::Hover).unwrap();
        assert_eq!(
            *log.borrow(),
            vec!["old:start", "old:stop", "new:start"]
        );
    }

    // ========== first_run ==========

    #[test]
    fn test_first_shown_suppresses_opening() {
        let (fx, _) = fx();
        let log = Rc::new(RefCell::new(Vec::new()));
        log_hooks(&fx, Effect::Opening, &log, "opening", 1);

        // 首次显示：不播动画
        fx.icon_shown();
        assert_eq!(fx.current_effect(), Effect::None);
        assert!(log.borrow().is_empty());
        assert!(fx.geometry().is_resting());

        // 之后的显示正常开播
        fx.icon_shown();
        assert_eq!(fx.current_effect(), Effect::Opening);
        assert_eq!(*log.borrow(), vec!["opening:start"]);
    }

    // ========== 事件接线 ==========

    #[test]
    fn test_register_wires_hover() {
        let (fx, _) = fx();
        let bus = TestPointerBus::new();
        fx.register_effects(bus.clone());

        bus.emit_enter();
        assert_eq!(fx.current_effect(), Effect::Hover);

        bus.emit_leave();
        assert_eq!(fx.inner.borrow().phase, Phase::Terminating);
        run_frames(&fx, cycle_frames(Effect::Hover));
        assert!(!fx.is_active());
    }

    #[test]
    fn test_enter_while_closing_queues_hover() {
        let (fx, _) = fx();
        let bus = TestPointerBus::new();
        fx.register_effects(bus.clone());

        fx.start(Effect::Closing).unwrap();
        bus.emit_enter();

        // 高优先级在播：悬停排队，关闭收尾后自动开播
        assert_eq!(fx.current_effect(), Effect::Closing);
        assert_eq!(fx.scheduled_effect(), Some(Effect::Hover));
        run_frames(&fx, cycle_frames(Effect::Closing));
        assert_eq!(fx.current_effect(), Effect::Hover);
    }

    #[test]
    fn test_unregister_is_idempotent() {
        let (fx, _) = fx();
        let bus = TestPointerBus::new();

        // 从未注册也能安全调用
        fx.unregister_effects();

        fx.register_effects(bus.clone());
        assert_eq!(bus.handler_count(), 2);

        fx.unregister_effects();
        assert_eq!(bus.handler_count(), 0);
        fx.unregister_effects();

        // 注销后事件不再驱动效果
        bus.emit_enter();
        assert_eq!(fx.current_effect(), Effect::None);
    }

    #[test]
    fn test_reregister_replaces_handles() {
        let (fx, _) = fx();
        let bus = TestPointerBus::new();

        fx.register_effects(bus.clone());
        fx.register_effects(bus.clone());
        // 重复注册不累积句柄
        assert_eq!(bus.handler_count(), 2);
    }

    #[test]
    fn test_kill_releases_handles() {
        let (fx, _) = fx();
        let bus = TestPointerBus::new();
        fx.register_effects(bus.clone());

        fx.kill();
        assert_eq!(bus.handler_count(), 0);
    }

    // ========== 标题挂钩 ==========

    #[test]
    fn test_hover_shows_and_hides_title() {
        let (fx, _) = fx();
        let title = RecordingTitle::new();
        fx.set_title(title.clone(), Rc::new(|| "终端".to_string()));

        fx.start(Effect::Hover).unwrap();
        assert_eq!(*title.log.borrow(), vec!["show:终端"]);

        fx.stop(Effect::Hover);
        run_frames(&fx, cycle_frames(Effect::Hover));
        assert_eq!(*title.log.borrow(), vec!["show:终端", "hide"]);
    }

    #[test]
    fn test_change_name_swaps_title_at_midpoint() {
        let (fx, _) = fx();
        let title = RecordingTitle::new();
        let name = Rc::new(RefCell::new("旧名".to_string()));
        let reader = name.clone();
        fx.set_title(title.clone(), Rc::new(move || reader.borrow().clone()));

        fx.start(Effect::ChangeName).unwrap();
        *name.borrow_mut() = "新名".to_string();

        // 中点换名：隐旧名、亮新名（文案惰性求值）
        run_frames(&fx, cycle_frames(Effect::ChangeName) / 2);
        assert_eq!(*title.log.borrow(), vec!["hide", "show:新名"]);
    }

    // ========== 重绘请求 ==========

    #[test]
    fn test_every_tick_repaints() {
        let (fx, host) = fx();
        fx.start(Effect::Hover).unwrap();
        let after_start = host.repaints.get();

        run_frames(&fx, 7);
        assert_eq!(host.repaints.get(), after_start + 7);
    }

    #[test]
    fn test_terminal_frame_repaints() {
        let (fx, host) = fx();
        fx.start(Effect::Opening).unwrap();

        run_frames(&fx, cycle_frames(Effect::Opening) - 1);
        let before_last = host.repaints.get();
        fx.tick();
        // 终帧也要重绘，静止姿态才会被画出来
        assert_eq!(host.repaints.get(), before_last + 1);
    }
}
