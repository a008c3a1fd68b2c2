//! 回放控制器
//!
//! 状态机：Unloaded → Ready → Running ⇄ Paused → Finished，reset 回到 Ready。
//! 帧效果是有序且不可重入的生命周期（创建必须先于移动和移除），
//! 因此跳转时清空渲染端并从 0 完整重放，而不是做差量。

use std::time::Duration;
use tracing::{debug, info};

use super::observer::{NullObserver, ProgressObserver};
use super::state::{PlaybackPhase, PlaybackState};
use super::ticker::{ManualTicker, TickScheduler};
use crate::config::PlaybackConfig;
use crate::render::{RenderSink, apply_frame};
use crate::timeline::Timeline;

/// 回放控制器：独占回放状态、渲染端与调度器
#[derive(Debug)]
pub struct PlaybackController<S, O = NullObserver, T = ManualTicker> {
    sink: S,
    observer: O,
    ticker: T,
    timeline: Option<Timeline>,
    state: PlaybackState,
}

impl<S, O, T> PlaybackController<S, O, T>
where
    S: RenderSink,
    O: ProgressObserver,
    T: TickScheduler,
{
    pub fn new(sink: S, observer: O, ticker: T, config: PlaybackConfig) -> Self {
        Self {
            sink,
            observer,
            ticker,
            timeline: None,
            state: PlaybackState::new(config),
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.state.phase
    }

    pub fn cursor(&self) -> usize {
        self.state.cursor
    }

    pub fn timeline(&self) -> Option<&Timeline> {
        self.timeline.as_ref()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    /// 拆出内部组件
    pub fn into_parts(self) -> (S, O, T) {
        (self.sink, self.observer, self.ticker)
    }

    /// 加载时间轴：任何状态下都可调用，回到 Ready，光标归零
    #[tracing::instrument(skip_all, fields(frames = timeline.len()))]
    pub fn load(&mut self, timeline: Timeline) {
        self.ticker.stop();
        let total = timeline.len();
        self.timeline = Some(timeline);
        self.state.reload(total);
        self.rebuild_scene(0);

        self.observer.on_total(total);
        self.notify();
        info!(total, "🎬 时间轴已加载");
    }

    /// 从 Ready 或 Paused 开始周期性 tick
    pub fn start(&mut self) -> bool {
        match self.state.phase {
            PlaybackPhase::Ready | PlaybackPhase::Paused => {
                self.state.set_phase(PlaybackPhase::Running);
                self.ticker.start(self.interval());
                debug!(cursor = self.state.cursor, "▶️  开始回放");
                true
            }
            phase => {
                debug!(?phase, "当前状态不能开始回放");
                false
            }
        }
    }

    pub fn resume(&mut self) -> bool {
        self.start()
    }

    /// 停止后续 tick；已经在执行的 tick 不受影响
    pub fn pause(&mut self) -> bool {
        if self.state.phase != PlaybackPhase::Running {
            return false;
        }
        self.ticker.stop();
        self.state.set_phase(PlaybackPhase::Paused);
        debug!(cursor = self.state.cursor, "⏸️  暂停回放");
        true
    }

    pub fn pause_or_resume(&mut self) -> bool {
        match self.state.phase {
            PlaybackPhase::Running => self.pause(),
            PlaybackPhase::Ready | PlaybackPhase::Paused => self.start(),
            _ => false,
        }
    }

    /// 一次 tick：最多应用 `steps_per_tick` 帧，渲染端刷新与进度通知各一次。
    ///
    /// 在 Ready 状态下调用相当于手动单步。返回本次应用的帧数。
    pub fn tick(&mut self) -> usize {
        if !matches!(
            self.state.phase,
            PlaybackPhase::Ready | PlaybackPhase::Running
        ) {
            return 0;
        }
        let Some(timeline) = &self.timeline else {
            return 0;
        };

        let start = self.state.cursor;
        let end = start
            .saturating_add(self.state.steps_per_tick.max(1))
            .min(timeline.len());
        for frame in &timeline.frames()[start..end] {
            apply_frame(frame, &mut self.sink);
        }

        let applied = end - start;
        if applied > 0 {
            self.state.cursor = end;
            self.sink.flush();
            self.notify();
        }

        if self.state.cursor >= self.state.total {
            self.finish();
        }
        applied
    }

    /// 跳到 `index`（截断到 `[0, total]`）：清空渲染端并同步重放 `[0, index)`。
    ///
    /// 阶段保持不变；已结束的回放跳回中间后变为 Paused。未加载时什么也不做。
    #[tracing::instrument(skip(self))]
    pub fn seek(&mut self, index: usize) -> usize {
        let Some(total) = self.timeline.as_ref().map(Timeline::len) else {
            return 0;
        };
        let index = index.min(total);

        self.rebuild_scene(index);
        self.state.cursor = index;
        if self.state.phase == PlaybackPhase::Finished && index < total {
            self.state.set_phase(PlaybackPhase::Paused);
        }

        self.notify();
        debug!(index, total, phase = ?self.state.phase, "⏩ 跳转完成");
        index
    }

    /// 回到起点并清空渲染端，进入 Ready
    pub fn reset(&mut self) -> bool {
        if self.timeline.is_none() {
            return false;
        }
        self.ticker.stop();
        self.rebuild_scene(0);
        self.state.cursor = 0;
        self.state.set_phase(PlaybackPhase::Ready);
        self.notify();
        debug!("⏮️  回放已重置");
        true
    }

    /// 调整 tick 间隔，下一次 tick 生效
    pub fn set_delay(&mut self, delay_ms: u64) {
        self.state.delay_ms = delay_ms;
        if self.ticker.is_active() {
            self.ticker.reschedule(self.interval());
        }
    }

    /// 调整每 tick 的帧数（至少 1），下一次 tick 生效
    pub fn set_steps_per_tick(&mut self, steps: usize) {
        self.state.steps_per_tick = steps.max(1);
    }

    /// 协作式驱动循环：调度器处于活动状态时等待并 tick。返回执行的 tick 数。
    pub fn run(&mut self) -> usize {
        self.run_for(usize::MAX)
    }

    /// 与 [`run`](Self::run) 相同，但最多执行 `max_ticks` 次
    pub fn run_for(&mut self, max_ticks: usize) -> usize {
        let mut ticks = 0;
        while ticks < max_ticks
            && self.ticker.is_active()
            && self.state.phase == PlaybackPhase::Running
        {
            self.ticker.wait();
            self.tick();
            ticks += 1;
        }
        ticks
    }

    fn interval(&self) -> Duration {
        Duration::from_millis(self.state.delay_ms)
    }

    fn finish(&mut self) {
        self.ticker.stop();
        self.state.set_phase(PlaybackPhase::Finished);
        let left = self.step_label();
        self.observer
            .on_progress(&left, "Finished", self.state.cursor, self.state.total);
        info!(total = self.state.total, "✅ 回放完成");
    }

    /// 清空渲染端，重建拓扑节点并重放前 `upto` 帧
    fn rebuild_scene(&mut self, upto: usize) {
        let Some(timeline) = &self.timeline else {
            return;
        };
        self.sink.clear();
        for node in timeline.nodes() {
            self.sink.create_node(node.id, node.pos, &node.description);
        }
        for frame in &timeline.frames()[..upto] {
            apply_frame(frame, &mut self.sink);
        }
        self.sink.flush();
    }

    fn step_label(&self) -> String {
        format!("Step {} / {}", self.state.cursor, self.state.total)
    }

    fn time_label(&self) -> String {
        let last = self
            .state
            .cursor
            .checked_sub(1)
            .and_then(|i| self.timeline.as_ref()?.get(i));
        match last {
            Some(frame) => format!("Time {}", frame.time()),
            None => "Time 0".to_string(),
        }
    }

    fn notify(&mut self) {
        let left = self.step_label();
        let right = self.time_label();
        self.observer
            .on_progress(&left, &right, self.state.cursor, self.state.total);
    }
}
