//! 回放控制模块
//!
//! 由 tick 驱动的状态机：逐批把时间轴上的帧应用到渲染端，
//! 支持暂停/继续、调速、每 tick 批量大小，以及带重放语义的任意位置跳转。

mod controller;
mod observer;
mod state;
mod ticker;

pub use controller::PlaybackController;
pub use observer::{LogObserver, NullObserver, ProgressObserver};
pub use state::{PlaybackPhase, PlaybackState};
pub use ticker::{ManualTicker, SleepTicker, TickScheduler};
