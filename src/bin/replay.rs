//! 无界面回放
//!
//! 构建时间轴后驱动回放控制器，把帧效果应用到内存渲染端，结束时打印场景摘要

use clap::Parser;
use netanim_rs::config::AnimConfig;
use netanim_rs::event::TraceFile;
use netanim_rs::playback::{LogObserver, PlaybackController, SleepTicker};
use netanim_rs::render::MemorySink;
use netanim_rs::timeline::TimelineBuilder;
use netanim_rs::Error;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "replay", about = "无界面回放网络动画时间轴")]
struct Args {
    /// 输入文件：{ "nodes": [...], "records": [...] }
    #[arg(long)]
    trace: PathBuf,
    /// 配置文件（JSON），命令行参数优先
    #[arg(long)]
    config: Option<PathBuf>,
    /// tick 间隔（毫秒）
    #[arg(long)]
    delay_ms: Option<u64>,
    /// 每个 tick 应用的帧数
    #[arg(long)]
    steps_per_tick: Option<usize>,
    #[arg(long)]
    packet_steps: Option<usize>,
    /// 开始回放前先跳到该帧
    #[arg(long)]
    seek: Option<usize>,
    /// 最多执行多少个 tick（之后暂停）
    #[arg(long)]
    max_ticks: Option<usize>,
}

fn main() -> Result<(), Error> {
    // 初始化 tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => AnimConfig::from_json_file(path)?,
        None => AnimConfig::default(),
    };
    if let Some(v) = args.delay_ms {
        cfg.playback.delay_ms = v;
    }
    if let Some(v) = args.steps_per_tick {
        cfg.playback.steps_per_tick = v;
    }
    if let Some(v) = args.packet_steps {
        cfg.timeline.packet_steps = v;
    }

    let trace = TraceFile::from_json_file(&args.trace)?;
    let report = TimelineBuilder::new(cfg.timeline)?.build_trace(&trace);
    if report.dropped() > 0 {
        info!(dropped = report.dropped(), "部分事件被丢弃，继续回放其余时间轴");
    }

    let mut controller = PlaybackController::new(
        MemorySink::default(),
        LogObserver,
        SleepTicker::default(),
        cfg.playback,
    );
    controller.load(report.timeline);
    if let Some(index) = args.seek {
        controller.seek(index);
    }

    controller.start();
    let ticks = controller.run_for(args.max_ticks.unwrap_or(usize::MAX));
    controller.pause();

    let state = *controller.state();
    let sink = controller.sink();
    println!(
        "replay phase={:?} cursor={} total={} ticks={} nodes={} live_packets={} live_signals={} flushes={}",
        state.phase,
        state.cursor,
        state.total,
        ticks,
        sink.scene().nodes.len(),
        sink.live_packets(),
        sink.live_signals(),
        sink.stats.flushes
    );
    Ok(())
}
