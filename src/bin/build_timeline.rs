//! 时间轴构建
//!
//! 读取拓扑与原始事件记录，构建时间轴并写出 JSON

use clap::Parser;
use netanim_rs::config::AnimConfig;
use netanim_rs::event::TraceFile;
use netanim_rs::timeline::TimelineBuilder;
use netanim_rs::Error;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "build_timeline", about = "由网络事件记录构建动画时间轴")]
struct Args {
    /// 输入文件：{ "nodes": [...], "records": [...] }
    #[arg(long)]
    trace: PathBuf,
    /// 配置文件（JSON），命令行参数优先
    #[arg(long)]
    config: Option<PathBuf>,
    /// 时间轴输出路径（JSON）
    #[arg(long)]
    out: Option<PathBuf>,
    /// 每个有线数据包的帧数
    #[arg(long)]
    packet_steps: Option<usize>,
    #[arg(long)]
    broadcast_steps: Option<usize>,
    #[arg(long)]
    reception_steps: Option<usize>,
    /// 信号半径增长系数
    #[arg(long)]
    radius_step: Option<f64>,
    /// 无接收记录时广播的持续时间
    #[arg(long)]
    fallback_duration: Option<f64>,
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
    if let Some(v) = args.packet_steps {
        cfg.timeline.packet_steps = v;
    }
    if let Some(v) = args.broadcast_steps {
        cfg.timeline.broadcast_steps = v;
    }
    if let Some(v) = args.reception_steps {
        cfg.timeline.reception_steps = v;
    }
    if let Some(v) = args.radius_step {
        cfg.timeline.radius_step = v;
    }
    if let Some(v) = args.fallback_duration {
        cfg.timeline.fallback_broadcast_duration = v;
    }

    let trace = TraceFile::from_json_file(&args.trace)?;
    let builder = TimelineBuilder::new(cfg.timeline)?;
    let report = builder.build_trace(&trace);

    if let Some(out) = &args.out {
        let json = serde_json::to_string_pretty(&report.timeline)?;
        fs::write(out, json).map_err(|source| Error::Io {
            path: out.clone(),
            source,
        })?;
        info!(path = %out.display(), "时间轴已写出");
    }

    println!(
        "timeline frames={} nodes={} extraction_errors={} reference_errors={} self_addressed={} end_time={}",
        report.timeline.len(),
        report.timeline.nodes().len(),
        report.extraction_errors.len(),
        report.reference_errors.len(),
        report.self_addressed,
        report.timeline.end_time().unwrap_or(0.0)
    );
    Ok(())
}
