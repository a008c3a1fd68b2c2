use crate::config::TimelineConfig;
use crate::event::{
    Broadcast, NetworkEvent, NodeId, SignalId, TopologyNode, WirelessReception,
};
use crate::render::{MemorySink, RenderSink, apply_frame};
use crate::timeline::{
    AnimationFrame, BroadcastFrame, FrameRole, ReceptionFrame, ReferenceError, TimelineBuilder,
};
use glam::DVec3;

fn topology() -> Vec<TopologyNode> {
    vec![
        TopologyNode::new(0, 0.0, 0.0, 0.0),
        TopologyNode::new(1, 10.0, 0.0, 0.0),
        TopologyNode::new(2, 0.0, 10.0, 0.0),
    ]
}

fn broadcast(node: u32, uid: u64, tx: f64) -> NetworkEvent {
    NetworkEvent::Broadcast(Broadcast {
        broadcaster_id: NodeId(node),
        unique_id: uid,
        tx_time: tx,
        meta: String::new(),
    })
}

fn reception(uid: u64, to: u32, rx: f64, last: Option<f64>) -> NetworkEvent {
    NetworkEvent::WirelessReception(WirelessReception {
        unique_id: uid,
        to_id: NodeId(to),
        rx_time: rx,
        last_rx_time: last,
    })
}

fn builder() -> TimelineBuilder {
    TimelineBuilder::new(TimelineConfig::default()).expect("default config is valid")
}

fn broadcast_frames(frames: &[AnimationFrame]) -> Vec<&BroadcastFrame> {
    frames
        .iter()
        .filter_map(|f| match f {
            AnimationFrame::Broadcast(b) => Some(b),
            _ => None,
        })
        .collect()
}

fn reception_frames(frames: &[AnimationFrame]) -> Vec<&ReceptionFrame> {
    frames
        .iter()
        .filter_map(|f| match f {
            AnimationFrame::Reception(r) => Some(r),
            _ => None,
        })
        .collect()
}

#[test]
fn broadcast_lasts_until_latest_reception() {
    let events = [
        broadcast(0, 7, 1.0),
        reception(7, 1, 1.2, None),
        reception(7, 2, 1.5, None),
    ];
    let report = builder().build(&topology(), &events);
    assert!(report.reference_errors.is_empty());

    let b = broadcast_frames(report.timeline.frames());
    assert_eq!(b.len(), 4);
    assert_eq!(b[0].time, 1.0);
    assert_eq!(b[3].time, 1.5);
    assert!((b[1].time - (1.0 + 0.5 / 3.0)).abs() < 1e-12);
    assert!(b.iter().all(|f| f.pos == DVec3::ZERO));

    let radii = b.iter().map(|f| f.radius).collect::<Vec<_>>();
    assert_eq!(radii, vec![0.0, 5.0, 10.0, 15.0]);
}

#[test]
fn broadcast_without_receptions_uses_fallback_duration() {
    let report = builder().build(&topology(), &[broadcast(0, 1, 2.0)]);
    let b = broadcast_frames(report.timeline.frames());
    assert_eq!(b.len(), 4);
    assert_eq!(b[0].time, 2.0);
    assert!((b[3].time - (2.0 + 1e-5)).abs() < 1e-15);
    assert_eq!(report.timeline.frames()[3].role(), Some(FrameRole::Remove));
}

#[test]
fn reception_carries_receiver_and_broadcaster_locations() {
    let events = [broadcast(0, 7, 1.0), reception(7, 1, 1.2, Some(1.8))];
    let report = builder().build(&topology(), &events);

    let r = reception_frames(report.timeline.frames());
    assert_eq!(r.len(), 4);
    assert!(r.iter().all(|f| f.pos == DVec3::new(10.0, 0.0, 0.0)));
    assert!(r.iter().all(|f| f.source == DVec3::ZERO));
    assert_eq!(r[0].time, 1.2);
    assert_eq!(r[3].time, 1.8);
    assert_eq!(r[2].radius, 10.0);

    // 广播与接收各自分配信号 id
    let b = broadcast_frames(report.timeline.frames());
    assert_eq!(b[0].signal_id, SignalId(0));
    assert_eq!(r[0].signal_id, SignalId(1));
}

#[test]
fn reception_without_last_rx_uses_fallback_span() {
    let events = [broadcast(0, 7, 1.0), reception(7, 2, 1.2, None)];
    let report = builder().build(&topology(), &events);
    let r = reception_frames(report.timeline.frames());
    assert_eq!(r[0].time, 1.2);
    assert!((r[3].time - (1.2 + 1e-5)).abs() < 1e-12);
}

#[test]
fn reception_before_its_broadcast_is_a_reference_error() {
    let events = [
        broadcast(0, 7, 1.0),
        reception(7, 1, 0.5, None),
        // 同一时刻但排在广播之前
        reception(9, 2, 3.0, None),
        broadcast(0, 9, 3.0),
    ];
    let report = builder().build(&topology(), &events);

    assert!(reception_frames(report.timeline.frames()).is_empty());
    assert_eq!(broadcast_frames(report.timeline.frames()).len(), 8);
    assert_eq!(
        report.reference_errors,
        vec![
            ReferenceError::UnresolvedBroadcast {
                unique_id: 7,
                to: NodeId(1),
                time: 0.5,
            },
            ReferenceError::UnresolvedBroadcast {
                unique_id: 9,
                to: NodeId(2),
                time: 3.0,
            },
        ]
    );
}

#[test]
fn broadcast_never_ends_before_it_starts() {
    // 时钟偏差：唯一的接收时间早于发射时间
    let events = [reception(4, 1, 0.5, None), broadcast(0, 4, 1.0)];
    let report = builder().build(&topology(), &events);
    let b = broadcast_frames(report.timeline.frames());
    assert!(b.iter().all(|f| f.time == 1.0));
    assert_eq!(report.reference_errors.len(), 1);
}

#[test]
fn unknown_broadcaster_leaves_receptions_unresolved() {
    let events = [broadcast(42, 3, 0.0), reception(3, 1, 0.1, None)];
    let report = builder().build(&topology(), &events);
    assert!(report.timeline.is_empty());
    assert!(matches!(
        report.reference_errors[0],
        ReferenceError::UnknownNode {
            role: "broadcaster",
            node: NodeId(42),
            ..
        }
    ));
    assert!(matches!(
        report.reference_errors[1],
        ReferenceError::UnresolvedBroadcast { unique_id: 3, .. }
    ));
}

#[test]
fn reception_signal_points_back_at_the_source() {
    let events = [broadcast(0, 7, 1.0), reception(7, 1, 1.2, None)];
    let report = builder().build(&topology(), &events);

    let mut sink = MemorySink::default();
    for frame in report.timeline.frames() {
        if let AnimationFrame::Reception(r) = frame {
            if r.step_index == 1 {
                apply_frame(frame, &mut sink);
                break;
            }
        }
        apply_frame(frame, &mut sink);
    }
    sink.flush();

    let shape = sink.signal(SignalId(1)).expect("reception signal live");
    assert_eq!(shape.center, DVec3::new(10.0, 0.0, 0.0));
    assert_eq!(shape.radius, 5.0);
    assert_eq!(shape.direction, Some(DVec3::new(-1.0, 0.0, 0.0)));
    // 广播的最后一帧与接收首帧同一时刻，且先生成
    assert!(sink.signal(SignalId(0)).is_none());
    assert_eq!(sink.live_signals(), 1);
}
