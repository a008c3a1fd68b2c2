use crate::config::{PlaybackConfig, TimelineConfig};
use crate::event::{
    Broadcast, NetworkEvent, NodeId, NodeUpdate, TopologyNode, WiredPacket, WirelessReception,
};
use crate::playback::{
    ManualTicker, NullObserver, PlaybackController, PlaybackPhase, TickScheduler,
};
use crate::render::MemorySink;
use crate::timeline::{Timeline, TimelineBuilder};
use glam::DVec3;

type Controller = PlaybackController<MemorySink, NullObserver, ManualTicker>;

fn mixed_timeline() -> Timeline {
    let topo = [
        TopologyNode::new(0, 0.0, 0.0, 0.0),
        TopologyNode::new(1, 10.0, 0.0, 0.0),
        TopologyNode::new(2, 0.0, 10.0, 0.0),
    ];
    let events = [
        NetworkEvent::WiredPacket(WiredPacket {
            from_id: NodeId(0),
            to_id: NodeId(1),
            tx_time: 0.0,
            rx_time: 1.0,
            meta: String::new(),
        }),
        NetworkEvent::NodeUpdate(NodeUpdate {
            node_id: NodeId(2),
            trigger_time: 0.4,
            loc: Some(DVec3::new(5.0, 5.0, 5.0)),
            color: None,
            description: Some("moved".to_string()),
        }),
        NetworkEvent::Broadcast(Broadcast {
            broadcaster_id: NodeId(1),
            unique_id: 1,
            tx_time: 0.5,
            meta: String::new(),
        }),
        NetworkEvent::WirelessReception(WirelessReception {
            unique_id: 1,
            to_id: NodeId(2),
            rx_time: 0.9,
            last_rx_time: Some(1.1),
        }),
        NetworkEvent::WiredPacket(WiredPacket {
            from_id: NodeId(2),
            to_id: NodeId(0),
            tx_time: 0.6,
            rx_time: 1.6,
            meta: String::new(),
        }),
    ];
    let cfg = TimelineConfig {
        packet_steps: 5,
        ..TimelineConfig::default()
    };
    let report = TimelineBuilder::new(cfg)
        .expect("valid config")
        .build(&topo, &events);
    assert!(report.reference_errors.is_empty());
    report.timeline
}

fn loaded() -> Controller {
    let mut c = PlaybackController::new(
        MemorySink::default(),
        NullObserver,
        ManualTicker::default(),
        PlaybackConfig::default(),
    );
    c.load(mixed_timeline());
    c
}

#[test]
fn seek_clamps_out_of_range_indices() {
    let mut c = loaded();
    let total = c.state().total;
    assert_eq!(c.seek(total + 100), total);
    assert_eq!(c.cursor(), total);
    assert_eq!(c.seek(0), 0);
    assert_eq!(c.cursor(), 0);
}

#[test]
fn repeated_seek_matches_a_single_seek_from_fresh() {
    let total = loaded().state().total;
    for i in 0..=total {
        let mut twice = loaded();
        twice.seek(i);
        twice.seek(i);

        let mut once = loaded();
        once.seek(i);

        assert_eq!(twice.sink().scene(), once.sink().scene(), "index {i}");
        assert_eq!(twice.sink().stats.ignored, 0, "index {i}");
    }
}

#[test]
fn seek_matches_playing_forward() {
    let total = loaded().state().total;
    for i in 0..=total {
        let mut played = loaded();
        for _ in 0..i {
            played.tick();
        }

        let mut jumped = loaded();
        // 先跳到别处，确保结果与之前的场景无关
        jumped.seek(total);
        jumped.seek(i);

        assert_eq!(played.cursor(), jumped.cursor());
        assert_eq!(played.sink().scene(), jumped.sink().scene(), "index {i}");
    }
}

#[test]
fn seek_backwards_restores_original_node_positions() {
    let mut c = loaded();
    let total = c.state().total;
    c.seek(total);
    let node = c.sink().node(NodeId(2)).expect("node 2");
    assert_eq!(node.pos, DVec3::splat(5.0));
    assert_eq!(node.description, "moved");
    assert_eq!(c.sink().live_packets(), 0);
    assert_eq!(c.sink().live_signals(), 0);

    c.seek(1);
    let node = c.sink().node(NodeId(2)).expect("node 2");
    assert_eq!(node.pos, DVec3::new(0.0, 10.0, 0.0));
    assert_eq!(node.description, "Node 2");
    assert_eq!(c.sink().live_packets(), 1);
}

#[test]
fn seek_keeps_running_playback_running() {
    let mut c = loaded();
    c.start();
    c.tick();
    c.seek(6);
    assert_eq!(c.phase(), PlaybackPhase::Running);
    assert!(c.ticker().is_active());
    assert_eq!(c.tick(), 1);
    assert_eq!(c.cursor(), 7);
}

#[test]
fn seek_from_finished_pauses() {
    let mut c = loaded();
    c.start();
    c.run();
    assert_eq!(c.phase(), PlaybackPhase::Finished);

    c.seek(3);
    assert_eq!(c.phase(), PlaybackPhase::Paused);
    assert!(!c.state().finished);
    assert_eq!(c.tick(), 0);

    assert!(c.resume());
    c.run();
    assert_eq!(c.phase(), PlaybackPhase::Finished);
    assert_eq!(c.sink().live_packets(), 0);
    assert_eq!(c.sink().stats.ignored, 0);
}

#[test]
fn seek_to_end_while_paused_finishes_on_next_resume_tick() {
    let mut c = loaded();
    c.start();
    c.tick();
    c.pause();
    let total = c.state().total;
    c.seek(total);
    assert_eq!(c.phase(), PlaybackPhase::Paused);
    c.resume();
    assert_eq!(c.tick(), 0);
    assert_eq!(c.phase(), PlaybackPhase::Finished);
}

#[test]
fn reset_clears_scene_and_returns_to_ready() {
    let mut c = loaded();
    c.start();
    c.run_for(5);
    assert!(c.sink().live_packets() > 0);

    assert!(c.reset());
    assert_eq!(c.phase(), PlaybackPhase::Ready);
    assert_eq!(c.cursor(), 0);
    assert!(!c.ticker().is_active());
    assert_eq!(c.sink().live_packets(), 0);
    assert_eq!(c.sink().live_signals(), 0);
    assert_eq!(c.sink().scene().nodes.len(), 3);

    let fresh = loaded();
    assert_eq!(c.sink().scene(), fresh.sink().scene());
}
