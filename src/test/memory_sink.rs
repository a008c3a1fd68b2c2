use crate::event::{NodeId, PacketId, Rgb, SignalId};
use crate::render::{MemorySink, RenderSink, SceneSnapshot, SignalShape};
use glam::DVec3;

fn shape(radius: f64) -> SignalShape {
    SignalShape {
        center: DVec3::ZERO,
        radius,
        direction: None,
        normal: None,
    }
}

#[test]
fn packet_lifecycle_is_tracked_by_id() {
    let mut sink = MemorySink::default();
    sink.create_packet(PacketId(1), DVec3::ZERO);
    sink.move_packet(PacketId(1), DVec3::X);
    sink.move_packet(PacketId(1), DVec3::Y);

    let pkt = sink.packet(PacketId(1)).expect("packet 1 live");
    assert_eq!(pkt.pos, DVec3::Y);
    assert_eq!(pkt.moves, 2);
    assert_eq!(sink.live_packets(), 1);

    sink.remove_packet(PacketId(1));
    assert_eq!(sink.live_packets(), 0);
    assert_eq!(sink.stats.packets_created, 1);
    assert_eq!(sink.stats.packets_removed, 1);
    assert_eq!(sink.stats.ignored, 0);
}

#[test]
fn calls_on_missing_objects_are_counted_not_applied() {
    let mut sink = MemorySink::default();
    sink.move_packet(PacketId(3), DVec3::ONE);
    sink.remove_packet(PacketId(3));
    sink.update_signal(SignalId(1), &shape(5.0));
    sink.remove_signal(SignalId(1));
    sink.update_node(NodeId(0), Some(DVec3::ONE), None, None);

    assert_eq!(sink.stats.ignored, 5);
    assert_eq!(sink.live_packets(), 0);
    assert_eq!(sink.live_signals(), 0);
    assert!(sink.scene().nodes.is_empty());
}

#[test]
fn node_updates_merge_into_existing_handles() {
    let mut sink = MemorySink::default();
    sink.create_node(NodeId(0), DVec3::ZERO, "Node 0");
    sink.update_node(NodeId(0), None, Some(Rgb { r: 9, g: 9, b: 9 }), None);
    sink.update_node(NodeId(0), None, None, Some("router"));

    let node = sink.node(NodeId(0)).expect("node 0");
    assert_eq!(node.pos, DVec3::ZERO);
    assert_eq!(node.color, Some(Rgb { r: 9, g: 9, b: 9 }));
    assert_eq!(node.description, "router");
    assert_eq!(sink.stats.node_updates, 2);
}

#[test]
fn clear_drops_every_live_object() {
    let mut sink = MemorySink::default();
    sink.create_node(NodeId(0), DVec3::ZERO, "Node 0");
    sink.create_packet(PacketId(0), DVec3::ZERO);
    sink.create_signal(SignalId(0), &shape(0.0));
    sink.update_signal(SignalId(0), &shape(5.0));
    assert_eq!(sink.signal(SignalId(0)).map(|s| s.radius), Some(5.0));

    sink.clear();
    assert_eq!(sink.scene(), &SceneSnapshot::default());
    assert_eq!(sink.stats.clears, 1);
}
