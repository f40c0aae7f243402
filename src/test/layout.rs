use crate::Error;
use crate::layout::{BoundingBox, plan_layout};
use crate::net::{Coordinate, Network, NodeKind};
use crate::topo::{FatTreeOpts, build_network};

fn positions(net: &Network, kind: NodeKind) -> Vec<Coordinate> {
    net.nodes()
        .iter()
        .filter(|n| n.kind() == kind)
        .map(|n| n.position)
        .collect()
}

#[test]
fn every_node_lies_inside_the_box() {
    for k in [2_usize, 4, 8] {
        let opts = FatTreeOpts {
            k,
            ..FatTreeOpts::default()
        };
        let (mut net, topo) = build_network(&opts).unwrap();
        let bbox = BoundingBox::default();
        plan_layout(&mut net, &topo, bbox).unwrap();
        for node in net.nodes() {
            assert!(
                bbox.contains(node.position),
                "{} at {:?} outside {:?}",
                node.name(),
                node.position,
                bbox
            );
        }
    }
}

#[test]
fn corners_may_be_given_in_any_order() {
    let (mut a, topo) = build_network(&FatTreeOpts::default()).unwrap();
    let mut b = a.clone();
    plan_layout(&mut a, &topo, BoundingBox::new(0.0, 0.0, 400.0, 200.0)).unwrap();
    plan_layout(&mut b, &topo, BoundingBox::new(400.0, 200.0, 0.0, 0.0)).unwrap();
    for (na, nb) in a.nodes().iter().zip(b.nodes()) {
        assert_eq!(na.position, nb.position);
    }
}

#[test]
fn tiers_stack_bottom_up_in_equal_bands() {
    let (mut net, topo) = build_network(&FatTreeOpts::default()).unwrap();
    plan_layout(&mut net, &topo, BoundingBox::new(0.0, 0.0, 100.0, 400.0)).unwrap();

    let ys = [
        NodeKind::Server,
        NodeKind::EdgeSwitch,
        NodeKind::AggregateSwitch,
        NodeKind::CoreSwitch,
    ]
    .map(|kind| {
        let tier = positions(&net, kind);
        assert!(tier.iter().all(|p| p.y == tier[0].y), "{kind:?} not on one row");
        tier[0].y
    });
    // y 向下增大：server 在最下方
    assert_eq!(ys, [350.0, 250.0, 150.0, 50.0]);
}

#[test]
fn servers_are_strictly_increasing_and_paired() {
    let (mut net, topo) = build_network(&FatTreeOpts::default()).unwrap();
    plan_layout(&mut net, &topo, BoundingBox::default()).unwrap();

    let xs = positions(&net, NodeKind::Server)
        .iter()
        .map(|p| p.x)
        .collect::<Vec<_>>();
    assert!(xs.windows(2).all(|w| w[0] < w[1]));
    // 奇数号 server 贴近前一台
    let gap_to_odd = xs[1] - xs[0];
    let gap_to_even = xs[2] - xs[1];
    assert!(gap_to_odd < gap_to_even);
}

#[test]
fn switch_tiers_are_spread_by_tier_population() {
    let (mut net, topo) = build_network(&FatTreeOpts::default()).unwrap();
    plan_layout(&mut net, &topo, BoundingBox::new(0.0, 0.0, 800.0, 400.0)).unwrap();

    let edge_x = positions(&net, NodeKind::EdgeSwitch)
        .iter()
        .map(|p| p.x)
        .collect::<Vec<_>>();
    assert_eq!(edge_x, vec![50.0, 150.0, 250.0, 350.0, 450.0, 550.0, 650.0, 750.0]);

    let core_x = positions(&net, NodeKind::CoreSwitch)
        .iter()
        .map(|p| p.x)
        .collect::<Vec<_>>();
    assert_eq!(core_x, vec![100.0, 300.0, 500.0, 700.0]);
}

#[test]
fn relayout_is_idempotent() {
    let (mut net, topo) = build_network(&FatTreeOpts::default()).unwrap();
    let bbox = BoundingBox::default();
    plan_layout(&mut net, &topo, bbox).unwrap();
    let first = net.nodes().iter().map(|n| n.position).collect::<Vec<_>>();

    plan_layout(&mut net, &topo, BoundingBox::new(0.0, 0.0, 1.0, 1.0)).unwrap();
    plan_layout(&mut net, &topo, bbox).unwrap();
    let again = net.nodes().iter().map(|n| n.position).collect::<Vec<_>>();
    assert_eq!(first, again);
}

#[test]
fn degenerate_box_is_rejected() {
    let (mut net, topo) = build_network(&FatTreeOpts::default()).unwrap();
    let err = plan_layout(&mut net, &topo, BoundingBox::new(5.0, 0.0, 5.0, 10.0)).unwrap_err();
    assert!(matches!(err, Error::DegenerateBoundingBox));
}
