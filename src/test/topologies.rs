use crate::Error;
use crate::net::{Fabric, IfaceId, Network, NodeId, NodeKind};
use crate::topo::{FatTreeOpts, build_fat_tree, build_network};
use std::collections::HashSet;

/// 只记录调用的 Fabric，用于检查建点/建链顺序
#[derive(Default)]
struct RecordingFabric {
    nodes: Vec<(NodeKind, usize)>,
    links: Vec<(NodeId, NodeId)>,
}

impl Fabric for RecordingFabric {
    fn add_node(&mut self, kind: NodeKind, tier_index: usize) -> NodeId {
        self.nodes.push((kind, tier_index));
        NodeId(self.nodes.len() - 1)
    }

    fn connect(&mut self, a: NodeId, b: NodeId) -> (IfaceId, IfaceId) {
        self.links.push((a, b));
        let n = self.links.len();
        (IfaceId(2 * n - 2), IfaceId(2 * n - 1))
    }
}

fn tier_cols(net: &Network, ids: impl IntoIterator<Item = NodeId>) -> Vec<(NodeKind, usize)> {
    ids.into_iter()
        .map(|id| (net.node(id).kind(), net.node(id).tier_index()))
        .collect()
}

#[test]
fn fat_tree_k4_counts_and_examples() {
    let (net, topo) = build_network(&FatTreeOpts::default()).expect("build k=4");

    assert_eq!(topo.servers().len(), 16);
    assert_eq!(topo.edge_switches().len(), 8);
    assert_eq!(topo.agg_switches().len(), 8);
    assert_eq!(topo.core_switches().len(), 4);
    assert_eq!(net.nodes().len(), 36);
    // 16 + 16 + 16
    assert_eq!(net.links().len(), 48);

    let edge0 = topo.edge(0).unwrap();
    let down = tier_cols(&net, net.neighbors(edge0))
        .into_iter()
        .filter(|(kind, _)| *kind == NodeKind::Server)
        .collect::<Vec<_>>();
    assert_eq!(down, vec![(NodeKind::Server, 0), (NodeKind::Server, 1)]);

    let agg0 = topo.aggregate(0).unwrap();
    let down = tier_cols(&net, net.neighbors(agg0))
        .into_iter()
        .filter(|(kind, _)| *kind == NodeKind::EdgeSwitch)
        .collect::<Vec<_>>();
    assert_eq!(down, vec![(NodeKind::EdgeSwitch, 0), (NodeKind::EdgeSwitch, 1)]);

    let up = tier_cols(&net, net.neighbors(agg0))
        .into_iter()
        .filter(|(kind, _)| *kind == NodeKind::CoreSwitch)
        .map(|(_, col)| col)
        .collect::<Vec<_>>();
    assert_eq!(up, vec![0, 1]);
}

#[test]
fn fat_tree_degrees_match_fan_in_and_fan_out() {
    for k in [2_usize, 4, 6, 8] {
        let mut net = Network::default();
        let topo = build_fat_tree(&mut net, k).expect("build");
        let half = k / 2;

        for &s in topo.servers() {
            assert_eq!(net.degree(s), 1);
        }
        for &e in topo.edge_switches() {
            let kinds = tier_cols(&net, net.neighbors(e));
            assert_eq!(kinds.iter().filter(|(t, _)| *t == NodeKind::Server).count(), half);
            assert_eq!(
                kinds.iter().filter(|(t, _)| *t == NodeKind::AggregateSwitch).count(),
                half
            );
        }
        for &a in topo.agg_switches() {
            let kinds = tier_cols(&net, net.neighbors(a));
            assert_eq!(kinds.iter().filter(|(t, _)| *t == NodeKind::EdgeSwitch).count(), half);
            assert_eq!(kinds.iter().filter(|(t, _)| *t == NodeKind::CoreSwitch).count(), half);
        }
        for &c in topo.core_switches() {
            let pods = net
                .neighbors(c)
                .into_iter()
                .map(|n| net.node(n).tier_index() / half)
                .collect::<HashSet<_>>();
            assert_eq!(net.degree(c), k);
            assert_eq!(pods.len(), k, "core must reach every pod exactly once");
        }
    }
}

#[test]
fn fat_tree_has_no_duplicate_links_and_respects_pods() {
    let k = 6;
    let mut net = Network::default();
    let topo = build_fat_tree(&mut net, k).unwrap();
    let half = k / 2;

    let mut seen = HashSet::new();
    for link in net.links() {
        let key = (link.a.min(link.b), link.a.max(link.b));
        assert!(seen.insert(key), "duplicate link {key:?}");

        let a = net.node(link.a);
        let b = net.node(link.b);
        if a.kind() == NodeKind::EdgeSwitch && b.kind() == NodeKind::AggregateSwitch {
            assert_eq!(a.tier_index() / half, b.tier_index() / half);
        }
        if a.kind() == NodeKind::AggregateSwitch && b.kind() == NodeKind::CoreSwitch {
            assert_eq!(a.tier_index() % half, b.tier_index() / half);
        }
    }
    assert_eq!(seen.len(), topo.server_count() * 3);
}

#[test]
fn fat_tree_creates_nodes_then_links_in_build_order() {
    let mut fabric = RecordingFabric::default();
    let topo = build_fat_tree(&mut fabric, 4).unwrap();

    let kinds = fabric.nodes.iter().map(|(kind, _)| *kind).collect::<Vec<_>>();
    let expected = std::iter::repeat_n(NodeKind::Server, 16)
        .chain(std::iter::repeat_n(NodeKind::EdgeSwitch, 8))
        .chain(std::iter::repeat_n(NodeKind::AggregateSwitch, 8))
        .chain(std::iter::repeat_n(NodeKind::CoreSwitch, 4))
        .collect::<Vec<_>>();
    assert_eq!(kinds, expected);

    // edge 层：edge 0 -> server 0, 1；edge 1 -> server 2, 3
    let s = topo.servers();
    let e = topo.edge_switches();
    let a = topo.agg_switches();
    let c = topo.core_switches();
    assert_eq!(&fabric.links[0..4], &[(s[0], e[0]), (s[1], e[0]), (s[2], e[1]), (s[3], e[1])]);
    // aggregate 层从第 16 条开始：agg 0 -> edge 0, 1；agg 1 -> edge 0, 1
    assert_eq!(&fabric.links[16..20], &[(e[0], a[0]), (e[1], a[0]), (e[0], a[1]), (e[1], a[1])]);
    // core 层从第 32 条开始：core 0 -> 各 pod 的第 0 台 aggregate
    assert_eq!(&fabric.links[32..36], &[(a[0], c[0]), (a[2], c[0]), (a[4], c[0]), (a[6], c[0])]);
    assert_eq!(&fabric.links[44..48], &[(a[1], c[3]), (a[3], c[3]), (a[5], c[3]), (a[7], c[3])]);
}

#[test]
fn fat_tree_link_groups_follow_creation_order() {
    let (net, topo) = build_network(&FatTreeOpts::default()).unwrap();
    assert_eq!(topo.edge_groups().len(), 8);
    assert_eq!(topo.agg_groups().len(), 8);
    assert_eq!(topo.core_groups().len(), 4);

    let mut last = None;
    for group in topo
        .edge_groups()
        .iter()
        .chain(topo.agg_groups())
        .chain(topo.core_groups())
    {
        for pair in group {
            let link = net.iface(pair.lower).link;
            assert_eq!(net.iface(pair.upper).link, link);
            if let Some(prev) = last {
                assert!(link > prev, "link groups out of creation order");
            }
            last = Some(link);
        }
    }
}

#[test]
fn invalid_arity_creates_no_nodes() {
    for k in [0, 5] {
        let mut fabric = RecordingFabric::default();
        let err = build_fat_tree(&mut fabric, k).unwrap_err();
        assert!(matches!(err, Error::InvalidArity { .. }));
        assert!(fabric.nodes.is_empty());
        assert!(fabric.links.is_empty());
    }
}

#[test]
fn node_lookups_reject_out_of_range_columns() {
    let (_net, topo) = build_network(&FatTreeOpts::default()).unwrap();
    assert!(topo.server(15).is_ok());
    assert!(matches!(
        topo.server(16),
        Err(Error::IndexOutOfRange {
            tier: NodeKind::Server,
            col: 16,
            len: 16
        })
    ));
    assert!(topo.edge(8).is_err());
    assert!(topo.aggregate(8).is_err());
    assert!(topo.core(4).is_err());
    assert_eq!(topo.host(1, 1, 1).unwrap(), topo.server(7).unwrap());
}
