use crate::addr::{Ipv4, Ipv6, assign_addresses};
use crate::partition::RankContext;
use crate::sim::{SimTime, SyncMode, WorkloadOpts, WorkloadPlan, plan_echo_workload};
use crate::topo::{FatTreeOpts, build_network};
use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

fn k4_plan(rank: usize, ranks: usize) -> WorkloadPlan {
    let (net, topo) = build_network(&FatTreeOpts::default()).unwrap();
    let v4 = assign_addresses::<Ipv4>(&net, &topo, Ipv4Addr::new(10, 0, 0, 0), 16).unwrap();
    let ctx = RankContext::new(rank, ranks).unwrap();
    plan_echo_workload(&topo, &v4, ctx, SyncMode::Distributed, &WorkloadOpts::default())
        .expect("plan workload")
}

#[test]
fn rank_installs_servers_only_on_owned_hosts() {
    let plan = k4_plan(1, 4);
    assert_eq!((plan.partition_start, plan.partition_end), (4, 8));
    let servers = plan.servers.iter().map(|s| s.server).collect::<Vec<_>>();
    assert_eq!(servers, vec![4, 5, 6, 7]);
    assert!(plan.servers.iter().all(|s| s.port == 9
        && s.start == SimTime::from_secs(1)
        && s.stop == SimTime::from_secs(10)));
}

#[test]
fn clients_send_from_owned_hosts_to_every_other_server() {
    let plan = k4_plan(1, 4);
    assert_eq!(plan.clients.len(), 4 * 15);
    for c in &plan.clients {
        assert!((4..8).contains(&c.src));
        assert_ne!(c.src, c.dst);
        assert_eq!(c.dst_addr, IpAddr::V4(Ipv4Addr::new(10, c.dst as u8 + 1, 0, 1)));
        assert_eq!(c.max_packets, 1);
        assert_eq!(c.packet_bytes, 1024);
        assert_eq!(c.start, SimTime::from_secs(2));
    }
    // 目的端可以在其他 rank 的分区内
    let dsts = plan.clients.iter().map(|c| c.dst).collect::<HashSet<_>>();
    assert_eq!(dsts.len(), 16);
}

#[test]
fn ranks_together_cover_all_pairs_when_dividing() {
    let mut pairs = HashSet::new();
    for rank in 0..4 {
        for c in k4_plan(rank, 4).clients {
            assert!(pairs.insert((c.src, c.dst)));
        }
    }
    assert_eq!(pairs.len(), 16 * 15);
}

#[test]
fn non_dividing_ranks_skip_unowned_senders() {
    let mut srcs = HashSet::new();
    for rank in 0..3 {
        let plan = k4_plan(rank, 3);
        assert_eq!(plan.unowned, 1);
        srcs.extend(plan.servers.iter().map(|s| s.server));
    }
    assert_eq!(srcs.len(), 15);
    assert!(!srcs.contains(&15));
}

#[test]
fn plan_can_target_ipv6_addresses() {
    let (net, topo) = build_network(&FatTreeOpts::default()).unwrap();
    let v6 = assign_addresses::<Ipv6>(
        &net,
        &topo,
        Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 0),
        64,
    )
    .unwrap();
    let ctx = RankContext::default();
    let plan = plan_echo_workload(&topo, &v6, ctx, SyncMode::NullMessage, &WorkloadOpts::default())
        .unwrap();
    assert_eq!(plan.sync, SyncMode::NullMessage);
    assert!(plan.clients.iter().all(|c| c.dst_addr.is_ipv6()));
}

#[test]
fn plan_serializes_to_json() {
    let plan = k4_plan(0, 2);
    let raw = serde_json::to_string(&plan).expect("serialize plan");
    let decoded: WorkloadPlan = serde_json::from_str(&raw).expect("deserialize plan");
    assert_eq!(decoded.k, 4);
    assert_eq!(decoded.ranks, 2);
    assert_eq!(decoded.sync, SyncMode::Distributed);
    assert_eq!(decoded.servers, plan.servers);
    assert_eq!(decoded.clients.len(), 8 * 15);
    assert!(raw.contains(r#""sync":"distributed""#));
    assert!(raw.contains(r#""dst_addr":"10.2.0.1""#));
}
