//! Fat-tree 拓扑构建

use crate::error::Result;
use crate::net::{Fabric, IfaceId, Network, NodeId, NodeKind};
use crate::sim::SimTime;
use tracing::{debug, info};

use super::index::FatTreeIndex;

#[derive(Debug, Clone)]
pub struct FatTreeOpts {
    pub k: usize,
    pub link_bps: u64,
    pub link_delay: SimTime,
}

impl Default for FatTreeOpts {
    fn default() -> Self {
        Self {
            k: 4,
            link_bps: 10_000_000,
            link_delay: SimTime::from_millis(1),
        }
    }
}

/// 一条链路的两个接口。`lower` 属于低层节点（server/edge/aggregate），
/// `upper` 属于高层交换机（edge/aggregate/core）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortPair {
    pub lower: IfaceId,
    pub upper: IfaceId,
}

/// 构建完成的 fat-tree。只读：构建后不再修改。
///
/// 三组 link group 各按“每台高层交换机一组”组织，组内顺序即建链顺序，
/// 地址分配依赖这个顺序。
#[derive(Debug, Clone)]
pub struct FatTreeTopology {
    index: FatTreeIndex,
    servers: Vec<NodeId>,
    edge_switches: Vec<NodeId>,
    agg_switches: Vec<NodeId>,
    core_switches: Vec<NodeId>,
    edge_groups: Vec<Vec<PortPair>>,
    agg_groups: Vec<Vec<PortPair>>,
    core_groups: Vec<Vec<PortPair>>,
}

impl FatTreeTopology {
    pub fn k(&self) -> usize {
        self.index.k()
    }

    pub fn index(&self) -> &FatTreeIndex {
        &self.index
    }

    pub fn servers(&self) -> &[NodeId] {
        &self.servers
    }

    pub fn edge_switches(&self) -> &[NodeId] {
        &self.edge_switches
    }

    pub fn agg_switches(&self) -> &[NodeId] {
        &self.agg_switches
    }

    pub fn core_switches(&self) -> &[NodeId] {
        &self.core_switches
    }

    /// 某层的全部节点
    pub fn tier(&self, tier: NodeKind) -> &[NodeId] {
        match tier {
            NodeKind::Server => &self.servers,
            NodeKind::EdgeSwitch => &self.edge_switches,
            NodeKind::AggregateSwitch => &self.agg_switches,
            NodeKind::CoreSwitch => &self.core_switches,
        }
    }

    /// edge -> server 链路组（每台 edge 一组，组内按 server 升序）
    pub fn edge_groups(&self) -> &[Vec<PortPair>] {
        &self.edge_groups
    }

    /// aggregate -> edge 链路组（每台 aggregate 一组，组内按 edge 升序）
    pub fn agg_groups(&self) -> &[Vec<PortPair>] {
        &self.agg_groups
    }

    /// core -> aggregate 链路组（每台 core 一组，组内按 pod 升序）
    pub fn core_groups(&self) -> &[Vec<PortPair>] {
        &self.core_groups
    }

    pub fn server_count(&self) -> usize {
        self.servers.len()
    }

    /// 按列号取节点，越界返回 `IndexOutOfRange`
    pub fn node_at(&self, tier: NodeKind, col: usize) -> Result<NodeId> {
        let col = self.index.check(tier, col)?;
        Ok(self.tier(tier)[col])
    }

    pub fn server(&self, col: usize) -> Result<NodeId> {
        self.node_at(NodeKind::Server, col)
    }

    pub fn edge(&self, col: usize) -> Result<NodeId> {
        self.node_at(NodeKind::EdgeSwitch, col)
    }

    pub fn aggregate(&self, col: usize) -> Result<NodeId> {
        self.node_at(NodeKind::AggregateSwitch, col)
    }

    pub fn core(&self, col: usize) -> Result<NodeId> {
        self.node_at(NodeKind::CoreSwitch, col)
    }

    /// 按 (pod, pod 内 edge, edge 下 host) 取服务器
    pub fn host(&self, pod: usize, edge: usize, host: usize) -> Result<NodeId> {
        let half = self.index.half();
        self.server((pod * half + edge) * half + host)
    }
}

/// 在 `fabric` 上构建 k 元 fat-tree。
///
/// 先依次创建 server/edge/aggregate/core 全部节点，再按
/// edge->server、aggregate->edge、core->aggregate 的顺序建链。
/// k 非法时在创建任何节点之前返回错误。
#[tracing::instrument(skip(fabric))]
pub fn build_fat_tree<F: Fabric>(fabric: &mut F, k: usize) -> Result<FatTreeTopology> {
    let index = FatTreeIndex::new(k)?;
    let half = index.half();

    let servers = (0..index.server_count())
        .map(|i| fabric.add_node(NodeKind::Server, i))
        .collect::<Vec<_>>();
    let edge_switches = (0..index.edge_count())
        .map(|i| fabric.add_node(NodeKind::EdgeSwitch, i))
        .collect::<Vec<_>>();
    let agg_switches = (0..index.aggregate_count())
        .map(|i| fabric.add_node(NodeKind::AggregateSwitch, i))
        .collect::<Vec<_>>();
    let core_switches = (0..index.core_count())
        .map(|i| fabric.add_node(NodeKind::CoreSwitch, i))
        .collect::<Vec<_>>();
    debug!(
        servers = servers.len(),
        edges = edge_switches.len(),
        aggs = agg_switches.len(),
        cores = core_switches.len(),
        "节点创建完成"
    );

    // server <-> edge
    let mut edge_groups = Vec::with_capacity(edge_switches.len());
    for (edge, &edge_id) in edge_switches.iter().enumerate() {
        let mut group = Vec::with_capacity(half);
        for server in index.servers_of_edge(edge)? {
            let (lower, upper) = fabric.connect(servers[server], edge_id);
            group.push(PortPair { lower, upper });
        }
        edge_groups.push(group);
    }

    // edge <-> aggregate，按 pod 分组
    let mut agg_groups = Vec::with_capacity(agg_switches.len());
    for pod in 0..index.pod_count() {
        for j in 0..half {
            let agg = pod * half + j;
            let mut group = Vec::with_capacity(half);
            for edge in index.edges_of_aggregate(agg)? {
                let (lower, upper) = fabric.connect(edge_switches[edge], agg_switches[agg]);
                group.push(PortPair { lower, upper });
            }
            agg_groups.push(group);
        }
    }

    // aggregate <-> core，按 core 组分组，每个 pod 各连一台
    let mut core_groups = Vec::with_capacity(core_switches.len());
    for group_idx in 0..half {
        for j in 0..half {
            let core = group_idx * half + j;
            let mut group = Vec::with_capacity(index.pod_count());
            for agg in index.aggregates_of_core(core)? {
                let (lower, upper) = fabric.connect(agg_switches[agg], core_switches[core]);
                group.push(PortPair { lower, upper });
            }
            core_groups.push(group);
        }
    }

    info!(
        k,
        servers = servers.len(),
        links = edge_groups.iter().chain(&agg_groups).chain(&core_groups).map(Vec::len).sum::<usize>(),
        "🌲 fat-tree 构建完成"
    );

    Ok(FatTreeTopology {
        index,
        servers,
        edge_switches,
        agg_switches,
        core_switches,
        edge_groups,
        agg_groups,
        core_groups,
    })
}

/// 按 `opts` 新建网络并在其上构建 fat-tree
pub fn build_network(opts: &FatTreeOpts) -> Result<(Network, FatTreeTopology)> {
    let mut net = Network::new(opts.link_bps, opts.link_delay);
    let topo = build_fat_tree(&mut net, opts.k)?;
    Ok((net, topo))
}
