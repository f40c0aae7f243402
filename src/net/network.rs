//! 网络拓扑管理
//!
//! 持有全部节点、链路与接口；通过 [`Fabric`] 向拓扑构建器提供建点/建链能力。

use super::id::{IfaceId, LinkId, NodeId};
use super::link::{Iface, Link};
use super::node::{Node, NodeKind};
use crate::sim::SimTime;
use tracing::trace;

/// 建点与建链能力。
///
/// 拓扑构建器只通过这个 trait 操作底层网络，`connect` 假定总是成功。
pub trait Fabric {
    /// 创建一个节点，`tier_index` 为其在本层中的序号
    fn add_node(&mut self, kind: NodeKind, tier_index: usize) -> NodeId;

    /// 在两个节点之间建立一条点对点链路，返回 (a 侧接口, b 侧接口)
    fn connect(&mut self, a: NodeId, b: NodeId) -> (IfaceId, IfaceId);
}

/// 网络拓扑
#[derive(Debug, Clone)]
pub struct Network {
    nodes: Vec<Node>,
    links: Vec<Link>,
    ifaces: Vec<Iface>,
    /// 每个节点上的接口，按创建顺序
    node_ifaces: Vec<Vec<IfaceId>>,
    link_bps: u64,
    link_delay: SimTime,
}

impl Default for Network {
    fn default() -> Self {
        Self::new(10_000_000, SimTime::from_millis(1))
    }
}

impl Network {
    /// 创建空网络，之后新建的链路都使用给定的速率与时延
    pub fn new(link_bps: u64, link_delay: SimTime) -> Self {
        Self {
            nodes: Vec::new(),
            links: Vec::new(),
            ifaces: Vec::new(),
            node_ifaces: Vec::new(),
            link_bps,
            link_delay,
        }
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn link(&self, id: LinkId) -> &Link {
        &self.links[id.0]
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn iface(&self, id: IfaceId) -> &Iface {
        &self.ifaces[id.0]
    }

    pub fn iface_count(&self) -> usize {
        self.ifaces.len()
    }

    /// 节点上的全部接口（按建链顺序）
    pub fn ifaces_of(&self, node: NodeId) -> &[IfaceId] {
        &self.node_ifaces[node.0]
    }

    /// 节点的度（即其所在链路数）
    pub fn degree(&self, node: NodeId) -> usize {
        self.node_ifaces[node.0].len()
    }

    /// 节点的全部邻居（按建链顺序，可能重复出现于多重链路）
    pub fn neighbors(&self, node: NodeId) -> Vec<NodeId> {
        self.node_ifaces[node.0]
            .iter()
            .filter_map(|ifc| self.links[self.ifaces[ifc.0].link.0].peer_of(node))
            .collect()
    }

    /// 接口所在链路的对端接口
    pub fn peer_iface(&self, id: IfaceId) -> IfaceId {
        let link = &self.links[self.ifaces[id.0].link.0];
        if link.ifaces.0 == id {
            link.ifaces.1
        } else {
            link.ifaces.0
        }
    }
}

impl Fabric for Network {
    fn add_node(&mut self, kind: NodeKind, tier_index: usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(id, kind, tier_index));
        self.node_ifaces.push(Vec::new());
        id
    }

    fn connect(&mut self, a: NodeId, b: NodeId) -> (IfaceId, IfaceId) {
        let link = LinkId(self.links.len());
        let ia = IfaceId(self.ifaces.len());
        let ib = IfaceId(self.ifaces.len() + 1);
        self.ifaces.push(Iface { node: a, link });
        self.ifaces.push(Iface { node: b, link });
        self.node_ifaces[a.0].push(ia);
        self.node_ifaces[b.0].push(ib);
        self.links
            .push(Link::new(a, b, (ia, ib), self.link_bps, self.link_delay));
        trace!(link = ?link, a = ?a, b = ?b, "建立链路");
        (ia, ib)
    }
}
