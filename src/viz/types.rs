use std::fs;
use std::net::IpAddr;
use std::path::Path;

use crate::addr::{AddressFamily, AddressTable};
use crate::error::Result;
use crate::net::{Network, NodeId, NodeKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VizNodeInfo {
    pub id: usize,
    pub name: String,
    pub kind: NodeKind,
    pub tier_index: usize,
    pub x: f64,
    pub y: f64,
    /// 各接口地址：按建链顺序，每个地址族依次追加
    #[serde(default)]
    pub addresses: Vec<IpAddr>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VizLinkInfo {
    pub from: usize,
    pub to: usize,
    /// 链路带宽（bps）
    pub bandwidth_bps: u64,
    /// 单向传播时延（ns）
    pub latency_ns: u64,
}

/// 某一时刻的拓扑与布局
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VizSnapshot {
    pub nodes: Vec<VizNodeInfo>,
    pub links: Vec<VizLinkInfo>,
}

impl VizSnapshot {
    /// 从网络当前状态生成快照（坐标取自最近一次布局）
    pub fn capture(net: &Network) -> Self {
        let nodes = net
            .nodes()
            .iter()
            .map(|n| VizNodeInfo {
                id: n.id().0,
                name: n.name().to_string(),
                kind: n.kind(),
                tier_index: n.tier_index(),
                x: n.position.x,
                y: n.position.y,
                addresses: Vec::new(),
            })
            .collect::<Vec<_>>();
        let links = net
            .links()
            .iter()
            .map(|l| VizLinkInfo {
                from: l.a.0,
                to: l.b.0,
                bandwidth_bps: l.bandwidth_bps,
                latency_ns: l.delay.0,
            })
            .collect::<Vec<_>>();
        Self { nodes, links }
    }

    /// 把一个地址族的接口地址追加到对应节点上
    pub fn attach_addresses<F>(&mut self, net: &Network, table: &AddressTable<F>)
    where
        F: AddressFamily,
        F::Addr: Into<IpAddr>,
    {
        for node in &mut self.nodes {
            let ifaces = net.ifaces_of(NodeId(node.id));
            node.addresses
                .extend(ifaces.iter().filter_map(|&i| table.address_of(i)).map(Into::<IpAddr>::into));
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)?;
        Ok(())
    }
}
