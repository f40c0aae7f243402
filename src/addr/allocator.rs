//! 按建链顺序分配地址

use super::family::AddressFamily;
use super::generator::{NetworkGenerator, same_network};
use crate::error::{Error, Result};
use crate::net::{IfaceId, LinkId, Network, NodeKind};
use crate::topo::{FatTreeTopology, PortPair};
use tracing::{debug, info};

/// 一个地址族的完整分配结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressTable<F: AddressFamily> {
    prefix_len: u32,
    /// 按 IfaceId 索引
    iface_addrs: Vec<Option<F::Addr>>,
    /// 按 LinkId 索引：链路所在块的网络地址
    link_blocks: Vec<Option<F::Addr>>,
    /// 按发放顺序排列的全部块
    blocks: Vec<F::Addr>,
    servers: Vec<F::Addr>,
    edges: Vec<F::Addr>,
    aggs: Vec<F::Addr>,
    cores: Vec<F::Addr>,
}

impl<F: AddressFamily> AddressTable<F> {
    fn new(net: &Network, prefix_len: u32) -> Self {
        Self {
            prefix_len,
            iface_addrs: vec![None; net.iface_count()],
            link_blocks: vec![None; net.links().len()],
            blocks: Vec::new(),
            servers: Vec::new(),
            edges: Vec::new(),
            aggs: Vec::new(),
            cores: Vec::new(),
        }
    }

    pub fn prefix_len(&self) -> u32 {
        self.prefix_len
    }

    /// 全部地址块的网络地址（发放顺序）
    pub fn blocks(&self) -> &[F::Addr] {
        &self.blocks
    }

    pub fn address_of(&self, iface: IfaceId) -> Option<F::Addr> {
        self.iface_addrs.get(iface.0).copied().flatten()
    }

    /// 链路所在地址块的网络地址
    pub fn block_of(&self, link: LinkId) -> Option<F::Addr> {
        self.link_blocks.get(link.0).copied().flatten()
    }

    /// 地址是否属于给定网络块
    pub fn in_block(&self, block: F::Addr, addr: F::Addr) -> bool {
        same_network::<F>(block, addr, self.prefix_len)
    }

    /// 服务器唯一接口的地址
    pub fn server_address(&self, col: usize) -> Result<F::Addr> {
        lookup(&self.servers, NodeKind::Server, col)
    }

    /// edge 交换机连向其最小编号服务器的接口地址
    pub fn edge_address(&self, col: usize) -> Result<F::Addr> {
        lookup(&self.edges, NodeKind::EdgeSwitch, col)
    }

    /// aggregate 交换机连向其最小编号 edge 的接口地址
    pub fn aggregate_address(&self, col: usize) -> Result<F::Addr> {
        lookup(&self.aggs, NodeKind::AggregateSwitch, col)
    }

    /// core 交换机连向 pod 0 的接口地址
    pub fn core_address(&self, col: usize) -> Result<F::Addr> {
        lookup(&self.cores, NodeKind::CoreSwitch, col)
    }

    fn record(&mut self, net: &Network, iface: IfaceId, addr: F::Addr, block: F::Addr) {
        self.iface_addrs[iface.0] = Some(addr);
        self.link_blocks[net.iface(iface).link.0] = Some(block);
    }
}

fn lookup<A: Copy>(addrs: &[A], tier: NodeKind, col: usize) -> Result<A> {
    addrs.get(col).copied().ok_or(Error::IndexOutOfRange {
        tier,
        col,
        len: addrs.len(),
    })
}

/// 为 `topo` 的全部链路分配地址。
///
/// 遍历顺序与建链顺序一致：
/// 1. edge->server：每条链路（即每台服务器）一个新块；
/// 2. aggregate->edge：每台 aggregate 一个新块，组内链路顺序取址；
/// 3. core->aggregate：每台 core 一个新块，组内链路顺序取址。
///
/// 每条链路先给低层端点取址，再给高层端点取址。
#[tracing::instrument(skip(net, topo), fields(k = topo.k()))]
pub fn assign_addresses<F: AddressFamily>(
    net: &Network,
    topo: &FatTreeTopology,
    base: F::Addr,
    prefix_len: u32,
) -> Result<AddressTable<F>> {
    let mut generator = NetworkGenerator::<F>::new(base, prefix_len)?;
    let mut table = AddressTable::<F>::new(net, prefix_len);

    for group in topo.edge_groups() {
        for (slot, pair) in group.iter().enumerate() {
            let mut block = generator.next_network()?;
            let network = block.network();
            table.blocks.push(network);
            let lower = block.assign()?;
            let upper = block.assign()?;
            table.record(net, pair.lower, lower, network);
            table.record(net, pair.upper, upper, network);
            table.servers.push(lower);
            if slot == 0 {
                table.edges.push(upper);
            }
        }
    }
    debug!(blocks = table.blocks.len(), "server 层地址分配完成");

    let aggs = assign_switch_groups(net, topo.agg_groups(), &mut generator, &mut table)?;
    table.aggs = aggs;
    let cores = assign_switch_groups(net, topo.core_groups(), &mut generator, &mut table)?;
    table.cores = cores;

    info!(
        blocks = table.blocks.len(),
        prefix_len,
        first = ?table.blocks.first(),
        last = ?table.blocks.last(),
        "📮 地址分配完成"
    );
    Ok(table)
}

/// 每台高层交换机一个块；返回各交换机第一个接口的地址
fn assign_switch_groups<F: AddressFamily>(
    net: &Network,
    groups: &[Vec<PortPair>],
    generator: &mut NetworkGenerator<F>,
    table: &mut AddressTable<F>,
) -> Result<Vec<F::Addr>> {
    let mut representatives = Vec::with_capacity(groups.len());
    for group in groups {
        let mut block = generator.next_network()?;
        let network = block.network();
        table.blocks.push(network);
        for (slot, pair) in group.iter().enumerate() {
            let lower = block.assign()?;
            let upper = block.assign()?;
            table.record(net, pair.lower, lower, network);
            table.record(net, pair.upper, upper, network);
            if slot == 0 {
                representatives.push(upper);
            }
        }
    }
    Ok(representatives)
}
