//! 按 rank 生成 echo 工作负载

use std::net::IpAddr;

use super::time::SimTime;
use super::workload::{EchoClientSpec, EchoServerSpec, SyncMode, WorkloadPlan};
use crate::addr::{AddressFamily, AddressTable};
use crate::error::Result;
use crate::partition::{PartitionPlan, RankContext};
use crate::topo::FatTreeTopology;
use tracing::info;

#[derive(Debug, Clone)]
pub struct WorkloadOpts {
    pub port: u16,
    pub packet_bytes: u32,
    pub max_packets: u32,
    pub interval: SimTime,
    pub server_start: SimTime,
    pub client_start: SimTime,
    pub stop: SimTime,
}

impl Default for WorkloadOpts {
    fn default() -> Self {
        Self {
            port: 9,
            packet_bytes: 1024,
            max_packets: 1,
            interval: SimTime::from_secs(1),
            server_start: SimTime::from_secs(1),
            client_start: SimTime::from_secs(2),
            stop: SimTime::from_secs(10),
        }
    }
}

/// 生成本 rank 的 all-pairs echo 负载。
///
/// 只为本 rank 拥有的服务器安装 server/client；目的地址可以是任意服务器，
/// 地址取自 `addrs`。
#[tracing::instrument(skip(topo, addrs, opts), fields(k = topo.k()))]
pub fn plan_echo_workload<F>(
    topo: &FatTreeTopology,
    addrs: &AddressTable<F>,
    ctx: RankContext,
    sync: SyncMode,
    opts: &WorkloadOpts,
) -> Result<WorkloadPlan>
where
    F: AddressFamily,
    F::Addr: Into<IpAddr>,
{
    let total = topo.server_count();
    let plan = PartitionPlan::new(total, ctx.size)?;
    let owned = plan.range(ctx.rank)?;

    let servers = owned
        .clone()
        .map(|server| EchoServerSpec {
            server,
            port: opts.port,
            start: opts.server_start,
            stop: opts.stop,
        })
        .collect::<Vec<_>>();

    let mut clients = Vec::with_capacity(owned.len() * total.saturating_sub(1));
    for src in owned.clone() {
        for dst in (0..total).filter(|&dst| dst != src) {
            clients.push(EchoClientSpec {
                src,
                dst,
                dst_addr: addrs.server_address(dst)?.into(),
                port: opts.port,
                max_packets: opts.max_packets,
                packet_bytes: opts.packet_bytes,
                interval: opts.interval,
                start: opts.client_start,
                stop: opts.stop,
            });
        }
    }

    info!(
        rank = ctx.rank,
        ranks = ctx.size,
        start = owned.start,
        end = owned.end,
        servers = servers.len(),
        clients = clients.len(),
        "📋 工作负载计划生成完成"
    );

    Ok(WorkloadPlan {
        schema_version: 1,
        k: topo.k(),
        rank: ctx.rank,
        ranks: ctx.size,
        sync,
        partition_start: owned.start,
        partition_end: owned.end,
        unowned: plan.remainder(),
        stop: opts.stop,
        servers,
        clients,
    })
}
