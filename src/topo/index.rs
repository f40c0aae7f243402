//! Fat-tree 索引计算
//!
//! 纯函数：给定某层节点的列号，算出它在相邻层所连接的列号。
//! pod 不单独建模，只由整除/取模推导：
//! - edge/aggregate 所在 pod = `idx / (k/2)`
//! - aggregate 对应的 core 组 = `idx % (k/2)`

use std::ops::Range;

use crate::error::{Error, Result};
use crate::net::NodeKind;

/// k 元 fat-tree 的索引计算器（k 为非零偶数）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FatTreeIndex {
    k: usize,
}

impl FatTreeIndex {
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 || k % 2 != 0 {
            return Err(Error::InvalidArity { k });
        }
        // k^3 不溢出时其余各层数量都不会溢出
        if k.checked_mul(k).and_then(|sq| sq.checked_mul(k)).is_none() {
            return Err(Error::ArityTooLarge { k });
        }
        Ok(Self { k })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// k/2：每个 pod 的 edge/aggregate 数，也是每个 core 组的 core 数
    pub fn half(&self) -> usize {
        self.k / 2
    }

    pub fn pod_count(&self) -> usize {
        self.k
    }

    pub fn server_count(&self) -> usize {
        self.k * self.k * self.k / 4
    }

    pub fn edge_count(&self) -> usize {
        self.k * self.half()
    }

    pub fn aggregate_count(&self) -> usize {
        self.k * self.half()
    }

    pub fn core_count(&self) -> usize {
        self.half() * self.half()
    }

    /// 某层的节点总数
    pub fn tier_len(&self, tier: NodeKind) -> usize {
        match tier {
            NodeKind::Server => self.server_count(),
            NodeKind::EdgeSwitch => self.edge_count(),
            NodeKind::AggregateSwitch => self.aggregate_count(),
            NodeKind::CoreSwitch => self.core_count(),
        }
    }

    /// 列号越界检查
    pub fn check(&self, tier: NodeKind, col: usize) -> Result<usize> {
        let len = self.tier_len(tier);
        if col >= len {
            return Err(Error::IndexOutOfRange { tier, col, len });
        }
        Ok(col)
    }

    /// server/edge/aggregate 所在的 pod；core 不属于任何 pod
    pub fn pod_of(&self, tier: NodeKind, col: usize) -> Result<usize> {
        let col = self.check(tier, col)?;
        match tier {
            NodeKind::Server => Ok(col / (self.half() * self.half())),
            NodeKind::EdgeSwitch | NodeKind::AggregateSwitch => Ok(col / self.half()),
            NodeKind::CoreSwitch => Err(Error::NotInPod { tier, col }),
        }
    }

    /// core 交换机所在的 core 组
    pub fn group_of_core(&self, core: usize) -> Result<usize> {
        Ok(self.check(NodeKind::CoreSwitch, core)? / self.half())
    }

    /// edge 交换机下挂的 k/2 台服务器：`[e*(k/2), e*(k/2) + k/2)`
    pub fn servers_of_edge(&self, edge: usize) -> Result<Range<usize>> {
        let edge = self.check(NodeKind::EdgeSwitch, edge)?;
        let start = edge * self.half();
        Ok(start..start + self.half())
    }

    /// 服务器所连的 edge 交换机
    pub fn edge_of_server(&self, server: usize) -> Result<usize> {
        Ok(self.check(NodeKind::Server, server)? / self.half())
    }

    /// 与 edge 同 pod 的 k/2 台 aggregate 交换机（按 pod 分组）
    pub fn aggregates_of_edge(&self, edge: usize) -> Result<Range<usize>> {
        let pod = self.check(NodeKind::EdgeSwitch, edge)? / self.half();
        let start = pod * self.half();
        Ok(start..start + self.half())
    }

    /// 与 aggregate 同 pod 的 k/2 台 edge 交换机
    pub fn edges_of_aggregate(&self, agg: usize) -> Result<Range<usize>> {
        let pod = self.check(NodeKind::AggregateSwitch, agg)? / self.half();
        let start = pod * self.half();
        Ok(start..start + self.half())
    }

    /// aggregate 可达的 k/2 台 core 交换机（按其在 pod 内的位置取模分组）
    pub fn cores_of_aggregate(&self, agg: usize) -> Result<Range<usize>> {
        let group = self.check(NodeKind::AggregateSwitch, agg)? % self.half();
        let start = group * self.half();
        Ok(start..start + self.half())
    }

    /// core 所连的 k 台 aggregate 交换机：每个 pod 各一台，按 pod 升序
    pub fn aggregates_of_core(&self, core: usize) -> Result<Vec<usize>> {
        let group = self.group_of_core(core)?;
        Ok((0..self.pod_count())
            .map(|pod| pod * self.half() + group)
            .collect())
    }
}
