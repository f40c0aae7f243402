//! 服务器分区
//!
//! 把 `[0, total)` 的服务器按 rank 切成等长、连续、互不重叠的区间：
//! rank `r` 拥有 `[r * stride, (r + 1) * stride)`，`stride = total / ranks`。
//! 不能整除时，最高编号的 `total % ranks` 台服务器不属于任何 rank，
//! 这里如实保留该行为，只通过 [`PartitionPlan::unowned`] 暴露并打日志。

use std::ops::Range;

use crate::error::{Error, Result};
use tracing::{debug, warn};

/// 分区方案：只由 (服务器总数, rank 数) 决定，与拓扑图无关
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionPlan {
    total: usize,
    ranks: usize,
}

impl PartitionPlan {
    pub fn new(total: usize, ranks: usize) -> Result<Self> {
        if ranks == 0 {
            return Err(Error::InvalidRankCount);
        }
        let plan = Self { total, ranks };
        if plan.remainder() != 0 {
            warn!(
                total,
                ranks,
                unowned = ?plan.unowned(),
                "服务器数不能被 rank 数整除，尾部服务器不属于任何 rank"
            );
        }
        Ok(plan)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn ranks(&self) -> usize {
        self.ranks
    }

    /// 每个 rank 拥有的服务器数
    pub fn stride(&self) -> usize {
        self.total / self.ranks
    }

    /// 未被任何 rank 拥有的服务器数
    pub fn remainder(&self) -> usize {
        self.total % self.ranks
    }

    /// rank 拥有的半开区间
    pub fn range(&self, rank: usize) -> Result<Range<usize>> {
        if rank >= self.ranks {
            return Err(Error::RankOutOfRange {
                rank,
                ranks: self.ranks,
            });
        }
        let start = rank * self.stride();
        Ok(start..start + self.stride())
    }

    /// 尾部无主的服务器区间（整除时为空）
    pub fn unowned(&self) -> Range<usize> {
        (self.total - self.remainder())..self.total
    }

    /// 服务器所属的 rank；落在尾部或越界时为 `None`
    pub fn owner_of(&self, server: usize) -> Option<usize> {
        if server >= self.total - self.remainder() {
            return None;
        }
        Some(server / self.stride())
    }
}

/// 当前进程的分布式身份
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankContext {
    pub rank: usize,
    pub size: usize,
}

impl Default for RankContext {
    fn default() -> Self {
        Self { rank: 0, size: 1 }
    }
}

/// 依次尝试的 (rank, size) 环境变量
const RANK_ENV_VARS: [(&str, &str); 2] = [
    ("OMPI_COMM_WORLD_RANK", "OMPI_COMM_WORLD_SIZE"),
    ("PMI_RANK", "PMI_SIZE"),
];

impl RankContext {
    pub fn new(rank: usize, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidRankCount);
        }
        if rank >= size {
            return Err(Error::RankOutOfRange { rank, ranks: size });
        }
        Ok(Self { rank, size })
    }

    /// 从 MPI 启动器导出的环境变量读取；都没有时视为单进程
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        for (rank_key, size_key) in RANK_ENV_VARS {
            let rank = parse_env(&lookup, rank_key)?;
            let size = parse_env(&lookup, size_key)?;
            if let (Some(rank), Some(size)) = (rank, size) {
                debug!(rank, size, source = rank_key, "从环境变量读取 rank");
                return Self::new(rank, size);
            }
        }
        Ok(Self::default())
    }

    /// 本 rank 在给定服务器总数下拥有的区间
    pub fn partition(&self, total: usize) -> Result<Range<usize>> {
        PartitionPlan::new(total, self.size)?.range(self.rank)
    }
}

/// 变量不存在时为 `None`；存在但无法解析时报错，不回退到单进程
fn parse_env(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<usize>> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<usize>()
        .map(Some)
        .map_err(|_| Error::InvalidRankEnv {
            key: key.to_string(),
            value: raw,
        })
}
