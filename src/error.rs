//! 错误类型
//!
//! 拓扑构建、地址分配、布局与分区共用的错误定义。

use crate::net::NodeKind;

/// 统一的 Result 别名
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// fat-tree 的 k 必须为非零偶数
    #[error("invalid topology parameter: fat-tree arity k={k} must be even and non-zero")]
    InvalidArity { k: usize },

    /// 节点数超出 usize 可表示的范围
    #[error("invalid topology parameter: fat-tree arity k={k} is too large")]
    ArityTooLarge { k: usize },

    #[error("{tier:?} column {col} out of range (tier has {len} members)")]
    IndexOutOfRange { tier: NodeKind, col: usize, len: usize },

    #[error("{tier:?} column {col} does not belong to any pod")]
    NotInPod { tier: NodeKind, col: usize },

    #[error("rank count must be at least 1")]
    InvalidRankCount,

    #[error("environment variable {key}={value:?} is not a valid rank number")]
    InvalidRankEnv { key: String, value: String },

    #[error("rank {rank} out of range for {ranks} ranks")]
    RankOutOfRange { rank: usize, ranks: usize },

    #[error("invalid prefix length /{prefix_len} for a {bits}-bit address family")]
    InvalidPrefix { prefix_len: u32, bits: u32 },

    #[error("base address {base} has host bits set below /{prefix_len}")]
    UnalignedBase { base: String, prefix_len: u32 },

    #[error("no network left after {base}/{prefix_len} (issued {issued} blocks)")]
    NetworkSpaceExhausted {
        base: String,
        prefix_len: u32,
        issued: u128,
    },

    #[error("no host address left in block {network}/{prefix_len}")]
    HostSpaceExhausted { network: String, prefix_len: u32 },

    #[error("bounding box must have non-zero width and height")]
    DegenerateBoundingBox,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
