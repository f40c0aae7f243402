//! 节点类型
//!
//! 定义网络节点：服务器与三层交换机。

use super::id::NodeId;
use serde::{Deserialize, Serialize};

/// 节点所属层级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Server,
    EdgeSwitch,
    AggregateSwitch,
    CoreSwitch,
}

impl NodeKind {
    /// 名称前缀（用于生成节点名）
    pub fn prefix(self) -> &'static str {
        match self {
            NodeKind::Server => "h",
            NodeKind::EdgeSwitch => "e",
            NodeKind::AggregateSwitch => "a",
            NodeKind::CoreSwitch => "c",
        }
    }
}

/// 二维坐标（仅用于可视化）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// 网络节点
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    kind: NodeKind,
    tier_index: usize,
    name: String,
    /// 布局坐标；每次布局都会整体覆盖
    pub position: Coordinate,
}

impl Node {
    /// 创建新节点
    pub fn new(id: NodeId, kind: NodeKind, tier_index: usize) -> Self {
        Self {
            id,
            kind,
            tier_index,
            name: format!("{}{}", kind.prefix(), tier_index),
            position: Coordinate::default(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// 节点在本层集合中的位置（从 0 开始）
    pub fn tier_index(&self) -> usize {
        self.tier_index
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
