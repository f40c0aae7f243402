//! 链路类型
//!
//! 定义点对点链路及其两个端点接口。

use super::id::{IfaceId, LinkId, NodeId};
use crate::sim::SimTime;

/// 链路端点接口
#[derive(Debug, Clone, Copy)]
pub struct Iface {
    pub node: NodeId,
    pub link: LinkId,
}

/// 点对点链路（无向）
#[derive(Debug, Clone)]
pub struct Link {
    pub a: NodeId,
    pub b: NodeId,
    /// `a` 侧与 `b` 侧的接口
    pub ifaces: (IfaceId, IfaceId),
    pub bandwidth_bps: u64,
    pub delay: SimTime,
}

impl Link {
    /// 创建新链路
    pub fn new(
        a: NodeId,
        b: NodeId,
        ifaces: (IfaceId, IfaceId),
        bandwidth_bps: u64,
        delay: SimTime,
    ) -> Self {
        Self {
            a,
            b,
            ifaces,
            bandwidth_bps,
            delay,
        }
    }

    /// 给定一端，返回另一端节点
    pub fn peer_of(&self, node: NodeId) -> Option<NodeId> {
        if node == self.a {
            Some(self.b)
        } else if node == self.b {
            Some(self.a)
        } else {
            None
        }
    }
}
