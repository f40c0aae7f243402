//! 网络图模块
//!
//! 此模块包含拓扑图的基础组件：节点、链路、接口以及持有它们的网络。

// 子模块声明
mod id;
mod link;
mod network;
mod node;

// 重新导出公共接口
pub use id::{IfaceId, LinkId, NodeId};
pub use link::{Iface, Link};
pub use network::{Fabric, Network};
pub use node::{Coordinate, Node, NodeKind};
