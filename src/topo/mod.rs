//! 拓扑模块
//!
//! fat-tree 的索引计算与拓扑构建。

pub mod fat_tree;
pub mod index;

pub use fat_tree::{FatTreeOpts, FatTreeTopology, PortPair, build_fat_tree, build_network};
pub use index::FatTreeIndex;
