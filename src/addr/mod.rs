//! 地址分配模块
//!
//! 按拓扑建链顺序为每个链路组发放独立地址块，并提供按列号的地址查询。
//! IPv4 与 IPv6 各用一个独立的生成器，互不影响。

mod allocator;
mod family;
mod generator;

pub use allocator::{AddressTable, assign_addresses};
pub use family::{AddressFamily, Ipv4, Ipv6};
pub use generator::{AddressBlock, NetworkGenerator};
