//! 运行配置
//!
//! 可选的 JSON 配置文件；所有字段都可省略，命令行参数会再覆盖一次。

use std::fs;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::path::Path;

use crate::error::Result;
use crate::layout::BoundingBox;
use crate::sim::{SimTime, SyncMode};
use crate::topo::FatTreeOpts;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FatTreeConfig {
    /// pod 数（即 k）
    pub pods: usize,
    pub link_bps: u64,
    pub link_delay_us: u64,
    pub ipv4_base: Ipv4Addr,
    pub ipv4_prefix: u32,
    /// None 表示不分配 IPv6
    pub ipv6_base: Option<Ipv6Addr>,
    pub ipv6_prefix: u32,
    /// [ulx, uly, lrx, lry]
    pub bbox: [f64; 4],
    pub sync: SyncMode,
}

impl Default for FatTreeConfig {
    fn default() -> Self {
        Self {
            pods: 4,
            link_bps: 10_000_000,
            link_delay_us: 1_000,
            ipv4_base: Ipv4Addr::new(10, 0, 0, 0),
            ipv4_prefix: 16,
            ipv6_base: Some(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 0)),
            ipv6_prefix: 64,
            bbox: [-1000.0, -1000.0, 1000.0, 1000.0],
            sync: SyncMode::Distributed,
        }
    }
}

impl FatTreeConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn topo_opts(&self) -> FatTreeOpts {
        FatTreeOpts {
            k: self.pods,
            link_bps: self.link_bps,
            link_delay: SimTime::from_micros(self.link_delay_us),
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let [ulx, uly, lrx, lry] = self.bbox;
        BoundingBox::new(ulx, uly, lrx, lry)
    }
}
