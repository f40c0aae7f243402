//! 工作负载计划
//!
//! 交给外部仿真引擎的 JSON：本 rank 需要安装的 echo server 与 echo client。

use std::net::IpAddr;

use super::time::SimTime;
use serde::{Deserialize, Serialize};

/// 跨 rank 的同步策略
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// 全局窗口同步
    #[default]
    Distributed,
    /// null-message 同步
    NullMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadPlan {
    pub schema_version: u32,
    pub k: usize,
    pub rank: usize,
    pub ranks: usize,
    pub sync: SyncMode,
    /// 本 rank 拥有的服务器区间 `[start, end)`
    pub partition_start: usize,
    pub partition_end: usize,
    /// 不属于任何 rank 的尾部服务器数
    pub unowned: usize,
    pub stop: SimTime,
    pub servers: Vec<EchoServerSpec>,
    pub clients: Vec<EchoClientSpec>,
}

/// 安装在本 rank 服务器上的 echo server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EchoServerSpec {
    pub server: usize,
    pub port: u16,
    pub start: SimTime,
    pub stop: SimTime,
}

/// 从本 rank 服务器发往任意服务器的 echo client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EchoClientSpec {
    pub src: usize,
    pub dst: usize,
    pub dst_addr: IpAddr,
    pub port: u16,
    pub max_packets: u32,
    pub packet_bytes: u32,
    pub interval: SimTime,
    pub start: SimTime,
    pub stop: SimTime,
}
