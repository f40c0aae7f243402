//! 地址族
//!
//! 把 IPv4/IPv6 统一成定长位串，生成器与地址块只做整数运算。

use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::net::{Ipv4Addr, Ipv6Addr};

/// 地址族：地址与 `u128` 位串之间的互转
pub trait AddressFamily: Debug + Clone + Copy + PartialEq + Eq + 'static {
    type Addr: Copy + Eq + Ord + Hash + Debug + Display;

    /// 地址位宽
    const BITS: u32;

    /// 主机号全 1 是否保留为广播地址
    const RESERVES_BROADCAST: bool;

    fn to_bits(addr: Self::Addr) -> u128;
    fn from_bits(bits: u128) -> Self::Addr;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv6;

impl AddressFamily for Ipv4 {
    type Addr = Ipv4Addr;
    const BITS: u32 = 32;
    const RESERVES_BROADCAST: bool = true;

    fn to_bits(addr: Ipv4Addr) -> u128 {
        u32::from(addr) as u128
    }

    fn from_bits(bits: u128) -> Ipv4Addr {
        Ipv4Addr::from(bits as u32)
    }
}

impl AddressFamily for Ipv6 {
    type Addr = Ipv6Addr;
    const BITS: u32 = 128;
    const RESERVES_BROADCAST: bool = false;

    fn to_bits(addr: Ipv6Addr) -> u128 {
        u128::from(addr)
    }

    fn from_bits(bits: u128) -> Ipv6Addr {
        Ipv6Addr::from(bits)
    }
}
