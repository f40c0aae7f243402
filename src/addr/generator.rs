//! 网络号生成器与地址块

use std::marker::PhantomData;

use super::family::AddressFamily;
use crate::error::{Error, Result};

/// 顺序发放网络号的生成器。
///
/// 状态只有 `{base, prefix_len, issued}`，由调用方显式持有。
/// `next_network` 先前进再返回，所以第一块是 `base + 1 块`。
#[derive(Debug, Clone)]
pub struct NetworkGenerator<F: AddressFamily> {
    base: F::Addr,
    prefix_len: u32,
    issued: u128,
    _family: PhantomData<F>,
}

impl<F: AddressFamily> NetworkGenerator<F> {
    pub fn new(base: F::Addr, prefix_len: u32) -> Result<Self> {
        if prefix_len == 0 || prefix_len > F::BITS - 2 {
            return Err(Error::InvalidPrefix {
                prefix_len,
                bits: F::BITS,
            });
        }
        let host_bits = F::BITS - prefix_len;
        if F::to_bits(base) & host_mask(host_bits) != 0 {
            return Err(Error::UnalignedBase {
                base: base.to_string(),
                prefix_len,
            });
        }
        Ok(Self {
            base,
            prefix_len,
            issued: 0,
            _family: PhantomData,
        })
    }

    /// 已发放的块数
    pub fn issued(&self) -> u128 {
        self.issued
    }

    /// 发放下一个网络块
    pub fn next_network(&mut self) -> Result<AddressBlock<F>> {
        let host_bits = F::BITS - self.prefix_len;
        let base_net = F::to_bits(self.base) >> host_bits;
        let max_net = host_mask(self.prefix_len);
        let next = base_net
            .checked_add(self.issued + 1)
            .filter(|n| *n <= max_net)
            .ok_or_else(|| Error::NetworkSpaceExhausted {
                base: self.base.to_string(),
                prefix_len: self.prefix_len,
                issued: self.issued,
            })?;
        self.issued += 1;
        Ok(AddressBlock::new(next << host_bits, self.prefix_len))
    }
}

/// 一个网络块；块内主机号从 1 开始顺序发放
#[derive(Debug, Clone)]
pub struct AddressBlock<F: AddressFamily> {
    network: u128,
    prefix_len: u32,
    next_host: u128,
    _family: PhantomData<F>,
}

impl<F: AddressFamily> AddressBlock<F> {
    fn new(network: u128, prefix_len: u32) -> Self {
        Self {
            network,
            prefix_len,
            next_host: 1,
            _family: PhantomData,
        }
    }

    /// 网络地址
    pub fn network(&self) -> F::Addr {
        F::from_bits(self.network)
    }

    /// 取块内下一个主机地址
    pub fn assign(&mut self) -> Result<F::Addr> {
        let host_bits = F::BITS - self.prefix_len;
        let mut host_max = host_mask(host_bits);
        if F::RESERVES_BROADCAST {
            host_max -= 1;
        }
        if self.next_host > host_max {
            return Err(Error::HostSpaceExhausted {
                network: self.network().to_string(),
                prefix_len: self.prefix_len,
            });
        }
        let addr = F::from_bits(self.network | self.next_host);
        self.next_host += 1;
        Ok(addr)
    }

    /// 地址是否落在本块内
    pub fn contains(&self, addr: F::Addr) -> bool {
        same_network::<F>(self.network(), addr, self.prefix_len)
    }
}

/// 两个地址在给定前缀下是否属于同一网络
pub(crate) fn same_network<F: AddressFamily>(a: F::Addr, b: F::Addr, prefix_len: u32) -> bool {
    let host_bits = F::BITS - prefix_len;
    (F::to_bits(a) >> host_bits) == (F::to_bits(b) >> host_bits)
}

/// 低 `bits` 位全 1（`bits` < 128）
fn host_mask(bits: u32) -> u128 {
    (1u128 << bits) - 1
}
