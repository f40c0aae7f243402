//! 可视化布局
//!
//! 把矩形纵向均分为 4 条带：自下而上依次放 server、edge、aggregate、core，
//! 每层节点放在本条带的中线上。坐标系与动画画布一致，y 向下增大，
//! 所以“下方”是 y 较大的一侧。
//!
//! 横向：交换机层把宽度按本层节点数均分，节点放在每格中心；
//! server 层交替间距，奇数号 server 贴近前一台，形成成对的视觉分组。

use crate::error::{Error, Result};
use crate::net::{Coordinate, Network, NodeKind};
use crate::topo::FatTreeTopology;
use tracing::debug;

/// 奇数号 server 与前一台的间距（单位格）
const PAIR_GAP: f64 = 1.1;
/// 偶数号 server 与前一台的间距（单位格）
const GROUP_GAP: f64 = 3.0;

/// 由两个对角点给出的矩形，对角点顺序任意
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub ul: Coordinate,
    pub lr: Coordinate,
}

impl BoundingBox {
    pub fn new(ulx: f64, uly: f64, lrx: f64, lry: f64) -> Self {
        Self {
            ul: Coordinate::new(ulx, uly),
            lr: Coordinate::new(lrx, lry),
        }
    }

    pub fn min_x(&self) -> f64 {
        self.ul.x.min(self.lr.x)
    }

    pub fn max_x(&self) -> f64 {
        self.ul.x.max(self.lr.x)
    }

    pub fn min_y(&self) -> f64 {
        self.ul.y.min(self.lr.y)
    }

    pub fn max_y(&self) -> f64 {
        self.ul.y.max(self.lr.y)
    }

    pub fn width(&self) -> f64 {
        self.max_x() - self.min_x()
    }

    pub fn height(&self) -> f64 {
        self.max_y() - self.min_y()
    }

    /// 点是否在矩形内（含边界）
    pub fn contains(&self, p: Coordinate) -> bool {
        p.x >= self.min_x() && p.x <= self.max_x() && p.y >= self.min_y() && p.y <= self.max_y()
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new(-1000.0, -1000.0, 1000.0, 1000.0)
    }
}

/// 层在纵向条带中的序号（0 为最下方）
fn band_of(kind: NodeKind) -> usize {
    match kind {
        NodeKind::Server => 0,
        NodeKind::EdgeSwitch => 1,
        NodeKind::AggregateSwitch => 2,
        NodeKind::CoreSwitch => 3,
    }
}

/// server 层各节点相对起点的偏移（单位格）
fn server_offsets(count: usize) -> Vec<f64> {
    let mut offsets = Vec::with_capacity(count);
    let mut x = 0.0;
    for i in 0..count {
        if i > 0 {
            x += if i % 2 == 1 { PAIR_GAP } else { GROUP_GAP };
        }
        offsets.push(x);
    }
    offsets
}

/// 计算所有节点坐标并写回 `net`。重复调用会以相同结果覆盖。
#[tracing::instrument(skip(net, topo), fields(k = topo.k()))]
pub fn plan_layout(net: &mut Network, topo: &FatTreeTopology, bbox: BoundingBox) -> Result<()> {
    if !(bbox.width() > 0.0 && bbox.height() > 0.0) {
        return Err(Error::DegenerateBoundingBox);
    }
    let band = bbox.height() / 4.0;
    let y_of = |kind: NodeKind| bbox.max_y() - (band_of(kind) as f64 + 0.5) * band;

    // 两侧各留半个大间距
    let offsets = server_offsets(topo.server_count());
    let span = offsets.last().copied().unwrap_or(0.0) + GROUP_GAP;
    let unit = bbox.width() / span;
    let y = y_of(NodeKind::Server);
    for (&id, off) in topo.servers().iter().zip(&offsets) {
        let x = bbox.min_x() + (GROUP_GAP / 2.0 + off) * unit;
        net.node_mut(id).position = Coordinate::new(x, y);
    }

    for kind in [
        NodeKind::EdgeSwitch,
        NodeKind::AggregateSwitch,
        NodeKind::CoreSwitch,
    ] {
        let tier = topo.tier(kind);
        let cell = bbox.width() / tier.len() as f64;
        let y = y_of(kind);
        for (i, &id) in tier.iter().enumerate() {
            let x = bbox.min_x() + (i as f64 + 0.5) * cell;
            net.node_mut(id).position = Coordinate::new(x, y);
        }
        debug!(tier = ?kind, count = tier.len(), y, cell, "层布局完成");
    }
    Ok(())
}
