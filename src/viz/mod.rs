//! 动画布局快照（用于离线可视化）
//!
//! 只导出节点身份与坐标，以及链路两端，供动画前端绘制拓扑。

mod types;

pub use types::{VizLinkInfo, VizNodeInfo, VizSnapshot};
