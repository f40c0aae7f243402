//! 仿真对接模块
//!
//! 外部仿真引擎消费的内容：仿真时间与按 rank 生成的工作负载计划。

// 子模块声明
mod driver;
mod time;
mod workload;

// 重新导出公共接口
pub use driver::{WorkloadOpts, plan_echo_workload};
pub use time::SimTime;
pub use workload::{EchoClientSpec, EchoServerSpec, SyncMode, WorkloadPlan};
