//! # 检测模块
//!
//! 基于平台桥接的 VPN 状态启发式检测。

pub mod vpn;

// 重新导出常用类型
pub use vpn::{inspect, VpnInspection, LINK_PROPERTIES_TAG};
