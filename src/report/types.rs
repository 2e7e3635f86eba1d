//! # 网络类型名称解析
//!
//! 平台类型编号到显示名称的纯查表，未知编号回退为带编号的占位文本。

/// 网络类型编号到显示名称
///
/// 对所有整数都有定义：0–7 返回固定名称，其余返回 `Unknown type(<code>)`。
pub fn network_type_name(code: i64) -> String {
    match code {
        0 => "Unknown".to_string(),
        1 => "WIFI".to_string(),
        2 => "2G".to_string(),
        3 => "3G".to_string(),
        4 => "4G".to_string(),
        5 => "Ethernet".to_string(),
        6 => "VPN".to_string(),
        7 => "5G".to_string(),
        other => format!("Unknown type({other})"),
    }
}
