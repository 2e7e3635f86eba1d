//! # 报告组装
//!
//! 把代理状态、网络类型和 VPN 检测结果组装成供对话框展示的多行文本。
//!
//! ## 明细区规则
//! - 以 `LinkProperties` 开头的诊断行视为结构化记录，展开成
//!   `Interface <n>:` 小节；n 是该行在全部诊断行中的 1 基序号，
//!   不按结构化行单独重排（保持与消费方观察到的编号一致）
//! - 其余行原样输出；含 "is not a function" 的行是平台方法缺失时
//!   混入输出的错误文本，直接过滤

use crate::inspect::{VpnInspection, LINK_PROPERTIES_TAG};

use super::linkprops;
use super::types::network_type_name;

/// 组装完整的网络状态报告
pub fn compose(proxy_enabled: bool, type_code: i64, inspection: &VpnInspection) -> String {
    let mut out = String::new();

    out.push_str("Current network status:\n");
    out.push_str(&format!(
        "System proxy: {}\n",
        if proxy_enabled { "enabled" } else { "disabled" }
    ));
    out.push_str(&format!(
        "Network type: {}\n",
        network_type_name(type_code)
    ));
    out.push_str(&format!(
        "VPN status: {}\n\n",
        if inspection.is_vpn_active {
            "active"
        } else {
            "inactive"
        }
    ));

    out.push_str("Details:\n");
    for (index, detail) in inspection.details.iter().enumerate() {
        if detail.starts_with(LINK_PROPERTIES_TAG) {
            out.push_str(&format!("\nInterface {}:\n", index + 1));
            render_link_record(&mut out, detail);
        } else if !detail.contains("is not a function") {
            out.push_str(detail);
            out.push('\n');
        }
    }

    out
}

/// 展开一条结构化链路属性行
fn render_link_record(out: &mut String, detail: &str) {
    let record = linkprops::parse(detail);

    if let Some(name) = &record.interface {
        let marker = if record.is_vpn_interface() {
            " (VPN interface)"
        } else {
            ""
        };
        out.push_str(&format!("- Interface name: {name}{marker}\n"));
    }

    if !record.addresses.is_empty() {
        out.push_str("- IP addresses:\n");
        for address in &record.addresses {
            out.push_str(&format!("  · {address}\n"));
        }
    }

    if !record.dns.is_empty() {
        out.push_str("- DNS servers:\n");
        for dns in &record.dns {
            out.push_str(&format!("  · {dns}\n"));
        }
    }

    if let Some(mtu) = record.mtu {
        out.push_str(&format!("- MTU: {mtu}\n"));
    }

    if !record.routes.is_empty() {
        out.push_str("- Routes:\n");
        for route in &record.routes {
            out.push_str(&format!("  · {route}\n"));
        }
    }
}

// ========================================
// 测试模块
// ========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn inspection(active: bool, details: &[&str]) -> VpnInspection {
        VpnInspection {
            is_vpn_active: active,
            details: details.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_header_lines() {
        let report = compose(true, 1, &inspection(false, &[]));
        assert!(report.contains("System proxy: enabled"));
        assert!(report.contains("Network type: WIFI"));
        assert!(report.contains("VPN status: inactive"));
    }

    #[test]
    fn test_structured_record_expansion() {
        // 桥接字符串化输出的原样形式，标签带本地化后缀也要能识别
        let detail = "LinkProperties 信息: {InterfaceName: tun0 LinkAddresses: [10.0.0.2/24, ] DnsAddresses: [8.8.8.8] Routes: [0.0.0.0/0 -> 10.0.0.1] MTU: 1500}";
        let report = compose(false, 6, &inspection(true, &[detail]));

        assert!(report.contains("Interface 1:"));
        assert!(report.contains("- Interface name: tun0 (VPN interface)"));
        assert!(report.contains("  · 10.0.0.2/24"));
        assert!(report.contains("- DNS servers:\n  · 8.8.8.8"));
        assert!(report.contains("- MTU: 1500"));
        assert!(report.contains("  · 0.0.0.0/0 -> 10.0.0.1"));
        // 末尾空地址项不得生成空弹点
        assert_eq!(report.matches("  · 10.0.0.2/24").count(), 1);
        assert!(!report.contains("· \n"));
    }

    #[test]
    fn test_empty_dns_omitted() {
        let detail = "LinkProperties: {InterfaceName: rmnet0 DnsAddresses: [] MTU: 1430}";
        let report = compose(false, 4, &inspection(false, &[detail]));
        assert!(!report.contains("DNS servers"));
        assert!(report.contains("- MTU: 1430"));
    }

    #[test]
    fn test_positional_numbering_counts_plain_lines() {
        let details = [
            "✓ VPN transport detected",
            "LinkProperties: {InterfaceName: tun0}",
        ];
        let report = compose(false, 1, &inspection(true, &details));
        // 序号按全部诊断行计，不重排
        assert!(report.contains("Interface 2:"));
        assert!(!report.contains("Interface 1:"));
    }

    #[test]
    fn test_quirk_lines_filtered() {
        let details = [
            "getLinkProperties is not a function",
            "Active network type: WIFI",
        ];
        let report = compose(false, 1, &inspection(false, &details));
        assert!(!report.contains("is not a function"));
        assert!(report.contains("Active network type: WIFI"));
    }

    #[test]
    fn test_plain_lines_verbatim() {
        let report = compose(false, 7, &inspection(false, &["Subtype: NR"]));
        assert!(report.contains("Subtype: NR\n"));
        assert!(report.contains("Network type: 5G"));
    }

    #[test]
    fn test_unknown_type_code_in_header() {
        let report = compose(false, 42, &inspection(false, &[]));
        assert!(report.contains("Network type: Unknown type(42)"));
    }
}
