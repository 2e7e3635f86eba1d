//! # VPN 状态检测
//!
//! 对连接子系统做一次尽力而为的 VPN 启发式检测，汇总：
//! 1. 布尔判定 is_vpn_active
//! 2. 按发现顺序排列的诊断信息行（报告层按位置编号，顺序不可变）
//!
//! ## 判定依据（任一命中即判定开启）
//! 1. 某个网络的能力集声明了 VPN 传输层
//! 2. 某个网络的链路属性字符串中出现 tun / tap 隧道接口名
//!
//! 单个网络的查询失败只记一条诊断并继续，不丢弃已收集的数据。

use serde::Serialize;

use crate::bridge::{NetworkBridge, NetworkHandle, Transport, MULTI_NETWORK_SDK};

/// 结构化链路属性诊断行的前缀，报告层据此识别
pub const LINK_PROPERTIES_TAG: &str = "LinkProperties";

// ========================================
// 检测结果
// ========================================

/// 一次 VPN 检测的结果
#[derive(Debug, Clone, Default, Serialize)]
pub struct VpnInspection {
    /// 是否判定 VPN 处于开启状态
    pub is_vpn_active: bool,
    /// 诊断信息行，发现顺序即展示顺序
    pub details: Vec<String>,
}

// ========================================
// 检测入口
// ========================================

/// 执行一次完整的 VPN 状态检测
///
/// 所有桥接查询的失败都降级为诊断信息行，本函数不返回错误。
pub fn inspect(bridge: &dyn NetworkBridge) -> VpnInspection {
    let mut result = VpnInspection::default();

    // 1. 平台版本；拿不到版本号就没有继续枚举的依据，直接返回
    let sdk = match bridge.sdk_version() {
        Ok(version) => version,
        Err(e) => {
            result.details.push(format!("Inspection error: {e:#}"));
            return result;
        }
    };

    // 2. 多网络枚举（仅现代 API 支持）
    if sdk >= MULTI_NETWORK_SDK {
        match bridge.active_networks() {
            Ok(networks) => {
                for network in networks {
                    inspect_network(bridge, network, &mut result);
                }
            }
            Err(e) => {
                result.details.push(format!("Inspection error: {e:#}"));
                tracing::warn!("network enumeration failed: {e:#}");
            }
        }
    }

    // 3. 旧式活动网络信息，任何版本都查
    match bridge.active_info() {
        Ok(Some(info)) => {
            result
                .details
                .push(format!("Active network type: {}", info.type_name));
            result
                .details
                .push(format!("Subtype: {}", info.subtype_name));
            if let Some(extra) = info.extra_info.filter(|s| !s.is_empty()) {
                result.details.push(format!("Extra info: {extra}"));
            }
        }
        Ok(None) => {}
        Err(e) => result.details.push(format!("Inspection error: {e:#}")),
    }

    result
}

/// 检查单个网络；失败只影响本网络的诊断
fn inspect_network(
    bridge: &dyn NetworkBridge,
    network: NetworkHandle,
    result: &mut VpnInspection,
) {
    match bridge.capabilities(network) {
        Ok(Some(caps)) if caps.has_transport(Transport::Vpn) => {
            result.is_vpn_active = true;
            result.details.push("✓ VPN transport detected".to_string());
        }
        Ok(_) => {}
        Err(e) => result
            .details
            .push(format!("{network} lookup error: {e:#}")),
    }

    match bridge.link_properties(network) {
        Ok(Some(raw)) => {
            result
                .details
                .push(format!("{LINK_PROPERTIES_TAG}: {raw}"));
            // tun/tap 是常见的 VPN 隧道接口名前缀
            if raw.contains("tun") || raw.contains("tap") {
                result.is_vpn_active = true;
                result
                    .details
                    .push("✓ VPN interface found in link properties".to_string());
            }
        }
        Ok(None) => {}
        Err(e) => result
            .details
            .push(format!("{network} lookup error: {e:#}")),
    }
}

// ========================================
// 测试模块
// ========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{ActiveNetworkInfo, NetworkCapabilities};
    use anyhow::{anyhow, Result};
    use std::collections::HashMap;

    /// 可编排的桥接桩，模拟各种平台返回和故障
    #[derive(Default)]
    struct MockBridge {
        sdk: u32,
        networks: Vec<u64>,
        vpn_transport: Vec<u64>,
        link_props: HashMap<u64, String>,
        broken: Vec<u64>,
        active: Option<ActiveNetworkInfo>,
        fail_sdk: bool,
    }

    impl NetworkBridge for MockBridge {
        fn sdk_version(&self) -> Result<u32> {
            if self.fail_sdk {
                return Err(anyhow!("bridge unavailable"));
            }
            Ok(self.sdk)
        }

        fn active_networks(&self) -> Result<Vec<NetworkHandle>> {
            Ok(self.networks.iter().map(|&id| NetworkHandle(id)).collect())
        }

        fn capabilities(&self, network: NetworkHandle) -> Result<Option<NetworkCapabilities>> {
            if self.broken.contains(&network.0) {
                return Err(anyhow!("capabilities lookup denied"));
            }
            let transports = if self.vpn_transport.contains(&network.0) {
                vec![Transport::Vpn]
            } else {
                vec![Transport::Wifi]
            };
            Ok(Some(NetworkCapabilities::new(transports)))
        }

        fn link_properties(&self, network: NetworkHandle) -> Result<Option<String>> {
            if self.broken.contains(&network.0) {
                return Err(anyhow!("link properties lookup denied"));
            }
            Ok(self.link_props.get(&network.0).cloned())
        }

        fn active_info(&self) -> Result<Option<ActiveNetworkInfo>> {
            Ok(self.active.clone())
        }

        fn proxy_configured(&self) -> Result<bool> {
            Ok(false)
        }

        fn network_type_code(&self) -> Result<i64> {
            Ok(1)
        }
    }

    #[test]
    fn test_vpn_transport_sets_verdict() {
        let bridge = MockBridge {
            sdk: 30,
            networks: vec![100],
            vpn_transport: vec![100],
            ..Default::default()
        };

        let result = inspect(&bridge);
        assert!(result.is_vpn_active);
        assert!(result
            .details
            .iter()
            .any(|d| d.contains("VPN transport detected")));
    }

    #[test]
    fn test_tun_interface_sets_verdict_without_capability() {
        let mut link_props = HashMap::new();
        link_props.insert(
            100,
            "{InterfaceName: tun0 LinkAddresses: [10.0.0.2/24]}".to_string(),
        );
        let bridge = MockBridge {
            sdk: 30,
            networks: vec![100],
            link_props,
            ..Default::default()
        };

        let result = inspect(&bridge);
        assert!(result.is_vpn_active);
        assert!(result.details[0].starts_with(LINK_PROPERTIES_TAG));
        assert!(result
            .details
            .iter()
            .any(|d| d.contains("VPN interface found")));
    }

    #[test]
    fn test_broken_network_does_not_discard_others() {
        let mut link_props = HashMap::new();
        link_props.insert(101, "{InterfaceName: wlan0}".to_string());
        let bridge = MockBridge {
            sdk: 30,
            networks: vec![100, 101],
            broken: vec![100],
            link_props,
            ..Default::default()
        };

        let result = inspect(&bridge);
        // 故障网络记两条诊断（能力集 + 链路属性），正常网络照常出现
        assert!(result
            .details
            .iter()
            .any(|d| d.contains("network{100}") && d.contains("lookup error")));
        assert!(result.details.iter().any(|d| d.contains("wlan0")));
        assert!(!result.is_vpn_active);
    }

    #[test]
    fn test_legacy_sdk_skips_enumeration() {
        let bridge = MockBridge {
            sdk: 21,
            networks: vec![100],
            vpn_transport: vec![100],
            active: Some(ActiveNetworkInfo {
                type_name: "WIFI".into(),
                subtype_name: String::new(),
                extra_info: Some("HomeWifi".into()),
            }),
            ..Default::default()
        };

        let result = inspect(&bridge);
        assert!(!result.is_vpn_active);
        assert_eq!(
            result.details,
            vec![
                "Active network type: WIFI".to_string(),
                "Subtype: ".to_string(),
                "Extra info: HomeWifi".to_string(),
            ]
        );
    }

    #[test]
    fn test_sdk_failure_returns_immediately() {
        let bridge = MockBridge {
            fail_sdk: true,
            networks: vec![100],
            vpn_transport: vec![100],
            ..Default::default()
        };

        let result = inspect(&bridge);
        assert!(!result.is_vpn_active);
        assert_eq!(result.details.len(), 1);
        assert!(result.details[0].contains("bridge unavailable"));
    }

    #[test]
    fn test_detail_order_preserved() {
        let mut link_props = HashMap::new();
        link_props.insert(100, "{InterfaceName: tun0}".to_string());
        let bridge = MockBridge {
            sdk: 30,
            networks: vec![100],
            vpn_transport: vec![100],
            link_props,
            active: Some(ActiveNetworkInfo {
                type_name: "VPN".into(),
                subtype_name: String::new(),
                extra_info: None,
            }),
            ..Default::default()
        };

        let result = inspect(&bridge);
        assert!(result.details[0].contains("VPN transport detected"));
        assert!(result.details[1].starts_with(LINK_PROPERTIES_TAG));
        assert!(result.details[2].contains("VPN interface found"));
        assert!(result.details[3].contains("Active network type"));
    }
}
