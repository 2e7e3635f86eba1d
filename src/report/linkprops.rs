//! # LinkProperties 字符串解析
//!
//! 平台把链路属性对象字符串化后嵌在诊断行里，形如：
//! ```text
//! {InterfaceName: tun0 LinkAddresses: [10.0.0.2/24, ] DnsAddresses: [8.8.8.8] Routes: [0.0.0.0/0 -> 10.0.0.1] MTU: 1400}
//! ```
//! 这不是本工具定义的格式，只能按"带标签的可选字段"做尽力而为的提取：
//! 每个字段独立匹配，缺失的字段直接跳过，列表字段按逗号切分并去掉空项。

use std::sync::OnceLock;

use regex::Regex;

// ========================================
// 提取结果
// ========================================

/// 从一条链路属性字符串中提取出的字段，全部可选
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkRecord {
    /// 接口名（InterfaceName: 后的第一个词）
    pub interface: Option<String>,
    /// 链路地址列表
    pub addresses: Vec<String>,
    /// DNS 服务器列表
    pub dns: Vec<String>,
    /// MTU
    pub mtu: Option<u64>,
    /// 路由列表
    pub routes: Vec<String>,
}

impl LinkRecord {
    /// 接口名是否为 VPN 隧道接口（tun/tap 前缀）
    pub fn is_vpn_interface(&self) -> bool {
        self.interface
            .as_deref()
            .map(|name| name.starts_with("tun") || name.starts_with("tap"))
            .unwrap_or(false)
    }
}

// ========================================
// 字段提取
// ========================================

struct FieldPatterns {
    interface: Regex,
    addresses: Regex,
    dns: Regex,
    routes: Regex,
    mtu: Regex,
}

fn patterns() -> &'static FieldPatterns {
    static PATTERNS: OnceLock<FieldPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| FieldPatterns {
        interface: Regex::new(r"InterfaceName:\s*(\w+)").unwrap(),
        addresses: Regex::new(r"LinkAddresses:\s*\[(.*?)\]").unwrap(),
        dns: Regex::new(r"DnsAddresses:\s*\[(.*?)\]").unwrap(),
        routes: Regex::new(r"Routes:\s*\[(.*?)\]").unwrap(),
        mtu: Regex::new(r"MTU:\s*(\d+)").unwrap(),
    })
}

/// 解析一条链路属性字符串
pub fn parse(text: &str) -> LinkRecord {
    let p = patterns();

    LinkRecord {
        interface: capture(&p.interface, text).map(str::to_string),
        addresses: capture(&p.addresses, text).map_or_else(Vec::new, split_list),
        dns: capture(&p.dns, text).map_or_else(Vec::new, split_list),
        mtu: capture(&p.mtu, text).and_then(|s| s.parse().ok()),
        routes: capture(&p.routes, text).map_or_else(Vec::new, split_list),
    }
}

fn capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// 逗号切分列表字段，去掉两端空白和空项
fn split_list(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
