//! # dumpsys connectivity 快照解析
//!
//! 这个模块把一次 `dumpsys connectivity` 的文本输出解析成结构化快照：
//! 每个网络的传输层能力、链路属性原始字符串，以及旧式的活动网络信息行。
//!
//! ## 输出格式示例（节选）
//! ```text
//! NetworkAgentInfo [WIFI () - 100] network{100}  nethandle{432903077893}
//!   lp{{InterfaceName: wlan0 LinkAddresses: [ 192.168.1.5/24 ] DnsAddresses: [ 192.168.1.1 ] MTU: 1500 Routes: [ 0.0.0.0/0 -> 192.168.1.1 wlan0 ]}}
//!   nc{[ Transports: WIFI Capabilities: INTERNET&NOT_RESTRICTED&VALIDATED ]}
//! NetworkInfo: type: WIFI[], state: CONNECTED/CONNECTED, reason: (unspecified), extra: "MyWifi", failover: false
//! ```
//!
//! ## 注意
//! - 输出格式随平台版本变化，所有字段都按可选处理，解析是尽力而为
//! - 只认 `NetworkAgentInfo` 行；其他提到 network{..} 的行（请求表等）忽略

use anyhow::Result;

use super::types::{
    ActiveNetworkInfo, NetworkBridge, NetworkCapabilities, NetworkHandle, Transport,
};

// ========================================
// 快照数据结构
// ========================================

/// 快照中单个网络的记录
#[derive(Debug, Clone)]
pub struct NetworkRecord {
    /// network{<id>} 中的数字标识
    pub id: u64,
    /// nc{[ Transports: .. ]} 中声明的传输层
    pub transports: Vec<Transport>,
    /// lp{..} 中的链路属性原始字符串（保留花括号内的原样文本）
    pub link_properties: Option<String>,
}

/// 一次 dumpsys connectivity 输出的结构化快照
#[derive(Debug, Clone, Default)]
pub struct ConnectivitySnapshot {
    /// 按出现顺序的网络记录
    pub networks: Vec<NetworkRecord>,
    /// 旧式 NetworkInfo 行解析出的活动网络信息
    pub active: Option<ActiveNetworkInfo>,
}

impl ConnectivitySnapshot {
    /// 解析 dumpsys connectivity 的完整文本输出
    pub fn parse(text: &str) -> Self {
        let mut snapshot = ConnectivitySnapshot::default();

        for line in text.lines() {
            if line.contains("NetworkAgentInfo") {
                if let Some(record) = parse_agent_line(line) {
                    // 同一网络可能出现多次，保留第一条
                    if !snapshot.networks.iter().any(|n| n.id == record.id) {
                        snapshot.networks.push(record);
                    }
                }
            }
        }

        snapshot.active = select_network_info(text);

        snapshot
    }

    /// 按 id 查找网络记录
    pub fn network(&self, id: u64) -> Option<&NetworkRecord> {
        self.networks.iter().find(|n| n.id == id)
    }
}

// ========================================
// 行级解析
// ========================================

/// 解析一条 NetworkAgentInfo 行
fn parse_agent_line(line: &str) -> Option<NetworkRecord> {
    let id = extract_network_id(line)?;

    let transports = match field_after(line, "Transports:") {
        Some(token) => token.split('|').map(Transport::parse).collect(),
        None => Vec::new(),
    };

    let link_properties = extract_link_properties(line);

    Some(NetworkRecord {
        id,
        transports,
        link_properties,
    })
}

/// 提取 network{<id>} 中的数字
fn extract_network_id(line: &str) -> Option<u64> {
    let start = line.find("network{")? + "network{".len();
    let rest = &line[start..];
    let end = rest.find('}')?;
    rest[..end].trim().parse().ok()
}

/// 提取标签后的第一个空白分隔的字段
fn field_after<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let start = line.find(label)? + label.len();
    line[start..].split_whitespace().next()
}

/// 提取 lp{..} 段内的链路属性字符串
///
/// 花括号可能嵌套一层（`lp{{InterfaceName: ..}}`），此时剥掉外层，
/// 返回 `{InterfaceName: ..}` 形式的原样文本。
fn extract_link_properties(line: &str) -> Option<String> {
    let at = line.find("lp{")? + "lp".len();
    let segment = braced_segment(line, at)?;

    let inner = if segment.len() > 2 && segment.starts_with("{{") && segment.ends_with("}}") {
        &segment[1..segment.len() - 1]
    } else {
        segment
    };

    let inner = inner.trim();
    if inner == "{}" || inner.is_empty() {
        None
    } else {
        Some(inner.to_string())
    }
}

/// 从 `start` 处的 `{` 开始截取配平的花括号段（含两端花括号）
fn braced_segment(text: &str, start: usize) -> Option<&str> {
    let bytes = text.as_bytes();
    if bytes.get(start) != Some(&b'{') {
        return None;
    }

    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// 选出最能代表当前活动网络的 NetworkInfo 行
///
/// 优先取 CONNECTED 状态的行，退而取第一条。
fn select_network_info(text: &str) -> Option<ActiveNetworkInfo> {
    let mut first = None;

    for line in text.lines() {
        if !line.contains("NetworkInfo:") {
            continue;
        }
        if let Some(info) = parse_network_info(line) {
            if line.contains("state: CONNECTED") {
                return Some(info);
            }
            if first.is_none() {
                first = Some(info);
            }
        }
    }

    first
}

/// 解析单条 NetworkInfo 行
///
/// 格式: `NetworkInfo: type: WIFI[], state: CONNECTED/CONNECTED, reason: .., extra: "MyWifi", ..`
fn parse_network_info(line: &str) -> Option<ActiveNetworkInfo> {
    let rest = line.split("type: ").nth(1)?;
    let type_field = rest.split(',').next()?.trim();

    // "MOBILE[LTE]" -> ("MOBILE", "LTE")；无方括号时子类型为空串
    let (type_name, subtype_name) = match type_field.find('[') {
        Some(i) if type_field.ends_with(']') => (
            type_field[..i].to_string(),
            type_field[i + 1..type_field.len() - 1].to_string(),
        ),
        _ => (type_field.to_string(), String::new()),
    };

    if type_name.is_empty() {
        return None;
    }

    let extra_info = line
        .split("extra: ")
        .nth(1)
        .map(|s| {
            s.split(',')
                .next()
                .unwrap_or(s)
                .trim()
                .trim_matches('"')
                .to_string()
        })
        .filter(|s| !s.is_empty() && s != "(none)" && s != "null");

    Some(ActiveNetworkInfo {
        type_name,
        subtype_name,
        extra_info,
    })
}

// ========================================
// 类型编号推导
// ========================================

/// 从活动网络信息推导基础网络类型编号
pub fn type_code_for(info: &ActiveNetworkInfo) -> i64 {
    match info.type_name.to_ascii_uppercase().as_str() {
        "WIFI" => 1,
        "ETHERNET" => 5,
        "VPN" => 6,
        "MOBILE" | "CELLULAR" | "MOBILE_DUN" | "MOBILE_HIPRI" => {
            subtype_code(&info.subtype_name)
        }
        _ => 0,
    }
}

/// 移动网络子类型到代际编号的映射
fn subtype_code(subtype: &str) -> i64 {
    match subtype.to_ascii_uppercase().as_str() {
        "GPRS" | "EDGE" | "CDMA" | "1XRTT" | "IDEN" | "GSM" => 2,
        "UMTS" | "EVDO_0" | "EVDO_A" | "EVDO_B" | "HSDPA" | "HSUPA" | "HSPA" | "HSPAP"
        | "EHRPD" | "TD_SCDMA" => 3,
        "LTE" | "LTE_CA" | "IWLAN" => 4,
        "NR" => 7,
        _ => 0,
    }
}

// ========================================
// 离线桥接：捕获的 dump 文件
// ========================================

/// 基于已捕获的 dumpsys 文本的桥接实现
///
/// 用于在任意平台上分析设备导出的快照（`check --from-dump`），
/// 也是测试快照解析的入口。dump 中不携带系统代理状态，一律视为未配置。
pub struct DumpBridge {
    snapshot: ConnectivitySnapshot,
    sdk: u32,
}

impl DumpBridge {
    pub fn new(text: &str, sdk: u32) -> Self {
        Self {
            snapshot: ConnectivitySnapshot::parse(text),
            sdk,
        }
    }
}

impl NetworkBridge for DumpBridge {
    fn sdk_version(&self) -> Result<u32> {
        Ok(self.sdk)
    }

    fn active_networks(&self) -> Result<Vec<NetworkHandle>> {
        Ok(self
            .snapshot
            .networks
            .iter()
            .map(|n| NetworkHandle(n.id))
            .collect())
    }

    fn capabilities(&self, network: NetworkHandle) -> Result<Option<NetworkCapabilities>> {
        Ok(self
            .snapshot
            .network(network.0)
            .map(|n| NetworkCapabilities::new(n.transports.clone())))
    }

    fn link_properties(&self, network: NetworkHandle) -> Result<Option<String>> {
        Ok(self
            .snapshot
            .network(network.0)
            .and_then(|n| n.link_properties.clone()))
    }

    fn active_info(&self) -> Result<Option<ActiveNetworkInfo>> {
        Ok(self.snapshot.active.clone())
    }

    fn proxy_configured(&self) -> Result<bool> {
        Ok(false)
    }

    fn network_type_code(&self) -> Result<i64> {
        Ok(self.snapshot.active.as_ref().map_or(0, type_code_for))
    }
}
