//! # 平台桥接抽象
//!
//! 原生连接子系统的能力抽象：网络句柄、传输层能力集、活动网络信息，
//! 以及统一的 `NetworkBridge` trait。每个目标平台提供一个具体实现，
//! 其余平台不提供桥接（调用方直接提示功能不可用）。

use std::fmt;

use anyhow::Result;

/// 支持多网络枚举 API 的最低平台版本 (Android 6.0)
pub const MULTI_NETWORK_SDK: u32 = 23;

// ========================================
// 网络句柄
// ========================================

/// 连接子系统内的单个网络的不透明标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkHandle(pub u64);

impl fmt::Display for NetworkHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "network{{{}}}", self.0)
    }
}

// ========================================
// 传输层能力
// ========================================

/// 网络能力集中声明的传输层类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Cellular,
    Wifi,
    Bluetooth,
    Ethernet,
    Vpn,
    WifiAware,
    Lowpan,
    Usb,
    /// 无法识别的传输层名称
    Unknown,
}

impl Transport {
    /// 从能力集字符串中的传输层名称解析
    ///
    /// 未识别的名称归入 `Unknown`，不报错。
    pub fn parse(token: &str) -> Transport {
        match token.trim().to_ascii_uppercase().as_str() {
            "CELLULAR" => Transport::Cellular,
            "WIFI" => Transport::Wifi,
            "BLUETOOTH" => Transport::Bluetooth,
            "ETHERNET" => Transport::Ethernet,
            "VPN" => Transport::Vpn,
            "WIFI_AWARE" => Transport::WifiAware,
            "LOWPAN" => Transport::Lowpan,
            "USB" => Transport::Usb,
            _ => Transport::Unknown,
        }
    }
}

/// 单个网络声明的传输层能力集
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkCapabilities {
    transports: Vec<Transport>,
}

impl NetworkCapabilities {
    pub fn new(transports: Vec<Transport>) -> Self {
        Self { transports }
    }

    /// 该网络是否声明了指定传输层
    pub fn has_transport(&self, transport: Transport) -> bool {
        self.transports.contains(&transport)
    }
}

// ========================================
// 活动网络信息
// ========================================

/// 当前活动网络的可读描述（旧式单网络查询的返回值）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveNetworkInfo {
    /// 网络类型名称，如 "WIFI"、"MOBILE"
    pub type_name: String,
    /// 子类型名称，如 "LTE"；可能为空串
    pub subtype_name: String,
    /// 额外信息（SSID、APN 等），平台未提供时为 None
    pub extra_info: Option<String>,
}

// ========================================
// NetworkBridge trait
// ========================================

/// 平台连接子系统的窄接口
///
/// 所有查询都是同步且可失败的；调用方（检测器/报告层）负责把失败
/// 降级成诊断信息，而不是让单次失败中断整个检测。
pub trait NetworkBridge {
    /// 平台 API 级别
    fn sdk_version(&self) -> Result<u32>;

    /// 枚举当前已知的所有网络
    fn active_networks(&self) -> Result<Vec<NetworkHandle>>;

    /// 查询指定网络的传输层能力集；网络已消失时返回 None
    fn capabilities(&self, network: NetworkHandle) -> Result<Option<NetworkCapabilities>>;

    /// 查询指定网络的链路属性的字符串化形式；无链路属性时返回 None
    ///
    /// 返回的是平台对象的原样 toString 输出，内嵌
    /// `InterfaceName:` / `LinkAddresses: [..]` 等可选标签字段，
    /// 报告层按字段独立提取，不假定固定格式。
    fn link_properties(&self, network: NetworkHandle) -> Result<Option<String>>;

    /// 查询当前活动网络的可读信息；无活动网络时返回 None
    fn active_info(&self) -> Result<Option<ActiveNetworkInfo>>;

    /// 系统是否配置了 HTTP 代理
    fn proxy_configured(&self) -> Result<bool>;

    /// 当前基础网络类型编号（0=未知 1=WIFI 2=2G 3=3G 4=4G 5=以太网 6=VPN 7=5G）
    fn network_type_code(&self) -> Result<i64>;
}
