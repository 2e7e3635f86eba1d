//! # 平台桥接模块
//!
//! 连接子系统的能力抽象和各平台的具体实现。Android 通过平台命令行
//! 工具取数；其他平台没有桥接，上层直接提示功能不可用。

pub mod android;
pub mod snapshot;
pub mod types;

// 重新导出常用类型，方便其他模块使用
pub use android::AndroidBridge;
pub use snapshot::{ConnectivitySnapshot, DumpBridge};
pub use types::{
    ActiveNetworkInfo, NetworkBridge, NetworkCapabilities, NetworkHandle, Transport,
    MULTI_NETWORK_SDK,
};

/// 选择当前平台的桥接实现
///
/// 仅 Android 返回实时桥接；其余平台返回 None，调用方据此展示
/// "功能不可用" 对话框，不发起任何系统查询。
pub fn platform_bridge() -> Option<Box<dyn NetworkBridge>> {
    if cfg!(target_os = "android") {
        Some(Box::new(AndroidBridge::new()))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_bridge_on_host() {
        // 非 Android 宿主上必须不产生桥接
        if !cfg!(target_os = "android") {
            assert!(platform_bridge().is_none());
        }
    }
}
