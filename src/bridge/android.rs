//! # Android 平台桥接
//!
//! 通过平台自带命令行工具读取连接子系统状态：
//! - `getprop ro.build.version.sdk`: 平台 API 级别
//! - `settings get global http_proxy`: 系统 HTTP 代理
//! - `dumpsys connectivity`: 网络枚举、能力集、链路属性、活动网络
//!
//! dumpsys 输出较大且一次包含所有网络，因此只执行一次并缓存快照；
//! 其余 trait 方法在快照上做查找。命令执行失败以错误返回，由上层
//! 降级成诊断信息或错误对话框。

use std::cell::OnceCell;
use std::process::Command;

use anyhow::{anyhow, Context, Result};

use super::snapshot::{type_code_for, ConnectivitySnapshot};
use super::types::{
    ActiveNetworkInfo, NetworkBridge, NetworkCapabilities, NetworkHandle,
};

// ========================================
// Android 桥接实现
// ========================================

/// 基于平台命令行工具的实时桥接
pub struct AndroidBridge {
    /// dumpsys 快照缓存；错误以字符串缓存，避免重复执行失败的命令
    snapshot: OnceCell<Result<ConnectivitySnapshot, String>>,
}

impl AndroidBridge {
    pub fn new() -> Self {
        Self {
            snapshot: OnceCell::new(),
        }
    }

    /// 取得（必要时先构建）连接快照
    fn snapshot(&self) -> Result<&ConnectivitySnapshot> {
        let cached = self.snapshot.get_or_init(|| {
            run_command("dumpsys", &["connectivity"])
                .map(|text| ConnectivitySnapshot::parse(&text))
                .map_err(|e| format!("{e:#}"))
        });

        match cached {
            Ok(snapshot) => Ok(snapshot),
            Err(message) => Err(anyhow!("{message}")),
        }
    }
}

impl Default for AndroidBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkBridge for AndroidBridge {
    fn sdk_version(&self) -> Result<u32> {
        let output = run_command("getprop", &["ro.build.version.sdk"])?;
        output
            .trim()
            .parse()
            .with_context(|| format!("Unexpected SDK version output: {:?}", output.trim()))
    }

    fn active_networks(&self) -> Result<Vec<NetworkHandle>> {
        Ok(self
            .snapshot()?
            .networks
            .iter()
            .map(|n| NetworkHandle(n.id))
            .collect())
    }

    fn capabilities(&self, network: NetworkHandle) -> Result<Option<NetworkCapabilities>> {
        Ok(self
            .snapshot()?
            .network(network.0)
            .map(|n| NetworkCapabilities::new(n.transports.clone())))
    }

    fn link_properties(&self, network: NetworkHandle) -> Result<Option<String>> {
        Ok(self
            .snapshot()?
            .network(network.0)
            .and_then(|n| n.link_properties.clone()))
    }

    fn active_info(&self) -> Result<Option<ActiveNetworkInfo>> {
        Ok(self.snapshot()?.active.clone())
    }

    fn proxy_configured(&self) -> Result<bool> {
        let output = run_command("settings", &["get", "global", "http_proxy"])?;
        Ok(parse_proxy_setting(&output))
    }

    fn network_type_code(&self) -> Result<i64> {
        Ok(self.snapshot()?.active.as_ref().map_or(0, type_code_for))
    }
}

// ========================================
// 辅助函数
// ========================================

/// 执行外部命令并返回 stdout 文本
fn run_command(program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("Failed to execute {program}"))?;

    if !output.status.success() {
        anyhow::bail!("{} exited with status: {}", program, output.status);
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// 解释 `settings get global http_proxy` 的输出
///
/// 未配置时输出为 `null` 或 `:0`（清除代理后残留的形式）。
pub fn parse_proxy_setting(output: &str) -> bool {
    let value = output.trim();
    !(value.is_empty() || value == "null" || value == ":0")
}

// ========================================
// 测试模块
// ========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_proxy_setting() {
        assert!(!parse_proxy_setting("null\n"));
        assert!(!parse_proxy_setting(":0\n"));
        assert!(!parse_proxy_setting("  \n"));
        assert!(parse_proxy_setting("192.168.1.1:8080\n"));
        assert!(parse_proxy_setting("proxy.corp.example:3128"));
    }
}
