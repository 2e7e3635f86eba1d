//! # 检查编排模块
//!
//! 这个模块是核心业务流程所在，负责：
//! 1. 查询系统代理状态和基础网络类型
//! 2. 执行 VPN 状态检测
//! 3. 组装报告文本并弹出模态对话框
//!
//! ## 失败策略
//! - 没有平台桥接（非 Android 且未提供 dump）：固定的"功能不可用"
//!   对话框，不发起任何查询
//! - 查询或组装过程中的任何错误：替换为错误对话框，内容带上错误信息，
//!   用户永远不会看到崩溃

use anyhow::{Context, Result};
use serde::Serialize;

use crate::bridge::NetworkBridge;
use crate::dialog::{Modal, Presenter};
use crate::inspect;
use crate::report;

/// 结果对话框标题
const RESULT_TITLE: &str = "Network Check Result";
/// 失败对话框标题
const FAILURE_TITLE: &str = "Check Failed";
/// 平台不支持时的提示
const UNAVAILABLE_TITLE: &str = "Notice";
const UNAVAILABLE_TEXT: &str = "This feature is only available on Android devices.";

// ========================================
// 结构化报告（--json 输出）
// ========================================

/// 一次检查的结构化结果
#[derive(Debug, Serialize)]
pub struct CheckReport {
    /// 系统代理是否开启
    pub proxy_enabled: bool,
    /// 基础网络类型编号
    pub network_type_code: i64,
    /// 基础网络类型名称
    pub network_type: String,
    /// VPN 是否判定为开启
    pub vpn_active: bool,
    /// 检测诊断信息
    pub details: Vec<String>,
}

// ========================================
// 检查入口
// ========================================

/// 执行一次完整检查并展示结果
///
/// `json` 模式下把结构化报告打印到 stdout（错误向上传播）；
/// 否则弹出模态对话框，任何错误都被兜底成错误对话框。
pub fn run_check(
    bridge: Option<&dyn NetworkBridge>,
    presenter: &dyn Presenter,
    json: bool,
) -> Result<()> {
    let Some(bridge) = bridge else {
        presenter.show(&Modal::info(UNAVAILABLE_TITLE, UNAVAILABLE_TEXT))?;
        return Ok(());
    };

    if json {
        let (report, _) = build_report(bridge)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match build_report(bridge) {
        Ok((_, text)) => presenter.show(&Modal::info(RESULT_TITLE, text))?,
        Err(e) => presenter.show(&Modal::info(
            FAILURE_TITLE,
            format!("Error while checking network settings: {e:#}"),
        ))?,
    }

    Ok(())
}

/// 查询、检测并组装报告
fn build_report(bridge: &dyn NetworkBridge) -> Result<(CheckReport, String)> {
    let proxy_enabled = bridge
        .proxy_configured()
        .context("Failed to query system proxy")?;
    let type_code = bridge
        .network_type_code()
        .context("Failed to query network type")?;

    let inspection = inspect::inspect(bridge);
    let raw = serde_json::to_string_pretty(&inspection)?;
    tracing::debug!(raw = %raw, "raw VPN inspection");

    let text = report::compose(proxy_enabled, type_code, &inspection);
    let report = CheckReport {
        proxy_enabled,
        network_type_code: type_code,
        network_type: report::network_type_name(type_code),
        vpn_active: inspection.is_vpn_active,
        details: inspection.details,
    };

    Ok((report, text))
}
