//! # net-status
//!
//! CLI 工具，报告设备当前的网络状态：系统代理、基础网络类型、VPN。
//!
//! ## 功能
//! - 读取系统代理配置（是否开启）
//! - 判定基础网络类型（WIFI / 2G~5G / 以太网 / VPN）
//! - 启发式 VPN 检测：
//!   - 网络能力集声明了 VPN 传输层
//!   - 链路属性中出现 tun / tap 隧道接口
//! - 结果以阻塞式模态对话框展示，附逐接口的明细
//!
//! ## 使用
//! ```bash
//! # 在 Android 设备上（adb shell / Termux）执行检查
//! net-status check
//!
//! # 纯文本输出，不进入终端 UI
//! net-status check --plain
//!
//! # JSON 格式输出
//! net-status check --json
//!
//! # 在任意平台上分析捕获的 dumpsys connectivity 输出
//! net-status check --from-dump connectivity.txt
//! ```

use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod bridge;
mod check;
mod dialog;
mod inspect;
mod report;

// ========================================
// CLI 参数定义
// ========================================

/// 设备网络状态检查工具
#[derive(Parser)]
#[command(name = "net-status")]
#[command(version = "0.1.0")]
#[command(about = "Report device network status: system proxy, network type, VPN")]
struct Cli {
    /// 子命令
    #[command(subcommand)]
    command: Commands,
}

/// 支持的子命令
#[derive(Subcommand)]
enum Commands {
    /// 检查当前网络状态并展示结果
    Check {
        /// JSON 格式输出（不弹对话框）
        #[arg(long)]
        json: bool,

        /// 纯文本输出，不进入终端 UI
        #[arg(long)]
        plain: bool,

        /// 读取捕获的 dumpsys connectivity 输出文件，而不是实时查询
        #[arg(long, value_name = "PATH")]
        from_dump: Option<String>,

        /// 配合 --from-dump 使用的平台 API 级别
        #[arg(long, value_name = "LEVEL", default_value_t = 29)]
        sdk: u32,

        /// 显示调试信息（原始检测结果等）
        #[arg(long)]
        debug: bool,
    },
}

// ========================================
// 主函数
// ========================================

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            json,
            plain,
            from_dump,
            sdk,
            debug,
        } => {
            init_logging(debug);
            run_check_command(json, plain, from_dump, sdk)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// 初始化日志；--debug 提升到 debug 级别
fn init_logging(debug: bool) {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// 执行检查命令
fn run_check_command(json: bool, plain: bool, from_dump: Option<String>, sdk: u32) -> Result<()> {
    // 桥接优先级: 1. --from-dump 指定的快照  2. 当前平台的实时桥接
    let bridge: Option<Box<dyn bridge::NetworkBridge>> = match from_dump {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read dump file: {path}"))?;
            Some(Box::new(bridge::DumpBridge::new(&text, sdk)))
        }
        None => bridge::platform_bridge(),
    };

    let presenter = dialog::default_presenter(plain || json);

    check::run_check(bridge.as_deref(), presenter.as_ref(), json)
}
