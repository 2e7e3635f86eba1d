//! # 报告模块
//!
//! 网络类型名称查表、链路属性字符串解析和最终报告文本的组装。

pub mod compose;
pub mod linkprops;
pub mod types;

// 重新导出常用类型
pub use compose::compose;
pub use types::network_type_name;
