//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `AppError` 枚举，分类器、剪贴板读取、设置持久化与命令行入口
//! 共用同一套错误类型，避免各处零散的 `.map_err(|e| e.to_string())`。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `std::io::Error` 提供 `From` 转换，`?` 直接透传。
//! - 实现 `Serialize` 将错误序列化为字符串，`--json` 输出时结构一致。
//!
//! 注意：检测器"不匹配"永远不是错误，只会让对应工具不进入推荐列表。

use serde::Serialize;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 请求缺失或无法解析（唯一会让分类调用失败的情况）
    #[error("无效参数: {0}")]
    InvalidArgument(String),

    /// 剪贴板读写操作失败
    #[error("剪贴板操作失败: {0}")]
    Clipboard(String),

    /// 设置文件序列化 / 写入失败
    #[error("设置错误: {0}")]
    Settings(String),

    /// JSON 序列化 / 反序列化失败（命令行输出、交接槽内容）
    #[error("序列化失败: {0}")]
    Serialization(String),

    /// 指定的工具未注册或不在当前推荐列表中
    #[error("未知工具: {0}")]
    UnknownTool(String),

    /// 文件系统 / 标准输入输出错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
