//! # 剪贴板工具箱 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 命令行 (clap, main.rs)                    │
//! │  classify · request · clipboard · watch · tools · open   │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↕ Result<T, AppError>
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕              库 (Rust)                            │
//! │                                                          │
//! │  ┌─ error ────── AppError (统一错误类型)                  │
//! │  ├─ settings ─── settings.json（兜底工具 / 监听窗口）     │
//! │  ├─ tools ────── ToolId · ClipboardContentType           │
//! │  ├─ registry ─── 只增不减的工具目录 + 检测器              │
//! │  ├─ classifier ─ 请求 → 按优先级排列的推荐工具            │
//! │  ├─ clipboard ── 快照读取 (arboard)                       │
//! │  │   ├─ detectors  JSON/URL/Base64/UUID/HTML/助记词       │
//! │  │   └─ listener   变化监听 (clipboard-master) + 合并     │
//! │  └─ handoff ──── 一次性交接槽                             │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError` |
//! | [`settings`] | 设置文件的读取、默认值回退与保存 |
//! | [`tools`] | 工具标识与剪贴板内容形态 |
//! | [`registry`] | 工具注册、内置工具目录 |
//! | [`classifier`] | 内容分类与推荐排序 |
//! | [`clipboard`] | 剪贴板快照、内容检测、变化监听 |
//! | [`handoff`] | 把剪贴板内容交给选中的工具 |
//!
//! ## 使用示例
//!
//! ```
//! use clipboard_toolbox::classifier::{ClassificationRequest, ContentClassifier};
//! use clipboard_toolbox::registry::ToolRegistry;
//! use clipboard_toolbox::tools::ToolId;
//!
//! let registry = ToolRegistry::with_builtin_tools();
//! let classifier = ContentClassifier::new(&registry);
//! let result = classifier
//!     .classify(Some(&ClassificationRequest::text(r#"{"a":1}"#)))
//!     .unwrap();
//! assert_eq!(result.tools()[0], ToolId::JSON_FORMATTER);
//! ```

pub mod error;
pub mod classifier;
pub mod clipboard;
pub mod handoff;
pub mod registry;
pub mod settings;
pub mod tools;
