//! 工具标识与剪贴板内容形态
//!
//! `ToolId` 是不透明的字符串标识，内置工具以常量形式给出，
//! 自定义工具可以使用任意字符串注册。

use std::borrow::Cow;
use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// 工具标识（如 `base64-codec`、`json-formatter`）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolId(Cow<'static, str>);

impl ToolId {
    pub const JSON_FORMATTER: ToolId = ToolId::from_static("json-formatter");
    pub const URL_ENCODER: ToolId = ToolId::from_static("url-encoder");
    pub const BASE64_CODEC: ToolId = ToolId::from_static("base64-codec");
    pub const UUID_GENERATOR: ToolId = ToolId::from_static("uuid-generator");
    pub const HTML_ENTITY_CODEC: ToolId = ToolId::from_static("html-entity-codec");
    pub const MNEMONIC_PHRASE: ToolId = ToolId::from_static("mnemonic-phrase");
    pub const HASH_GENERATOR: ToolId = ToolId::from_static("hash-generator");
    pub const UNIT_CONVERTER: ToolId = ToolId::from_static("unit-converter");
    pub const STEGANOGRAPHY: ToolId = ToolId::from_static("steganography");
    pub const FILE_GENERATOR: ToolId = ToolId::from_static("file-generator");
    pub const WATERMARK: ToolId = ToolId::from_static("watermark");

    /// 默认兜底工具：接受任意文本的通用工具
    pub const DEFAULT_FALLBACK: ToolId = ToolId::HASH_GENERATOR;

    pub const fn from_static(id: &'static str) -> Self {
        ToolId(Cow::Borrowed(id))
    }

    pub fn new(id: impl Into<String>) -> Self {
        ToolId(Cow::Owned(id.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ToolId {
    fn from(id: &str) -> Self {
        ToolId::new(id)
    }
}

/// 剪贴板载荷的形态（由系统剪贴板决定，而非内容语义）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipboardContentType {
    String,
    Photo,
    Video,
}

impl ClipboardContentType {
    pub const ALL: [ClipboardContentType; 3] = [
        ClipboardContentType::String,
        ClipboardContentType::Photo,
        ClipboardContentType::Video,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClipboardContentType::String => "string",
            ClipboardContentType::Photo => "photo",
            ClipboardContentType::Video => "video",
        }
    }
}

impl Display for ClipboardContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClipboardContentType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(ClipboardContentType::String),
            "photo" => Ok(ClipboardContentType::Photo),
            "video" => Ok(ClipboardContentType::Video),
            other => Err(AppError::InvalidArgument(format!(
                "未知的剪贴板内容类型 '{}'（可选: string / photo / video）",
                other
            ))),
        }
    }
}
