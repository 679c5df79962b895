//! 剪贴板访问模块
//!
//! # 设计思路
//!
//! 统一管理与系统剪贴板相关的能力：
//! - **快照**：读取当前剪贴板的文本 / 图片可用性，生成 `ClipboardSnapshot`
//! - **检测**：`detectors` 子模块提供纯文本特征检测
//! - **监听**：`listener` 子模块通过 `clipboard-master` 监听剪贴板变化
//!
//! # 实现思路
//!
//! - `ClipboardReader` trait 抽象系统剪贴板，生产环境使用 `arboard`，
//!   测试中使用内存实现。
//! - "内容不可用"不是错误，只代表该格式不存在；只有打开剪贴板失败等
//!   真正的系统错误才会返回 `AppError::Clipboard`。
//! - 快照只负责判断内容形态（文本 / 图片），语义判断交给分类器。

pub mod detectors;
pub mod listener;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::classifier::ClassificationRequest;
use crate::error::AppError;
use crate::tools::ClipboardContentType;

pub const FORMAT_TEXT: &str = "text/plain";
pub const FORMAT_IMAGE: &str = "image/rgba";

/// 系统剪贴板读取接口
pub trait ClipboardReader {
    /// 读取文本；剪贴板中没有文本时返回 `Ok(None)`
    fn read_text(&mut self) -> Result<Option<String>, AppError>;

    /// 剪贴板中是否有图片
    fn has_image(&mut self) -> Result<bool, AppError>;
}

/// 基于 `arboard` 的系统剪贴板读取器
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn open() -> Result<Self, AppError> {
        let inner = arboard::Clipboard::new()
            .map_err(|e| AppError::Clipboard(format!("打开剪贴板失败: {}", e)))?;
        Ok(Self { inner })
    }
}

impl ClipboardReader for SystemClipboard {
    fn read_text(&mut self) -> Result<Option<String>, AppError> {
        match self.inner.get_text() {
            Ok(text) => Ok(Some(text)),
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => Err(AppError::Clipboard(format!("读取剪贴板文本失败: {}", e))),
        }
    }

    fn has_image(&mut self) -> Result<bool, AppError> {
        match self.inner.get_image() {
            Ok(image) => {
                log::trace!("🖼️ 剪贴板包含图片 {}x{}", image.width, image.height);
                Ok(true)
            }
            Err(arboard::Error::ContentNotAvailable) => Ok(false),
            Err(e) => Err(AppError::Clipboard(format!("读取剪贴板图片失败: {}", e))),
        }
    }
}

/// 某一时刻的剪贴板快照
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipboardSnapshot {
    pub has_text: bool,
    pub has_image: bool,
    pub available_formats: Vec<String>,
    pub text: Option<String>,
    pub captured_at: DateTime<Local>,
}

impl ClipboardSnapshot {
    pub fn read_text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// 内容形态：非空文本优先，其次图片；剪贴板为空时返回 `None`
    ///
    /// 浏览器复制时常常同时放入文本和图片，此时以文本为准。
    pub fn content_type(&self) -> Option<ClipboardContentType> {
        if self.read_text().is_some_and(|text| !text.is_empty()) {
            Some(ClipboardContentType::String)
        } else if self.has_image {
            Some(ClipboardContentType::Photo)
        } else {
            None
        }
    }

    /// 转换为分类请求；图片请求不携带文本
    pub fn to_request(&self) -> Option<ClassificationRequest> {
        match self.content_type()? {
            ClipboardContentType::String => {
                self.text.as_ref().map(|text| ClassificationRequest::text(text.clone()))
            }
            other => Some(ClassificationRequest::of_type(other)),
        }
    }
}

/// 读取剪贴板快照
pub fn capture_snapshot<R: ClipboardReader + ?Sized>(
    reader: &mut R,
) -> Result<ClipboardSnapshot, AppError> {
    let text = reader.read_text()?;
    let has_image = reader.has_image()?;

    let mut available_formats = Vec::new();
    if text.is_some() {
        available_formats.push(FORMAT_TEXT.to_string());
    }
    if has_image {
        available_formats.push(FORMAT_IMAGE.to_string());
    }

    log::debug!(
        "📋 剪贴板快照：文本={}，图片={}",
        text.as_ref().map(|t| t.chars().count()).unwrap_or(0),
        has_image
    );

    Ok(ClipboardSnapshot {
        has_text: text.is_some(),
        has_image,
        available_formats,
        text,
        captured_at: Local::now(),
    })
}


#[cfg(test)]
mod tests {
    use super::testing::MemoryClipboard;
    use super::*;

    #[test]
    fn text_snapshot_becomes_string_request() {
        let mut reader = MemoryClipboard {
            text: Some("{\"a\":1}".to_string()),
            ..Default::default()
        };
        let snapshot = capture_snapshot(&mut reader).expect("capture");
        assert_eq!(snapshot.available_formats, vec![FORMAT_TEXT.to_string()]);
        assert_eq!(snapshot.to_request(), Some(ClassificationRequest::text("{\"a\":1}")));
    }

    #[test]
    fn text_wins_over_image() {
        let mut reader = MemoryClipboard {
            text: Some("fn main() {}".to_string()),
            image: true,
            ..Default::default()
        };
        let snapshot = capture_snapshot(&mut reader).expect("capture");
        assert_eq!(snapshot.available_formats.len(), 2);
        assert_eq!(snapshot.content_type(), Some(ClipboardContentType::String));
    }

    #[test]
    fn image_only_snapshot_becomes_photo_request() {
        let mut reader = MemoryClipboard {
            text: Some(String::new()),
            image: true,
            ..Default::default()
        };
        let snapshot = capture_snapshot(&mut reader).expect("capture");
        assert_eq!(
            snapshot.to_request(),
            Some(ClassificationRequest::of_type(ClipboardContentType::Photo))
        );
    }

    #[test]
    fn empty_clipboard_has_no_request() {
        let mut reader = MemoryClipboard::default();
        let snapshot = capture_snapshot(&mut reader).expect("capture");
        assert!(snapshot.available_formats.is_empty());
        assert_eq!(snapshot.to_request(), None);
    }

    #[test]
    fn reader_failure_is_clipboard_error() {
        let mut reader = MemoryClipboard {
            broken: true,
            ..Default::default()
        };
        assert!(matches!(capture_snapshot(&mut reader), Err(AppError::Clipboard(_))));
    }
}
