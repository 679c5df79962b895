//! 剪贴板内容分类器
//!
//! # 设计思路
//!
//! 根据剪贴板内容形态（文本 / 图片 / 视频）与文本内容，给出按优先级排列的
//! 推荐工具列表。分类器是注册表快照与请求的纯函数，没有内部状态。
//!
//! # 排序规则（文本内容非空时）
//!
//! 1. 检测器命中的工具，按注册顺序排在最前；
//! 2. 其后是支持文本、且没有检测器的通用工具（检测器未命中的专用工具被排除）；
//! 3. 最后追加兜底工具，即使它已经出现过（兼容既有行为，可通过
//!    `dedupe_fallback` 关闭）。
//!
//! 图片 / 视频不做内容检查，直接返回支持该类型的工具；
//! 空文本返回全部支持文本的工具，不做过滤。

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::registry::ToolRegistry;
use crate::settings::Settings;
use crate::tools::{ClipboardContentType, ToolId};

/// 一次分类请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRequest {
    #[serde(rename = "type")]
    pub content_type: ClipboardContentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ClassificationRequest {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content_type: ClipboardContentType::String,
            content: Some(content.into()),
        }
    }

    pub fn of_type(content_type: ClipboardContentType) -> Self {
        Self {
            content_type,
            content: None,
        }
    }
}

/// 按优先级排列的推荐工具
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClassificationResult(Vec<ToolId>);

impl ClassificationResult {
    pub fn tools(&self) -> &[ToolId] {
        &self.0
    }

    pub fn contains(&self, id: &ToolId) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolId> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<ToolId> {
        self.0
    }

    /// 追加（已存在则跳过）
    fn push_unique(&mut self, id: &ToolId) {
        if !self.0.contains(id) {
            self.0.push(id.clone());
        }
    }
}

/// 分类器选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierOptions {
    /// 追加在文本推荐列表末尾的兜底工具
    pub fallback: Option<ToolId>,
    /// 兜底工具已出现时，是否移除前面的那一次
    pub dedupe_fallback: bool,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            fallback: Some(ToolId::DEFAULT_FALLBACK),
            dedupe_fallback: false,
        }
    }
}

impl From<&Settings> for ClassifierOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            fallback: settings.fallback_tool.clone(),
            dedupe_fallback: settings.dedupe_fallback,
        }
    }
}

/// 内容分类器：持有注册表的只读引用
#[derive(Debug, Clone)]
pub struct ContentClassifier<'a> {
    registry: &'a ToolRegistry,
    options: ClassifierOptions,
}

impl<'a> ContentClassifier<'a> {
    pub fn new(registry: &'a ToolRegistry) -> Self {
        Self::with_options(registry, ClassifierOptions::default())
    }

    pub fn with_options(registry: &'a ToolRegistry, options: ClassifierOptions) -> Self {
        Self { registry, options }
    }

    pub fn options(&self) -> &ClassifierOptions {
        &self.options
    }

    /// 对请求进行分类
    ///
    /// # 返回
    /// - `Ok(ClassificationResult)`：推荐工具列表
    /// - `Err(AppError::InvalidArgument)`：请求缺失
    pub fn classify(
        &self,
        request: Option<&ClassificationRequest>,
    ) -> Result<ClassificationResult, AppError> {
        let request = request
            .ok_or_else(|| AppError::InvalidArgument("分类请求为空".to_string()))?;

        let result = match (request.content_type, request.content.as_deref()) {
            (ClipboardContentType::String, Some(content)) if !content.is_empty() => {
                self.classify_text(content)
            }
            (content_type, _) => self.compatible_tools(content_type),
        };

        log::trace!(
            "🔎 分类完成：类型={}，推荐={:?}",
            request.content_type,
            result.tools()
        );
        Ok(result)
    }

    /// 从 JSON 文本解析请求并分类；JSON `null` 视为请求缺失
    pub fn classify_json(&self, json: &str) -> Result<ClassificationResult, AppError> {
        let request: Option<ClassificationRequest> = serde_json::from_str(json)
            .map_err(|e| AppError::InvalidArgument(format!("解析分类请求失败: {}", e)))?;
        self.classify(request.as_ref())
    }

    /// 静态兼容表：支持该类型的全部工具（去重，保持注册顺序）
    fn compatible_tools(&self, content_type: ClipboardContentType) -> ClassificationResult {
        let mut result = ClassificationResult::default();
        for registration in self.registry.supporting(content_type) {
            result.push_unique(registration.id());
        }
        result
    }

    fn classify_text(&self, content: &str) -> ClassificationResult {
        let mut result = ClassificationResult::default();

        for registration in self.registry.supporting(ClipboardContentType::String) {
            if registration.detect(content) == Some(true) {
                result.push_unique(registration.id());
            }
        }

        for registration in self.registry.supporting(ClipboardContentType::String) {
            if !registration.has_detector() {
                result.push_unique(registration.id());
            }
        }

        if let Some(fallback) = self.fallback_for_text() {
            if self.options.dedupe_fallback {
                result.0.retain(|id| id != fallback);
            }
            result.0.push(fallback.clone());
        }

        result
    }

    /// 兜底工具必须已注册且支持文本，否则不追加
    fn fallback_for_text(&self) -> Option<&ToolId> {
        let fallback = self.options.fallback.as_ref()?;
        let supported = self
            .registry
            .supporting(ClipboardContentType::String)
            .any(|r| r.id() == fallback);
        if !supported {
            log::debug!("⚠️ 兜底工具 {} 未注册或不支持文本，已忽略", fallback);
            return None;
        }
        Some(fallback)
    }
}
