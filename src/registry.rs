//! 工具注册表
//!
//! # 设计思路
//!
//! 注册表是一个只增不减的工具目录：进程启动时构造一次，之后以只读引用的形式
//! 注入给分类器（以及监听线程）。不使用全局单例，测试时每个用例新建一个即可。
//!
//! # 实现思路
//!
//! - `ToolRegistration` 构造后不可变，检测器以 `Arc<dyn Fn>` 形式随注册项保存。
//! - 重复 id 不做去重，两个注册项都会保留在 `list()` 中。
//! - 注册顺序只影响并列项的展示顺序，不影响正确性。

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::clipboard::detectors;
use crate::tools::{ClipboardContentType, ToolId};

/// 内容检测器：判断一段文本是否适合某个工具
pub type Detector = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// 单个工具的注册信息
#[derive(Clone)]
pub struct ToolRegistration {
    id: ToolId,
    supported_types: BTreeSet<ClipboardContentType>,
    detect: Option<Detector>,
}

impl ToolRegistration {
    pub fn new(
        id: ToolId,
        supported_types: impl IntoIterator<Item = ClipboardContentType>,
    ) -> Self {
        Self {
            id,
            supported_types: supported_types.into_iter().collect(),
            detect: None,
        }
    }

    /// 附加内容检测器
    pub fn with_detector<F>(mut self, detect: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.detect = Some(Arc::new(detect));
        self
    }

    pub fn id(&self) -> &ToolId {
        &self.id
    }

    pub fn supported_types(&self) -> &BTreeSet<ClipboardContentType> {
        &self.supported_types
    }

    pub fn supports(&self, content_type: ClipboardContentType) -> bool {
        self.supported_types.contains(&content_type)
    }

    pub fn has_detector(&self) -> bool {
        self.detect.is_some()
    }

    /// 运行检测器；没有检测器时返回 `None`
    pub fn detect(&self, content: &str) -> Option<bool> {
        self.detect.as_ref().map(|detect| detect(content))
    }
}

impl fmt::Debug for ToolRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistration")
            .field("id", &self.id)
            .field("supported_types", &self.supported_types)
            .field("has_detector", &self.detect.is_some())
            .finish()
    }
}

/// 只增不减的工具目录
#[derive(Debug, Default, Clone)]
pub struct ToolRegistry {
    registrations: Vec<ToolRegistration>,
}

impl ToolRegistry {
    /// 空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置全部内置工具的注册表
    ///
    /// 注册顺序即"声明顺序"：带检测器的工具按 JSON、URL、Base64、UUID、HTML、
    /// 助记词排列，其后是无检测器的通用工具。
    pub fn with_builtin_tools() -> Self {
        use ClipboardContentType::{Photo, String, Video};

        let mut registry = Self::new();
        registry.register(
            ToolRegistration::new(ToolId::JSON_FORMATTER, [String]).with_detector(detectors::is_json),
        );
        registry.register(
            ToolRegistration::new(ToolId::URL_ENCODER, [String]).with_detector(detectors::is_url),
        );
        registry.register(
            ToolRegistration::new(ToolId::BASE64_CODEC, [String, Photo])
                .with_detector(detectors::is_base64),
        );
        registry.register(
            ToolRegistration::new(ToolId::UUID_GENERATOR, [String]).with_detector(detectors::is_uuid),
        );
        registry.register(
            ToolRegistration::new(ToolId::HTML_ENTITY_CODEC, [String])
                .with_detector(detectors::is_html),
        );
        registry.register(
            ToolRegistration::new(ToolId::MNEMONIC_PHRASE, [String])
                .with_detector(detectors::is_mnemonic_phrase),
        );
        registry.register(ToolRegistration::new(ToolId::HASH_GENERATOR, [String, Photo, Video]));
        registry.register(ToolRegistration::new(ToolId::UNIT_CONVERTER, [String]));
        registry.register(ToolRegistration::new(ToolId::STEGANOGRAPHY, [String, Photo]));
        registry.register(ToolRegistration::new(ToolId::FILE_GENERATOR, [String]));
        registry.register(ToolRegistration::new(ToolId::WATERMARK, [Photo, Video]));
        registry
    }

    /// 追加一个注册项（不校验重复 id）
    pub fn register(&mut self, registration: ToolRegistration) {
        log::debug!(
            "🧰 注册工具 {}（类型: {:?}，检测器: {}）",
            registration.id,
            registration.supported_types,
            registration.has_detector()
        );
        self.registrations.push(registration);
    }

    /// 当前全部注册项（按注册顺序）
    pub fn list(&self) -> &[ToolRegistration] {
        &self.registrations
    }

    /// 按 id 查找第一个匹配的注册项
    pub fn get(&self, id: &ToolId) -> Option<&ToolRegistration> {
        self.registrations.iter().find(|r| &r.id == id)
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// 支持指定类型的注册项，按注册顺序
    pub fn supporting(
        &self,
        content_type: ClipboardContentType,
    ) -> impl Iterator<Item = &ToolRegistration> {
        self.registrations
            .iter()
            .filter(move |r| r.supports(content_type))
    }
}
