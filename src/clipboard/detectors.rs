//! 内容特征检测模块
//!
//! # 设计思路
//!
//! 剪贴板中的文本可能是 JSON、链接、Base64、UUID、HTML 片段或助记词。
//! 每个检测器都是纯函数 `&str -> bool`，只回答"像不像"，不会报错：
//! 畸形内容（如截断的 JSON）只会让对应检测器返回 `false`。
//!
//! # 实现思路
//!
//! - 正则通过 `once_cell::sync::Lazy` 在首次调用时编译，后续零成本复用。
//! - 便宜的形状检查在前，昂贵的检查（JSON 解析）在后，形状不符直接短路。
//! - 只有 JSON 检测会去除首尾空白，其余检测器按原文匹配。
//! - Base64 额外要求长度 ≥ 8 且能被 4 整除，避免把短单词误判为 Base64。

use once_cell::sync::Lazy;
use regex::Regex;

static JSON_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?s:\{.*\}|\[.*\])$").expect("JSON 形状正则无效"));

static URL_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:https?://|www\.)\S+").expect("URL 正则无效"));

static BASE64_ALPHABET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9+/=]+$").expect("Base64 正则无效"));

static UUID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[1-7][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
        .expect("UUID 正则无效")
});

static HTML_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(?:[A-Za-z]+|#[0-9]+);").expect("HTML 实体正则无效"));

static HTML_TAG_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?[A-Za-z][A-Za-z0-9]*(?:\s[^<>]*)?/?>").expect("HTML 标签正则无效"));

/// 常见标签：div, span, p, a, img, table, tr, td, th, ul, ol, li, h1–h6
static HTML_COMMON_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</?(?:div|span|p|a|img|table|tr|td|th|ul|ol|li|h[1-6])(?:[\s/>])")
        .expect("HTML 常见标签正则无效")
});

const URL_MIN_LEN: usize = 10;
const BASE64_MIN_LEN: usize = 8;
const MNEMONIC_WORD_COUNTS: [usize; 2] = [12, 24];
const MNEMONIC_MIN_WORD_LEN: usize = 3;

/// 判断文本是否为合法的 JSON 对象 / 数组
///
/// 两个条件都要满足：
/// 1. 去除首尾空白后以 `{`/`[` 开头、以对应的 `}`/`]` 结尾
/// 2. 能被 `serde_json` 完整解析
pub fn is_json(text: &str) -> bool {
    let trimmed = text.trim();
    if !JSON_SHAPE.is_match(trimmed) {
        return false;
    }
    serde_json::from_str::<serde_json::Value>(trimmed).is_ok()
}

/// 判断文本是否为链接
///
/// 需要 `http(s)://` 或 `www.` 前缀、长度 ≥ 10、包含 `.`、且不含空格。
pub fn is_url(text: &str) -> bool {
    text.chars().count() >= URL_MIN_LEN
        && text.contains('.')
        && !text.contains(' ')
        && URL_PREFIX.is_match(text)
}

/// 判断文本是否为 Base64 编码（整段文本都必须在字母表内，空白也不行）
pub fn is_base64(text: &str) -> bool {
    text.len() >= BASE64_MIN_LEN
        && text.len() % 4 == 0
        && BASE64_ALPHABET.is_match(text)
}

/// 判断文本是否为标准格式的 UUID（版本 1–7，变体 8/9/a/b）
pub fn is_uuid(text: &str) -> bool {
    UUID_PATTERN.is_match(text)
}

/// 判断文本是否包含 HTML
///
/// 含有实体引用（`&amp;` / `&#39;`）即视为 HTML；
/// 否则需要同时满足"存在标签形状"与"包含常见标签名"。
pub fn is_html(text: &str) -> bool {
    if HTML_ENTITY.is_match(text) {
        return true;
    }
    HTML_TAG_SHAPE.is_match(text) && HTML_COMMON_TAG.is_match(text)
}

/// 判断文本是否为助记词（12 或 24 个小写单词，每个至少 3 个字母）
pub fn is_mnemonic_phrase(text: &str) -> bool {
    let words: Vec<&str> = text.split_whitespace().collect();
    if !MNEMONIC_WORD_COUNTS.contains(&words.len()) {
        return false;
    }
    words.iter().all(|word| {
        word.len() >= MNEMONIC_MIN_WORD_LEN && word.bytes().all(|b| b.is_ascii_lowercase())
    })
}
