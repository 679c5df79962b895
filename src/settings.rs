//! 应用设置模块
//!
//! # 设计思路
//!
//! 设置以 JSON 文件保存（camelCase 键），默认位于
//! `<系统配置目录>/clipboard-toolbox/settings.json`，也可以通过命令行指定路径。
//!
//! # 实现思路
//!
//! - 文件缺失或内容损坏时回退到默认设置并记录警告，不阻断启动。
//! - 数值型参数在读取后统一钳制到合法区间。
//! - 写入失败返回 `AppError::Settings`。

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::tools::ToolId;

const SETTINGS_DIR_NAME: &str = "clipboard-toolbox";
const SETTINGS_FILE_NAME: &str = "settings.json";

pub const WATCH_QUIET_WINDOW_DEFAULT_MS: u64 = 80;
const WATCH_QUIET_WINDOW_MIN_MS: u64 = 20;
const WATCH_QUIET_WINDOW_MAX_MS: u64 = 5_000;

/// 用户可调整的设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// 文本推荐列表末尾的兜底工具；`null` 表示不追加
    pub fallback_tool: Option<ToolId>,
    /// 兜底工具已在列表中时，是否去掉前面那一次
    pub dedupe_fallback: bool,
    /// 监听模式下合并连续剪贴板事件的静默窗口（毫秒）
    pub watch_quiet_window_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fallback_tool: Some(ToolId::DEFAULT_FALLBACK),
            dedupe_fallback: false,
            watch_quiet_window_ms: WATCH_QUIET_WINDOW_DEFAULT_MS,
        }
    }
}

impl Settings {
    fn normalized(mut self) -> Self {
        self.watch_quiet_window_ms = normalize_quiet_window_ms(self.watch_quiet_window_ms);
        self
    }
}

fn normalize_quiet_window_ms(value_ms: u64) -> u64 {
    value_ms.clamp(WATCH_QUIET_WINDOW_MIN_MS, WATCH_QUIET_WINDOW_MAX_MS)
}

/// 默认设置文件路径（系统配置目录不可用时返回 `None`）
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME))
}

/// 从指定路径加载设置，缺失或损坏时回退默认值
pub fn load_settings_from_path(path: &Path) -> Settings {
    if !path.exists() {
        log::debug!("⚙️ 设置文件不存在，使用默认设置: {}", path.display());
        return Settings::default();
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            log::warn!("读取设置文件失败，使用默认设置: {}", err);
            return Settings::default();
        }
    };

    match serde_json::from_str::<Settings>(&content) {
        Ok(settings) => settings.normalized(),
        Err(err) => {
            log::warn!("解析设置文件失败，使用默认设置: {}", err);
            Settings::default()
        }
    }
}

/// 加载设置：优先使用显式路径，否则使用默认位置
pub fn load_settings(explicit: Option<&Path>) -> Settings {
    match explicit.map(Path::to_path_buf).or_else(default_settings_path) {
        Some(path) => load_settings_from_path(&path),
        None => {
            log::warn!("无法确定系统配置目录，使用默认设置");
            Settings::default()
        }
    }
}

/// 保存设置到指定路径（自动创建父目录）
pub fn save_settings_to_path(path: &Path, settings: &Settings) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::Settings(format!("创建设置目录失败: {}", e)))?;
    }

    let content = serde_json::to_string_pretty(settings)
        .map_err(|e| AppError::Settings(format!("序列化设置失败: {}", e)))?;
    fs::write(path, content)
        .map_err(|e| AppError::Settings(format!("写入设置文件失败: {}", e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_load_settings_roundtrip() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            fallback_tool: Some(ToolId::UNIT_CONVERTER),
            dedupe_fallback: true,
            watch_quiet_window_ms: 250,
        };

        save_settings_to_path(&path, &settings).expect("save settings");
        assert_eq!(load_settings_from_path(&path), settings);
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let loaded = load_settings_from_path(&dir.path().join("absent.json"));
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn bad_file_falls_back_to_default() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("settings.json");
        fs::write(&path, "not-json").expect("write invalid settings");
        assert_eq!(load_settings_from_path(&path), Settings::default());
    }

    #[test]
    fn partial_file_keeps_defaults_and_clamps_window() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"watchQuietWindowMs": 1}"#).expect("write partial settings");

        let loaded = load_settings_from_path(&path);
        assert_eq!(loaded.watch_quiet_window_ms, 20);
        assert_eq!(loaded.fallback_tool, Some(ToolId::DEFAULT_FALLBACK));
        assert!(!loaded.dedupe_fallback);
    }

    #[test]
    fn null_fallback_disables_tail_entry() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"fallbackTool": null}"#).expect("write settings");
        assert_eq!(load_settings_from_path(&path).fallback_tool, None);
    }

    #[test]
    fn normalize_quiet_window_clamps_bounds() {
        assert_eq!(normalize_quiet_window_ms(5), 20);
        assert_eq!(normalize_quiet_window_ms(80), 80);
        assert_eq!(normalize_quiet_window_ms(6_000), 5_000);
    }
}
