//! 工具交接槽
//!
//! # 设计思路
//!
//! 用户选中推荐工具后，原始剪贴板文本通过一次性槽位交给该工具。
//! 写入方（`open`）和读取方（`take` 或另一个进程）通常不是同一次调用，
//! 所以槽位落在磁盘上，默认位于 `<系统缓存目录>/clipboard-toolbox/handoff.json`。
//!
//! # 实现思路
//!
//! - 写入时覆盖旧内容，返回被覆盖的那份。
//! - 目标工具读取一次后即删除文件；其他工具读取时文件保持不变。
//! - 读取前先把文件改名为本进程独占的临时名，改名失败说明已被别人取走，
//!   保证同一份内容只会被消费一次。
//! - 文件损坏时记录警告并清理，视为空槽。

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::tools::ToolId;

const HANDOFF_DIR_NAME: &str = "clipboard-toolbox";
const HANDOFF_FILE_NAME: &str = "handoff.json";

static SIDE_FILE_SEQ: AtomicU64 = AtomicU64::new(0);

/// 槽位中的交接内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoffPayload {
    pub tool: ToolId,
    pub content: String,
    pub created_at: DateTime<Local>,
}

/// 默认交接槽路径（系统缓存目录不可用时返回 `None`）
pub fn default_handoff_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join(HANDOFF_DIR_NAME).join(HANDOFF_FILE_NAME))
}

/// 基于文件的一次性交接槽，可跨线程、跨进程共享
#[derive(Debug)]
pub struct Handoff {
    path: PathBuf,
    lock: Mutex<()>,
}

impl Handoff {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// 使用显式路径，否则使用默认位置
    pub fn open(explicit: Option<&Path>) -> Result<Self, AppError> {
        explicit
            .map(Path::to_path_buf)
            .or_else(default_handoff_path)
            .map(Self::at)
            .ok_or_else(|| AppError::InvalidArgument("无法确定交接槽位置".to_string()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_slot(&self) -> MutexGuard<'_, ()> {
        match self.lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("交接槽锁中毒，继续使用恢复数据");
                poisoned.into_inner()
            }
        }
    }

    fn read_payload(path: &Path) -> Result<Option<HandoffPayload>, AppError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_str::<HandoffPayload>(&content) {
            Ok(payload) => Ok(Some(payload)),
            Err(err) => {
                log::warn!("交接槽内容损坏，已清理: {}", err);
                remove_if_exists(path)?;
                Ok(None)
            }
        }
    }

    /// 写入交接内容，返回被覆盖的旧内容
    pub fn put(
        &self,
        tool: ToolId,
        content: impl Into<String>,
    ) -> Result<Option<HandoffPayload>, AppError> {
        let _guard = self.lock_slot();
        let payload = HandoffPayload {
            tool,
            content: content.into(),
            created_at: Local::now(),
        };
        let previous = Self::read_payload(&self.path)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let encoded = serde_json::to_string(&payload)
            .map_err(|e| AppError::Serialization(format!("交接内容: {}", e)))?;
        // 先写临时文件再改名，读取方不会看到写了一半的内容
        let staging = side_file(&self.path, "put");
        fs::write(&staging, encoded)?;
        fs::rename(&staging, &self.path)?;

        log::debug!(
            "📦 交接 {} 字符给工具 {}",
            payload.content.chars().count(),
            payload.tool
        );
        Ok(previous)
    }

    /// 目标工具读取交接内容；读取后槽位清空
    pub fn take_for(&self, tool: &ToolId) -> Result<Option<HandoffPayload>, AppError> {
        let _guard = self.lock_slot();
        match Self::read_payload(&self.path)? {
            Some(payload) if &payload.tool == tool => {}
            _ => return Ok(None),
        }

        let claimed = side_file(&self.path, "take");
        match fs::rename(&self.path, &claimed) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        }
        let payload = Self::read_payload(&claimed)?;
        remove_if_exists(&claimed)?;

        match payload {
            Some(payload) if &payload.tool == tool => {
                log::debug!("📬 工具 {} 已取走交接内容", tool);
                Ok(Some(payload))
            }
            Some(other) => {
                // 改名前被另一次写入替换成了别的工具，放回去
                let encoded = serde_json::to_string(&other)
                    .map_err(|e| AppError::Serialization(format!("交接内容: {}", e)))?;
                fs::write(&self.path, encoded)?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    pub fn is_empty(&self) -> Result<bool, AppError> {
        let _guard = self.lock_slot();
        Ok(Self::read_payload(&self.path)?.is_none())
    }

    pub fn clear(&self) -> Result<(), AppError> {
        let _guard = self.lock_slot();
        remove_if_exists(&self.path)
    }
}

/// 同目录下本进程独占的临时文件名
fn side_file(path: &Path, purpose: &str) -> PathBuf {
    let seq = SIDE_FILE_SEQ.fetch_add(1, Ordering::Relaxed);
    path.with_extension(format!("{}.{}.{}", purpose, std::process::id(), seq))
}

fn remove_if_exists(path: &Path) -> Result<(), AppError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    fn slot_in(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("nested").join(HANDOFF_FILE_NAME)
    }

    #[test]
    fn take_is_one_shot() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let handoff = Handoff::at(slot_in(&dir));
        handoff
            .put(ToolId::JSON_FORMATTER, "{\"a\":1}")
            .expect("put payload");

        let payload = handoff
            .take_for(&ToolId::JSON_FORMATTER)
            .expect("take payload")
            .expect("payload");
        assert_eq!(payload.content, "{\"a\":1}");
        assert!(handoff.take_for(&ToolId::JSON_FORMATTER).expect("take again").is_none());
        assert!(handoff.is_empty().expect("is empty"));
    }

    #[test]
    fn payload_survives_between_invocations() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = slot_in(&dir);

        // 两个独立实例模拟 `open` 与 `take` 两次命令调用
        Handoff::at(&path)
            .put(ToolId::URL_ENCODER, "https://example.com/a b")
            .expect("put payload");

        let first = Handoff::at(&path)
            .take_for(&ToolId::URL_ENCODER)
            .expect("first take");
        assert_eq!(
            first.map(|p| p.content).as_deref(),
            Some("https://example.com/a b")
        );

        let second = Handoff::at(&path)
            .take_for(&ToolId::URL_ENCODER)
            .expect("second take");
        assert!(second.is_none());
        assert!(!path.exists());
    }

    #[test]
    fn other_tool_cannot_take_payload() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let handoff = Handoff::at(slot_in(&dir));
        handoff.put(ToolId::BASE64_CODEC, "SGVsbG8=").expect("put payload");

        assert!(handoff.take_for(&ToolId::URL_ENCODER).expect("take other").is_none());
        assert!(!handoff.is_empty().expect("is empty"));
        assert!(handoff.take_for(&ToolId::BASE64_CODEC).expect("take").is_some());
    }

    #[test]
    fn put_replaces_previous_payload() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let handoff = Handoff::at(slot_in(&dir));
        assert!(handoff.put(ToolId::URL_ENCODER, "first").expect("put first").is_none());
        let replaced = handoff
            .put(ToolId::URL_ENCODER, "second")
            .expect("put second")
            .expect("old payload");
        assert_eq!(replaced.content, "first");

        handoff.clear().expect("clear");
        assert!(handoff.is_empty().expect("is empty"));
    }

    #[test]
    fn corrupt_slot_is_treated_as_empty() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(HANDOFF_FILE_NAME);
        fs::write(&path, "not-json").expect("write corrupt slot");

        let handoff = Handoff::at(&path);
        assert!(handoff.take_for(&ToolId::HASH_GENERATOR).expect("take").is_none());
        assert!(!path.exists());
    }

    #[test]
    fn payload_crosses_threads() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let handoff = Arc::new(Handoff::at(slot_in(&dir)));
        let writer = Arc::clone(&handoff);
        thread::spawn(move || {
            writer.put(ToolId::HASH_GENERATOR, "hello").expect("put payload");
        })
        .join()
        .expect("writer thread");

        let payload = handoff
            .take_for(&ToolId::HASH_GENERATOR)
            .expect("take payload")
            .expect("payload");
        assert_eq!(payload.content, "hello");
    }

    #[test]
    fn concurrent_takes_consume_once() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = slot_in(&dir);
        Handoff::at(&path)
            .put(ToolId::WATERMARK, "photo")
            .expect("put payload");

        let takers: Vec<_> = (0..4)
            .map(|_| {
                let handoff = Handoff::at(&path);
                thread::spawn(move || {
                    handoff
                        .take_for(&ToolId::WATERMARK)
                        .expect("take payload")
                        .is_some()
                })
            })
            .collect();
        let taken = takers
            .into_iter()
            .map(|t| t.join().expect("taker thread"))
            .filter(|got| *got)
            .count();
        assert_eq!(taken, 1);
    }
}
