//! 剪贴板监听模块
//!
//! # 设计思路
//!
//! 后台线程通过 `clipboard-master` 监听系统剪贴板变化，只负责把"变化发生的时刻"
//! 经 `mpsc` 通道转发出去；读取剪贴板与分类都在消费端（调用线程）完成。
//!
//! # 实现思路
//!
//! - 连续复制（或浏览器一次写入多种格式）会触发多次事件，消费端收到第一条后
//!   在静默窗口内继续收取，合并成一个批次，每批只分类一次。
//! - 监听器异常退出时按指数退避重启；消费端断开后监听器自行停止。

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use clipboard_master::{CallbackResult, ClipboardHandler, Master};

use super::{capture_snapshot, ClipboardReader, ClipboardSnapshot, SystemClipboard};
use crate::classifier::{ClassificationResult, ContentClassifier};
use crate::error::AppError;

const LISTENER_RESTART_BASE_DELAY_MS: u64 = 100;
const LISTENER_RESTART_MAX_DELAY_MS: u64 = 5_000;

fn restart_delay_ms(restart_attempt: u32) -> u64 {
    let exp = 1_u64 << restart_attempt.saturating_sub(1).min(6);
    LISTENER_RESTART_BASE_DELAY_MS
        .saturating_mul(exp)
        .min(LISTENER_RESTART_MAX_DELAY_MS)
}

/// 把剪贴板变化转发到通道（内部实现）
struct ChangeForwarder {
    tx: Sender<Instant>,
    consumer_gone: Arc<AtomicBool>,
}

impl ClipboardHandler for ChangeForwarder {
    fn on_clipboard_change(&mut self) -> CallbackResult {
        if self.tx.send(Instant::now()).is_err() {
            self.consumer_gone.store(true, Ordering::SeqCst);
            log::debug!("📋 消费端已断开，停止剪贴板监听");
            return CallbackResult::Stop;
        }
        CallbackResult::Next
    }

    fn on_clipboard_error(&mut self, error: io::Error) -> CallbackResult {
        log::error!("剪贴板错误：{}", error);
        CallbackResult::Next
    }
}

/// 在后台线程启动剪贴板监听，变化时刻写入 `tx`
pub fn spawn_listener(tx: Sender<Instant>) -> JoinHandle<()> {
    thread::spawn(move || {
        let consumer_gone = Arc::new(AtomicBool::new(false));
        let mut restart_attempt: u32 = 0;

        loop {
            let forwarder = ChangeForwarder {
                tx: tx.clone(),
                consumer_gone: Arc::clone(&consumer_gone),
            };
            match Master::new(forwarder) {
                Ok(mut master) => {
                    restart_attempt = 0;
                    log::info!("📋 剪贴板监听已启动");
                    if let Err(err) = master.run() {
                        log::warn!("📋 剪贴板监听异常退出: {}", err);
                    }
                }
                Err(err) => {
                    log::error!("📋 创建剪贴板监听失败: {}", err);
                }
            }

            if consumer_gone.load(Ordering::SeqCst) {
                break;
            }

            restart_attempt = restart_attempt.saturating_add(1);
            let delay_ms = restart_delay_ms(restart_attempt);
            log::warn!("📋 剪贴板监听 {}ms 后重试（attempt={}）", delay_ms, restart_attempt);
            thread::sleep(Duration::from_millis(delay_ms));
        }
    })
}

/// 一批合并后的剪贴板变化
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeBatch {
    /// 本批合并的事件数
    pub events: usize,
    pub first_at: Instant,
    pub last_at: Instant,
}

/// 阻塞等待下一批变化；通道关闭且无剩余事件时返回 `None`
///
/// 收到第一条事件后，只要后续事件间隔不超过 `quiet_window` 就继续合并。
pub fn next_batch(rx: &Receiver<Instant>, quiet_window: Duration) -> Option<ChangeBatch> {
    let first = rx.recv().ok()?;
    let mut batch = ChangeBatch {
        events: 1,
        first_at: first,
        last_at: first,
    };

    loop {
        match rx.recv_timeout(quiet_window) {
            Ok(at) => {
                batch.events += 1;
                batch.last_at = at;
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    if batch.events > 1 {
        log::trace!("⏱️ 合并 {} 次剪贴板变化", batch.events);
    }
    Some(batch)
}

/// 一次监听回调的内容
#[derive(Debug, Clone)]
pub struct WatchEvent {
    pub batch: ChangeBatch,
    pub snapshot: ClipboardSnapshot,
    /// 剪贴板为空时为 `None`
    pub result: Option<ClassificationResult>,
}

/// 从通道消费变化批次，读取快照并分类
///
/// `max_batches` 为 `None` 时一直运行到通道关闭。
pub fn run_watch_loop<R, F>(
    rx: &Receiver<Instant>,
    reader: &mut R,
    classifier: &ContentClassifier<'_>,
    quiet_window: Duration,
    max_batches: Option<usize>,
    mut on_event: F,
) -> Result<usize, AppError>
where
    R: ClipboardReader + ?Sized,
    F: FnMut(&WatchEvent),
{
    let mut handled = 0;
    while max_batches.is_none_or(|max| handled < max) {
        let Some(batch) = next_batch(rx, quiet_window) else {
            log::info!("📋 剪贴板变化通道已关闭，结束监听");
            break;
        };

        let snapshot = match capture_snapshot(&mut *reader) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                log::warn!("读取剪贴板快照失败，跳过本批变化: {}", err);
                continue;
            }
        };

        let result = match snapshot.to_request() {
            Some(request) => Some(classifier.classify(Some(&request))?),
            None => None,
        };

        on_event(&WatchEvent {
            batch,
            snapshot,
            result,
        });
        handled += 1;
    }
    Ok(handled)
}

/// 监听系统剪贴板，每批变化分类一次并回调
pub fn watch<F>(
    classifier: &ContentClassifier<'_>,
    quiet_window: Duration,
    max_batches: Option<usize>,
    on_event: F,
) -> Result<usize, AppError>
where
    F: FnMut(&WatchEvent),
{
    let mut reader = SystemClipboard::open()?;
    let (tx, rx) = mpsc::channel();
    let _listener = spawn_listener(tx);
    run_watch_loop(&rx, &mut reader, classifier, quiet_window, max_batches, on_event)
}
