//! # 剪贴板工具箱 — 命令行入口
//!
//! 本文件仅负责参数解析、日志初始化与输出格式。
//! 分类逻辑分布在库的各子模块中，详见 `lib.rs` 架构文档。

use std::io;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;

use clipboard_toolbox::classifier::{
    ClassificationRequest, ClassificationResult, ClassifierOptions, ContentClassifier,
};
use clipboard_toolbox::clipboard::{self, listener, SystemClipboard};
use clipboard_toolbox::error::AppError;
use clipboard_toolbox::handoff::Handoff;
use clipboard_toolbox::registry::ToolRegistry;
use clipboard_toolbox::settings;
use clipboard_toolbox::tools::{ClipboardContentType, ToolId};

#[derive(Parser)]
#[command(name = "clipboard-toolbox", version)]
#[command(about = "根据剪贴板内容推荐合适的数据转换工具", long_about = None)]
struct Cli {
    /// 设置文件路径（默认位于系统配置目录）
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// 交接槽文件路径（默认位于系统缓存目录）
    #[arg(long, global = true)]
    handoff: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 对给定内容分类
    Classify {
        /// 内容形态：string / photo / video
        #[arg(short = 't', long = "type", default_value = "string")]
        content_type: ClipboardContentType,
        /// 文本内容
        #[arg(short, long, conflicts_with = "stdin")]
        content: Option<String>,
        /// 从标准输入读取文本内容
        #[arg(long)]
        stdin: bool,
        /// 以 JSON 输出
        #[arg(long)]
        json: bool,
    },
    /// 从标准输入读取 JSON 请求并分类（`null` 视为请求缺失）
    Request {
        #[arg(long)]
        json: bool,
    },
    /// 读取当前系统剪贴板并给出推荐
    Clipboard {
        #[arg(long)]
        json: bool,
    },
    /// 监听剪贴板变化，每次变化输出推荐
    Watch {
        /// 处理 N 批变化后退出
        #[arg(short, long)]
        max_events: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// 列出已注册的工具
    Tools {
        #[arg(long)]
        json: bool,
    },
    /// 把当前剪贴板文本放进交接槽，等待指定工具取走
    Open {
        /// 工具标识，如 json-formatter
        tool: String,
    },
    /// 以指定工具身份取走交接内容（只能取一次）
    Take {
        tool: String,
        #[arg(long)]
        json: bool,
    },
}

/// `tools --json` 的输出项
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolInfo<'a> {
    id: &'a ToolId,
    supported_types: Vec<ClipboardContentType>,
    has_detector: bool,
}

fn to_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string(value).map_err(|e| AppError::Serialization(e.to_string()))
}

fn print_result(result: &ClassificationResult, json: bool) -> Result<(), AppError> {
    if json {
        println!("{}", to_json(result)?);
        return Ok(());
    }
    for (index, id) in result.iter().enumerate() {
        println!("{:>2}. {}", index + 1, id);
    }
    Ok(())
}

fn registered_tool(registry: &ToolRegistry, tool: String) -> Result<ToolId, AppError> {
    let tool = ToolId::new(tool);
    if registry.get(&tool).is_none() {
        return Err(AppError::UnknownTool(tool.to_string()));
    }
    Ok(tool)
}

fn run(cli: Cli) -> Result<(), AppError> {
    let settings = settings::load_settings(cli.settings.as_deref());
    let registry = ToolRegistry::with_builtin_tools();
    let classifier = ContentClassifier::with_options(&registry, ClassifierOptions::from(&settings));

    match cli.command {
        Commands::Classify {
            content_type,
            content,
            stdin,
            json,
        } => {
            let content = if stdin {
                Some(io::read_to_string(io::stdin())?)
            } else {
                content
            };
            let request = ClassificationRequest {
                content_type,
                content,
            };
            let result = classifier.classify(Some(&request))?;
            print_result(&result, json)
        }
        Commands::Request { json } => {
            let input = io::read_to_string(io::stdin())?;
            let result = classifier.classify_json(&input)?;
            print_result(&result, json)
        }
        Commands::Clipboard { json } => {
            let mut reader = SystemClipboard::open()?;
            let snapshot = clipboard::capture_snapshot(&mut reader)?;
            let Some(request) = snapshot.to_request() else {
                log::info!("📋 剪贴板为空，没有可推荐的工具");
                if json {
                    println!("[]");
                }
                return Ok(());
            };
            let result = classifier.classify(Some(&request))?;
            print_result(&result, json)
        }
        Commands::Watch { max_events, json } => {
            let quiet_window = Duration::from_millis(settings.watch_quiet_window_ms);
            let mut output_error = None;
            listener::watch(&classifier, quiet_window, max_events, |event| {
                let Some(result) = event.result.as_ref() else {
                    log::info!("📋 剪贴板已清空");
                    return;
                };
                if json {
                    match to_json(result) {
                        Ok(line) => println!("{}", line),
                        Err(err) => output_error = Some(err),
                    }
                } else {
                    let names: Vec<&str> = result.iter().map(ToolId::as_str).collect();
                    println!(
                        "[{}] {}",
                        event.snapshot.captured_at.format("%H:%M:%S"),
                        names.join(", ")
                    );
                }
            })?;
            output_error.map_or(Ok(()), Err)
        }
        Commands::Tools { json } => {
            if json {
                let infos: Vec<ToolInfo<'_>> = registry
                    .list()
                    .iter()
                    .map(|r| ToolInfo {
                        id: r.id(),
                        supported_types: r.supported_types().iter().copied().collect(),
                        has_detector: r.has_detector(),
                    })
                    .collect();
                println!("{}", to_json(&infos)?);
                return Ok(());
            }
            for registration in registry.list() {
                let types: Vec<&str> = registration
                    .supported_types()
                    .iter()
                    .map(ClipboardContentType::as_str)
                    .collect();
                let marker = if registration.has_detector() { "*" } else { " " };
                println!("{} {:<20} {}", marker, registration.id(), types.join(", "));
            }
            Ok(())
        }
        Commands::Open { tool } => {
            let tool = registered_tool(&registry, tool)?;

            let mut reader = SystemClipboard::open()?;
            let snapshot = clipboard::capture_snapshot(&mut reader)?;
            let Some(request) = snapshot.to_request() else {
                return Err(AppError::InvalidArgument("剪贴板为空".to_string()));
            };
            let result = classifier.classify(Some(&request))?;
            if !result.contains(&tool) {
                return Err(AppError::UnknownTool(format!("{}（不适用于当前剪贴板内容）", tool)));
            }

            let handoff = Handoff::open(cli.handoff.as_deref())?;
            let content = snapshot.text.unwrap_or_default();
            let chars = content.chars().count();
            if let Some(previous) = handoff.put(tool.clone(), content)? {
                log::info!("♻️ 覆盖了尚未被 {} 取走的交接内容", previous.tool);
            }
            println!(
                "已将 {} 个字符放入交接槽，等待 {} 取走（{}）",
                chars,
                tool,
                handoff.path().display()
            );
            Ok(())
        }
        Commands::Take { tool, json } => {
            let tool = registered_tool(&registry, tool)?;
            let handoff = Handoff::open(cli.handoff.as_deref())?;
            let Some(payload) = handoff.take_for(&tool)? else {
                log::info!("📭 没有交给 {} 的内容", tool);
                if json {
                    println!("null");
                }
                return Ok(());
            };
            if json {
                println!("{}", to_json(&payload)?);
            } else {
                print!("{}", payload.content);
            }
            Ok(())
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        log::error!("执行失败: {}", err);
        eprintln!("{}", err);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn to_json_reports_serialization_errors() {
        let mut by_pair = BTreeMap::new();
        by_pair.insert((1, 2), "tuple keys cannot become JSON object keys");

        let err = to_json(&by_pair).expect_err("tuple keys must fail");
        assert!(matches!(err, AppError::Serialization(_)));
        assert!(err.to_string().starts_with("序列化失败"));
    }

    #[test]
    fn to_json_encodes_handoff_payload() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let handoff = Handoff::at(dir.path().join("handoff.json"));
        handoff.put(ToolId::UUID_GENERATOR, "abc").expect("put payload");
        let payload = handoff
            .take_for(&ToolId::UUID_GENERATOR)
            .expect("take payload")
            .expect("payload");

        let json = to_json(&payload).expect("encode payload");
        assert!(json.contains(r#""tool":"uuid-generator""#));
        assert!(json.contains(r#""content":"abc""#));
    }
}
