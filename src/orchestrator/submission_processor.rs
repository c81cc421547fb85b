//! 单份表单处理器 - 编排层
//!
//! 运行一次 SubmissionFlow，记录结果，然后处置收件箱中的源文件：
//! - 完整走完流程：删除
//! - 已写入表格但下载页失败：改名为 `.recorded`，不再被收件箱扫描到
//! - 未写入表格：保留，下次重试
//! - 试运行：一律保留（内存存储随进程丢弃）

use crate::config::Config;
use crate::models::PendingSubmission;
use crate::utils::logging::append_log_line;
use crate::workflow::{SubmissionCtx, SubmissionFlow};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

const RECORDED_EXTENSION: &str = "toml.recorded";

/// 处理单份表单
///
/// # 返回
/// 表单是否完整走完流程；只有运行日志写不进去才返回错误
pub async fn process_submission(
    flow: &SubmissionFlow,
    pending: &PendingSubmission,
    ctx: &SubmissionCtx,
    config: &Config,
) -> Result<bool> {
    let student = &pending.submission.student_name;

    match flow.run(&pending.submission, ctx).await {
        Ok(outcome) => {
            append_log_line(
                &config.output_log_file,
                &format!(
                    "✅ {} → {} | {} | {}",
                    student,
                    outcome.receipt.worksheet,
                    outcome.link.filename,
                    outcome.page_path.display()
                ),
            )
            .context("无法写入运行日志")?;

            if keeps_inbox(config, ctx) {
                return Ok(true);
            }
            match fs::remove_file(&pending.path) {
                Ok(_) => info!("{} 🗑️ 已删除源文件", ctx),
                Err(e) => warn!("{} ⚠️ 删除源文件失败: {}", ctx, e),
            }
            Ok(true)
        }
        Err(e) => {
            error!("{} ❌ 处理失败: {}", ctx, e);
            let stage = match &e.recorded {
                Some(receipt) => format!("已写入 {}", receipt.worksheet),
                None => "未写入".to_string(),
            };
            append_log_line(
                &config.output_log_file,
                &format!("❌ {} | {} | {} | {}", student, pending.path.display(), stage, e),
            )
            .context("无法写入运行日志")?;

            if e.recorded.is_some() && !keeps_inbox(config, ctx) {
                set_aside_recorded(&pending.path, ctx);
            }
            Ok(false)
        }
    }
}

fn keeps_inbox(config: &Config, ctx: &SubmissionCtx) -> bool {
    if config.dry_run {
        info!("{} 🧪 试运行，保留源文件", ctx);
    }
    config.dry_run
}

/// `a.toml` → `a.toml.recorded`
pub fn recorded_path(path: &Path) -> PathBuf {
    path.with_extension(RECORDED_EXTENSION)
}

// 行已追加，源文件必须离开收件箱，否则重跑会再追加一次
fn set_aside_recorded(path: &Path, ctx: &SubmissionCtx) {
    let target = recorded_path(path);
    match fs::rename(path, &target) {
        Ok(_) => warn!(
            "{} ⚠️ 已写入表格但未生成下载页，源文件移至 {}",
            ctx,
            target.display()
        ),
        Err(e) => error!(
            "{} ❌ 无法移走已写入的源文件 {}，重跑会重复追加: {}",
            ctx,
            path.display(),
            e
        ),
    }
}
