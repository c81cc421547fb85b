//! 表单处理流程 - 流程层
//!
//! 核心职责：定义"一份表单"的完整处理流程
//!
//! 流程顺序：
//! 1. 写入表格（失败即终止，不渲染）
//! 2. 渲染 PDF 摘要
//! 3. 生成下载链接并展示

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{error, info};

use crate::error::AppError;
use crate::models::submission::Submission;
use crate::services::{
    DocumentRenderer, DownloadLink, Presenter, RecordReceipt, SubmissionRecorder,
};
use crate::utils::logging::truncate_text;
use crate::workflow::submission_ctx::SubmissionCtx;

/// 一份表单的处理结果
#[derive(Debug, Clone)]
pub struct FlowOutcome {
    pub receipt: RecordReceipt,
    pub page_count: usize,
    pub link: DownloadLink,
    /// 下载页位置
    pub page_path: PathBuf,
}

/// 流程中断
///
/// `recorded` 为 `Some` 时表格已经写入，重跑同一份表单会重复追加
#[derive(Debug, Error)]
#[error("{source}")]
pub struct FlowError {
    pub recorded: Option<RecordReceipt>,
    #[source]
    pub source: AppError,
}

impl FlowError {
    fn before_record(source: AppError) -> Self {
        Self {
            recorded: None,
            source,
        }
    }

    fn after_record(receipt: &RecordReceipt, source: AppError) -> Self {
        Self {
            recorded: Some(receipt.clone()),
            source,
        }
    }
}

/// 表单处理流程
///
/// - 决定记录、渲染、展示的先后
/// - 不持有任何连接，只依赖业务能力（services）
pub struct SubmissionFlow {
    recorder: Box<dyn SubmissionRecorder>,
    renderer: Box<dyn DocumentRenderer>,
    presenter: Box<dyn Presenter>,
    verbose_logging: bool,
}

impl SubmissionFlow {
    pub fn new(
        recorder: Box<dyn SubmissionRecorder>,
        renderer: Box<dyn DocumentRenderer>,
        presenter: Box<dyn Presenter>,
    ) -> Self {
        Self {
            recorder,
            renderer,
            presenter,
            verbose_logging: false,
        }
    }

    pub fn verbose(mut self, verbose_logging: bool) -> Self {
        self.verbose_logging = verbose_logging;
        self
    }

    /// 以今天作为提交日期处理一份表单
    pub async fn run(
        &self,
        submission: &Submission,
        ctx: &SubmissionCtx,
    ) -> Result<FlowOutcome, FlowError> {
        let today = chrono::Local::now().date_naive();
        self.run_on(submission, ctx, today).await
    }

    pub async fn run_on(
        &self,
        submission: &Submission,
        ctx: &SubmissionCtx,
        submitted_on: NaiveDate,
    ) -> Result<FlowOutcome, FlowError> {
        info!(
            "{} 👤 {} ({})",
            ctx, submission.student_name, submission.school
        );
        if self.verbose_logging {
            info!("{} 未来规划: {}", ctx, truncate_text(&submission.future_plans, 60));
        }

        // ========== 步骤 1: 写入表格 ==========
        let receipt = match self.recorder.record(submission, submitted_on).await {
            Ok(receipt) => receipt,
            Err(e) => {
                error!("{} ❌ 写入表格失败，不生成摘要: {}", ctx, e);
                return Err(FlowError::before_record(e));
            }
        };
        info!(
            "{} ✅ Submission saved → 工作表 {} ({} 列)",
            ctx, receipt.worksheet, receipt.cells
        );

        // ========== 步骤 2: 渲染摘要 ==========
        let document = self
            .renderer
            .render(submission)
            .map_err(|e| FlowError::after_record(&receipt, e))?;
        info!(
            "{} 📄 已生成 {} ({} 页)",
            ctx, document.filename, document.page_count
        );

        // ========== 步骤 3: 下载链接 ==========
        let link = DownloadLink::from_document(&document);
        let page_path = self
            .presenter
            .present(&link)
            .await
            .map_err(|e| FlowError::after_record(&receipt, e))?;

        Ok(FlowOutcome {
            receipt,
            page_count: document.page_count,
            link,
            page_path,
        })
    }
}
