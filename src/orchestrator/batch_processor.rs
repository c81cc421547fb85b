//! 收件箱批量处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责打开存储、装配流程、逐份处理收件箱。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：写日志表头、打开表格存储（失败即终止）
//! 2. **流程装配**：按版式选择记录器和渲染器
//! 3. **批量加载**：扫描收件箱中的所有 TOML 表单
//! 4. **顺序处理**：一次只处理一份，单份失败不影响下一份
//! 5. **全局统计**：汇总所有表单的处理结果

use crate::clients::SheetsClient;
use crate::config::{Config, FormLayout};
use crate::infrastructure::{MemoryRowStore, RowStore};
use crate::models::PendingSubmission;
use crate::orchestrator::submission_processor;
use crate::services::{
    CompactSummaryRenderer, CountyRecorder, CountySummaryRenderer, DownloadPagePresenter,
    SingleSheetRecorder,
};
use crate::utils::logging::{init_log_file, log_startup, log_submissions_loaded, print_final_stats};
use crate::workflow::{SubmissionCtx, SubmissionFlow};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    flow: SubmissionFlow,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App").finish_non_exhaustive()
    }
}

impl App {
    /// 初始化应用：试运行时使用内存存储，否则连接 Google Sheets
    pub async fn initialize(config: Config) -> Result<Self> {
        let store: Arc<dyn RowStore> = if config.dry_run {
            Arc::new(MemoryRowStore::with_worksheets(&[config.single_worksheet.as_str()]))
        } else {
            match SheetsClient::open(&config).await {
                Ok(client) => Arc::new(client),
                Err(e) => {
                    error!("❌ 无法打开表格 {}: {}", config.sheet_name, e);
                    return Err(e).context("无法打开表格存储");
                }
            }
        };

        Self::with_store(config, store)
    }

    /// 使用给定存储初始化
    pub fn with_store(config: Config, store: Arc<dyn RowStore>) -> Result<Self> {
        init_log_file(&config.output_log_file)
            .with_context(|| format!("无法创建日志文件: {}", config.output_log_file))?;
        log_startup(&config);

        let flow = build_flow(&config, store);
        Ok(Self { config, flow })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<RunStats> {
        let pending = self.load_submissions().await?;

        if pending.is_empty() {
            warn!("⚠️ 没有找到待处理的TOML文件，程序结束");
            return Ok(RunStats::default());
        }

        log_submissions_loaded(pending.len());

        let stats = self.process_all(&pending).await?;

        print_final_stats(
            stats.success,
            stats.failed,
            stats.total,
            &self.config.output_log_file,
        );

        Ok(stats)
    }

    async fn load_submissions(&self) -> Result<Vec<PendingSubmission>> {
        info!("\n📁 正在扫描待处理的表单...");
        crate::models::load_all_submissions(&self.config.submission_folder).await
    }

    /// 逐份处理
    async fn process_all(&self, pending: &[PendingSubmission]) -> Result<RunStats> {
        let mut stats = RunStats {
            total: pending.len(),
            ..Default::default()
        };

        for (idx, item) in pending.iter().enumerate() {
            let ctx = SubmissionCtx::new(idx + 1, pending.len(), item.path.clone());

            let done =
                submission_processor::process_submission(&self.flow, item, &ctx, &self.config)
                    .await?;
            if done {
                stats.success += 1;
            } else {
                stats.failed += 1;
            }
        }

        Ok(stats)
    }
}

/// 按版式装配处理流程
pub fn build_flow(config: &Config, store: Arc<dyn RowStore>) -> SubmissionFlow {
    let presenter = Box::new(DownloadPagePresenter::new(&config.output_folder));

    let flow = match config.layout {
        FormLayout::County => SubmissionFlow::new(
            Box::new(CountyRecorder::new(store)),
            Box::new(CountySummaryRenderer),
            presenter,
        ),
        FormLayout::SingleSheet => SubmissionFlow::new(
            Box::new(SingleSheetRecorder::new(store, config.single_worksheet.clone())),
            Box::new(CompactSummaryRenderer),
            presenter,
        ),
    };

    flow.verbose(config.verbose_logging)
}

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
}
