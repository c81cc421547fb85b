//! 表单记录服务 - 业务能力层
//!
//! 只负责"把一份表单写成表格中的一行"，不关心渲染和下载

use crate::error::AppResult;
use crate::infrastructure::RowStore;
use crate::models::row::{compact_row, county_row};
use crate::models::submission::Submission;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// 新建工作表的默认尺寸
const NEW_WORKSHEET_ROWS: u32 = 100;
const NEW_WORKSHEET_COLS: u32 = 20;

/// 一次写入的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordReceipt {
    /// 写入的工作表
    pub worksheet: String,
    /// 写入的单元格数量
    pub cells: usize,
}

/// 表单记录能力
///
/// 每次调用恰好追加一行；存储不可达时直接返回错误，不重试，不写半行。
#[async_trait]
pub trait SubmissionRecorder: Send + Sync {
    async fn record(
        &self,
        submission: &Submission,
        submitted_on: NaiveDate,
    ) -> AppResult<RecordReceipt>;
}

/// 按学校划分的县
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum County {
    Ashland,
    Wayne,
}

impl County {
    /// 学校名称中包含 "ashland"（不区分大小写）归 Ashland，其余归 Wayne
    pub fn for_school(school: &str) -> Self {
        if school.to_lowercase().contains("ashland") {
            County::Ashland
        } else {
            County::Wayne
        }
    }

    /// 对应的工作表名称
    pub fn worksheet(self) -> &'static str {
        match self {
            County::Ashland => "Ashland",
            County::Wayne => "Wayne",
        }
    }
}

impl fmt::Display for County {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.worksheet())
    }
}

/// 按县分表的记录器（45 列）
pub struct CountyRecorder {
    store: Arc<dyn RowStore>,
}

impl CountyRecorder {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self { store }
    }

    /// 工作表不存在时新建
    async fn ensure_worksheet(&self, title: &str) -> AppResult<()> {
        let titles = self.store.worksheet_titles().await?;
        if titles.iter().any(|t| t == title) {
            return Ok(());
        }

        info!("📄 工作表 {} 不存在，正在新建", title);
        self.store
            .add_worksheet(title, NEW_WORKSHEET_ROWS, NEW_WORKSHEET_COLS)
            .await
    }
}

#[async_trait]
impl SubmissionRecorder for CountyRecorder {
    async fn record(
        &self,
        submission: &Submission,
        submitted_on: NaiveDate,
    ) -> AppResult<RecordReceipt> {
        let county = County::for_school(&submission.school);
        debug!("学校 {:?} 归入 {}", submission.school, county);

        self.ensure_worksheet(county.worksheet()).await?;

        let row = county_row(submission, submitted_on);
        self.store.append_row(county.worksheet(), &row).await?;

        Ok(RecordReceipt {
            worksheet: county.worksheet().to_string(),
            cells: row.len(),
        })
    }
}

/// 单一工作表的记录器（38 列），工作表必须已存在
pub struct SingleSheetRecorder {
    store: Arc<dyn RowStore>,
    worksheet: String,
}

impl SingleSheetRecorder {
    pub fn new(store: Arc<dyn RowStore>, worksheet: impl Into<String>) -> Self {
        Self {
            store,
            worksheet: worksheet.into(),
        }
    }
}

#[async_trait]
impl SubmissionRecorder for SingleSheetRecorder {
    async fn record(
        &self,
        submission: &Submission,
        submitted_on: NaiveDate,
    ) -> AppResult<RecordReceipt> {
        let row = compact_row(submission, submitted_on);
        self.store.append_row(&self.worksheet, &row).await?;

        Ok(RecordReceipt {
            worksheet: self.worksheet.clone(),
            cells: row.len(),
        })
    }
}
