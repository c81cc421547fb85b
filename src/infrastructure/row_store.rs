//! 行存储 - 基础设施层
//!
//! 只暴露"按工作表追加一行"的能力，不认识 Submission，也不决定写到哪个工作表

use crate::error::{AppResult, StoreError};
use crate::models::row::CellValue;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::debug;

/// 按名称分区的行存储（一个表格，多个工作表）
///
/// 单次 `append_row` 的原子性由存储自身保证。
#[async_trait]
pub trait RowStore: Send + Sync {
    /// 列出所有工作表名称
    async fn worksheet_titles(&self) -> AppResult<Vec<String>>;

    /// 新建工作表
    async fn add_worksheet(&self, title: &str, rows: u32, cols: u32) -> AppResult<()>;

    /// 在工作表末尾追加一行
    async fn append_row(&self, worksheet: &str, cells: &[CellValue]) -> AppResult<()>;
}

/// 进程内存储，用于试运行和测试
#[derive(Debug, Default)]
pub struct MemoryRowStore {
    sheets: Mutex<BTreeMap<String, Vec<Vec<CellValue>>>>,
}

impl MemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预先创建若干工作表
    pub fn with_worksheets(titles: &[&str]) -> Self {
        let store = Self::new();
        {
            let mut sheets = store.lock();
            for title in titles {
                sheets.insert(title.to_string(), Vec::new());
            }
        }
        store
    }

    /// 某个工作表已写入的所有行
    pub fn rows(&self, worksheet: &str) -> Vec<Vec<CellValue>> {
        self.lock().get(worksheet).cloned().unwrap_or_default()
    }

    /// 所有行数之和
    pub fn total_rows(&self) -> usize {
        self.lock().values().map(Vec::len).sum()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Vec<Vec<CellValue>>>> {
        self.sheets.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl RowStore for MemoryRowStore {
    async fn worksheet_titles(&self) -> AppResult<Vec<String>> {
        Ok(self.lock().keys().cloned().collect())
    }

    async fn add_worksheet(&self, title: &str, rows: u32, cols: u32) -> AppResult<()> {
        debug!("新建内存工作表 {} ({}x{})", title, rows, cols);
        self.lock().entry(title.to_string()).or_default();
        Ok(())
    }

    async fn append_row(&self, worksheet: &str, cells: &[CellValue]) -> AppResult<()> {
        let mut sheets = self.lock();
        let rows = sheets
            .get_mut(worksheet)
            .ok_or_else(|| StoreError::WorksheetNotFound {
                title: worksheet.to_string(),
            })?;
        rows.push(cells.to_vec());
        Ok(())
    }
}
