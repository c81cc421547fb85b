//! 表单处理上下文
//!
//! 封装"我正在处理收件箱里的第几份表单"这一信息

use std::fmt::Display;
use std::path::PathBuf;

/// 表单处理上下文
#[derive(Debug, Clone)]
pub struct SubmissionCtx {
    /// 在本次批量中的序号（从1开始，仅用于日志显示）
    pub index: usize,

    /// 本次批量的表单总数
    pub total: usize,

    /// 来源文件
    pub source: PathBuf,
}

impl SubmissionCtx {
    pub fn new(index: usize, total: usize, source: PathBuf) -> Self {
        Self {
            index,
            total,
            source,
        }
    }
}

impl Display for SubmissionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let file = self
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        write!(f, "[表单 {}/{} {}]", self.index, self.total, file)
    }
}
