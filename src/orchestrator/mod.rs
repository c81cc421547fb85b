//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量调度和统计，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 收件箱批量处理器
//! - 管理应用生命周期（初始化、运行）
//! - 打开表格存储（每个进程只打开一次）
//! - 按版式装配 SubmissionFlow
//! - 输出全局统计信息
//!
//! ### `submission_processor` - 单份表单处理器
//! - 调用 SubmissionFlow 处理一份表单
//! - 写运行日志
//! - 成功后删除收件箱中的 TOML 文件
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<PendingSubmission>)
//!     ↓
//! submission_processor (处理单份 PendingSubmission)
//!     ↓
//! workflow::SubmissionFlow (record → render → present)
//!     ↓
//! services (能力层：recorder / renderer / delivery)
//!     ↓
//! infrastructure (基础设施：RowStore / RenderContext)
//! ```

pub mod batch_processor;
pub mod submission_processor;

pub use batch_processor::{build_flow, App, RunStats};
pub use submission_processor::process_submission;
