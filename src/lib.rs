//! # Transition Form Submit
//!
//! 学生过渡规划表单处理程序：写入 Google Sheets，生成彩色 PDF 摘要，提供下载链接
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有外部资源，只暴露能力
//! - `RowStore` - 表格行存储抽象（`SheetsClient` / `MemoryRowStore`）
//! - `RenderContext` - 单份文档的排版状态（光标、页面、字体、颜色）
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单份表单
//! - `SubmissionRecorder` - 写一行（按县分表 / 单表）
//! - `DocumentRenderer` - 画 PDF 摘要（逐行高亮 / 整节高亮）
//! - `DownloadLink` / `Presenter` - base64 下载链接
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一份表单"的完整处理流程
//! - `SubmissionCtx` - 上下文封装（批量序号 + 来源文件）
//! - `SubmissionFlow` - 流程编排（record → render → present）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 打开存储，逐份处理收件箱
//! - `orchestrator/submission_processor` - 单份表单处理，写日志，清理源文件
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::SheetsClient;
pub use config::{Config, FormLayout};
pub use error::{AppError, AppResult};
pub use infrastructure::{MemoryRowStore, RenderContext, RowStore};
pub use models::{PendingSubmission, Submission};
pub use orchestrator::{build_flow, App, RunStats};
pub use workflow::{FlowError, FlowOutcome, SubmissionCtx, SubmissionFlow};
