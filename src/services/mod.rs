//! 业务能力层（Services）
//!
//! 每个服务只处理一份表单，不关心流程顺序

pub mod delivery;
pub mod recorder;
pub mod renderer;

pub use delivery::{DownloadLink, DownloadPagePresenter, Presenter};
pub use recorder::{County, CountyRecorder, RecordReceipt, SingleSheetRecorder, SubmissionRecorder};
pub use renderer::{
    CompactSummaryRenderer, CountySummaryRenderer, DocumentRenderer, RenderedDocument,
    RenderedSection,
};
