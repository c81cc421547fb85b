//! 基础设施层：持有外部资源，只暴露能力

pub mod pdf;
pub mod row_store;

pub use pdf::{Align, FontFace, RenderContext};
pub use row_store::{MemoryRowStore, RowStore};
