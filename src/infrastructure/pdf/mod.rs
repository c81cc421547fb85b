//! PDF 排版能力：只认识单元格、字体和颜色，不认识表单

pub mod context;
pub mod metrics;

pub use context::{Align, RenderContext};
pub use metrics::FontFace;
