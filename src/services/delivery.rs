//! 下载链接服务 - 业务能力层
//!
//! 只负责把已渲染的文档变成可点击的下载链接，不保存文档本身

use crate::error::{AppError, AppResult};
use crate::services::renderer::RenderedDocument;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 内嵌整份文档的下载链接
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub filename: String,
    pub mime: &'static str,
    pub data_uri: String,
}

impl DownloadLink {
    /// `data:<mime>;base64,<payload>`
    pub fn from_document(document: &RenderedDocument) -> Self {
        let mime = RenderedDocument::MIME_TYPE;
        Self {
            filename: document.filename.clone(),
            mime,
            data_uri: format!("data:{};base64,{}", mime, STANDARD.encode(&document.bytes)),
        }
    }

    /// 解码后的字节（与原文档逐字节一致）
    pub fn payload(&self) -> Option<Vec<u8>> {
        let (_, encoded) = self.data_uri.split_once(";base64,")?;
        STANDARD.decode(encoded).ok()
    }

    pub fn to_html(&self) -> String {
        let name = escape_html(&self.filename);
        format!(
            r#"<a href="{}" download="{}">📥 Download {}</a>"#,
            self.data_uri, name, name
        )
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// 向提交人展示下载链接
#[async_trait]
pub trait Presenter: Send + Sync {
    async fn present(&self, link: &DownloadLink) -> AppResult<PathBuf>;
}

/// 把下载链接写成一个独立的 HTML 页面
pub struct DownloadPagePresenter {
    output_folder: PathBuf,
}

impl DownloadPagePresenter {
    pub fn new(output_folder: impl Into<PathBuf>) -> Self {
        Self {
            output_folder: output_folder.into(),
        }
    }

    /// `<文件名>.html`，路径分隔符替换为下划线
    fn page_path(&self, filename: &str) -> PathBuf {
        let safe: String = filename
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        self.output_folder.join(format!("{}.html", safe))
    }
}

#[async_trait]
impl Presenter for DownloadPagePresenter {
    async fn present(&self, link: &DownloadLink) -> AppResult<PathBuf> {
        let folder = display(&self.output_folder);
        tokio::fs::create_dir_all(&self.output_folder)
            .await
            .map_err(|e| AppError::file_write_failed(&folder, e))?;

        let path = self.page_path(&link.filename);
        let page = format!(
            concat!(
                "<!DOCTYPE html>\n<html>\n",
                "<head><meta charset=\"utf-8\"><title>{}</title></head>\n",
                "<body>\n<p>✅ Submission saved.</p>\n<p>{}</p>\n</body>\n</html>\n",
            ),
            escape_html(&link.filename),
            link.to_html()
        );

        tokio::fs::write(&path, page)
            .await
            .map_err(|e| AppError::file_write_failed(display(&path), e))?;

        debug!("data URI 长度: {}", link.data_uri.len());
        info!("📥 下载页已生成: {}", path.display());
        Ok(path)
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
