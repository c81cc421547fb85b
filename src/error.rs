use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 表格存储相关错误
    #[error("表格存储错误: {0}")]
    Store(#[from] StoreError),
    /// PDF 渲染错误
    #[error("PDF渲染错误: {0}")]
    Render(#[from] RenderError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 表单数据错误
    #[error("表单错误: {0}")]
    Form(#[from] FormError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 表格存储相关错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 网络请求失败（存储不可达）
    #[error("请求失败 ({endpoint}): {source}")]
    Unreachable {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// API 返回错误响应
    #[error("返回错误响应 ({endpoint}): status={status}, body={body}")]
    BadResponse {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// 按名称找不到表格
    #[error("找不到表格: {name}")]
    SpreadsheetNotFound { name: String },
    /// 工作表不存在
    #[error("工作表不存在: {title}")]
    WorksheetNotFound { title: String },
    /// 响应解析失败
    #[error("响应解析失败 ({endpoint}): {source}")]
    JsonParseFailed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

/// PDF 渲染错误
#[derive(Debug, Error)]
pub enum RenderError {
    /// 内容流编码失败
    #[error("内容流编码失败 (第 {page} 页): {reason}")]
    ContentEncodeFailed { page: usize, reason: String },
    /// 文档序列化失败
    #[error("文档序列化失败: {0}")]
    SaveFailed(String),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 表单数据错误
#[derive(Debug, Error)]
pub enum FormError {
    /// 需求评分超出滑块范围
    #[error("需求评分 {value} 超出范围 [0, {max}]")]
    NeedsScoreOutOfRange { value: i64, max: u8 },
    /// 日期格式无法识别
    #[error("无法解析日期: {value}")]
    InvalidDate { value: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 未知的表单版式
    #[error("未知的表单版式: {value} (可选: county, single)")]
    UnknownLayout { value: String },
    /// 缺少访问令牌
    #[error("缺少访问令牌: 请设置环境变量 {var_name}")]
    MissingCredential { var_name: String },
    /// URL 无效
    #[error("无效的 URL ({url}): {reason}")]
    InvalidUrl { url: String, reason: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建存储不可达错误
    pub fn store_unreachable(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Store(StoreError::Unreachable {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
