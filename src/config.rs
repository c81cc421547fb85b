use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// 表单版式（按部署选择，两种版式的列结构互不兼容）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormLayout {
    /// 按县分表：Ashland / Wayne，45 列
    County,
    /// 单一工作表，38 列
    SingleSheet,
}

impl FromStr for FormLayout {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "county" => Ok(FormLayout::County),
            "single" | "single_sheet" => Ok(FormLayout::SingleSheet),
            other => Err(ConfigError::UnknownLayout {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for FormLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormLayout::County => write!(f, "county"),
            FormLayout::SingleSheet => write!(f, "single"),
        }
    }
}

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 表格名称（按名称查找）
    pub sheet_name: String,
    /// 表格 ID，设置后跳过按名称查找
    pub spreadsheet_id: Option<String>,
    /// Sheets API 地址
    pub sheets_api_base_url: String,
    /// Drive API 地址
    pub drive_api_base_url: String,
    /// 服务账号访问令牌（由外部密钥注入）
    pub access_token: String,
    /// 表单版式
    pub layout: FormLayout,
    /// 单表版式使用的工作表名称
    pub single_worksheet: String,
    /// 待处理表单（TOML）存放目录
    pub submission_folder: String,
    /// 下载页输出目录
    pub output_folder: String,
    /// 不连接远程表格，写入内存
    pub dry_run: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sheet_name: "Student Transition Data".to_string(),
            spreadsheet_id: None,
            sheets_api_base_url: "https://sheets.googleapis.com".to_string(),
            drive_api_base_url: "https://www.googleapis.com".to_string(),
            access_token: String::new(),
            layout: FormLayout::County,
            single_worksheet: "Sheet1".to_string(),
            submission_folder: "submissions".to_string(),
            output_folder: "output_pdf".to_string(),
            dry_run: false,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            sheet_name: std::env::var("SHEET_NAME").unwrap_or(default.sheet_name),
            spreadsheet_id: std::env::var("SPREADSHEET_ID")
                .ok()
                .filter(|v| !v.is_empty())
                .or(default.spreadsheet_id),
            sheets_api_base_url: std::env::var("SHEETS_API_BASE_URL")
                .unwrap_or(default.sheets_api_base_url),
            drive_api_base_url: std::env::var("DRIVE_API_BASE_URL")
                .unwrap_or(default.drive_api_base_url),
            access_token: std::env::var("GOOGLE_ACCESS_TOKEN").unwrap_or(default.access_token),
            layout: std::env::var("FORM_LAYOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.layout),
            single_worksheet: std::env::var("SINGLE_WORKSHEET")
                .unwrap_or(default.single_worksheet),
            submission_folder: std::env::var("SUBMISSION_FOLDER")
                .unwrap_or(default.submission_folder),
            output_folder: std::env::var("OUTPUT_FOLDER").unwrap_or(default.output_folder),
            dry_run: std::env::var("DRY_RUN")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.dry_run),
            verbose_logging: std::env::var("VERBOSE_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }
}
