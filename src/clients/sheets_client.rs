/// Google Sheets 客户端
///
/// 封装表格查找、工作表列举/新建、追加行等 REST 调用
use crate::config::Config;
use crate::error::{AppError, AppResult, ConfigError, StoreError};
use crate::infrastructure::RowStore;
use crate::models::row::CellValue;
use async_trait::async_trait;
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

#[derive(Debug, Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

/// Google Sheets 客户端
pub struct SheetsClient {
    http: reqwest::Client,
    sheets_base_url: String,
    drive_base_url: String,
    token: String,
    spreadsheet_id: String,
}

impl SheetsClient {
    /// 打开表格：配置了 ID 就直接使用，否则按名称在 Drive 中查找
    pub async fn open(config: &Config) -> AppResult<Self> {
        if config.access_token.is_empty() {
            return Err(ConfigError::MissingCredential {
                var_name: "GOOGLE_ACCESS_TOKEN".to_string(),
            }
            .into());
        }

        let mut client = Self {
            http: reqwest::Client::new(),
            sheets_base_url: config.sheets_api_base_url.clone(),
            drive_base_url: config.drive_api_base_url.clone(),
            token: config.access_token.clone(),
            spreadsheet_id: config.spreadsheet_id.clone().unwrap_or_default(),
        };

        if client.spreadsheet_id.is_empty() {
            client.spreadsheet_id = client.find_spreadsheet_id(&config.sheet_name).await?;
        }

        info!("✓ 已打开表格 {} (ID: {})", config.sheet_name, client.spreadsheet_id);
        Ok(client)
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// 按名称查找表格 ID
    async fn find_spreadsheet_id(&self, name: &str) -> AppResult<String> {
        let url = build_url(&self.drive_base_url, &["drive", "v3", "files"])?;
        let query = drive_name_query(name);
        debug!("Drive 查询: {}", query);

        let request = self.http.get(url).query(&[
            ("q", query.as_str()),
            ("fields", "files(id,name)"),
            ("supportsAllDrives", "true"),
            ("includeItemsFromAllDrives", "true"),
        ]);
        let list: DriveFileList = self.send(request, "drive/v3/files").await?;

        if list.files.len() > 1 {
            warn!("⚠️ 找到 {} 个同名表格，使用第一个", list.files.len());
        }

        list.files
            .into_iter()
            .next()
            .map(|f| f.id)
            .ok_or_else(|| {
                StoreError::SpreadsheetNotFound {
                    name: name.to_string(),
                }
                .into()
            })
    }

    /// 发送请求并把响应体解析为 JSON
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> AppResult<T> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| AppError::store_unreachable(endpoint, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::store_unreachable(endpoint, e))?;

        if !status.is_success() {
            return Err(StoreError::BadResponse {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            }
            .into());
        }

        serde_json::from_str(&body).map_err(|source| {
            StoreError::JsonParseFailed {
                endpoint: endpoint.to_string(),
                source,
            }
            .into()
        })
    }
}

#[async_trait]
impl RowStore for SheetsClient {
    async fn worksheet_titles(&self) -> AppResult<Vec<String>> {
        let url = build_url(&self.sheets_base_url, &["v4", "spreadsheets", &self.spreadsheet_id])?;
        let request = self.http.get(url).query(&[("fields", "sheets.properties.title")]);
        let meta: SpreadsheetMeta = self.send(request, "spreadsheets.get").await?;

        Ok(meta.sheets.into_iter().map(|s| s.properties.title).collect())
    }

    async fn add_worksheet(&self, title: &str, rows: u32, cols: u32) -> AppResult<()> {
        let batch_update = format!("{}:batchUpdate", self.spreadsheet_id);
        let url = build_url(&self.sheets_base_url, &["v4", "spreadsheets", &batch_update])?;
        let body = json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": title,
                        "gridProperties": { "rowCount": rows, "columnCount": cols }
                    }
                }
            }]
        });

        let _: Value = self
            .send(self.http.post(url).json(&body), "spreadsheets.batchUpdate")
            .await?;
        info!("📄 已新建工作表: {}", title);
        Ok(())
    }

    async fn append_row(&self, worksheet: &str, cells: &[CellValue]) -> AppResult<()> {
        let append = format!("{}:append", a1_range(worksheet));
        let url = build_url(
            &self.sheets_base_url,
            &["v4", "spreadsheets", &self.spreadsheet_id, "values", &append],
        )?;
        let body = json!({
            "majorDimension": "ROWS",
            "values": [cells],
        });

        let request = self
            .http
            .post(url)
            .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
            .json(&body);
        let result: Value = self.send(request, "values.append").await?;

        debug!("追加结果: {}", result);
        Ok(())
    }
}

/// 在 base 后面逐段拼接路径（每段单独转义）
fn build_url(base: &str, segments: &[&str]) -> AppResult<Url> {
    let mut url = Url::parse(base).map_err(|e| ConfigError::InvalidUrl {
        url: base.to_string(),
        reason: e.to_string(),
    })?;

    url.path_segments_mut()
        .map_err(|_| ConfigError::InvalidUrl {
            url: base.to_string(),
            reason: "cannot be a base".to_string(),
        })?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

/// 工作表的 A1 区间，名称中的单引号需要成对转义
fn a1_range(worksheet: &str) -> String {
    format!("'{}'!A1", worksheet.replace('\'', "''"))
}

fn drive_name_query(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('\'', "\\'");
    format!(
        "name = '{}' and mimeType = '{}' and trashed = false",
        escaped, SPREADSHEET_MIME
    )
}
