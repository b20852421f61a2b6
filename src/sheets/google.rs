//! Google Sheets REST client.
//!
//! Spreadsheets are opened by name through a Drive v3 search, then read and
//! written through the Sheets v4 values API. Only the first worksheet is used.

use anyhow::Context;
use async_trait::async_trait;
use gcp_auth::{CustomServiceAccount, TokenProvider};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use super::{pad_rows, RowStore};
use crate::utils::{a1_cell, quote_sheet_title};
use crate::{Result, SheetSummarizerError};

/// OAuth scopes needed to find a spreadsheet by name and edit it
pub const GOOGLE_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive",
];

const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

/// Supplies bearer tokens for Google API calls
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

/// Tokens minted from a service-account key file
pub struct ServiceAccountTokens {
    account: CustomServiceAccount,
}

impl ServiceAccountTokens {
    pub fn from_file(path: &Path) -> Result<Self> {
        let account = CustomServiceAccount::from_file(path).map_err(|e| {
            anyhow::anyhow!(
                "Failed to load service account from {}: {}",
                path.display(),
                e
            )
        })?;

        Ok(Self { account })
    }
}

#[async_trait]
impl AccessTokenSource for ServiceAccountTokens {
    async fn access_token(&self) -> Result<String> {
        let token = self
            .account
            .token(GOOGLE_SCOPES)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to obtain Google access token: {}", e))?;

        Ok(token.as_str().to_string())
    }
}

/// Base URLs for the Google APIs
#[derive(Debug, Clone)]
pub struct GoogleEndpoints {
    pub drive: String,
    pub sheets: String,
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            drive: "https://www.googleapis.com/drive/v3".to_string(),
            sheets: "https://sheets.googleapis.com/v4".to_string(),
        }
    }
}

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
    sheets: Vec<SheetMeta>,
}

#[derive(Debug, Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
    #[serde(default)]
    index: u32,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Handle on the first worksheet of one spreadsheet
pub struct GoogleSheetsClient {
    http: Client,
    tokens: Arc<dyn AccessTokenSource>,
    sheets_base: String,
    spreadsheet_id: String,
    sheet_title: String,
}

impl GoogleSheetsClient {
    /// Open a spreadsheet by its Drive name
    pub async fn open_by_name(tokens: Arc<dyn AccessTokenSource>, name: &str) -> Result<Self> {
        Self::open_with_endpoints(tokens, name, GoogleEndpoints::default()).await
    }

    pub async fn open_with_endpoints(
        tokens: Arc<dyn AccessTokenSource>,
        name: &str,
        endpoints: GoogleEndpoints,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("yt-sheet-summarizer/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let spreadsheet_id = Self::find_spreadsheet_id(&http, tokens.as_ref(), &endpoints.drive, name).await?;

        let mut client = Self {
            http,
            tokens,
            sheets_base: endpoints.sheets.trim_end_matches('/').to_string(),
            spreadsheet_id,
            sheet_title: String::new(),
        };
        client.sheet_title = client.first_sheet_title().await?;

        tracing::info!(
            spreadsheet = name,
            id = %client.spreadsheet_id,
            sheet = %client.sheet_title,
            "Opened spreadsheet"
        );

        Ok(client)
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    pub fn sheet_title(&self) -> &str {
        &self.sheet_title
    }

    async fn find_spreadsheet_id(
        http: &Client,
        tokens: &dyn AccessTokenSource,
        drive_base: &str,
        name: &str,
    ) -> Result<String> {
        let query = format!(
            "name = '{}' and mimeType = '{}' and trashed = false",
            name.replace('\\', "\\\\").replace('\'', "\\'"),
            SPREADSHEET_MIME_TYPE
        );
        let url = format!("{}/files", drive_base.trim_end_matches('/'));
        let token = tokens.access_token().await?;

        let response = http
            .get(&url)
            .bearer_auth(&token)
            .query(&[
                ("q", query.as_str()),
                ("fields", "files(id,name)"),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
            ])
            .send()
            .await
            .context("Failed to search Google Drive")?;

        let list: DriveFileList = Self::parse(response, &url).await?;

        list.files
            .into_iter()
            .next()
            .map(|file| file.id)
            .ok_or_else(|| SheetSummarizerError::SpreadsheetNotFound(name.to_string()).into())
    }

    async fn first_sheet_title(&self) -> Result<String> {
        let url = format!("{}/spreadsheets/{}", self.sheets_base, self.spreadsheet_id);
        let token = self.tokens.access_token().await?;

        let response = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .query(&[("fields", "sheets.properties(title,index)")])
            .send()
            .await
            .context("Failed to read spreadsheet metadata")?;

        let meta: SpreadsheetMeta = Self::parse(response, &url).await?;

        meta.sheets
            .into_iter()
            .min_by_key(|sheet| sheet.properties.index)
            .map(|sheet| sheet.properties.title)
            .ok_or_else(|| {
                SheetSummarizerError::SheetsApi(format!(
                    "spreadsheet {} has no worksheets",
                    self.spreadsheet_id
                ))
                .into()
            })
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}",
            self.sheets_base,
            self.spreadsheet_id,
            urlencoding::encode(range)
        )
    }

    async fn parse<T: DeserializeOwned>(response: Response, url: &str) -> Result<T> {
        let response = Self::check(response, url).await?;
        response
            .json()
            .await
            .with_context(|| format!("Invalid response from {}", url))
    }

    async fn check(response: Response, url: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = match status {
            StatusCode::NOT_FOUND => SheetSummarizerError::SpreadsheetNotFound(format!("{}: {}", url, body)),
            _ => SheetSummarizerError::SheetsApi(format!("{} returned {}: {}", url, status, body)),
        };

        Err(err.into())
    }
}

#[async_trait]
impl RowStore for GoogleSheetsClient {
    async fn get_all_values(&self) -> Result<Vec<Vec<String>>> {
        let url = self.values_url(&quote_sheet_title(&self.sheet_title));
        let token = self.tokens.access_token().await?;

        let response = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .context("Failed to read sheet values")?;

        let range: ValueRange = Self::parse(response, &url).await?;
        Ok(pad_rows(range.values))
    }

    async fn update_cell(&self, row: usize, col: usize, value: &str) -> Result<()> {
        let range = format!("{}!{}", quote_sheet_title(&self.sheet_title), a1_cell(row, col));
        let url = self.values_url(&range);
        let token = self.tokens.access_token().await?;

        tracing::debug!(%range, "Updating cell");

        let response = self
            .http
            .put(&url)
            .bearer_auth(&token)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&json!({
                "range": range,
                "majorDimension": "ROWS",
                "values": [[value]],
            }))
            .send()
            .await
            .with_context(|| format!("Failed to update cell {}", range))?;

        Self::check(response, &url).await?;
        Ok(())
    }
}
