use async_trait::async_trait;

pub mod google;

pub use google::{AccessTokenSource, GoogleSheetsClient, ServiceAccountTokens};

use crate::Result;

/// Tabular store the summarizer reads rows from and writes results to
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Every row of the worksheet, header included, padded to equal width
    async fn get_all_values(&self) -> Result<Vec<Vec<String>>>;

    /// Write one cell, using 1-based row and column numbers
    async fn update_cell(&self, row: usize, col: usize, value: &str) -> Result<()>;
}

/// Pad ragged rows with empty strings so every row has the same length
pub fn pad_rows(mut rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(width, String::new());
    }
    rows
}
