//! チャート1枚のフェッチ処理
//!
//! 新規ファイルの特定はトリガー前後のCSV集合の差分で行う。ダウンロード
//! されたファイル名と要求した識別子の突き合わせはしないため、同時に
//! 複数のダウンロードを走らせると壊れる。フェッチは常に1件ずつ直列で
//! 実行するのが前提。

use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::ChartsConfig;
use crate::error::ChartsError;
use crate::traits::ChartBrowser;

use super::types::ChartId;
use super::waiter::DownloadWaiter;

/// CSVエクスポートボタンのセレクタ
pub const CSV_EXPORT_SELECTOR: &str = r#"button[aria-labelledby="csv_download"]"#;

pub struct ChartFetcher {
    locator_timeout: std::time::Duration,
    waiter: DownloadWaiter,
}

impl ChartFetcher {
    pub fn new(config: &ChartsConfig) -> Self {
        Self {
            locator_timeout: config.locator_timeout,
            waiter: DownloadWaiter::new(
                &config.download_path,
                config.poll_interval,
                config.download_timeout,
            ),
        }
    }

    /// チャートページを開き、エクスポートボタンを押してCSVの出現を待つ。
    /// 新規ファイルがちょうど1件現れたら成功。
    pub async fn fetch(
        &self,
        browser: &mut dyn ChartBrowser,
        id: &ChartId,
    ) -> Result<PathBuf, ChartsError> {
        let url = id.view_url();
        info!("Opening: {}", url);
        browser.navigate(&url).await?;

        browser
            .wait_until_clickable(CSV_EXPORT_SELECTOR, self.locator_timeout)
            .await?;

        // トリガー前のCSV集合を記録してから押す
        let before = self.waiter.completed_snapshot()?;
        browser.click(CSV_EXPORT_SELECTOR).await?;
        info!("CSVダウンロードボタンをクリック、ファイルを待機中...");

        let after = self.waiter.wait().await?;
        let mut new_files: Vec<PathBuf> = after.difference(&before).cloned().collect();

        match new_files.len() {
            0 => Err(ChartsError::NoNewFile(id.to_string())),
            1 => {
                let path = new_files.remove(0);
                info!("Downloaded: {:?}", path.file_name().unwrap_or_default());
                Ok(path)
            }
            n => {
                // BTreeSet由来なのでソート済み。先頭を報告する
                warn!("新規ファイルが {} 件検出されました（1件を想定）", n);
                Ok(new_files.remove(0))
            }
        }
    }
}
