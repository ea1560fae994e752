//! チャート識別子と実行結果の型定義

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ChartsError;

/// チャートビューURLのテンプレート（region と ISO日付を埋め込む）
pub const CHART_VIEW_URL_BASE: &str = "https://charts.spotify.com/charts/view";

/// 1枚のチャートを指す (region, date) ペア。
///
/// `region` は2文字の国コードまたは `"global"`。URLとファイル名の両方に
/// 埋め込まれるため、構築時にパス区切り文字などを含まないことを検証する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChartId {
    pub region: String,
    pub date: NaiveDate,
}

impl ChartId {
    pub fn new(region: impl Into<String>, date: NaiveDate) -> Result<Self, ChartsError> {
        let region = region.into();
        if region.is_empty() {
            return Err(ChartsError::InvalidRegion("空のリージョントークン".into()));
        }
        if region
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_whitespace())
        {
            return Err(ChartsError::InvalidRegion(format!(
                "使用できない文字を含みます: {:?}",
                region
            )));
        }
        Ok(Self { region, date })
    }

    /// 冪等性キー: このファイル名が保存先に存在すれば取得済みとみなす
    pub fn expected_filename(&self) -> String {
        format!(
            "regional-{}-daily-{}.csv",
            self.region,
            self.date.format("%Y-%m-%d")
        )
    }

    /// チャートビューのページURL
    pub fn view_url(&self) -> String {
        format!(
            "{}/regional-{}-daily/{}",
            CHART_VIEW_URL_BASE,
            self.region,
            self.date.format("%Y-%m-%d")
        )
    }
}

impl std::fmt::Display for ChartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.region, self.date.format("%Y-%m-%d"))
    }
}

/// チャート1枚あたりのダウンロード結果
#[derive(Debug, Clone, Serialize)]
pub enum DownloadOutcome {
    /// 初回で成功
    Success(PathBuf),
    /// リトライ後に成功
    RetriedThenSuccess(PathBuf),
    /// 初回失敗・リトライなしで打ち切り
    Failed(String),
    /// リトライを使い切って失敗
    RetriedThenFailed(String),
}

impl DownloadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            DownloadOutcome::Success(_) | DownloadOutcome::RetriedThenSuccess(_)
        )
    }
}

/// 実行全体のサマリ
#[derive(Debug, Clone, Default, Serialize)]
pub struct DownloadSummary {
    /// 初回で成功した件数
    pub success: usize,
    /// リトライ後に成功した件数
    pub retried_success: usize,
    /// 失敗した件数
    pub failed: usize,
    /// CSVの保存先ディレクトリ
    pub download_path: PathBuf,
}

impl DownloadSummary {
    pub fn new(download_path: impl Into<PathBuf>) -> Self {
        Self {
            download_path: download_path.into(),
            ..Default::default()
        }
    }

    pub fn record(&mut self, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Success(_) => self.success += 1,
            DownloadOutcome::RetriedThenSuccess(_) => self.retried_success += 1,
            DownloadOutcome::Failed(_) | DownloadOutcome::RetriedThenFailed(_) => {
                self.failed += 1
            }
        }
    }

    pub fn total(&self) -> usize {
        self.success + self.retried_success + self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_expected_filename() {
        let id = ChartId::new("global", date("2024-01-05")).unwrap();
        assert_eq!(id.expected_filename(), "regional-global-daily-2024-01-05.csv");

        let id = ChartId::new("jp", date("2024-12-31")).unwrap();
        assert_eq!(id.expected_filename(), "regional-jp-daily-2024-12-31.csv");
    }

    #[test]
    fn test_view_url() {
        let id = ChartId::new("de", date("2024-03-09")).unwrap();
        assert_eq!(
            id.view_url(),
            "https://charts.spotify.com/charts/view/regional-de-daily/2024-03-09"
        );
    }

    #[test]
    fn test_invalid_region_rejected() {
        assert!(ChartId::new("", date("2024-01-01")).is_err());
        assert!(ChartId::new("a/b", date("2024-01-01")).is_err());
        assert!(ChartId::new("a\\b", date("2024-01-01")).is_err());
        assert!(ChartId::new("j p", date("2024-01-01")).is_err());
    }

    #[test]
    fn test_summary_record() {
        let mut summary = DownloadSummary::new("/tmp/charts");
        summary.record(&DownloadOutcome::Success(PathBuf::from("a.csv")));
        summary.record(&DownloadOutcome::RetriedThenSuccess(PathBuf::from("b.csv")));
        summary.record(&DownloadOutcome::RetriedThenFailed("timeout".into()));

        assert_eq!(summary.success, 1);
        assert_eq!(summary.retried_success, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total(), 3);
    }
}
