//! チャートダウンロードのコアモジュール
//!
//! 作業項目生成 → 取得済みフィルタ → 直列フェッチ → 完了待機、の
//! オーケストレーションを担う。ブラウザ操作は `ChartBrowser` トレイト
//! 越しにのみ行う。

mod completion;
mod fetcher;
mod generator;
mod orchestrator;
mod regions;
mod types;
mod waiter;

pub use completion::CompletionStore;
pub use fetcher::{ChartFetcher, CSV_EXPORT_SELECTOR};
pub use generator::{generate_chart_ids, generate_dates, normalize_region, parse_date};
pub use orchestrator::{plan_candidates, DownloadOrchestrator};
pub use regions::{lookup_region_code, parse_inline_regions, parse_region_file};
pub use types::{ChartId, DownloadOutcome, DownloadSummary, CHART_VIEW_URL_BASE};
pub use waiter::DownloadWaiter;

#[cfg(test)]
pub(crate) mod testing {
    //! フェッチ/オーケストレーションのテスト用ブラウザダブル

    use std::path::PathBuf;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::error::ChartsError;
    use crate::traits::ChartBrowser;

    /// `ChartBrowser` のフェイク実装。
    /// 呼び出しを記録し、クリック時に保存先へCSVを生成できる。
    pub struct FakeBrowser {
        dir: PathBuf,
        authenticated: bool,
        /// 最初のN回の `wait_until_clickable` を失敗させる
        fail_first: usize,
        write_on_click: bool,
        pub navigations: Vec<String>,
        pub wait_attempts: usize,
        pub clicks: usize,
    }

    impl FakeBrowser {
        pub fn new(dir: impl Into<PathBuf>) -> Self {
            Self {
                dir: dir.into(),
                authenticated: true,
                fail_first: 0,
                write_on_click: false,
                navigations: Vec::new(),
                wait_attempts: 0,
                clicks: 0,
            }
        }

        pub fn unauthenticated(mut self) -> Self {
            self.authenticated = false;
            self
        }

        pub fn fails_first(mut self, n: usize) -> Self {
            self.fail_first = n;
            self
        }

        pub fn writes_csv_on_click(mut self) -> Self {
            self.write_on_click = true;
            self
        }
    }

    #[async_trait]
    impl ChartBrowser for FakeBrowser {
        async fn navigate(&mut self, url: &str) -> Result<(), ChartsError> {
            self.navigations.push(url.to_string());
            Ok(())
        }

        async fn wait_until_clickable(
            &mut self,
            selector: &str,
            _timeout: Duration,
        ) -> Result<(), ChartsError> {
            self.wait_attempts += 1;
            if self.wait_attempts <= self.fail_first {
                return Err(ChartsError::LocatorTimeout(selector.to_string()));
            }
            Ok(())
        }

        async fn click(&mut self, _selector: &str) -> Result<(), ChartsError> {
            self.clicks += 1;
            if self.write_on_click {
                // 実ブラウザ同様、サイト側の命名でファイルが落ちてくる
                let name = format!("download-{}.csv", self.clicks);
                std::fs::write(self.dir.join(name), b"rank,track\n")?;
            }
            Ok(())
        }

        fn is_authenticated(&self) -> bool {
            self.authenticated
        }
    }
}
