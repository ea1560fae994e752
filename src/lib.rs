//! Spotify Charts ダウンロードオーケストレータ
//!
//! (region, date) の直積から未取得のチャートを洗い出し、ブラウザ自動化で
//! 日次CSVを順番にダウンロードする。取得済みファイルはスキップする。
//!
//! # 使用例
//!
//! ```rust,ignore
//! use charts_scraper::{ChartsService, DownloadRequest, Credentials};
//! use tower::Service;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut service = ChartsService::new();
//!
//!     let request = DownloadRequest::new("2024-01-01", "2024-01-31")
//!         .with_regions(vec!["global".into(), "jp".into()])
//!         .with_download_path("./data/charts")
//!         .with_credentials(Credentials::new("user", "pass"));
//!
//!     let summary = service.call(request).await.unwrap();
//!     println!("success={} failed={}", summary.success, summary.failed);
//! }
//! ```
//!
//! # 手動ログインでの使用例
//!
//! ```rust,ignore
//! use charts_scraper::{
//!     plan_candidates, ChartsConfig, ChromiumBrowser, DownloadOrchestrator,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ChartsConfig::new("./data/charts");
//!     let regions = vec!["global".to_string()];
//!     let candidates =
//!         plan_candidates("2024-01-01", "2024-01-07", &regions, &config).unwrap();
//!
//!     let mut browser = ChromiumBrowser::new(config.clone());
//!     browser.initialize().await.unwrap();
//!     browser.manual_login().await.unwrap();
//!
//!     let summary = DownloadOrchestrator::new(&config)
//!         .run(&mut browser, &candidates)
//!         .await
//!         .unwrap();
//!     println!("failed: {}", summary.failed);
//! }
//! ```

pub mod auth;
pub mod browser;
pub mod charts;
pub mod config;
pub mod error;
pub mod service;
pub mod traits;

// 主要な型をリエクスポート
pub use auth::{CredentialSource, Credentials};
pub use browser::ChromiumBrowser;
pub use charts::{
    plan_candidates, ChartFetcher, ChartId, CompletionStore, DownloadOrchestrator,
    DownloadOutcome, DownloadSummary, DownloadWaiter,
};
pub use config::ChartsConfig;
pub use error::ChartsError;
pub use service::{ChartsService, DownloadRequest};
pub use traits::ChartBrowser;
