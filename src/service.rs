use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};

use tower::Service;
use tracing::info;

use crate::auth::Credentials;
use crate::browser::ChromiumBrowser;
use crate::charts::{plan_candidates, DownloadOrchestrator, DownloadSummary};
use crate::config::ChartsConfig;
use crate::error::ChartsError;

/// ダウンロードリクエスト
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub start_date: String,
    pub end_date: String,
    pub regions: Vec<String>,
    pub download_path: PathBuf,
    pub headless: bool,
    /// 自動ログイン用の認証情報（サービス経由では必須）
    pub credentials: Option<Credentials>,
}

impl DownloadRequest {
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
            regions: vec!["global".to_string()],
            download_path: PathBuf::from("./downloads"),
            headless: true,
            credentials: None,
        }
    }

    pub fn with_regions(mut self, regions: Vec<String>) -> Self {
        self.regions = regions;
        self
    }

    pub fn with_download_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.download_path = path.into();
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }
}

impl From<&DownloadRequest> for ChartsConfig {
    fn from(req: &DownloadRequest) -> Self {
        ChartsConfig::new(&req.download_path).with_headless(req.headless)
    }
}

/// tower::Serviceを実装したダウンロードサービス
#[derive(Debug, Clone, Default)]
pub struct ChartsService {
    // 将来的な拡張用（レートリミットなど）
}

impl ChartsService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Service<DownloadRequest> for ChartsService {
    type Response = DownloadSummary;
    type Error = ChartsError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: DownloadRequest) -> Self::Future {
        info!(
            "ダウンロードリクエスト受信: {} 〜 {} ({} regions)",
            req.start_date,
            req.end_date,
            req.regions.len()
        );

        Box::pin(async move {
            let config: ChartsConfig = (&req).into();

            // 候補が空ならブラウザを起動せずに終了
            let candidates =
                plan_candidates(&req.start_date, &req.end_date, &req.regions, &config)?;
            if candidates.is_empty() {
                info!("ダウンロード対象はありません");
                return Ok(DownloadSummary::new(&config.download_path));
            }

            let credentials = req.credentials.ok_or_else(|| {
                ChartsError::AuthenticationIncomplete(
                    "サービス経由の実行には認証情報が必要です".into(),
                )
            })?;

            let mut browser = ChromiumBrowser::new(config.clone());
            browser.initialize().await?;
            browser.login(&credentials).await?;

            let orchestrator = DownloadOrchestrator::new(&config);
            let summary = orchestrator.run(&mut browser, &candidates).await;

            browser.close().await?;
            let summary = summary?;

            info!(
                "ダウンロード完了: {} 件処理 → {:?}",
                summary.total(),
                summary.download_path
            );
            Ok(summary)
        })
    }
}
