//! ダウンロードの直列オーケストレーション

use tracing::{info, warn};

use crate::config::ChartsConfig;
use crate::error::ChartsError;
use crate::traits::ChartBrowser;

use super::completion::CompletionStore;
use super::fetcher::ChartFetcher;
use super::generator::generate_chart_ids;
use super::types::{ChartId, DownloadOutcome, DownloadSummary};

/// 未取得の識別子リストを構築する。
///
/// 保存先のスナップショットは開始時の一度きりで、実行中には更新しない。
/// 外部プロセスが同じディレクトリへ書き込むケースはサポート外。
pub fn plan_candidates(
    start: &str,
    end: &str,
    regions: &[String],
    config: &ChartsConfig,
) -> Result<Vec<ChartId>, ChartsError> {
    let all = generate_chart_ids(start, end, regions)?;
    let store = CompletionStore::scan(&config.download_path)?;

    let candidates: Vec<ChartId> = all
        .into_iter()
        .filter(|id| !store.is_satisfied(id))
        .collect();

    info!(
        "候補 {} 件（取得済み {} 件をスキップ）",
        candidates.len(),
        store.len()
    );
    Ok(candidates)
}

pub struct DownloadOrchestrator {
    fetcher: ChartFetcher,
    max_retries: u32,
    download_path: std::path::PathBuf,
}

impl DownloadOrchestrator {
    pub fn new(config: &ChartsConfig) -> Self {
        Self {
            fetcher: ChartFetcher::new(config),
            max_retries: config.max_retries,
            download_path: config.download_path.clone(),
        }
    }

    /// 候補リストを順に処理してサマリを返す。
    ///
    /// ブラウザは単一の直列リソースなのでフェッチは常に逐次実行。
    /// リトライは識別子ごとに最大 `max_retries` 回の有限ループで、
    /// 失敗しても次の候補へ進む。致命的エラー（認証・ファイルシステム）
    /// のみ実行全体を中断する。
    pub async fn run(
        &self,
        browser: &mut dyn ChartBrowser,
        candidates: &[ChartId],
    ) -> Result<DownloadSummary, ChartsError> {
        let mut summary = DownloadSummary::new(&self.download_path);

        if candidates.is_empty() {
            info!("ダウンロード対象はありません（全て取得済み）");
            return Ok(summary);
        }

        if !browser.is_authenticated() {
            return Err(ChartsError::AuthenticationIncomplete(
                "ログインを完了してからオーケストレーションを開始してください".into(),
            ));
        }

        for (i, id) in candidates.iter().enumerate() {
            info!("[{}/{}] {}", i + 1, candidates.len(), id);
            let outcome = self.fetch_with_retry(browser, id).await?;

            if let DownloadOutcome::Failed(reason) | DownloadOutcome::RetriedThenFailed(reason) =
                &outcome
            {
                warn!("{} の取得に失敗: {}", id, reason);
            }
            summary.record(&outcome);
        }

        info!(
            "完了: 成功 {} / リトライ後成功 {} / 失敗 {} → {:?}",
            summary.success, summary.retried_success, summary.failed, summary.download_path
        );
        Ok(summary)
    }

    /// 有限リトライ付きで1件フェッチする。再帰はしない。
    async fn fetch_with_retry(
        &self,
        browser: &mut dyn ChartBrowser,
        id: &ChartId,
    ) -> Result<DownloadOutcome, ChartsError> {
        let mut attempt = 0u32;
        loop {
            match self.fetcher.fetch(browser, id).await {
                Ok(path) => {
                    return Ok(if attempt == 0 {
                        DownloadOutcome::Success(path)
                    } else {
                        DownloadOutcome::RetriedThenSuccess(path)
                    });
                }
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) if attempt < self.max_retries => {
                    warn!("{} のフェッチ失敗 (attempt {}): {}", id, attempt + 1, e);
                    attempt += 1;
                }
                Err(e) => {
                    return Ok(if attempt == 0 {
                        DownloadOutcome::Failed(e.to_string())
                    } else {
                        DownloadOutcome::RetriedThenFailed(e.to_string())
                    });
                }
            }
        }
    }
}
