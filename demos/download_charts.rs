//! チャートCSV一括ダウンロード
//!
//! 実行方法:
//! ```
//! cargo run --example download_charts -- 2024-01-01 2024-01-31 ./data/charts global,jp
//! ```
//!
//! リージョンは `@regions.txt`（1行1トークン）でも指定できる。
//! SPOTIFY_USERNAME / SPOTIFY_PASSWORD があれば自動ログイン、
//! なければブラウザでの手動ログインを待つ。

use std::path::Path;

use charts_scraper::charts::{parse_inline_regions, parse_region_file};
use charts_scraper::{
    plan_candidates, ChartsConfig, ChromiumBrowser, CredentialSource, DownloadOrchestrator,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ログ設定
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let start_date = args.get(1).cloned().unwrap_or_else(|| "2017-01-01".into());
    let end_date = args
        .get(2)
        .cloned()
        .unwrap_or_else(|| chrono::Local::now().date_naive().format("%Y-%m-%d").to_string());
    let output_dir = args.get(3).cloned().unwrap_or_else(|| "./data/global_charts".into());
    let region_arg = args.get(4).cloned().unwrap_or_else(|| "global".into());

    let regions = if let Some(path) = region_arg.strip_prefix('@') {
        parse_region_file(Path::new(path))?
    } else {
        parse_inline_regions(&region_arg)?
    };

    println!("=== Charts Download ===");
    println!("期間: {} 〜 {}", start_date, end_date);
    println!("リージョン: {:?}", regions);
    println!("保存先: {}", output_dir);

    let config = ChartsConfig::new(&output_dir);

    // 候補が空ならブラウザを起動せずに終了（exit code 0）
    let candidates = plan_candidates(&start_date, &end_date, &regions, &config)?;
    if candidates.is_empty() {
        println!("ダウンロード対象はありません。全て取得済みです。");
        return Ok(());
    }
    println!("未取得: {} 件", candidates.len());

    let mut browser = ChromiumBrowser::new(config.clone());
    browser.initialize().await?;

    // 環境変数があれば自動ログイン、なければ手動ログイン
    match CredentialSource::detect() {
        source @ CredentialSource::Environment { .. } => {
            let credentials = source.resolve()?;
            browser.login(&credentials).await?;
        }
        CredentialSource::InteractivePrompt => {
            browser.manual_login().await?;
        }
    }

    let summary = DownloadOrchestrator::new(&config)
        .run(&mut browser, &candidates)
        .await?;

    browser.close().await?;

    println!();
    println!("=== Summary ===");
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
