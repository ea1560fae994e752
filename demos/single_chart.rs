//! チャート1枚のフェッチ確認用
//!
//! 実行方法:
//! ```
//! cargo run --example single_chart -- global 2024-01-01 ./data/charts
//! ```

use charts_scraper::charts::{normalize_region, parse_date, ChartFetcher};
use charts_scraper::{ChartId, ChartsConfig, ChromiumBrowser};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let region = args.get(1).cloned().unwrap_or_else(|| "global".into());
    let date = args.get(2).cloned().unwrap_or_else(|| "2024-01-01".into());
    let output_dir = args.get(3).cloned().unwrap_or_else(|| "./data/charts".into());

    let id = ChartId::new(normalize_region(&region), parse_date(&date)?)?;
    println!("=== Single Chart Fetch ===");
    println!("URL: {}", id.view_url());
    println!("期待ファイル名: {}", id.expected_filename());

    let config = ChartsConfig::new(&output_dir);
    let mut browser = ChromiumBrowser::new(config.clone());
    browser.initialize().await?;
    browser.manual_login().await?;

    let fetcher = ChartFetcher::new(&config);
    match fetcher.fetch(&mut browser, &id).await {
        Ok(path) => println!("成功! 保存先: {:?}", path),
        Err(e) => eprintln!("エラー: {}", e),
    }

    browser.close().await?;
    Ok(())
}
