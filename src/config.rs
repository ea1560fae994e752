use std::path::PathBuf;
use std::time::Duration;

/// ダウンロード実行の設定。
/// ダウンロード先ディレクトリはグローバル変数ではなく、ここから各コンポーネントへ
/// 引数として渡す。
#[derive(Debug, Clone)]
pub struct ChartsConfig {
    /// CSVの保存先ディレクトリ
    pub download_path: PathBuf,
    /// ヘッドレスモード（手動ログインする場合はfalse）
    pub headless: bool,
    /// CSVエクスポートボタンがクリック可能になるまでの待機時間
    pub locator_timeout: Duration,
    /// ダウンロード完了待機のタイムアウト
    pub download_timeout: Duration,
    /// ダウンロード完了待機のポーリング間隔
    pub poll_interval: Duration,
    /// 1チャートあたりの追加リトライ回数（0なら初回失敗で打ち切り）
    pub max_retries: u32,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            download_path: PathBuf::from("./downloads"),
            headless: false,
            locator_timeout: Duration::from_secs(15),
            download_timeout: Duration::from_secs(40),
            poll_interval: Duration::from_millis(500),
            max_retries: 1,
        }
    }
}

impl ChartsConfig {
    pub fn new(download_path: impl Into<PathBuf>) -> Self {
        Self {
            download_path: download_path.into(),
            ..Default::default()
        }
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_locator_timeout(mut self, timeout: Duration) -> Self {
        self.locator_timeout = timeout;
        self
    }

    pub fn with_download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ChartsConfig::new("/tmp/charts")
            .with_headless(true)
            .with_locator_timeout(Duration::from_secs(5))
            .with_download_timeout(Duration::from_secs(10))
            .with_poll_interval(Duration::from_millis(100))
            .with_max_retries(2);

        assert_eq!(config.download_path, PathBuf::from("/tmp/charts"));
        assert!(config.headless);
        assert_eq!(config.locator_timeout, Duration::from_secs(5));
        assert_eq!(config.download_timeout, Duration::from_secs(10));
        assert_eq!(config.poll_interval, Duration::from_millis(100));
        assert_eq!(config.max_retries, 2);
    }

    #[test]
    fn test_config_defaults() {
        let config = ChartsConfig::default();
        assert_eq!(config.download_timeout, Duration::from_secs(40));
        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert_eq!(config.max_retries, 1);
        assert!(!config.headless);
    }
}
