//! chromiumoxideによる `ChartBrowser` 実装

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::browser::{
    SetDownloadBehaviorBehavior, SetDownloadBehaviorParams,
};
use chromiumoxide::Page;
use futures::StreamExt;
use tracing::{debug, info};

use crate::auth::Credentials;
use crate::config::ChartsConfig;
use crate::error::ChartsError;
use crate::traits::ChartBrowser;

/// 手動ログイン時に開くチャート概要ページ
const CHARTS_OVERVIEW_URL: &str = "https://charts.spotify.com/charts/overview/global";
/// 自動ログイン用のログインページ
const LOGIN_URL: &str = "https://accounts.spotify.com/en/login";

const LOGIN_USERNAME_SELECTOR: &str = "input#login-username";
const LOGIN_PASSWORD_SELECTOR: &str = "input#login-password";
const LOGIN_BUTTON_SELECTOR: &str = "button#login-button";

/// クリック可能判定のポーリング間隔
const CLICKABLE_POLL_MS: u64 = 250;

pub struct ChromiumBrowser {
    config: ChartsConfig,
    browser: Option<Browser>,
    page: Option<Arc<Page>>,
    authenticated: bool,
}

impl ChromiumBrowser {
    pub fn new(config: ChartsConfig) -> Self {
        Self {
            config,
            browser: None,
            page: None,
            authenticated: false,
        }
    }

    fn get_page(&self) -> Result<&Arc<Page>, ChartsError> {
        self.page
            .as_ref()
            .ok_or_else(|| ChartsError::BrowserInit("ブラウザが初期化されていません".into()))
    }

    /// ブラウザを起動し、保存先ディレクトリへのダウンロードを設定する
    pub async fn initialize(&mut self) -> Result<(), ChartsError> {
        info!("ブラウザを初期化中...");

        // ダウンロードディレクトリを作成
        std::fs::create_dir_all(&self.config.download_path)?;
        let download_path = self
            .config
            .download_path
            .canonicalize()
            .unwrap_or_else(|_| self.config.download_path.clone());

        // ユニークなユーザーデータディレクトリを生成
        let unique_id = format!(
            "{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );
        let user_data_dir = std::env::temp_dir().join(format!("charts-scraper-{}", unique_id));

        let mut builder = BrowserConfig::builder()
            .window_size(1280, 800)
            .user_data_dir(&user_data_dir);

        // Chrome パスの上書き（CHROME_PATH / CHROMIUM_PATH）
        if let Ok(chrome_path) = std::env::var("CHROME_PATH").or_else(|_| std::env::var("CHROMIUM_PATH"))
        {
            builder = builder.chrome_executable(PathBuf::from(chrome_path));
        }

        if self.config.headless {
            builder = builder.arg("--headless=new");
        } else {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(|e| ChartsError::BrowserInit(format!("ブラウザ設定エラー: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ChartsError::BrowserInit(e.to_string()))?;

        // ブラウザイベントハンドラをバックグラウンドで実行
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                debug!("Browser event: {:?}", event);
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ChartsError::BrowserInit(e.to_string()))?;

        // ダウンロード先を設定
        let download_params = SetDownloadBehaviorParams::builder()
            .behavior(SetDownloadBehaviorBehavior::Allow)
            .download_path(download_path.to_string_lossy().to_string())
            .events_enabled(true)
            .build()
            .map_err(|e| ChartsError::BrowserInit(format!("ダウンロード設定エラー: {}", e)))?;

        page.execute(download_params)
            .await
            .map_err(|e| ChartsError::BrowserInit(format!("ダウンロード設定エラー: {}", e)))?;

        self.browser = Some(browser);
        self.page = Some(Arc::new(page));

        info!("ブラウザ初期化完了");
        Ok(())
    }

    /// 認証情報でログインする
    pub async fn login(&mut self, credentials: &Credentials) -> Result<(), ChartsError> {
        let page = self.get_page()?.clone();
        info!("ログイン処理開始...");

        page.goto(LOGIN_URL)
            .await
            .map_err(|e| ChartsError::Navigation(e.to_string()))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| ChartsError::Navigation(e.to_string()))?;

        page.find_element(LOGIN_USERNAME_SELECTOR)
            .await
            .map_err(|e| ChartsError::LocatorTimeout(format!("ユーザー名入力欄: {}", e)))?
            .type_str(&credentials.username)
            .await
            .map_err(|e| ChartsError::AuthenticationIncomplete(format!("ユーザー名入力: {}", e)))?;

        page.find_element(LOGIN_PASSWORD_SELECTOR)
            .await
            .map_err(|e| ChartsError::LocatorTimeout(format!("パスワード入力欄: {}", e)))?
            .type_str(&credentials.password)
            .await
            .map_err(|e| ChartsError::AuthenticationIncomplete(format!("パスワード入力: {}", e)))?;

        page.find_element(LOGIN_BUTTON_SELECTOR)
            .await
            .map_err(|e| ChartsError::LocatorTimeout(format!("ログインボタン: {}", e)))?
            .click()
            .await
            .map_err(|e| {
                ChartsError::AuthenticationIncomplete(format!("ログインボタンクリック: {}", e))
            })?;

        tokio::time::sleep(Duration::from_secs(3)).await;

        self.authenticated = true;
        info!("ログイン完了");
        Ok(())
    }

    /// 手動ログイン。チャート概要ページを開き、オペレータがブラウザ上で
    /// ログインしてEnterを押すまでブロックする。
    pub async fn manual_login(&mut self) -> Result<(), ChartsError> {
        let page = self.get_page()?.clone();

        page.goto(CHARTS_OVERVIEW_URL)
            .await
            .map_err(|e| ChartsError::Navigation(e.to_string()))?;

        println!("ブラウザで手動ログインしてから、ここでEnterを押してください...");
        tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            std::io::stdin().read_line(&mut line).map(|_| ())
        })
        .await
        .map_err(|e| ChartsError::AuthenticationIncomplete(e.to_string()))??;

        self.authenticated = true;
        info!("手動ログイン完了");
        Ok(())
    }

    /// ページとブラウザの参照を解放する
    pub async fn close(&mut self) -> Result<(), ChartsError> {
        info!("ブラウザを終了中...");
        self.page = None;
        self.browser = None;
        Ok(())
    }
}

#[async_trait]
impl ChartBrowser for ChromiumBrowser {
    async fn navigate(&mut self, url: &str) -> Result<(), ChartsError> {
        let page = self.get_page()?.clone();

        page.goto(url)
            .await
            .map_err(|e| ChartsError::Navigation(e.to_string()))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| ChartsError::Navigation(e.to_string()))?;
        Ok(())
    }

    async fn wait_until_clickable(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), ChartsError> {
        let page = self.get_page()?.clone();
        let deadline = Instant::now() + timeout;

        // 要素が存在し、かつdisabledでなくなるまでポーリング
        let script = format!(
            r#"
            (function() {{
                var el = document.querySelector('{}');
                return !!el && !el.disabled;
            }})()
            "#,
            selector
        );

        loop {
            let clickable: bool = page
                .evaluate(script.as_str())
                .await
                .map(|v| v.into_value().unwrap_or(false))
                .unwrap_or(false);

            if clickable {
                return Ok(());
            }

            if Instant::now() >= deadline {
                return Err(ChartsError::LocatorTimeout(selector.to_string()));
            }

            tokio::time::sleep(Duration::from_millis(CLICKABLE_POLL_MS)).await;
        }
    }

    async fn click(&mut self, selector: &str) -> Result<(), ChartsError> {
        let page = self.get_page()?.clone();

        page.find_element(selector)
            .await
            .map_err(|e| ChartsError::LocatorTimeout(format!("{}: {}", selector, e)))?
            .click()
            .await
            .map_err(|e| ChartsError::Navigation(format!("クリック失敗: {}", e)))?;
        Ok(())
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}
