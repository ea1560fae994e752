use async_trait::async_trait;
use std::time::Duration;

use crate::error::ChartsError;

/// ブラウザ自動化ケイパビリティ。
///
/// コアのフェッチ/オーケストレーション処理はこのトレイトにのみ依存する。
/// ブラウザセッションは単一の直列リソースなので、全メソッドが `&mut self`。
#[async_trait]
pub trait ChartBrowser: Send {
    /// URLへ遷移する
    async fn navigate(&mut self, url: &str) -> Result<(), ChartsError>;

    /// セレクタに一致する要素がクリック可能になるまで待機する
    async fn wait_until_clickable(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), ChartsError>;

    /// セレクタに一致する要素をクリックする
    async fn click(&mut self, selector: &str) -> Result<(), ChartsError>;

    /// ログイン（手動または自動）が完了しているか
    fn is_authenticated(&self) -> bool;
}
