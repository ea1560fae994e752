use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartsError {
    #[error("日付形式が不正です (YYYY-MM-DD): {0}")]
    InvalidDateFormat(String),

    #[error("日付範囲が不正です: {0}")]
    InvalidDateRange(String),

    #[error("リージョン指定が不正です: {0}")]
    InvalidRegion(String),

    #[error("認証が完了していません: {0}")]
    AuthenticationIncomplete(String),

    #[error("ブラウザ初期化エラー: {0}")]
    BrowserInit(String),

    #[error("ナビゲーションエラー: {0}")]
    Navigation(String),

    #[error("要素が操作可能になりませんでした: {0}")]
    LocatorTimeout(String),

    #[error("新しいファイルが検出されませんでした: {0}")]
    NoNewFile(String),

    #[error("ファイル操作エラー: {0}")]
    FileIo(#[from] std::io::Error),
}

impl ChartsError {
    /// リトライ可能なフェッチ失敗か判定する。
    /// 設定・認証・ファイルシステムのエラーはリトライせず即座に打ち切る。
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ChartsError::Navigation(_)
                | ChartsError::LocatorTimeout(_)
                | ChartsError::NoNewFile(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(ChartsError::Navigation("x".into()).is_retryable());
        assert!(ChartsError::LocatorTimeout("x".into()).is_retryable());
        assert!(ChartsError::NoNewFile("x".into()).is_retryable());

        assert!(!ChartsError::InvalidDateFormat("x".into()).is_retryable());
        assert!(!ChartsError::AuthenticationIncomplete("x".into()).is_retryable());
        assert!(!ChartsError::BrowserInit("x".into()).is_retryable());
        assert!(!ChartsError::FileIo(std::io::Error::other("x")).is_retryable());
    }
}
