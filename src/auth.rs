//! 認証情報の解決
//!
//! オーケストレーション開始前に一度だけ `CredentialSource` を具体的な
//! `Credentials` へ解決する。環境変数があればそれを使い、なければ
//! 対話プロンプトで入力させる。

use std::io::Write;

use tracing::info;

use crate::error::ChartsError;

const USERNAME_ENV: &str = "SPOTIFY_USERNAME";
const PASSWORD_ENV: &str = "SPOTIFY_PASSWORD";

/// ログインに使うユーザー名/パスワードのペア
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// 認証情報の取得元
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// 環境変数から読む（既定: SPOTIFY_USERNAME / SPOTIFY_PASSWORD）
    Environment {
        username_var: String,
        password_var: String,
    },
    /// 標準入力からの対話プロンプト
    InteractivePrompt,
}

impl CredentialSource {
    pub fn environment() -> Self {
        Self::Environment {
            username_var: USERNAME_ENV.to_string(),
            password_var: PASSWORD_ENV.to_string(),
        }
    }

    /// 環境変数が揃っていればEnvironment、なければInteractivePrompt
    pub fn detect() -> Self {
        if std::env::var(USERNAME_ENV).is_ok() && std::env::var(PASSWORD_ENV).is_ok() {
            Self::environment()
        } else {
            Self::InteractivePrompt
        }
    }

    /// 具体的な認証情報へ解決する
    pub fn resolve(&self) -> Result<Credentials, ChartsError> {
        match self {
            Self::Environment {
                username_var,
                password_var,
            } => {
                let username = std::env::var(username_var).map_err(|_| {
                    ChartsError::AuthenticationIncomplete(format!(
                        "環境変数 {} が設定されていません",
                        username_var
                    ))
                })?;
                let password = std::env::var(password_var).map_err(|_| {
                    ChartsError::AuthenticationIncomplete(format!(
                        "環境変数 {} が設定されていません",
                        password_var
                    ))
                })?;
                info!("環境変数から認証情報を取得しました");
                Ok(Credentials::new(username, password))
            }
            Self::InteractivePrompt => {
                let username = prompt("ユーザー名: ")?;
                let password = prompt("パスワード: ")?;
                Ok(Credentials::new(username, password))
            }
        }
    }
}

fn prompt(label: &str) -> Result<String, ChartsError> {
    print!("{}", label);
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    let value = line.trim().to_string();

    if value.is_empty() {
        return Err(ChartsError::AuthenticationIncomplete(
            "入力が空です".into(),
        ));
    }
    Ok(value)
}
