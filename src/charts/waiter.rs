//! ダウンロード完了待機

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::ChartsError;

/// ブラウザが書き込み中の一時ファイルの拡張子。
/// Firefoxは`.part`、Chrome系は`.crdownload`/`.tmp`を使う。
/// これらは完了扱いのパターンに決して一致させない。
const PARTIAL_SUFFIXES: &[&str] = &[".part", ".crdownload", ".tmp"];

const COMPLETED_SUFFIX: &str = ".csv";

/// 保存先ディレクトリをポーリングしてダウンロード完了を待つ。
///
/// 「一時ファイルが残っておらず、かつCSVが1件以上ある」状態になるか
/// タイムアウトするまで待機する。タイムアウト時はその時点のCSV集合を
/// 返す（空のこともある）。ファイルの削除・移動は一切行わない。
#[derive(Debug, Clone)]
pub struct DownloadWaiter {
    dir: PathBuf,
    poll_interval: Duration,
    timeout: Duration,
}

impl DownloadWaiter {
    pub fn new(dir: impl Into<PathBuf>, poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            dir: dir.into(),
            poll_interval,
            timeout,
        }
    }

    /// 完了条件が成立するまで待機し、観測したCSVパスの集合を返す
    pub async fn wait(&self) -> Result<BTreeSet<PathBuf>, ChartsError> {
        let deadline = Instant::now() + self.timeout;

        loop {
            let (partials, completed) = scan_dir(&self.dir)?;

            if partials == 0 && !completed.is_empty() {
                debug!("ダウンロード完了を検出: {} 件", completed.len());
                return Ok(completed);
            }

            if Instant::now() >= deadline {
                warn!(
                    "ダウンロード待機がタイムアウトしました ({:?}): 一時ファイル {} 件",
                    self.timeout, partials
                );
                return Ok(completed);
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// トリガー前のスナップショット用: 現時点の完了CSV集合を返す
    pub fn completed_snapshot(&self) -> Result<BTreeSet<PathBuf>, ChartsError> {
        let (_, completed) = scan_dir(&self.dir)?;
        Ok(completed)
    }
}

fn is_partial(name: &str) -> bool {
    PARTIAL_SUFFIXES.iter().any(|s| name.ends_with(s))
}

fn scan_dir(dir: &Path) -> Result<(usize, BTreeSet<PathBuf>), ChartsError> {
    let mut partials = 0usize;
    let mut completed = BTreeSet::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_partial(&name) {
            partials += 1;
        } else if name.ends_with(COMPLETED_SUFFIX) {
            completed.insert(entry.path());
        }
    }

    Ok((partials, completed))
}
