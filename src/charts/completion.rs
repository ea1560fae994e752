//! 取得済みファイルのスナップショット

use std::collections::HashSet;
use std::path::Path;

use tracing::info;

use crate::error::ChartsError;

use super::types::ChartId;

/// 保存先ディレクトリに既に存在するファイル名の集合。
///
/// オーケストレーション開始時に一度だけ走査し、以降は更新しない。
/// 実行中に外部プロセスがファイルを追加しても反映されない（既知の制約）。
#[derive(Debug, Clone)]
pub struct CompletionStore {
    filenames: HashSet<String>,
}

impl CompletionStore {
    /// 保存先ディレクトリを走査する。ディレクトリがなければ作成して空扱い。
    /// サブディレクトリには降りない。
    pub fn scan(dir: &Path) -> Result<Self, ChartsError> {
        std::fs::create_dir_all(dir)?;

        let mut filenames = HashSet::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                filenames.insert(entry.file_name().to_string_lossy().into_owned());
            }
        }

        info!("保存先に既存ファイル {} 件: {:?}", filenames.len(), dir);
        Ok(Self { filenames })
    }

    /// この識別子の期待ファイル名が既に存在するか
    pub fn is_satisfied(&self, id: &ChartId) -> bool {
        self.filenames.contains(&id.expected_filename())
    }

    pub fn len(&self) -> usize {
        self.filenames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filenames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn id(region: &str, date: &str) -> ChartId {
        ChartId::new(region, NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()).unwrap()
    }

    #[test]
    fn test_scan_creates_missing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("not-yet-created");

        let store = CompletionStore::scan(&dir).unwrap();
        assert!(store.is_empty());
        assert!(dir.is_dir());
    }

    #[test]
    fn test_is_satisfied() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("regional-global-daily-2024-01-01.csv"),
            "rank,track\n",
        )
        .unwrap();

        let store = CompletionStore::scan(tmp.path()).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.is_satisfied(&id("global", "2024-01-01")));
        assert!(!store.is_satisfied(&id("global", "2024-01-02")));
        assert!(!store.is_satisfied(&id("jp", "2024-01-01")));
    }

    #[test]
    fn test_scan_ignores_subdirectories() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("regional-global-daily-2024-01-01.csv")).unwrap();

        let store = CompletionStore::scan(tmp.path()).unwrap();
        assert!(!store.is_satisfied(&id("global", "2024-01-01")));
    }
}
