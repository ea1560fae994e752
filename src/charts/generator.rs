//! (region × date) の作業項目生成

use chrono::{Duration, NaiveDate};

use crate::error::ChartsError;

use super::types::ChartId;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// ワールドワイドの別名 `"ww"` を `"global"` に正規化する。
/// URL・ファイル名の構築前に必ず通すこと。
pub fn normalize_region(token: &str) -> String {
    let token = token.trim().to_ascii_lowercase();
    if token == "ww" {
        "global".to_string()
    } else {
        token
    }
}

/// YYYY-MM-DD 文字列をパースする。形式不正は設定エラー（致命的）。
pub fn parse_date(s: &str) -> Result<NaiveDate, ChartsError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|_| ChartsError::InvalidDateFormat(s.to_string()))
}

/// 開始日から終了日まで（両端を含む）の日付リストを生成する。
pub fn generate_dates(start: &str, end: &str) -> Result<Vec<NaiveDate>, ChartsError> {
    let start = parse_date(start)?;
    let end = parse_date(end)?;

    if end < start {
        return Err(ChartsError::InvalidDateRange(format!(
            "終了日 {} が開始日 {} より前です",
            end, start
        )));
    }

    let mut dates = Vec::new();
    let mut current = start;
    while current <= end {
        dates.push(current);
        current = current + Duration::days(1);
    }
    Ok(dates)
}

/// リージョン × 日付 の直積を固定順序で生成する。
///
/// 順序はリージョン優先（外側: 呼び出し元が与えた順のリージョン、
/// 内側: 昇順の日付）。重複リージョンは正規化後に除去する。
pub fn generate_chart_ids(
    start: &str,
    end: &str,
    regions: &[String],
) -> Result<Vec<ChartId>, ChartsError> {
    let dates = generate_dates(start, end)?;

    let mut seen = Vec::new();
    for token in regions {
        let region = normalize_region(token);
        if !seen.contains(&region) {
            seen.push(region);
        }
    }

    let mut ids = Vec::with_capacity(seen.len() * dates.len());
    for region in &seen {
        for date in &dates {
            ids.push(ChartId::new(region.clone(), *date)?);
        }
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regions(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_generate_dates_inclusive() {
        let dates = generate_dates("2024-01-01", "2024-01-03").unwrap();
        let strings: Vec<String> = dates.iter().map(|d| d.format("%Y-%m-%d").to_string()).collect();
        assert_eq!(strings, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
    }

    #[test]
    fn test_generate_dates_single_day() {
        let dates = generate_dates("2024-01-01", "2024-01-01").unwrap();
        assert_eq!(dates.len(), 1);
    }

    #[test]
    fn test_generate_dates_crosses_month_boundary() {
        let dates = generate_dates("2024-02-28", "2024-03-01").unwrap();
        // 2024年はうるう年
        assert_eq!(dates.len(), 3);
        assert_eq!(dates[1].format("%Y-%m-%d").to_string(), "2024-02-29");
    }

    #[test]
    fn test_malformed_date_is_config_error() {
        let err = generate_dates("2024/01/01", "2024-01-03").unwrap_err();
        assert!(matches!(err, ChartsError::InvalidDateFormat(_)));

        let err = generate_dates("2024-01-01", "not-a-date").unwrap_err();
        assert!(matches!(err, ChartsError::InvalidDateFormat(_)));
    }

    #[test]
    fn test_reversed_range_rejected() {
        let err = generate_dates("2024-01-05", "2024-01-01").unwrap_err();
        assert!(matches!(err, ChartsError::InvalidDateRange(_)));
    }

    #[test]
    fn test_normalize_ww_to_global() {
        assert_eq!(normalize_region("ww"), "global");
        assert_eq!(normalize_region("WW"), "global");
        assert_eq!(normalize_region(" jp "), "jp");
        assert_eq!(normalize_region("global"), "global");
    }

    #[test]
    fn test_cross_product_order_and_count() {
        let ids =
            generate_chart_ids("2024-01-01", "2024-01-02", &regions(&["global", "jp"])).unwrap();
        assert_eq!(ids.len(), 4);
        // リージョン優先、内側は日付昇順
        assert_eq!(ids[0].to_string(), "global/2024-01-01");
        assert_eq!(ids[1].to_string(), "global/2024-01-02");
        assert_eq!(ids[2].to_string(), "jp/2024-01-01");
        assert_eq!(ids[3].to_string(), "jp/2024-01-02");
    }

    #[test]
    fn test_duplicate_regions_deduplicated() {
        // "ww" は正規化で "global" になるため重複扱い
        let ids =
            generate_chart_ids("2024-01-01", "2024-01-01", &regions(&["ww", "global", "jp"]))
                .unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0].region, "global");
        assert_eq!(ids[1].region, "jp");
    }

    #[test]
    fn test_ww_and_global_same_filename() {
        let a = generate_chart_ids("2024-01-01", "2024-01-01", &regions(&["ww"])).unwrap();
        let b = generate_chart_ids("2024-01-01", "2024-01-01", &regions(&["global"])).unwrap();
        assert_eq!(a[0].expected_filename(), b[0].expected_filename());
        assert_eq!(a[0].expected_filename(), "regional-global-daily-2024-01-01.csv");
    }
}
