use crate::utils::error::{Result, TreasurerError};
use url::Url;

/// Yahoo 最早開放 fantasy football 的賽季
pub const MIN_SEASON: i32 = 2001;
pub const MAX_SEASON: i32 = 2100;
/// 例行賽加季後賽的最大週數
pub const MAX_SEASON_WEEKS: u32 = 18;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> TreasurerError {
    TreasurerError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(invalid(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(invalid(field_name, url_str, format!("Invalid URL format: {}", e))),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value
        .as_ref()
        .ok_or_else(|| TreasurerError::MissingConfigError {
            field: field_name.to_string(),
        })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field_name, value, "Value cannot be empty or whitespace-only"));
    }
    Ok(())
}

/// 未展開的 `${VAR}` 代表環境變數沒有設定，回報缺少的變數名稱
pub fn validate_access_token(field_name: &str, token: &str) -> Result<()> {
    if let Some(var) = token.strip_prefix("${").and_then(|rest| rest.strip_suffix('}')) {
        return Err(TreasurerError::MissingConfigError {
            field: var.to_string(),
        });
    }
    validate_non_empty_string(field_name, token)
}

pub fn validate_season(field_name: &str, season: i32) -> Result<()> {
    if !(MIN_SEASON..=MAX_SEASON).contains(&season) {
        return Err(invalid(
            field_name,
            season,
            format!("Season must be between {} and {}", MIN_SEASON, MAX_SEASON),
        ));
    }
    Ok(())
}

/// 起訖賽季各自合法，且起始不晚於結束
pub fn validate_season_span(first: i32, last: i32) -> Result<()> {
    validate_season("league.first_season", first)?;
    validate_season("league.last_season", last)?;
    if first > last {
        return Err(TreasurerError::ConfigValidationError {
            field: "league.first_season".to_string(),
            message: format!("first_season {} is after last_season {}", first, last),
        });
    }
    Ok(())
}

pub fn validate_week_count(field_name: &str, weeks: u32) -> Result<()> {
    if weeks == 0 || weeks > MAX_SEASON_WEEKS {
        return Err(invalid(
            field_name,
            weeks,
            format!("Week count must be between 1 and {}", MAX_SEASON_WEEKS),
        ));
    }
    Ok(())
}

pub fn validate_top_n(field_name: &str, top_n: usize) -> Result<()> {
    if top_n == 0 {
        return Err(invalid(field_name, top_n, "At least one team must be listed"));
    }
    Ok(())
}

/// 聯盟 key 格式為 `449.l.1234`：game key、`l`、聯盟 id
pub fn validate_league_key(field_name: &str, key: &str) -> Result<()> {
    validate_resource_key(field_name, key, &["l"])
}

/// 隊伍 key 是聯盟 key 後接 `.t.<隊伍 id>`
pub fn validate_team_key(field_name: &str, key: &str) -> Result<()> {
    validate_resource_key(field_name, key, &["l", "t"])
}

fn validate_resource_key(field_name: &str, key: &str, markers: &[&str]) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let well_formed = parts.len() == 1 + markers.len() * 2
        && !parts[0].is_empty()
        && markers.iter().enumerate().all(|(i, marker)| {
            let id = parts[2 + i * 2];
            parts[1 + i * 2] == *marker && !id.is_empty() && id.chars().all(|c| c.is_ascii_digit())
        });
    if !well_formed {
        let shape = markers
            .iter()
            .fold("<game>".to_string(), |acc, marker| format!("{}.{}.<id>", acc, marker));
        return Err(invalid(field_name, key, format!("Expected a key shaped like {}", shape)));
    }
    Ok(())
}

/// 獎金必須是有限且不小於 0 的數值
pub fn validate_prize_amount(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(field_name, value, "Amount must be a non-negative number"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("source.base_url", "https://example.com").is_ok());
        assert!(validate_url("source.base_url", "http://example.com").is_ok());
        assert!(validate_url("source.base_url", "").is_err());
        assert!(validate_url("source.base_url", "invalid-url").is_err());
        assert!(validate_url("source.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_access_token() {
        assert!(validate_access_token("source.access_token", "abc123").is_ok());
        assert!(validate_access_token("source.access_token", "  ").is_err());
        let err = validate_access_token("source.access_token", "${YAHOO_ACCESS_TOKEN}").unwrap_err();
        assert!(matches!(
            err,
            TreasurerError::MissingConfigError { ref field } if field == "YAHOO_ACCESS_TOKEN"
        ));
    }

    #[test]
    fn test_validate_season() {
        assert!(validate_season("season", 2024).is_ok());
        assert!(validate_season("season", MIN_SEASON).is_ok());
        assert!(validate_season("season", 1999).is_err());
        assert!(validate_season("season", 24).is_err());
    }

    #[test]
    fn test_validate_season_span() {
        assert!(validate_season_span(2021, 2025).is_ok());
        assert!(validate_season_span(2024, 2024).is_ok());
        assert!(validate_season_span(2025, 2021).is_err());
        assert!(validate_season_span(1990, 2021).is_err());
    }

    #[test]
    fn test_validate_week_count() {
        assert!(validate_week_count("league.weeks", 1).is_ok());
        assert!(validate_week_count("league.weeks", 17).is_ok());
        assert!(validate_week_count("league.weeks", 0).is_err());
        assert!(validate_week_count("league.weeks", 25).is_err());
    }

    #[test]
    fn test_validate_resource_keys() {
        assert!(validate_league_key("league_key", "449.l.7").is_ok());
        assert!(validate_league_key("league_key", "nfl.l.1234").is_ok());
        assert!(validate_league_key("league_key", "449.l.").is_err());
        assert!(validate_league_key("league_key", "449.t.7").is_err());
        assert!(validate_league_key("league_key", "449.l.7.t.1").is_err());

        assert!(validate_team_key("team_key", "449.l.7.t.3").is_ok());
        assert!(validate_team_key("team_key", "449.l.7").is_err());
        assert!(validate_team_key("team_key", "449.l.7.t.x").is_err());
    }

    #[test]
    fn test_validate_prize_amount() {
        assert!(validate_prize_amount("prizes.first", 0.0).is_ok());
        assert!(validate_prize_amount("prizes.first", 100.5).is_ok());
        assert!(validate_prize_amount("prizes.first", -1.0).is_err());
        assert!(validate_prize_amount("prizes.first", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("token".to_string());
        let missing: Option<String> = None;
        assert_eq!(
            validate_required_field("source.access_token", &present).unwrap(),
            "token"
        );
        assert!(validate_required_field("source.access_token", &missing).is_err());
    }
}
