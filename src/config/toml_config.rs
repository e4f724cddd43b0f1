use crate::core::earnings::PrizeSchedule;
use crate::utils::error::{Result, TreasurerError};
use crate::utils::validation::{self, Validate};
use chrono::Datelike;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::path::Path;

/// 往回掃描的賽季數 (含 last_season)
const DEFAULT_SEASON_SPAN: i32 = 5;
const DEFAULT_TOP_N: usize = 3;
const VALID_FORMATS: [&str; 2] = ["csv", "json"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreasurerConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub league: LeagueConfig,
    #[serde(default)]
    pub prizes: PrizesConfig,
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Snapshot,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub r#type: String,
    /// snapshot 目錄
    pub path: Option<String>,
    pub base_url: Option<String>,
    pub access_token: Option<String>,
    pub request_delay_ms: Option<u64>,
    pub timeout_seconds: Option<u64>,
    /// 賽季 -> game key 覆寫，例如 `"2019" = "390"`
    pub game_keys: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeagueConfig {
    pub name_filter: Option<String>,
    pub league_key: Option<String>,
    pub first_season: Option<i32>,
    pub last_season: Option<i32>,
    pub weeks: Option<u32>,
    pub top_n: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrizesConfig {
    pub first: f64,
    pub second: f64,
    pub third: f64,
}

impl Default for PrizesConfig {
    fn default() -> Self {
        Self {
            first: 100.0,
            second: 50.0,
            third: 25.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: String,
}

impl TreasurerConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TreasurerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| TreasurerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${YAHOO_ACCESS_TOKEN})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TreasurerError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn source_kind(&self) -> Result<SourceKind> {
        match self.source.r#type.as_str() {
            "snapshot" => Ok(SourceKind::Snapshot),
            "http" => Ok(SourceKind::Http),
            other => Err(TreasurerError::InvalidConfigValueError {
                field: "source.type".to_string(),
                value: other.to_string(),
                reason: "Unsupported source. Valid sources: snapshot, http".to_string(),
            }),
        }
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        match self.source_kind()? {
            SourceKind::Snapshot => {
                let path = validation::validate_required_field("source.path", &self.source.path)?;
                validation::validate_path("source.path", path)?;
            }
            SourceKind::Http => {
                let token = validation::validate_required_field(
                    "source.access_token",
                    &self.source.access_token,
                )?;
                validation::validate_access_token("source.access_token", token)?;
                if let Some(base_url) = &self.source.base_url {
                    validation::validate_url("source.base_url", base_url)?;
                }
                if self.source.timeout_seconds == Some(0) {
                    return Err(TreasurerError::InvalidConfigValueError {
                        field: "source.timeout_seconds".to_string(),
                        value: "0".to_string(),
                        reason: "Timeout must be at least one second".to_string(),
                    });
                }
            }
        }
        self.game_keys()?;

        if let Some(weeks) = self.league.weeks {
            validation::validate_week_count("league.weeks", weeks)?;
        }
        if let Some(top_n) = self.league.top_n {
            validation::validate_top_n("league.top_n", top_n)?;
        }
        if let Some(league_key) = &self.league.league_key {
            validation::validate_league_key("league.league_key", league_key)?;
        }
        // 範圍以實際掃描的賽季檢查，未設定的一端使用預設值
        let seasons = self.season_range();
        validation::validate_season_span(*seasons.start(), *seasons.end())?;

        validation::validate_prize_amount("prizes.first", self.prizes.first)?;
        validation::validate_prize_amount("prizes.second", self.prizes.second)?;
        validation::validate_prize_amount("prizes.third", self.prizes.third)?;

        validation::validate_path("load.output_path", &self.load.output_path)?;
        for format in &self.load.output_formats {
            if !VALID_FORMATS.contains(&format.as_str()) {
                return Err(TreasurerError::InvalidConfigValueError {
                    field: "load.output_formats".to_string(),
                    value: format.clone(),
                    reason: format!(
                        "Unsupported format. Valid formats: {}",
                        VALID_FORMATS.join(", ")
                    ),
                });
            }
        }
        if let Some(compression) = self.load.compression.as_ref().filter(|c| c.enabled) {
            validation::validate_non_empty_string("load.compression.filename", &compression.filename)?;
        }

        Ok(())
    }

    pub fn prize_schedule(&self) -> PrizeSchedule {
        PrizeSchedule::new(self.prizes.first, self.prizes.second, self.prizes.third)
    }

    /// 設定檔中的 game key 覆寫；鍵必須是年份
    pub fn game_keys(&self) -> Result<HashMap<i32, String>> {
        let mut keys = HashMap::new();
        for (season, key) in self.source.game_keys.iter().flatten() {
            let year = season
                .parse::<i32>()
                .map_err(|_| TreasurerError::InvalidConfigValueError {
                    field: "source.game_keys".to_string(),
                    value: season.clone(),
                    reason: "Keys must be season years".to_string(),
                })?;
            validation::validate_season("source.game_keys", year)?;
            keys.insert(year, key.clone());
        }
        Ok(keys)
    }

    /// 掃描的賽季範圍；預設為今年往回 5 季
    pub fn season_range(&self) -> RangeInclusive<i32> {
        let last = self
            .league
            .last_season
            .unwrap_or_else(|| chrono::Utc::now().year());
        let first = self
            .league
            .first_season
            .unwrap_or(last - (DEFAULT_SEASON_SPAN - 1));
        first..=last
    }

    pub fn top_n(&self) -> usize {
        self.league.top_n.unwrap_or(DEFAULT_TOP_N)
    }

    pub fn output_path(&self) -> &str {
        &self.load.output_path
    }

    pub fn wants_format(&self, format: &str) -> bool {
        self.load.output_formats.iter().any(|f| f == format)
    }

    /// 啟用壓縮時的 zip 檔名
    pub fn archive_name(&self) -> Option<&str> {
        self.load
            .compression
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.filename.as_str())
    }
}

impl Validate for TreasurerConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
