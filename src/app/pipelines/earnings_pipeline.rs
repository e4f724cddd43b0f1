use crate::config::TreasurerConfig;
use crate::core::earnings::{summarize, EarningsSummary, SeasonData};
use crate::core::treasurer::Treasurer;
use crate::core::{EnvelopeSource, League, Pipeline, SeasonEarnings, Storage};
use crate::utils::error::{Result, TreasurerError};
use serde::Serialize;
use std::collections::BTreeSet;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const OWNERS_FILE: &str = "owners.csv";
pub const REPORT_FILE: &str = "report.json";
const PAID_OUT_LABEL: &str = "TOTAL PAID OUT";

/// 獎金計算管道：找出聯盟賽季、計算每週排名與獎金，再輸出報表
pub struct EarningsPipeline<S: EnvelopeSource, T: Storage> {
    treasurer: Treasurer<S>,
    storage: T,
    config: TreasurerConfig,
    name_filter: Option<String>,
    weeks: Option<u32>,
}

impl<S: EnvelopeSource, T: Storage> EarningsPipeline<S, T> {
    pub fn new(treasurer: Treasurer<S>, storage: T, config: TreasurerConfig) -> Self {
        let name_filter = config.league.name_filter.clone();
        let weeks = config.league.weeks;
        Self {
            treasurer,
            storage,
            config,
            name_filter,
            weeks,
        }
    }

    /// 命令列覆寫聯盟名稱過濾
    pub fn with_name_filter(mut self, name_filter: Option<String>) -> Self {
        if name_filter.is_some() {
            self.name_filter = name_filter;
        }
        self
    }

    pub fn with_weeks(mut self, weeks: Option<u32>) -> Self {
        if weeks.is_some() {
            self.weeks = weeks;
        }
        self
    }

    async fn select_leagues(&self) -> Result<Vec<League>> {
        let seasons = self.config.season_range();

        if let Some(league_key) = &self.config.league.league_key {
            let last_season = *seasons.end();
            let found = self
                .treasurer
                .leagues_in_range(seasons)
                .await
                .into_iter()
                .find(|league| &league.league_key == league_key);
            return Ok(vec![found.unwrap_or_else(|| {
                tracing::warn!(
                    "{} not found among discovered leagues; assuming season {}",
                    league_key,
                    last_season
                );
                League {
                    name: league_key.clone(),
                    league_id: String::new(),
                    league_key: league_key.clone(),
                    num_teams: 0,
                    current_week: None,
                    season: last_season,
                }
            })]);
        }

        let name = self
            .name_filter
            .as_ref()
            .ok_or_else(|| TreasurerError::MissingConfigError {
                field: "league.name_filter".to_string(),
            })?;
        let leagues = self
            .treasurer
            .find_all_leagues_by_name(name, seasons)
            .await;
        if leagues.is_empty() {
            return Err(TreasurerError::LeagueNotFound { name: name.clone() });
        }
        Ok(leagues)
    }
}

#[async_trait::async_trait]
impl<S: EnvelopeSource, T: Storage> Pipeline for EarningsPipeline<S, T> {
    type Extracted = Vec<SeasonData>;
    type Report = EarningsSummary;

    async fn extract(&self) -> Result<Vec<SeasonData>> {
        let leagues = self.select_leagues().await?;
        tracing::info!("Found {} league season(s)", leagues.len());

        let mut seasons = Vec::with_capacity(leagues.len());
        for league in &leagues {
            seasons.push(self.treasurer.collect_season(league, self.weeks).await);
        }
        Ok(seasons)
    }

    async fn transform(&self, data: Vec<SeasonData>) -> Result<EarningsSummary> {
        let summary = summarize(&data, &self.config.prize_schedule());
        for season in &summary.seasons {
            tracing::info!(
                "{} {}: {:.2} paid out over {} week(s)",
                season.season,
                season.league_name,
                season.total_paid_out(),
                season.weeks
            );
        }
        tracing::info!("{} owner(s) in ledger", summary.owners.len());
        Ok(summary)
    }

    async fn load(&self, summary: EarningsSummary) -> Result<String> {
        let mut files: Vec<(String, Vec<u8>)> = Vec::new();

        if self.config.wants_format("csv") {
            for season in &summary.seasons {
                files.push((season_file_name(season), render_season_csv(season)?));
            }
            files.push((OWNERS_FILE.to_string(), render_owners_csv(&summary)?));
        }
        if self.config.wants_format("json") {
            files.push((REPORT_FILE.to_string(), render_report_json(&summary)?));
        }

        let output_path = self.config.output_path().trim_end_matches('/');

        match self.config.archive_name() {
            Some(archive) => {
                tracing::debug!("Creating ZIP file with {} files", files.len());
                let zip_data = {
                    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                    for (name, data) in &files {
                        zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
                        zip.write_all(data)?;
                    }
                    let cursor = zip.finish()?;
                    cursor.into_inner()
                };
                tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
                self.storage.write_file(archive, &zip_data).await?;
                Ok(format!("{}/{}", output_path, archive))
            }
            None => {
                for (name, data) in &files {
                    tracing::debug!("Writing {} ({} bytes)", name, data.len());
                    self.storage.write_file(name, data).await?;
                }
                Ok(output_path.to_string())
            }
        }
    }
}

pub fn season_file_name(season: &SeasonEarnings) -> String {
    format!("prizes_{}_{}.csv", season.season, season.league_key)
}

/// 欄位為隊名、每週一欄、TOTAL；依排行榜排序，最後一列為發放總額
pub fn render_season_csv(season: &SeasonEarnings) -> Result<Vec<u8>> {
    let mut writer = csv_writer();

    let mut header = vec!["Team".to_string()];
    header.extend((1..=season.weeks).map(|week| format!("Wk {}", week)));
    header.push("TOTAL".to_string());
    writer.write_record(&header)?;

    for team in season.leaderboard() {
        let mut row = vec![team.team_name.clone()];
        row.extend((1..=season.weeks).map(|week| {
            amount(team.by_week.get(&week).copied().unwrap_or(0.0))
        }));
        row.push(amount(team.total));
        writer.write_record(&row)?;
    }

    let mut footer = vec![PAID_OUT_LABEL.to_string()];
    footer.extend((1..=season.weeks).map(|week| {
        amount(
            season
                .teams
                .iter()
                .filter_map(|team| team.by_week.get(&week))
                .sum(),
        )
    }));
    footer.push(amount(season.total_paid_out()));
    writer.write_record(&footer)?;

    finish_csv(writer)
}

/// 欄位為 owner、帳本中出現過的每個賽季一欄、Total
pub fn render_owners_csv(summary: &EarningsSummary) -> Result<Vec<u8>> {
    let years: BTreeSet<i32> = summary
        .owners
        .iter()
        .flat_map(|owner| owner.by_year.keys().copied())
        .collect();

    let mut writer = csv_writer();
    let mut header = vec!["Owner".to_string()];
    header.extend(years.iter().map(|year| year.to_string()));
    header.push("Total".to_string());
    writer.write_record(&header)?;

    for owner in &summary.owners {
        let mut row = vec![owner.owner.clone()];
        row.extend(
            years
                .iter()
                .map(|year| amount(owner.by_year.get(year).copied().unwrap_or(0.0))),
        );
        row.push(amount(owner.total));
        writer.write_record(&row)?;
    }

    finish_csv(writer)
}

#[derive(Serialize)]
struct Report<'a> {
    generated_at: String,
    #[serde(flatten)]
    summary: &'a EarningsSummary,
}

pub fn render_report_json(summary: &EarningsSummary) -> Result<Vec<u8>> {
    let report = Report {
        generated_at: chrono::Utc::now().to_rfc3339(),
        summary,
    };
    Ok(serde_json::to_vec_pretty(&report)?)
}

fn amount(value: f64) -> String {
    format!("{:.2}", value)
}

fn csv_writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| TreasurerError::ProcessingError {
            message: format!("failed to flush CSV: {}", e),
        })
}
