use crate::core::decode;
use crate::core::discovery::{self, game_key_for_season};
use crate::core::earnings::{summarize, EarningsSummary, PrizeSchedule, SeasonData, SeasonLabel};
use crate::core::ranking::{rank, season_top_scorers};
use crate::domain::model::{
    League, RosterEntry, Standing, Team, TopScorer, WeeklyRanking, WeeklyScore,
};
use crate::domain::ports::{EnvelopeSource, Query};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::ops::RangeInclusive;

/// 呼叫端與聯盟都沒有提供週數時使用的預設值
pub const DEFAULT_SEASON_WEEKS: u32 = 17;

#[derive(Debug, Clone)]
pub struct TopScorersReport {
    pub weeks: Vec<WeeklyRanking>,
    pub summary: Vec<TopScorer>,
}

/// 從資料來源取得 envelope，交給解碼器與統計函式處理
///
/// 取得失敗只記錄警告並視為沒有資料，單一週次或賽季失敗不會中斷整體流程
pub struct Treasurer<S: EnvelopeSource> {
    source: S,
    game_keys: HashMap<i32, String>,
}

impl<S: EnvelopeSource> Treasurer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            game_keys: HashMap::new(),
        }
    }

    pub fn with_game_keys(mut self, game_keys: HashMap<i32, String>) -> Self {
        self.game_keys = game_keys;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    async fn envelope(&self, query: Query) -> Option<Value> {
        match self.source.fetch(&query).await {
            Ok(Some(envelope)) => Some(envelope),
            Ok(None) => {
                tracing::debug!("No data returned for {}", query);
                None
            }
            Err(e) => {
                tracing::warn!("Request for {} failed: {}", query, e);
                None
            }
        }
    }

    pub async fn league_standings(&self, league_key: &str) -> Vec<Standing> {
        let envelope = self
            .envelope(Query::LeagueStandings {
                league_key: league_key.to_string(),
            })
            .await;
        decode::decode_standings(envelope.as_ref())
    }

    pub async fn all_teams(&self, league_key: &str) -> Vec<Team> {
        let envelope = self
            .envelope(Query::LeagueTeams {
                league_key: league_key.to_string(),
            })
            .await;
        decode::decode_teams(envelope.as_ref())
    }

    pub async fn team_roster(&self, team_key: &str) -> Vec<RosterEntry> {
        let envelope = self
            .envelope(Query::TeamRoster {
                team_key: team_key.to_string(),
            })
            .await;
        decode::decode_roster(envelope.as_ref())
    }

    pub async fn weekly_scores(&self, league_key: &str, week: u32) -> Vec<WeeklyScore> {
        let envelope = self
            .envelope(Query::Scoreboard {
                league_key: league_key.to_string(),
                week,
            })
            .await;
        decode::decode_weekly_scores(envelope.as_ref(), week)
    }

    pub async fn current_week(&self, league_key: &str) -> Option<i64> {
        let envelope = self
            .envelope(Query::LeagueInfo {
                league_key: league_key.to_string(),
            })
            .await;
        decode::decode_current_week(envelope.as_ref())
    }

    pub async fn leagues_for_season(&self, season: i32) -> Vec<League> {
        let game_key = game_key_for_season(season, &self.game_keys);
        let envelope = self.envelope(Query::UserLeagues { season, game_key }).await;
        let leagues = decode::decode_leagues(envelope.as_ref(), season);
        tracing::debug!("Season {}: {} league(s)", season, leagues.len());
        leagues
    }

    pub async fn leagues_in_range(&self, seasons: RangeInclusive<i32>) -> Vec<League> {
        let mut leagues = Vec::new();
        for season in seasons {
            leagues.extend(self.leagues_for_season(season).await);
        }
        leagues
    }

    pub async fn leagues_by_year(&self, seasons: RangeInclusive<i32>) -> BTreeMap<i32, Vec<League>> {
        discovery::group_by_season(self.leagues_in_range(seasons).await)
    }

    pub async fn find_all_leagues_by_name(
        &self,
        name: &str,
        seasons: RangeInclusive<i32>,
    ) -> Vec<League> {
        let leagues = self.leagues_in_range(seasons).await;
        discovery::find_all_by_name(&leagues, name)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn find_league_by_name(
        &self,
        name: &str,
        seasons: RangeInclusive<i32>,
    ) -> Option<League> {
        let leagues = self.leagues_in_range(seasons).await;
        discovery::find_first_by_name(&leagues, name).cloned()
    }

    /// 週數來源依序為：呼叫端指定、聯盟回報的 current_week、聯盟資訊資源，
    /// 最後才是 [`DEFAULT_SEASON_WEEKS`]
    pub async fn resolve_weeks(
        &self,
        league_key: &str,
        reported: Option<i64>,
        weeks: Option<u32>,
    ) -> u32 {
        if let Some(weeks) = weeks {
            return weeks;
        }
        let reported = match reported {
            Some(week) => Some(week),
            None => self.current_week(league_key).await,
        };
        reported
            .and_then(|week| u32::try_from(week).ok())
            .filter(|week| *week > 0)
            .unwrap_or(DEFAULT_SEASON_WEEKS)
    }

    /// 第 1 週到第 `weeks` 週的排名；沒有分數的週次回傳空排名
    pub async fn weekly_rankings(&self, league_key: &str, weeks: u32) -> Vec<WeeklyRanking> {
        let mut rankings = Vec::with_capacity(weeks as usize);
        for week in 1..=weeks {
            let scores = self.weekly_scores(league_key, week).await;
            if scores.is_empty() {
                tracing::info!("Week {}: no scores available", week);
            } else {
                tracing::info!("Week {}: {} team score(s)", week, scores.len());
            }
            rankings.push(rank(week, &scores));
        }
        rankings
    }

    pub async fn weekly_top_scorers(
        &self,
        league_key: &str,
        weeks: Option<u32>,
        top_n: usize,
    ) -> TopScorersReport {
        let weeks = self.resolve_weeks(league_key, None, weeks).await;
        let rankings = self.weekly_rankings(league_key, weeks).await;
        let summary = season_top_scorers(&rankings, top_n);
        TopScorersReport {
            weeks: rankings,
            summary,
        }
    }

    /// 單一聯盟賽季的隊伍 (用於 owner 對應) 與每週排名
    pub async fn collect_season(&self, league: &League, weeks: Option<u32>) -> SeasonData {
        let weeks = self
            .resolve_weeks(&league.league_key, league.current_week, weeks)
            .await;
        tracing::info!(
            "Collecting {} ({}) season {} over {} week(s)",
            league.name,
            league.league_key,
            league.season,
            weeks
        );
        let teams = self.all_teams(&league.league_key).await;
        if teams.is_empty() {
            tracing::warn!(
                "No teams for {}; owners fall back to team names",
                league.league_key
            );
        }
        let rankings = self.weekly_rankings(&league.league_key, weeks).await;

        SeasonData {
            label: SeasonLabel {
                season: league.season,
                league_name: league.name.clone(),
                league_key: league.league_key.clone(),
            },
            weeks,
            teams,
            rankings,
        }
    }

    pub async fn season_earnings(
        &self,
        league: &League,
        schedule: &PrizeSchedule,
        weeks: Option<u32>,
    ) -> EarningsSummary {
        let season = self.collect_season(league, weeks).await;
        summarize(std::slice::from_ref(&season), schedule)
    }

    /// 找出各賽季名稱符合的聯盟，累計成跨年度 owner 獎金
    pub async fn owner_earnings(
        &self,
        name: &str,
        seasons: RangeInclusive<i32>,
        schedule: &PrizeSchedule,
        weeks: Option<u32>,
    ) -> EarningsSummary {
        let mut collected = Vec::new();
        for league in self.find_all_leagues_by_name(name, seasons).await {
            collected.push(self.collect_season(&league, weeks).await);
        }
        summarize(&collected, schedule)
    }
}
