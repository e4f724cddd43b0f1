use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

/// One upstream resource request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Query {
    /// Leagues of the logged-in user for one game (season).
    UserLeagues { season: i32, game_key: String },
    LeagueInfo { league_key: String },
    LeagueStandings { league_key: String },
    LeagueTeams { league_key: String },
    Scoreboard { league_key: String, week: u32 },
    TeamRoster { team_key: String },
}

impl Query {
    /// Resource path relative to the API root, without query string.
    pub fn resource_path(&self) -> String {
        match self {
            Query::UserLeagues { game_key, .. } => {
                format!("users;use_login=1/games;game_keys={}/leagues", game_key)
            }
            Query::LeagueInfo { league_key } => format!("league/{}", league_key),
            Query::LeagueStandings { league_key } => format!("league/{}/standings", league_key),
            Query::LeagueTeams { league_key } => format!("league/{}/teams", league_key),
            Query::Scoreboard { league_key, week } => {
                format!("league/{}/scoreboard;week={}", league_key, week)
            }
            Query::TeamRoster { team_key } => format!("team/{}/roster", team_key),
        }
    }

    /// File name used for saved envelopes. Stable and free of `;`, `=` and `/`.
    pub fn snapshot_name(&self) -> String {
        match self {
            Query::UserLeagues { season, .. } => format!("leagues_{}.json", season),
            Query::LeagueInfo { league_key } => format!("league_{}.json", league_key),
            Query::LeagueStandings { league_key } => format!("standings_{}.json", league_key),
            Query::LeagueTeams { league_key } => format!("teams_{}.json", league_key),
            Query::Scoreboard { league_key, week } => {
                format!("scoreboard_{}_week_{}.json", league_key, week)
            }
            Query::TeamRoster { team_key } => format!("roster_{}.json", team_key),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resource_path())
    }
}

/// Hands out already-parsed envelopes. `Ok(None)` means the upstream had
/// nothing to give (missing resource, non-success status).
#[async_trait]
pub trait EnvelopeSource: Send + Sync {
    async fn fetch(&self, query: &Query) -> Result<Option<Value>>;
}

#[async_trait]
impl EnvelopeSource for Box<dyn EnvelopeSource> {
    async fn fetch(&self, query: &Query) -> Result<Option<Value>> {
        (**self).fetch(query).await
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    type Extracted: Send;
    type Report: Send;

    async fn extract(&self) -> Result<Self::Extracted>;
    async fn transform(&self, data: Self::Extracted) -> Result<Self::Report>;
    async fn load(&self, report: Self::Report) -> Result<String>;
}
