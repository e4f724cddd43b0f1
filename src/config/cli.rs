use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "treasurer")]
#[command(about = "Weekly rankings and prize earnings for Yahoo fantasy football leagues")]
pub struct CliConfig {
    #[arg(short, long, default_value = "treasurer.toml")]
    pub config: String,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the user's leagues, grouped by season
    Leagues {
        #[arg(long, help = "Only this season")]
        season: Option<i32>,
    },
    /// Current standings of a league
    Standings { league_key: String },
    /// Teams and managers of a league
    Teams { league_key: String },
    /// Players on a team
    Roster { team_key: String },
    /// Weekly top three and season leaders
    TopScorers {
        league_key: String,
        #[arg(long)]
        weeks: Option<u32>,
        #[arg(long)]
        top: Option<usize>,
    },
    /// Prize tables per season and multi-year owner earnings
    Earnings {
        #[arg(long, help = "Override league.name_filter")]
        league: Option<String>,
        #[arg(long)]
        weeks: Option<u32>,
        #[arg(long, help = "Print the summary without writing files")]
        dry_run: bool,
    },
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("config", &self.config)?;
        match &self.command {
            Command::Leagues {
                season: Some(season),
            } => validation::validate_season("season", *season),
            Command::Standings { league_key } | Command::Teams { league_key } => {
                validation::validate_league_key("league_key", league_key)
            }
            Command::Roster { team_key } => validation::validate_team_key("team_key", team_key),
            Command::TopScorers {
                league_key,
                weeks,
                top,
            } => {
                validation::validate_league_key("league_key", league_key)?;
                if let Some(weeks) = weeks {
                    validation::validate_week_count("weeks", *weeks)?;
                }
                if let Some(top) = top {
                    validation::validate_top_n("top", *top)?;
                }
                Ok(())
            }
            Command::Earnings {
                weeks: Some(weeks),
                ..
            } => validation::validate_week_count("weeks", *weeks),
            _ => Ok(()),
        }
    }
}
