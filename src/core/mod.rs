pub mod builder;
pub mod decode;
pub mod discovery;
pub mod earnings;
pub mod etl;
pub mod node;
pub mod ranking;
pub mod treasurer;

pub use crate::domain::model::{
    League, OwnerEarnings, RosterEntry, SeasonEarnings, Standing, Team, TeamEarnings, TopScorer,
    WeeklyRanking, WeeklyScore,
};
pub use crate::domain::ports::{EnvelopeSource, Pipeline, Query, Storage};
pub use crate::utils::error::Result;
