use anyhow::Context;
use clap::Parser;
use fantasy_treasurer::adapters::source_from_config;
use fantasy_treasurer::core::earnings::EarningsSummary;
use fantasy_treasurer::core::{EnvelopeSource, Pipeline};
use fantasy_treasurer::utils::error::ErrorSeverity;
use fantasy_treasurer::utils::{logger, validation::Validate};
use fantasy_treasurer::{
    CliConfig, Command, EarningsPipeline, EtlEngine, LocalStorage, Treasurer, TreasurerConfig,
    TreasurerError,
};

const MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = cli.validate() {
        fail(&e);
    }

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<TreasurerError>() {
            Some(err) => fail(err),
            None => {
                tracing::error!("❌ {:#}", e);
                eprintln!("❌ {:#}", e);
                std::process::exit(1);
            }
        }
    }
}

fn fail(e: &TreasurerError) {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    if exit_code > 0 {
        std::process::exit(exit_code);
    }
}

async fn run(cli: CliConfig) -> anyhow::Result<()> {
    let config = TreasurerConfig::from_file(&cli.config)?;
    config.validate()?;

    let source = source_from_config(&config)?;
    let treasurer = Treasurer::new(source).with_game_keys(config.game_keys()?);

    match cli.command {
        Command::Leagues { season } => {
            let seasons = match season {
                Some(season) => season..=season,
                None => config.season_range(),
            };
            let by_year = treasurer.leagues_by_year(seasons).await;
            if by_year.is_empty() {
                println!("No leagues found");
            }
            for (season, leagues) in by_year {
                println!("{}", season);
                for league in leagues {
                    println!(
                        "  {:<30} {:<14} {:>2} teams",
                        league.name, league.league_key, league.num_teams
                    );
                }
            }
        }
        Command::Standings { league_key } => {
            let standings = treasurer.league_standings(&league_key).await;
            println!(
                "{:>4}  {:<28} {:>8} {:>9} {:>9} {:>6}  Manager",
                "Rank", "Team", "W-L-T", "PF", "PA", "Strk"
            );
            for s in standings {
                println!(
                    "{:>4}  {:<28} {:>8} {:>9.2} {:>9.2} {:>6}  {}",
                    s.rank,
                    s.name,
                    format!("{}-{}-{}", s.wins, s.losses, s.ties),
                    s.points_for,
                    s.points_against,
                    s.streak,
                    s.manager
                );
            }
        }
        Command::Teams { league_key } => {
            for team in treasurer.all_teams(&league_key).await {
                println!(
                    "{:<28} {:<18} {:<16} moves {:>3}  trades {:>2}",
                    team.name, team.team_key, team.manager, team.moves, team.trades
                );
            }
        }
        Command::Roster { team_key } => {
            for player in treasurer.team_roster(&team_key).await {
                println!(
                    "{:<4} {:<26} {:<6} {:<4} {}",
                    player.selected_position,
                    player.name,
                    player.position,
                    player.team,
                    player.status
                );
            }
        }
        Command::TopScorers {
            league_key,
            weeks,
            top,
        } => {
            let top_n = top.unwrap_or_else(|| config.top_n());
            let report = treasurer.weekly_top_scorers(&league_key, weeks, top_n).await;
            for ranking in report.weeks.iter().filter(|r| !r.is_empty()) {
                println!("Week {}", ranking.week);
                for (entry, medal) in ranking.top_n(MEDALS.len()).iter().zip(MEDALS) {
                    println!("  {} {:<28} {:>8.2}", medal, entry.team_name, entry.points);
                }
            }
            println!("Season leaders");
            for (i, scorer) in report.summary.iter().enumerate() {
                println!(
                    "  {}. {:<28} {:>9.2} total  {:>7.2} avg over {} week(s)",
                    i + 1,
                    scorer.team_name,
                    scorer.total_points,
                    scorer.average_points,
                    scorer.weeks_played
                );
            }
        }
        Command::Earnings {
            league,
            weeks,
            dry_run,
        } => {
            let storage = LocalStorage::new(config.output_path().to_string());
            let pipeline = EarningsPipeline::new(treasurer, storage, config)
                .with_name_filter(league)
                .with_weeks(weeks);
            if dry_run {
                print_summary(&preview(&pipeline).await?);
            } else {
                let engine = EtlEngine::new(pipeline);
                let output_path = engine.run().await.context("earnings run failed")?;
                println!("✅ Earnings report completed");
                println!("📁 Output saved to: {}", output_path);
            }
        }
    }

    Ok(())
}

async fn preview<S: EnvelopeSource>(
    pipeline: &EarningsPipeline<S, LocalStorage>,
) -> fantasy_treasurer::Result<EarningsSummary> {
    let seasons = pipeline.extract().await?;
    pipeline.transform(seasons).await
}

fn print_summary(summary: &EarningsSummary) {
    for season in &summary.seasons {
        println!(
            "{} {} ({} weeks, {:.2} paid out)",
            season.season,
            season.league_name,
            season.weeks,
            season.total_paid_out()
        );
        for team in season.leaderboard() {
            println!("  {:<28} {:>9.2}", team.team_name, team.total);
        }
    }
    println!("Owners");
    for owner in &summary.owners {
        let years: Vec<String> = owner
            .by_year
            .iter()
            .map(|(year, amount)| format!("{}: {:.2}", year, amount))
            .collect();
        println!(
            "  {:<28} {:>9.2}  ({})",
            owner.owner,
            owner.total,
            years.join(", ")
        );
    }
}
