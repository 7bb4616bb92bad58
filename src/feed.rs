use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Instant;

use crate::config::Config;
use crate::scoreboard;
use crate::standings;
use crate::state::{Delta, ProviderCommand};
use crate::teams;

/// Network worker: answers commands with deltas and refreshes standings
/// and the ticker on `config.refresh`. Responses are applied in arrival
/// order, so a slow stale fetch can still overwrite a newer one.
pub fn spawn_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>, config: Config) {
    thread::spawn(move || {
        handle(&tx, &config, ProviderCommand::FetchStandings);
        handle(&tx, &config, ProviderCommand::FetchNews);
        let mut last_refresh = Instant::now();

        loop {
            let wait = config.refresh.saturating_sub(last_refresh.elapsed());
            match cmd_rx.recv_timeout(wait) {
                Ok(cmd) => {
                    if !handle(&tx, &config, cmd) {
                        return;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    let _ = tx.send(Delta::Log("[INFO] Auto refresh".to_string()));
                    handle(&tx, &config, ProviderCommand::FetchStandings);
                    handle(&tx, &config, ProviderCommand::FetchNews);
                    last_refresh = Instant::now();
                }
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }
    });
}

/// Returns false once the UI side has gone away.
fn handle(tx: &Sender<Delta>, config: &Config, cmd: ProviderCommand) -> bool {
    let delta = match cmd {
        ProviderCommand::FetchStandings => {
            match standings::fetch_standings(&config.standings_league, &config.standings_season) {
                Ok(parsed) => Delta::SetStandings(parsed),
                Err(err) => Delta::StandingsFailed(format!("{err:#}")),
            }
        }
        ProviderCommand::FetchNews => match scoreboard::fetch_news(&config.news_league) {
            Ok(lines) => Delta::SetNews(lines),
            Err(err) => Delta::Log(format!("[WARN] Breaking news error: {err:#}")),
        },
        ProviderCommand::FetchTeams { league } => match teams::fetch_teams(league) {
            Ok(teams) => Delta::SetTeams { league, teams },
            Err(err) => Delta::Log(format!("[WARN] {} teams error: {err:#}", league.label())),
        },
        ProviderCommand::FetchScores { league } => match scoreboard::fetch_games(league) {
            Ok(games) => Delta::SetGames { league, games },
            Err(err) => Delta::Log(format!("[WARN] {} scores error: {err:#}", league.label())),
        },
    };
    tx.send(delta).is_ok()
}
