use crate::cli::parser::{Commands, TrackAction};
use crate::config::Config;
use crate::core::trackside::TracksideLogic;
use crate::db::initialize::open_db;
use crate::errors::AppResult;
use crate::ui::messages::info;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Track {
        action: TrackAction::List,
    } = cmd
    {
        let mut pool = open_db(&cfg.database)?;
        let tracks = TracksideLogic::tracks(&mut pool)?;
        if tracks.is_empty() {
            info("No tracks yet. They are created with `rsetup trackside new <TRACK>`.");
        }
        for t in tracks {
            println!("#{:<5} {}", t.id, t.name);
        }
    }

    Ok(())
}
