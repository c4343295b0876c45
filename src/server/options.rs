use clap::Parser;

use crate::simulgo::prelude::*;

#[derive(Clone, Debug, Parser)]
pub struct ServerOptions {
    #[arg(short, long)]
    pub log_level: Option<String>,

    #[arg(short, long)]
    pub board_size: Option<usize>,

    #[arg(short = 't', long)]
    pub base_time_secs: Option<u64>,

    /// Overrides the number of byo-yomi periods (default 3); mainly useful
    /// for shortening games in testing.
    #[arg(long)]
    pub byo_yomi_periods: Option<u32>,

    /// Overrides the length of a single byo-yomi period, in seconds
    /// (default 30).
    #[arg(long)]
    pub byo_yomi_period_secs: Option<u64>,

    #[arg(short, long, default_value_t = false)]
    pub human_vs_ai: bool,
}

impl ServerOptions {
    pub fn game_settings(&self) -> GameSettings {
        let mut settings = GameSettings::default();
        if let Some(size) = self.board_size {
            settings.board_size = size;
        }
        if let Some(secs) = self.base_time_secs {
            settings.base_time_ms = secs as i64 * 1000;
        }
        if let Some(periods) = self.byo_yomi_periods {
            settings.byo_yomi_periods = periods;
        }
        if let Some(secs) = self.byo_yomi_period_secs {
            settings.byo_yomi_period_ms = secs as i64 * 1000;
        }
        if self.human_vs_ai {
            settings.mode = GameMode::HumanVsAi;
        }
        settings
    }
}
