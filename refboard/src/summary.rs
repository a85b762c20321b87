use std::fmt;
use refboard_api::{RefereeMessage, Team};

use crate::texts::{describe_command, format_team, map_game_event_to_text, map_stage_to_text};

/// Everything the board shows for one referee message, already rendered to text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefereeSummary {
    pub stage: String,
    /// Current command, including the team it is addressed to
    pub command: String,
    pub next_command: Option<String>,
    /// `<Yellow> y : b <Blue>`
    pub score: String,
    pub game_events: Vec<String>,
}

impl From<&RefereeMessage> for RefereeSummary {
    fn from(message: &RefereeMessage) -> Self {
        Self {
            stage: map_stage_to_text(message.stage),
            command: describe_command(message.command),
            next_command: message.next_command.map(describe_command),
            score: format!(
                "{} {} : {} {}",
                format_team(Team::Yellow),
                message.yellow.score,
                message.blue.score,
                format_team(Team::Blue),
            ),
            game_events: message.game_events.iter().map(map_game_event_to_text).collect(),
        }
    }
}

impl fmt::Display for RefereeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.stage)?;
        writeln!(f, "{}", self.score)?;
        write!(f, "{}", self.command)?;
        if let Some(next_command) = &self.next_command {
            write!(f, "\nNext: {next_command}")?;
        }
        for event in &self.game_events {
            write!(f, "\n{event}")?;
        }
        Ok(())
    }
}
