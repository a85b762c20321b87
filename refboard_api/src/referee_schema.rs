use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{deserialize_optional_int, deserialize_optional_proto_enum, deserialize_proto_enum, timestamp_from_micros};
use crate::{GameEvent, Team, Vector2};

proto_enum! {
    /// Phase of the match
    Stage {
        NormalFirstHalfPre = 0 => "NORMAL_FIRST_HALF_PRE",
        NormalFirstHalf = 1 => "NORMAL_FIRST_HALF",
        NormalHalfTime = 2 => "NORMAL_HALF_TIME",
        NormalSecondHalfPre = 3 => "NORMAL_SECOND_HALF_PRE",
        NormalSecondHalf = 4 => "NORMAL_SECOND_HALF",
        ExtraTimeBreak = 5 => "EXTRA_TIME_BREAK",
        ExtraFirstHalfPre = 6 => "EXTRA_FIRST_HALF_PRE",
        ExtraFirstHalf = 7 => "EXTRA_FIRST_HALF",
        ExtraHalfTime = 8 => "EXTRA_HALF_TIME",
        ExtraSecondHalfPre = 9 => "EXTRA_SECOND_HALF_PRE",
        ExtraSecondHalf = 10 => "EXTRA_SECOND_HALF",
        PenaltyShootoutBreak = 11 => "PENALTY_SHOOTOUT_BREAK",
        PenaltyShootout = 12 => "PENALTY_SHOOTOUT",
        PostGame = 13 => "POST_GAME",
    }
}

proto_enum! {
    /// Referee directive. Most commands come in a yellow and a blue flavour.
    Command {
        Halt = 0 => "HALT",
        Stop = 1 => "STOP",
        NormalStart = 2 => "NORMAL_START",
        ForceStart = 3 => "FORCE_START",
        PrepareKickoffYellow = 4 => "PREPARE_KICKOFF_YELLOW",
        PrepareKickoffBlue = 5 => "PREPARE_KICKOFF_BLUE",
        PreparePenaltyYellow = 6 => "PREPARE_PENALTY_YELLOW",
        PreparePenaltyBlue = 7 => "PREPARE_PENALTY_BLUE",
        DirectFreeYellow = 8 => "DIRECT_FREE_YELLOW",
        DirectFreeBlue = 9 => "DIRECT_FREE_BLUE",
        IndirectFreeYellow = 10 => "INDIRECT_FREE_YELLOW",
        IndirectFreeBlue = 11 => "INDIRECT_FREE_BLUE",
        TimeoutYellow = 12 => "TIMEOUT_YELLOW",
        TimeoutBlue = 13 => "TIMEOUT_BLUE",
        GoalYellow = 14 => "GOAL_YELLOW",
        GoalBlue = 15 => "GOAL_BLUE",
        BallPlacementYellow = 16 => "BALL_PLACEMENT_YELLOW",
        BallPlacementBlue = 17 => "BALL_PLACEMENT_BLUE",
    }
}

impl Command {
    /// The team this command is addressed to. Halt, stop and the two starts apply to both teams.
    pub fn team(self) -> Team {
        match self {
            Command::Halt | Command::Stop | Command::NormalStart | Command::ForceStart => Team::Unknown,
            Command::PrepareKickoffYellow
            | Command::PreparePenaltyYellow
            | Command::DirectFreeYellow
            | Command::IndirectFreeYellow
            | Command::TimeoutYellow
            | Command::GoalYellow
            | Command::BallPlacementYellow => Team::Yellow,
            Command::PrepareKickoffBlue
            | Command::PreparePenaltyBlue
            | Command::DirectFreeBlue
            | Command::IndirectFreeBlue
            | Command::TimeoutBlue
            | Command::GoalBlue
            | Command::BallPlacementBlue => Team::Blue,
        }
    }
}

fn stage_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    deserialize_proto_enum::<Stage, D>(deserializer)
}

fn command_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    deserialize_proto_enum::<Command, D>(deserializer)
}

fn optional_command_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    deserialize_optional_proto_enum::<Command, D>(deserializer)
}

/// Per-team bookkeeping carried by every referee message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamInfo {
    pub name: String,

    pub score: u32,

    pub red_cards: u32,

    /// Remaining time of each active yellow card, in microseconds
    pub yellow_card_times: Vec<u32>,

    /// Total number of yellow cards received, including expired ones
    pub yellow_cards: u32,

    pub timeouts: u32,

    /// Remaining timeout budget, in microseconds
    pub timeout_time: u32,

    /// Bot number of the goalkeeper
    pub goalkeeper: u32,

    pub foul_counter: Option<u32>,

    pub ball_placement_failures: Option<u32>,

    pub can_place_ball: Option<bool>,

    pub max_allowed_bots: Option<u32>,

    pub bot_substitution_intent: Option<bool>,

    pub ball_placement_failures_reached: Option<bool>,
}

/// One packet of the referee multicast stream, in its decoded form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RefereeMessage {
    pub source_identifier: Option<String>,

    /// Send time, in microseconds since the unix epoch
    #[serde(deserialize_with = "deserialize_optional_int")]
    pub packet_timestamp: Option<u64>,

    /// Raw stage number. See [RefereeMessage::known_stage].
    #[serde(deserialize_with = "stage_value")]
    pub stage: i32,

    /// Microseconds left in the stage. Negative once the stage is in overtime.
    #[serde(deserialize_with = "deserialize_optional_int")]
    pub stage_time_left: Option<i64>,

    /// Raw command number. See [RefereeMessage::known_command].
    #[serde(deserialize_with = "command_value")]
    pub command: i32,

    /// Incremented every time a new command is issued
    pub command_counter: u32,

    #[serde(deserialize_with = "deserialize_optional_int")]
    pub command_timestamp: Option<u64>,

    pub yellow: TeamInfo,

    pub blue: TeamInfo,

    /// Target of the current ball placement, in millimetres (the field coordinate system of the
    /// referee message, unlike game event locations)
    pub designated_position: Option<Vector2>,

    pub blue_team_on_positive_half: Option<bool>,

    #[serde(deserialize_with = "optional_command_value")]
    pub next_command: Option<i32>,

    pub game_events: Vec<GameEvent>,

    #[serde(deserialize_with = "deserialize_optional_int")]
    pub current_action_time_remaining: Option<i64>,

    pub status_message: Option<String>,
}

impl RefereeMessage {
    pub fn known_stage(&self) -> Option<Stage> {
        Stage::try_from(self.stage).ok()
    }

    pub fn known_command(&self) -> Option<Command> {
        Command::try_from(self.command).ok()
    }

    pub fn packet_time(&self) -> Option<DateTime<Utc>> {
        self.packet_timestamp.and_then(timestamp_from_micros)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use crate::ProtoEnum;
    use super::*;

    #[test]
    fn stage_and_command_accept_names_and_numbers() {
        let by_name: RefereeMessage = serde_json::from_value(json!({
            "stage": "EXTRA_HALF_TIME",
            "command": "BALL_PLACEMENT_BLUE",
            "nextCommand": "NORMAL_START"
        })).unwrap();
        let by_number: RefereeMessage = serde_json::from_value(json!({
            "stage": 8,
            "command": 17,
            "nextCommand": 2
        })).unwrap();

        assert_eq!(by_name, by_number);
        assert_eq!(by_name.known_stage(), Some(Stage::ExtraHalfTime));
        assert_eq!(by_name.known_command(), Some(Command::BallPlacementBlue));
        assert_eq!(by_name.next_command, Some(2));
    }

    #[test]
    fn unknown_numbers_are_preserved() {
        let message: RefereeMessage = serde_json::from_value(json!({"stage": 42, "command": 99})).unwrap();
        assert_eq!(message.stage, 42);
        assert_eq!(message.known_stage(), None);
        assert_eq!(message.command, 99);
        assert_eq!(message.known_command(), None);
    }

    #[test]
    fn unknown_names_are_rejected() {
        let err = serde_json::from_value::<RefereeMessage>(json!({"stage": "THIRD_HALF"})).err().unwrap();
        assert!(err.to_string().contains("THIRD_HALF"));
    }

    #[test]
    fn names_match_protocol_numbers() {
        for stage in Stage::ALL {
            assert_eq!(Stage::from_name(stage.name()), Some(*stage));
        }
        for command in Command::ALL {
            assert_eq!(Command::from_name(command.name()), Some(*command));
        }
        assert_eq!(Stage::ALL.len(), 14);
        assert_eq!(Command::ALL.len(), 18);
        assert_eq!(i32::from(Stage::PostGame), 13);
        assert_eq!(i32::from(Command::BallPlacementBlue), 17);
    }

    #[test]
    fn command_team() {
        assert_eq!(Command::Halt.team(), Team::Unknown);
        assert_eq!(Command::ForceStart.team(), Team::Unknown);
        assert_eq!(Command::PrepareKickoffYellow.team(), Team::Yellow);
        assert_eq!(Command::PrepareKickoffBlue.team(), Team::Blue);
        assert_eq!(Command::GoalYellow.team(), Team::Yellow);
        assert_eq!(Command::BallPlacementBlue.team(), Team::Blue);
    }

    #[test]
    fn full_message() {
        let message: RefereeMessage = serde_json::from_value(json!({
            "sourceIdentifier": "gc-1",
            "packetTimestamp": "1700000000000000",
            "stage": "NORMAL_FIRST_HALF",
            "stageTimeLeft": "-2500000",
            "command": "STOP",
            "commandCounter": 12,
            "yellow": {"name": "TIGERs", "score": 2, "yellowCardTimes": [120000000], "goalkeeper": 1},
            "blue": {"name": "ER-Force", "score": 1, "canPlaceBall": false},
            "gameEvents": [{"aimlessKick": {"byTeam": "YELLOW", "byBot": 3}}]
        })).unwrap();

        assert_eq!(message.source_identifier.as_deref(), Some("gc-1"));
        assert_eq!(message.stage_time_left, Some(-2_500_000));
        assert_eq!(message.yellow.name, "TIGERs");
        assert_eq!(message.yellow.yellow_card_times, vec![120000000]);
        assert_eq!(message.blue.can_place_ball, Some(false));
        assert_eq!(message.game_events.len(), 1);
        assert_eq!(message.packet_time().unwrap().to_rfc3339(), "2023-11-14T22:13:20+00:00");
    }
}
