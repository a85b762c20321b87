mod game_event_text;
mod units;

pub use game_event_text::*;
pub use units::*;

use refboard_api::{BallLeftField, Command, Stage, Team};
use refboard_api::{
    AimlessKick, AttackerDoubleTouchedBall, AttackerTooCloseToDefenseArea, AttackerTouchedBallInDefenseArea,
    AttackerTouchedOpponentInDefenseArea, BotDribbledBallTooFar, BotDroppedParts, BotHeldBallDeliberately,
    BotInterferedPlacement, BotKickedBallTooFast, BotSubstitution, BotTippedOver, BotTooFastInStop,
    BoundaryCrossing, ChallengeFlag, ChallengeFlagHandled, DefenderInDefenseArea, DefenderInDefenseAreaPartially,
    DefenderTooCloseToKickPoint, EmergencyStop, ExcessiveBotSubstitution, Goal, KeeperHeldBall, MultipleCards,
    MultipleFouls, PenaltyKickFailed, PlacementFailed, PlacementSucceeded, TooManyRobots, UnsportingBehavior,
};

fn stage_text(stage: Stage) -> &'static str {
    match stage {
        Stage::NormalFirstHalfPre => "比赛准备阶段",
        Stage::NormalFirstHalf => "上半场",
        Stage::NormalHalfTime => "中场休息",
        Stage::NormalSecondHalfPre => "下半场准备",
        Stage::NormalSecondHalf => "下半场",
        Stage::ExtraTimeBreak => "加时赛休息",
        Stage::ExtraFirstHalfPre => "上半场（加时赛）准备",
        Stage::ExtraFirstHalf => "上半场（加时赛）",
        Stage::ExtraHalfTime => "中场休息（加时赛）",
        Stage::ExtraSecondHalfPre => "下半场（加时赛）准备",
        Stage::ExtraSecondHalf => "下半场（加时赛）",
        Stage::PenaltyShootoutBreak => "点球大战准备",
        Stage::PenaltyShootout => "点球大战",
        Stage::PostGame => "比赛结束",
    }
}

// The team is rendered next to the command, so both colours share a label
fn command_text(command: Command) -> &'static str {
    match command {
        Command::Halt => "Game Halt",
        Command::Stop => "Stop Game",
        Command::NormalStart => "Normal Start",
        Command::ForceStart => "Force Start",
        Command::PrepareKickoffYellow | Command::PrepareKickoffBlue => "Kickoff",
        Command::PreparePenaltyYellow | Command::PreparePenaltyBlue => "Penalty Kick",
        Command::DirectFreeYellow | Command::DirectFreeBlue => "Direct Kick",
        Command::IndirectFreeYellow | Command::IndirectFreeBlue => "Indirect Kick",
        Command::TimeoutYellow | Command::TimeoutBlue => "Timeout",
        Command::GoalYellow | Command::GoalBlue => "Goal",
        Command::BallPlacementYellow | Command::BallPlacementBlue => "Ball Placement",
    }
}

/// Text for a raw stage number. Numbers from a newer protocol get a fallback that includes them.
pub fn map_stage_to_text(stage: i32) -> String {
    match Stage::try_from(stage) {
        Ok(stage) => stage_text(stage).to_string(),
        Err(_) => format!("未知的比赛阶段: {stage}"),
    }
}

/// Text for a raw command number, without the team
pub fn map_command_to_text(command: i32) -> String {
    match Command::try_from(command) {
        Ok(command) => command_text(command).to_string(),
        Err(_) => format!("未知命令: {command}"),
    }
}

/// Like [map_command_to_text], followed by the team label for commands addressed to one team
pub fn describe_command(command: i32) -> String {
    match Command::try_from(command) {
        Ok(command) => match command.team() {
            Team::Unknown => command_text(command).to_string(),
            team => format!("{} {}", command_text(command), format_team(team)),
        },
        Err(_) => format!("未知命令: {command}"),
    }
}

/// Team label. The markup is styled by the board's stylesheet.
pub fn format_team(team: Team) -> &'static str {
    match team {
        Team::Blue => r#"<span class="team-blue">Blue</span>"#,
        Team::Yellow => r#"<span class="team-yellow">Yellow</span>"#,
        Team::Unknown => "Unknown",
    }
}

pub fn opposite_team(team: Team) -> Team {
    match team {
        Team::Blue => Team::Yellow,
        Team::Yellow => Team::Blue,
        Team::Unknown => Team::Unknown,
    }
}

/// A game event payload that names the team (and possibly the bot) that caused it
pub trait ActingParty {
    fn by_team(&self) -> Option<Team>;

    fn by_bot(&self) -> Option<u32> {
        None
    }
}

macro_rules! acting_team {
    ($($t:ty),+ $(,)?) => {
        $(impl ActingParty for $t {
            fn by_team(&self) -> Option<Team> { self.by_team }
        })+
    }
}

macro_rules! acting_team_and_bot {
    ($($t:ty),+ $(,)?) => {
        $(impl ActingParty for $t {
            fn by_team(&self) -> Option<Team> { self.by_team }

            fn by_bot(&self) -> Option<u32> { self.by_bot }
        })+
    }
}

acting_team!(
    PlacementFailed, PlacementSucceeded, BotSubstitution, ExcessiveBotSubstitution, TooManyRobots, Goal,
    KeeperHeldBall, MultipleCards, MultipleFouls, UnsportingBehavior, BoundaryCrossing,
    PenaltyKickFailed, ChallengeFlag, ChallengeFlagHandled, EmergencyStop,
);

acting_team_and_bot!(
    BallLeftField, AimlessKick, AttackerDoubleTouchedBall, AttackerTouchedBallInDefenseArea, BotDribbledBallTooFar,
    BotKickedBallTooFast, AttackerTooCloseToDefenseArea, BotInterferedPlacement, BotHeldBallDeliberately, BotTippedOver,
    BotDroppedParts, BotTooFastInStop, DefenderTooCloseToKickPoint, DefenderInDefenseArea,
    DefenderInDefenseAreaPartially, AttackerTouchedOpponentInDefenseArea,
);

/// `"<team> <bot>"`, just `"<team>"` without a bot, or nothing at all without a team. Bot 0 is a
/// real bot.
pub fn team_and_bot(event: &impl ActingParty) -> String {
    let Some(team) = event.by_team() else {
        return String::new();
    };
    match event.by_bot() {
        Some(bot) => format!("{} {bot}", format_team(team)),
        None => format_team(team).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use refboard_api::ProtoEnum;
    use super::*;

    const BLUE: &str = r#"<span class="team-blue">Blue</span>"#;
    const YELLOW: &str = r#"<span class="team-yellow">Yellow</span>"#;

    #[test]
    fn every_stage() {
        let texts: Vec<_> = (0..14).map(map_stage_to_text).collect();
        assert_eq!(texts, vec![
            "比赛准备阶段",
            "上半场",
            "中场休息",
            "下半场准备",
            "下半场",
            "加时赛休息",
            "上半场（加时赛）准备",
            "上半场（加时赛）",
            "中场休息（加时赛）",
            "下半场（加时赛）准备",
            "下半场（加时赛）",
            "点球大战准备",
            "点球大战",
            "比赛结束",
        ]);
    }

    #[test]
    fn every_command() {
        let texts: Vec<_> = (0..18).map(map_command_to_text).collect();
        assert_eq!(texts, vec![
            "Game Halt",
            "Stop Game",
            "Normal Start",
            "Force Start",
            "Kickoff",
            "Kickoff",
            "Penalty Kick",
            "Penalty Kick",
            "Direct Kick",
            "Direct Kick",
            "Indirect Kick",
            "Indirect Kick",
            "Timeout",
            "Timeout",
            "Goal",
            "Goal",
            "Ball Placement",
            "Ball Placement",
        ]);
    }

    #[test]
    fn colour_pairs_share_text() {
        for command in Command::ALL {
            if command.team() == Team::Yellow {
                let blue_twin = i32::from(*command) + 1;
                assert_eq!(map_command_to_text((*command).into()), map_command_to_text(blue_twin));
            }
        }
    }

    #[test]
    fn unknown_values_fall_back() {
        assert_eq!(map_stage_to_text(14), "未知的比赛阶段: 14");
        assert_eq!(map_stage_to_text(-1), "未知的比赛阶段: -1");
        assert_eq!(map_command_to_text(18), "未知命令: 18");
        assert_eq!(describe_command(99), "未知命令: 99");
    }

    #[test]
    fn command_with_team() {
        assert_eq!(describe_command(Command::Halt.into()), "Game Halt");
        assert_eq!(describe_command(Command::PrepareKickoffBlue.into()), format!("Kickoff {BLUE}"));
        assert_eq!(describe_command(Command::BallPlacementYellow.into()), format!("Ball Placement {YELLOW}"));
    }

    #[test]
    fn teams() {
        assert_eq!(format_team(Team::Blue), BLUE);
        assert_eq!(format_team(Team::Yellow), YELLOW);
        assert_eq!(format_team(Team::Unknown), "Unknown");
        assert_eq!(opposite_team(Team::Blue), Team::Yellow);
        assert_eq!(opposite_team(Team::Yellow), Team::Blue);
        assert_eq!(opposite_team(Team::Unknown), Team::Unknown);
    }

    #[test]
    fn team_and_bot_presence() {
        assert_eq!(team_and_bot(&AimlessKick::default()), "");
        assert_eq!(team_and_bot(&AimlessKick { by_team: Some(Team::Blue), ..Default::default() }), BLUE);
        assert_eq!(
            team_and_bot(&AimlessKick { by_team: Some(Team::Blue), by_bot: Some(0), ..Default::default() }),
            format!("{BLUE} 0"),
        );
        // A bot without a team isn't shown either
        assert_eq!(team_and_bot(&AimlessKick { by_bot: Some(3), ..Default::default() }), "");
    }

    #[test]
    fn team_only_payloads_never_show_a_bot() {
        let goal = Goal { by_team: Some(Team::Yellow), kicking_bot: Some(7), ..Default::default() };
        assert_eq!(team_and_bot(&goal), YELLOW);
    }
}
