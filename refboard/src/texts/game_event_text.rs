use itertools::Itertools;
use refboard_api::{BotCrashDrawn, BotCrashUnique, GameEvent, GameEventKind};

use crate::texts::{distance, format_team, opposite_team, rad_to_deg, seconds, team_and_bot, velocity};

/// Measurements shared by both kinds of crash
pub trait CrashDetails {
    /// Metres per second
    fn crash_speed(&self) -> f32;

    /// Radians
    fn crash_angle(&self) -> f32;

    /// Metres per second
    fn speed_diff(&self) -> f32;
}

macro_rules! crash_details {
    ($($t:ty),+) => {
        $(impl CrashDetails for $t {
            fn crash_speed(&self) -> f32 { self.crash_speed }

            fn crash_angle(&self) -> f32 { self.crash_angle }

            fn speed_diff(&self) -> f32 { self.speed_diff }
        })+
    }
}

crash_details!(BotCrashDrawn, BotCrashUnique);

/// Appends whichever crash measurements were reported. Zero or negative means not measured.
pub fn append_crash_details(event: &impl CrashDetails, mut text: String) -> String {
    if event.crash_speed() > 0.0 {
        text += &format!(" with {}", velocity(event.crash_speed()));
    }
    if event.crash_angle() > 0.0 {
        text += &format!(" @ {}", rad_to_deg(event.crash_angle()));
    }
    if event.speed_diff() > 0.0 {
        text += &format!(" (Δ {})", velocity(event.speed_diff()));
    }
    text
}

/// The board's line of text for a game event
pub fn map_game_event_to_text(game_event: &GameEvent) -> String {
    let Some(event) = &game_event.event else {
        return "无法识别的比赛事件".to_string();
    };

    match event {
        GameEventKind::NoProgressInGame(e) => format!("{}内无进展", seconds(e.time)),
        GameEventKind::PlacementFailed(e) => match e.nearest_own_bot_distance {
            Some(nearest) => format!(
                "{} 放球失败  (剩余{}，最近己方机器人距离{})",
                team_and_bot(e),
                distance(e.remaining_distance),
                distance(nearest),
            ),
            None => format!("{} 放球失败  (剩余{})", team_and_bot(e), distance(e.remaining_distance)),
        },
        GameEventKind::PlacementSucceeded(e) => format!(
            "{} 成功放球 距离{} 耗时{} 精度{}",
            team_and_bot(e),
            distance(e.distance),
            seconds(e.time_taken),
            distance(e.precision),
        ),
        GameEventKind::BotSubstitution(e) => format!("{} 进行机器人更换", team_and_bot(e)),
        GameEventKind::ExcessiveBotSubstitution(e) => format!("{} 更换机器人次数过多", team_and_bot(e)),
        GameEventKind::TooManyRobots(e) => format!(
            "{} 场上有{}个机器人，但只允许存在{}个",
            team_and_bot(e),
            e.num_robots_on_field,
            e.num_robots_allowed,
        ),
        GameEventKind::BallLeftFieldTouchLine(e) => format!("{} 将球踢出边线", team_and_bot(e)),
        GameEventKind::BallLeftFieldGoalLine(e) => format!("{} 将球踢出底线", team_and_bot(e)),
        GameEventKind::PossibleGoal(e) => format!("{} 存在待确认的进球", team_and_bot(e)),
        GameEventKind::Goal(e) => format!("{} 进球有效", team_and_bot(e)),
        GameEventKind::InvalidGoal(e) => {
            format!("{} 进球无效：{}", team_and_bot(e), e.message.as_deref().unwrap_or_default())
        }
        GameEventKind::AimlessKick(e) => format!("{} 无意义射门", team_and_bot(e)),
        GameEventKind::KeeperHeldBall(e) => format!("{} 守门员清球超时{}", team_and_bot(e), seconds(e.duration)),
        GameEventKind::AttackerDoubleTouchedBall(e) => format!("{} 二次触球", team_and_bot(e)),
        GameEventKind::AttackerTouchedBallInDefenseArea(e) => format!("{} 在对方禁区触球", team_and_bot(e)),
        GameEventKind::BotDribbledBallTooFar(e) => format!("{} 带球过度", team_and_bot(e)),
        GameEventKind::BotKickedBallTooFast(e) => {
            format!("{} 踢球速度过快({})", team_and_bot(e), velocity(e.initial_ball_speed))
        }
        GameEventKind::AttackerTooCloseToDefenseArea(e) => {
            format!("{} 距离对方禁区过近({})", team_and_bot(e), distance(e.distance))
        }
        GameEventKind::BotInterferedPlacement(e) => format!("{} 干扰放球", team_and_bot(e)),
        GameEventKind::BotCrashDrawn(e) => {
            append_crash_details(e, format!("蓝队机器人{}和黄队机器人{}碰撞", e.bot_blue, e.bot_yellow))
        }
        GameEventKind::BotCrashUnique(e) => {
            let by_team = e.by_team.unwrap_or_default();
            let text = format!(
                "{} {} 撞向 {} {}",
                format_team(by_team),
                e.violator,
                format_team(opposite_team(by_team)),
                e.victim,
            );
            append_crash_details(e, text)
        }
        GameEventKind::BotPushedBot(e) => {
            let by_team = e.by_team.unwrap_or_default();
            let mut text = format!(
                "{} {} 推挤 {} {}",
                format_team(by_team),
                e.violator,
                format_team(opposite_team(by_team)),
                e.victim,
            );
            if e.pushed_distance > 0.0 {
                text += &format!(" 距离{}", distance(e.pushed_distance));
            }
            text
        }
        // Printed as received, in the shortest form that reads back as the same f32 (2.3, not
        // 2.299999952316284), without unit formatting
        GameEventKind::BotHeldBallDeliberately(e) => format!("{} 护球 {} s", team_and_bot(e), e.duration),
        GameEventKind::BotTippedOver(e) => format!("{} 翻倒", team_and_bot(e)),
        GameEventKind::BotDroppedParts(e) => format!("{} 掉落部件", team_and_bot(e)),
        GameEventKind::BotTooFastInStop(e) => format!("{} 在停止阶段超速({})", team_and_bot(e), velocity(e.speed)),
        GameEventKind::DefenderTooCloseToKickPoint(e) => {
            format!("{} 距离开球点过近({})", team_and_bot(e), distance(e.distance))
        }
        GameEventKind::DefenderInDefenseArea(e) => {
            format!("{} 完全进入己方禁区触球({})", team_and_bot(e), distance(e.distance))
        }
        GameEventKind::DefenderInDefenseAreaPartially(e) => format!("{} 部分进入己方禁区触球", team_and_bot(e)),
        GameEventKind::AttackerTouchedOpponentInDefenseArea(e) => {
            format!("{} 在对方禁区触碰对方机器人", team_and_bot(e))
        }
        GameEventKind::MultipleCards(e) => format!("{} 累计受牌", team_and_bot(e)),
        GameEventKind::MultipleFouls(e) => format!(
            "{} 累计多次犯规：{}",
            team_and_bot(e),
            e.caused_game_events.iter().map(map_game_event_to_text).join("，"),
        ),
        GameEventKind::UnsportingBehaviorMinor(e) => {
            format!("{} 轻微的违反体育精神的行为：{}", team_and_bot(e), e.reason)
        }
        GameEventKind::UnsportingBehaviorMajor(e) => {
            format!("{} 严重的违反体育精神的行为：{}", team_and_bot(e), e.reason)
        }
        GameEventKind::BoundaryCrossing(e) => format!("{} 将球踢出场地边界", team_and_bot(e)),
        GameEventKind::PenaltyKickFailed(e) => match &e.reason {
            Some(reason) => format!("{} 点球失败：{reason}", team_and_bot(e)),
            None => format!("{} 点球失败", team_and_bot(e)),
        },
        GameEventKind::ChallengeFlag(e) => format!("{} 提出质疑", team_and_bot(e)),
        GameEventKind::ChallengeFlagHandled(e) if e.accepted => format!("{} 的质疑被接受", team_and_bot(e)),
        GameEventKind::ChallengeFlagHandled(e) => format!("{} 的质疑被驳回", team_and_bot(e)),
        GameEventKind::EmergencyStop(e) => format!("{} 发出紧急停止信号", team_and_bot(e)),
        GameEventKind::Unknown { .. } => "未知比赛事件".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use refboard_api::BotHeldBallDeliberately;
    use super::*;

    #[test]
    fn crash_details_in_order() {
        let crash = BotCrashDrawn { crash_speed: 2.01, crash_angle: 1.5, speed_diff: 0.5, ..Default::default() };
        assert_eq!(append_crash_details(&crash, "x".to_string()), "x with 2.1m/s @ 86° (Δ 0.5m/s)");
    }

    #[test]
    fn unmeasured_crash_details_are_left_out() {
        let crash = BotCrashUnique { crash_angle: 1.0, ..Default::default() };
        assert_eq!(append_crash_details(&crash, "x".to_string()), "x @ 58°");
        assert_eq!(append_crash_details(&BotCrashDrawn::default(), "x".to_string()), "x");
    }

    #[test]
    fn negative_crash_details_are_left_out() {
        let crash = BotCrashUnique { crash_speed: -1.0, crash_angle: -0.5, speed_diff: -2.0, ..Default::default() };
        assert_eq!(append_crash_details(&crash, "x".to_string()), "x");
    }

    #[test]
    fn held_ball_duration_is_printed_as_received() {
        let held = BotHeldBallDeliberately { duration: 2.3, ..Default::default() };
        let event = GameEvent::new(GameEventKind::BotHeldBallDeliberately(held));
        assert_eq!(map_game_event_to_text(&event), " 护球 2.3 s");
    }

    #[test]
    fn missing_payload() {
        assert_eq!(map_game_event_to_text(&GameEvent::default()), "无法识别的比赛事件");
    }
}
