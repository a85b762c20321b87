use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde::ser::SerializeMap;
use serde_json::{Map, Value};

use crate::{camel_case_keys, deserialize_optional_int, timestamp_from_micros, ProtocolError, Team, Vector2};

/// A game event as reported by the game controller or an autoref.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameEvent {
    /// Unique id assigned by the game controller
    pub id: Option<String>,

    /// Who reported the event (game controller, autoref names, ...)
    pub origin: Vec<String>,

    /// Creation time, in microseconds since the unix epoch
    pub created_timestamp: Option<u64>,

    /// The actual event. None if the sender didn't attach one.
    pub event: Option<GameEventKind>,
}

impl GameEvent {
    pub fn new(event: GameEventKind) -> Self {
        Self {
            event: Some(event),
            ..Default::default()
        }
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created_timestamp.and_then(timestamp_from_micros)
    }
}

#[derive(Deserialize)]
struct CreatedTimestamp(#[serde(deserialize_with = "deserialize_optional_int")] Option<u64>);

impl TryFrom<Map<String, Value>> for GameEvent {
    type Error = ProtocolError;

    fn try_from(object: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut object = camel_case_keys(object);
        let id = object.remove("id")
            .map(serde_json::from_value)
            .transpose()?;
        let origin = object.remove("origin")
            .map(serde_json::from_value)
            .transpose()?
            .unwrap_or_default();
        let created_timestamp = match object.remove("createdTimestamp") {
            Some(value) => serde_json::from_value::<CreatedTimestamp>(value)?.0,
            None => None,
        };
        // The event type enum duplicates the payload key, which is what's actually used
        object.remove("type");

        let mut payloads = object.into_iter();
        let event = match (payloads.next(), payloads.next()) {
            (None, _) => None,
            (Some((case, value)), None) => Some(GameEventKind::from_case(case, value)?),
            (Some((first, _)), Some((second, _))) => {
                return Err(ProtocolError::MultiplePayloads { first, second });
            }
        };

        Ok(Self { id, origin, created_timestamp, event })
    }
}

impl<'de> Deserialize<'de> for GameEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let object = Map::<String, Value>::deserialize(deserializer)?;
        GameEvent::try_from(object).map_err(serde::de::Error::custom)
    }
}

impl Serialize for GameEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(id) = &self.id {
            map.serialize_entry("id", id)?;
        }
        if !self.origin.is_empty() {
            map.serialize_entry("origin", &self.origin)?;
        }
        if let Some(created_timestamp) = self.created_timestamp {
            map.serialize_entry("createdTimestamp", &created_timestamp.to_string())?;
        }
        if let Some(event) = &self.event {
            event.serialize_entry(&mut map)?;
        }
        map.end()
    }
}

// Generates GameEventKind from the list of (JSON key, variant, payload) triples, together with the
// conversions from and to the JSON key/value pair.
macro_rules! game_event_kinds {
    ($($case:literal => $variant:ident($payload:ty),)+) => {
        /// The payload of a game event, tagged by the JSON key it was found under
        #[derive(Debug, Clone, PartialEq)]
        pub enum GameEventKind {
            $($variant($payload),)+

            /// A payload this version doesn't know. Kept so it can still be displayed as such.
            Unknown {
                case: String,
                value: Value,
            },
        }

        impl GameEventKind {
            /// The JSON key this payload is stored under
            pub fn case(&self) -> &str {
                match self {
                    $(GameEventKind::$variant(_) => $case,)+
                    GameEventKind::Unknown { case, .. } => case,
                }
            }

            pub fn from_case(case: String, value: Value) -> Result<Self, ProtocolError> {
                let kind = match case.as_str() {
                    $($case => GameEventKind::$variant(
                        serde_json::from_value(value)
                            .map_err(|err| ProtocolError::MalformedPayload { case: case.clone(), err })?
                    ),)+
                    _ => {
                        warn!("Unrecognized game event \"{case}\"");
                        GameEventKind::Unknown { case: case.clone(), value }
                    }
                };
                debug!("Decoded {} game event", kind.case());
                Ok(kind)
            }

            fn serialize_entry<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
                match self {
                    $(GameEventKind::$variant(payload) => map.serialize_entry($case, payload),)+
                    GameEventKind::Unknown { case, value } => map.serialize_entry(case, value),
                }
            }
        }
    };
}

game_event_kinds! {
    "noProgressInGame" => NoProgressInGame(NoProgressInGame),
    "placementFailed" => PlacementFailed(PlacementFailed),
    "placementSucceeded" => PlacementSucceeded(PlacementSucceeded),
    "botSubstitution" => BotSubstitution(BotSubstitution),
    "excessiveBotSubstitution" => ExcessiveBotSubstitution(ExcessiveBotSubstitution),
    "tooManyRobots" => TooManyRobots(TooManyRobots),
    "ballLeftFieldTouchLine" => BallLeftFieldTouchLine(BallLeftField),
    "ballLeftFieldGoalLine" => BallLeftFieldGoalLine(BallLeftField),
    "possibleGoal" => PossibleGoal(Goal),
    "goal" => Goal(Goal),
    "invalidGoal" => InvalidGoal(Goal),
    "aimlessKick" => AimlessKick(AimlessKick),
    "keeperHeldBall" => KeeperHeldBall(KeeperHeldBall),
    "attackerDoubleTouchedBall" => AttackerDoubleTouchedBall(AttackerDoubleTouchedBall),
    "attackerTouchedBallInDefenseArea" => AttackerTouchedBallInDefenseArea(AttackerTouchedBallInDefenseArea),
    "botDribbledBallTooFar" => BotDribbledBallTooFar(BotDribbledBallTooFar),
    "botKickedBallTooFast" => BotKickedBallTooFast(BotKickedBallTooFast),
    "attackerTooCloseToDefenseArea" => AttackerTooCloseToDefenseArea(AttackerTooCloseToDefenseArea),
    "botInterferedPlacement" => BotInterferedPlacement(BotInterferedPlacement),
    "botCrashDrawn" => BotCrashDrawn(BotCrashDrawn),
    "botCrashUnique" => BotCrashUnique(BotCrashUnique),
    "botPushedBot" => BotPushedBot(BotPushedBot),
    "botHeldBallDeliberately" => BotHeldBallDeliberately(BotHeldBallDeliberately),
    "botTippedOver" => BotTippedOver(BotTippedOver),
    "botDroppedParts" => BotDroppedParts(BotDroppedParts),
    "botTooFastInStop" => BotTooFastInStop(BotTooFastInStop),
    "defenderTooCloseToKickPoint" => DefenderTooCloseToKickPoint(DefenderTooCloseToKickPoint),
    "defenderInDefenseArea" => DefenderInDefenseArea(DefenderInDefenseArea),
    "defenderInDefenseAreaPartially" => DefenderInDefenseAreaPartially(DefenderInDefenseAreaPartially),
    "attackerTouchedOpponentInDefenseArea" => AttackerTouchedOpponentInDefenseArea(AttackerTouchedOpponentInDefenseArea),
    "multipleCards" => MultipleCards(MultipleCards),
    "multipleFouls" => MultipleFouls(MultipleFouls),
    "unsportingBehaviorMinor" => UnsportingBehaviorMinor(UnsportingBehavior),
    "unsportingBehaviorMajor" => UnsportingBehaviorMajor(UnsportingBehavior),
    "boundaryCrossing" => BoundaryCrossing(BoundaryCrossing),
    "penaltyKickFailed" => PenaltyKickFailed(PenaltyKickFailed),
    "challengeFlag" => ChallengeFlag(ChallengeFlag),
    "challengeFlagHandled" => ChallengeFlagHandled(ChallengeFlagHandled),
    "emergencyStop" => EmergencyStop(EmergencyStop),
}

// Payloads. Every field is optional on the wire; plain numbers fall back to zero, fields whose
// absence means something are Options.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NoProgressInGame {
    pub location: Option<Vector2>,

    /// Seconds without progress
    pub time: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlacementFailed {
    pub by_team: Option<Team>,

    /// Distance between the ball and the placement target when the placement timed out
    pub remaining_distance: f32,

    /// Only reported by newer game controllers
    pub nearest_own_bot_distance: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlacementSucceeded {
    pub by_team: Option<Team>,
    pub time_taken: f32,
    pub precision: f32,
    pub distance: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BotSubstitution {
    pub by_team: Option<Team>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExcessiveBotSubstitution {
    pub by_team: Option<Team>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TooManyRobots {
    pub by_team: Option<Team>,
    pub num_robots_allowed: i32,
    pub num_robots_on_field: i32,
    pub ball_location: Option<Vector2>,
}

/// Shared by the touch line and goal line variants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BallLeftField {
    pub by_team: Option<Team>,
    pub by_bot: Option<u32>,
    pub location: Option<Vector2>,
}

/// Shared by possible, confirmed and invalid goals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Goal {
    /// The team that the goal counts for
    pub by_team: Option<Team>,
    pub kicking_team: Option<Team>,
    pub kicking_bot: Option<u32>,
    pub location: Option<Vector2>,
    pub kick_location: Option<Vector2>,
    pub max_ball_height: Option<f32>,
    pub num_robots_by_team: Option<u32>,
    #[serde(deserialize_with = "deserialize_optional_int")]
    pub last_touch_by_team: Option<u64>,
    /// Why the goal was rejected (invalid goals) or any remark from the sender
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AimlessKick {
    pub by_team: Option<Team>,
    pub by_bot: Option<u32>,
    pub location: Option<Vector2>,
    pub kick_location: Option<Vector2>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeeperHeldBall {
    pub by_team: Option<Team>,
    pub location: Option<Vector2>,
    /// Seconds
    pub duration: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttackerDoubleTouchedBall {
    pub by_team: Option<Team>,
    pub by_bot: Option<u32>,
    pub location: Option<Vector2>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttackerTouchedBallInDefenseArea {
    pub by_team: Option<Team>,
    pub by_bot: Option<u32>,
    pub location: Option<Vector2>,
    pub distance: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BotDribbledBallTooFar {
    pub by_team: Option<Team>,
    pub by_bot: Option<u32>,
    pub start: Option<Vector2>,
    pub end: Option<Vector2>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BotKickedBallTooFast {
    pub by_team: Option<Team>,
    pub by_bot: Option<u32>,
    pub location: Option<Vector2>,
    /// Metres per second
    pub initial_ball_speed: f32,
    pub chipped: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttackerTooCloseToDefenseArea {
    pub by_team: Option<Team>,
    pub by_bot: Option<u32>,
    pub location: Option<Vector2>,
    pub distance: f32,
    pub ball_location: Option<Vector2>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BotInterferedPlacement {
    pub by_team: Option<Team>,
    pub by_bot: Option<u32>,
    pub location: Option<Vector2>,
}

/// Two bots crashed and neither one is to blame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BotCrashDrawn {
    pub bot_yellow: u32,
    pub bot_blue: u32,
    pub location: Option<Vector2>,
    /// Metres per second
    pub crash_speed: f32,
    /// Metres per second
    pub speed_diff: f32,
    /// Radians
    pub crash_angle: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BotCrashUnique {
    /// The violator's team
    pub by_team: Option<Team>,
    pub violator: u32,
    pub victim: u32,
    pub location: Option<Vector2>,
    pub crash_speed: f32,
    pub speed_diff: f32,
    pub crash_angle: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BotPushedBot {
    pub by_team: Option<Team>,
    pub violator: u32,
    pub victim: u32,
    pub location: Option<Vector2>,
    pub pushed_distance: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BotHeldBallDeliberately {
    pub by_team: Option<Team>,
    pub by_bot: Option<u32>,
    pub location: Option<Vector2>,
    /// Seconds
    pub duration: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BotTippedOver {
    pub by_team: Option<Team>,
    pub by_bot: Option<u32>,
    pub location: Option<Vector2>,
    pub ball_location: Option<Vector2>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BotDroppedParts {
    pub by_team: Option<Team>,
    pub by_bot: Option<u32>,
    pub location: Option<Vector2>,
    pub ball_location: Option<Vector2>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BotTooFastInStop {
    pub by_team: Option<Team>,
    pub by_bot: Option<u32>,
    pub location: Option<Vector2>,
    pub speed: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DefenderTooCloseToKickPoint {
    pub by_team: Option<Team>,
    pub by_bot: Option<u32>,
    pub location: Option<Vector2>,
    pub distance: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DefenderInDefenseArea {
    pub by_team: Option<Team>,
    pub by_bot: Option<u32>,
    pub location: Option<Vector2>,
    pub distance: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DefenderInDefenseAreaPartially {
    pub by_team: Option<Team>,
    pub by_bot: Option<u32>,
    pub location: Option<Vector2>,
    pub distance: f32,
    pub ball_location: Option<Vector2>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttackerTouchedOpponentInDefenseArea {
    pub by_team: Option<Team>,
    pub by_bot: Option<u32>,
    pub victim: Option<u32>,
    pub location: Option<Vector2>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MultipleCards {
    pub by_team: Option<Team>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MultipleFouls {
    pub by_team: Option<Team>,
    /// The fouls that added up to this one
    pub caused_game_events: Vec<GameEvent>,
}

/// Shared by the minor and major variants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnsportingBehavior {
    pub by_team: Option<Team>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoundaryCrossing {
    pub by_team: Option<Team>,
    pub location: Option<Vector2>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PenaltyKickFailed {
    pub by_team: Option<Team>,
    pub location: Option<Vector2>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChallengeFlag {
    pub by_team: Option<Team>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChallengeFlagHandled {
    pub by_team: Option<Team>,
    pub accepted: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmergencyStop {
    pub by_team: Option<Team>,
}
