use log::debug;
use serde_json::{Map, Value};

use crate::{camel_case_keys, GameEvent, ProtocolError, RefereeMessage};

/// Parses one game event. Unlike going through serde directly, problems with the event itself
/// (as opposed to the JSON syntax) come back as their own [ProtocolError] variant.
pub fn game_event_from_json(json: &str) -> Result<GameEvent, ProtocolError> {
    let value: Value = serde_json::from_str(json)?;
    let object = as_object(value, "game event")?;
    GameEvent::try_from(object)
}

/// Parses one referee message
pub fn referee_message_from_json(json: &str) -> Result<RefereeMessage, ProtocolError> {
    let value: Value = serde_json::from_str(json)?;
    // Checked up front so that a stray array or number gets a readable error
    let object = as_object(value, "referee message")?;
    let message: RefereeMessage = serde_json::from_value(Value::Object(camel_case_keys(object)))?;
    debug!("Parsed referee message #{} with {} game events", message.command_counter, message.game_events.len());
    Ok(message)
}

fn as_object(value: Value, what: &'static str) -> Result<Map<String, Value>, ProtocolError> {
    match value {
        Value::Object(object) => Ok(object),
        other => Err(ProtocolError::ExpectedObject { what, found: json_type_name(&other).to_string() }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameEventKind, Stage};

    #[test]
    fn parses_game_event() {
        let event = game_event_from_json(r#"{"emergencyStop": {"byTeam": "YELLOW"}}"#).unwrap();
        assert!(matches!(event.event, Some(GameEventKind::EmergencyStop(_))));
    }

    #[test]
    fn rejects_non_objects() {
        let err = game_event_from_json("[1, 2]").unwrap_err();
        assert_eq!(err.to_string(), "Expected a JSON object for game event but got an array");

        let err = referee_message_from_json("null").unwrap_err();
        assert_eq!(err.to_string(), "Expected a JSON object for referee message but got null");
    }

    #[test]
    fn rejects_bad_syntax() {
        assert!(matches!(game_event_from_json("{"), Err(ProtocolError::Json(_))));
    }

    #[test]
    fn parses_referee_message() {
        let message = referee_message_from_json(r#"{"stage": "POST_GAME", "command": "HALT", "commandCounter": 3}"#).unwrap();
        assert_eq!(message.known_stage(), Some(Stage::PostGame));
        assert_eq!(message.command_counter, 3);
    }

    #[test]
    fn parses_proto_field_names() {
        let message = referee_message_from_json(r#"{
            "stage": "NORMAL_FIRST_HALF",
            "command": "STOP",
            "command_counter": 4,
            "next_command": "FORCE_START",
            "yellow": {"score": 2, "yellow_card_times": [1000]},
            "game_events": [{"aimless_kick": {"by_team": "YELLOW"}}]
        }"#).unwrap();
        assert_eq!(message.command_counter, 4);
        assert_eq!(message.next_command, Some(3));
        assert_eq!(message.yellow.yellow_card_times, vec![1000]);
        assert!(matches!(&message.game_events[0].event, Some(GameEventKind::AimlessKick(kick)) if kick.by_team.is_some()));
    }
}
