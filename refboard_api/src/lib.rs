#[macro_use]
mod common;
mod error;
mod game_event_schema;
mod referee_schema;
mod json;

pub use common::*;
pub use error::ProtocolError;
pub use game_event_schema::*;
pub use referee_schema::{Command, RefereeMessage, Stage, TeamInfo};
pub use json::{game_event_from_json, referee_message_from_json};
