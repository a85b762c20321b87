use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown {type_name} \"{name}\"")]
    UnknownEnumName {
        type_name: &'static str,
        name: String,
    },

    #[error("Expected a 64-bit integer but got \"{0}\"")]
    MalformedInteger(String),

    #[error("Expected a JSON object for {what} but got {found}")]
    ExpectedObject {
        what: &'static str,
        found: String,
    },

    #[error("Game event has more than one payload ({first} and {second})")]
    MultiplePayloads {
        first: String,
        second: String,
    },

    #[error("Malformed {case} payload: {err}")]
    MalformedPayload {
        case: String,
        #[source]
        err: serde_json::Error,
    },
}
