use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures the client layer can run into. None of them is shown to the user;
/// they are logged at the event boundary and the interaction is dropped.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Network(#[from] gloo_net::Error),

    #[error("server answered with status {0}")]
    Status(u16),

    #[error("no element matches `{0}`")]
    MissingElement(String),

    #[error("trigger has no `{0}` attribute")]
    MissingAttribute(&'static str),

    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for ClientError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .or_else(|| {
                js_sys::Reflect::get(&value, &"message".into())
                    .ok()
                    .and_then(|m| m.as_string())
            })
            .unwrap_or_else(|| format!("{:?}", value));
        ClientError::Js(message)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
