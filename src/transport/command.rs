use crate::foundation::error::{LuminaError, LuminaResult};
use serde::{Deserialize, Serialize};

/// Controller operation carried by a bridge command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommandKind {
    /// Push a state payload.
    #[default]
    #[serde(alias = "applyJson")]
    SetState,
    /// Read the current state.
    GetState,
    /// Read controller information.
    GetInfo,
    /// Push a configuration payload.
    #[serde(alias = "setConfig")]
    ApplyConfig,
}

/// HTTP method used against the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl CommandKind {
    /// Parse a wire action name. Unknown actions are treated as state updates.
    pub fn from_action(action: &str) -> Self {
        match action {
            "getState" => Self::GetState,
            "getInfo" => Self::GetInfo,
            "setConfig" | "applyConfig" => Self::ApplyConfig,
            _ => Self::SetState,
        }
    }

    /// Wire action name.
    pub fn action(self) -> &'static str {
        match self {
            Self::SetState => "setState",
            Self::GetState => "getState",
            Self::GetInfo => "getInfo",
            Self::ApplyConfig => "applyConfig",
        }
    }

    pub fn method(self) -> HttpMethod {
        match self {
            Self::GetState | Self::GetInfo => HttpMethod::Get,
            Self::SetState | Self::ApplyConfig => HttpMethod::Post,
        }
    }

    /// Controller path the command is sent to.
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::SetState | Self::GetState => "/json/state",
            Self::GetInfo => "/json/info",
            Self::ApplyConfig => "/json/cfg",
        }
    }

    /// Whether the command carries a request body.
    pub fn has_body(self) -> bool {
        self.method() == HttpMethod::Post
    }
}

/// One command for the bridge in front of a controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeCommand {
    #[serde(rename = "action", default)]
    pub kind: CommandKind,
    /// Controller address, without scheme.
    #[serde(default)]
    pub controller_ip: String,
    /// Request body; ignored by `GET` commands.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl BridgeCommand {
    pub fn new(
        kind: CommandKind,
        controller_ip: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            kind,
            controller_ip: controller_ip.into(),
            payload,
        }
    }

    /// State update carrying any serializable payload, typically a
    /// [`DevicePayload`](crate::encode::payload::DevicePayload).
    pub fn set_state<T: Serialize>(
        controller_ip: impl Into<String>,
        payload: &T,
    ) -> LuminaResult<Self> {
        Ok(Self::new(
            CommandKind::SetState,
            controller_ip,
            serde_json::to_value(payload)?,
        ))
    }

    /// Decode a message received on the command topic.
    ///
    /// A missing `action` means `setState` and an unknown one is treated the same way. The
    /// controller address is supplied by the bridge, not the message.
    pub fn from_message(controller_ip: impl Into<String>, message: &[u8]) -> LuminaResult<Self> {
        let doc: serde_json::Value = serde_json::from_slice(message)
            .map_err(|e| LuminaError::serde(format!("decode bridge command: {e}")))?;
        let kind = doc
            .get("action")
            .and_then(serde_json::Value::as_str)
            .map_or(CommandKind::SetState, CommandKind::from_action);
        let payload = doc
            .get("payload")
            .cloned()
            .unwrap_or(serde_json::Value::Null);
        Ok(Self::new(kind, controller_ip, payload))
    }

    /// Full controller URL.
    pub fn url(&self) -> String {
        format!("http://{}{}", self.controller_ip, self.kind.endpoint())
    }

    /// Serialized request body, `None` for `GET` commands.
    pub fn body(&self) -> Option<String> {
        self.kind.has_body().then(|| self.payload.to_string())
    }

    /// Message published on the status topic after a failed delivery.
    pub fn error_status(&self, error: &str) -> serde_json::Value {
        serde_json::json!({ "error": error, "action": self.kind.action() })
    }
}

/// Topic a bridge subscribes to for commands.
pub fn command_topic(device_id: &str) -> String {
    format!("lumina/{device_id}/command")
}

/// Topic a bridge publishes controller responses and errors on.
pub fn status_topic(device_id: &str) -> String {
    format!("lumina/{device_id}/status")
}

#[cfg(test)]
#[path = "../../tests/unit/transport/command.rs"]
mod tests;
