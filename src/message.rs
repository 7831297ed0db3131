use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BridgeError;

/// Requests accepted by the bridge, tagged by the `type` field on the wire.
/// Unknown tags fail deserialization and are answered with a failure
/// envelope rather than falling through to any default handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BridgeRequest {
    FetchModels,
    OllamaRequest {
        endpoint: String,
        #[serde(default)]
        options: RequestOptions,
    },
    SendToOllama {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prompt: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
    },
    GetDomains,
    AddDomain {
        #[serde(default)]
        domain: String,
    },
    AddCurrentDomain {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    AllowAllDomains,
    RemoveDomain {
        #[serde(default)]
        domain: String,
    },
}

impl BridgeRequest {
    /// Wire name of the request, as carried in the `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeRequest::FetchModels => "fetchModels",
            BridgeRequest::OllamaRequest { .. } => "ollamaRequest",
            BridgeRequest::SendToOllama { .. } => "sendToOllama",
            BridgeRequest::GetDomains => "getDomains",
            BridgeRequest::AddDomain { .. } => "addDomain",
            BridgeRequest::AddCurrentDomain { .. } => "addCurrentDomain",
            BridgeRequest::AllowAllDomains => "allowAllDomains",
            BridgeRequest::RemoveDomain { .. } => "removeDomain",
        }
    }
}

/// Fetch-style options carried by a raw `ollamaRequest`. Method defaults to
/// GET when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self {
            method: Some("GET".to_string()),
            ..Self::default()
        }
    }
}

/// Outcome envelope: `{"success":true,"data":…}` or
/// `{"success":false,"error":…}`. Mutations reply with a bare
/// `{"success":true}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReplyEnvelope {
    pub fn data(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    pub fn error(error: &BridgeError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
        }
    }
}

/// Reply to `getDomains`. Carries no success flag on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainList {
    pub domains: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn requests_parse_by_their_type_tag() {
        let req: BridgeRequest =
            serde_json::from_value(json!({"type": "sendToOllama", "prompt": "hi"})).unwrap();
        match req {
            BridgeRequest::SendToOllama { prompt, model } => {
                assert_eq!(prompt.as_deref(), Some("hi"));
                assert!(model.is_none());
            }
            other => panic!("unexpected request: {:?}", other),
        }

        let req: BridgeRequest = serde_json::from_value(json!({"type": "fetchModels"})).unwrap();
        assert_eq!(req.kind(), "fetchModels");
    }

    #[test]
    fn unknown_or_missing_tags_are_errors() {
        assert!(serde_json::from_value::<BridgeRequest>(json!({"type": "explode"})).is_err());
        assert!(serde_json::from_value::<BridgeRequest>(json!({"prompt": "hi"})).is_err());
    }

    #[test]
    fn add_domain_tolerates_a_missing_field() {
        let req: BridgeRequest = serde_json::from_value(json!({"type": "addDomain"})).unwrap();
        match req {
            BridgeRequest::AddDomain { domain } => assert_eq!(domain, ""),
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn serialized_requests_carry_the_tag() {
        let raw = serde_json::to_value(BridgeRequest::FetchModels).unwrap();
        assert_eq!(raw, json!({"type": "fetchModels"}));

        let raw = serde_json::to_value(BridgeRequest::SendToOllama {
            prompt: Some("hi".to_string()),
            model: None,
        })
        .unwrap();
        assert_eq!(raw, json!({"type": "sendToOllama", "prompt": "hi"}));
    }

    #[test]
    fn empty_envelope_serializes_to_bare_success() {
        let raw = serde_json::to_string(&ReplyEnvelope::empty()).unwrap();
        assert_eq!(raw, r#"{"success":true}"#);
    }

    #[test]
    fn error_envelope_carries_display_text() {
        let raw = serde_json::to_value(ReplyEnvelope::error(&BridgeError::Unauthorized)).unwrap();
        assert_eq!(raw, json!({"success": false, "error": "Unauthorized domain"}));
    }
}
