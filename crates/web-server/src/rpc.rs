//! JSON-RPC 2.0 envelope and argument decoding.

use crate::error::RpcError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    /// `None` when the member is absent: a notification, which is run but
    /// never answered. An explicit `null` id is still answered.
    #[serde(default, deserialize_with = "present")]
    pub id: Option<Value>,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
}

impl RpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, error: &RpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(ErrorObject {
                code: error.code(),
                message: error.to_string(),
            }),
        }
    }
}

/// A single request or a batch, answered in kind.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RpcReply {
    Single(RpcResponse),
    Batch(Vec<RpcResponse>),
}

/// Call arguments, given either positionally (an array in declaration order)
/// or by name (an object keyed by the wire field names).
pub struct Params<'a> {
    raw: &'a Value,
}

impl<'a> Params<'a> {
    pub fn new(raw: &'a Value) -> Self {
        Self { raw }
    }

    /// The record id, first positional argument or the `id` key.
    pub fn id(&self) -> Result<&'a str, RpcError> {
        let value = match self.raw {
            Value::Array(args) => args.first(),
            Value::Object(args) => args.get("id"),
            _ => None,
        };
        match value {
            Some(Value::String(id)) => Ok(id.as_str()),
            Some(other) => Err(RpcError::InvalidParams(format!(
                "id must be a string, got {other}"
            ))),
            None => Err(RpcError::InvalidParams("missing id argument".to_string())),
        }
    }

    /// Decodes the record fields. `names` lists the positional order, which
    /// starts at `skip` (1 when the id comes first).
    pub fn fields<F: DeserializeOwned>(&self, names: &[&str], skip: usize) -> Result<F, RpcError> {
        let object = match self.raw {
            Value::Null => Map::new(),
            Value::Object(args) => args.clone(),
            Value::Array(args) => {
                let args = args.get(skip..).unwrap_or_default();
                if args.len() > names.len() {
                    return Err(RpcError::InvalidParams(format!(
                        "expected at most {} arguments, got {}",
                        names.len() + skip,
                        args.len() + skip
                    )));
                }
                names
                    .iter()
                    .zip(args)
                    .map(|(name, value)| (name.to_string(), value.clone()))
                    .collect()
            }
            other => {
                return Err(RpcError::InvalidParams(format!(
                    "params must be an array or an object, got {other}"
                )));
            }
        };
        serde_json::from_value(Value::Object(object))
            .map_err(|e| RpcError::InvalidParams(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::ProfessorFields;
    use serde_json::json;

    const NAMES: &[&str] = &["firstName", "lastName", "email"];

    #[test]
    fn positional_and_named_params_decode_the_same() {
        let positional = json!(["Ion", "Popa", "ion@x.com"]);
        let named = json!({"firstName": "Ion", "lastName": "Popa", "email": "ion@x.com"});

        let a: ProfessorFields = Params::new(&positional).fields(NAMES, 0).unwrap();
        let b: ProfessorFields = Params::new(&named).fields(NAMES, 0).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.email.as_deref(), Some("ion@x.com"));
    }

    #[test]
    fn id_comes_first_for_updates() {
        let raw = json!(["abc", "Ion"]);
        let params = Params::new(&raw);
        assert_eq!(params.id().unwrap(), "abc");

        let fields: ProfessorFields = params.fields(NAMES, 1).unwrap();
        assert_eq!(fields.first_name.as_deref(), Some("Ion"));
        assert_eq!(fields.last_name, None);
    }

    #[test]
    fn too_many_arguments_are_rejected() {
        let raw = json!(["a", "b", "c", "d"]);
        let result: Result<ProfessorFields, _> = Params::new(&raw).fields(NAMES, 0);
        assert!(matches!(result, Err(RpcError::InvalidParams(_))));
    }

    #[test]
    fn absent_and_null_ids_are_told_apart() {
        let notification: RpcRequest =
            serde_json::from_value(json!({"jsonrpc": "2.0", "method": "getStudents"})).unwrap();
        assert_eq!(notification.id, None);

        let call: RpcRequest =
            serde_json::from_value(json!({"jsonrpc": "2.0", "method": "getStudents", "id": null}))
                .unwrap();
        assert_eq!(call.id, Some(Value::Null));
    }

    #[test]
    fn missing_id_is_rejected() {
        assert!(Params::new(&json!([])).id().is_err());
        assert!(Params::new(&json!([42])).id().is_err());
        assert!(Params::new(&Value::Null).id().is_err());
    }
}
