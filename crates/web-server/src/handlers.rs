use crate::dispatch::dispatch;
use crate::error::RpcError;
use crate::rpc::{RpcReply, RpcRequest, RpcResponse};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use database::Gateway;
use serde_json::Value;
use std::sync::Arc;

/// # GET /api/health
pub async fn health() -> &'static str {
    "OK"
}

/// # POST /BackendService, POST /rpc
/// Runs one JSON-RPC call, or a batch of them in order.
///
/// Notifications (calls without an `id`) are run but not answered. When
/// nothing is left to answer the reply is `204 No Content`.
pub async fn rpc(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => return Json(rejected(RpcError::Parse(e.to_string()))).into_response(),
    };

    let reply = match payload {
        Value::Array(calls) if calls.is_empty() => Some(rejected(RpcError::InvalidRequest(
            "empty batch".to_string(),
        ))),
        Value::Array(calls) => {
            let mut responses = Vec::with_capacity(calls.len());
            for call in calls {
                responses.extend(run_call(&state.gateway, call).await);
            }
            (!responses.is_empty()).then_some(RpcReply::Batch(responses))
        }
        call => run_call(&state.gateway, call).await.map(RpcReply::Single),
    };

    match reply {
        Some(reply) => Json(reply).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn run_call(gateway: &Gateway, call: Value) -> Option<RpcResponse> {
    let request: RpcRequest = match serde_json::from_value(call) {
        Ok(request) => request,
        Err(e) => {
            let error = RpcError::InvalidRequest(e.to_string());
            tracing::warn!(error = %error, "Rejected remote call.");
            return Some(RpcResponse::failure(Value::Null, &error));
        }
    };

    if let Some(version) = request.jsonrpc.as_deref().filter(|v| *v != "2.0") {
        let error = RpcError::InvalidRequest(format!("unsupported jsonrpc version {version:?}"));
        tracing::warn!(error = %error, "Rejected remote call.");
        return request.id.map(|id| RpcResponse::failure(id, &error));
    }

    tracing::debug!(method = %request.method, notification = request.id.is_none(), "Remote call.");
    let outcome = dispatch(gateway, &request.method, &request.params).await;
    if let Err(error) = &outcome {
        tracing::warn!(method = %request.method, error = %error, "Rejected remote call.");
    }

    let id = request.id?;
    Some(match outcome {
        Ok(result) => RpcResponse::success(id, result),
        Err(error) => RpcResponse::failure(id, &error),
    })
}

fn rejected(error: RpcError) -> RpcReply {
    tracing::warn!(error = %error, "Rejected remote call.");
    RpcReply::Single(RpcResponse::failure(Value::Null, &error))
}
