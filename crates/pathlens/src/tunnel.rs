//
// tunnel.rs
//
// Request/response tunnel over the "list code actions at a cursor" hook.
//
// A request `{method, args}` is JSON-encoded and appended to a reserved
// marker string; the combined string is submitted as the action-kind
// filter. The responder recognizes the marker, dispatches to the named
// service operation, and answers with exactly one synthetic action whose
// title is the JSON `{result, error}` envelope. Anything without the
// marker, or naming an unknown method, falls through to the hook's native
// behavior.
//

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tower_lsp::lsp_types::{CodeAction, CodeActionKind, CodeActionOrCommand, Url};

use crate::document_store::DocumentStore;
use crate::service;

/// Reserved marker distinguishing tunneled requests from ordinary
/// action-kind filters.
pub const MAGIC_KIND_PREFIX: &str = "refactor.customService::";

/// Wire request: a method name plus its arguments. The responder merges
/// the current file and cursor position into the arguments itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestMessage {
    pub method: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

/// Wire response envelope. A missing `result` is the "no match" sentinel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

/// Transport failures on the caller's leg of the tunnel. Structural
/// mismatches are not errors; they come back as an absent `result`.
#[derive(Debug, Error)]
pub enum TunnelError {
    #[error("action provider returned no actions")]
    EmptyResponse,
    #[error("malformed response envelope: {0}")]
    MalformedEnvelope(#[from] serde_json::Error),
    #[error("remote error: {0}")]
    Remote(Value),
}

/// Encode a request into an action-kind filter string.
pub fn encode_request(method: &str, args: Map<String, Value>) -> String {
    let request = RequestMessage {
        method: method.to_string(),
        args,
    };
    // A struct of string and object cannot fail to serialize.
    let encoded = serde_json::to_string(&request).unwrap_or_default();
    format!("{MAGIC_KIND_PREFIX}{encoded}")
}

/// In-process responder: recognize a tunneled request in `kind` and answer
/// it against the current documents.
///
/// Returns `None` for anything that should fall through to the hook's
/// native behavior: a missing marker, an unparseable request, or an
/// unknown method.
pub fn respond(
    store: &DocumentStore,
    uri: &Url,
    position: usize,
    kind: &str,
) -> Option<ResponseMessage> {
    let payload = kind.strip_prefix(MAGIC_KIND_PREFIX)?;
    let request: RequestMessage = match serde_json::from_str(payload) {
        Ok(request) => request,
        Err(e) => {
            log::warn!("Ignoring unparseable tunneled request: {}", e);
            return None;
        }
    };

    log::trace!(
        "Tunneled request: method={}, uri={}, position={}",
        request.method,
        uri,
        position
    );

    let result = match request.method.as_str() {
        "findRelativeFileNodeAt" => {
            serialize(service::find_relative_file_node_at(store, uri, position))
        }
        "findFilePathObjAt" => serialize(service::find_file_path_obj_at(store, uri, position)),
        "findFileNameFileContentObjAt" => {
            serialize(service::find_file_name_file_content_obj_at(store, uri, position))
        }
        _ => return None,
    };

    Some(match result {
        Ok(result) => ResponseMessage {
            result,
            error: None,
        },
        Err(e) => ResponseMessage {
            result: None,
            error: Some(Value::String(e.to_string())),
        },
    })
}

/// The responder's answer shaped for the hook: one synthetic action whose
/// title carries the response envelope.
pub fn respond_with_actions(
    store: &DocumentStore,
    uri: &Url,
    position: usize,
    kind: &str,
) -> Option<Vec<CodeActionOrCommand>> {
    let response = respond(store, uri, position, kind)?;
    let title = serde_json::to_string(&response).unwrap_or_default();
    Some(vec![CodeActionOrCommand::CodeAction(CodeAction {
        title,
        kind: Some(CodeActionKind::from(kind.to_string())),
        ..CodeAction::default()
    })])
}

fn serialize<T: Serialize>(value: Option<T>) -> Result<Option<Value>, serde_json::Error> {
    value.map(|v| serde_json::to_value(v)).transpose()
}

/// The foreign extensibility hook, as the caller's leg sees it: "list the
/// contextual actions available at this cursor, filtered by kind."
#[async_trait]
pub trait ActionProvider {
    async fn applicable_actions(
        &self,
        uri: &Url,
        position: usize,
        kind: &str,
    ) -> Vec<CodeActionOrCommand>;
}

/// Caller's leg of the tunnel: mirrors the request encoding, invokes the
/// hook, and decodes the first returned action's title.
pub struct TunnelClient<P> {
    provider: P,
}

impl<P: ActionProvider + Sync> TunnelClient<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Issue one tunneled call. `Ok(None)` is the "no match" sentinel; a
    /// missing or undecodable response is a hard transport failure.
    pub async fn call(
        &self,
        uri: &Url,
        position: usize,
        method: &str,
        args: Map<String, Value>,
    ) -> Result<Option<Value>, TunnelError> {
        let kind = encode_request(method, args);
        let actions = self.provider.applicable_actions(uri, position, &kind).await;
        let first = actions.first().ok_or(TunnelError::EmptyResponse)?;
        let title = match first {
            CodeActionOrCommand::CodeAction(action) => &action.title,
            CodeActionOrCommand::Command(command) => &command.title,
        };
        let response: ResponseMessage = serde_json::from_str(title)?;
        if let Some(error) = response.error {
            return Err(TunnelError::Remote(error));
        }
        Ok(response.result)
    }
}
