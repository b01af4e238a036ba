//
// backend.rs
//
// tower-lsp server wiring. The only query surface is the code-action hook:
// tunneled requests arrive as a magic action-kind filter and are answered
// by the in-process responder; everything else gets the hook's native
// behavior (no actions).
//

use std::sync::Arc;

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::Client;
use tower_lsp::LanguageServer;
use tower_lsp::LspService;
use tower_lsp::Server;

use crate::state::{scan_workspace, WorldState};
use crate::tunnel;
use crate::utf16::position_to_byte_offset;

pub struct Backend {
    client: Client,
    state: Arc<WorldState>,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            state: Arc::new(WorldState::new()),
        }
    }

    fn record_workspace_folders(&self, params: &InitializeParams) {
        let mut folders = match self.state.workspace_folders.write() {
            Ok(folders) => folders,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(workspace_folders) = &params.workspace_folders {
            for folder in workspace_folders {
                log::info!("Adding workspace folder: {}", folder.uri);
                folders.push(folder.uri.clone());
            }
        } else if let Some(root_uri) = &params.root_uri {
            log::info!("Adding root URI as workspace folder: {}", root_uri);
            folders.push(root_uri.clone());
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        log::info!("Initializing pathlens");

        self.record_workspace_folders(&params);

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                code_action_provider: Some(CodeActionProviderCapability::Simple(true)),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: String::from("pathlens"),
                version: Some(String::from(env!("CARGO_PKG_VERSION"))),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "pathlens initialized")
            .await;
        let state = self.state.clone();
        // Workspace scanning reads files from disk; keep it off the
        // request path.
        tokio::task::spawn_blocking(move || scan_workspace(&state));
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        log::trace!("did_open: {}", doc.uri);
        self.state
            .documents
            .open(doc.uri, doc.text, Some(doc.version));
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        // Full-text sync: the last change carries the whole document.
        if let Some(change) = params.content_changes.into_iter().last() {
            self.state.documents.replace_text(
                &params.text_document.uri,
                change.text,
                Some(params.text_document.version),
            );
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        log::trace!("did_close: {}", params.text_document.uri);
        self.state.documents.close(&params.text_document.uri);
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        let uri = params.text_document.uri;

        if let Some(kinds) = params.context.only {
            for kind in &kinds {
                if !kind.as_str().starts_with(tunnel::MAGIC_KIND_PREFIX) {
                    continue;
                }
                let Some(snapshot) = self.state.documents.snapshot(&uri) else {
                    break;
                };
                let position = position_to_byte_offset(&snapshot.text, params.range.start);
                if let Some(actions) =
                    tunnel::respond_with_actions(&self.state.documents, &uri, position, kind.as_str())
                {
                    return Ok(Some(actions));
                }
            }
        }

        // Native behavior: no contextual actions of our own.
        Ok(None)
    }
}

pub async fn start_lsp() -> anyhow::Result<()> {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::build(Backend::new).finish();
    Server::new(stdin, stdout, socket).serve(service).await;

    Ok(())
}
