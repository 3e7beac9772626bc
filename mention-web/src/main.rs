//! Servidor web Axum com WebSocket para anotação de menções em tempo real

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use mention_core::{
    config::DEFAULT_ANNOTATOR_NAME, demo::demo_documents, AnnotationEvent, Document,
    EntityMentionsAnnotator, Mention, MentionError, Properties,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Estado compartilhado da aplicação
struct AppState {
    /// Anotador padrão, configurado pelas variáveis `MENTIONS_*`
    annotator: EntityMentionsAnnotator,
}

impl AppState {
    /// Usa o anotador padrão, ou um novo se a requisição trouxer propriedades
    fn annotator_for(&self, properties: Option<&Properties>) -> EntityMentionsAnnotator {
        match properties {
            Some(props) if !props.is_empty() => {
                EntityMentionsAnnotator::from_properties(DEFAULT_ANNOTATOR_NAME, props)
            }
            _ => self.annotator.clone(),
        }
    }
}

#[derive(Deserialize)]
struct AnnotateRequest {
    #[serde(default)]
    document: serde_json::Value,
    #[serde(default)]
    properties: Option<Properties>,
}

#[derive(Deserialize)]
struct BatchRequest {
    documents: Vec<Document>,
    #[serde(default)]
    properties: Option<Properties>,
}

#[derive(Serialize)]
struct AnnotateResponse {
    mentions: Vec<Mention>,
    document: Document,
    processing_ms: u64,
    total_tokens: usize,
}

#[derive(Serialize)]
struct BatchResponse {
    documents: Vec<Document>,
    processing_ms: u64,
}

/// Erro da API → HTTP 400 com `{"error": ...}`
struct ApiError(MentionError);

impl From<MentionError> for ApiError {
    fn from(err: MentionError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": self.0.to_string()})),
        )
            .into_response()
    }
}

/// Lê `MENTIONS_ACRONYMS` e `MENTIONS_LANGUAGE` como propriedades do anotador
fn properties_from_env() -> Properties {
    let mut props = Properties::new();
    for (var, option) in [("MENTIONS_ACRONYMS", "acronyms"), ("MENTIONS_LANGUAGE", "language")] {
        if let Ok(value) = std::env::var(var) {
            props.insert(format!("{DEFAULT_ANNOTATOR_NAME}.{option}"), value);
        }
    }
    props
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let annotator = EntityMentionsAnnotator::from_properties(DEFAULT_ANNOTATOR_NAME, &properties_from_env());
    info!(config = ?annotator.config(), "anotador configurado");
    let state = Arc::new(AppState { annotator });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/annotate", post(annotate_handler))
        .route("/annotate/batch", post(batch_handler))
        .route("/ws", get(ws_handler))
        .route("/demo-documents", get(demo_documents_handler))
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state);

    let addr = std::env::var("MENTIONS_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(%addr, error = %err, "não foi possível abrir a porta");
            std::process::exit(1);
        }
    };
    info!("🚀 Servidor de menções iniciado em http://{addr}");
    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!(error = %err, "servidor encerrado com erro");
    }
}

/// Anotação via HTTP POST (sem streaming)
async fn annotate_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnnotateRequest>,
) -> Result<Json<AnnotateResponse>, ApiError> {
    let start = Instant::now();
    let annotator = state.annotator_for(req.properties.as_ref());
    let document = annotator.annotate_json(req.document)?;

    Ok(Json(AnnotateResponse {
        mentions: document.mentions.clone(),
        total_tokens: document.token_count(),
        document,
        processing_ms: start.elapsed().as_millis() as u64,
    }))
}

/// Anota vários documentos de uma vez (em paralelo, fora do runtime async)
async fn batch_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchRequest>,
) -> impl IntoResponse {
    let start = Instant::now();
    let annotator = state.annotator_for(req.properties.as_ref());
    let mut documents = req.documents;

    let result = tokio::task::spawn_blocking(move || {
        annotator.annotate_batch(&mut documents);
        documents
    })
    .await;

    match result {
        Ok(documents) => Json(BatchResponse {
            documents,
            processing_ms: start.elapsed().as_millis() as u64,
        })
        .into_response(),
        Err(err) => {
            warn!(error = %err, "falha no lote");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "falha ao anotar o lote"})),
            )
                .into_response()
        }
    }
}

/// Retorna os documentos de demonstração (ainda não anotados)
async fn demo_documents_handler() -> impl IntoResponse {
    let docs: Vec<serde_json::Value> = demo_documents()
        .into_iter()
        .map(|(name, document)| {
            serde_json::json!({
                "name": name,
                "document": document
            })
        })
        .collect();
    Json(docs)
}

/// Upgrade HTTP → WebSocket
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Lógica do WebSocket: recebe um pedido de anotação e envia os eventos de cada passo
async fn handle_websocket(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket conectado");

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                let req = match serde_json::from_str::<AnnotateRequest>(&text) {
                    Ok(req) => req,
                    Err(err) => {
                        let body = serde_json::json!({"type": "Error", "data": {"message": err.to_string()}});
                        if socket.send(Message::Text(body.to_string().into())).await.is_err() {
                            return;
                        }
                        continue;
                    }
                };

                let annotator = state.annotator_for(req.properties.as_ref());
                let document = if req.document.is_null() {
                    Err(MentionError::MissingDocument)
                } else {
                    serde_json::from_value::<Document>(req.document).map_err(MentionError::from)
                };
                let mut document = match document {
                    Ok(document) => document,
                    Err(err) => {
                        let body = serde_json::json!({"type": "Error", "data": {"message": err.to_string()}});
                        if socket.send(Message::Text(body.to_string().into())).await.is_err() {
                            return;
                        }
                        continue;
                    }
                };

                info!(sentences = document.sentences.len(), "anotando via WebSocket");

                // A anotação é síncrona: roda em thread separada
                let (tx, rx) = std::sync::mpsc::channel::<AnnotationEvent>();
                let handle = tokio::task::spawn_blocking(move || {
                    annotator.annotate_streaming(&mut document, tx);
                });
                handle.await.ok();

                // A thread já terminou: todos os eventos estão na fila
                let events: Vec<AnnotationEvent> = rx.try_iter().collect();

                for event in &events {
                    if let Ok(json) = serde_json::to_string(event) {
                        if socket.send(Message::Text(json.into())).await.is_err() {
                            return; // cliente desconectou
                        }
                    }
                }
            }
            Message::Close(_) => {
                info!("WebSocket desconectado");
                return;
            }
            Message::Ping(payload) => {
                let _ = socket.send(Message::Pong(payload)).await;
            }
            _ => {}
        }
    }
}
