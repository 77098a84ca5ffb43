//! Session-based tool facade: an SSE event channel per session plus a
//! JSON-RPC style message endpoint. Responses to `tools/list` and
//! `tools/call` are emitted as `message` events on the caller's channel.

use std::collections::HashMap;
use std::convert::Infallible;
use std::pin::Pin;
use std::sync::{Arc, RwLock};
use std::task::{Context, Poll};
use std::time::Duration;

use axum::{
    extract::{Extension, Query},
    http::{HeaderMap, StatusCode},
    response::sse::{Event as SseEvent, KeepAlive, Sse},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::Stream;
use uuid::Uuid;

use orderflow_core::id::{InvoiceId, OrderId, ProductId};
use orderflow_core::DomainError;
use orderflow_inventory::MovementKind;
use orderflow_invoicing::InvoiceStatus;
use orderflow_products::Product;
use orderflow_store::EntityStore;

use crate::app::{errors, AppState};

const CHANNEL_CAPACITY: usize = 64;
const KEEP_ALIVE_SECS: u64 = 30;

pub fn router() -> Router {
    Router::new()
        .route("/sse", get(open_session))
        .route("/messages", post(handle_message))
}

/// Live session channels, keyed by session id.
#[derive(Default)]
pub struct McpSessions {
    channels: RwLock<HashMap<String, mpsc::Sender<SseEvent>>>,
}

impl McpSessions {
    fn register(&self, session_id: String, tx: mpsc::Sender<SseEvent>) {
        self.channels
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(session_id, tx);
    }

    /// Unregister a session, but only while it still points at `tx`.
    /// Reopening a session id displaces the old channel, and the displaced
    /// stream's teardown must not take the new registration with it.
    fn remove(&self, session_id: &str, tx: &mpsc::Sender<SseEvent>) {
        let mut channels = self.channels.write().unwrap_or_else(|e| e.into_inner());
        if channels
            .get(session_id)
            .is_some_and(|current| current.same_channel(tx))
        {
            channels.remove(session_id);
        }
    }

    fn sender(&self, session_id: &str) -> Option<mpsc::Sender<SseEvent>> {
        self.channels
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(session_id)
            .cloned()
    }

    /// Push an event onto a session channel. A closed channel tears the
    /// session down and reports failure.
    fn send(&self, session_id: &str, event: SseEvent) -> bool {
        let Some(tx) = self.sender(session_id) else {
            return false;
        };
        if tx.try_send(event).is_err() {
            self.remove(session_id, &tx);
            return false;
        }
        true
    }
}

/// Per-session event stream; dropping it (client disconnect) unregisters
/// the session.
pub struct SessionStream {
    session_id: String,
    tx: mpsc::Sender<SseEvent>,
    state: Arc<AppState>,
    inner: ReceiverStream<SseEvent>,
}

impl Stream for SessionStream {
    type Item = Result<SseEvent, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx).map(|e| e.map(Ok))
    }
}

impl Drop for SessionStream {
    fn drop(&mut self) {
        self.state.mcp.remove(&self.session_id, &self.tx);
        tracing::debug!(session_id = %self.session_id, "tool session closed");
    }
}

#[derive(Debug, Deserialize)]
pub struct SseQuery {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

pub async fn open_session(
    Extension(state): Extension<Arc<AppState>>,
    Query(q): Query<SseQuery>,
) -> Sse<SessionStream> {
    let session_id = q.session_id.unwrap_or_else(|| Uuid::now_v7().to_string());

    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let _ = tx.try_send(
        SseEvent::default()
            .event("endpoint")
            .data(format!("/mcp/messages?session={session_id}")),
    );
    state.mcp.register(session_id.clone(), tx.clone());
    tracing::debug!(session_id = %session_id, "tool session opened");

    let stream = SessionStream {
        session_id,
        tx,
        state,
        inner: ReceiverStream::new(rx),
    };
    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(KEEP_ALIVE_SECS)))
}

#[derive(Debug, Deserialize)]
pub struct McpRequest {
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    session: Option<String>,
}

pub async fn handle_message(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Query(q): Query<MessagesQuery>,
    Json(request): Json<McpRequest>,
) -> Response {
    let session_id = headers
        .get("x-mcp-session")
        .and_then(|v| v.to_str().ok())
        .map(String::from)
        .or(q.session);
    let Some(session_id) = session_id else {
        return errors::bad_request("session id required");
    };
    if state.mcp.sender(&session_id).is_none() {
        return errors::bad_request("session not found");
    }

    let response = process_request(&state, request);
    if !state.mcp.send(
        &session_id,
        SseEvent::default().event("message").data(response.to_string()),
    ) {
        return errors::error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            vec!["session channel closed".to_string()],
        );
    }

    (
        StatusCode::OK,
        Json(json!({ "status": "message sent to stream" })),
    )
        .into_response()
}

fn process_request(state: &AppState, request: McpRequest) -> Value {
    match request.method.as_str() {
        "tools/list" => rpc_result(request.id, json!({ "tools": tool_definitions() })),
        "tools/call" => handle_tools_call(state, request.id, request.params),
        other => rpc_error(request.id, -32601, format!("method not found: {other}")),
    }
}

fn rpc_result(id: Option<Value>, result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

fn rpc_error(id: Option<Value>, code: i64, message: String) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "error": { "code": code, "message": message } })
}

fn tool_definitions() -> Value {
    json!([
        {
            "name": "products.search",
            "description": "Search products by name, SKU, or category",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Filter by product name (contains)" },
                    "sku": { "type": "string", "description": "Filter by SKU" },
                    "category": { "type": "string", "description": "Filter by category" },
                    "limit": { "type": "integer", "description": "Maximum results", "default": 10 }
                }
            }
        },
        {
            "name": "orders.getById",
            "description": "Get order by ID",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "id": { "type": "string", "description": "Order ID" }
                },
                "required": ["id"]
            }
        },
        {
            "name": "inventory.adjust",
            "description": "Adjust product stock through the ledger",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "product_id": { "type": "string", "description": "Product ID" },
                    "kind": { "type": "string", "enum": ["IN", "OUT", "CORRECTION"], "description": "Movement kind" },
                    "quantity": { "type": "integer", "minimum": 1 },
                    "date": { "type": "string", "format": "date", "description": "Movement date (defaults to today)" },
                    "remark": { "type": "string" }
                },
                "required": ["product_id", "kind", "quantity"]
            }
        },
        {
            "name": "invoices.setStatus",
            "description": "Set invoice status",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "id": { "type": "string", "description": "Invoice ID" },
                    "status": { "type": "string", "enum": ["PAID", "LATE"] }
                },
                "required": ["id", "status"]
            }
        }
    ])
}

#[derive(Debug, Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Deserialize)]
struct ProductsSearchArgs {
    name: Option<String>,
    sku: Option<String>,
    category: Option<String>,
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct OrdersGetByIdArgs {
    id: OrderId,
}

#[derive(Debug, Deserialize)]
struct InventoryAdjustArgs {
    product_id: ProductId,
    kind: MovementKind,
    quantity: i64,
    date: Option<NaiveDate>,
    remark: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InvoicesSetStatusArgs {
    id: InvoiceId,
    status: InvoiceStatus,
}

fn handle_tools_call(state: &AppState, id: Option<Value>, params: Option<Value>) -> Value {
    let params: ToolCallParams = match serde_json::from_value(params.unwrap_or(Value::Null)) {
        Ok(p) => p,
        Err(e) => return rpc_error(id, -32603, format!("invalid tool call params: {e}")),
    };

    let result = match params.name.as_str() {
        "products.search" => products_search(state, params.arguments),
        "orders.getById" => orders_get_by_id(state, params.arguments),
        "inventory.adjust" => inventory_adjust(state, params.arguments),
        "invoices.setStatus" => invoices_set_status(state, params.arguments),
        other => Err(format!("unknown tool: {other}")),
    };

    match result {
        Ok(content) => rpc_result(id, json!({ "content": content })),
        Err(message) => rpc_error(id, -32603, format!("tool execution error: {message}")),
    }
}

fn products_search(state: &AppState, arguments: Value) -> Result<Value, String> {
    let args: ProductsSearchArgs =
        serde_json::from_value(arguments).map_err(|e| e.to_string())?;

    let mut items: Vec<Product> = state
        .products
        .list_all()
        .into_iter()
        .filter(|p| {
            args.name
                .as_ref()
                .is_none_or(|n| p.name.to_lowercase().contains(&n.to_lowercase()))
                && args.sku.as_ref().is_none_or(|s| &p.sku == s)
                && args.category.as_ref().is_none_or(|c| &p.category == c)
        })
        .collect();
    items.sort_by_key(|p| p.id);
    items.truncate(args.limit.unwrap_or(10));

    serde_json::to_value(items).map_err(|e| e.to_string())
}

fn orders_get_by_id(state: &AppState, arguments: Value) -> Result<Value, String> {
    let args: OrdersGetByIdArgs = serde_json::from_value(arguments).map_err(|e| e.to_string())?;
    let order = state
        .orders
        .get(args.id)
        .ok_or_else(|| DomainError::not_found("order", args.id).to_string())?;
    serde_json::to_value(order).map_err(|e| e.to_string())
}

fn inventory_adjust(state: &AppState, arguments: Value) -> Result<Value, String> {
    let args: InventoryAdjustArgs = serde_json::from_value(arguments).map_err(|e| e.to_string())?;
    let movement = state
        .ledger
        .apply_movement(
            args.product_id,
            args.kind,
            args.quantity,
            args.date.unwrap_or_else(|| Utc::now().date_naive()),
            args.remark,
        )
        .map_err(|e| e.to_string())?;
    serde_json::to_value(movement).map_err(|e| e.to_string())
}

fn invoices_set_status(state: &AppState, arguments: Value) -> Result<Value, String> {
    let args: InvoicesSetStatusArgs =
        serde_json::from_value(arguments).map_err(|e| e.to_string())?;
    let invoice = state
        .invoice_engine
        .update_status(args.id, args.status)
        .map_err(|e| e.to_string())?;
    serde_json::to_value(invoice).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reopened_session_id_survives_the_old_streams_teardown() {
        let sessions = McpSessions::default();
        let (tx1, _rx1) = mpsc::channel(4);
        let (tx2, _rx2) = mpsc::channel(4);
        sessions.register("s".to_string(), tx1.clone());
        sessions.register("s".to_string(), tx2.clone());

        // Teardown of the displaced channel leaves the new one registered.
        sessions.remove("s", &tx1);
        assert!(sessions.sender("s").is_some_and(|tx| tx.same_channel(&tx2)));

        sessions.remove("s", &tx2);
        assert!(sessions.sender("s").is_none());
    }
}
