//! Linearization handler.

use axum::Json;
use penfix_core::{decode, encode_actions, AmrGraph};

use crate::error::ApiError;
use crate::schema::actions::{ActionsRequest, ActionsResponse};

/// Decodes `text` and returns its SHIFT / ARC / REDUCE sequence.
///
/// `POST /actions`. Undecodable text yields 422 with the decode error as
/// details.
pub async fn actions(Json(req): Json<ActionsRequest>) -> Result<Json<ActionsResponse>, ApiError> {
    let text = if req.repair {
        penfix_repair::sanitize(&req.text)
    } else {
        req.text
    };

    let decoded = decode(&text)?;
    let graph = AmrGraph::from_tree(&decoded.tree);
    let actions = encode_actions(&graph);
    let rendered = actions.iter().map(|a| a.to_string()).collect();

    Ok(Json(ActionsResponse {
        actions,
        rendered,
        warnings: decoded.warnings,
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
    }))
}
