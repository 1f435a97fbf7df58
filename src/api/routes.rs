//! Endpoint handlers.
//!
//! Bodies are read as raw bytes and decoded as JSON regardless of the
//! request's content type.

use std::collections::BTreeMap;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::ApiState;
use crate::date::parse_transaction_date;
use crate::ledger::{Deduction, PayerId, Points};
use crate::observability::ledger_span;

pub const POINTS_ADDED: &str = "Points Added Successfully!";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddPointsRequest {
    pub payer_name: String,
    pub points: i64,
    pub transaction_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeletePointsRequest {
    pub points_to_deduct: Points,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ack {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Health {
    pub status: String,
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    Ok(serde_json::from_slice(body)?)
}

pub async fn add_points(State(state): State<ApiState>, body: Bytes) -> Result<Json<Ack>, ApiError> {
    let request: AddPointsRequest = parse_body(&body)?;
    if request.payer_name.trim().is_empty() {
        return Err(ApiError::BadRequest {
            message: "payerName must not be empty".to_string(),
        });
    }
    let timestamp = parse_transaction_date(&request.transaction_date, state.config.default_year)?;

    ledger_span("record").in_scope(|| {
        state
            .ledger
            .record(&request.payer_name, request.points, timestamp)
    })?;

    Ok(Json(Ack {
        message: POINTS_ADDED.to_string(),
    }))
}

pub async fn delete_points(
    State(state): State<ApiState>,
    body: Bytes,
) -> Result<Json<Vec<Deduction>>, ApiError> {
    let request: DeletePointsRequest = parse_body(&body)?;
    let deductions =
        ledger_span("spend").in_scope(|| state.ledger.spend(request.points_to_deduct))?;
    Ok(Json(deductions))
}

pub async fn balance(State(state): State<ApiState>) -> Json<BTreeMap<PayerId, Points>> {
    Json(state.ledger.balances())
}

pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
    })
}
