/*
 * Responsibility
 * - POST /cert/getinfo (認証必須)
 * - body の検証 (JSON として読めない → 400)
 * - 認証されていない場合は middleware で 401 になり、ここには来ない
 */
use axum::{
    Json,
    extract::rejection::JsonRejection,
};

use crate::api::v1::dto::cert::{CertInfoRequest, CertInfoResponse};
use crate::api::v1::extractors::Authenticated;
use crate::error::AppError;

pub async fn get_info(
    Authenticated(identity): Authenticated,
    payload: Result<Json<CertInfoRequest>, JsonRejection>,
) -> Result<Json<CertInfoResponse>, AppError> {
    let Json(req) = payload.map_err(|e| {
        tracing::debug!(error = %e, "invalid cert info request body");
        AppError::bad_request("INVALID_BODY", "request body must be JSON with OrderType")
    })?;

    Ok(Json(CertInfoResponse {
        order_type: req.order_type,
        subject: identity.subject,
        algorithm: identity.algorithm,
        signature_verified: identity.signature_verified,
    }))
}
