use jsonwebtoken::Algorithm;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CertInfoRequest {
    #[serde(rename = "OrderType")]
    pub order_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertInfoResponse {
    pub order_type: String,
    pub subject: Option<String>,
    pub algorithm: Algorithm,
    pub signature_verified: bool,
}
