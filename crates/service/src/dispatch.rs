//! JSON request dispatch for the signing service.
//!
//! Requests are `{"method": "<name>", "params": {...}}` objects, responses are either
//! `{"ok": <value>}` or `{"error": "<message>"}`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::ServiceError;
use crate::service::SignerService;

/// A service request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "method", content = "params", rename_all = "snake_case")]
pub enum Request {
    /// Ref: [`SignerService::generate_key`].
    GenerateKey,
    /// Ref: [`SignerService::generate_keypair`].
    GenerateKeypair,
    /// Ref: [`SignerService::greet`].
    Greet { name: String },
    /// Ref: [`SignerService::rng_seed`].
    RngSeed,
    /// Ref: [`SignerService::schnorr_signature`].
    SchnorrSignature { msg: String, secret_key: String },
    /// Ref: [`SignerService::update_rng_seed`].
    UpdateRngSeed { seed: String },
    /// Ref: [`SignerService::validate_schnorr`].
    ValidateSchnorr {
        msg: String,
        verifying_key: String,
        signature_str: String,
    },
    /// Ref: [`SignerService::sign_event`].
    SignEvent {
        secret_key: String,
        kind: u16,
        #[serde(default)]
        tags: Vec<Vec<String>>,
        content: String,
        #[serde(default)]
        created_at: Option<u64>,
    },
    /// Ref: [`SignerService::verify_event`].
    VerifyEvent { event: Value },
}

/// A service response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    /// The result of a successful request (`null` for requests without a result).
    Ok(Value),
    /// A description of why the request failed.
    Error(String),
}

impl From<Result<Value, ServiceError>> for Response {
    fn from(result: Result<Value, ServiceError>) -> Self {
        match result {
            Ok(value) => Response::Ok(value),
            Err(error) => Response::Error(error.to_string()),
        }
    }
}

/// Executes `request` against `service`.
pub fn dispatch(service: &SignerService, request: Request) -> Response {
    let result = match request {
        Request::GenerateKey => Ok(json!(service.generate_key())),
        Request::GenerateKeypair => Ok(json!(service.generate_keypair())),
        Request::Greet { name } => Ok(json!(service.greet(&name))),
        Request::RngSeed => Ok(json!(service.rng_seed())),
        Request::SchnorrSignature { msg, secret_key } => service
            .schnorr_signature(&msg, &secret_key)
            .map(|info| json!(info)),
        Request::UpdateRngSeed { seed } => service.update_rng_seed(&seed).map(|_| Value::Null),
        Request::ValidateSchnorr {
            msg,
            verifying_key,
            signature_str,
        } => Ok(json!(service.validate_schnorr(
            &msg,
            &verifying_key,
            &signature_str
        ))),
        Request::SignEvent {
            secret_key,
            kind,
            tags,
            content,
            created_at,
        } => service
            .sign_event(&secret_key, kind, tags, &content, created_at)
            .map(|event| json!(event)),
        Request::VerifyEvent { event } => Ok(json!(service.verify_event(&event.to_string()))),
    };
    result.into()
}

/// Parses a JSON request line and executes it, malformed requests produce an error response.
pub fn dispatch_json(service: &SignerService, line: &str) -> Response {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => dispatch(service, request),
        Err(error) => Response::Error(format!("malformed request: {error}")),
    }
}
