pub mod algorithm;
pub mod extractor;
pub mod factory;
pub mod handler;
pub mod key_loader;
pub mod options;
pub mod types;
pub mod verifier;

pub use algorithm::{
    AlgorithmProvider, KeyMaterial, KeySelection, KeySetProvider, StaticAlgorithmProvider,
    UnconfiguredAlgorithmProvider, VerificationKey,
};
pub use factory::build_auth_handler;
pub use handler::JwtAuthenticationHandler;
pub use options::{JwtAuthenticationOptions, SchemeOptions};
pub use types::{AuthFailure, AuthenticateResult, AuthenticatedIdentity};
pub use verifier::{SignatureValidation, SignatureVerifier};
