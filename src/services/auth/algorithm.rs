//! Algorithm/key resolution for signature verification.
//!
//! The verifier only ever talks to [`AlgorithmProvider`]; new key sources plug in
//! by implementing the trait.

use std::fmt;
use std::str::FromStr;

use jsonwebtoken::{Algorithm, DecodingKey};

/// Verification key material. `Absent` is a real state, not a missing value:
/// a token checked against it never verifies.
pub enum KeyMaterial {
    Present(DecodingKey),
    Absent,
}

impl KeyMaterial {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        match self {
            Self::Present(_) => f.write_str("Present(..)"),
            Self::Absent => f.write_str("Absent"),
        }
    }
}

/// One configured (algorithm, key) pair.
#[derive(Debug)]
pub struct VerificationKey {
    algorithm: Algorithm,
    key_id: String,
    material: KeyMaterial,
}

impl VerificationKey {
    pub fn new(algorithm: Algorithm, key_id: impl Into<String>, key: DecodingKey) -> Self {
        Self {
            algorithm,
            key_id: key_id.into(),
            material: KeyMaterial::Present(key),
        }
    }

    pub fn absent(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            key_id: String::new(),
            material: KeyMaterial::Absent,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn material(&self) -> &KeyMaterial {
        &self.material
    }
}

/// What to do when several keys share the token's algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeySelection {
    /// Only the first key whose algorithm matches is tried.
    #[default]
    FirstMatch,
    /// Every matching key is tried, in configuration order.
    TryAll,
}

impl FromStr for KeySelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "first-match" => Ok(Self::FirstMatch),
            "all" | "try-all" => Ok(Self::TryAll),
            other => Err(format!("unknown key selection: {other}")),
        }
    }
}

/// Resolves the key(s) that may verify a token declaring `declared`.
///
/// Implementations are immutable after construction and shared across requests.
pub trait AlgorithmProvider: Send + Sync + fmt::Debug {
    /// First key usable for `declared`, or `None` when the algorithm is not configured.
    fn resolve(&self, declared: Algorithm) -> Option<&VerificationKey>;

    /// Keys the verifier should try, in order. Empty means "not found".
    fn candidates(&self, declared: Algorithm) -> Vec<&VerificationKey> {
        self.resolve(declared).into_iter().collect()
    }
}

/// Exactly one algorithm/key pair, fixed at startup.
#[derive(Debug)]
pub struct StaticAlgorithmProvider {
    key: VerificationKey,
}

impl StaticAlgorithmProvider {
    pub fn new(key: VerificationKey) -> Self {
        Self { key }
    }
}

impl AlgorithmProvider for StaticAlgorithmProvider {
    fn resolve(&self, declared: Algorithm) -> Option<&VerificationKey> {
        (self.key.algorithm == declared).then_some(&self.key)
    }
}

/// No key configured. Every lookup yields the absent key, so verification
/// deterministically fails instead of being skipped.
#[derive(Debug)]
pub struct UnconfiguredAlgorithmProvider {
    absent: VerificationKey,
}

impl UnconfiguredAlgorithmProvider {
    pub fn new() -> Self {
        Self {
            absent: VerificationKey::absent(Algorithm::RS256),
        }
    }
}

impl Default for UnconfiguredAlgorithmProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl AlgorithmProvider for UnconfiguredAlgorithmProvider {
    fn resolve(&self, _declared: Algorithm) -> Option<&VerificationKey> {
        Some(&self.absent)
    }
}

/// Ordered set of keys, possibly across several algorithms.
#[derive(Debug)]
pub struct KeySetProvider {
    keys: Vec<VerificationKey>,
    selection: KeySelection,
}

impl KeySetProvider {
    pub fn new(keys: Vec<VerificationKey>, selection: KeySelection) -> Self {
        Self { keys, selection }
    }
}

impl AlgorithmProvider for KeySetProvider {
    fn resolve(&self, declared: Algorithm) -> Option<&VerificationKey> {
        self.keys.iter().find(|k| k.algorithm == declared)
    }

    fn candidates(&self, declared: Algorithm) -> Vec<&VerificationKey> {
        match self.selection {
            KeySelection::FirstMatch => self.resolve(declared).into_iter().collect(),
            KeySelection::TryAll => self
                .keys
                .iter()
                .filter(|k| k.algorithm == declared)
                .collect(),
        }
    }
}
