//! Salted, iterated SHA-256 password hashes.
//!
//! Encoded as `sha256$<iterations>$<salt>$<hex digest>` so the work factor can be
//! raised later without invalidating stored hashes.

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::error::{AppError, Result};

const SCHEME: &str = "sha256";
pub const DEFAULT_ITERATIONS: u32 = 10_000;

pub fn hash_password(password: &str) -> String {
    hash_password_with(password, DEFAULT_ITERATIONS)
}

pub fn hash_password_with(password: &str, iterations: u32) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    let digest = derive(password, &salt, iterations);
    format!("{}${}${}${}", SCHEME, iterations, salt, hex::encode(digest))
}

/// Checks that `encoded` is a hash this module can verify.
pub fn parse_hash(encoded: &str) -> Result<(u32, &str, Vec<u8>)> {
    let mut parts = encoded.split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(digest), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return Err(AppError::SecurityError(
            "Password hash must have four '$'-separated parts".to_string(),
        ));
    };

    if scheme != SCHEME {
        return Err(AppError::SecurityError(format!(
            "Unsupported password hash scheme: {}",
            scheme
        )));
    }
    let iterations: u32 = iterations
        .parse()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| AppError::SecurityError("Invalid hash iteration count".to_string()))?;
    if salt.is_empty() {
        return Err(AppError::SecurityError("Password hash salt is empty".to_string()));
    }
    let digest = hex::decode(digest)
        .map_err(|e| AppError::SecurityError(format!("Invalid hash digest: {}", e)))?;

    Ok((iterations, salt, digest))
}

pub fn verify_password(password: &str, encoded: &str) -> bool {
    match parse_hash(encoded) {
        Ok((iterations, salt, expected)) => {
            constant_time_eq(&derive(password, salt, iterations), &expected)
        }
        Err(_) => false,
    }
}

fn derive(password: &str, salt: &str, iterations: u32) -> Vec<u8> {
    let mut digest = Sha256::new()
        .chain_update(salt.as_bytes())
        .chain_update(password.as_bytes())
        .finalize();
    for _ in 1..iterations {
        digest = Sha256::new()
            .chain_update(digest)
            .chain_update(password.as_bytes())
            .finalize();
    }
    digest.to_vec()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
