// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use axum::http::{header::AUTHORIZATION, HeaderMap};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::principal::Principal;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Signing secret must not be empty")]
    EmptySecret,

    #[error("Token rejected: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    #[error("Token claim '{0}' is empty")]
    EmptyClaim(&'static str),
}

/// Claims carried by gateway bearer tokens. Both snake_case and camelCase
/// claim names are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrincipalClaims {
    #[serde(alias = "userId")]
    pub user_id: String,

    #[serde(alias = "role")]
    pub user_role: String,

    #[serde(default, alias = "userType", skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    pub exp: u64,
}

impl PrincipalClaims {
    pub fn into_principal(self) -> Principal {
        Principal {
            user_id: self.user_id,
            role: self.user_role,
            user_type: self.user_type.filter(|t| !t.trim().is_empty()),
        }
    }
}

/// HS256 verifier turning bearer tokens into principals
pub struct PrincipalTokenVerifier {
    decoding_key: DecodingKey,
    expected_issuer: Option<String>,
}

impl PrincipalTokenVerifier {
    pub fn new(secret: &str, expected_issuer: Option<&str>) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }
        Ok(Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expected_issuer: expected_issuer
                .filter(|iss| !iss.is_empty())
                .map(str::to_string),
        })
    }

    pub fn verify(&self, token: &str) -> Result<Principal, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);
        if let Some(issuer) = &self.expected_issuer {
            validation.set_issuer(&[issuer]);
        }

        let claims = decode::<PrincipalClaims>(token, &self.decoding_key, &validation)?.claims;
        if claims.user_id.trim().is_empty() {
            return Err(TokenError::EmptyClaim("user_id"));
        }
        Ok(claims.into_principal())
    }

    /// Principal for a request, if its `Authorization` header carries a valid token.
    pub fn principal_from_headers(&self, headers: &HeaderMap) -> Option<Principal> {
        let token = bearer_token(headers)?;
        match self.verify(token) {
            Ok(principal) => Some(principal),
            Err(e) => {
                debug!("Ignoring bearer token: {}", e);
                None
            }
        }
    }
}

/// Token part of an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
