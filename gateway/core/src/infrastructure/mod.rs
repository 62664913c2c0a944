// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod auth;
pub mod http_source;
pub mod source_registry;

pub use auth::{PrincipalTokenVerifier, TokenError};
pub use http_source::HttpDomainSource;
pub use source_registry::SourceRegistry;
