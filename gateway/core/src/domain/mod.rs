// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain
//!
//! Caller identity, workflow response model, domain source port, role
//! dispatch table and gateway configuration.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Pure types shared by every other layer

pub mod principal;
pub mod workflow;
pub mod source;
pub mod dispatch;
pub mod gateway_config;
