// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! ERP gateway CLI library - exposes testable components
//!
//! # Architecture
//!
//! - **Layer:** Interface / Presentation Layer
//! - **Purpose:** Server bootstrap and configuration commands for the `erp-gateway` binary

pub mod commands;
pub mod server;
