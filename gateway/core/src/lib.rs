// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! ERP Gateway Core
//!
//! Backend-for-frontend aggregation of independently owned ERP domain
//! services into role-specific dashboard views.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Domain, application, infrastructure and presentation layers of the gateway

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
