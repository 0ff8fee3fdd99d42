// Copyright (c) 2025 Atlas Maps Pty Ltd. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for Atlas.
//!
//! This crate provides a pre-configured HTTP client with a consistent
//! User-Agent header for every Atlas component that talks to the service.

mod client;

pub use client::{builder, new_client, new_client_with_timeout, user_agent};
