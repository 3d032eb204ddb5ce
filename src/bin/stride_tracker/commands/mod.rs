// ABOUTME: Command implementations for the Stride CLI
// ABOUTME: Session replay and calorie estimation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking

pub mod calories;
pub mod replay;
