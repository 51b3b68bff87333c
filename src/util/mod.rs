// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Shared helpers: geometry and keyboard acceleration.

pub mod accel;
pub mod geometry;
