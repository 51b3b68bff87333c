// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Interactive canvas engine: hit testing, drag sessions and incremental
//! rendering of areas over the source image.

pub mod drag;
pub mod editor;
pub mod render;
pub mod surface;
