// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: areas, their collection and the persisted document.

pub mod area;
pub mod collection;
pub mod document;
