// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Playback position tracking and on-screen comment overlays.

pub mod overlay;
pub mod player;
