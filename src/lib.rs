// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Kozy review model.
//!
//! Timestamped, categorized review comments on a video, the overlay engine
//! that decides which comments are on screen at a given playback position,
//! and the stores that persist projects and cached video bytes.

pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod playback;
pub mod util;
