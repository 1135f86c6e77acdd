// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for projects, cached videos and media files.

pub mod blob_store;
pub mod media;
pub mod project_store;
pub mod serialization;
