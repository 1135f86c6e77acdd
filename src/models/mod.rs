// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Review data model.

pub mod comment;
pub mod comment_store;
pub mod project;
pub mod session;
