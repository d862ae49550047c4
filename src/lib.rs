// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Undine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Undine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Undine — page-sequencing and conditional-routing engine for
//! multi-page forms.
//!
//! The crate models a form as an ordered page sequence with a sparse
//! overlay of routing conditions (branches, skips, exit pages), resolves
//! per-page routes, reorders pages without invalidating edges, and
//! renders the full route graph as Graphviz text.

pub mod format;
pub mod model;
pub mod ops;
pub mod query;
