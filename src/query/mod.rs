// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Undine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Undine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only queries over a form's routing.
//!
//! Queries provide derived views (resolved routes, remaining-route
//! availability) that power the routes screens; none of them mutate the
//! form.

pub mod routes;

pub use routes::{
    no_remaining_routes, page_routes, secondary_skips, PageRoutes, RouteCard, RouteSummary,
    SecondaryRoute,
};
