// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Undine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Undine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Text-format emission.
//!
//! The route graph is serialized to Graphviz (`digraph`) text; turning
//! that text into an image is the job of an external renderer.

pub mod dot;

pub use dot::{render_route_graph, END_NODE_LABEL};
