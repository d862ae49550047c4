// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Undine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Undine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations on a form's routing: condition building with
//! field-scoped validation, and the two-phase (preview/commit) page
//! reorder with optimistic conflict detection.

pub mod condition;
pub mod reorder;

pub use condition::{
    build_primary_branch, build_secondary_skip, field_errors_from_api, ApiErrorCode,
    BranchInput, ConditionErrors, ConditionField, FieldError, FieldErrorKind, TargetSelector,
    END_OF_FORM_SELECTOR, EXIT_PAGE_SELECTOR, EXIT_PAGE_TEXT_MAX_LENGTH,
};
pub use reorder::{
    commit_reorder, preview_reorder, PositionErrors, PositionHintError, PositionHintErrorKind,
    ReorderCommitError, ReorderPreview, POSITION_HINT_MAX, POSITION_HINT_MIN,
};
