// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Undine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Undine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model: typed ids, pages, routing conditions, and the form
//! that owns both.

pub mod condition;
pub mod form;
pub mod ids;
pub mod page;

pub use condition::{
    BranchTarget, Condition, ConditionKind, ConditionRecord, ConditionShapeError,
};
pub use form::{Form, FormIntegrityError, PageRemoval};
pub use ids::{ConditionId, FormId, PageId};
pub use page::{AnswerSettingsRecord, AnswerType, Page, PageRecord};
