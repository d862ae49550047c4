// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Undine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Undine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{Form, PageId};

/// Smallest position hint a user may request.
pub const POSITION_HINT_MIN: u32 = 1;
/// Largest position hint a user may request.
pub const POSITION_HINT_MAX: u32 = 1_000;

/// A computed ordering waiting for confirmation.
///
/// The preview carries a snapshot token (the page-id set at preview time)
/// so that [`commit_reorder`] can detect a concurrent editor's page
/// addition instead of applying positions computed against a stale
/// sequence. Serializable so the confirm UI can round-trip it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderPreview {
    order: Vec<PageId>,
    snapshot: BTreeSet<PageId>,
}

impl ReorderPreview {
    /// The previewed page order, already renumber-ready (index 0 becomes
    /// position 1 on commit).
    pub fn order(&self) -> &[PageId] {
        &self.order
    }

    pub fn snapshot(&self) -> &BTreeSet<PageId> {
        &self.snapshot
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionHintErrorKind {
    NotANumber { raw: String },
    OutOfRange { value: i64 },
}

/// A bad position hint, attributed to the page whose field carried it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionHintError {
    pub page_id: PageId,
    pub kind: PositionHintErrorKind,
}

impl fmt::Display for PositionHintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            PositionHintErrorKind::NotANumber { raw } => write!(
                f,
                "position for page {} must be a whole number, got {raw:?}",
                self.page_id
            ),
            PositionHintErrorKind::OutOfRange { value } => write!(
                f,
                "position for page {} must be between {POSITION_HINT_MIN} and {POSITION_HINT_MAX}, got {value}",
                self.page_id
            ),
        }
    }
}

/// All bad position hints in one submission, collected per field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionErrors(Vec<PositionHintError>);

impl PositionErrors {
    pub fn errors(&self) -> &[PositionHintError] {
        &self.0
    }
}

impl fmt::Display for PositionErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            fmt::Display::fmt(error, f)?;
        }
        Ok(())
    }
}

impl std::error::Error for PositionErrors {}

/// Why a previewed reorder could not be applied; the whole commit is
/// rejected and the caller must re-preview. Distinct from field
/// validation by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderCommitError {
    /// The page set grew between preview and commit.
    Conflict { added: Vec<PageId> },
    /// The preview's ordering does not cover the current page set (an
    /// order that omits or repeats pages, e.g. a tampered round trip
    /// through the confirm UI); applying it would drop pages.
    IncompleteOrder { missing: Vec<PageId> },
}

impl fmt::Display for ReorderCommitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict { added } => {
                write!(f, "pages were added to the form after the reorder was previewed:")?;
                for page_id in added {
                    write!(f, " {page_id}")?;
                }
                Ok(())
            }
            Self::IncompleteOrder { missing } => {
                write!(f, "the previewed ordering does not cover the form's pages;")?;
                if missing.is_empty() {
                    write!(f, " a page is listed more than once")?;
                } else {
                    write!(f, " missing:")?;
                    for page_id in missing {
                        write!(f, " {page_id}")?;
                    }
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ReorderCommitError {}

/// Compute the ordering the requested position hints describe, without
/// touching the form.
///
/// Hints are exactly that: pages with a valid hint are sorted by it
/// (ties keep their original relative order), pages with a blank hint
/// are appended afterwards in original order, and the result is
/// renumbered contiguously on commit. A non-blank hint that is not a
/// number in `[POSITION_HINT_MIN, POSITION_HINT_MAX]` is a field error;
/// blank is not. Hints for pages no longer in the form are ignored.
pub fn preview_reorder(
    form: &Form,
    requested: &BTreeMap<PageId, String>,
) -> Result<ReorderPreview, PositionErrors> {
    let mut errors = Vec::new();
    let mut specified: Vec<(u32, usize, PageId)> = Vec::new();
    let mut unspecified: Vec<PageId> = Vec::new();

    for (index, page) in form.pages().iter().enumerate() {
        let page_id = page.page_id();
        let raw = requested.get(&page_id).map(|raw| raw.trim()).unwrap_or("");
        if raw.is_empty() {
            unspecified.push(page_id);
            continue;
        }
        match parse_position_hint(raw) {
            Ok(hint) => specified.push((hint, index, page_id)),
            Err(kind) => errors.push(PositionHintError { page_id, kind }),
        }
    }

    if !errors.is_empty() {
        return Err(PositionErrors(errors));
    }

    specified.sort_by_key(|(hint, index, _)| (*hint, *index));

    let mut order = Vec::with_capacity(form.pages().len());
    order.extend(specified.into_iter().map(|(_, _, page_id)| page_id));
    order.extend(unspecified);

    Ok(ReorderPreview { order, snapshot: form.page_set() })
}

/// Apply a previewed ordering to the form.
///
/// Pages added since the preview are a
/// [`ReorderCommitError::Conflict`]; pages deleted since the preview are
/// silently dropped from the ordering. The preview round-trips through
/// the confirm UI, so its ordering is re-checked against the current
/// page set before anything is applied: an ordering that omits or
/// repeats pages is rejected whole rather than partially applied. On
/// success the whole sequence is replaced and renumbered in one step.
pub fn commit_reorder(
    form: &mut Form,
    preview: &ReorderPreview,
) -> Result<(), ReorderCommitError> {
    let current = form.page_set();

    let added: Vec<PageId> = current.difference(&preview.snapshot).copied().collect();
    if !added.is_empty() {
        return Err(ReorderCommitError::Conflict { added });
    }

    let order: Vec<PageId> = preview
        .order
        .iter()
        .copied()
        .filter(|page_id| current.contains(page_id))
        .collect();

    let covered: BTreeSet<PageId> = order.iter().copied().collect();
    if covered.len() != order.len() || covered != current {
        let missing: Vec<PageId> = current.difference(&covered).copied().collect();
        return Err(ReorderCommitError::IncompleteOrder { missing });
    }

    form.apply_order(&order);
    Ok(())
}

fn parse_position_hint(raw: &str) -> Result<u32, PositionHintErrorKind> {
    let value: i64 = raw
        .parse()
        .map_err(|_| PositionHintErrorKind::NotANumber { raw: raw.to_owned() })?;
    if value < i64::from(POSITION_HINT_MIN) || value > i64::from(POSITION_HINT_MAX) {
        return Err(PositionHintErrorKind::OutOfRange { value });
    }
    Ok(value as u32)
}
