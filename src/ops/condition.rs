// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Undine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Undine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{
    BranchTarget, Condition, ConditionId, ConditionKind, Form, Page, PageId,
};

/// Maximum length (in characters) of exit page heading and markdown.
pub const EXIT_PAGE_TEXT_MAX_LENGTH: usize = 5_000;

/// Sentinel value the target dropdown submits for "end of form".
pub const END_OF_FORM_SELECTOR: &str = "check_your_answers";
/// Sentinel value the target dropdown submits for "create/edit exit page".
pub const EXIT_PAGE_SELECTOR: &str = "exit_page";

/// A parsed target selector. Sentinel strings never cross this boundary;
/// everything past input parsing works with this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSelector {
    Page(PageId),
    EndOfForm,
    ExitPage,
}

impl TargetSelector {
    /// Parse the raw dropdown value. Blank and unparseable input both
    /// come back as `None` (the validator reports a missing target).
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match raw {
            "" => None,
            END_OF_FORM_SELECTOR => Some(Self::EndOfForm),
            EXIT_PAGE_SELECTOR => Some(Self::ExitPage),
            _ => raw.parse::<i64>().ok().map(|id| Self::Page(PageId::new(id))),
        }
    }
}

/// Raw user input for creating or editing a primary branch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchInput {
    pub answer_value: Option<String>,
    pub target: Option<TargetSelector>,
    pub exit_page_heading: Option<String>,
    pub exit_page_markdown: Option<String>,
}

/// The input field a validation error is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionField {
    AnswerValue,
    GotoPageId,
    ExitPageHeading,
    ExitPageMarkdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    AnswerValueMissing,
    GotoPageMissing,
    GotoPageSameAsRoutingPage,
    GotoPageBeforeRoutingPage,
    GotoPageAlreadyConsecutive,
    ExitPageHeadingMissing,
    ExitPageMarkdownMissing,
    ExitPageHeadingTooLong { length: usize },
    ExitPageMarkdownTooLong { length: usize },
    /// Reported by the persistence layer after the fact: the guard value
    /// no longer exists among the checked question's options.
    AnswerValueNoLongerExists,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: ConditionField,
    pub kind: FieldErrorKind,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FieldErrorKind::AnswerValueMissing => f.write_str("select an answer"),
            FieldErrorKind::GotoPageMissing => {
                f.write_str("select the question to skip to")
            }
            FieldErrorKind::GotoPageSameAsRoutingPage => {
                f.write_str("the question to skip to cannot be the question you are routing from")
            }
            FieldErrorKind::GotoPageBeforeRoutingPage => {
                f.write_str("the question to skip to must come after the question you are routing from")
            }
            FieldErrorKind::GotoPageAlreadyConsecutive => {
                f.write_str("the question to skip to already follows the question you are routing from")
            }
            FieldErrorKind::ExitPageHeadingMissing => f.write_str("enter an exit page heading"),
            FieldErrorKind::ExitPageMarkdownMissing => {
                f.write_str("enter the exit page text")
            }
            FieldErrorKind::ExitPageHeadingTooLong { length } => write!(
                f,
                "exit page heading is {length} characters, the maximum is {EXIT_PAGE_TEXT_MAX_LENGTH}"
            ),
            FieldErrorKind::ExitPageMarkdownTooLong { length } => write!(
                f,
                "exit page text is {length} characters, the maximum is {EXIT_PAGE_TEXT_MAX_LENGTH}"
            ),
            FieldErrorKind::AnswerValueNoLongerExists => {
                f.write_str("the selected answer no longer exists among the question's options")
            }
        }
    }
}

/// All field errors found for one condition submission.
///
/// Errors are collected, not fail-fast, so one round trip can surface
/// every problem at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionErrors(Vec<FieldError>);

impl ConditionErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn for_field(&self, field: ConditionField) -> impl Iterator<Item = &FieldError> {
        self.0.iter().filter(move |error| error.field == field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ConditionErrors {
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

impl std::error::Error for ConditionErrors {}

/// Error codes the persistence layer can report when it re-checks a
/// condition against live data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorCode {
    AnswerValueDoesntExist,
    GotoPageDoesntExist,
    CannotHaveGotoPageBeforeRoutingPage,
    CannotRouteToNextPage,
}

/// Re-attach persistence-reported errors to the fields they belong to.
///
/// The stale-guard check ("answer value no longer exists") is detected by
/// whatever persists the condition, not computed locally; this keeps the
/// user-visible message identical to locally-detected field errors.
pub fn field_errors_from_api(codes: &[ApiErrorCode]) -> Option<ConditionErrors> {
    if codes.is_empty() {
        return None;
    }
    let errors = codes
        .iter()
        .map(|code| match code {
            ApiErrorCode::AnswerValueDoesntExist => FieldError {
                field: ConditionField::AnswerValue,
                kind: FieldErrorKind::AnswerValueNoLongerExists,
            },
            ApiErrorCode::GotoPageDoesntExist => FieldError {
                field: ConditionField::GotoPageId,
                kind: FieldErrorKind::GotoPageMissing,
            },
            ApiErrorCode::CannotHaveGotoPageBeforeRoutingPage => FieldError {
                field: ConditionField::GotoPageId,
                kind: FieldErrorKind::GotoPageBeforeRoutingPage,
            },
            ApiErrorCode::CannotRouteToNextPage => FieldError {
                field: ConditionField::GotoPageId,
                kind: FieldErrorKind::GotoPageAlreadyConsecutive,
            },
        })
        .collect();
    Some(ConditionErrors(errors))
}

/// Build a primary branch (or exit page edge) for `routing_page` from raw
/// input, collecting every field error.
///
/// Selecting "end of form" sets the end target and clears any goto page;
/// any concrete target clears the end flag. The caller persists the
/// resulting condition and attaches it with [`Form::push_condition`].
pub fn build_primary_branch(
    form: &Form,
    condition_id: ConditionId,
    routing_page: &Page,
    input: &BranchInput,
) -> Result<Condition, ConditionErrors> {
    let mut errors = Vec::new();

    let answer_value = match non_blank(input.answer_value.as_deref()) {
        Some(value) => Some(value.to_owned()),
        None => {
            errors.push(FieldError {
                field: ConditionField::AnswerValue,
                kind: FieldErrorKind::AnswerValueMissing,
            });
            None
        }
    };

    let kind = match input.target {
        None => {
            errors.push(FieldError {
                field: ConditionField::GotoPageId,
                kind: FieldErrorKind::GotoPageMissing,
            });
            None
        }
        Some(TargetSelector::Page(goto_page_id)) => {
            if form.page(goto_page_id).is_none() {
                errors.push(FieldError {
                    field: ConditionField::GotoPageId,
                    kind: FieldErrorKind::GotoPageMissing,
                });
                None
            } else {
                answer_value.clone().map(|answer_value| ConditionKind::PrimaryBranch {
                    answer_value,
                    target: BranchTarget::Page(goto_page_id),
                })
            }
        }
        Some(TargetSelector::EndOfForm) => {
            answer_value.clone().map(|answer_value| ConditionKind::PrimaryBranch {
                answer_value,
                target: BranchTarget::EndOfForm,
            })
        }
        Some(TargetSelector::ExitPage) => {
            let heading = validated_exit_text(
                input.exit_page_heading.as_deref(),
                ConditionField::ExitPageHeading,
                &mut errors,
            );
            let markdown = validated_exit_text(
                input.exit_page_markdown.as_deref(),
                ConditionField::ExitPageMarkdown,
                &mut errors,
            );
            match (answer_value.clone(), heading, markdown) {
                (Some(answer_value), Some(heading), Some(markdown)) => {
                    Some(ConditionKind::ExitPage { answer_value, heading, markdown })
                }
                _ => None,
            }
        }
    };

    match kind {
        Some(kind) if errors.is_empty() => {
            Ok(Condition::new(condition_id, routing_page.page_id(), kind))
        }
        _ => Err(ConditionErrors(errors)),
    }
}

/// Build a secondary skip for `routing_page`: an unconditional forward
/// jump that must land strictly after the routing page's successor.
pub fn build_secondary_skip(
    form: &Form,
    condition_id: ConditionId,
    routing_page: &Page,
    target: Option<TargetSelector>,
) -> Result<Condition, ConditionErrors> {
    let goto_page = match target {
        Some(TargetSelector::Page(goto_page_id)) => form.page(goto_page_id),
        // Skips jump to concrete pages only.
        _ => None,
    };

    let Some(goto_page) = goto_page else {
        return Err(ConditionErrors(vec![FieldError {
            field: ConditionField::GotoPageId,
            kind: FieldErrorKind::GotoPageMissing,
        }]));
    };

    let routing_position = routing_page.position();
    let goto_position = goto_page.position();
    let kind = if goto_position == routing_position {
        Some(FieldErrorKind::GotoPageSameAsRoutingPage)
    } else if goto_position < routing_position {
        Some(FieldErrorKind::GotoPageBeforeRoutingPage)
    } else if goto_position == routing_position + 1 {
        Some(FieldErrorKind::GotoPageAlreadyConsecutive)
    } else {
        None
    };

    if let Some(kind) = kind {
        return Err(ConditionErrors(vec![FieldError {
            field: ConditionField::GotoPageId,
            kind,
        }]));
    }

    Ok(Condition::new(
        condition_id,
        routing_page.page_id(),
        ConditionKind::SecondarySkip { goto_page_id: goto_page.page_id() },
    ))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn validated_exit_text(
    value: Option<&str>,
    field: ConditionField,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let missing_kind = match field {
        ConditionField::ExitPageHeading => FieldErrorKind::ExitPageHeadingMissing,
        _ => FieldErrorKind::ExitPageMarkdownMissing,
    };

    let Some(value) = non_blank(value) else {
        errors.push(FieldError { field, kind: missing_kind });
        return None;
    };

    let length = value.chars().count();
    if length > EXIT_PAGE_TEXT_MAX_LENGTH {
        let kind = match field {
            ConditionField::ExitPageHeading => FieldErrorKind::ExitPageHeadingTooLong { length },
            _ => FieldErrorKind::ExitPageMarkdownTooLong { length },
        };
        errors.push(FieldError { field, kind });
        return None;
    }

    Some(value.to_owned())
}
