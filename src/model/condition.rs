// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Undine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Undine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::{ConditionId, PageId};

/// Wire shape of a routing condition as persisted by the CRUD layer.
///
/// The nullable-field combinations encode the condition's kind; this crate
/// resolves them into a [`ConditionKind`] exactly once, at load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionRecord {
    pub condition_id: ConditionId,
    pub routing_page_id: PageId,
    #[serde(default)]
    pub check_page_id: Option<PageId>,
    #[serde(default)]
    pub answer_value: Option<String>,
    #[serde(default)]
    pub goto_page_id: Option<PageId>,
    #[serde(default)]
    pub skip_to_end: bool,
    #[serde(default)]
    pub exit_page_heading: Option<String>,
    #[serde(default)]
    pub exit_page_markdown: Option<String>,
}

/// Where a primary branch lands when its guard matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchTarget {
    Page(PageId),
    EndOfForm,
}

/// The resolved kind of a condition, mutually exclusive by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionKind {
    /// "If the answer to this question is `answer_value`, go to `target`";
    /// pairs implicitly with an "any other answer" edge to the default
    /// successor.
    PrimaryBranch {
        answer_value: String,
        target: BranchTarget,
    },
    /// Unconditional forward jump used to rejoin or bypass a run of pages.
    SecondarySkip { goto_page_id: PageId },
    /// Answer-guarded early exit at a synthetic terminal unique to this
    /// condition; the exit page is not a real [`super::Page`].
    ExitPage {
        answer_value: String,
        heading: String,
        markdown: String,
    },
}

/// A single overlay edge on a form's page sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    condition_id: ConditionId,
    routing_page_id: PageId,
    kind: ConditionKind,
}

impl Condition {
    pub(crate) fn new(condition_id: ConditionId, routing_page_id: PageId, kind: ConditionKind) -> Self {
        Self { condition_id, routing_page_id, kind }
    }

    /// Classify a raw record into a condition, rejecting inconsistent
    /// field combinations.
    ///
    /// Failures here are data-integrity problems (upstream corruption),
    /// not user-facing validation; user input goes through
    /// [`crate::ops::build_primary_branch`] and friends instead.
    pub fn from_record(record: ConditionRecord) -> Result<Self, ConditionShapeError> {
        let condition_id = record.condition_id;
        let routing_page_id = record.routing_page_id;

        if let Some(check_page_id) = record.check_page_id {
            if check_page_id != routing_page_id {
                return Err(ConditionShapeError::CheckPageMismatch {
                    condition_id,
                    check_page_id,
                    routing_page_id,
                });
            }
            if record.answer_value.is_none() {
                return Err(ConditionShapeError::CheckPageWithoutAnswerValue { condition_id });
            }
        }

        let exit_text = match (record.exit_page_heading, record.exit_page_markdown) {
            (Some(heading), Some(markdown)) => Some((heading, markdown)),
            (None, None) => None,
            _ => return Err(ConditionShapeError::ExitPageTextIncomplete { condition_id }),
        };

        let kind = match (record.answer_value, exit_text) {
            (Some(answer_value), Some((heading, markdown))) => {
                if record.goto_page_id.is_some() || record.skip_to_end {
                    return Err(ConditionShapeError::ConflictingTargets { condition_id });
                }
                ConditionKind::ExitPage { answer_value, heading, markdown }
            }
            (None, Some(_)) => {
                return Err(ConditionShapeError::MissingAnswerValue { condition_id });
            }
            (Some(answer_value), None) => {
                let target = match (record.goto_page_id, record.skip_to_end) {
                    (Some(_), true) => {
                        return Err(ConditionShapeError::ConflictingTargets { condition_id });
                    }
                    (Some(goto_page_id), false) => BranchTarget::Page(goto_page_id),
                    (None, true) => BranchTarget::EndOfForm,
                    (None, false) => {
                        return Err(ConditionShapeError::MissingTarget { condition_id });
                    }
                };
                ConditionKind::PrimaryBranch { answer_value, target }
            }
            (None, None) => {
                if record.skip_to_end {
                    return Err(ConditionShapeError::MissingAnswerValue { condition_id });
                }
                let Some(goto_page_id) = record.goto_page_id else {
                    return Err(ConditionShapeError::MissingTarget { condition_id });
                };
                ConditionKind::SecondarySkip { goto_page_id }
            }
        };

        Ok(Self { condition_id, routing_page_id, kind })
    }

    /// Lower the condition back to its persisted wire shape.
    pub fn to_record(&self) -> ConditionRecord {
        let mut record = ConditionRecord {
            condition_id: self.condition_id,
            routing_page_id: self.routing_page_id,
            check_page_id: None,
            answer_value: None,
            goto_page_id: None,
            skip_to_end: false,
            exit_page_heading: None,
            exit_page_markdown: None,
        };

        match &self.kind {
            ConditionKind::PrimaryBranch { answer_value, target } => {
                record.check_page_id = Some(self.routing_page_id);
                record.answer_value = Some(answer_value.clone());
                match target {
                    BranchTarget::Page(goto_page_id) => record.goto_page_id = Some(*goto_page_id),
                    BranchTarget::EndOfForm => record.skip_to_end = true,
                }
            }
            ConditionKind::SecondarySkip { goto_page_id } => {
                record.goto_page_id = Some(*goto_page_id);
            }
            ConditionKind::ExitPage { answer_value, heading, markdown } => {
                record.check_page_id = Some(self.routing_page_id);
                record.answer_value = Some(answer_value.clone());
                record.exit_page_heading = Some(heading.clone());
                record.exit_page_markdown = Some(markdown.clone());
            }
        }

        record
    }

    pub fn condition_id(&self) -> ConditionId {
        self.condition_id
    }

    /// Edge source: the page after which this condition is evaluated.
    pub fn routing_page_id(&self) -> PageId {
        self.routing_page_id
    }

    pub fn kind(&self) -> &ConditionKind {
        &self.kind
    }

    /// The page whose answer is tested, if any (secondary skips test none).
    pub fn check_page_id(&self) -> Option<PageId> {
        match self.kind {
            ConditionKind::PrimaryBranch { .. } | ConditionKind::ExitPage { .. } => {
                Some(self.routing_page_id)
            }
            ConditionKind::SecondarySkip { .. } => None,
        }
    }

    /// Concrete target page, if the condition goes to one.
    pub fn goto_page_id(&self) -> Option<PageId> {
        match self.kind {
            ConditionKind::PrimaryBranch { target: BranchTarget::Page(goto_page_id), .. }
            | ConditionKind::SecondarySkip { goto_page_id } => Some(goto_page_id),
            _ => None,
        }
    }

    pub fn answer_value(&self) -> Option<&str> {
        match &self.kind {
            ConditionKind::PrimaryBranch { answer_value, .. }
            | ConditionKind::ExitPage { answer_value, .. } => Some(answer_value),
            ConditionKind::SecondarySkip { .. } => None,
        }
    }

    /// Whether the condition references the page as source, check, or target.
    pub fn references(&self, page_id: PageId) -> bool {
        self.routing_page_id == page_id
            || self.check_page_id() == Some(page_id)
            || self.goto_page_id() == Some(page_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionShapeError {
    ConflictingTargets {
        condition_id: ConditionId,
    },
    ExitPageTextIncomplete {
        condition_id: ConditionId,
    },
    CheckPageMismatch {
        condition_id: ConditionId,
        check_page_id: PageId,
        routing_page_id: PageId,
    },
    CheckPageWithoutAnswerValue {
        condition_id: ConditionId,
    },
    MissingAnswerValue {
        condition_id: ConditionId,
    },
    MissingTarget {
        condition_id: ConditionId,
    },
}

impl fmt::Display for ConditionShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConflictingTargets { condition_id } => write!(
                f,
                "condition {condition_id} carries more than one target (goto page, end of form, or exit page)"
            ),
            Self::ExitPageTextIncomplete { condition_id } => write!(
                f,
                "condition {condition_id} has only one of exit page heading/markdown"
            ),
            Self::CheckPageMismatch { condition_id, check_page_id, routing_page_id } => write!(
                f,
                "condition {condition_id} checks page {check_page_id} but routes from page {routing_page_id}"
            ),
            Self::CheckPageWithoutAnswerValue { condition_id } => write!(
                f,
                "condition {condition_id} names a check page but no answer value"
            ),
            Self::MissingAnswerValue { condition_id } => write!(
                f,
                "condition {condition_id} needs an answer value for its kind"
            ),
            Self::MissingTarget { condition_id } => {
                write!(f, "condition {condition_id} has no target")
            }
        }
    }
}

impl std::error::Error for ConditionShapeError {}

#[cfg(test)]
mod tests {
    use super::{
        BranchTarget, Condition, ConditionKind, ConditionRecord, ConditionShapeError,
    };
    use crate::model::{ConditionId, PageId};

    fn blank_record() -> ConditionRecord {
        ConditionRecord {
            condition_id: ConditionId::new(1),
            routing_page_id: PageId::new(10),
            check_page_id: None,
            answer_value: None,
            goto_page_id: None,
            skip_to_end: false,
            exit_page_heading: None,
            exit_page_markdown: None,
        }
    }

    #[test]
    fn classifies_a_primary_branch_to_a_page() {
        let record = ConditionRecord {
            check_page_id: Some(PageId::new(10)),
            answer_value: Some("Wales".to_owned()),
            goto_page_id: Some(PageId::new(30)),
            ..blank_record()
        };

        let condition = Condition::from_record(record).expect("classify");
        assert_eq!(
            condition.kind(),
            &ConditionKind::PrimaryBranch {
                answer_value: "Wales".to_owned(),
                target: BranchTarget::Page(PageId::new(30)),
            }
        );
        assert_eq!(condition.check_page_id(), Some(PageId::new(10)));
        assert_eq!(condition.goto_page_id(), Some(PageId::new(30)));
    }

    #[test]
    fn classifies_a_primary_branch_to_the_end_of_form() {
        let record = ConditionRecord {
            check_page_id: Some(PageId::new(10)),
            answer_value: Some("No".to_owned()),
            skip_to_end: true,
            ..blank_record()
        };

        let condition = Condition::from_record(record).expect("classify");
        assert_eq!(
            condition.kind(),
            &ConditionKind::PrimaryBranch {
                answer_value: "No".to_owned(),
                target: BranchTarget::EndOfForm,
            }
        );
        assert_eq!(condition.goto_page_id(), None);
    }

    #[test]
    fn classifies_a_secondary_skip() {
        let record = ConditionRecord { goto_page_id: Some(PageId::new(40)), ..blank_record() };

        let condition = Condition::from_record(record).expect("classify");
        assert_eq!(
            condition.kind(),
            &ConditionKind::SecondarySkip { goto_page_id: PageId::new(40) }
        );
        assert_eq!(condition.check_page_id(), None);
        assert_eq!(condition.answer_value(), None);
    }

    #[test]
    fn classifies_an_exit_page_edge() {
        let record = ConditionRecord {
            check_page_id: Some(PageId::new(10)),
            answer_value: Some("None of the above".to_owned()),
            exit_page_heading: Some("You cannot apply".to_owned()),
            exit_page_markdown: Some("Based on your answer you are not eligible.".to_owned()),
            ..blank_record()
        };

        let condition = Condition::from_record(record).expect("classify");
        let ConditionKind::ExitPage { answer_value, heading, .. } = condition.kind() else {
            panic!("expected exit page kind");
        };
        assert_eq!(answer_value, "None of the above");
        assert_eq!(heading, "You cannot apply");
        assert_eq!(condition.goto_page_id(), None);
    }

    #[test]
    fn rejects_skip_to_end_combined_with_a_goto_page() {
        let record = ConditionRecord {
            check_page_id: Some(PageId::new(10)),
            answer_value: Some("Yes".to_owned()),
            goto_page_id: Some(PageId::new(30)),
            skip_to_end: true,
            ..blank_record()
        };

        assert_eq!(
            Condition::from_record(record),
            Err(ConditionShapeError::ConflictingTargets { condition_id: ConditionId::new(1) })
        );
    }

    #[test]
    fn rejects_exit_text_combined_with_a_goto_page() {
        let record = ConditionRecord {
            check_page_id: Some(PageId::new(10)),
            answer_value: Some("Yes".to_owned()),
            goto_page_id: Some(PageId::new(30)),
            exit_page_heading: Some("Done".to_owned()),
            exit_page_markdown: Some("body".to_owned()),
            ..blank_record()
        };

        assert_eq!(
            Condition::from_record(record),
            Err(ConditionShapeError::ConflictingTargets { condition_id: ConditionId::new(1) })
        );
    }

    #[test]
    fn rejects_half_an_exit_page() {
        let record = ConditionRecord {
            check_page_id: Some(PageId::new(10)),
            answer_value: Some("Yes".to_owned()),
            exit_page_heading: Some("Done".to_owned()),
            ..blank_record()
        };

        assert_eq!(
            Condition::from_record(record),
            Err(ConditionShapeError::ExitPageTextIncomplete {
                condition_id: ConditionId::new(1)
            })
        );
    }

    #[test]
    fn rejects_a_check_page_that_is_not_the_routing_page() {
        let record = ConditionRecord {
            check_page_id: Some(PageId::new(11)),
            answer_value: Some("Yes".to_owned()),
            goto_page_id: Some(PageId::new(30)),
            ..blank_record()
        };

        assert_eq!(
            Condition::from_record(record),
            Err(ConditionShapeError::CheckPageMismatch {
                condition_id: ConditionId::new(1),
                check_page_id: PageId::new(11),
                routing_page_id: PageId::new(10),
            })
        );
    }

    #[test]
    fn rejects_an_answer_guard_without_any_target() {
        let record = ConditionRecord {
            check_page_id: Some(PageId::new(10)),
            answer_value: Some("Yes".to_owned()),
            ..blank_record()
        };

        assert_eq!(
            Condition::from_record(record),
            Err(ConditionShapeError::MissingTarget { condition_id: ConditionId::new(1) })
        );
    }

    #[test]
    fn rejects_an_empty_record() {
        assert_eq!(
            Condition::from_record(blank_record()),
            Err(ConditionShapeError::MissingTarget { condition_id: ConditionId::new(1) })
        );
    }

    #[test]
    fn rejects_an_unguarded_skip_to_end() {
        let record = ConditionRecord { skip_to_end: true, ..blank_record() };

        assert_eq!(
            Condition::from_record(record),
            Err(ConditionShapeError::MissingAnswerValue { condition_id: ConditionId::new(1) })
        );
    }

    #[test]
    fn round_trips_through_its_record_shape() {
        let records = [
            ConditionRecord {
                check_page_id: Some(PageId::new(10)),
                answer_value: Some("Wales".to_owned()),
                goto_page_id: Some(PageId::new(30)),
                ..blank_record()
            },
            ConditionRecord { goto_page_id: Some(PageId::new(40)), ..blank_record() },
            ConditionRecord {
                check_page_id: Some(PageId::new(10)),
                answer_value: Some("No".to_owned()),
                exit_page_heading: Some("Stop".to_owned()),
                exit_page_markdown: Some("You cannot continue.".to_owned()),
                ..blank_record()
            },
        ];

        for record in records {
            let condition = Condition::from_record(record.clone()).expect("classify");
            assert_eq!(condition.to_record(), record);
        }
    }
}
