// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Undine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Undine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;
use std::fmt;

use super::condition::{Condition, ConditionKind, ConditionRecord, ConditionShapeError};
use super::ids::{ConditionId, FormId, PageId};
use super::page::{Page, PageRecord};

/// A form: the ordered page sequence plus its overlay of routing
/// conditions.
///
/// The form is the transaction boundary. Every mutation that could break
/// the sequence/overlay invariants (reordering, page deletion) goes
/// through here so that positions stay contiguous and no condition is
/// left referencing a page that no longer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    form_id: FormId,
    name: String,
    // Position order; positions are 1..N contiguous in any consistent state.
    pages: Vec<Page>,
    // Definition order; drives route card numbering and edge emission order.
    conditions: Vec<Condition>,
}

impl Form {
    pub fn new(form_id: FormId, name: impl Into<String>) -> Self {
        Self { form_id, name: name.into(), pages: Vec::new(), conditions: Vec::new() }
    }

    /// Build a form from the records the CRUD layer loaded.
    ///
    /// Pages are sorted by their stored position and renumbered 1..N
    /// (stored positions are hints; gaps and duplicates are tolerated on
    /// the way in). Conditions are classified and checked for referential
    /// integrity against the page set.
    pub fn from_records(
        form_id: FormId,
        name: impl Into<String>,
        pages: Vec<PageRecord>,
        conditions: Vec<ConditionRecord>,
    ) -> Result<Self, FormIntegrityError> {
        let mut form = Self::new(form_id, name);

        let mut seen = BTreeSet::new();
        let mut loaded = pages.into_iter().map(Page::from_record).collect::<Vec<_>>();
        loaded.sort_by_key(Page::position);
        for page in loaded {
            if !seen.insert(page.page_id()) {
                return Err(FormIntegrityError::DuplicatePageId { page_id: page.page_id() });
            }
            form.pages.push(page);
        }
        form.renumber();

        for record in conditions {
            let condition = Condition::from_record(record)?;
            form.check_condition(&condition)?;
            form.conditions.push(condition);
        }

        Ok(form)
    }

    pub fn form_id(&self) -> FormId {
        self.form_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn page(&self, page_id: PageId) -> Option<&Page> {
        self.pages.iter().find(|page| page.page_id() == page_id)
    }

    /// The page's default successor: the next page in position order.
    ///
    /// `None` for the last page, whose default edge goes to the end
    /// terminal instead.
    pub fn next_page(&self, page_id: PageId) -> Option<&Page> {
        let index = self.pages.iter().position(|page| page.page_id() == page_id)?;
        self.pages.get(index + 1)
    }

    pub fn last_page(&self) -> Option<&Page> {
        self.pages.last()
    }

    pub fn is_last_page(&self, page_id: PageId) -> bool {
        self.last_page().is_some_and(|page| page.page_id() == page_id)
    }

    /// Whether the page can host a primary branch: a single-answer
    /// selection question that is not the last page of the form.
    pub fn can_host_branch(&self, page_id: PageId) -> bool {
        self.page(page_id)
            .is_some_and(|page| page.supports_branching() && !self.is_last_page(page_id))
    }

    /// Conditions evaluated after the given page, in definition order.
    pub fn conditions_for_page(&self, page_id: PageId) -> impl Iterator<Item = &Condition> {
        self.conditions
            .iter()
            .filter(move |condition| condition.routing_page_id() == page_id)
    }

    pub fn has_routing_condition(&self, page_id: PageId) -> bool {
        self.conditions_for_page(page_id).next().is_some()
    }

    /// The current page-id set, used as the reorder snapshot token.
    pub fn page_set(&self) -> BTreeSet<PageId> {
        self.pages.iter().map(Page::page_id).collect()
    }

    /// Append a page at the end of the sequence. The record's stored
    /// position is ignored; the page lands at position N+1.
    pub fn push_page(&mut self, record: PageRecord) -> Result<(), FormIntegrityError> {
        let page = Page::from_record(record);
        if self.page(page.page_id()).is_some() {
            return Err(FormIntegrityError::DuplicatePageId { page_id: page.page_id() });
        }
        self.pages.push(page);
        self.renumber();
        Ok(())
    }

    /// Attach an already-built condition, verifying its page references
    /// and that the page does not already carry an exit edge.
    pub fn push_condition(&mut self, condition: Condition) -> Result<(), FormIntegrityError> {
        self.check_condition(&condition)?;
        self.conditions.push(condition);
        Ok(())
    }

    pub fn remove_condition(&mut self, condition_id: ConditionId) -> Option<Condition> {
        let index = self
            .conditions
            .iter()
            .position(|condition| condition.condition_id() == condition_id)?;
        Some(self.conditions.remove(index))
    }

    /// Delete a page and cascade to every condition referencing it as
    /// source, check, or target, then renumber the survivors. Returns
    /// `None` when the page is not part of this form.
    pub fn delete_page(&mut self, page_id: PageId) -> Option<PageRemoval> {
        let index = self.pages.iter().position(|page| page.page_id() == page_id)?;
        let page = self.pages.remove(index);

        let mut removed_conditions = Vec::new();
        self.conditions.retain(|condition| {
            if condition.references(page_id) {
                removed_conditions.push(condition.clone());
                false
            } else {
                true
            }
        });

        self.renumber();
        Some(PageRemoval { page, removed_conditions })
    }

    /// Replace the page order with the given id sequence and renumber.
    ///
    /// Callers (the reorder commit) guarantee `order` is a permutation of
    /// the current page-id set.
    pub(crate) fn apply_order(&mut self, order: &[PageId]) {
        debug_assert_eq!(order.len(), self.pages.len());
        let mut pool = std::mem::take(&mut self.pages);
        for page_id in order {
            let index = pool
                .iter()
                .position(|page| page.page_id() == *page_id)
                .expect("reorder commit covers the current page set");
            self.pages.push(pool.remove(index));
        }
        self.renumber();
    }

    fn renumber(&mut self) {
        for (index, page) in self.pages.iter_mut().enumerate() {
            page.set_position(index as u32 + 1);
        }
    }

    fn check_condition(&self, condition: &Condition) -> Result<(), FormIntegrityError> {
        self.check_condition_refs(condition)?;

        // The diagram gives each page a single synthetic exit node, so a
        // second exit edge on one page has nowhere distinct to land.
        if matches!(condition.kind(), ConditionKind::ExitPage { .. })
            && self
                .conditions_for_page(condition.routing_page_id())
                .any(|existing| matches!(existing.kind(), ConditionKind::ExitPage { .. }))
        {
            return Err(FormIntegrityError::DuplicateExitPage {
                routing_page_id: condition.routing_page_id(),
            });
        }

        Ok(())
    }

    fn check_condition_refs(&self, condition: &Condition) -> Result<(), FormIntegrityError> {
        let refs = [
            Some(condition.routing_page_id()),
            condition.check_page_id(),
            condition.goto_page_id(),
        ];
        for page_id in refs.into_iter().flatten() {
            if self.page(page_id).is_none() {
                return Err(FormIntegrityError::DanglingPageRef {
                    condition_id: condition.condition_id(),
                    page_id,
                });
            }
        }
        Ok(())
    }
}

/// What a page deletion removed, for the host's audit/reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRemoval {
    pub page: Page,
    pub removed_conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormIntegrityError {
    Shape(ConditionShapeError),
    DanglingPageRef { condition_id: ConditionId, page_id: PageId },
    DuplicatePageId { page_id: PageId },
    DuplicateExitPage { routing_page_id: PageId },
}

impl fmt::Display for FormIntegrityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shape(error) => fmt::Display::fmt(error, f),
            Self::DanglingPageRef { condition_id, page_id } => {
                write!(f, "condition {condition_id} references missing page {page_id}")
            }
            Self::DuplicatePageId { page_id } => {
                write!(f, "page id {page_id} appears more than once")
            }
            Self::DuplicateExitPage { routing_page_id } => {
                write!(f, "page {routing_page_id} already carries an exit page condition")
            }
        }
    }
}

impl std::error::Error for FormIntegrityError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Shape(error) => Some(error),
            _ => None,
        }
    }
}

impl From<ConditionShapeError> for FormIntegrityError {
    fn from(error: ConditionShapeError) -> Self {
        Self::Shape(error)
    }
}

#[cfg(test)]
mod tests {
    use super::{Form, FormIntegrityError};
    use crate::model::{
        AnswerSettingsRecord, AnswerType, ConditionId, ConditionRecord, FormId, PageId,
        PageRecord,
    };

    fn page_record(id: i64, position: u32, question: &str) -> PageRecord {
        PageRecord {
            page_id: PageId::new(id),
            position,
            question_text: question.to_owned(),
            answer_type: AnswerType::Selection,
            answer_settings: AnswerSettingsRecord {
                only_one_option: true,
                selection_options: vec!["Yes".to_owned(), "No".to_owned()],
            },
            is_optional: false,
        }
    }

    fn branch_record(id: i64, routing: i64, answer: &str, goto: i64) -> ConditionRecord {
        ConditionRecord {
            condition_id: ConditionId::new(id),
            routing_page_id: PageId::new(routing),
            check_page_id: Some(PageId::new(routing)),
            answer_value: Some(answer.to_owned()),
            goto_page_id: Some(PageId::new(goto)),
            skip_to_end: false,
            exit_page_heading: None,
            exit_page_markdown: None,
        }
    }

    fn three_page_form() -> Form {
        Form::from_records(
            FormId::new(1),
            "Apply for a licence",
            vec![
                page_record(10, 1, "Do you have a licence?"),
                page_record(20, 2, "Which licence type?"),
                page_record(30, 3, "Anything else?"),
            ],
            vec![branch_record(1, 10, "No", 30)],
        )
        .expect("form")
    }

    #[test]
    fn from_records_sorts_by_stored_position_and_renumbers() {
        let form = Form::from_records(
            FormId::new(1),
            "gappy",
            vec![
                page_record(30, 7, "third"),
                page_record(10, 2, "first"),
                page_record(20, 4, "second"),
            ],
            vec![],
        )
        .expect("form");

        let order: Vec<(i64, u32)> = form
            .pages()
            .iter()
            .map(|page| (page.page_id().value(), page.position()))
            .collect();
        assert_eq!(order, vec![(10, 1), (20, 2), (30, 3)]);
    }

    #[test]
    fn from_records_rejects_duplicate_page_ids() {
        let result = Form::from_records(
            FormId::new(1),
            "dup",
            vec![page_record(10, 1, "one"), page_record(10, 2, "one again")],
            vec![],
        );
        assert_eq!(
            result,
            Err(FormIntegrityError::DuplicatePageId { page_id: PageId::new(10) })
        );
    }

    #[test]
    fn from_records_rejects_conditions_referencing_missing_pages() {
        let result = Form::from_records(
            FormId::new(1),
            "dangling",
            vec![page_record(10, 1, "one"), page_record(20, 2, "two")],
            vec![branch_record(1, 10, "Yes", 99)],
        );
        assert_eq!(
            result,
            Err(FormIntegrityError::DanglingPageRef {
                condition_id: ConditionId::new(1),
                page_id: PageId::new(99),
            })
        );
    }

    fn exit_record(id: i64, routing: i64, answer: &str) -> ConditionRecord {
        ConditionRecord {
            condition_id: ConditionId::new(id),
            routing_page_id: PageId::new(routing),
            check_page_id: Some(PageId::new(routing)),
            answer_value: Some(answer.to_owned()),
            goto_page_id: None,
            skip_to_end: false,
            exit_page_heading: Some("Not eligible".to_owned()),
            exit_page_markdown: Some("You cannot continue.".to_owned()),
        }
    }

    #[test]
    fn a_page_carries_at_most_one_exit_page_condition() {
        // One synthetic exit node exists per page; a second exit edge
        // would collide with it.
        let result = Form::from_records(
            FormId::new(1),
            "double exit",
            vec![page_record(10, 1, "one"), page_record(20, 2, "two")],
            vec![exit_record(1, 10, "Yes"), exit_record(2, 10, "No")],
        );
        assert_eq!(
            result,
            Err(FormIntegrityError::DuplicateExitPage { routing_page_id: PageId::new(10) })
        );

        let mut form = Form::from_records(
            FormId::new(2),
            "single exit",
            vec![page_record(10, 1, "one"), page_record(20, 2, "two")],
            vec![exit_record(1, 10, "Yes")],
        )
        .expect("form");
        let second = crate::model::Condition::from_record(exit_record(2, 10, "No"))
            .expect("classify");
        assert_eq!(
            form.push_condition(second),
            Err(FormIntegrityError::DuplicateExitPage { routing_page_id: PageId::new(10) })
        );

        // A branch alongside the exit edge is still fine.
        let branch = crate::model::Condition::from_record(branch_record(3, 10, "Maybe", 20))
            .expect("classify");
        form.push_condition(branch).expect("attach");
    }

    #[test]
    fn next_page_walks_the_sequence_and_ends_at_the_last_page() {
        let form = three_page_form();
        assert_eq!(
            form.next_page(PageId::new(10)).map(|p| p.page_id()),
            Some(PageId::new(20))
        );
        assert_eq!(
            form.next_page(PageId::new(20)).map(|p| p.page_id()),
            Some(PageId::new(30))
        );
        assert_eq!(form.next_page(PageId::new(30)).map(|p| p.page_id()), None);
        assert!(form.is_last_page(PageId::new(30)));
    }

    #[test]
    fn branch_hosting_requires_a_following_page() {
        let form = three_page_form();
        assert!(form.can_host_branch(PageId::new(10)));
        assert!(form.can_host_branch(PageId::new(20)));
        // Selection question, but nothing after it to branch over.
        assert!(!form.can_host_branch(PageId::new(30)));
    }

    #[test]
    fn deleting_a_page_cascades_to_conditions_referencing_it() {
        // Condition 1 targets page 30; deleting 30 must destroy it.
        let mut form = three_page_form();
        let removal = form.delete_page(PageId::new(30)).expect("removal");

        assert_eq!(removal.page.page_id(), PageId::new(30));
        assert_eq!(removal.removed_conditions.len(), 1);
        assert_eq!(
            removal.removed_conditions[0].condition_id(),
            ConditionId::new(1)
        );
        assert!(form.conditions().is_empty());

        let positions: Vec<u32> = form.pages().iter().map(|page| page.position()).collect();
        assert_eq!(positions, vec![1, 2]);
    }

    #[test]
    fn deleting_the_routing_page_destroys_its_outgoing_conditions() {
        let mut form = three_page_form();
        let removal = form.delete_page(PageId::new(10)).expect("removal");
        assert_eq!(removal.removed_conditions.len(), 1);
        assert!(form.conditions().is_empty());
    }

    #[test]
    fn deleting_an_unreferenced_page_keeps_conditions() {
        let mut form = three_page_form();
        let removal = form.delete_page(PageId::new(20)).expect("removal");
        assert!(removal.removed_conditions.is_empty());
        assert_eq!(form.conditions().len(), 1);
    }

    #[test]
    fn delete_page_returns_none_for_unknown_pages() {
        let mut form = three_page_form();
        assert!(form.delete_page(PageId::new(99)).is_none());
        assert_eq!(form.pages().len(), 3);
    }

    #[test]
    fn push_page_appends_at_the_end_regardless_of_stored_position() {
        let mut form = three_page_form();
        form.push_page(page_record(40, 1, "newcomer")).expect("push");

        let last = form.last_page().expect("last");
        assert_eq!(last.page_id(), PageId::new(40));
        assert_eq!(last.position(), 4);
    }

    #[test]
    fn form_loads_from_json_records() {
        let pages: Vec<PageRecord> = serde_json::from_str(
            r#"[
                {"page_id": 1, "position": 1, "question_text": "Are you over 18?",
                 "answer_type": "selection",
                 "answer_settings": {"only_one_option": true, "selection_options": ["Yes", "No"]}},
                {"page_id": 2, "position": 2, "question_text": "Contact email",
                 "answer_type": "email"}
            ]"#,
        )
        .expect("pages");
        let conditions: Vec<ConditionRecord> = serde_json::from_str(
            r#"[
                {"condition_id": 5, "routing_page_id": 1, "check_page_id": 1,
                 "answer_value": "No", "skip_to_end": true}
            ]"#,
        )
        .expect("conditions");

        let form =
            Form::from_records(FormId::new(7), "age gate", pages, conditions).expect("form");
        assert_eq!(form.pages().len(), 2);
        assert_eq!(form.conditions().len(), 1);
        assert!(form.has_routing_condition(PageId::new(1)));
    }
}
