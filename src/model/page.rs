// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Undine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Undine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::ids::PageId;

/// The answer input type of a page's question.
///
/// Only `Selection` participates in routing (a branch tests a selected
/// answer); the remaining types are carried because they affect page
/// labels and nothing else in this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerType {
    Selection,
    Text,
    Number,
    Date,
    Address,
    Email,
    NationalInsuranceNumber,
    PhoneNumber,
}

impl AnswerType {
    pub fn is_selection(self) -> bool {
        matches!(self, Self::Selection)
    }
}

/// Wire shape of a page as the surrounding CRUD layer submits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub page_id: PageId,
    pub position: u32,
    pub question_text: String,
    pub answer_type: AnswerType,
    #[serde(default)]
    pub answer_settings: AnswerSettingsRecord,
    #[serde(default)]
    pub is_optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnswerSettingsRecord {
    #[serde(default)]
    pub only_one_option: bool,
    #[serde(default)]
    pub selection_options: Vec<String>,
}

/// One question page in a form's ordered sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    page_id: PageId,
    position: u32,
    question_text: String,
    answer_type: AnswerType,
    only_one_option: bool,
    selection_options: Vec<String>,
    is_optional: bool,
}

impl Page {
    pub fn new(
        page_id: PageId,
        position: u32,
        question_text: impl Into<String>,
        answer_type: AnswerType,
    ) -> Self {
        Self {
            page_id,
            position,
            question_text: question_text.into(),
            answer_type,
            only_one_option: false,
            selection_options: Vec::new(),
            is_optional: false,
        }
    }

    pub fn from_record(record: PageRecord) -> Self {
        Self {
            page_id: record.page_id,
            position: record.position,
            question_text: record.question_text,
            answer_type: record.answer_type,
            only_one_option: record.answer_settings.only_one_option,
            selection_options: record.answer_settings.selection_options,
            is_optional: record.is_optional,
        }
    }

    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: u32) {
        self.position = position;
    }

    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    pub fn answer_type(&self) -> AnswerType {
        self.answer_type
    }

    pub fn only_one_option(&self) -> bool {
        self.only_one_option
    }

    pub fn set_only_one_option(&mut self, only_one_option: bool) {
        self.only_one_option = only_one_option;
    }

    pub fn selection_options(&self) -> &[String] {
        &self.selection_options
    }

    pub fn set_selection_options(&mut self, options: Vec<String>) {
        self.selection_options = options;
    }

    pub fn is_optional(&self) -> bool {
        self.is_optional
    }

    pub fn set_optional(&mut self, is_optional: bool) {
        self.is_optional = is_optional;
    }

    /// Whether this page's question can carry a primary branch at all.
    ///
    /// Position in the sequence matters too (the last page has nothing to
    /// branch over); that half of the rule lives on [`super::Form`].
    pub fn supports_branching(&self) -> bool {
        self.answer_type.is_selection()
            && self.only_one_option
            && !self.selection_options.is_empty()
    }

    /// Node label for diagrams and route summaries.
    ///
    /// Optional questions get an "(optional)" suffix unless they are
    /// selection questions, which surface optionality as a "None of the
    /// above" option instead.
    pub fn display_label(&self) -> String {
        if self.is_optional && !self.answer_type.is_selection() {
            let mut label = String::with_capacity(self.question_text.len() + 11);
            label.push_str(&self.question_text);
            label.push_str(" (optional)");
            label
        } else {
            self.question_text.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AnswerSettingsRecord, AnswerType, Page, PageRecord};
    use crate::model::PageId;

    fn selection_page(options: &[&str], only_one_option: bool) -> Page {
        let mut page = Page::new(PageId::new(1), 1, "Where do you live?", AnswerType::Selection);
        page.set_only_one_option(only_one_option);
        page.set_selection_options(options.iter().map(|s| (*s).to_owned()).collect());
        page
    }

    #[test]
    fn page_can_be_built_from_a_record() {
        let record = PageRecord {
            page_id: PageId::new(3),
            position: 2,
            question_text: "What is your name?".to_owned(),
            answer_type: AnswerType::Text,
            answer_settings: AnswerSettingsRecord::default(),
            is_optional: true,
        };

        let page = Page::from_record(record);
        assert_eq!(page.page_id(), PageId::new(3));
        assert_eq!(page.position(), 2);
        assert_eq!(page.question_text(), "What is your name?");
        assert!(page.is_optional());
        assert!(!page.supports_branching());
    }

    #[test]
    fn only_single_answer_selection_pages_support_branching() {
        assert!(selection_page(&["England", "Wales"], true).supports_branching());
        assert!(!selection_page(&["England", "Wales"], false).supports_branching());
        assert!(!selection_page(&[], true).supports_branching());

        let text = Page::new(PageId::new(1), 1, "Name?", AnswerType::Text);
        assert!(!text.supports_branching());
    }

    #[test]
    fn optional_suffix_applies_to_non_selection_pages_only() {
        let mut text = Page::new(PageId::new(1), 1, "Middle name?", AnswerType::Text);
        text.set_optional(true);
        assert_eq!(text.display_label(), "Middle name? (optional)");

        text.set_optional(false);
        assert_eq!(text.display_label(), "Middle name?");

        let mut selection = selection_page(&["Yes", "No"], true);
        selection.set_optional(true);
        assert_eq!(selection.display_label(), "Where do you live?");
    }

    #[test]
    fn page_record_deserializes_with_defaults() {
        let page: PageRecord = serde_json::from_str(
            r#"{
                "page_id": 1,
                "position": 1,
                "question_text": "Do you have a passport?",
                "answer_type": "selection",
                "answer_settings": {"only_one_option": true, "selection_options": ["Yes", "No"]}
            }"#,
        )
        .expect("page record");

        assert!(!page.is_optional);
        assert!(page.answer_settings.only_one_option);
        assert_eq!(page.answer_settings.selection_options.len(), 2);
    }
}
