// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Undine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Undine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::Serialize;

use crate::model::{BranchTarget, Condition, ConditionKind, Form, Page, PageId};

/// Where a route lands, described for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RouteSummary {
    Page { position: u32, question_text: String },
    EndOfForm,
    ExitPage { heading: String },
}

/// One outgoing edge from a page, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteCard {
    pub name: String,
    /// Guard value; `None` for the default and secondary-skip cards.
    pub answer_value: Option<String>,
    pub target: RouteSummary,
}

/// Everything the routes screen shows for one page: conditional cards
/// first in definition order, the default card always last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRoutes {
    pub conditional: Vec<RouteCard>,
    pub default: RouteCard,
}

/// A secondary skip, presented apart from the per-page route cards and
/// keyed by its own source page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecondaryRoute {
    pub routing_page_id: PageId,
    pub card: RouteCard,
}

/// Resolve the routes leaving a page: the primary-branch and exit
/// conditions rooted there, plus the implicit default edge to the next
/// page in position order (or the end of the form for the last page).
///
/// Pure function of the form; returns `None` for an unknown page.
pub fn page_routes(form: &Form, page_id: PageId) -> Option<PageRoutes> {
    let page = form.page(page_id)?;

    let mut conditional = Vec::new();
    for condition in form.conditions_for_page(page_id) {
        let Some(card) = conditional_card(form, condition, conditional.len() + 1) else {
            continue;
        };
        conditional.push(card);
    }

    let default = RouteCard {
        name: "Default route".to_owned(),
        answer_value: None,
        target: default_summary(form, page),
    };

    Some(PageRoutes { conditional, default })
}

/// Every secondary skip in the form, in definition order.
pub fn secondary_skips(form: &Form) -> Vec<SecondaryRoute> {
    form.conditions()
        .iter()
        .filter_map(|condition| match condition.kind() {
            ConditionKind::SecondarySkip { goto_page_id } => Some(SecondaryRoute {
                routing_page_id: condition.routing_page_id(),
                card: RouteCard {
                    name: "Additional route".to_owned(),
                    answer_value: None,
                    target: page_summary(form, *goto_page_id),
                },
            }),
            _ => None,
        })
        .collect()
}

/// True when every page capable of hosting a primary branch already has
/// an outgoing condition, i.e. there is nowhere left to add a route.
pub fn no_remaining_routes(form: &Form) -> bool {
    form.pages()
        .iter()
        .filter(|page| form.can_host_branch(page.page_id()))
        .all(|page| form.has_routing_condition(page.page_id()))
}

fn conditional_card(form: &Form, condition: &Condition, number: usize) -> Option<RouteCard> {
    let (answer_value, target) = match condition.kind() {
        ConditionKind::PrimaryBranch { answer_value, target } => {
            let summary = match target {
                BranchTarget::Page(goto_page_id) => page_summary(form, *goto_page_id),
                BranchTarget::EndOfForm => RouteSummary::EndOfForm,
            };
            (answer_value.clone(), summary)
        }
        ConditionKind::ExitPage { answer_value, heading, .. } => {
            (answer_value.clone(), RouteSummary::ExitPage { heading: heading.clone() })
        }
        // Secondary skips are presented separately.
        ConditionKind::SecondarySkip { .. } => return None,
    };

    Some(RouteCard {
        name: format!("Route {number}"),
        answer_value: Some(answer_value),
        target,
    })
}

fn default_summary(form: &Form, page: &Page) -> RouteSummary {
    match form.next_page(page.page_id()) {
        Some(next) => RouteSummary::Page {
            position: next.position(),
            question_text: next.question_text().to_owned(),
        },
        None => RouteSummary::EndOfForm,
    }
}

fn page_summary(form: &Form, page_id: PageId) -> RouteSummary {
    // Referential integrity is enforced at form load; a condition cannot
    // outlive its target.
    let page = form.page(page_id).expect("condition target exists in the form");
    RouteSummary::Page {
        position: page.position(),
        question_text: page.question_text().to_owned(),
    }
}
