// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Undine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Undine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{BranchTarget, ConditionKind, Form, PageId};

/// Label of the `end` terminal node.
pub const END_NODE_LABEL: &str = "Check your answers before submitting";

/// Render the full page sequence and condition overlay as Graphviz text.
///
/// Rendering is deterministic: nodes in position order (synthetic exit
/// nodes after the pages, in condition definition order), then edges in
/// position/definition order, so rendering the same form twice yields
/// byte-identical text. Two passes are required because edges may
/// reference any node.
///
/// The renderer validates nothing. It assumes the form passed its load
/// checks; a dangling target would be an upstream integrity bug, not
/// something to repair here.
pub fn render_route_graph(form: &Form) -> String {
    let mut out = String::new();
    out.push_str("digraph g {\n");
    out.push_str("  splines=ortho;\n");
    out.push_str("  node [shape=box, rankjustify=min];\n");
    out.push_str("  start[label=Start];\n");
    out.push_str("  end[label=\"");
    out.push_str(END_NODE_LABEL);
    out.push_str("\"];\n");

    // Node pass.
    for page in form.pages() {
        out.push_str("  ");
        push_page_ident(&mut out, page.page_id());
        out.push_str("[label=\"");
        push_escaped(&mut out, &page.display_label());
        out.push_str("\"];\n");
    }
    for condition in form.conditions() {
        if let ConditionKind::ExitPage { markdown, .. } = condition.kind() {
            out.push_str("  ");
            push_exit_ident(&mut out, condition.routing_page_id());
            out.push_str("[label=\"");
            push_escaped(&mut out, markdown);
            out.push_str("\"];\n");
        }
    }

    // Edge pass.
    if let Some(first) = form.pages().first() {
        out.push_str("  start -> ");
        push_page_ident(&mut out, first.page_id());
        out.push_str(";\n");
    }

    for page in form.pages() {
        let page_id = page.page_id();
        let successor = form.next_page(page_id).map(|next| next.page_id());

        let mut routed = false;
        for condition in form.conditions_for_page(page_id) {
            routed = true;
            match condition.kind() {
                ConditionKind::PrimaryBranch { answer_value, target } => {
                    let mut target_ident = String::new();
                    match target {
                        BranchTarget::Page(goto_page_id) => {
                            push_page_ident(&mut target_ident, *goto_page_id);
                        }
                        BranchTarget::EndOfForm => target_ident.push_str("end"),
                    }

                    push_answer_edge(&mut out, page_id, &target_ident, answer_value);
                    push_fallback_edge(&mut out, page_id, successor);

                    // Lay both outcomes out at the same depth.
                    out.push_str("  {rank=same; ");
                    out.push_str(&target_ident);
                    out.push_str("; ");
                    push_successor_ident(&mut out, successor);
                    out.push_str("}\n");
                }
                ConditionKind::ExitPage { answer_value, .. } => {
                    let mut exit_ident = String::new();
                    push_exit_ident(&mut exit_ident, page_id);
                    push_answer_edge(&mut out, page_id, &exit_ident, answer_value);
                    push_fallback_edge(&mut out, page_id, successor);
                }
                ConditionKind::SecondarySkip { goto_page_id } => {
                    // The rejoin edge of a branch: drawn regardless of the
                    // answer, so no label and no rank hint.
                    out.push_str("  ");
                    push_page_ident(&mut out, page_id);
                    out.push_str(" -> ");
                    push_page_ident(&mut out, *goto_page_id);
                    out.push_str(";\n");
                }
            }
        }

        if !routed {
            out.push_str("  ");
            push_page_ident(&mut out, page_id);
            out.push_str(" -> ");
            push_successor_ident(&mut out, successor);
            out.push_str(";\n");
        }
    }

    out.push_str("}\n");
    out
}

fn push_page_ident(out: &mut String, page_id: PageId) {
    let mut buffer = itoa::Buffer::new();
    out.push_str("page_");
    out.push_str(buffer.format(page_id.value()));
}

fn push_exit_ident(out: &mut String, routing_page_id: PageId) {
    let mut buffer = itoa::Buffer::new();
    out.push_str("exit_page_from_page_");
    out.push_str(buffer.format(routing_page_id.value()));
}

fn push_successor_ident(out: &mut String, successor: Option<PageId>) {
    match successor {
        Some(page_id) => push_page_ident(out, page_id),
        None => out.push_str("end"),
    }
}

fn push_answer_edge(out: &mut String, from: PageId, target_ident: &str, answer_value: &str) {
    out.push_str("  ");
    push_page_ident(out, from);
    out.push_str(" -> ");
    out.push_str(target_ident);
    out.push_str(" [xlabel=\"if the answer is '");
    push_escaped(out, answer_value);
    out.push_str("'\"];\n");
}

fn push_fallback_edge(out: &mut String, from: PageId, successor: Option<PageId>) {
    out.push_str("  ");
    push_page_ident(out, from);
    out.push_str(" -> ");
    push_successor_ident(out, successor);
    out.push_str(" [xlabel=\"any other answer\"];\n");
}

fn push_escaped(out: &mut String, label: &str) {
    for ch in label.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(ch),
        }
    }
}
