//! Plain-text rendering of query results. Lists keep the order the backend
//! returned them in.

use crate::{ChildHit, ParentContext, QueryResponse};
use std::fmt::Write;

pub const NO_CHILD_HITS: &str = "No child hits yet.";
pub const NO_PARENT_SECTIONS: &str = "No parent sections selected.";

pub fn render_child_header(hit: &ChildHit) -> String {
    let mut header = format!(
        "score {:.3} · parent {} · doc {}",
        hit.score, hit.parent_id, hit.doc_id
    );
    if let Some(title) = hit.title.as_deref().filter(|title| !title.is_empty()) {
        header.push_str(" · ");
        header.push_str(title);
    }
    header
}

pub fn render_parent_header(parent: &ParentContext) -> String {
    let label = parent
        .title
        .as_deref()
        .filter(|title| !title.is_empty())
        .unwrap_or(&parent.parent_id);
    format!(
        "[{}] · doc {} · score {:.3}",
        label, parent.doc_id, parent.score
    )
}

pub fn render_children(children: &[ChildHit]) -> String {
    if children.is_empty() {
        return NO_CHILD_HITS.to_string();
    }

    let mut out = String::new();
    for (index, hit) in children.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{}", render_child_header(hit));
        let _ = writeln!(out, "{}", indent(&hit.snippet));
    }
    out
}

pub fn render_parents(parents: &[ParentContext]) -> String {
    if parents.is_empty() {
        return NO_PARENT_SECTIONS.to_string();
    }

    let mut out = String::new();
    for (index, parent) in parents.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{}", render_parent_header(parent));
        let _ = writeln!(out, "{}", indent(&parent.text));
    }
    out
}

pub fn render_answer(answer: Option<&str>) -> Option<String> {
    answer.map(|answer| format!("Answer\n{}\n", indent(answer)))
}

pub fn render_query_response(response: &QueryResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Query: “{}”\n", response.query);
    let _ = writeln!(out, "Child hits (retrieval units)");
    out.push_str(&terminate(render_children(&response.children)));
    let _ = writeln!(out, "\nParent sections (context for LLM)");
    out.push_str(&terminate(render_parents(&response.parents)));
    if let Some(answer) = render_answer(response.answer.as_deref()) {
        out.push('\n');
        out.push_str(&answer);
    }
    out
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn terminate(mut block: String) -> String {
    if !block.ends_with('\n') {
        block.push('\n');
    }
    block
}
