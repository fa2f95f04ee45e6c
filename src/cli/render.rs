//! Plain-text rendering of controller results for the terminal.

use crate::backend::DocumentRecord;
use crate::controller::{ControllerState, UploadOutcome, UploadReport};
use std::fmt::Write as _;
use time::OffsetDateTime;
use time::macros::format_description;

/// Render an upload time as `YYYY-MM-DD HH:MM UTC`.
pub fn timestamp(value: OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute] UTC");
    value
        .to_offset(time::UtcOffset::UTC)
        .format(&format)
        .unwrap_or_else(|_| value.to_string())
}

/// One document per line, marking selected ones.
pub fn document_line(document: &DocumentRecord, selected: bool) -> String {
    let marker = if selected { "[x]" } else { "[ ]" };
    let mut line = format!(
        "{marker} {}  {}  {}",
        document.id,
        document.filename,
        timestamp(document.uploaded_at)
    );
    if let Some(case_id) = &document.case_id {
        let _ = write!(line, "  case {case_id}");
    }
    line
}

/// Document list with the current selection marked.
pub fn document_list(state: &ControllerState) -> String {
    if state.documents().is_empty() {
        return "No documents.".to_string();
    }
    state
        .documents()
        .iter()
        .map(|document| document_line(document, state.selection().contains(&document.id)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Per-file outcomes followed by the batch warning, if any.
pub fn upload_report(report: &UploadReport) -> String {
    let mut out = String::new();
    for outcome in &report.outcomes {
        match outcome {
            UploadOutcome::Success { id, filename, .. } => {
                let _ = writeln!(out, "uploaded {filename} as {id}");
            }
            UploadOutcome::Failure { filename, reason } => {
                let _ = writeln!(out, "failed   {filename}: {reason}");
            }
        }
    }
    if let Some(message) = report.message() {
        out.push_str(message);
    } else {
        out.pop();
    }
    out
}

/// Summary of what the controller currently holds.
pub fn state_overview(state: &ControllerState) -> String {
    let mut out = String::new();
    let selection = state.selection();
    let _ = writeln!(
        out,
        "selected ({}): {}",
        selection.len(),
        if selection.is_empty() {
            "-".to_string()
        } else {
            selection.ids().join(", ")
        }
    );
    if let Some(filter) = state.case_filter() {
        let _ = writeln!(out, "case filter: {filter}");
    }
    if !state.staged_files().is_empty() {
        let names: Vec<&str> = state
            .staged_files()
            .iter()
            .map(|file| file.filename.as_str())
            .collect();
        let _ = writeln!(out, "staged: {}", names.join(", "));
    }
    if !state.case_tag().is_empty() {
        let _ = writeln!(out, "upload case: {}", state.case_tag());
    }
    let _ = writeln!(out, "summary style: {}", state.summary_style());
    if let Some(summary) = state.summary() {
        let _ = writeln!(out, "summary ({}):\n{}", summary.style, summary.text);
    }
    if let Some(answer) = state.chat_answer() {
        let _ = writeln!(out, "answer:\n{}", answer.text);
    }
    if let Some(error) = state.error() {
        let _ = writeln!(out, "error: {error}");
    }
    out.pop();
    out
}
