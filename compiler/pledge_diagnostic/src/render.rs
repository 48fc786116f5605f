//! Plain-text diagnostic rendering.
//!
//! Maps byte offsets back to 1-based line:column positions against the
//! original source text and prints the offending line with a caret run.

use crate::Diagnostic;

/// Render a diagnostic against its source text.
///
/// Output shape:
///
/// ```text
/// error[E2001]: Type Wallet already exists
///   --> 3:10
///    |
///  3 | contract Wallet {
///    |          ^^^^^^
/// ```
pub fn render(diagnostic: &Diagnostic, source: &str) -> String {
    let (line, column) = position(source, diagnostic.span.start);
    let mut out = format!(
        "{}[{}]: {}\n  --> {line}:{column}\n",
        diagnostic.severity, diagnostic.code, diagnostic.message
    );

    if let Some(text) = source.lines().nth(line - 1) {
        let gutter = line.to_string();
        let pad = " ".repeat(gutter.len());
        let caret_len = (diagnostic.span.len() as usize).clamp(1, text.len().saturating_sub(column - 1).max(1));
        out.push_str(&format!("{pad} |\n{gutter} | {text}\n{pad} | "));
        out.push_str(&" ".repeat(column - 1));
        out.push_str(&"^".repeat(caret_len));
        out.push('\n');
    }

    for label in &diagnostic.labels {
        let (line, column) = position(source, label.span.start);
        out.push_str(&format!("  note: {} ({line}:{column})\n", label.message));
    }

    out
}

/// 1-based (line, column) of a byte offset.
fn position(source: &str, offset: u32) -> (usize, usize) {
    let offset = (offset as usize).min(source.len());
    let before = &source[..offset];
    let line = before.bytes().filter(|&b| b == b'\n').count() + 1;
    let column = before
        .rfind('\n')
        .map_or(offset + 1, |nl| offset - nl);
    (line, column)
}
