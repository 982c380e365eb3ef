// Error reporting with Ariadne for compile errors
//
// Syntax errors are rendered by the parser's reporter; everything else gets
// one report labelled at the offending span.

use crate::CodegenError;
use ariadne::{Color, Label, Report, ReportKind, Source};
use std::ops::Range;

fn build_report<'a>(filename: &'a str, error: &CodegenError) -> Report<'a, (&'a str, Range<usize>)> {
    let (code, title, help, label) = match error {
        CodegenError::TypeError {
            expected,
            found,
            context,
            ..
        } => (
            "E102",
            format!("Type Error in {}", context),
            format!("Expected type '{}', but found '{}'", expected, found),
            format!("This expression has type '{}', not '{}'", found, expected),
        ),
        CodegenError::UndefinedSymbol { name, context, .. } => (
            "E103",
            format!("Undefined symbol '{}'", name),
            format!("Symbol '{}' is not defined in {}", name, context),
            format!("'{}' used here but not defined", name),
        ),
        CodegenError::InvalidOperation {
            operation, reason, ..
        } => (
            "E104",
            format!("Invalid operation: {}", operation),
            reason.clone(),
            format!("'{}' cannot be used here", operation),
        ),
        CodegenError::ArgumentCount {
            name,
            expected,
            found,
            ..
        } => (
            "E105",
            format!("Wrong number of arguments to '{}'", name),
            format!("'{}' takes {} arguments", name, expected),
            format!("called with {} arguments here", found),
        ),
        CodegenError::Syntax { message, .. } => (
            "E100",
            message.clone(),
            String::new(),
            String::new(),
        ),
    };

    let span = error.span();
    let report = Report::build(ReportKind::Error, filename, span.as_ref().map_or(0, |s| s.start))
        .with_code(code)
        .with_message(title);
    let report = if help.is_empty() { report } else { report.with_help(help) };
    let report = match span {
        Some(span) if !label.is_empty() => report.with_label(
            Label::new((filename, span))
                .with_message(label)
                .with_color(Color::Red),
        ),
        _ => report,
    };
    report.finish()
}

/// Print `error` as an Ariadne report on stderr
pub fn report_codegen_error(filename: &str, source: &str, error: &CodegenError) {
    if let CodegenError::Syntax { errors, .. } = error {
        parser::error::report_errors(filename, source, errors);
        return;
    }
    let _ = build_report(filename, error).eprint((filename, Source::from(source)));
}

/// Render `error` as an Ariadne report into a string
pub fn render_codegen_error(filename: &str, source: &str, error: &CodegenError) -> String {
    if let CodegenError::Syntax { errors, .. } = error {
        return parser::error::render_errors(filename, source, errors);
    }
    let mut out = Vec::new();
    let _ = build_report(filename, error).write((filename, Source::from(source)), &mut out);
    String::from_utf8_lossy(&out).into_owned()
}
