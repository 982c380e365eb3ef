// Error reporting with Ariadne
//
// This module turns Chumsky errors into readable Ariadne reports.

use ariadne::{Color, Label, Report, ReportKind, Source};
use chumsky::error::{Simple, SimpleReason};
use lexer::token::Token;

/// Type alias for Chumsky parser errors
pub type ParseError = Simple<Token>;

/// One-line description of a parse error, used when no source rendering is wanted
pub fn describe(error: &ParseError) -> String {
    match error.reason() {
        SimpleReason::Custom(msg) => msg.clone(),
        SimpleReason::Unclosed { delimiter, .. } => format!("unclosed delimiter '{}'", delimiter),
        SimpleReason::Unexpected => {
            let found = error
                .found()
                .map(|t| format!("'{}'", t))
                .unwrap_or_else(|| "end of input".to_string());
            let expected: Vec<String> = error.expected().take(5).map(format_expected).collect();
            if expected.is_empty() {
                format!("unexpected {}", found)
            } else {
                format!("unexpected {}, expected {}", found, expected.join(", "))
            }
        }
    }
}

fn build_report<'a>(filename: &'a str, error: &ParseError) -> Report<'a, (&'a str, std::ops::Range<usize>)> {
    let span = error.span();

    let report = Report::build(ReportKind::Error, filename, span.start)
        .with_code("E001")
        .with_message("Parse Error")
        .with_label(
            Label::new((filename, span))
                .with_message(describe(error))
                .with_color(Color::Red),
        );

    // Add expected tokens if available (limit to 5 to avoid overwhelming output)
    let report = if error.expected().len() > 0 {
        let expected: Vec<String> = error.expected().take(5).map(format_expected).collect();

        let help_msg = if error.expected().len() > 5 {
            format!("Expected one of: {}, ...", expected.join(", "))
        } else {
            format!("Expected: {}", expected.join(", "))
        };

        report.with_help(help_msg)
    } else {
        report
    };

    report.finish()
}

/// Prints Chumsky errors as Ariadne reports on stderr
pub fn report_errors(filename: &str, source: &str, errors: &[ParseError]) {
    for error in errors {
        // Writing to stderr only fails if stderr is gone; nothing left to report to then
        let _ = build_report(filename, error).eprint((filename, Source::from(source)));
    }
}

/// Renders Chumsky errors as Ariadne reports into a string (no colors are stripped)
pub fn render_errors(filename: &str, source: &str, errors: &[ParseError]) -> String {
    let mut out = Vec::new();
    for error in errors {
        let _ = build_report(filename, error).write((filename, Source::from(source)), &mut out);
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Format expected token for human-readable output
fn format_expected(token: &Option<Token>) -> String {
    match token {
        Some(Token::Identifier(_)) => "identifier".to_string(),
        Some(Token::Int(_)) => "integer".to_string(),
        Some(Token::Float(_)) => "float".to_string(),
        Some(Token::String(_)) => "string".to_string(),
        Some(t) => format!("'{}'", t),
        None => "end of input".to_string(),
    }
}
