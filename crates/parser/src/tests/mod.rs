// Test module for parser
//
// Tests are organized by category to cover AST construction, operator
// precedence and error reporting.

mod expr_tests;
mod error_recovery;
