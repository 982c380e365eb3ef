// Test module for lexer
//
// Tests are organized by category: numbers, strings, operators and keywords,
// and odd inputs.
