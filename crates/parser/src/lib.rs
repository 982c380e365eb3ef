pub mod ast;
pub mod parser;
pub mod error;

pub use parser::parse;

#[cfg(test)]
mod tests;
