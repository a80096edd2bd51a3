//! PHP 5.3 to 7.0 parser producing a position-accurate [`Ast`] with deferred
//! type references.
//!
//! ```
//! let unit = depend_parser::parse("<?php class Foo extends Bar {}").unwrap();
//! assert_eq!(unit.classes()[0].parent.as_deref(), Some("Bar"));
//! ```

pub mod builder;
pub mod decl;
pub mod diagnostics;
pub mod expr;
pub mod interpolation;
pub mod options;
pub mod parser;
pub mod precedence;
pub mod stmt;
pub mod unit;
pub mod version;

use std::sync::Arc;

use depend_ast::{Ast, BuilderContext};
use rayon::prelude::*;

pub use builder::SymbolTable;
pub use diagnostics::{ErrorKind, ParseError};
pub use options::ParserOptions;
pub use unit::CompilationUnit;
pub use version::{Feature, PhpVersion};

/// Parse one source file with default options and a private symbol table.
pub fn parse(source: &str) -> Result<CompilationUnit, ParseError> {
    parse_with(source, &ParserOptions::default(), Arc::new(SymbolTable::new()))
}

/// Parse one source file, registering declared types with `context`.
pub fn parse_with(
    source: &str,
    options: &ParserOptions,
    context: Arc<dyn BuilderContext>,
) -> Result<CompilationUnit, ParseError> {
    log::debug!(
        "parsing {} as PHP {}",
        options.display_name(),
        options.version
    );
    let mut parser = parser::Parser::new(source, options.clone(), context)?;
    parser.parse_compilation_unit()?;
    let ast: Ast = parser.into_ast();
    log::debug!("parsed {}: {} nodes", options.display_name(), ast.len());
    Ok(CompilationUnit::new(ast, options.file_name.clone()))
}

/// Parse many `(file name, source)` pairs in parallel against one shared
/// symbol table. Results keep the input order.
pub fn parse_units(
    units: &[(String, String)],
    options: &ParserOptions,
    symbols: Arc<SymbolTable>,
) -> Vec<Result<CompilationUnit, ParseError>> {
    units
        .par_iter()
        .map(|(file_name, source)| {
            let options = options.clone().with_file_name(file_name.as_str());
            let context: Arc<dyn BuilderContext> = symbols.clone();
            parse_with(source, &options, context)
        })
        .collect()
}
