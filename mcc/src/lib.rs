//! Mini-C to RV32IMF assembly compiler.
//!
//! ```
//! let asm = mcc::compile("var int x; x = 1; println(x); end.").unwrap();
//! assert!(asm.contains("li a7, 1"));
//! ```

pub mod codegen;
pub mod error;
pub mod grammer;
pub mod options;
pub mod symbols;

pub use error::{Error, ErrorKind};
pub use options::Options;

use codegen::program::Program;
use grammer::lexer::Lexer;
use grammer::parsercore::Parser;
use symbols::SymbolTable;

/// Result of one compilation.
#[derive(Debug)]
pub struct Unit {
    pub program: Program,
    pub symbols: SymbolTable,
}

impl Unit {
    pub fn assembly(&self) -> String {
        self.program.to_string()
    }
}

/// Compile `source` with default options.
pub fn compile(source: &str) -> Result<String, Error> {
    compile_with(source, &Options::default())
}

pub fn compile_with(source: &str, options: &Options) -> Result<String, Error> {
    Ok(compile_unit(source, options)?.assembly())
}

/// Compile `source`, keeping the program and symbol table for inspection.
pub fn compile_unit(source: &str, options: &Options) -> Result<Unit, Error> {
    Parser::new(Lexer::new(source), options).parse()
}
