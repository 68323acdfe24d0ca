mod error;
mod lexem;
mod lexer;
mod parser;
mod resolver;

pub use error::{AsmError, Report};
pub use lexem::{Lexem, LexemKind};
pub use parser::Statement;
pub use resolver::SCRATCH_REG;

use shisa_isa::isa::Binary;

/// Translate assembly source into a loadable binary.
///
/// All three passes collect their complaints into one report; assembly
/// fails if any pass found a problem.
pub fn assemble(source: &str) -> Result<Binary, Report> {
    let mut report = Report::new();

    let lexems = lexer::lex(source, &mut report);
    let statements = parser::parse(&lexems, &mut report);
    let binary = resolver::emit(&statements, &mut report);

    if report.is_empty() {
        Ok(binary)
    } else {
        Err(report)
    }
}
