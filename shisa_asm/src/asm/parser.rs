use log::debug;
use shisa_isa::isa::Opcode;

use super::error::{AsmError, Report};
use super::lexem::{Lexem, LexemKind};

/// One parsed statement, still in source terms: labels are unresolved
/// names and operands are register numbers.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Statement {
    /// `op dst srcL srcR`: the three-register arithmetic and logic group.
    Three {
        line: usize,
        op: Opcode,
        dst: usize,
        src_l: usize,
        src_r: usize,
    },

    /// `op rA rB`: the two-register group (`not ld st push pop`). How the
    /// operands map onto instruction fields depends on which fields the
    /// opcode reads; the emitter decides.
    Two {
        line: usize,
        op: Opcode,
        first: usize,
        second: usize,
    },

    /// `jtr reg LABEL`
    Jtr {
        line: usize,
        pred: usize,
        label: String,
    },

    /// `call reg`
    Call { line: usize, target: usize },

    /// `ret`
    Ret { line: usize },

    /// `LABEL:` alone on a line.
    Label { line: usize, name: String },
}

/// Group statements out of the token stream, collecting grammar errors.
/// A broken statement is skipped to its newline and parsing carries on.
pub(crate) fn parse(lexems: &[Lexem], report: &mut Report) -> Vec<Statement> {
    let mut statements = Vec::new();
    let mut pos = 0;

    while pos < lexems.len() {
        let lexem = &lexems[pos];
        match &lexem.kind {
            LexemKind::Newline => pos += 1,

            LexemKind::Op(op) => {
                pos = parse_op(*op, lexems, pos, &mut statements, report);
            }

            LexemKind::Mark(name) => {
                pos = parse_label(name.clone(), lexems, pos, &mut statements, report);
            }

            LexemKind::Reg(r) => {
                report.push(AsmError::UnexpectedToken {
                    line: lexem.line,
                    token: format!("r{}", r),
                });
                pos = skip_to_newline(lexems, pos);
            }

            LexemKind::Colon => {
                report.push(AsmError::UnexpectedToken {
                    line: lexem.line,
                    token: ":".to_string(),
                });
                pos += 1;
            }
        }
    }

    debug!("parser produced {} statements", statements.len());
    statements
}

fn parse_op(
    op: Opcode,
    lexems: &[Lexem],
    pos: usize,
    statements: &mut Vec<Statement>,
    report: &mut Report,
) -> usize {
    let line = lexems[pos].line;
    let (operands, next) = operand_slice(lexems, pos);

    match op {
        Opcode::Add
        | Opcode::Sub
        | Opcode::Mul
        | Opcode::Div
        | Opcode::And
        | Opcode::Or
        | Opcode::Xor
        | Opcode::Cmp => {
            if let Some([dst, src_l, src_r]) = registers::<3>(op, line, operands, report) {
                statements.push(Statement::Three {
                    line,
                    op,
                    dst,
                    src_l,
                    src_r,
                });
            }
        }

        Opcode::Not | Opcode::Ld | Opcode::St | Opcode::Push | Opcode::Pop => {
            if let Some([first, second]) = registers::<2>(op, line, operands, report) {
                statements.push(Statement::Two {
                    line,
                    op,
                    first,
                    second,
                });
            }
        }

        Opcode::Jtr => match operands {
            [reg, mark] => match (&reg.kind, &mark.kind) {
                (LexemKind::Reg(pred), LexemKind::Mark(label)) => {
                    statements.push(Statement::Jtr {
                        line,
                        pred: *pred,
                        label: label.clone(),
                    });
                }
                _ => report.push(AsmError::InvalidOperands {
                    line,
                    mnemonic: mnemonic_of(op),
                }),
            },
            _ => report.push(arity_error(op, line, operands.len(), 2)),
        },

        Opcode::Call => match operands {
            [reg] => match &reg.kind {
                LexemKind::Reg(target) => {
                    statements.push(Statement::Call {
                        line,
                        target: *target,
                    });
                }
                _ => report.push(AsmError::InvalidOperands {
                    line,
                    mnemonic: mnemonic_of(op),
                }),
            },
            _ => report.push(arity_error(op, line, operands.len(), 1)),
        },

        Opcode::Ret => {
            if operands.is_empty() {
                statements.push(Statement::Ret { line });
            } else {
                report.push(AsmError::TooManyOperands {
                    line,
                    mnemonic: mnemonic_of(op),
                });
            }
        }
    }

    next
}

fn parse_label(
    name: String,
    lexems: &[Lexem],
    pos: usize,
    statements: &mut Vec<Statement>,
    report: &mut Report,
) -> usize {
    let line = lexems[pos].line;

    let colon = lexems.get(pos + 1).map(|l| &l.kind) == Some(&LexemKind::Colon);
    let terminated = matches!(
        lexems.get(pos + 2).map(|l| &l.kind),
        None | Some(LexemKind::Newline)
    );

    if colon && terminated {
        statements.push(Statement::Label { line, name });
        pos + 3
    } else {
        report.push(AsmError::UnexpectedToken { line, token: name });
        skip_to_newline(lexems, pos)
    }
}

/// The tokens between an opcode and its newline, plus the position just
/// past that newline.
fn operand_slice(lexems: &[Lexem], pos: usize) -> (&[Lexem], usize) {
    let start = pos + 1;
    let mut end = start;
    while end < lexems.len() && lexems[end].kind != LexemKind::Newline {
        end += 1;
    }

    (&lexems[start..end], (end + 1).min(lexems.len()))
}

/// Expect exactly `N` register operands.
fn registers<const N: usize>(
    op: Opcode,
    line: usize,
    operands: &[Lexem],
    report: &mut Report,
) -> Option<[usize; N]> {
    if operands.len() != N {
        report.push(arity_error(op, line, operands.len(), N));
        return None;
    }

    let mut regs = [0; N];
    for (slot, lexem) in regs.iter_mut().zip(operands) {
        match lexem.kind {
            LexemKind::Reg(r) => *slot = r,
            _ => {
                report.push(AsmError::InvalidOperands {
                    line,
                    mnemonic: mnemonic_of(op),
                });
                return None;
            }
        }
    }

    Some(regs)
}

fn arity_error(op: Opcode, line: usize, got: usize, expected: usize) -> AsmError {
    let mnemonic = mnemonic_of(op);
    if got < expected {
        AsmError::TooFewOperands { line, mnemonic }
    } else {
        AsmError::TooManyOperands { line, mnemonic }
    }
}

fn skip_to_newline(lexems: &[Lexem], mut pos: usize) -> usize {
    while pos < lexems.len() && lexems[pos].kind != LexemKind::Newline {
        pos += 1;
    }

    pos
}

pub(crate) fn mnemonic_of(op: Opcode) -> &'static str {
    match op {
        Opcode::Add => "add",
        Opcode::Sub => "sub",
        Opcode::Mul => "mul",
        Opcode::Div => "div",
        Opcode::And => "and",
        Opcode::Or => "or",
        Opcode::Xor => "xor",
        Opcode::Not => "not",
        Opcode::Cmp => "cmp",
        Opcode::Jtr => "jtr",
        Opcode::Ld => "ld",
        Opcode::St => "st",
        Opcode::Push => "push",
        Opcode::Pop => "pop",
        Opcode::Call => "call",
        Opcode::Ret => "ret",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asm::lexer;

    fn parse_clean(source: &str) -> Vec<Statement> {
        let mut report = Report::new();
        let lexems = lexer::lex(source, &mut report);
        let statements = parse(&lexems, &mut report);
        assert!(report.is_empty(), "unexpected errors: {}", report);

        statements
    }

    fn parse_errors(source: &str) -> Vec<AsmError> {
        let mut report = Report::new();
        let lexems = lexer::lex(source, &mut report);
        parse(&lexems, &mut report);

        report.errors().to_vec()
    }

    #[test]
    fn parses_each_statement_form() {
        let statements = parse_clean("add r2 r1 r1\nld r3 r2\njtr r3 DONE\ncall r4\nret\nDONE:\n");

        assert_eq!(
            statements,
            vec![
                Statement::Three {
                    line: 1,
                    op: Opcode::Add,
                    dst: 2,
                    src_l: 1,
                    src_r: 1,
                },
                Statement::Two {
                    line: 2,
                    op: Opcode::Ld,
                    first: 3,
                    second: 2,
                },
                Statement::Jtr {
                    line: 3,
                    pred: 3,
                    label: "DONE".to_string(),
                },
                Statement::Call { line: 4, target: 4 },
                Statement::Ret { line: 5 },
                Statement::Label {
                    line: 6,
                    name: "DONE".to_string(),
                },
            ]
        );
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse_clean("\n\nret\n\n").len(), 1);
    }

    #[test]
    fn arity_errors_name_the_mnemonic() {
        assert_eq!(
            parse_errors("add r2 r1\n"),
            vec![AsmError::TooFewOperands {
                line: 1,
                mnemonic: "add",
            }]
        );
        assert_eq!(
            parse_errors("ret r2\n"),
            vec![AsmError::TooManyOperands {
                line: 1,
                mnemonic: "ret",
            }]
        );
    }

    #[test]
    fn operand_kind_mismatches_are_invalid_operands() {
        assert_eq!(
            parse_errors("jtr DONE r2\n"),
            vec![AsmError::InvalidOperands {
                line: 1,
                mnemonic: "jtr",
            }]
        );
    }

    #[test]
    fn one_run_collects_every_error() {
        let errors = parse_errors("add r2 r1\nsub r2\nret\n");
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn a_register_cannot_start_a_statement() {
        assert_eq!(
            parse_errors("r2 r3\n"),
            vec![AsmError::UnexpectedToken {
                line: 1,
                token: "r2".to_string(),
            }]
        );
    }

    #[test]
    fn a_label_needs_its_own_line() {
        let errors = parse_errors("DONE: ret\n");
        assert_eq!(errors.len(), 1);
    }
}
