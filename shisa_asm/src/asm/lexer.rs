use log::debug;
use shisa_isa::isa::{Opcode, NREGS};

use super::error::{AsmError, Report};
use super::lexem::{Lexem, LexemKind};

/// Split the source into tokens. Whitespace separates tokens, `:` is a
/// token of its own, every line ends in a `Newline` token. Unrecognized
/// words are reported and skipped.
pub(crate) fn lex(source: &str, report: &mut Report) -> Vec<Lexem> {
    let mut lexems = Vec::new();

    for (number, line) in source.lines().enumerate() {
        let line_number = number + 1;

        for word in line.split_whitespace() {
            let mut buf = String::new();
            for letter in word.chars() {
                if letter == ':' {
                    flush(&mut buf, line_number, &mut lexems, report);
                    lexems.push(Lexem::new(LexemKind::Colon, line_number));
                } else {
                    buf.push(letter);
                }
            }
            flush(&mut buf, line_number, &mut lexems, report);
        }

        lexems.push(Lexem::new(LexemKind::Newline, line_number));
    }

    debug!("lexer produced {} tokens", lexems.len());
    lexems
}

fn flush(buf: &mut String, line: usize, lexems: &mut Vec<Lexem>, report: &mut Report) {
    if buf.is_empty() {
        return;
    }

    match classify(buf) {
        Some(kind) => lexems.push(Lexem::new(kind, line)),
        None => report.push(AsmError::InvalidToken {
            line,
            token: buf.clone(),
        }),
    }

    buf.clear();
}

fn classify(word: &str) -> Option<LexemKind> {
    if let Some(op) = mnemonic(word) {
        return Some(LexemKind::Op(op));
    }

    if let Some(digits) = word.strip_prefix('r') {
        if let Ok(number) = digits.parse::<usize>() {
            if number < NREGS {
                return Some(LexemKind::Reg(number));
            }
            return None;
        }
    }

    if word.chars().all(|c| c.is_ascii_uppercase()) {
        return Some(LexemKind::Mark(word.to_string()));
    }

    None
}

fn mnemonic(word: &str) -> Option<Opcode> {
    let op = match word {
        "add" => Opcode::Add,
        "sub" => Opcode::Sub,
        "mul" => Opcode::Mul,
        "div" => Opcode::Div,
        "and" => Opcode::And,
        "or" => Opcode::Or,
        "xor" => Opcode::Xor,
        "not" => Opcode::Not,
        "cmp" => Opcode::Cmp,
        "jtr" => Opcode::Jtr,
        "ld" => Opcode::Ld,
        "st" => Opcode::St,
        "push" => Opcode::Push,
        "pop" => Opcode::Pop,
        "call" => Opcode::Call,
        "ret" => Opcode::Ret,
        _ => return None,
    };

    Some(op)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_clean(source: &str) -> Vec<LexemKind> {
        let mut report = Report::new();
        let lexems = lex(source, &mut report);
        assert!(report.is_empty(), "unexpected errors: {}", report);

        lexems.into_iter().map(|l| l.kind).collect()
    }

    #[test]
    fn tokenizes_an_instruction_line() {
        assert_eq!(
            lex_clean("add r2 r1 r15"),
            vec![
                LexemKind::Op(Opcode::Add),
                LexemKind::Reg(2),
                LexemKind::Reg(1),
                LexemKind::Reg(15),
                LexemKind::Newline,
            ]
        );
    }

    #[test]
    fn tokenizes_a_label_definition() {
        assert_eq!(
            lex_clean("LOOP:"),
            vec![
                LexemKind::Mark("LOOP".to_string()),
                LexemKind::Colon,
                LexemKind::Newline,
            ]
        );
    }

    #[test]
    fn every_line_gets_a_newline_token() {
        let kinds = lex_clean("ret\nret");
        assert_eq!(
            kinds,
            vec![
                LexemKind::Op(Opcode::Ret),
                LexemKind::Newline,
                LexemKind::Op(Opcode::Ret),
                LexemKind::Newline,
            ]
        );
    }

    #[test]
    fn bad_tokens_are_collected_with_their_lines() {
        let mut report = Report::new();
        lex("add r2 r1 r1\nbogus r16\n", &mut report);

        assert_eq!(
            report.errors(),
            &[
                AsmError::InvalidToken {
                    line: 2,
                    token: "bogus".to_string(),
                },
                AsmError::InvalidToken {
                    line: 2,
                    token: "r16".to_string(),
                },
            ]
        );
    }

    #[test]
    fn lowercase_words_are_not_labels() {
        let mut report = Report::new();
        lex("loop:", &mut report);

        assert_eq!(report.errors().len(), 1);
    }
}
