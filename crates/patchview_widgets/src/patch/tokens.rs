//! Statement assembly and tokenization
//!
//! Patch files are line oriented, but long statements are wrapped over
//! several physical lines by the editor that writes them. A line that does
//! not end in `;` is continued by following lines until one of them starts
//! a new record (`#X`, `#N`, `#A`) or closes the statement.

use smallvec::SmallVec;

/// Tokens of one statement; most declarations fit inline
pub type Tokens<'a> = SmallVec<[&'a str; 24]>;

/// Statement terminator
pub const TERMINATOR: char = ';';

/// Record prefixes that always start a new statement
const RECORD_PREFIXES: [&str; 3] = ["#X", "#N", "#A"];

/// One logical statement and the physical line it starts on (1-based)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub line: usize,
    pub text: String,
}

/// Split source text into statements, joining wrapped lines
pub fn statements(source: &str) -> Vec<Statement> {
    let mut out: Vec<Statement> = Vec::new();
    let mut open = false;

    for (index, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            open = false;
            continue;
        }

        let starts_record = line
            .split_ascii_whitespace()
            .next()
            .is_some_and(|first| RECORD_PREFIXES.contains(&first));

        match out.last_mut() {
            Some(current) if open && !starts_record => {
                current.text.push(' ');
                current.text.push_str(line);
            }
            _ => out.push(Statement {
                line: index + 1,
                text: line.to_string(),
            }),
        }

        open = !line.ends_with(TERMINATOR);
    }

    out
}

/// Split a statement on whitespace, collapsing runs, and strip the
/// terminator from the final token (dropping it if nothing is left)
pub fn tokenize(statement: &str) -> Tokens<'_> {
    let mut tokens: Tokens<'_> = statement.split_ascii_whitespace().collect();
    if let Some(last) = tokens.pop() {
        let last = last.trim_end_matches(TERMINATOR);
        if !last.is_empty() {
            tokens.push(last);
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_collapses_and_strips() {
        let tokens = tokenize("#X  obj 10   20 tgl 15;");
        assert_eq!(tokens.as_slice(), &["#X", "obj", "10", "20", "tgl", "15"]);

        let tokens = tokenize("#X obj 1 2 bng ;");
        assert_eq!(tokens.as_slice(), &["#X", "obj", "1", "2", "bng"]);

        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_statements_join_wrapped_lines() {
        let source = "#N canvas 0 0 450 300 12;\n\
                      #X obj 10 10 hsl 128 15 0 127 0 0 s r empty -2 -8 0 10\n\
                      #fcfcfc #000000 #000000 0 1;\n\
                      #X obj 1 2 tgl 15 0 a b empty 17 7 0 10 #fcfcfc #000000 #000000 0 1;\n";
        let stmts = statements(source);

        assert_eq!(stmts.len(), 3);
        assert_eq!(stmts[1].line, 2);
        assert!(stmts[1].text.ends_with("#000000 0 1;"));
        assert_eq!(stmts[2].line, 4);
    }

    #[test]
    fn test_unterminated_lines_do_not_swallow_records() {
        let source = "#X obj 20 30 tgl 20 0 s1 r1 empty\n#X obj 5 5 bng 15\n";
        let stmts = statements(source);
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[1].line, 2);
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let stmts = statements("#X obj 1 1 tgl 15\r\n\r\n  \n#X obj 2 2 tgl 15;\r\n");
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0].text, "#X obj 1 1 tgl 15");
        assert_eq!(stmts[1].line, 4);
    }
}
