//! Parser for parameter files.

use super::ast::*;
use super::lexer::{parse_value, Lexer, Token, TokenKind};
use crate::error::{Result, ZvsError};

/// Parser for parameter files.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parse the entire file.
    pub fn parse(&mut self) -> Result<ParameterAst> {
        let mut ast = ParameterAst::new();

        while self.current.kind != TokenKind::Eof {
            // Skip empty lines
            if self.current.kind == TokenKind::Newline {
                self.advance()?;
                continue;
            }

            match self.current.kind {
                TokenKind::Identifier => {
                    let assignment = self.parse_assignment()?;
                    ast.assignments.push(assignment);
                }
                _ => {
                    return Err(ZvsError::parse(
                        self.current.line,
                        format!("expected a parameter name, got {:?}", self.current.text),
                    ));
                }
            }

            match self.current.kind {
                TokenKind::Newline => self.advance()?,
                TokenKind::Eof => {}
                _ => {
                    return Err(ZvsError::parse(
                        self.current.line,
                        format!("unexpected token after value: {:?}", self.current.text),
                    ));
                }
            }
        }

        Ok(ast)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            let tok = self.current.clone();
            self.advance()?;
            Ok(tok)
        } else {
            Err(ZvsError::parse(
                self.current.line,
                format!("expected {:?}, got {:?}", kind, self.current.kind),
            ))
        }
    }

    /// `name [=] value`
    fn parse_assignment(&mut self) -> Result<Assignment> {
        let name = self.expect(TokenKind::Identifier)?;

        if self.current.kind == TokenKind::Equals {
            self.advance()?;
        }

        let number = self.expect(TokenKind::Number)?;
        let value = parse_value(&number.text).ok_or_else(|| {
            ZvsError::parse(number.line, format!("invalid number '{}'", number.text))
        })?;

        Ok(Assignment {
            name: name.text,
            value,
            line: name.line,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignments() {
        let input = "L1 = 0.1\nL2 100u\n\nC=10n";
        let ast = super::super::parse(input).unwrap();
        assert_eq!(ast.assignments.len(), 3);
        assert_eq!(ast.assignments[0].name, "L1");
        assert_eq!(ast.assignments[0].value, 0.1);
        assert_eq!(ast.assignments[1].line, 2);
        assert_eq!(ast.assignments[2].name, "C");
        assert_eq!(ast.assignments[2].line, 4);
    }

    #[test]
    fn test_parse_with_comments() {
        let input = "# driver\nV = 12 ; supply\n";
        let ast = super::super::parse(input).unwrap();
        assert_eq!(ast.assignments.len(), 1);
        assert_eq!(ast.assignments[0].value, 12.0);
    }

    #[test]
    fn test_missing_value() {
        let err = super::super::parse("V =\nC = 1n").unwrap_err();
        assert!(matches!(err, ZvsError::ParseError { line: 1, .. }));
    }

    #[test]
    fn test_trailing_garbage() {
        let err = super::super::parse("V = 12 volts").unwrap_err();
        assert!(matches!(err, ZvsError::ParseError { line: 1, .. }));
    }

    #[test]
    fn test_line_starting_with_number() {
        let err = super::super::parse("L1 = 1\n12").unwrap_err();
        assert!(matches!(err, ZvsError::ParseError { line: 2, .. }));
    }
}
