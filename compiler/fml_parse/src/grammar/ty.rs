//! Type annotation parsing.

use fml_ir::{ParsedType, TokenKind};

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// `int`, `T[]`, `function(T, U) -> R`, or an enum name.
    pub(crate) fn parse_type(&mut self) -> Result<ParsedType, ParseError> {
        let mut ty = match self.cursor.current_kind() {
            TokenKind::IntType => ParsedType::Int,
            TokenKind::FloatType => ParsedType::Float,
            TokenKind::BooleanType => ParsedType::Boolean,
            TokenKind::StringType => ParsedType::String,
            TokenKind::DateType => ParsedType::Date,
            TokenKind::DurationType => ParsedType::Duration,
            TokenKind::VoidType => ParsedType::Void,
            TokenKind::MixedType => ParsedType::Mixed,
            TokenKind::Ident(name) => ParsedType::Named(name),
            TokenKind::Function => return self.parse_function_type(),
            _ => return Err(self.cursor.unexpected("type")),
        };
        self.cursor.advance();

        while self.cursor.check(TokenKind::LBracket)
            && self.cursor.peek_next_kind() == TokenKind::RBracket
        {
            self.cursor.advance();
            self.cursor.advance();
            ty = ParsedType::Array(Box::new(ty));
        }

        Ok(ty)
    }

    fn parse_function_type(&mut self) -> Result<ParsedType, ParseError> {
        self.cursor.expect(TokenKind::Function, "function")?;
        self.cursor.expect(TokenKind::LParen, "\"(\"")?;
        let mut params = Vec::new();
        if !self.cursor.eat(TokenKind::RParen) {
            loop {
                params.push(self.parse_type()?);
                if self.cursor.eat(TokenKind::Comma) {
                    continue;
                }
                self.cursor.expect(TokenKind::RParen, "\")\"")?;
                break;
            }
        }
        self.cursor.expect(TokenKind::Arrow, "\"->\"")?;
        let ret = self.parse_type()?;
        Ok(ParsedType::Function {
            params,
            ret: Box::new(ret),
        })
    }
}
