//! Type expressions as they appear in declarations.
//!
//! Grammar:
//!
//! ```text
//! type       := name type-args? ('[' ']')*
//! type-args  := '<' type (',' type)* '>'
//! type-param := name ('extends' type)?
//! name       := [A-Za-z0-9_$.?]+
//! ```
//!
//! Expressions are parsed into an interner-independent [`TypeExpr`] first;
//! the builder resolves names against type-parameter scopes afterwards.

use crate::error::HierarchyError;
use xlat_common::limits::MAX_TYPE_ARGUMENT_DEPTH;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeExpr {
    Named { name: String, args: Vec<TypeExpr> },
    Array(Box<TypeExpr>),
}

impl TypeExpr {
    /// The name at the root of the expression, ignoring array dimensions.
    pub fn leaf_name(&self) -> &str {
        match self {
            TypeExpr::Named { name, .. } => name,
            TypeExpr::Array(component) => component.leaf_name(),
        }
    }
}

pub fn parse_type_expr(src: &str) -> Result<TypeExpr, HierarchyError> {
    let mut parser = Parser::new(src);
    let ty = parser.parse_type(0)?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(ty)
}

/// Parse `T` or `T extends Bound`.
pub fn parse_type_param(src: &str) -> Result<(String, Option<TypeExpr>), HierarchyError> {
    let mut parser = Parser::new(src);
    parser.skip_ws();
    let name = parser.parse_name()?;
    parser.skip_ws();
    if parser.at_end() {
        return Ok((name, None));
    }
    if !parser.eat_keyword("extends") {
        return Err(parser.error("expected 'extends'"));
    }
    let bound = parser.parse_type(0)?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok((name, Some(bound)))
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Parser { src, pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn skip_ws(&mut self) {
        while let Some(ch) = self.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.pos += ch.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        self.skip_ws();
        let rest = &self.src[self.pos..];
        if rest.starts_with(keyword)
            && rest[keyword.len()..]
                .chars()
                .next()
                .is_none_or(char::is_whitespace)
        {
            self.pos += keyword.len();
            true
        } else {
            false
        }
    }

    fn error(&self, reason: &str) -> HierarchyError {
        HierarchyError::InvalidTypeExpression {
            expr: self.src.to_string(),
            reason: format!("{reason} at offset {}", self.pos),
        }
    }

    fn parse_name(&mut self) -> Result<String, HierarchyError> {
        self.skip_ws();
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || matches!(ch, '_' | '$' | '.' | '?') {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
        if start == self.pos {
            return Err(self.error("expected a type name"));
        }
        Ok(self.src[start..self.pos].to_string())
    }

    fn parse_type(&mut self, depth: usize) -> Result<TypeExpr, HierarchyError> {
        if depth > MAX_TYPE_ARGUMENT_DEPTH {
            return Err(self.error("type arguments nested too deeply"));
        }
        let name = self.parse_name()?;
        let mut args = Vec::new();
        if self.eat('<') {
            loop {
                args.push(self.parse_type(depth + 1)?);
                if self.eat(',') {
                    continue;
                }
                if self.eat('>') {
                    break;
                }
                return Err(self.error("expected ',' or '>'"));
            }
        }
        let mut ty = TypeExpr::Named { name, args };
        while self.eat('[') {
            if !self.eat(']') {
                return Err(self.error("expected ']'"));
            }
            ty = TypeExpr::Array(Box::new(ty));
        }
        Ok(ty)
    }
}

#[cfg(test)]
#[path = "tests/type_expr_tests.rs"]
mod tests;
