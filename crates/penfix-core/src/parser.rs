//! Recursive-descent PENMAN parser.
//!
//! Grammar:
//!
//! ```text
//! node   := '(' var [ '/' concept ] { role target } ')'
//! target := node | symbol | string
//! ```
//!
//! Hard failures become [`DecodeError`]. Things a lenient reader can live
//! with (missing concept, a variable defined twice, junk after the root) are
//! collected as [`DecodeWarning`]s on the result.
//!
//! Nesting is capped at [`MAX_DEPTH`] so hostile input fails with
//! [`DecodeError::TooDeep`] instead of exhausting the stack.

use std::collections::HashSet;

use crate::error::{DecodeError, DecodeWarning};
use crate::lexer::{tokenize, Token, TokenKind};
use crate::tree::{Atom, Branch, Node, Target, Tree};

/// Deepest node nesting [`decode`] accepts. The root is depth 1.
pub const MAX_DEPTH: usize = 256;

/// A successful decode: the tree plus any warnings raised on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub tree: Tree,
    pub warnings: Vec<DecodeWarning>,
}

/// Decodes PENMAN text into a [`Tree`].
pub fn decode(text: &str) -> Result<Decoded, DecodeError> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(DecodeError::EmptyInput);
    }

    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        defined: HashSet::new(),
        warnings: Vec::new(),
    };
    let root = parser.node(1)?;

    if let Some(token) = parser.peek() {
        parser.warnings.push(DecodeWarning::IgnoredTrailingInput {
            offset: token.offset,
        });
    }

    Ok(Decoded {
        tree: Tree { root },
        warnings: parser.warnings,
    })
}

struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    defined: HashSet<String>,
    warnings: Vec<DecodeWarning>,
}

impl<'t> Parser<'t> {
    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn unexpected(token: &Token, expected: &'static str) -> DecodeError {
        DecodeError::UnexpectedToken {
            found: token.kind.to_string(),
            expected,
            offset: token.offset,
        }
    }

    fn node(&mut self, depth: usize) -> Result<Node, DecodeError> {
        match self.bump() {
            Some(Token {
                kind: TokenKind::LParen,
                offset,
            }) => {
                if depth > MAX_DEPTH {
                    return Err(DecodeError::TooDeep {
                        max: MAX_DEPTH,
                        offset: *offset,
                    });
                }
            }
            Some(token) => return Err(Self::unexpected(token, "'('")),
            None => return Err(DecodeError::UnexpectedEnd { expected: "'('" }),
        }

        let variable = match self.bump() {
            Some(Token { kind: TokenKind::Symbol(s), .. }) => s.clone(),
            Some(token) => return Err(Self::unexpected(token, "variable")),
            None => return Err(DecodeError::UnexpectedEnd { expected: "variable" }),
        };

        let concept = if matches!(self.peek(), Some(Token { kind: TokenKind::Slash, .. })) {
            self.pos += 1;
            match self.bump() {
                Some(Token { kind: TokenKind::Symbol(s), .. }) => Some(Atom::Symbol(s.clone())),
                Some(Token { kind: TokenKind::Str(s), .. }) => Some(Atom::Str(s.clone())),
                Some(token) => return Err(Self::unexpected(token, "concept")),
                None => return Err(DecodeError::UnexpectedEnd { expected: "concept" }),
            }
        } else {
            self.warnings.push(DecodeWarning::MissingConcept {
                variable: variable.clone(),
            });
            None
        };

        if !self.defined.insert(variable.clone()) {
            self.warnings.push(DecodeWarning::DuplicateVariable {
                variable: variable.clone(),
            });
        }

        let mut branches = Vec::new();
        loop {
            let token = match self.peek() {
                Some(token) => token,
                None => return Err(DecodeError::UnexpectedEnd { expected: "role or ')'" }),
            };
            match &token.kind {
                TokenKind::RParen => {
                    self.pos += 1;
                    break;
                }
                TokenKind::Role(role) => {
                    self.pos += 1;
                    let target = self.target(role, token.offset, depth)?;
                    branches.push(Branch {
                        role: role.clone(),
                        target,
                    });
                }
                _ => return Err(Self::unexpected(token, "role or ')'")),
            }
        }

        Ok(Node {
            variable,
            concept,
            branches,
        })
    }

    fn target(
        &mut self,
        role: &str,
        role_offset: usize,
        depth: usize,
    ) -> Result<Target, DecodeError> {
        let missing = || DecodeError::MissingRoleValue {
            role: role.to_string(),
            offset: role_offset,
        };
        match self.peek().map(|t| &t.kind) {
            Some(TokenKind::LParen) => Ok(Target::Node(Box::new(self.node(depth + 1)?))),
            Some(TokenKind::Symbol(s)) => {
                self.pos += 1;
                Ok(Target::Atom(Atom::Symbol(s.clone())))
            }
            Some(TokenKind::Str(s)) => {
                self.pos += 1;
                Ok(Target::Atom(Atom::Str(s.clone())))
            }
            Some(TokenKind::Slash) => {
                let token = &self.tokens[self.pos];
                Err(Self::unexpected(token, "role value"))
            }
            Some(TokenKind::RParen) | Some(TokenKind::Role(_)) | None => Err(missing()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_nested_graph() {
        let decoded = decode("(x1 / bi_kịch :domain (x2 / chỗ :mod (x3 / đó)))").unwrap();
        assert!(decoded.warnings.is_empty());
        let root = &decoded.tree.root;
        assert_eq!(root.variable, "x1");
        assert_eq!(root.concept_value(), Some("bi_kịch"));
        assert_eq!(root.branches.len(), 1);
        assert_eq!(root.branches[0].role, ":domain");
        match &root.branches[0].target {
            Target::Node(child) => {
                assert_eq!(child.variable, "x2");
                assert_eq!(child.branches.len(), 1);
            }
            other => panic!("expected nested node, got {:?}", other),
        }
    }

    #[test]
    fn attributes_and_references_are_atoms() {
        let decoded = decode("(a / anh :quant 1 :ARG0 a :name \"Nam\")").unwrap();
        let branches = &decoded.tree.root.branches;
        assert_eq!(branches[0].target, Target::Atom(Atom::Symbol("1".into())));
        assert_eq!(branches[1].target, Target::Atom(Atom::Symbol("a".into())));
        assert_eq!(branches[2].target, Target::Atom(Atom::Str("Nam".into())));
    }

    #[test]
    fn multiline_input_with_glued_roles() {
        let text = "(l1 / làm\n    :condition(y / yêu\n        :pivot(n / người\n            :quant 1)))";
        let decoded = decode(text).unwrap();
        assert_eq!(decoded.tree.nodes().len(), 3);
    }

    #[test]
    fn missing_concept_is_warning() {
        let decoded = decode("(a :mod (b / beta))").unwrap();
        assert_eq!(
            decoded.warnings,
            vec![DecodeWarning::MissingConcept { variable: "a".into() }]
        );
        assert_eq!(decoded.tree.root.concept, None);
    }

    #[test]
    fn duplicate_definition_is_warning() {
        let decoded = decode("(a / alpha :mod (a / again))").unwrap();
        assert_eq!(
            decoded.warnings,
            vec![DecodeWarning::DuplicateVariable { variable: "a".into() }]
        );
    }

    #[test]
    fn trailing_input_is_warning() {
        let decoded = decode("(a / alpha) junk").unwrap();
        assert_eq!(
            decoded.warnings,
            vec![DecodeWarning::IgnoredTrailingInput { offset: 12 }]
        );
    }

    #[test]
    fn empty_input_is_error() {
        assert_eq!(decode("   \n"), Err(DecodeError::EmptyInput));
    }

    #[test]
    fn unclosed_node_is_error() {
        assert_eq!(
            decode("(a / alpha :mod (b / beta"),
            Err(DecodeError::UnexpectedEnd { expected: "role or ')'" })
        );
    }

    #[test]
    fn dangling_role_is_error() {
        assert_eq!(
            decode("(a / alpha :mod)"),
            Err(DecodeError::MissingRoleValue {
                role: ":mod".into(),
                offset: 11,
            })
        );
    }

    #[test]
    fn orphan_slash_is_error() {
        assert!(matches!(
            decode("(a / )"),
            Err(DecodeError::UnexpectedToken { expected: "concept", .. })
        ));
    }

    #[test]
    fn root_must_be_a_node() {
        assert!(matches!(
            decode("alpha"),
            Err(DecodeError::UnexpectedToken { expected: "'('", .. })
        ));
    }

    #[test]
    fn quoted_concept_stays_quoted() {
        let decoded = decode(r#"(n / "a b")"#).unwrap();
        assert_eq!(decoded.tree.root.concept, Some(Atom::Str("a b".into())));
    }

    #[test]
    fn nesting_at_the_limit_decodes() {
        let text = "(a :r ".repeat(MAX_DEPTH - 1) + "(a" + &")".repeat(MAX_DEPTH);
        let decoded = decode(&text).unwrap();
        assert_eq!(decoded.tree.nodes().len(), MAX_DEPTH);
    }

    #[test]
    fn runaway_nesting_is_error() {
        let text = "(a :r ".repeat(20_000);
        assert_eq!(
            decode(&text),
            Err(DecodeError::TooDeep {
                max: MAX_DEPTH,
                offset: MAX_DEPTH * 6,
            })
        );
    }

    #[test]
    fn runaway_nesting_fails_on_a_default_stack() {
        let text = "(a :r ".repeat(20_000) + &")".repeat(20_000);
        let result = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(move || decode(&text).map(|_| ()))
            .unwrap()
            .join()
            .unwrap();
        assert!(matches!(result, Err(DecodeError::TooDeep { .. })));
    }
}
