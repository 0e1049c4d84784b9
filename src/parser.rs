use crate::ast::*;
use crate::error::SchemaError;
use crate::lexer::{LexError, Lexer, Token};
use crate::schema::{ColumnDefault, ForeignKey, Literal, ReferentialAction};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Lex error: {0}")]
    Lex(#[from] LexError),
    #[error("Unexpected token: {0:?}, expected {1}")]
    Unexpected(Token, &'static str),
    #[error("Unexpected end of input")]
    UnexpectedEof,
    #[error("Foreign key to {target} pairs {local} local column(s) with {foreign} referenced column(s)")]
    ForeignKeyArity {
        target: String,
        local: usize,
        foreign: usize,
    },
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(input: &str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(input).tokenize()?;
        Ok(Self { tokens, pos: 0 })
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn peek_at(&self, offset: usize) -> &Token {
        self.tokens.get(self.pos + offset).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> &Token {
        let tok = self.tokens.get(self.pos).unwrap_or(&Token::Eof);
        self.pos += 1;
        tok
    }

    fn unexpected(tok: Token, expected: &'static str) -> ParseError {
        match tok {
            Token::Eof => ParseError::UnexpectedEof,
            tok => ParseError::Unexpected(tok, expected),
        }
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.advance().clone() {
            Token::Ident(s) => Ok(s),
            tok => Err(Self::unexpected(tok, "identifier")),
        }
    }

    fn expect_keyword(&mut self, keyword: &'static str) -> Result<(), ParseError> {
        if self.check_ident(keyword) {
            self.advance();
            Ok(())
        } else {
            Err(Self::unexpected(self.peek().clone(), keyword))
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        let tok = self.advance().clone();
        if tok == expected {
            Ok(())
        } else {
            Err(Self::unexpected(tok, "specific token"))
        }
    }

    fn check_ident(&self, name: &str) -> bool {
        matches!(self.peek(), Token::Ident(s) if s.eq_ignore_ascii_case(name))
    }

    /// Identifier or quoted string, e.g. extension and enum value names.
    fn expect_name(&mut self) -> Result<String, ParseError> {
        match self.advance().clone() {
            Token::Ident(s) | Token::Str(s) => Ok(s),
            tok => Err(Self::unexpected(tok, "name")),
        }
    }

    /// Optional `as TypeName`.
    fn parse_type_name(&mut self) -> Result<Option<String>, ParseError> {
        if self.check_ident("as") {
            self.advance();
            Ok(Some(self.expect_ident()?))
        } else {
            Ok(None)
        }
    }

    pub fn parse(&mut self) -> Result<Document, ParseError> {
        let mut doc = Document::default();

        while *self.peek() != Token::Eof {
            if self.check_ident("extension") {
                self.advance();
                doc.extensions.push(self.expect_name()?);
            } else if self.check_ident("enum") {
                self.advance();
                doc.enums.push(self.parse_enum()?);
            } else if self.check_ident("table") {
                self.advance();
                doc.tables.push(self.parse_table()?);
            } else {
                return Err(ParseError::Unexpected(
                    self.peek().clone(),
                    "extension, enum, or table",
                ));
            }
        }

        Ok(doc)
    }

    fn parse_enum(&mut self) -> Result<EnumDecl, ParseError> {
        let name = self.expect_ident()?;
        let type_name = self.parse_type_name()?;
        self.expect(Token::LBrace)?;

        let mut values = Vec::new();
        while *self.peek() != Token::RBrace {
            if *self.peek() == Token::Comma {
                self.advance();
                continue;
            }
            values.push(self.expect_name()?);
        }

        self.expect(Token::RBrace)?;

        Ok(EnumDecl {
            name,
            type_name,
            values,
        })
    }

    fn parse_table(&mut self) -> Result<TableDecl, ParseError> {
        let name = self.expect_ident()?;
        let type_name = self.parse_type_name()?;
        self.expect(Token::LBrace)?;

        let mut columns = Vec::new();
        let mut constraints = Vec::new();

        while *self.peek() != Token::RBrace {
            if self.check_ident("primary_key") {
                self.advance();
                constraints.push(self.parse_primary_key()?);
            } else if self.check_ident("foreign_key") {
                self.advance();
                constraints.push(self.parse_foreign_key()?);
            } else if self.check_ident("check") {
                self.advance();
                constraints.push(self.parse_check()?);
            } else if *self.peek() == Token::Eof {
                return Err(ParseError::UnexpectedEof);
            } else {
                columns.push(self.parse_column()?);
            }
        }

        self.expect(Token::RBrace)?;

        Ok(TableDecl {
            name,
            type_name,
            columns,
            constraints,
        })
    }

    fn parse_column(&mut self) -> Result<ColumnDecl, ParseError> {
        let name = self.expect_ident()?;
        let typ = self.parse_type_ref()?;
        let mut modifiers = Vec::new();

        loop {
            if self.check_ident("pk") {
                self.advance();
                modifiers.push(ColumnModifier::Pk);
            } else if self.check_ident("not") {
                self.advance();
                self.expect_keyword("null")?;
                modifiers.push(ColumnModifier::NotNull);
            } else if self.check_ident("null") {
                self.advance();
                modifiers.push(ColumnModifier::Null);
            } else if self.check_ident("default") {
                self.advance();
                let val = self.parse_default_value()?;
                modifiers.push(ColumnModifier::Default(val));
            } else if self.check_ident("fk") {
                self.advance();
                self.expect(Token::Arrow)?;
                let target = self.expect_ident()?;
                self.expect(Token::Dot)?;
                let column = self.expect_ident()?;
                let (on_delete, on_update) = self.parse_actions()?;
                modifiers.push(ColumnModifier::Fk {
                    target,
                    column,
                    on_delete,
                    on_update,
                });
            } else {
                break;
            }
        }

        Ok(ColumnDecl {
            name,
            typ,
            modifiers,
        })
    }

    fn parse_type_ref(&mut self) -> Result<TypeRef, ParseError> {
        let mut name = self.expect_ident()?;

        // Multi-word PostgreSQL spellings
        let follower = match name.to_lowercase().as_str() {
            "double" => Some("precision"),
            "character" => Some("varying"),
            _ => None,
        };
        if let Some(word) = follower {
            if self.check_ident(word) {
                self.advance();
                name = format!("{} {}", name, word);
            }
        }

        let mut length = None;
        if *self.peek() == Token::LParen {
            self.advance();
            length = match self.advance().clone() {
                Token::Int(n) => match u32::try_from(n) {
                    Ok(n) => Some(n),
                    Err(_) => return Err(ParseError::Unexpected(Token::Int(n), "type length")),
                },
                tok => return Err(Self::unexpected(tok, "type length")),
            };
            self.expect(Token::RParen)?;
        }

        Ok(TypeRef { name, length })
    }

    fn parse_default_value(&mut self) -> Result<ColumnDefault, ParseError> {
        match self.advance().clone() {
            Token::Str(s) => Ok(ColumnDefault::Literal(Literal::Str(s))),
            Token::Int(n) => Ok(ColumnDefault::Literal(Literal::Int(n))),
            Token::Float(x) => Ok(ColumnDefault::Literal(Literal::Float(x))),
            Token::Ident(s) => match s.to_lowercase().as_str() {
                "true" => Ok(ColumnDefault::Literal(Literal::Bool(true))),
                "false" => Ok(ColumnDefault::Literal(Literal::Bool(false))),
                "null" => Ok(ColumnDefault::Literal(Literal::Null)),
                "sql" => match self.advance().clone() {
                    Token::Str(expr) => Ok(ColumnDefault::Sql(expr)),
                    tok => Err(Self::unexpected(tok, "SQL expression string")),
                },
                _ if *self.peek() == Token::LParen => {
                    self.advance(); // consume (
                    Ok(ColumnDefault::Sql(format!("{}({})", s, self.parse_call_args()?)))
                }
                _ => Ok(ColumnDefault::Sql(s)),
            },
            tok => Err(Self::unexpected(tok, "default value")),
        }
    }

    /// Arguments of a function-call default, rendered as SQL, up to `)`.
    fn parse_call_args(&mut self) -> Result<String, ParseError> {
        let mut args = String::new();
        loop {
            match self.advance().clone() {
                Token::RParen => return Ok(args),
                Token::Eof => return Err(ParseError::UnexpectedEof),
                Token::Ident(a) => args.push_str(&a),
                Token::Int(n) => args.push_str(&n.to_string()),
                Token::Float(x) => args.push_str(&x.to_string()),
                Token::Str(st) => args.push_str(&Literal::Str(st).to_string()),
                Token::Comma => args.push_str(", "),
                tok => return Err(ParseError::Unexpected(tok, "function argument")),
            }
        }
    }

    fn parse_primary_key(&mut self) -> Result<Constraint, ParseError> {
        self.expect(Token::LParen)?;
        let columns = self.parse_ident_list()?;
        self.expect(Token::RParen)?;
        Ok(Constraint::PrimaryKey(columns))
    }

    fn parse_foreign_key(&mut self) -> Result<Constraint, ParseError> {
        self.expect(Token::LParen)?;
        let columns = self.parse_ident_list()?;
        self.expect(Token::RParen)?;

        self.expect_keyword("references")?;

        let target = self.expect_ident()?;
        self.expect(Token::LParen)?;
        let target_columns = self.parse_ident_list()?;
        self.expect(Token::RParen)?;

        if columns.len() != target_columns.len() {
            return Err(ParseError::ForeignKeyArity {
                target,
                local: columns.len(),
                foreign: target_columns.len(),
            });
        }

        let (on_delete, on_update) = self.parse_actions()?;
        let mut fk = ForeignKey::new(target, columns.into_iter().zip(target_columns));
        fk.on_delete = on_delete;
        fk.on_update = on_update;

        Ok(Constraint::ForeignKey(fk))
    }

    /// Any number of `on delete <action>` / `on update <action>` clauses.
    fn parse_actions(
        &mut self,
    ) -> Result<(Option<ReferentialAction>, Option<ReferentialAction>), ParseError> {
        let mut on_delete = None;
        let mut on_update = None;

        // `on` followed by a column name would be a new column, not a clause
        while self.check_ident("on")
            && matches!(self.peek_at(1), Token::Ident(s) if s.eq_ignore_ascii_case("delete") || s.eq_ignore_ascii_case("update"))
        {
            self.advance();
            if self.check_ident("delete") {
                self.advance();
                on_delete = Some(self.parse_action()?);
            } else {
                self.advance();
                on_update = Some(self.parse_action()?);
            }
        }

        Ok((on_delete, on_update))
    }

    fn parse_action(&mut self) -> Result<ReferentialAction, ParseError> {
        if self.check_ident("cascade") {
            self.advance();
            Ok(ReferentialAction::Cascade)
        } else if self.check_ident("restrict") {
            self.advance();
            Ok(ReferentialAction::Restrict)
        } else if self.check_ident("no") {
            self.advance();
            self.expect_keyword("action")?;
            Ok(ReferentialAction::NoAction)
        } else if self.check_ident("set") {
            self.advance();
            if self.check_ident("null") {
                self.advance();
                Ok(ReferentialAction::SetNull)
            } else {
                self.expect_keyword("default")?;
                Ok(ReferentialAction::SetDefault)
            }
        } else {
            Err(Self::unexpected(
                self.peek().clone(),
                "cascade, restrict, no action, set null, or set default",
            ))
        }
    }

    fn parse_check(&mut self) -> Result<Constraint, ParseError> {
        let name = self.expect_ident()?;
        match self.advance().clone() {
            Token::Str(expr) => Ok(Constraint::Check { name, expr }),
            tok => Err(Self::unexpected(tok, "check expression string")),
        }
    }

    fn parse_ident_list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut list = vec![self.expect_ident()?];
        while *self.peek() == Token::Comma {
            self.advance();
            list.push(self.expect_ident()?);
        }
        Ok(list)
    }
}
