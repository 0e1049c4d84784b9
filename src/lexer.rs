use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Str(String),
    Int(i64),
    Float(f64),

    LBrace, // {
    RBrace, // }
    LParen, // (
    RParen, // )
    Comma,  // ,
    Dot,    // .
    Arrow,  // ->

    Eof,
}

#[derive(Debug, thiserror::Error)]
pub enum LexError {
    #[error("Unexpected character: {0}")]
    UnexpectedChar(char),
    #[error("Unterminated string")]
    UnterminatedString,
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
}

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.chars.next() {
            if c == '\n' {
                break;
            }
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.chars.peek() {
                Some(c) if c.is_whitespace() => {
                    self.chars.next();
                }
                Some('#') => self.skip_line(),
                Some('-') => {
                    // `--` starts a comment, anything else is a token
                    let mut ahead = self.chars.clone();
                    ahead.next();
                    if ahead.peek() == Some(&'-') {
                        self.skip_line();
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
    }

    fn read_ident(&mut self, first: char) -> String {
        let mut s = String::from(first);
        while let Some(&c) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                s.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        s
    }

    fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let mut s = String::new();
        loop {
            match self.chars.next() {
                Some(c) if c == quote => return Ok(s),
                Some('\\') => {
                    if let Some(c) = self.chars.next() {
                        match c {
                            'n' => s.push('\n'),
                            't' => s.push('\t'),
                            'r' => s.push('\r'),
                            _ => s.push(c),
                        }
                    }
                }
                Some(c) => s.push(c),
                None => return Err(LexError::UnterminatedString),
            }
        }
    }

    fn read_number(&mut self, first: char) -> Result<Token, LexError> {
        let mut s = String::from(first);
        let mut is_float = false;
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() {
                s.push(c);
                self.chars.next();
            } else if c == '.' && !is_float {
                is_float = true;
                s.push(c);
                self.chars.next();
            } else {
                break;
            }
        }

        if is_float {
            s.parse().map(Token::Float).map_err(|_| LexError::InvalidNumber(s))
        } else {
            s.parse().map(Token::Int).map_err(|_| LexError::InvalidNumber(s))
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments();

        let c = match self.chars.next() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        let tok = match c {
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            '.' => Token::Dot,
            '-' => match self.chars.peek().copied() {
                Some('>') => {
                    self.chars.next();
                    Token::Arrow
                }
                Some(d) if d.is_ascii_digit() => self.read_number('-')?,
                _ => return Err(LexError::UnexpectedChar(c)),
            },
            '"' | '\'' => Token::Str(self.read_string(c)?),
            c if c.is_ascii_digit() => self.read_number(c)?,
            c if c.is_alphabetic() || c == '_' => Token::Ident(self.read_ident(c)),
            _ => return Err(LexError::UnexpectedChar(c)),
        };

        Ok(tok)
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            if tok == Token::Eof {
                tokens.push(tok);
                break;
            }
            tokens.push(tok);
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_tokens() {
        let tokens = Lexer::new("table users { }").tokenize().unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("table".into()),
                Token::Ident("users".into()),
                Token::LBrace,
                Token::RBrace,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_comments() {
        let input = "# comment\ntable t { -- inline\n}";
        let tokens = Lexer::new(input).tokenize().unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("table".into()),
                Token::Ident("t".into()),
                Token::LBrace,
                Token::RBrace,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        let tokens = Lexer::new("255 -3 0.5 -1.25").tokenize().unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Int(255),
                Token::Int(-3),
                Token::Float(0.5),
                Token::Float(-1.25),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_strings() {
        let tokens = Lexer::new(r#""uuid-ossp" 'it\'s'"#).tokenize().unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Str("uuid-ossp".into()),
                Token::Str("it's".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_symbols() {
        let tokens = Lexer::new("fk -> users.id, (x)").tokenize().unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("fk".into()),
                Token::Arrow,
                Token::Ident("users".into()),
                Token::Dot,
                Token::Ident("id".into()),
                Token::Comma,
                Token::LParen,
                Token::Ident("x".into()),
                Token::RParen,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            Lexer::new("\"open").tokenize(),
            Err(LexError::UnterminatedString)
        ));
        assert!(matches!(
            Lexer::new("a - b").tokenize(),
            Err(LexError::UnexpectedChar('-'))
        ));
        assert!(matches!(
            Lexer::new("@").tokenize(),
            Err(LexError::UnexpectedChar('@'))
        ));
    }
}
