//! Lexical analysis: turns the raw input string into a vector of tokens.
//!
//! The tokenizer is intentionally tiny – it knows nothing about semantics
//! beyond recognising keywords, literals and operators. Multi-character
//! punctuators are matched before single-character ones to avoid ambiguity,
//! and every token records its source span so diagnostics can point at it.

use crate::error::{CompileError, CompileResult};

/// Kinds of tokens recognised by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  Punctuator,
  Num,
  Ident,
  Keyword,
  Str,
  Eof,
}

/// Thin wrapper for lexical information needed by later stages.
#[derive(Debug, Clone)]
pub struct Token {
  pub kind: TokenKind,
  pub value: Option<i64>,
  pub loc: usize,
  pub len: usize,
}

impl Token {
  /// Convenience constructor to keep the `tokenize` loop readable.
  pub fn new(kind: TokenKind, loc: usize, len: usize, value: Option<i64>) -> Self {
    Self {
      kind,
      value,
      loc,
      len,
    }
  }
}

const KEYWORDS: [&str; 4] = ["int", "print", "if", "else"];

/// Lex the input into a flat vector of tokens terminated by an `Eof` marker.
pub fn tokenize(input: &str) -> CompileResult<Vec<Token>> {
  let mut tokens = Vec::new();
  let bytes = input.as_bytes();
  let mut i = 0;

  while i < bytes.len() {
    let c = bytes[i];
    if c.is_ascii_whitespace() {
      i += 1;
      continue;
    }

    if input[i..].starts_with("//") {
      while i < bytes.len() && bytes[i] != b'\n' {
        i += 1;
      }
      continue;
    }

    if c.is_ascii_digit() {
      let start = i;
      i += 1;
      while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
      }
      let text = &input[start..i];
      let value = text
        .parse::<i64>()
        .map_err(|err| CompileError::at(input, start, format!("invalid number: {err}")))?;
      tokens.push(Token::new(TokenKind::Num, start, i - start, Some(value)));
      continue;
    }

    if c.is_ascii_alphabetic() || c == b'_' {
      let start = i;
      i += 1;
      while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
        i += 1;
      }
      let text = &input[start..i];
      let kind = if KEYWORDS.contains(&text) {
        TokenKind::Keyword
      } else {
        TokenKind::Ident
      };
      tokens.push(Token::new(kind, start, i - start, None));
      continue;
    }

    if c == b'"' {
      let start = i;
      i += 1;
      while i < bytes.len() && bytes[i] != b'"' && bytes[i] != b'\n' {
        i += 1;
      }
      if i >= bytes.len() || bytes[i] != b'"' {
        return Err(CompileError::at(input, start, "unterminated string literal"));
      }
      i += 1;
      // the span keeps both quotes; the generator reuses the literal verbatim
      tokens.push(Token::new(TokenKind::Str, start, i - start, None));
      continue;
    }

    if let Some(op) = ["==", "!=", "<=", ">="]
      .into_iter()
      .find(|op| input[i..].starts_with(op))
    {
      tokens.push(Token::new(TokenKind::Punctuator, i, op.len(), None));
      i += op.len();
      continue;
    }

    if matches!(
      c,
      b'=' | b'+' | b'-' | b'*' | b'/' | b'(' | b')' | b'{' | b'}' | b'<' | b'>' | b';'
    ) {
      tokens.push(Token::new(TokenKind::Punctuator, i, 1, None));
      i += 1;
      continue;
    }

    let invalid_char = input[i..].chars().next().unwrap_or('\0');
    return Err(CompileError::at(
      input,
      i,
      format!("invalid token: '{invalid_char}'"),
    ));
  }

  tokens.push(Token::new(TokenKind::Eof, input.len(), 0, None));
  Ok(tokens)
}

/// Return the slice from the source that produced this token.
pub fn token_text<'a>(token: &Token, source: &'a str) -> &'a str {
  let end = token.loc + token.len;
  &source[token.loc..end]
}

/// Human-friendly description used in diagnostics.
pub fn describe_token(token: Option<&Token>, source: &str) -> String {
  match token {
    Some(t) => match t.kind {
      TokenKind::Eof => "EOF".to_string(),
      _ => token_text(t, source).to_string(),
    },
    None => "EOF".to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source)
      .unwrap()
      .iter()
      .map(|token| token.kind)
      .collect()
  }

  #[test]
  fn lexes_a_declaration() {
    let source = "int x = 5;";
    let tokens = tokenize(source).unwrap();
    let texts: Vec<&str> = tokens
      .iter()
      .map(|token| token_text(token, source))
      .collect();
    assert_eq!(texts, ["int", "x", "=", "5", ";", ""]);
    assert_eq!(tokens[0].kind, TokenKind::Keyword);
    assert_eq!(tokens[1].kind, TokenKind::Ident);
    assert_eq!(tokens[3].value, Some(5));
    assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
  }

  #[test]
  fn keywords_are_not_identifiers() {
    assert_eq!(
      kinds("if else int print ifx"),
      [
        TokenKind::Keyword,
        TokenKind::Keyword,
        TokenKind::Keyword,
        TokenKind::Keyword,
        TokenKind::Ident,
        TokenKind::Eof,
      ]
    );
  }

  #[test]
  fn two_char_operators_win_over_single() {
    let source = "a <= b == c";
    let tokens = tokenize(source).unwrap();
    let texts: Vec<&str> = tokens
      .iter()
      .map(|token| token_text(token, source))
      .collect();
    assert_eq!(texts, ["a", "<=", "b", "==", "c", ""]);
  }

  #[test]
  fn string_literal_keeps_its_quotes() {
    let source = "print(\"hello\");";
    let tokens = tokenize(source).unwrap();
    let string = tokens
      .iter()
      .find(|token| token.kind == TokenKind::Str)
      .unwrap();
    assert_eq!(token_text(string, source), "\"hello\"");
  }

  #[test]
  fn unterminated_string_is_fatal() {
    let err = tokenize("print(\"oops);").unwrap_err();
    assert!(err.to_string().contains("unterminated string literal"));
  }

  #[test]
  fn line_comments_are_skipped() {
    assert_eq!(
      kinds("// int x;\n1;"),
      [TokenKind::Num, TokenKind::Punctuator, TokenKind::Eof]
    );
  }

  #[test]
  fn rejects_unknown_characters() {
    let err = tokenize("1 + $").unwrap_err();
    assert!(err.to_string().contains("invalid token: '$'"));
  }
}
