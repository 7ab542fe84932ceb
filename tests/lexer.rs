//! Lexer contract and error tests.

use argonc::{LexErrorKind, Span, TokenKind, tokenize};

// -----------------------------------------------------------
// Token stream contract.
// -----------------------------------------------------------

#[test]
fn lex_ends_with_exactly_one_eof() {
    let tokens = tokenize("module m function f -> Int { return 1; }").expect("tokenize");
    let eofs = tokens.iter().filter(|t| t.is_eof()).count();
    assert_eq!(eofs, 1);
    assert!(tokens.last().expect("non-empty").is_eof());
}

#[test]
fn lex_index_is_non_decreasing() {
    let tokens = tokenize("module m\nfunction f -> Int {\n\treturn 1 + 2;\n}\n").expect("tokenize");
    for pair in tokens.windows(2) {
        assert!(pair[0].span.index <= pair[1].span.index);
    }
}

#[test]
fn lex_lines_and_columns_are_one_based() {
    let tokens = tokenize("module m\n  function").expect("tokenize");
    assert_eq!(tokens[0].span, Span::new(1, 1, 0));
    assert_eq!(tokens[1].span, Span::new(1, 8, 7));
    assert_eq!(tokens[2].span, Span::new(2, 3, 11));
}

#[test]
fn lex_only_whitespace_and_comments() {
    let tokens = tokenize("  \t\n// nothing here\n\n").expect("tokenize");
    assert_eq!(tokens.len(), 1);
    assert!(tokens[0].is_eof());
    assert_eq!(tokens[0].span.line, 4);
}

#[test]
fn lex_keywords_and_identifiers() {
    let tokens = tokenize("module modules Module import return_value").expect("tokenize");
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Module,
            TokenKind::Identifier,
            TokenKind::TypeIdentifier,
            TokenKind::Import,
            TokenKind::Identifier,
            TokenKind::EndOfFile,
        ]
    );
}

#[test]
fn lex_full_punctuation_table() {
    let tokens = tokenize("[ ] { } ( ) , : ; < > + - ? =").expect("tokenize");
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::LeftBracket,
            TokenKind::RightBracket,
            TokenKind::LeftBrace,
            TokenKind::RightBrace,
            TokenKind::LeftParen,
            TokenKind::RightParen,
            TokenKind::Comma,
            TokenKind::Colon,
            TokenKind::Semicolon,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Question,
            TokenKind::Equal,
            TokenKind::EndOfFile,
        ]
    );
}

#[test]
fn lex_minus_number_stays_two_tokens() {
    let tokens = tokenize("-12").expect("tokenize");
    assert_eq!(tokens[0].kind, TokenKind::Minus);
    assert_eq!(tokens[1].kind, TokenKind::Integer);
    assert_eq!(tokens[1].lexeme, "12");
}

#[test]
fn lex_token_display() {
    let tokens = tokenize("\n  -> ").expect("tokenize");
    assert_eq!(tokens[0].to_string(), "( RIGHT_ARROW, ->, 2:3 )");
}

// -----------------------------------------------------------
// Errors.
// -----------------------------------------------------------

#[test]
fn lex_error_unterminated_string_location() {
    let err = tokenize("x: String = \"abc").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnterminatedString);
    assert_eq!(err.span.line, 1);
    assert_eq!(err.span.column, 13);
}

#[test]
fn lex_error_display_includes_location() {
    let err = tokenize("\n\n  #").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("unexpected character: #"));
    assert!(msg.contains("line 3, column 3"));
}

#[test]
fn lex_error_single_slash() {
    let err = tokenize("1 / 2").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnexpectedCharacter('/'));
}
