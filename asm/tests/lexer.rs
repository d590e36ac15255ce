use arch::op::Mnemonic;
use vasm::token::TokenKind::{self, *};
use vasm::{Error, Lexer};

fn case(code: &str, expects: Vec<TokenKind>) {
    let tokens = Lexer::new("test.s", code).lex().unwrap();

    for (idx, token) in tokens.iter().enumerate() {
        println!("{idx:>2}: {token}");
    }

    assert_eq!(tokens.len(), expects.len());
    for (token, expect) in tokens.iter().zip(&expects) {
        assert_eq!(&token.kind, expect);
    }
}

fn reg(index: u8) -> TokenKind {
    Reg(arch::reg::Reg::try_from(index).unwrap())
}

#[test]
fn punctuation_and_reserved_words() {
    case(
        ".start: mov r0, [r1]",
        vec![
            Dot,
            Name,
            Colon,
            Inst(Mnemonic::Mov),
            reg(0),
            Comma,
            OBrack,
            reg(1),
            CBrack,
        ],
    );
}

#[test]
fn register_aliases() {
    case(
        "push sp\npush sf\npush rv",
        vec![
            Inst(Mnemonic::Push),
            reg(13),
            Inst(Mnemonic::Push),
            reg(14),
            Inst(Mnemonic::Push),
            reg(15),
        ],
    );
}

#[test]
fn reserved_matching_is_case_sensitive() {
    case("mov movr MOV R0", vec![Inst(Mnemonic::Mov), Name, Name, Name]);
}

#[test]
fn comments_run_to_end_of_line() {
    case(
        "push r1 # push r2 and some more\npop r2",
        vec![Inst(Mnemonic::Push), reg(1), Inst(Mnemonic::Pop), reg(2)],
    );
}

#[test]
fn numbers_are_scanned_permissively() {
    // radix letters are admitted anywhere after the leading digit;
    // validation is the encoder's job
    case("5 0x1f 0b101 10xf", vec![Num, Num, Num, Num]);

    let tokens = Lexer::new("test.s", "10xf").lex().unwrap();
    assert_eq!(tokens[0].text, "10xf");
}

#[test]
fn number_must_start_with_a_digit() {
    // "x5" is a name, not a number
    case("x5", vec![Name]);
}

#[test]
fn string_literals() {
    let tokens = Lexer::new("test.s", "\"hello world\"").lex().unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, Str);
    assert_eq!(tokens[0].text, "hello world");
}

#[test]
fn unterminated_string_is_an_error() {
    let err = Lexer::new("test.s", "\"abc").lex().unwrap_err();
    assert!(matches!(err, Error::UnterminatedString { .. }));
}

#[test]
fn unknown_character_is_an_error() {
    let err = Lexer::new("test.s", "mov @").lex().unwrap_err();
    match err {
        Error::UnexpectedChar { ch, loc } => {
            assert_eq!(ch, '@');
            assert_eq!((loc.row, loc.col), (1, 5));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn macros_substitute_before_scanning() {
    let tokens = Lexer::new("test.s", "flg r0, FLAGS_EQUAL").lex().unwrap();
    assert_eq!(tokens.len(), 4);
    assert_eq!(tokens[3].kind, Num);
    assert_eq!(tokens[3].text, "4");

    let tokens = Lexer::new("test.s", "flg r0, FLAGS_LESSEQ").lex().unwrap();
    assert_eq!(tokens[3].text, "0");
}

#[test]
fn locations_are_one_indexed() {
    let tokens = Lexer::new("test.s", "mov r0, 5\njmp loop").lex().unwrap();
    let positions: Vec<(u32, u32)> = tokens.iter().map(|t| (t.loc.row, t.loc.col)).collect();
    assert_eq!(
        positions,
        vec![(1, 1), (1, 5), (1, 7), (1, 9), (2, 1), (2, 5)]
    );
    assert!(tokens.iter().all(|t| t.loc.file == "test.s"));
}

#[test]
fn name_or_number_at_end_of_text_is_complete() {
    case("jmp loop", vec![Inst(Mnemonic::Jmp), Name]);
    case("mov r0, 5", vec![Inst(Mnemonic::Mov), reg(0), Comma, Num]);
}

#[test]
fn empty_input_lexes_to_nothing() {
    assert!(Lexer::new("test.s", "").lex().unwrap().is_empty());
    assert!(Lexer::new("test.s", "  \n\t # only a comment")
        .lex()
        .unwrap()
        .is_empty());
}
