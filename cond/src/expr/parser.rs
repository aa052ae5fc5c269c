//! Recursive-descent parser producing the generic expression tree.

use winnow::ascii::{digit1, multispace0, Caseless};
use winnow::combinator::opt;
use winnow::error::{ContextError, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{literal, one_of, take_while};

use super::ast::{CompareOp, Literal, Node};

/// Deepest nesting of parentheses and prefix `not` the parser accepts.
pub const MAX_DEPTH: usize = 64;

/// Reserved words, matched case-insensitively.
pub(crate) const KEYWORDS: &[&str] = &[
    "and", "or", "not", "eq", "ne", "lt", "le", "gt", "ge", "true", "false", "null",
];

const SYMBOL_OPS: [(&str, CompareOp); 6] = [
    ("==", CompareOp::Eq),
    ("!=", CompareOp::Ne),
    ("<=", CompareOp::Le),
    (">=", CompareOp::Ge),
    ("<", CompareOp::Lt),
    (">", CompareOp::Gt),
];

const WORD_OPS: [(&str, CompareOp); 6] = [
    ("eq", CompareOp::Eq),
    ("ne", CompareOp::Ne),
    ("le", CompareOp::Le),
    ("ge", CompareOp::Ge),
    ("lt", CompareOp::Lt),
    ("gt", CompareOp::Gt),
];

/// Input that can not be turned into any expression tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("syntax error at offset {offset}: {message}")]
pub struct SyntaxError {
    /// Byte offset into the source where parsing stopped.
    pub offset: usize,
    pub message: String,
}

type Input<'a> = &'a str;
type ParserResult<T> = winnow::Result<T>;

/// Parse a whole source string into a tree.
pub fn parse_expression(source: &str) -> Result<Node, SyntaxError> {
    let mut input = source;
    parse_complete(&mut input).map_err(|err| SyntaxError {
        offset: source.len() - input.len(),
        message: describe_error(&err),
    })
}

fn parse_complete(input: &mut Input<'_>) -> ParserResult<Node> {
    let node = parse_or(input, 0)?;
    skip_space(input);
    if !input.is_empty() {
        return Err(expected("end of input"));
    }
    Ok(node)
}

fn parse_or(input: &mut Input<'_>, depth: usize) -> ParserResult<Node> {
    let mut node = parse_and(input, depth)?;
    while eat_operator(input, "or", "||") {
        let right = parse_and(input, depth)?;
        node = Node::Or(Box::new(node), Box::new(right));
    }
    Ok(node)
}

fn parse_and(input: &mut Input<'_>, depth: usize) -> ParserResult<Node> {
    let mut node = parse_not(input, depth)?;
    while eat_operator(input, "and", "&&") {
        let right = parse_not(input, depth)?;
        node = Node::And(Box::new(node), Box::new(right));
    }
    Ok(node)
}

fn parse_not(input: &mut Input<'_>, depth: usize) -> ParserResult<Node> {
    skip_space(input);
    if eat_keyword(input, "not") || eat_bang(input) {
        let depth = descend(depth)?;
        let operand = parse_not(input, depth)?;
        return Ok(Node::Not(Box::new(operand)));
    }
    parse_comparison(input, depth)
}

fn parse_comparison(input: &mut Input<'_>, depth: usize) -> ParserResult<Node> {
    let left = parse_operand(input, depth)?;

    let checkpoint = *input;
    skip_space(input);
    match compare_op(input) {
        Some(op) => {
            let right = parse_operand(input, depth)?;
            Ok(Node::compare(op, left, right))
        }
        None => {
            *input = checkpoint;
            Ok(left)
        }
    }
}

fn compare_op(input: &mut Input<'_>) -> Option<CompareOp> {
    for (symbol, op) in SYMBOL_OPS {
        if eat_symbol(input, symbol) {
            return Some(op);
        }
    }
    for (word, op) in WORD_OPS {
        if eat_keyword(input, word) {
            return Some(op);
        }
    }
    None
}

fn parse_operand(input: &mut Input<'_>, depth: usize) -> ParserResult<Node> {
    skip_space(input);

    if eat_char(input, '(') {
        let depth = descend(depth)?;
        let inner = parse_or(input, depth)?;
        skip_space(input);
        if !eat_char(input, ')') {
            return Err(expected("`)`"));
        }
        return Ok(inner);
    }

    if input.starts_with(['\'', '"']) {
        return parse_string(input).map(|s| Node::Literal(Literal::Str(s)));
    }

    if input.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
        return parse_number(input).map(|n| Node::Literal(Literal::Number(n)));
    }

    if eat_keyword(input, "true") {
        return Ok(Node::Literal(Literal::Bool(true)));
    }
    if eat_keyword(input, "false") {
        return Ok(Node::Literal(Literal::Bool(false)));
    }
    if eat_keyword(input, "null") {
        return Ok(Node::Literal(Literal::Null));
    }

    parse_reference(input)
}

/// Quoted string; a doubled quote character stands for one quote.
fn parse_string(input: &mut Input<'_>) -> ParserResult<String> {
    let quote: ParserResult<char> = one_of(['\'', '"']).parse_next(input);
    let quote = quote?;

    let mut value = String::new();
    loop {
        let chunk: ParserResult<&str> = take_while(0.., |c: char| c != quote).parse_next(input);
        value.push_str(chunk?);
        if !eat_char(input, quote) {
            return Err(expected("closing quote"));
        }
        if !eat_char(input, quote) {
            return Ok(value);
        }
        value.push(quote);
    }
}

fn parse_number(input: &mut Input<'_>) -> ParserResult<String> {
    let number: ParserResult<&str> = (opt('-'), digit1, opt(('.', digit1)))
        .take()
        .parse_next(input);
    number.map(str::to_string).map_err(|_| expected("number"))
}

/// Field reference, or a compound of them joined by `.`.
fn parse_reference(input: &mut Input<'_>) -> ParserResult<Node> {
    let mut parts = vec![Node::Field(parse_identifier(input)?.to_string())];
    while eat_char(input, '.') {
        parts.push(Node::Field(parse_identifier(input)?.to_string()));
    }

    if parts.len() == 1 {
        Ok(parts.remove(0))
    } else {
        Ok(Node::Compound(parts))
    }
}

fn parse_identifier<'a>(input: &mut Input<'a>) -> ParserResult<&'a str> {
    if !input.starts_with(is_ident_start) {
        return Err(expected("expression"));
    }

    let checkpoint = *input;
    let ident: ParserResult<&str> = take_while(1.., is_ident_continue).parse_next(input);
    let ident = ident?;

    if KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(ident)) {
        *input = checkpoint;
        return Err(invalid("keyword used as identifier"));
    }
    Ok(ident)
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Consume a binary logical operator in either spelling, with leading space.
fn eat_operator(input: &mut Input<'_>, word: &'static str, symbol: &'static str) -> bool {
    let checkpoint = *input;
    skip_space(input);
    if eat_keyword(input, word) || eat_symbol(input, symbol) {
        return true;
    }
    *input = checkpoint;
    false
}

/// Case-insensitive keyword that is not the prefix of a longer identifier.
fn eat_keyword(input: &mut Input<'_>, word: &'static str) -> bool {
    let checkpoint = *input;
    let matched: ParserResult<&str> = Caseless(word).parse_next(input);
    if matched.is_ok() && !input.starts_with(is_ident_continue) {
        return true;
    }
    *input = checkpoint;
    false
}

fn eat_symbol(input: &mut Input<'_>, symbol: &'static str) -> bool {
    let matched: ParserResult<&str> = literal(symbol).parse_next(input);
    matched.is_ok()
}

fn eat_char(input: &mut Input<'_>, c: char) -> bool {
    match input.strip_prefix(c) {
        Some(rest) => {
            *input = rest;
            true
        }
        None => false,
    }
}

/// Prefix `!`, but not the first half of `!=`.
fn eat_bang(input: &mut Input<'_>) -> bool {
    if input.starts_with("!=") {
        return false;
    }
    eat_char(input, '!')
}

fn skip_space(input: &mut Input<'_>) {
    // multispace0 can not fail on complete input.
    let _: ParserResult<&str> = multispace0.parse_next(input);
}

fn descend(depth: usize) -> ParserResult<usize> {
    if depth >= MAX_DEPTH {
        return Err(invalid("expression nesting depth"));
    }
    Ok(depth + 1)
}

fn expected(what: &'static str) -> ContextError {
    let mut err = ContextError::new();
    err.push(StrContext::Expected(StrContextValue::Description(what)));
    err
}

fn invalid(label: &'static str) -> ContextError {
    let mut err = ContextError::new();
    err.push(StrContext::Label(label));
    err
}

fn describe_error(err: &ContextError) -> String {
    let message = err.to_string().replace('\n', "; ");
    if message.is_empty() {
        "invalid expression".to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str) -> Node {
        Node::Field(name.to_string())
    }

    fn string(value: &str) -> Node {
        Node::Literal(Literal::Str(value.to_string()))
    }

    #[test]
    fn test_simple_eq() {
        let node = parse_expression("job == 'foo'").unwrap();
        assert_eq!(node, Node::compare(CompareOp::Eq, field("job"), string("foo")));
    }

    #[test]
    fn test_and_chain_nests_left() {
        let node = parse_expression("a == 'x' and b == 'y' and c == 'z'").unwrap();
        let Node::And(left, right) = &node else {
            panic!("Expected And");
        };
        assert!(matches!(**left, Node::And(..)));
        assert_eq!(**right, Node::compare(CompareOp::Eq, field("c"), string("z")));
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let node = parse_expression("a == 'x' or b == 'y' and c == 'z'").unwrap();
        let Node::Or(_, right) = &node else {
            panic!("Expected Or");
        };
        assert!(matches!(**right, Node::And(..)));
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let node = parse_expression("(a == 'x' or b == 'y') and c == 'z'").unwrap();
        let Node::And(left, _) = &node else {
            panic!("Expected And");
        };
        assert!(matches!(**left, Node::Or(..)));
    }

    #[test]
    fn test_symbolic_logical_operators() {
        let node = parse_expression("a == 'x' && !(b == 'y') || c == 'z'").unwrap();
        assert_eq!(node.to_string(), "(((a == 'x') and (not (b == 'y'))) or (c == 'z'))");
    }

    #[test]
    fn test_keywords_case_insensitive() {
        let node = parse_expression("job == 'a' AND deployment EQ 'b'").unwrap();
        assert_eq!(node.to_string(), "((job == 'a') and (deployment == 'b'))");
    }

    #[test]
    fn test_all_relational_operators() {
        for (text, op) in [
            ("==", CompareOp::Eq),
            ("!=", CompareOp::Ne),
            ("<", CompareOp::Lt),
            ("<=", CompareOp::Le),
            (">", CompareOp::Gt),
            (">=", CompareOp::Ge),
            ("ne", CompareOp::Ne),
            ("ge", CompareOp::Ge),
        ] {
            let node = parse_expression(&format!("x {} 1", text)).unwrap();
            assert!(
                matches!(node, Node::Compare { op: found, .. } if found == op),
                "operator {}",
                text
            );
        }
    }

    #[test]
    fn test_operators_without_spaces() {
        let node = parse_expression("job=='a'and origin!='b'").unwrap();
        assert_eq!(node.to_string(), "((job == 'a') and (origin != 'b'))");
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            parse_expression("-12.5").unwrap(),
            Node::Literal(Literal::Number("-12.5".to_string()))
        );
        assert_eq!(parse_expression("TRUE").unwrap(), Node::Literal(Literal::Bool(true)));
        assert_eq!(parse_expression("null").unwrap(), Node::Literal(Literal::Null));
        assert_eq!(parse_expression("\"dq\"").unwrap(), string("dq"));
    }

    #[test]
    fn test_doubled_quote_escape() {
        let node = parse_expression("job == 'it''s'").unwrap();
        assert_eq!(node, Node::compare(CompareOp::Eq, field("job"), string("it's")));
    }

    #[test]
    fn test_empty_string_literal() {
        let node = parse_expression("job == ''").unwrap();
        assert_eq!(node, Node::compare(CompareOp::Eq, field("job"), string("")));
    }

    #[test]
    fn test_compound_reference() {
        let node = parse_expression("build.status == 'ok'").unwrap();
        let Node::Compare { left, .. } = &node else {
            panic!("Expected Compare");
        };
        assert_eq!(**left, Node::Compound(vec![field("build"), field("status")]));
    }

    #[test]
    fn test_identifier_starting_with_keyword() {
        let node = parse_expression("android == 'x' and order == 'y'").unwrap();
        assert_eq!(node.to_string(), "((android == 'x') and (order == 'y'))");
    }

    #[test]
    fn test_keyword_as_identifier_is_error() {
        let err = parse_expression("and == 'x'").unwrap_err();
        assert_eq!(err.offset, 0);
    }

    #[test]
    fn test_empty_input_is_error() {
        assert!(parse_expression("").is_err());
        assert!(parse_expression("   ").is_err());
    }

    #[test]
    fn test_unterminated_string() {
        let err = parse_expression("job == 'foo").unwrap_err();
        assert_eq!(err.offset, "job == 'foo".len());
    }

    #[test]
    fn test_unbalanced_parentheses() {
        assert!(parse_expression("(job == 'a'").is_err());
        assert!(parse_expression("job == 'a')").is_err());
    }

    #[test]
    fn test_trailing_input_reports_offset() {
        let err = parse_expression("not a valid expression (((").unwrap_err();
        assert_eq!(err.offset, "not a ".len());
    }

    #[test]
    fn test_single_equals_is_error() {
        assert!(parse_expression("job = 'a'").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}job == 'a'{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert!(parse_expression(&deep).is_ok());

        let too_deep = format!("{}job == 'a'{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert!(parse_expression(&too_deep).is_err());

        let nots = format!("{}job", "not ".repeat(MAX_DEPTH * 4));
        assert!(parse_expression(&nots).is_err());
    }

    #[test]
    fn test_tabs_and_newlines_are_space() {
        let node = parse_expression("\tjob == 'a'\r\n\tand\n metric ==\t'b' \n").unwrap();
        assert_eq!(node.to_string(), "((job == 'a') and (metric == 'b'))");
    }

    #[test]
    fn test_long_chains_parse_and_drop() {
        let and_chain = vec!["job == 'a'"; 100_000].join(" and ");
        let node = parse_expression(&and_chain).unwrap();
        assert!(matches!(node, Node::And(..)));
        drop(node);

        let or_chain = vec!["not x.y == 1"; 100_000].join(" || ");
        let node = parse_expression(&or_chain).unwrap();
        assert!(matches!(node, Node::Or(..)));
        drop(node);
    }

    #[test]
    fn test_display_parses_back() {
        for source in [
            "job == 'a' and (deployment != 'it''s' or not metric.name >= -3)",
            "x == null or y == true",
        ] {
            let node = parse_expression(source).unwrap();
            let reparsed = parse_expression(&node.to_string()).unwrap();
            assert_eq!(node, reparsed);
        }
    }

    #[test]
    fn test_syntax_error_display() {
        let err = parse_expression("job ==").unwrap_err();
        assert!(err.to_string().starts_with("syntax error at offset"));
    }
}
