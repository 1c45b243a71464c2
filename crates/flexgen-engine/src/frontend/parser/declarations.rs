//! Declaration scanning.
//!
//! Each `parse_*` function starts at the first token of a declaration and
//! consumes it through its terminating `;` or closing `}`.

use super::attributes::{at_attribute, parse_attribute, parse_attributes};
use super::recovery::{sync_to_declaration_boundary, LoopGuard};
use super::types::{is_dropped_specifier, render};
use super::{ParseError, Parser, Scope};
use crate::frontend::decl::{Access, Annotation, Decl, DeclId, DeclKind, RecordTag};
use crate::frontend::token::{Span, Token};

/// Scan declarations into `parent` until end of file or the `}` closing the
/// current body (left unconsumed).
pub fn parse_declarations(parser: &mut Parser, parent: DeclId, scope: Scope) {
    let mut guard = LoopGuard::new("declarations");

    while !parser.at_eof() {
        if let Err(err) = guard.check(parser.pos(), parser.current_span()) {
            parser.push_error(err);
            parser.advance();
            continue;
        }

        match parser.current() {
            Token::RightBrace if scope == Scope::File => {
                let span = parser.current_span();
                parser.push_error(ParseError::invalid_syntax("unmatched '}'", span));
                parser.advance();
            }
            Token::RightBrace => return,
            // Empty declaration
            Token::Semicolon => {
                parser.advance();
            }
            _ => {
                if let Err(err) = parse_declaration(parser, parent, scope) {
                    parser.push_error(err);
                    sync_to_declaration_boundary(parser);
                }
            }
        }
    }
}

/// Scan one declaration.
pub fn parse_declaration(
    parser: &mut Parser,
    parent: DeclId,
    scope: Scope,
) -> Result<(), ParseError> {
    let start = parser.current_span();
    if scope == Scope::Record {
        if let Some(name) = skip_unterminated_macro(parser) {
            let decl = Decl::new(DeclKind::Other, name, start.to(&parser.previous_span()));
            parser.tree_mut().add(parent, decl);
            return Ok(());
        }
    }

    let mut annotations = Vec::new();
    let mut is_template = false;

    loop {
        if at_attribute(parser) {
            parse_attribute(parser, &mut annotations)?;
        } else if parser.check(&Token::Template) {
            is_template = true;
            parser.advance();
            if parser.check(&Token::Less) {
                parser.skip_angle_group()?;
            }
        } else if parser.current().is_ident("inline") && parser.peek() == Some(&Token::Namespace) {
            parser.advance();
        } else {
            break;
        }
    }

    match parser.current() {
        Token::Public | Token::Protected | Token::Private
            if parser.peek() == Some(&Token::Colon) =>
        {
            parse_access_spec(parser, parent, start, annotations)
        }
        Token::Namespace => parse_namespace(parser, parent, start, annotations),
        Token::Extern if matches!(parser.peek(), Some(Token::StringLiteral(_))) => {
            if parser.peek_at(2) == Some(&Token::LeftBrace) {
                parse_linkage_block(parser, parent, start, annotations)
            } else {
                // extern "C" int f();
                parser.advance();
                parser.advance();
                parse_simple_declaration(parser, parent, scope, start, annotations, is_template)
            }
        }
        Token::Struct | Token::Class | Token::Union => {
            parse_record(parser, parent, scope, start, annotations, is_template)
        }
        Token::Enum | Token::Using | Token::Typedef | Token::StaticAssert => {
            parse_other(parser, parent, start, annotations)
        }
        _ => parse_simple_declaration(parser, parent, scope, start, annotations, is_template),
    }
}

/// A macro invocation alone on its line inside a record body, written
/// without a `;`: `Q_OBJECT`, `Q_PROPERTY(int x READ x)`. Consumes it and
/// returns the macro name; leaves the parser untouched otherwise.
fn skip_unterminated_macro(parser: &mut Parser) -> Option<String> {
    let from = parser.pos();
    let name = match parser.current() {
        Token::Identifier(name) if is_macro_like(name) => name.clone(),
        _ => return None,
    };
    parser.advance();
    if parser.check(&Token::LeftParen) && parser.skip_group().is_err() {
        parser.rewind(from);
        return None;
    }

    let line = parser.previous_span().line;
    if parser.current_span().line > line && begins_declaration(parser) {
        Some(name)
    } else {
        parser.rewind(from);
        None
    }
}

/// All-caps names such as `Q_OBJECT` or `DECLARE_TYPE`.
fn is_macro_like(name: &str) -> bool {
    name.len() > 1
        && name.bytes().any(|b| b.is_ascii_uppercase())
        && name
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
}

/// Whether the current token can start a member declaration.
fn begins_declaration(parser: &Parser) -> bool {
    match parser.current() {
        Token::LeftBracket => parser.peek() == Some(&Token::LeftBracket),
        token => matches!(
            token,
            Token::Identifier(_)
                | Token::Macro(_)
                | Token::Struct
                | Token::Class
                | Token::Union
                | Token::Enum
                | Token::Public
                | Token::Protected
                | Token::Private
                | Token::Template
                | Token::Typedef
                | Token::Using
                | Token::Operator
                | Token::Friend
                | Token::StaticAssert
                | Token::Attribute
                | Token::Tilde
                | Token::RightBrace
        ),
    }
}

fn parse_access_spec(
    parser: &mut Parser,
    parent: DeclId,
    start: Span,
    annotations: Vec<Annotation>,
) -> Result<(), ParseError> {
    let access = match parser.advance() {
        Token::Public => Access::Public,
        Token::Protected => Access::Protected,
        _ => Access::Private,
    };
    parser.expect(Token::Colon)?;

    let span = start.to(&parser.previous_span());
    let decl = Decl::new(DeclKind::AccessSpec { access }, "", span).with_annotations(annotations);
    parser.tree_mut().add(parent, decl);
    Ok(())
}

fn parse_namespace(
    parser: &mut Parser,
    parent: DeclId,
    start: Span,
    mut annotations: Vec<Annotation>,
) -> Result<(), ParseError> {
    parser.advance();
    parse_attributes(parser, &mut annotations)?;

    // namespace a::b::c
    let mut segments = Vec::new();
    while let Some(segment) = parser.current().ident().map(str::to_string) {
        parser.advance();
        segments.push(segment);
        if !parser.check(&Token::ColonColon) {
            break;
        }
        parser.advance();
    }
    parse_attributes(parser, &mut annotations)?;

    // namespace alias = target;
    if parser.check(&Token::Equal) {
        let end = parser.skip_to_semicolon()?;
        let decl = Decl::new(DeclKind::Other, segments.join("::"), start.to(&end))
            .with_annotations(annotations);
        parser.tree_mut().add(parent, decl);
        return Ok(());
    }

    let decl = Decl::new(DeclKind::Namespace, segments.join("::"), start)
        .with_annotations(annotations);
    parse_body(parser, parent, decl, Scope::Namespace)
}

/// `extern "C" { ... }`
fn parse_linkage_block(
    parser: &mut Parser,
    parent: DeclId,
    start: Span,
    annotations: Vec<Annotation>,
) -> Result<(), ParseError> {
    parser.advance();
    parser.advance();
    let decl = Decl::new(DeclKind::Namespace, "", start).with_annotations(annotations);
    parse_body(parser, parent, decl, Scope::Namespace)
}

/// Parse the `{ ... }` body of a namespace-like declaration and add it.
fn parse_body(
    parser: &mut Parser,
    parent: DeclId,
    decl: Decl,
    scope: Scope,
) -> Result<(), ParseError> {
    let open = parser.current_span();
    parser.expect(Token::LeftBrace)?;

    let start = decl.span;
    let id = parser.tree_mut().add(parent, decl);
    parser.enter(open)?;
    parse_declarations(parser, id, scope);
    parser.leave();
    let close = parser.expect_closing_brace(open)?;

    let node = parser.tree_mut().get_mut(id);
    node.span = start.to(&close);
    node.body_close = Some(close);
    Ok(())
}

fn parse_record(
    parser: &mut Parser,
    parent: DeclId,
    scope: Scope,
    start: Span,
    mut annotations: Vec<Annotation>,
    is_template: bool,
) -> Result<(), ParseError> {
    let tag_pos = parser.pos();
    let leading_annotations = annotations.len();
    let tag = match parser.advance() {
        Token::Class => RecordTag::Class,
        Token::Union => RecordTag::Union,
        _ => RecordTag::Struct,
    };
    parse_attributes(parser, &mut annotations)?;

    // The last identifier before the body is the name; anything before it
    // (export macros, qualifiers) is skipped.
    let mut name = String::new();
    while let Some(ident) = parser.current().ident().map(str::to_string) {
        if ident == "final" && matches!(parser.peek(), Some(Token::LeftBrace | Token::Colon)) {
            break;
        }
        parser.advance();
        name = ident;
        if parser.check(&Token::Less) {
            parser.skip_angle_group()?;
        }
        if parser.check(&Token::ColonColon) {
            parser.advance();
        }
        parse_attributes(parser, &mut annotations)?;
    }
    if parser.current().is_ident("final") {
        parser.advance();
    }

    match parser.current() {
        Token::LeftBrace => {}
        Token::Colon => {
            // Base clause
            parser.advance();
            while !parser.check(&Token::LeftBrace) {
                match parser.current() {
                    Token::Less => parser.skip_angle_group()?,
                    Token::LeftParen | Token::LeftBracket => parser.skip_group()?,
                    Token::Semicolon | Token::RightBrace | Token::Eof => {
                        return Err(parser.unexpected_token(&[Token::LeftBrace]));
                    }
                    _ => {
                        parser.advance();
                    }
                }
            }
        }
        Token::Semicolon => {
            // Forward declaration
            parser.advance();
            let span = start.to(&parser.previous_span());
            let decl = Decl::new(DeclKind::Other, name, span).with_annotations(annotations);
            parser.tree_mut().add(parent, decl);
            return Ok(());
        }
        _ => {
            // Elaborated type in a declaration: `struct S* next;`
            parser.rewind(tag_pos);
            annotations.truncate(leading_annotations);
            return parse_simple_declaration(
                parser,
                parent,
                scope,
                start,
                annotations,
                is_template,
            );
        }
    }

    let open = parser.current_span();
    parser.advance();
    let decl = Decl::new(DeclKind::Record { tag }, name, start).with_annotations(annotations);
    let id = parser.tree_mut().add(parent, decl);

    parser.enter(open)?;
    parse_declarations(parser, id, Scope::Record);
    parser.leave();
    let close = parser.expect_closing_brace(open)?;

    // Declarators after the body: `struct { ... } a, b;`
    let end = parser.skip_to_semicolon()?;

    let node = parser.tree_mut().get_mut(id);
    node.span = start.to(&end);
    node.body_close = Some(close);
    Ok(())
}

/// `enum`, `using`, `typedef`, `static_assert`: recorded without structure.
fn parse_other(
    parser: &mut Parser,
    parent: DeclId,
    start: Span,
    annotations: Vec<Annotation>,
) -> Result<(), ParseError> {
    let end = parser.skip_to_semicolon()?;
    let decl = Decl::new(DeclKind::Other, "", start.to(&end)).with_annotations(annotations);
    parser.tree_mut().add(parent, decl);
    Ok(())
}

/// Identifiers that look like a call but belong to a type: `decltype(x)`.
fn is_type_operator(name: &str) -> bool {
    matches!(
        name,
        "decltype" | "typeof" | "__typeof__" | "_Atomic" | "__underlying_type"
    )
}

/// Fields, methods, functions and variables.
///
/// Templated functions and variables are recorded as [`DeclKind::Other`].
fn parse_simple_declaration(
    parser: &mut Parser,
    parent: DeclId,
    scope: Scope,
    start: Span,
    mut annotations: Vec<Annotation>,
    is_template: bool,
) -> Result<(), ParseError> {
    let mut type_tokens: Vec<(Token, Span)> = Vec::new();
    let mut operator_name = None;
    let mut is_friend = false;
    let mut is_static = false;

    // Declaration specifiers and declarator up to the name
    loop {
        if at_attribute(parser) {
            parse_attribute(parser, &mut annotations)?;
            continue;
        }
        match parser.current() {
            // A macro invocation without `;` ran into the next access specifier
            Token::Public | Token::Protected | Token::Private
                if scope == Scope::Record && parser.peek() == Some(&Token::Colon) =>
            {
                let span = start.to(&parser.previous_span());
                let decl = Decl::new(DeclKind::Other, "", span).with_annotations(annotations);
                parser.tree_mut().add(parent, decl);
                return Ok(());
            }
            Token::LeftParen
            | Token::RightParen
            | Token::Semicolon
            | Token::Equal
            | Token::Comma
            | Token::LeftBracket
            | Token::RightBracket
            | Token::LeftBrace
            | Token::RightBrace
            | Token::Colon
            | Token::Eof => break,
            Token::Less => {
                let from = parser.pos();
                parser.skip_angle_group()?;
                type_tokens.extend_from_slice(parser.tokens_between(from, parser.pos()));
            }
            Token::Operator => {
                operator_name = Some(parse_operator_name(parser)?);
                break;
            }
            Token::Identifier(name) if is_type_operator(name) => {
                let from = parser.pos();
                parser.advance();
                if parser.check(&Token::LeftParen) {
                    parser.skip_group()?;
                }
                type_tokens.extend_from_slice(parser.tokens_between(from, parser.pos()));
            }
            token if is_dropped_specifier(token) => {
                is_friend |= *token == Token::Friend;
                is_static |= token.is_ident("static");
                parser.advance();
            }
            _ => {
                type_tokens.push((parser.current().clone(), parser.current_span()));
                parser.advance();
            }
        }
    }

    // Function pointer declarators are not modelled
    if parser.check(&Token::LeftParen)
        && matches!(parser.peek(), Some(Token::Star | Token::Amp | Token::AmpAmp))
    {
        return finish_other(parser, parent, start, annotations);
    }

    let name = match operator_name {
        Some(name) => name,
        None => match split_declarator_name(&mut type_tokens) {
            Some(name) => name,
            None => return finish_other(parser, parent, start, annotations),
        },
    };

    let source = parser.source();
    if parser.check(&Token::LeftParen) {
        let trailing = parse_function_rest(parser, &mut annotations)?;
        let return_type = match trailing {
            Some(ty) => ty,
            None if type_tokens.is_empty() => match name.strip_prefix("operator ") {
                // Conversion operator
                Some(target) => target.to_string(),
                // Constructor or destructor
                None => "void".to_string(),
            },
            None => render(&type_tokens, source),
        };

        let kind = if is_friend || is_template {
            DeclKind::Other
        } else if scope == Scope::Record {
            DeclKind::Method { return_type }
        } else {
            DeclKind::Function { return_type }
        };
        let span = start.to(&parser.previous_span());
        let decl = Decl::new(kind, name, span).with_annotations(annotations);
        parser.tree_mut().add(parent, decl);
        return Ok(());
    }

    // Attributes written before the declarator apply to every declarator
    let specifier_annotations = annotations.clone();
    let base_type = declarator_base(&type_tokens).to_vec();

    parse_array_bounds(parser, &mut type_tokens)?;
    parse_attributes(parser, &mut annotations)?;
    skip_declarator_rest(parser)?;

    let mut declarators = vec![(name, type_tokens, annotations)];
    while parser.check(&Token::Comma) {
        parser.advance();
        match parse_further_declarator(parser, &base_type, &specifier_annotations)? {
            Some(declarator) => declarators.push(declarator),
            None => break,
        }
    }
    let end = parser.skip_to_semicolon()?;

    for (name, type_tokens, annotations) in declarators {
        let ty = render(&type_tokens, source);
        let kind = if is_friend || is_template {
            DeclKind::Other
        } else if scope == Scope::Record && !is_static {
            DeclKind::Field { ty }
        } else {
            DeclKind::Variable { ty }
        };
        let decl = Decl::new(kind, name, start.to(&end)).with_annotations(annotations);
        parser.tree_mut().add(parent, decl);
    }
    Ok(())
}

/// Name, type tokens and annotations of one declarator.
type Declarator = (String, Vec<(Token, Span)>, Vec<Annotation>);

/// The decl-specifier part of a declarator's type: everything before the
/// first top-level `*`, `&`, `&&` or `[`.
fn declarator_base(tokens: &[(Token, Span)]) -> &[(Token, Span)] {
    let mut depth = 0usize;
    for (i, (token, _)) in tokens.iter().enumerate() {
        match token {
            Token::Less | Token::LeftParen => depth += 1,
            Token::Greater | Token::RightParen => depth = depth.saturating_sub(1),
            Token::Star | Token::Amp | Token::AmpAmp | Token::LeftBracket if depth == 0 => {
                return &tokens[..i];
            }
            _ => {}
        }
    }
    tokens
}

/// Array bounds belong to the type.
fn parse_array_bounds(
    parser: &mut Parser,
    type_tokens: &mut Vec<(Token, Span)>,
) -> Result<(), ParseError> {
    while parser.check(&Token::LeftBracket) && !at_attribute(parser) {
        let from = parser.pos();
        parser.skip_group()?;
        type_tokens.extend_from_slice(parser.tokens_between(from, parser.pos()));
    }
    Ok(())
}

/// Bit-field width and initializer of a declarator.
fn skip_declarator_rest(parser: &mut Parser) -> Result<(), ParseError> {
    if parser.check(&Token::Colon) {
        parser.advance();
        parser.skip_until(&[Token::Equal, Token::LeftBrace, Token::Semicolon, Token::Comma])?;
    }

    if parser.check(&Token::Equal) {
        parser.advance();
        parser.skip_until(&[Token::Comma, Token::Semicolon])?;
    } else if parser.check(&Token::LeftBrace) {
        parser.skip_group()?;
    }
    Ok(())
}

/// A declarator after a `,`: `b` and `*c` in `int a, b, *c;`. `None` for
/// declarators that are not plain variables (functions, function pointers)
/// or when a comma inside an initializer was taken for a separator.
fn parse_further_declarator(
    parser: &mut Parser,
    base_type: &[(Token, Span)],
    specifier_annotations: &[Annotation],
) -> Result<Option<Declarator>, ParseError> {
    let mut type_tokens = base_type.to_vec();
    let mut annotations = specifier_annotations.to_vec();

    loop {
        if at_attribute(parser) {
            parse_attribute(parser, &mut annotations)?;
            continue;
        }
        match parser.current() {
            Token::Star | Token::Amp | Token::AmpAmp => {}
            Token::Identifier(word) if matches!(word.as_str(), "const" | "volatile") => {}
            _ => break,
        }
        type_tokens.push((parser.current().clone(), parser.current_span()));
        parser.advance();
    }

    let Some(name) = parser.current().ident().map(str::to_string) else {
        return Ok(None);
    };
    parser.advance();
    if parser.check(&Token::LeftParen) {
        return Ok(None);
    }

    parse_array_bounds(parser, &mut type_tokens)?;
    parse_attributes(parser, &mut annotations)?;
    skip_declarator_rest(parser)?;

    if matches!(parser.current(), Token::Comma | Token::Semicolon) {
        Ok(Some((name, type_tokens, annotations)))
    } else {
        Ok(None)
    }
}

/// Take the declarator name off the end of `tokens`, dropping its
/// qualifier (`Outer::name`) and destructor `~`. `None` if the tokens do not
/// end in a name.
fn split_declarator_name(tokens: &mut Vec<(Token, Span)>) -> Option<String> {
    let ident = match tokens.last() {
        Some((Token::Identifier(ident), _)) => ident.clone(),
        _ => return None,
    };
    tokens.pop();

    let name = if matches!(tokens.last(), Some((Token::Tilde, _))) {
        tokens.pop();
        format!("~{}", ident)
    } else {
        ident
    };

    // Qualifier: `A::B<T>::name`
    while matches!(tokens.last(), Some((Token::ColonColon, _))) {
        tokens.pop();
        if matches!(tokens.last(), Some((Token::Greater, _))) {
            let mut depth = 0usize;
            while let Some((token, _)) = tokens.pop() {
                match token {
                    Token::Greater => depth += 1,
                    Token::Less => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                }
            }
        }
        if matches!(tokens.last(), Some((Token::Identifier(_), _))) {
            tokens.pop();
        }
    }

    Some(name)
}

/// `operator==`, `operator()`, `operator new[]`, `operator bool`
fn parse_operator_name(parser: &mut Parser) -> Result<String, ParseError> {
    let from = parser.pos();
    parser.advance();

    if parser.check(&Token::LeftParen) && parser.peek() == Some(&Token::RightParen) {
        parser.advance();
        parser.advance();
    }
    while !parser.check(&Token::LeftParen) {
        match parser.current() {
            Token::LeftBracket => parser.skip_group()?,
            Token::Semicolon | Token::LeftBrace | Token::RightBrace | Token::Eof => {
                return Err(parser.unexpected_token(&[Token::LeftParen]));
            }
            _ => {
                parser.advance();
            }
        }
    }

    Ok(render(parser.tokens_between(from, parser.pos()), parser.source()))
}

/// Everything after a function's name: parameters, qualifiers, trailing
/// return type, and then `;`, `= default;`, or a body. Returns the trailing
/// return type if one was written.
fn parse_function_rest(
    parser: &mut Parser,
    annotations: &mut Vec<Annotation>,
) -> Result<Option<String>, ParseError> {
    parser.skip_group()?;

    let mut trailing = None;
    loop {
        if at_attribute(parser) {
            parse_attribute(parser, annotations)?;
            continue;
        }
        match parser.current() {
            Token::Identifier(word)
                if matches!(word.as_str(), "const" | "volatile" | "override" | "final") =>
            {
                parser.advance();
            }
            Token::Identifier(word) if matches!(word.as_str(), "noexcept" | "throw") => {
                parser.advance();
                if parser.check(&Token::LeftParen) {
                    parser.skip_group()?;
                }
            }
            Token::Identifier(word) if word == "requires" => {
                parser.advance();
                parser.skip_until(&[Token::LeftBrace, Token::Semicolon, Token::Equal])?;
            }
            Token::Amp | Token::AmpAmp => {
                parser.advance();
            }
            Token::Arrow => {
                parser.advance();
                trailing = Some(parse_trailing_return(parser)?);
            }
            _ => break,
        }
    }

    match parser.current() {
        Token::Semicolon => {
            parser.advance();
        }
        Token::Equal => {
            // = 0 / = default / = delete
            parser.advance();
            parser.advance();
            parser.expect(Token::Semicolon)?;
        }
        Token::Colon => {
            skip_initializer_list(parser)?;
            parser.skip_group()?;
        }
        Token::LeftBrace => parser.skip_group()?,
        Token::Identifier(word) if word == "try" => {
            parser.advance();
            if parser.check(&Token::Colon) {
                skip_initializer_list(parser)?;
            }
            parser.skip_group()?;
            while parser.current().is_ident("catch") {
                parser.advance();
                parser.skip_group()?;
                parser.skip_group()?;
            }
        }
        _ => return Err(parser.unexpected_token(&[Token::Semicolon, Token::LeftBrace])),
    }

    Ok(trailing)
}

fn parse_trailing_return(parser: &mut Parser) -> Result<String, ParseError> {
    let mut tokens: Vec<(Token, Span)> = Vec::new();
    loop {
        match parser.current() {
            Token::LeftBrace | Token::Semicolon | Token::Equal | Token::Eof => break,
            Token::Identifier(word)
                if matches!(word.as_str(), "override" | "final" | "requires") =>
            {
                break
            }
            Token::Less => {
                let from = parser.pos();
                parser.skip_angle_group()?;
                tokens.extend_from_slice(parser.tokens_between(from, parser.pos()));
            }
            Token::LeftParen | Token::LeftBracket => {
                let from = parser.pos();
                parser.skip_group()?;
                tokens.extend_from_slice(parser.tokens_between(from, parser.pos()));
            }
            _ => {
                tokens.push((parser.current().clone(), parser.current_span()));
                parser.advance();
            }
        }
    }
    Ok(render(&tokens, parser.source()))
}

/// `: a(1), b{2}, Base<T>(x)...` up to the body.
fn skip_initializer_list(parser: &mut Parser) -> Result<(), ParseError> {
    parser.expect(Token::Colon)?;
    loop {
        // Member or base name
        loop {
            match parser.current() {
                Token::Identifier(_) | Token::ColonColon | Token::Template => {
                    parser.advance();
                }
                Token::Less => parser.skip_angle_group()?,
                _ => break,
            }
        }
        match parser.current() {
            Token::LeftParen | Token::LeftBrace => parser.skip_group()?,
            _ => return Err(parser.unexpected_token(&[Token::LeftParen, Token::LeftBrace])),
        }
        if parser.check(&Token::Ellipsis) {
            parser.advance();
        }
        if parser.check(&Token::Comma) {
            parser.advance();
            continue;
        }
        break;
    }

    if parser.check(&Token::LeftBrace) {
        Ok(())
    } else {
        Err(parser.unexpected_token(&[Token::LeftBrace]))
    }
}

/// Record an unmodelled declaration, skipping to its end.
fn finish_other(
    parser: &mut Parser,
    parent: DeclId,
    start: Span,
    annotations: Vec<Annotation>,
) -> Result<(), ParseError> {
    let end = parser.skip_to_semicolon()?;
    let decl = Decl::new(DeclKind::Other, "", start.to(&end)).with_annotations(annotations);
    parser.tree_mut().add(parent, decl);
    Ok(())
}
