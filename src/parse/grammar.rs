use winnow::ascii::{multispace1, till_line_ending};
use winnow::combinator::{alt, cut_err, delimited, fail, opt, preceded, repeat, separated};
use winnow::error::{ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::stream::Stream;
use winnow::token::{any, take_while};

use crate::{Rule, Selector, Value};

use super::parser::ParsedRules;

// -- Whitespace & comments --------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    let _: () = repeat(
        0..,
        alt((
            take_while(1.., |c: char| c.is_ascii_whitespace()).void(),
            ('#', till_line_ending).void(),
        )),
    )
    .parse_next(input)?;
    Ok(())
}

// -- Identifiers ------------------------------------------------------------

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| {
            c.is_ascii_alphanumeric() || c == '_' || c == '.'
        }),
    )
        .take()
        .parse_next(input)
}

// -- Values -----------------------------------------------------------------

fn string_literal(input: &mut &str) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = any.parse_next(input)?;
        match ch {
            '"' => return Ok(s),
            '\\' => {
                let esc = any.parse_next(input)?;
                match esc {
                    '"' => s.push('"'),
                    '\\' => s.push('\\'),
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

fn bare_value<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
    })
    .parse_next(input)
}

fn value(input: &mut &str) -> ModalResult<Value> {
    ws.parse_next(input)?;
    alt((
        string_literal.map(Value::from),
        bare_value.map(Value::from),
    ))
    .context(StrContext::Expected(StrContextValue::Description("value")))
    .parse_next(input)
}

fn value_list(input: &mut &str) -> ModalResult<Vec<Value>> {
    ws.parse_next(input)?;
    delimited(
        '[',
        separated(0.., value, (ws, ',')),
        (ws, cut_err(']')),
    )
    .context(StrContext::Expected(StrContextValue::Description(
        "value list",
    )))
    .parse_next(input)
}

// -- Selectors --------------------------------------------------------------

fn selector(input: &mut &str) -> ModalResult<Selector> {
    ws.parse_next(input)?;
    alt((
        preceded(("not", multispace1, "in"), cut_err(value_list))
            .map(|values| Selector::Negative(values.into_iter().collect())),
        preceded("in", cut_err(value_list))
            .map(|values| Selector::Positive(values.into_iter().collect())),
        "any".value(Selector::Any),
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "`in [...]`, `not in [...]` or `any`",
    )))
    .parse_next(input)
}

fn clause(input: &mut &str) -> ModalResult<(String, Selector)> {
    ws.parse_next(input)?;
    let attribute = ident
        .context(StrContext::Expected(StrContextValue::Description(
            "attribute name",
        )))
        .parse_next(input)?;
    let sel = cut_err(selector).parse_next(input)?;
    Ok((attribute.to_owned(), sel))
}

// -- Declarations -----------------------------------------------------------

fn attributes_decl(input: &mut &str) -> ModalResult<Vec<String>> {
    ws.parse_next(input)?;
    ("attributes", multispace1).parse_next(input)?;
    let names: Vec<&str> = cut_err(separated(1.., preceded(ws, ident), (ws, ',')))
        .context(StrContext::Expected(StrContextValue::Description(
            "attribute names",
        )))
        .parse_next(input)?;
    Ok(names.into_iter().map(str::to_owned).collect())
}

fn rule_def(input: &mut &str) -> ModalResult<Rule> {
    ws.parse_next(input)?;
    ("rule", multispace1).parse_next(input)?;

    let code = cut_err(ident)
        .context(StrContext::Expected(StrContextValue::Description(
            "rule code",
        )))
        .parse_next(input)?;

    let start = input.checkpoint();
    let clauses: Vec<(String, Selector)> = opt(preceded(
        (ws, ':'),
        cut_err(separated(1.., clause, (ws, ','))),
    ))
    .parse_next(input)?
    .unwrap_or_default();

    if has_repeated_attribute(&clauses) {
        input.reset(&start);
        return cut_err(fail)
            .context(StrContext::Expected(StrContextValue::Description(
                "each attribute at most once per rule",
            )))
            .parse_next(input);
    }

    let mut rule = Rule::new(code);
    for (attribute, sel) in clauses {
        rule = rule.with(&attribute, sel);
    }
    Ok(rule)
}

fn has_repeated_attribute(clauses: &[(String, Selector)]) -> bool {
    let mut seen = std::collections::HashSet::new();
    clauses.iter().any(|(attribute, _)| !seen.insert(attribute.as_str()))
}

// -- Top-level parser -------------------------------------------------------

pub fn parse_rules(input: &mut &str) -> ModalResult<ParsedRules> {
    let attributes = attributes_decl
        .context(StrContext::Expected(StrContextValue::Description(
            "`attributes` declaration",
        )))
        .parse_next(input)?;

    let rules: Vec<Rule> = repeat(0.., rule_def).parse_next(input)?;

    ws.parse_next(input)?;

    Ok(ParsedRules { attributes, rules })
}
