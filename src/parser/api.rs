use std::time::Instant;

use pest::error::{Error, ErrorVariant};
use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;
use tracing::debug;

use super::ast::*;

#[derive(Parser)]
#[grammar = "parser/class_grammar.pest"] // relative to src
pub struct ClassParser;

const TAB_WIDTH: usize = 2;

pub fn parse_to_token_tree(script: &str) -> Result<String, String> {
    let mut tree = vec![];
    let start = Instant::now();
    let result = ClassParser::parse(Rule::program, script);
    let total_time = Instant::now().saturating_duration_since(start);
    debug!(micros = total_time.as_micros() as u64, "parsed token tree");

    match result {
        Ok(pairs) => {
            for pair in pairs {
                tree.push(pair_to_string(pair, 0).join("\n"));
            }
        }
        Err(rule) => {
            return Err(format!("Parse error due to {:?}", rule));
        }
    }
    Ok(tree.join("\n"))
}

fn pair_to_string(pair: Pair<Rule>, level: usize) -> Vec<String> {
    let mut tree = vec![];
    let span = pair.as_span();
    let rule_name = format!(
        "{:?} => ({},{}) #{:?}",
        pair.as_rule(),
        span.start(),
        span.end(),
        span.as_str()
    );
    let string_pads = " ".repeat(level * TAB_WIDTH);
    tree.push(format!("{}{}", string_pads, rule_name));
    for child_pair in pair.into_inner() {
        tree.append(pair_to_string(child_pair, level + 1).as_mut());
    }
    tree
}

pub fn parse_to_pairs(script: &str) -> Result<Pairs<Rule>, Error<Rule>> {
    ClassParser::parse(Rule::program, script)
}

pub fn parse_to_ast(script: &str) -> Result<ProgramData, Error<Rule>> {
    let start = Instant::now();
    let mut pairs = ClassParser::parse(Rule::program, script)?;
    let program = match pairs.next() {
        Some(pair) => build_ast_from_program(pair)?,
        None => ProgramData { body: vec![] },
    };
    debug!(
        items = program.body.len(),
        micros = Instant::now().saturating_duration_since(start).as_micros() as u64,
        "parsed program"
    );
    Ok(program)
}

fn get_meta(pair: &Pair<Rule>) -> Meta {
    let span = pair.as_span();
    Meta {
        start_index: span.start(),
        end_index: span.end(),
    }
}

fn get_unexpected_error(id: i32, pair: &Pair<Rule>) -> Error<Rule> {
    let message = format!("Unexpected state reached [{:?}] - {}", pair.as_rule(), id);
    Error::new_from_span(ErrorVariant::CustomError { message }, pair.as_span())
}

/// Next child of `parent`; running out of children means the tree does not have the
/// shape the grammar promises.
fn next_child<'i>(
    id: i32,
    parent: &Pair<'i, Rule>,
    children: &mut Pairs<'i, Rule>,
) -> Result<Pair<'i, Rule>, Error<Rule>> {
    children
        .next()
        .ok_or_else(|| get_unexpected_error(id, parent))
}

fn build_ast_from_program(pair: Pair<Rule>) -> Result<ProgramData, Error<Rule>> {
    let mut body = vec![];
    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::class_declaration => {
                body.push(ItemType::Class(build_ast_from_class_declaration(
                    inner_pair,
                )?));
            }
            Rule::EOI => { /* Do nothing */ }
            _ => body.push(ItemType::Statement(build_ast_from_statement(inner_pair)?)),
        }
    }
    Ok(ProgramData { body })
}

fn build_ast_from_identifier(pair: Pair<Rule>) -> Result<IdentifierData, Error<Rule>> {
    if pair.as_rule() != Rule::identifier {
        return Err(get_unexpected_error(1, &pair));
    }
    Ok(IdentifierData {
        name: pair.as_str().to_string(),
        meta: get_meta(&pair),
    })
}

fn build_ast_from_class_declaration(pair: Pair<Rule>) -> Result<ClassDeclData, Error<Rule>> {
    let meta = get_meta(&pair);
    let mut pair_iter = pair.clone().into_inner();
    let name = build_ast_from_identifier(next_child(2, &pair, &mut pair_iter)?)?;
    let mut bases = vec![];
    let mut members = vec![];
    for inner_pair in pair_iter {
        match inner_pair.as_rule() {
            Rule::base_list => {
                for base in inner_pair.into_inner() {
                    bases.push(build_ast_from_identifier(base)?);
                }
            }
            Rule::hook_declaration => members.push(build_ast_from_hook_declaration(inner_pair)?),
            Rule::slot_declaration => members.push(build_ast_from_slot_declaration(inner_pair)?),
            _ => return Err(get_unexpected_error(3, &inner_pair)),
        }
    }
    Ok(ClassDeclData {
        name,
        bases,
        members,
        meta,
    })
}

fn build_ast_from_hook_declaration(pair: Pair<Rule>) -> Result<MemberType, Error<Rule>> {
    let meta = get_meta(&pair);
    let mut pair_iter = pair.clone().into_inner();
    let kind_pair = next_child(4, &pair, &mut pair_iter)?;
    let kind = match kind_pair.as_str() {
        "intercept" => HookKind::Intercept,
        "fallback" => HookKind::Fallback,
        _ => return Err(get_unexpected_error(5, &kind_pair)),
    };
    let native = build_ast_from_identifier(next_child(6, &pair, &mut pair_iter)?)?;
    Ok(MemberType::Hook { meta, kind, native })
}

fn build_ast_from_slot_declaration(pair: Pair<Rule>) -> Result<MemberType, Error<Rule>> {
    let meta = get_meta(&pair);
    let mut pair_iter = pair.clone().into_inner();
    let name = build_ast_from_identifier(next_child(7, &pair, &mut pair_iter)?)?;
    let value_pair = next_child(8, &pair, &mut pair_iter)?;
    let value = if value_pair.as_rule() == Rule::descriptor {
        build_ast_from_descriptor(value_pair)?
    } else {
        SlotValueType::Literal(build_ast_from_literal(value_pair)?)
    };
    Ok(MemberType::Slot { meta, name, value })
}

fn build_ast_from_descriptor(pair: Pair<Rule>) -> Result<SlotValueType, Error<Rule>> {
    let meta = get_meta(&pair);
    let mut pair_iter = pair.clone().into_inner();
    let kind_pair = next_child(9, &pair, &mut pair_iter)?;
    let kind = match kind_pair.as_str() {
        "data" => DescriptorKind::Data,
        "nondata" => DescriptorKind::NonData,
        "lazy" => DescriptorKind::Lazy,
        "field" => DescriptorKind::Field,
        "shared" => DescriptorKind::Shared,
        _ => return Err(get_unexpected_error(10, &kind_pair)),
    };
    let mut arguments = vec![];
    for argument_pair in pair_iter {
        let argument_meta = get_meta(&argument_pair);
        let mut argument_iter = argument_pair.clone().into_inner();
        let name = build_ast_from_identifier(next_child(11, &argument_pair, &mut argument_iter)?)?;
        let value_pair = next_child(12, &argument_pair, &mut argument_iter)?;
        let value = if value_pair.as_rule() == Rule::identifier {
            ArgumentValue::Identifier(build_ast_from_identifier(value_pair)?)
        } else {
            ArgumentValue::Literal(build_ast_from_literal(value_pair)?)
        };
        arguments.push(ArgumentData {
            name,
            value,
            meta: argument_meta,
        });
    }
    Ok(SlotValueType::Descriptor {
        meta,
        kind,
        arguments,
    })
}

fn build_ast_from_literal(pair: Pair<Rule>) -> Result<LiteralData, Error<Rule>> {
    let meta = get_meta(&pair);
    let value = match pair.as_rule() {
        Rule::none_literal => LiteralType::NoneLiteral,
        Rule::boolean_literal => LiteralType::BooleanLiteral(pair.as_str() == "True"),
        Rule::integer_literal => match pair.as_str().parse::<i64>() {
            Ok(i) => LiteralType::IntegerLiteral(i),
            Err(e) => {
                return Err(Error::new_from_span(
                    ErrorVariant::CustomError {
                        message: format!("Invalid integer literal: {}", e),
                    },
                    pair.as_span(),
                ))
            }
        },
        Rule::float_literal => match pair.as_str().parse::<f64>() {
            Ok(f) => LiteralType::FloatLiteral(f),
            Err(e) => {
                return Err(Error::new_from_span(
                    ErrorVariant::CustomError {
                        message: format!("Invalid float literal: {}", e),
                    },
                    pair.as_span(),
                ))
            }
        },
        Rule::string_literal => {
            let mut inner = pair.clone().into_inner();
            let text = next_child(13, &pair, &mut inner)?;
            LiteralType::StringLiteral(text.as_str().to_string())
        }
        _ => return Err(get_unexpected_error(14, &pair)),
    };
    Ok(LiteralData { value, meta })
}

fn build_ast_from_attribute_reference(pair: Pair<Rule>) -> Result<AttributeRefData, Error<Rule>> {
    if pair.as_rule() != Rule::attribute_reference {
        return Err(get_unexpected_error(15, &pair));
    }
    let meta = get_meta(&pair);
    let mut pair_iter = pair.clone().into_inner();
    let object = build_ast_from_identifier(next_child(16, &pair, &mut pair_iter)?)?;
    let attribute = build_ast_from_identifier(next_child(17, &pair, &mut pair_iter)?)?;
    Ok(AttributeRefData {
        object,
        attribute,
        meta,
    })
}

fn build_ast_from_expression(pair: Pair<Rule>) -> Result<ExpressionType, Error<Rule>> {
    Ok(match pair.as_rule() {
        Rule::attribute_reference => {
            ExpressionType::Attribute(build_ast_from_attribute_reference(pair)?)
        }
        Rule::super_reference => {
            let meta = get_meta(&pair);
            let mut pair_iter = pair.clone().into_inner();
            let class = build_ast_from_identifier(next_child(18, &pair, &mut pair_iter)?)?;
            let object = build_ast_from_identifier(next_child(19, &pair, &mut pair_iter)?)?;
            let attribute = build_ast_from_identifier(next_child(20, &pair, &mut pair_iter)?)?;
            ExpressionType::Super {
                meta,
                class,
                object,
                attribute,
            }
        }
        _ => ExpressionType::Literal(build_ast_from_literal(pair)?),
    })
}

fn build_ast_from_statement(pair: Pair<Rule>) -> Result<StatementType, Error<Rule>> {
    let meta = get_meta(&pair);
    let mut pair_iter = pair.clone().into_inner();
    Ok(match pair.as_rule() {
        Rule::let_statement => {
            let variable = build_ast_from_identifier(next_child(21, &pair, &mut pair_iter)?)?;
            let class = build_ast_from_identifier(next_child(22, &pair, &mut pair_iter)?)?;
            StatementType::Let {
                meta,
                variable,
                class,
            }
        }
        Rule::assign_statement => {
            let target =
                build_ast_from_attribute_reference(next_child(23, &pair, &mut pair_iter)?)?;
            let value = build_ast_from_expression(next_child(24, &pair, &mut pair_iter)?)?;
            StatementType::Assign {
                meta,
                target,
                value,
            }
        }
        Rule::delete_statement => {
            let target =
                build_ast_from_attribute_reference(next_child(25, &pair, &mut pair_iter)?)?;
            StatementType::Delete { meta, target }
        }
        Rule::print_statement => {
            let value = build_ast_from_expression(next_child(26, &pair, &mut pair_iter)?)?;
            StatementType::Print { meta, value }
        }
        Rule::try_statement => {
            let statement = build_ast_from_statement(next_child(27, &pair, &mut pair_iter)?)?;
            StatementType::Try {
                meta,
                statement: Box::new(statement),
            }
        }
        _ => return Err(get_unexpected_error(28, &pair)),
    })
}
