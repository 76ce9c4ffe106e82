use super::api::{parse_to_ast, parse_to_token_tree, ClassParser, Rule};
use super::ast::*;

use pest::consumes_to;
use pest::parses_to;
use pest::Parser;

#[test]
fn test_integer_literal() {
    parses_to! {
        parser: ClassParser,
        input: "-42",
        rule: Rule::integer_literal,
        tokens: [
            integer_literal(0, 3)
        ]
    };
}

#[test]
fn test_string_literal_keeps_inner_text() {
    parses_to! {
        parser: ClassParser,
        input: "'Urgh!!'",
        rule: Rule::string_literal,
        tokens: [
            string_literal(0, 8, [
                single_quoted(1, 7)
            ])
        ]
    };
}

#[test]
fn test_attribute_reference() {
    parses_to! {
        parser: ClassParser,
        input: "b.number",
        rule: Rule::attribute_reference,
        tokens: [
            attribute_reference(0, 8, [
                identifier(0, 1),
                identifier(2, 8)
            ])
        ]
    };
}

#[test]
fn test_print_statement() {
    parses_to! {
        parser: ClassParser,
        input: "print b.x",
        rule: Rule::print_statement,
        tokens: [
            print_statement(0, 9, [
                attribute_reference(6, 9, [
                    identifier(6, 7),
                    identifier(8, 9)
                ])
            ])
        ]
    };
}

#[test]
fn test_keywords_are_not_identifiers() {
    for keyword in &["class", "let", "new", "try", "del", "print", "super", "None", "True"] {
        assert!(
            ClassParser::parse(Rule::identifier, keyword).is_err(),
            "{} parsed as an identifier",
            keyword
        );
    }
    parses_to! {
        parser: ClassParser,
        input: "printer",
        rule: Rule::identifier,
        tokens: [
            identifier(0, 7)
        ]
    };
}

#[test]
fn test_keyword_prefixed_names_are_plain_assignments() {
    let program = parse_to_ast("printer.x = 1; tryst.y = 2; delta.z = None;").unwrap();
    assert_eq!(program.body.len(), 3);
    for item in &program.body {
        match item {
            ItemType::Statement(StatementType::Assign { .. }) => {}
            other => panic!("expected an assignment, got {:?}", other),
        }
    }
}

#[test]
fn test_class_declaration() {
    let program = parse_to_ast(
        "class NumericalC(Base) {
            number = field(check: one_digit, default: 0, store: _number);
            x = 'plain';
            fallback: fallback_dd_nd;
        }",
    )
    .unwrap();
    let class = match &program.body[0] {
        ItemType::Class(class) => class,
        other => panic!("expected a class, got {:?}", other),
    };
    assert_eq!(class.name.name, "NumericalC");
    assert_eq!(class.bases.len(), 1);
    assert_eq!(class.bases[0].name, "Base");
    assert_eq!(class.members.len(), 3);

    match &class.members[0] {
        MemberType::Slot {
            name,
            value: SlotValueType::Descriptor {
                kind, arguments, ..
            },
            ..
        } => {
            assert_eq!(name.name, "number");
            assert_eq!(*kind, DescriptorKind::Field);
            let names: Vec<&str> = arguments.iter().map(|a| a.name.name.as_str()).collect();
            assert_eq!(names, vec!["check", "default", "store"]);
            match &arguments[1].value {
                ArgumentValue::Literal(LiteralData {
                    value: LiteralType::IntegerLiteral(0),
                    ..
                }) => {}
                other => panic!("unexpected default {:?}", other),
            }
        }
        other => panic!("expected a descriptor slot, got {:?}", other),
    }
    match &class.members[1] {
        MemberType::Slot {
            value: SlotValueType::Literal(literal),
            ..
        } => assert_eq!(literal.value, LiteralType::StringLiteral("plain".to_string())),
        other => panic!("expected a plain slot, got {:?}", other),
    }
    match &class.members[2] {
        MemberType::Hook { kind, native, .. } => {
            assert_eq!(*kind, HookKind::Fallback);
            assert_eq!(native.name, "fallback_dd_nd");
        }
        other => panic!("expected a hook, got {:?}", other),
    }
}

#[test]
fn test_statements() {
    let program = parse_to_ast(
        "# comment line
         let b = new Foo;
         try b.number = 15;
         del b.number;
         print super(Foo, b).dd;
         print 1.5;",
    )
    .unwrap();
    assert_eq!(program.body.len(), 5);
    match &program.body[0] {
        ItemType::Statement(StatementType::Let {
            variable, class, ..
        }) => {
            assert_eq!(variable.name, "b");
            assert_eq!(class.name, "Foo");
        }
        other => panic!("unexpected {:?}", other),
    }
    match &program.body[1] {
        ItemType::Statement(StatementType::Try { statement, .. }) => match &**statement {
            StatementType::Assign { target, value, .. } => {
                assert_eq!(target.attribute.name, "number");
                match value {
                    ExpressionType::Literal(LiteralData {
                        value: LiteralType::IntegerLiteral(15),
                        ..
                    }) => {}
                    other => panic!("unexpected {:?}", other),
                }
            }
            other => panic!("unexpected {:?}", other),
        },
        other => panic!("unexpected {:?}", other),
    }
    match &program.body[3] {
        ItemType::Statement(StatementType::Print {
            value:
                ExpressionType::Super {
                    class,
                    object,
                    attribute,
                    ..
                },
            ..
        }) => {
            assert_eq!(class.name, "Foo");
            assert_eq!(object.name, "b");
            assert_eq!(attribute.name, "dd");
        }
        other => panic!("unexpected {:?}", other),
    }
    match &program.body[4] {
        ItemType::Statement(StatementType::Print {
            value: ExpressionType::Literal(literal),
            ..
        }) => assert_eq!(literal.value, LiteralType::FloatLiteral(1.5)),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_meta_spans_source() {
    let source = "let b = new Foo;";
    let program = parse_to_ast(source).unwrap();
    match &program.body[0] {
        ItemType::Statement(statement) => {
            let meta = statement.get_meta();
            assert_eq!(&source[meta.start_index..meta.end_index], "let b = new Foo");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_integer_overflow_is_an_error() {
    let err = parse_to_ast("class A { x = 99999999999999999999; }").unwrap_err();
    assert!(err.to_string().contains("Invalid integer literal"));
}

#[test]
fn test_syntax_errors() {
    assert!(parse_to_ast("class A { x = 1 }").is_err());
    assert!(parse_to_ast("let b = Foo;").is_err());
    assert!(parse_to_ast("try let b = new Foo;").is_err());
    assert!(parse_to_ast("print b;").is_err());
}

#[test]
fn test_token_tree() {
    let tree = parse_to_token_tree("print 1;").unwrap();
    assert!(tree.starts_with("program => (0,8)"));
    assert!(tree.contains("    integer_literal => (6,7) #\"1\""));
}
