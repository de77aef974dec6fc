//! Unit tests for the parser.
//!
//! These run the default grammar's tables over small programs and check the
//! shape of the resulting tree.

use std::rc::Rc;

use crate::{
    ast::ast::{BinaryExpr, BinaryOp, FuncDef, IfStmt, Node, NumberValue, TypeName, VarDecl},
    errors::errors::Error,
    grammar::{table::ParseTable, DEFAULT_GRAMMAR},
    lexer::{lexer::tokenize, tokens::TokenStream},
};

use super::parser::parse;

fn parse_source(source: &str) -> Result<Node, Error> {
    let table = ParseTable::build(DEFAULT_GRAMMAR).unwrap();
    let tokens = tokenize(source, Some("test.c".to_string())).unwrap();
    parse(&table, &mut TokenStream::new(tokens), Rc::new("test.c".to_string()))
}

fn items(node: Node) -> Vec<Node> {
    match node {
        Node::CompUnit(items) => items,
        other => panic!("expected a compilation unit, found {:?}", other),
    }
}

fn function(node: &Node) -> &FuncDef {
    match node {
        Node::FuncDef(function) => function,
        other => panic!("expected a function, found {:?}", other),
    }
}

fn binary(node: &Node) -> &BinaryExpr {
    match node {
        Node::Binary(binary) => binary,
        other => panic!("expected a binary expression, found {:?}", other),
    }
}

fn declaration(node: &Node) -> &VarDecl {
    match node {
        Node::VarDecl(declaration) => declaration,
        other => panic!("expected a declaration, found {:?}", other),
    }
}

fn ident(node: &Node) -> &str {
    match node {
        Node::Ident(name) => &name.value,
        other => panic!("expected an identifier, found {:?}", other),
    }
}

fn int(node: &Node) -> i32 {
    match node {
        Node::Number(NumberValue::Int(value)) => *value,
        other => panic!("expected an integer literal, found {:?}", other),
    }
}

/// Returns the initializer of the first statement of `main`, written as `int x = <expr>;`.
fn main_initializer(source: &str) -> Node {
    let unit = items(parse_source(source).unwrap());
    let main = function(&unit[0]);
    let init = declaration(&main.body[0]).init.as_ref().unwrap();
    (**init).clone()
}

#[test]
fn test_parse_main_with_precedence() {
    let unit = items(parse_source("int main(){int a=1+2*3; return a;}").unwrap());

    assert_eq!(unit.len(), 1);
    let main = function(&unit[0]);
    assert_eq!(main.name.value, "main");
    assert_eq!(main.return_type, TypeName::Int);
    assert!(main.params.is_empty());
    assert_eq!(main.body.len(), 2);

    let a = declaration(&main.body[0]);
    assert_eq!(a.name.value, "a");
    assert_eq!(a.ty, TypeName::Int);

    let sum = binary(a.init.as_ref().unwrap());
    assert_eq!(sum.op, BinaryOp::Add);
    assert_eq!(int(&sum.left), 1);
    let product = binary(&sum.right);
    assert_eq!(product.op, BinaryOp::Mul);
    assert_eq!(int(&product.left), 2);
    assert_eq!(int(&product.right), 3);

    match &main.body[1] {
        Node::Return(Some(value)) => assert_eq!(ident(value), "a"),
        other => panic!("expected a return, found {:?}", other),
    }
}

#[test]
fn test_parse_left_associativity() {
    let init = main_initializer("int main(){int x = 10 - 4 - 3;}");

    let outer = binary(&init);
    assert_eq!(outer.op, BinaryOp::Sub);
    assert_eq!(int(&outer.right), 3);
    let inner = binary(&outer.left);
    assert_eq!(int(&inner.left), 10);
    assert_eq!(int(&inner.right), 4);
}

#[test]
fn test_parse_logical_and_comparison_precedence() {
    let init = main_initializer("int main(){int x = 1 < 2 || 3 == 4 && 5;}");

    let or = binary(&init);
    assert_eq!(or.op, BinaryOp::Or);
    assert_eq!(binary(&or.left).op, BinaryOp::Lt);
    let and = binary(&or.right);
    assert_eq!(and.op, BinaryOp::And);
    assert_eq!(binary(&and.left).op, BinaryOp::Eq);
}

#[test]
fn test_parse_parentheses() {
    let init = main_initializer("int main(){int x = (1 + 2) * 3;}");

    let product = binary(&init);
    assert_eq!(product.op, BinaryOp::Mul);
    assert_eq!(binary(&product.left).op, BinaryOp::Add);
}

#[test]
fn test_parse_unary_operators() {
    let init = main_initializer("int main(){int x = -y;}");
    let negation = binary(&init);
    assert_eq!(negation.op, BinaryOp::Sub);
    assert_eq!(int(&negation.left), 0);
    assert_eq!(ident(&negation.right), "y");

    let init = main_initializer("int main(){int x = !y;}");
    let not = binary(&init);
    assert_eq!(not.op, BinaryOp::Eq);
    assert_eq!(ident(&not.left), "y");
    assert_eq!(int(&not.right), 0);

    let init = main_initializer("int main(){int x = +y;}");
    assert_eq!(ident(&init), "y");
}

#[test]
fn test_parse_multiple_declarators_and_const() {
    let unit = items(parse_source("int a, b = 2; const float c = 1.5;").unwrap());

    assert_eq!(unit.len(), 3);
    let a = declaration(&unit[0]);
    assert_eq!(a.name.value, "a");
    assert!(a.init.is_none());
    assert!(!a.constant);

    let b = declaration(&unit[1]);
    assert_eq!(b.name.value, "b");
    assert_eq!(int(b.init.as_ref().unwrap()), 2);

    let c = declaration(&unit[2]);
    assert_eq!(c.ty, TypeName::Float);
    assert!(c.constant);
    assert_eq!(
        **c.init.as_ref().unwrap(),
        Node::Number(NumberValue::Float(1.5))
    );
}

#[test]
fn test_parse_function_with_params_and_call() {
    let source = "float scale(int x, float f) { return x * f; } void run() { scale(1, 2.0); }";
    let unit = items(parse_source(source).unwrap());

    let scale = function(&unit[0]);
    assert_eq!(scale.return_type, TypeName::Float);
    assert_eq!(scale.params.len(), 2);
    assert_eq!(scale.params[0].ty, TypeName::Int);
    assert_eq!(scale.params[0].name.value, "x");
    assert_eq!(scale.params[1].ty, TypeName::Float);

    let run = function(&unit[1]);
    assert_eq!(run.return_type, TypeName::Void);
    match &run.body[0] {
        Node::Call(call) => {
            assert_eq!(call.callee.value, "scale");
            assert_eq!(call.args.len(), 2);
        }
        other => panic!("expected a call, found {:?}", other),
    }
}

#[test]
fn test_parse_assignment_statement() {
    let unit = items(parse_source("int main(){ x = x + 1; }").unwrap());
    let main = function(&unit[0]);

    let assignment = binary(&main.body[0]);
    assert_eq!(assignment.op, BinaryOp::Assign);
    assert_eq!(ident(&assignment.left), "x");
    assert_eq!(binary(&assignment.right).op, BinaryOp::Add);
}

#[test]
fn test_parse_dangling_else_binds_to_inner_if() {
    let unit = items(parse_source("int main(){ if (a) if (b) return 1; else return 2; }").unwrap());
    let main = function(&unit[0]);

    let Node::If(IfStmt {
        then_branch,
        else_branch,
        ..
    }) = &main.body[0]
    else {
        panic!("expected an if statement");
    };
    assert!(else_branch.is_none());

    match then_branch.as_ref() {
        Node::If(inner) => assert!(inner.else_branch.is_some()),
        other => panic!("expected a nested if, found {:?}", other),
    }
}

#[test]
fn test_parse_empty_statements_are_dropped() {
    let unit = items(parse_source("int main(){ ; ; return 0; }").unwrap());
    let main = function(&unit[0]);

    assert_eq!(main.body.len(), 1);
    assert!(matches!(main.body[0], Node::Return(Some(_))));
}

#[test]
fn test_parse_nested_block() {
    let unit = items(parse_source("void f(){ { int a; } return; }").unwrap());
    let f = function(&unit[0]);

    assert!(matches!(&f.body[0], Node::Block(inner) if inner.len() == 1));
    assert_eq!(f.body[1], Node::Return(None));
}

#[test]
fn test_parse_main_as_call_target() {
    let unit = items(parse_source("int main(){ return 0; } int g(){ return main(); }").unwrap());
    let g = function(&unit[1]);

    match &g.body[0] {
        Node::Return(Some(value)) => match value.as_ref() {
            Node::Call(call) => assert_eq!(call.callee.value, "main"),
            other => panic!("expected a call, found {:?}", other),
        },
        other => panic!("expected a return, found {:?}", other),
    }
}

#[test]
fn test_parse_syntax_error_reports_line() {
    let error = parse_source("int main(){\n  int a = 1\n  return a;\n}").unwrap_err();

    assert_eq!(error.get_error_name(), "UnexpectedToken");
    assert_eq!(error.get_position().0, 3);
}

#[test]
fn test_parse_unexpected_end_of_input() {
    let error = parse_source("int main(){ return 0;").unwrap_err();

    assert_eq!(error.get_error_name(), "UnexpectedToken");
}

#[test]
fn test_parse_integer_out_of_range() {
    let error = parse_source("int a = 99999999999;").unwrap_err();

    assert_eq!(error.get_error_name(), "NumberParseError");
}
