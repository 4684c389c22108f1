//! Declaration parsing tests.

use guardian_ast::{DeclKind, LifecycleKind, SourceUnit, Stmt};
use guardian_lexer::tokenize;
use guardian_parser::parse_source;

fn parse(source: &str) -> SourceUnit {
    let (tokens, lex_errors) = tokenize(source);
    assert!(lex_errors.is_empty(), "lex errors: {:?}", lex_errors);
    let (unit, errors) = parse_source(&tokens, 0);
    assert!(errors.is_empty(), "parse errors: {:?}", errors);
    unit
}

#[test]
fn class_with_inheritance_and_interfaces() {
    let unit = parse("class Light inherits LightSource, Object is Visible {}");
    assert_eq!(unit.scope.declarations.len(), 1);
    match &unit.scope.declarations[0].kind {
        DeclKind::Class(class) => {
            assert_eq!(class.identifier, "Light");
            assert_eq!(class.supers.len(), 2);
            assert_eq!(class.interfaces.len(), 1);
            assert_eq!(class.supers[0].plain_name().as_deref(), Some("LightSource"));
            assert_eq!(class.interfaces[0].plain_name().as_deref(), Some("Visible"));
        }
        other => panic!("expected class, got {:?}", other),
    }
}

#[test]
fn clauses_accept_either_order() {
    let unit = parse("class Light is Visible inherits LightSource {}");
    match &unit.scope.declarations[0].kind {
        DeclKind::Class(class) => {
            assert_eq!(class.supers.len(), 1);
            assert_eq!(class.interfaces.len(), 1);
        }
        other => panic!("expected class, got {:?}", other),
    }
}

#[test]
fn contract_with_members() {
    let unit = parse(
        "contract Wallet {\n\
         \tbalance int\n\
         \towner string\n\
         \tconstructor(initial int) {\n\
         \t\tbalance = initial\n\
         \t}\n\
         \tfunc deposit(amount int) {\n\
         \t\tbalance += amount\n\
         \t}\n\
         }\n",
    );
    match &unit.scope.declarations[0].kind {
        DeclKind::Contract(contract) => {
            assert_eq!(contract.identifier, "Wallet");
            // balance, owner, constructor, deposit
            assert_eq!(contract.body.declarations.len(), 4);
            assert!(contract.body.sequence.is_empty());
        }
        other => panic!("expected contract, got {:?}", other),
    }
}

#[test]
fn interface_signatures() {
    let unit = parse(
        "interface Visible inherits Drawable {\n\
         \tfunc brightness() int\n\
         \tfunc describe(prefix string) (string, int)\n\
         }\n",
    );
    match &unit.scope.declarations[0].kind {
        DeclKind::Interface(iface) => {
            assert_eq!(iface.identifier, "Visible");
            assert_eq!(iface.supers.len(), 1);
            assert_eq!(iface.signatures.len(), 2);
            assert_eq!(iface.signatures[0].identifier, "brightness");
            assert_eq!(iface.signatures[1].results.len(), 2);
        }
        other => panic!("expected interface, got {:?}", other),
    }
}

#[test]
fn enum_items() {
    let unit = parse("enum Weekday { Mon, Tue, Wed,\n Thu, Fri }");
    match &unit.scope.declarations[0].kind {
        DeclKind::Enum(e) => {
            assert_eq!(e.identifier, "Weekday");
            assert_eq!(e.items, vec!["Mon", "Tue", "Wed", "Thu", "Fri"]);
        }
        other => panic!("expected enum, got {:?}", other),
    }
}

#[test]
fn func_declaration_with_results() {
    let unit = parse("func split(total int) (int, int) {\n\treturn total, total\n}\n");
    match &unit.scope.declarations[0].kind {
        DeclKind::Func(func) => {
            assert_eq!(func.identifier, "split");
            assert_eq!(func.params.len(), 1);
            assert_eq!(func.results.len(), 2);
            assert_eq!(func.body.sequence.len(), 1);
        }
        other => panic!("expected func, got {:?}", other),
    }
}

#[test]
fn lifecycle_kinds() {
    let unit = parse("constructor(x int) {}\ndestructor() {}\nfallback() {}\n");
    let kinds: Vec<LifecycleKind> = unit
        .scope
        .declarations
        .iter()
        .map(|d| match &d.kind {
            DeclKind::Lifecycle(l) => l.kind,
            other => panic!("expected lifecycle, got {:?}", other),
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            LifecycleKind::Constructor,
            LifecycleKind::Destructor,
            LifecycleKind::Fallback,
        ]
    );
}

#[test]
fn type_alias_and_event() {
    let unit = parse("type Balance uint256\nevent Transfer(from address, to address)\n");
    assert!(matches!(
        unit.scope.declarations[0].kind,
        DeclKind::TypeAlias(_)
    ));
    match &unit.scope.declarations[1].kind {
        DeclKind::Event(event) => {
            assert_eq!(event.identifier, "Transfer");
            assert_eq!(event.params.len(), 2);
        }
        other => panic!("expected event, got {:?}", other),
    }
}

#[test]
fn top_level_var_declaration_is_forward_referencable() {
    let unit = parse("item LightSource\n");
    assert_eq!(unit.scope.declarations.len(), 1);
    assert!(unit.scope.declaration("item").is_some());
}

#[test]
fn grouped_var_declaration() {
    let unit = parse("a, b int\n");
    match &unit.scope.declarations[0].kind {
        DeclKind::Var(var) => {
            assert_eq!(var.identifiers, vec!["a", "b"]);
        }
        other => panic!("expected var declaration, got {:?}", other),
    }
    assert!(unit.scope.declaration("a").is_some());
    assert!(unit.scope.declaration("b").is_some());
}

#[test]
fn statements_in_function_bodies() {
    let unit = parse(
        "func run() {\n\
         \tn := 0\n\
         \tfor i := 0; i < 5; i++ {\n\
         \t\tn += i\n\
         \t}\n\
         \tif n > 5 {\n\
         \t\tn = 5\n\
         \t} else if n == 0 {\n\
         \t\tn = 1\n\
         \t} else {\n\
         \t\tn = 2\n\
         \t}\n\
         \tswitch n {\n\
         \tcase 1, 2:\n\
         \t\tbreak\n\
         \tdefault:\n\
         \t\tcontinue\n\
         \t}\n\
         \treturn n\n\
         }\n",
    );
    match &unit.scope.declarations[0].kind {
        DeclKind::Func(func) => {
            assert_eq!(func.body.sequence.len(), 5);
            assert!(matches!(func.body.sequence[0], Stmt::Assignment(_)));
            assert!(matches!(func.body.sequence[1], Stmt::For(_)));
            assert!(matches!(func.body.sequence[2], Stmt::If(_)));
            assert!(matches!(func.body.sequence[3], Stmt::Switch(_)));
            assert!(matches!(func.body.sequence[4], Stmt::Return(_)));
        }
        other => panic!("expected func, got {:?}", other),
    }
}

#[test]
fn for_each_statement() {
    let unit = parse("func run() {\n\tfor a, b in pairs {\n\t\ta = b\n\t}\n}\n");
    match &unit.scope.declarations[0].kind {
        DeclKind::Func(func) => match &func.body.sequence[0] {
            Stmt::ForEach(each) => {
                assert_eq!(each.variables, vec!["a", "b"]);
            }
            other => panic!("expected for-each, got {:?}", other),
        },
        other => panic!("expected func, got {:?}", other),
    }
}

#[test]
fn multi_assignment() {
    let unit = parse("func run() {\n\ta, b = 1, 2\n}\n");
    match &unit.scope.declarations[0].kind {
        DeclKind::Func(func) => match &func.body.sequence[0] {
            Stmt::Assignment(assign) => {
                assert_eq!(assign.left.len(), 2);
                assert_eq!(assign.right.len(), 2);
            }
            other => panic!("expected assignment, got {:?}", other),
        },
        other => panic!("expected func, got {:?}", other),
    }
}

#[test]
fn import_and_package_statements() {
    let unit = parse("package wallet version 0.1.2\nimport dogs \"guardian/dogs\"\n");
    assert_eq!(unit.scope.sequence.len(), 2);
    match &unit.scope.sequence[0] {
        Stmt::Package(pkg) => {
            assert_eq!(pkg.name, "wallet");
            assert_eq!(pkg.version, "0.1.2");
        }
        other => panic!("expected package, got {:?}", other),
    }
    match &unit.scope.sequence[1] {
        Stmt::Import(import) => {
            assert_eq!(import.alias.as_deref(), Some("dogs"));
            assert_eq!(import.path, "guardian/dogs");
        }
        other => panic!("expected import, got {:?}", other),
    }
}

#[test]
fn statement_in_class_body_is_an_error() {
    let (tokens, _) = tokenize("class Broken {\n\treturn 5\n}\n");
    let (_, errors) = parse_source(&tokens, 0);
    assert!(!errors.is_empty());
}

#[test]
fn recovery_continues_after_broken_declaration() {
    let (tokens, _) = tokenize("class Broken {\n\treturn 5\n}\nclass Fine {}\n");
    let (unit, errors) = parse_source(&tokens, 0);
    assert_eq!(errors.len(), 1);
    assert!(unit.scope.declaration("Fine").is_some());
}
