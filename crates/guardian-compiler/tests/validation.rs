//! Statement validation, lazy resolution and diagnostics, end to end.

use guardian_compiler::{CheckedUnit, compile_source};
use guardian_validate::ErrorKind;

fn check(src: &str) -> CheckedUnit {
    let unit = compile_source("test.grd", src);
    assert!(
        !unit
            .diagnostics
            .iter()
            .any(|d| d.kind == ErrorKind::Syntax),
        "unexpected syntax errors: {}",
        unit.format_diagnostics()
    );
    unit
}

fn kinds(unit: &CheckedUnit) -> Vec<ErrorKind> {
    unit.diagnostics.iter().map(|d| d.kind).collect()
}

#[test]
fn test_inferred_declaration() {
    let unit = check(
        "constructor() {
             a := 5
             a = a + 1
         }",
    );
    assert!(unit.diagnostics.is_empty(), "{}", unit.format_diagnostics());
}

#[test]
fn test_assignment_arity_mismatch() {
    let unit = check(
        "constructor() {
             a, b := 5, 6, 7
         }",
    );
    assert_eq!(kinds(&unit), [ErrorKind::InvalidAssignment]);
}

#[test]
fn test_single_source_broadcasts() {
    let unit = check(
        "constructor() {
             a, b := 5
             a = b
         }",
    );
    assert!(unit.diagnostics.is_empty(), "{}", unit.format_diagnostics());
}

#[test]
fn test_conditions_require_boolean() {
    let unit = check("constructor() { if 5 { } }");
    assert_eq!(kinds(&unit), [ErrorKind::RequiredType]);

    let unit = check("constructor() { if true { } }");
    assert!(unit.diagnostics.is_empty(), "{}", unit.format_diagnostics());
}

#[test]
fn test_forward_reference_from_class_body() {
    // `Light` references `Bulb`, declared later in the file
    let unit = check(
        "class Light {
             source Bulb
         }
         class Bulb {}

         constructor() {
             l := Light{}
             l.source = Bulb{}
         }",
    );
    assert!(unit.diagnostics.is_empty(), "{}", unit.format_diagnostics());
}

#[test]
fn test_mutual_class_references_terminate() {
    let unit = check(
        "class Node {
             next Edge
         }
         class Edge {
             from Node
         }",
    );
    assert!(unit.diagnostics.is_empty(), "{}", unit.format_diagnostics());
}

#[test]
fn test_constructor_overloads() {
    let unit = check(
        "class Light {
             intensity int
             constructor() {
             }
             constructor(start int) {
                 intensity = start
             }
         }

         constructor() {
             a := Light()
             b := Light(5)
             a = b
         }",
    );
    assert!(unit.diagnostics.is_empty(), "{}", unit.format_diagnostics());
}

#[test]
fn test_constructor_argument_mismatch() {
    let unit = check(
        "class Light {
             constructor(start int) {
             }
         }

         constructor() {
             a := Light(true)
         }",
    );
    assert_eq!(kinds(&unit), [ErrorKind::ConstructorMismatch]);
}

#[test]
fn test_empty_call_without_constructors() {
    let unit = check(
        "class Simple {}

         constructor() {
             s := Simple()
             s = Simple{}
         }",
    );
    assert!(unit.diagnostics.is_empty(), "{}", unit.format_diagnostics());
}

#[test]
fn test_function_call_arguments() {
    let unit = check(
        "func clamp(n int, limit int) int {
             if n > limit {
                 return limit
             }
             return n
         }

         constructor() {
             a := clamp(5, 10)
             a = clamp(a)
         }",
    );
    assert_eq!(kinds(&unit), [ErrorKind::ArgumentMismatch]);
}

#[test]
fn test_multi_result_call_unpacks() {
    let unit = check(
        "func bounds() (int, int) {
             return 0, 10
         }

         constructor() {
             low, high := bounds()
             low = high
         }",
    );
    assert!(unit.diagnostics.is_empty(), "{}", unit.format_diagnostics());
}

#[test]
fn test_enum_items_and_switch() {
    let unit = check(
        "enum Day { Monday, Tuesday, Wednesday }

         constructor() {
             d := Day.Monday
             switch d {
             case Day.Tuesday:
             case Day.Wednesday:
             default:
             }
         }",
    );
    assert!(unit.diagnostics.is_empty(), "{}", unit.format_diagnostics());
}

#[test]
fn test_enum_unknown_item() {
    let unit = check(
        "enum Day { Monday }

         constructor() {
             d := Day.Friday
         }",
    );
    assert_eq!(kinds(&unit), [ErrorKind::PropertyNotFound]);
}

#[test]
fn test_enum_inheritance_flattens_items() {
    let unit = check(
        "enum Weekend { Saturday, Sunday }
         enum Day inherits Weekend { Monday }

         constructor() {
             d := Day.Saturday
             d = Day.Monday
         }",
    );
    assert!(unit.diagnostics.is_empty(), "{}", unit.format_diagnostics());
}

#[test]
fn test_reference_chain_through_properties() {
    let unit = check(
        "class Engine {
             power int
         }
         class Car {
             engine Engine
         }

         constructor() {
             c := Car()
             p := c.engine.power
             p = p + 1
         }",
    );
    assert!(unit.diagnostics.is_empty(), "{}", unit.format_diagnostics());
}

#[test]
fn test_method_call_through_reference() {
    let unit = check(
        "class Car {
             func running() bool {
                 return true
             }
         }

         constructor() {
             c := Car()
             if c.running() {
             }
         }",
    );
    assert!(unit.diagnostics.is_empty(), "{}", unit.format_diagnostics());
}

#[test]
fn test_property_not_found() {
    let unit = check(
        "class Car {}

         constructor() {
             c := Car()
             w := c.wheels
         }",
    );
    assert_eq!(kinds(&unit), [ErrorKind::PropertyNotFound]);
}

#[test]
fn test_type_rendering_round_trips() {
    let unit = check(
        "a int
         b [3]bool
         c map[string][]int
         d func(int, bool) (string)",
    );
    assert!(unit.diagnostics.is_empty(), "{}", unit.format_diagnostics());

    let rendered: Vec<String> = unit
        .unit
        .scope
        .declarations
        .iter()
        .map(|decl| {
            let t = unit.types.get(&decl.id).expect("declaration resolved");
            unit.registry.display(t).to_string()
        })
        .collect();
    assert_eq!(
        rendered,
        [
            "int256",
            "[3]bool",
            "map[string][]int256",
            "func(int256, bool)(string)",
        ]
    );
}

#[test]
fn test_events_declare_and_reject_assignment() {
    let unit = check(
        "event Transfer(amount int)

         constructor() {
             Transfer = 5
         }",
    );
    assert_eq!(kinds(&unit), [ErrorKind::InvalidAssignment]);
}

#[test]
fn test_whole_file_is_validated_best_effort() {
    // Three independent mistakes, all reported in one pass
    let unit = check(
        "flag bool

         constructor() {
             if 5 { }
             flag = 7
             x := missing
         }",
    );
    assert_eq!(
        kinds(&unit),
        [
            ErrorKind::RequiredType,
            ErrorKind::InvalidAssignment,
            ErrorKind::UndefinedName,
        ]
    );
}
