//! Inheritance and interface-conformance assignability, end to end.

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

#[test]
fn test_class_implements_type_valid() {
    let unit = check(
        "class LightSource {}
         class Light inherits LightSource {}

         item LightSource

         constructor() {
             item = Light{}
         }",
    );
    assert!(unit.diagnostics.is_empty(), "{}", unit.format_diagnostics());
}

#[test]
fn test_class_implements_multiple_types_valid() {
    let unit = check(
        "class LightSource {}
         class Object {}
         class Light inherits LightSource, Object {}

         item LightSource

         constructor() {
             item = Light{}
         }",
    );
    assert!(unit.diagnostics.is_empty(), "{}", unit.format_diagnostics());
}

#[test]
fn test_class_does_not_inherit() {
    let unit = check(
        "class LightSource {}
         class Light {}

         item LightSource

         constructor() {
             item = Light{}
         }",
    );
    assert_eq!(
        unit.diagnostics.len(),
        1,
        "{}",
        unit.format_diagnostics()
    );
    assert_eq!(unit.diagnostics[0].kind, ErrorKind::InvalidAssignment);
}

#[test]
fn test_class_implements_multiple_inheritance_valid() {
    let unit = check(
        "class Object {}
         class LightSource inherits Object {}
         class Light inherits LightSource {}

         item Object

         constructor() {
             item = Light{}
         }",
    );
    assert!(unit.diagnostics.is_empty(), "{}", unit.format_diagnostics());
}

#[test]
fn test_class_implements_declared_interfaces() {
    let unit = check(
        "interface Visible {
             func draw()
         }
         interface Audible {
             func play()
         }
         class Alarm is Visible, Audible {}

         seen Visible
         heard Audible

         constructor() {
             seen = Alarm{}
             heard = Alarm{}
         }",
    );
    assert!(unit.diagnostics.is_empty(), "{}", unit.format_diagnostics());
}

#[test]
fn test_interface_conformance_propagates_to_subclasses() {
    let unit = check(
        "interface Visible {
             func draw()
         }
         class Base is Visible {}
         class Derived inherits Base {}

         item Visible

         constructor() {
             item = Derived{}
         }",
    );
    assert!(unit.diagnostics.is_empty(), "{}", unit.format_diagnostics());
}

#[test]
fn test_interface_conformance_closes_over_interface_supers() {
    let unit = check(
        "interface Drawable {
             func draw()
         }
         interface Visible inherits Drawable {}
         class Light is Visible {}

         item Drawable

         constructor() {
             item = Light{}
         }",
    );
    assert!(unit.diagnostics.is_empty(), "{}", unit.format_diagnostics());
}

#[test]
fn test_interface_conformance_is_nominal() {
    // `Light` has a matching `draw` but never declares `is Visible`
    let unit = check(
        "interface Visible {
             func draw()
         }
         class Light {
             func draw() {
             }
         }

         item Visible

         constructor() {
             item = Light{}
         }",
    );
    assert_eq!(
        unit.diagnostics.len(),
        1,
        "{}",
        unit.format_diagnostics()
    );
    assert_eq!(unit.diagnostics[0].kind, ErrorKind::InvalidAssignment);
}

#[test]
fn test_contracts_share_class_rules() {
    let unit = check(
        "contract Token {}
         contract Coin inherits Token {}

         ledger Token

         constructor() {
             ledger = Coin{}
         }",
    );
    assert!(unit.diagnostics.is_empty(), "{}", unit.format_diagnostics());
}

#[test]
fn test_class_cannot_inherit_contract() {
    let unit = check(
        "contract Token {}
         class Wallet inherits Token {}",
    );
    assert_eq!(
        unit.diagnostics.len(),
        1,
        "{}",
        unit.format_diagnostics()
    );
    assert_eq!(unit.diagnostics[0].kind, ErrorKind::InvalidSuper);
}

#[test]
fn test_inherited_properties_reachable_in_methods() {
    let unit = check(
        "class LightSource {
             intensity int
         }
         class Light inherits LightSource {
             func dim() {
                 intensity = intensity - 1
             }
         }",
    );
    assert!(unit.diagnostics.is_empty(), "{}", unit.format_diagnostics());
}
