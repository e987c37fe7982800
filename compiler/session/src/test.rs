use crate::{Compiler, CompilerOptions, OptionStack};
use diagnostics::{Code, Diagnostic, Severity};

fn stack() -> OptionStack {
    OptionStack::new(4, false)
}

#[test]
fn defines_walk_to_the_parent() {
    let mut options = stack();
    options.define("OUTER");
    options.push();

    assert!(options.is_defined("OUTER"));
    assert!(!options.is_defined("INNER"));

    options.define("INNER");
    assert!(options.is_defined("INNER"));

    options.pop();
    assert!(!options.is_defined("INNER"));
}

#[test]
fn explicit_undefine_masks_the_parent() {
    let mut options = stack();
    options.define("SYM");
    options.push();
    options.undefine("SYM");

    assert!(!options.is_defined("SYM"));

    options.pop();
    assert!(options.is_defined("SYM"));
}

#[test]
fn define_then_undefine_is_undefined() {
    let mut options = stack();
    options.define("SYM");
    options.undefine("SYM");
    assert!(!options.is_defined("SYM"));
}

#[test]
fn warning_list_names_disabled_codes() {
    let mut options = stack();
    assert!(!options.is_warning_disabled(78));

    options.disable_warning(78);
    assert!(options.is_warning_disabled(78));
    assert!(!options.is_warning_disabled(1030));

    options.restore_warning(78);
    assert!(!options.is_warning_disabled(78));
}

#[test]
fn disable_all_flips_the_list_meaning() {
    let mut options = stack();
    options.disable_all_warnings();
    assert!(options.is_warning_disabled(78));
    assert!(options.is_warning_disabled(1030));

    options.restore_warning(1030);
    assert!(options.is_warning_disabled(78));
    assert!(!options.is_warning_disabled(1030));

    options.restore_all_warnings();
    assert!(!options.is_warning_disabled(78));
}

#[test]
fn disabled_warnings_delegate_to_the_parent() {
    let mut options = stack();
    options.disable_warning(78);
    options.push();
    assert!(options.is_warning_disabled(78));
}

#[test]
fn warning_level_gates_should_show() {
    let options = OptionStack::new(1, false);
    assert!(options.should_show(Code::CS0078));
    assert!(!options.should_show(Code::CS1587));
}

#[test]
#[should_panic(expected = "option scopes nested deeper than")]
fn scope_overflow_is_an_invariant_violation() {
    let mut options = stack();
    options.push();
    options.push();
    options.push();
    options.push();
}

#[test]
fn suppressed_warnings_never_reach_the_collection() {
    let compiler = Compiler::default();
    compiler.with_options(|options| options.disable_warning(78));

    compiler.report(Diagnostic::new(Code::CS0078));
    assert!(compiler.messages().is_empty());
}

#[test]
fn warnings_promote_under_treat_as_errors() {
    let compiler = Compiler::new(CompilerOptions {
        treat_warnings_as_errors: true,
        ..CompilerOptions::default()
    });

    compiler.report(Diagnostic::new(Code::CS0078));
    assert!(compiler.has_errors());
    assert_eq!(compiler.messages().messages()[0].severity, Severity::Error);
}

#[test]
fn command_line_defines_seed_the_root_scope() {
    let compiler = Compiler::new(CompilerOptions {
        defines: vec!["DEBUG".into()],
        ..CompilerOptions::default()
    });

    assert!(compiler.options().is_defined("DEBUG"));
}
