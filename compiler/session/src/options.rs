//! Nested compiler-option scopes.

use diagnostics::Code;
use utility::HashMap;

/// The maximum number of simultaneously live option scopes.
///
/// One root scope plus per-buffer scopes; the front end never nests buffers,
/// so anything deeper is a caller bug.
const MAX_DEPTH: usize = 4;

/// One frame of compiler options: preprocessor symbols and warning gates.
///
/// Lookups that find no local entry walk to the parent frame. The meaning of
/// `warnings` flips with `all_warnings_disabled`: normally it lists the
/// disabled codes, under `disable-all` it lists the explicitly re-enabled
/// ones.
#[derive(Clone)]
pub struct OptionScope {
    /// `true` = defined, `false` = explicitly undefined (masks the parent).
    defines: HashMap<String, bool>,
    pub warning_level: u8,
    pub treat_warnings_as_errors: bool,
    all_warnings_disabled: bool,
    warnings: Vec<u16>,
}

impl OptionScope {
    fn new(warning_level: u8, treat_warnings_as_errors: bool) -> Self {
        Self {
            defines: HashMap::default(),
            warning_level,
            treat_warnings_as_errors,
            all_warnings_disabled: false,
            warnings: Vec::new(),
        }
    }
}

/// The stack of option scopes: a root scope seeded from the command line and
/// one nested scope per source buffer being scanned.
pub struct OptionStack {
    scopes: Vec<OptionScope>,
}

impl OptionStack {
    pub fn new(warning_level: u8, treat_warnings_as_errors: bool) -> Self {
        Self { scopes: vec![OptionScope::new(warning_level, treat_warnings_as_errors)] }
    }

    fn current(&mut self) -> &mut OptionScope {
        self.scopes.last_mut().unwrap()
    }

    /// Enter a nested scope inheriting the parent's scalar settings.
    pub fn push(&mut self) {
        assert!(self.scopes.len() < MAX_DEPTH, "option scopes nested deeper than {MAX_DEPTH}");

        let parent = self.scopes.last().unwrap();
        self.scopes.push(OptionScope::new(parent.warning_level, parent.treat_warnings_as_errors));
    }

    pub fn pop(&mut self) {
        assert!(self.scopes.len() > 1, "attempt to pop the root option scope");
        self.scopes.pop();
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn define(&mut self, name: &str) {
        self.current().defines.insert(name.to_owned(), true);
    }

    /// Record an explicit undefine, masking any parental definition.
    pub fn undefine(&mut self, name: &str) {
        self.current().defines.insert(name.to_owned(), false);
    }

    pub fn is_defined(&self, name: &str) -> bool {
        for scope in self.scopes.iter().rev() {
            if let Some(&defined) = scope.defines.get(name) {
                return defined;
            }
        }
        false
    }

    pub fn disable_warning(&mut self, code: u16) {
        let scope = self.current();
        if scope.all_warnings_disabled {
            scope.warnings.retain(|&entry| entry != code);
        } else if !scope.warnings.contains(&code) {
            scope.warnings.push(code);
        }
    }

    pub fn restore_warning(&mut self, code: u16) {
        let scope = self.current();
        if scope.all_warnings_disabled {
            if !scope.warnings.contains(&code) {
                scope.warnings.push(code);
            }
        } else {
            scope.warnings.retain(|&entry| entry != code);
        }
    }

    pub fn disable_all_warnings(&mut self) {
        let scope = self.current();
        scope.all_warnings_disabled = true;
        scope.warnings.clear();
    }

    pub fn restore_all_warnings(&mut self) {
        let scope = self.current();
        scope.all_warnings_disabled = false;
        scope.warnings.clear();
    }

    pub fn is_warning_disabled(&self, code: u16) -> bool {
        for scope in self.scopes.iter().rev() {
            if scope.all_warnings_disabled {
                return !scope.warnings.contains(&code);
            }
            if scope.warnings.contains(&code) {
                return true;
            }
        }
        false
    }

    pub fn warning_level(&self) -> u8 {
        self.scopes.last().unwrap().warning_level
    }

    pub fn treat_warnings_as_errors(&self) -> bool {
        self.scopes.last().unwrap().treat_warnings_as_errors
    }

    /// Whether a warning with the given code passes the current gates.
    pub fn should_show(&self, code: Code) -> bool {
        code.warning_level() <= self.warning_level() && !self.is_warning_disabled(code.number())
    }
}
