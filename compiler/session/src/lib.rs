//! The compilation session shared by the scanner and the parser.

use diagnostics::{Diagnostic, OutputMessage, OutputMessageCollection, Severity};
use std::cell::{Ref, RefCell};

pub use options::OptionStack;

mod options;

/// Settings a compilation starts out with; the root option scope is seeded
/// from them.
pub struct CompilerOptions {
    pub warning_level: u8,
    pub treat_warnings_as_errors: bool,
    pub defines: Vec<String>,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self { warning_level: 4, treat_warnings_as_errors: false, defines: Vec::new() }
    }
}

/// The compiler shell: the diagnostic sink plus the option-scope stack.
///
/// A single `Compiler` is shared by reference between one scanner and one
/// parser; the core is single-threaded, so interior mutability is plain
/// `RefCell`.
pub struct Compiler {
    messages: RefCell<OutputMessageCollection>,
    options: RefCell<OptionStack>,
}

impl Compiler {
    pub fn new(options: CompilerOptions) -> Self {
        let mut stack = OptionStack::new(options.warning_level, options.treat_warnings_as_errors);
        for symbol in &options.defines {
            stack.define(symbol);
        }

        Self {
            messages: RefCell::new(OutputMessageCollection::default()),
            options: RefCell::new(stack),
        }
    }

    /// Gate, possibly promote, and record a diagnostic.
    ///
    /// Warnings suppressed by the current option scope vanish; surviving
    /// warnings become errors under treat-warnings-as-errors. Errors and
    /// infos always land in the collection.
    pub fn report(&self, diagnostic: Diagnostic) {
        let severity = match diagnostic.code.severity() {
            Severity::Warning => {
                let options = self.options.borrow();
                if !options.should_show(diagnostic.code) {
                    return;
                }
                if options.treat_warnings_as_errors() {
                    Severity::Error
                } else {
                    Severity::Warning
                }
            }
            severity => severity,
        };

        self.messages.borrow_mut().add(diagnostic.into_message(severity));
    }

    pub fn has_errors(&self) -> bool {
        self.messages.borrow().has_errors()
    }

    pub fn messages(&self) -> Ref<'_, OutputMessageCollection> {
        self.messages.borrow()
    }

    /// Snapshot of the collected messages, mostly for tests and the driver.
    pub fn messages_cloned(&self) -> Vec<OutputMessage> {
        self.messages.borrow().messages().to_vec()
    }

    /// Enter a nested option scope with inherited values.
    pub fn push_options(&self) {
        self.options.borrow_mut().push();
    }

    pub fn pop_options(&self) {
        self.options.borrow_mut().pop();
    }

    pub fn options(&self) -> Ref<'_, OptionStack> {
        self.options.borrow()
    }

    pub fn with_options<T>(&self, mutate: impl FnOnce(&mut OptionStack) -> T) -> T {
        mutate(&mut self.options.borrow_mut())
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(CompilerOptions::default())
    }
}

#[cfg(test)]
mod test;
