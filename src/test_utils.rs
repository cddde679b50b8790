//! Test utilities
//!
//! Proptest generators plus [`Probe`], a configurable artifact that records
//! every verb it runs.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::core::artifact::{Artifact, Verb};
use crate::core::interest::InterestDeclarer;
use crate::error::ActionError;

/// Shared log of `"<kind>.<verb>"` entries written by probes
pub type Trace = Rc<RefCell<Vec<String>>>;

/// Artifact double with a configurable verb set
pub struct Probe {
    kind: String,
    id: String,
    verbs: Vec<Verb>,
    trace: Trace,
    interests: Vec<String>,
    fail_on: Option<Verb>,
    instantiations: Rc<Cell<u32>>,
}

impl Probe {
    /// Probe answering the standard verbs
    pub fn new(kind: &str, id: &str) -> Self {
        Self {
            kind: kind.to_string(),
            id: id.to_string(),
            verbs: Verb::STANDARD.to_vec(),
            trace: Trace::default(),
            interests: Vec::new(),
            fail_on: None,
            instantiations: Rc::default(),
        }
    }

    /// Record invocations into `trace`
    pub fn with_trace(mut self, trace: &Trace) -> Self {
        self.trace = Rc::clone(trace);
        self
    }

    /// Replace the verb set
    pub fn with_verbs(mut self, verbs: &[&str]) -> Self {
        self.verbs = verbs.iter().map(|verb| Verb::parse(verb)).collect();
        self
    }

    /// Register interest in `names` during the declare phase
    pub fn interested_in(mut self, names: &[&str]) -> Self {
        self.interests = names.iter().map(ToString::to_string).collect();
        self
    }

    /// Fail whenever `verb` is invoked
    pub fn failing_on(mut self, verb: &str) -> Self {
        self.fail_on = Some(Verb::parse(verb));
        self
    }

    /// Counter of `instantiate` calls
    pub fn instantiations(&self) -> Rc<Cell<u32>> {
        Rc::clone(&self.instantiations)
    }
}

impl Artifact for Probe {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &str {
        &self.kind
    }

    fn verbs(&self) -> Vec<Verb> {
        self.verbs.clone()
    }

    fn invoke(&mut self, verb: &Verb, args: &[String]) -> Result<(), ActionError> {
        if self.fail_on.as_ref() == Some(verb) {
            return Err(ActionError::Failed(format!("{} {verb} failed", self.kind)));
        }
        let mut entry = format!("{}.{verb}", self.kind);
        if !args.is_empty() {
            entry.push(' ');
            entry.push_str(&args.join(" "));
        }
        self.trace.borrow_mut().push(entry);
        Ok(())
    }

    fn instantiate(&mut self) -> Result<(), ActionError> {
        self.instantiations.set(self.instantiations.get() + 1);
        Ok(())
    }

    fn check_configuration(&self, declarer: &mut InterestDeclarer<'_>) {
        for name in &self.interests {
            declarer.i_want_to_configure(name);
        }
    }
}

pub mod generators {
    use proptest::prelude::*;

    /// Artifact kind name, e.g. `Gcc`
    pub fn kind_name() -> impl Strategy<Value = String> {
        "[A-Z][a-z]{1,10}"
    }

    /// Artifact id
    pub fn artifact_id() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_-]{0,15}"
    }

    /// Numeric version triple
    pub fn version_triple() -> impl Strategy<Value = (u64, u64, u64)> {
        (0u64..1000, 0u64..1000, 0u64..1000)
    }

    /// Short lowercase git hash
    pub fn git_hash() -> impl Strategy<Value = String> {
        "[0-9a-f]{7,12}"
    }

    /// Command name made of a selector and a verb
    pub fn command_name() -> impl Strategy<Value = String> {
        (kind_name(), "[a-z]{3,8}").prop_map(|(kind, verb)| format!("{kind}.{verb}"))
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_kind_name_generator(kind in kind_name()) {
            prop_assert!(kind.chars().next().is_some_and(|c| c.is_ascii_uppercase()));
            prop_assert!(!kind.chars().any(|c| c.is_ascii_digit()));
        }

        #[test]
        fn test_command_name_generator(command in command_name()) {
            prop_assert_eq!(command.matches('.').count(), 1);
        }
    }
}
