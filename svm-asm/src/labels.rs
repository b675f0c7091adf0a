use std::collections::HashMap;

use svm::constants::LABEL_CAPACITY;

use crate::error::Error;

/// Label name → instruction index. Names are copied into owned `String`s
/// at registration time rather than borrowed from the source buffer: it
/// sidesteps tying the table's lifetime to the buffer for a component this
/// small, at the cost of one allocation per label.
#[derive(Default)]
pub struct LabelTable {
    labels: HashMap<String, usize>,
}

impl LabelTable {
    pub fn new() -> LabelTable {
        LabelTable::default()
    }

    /// Registers `name` at `address`. First definition wins on lookup;
    /// re-registering an already-defined label is treated as a fatal error
    /// rather than silently shadowing it.
    pub fn register(&mut self, name: &str, address: usize) -> Result<(), Error> {
        if self.labels.contains_key(name) {
            return Err(Error::DuplicateLabel(name.to_string()));
        }
        if self.labels.len() >= LABEL_CAPACITY {
            return Err(Error::TooManyLabels);
        }
        log::debug!("registered label \"{}\" at instruction {}", name, address);
        self.labels.insert(name.to_string(), address);
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }
}
