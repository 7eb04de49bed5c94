//! Register bindings.
//!
//! Each function body gets a [`Frame`]: an insertion-ordered map from symbol
//! index to register name. The first mention of a parameter or variable
//! claims the next register in the fixed order; lookups never allocate.

use indexmap::IndexMap;
use plabc_util::SymId;

use crate::error::{BackendError, Result};

/// The VM's register file, in allocation order.
pub const REGISTERS: [&str; 8] = ["RAX", "RBX", "RCX", "RDX", "RTX", "DED", "INSIDE", "CURVA"];

/// Per-function allocation state.
#[derive(Debug, Default)]
pub struct Frame {
    /// `None` for the main body; used in diagnostics.
    func_name: Option<String>,
    bindings: IndexMap<SymId, &'static str>,
}

impl Frame {
    pub fn main() -> Self {
        Self::default()
    }

    pub fn function(name: &str) -> Self {
        Self {
            func_name: Some(name.to_owned()),
            bindings: IndexMap::new(),
        }
    }

    /// The register already bound to `sym`, if any.
    pub fn lookup(&self, sym: SymId) -> Option<&'static str> {
        self.bindings.get(&sym).copied()
    }

    /// The register for `sym`, binding the next free one on first mention.
    pub fn ensure(&mut self, sym: SymId) -> Result<&'static str> {
        if let Some(reg) = self.bindings.get(&sym) {
            return Ok(reg);
        }
        let next = self.bindings.len();
        if next >= REGISTERS.len() {
            return Err(self.overflow());
        }
        let reg = REGISTERS[next];
        self.bindings.insert(sym, reg);
        Ok(reg)
    }

    /// A register no name is currently bound to, for scratch addressing.
    pub fn temp(&self) -> Option<&'static str> {
        REGISTERS
            .iter()
            .copied()
            .find(|reg| !self.bindings.values().any(|bound| bound == reg))
    }

    /// Number of live bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// The error for one binding past the register file.
    pub fn overflow(&self) -> BackendError {
        BackendError::TooManyLocals {
            func: self
                .func_name
                .clone()
                .unwrap_or_else(|| "<main>".to_owned()),
            required: self.bindings.len() + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syms(names: &[&str]) -> Vec<SymId> {
        names
            .iter()
            .enumerate()
            .map(|(i, _)| SymId(i as u32))
            .collect()
    }

    #[test]
    fn test_first_mention_claims_in_order() {
        let ids = syms(&["a", "b", "c"]);
        let mut frame = Frame::main();
        assert_eq!(frame.ensure(ids[0]).unwrap(), "RAX");
        assert_eq!(frame.ensure(ids[1]).unwrap(), "RBX");
        assert_eq!(frame.ensure(ids[2]).unwrap(), "RCX");
        // repeat mention keeps the register
        assert_eq!(frame.ensure(ids[1]).unwrap(), "RBX");
        assert_eq!(frame.len(), 3);
    }

    #[test]
    fn test_ninth_name_overflows() {
        let names: Vec<String> = (0..9).map(|i| format!("v{i}")).collect();
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let ids = syms(&name_refs);
        let mut frame = Frame::function("f");
        for id in &ids[..8] {
            frame.ensure(*id).unwrap();
        }
        let err = frame.ensure(ids[8]).unwrap_err();
        match err {
            BackendError::TooManyLocals { func, required } => {
                assert_eq!(func, "f");
                assert_eq!(required, 9);
            }
            other => panic!("wrong error: {other}"),
        }
    }

    #[test]
    fn test_temp_scans_for_free_register() {
        let ids = syms(&["x"]);
        let mut frame = Frame::main();
        assert_eq!(frame.temp(), Some("RAX"));
        frame.ensure(ids[0]).unwrap();
        assert_eq!(frame.temp(), Some("RBX"));
    }

    #[test]
    fn test_temp_exhausted() {
        let names: Vec<String> = (0..8).map(|i| format!("v{i}")).collect();
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let ids = syms(&name_refs);
        let mut frame = Frame::main();
        for id in ids {
            frame.ensure(id).unwrap();
        }
        assert_eq!(frame.temp(), None);
    }

    #[test]
    fn test_lookup_never_allocates() {
        let ids = syms(&["x"]);
        let mut frame = Frame::main();
        assert_eq!(frame.lookup(ids[0]), None);
        frame.ensure(ids[0]).unwrap();
        assert_eq!(frame.lookup(ids[0]), Some("RAX"));
    }
}
