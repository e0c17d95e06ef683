/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! Compilation contexts and the interning tables behind them.

use serde::{Deserialize, Serialize};

use crate::instruction::AssemblyStep;
use crate::value::Value;

/// The implicit message target variable seeded into every procedure context.
pub const TARGET: &str = "$target";

/// An ordered, deduplicating set. Interning is idempotent and returns a
/// stable 1-based index; retrieval by index returns the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternTable<T: PartialEq>(Vec<T>);

impl<T: PartialEq> Default for InternTable<T> {
    fn default() -> Self {
        InternTable(Vec::new())
    }
}

impl<T: PartialEq> InternTable<T> {
    pub fn new() -> Self {
        InternTable(Vec::new())
    }

    pub fn intern(&mut self, value: T) -> u16 {
        if let Some(position) = self.0.iter().position(|existing| *existing == value) {
            return position as u16 + 1;
        }
        self.0.push(value);
        self.0.len() as u16
    }

    pub fn index_of(&self, value: &T) -> Option<u16> {
        self.0
            .iter()
            .position(|existing| existing == value)
            .map(|position| position as u16 + 1)
    }

    pub fn contains(&self, value: &T) -> bool {
        self.0.iter().any(|existing| existing == value)
    }

    pub fn get(&self, index: u16) -> Option<&T> {
        if index == 0 {
            return None;
        }
        self.0.get(index as usize - 1)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }
}

/// Symbols are interned in their assembly spelling (`$x`, `$$result`).
pub type SymbolTable = InternTable<String>;

/// Label text to 1-based instruction address, kept in emission order.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressTable(Vec<(String, u16)>);

impl AddressTable {
    pub fn new() -> Self {
        AddressTable(Vec::new())
    }

    pub fn insert(&mut self, label: String, address: u16) {
        self.0.push((label, address));
    }

    pub fn address_of(&self, label: &str) -> Option<u16> {
        self.0
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, address)| *address)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, u16)> {
        self.0.iter()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// The compilation output for one procedure. Created by the top-level
/// compile call, mutated by the walker and builder, and sealed when
/// compilation returns; the assembler then attaches the parsed step list
/// and the packed bytecode.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureContext {
    pub parameters: SymbolTable,
    pub variables: SymbolTable,
    pub procedures: SymbolTable,
    pub addresses: AddressTable,
    pub assembly: String,
    pub instructions: Vec<AssemblyStep>,
    pub bytecode: Vec<u16>,
}

impl ProcedureContext {
    pub fn new() -> Self {
        let mut context = ProcedureContext::default();
        context.variables.intern(TARGET.to_string());
        context
    }
}

/// State shared across all procedures of one type: the literal pool and the
/// named constants. Literal order and constant key order define the indices
/// used by the encoder.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeContext {
    pub literals: InternTable<Value>,
    constants: Vec<(String, Value)>,
}

impl TypeContext {
    pub fn new() -> Self {
        TypeContext::default()
    }

    /// Define a named constant. Redefinition is ignored so key order stays
    /// stable.
    pub fn define_constant(&mut self, symbol: &str, value: Value) {
        if self.constant_index(symbol).is_none() {
            self.constants.push((symbol.to_string(), value));
        }
    }

    pub fn constant_index(&self, symbol: &str) -> Option<u16> {
        self.constants
            .iter()
            .position(|(existing, _)| existing == symbol)
            .map(|position| position as u16 + 1)
    }

    pub fn is_constant(&self, symbol: &str) -> bool {
        self.constant_index(symbol).is_some()
    }
}

// ------------- unit tests -------------
