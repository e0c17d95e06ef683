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

//! The instruction builder.
//!
//! Owns the frame stack, the statement label grammar, the pending-label
//! slot and the address counter, and interns every symbol referenced by an
//! emitted instruction into the procedure context tables. At most one label
//! can be pending at a time: inserting a second one first emits a SKIP so
//! both resolve to distinct addresses.

use crate::context::{ProcedureContext, TypeContext};
use crate::instruction::{
    AssemblyStep, ExecuteStyle, HandleKind, Instruction, JumpCondition, PopKind, StorageKind,
};
use crate::value::Value;

/// The per-statement record: derived labels and the clause counter that
/// numbers nested blocks.
#[derive(Debug)]
pub struct StatementContext {
    pub clause_number: u32,
    pub has_handlers: bool,
    pub has_clauses: bool,
    pub start_label: String,
    pub done_label: String,
    pub handler_label: String,
    pub failure_label: String,
    pub success_label: String,
    pub loop_label: Option<String>,
}

/// One frame per entered procedure (the top level or a nested block).
#[derive(Debug)]
struct ProcedureFrame {
    statement_number: u32,
    prefix: String,
    statement: Option<StatementContext>,
}

#[derive(Debug)]
pub struct InstructionBuilder {
    address: u16,
    stack: Vec<ProcedureFrame>,
    next_label: Option<String>,
    steps: Vec<AssemblyStep>,
    requires_finalization: bool,
    context: ProcedureContext,
}

impl InstructionBuilder {
    pub fn new(context: ProcedureContext) -> Self {
        InstructionBuilder {
            address: 1,
            stack: Vec::new(),
            next_label: None,
            steps: Vec::new(),
            requires_finalization: true,
            context,
        }
    }

    pub fn context(&self) -> &ProcedureContext {
        &self.context
    }

    /// Consume the builder, yielding the populated context and the emitted
    /// step list.
    pub fn finish(self) -> (ProcedureContext, Vec<AssemblyStep>) {
        (self.context, self.steps)
    }

    // --- frame stack ---

    /// Enter a procedure. A nested block derives its prefix from the parent
    /// frame and consumes one of the parent statement's clause numbers.
    pub fn push_procedure_context(&mut self) {
        let prefix = match self.stack.last_mut() {
            Some(parent) => {
                let number = parent.statement_number;
                let statement = parent
                    .statement
                    .as_mut()
                    .expect("a nested block requires an active statement");
                let clause = statement.clause_number;
                statement.clause_number += 1;
                format!("{}{}.{}.", parent.prefix, number, clause)
            }
            None => String::new(),
        };
        self.stack.push(ProcedureFrame {
            statement_number: 1,
            prefix,
            statement: None,
        });
    }

    pub fn pop_procedure_context(&mut self) {
        self.stack.pop();
    }

    /// Enter a statement, deriving its labels from the frame prefix and the
    /// statement kind.
    pub fn push_statement_context(
        &mut self,
        kind: &'static str,
        has_handlers: bool,
        has_clauses: bool,
    ) {
        let frame = self
            .stack
            .last_mut()
            .expect("a statement requires an active procedure frame");
        let base = format!("{}{}.{}", frame.prefix, frame.statement_number, kind);
        frame.statement = Some(StatementContext {
            clause_number: 1,
            has_handlers,
            has_clauses,
            start_label: base.clone(),
            done_label: format!("{}Done", base),
            handler_label: format!("{}Handlers", base),
            failure_label: format!("{}Failed", base),
            success_label: format!("{}Succeeded", base),
            loop_label: None,
        });
    }

    pub fn pop_statement_context(&mut self) {
        let frame = self
            .stack
            .last_mut()
            .expect("a statement requires an active procedure frame");
        frame.statement = None;
        frame.statement_number += 1;
    }

    pub fn statement(&self) -> &StatementContext {
        self.stack
            .last()
            .and_then(|frame| frame.statement.as_ref())
            .expect("no statement is active")
    }

    /// A clause label derived from the statement's current clause number,
    /// e.g. `1.2.ConditionClause`.
    pub fn clause_label(&self, suffix: &str) -> String {
        let frame = self.stack.last().expect("no procedure frame is active");
        let statement = frame.statement.as_ref().expect("no statement is active");
        format!(
            "{}{}.{}.{}",
            frame.prefix, frame.statement_number, statement.clause_number, suffix
        )
    }

    /// The clause label one block further along, used to chain conditions
    /// and handlers (each block consumes exactly one clause number).
    pub fn next_clause_label(&self, suffix: &str) -> String {
        let frame = self.stack.last().expect("no procedure frame is active");
        let statement = frame.statement.as_ref().expect("no statement is active");
        format!(
            "{}{}.{}.{}",
            frame.prefix,
            frame.statement_number,
            statement.clause_number + 1,
            suffix
        )
    }

    /// The unnumbered else label, e.g. `1.ElseClause`.
    pub fn else_label(&self) -> String {
        let frame = self.stack.last().expect("no procedure frame is active");
        format!("{}{}.ElseClause", frame.prefix, frame.statement_number)
    }

    pub fn set_loop_label(&mut self, label: String) {
        let statement = self
            .stack
            .last_mut()
            .and_then(|frame| frame.statement.as_mut())
            .expect("no statement is active");
        statement.loop_label = Some(label);
    }

    /// Walk the frame stack outward for the nearest statement with a loop
    /// label; returns its done and loop labels.
    pub fn nearest_loop(&self) -> Option<(String, String)> {
        self.stack
            .iter()
            .rev()
            .filter_map(|frame| frame.statement.as_ref())
            .find_map(|statement| {
                statement
                    .loop_label
                    .as_ref()
                    .map(|label| (statement.done_label.clone(), label.clone()))
            })
    }

    // --- finalization flag ---

    pub fn requires_finalization(&self) -> bool {
        self.requires_finalization
    }

    pub fn set_requires_finalization(&mut self, required: bool) {
        self.requires_finalization = required;
    }

    pub fn has_pending_label(&self) -> bool {
        self.next_label.is_some()
    }

    // --- emission ---

    /// Bind a label to the next emitted instruction. If another label is
    /// already pending, a SKIP is emitted first so both get addresses.
    pub fn insert_label(&mut self, label: String) {
        if self.next_label.is_some() {
            self.insert_instruction(Instruction::Skip);
        }
        self.next_label = Some(label);
    }

    fn insert_instruction(&mut self, instruction: Instruction) {
        let label = self.next_label.take();
        if let Some(label) = &label {
            self.context.addresses.insert(label.clone(), self.address);
        }
        self.steps.push(AssemblyStep { label, instruction });
        self.address += 1;
    }

    pub fn insert_jump(&mut self, condition: JumpCondition, label: &str) {
        self.insert_instruction(Instruction::Jump {
            condition,
            label: label.to_string(),
        });
    }

    pub fn insert_push_handler(&mut self, label: &str) {
        self.insert_instruction(Instruction::PushHandler {
            label: label.to_string(),
        });
    }

    /// Emit a PUSH LITERAL, interning the parsed value in the type context.
    pub fn insert_push_literal(&mut self, literal: &str, types: &mut TypeContext) {
        types.literals.intern(Value::parse(literal));
        self.insert_instruction(Instruction::PushLiteral {
            literal: literal.to_string(),
        });
    }

    pub fn insert_push_constant(&mut self, constant: &str) {
        self.insert_instruction(Instruction::PushConstant {
            constant: constant.to_string(),
        });
    }

    pub fn insert_push_parameter(&mut self, parameter: &str) {
        self.insert_instruction(Instruction::PushParameter {
            parameter: parameter.to_string(),
        });
    }

    pub fn insert_pop(&mut self, kind: PopKind) {
        self.insert_instruction(Instruction::Pop { kind });
    }

    pub fn insert_load(&mut self, kind: StorageKind, symbol: &str) {
        self.context.variables.intern(symbol.to_string());
        self.insert_instruction(Instruction::Load {
            kind,
            symbol: symbol.to_string(),
        });
    }

    pub fn insert_store(&mut self, kind: StorageKind, symbol: &str) {
        self.context.variables.intern(symbol.to_string());
        self.insert_instruction(Instruction::Store {
            kind,
            symbol: symbol.to_string(),
        });
    }

    pub fn insert_invoke(&mut self, intrinsic: &str, count: u8) {
        self.insert_instruction(Instruction::Invoke {
            intrinsic: intrinsic.to_string(),
            count,
        });
    }

    pub fn insert_execute(&mut self, procedure: &str, style: ExecuteStyle) {
        self.context.procedures.intern(procedure.to_string());
        self.insert_instruction(Instruction::Execute {
            procedure: procedure.to_string(),
            style,
        });
    }

    pub fn insert_handle(&mut self, kind: HandleKind) {
        self.insert_instruction(Instruction::Handle { kind });
    }

    /// Route the implicit result and hand control back to the caller. Also
    /// resolves a trailing pending label.
    pub fn finalize(&mut self) {
        self.insert_load(StorageKind::Variable, "$$result");
        self.insert_handle(HandleKind::Result);
    }
}

// ------------- unit tests -------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ProcedureContext;

    fn builder() -> InstructionBuilder {
        InstructionBuilder::new(ProcedureContext::new())
    }

    #[test]
    fn test_pending_label_binds_to_the_next_instruction() {
        let mut builder = builder();
        builder.insert_label("1.ReturnStatement".to_string());
        builder.insert_handle(HandleKind::Result);
        let (context, steps) = builder.finish();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].label, Some("1.ReturnStatement".to_string()));
        assert_eq!(context.addresses.address_of("1.ReturnStatement"), Some(1));
    }

    #[test]
    fn test_second_pending_label_forces_a_skip() {
        let mut builder = builder();
        builder.insert_label("1.IfStatementDone".to_string());
        builder.insert_label("2.EvaluateStatement".to_string());
        builder.insert_handle(HandleKind::Result);
        let (context, steps) = builder.finish();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].instruction, Instruction::Skip);
        assert_eq!(steps[0].label, Some("1.IfStatementDone".to_string()));
        assert_eq!(context.addresses.address_of("1.IfStatementDone"), Some(1));
        assert_eq!(context.addresses.address_of("2.EvaluateStatement"), Some(2));
    }

    #[test]
    fn test_label_addresses_increase_in_emission_order() {
        let mut builder = builder();
        builder.push_procedure_context();
        for kind in ["EvaluateStatement", "EvaluateStatement", "ReturnStatement"] {
            builder.push_statement_context(kind, false, false);
            let label = builder.statement().start_label.clone();
            builder.insert_label(label);
            builder.insert_handle(HandleKind::Result);
            builder.pop_statement_context();
        }
        builder.pop_procedure_context();
        let (context, _) = builder.finish();
        let addresses: Vec<u16> = context.addresses.iter().map(|(_, a)| *a).collect();
        assert_eq!(addresses, vec![1, 2, 3]);
    }

    #[test]
    fn test_nested_block_prefixes_follow_the_lineage() {
        let mut builder = builder();
        builder.push_procedure_context();
        builder.push_statement_context("IfStatement", false, true);
        assert_eq!(builder.statement().start_label, "1.IfStatement");
        assert_eq!(builder.clause_label("ConditionClause"), "1.1.ConditionClause");
        builder.push_procedure_context();
        builder.push_statement_context("EvaluateStatement", false, false);
        assert_eq!(builder.statement().start_label, "1.1.1.EvaluateStatement");
        builder.pop_statement_context();
        builder.pop_procedure_context();
        // The block consumed clause number one.
        assert_eq!(builder.clause_label("ConditionClause"), "1.2.ConditionClause");
        builder.pop_statement_context();
        builder.pop_procedure_context();
    }

    #[test]
    fn test_nearest_loop_walks_outward() {
        let mut builder = builder();
        builder.push_procedure_context();
        builder.push_statement_context("WhileStatement", false, true);
        builder.set_loop_label("1.1.ConditionClause".to_string());
        builder.push_procedure_context();
        builder.push_statement_context("BreakStatement", false, false);
        let (done, loop_label) = builder.nearest_loop().unwrap();
        assert_eq!(done, "1.WhileStatementDone");
        assert_eq!(loop_label, "1.1.ConditionClause");
    }

    #[test]
    fn test_nearest_loop_fails_outside_loops() {
        let mut builder = builder();
        builder.push_procedure_context();
        builder.push_statement_context("BreakStatement", false, false);
        assert!(builder.nearest_loop().is_none());
    }

    #[test]
    fn test_finalize_interns_the_result_variable() {
        let mut builder = builder();
        builder.finalize();
        let (context, steps) = builder.finish();
        assert_eq!(steps.len(), 2);
        assert!(context.variables.contains(&"$$result".to_string()));
        assert_eq!(
            steps[1].instruction,
            Instruction::Handle {
                kind: HandleKind::Result,
            }
        );
    }
}
