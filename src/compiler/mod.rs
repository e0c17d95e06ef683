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

//! The compiling walker.
//!
//! Dispatches on the syntax tree node kind and drives the instruction
//! builder. Every emission routine preserves the component stack effect the
//! runtime expects: expressions net one pushed value, statements net zero.

pub mod builder;

use crate::ast::{
    CollectionItem, Expression, HandleClause, MainClause, Procedure, Recipient, Statement,
};
use crate::context::{ProcedureContext, TypeContext};
use crate::errors::CompilerError;
use crate::formatter;
use crate::instruction::{ExecuteStyle, HandleKind, JumpCondition, PopKind, StorageKind};
use builder::InstructionBuilder;

/// Compile a procedure syntax tree into a procedure context holding the
/// canonical assembly listing and the populated symbol tables.
pub fn compile(
    procedure: &Procedure,
    parameters: &[&str],
    types: &mut TypeContext,
) -> Result<ProcedureContext, CompilerError> {
    let mut context = ProcedureContext::new();
    for parameter in parameters {
        context.parameters.intern(symbol(parameter));
    }

    let mut compiler = Compiler {
        builder: InstructionBuilder::new(context),
        types,
        temporary_counter: 0,
    };
    compiler.compile_procedure(procedure)?;

    // Route the implicit result unless the tail already transferred control.
    // A still-pending label must be bound either way.
    if compiler.builder.requires_finalization() || compiler.builder.has_pending_label() {
        compiler.builder.finalize();
    }

    let (mut context, steps) = compiler.builder.finish();
    context.assembly = formatter::format_steps(&steps, 0);
    Ok(context)
}

/// Form the assembly symbol for a bare identifier.
fn symbol(identifier: &str) -> String {
    format!("${}", identifier)
}

struct Compiler<'a> {
    builder: InstructionBuilder,
    types: &'a mut TypeContext,
    temporary_counter: u32,
}

impl Compiler<'_> {
    /// Allocate a fresh temporary variable. Names are unique within a
    /// procedure; the counter is shared by all kinds and starts at 1.
    fn temporary(&mut self, kind: &str) -> String {
        self.temporary_counter += 1;
        format!("$${}-{}", kind, self.temporary_counter)
    }

    fn compile_procedure(&mut self, procedure: &Procedure) -> Result<(), CompilerError> {
        self.builder.push_procedure_context();
        for statement in &procedure.statements {
            self.compile_statement(statement)?;
        }
        self.builder.pop_procedure_context();
        Ok(())
    }

    /// Wrap one statement: start label, optional handler scaffolding around
    /// the main clause, done/failure/success labels.
    fn compile_statement(&mut self, statement: &Statement) -> Result<(), CompilerError> {
        self.builder.push_statement_context(
            statement.main.statement_kind(),
            !statement.handlers.is_empty(),
            statement.main.has_blocks(),
        );
        self.builder.set_requires_finalization(true);

        let record = self.builder.statement();
        let has_handlers = record.has_handlers;
        let has_clauses = record.has_clauses;
        let start = record.start_label.clone();
        let done = record.done_label.clone();
        let handler = record.handler_label.clone();
        let failure = record.failure_label.clone();
        let success = record.success_label.clone();

        self.builder.insert_label(start);
        if has_handlers {
            self.builder.insert_push_handler(&handler);
        }
        self.compile_main_clause(&statement.main)?;
        if has_clauses || has_handlers {
            self.builder.insert_label(done);
        }
        if has_handlers {
            self.builder.insert_pop(PopKind::Handler);
            self.builder.insert_jump(JumpCondition::Any, &success);
            self.builder.insert_label(handler);
            let count = statement.handlers.len();
            for (index, clause) in statement.handlers.iter().enumerate() {
                self.compile_handle_clause(clause, index + 1 == count)?;
            }
            self.builder.insert_label(failure);
            self.builder.insert_handle(HandleKind::Exception);
            self.builder.insert_label(success);
        }
        self.builder.pop_statement_context();
        Ok(())
    }

    fn compile_main_clause(&mut self, clause: &MainClause) -> Result<(), CompilerError> {
        match clause {
            MainClause::Evaluate {
                recipient,
                expression,
            } => match recipient {
                None => {
                    self.compile_expression(expression)?;
                    self.builder.insert_store(StorageKind::Variable, "$$result");
                }
                Some(recipient) => {
                    self.prepare_recipient(recipient)?;
                    self.compile_expression(expression)?;
                    self.assign_recipient(recipient)?;
                }
            },
            MainClause::If {
                conditions,
                else_block,
            } => self.compile_if(conditions, else_block)?,
            MainClause::Select {
                selector,
                options,
                else_block,
            } => self.compile_select(selector, options, else_block)?,
            MainClause::While { condition, block } => self.compile_while(condition, block)?,
            MainClause::WithEach {
                item,
                sequence,
                block,
            } => self.compile_with_each(item, sequence, block)?,
            MainClause::Break => {
                let Some((done, _)) = self.builder.nearest_loop() else {
                    return Err(CompilerError::NoEnclosingLoop {
                        statement: "break loop".to_string(),
                    });
                };
                self.builder.insert_jump(JumpCondition::Any, &done);
            }
            MainClause::Continue => {
                let Some((_, loop_label)) = self.builder.nearest_loop() else {
                    return Err(CompilerError::NoEnclosingLoop {
                        statement: "continue loop".to_string(),
                    });
                };
                self.builder.insert_jump(JumpCondition::Any, &loop_label);
            }
            MainClause::Return { expression } => {
                match expression {
                    Some(expression) => self.compile_expression(expression)?,
                    None => self.builder.insert_push_literal("none", self.types),
                }
                self.builder.insert_handle(HandleKind::Result);
                self.builder.set_requires_finalization(false);
            }
            MainClause::Throw { expression } => {
                self.compile_expression(expression)?;
                self.builder.insert_handle(HandleKind::Exception);
                self.builder.set_requires_finalization(false);
            }
            MainClause::Publish { event } => {
                self.compile_expression(event)?;
                self.builder
                    .insert_store(StorageKind::Message, "$$eventQueue");
            }
            MainClause::Post { message, queue } => {
                let temp = self.temporary("queue");
                self.compile_expression(queue)?;
                self.builder.insert_store(StorageKind::Variable, &temp);
                self.compile_expression(message)?;
                self.builder.insert_store(StorageKind::Message, &temp);
            }
            MainClause::Save { draft, location } => {
                let temp = self.temporary("location");
                self.compile_expression(draft)?;
                self.compile_expression(location)?;
                self.builder.insert_store(StorageKind::Variable, &temp);
                self.builder.insert_store(StorageKind::Draft, &temp);
            }
            MainClause::Commit { document, location } => {
                let temp = self.temporary("location");
                self.compile_expression(document)?;
                self.compile_expression(location)?;
                self.builder.insert_store(StorageKind::Variable, &temp);
                self.builder.insert_store(StorageKind::Document, &temp);
            }
            MainClause::Discard { location } => {
                let temp = self.temporary("location");
                self.compile_expression(location)?;
                self.builder.insert_store(StorageKind::Variable, &temp);
                self.builder.insert_push_literal("none", self.types);
                self.builder.insert_store(StorageKind::Draft, &temp);
            }
            MainClause::Checkout {
                recipient,
                location,
            } => {
                self.prepare_recipient(recipient)?;
                let temp = self.temporary("location");
                self.compile_expression(location)?;
                self.builder.insert_store(StorageKind::Variable, &temp);
                self.builder.insert_load(StorageKind::Document, &temp);
                self.assign_recipient(recipient)?;
            }
            MainClause::Wait { recipient, queue } => {
                self.prepare_recipient(recipient)?;
                let temp = self.temporary("queue");
                self.compile_expression(queue)?;
                self.builder.insert_store(StorageKind::Variable, &temp);
                self.builder.insert_load(StorageKind::Message, &temp);
                self.assign_recipient(recipient)?;
            }
        }
        Ok(())
    }

    fn compile_if(
        &mut self,
        conditions: &[(Expression, Procedure)],
        else_block: &Option<Procedure>,
    ) -> Result<(), CompilerError> {
        let done = self.builder.statement().done_label.clone();
        let count = conditions.len();
        for (index, (condition, block)) in conditions.iter().enumerate() {
            let label = self.builder.clause_label("ConditionClause");
            self.builder.insert_label(label);
            self.compile_expression(condition)?;
            let next = if index + 1 < count {
                self.builder.next_clause_label("ConditionClause")
            } else if else_block.is_some() {
                self.builder.else_label()
            } else {
                done.clone()
            };
            self.builder.insert_jump(JumpCondition::OnFalse, &next);
            self.compile_block(block)?;
            if index + 1 < count || else_block.is_some() {
                self.builder.insert_jump(JumpCondition::Any, &done);
            }
        }
        if let Some(block) = else_block {
            let label = self.builder.else_label();
            self.builder.insert_label(label);
            self.compile_block(block)?;
        }
        Ok(())
    }

    fn compile_select(
        &mut self,
        selector: &Expression,
        options: &[(Expression, Procedure)],
        else_block: &Option<Procedure>,
    ) -> Result<(), CompilerError> {
        let done = self.builder.statement().done_label.clone();
        self.compile_expression(selector)?;
        let temp = self.temporary("selector");
        self.builder.insert_store(StorageKind::Variable, &temp);
        let count = options.len();
        for (index, (option, block)) in options.iter().enumerate() {
            let label = self.builder.clause_label("OptionClause");
            self.builder.insert_label(label);
            self.builder.insert_load(StorageKind::Variable, &temp);
            self.compile_expression(option)?;
            self.builder.insert_invoke("$isMatchedBy", 2);
            let next = if index + 1 < count {
                self.builder.next_clause_label("OptionClause")
            } else if else_block.is_some() {
                self.builder.else_label()
            } else {
                done.clone()
            };
            self.builder.insert_jump(JumpCondition::OnFalse, &next);
            self.compile_block(block)?;
            if index + 1 < count || else_block.is_some() {
                self.builder.insert_jump(JumpCondition::Any, &done);
            }
        }
        if let Some(block) = else_block {
            let label = self.builder.else_label();
            self.builder.insert_label(label);
            self.compile_block(block)?;
        }
        Ok(())
    }

    fn compile_while(
        &mut self,
        condition: &Expression,
        block: &Procedure,
    ) -> Result<(), CompilerError> {
        let done = self.builder.statement().done_label.clone();
        let label = self.builder.clause_label("ConditionClause");
        self.builder.set_loop_label(label.clone());
        self.builder.insert_label(label.clone());
        self.compile_expression(condition)?;
        self.builder.insert_jump(JumpCondition::OnFalse, &done);
        self.compile_block(block)?;
        self.builder.insert_jump(JumpCondition::Any, &label);
        Ok(())
    }

    fn compile_with_each(
        &mut self,
        item: &str,
        sequence: &Expression,
        block: &Procedure,
    ) -> Result<(), CompilerError> {
        let done = self.builder.statement().done_label.clone();
        self.compile_expression(sequence)?;
        self.builder
            .insert_execute("$getIterator", ExecuteStyle::OnTarget);
        let iterator = self.temporary("iterator");
        self.builder.insert_store(StorageKind::Variable, &iterator);
        let label = self.builder.clause_label("IterationClause");
        self.builder.set_loop_label(label.clone());
        self.builder.insert_label(label.clone());
        self.builder.insert_load(StorageKind::Variable, &iterator);
        self.builder
            .insert_execute("$hasNext", ExecuteStyle::OnTarget);
        self.builder.insert_jump(JumpCondition::OnFalse, &done);
        self.builder.insert_load(StorageKind::Variable, &iterator);
        self.builder
            .insert_execute("$getNext", ExecuteStyle::OnTarget);
        self.builder
            .insert_store(StorageKind::Variable, &symbol(item));
        self.compile_block(block)?;
        self.builder.insert_jump(JumpCondition::Any, &label);
        Ok(())
    }

    fn compile_block(&mut self, block: &Procedure) -> Result<(), CompilerError> {
        self.builder.push_procedure_context();
        for statement in &block.statements {
            self.compile_statement(statement)?;
        }
        self.builder.pop_procedure_context();
        Ok(())
    }

    /// Match the pending exception against the clause template; on a match
    /// discard it and run the handler block, otherwise fall through to the
    /// next handler or the statement failure label.
    fn compile_handle_clause(
        &mut self,
        clause: &HandleClause,
        is_last: bool,
    ) -> Result<(), CompilerError> {
        let label = self.builder.clause_label("HandleClause");
        self.builder.insert_label(label);
        let exception = symbol(&clause.exception);
        self.builder.insert_store(StorageKind::Variable, &exception);
        self.builder.insert_load(StorageKind::Variable, &exception);
        self.builder.insert_load(StorageKind::Variable, &exception);
        self.compile_expression(&clause.template)?;
        self.builder.insert_invoke("$isMatchedBy", 2);
        let next = if is_last {
            self.builder.statement().failure_label.clone()
        } else {
            self.builder.next_clause_label("HandleClause")
        };
        self.builder.insert_jump(JumpCondition::OnFalse, &next);
        self.builder.insert_pop(PopKind::Component);
        self.compile_block(&clause.block)?;
        let success = self.builder.statement().success_label.clone();
        self.builder.insert_jump(JumpCondition::Any, &success);
        Ok(())
    }

    // --- recipients ---

    /// Emit the preparatory instructions for a recipient. Only subcomponent
    /// recipients need any: the addressed parent and a singleton argument
    /// list holding the final index are left on the stack.
    fn prepare_recipient(&mut self, recipient: &Recipient) -> Result<(), CompilerError> {
        if let Recipient::Subcomponent { composite, indices } = recipient {
            self.compile_expression(composite)?;
            let (last, rest) = indices
                .split_last()
                .expect("a subcomponent recipient carries at least one index");
            for index in rest {
                self.compile_subcomponent_link(index)?;
            }
            self.builder.insert_invoke("$list", 0);
            self.compile_expression(last)?;
            self.builder.insert_invoke("$addItem", 2);
        }
        Ok(())
    }

    /// Assign the value on top of the stack to a recipient prepared by
    /// [`Self::prepare_recipient`].
    fn assign_recipient(&mut self, recipient: &Recipient) -> Result<(), CompilerError> {
        match recipient {
            Recipient::Variable(name) => {
                self.builder
                    .insert_store(StorageKind::Variable, &symbol(name));
            }
            Recipient::Subcomponent { .. } => {
                self.builder.insert_invoke("$addItem", 2);
                self.builder.insert_invoke("$parameters", 1);
                self.builder
                    .insert_execute("$setSubcomponent", ExecuteStyle::OnTargetWithArguments);
                self.builder.insert_pop(PopKind::Component);
            }
        }
        Ok(())
    }

    // --- expressions ---

    fn compile_expression(&mut self, expression: &Expression) -> Result<(), CompilerError> {
        match expression {
            Expression::Element {
                literal,
                parameters,
            } => {
                self.builder.insert_push_literal(literal, self.types);
                if let Some(parameters) = parameters {
                    self.compile_expression(parameters)?;
                    self.builder.insert_invoke("$setParameters", 2);
                }
            }
            Expression::Variable(name) => {
                let reference = symbol(name);
                if self.builder.context().parameters.contains(&reference) {
                    self.builder.insert_push_parameter(&reference);
                } else if self.types.is_constant(&reference) {
                    self.builder.insert_push_constant(&reference);
                } else {
                    self.builder.insert_load(StorageKind::Variable, &reference);
                }
            }
            Expression::Arithmetic {
                operator,
                left,
                right,
            } => {
                self.compile_expression(left)?;
                self.compile_expression(right)?;
                self.builder.insert_invoke(operator.intrinsic(), 2);
            }
            Expression::Comparison {
                operator,
                left,
                right,
            } => {
                self.compile_expression(left)?;
                self.compile_expression(right)?;
                self.builder.insert_invoke(operator.intrinsic(), 2);
            }
            Expression::Logical {
                operator,
                left,
                right,
            } => {
                self.compile_expression(left)?;
                self.compile_expression(right)?;
                self.builder.insert_invoke(operator.intrinsic(), 2);
            }
            Expression::Concatenation { left, right } => {
                self.compile_expression(left)?;
                self.compile_expression(right)?;
                self.builder.insert_invoke("$concatenation", 2);
            }
            Expression::Exponential { base, exponent } => {
                self.compile_expression(base)?;
                self.compile_expression(exponent)?;
                self.builder.insert_invoke("$exponential", 2);
            }
            Expression::Factorial { operand } => {
                self.compile_expression(operand)?;
                self.builder.insert_invoke("$factorial", 1);
            }
            Expression::Complement { operand } => {
                self.compile_expression(operand)?;
                self.builder.insert_invoke("$complement", 1);
            }
            Expression::Inversion { operator, operand } => {
                self.compile_expression(operand)?;
                self.builder.insert_invoke(operator.intrinsic(), 1);
            }
            Expression::Magnitude { operand } => {
                self.compile_expression(operand)?;
                self.builder.insert_invoke("$magnitude", 1);
            }
            Expression::Default { value, fallback } => {
                self.compile_expression(value)?;
                self.compile_expression(fallback)?;
                self.builder.insert_invoke("$default", 2);
            }
            Expression::Dereference { reference } => {
                self.compile_expression(reference)?;
                let temp = self.temporary("location");
                self.builder.insert_store(StorageKind::Variable, &temp);
                self.builder.insert_load(StorageKind::Document, &temp);
            }
            Expression::FunctionCall {
                function,
                arguments,
            } => {
                if arguments.len() > 3 {
                    return Err(CompilerError::TooManyArguments {
                        function: function.clone(),
                        count: arguments.len(),
                    });
                }
                for argument in arguments {
                    self.compile_expression(&argument.value)?;
                }
                self.builder
                    .insert_invoke(&symbol(function), arguments.len() as u8);
            }
            Expression::MessageCall {
                target,
                message,
                arguments,
            } => {
                self.compile_expression(target)?;
                if arguments.is_empty() {
                    self.builder
                        .insert_execute(&symbol(message), ExecuteStyle::OnTarget);
                } else {
                    self.compile_argument_container(arguments)?;
                    self.builder
                        .insert_execute(&symbol(message), ExecuteStyle::OnTargetWithArguments);
                }
            }
            Expression::Collection {
                kind,
                items,
                parameters,
            } => {
                match parameters {
                    Some(parameters) => {
                        self.compile_expression(parameters)?;
                        self.builder.insert_invoke(kind.intrinsic(), 1);
                    }
                    None => self.builder.insert_invoke(kind.intrinsic(), 0),
                }
                for item in items {
                    match item {
                        CollectionItem::Item(expression) => {
                            self.compile_expression(expression)?;
                            self.builder.insert_invoke("$addItem", 2);
                        }
                        CollectionItem::Association { key, value } => {
                            self.compile_expression(key)?;
                            self.compile_expression(value)?;
                            self.builder.insert_invoke("$association", 2);
                            self.builder.insert_invoke("$addItem", 2);
                        }
                    }
                }
            }
            Expression::Range {
                first,
                last,
                parameters,
            } => {
                self.compile_expression(first)?;
                self.compile_expression(last)?;
                match parameters {
                    Some(parameters) => {
                        self.compile_expression(parameters)?;
                        self.builder.insert_invoke("$range", 3);
                    }
                    None => self.builder.insert_invoke("$range", 2),
                }
            }
            Expression::Subcomponent { composite, indices } => {
                self.compile_expression(composite)?;
                for index in indices {
                    self.compile_subcomponent_link(index)?;
                }
            }
            Expression::Block { source, parameters } => {
                let literal = format!("{{{}}}", source);
                self.builder.insert_push_literal(&literal, self.types);
                if let Some(parameters) = parameters {
                    self.compile_expression(parameters)?;
                    self.builder.insert_invoke("$setParameters", 2);
                }
            }
        }
        Ok(())
    }

    /// Wrap pre-compiled arguments into a parameters container for an
    /// EXECUTE ... WITH ARGUMENTS call.
    fn compile_argument_container(
        &mut self,
        arguments: &[Expression],
    ) -> Result<(), CompilerError> {
        self.builder.insert_invoke("$list", 0);
        for argument in arguments {
            self.compile_expression(argument)?;
            self.builder.insert_invoke("$addItem", 2);
        }
        self.builder.insert_invoke("$parameters", 1);
        Ok(())
    }

    /// Replace the parent on the stack with the child addressed by one
    /// index.
    fn compile_subcomponent_link(&mut self, index: &Expression) -> Result<(), CompilerError> {
        self.builder.insert_invoke("$list", 0);
        self.compile_expression(index)?;
        self.builder.insert_invoke("$addItem", 2);
        self.builder.insert_invoke("$parameters", 1);
        self.builder
            .insert_execute("$getSubcomponent", ExecuteStyle::OnTargetWithArguments);
        Ok(())
    }
}

// ------------- unit tests -------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Argument;
    use crate::value::Value;

    fn element(literal: &str) -> Expression {
        Expression::Element {
            literal: literal.to_string(),
            parameters: None,
        }
    }

    #[test]
    fn test_break_outside_a_loop_fails() {
        let procedure = Procedure::new(vec![Statement::new(MainClause::Break)]);
        let mut types = TypeContext::new();
        let result = compile(&procedure, &[], &mut types);
        assert_eq!(
            result,
            Err(CompilerError::NoEnclosingLoop {
                statement: "break loop".to_string(),
            })
        );
    }

    #[test]
    fn test_continue_outside_a_loop_fails() {
        let procedure = Procedure::new(vec![Statement::new(MainClause::Continue)]);
        let mut types = TypeContext::new();
        let result = compile(&procedure, &[], &mut types);
        assert_eq!(
            result,
            Err(CompilerError::NoEnclosingLoop {
                statement: "continue loop".to_string(),
            })
        );
    }

    #[test]
    fn test_function_calls_allow_at_most_three_arguments() {
        let call = Expression::FunctionCall {
            function: "logarithm".to_string(),
            arguments: vec![
                Argument::positional(element("1")),
                Argument::positional(element("2")),
                Argument::positional(element("3")),
                Argument::positional(element("4")),
            ],
        };
        let procedure = Procedure::new(vec![Statement::new(MainClause::Evaluate {
            recipient: None,
            expression: call,
        })]);
        let mut types = TypeContext::new();
        let result = compile(&procedure, &[], &mut types);
        assert_eq!(
            result,
            Err(CompilerError::TooManyArguments {
                function: "logarithm".to_string(),
                count: 4,
            })
        );
    }

    #[test]
    fn test_variable_references_resolve_by_namespace() {
        let mut types = TypeContext::new();
        types.define_constant("$pi", Value::Real(3.141592653589793));
        let sum = Expression::Arithmetic {
            operator: crate::ast::ArithmeticOperator::Sum,
            left: Box::new(Expression::Variable("count".to_string())),
            right: Box::new(Expression::Arithmetic {
                operator: crate::ast::ArithmeticOperator::Sum,
                left: Box::new(Expression::Variable("pi".to_string())),
                right: Box::new(Expression::Variable("total".to_string())),
            }),
        };
        let procedure = Procedure::new(vec![Statement::new(MainClause::Evaluate {
            recipient: None,
            expression: sum,
        })]);
        let context = compile(&procedure, &["count"], &mut types).unwrap();
        assert!(context.assembly.contains("PUSH PARAMETER $count"));
        assert!(context.assembly.contains("PUSH CONSTANT $pi"));
        assert!(context.assembly.contains("LOAD VARIABLE $total"));
    }

    #[test]
    fn test_named_argument_names_are_discarded() {
        let call = Expression::FunctionCall {
            function: "arctangent".to_string(),
            arguments: vec![
                Argument::positional(element("1")),
                Argument::named("opposite", element("2")),
            ],
        };
        let procedure = Procedure::new(vec![Statement::new(MainClause::Evaluate {
            recipient: None,
            expression: call,
        })]);
        let mut types = TypeContext::new();
        let context = compile(&procedure, &[], &mut types).unwrap();
        assert!(
            context
                .assembly
                .contains("INVOKE $arctangent WITH 2 ARGUMENTS")
        );
        assert!(!context.assembly.contains("opposite"));
    }

    #[test]
    fn test_temporaries_are_numbered_from_one() {
        let procedure = Procedure::new(vec![
            Statement::new(MainClause::Discard {
                location: element("<x:documents:1>"),
            }),
            Statement::new(MainClause::Post {
                message: element("\"ready\""),
                queue: element("<x:queues:1>"),
            }),
        ]);
        let mut types = TypeContext::new();
        let context = compile(&procedure, &[], &mut types).unwrap();
        assert!(context.assembly.contains("STORE DRAFT $$location-1"));
        assert!(context.assembly.contains("STORE MESSAGE $$queue-2"));
    }
}
