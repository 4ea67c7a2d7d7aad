//! Branch-outcome evaluation over a substituted tree.
//!
//! Given the positional parameter values, every `if`/`else if` test is
//! evaluated to a concrete boolean and the 1-based line of its `if` keyword
//! is recorded as true or false. The walk is static analysis, not execution:
//! both branches of every conditional are visited so nested tests are
//! classified even when their parent branch is not taken, and a `while` body
//! is visited once without iterating. The tree is never mutated.

use std::collections::HashMap;

use serde::Serialize;

use crate::ast::{AssignTarget, Expr, Lit, Program, Stmt, StmtKind};
use crate::error::CoreError;
use crate::value::{apply_binary, Value};

/// Line numbers of conditional tests, split by outcome. A line appears in at
/// most one of the two lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Classification {
    pub true_lines: Vec<usize>,
    pub false_lines: Vec<usize>,
}

type ConcreteEnv = HashMap<String, Value>;

/// Classify every conditional test line in `program`, binding `args` to the
/// formal parameters of each function declaration in order.
pub fn classify(program: &Program, args: &[Value]) -> Result<Classification, CoreError> {
    let mut out = Classification::default();
    let mut env = ConcreteEnv::new();
    walk_block(&program.body, &mut env, args, &mut out)?;
    Ok(out)
}

fn walk_block(
    stmts: &[Stmt],
    env: &mut ConcreteEnv,
    args: &[Value],
    out: &mut Classification,
) -> Result<(), CoreError> {
    for stmt in stmts {
        walk_stmt(stmt, env, args, out)?;
    }
    Ok(())
}

fn walk_stmt(
    stmt: &Stmt,
    env: &mut ConcreteEnv,
    args: &[Value],
    out: &mut Classification,
) -> Result<(), CoreError> {
    match &stmt.kind {
        StmtKind::VarDecl { decls } => {
            // Only globals reach this point in a substituted tree. An
            // uninitialized declaration binds nothing.
            for decl in decls {
                if let Some(init) = &decl.init {
                    let value = eval_expr(init, env)?;
                    env.insert(decl.name.clone(), value);
                }
            }
        }
        StmtKind::FunctionDecl { params, body, .. } => {
            let mut inner = env.clone();
            for (param, value) in params.iter().zip(args) {
                inner.insert(param.clone(), value.clone());
            }
            walk_block(body, &mut inner, args, out)?;
        }
        StmtKind::Assign { target, value } => {
            let value = eval_expr(value, env)?;
            apply_assignment(target, value, env)?;
        }
        StmtKind::Expr(_) => {}
        StmtKind::If {
            test,
            consequent,
            alternate,
        } => {
            if eval_expr(test, env)?.truthy() {
                out.true_lines.push(stmt.line);
            } else {
                out.false_lines.push(stmt.line);
            }
            walk_block(consequent, &mut env.clone(), args, out)?;
            if let Some(alternate) = alternate {
                walk_block(alternate, &mut env.clone(), args, out)?;
            }
        }
        StmtKind::While { body, .. } => {
            // One pass for nested conditionals; the test itself is not a
            // classified line and iteration is not modeled.
            walk_block(body, &mut env.clone(), args, out)?;
        }
        StmtKind::Return { .. } => {}
    }
    Ok(())
}

/// Apply a kept assignment to the concrete environment so later tests see
/// the updated value.
fn apply_assignment(
    target: &AssignTarget,
    value: Value,
    env: &mut ConcreteEnv,
) -> Result<(), CoreError> {
    match target {
        AssignTarget::Name(name) => {
            env.insert(name.clone(), value);
            Ok(())
        }
        AssignTarget::Element { object, index } => {
            let position = match index {
                Lit::Num(n) => *n as i64,
                other => {
                    return Err(CoreError::Eval(format!(
                        "non-numeric element index `{}`",
                        other.raw()
                    )))
                }
            };
            let slot = env
                .get_mut(object)
                .ok_or_else(|| CoreError::UnboundIdentifier(object.clone()))?;
            let Value::Array(elements) = slot else {
                return Err(CoreError::Eval(format!("`{object}` is not an array")));
            };
            if position < 0 || position as usize >= elements.len() {
                return Err(CoreError::IndexOutOfRange {
                    index: position,
                    len: elements.len(),
                });
            }
            elements[position as usize] = value;
            Ok(())
        }
    }
}

/// Evaluate an expression to a concrete value. Every identifier must be
/// bound by now; a free name is fatal.
pub fn eval_expr(expr: &Expr, env: &ConcreteEnv) -> Result<Value, CoreError> {
    match expr {
        Expr::Literal(lit) => Ok(Value::from_lit(lit)),
        Expr::Ident(name) => env
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::UnboundIdentifier(name.clone())),
        Expr::Binary { op, left, right } => {
            let left = eval_expr(left, env)?;
            let right = eval_expr(right, env)?;
            apply_binary(*op, left, right)
        }
        Expr::Logical { op, left, right } => {
            let left = eval_expr(left, env)?;
            let take_left = match op {
                crate::ast::LogicalOp::And => !left.truthy(),
                crate::ast::LogicalOp::Or => left.truthy(),
            };
            if take_left {
                Ok(left)
            } else {
                eval_expr(right, env)
            }
        }
        Expr::Member { object, index } => {
            let object = eval_expr(object, env)?;
            let index = eval_expr(index, env)?;
            object.index(&index)
        }
        Expr::Array(elements) => elements
            .iter()
            .map(|element| eval_expr(element, env))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
    }
}
