//! Symbolic substitution: inline every local variable and delete its
//! declaration and assignment statements.
//!
//! The walk carries a [`SymbolicEnv`] mapping bindings to the expression that
//! currently represents them, plus the set of preserved names (function
//! parameters and top-level declarations) that must stay visible in the
//! output. Each block gets a shallow copy of the enclosing environment, so
//! rebindings inside a branch or loop body never leak outward. Statement
//! lists are rebuilt with a keep/drop pass rather than spliced mid-iteration.
//!
//! Folding is purely symbolic: `fold_expr` replaces reads with their bound
//! expressions and performs no arithmetic. Computing actual values is the
//! branch classifier's job.

use crate::ast::{AssignTarget, Expr, Program, Stmt, StmtKind};
use crate::env::{BindingKey, PreservedNames, SymbolicEnv};

/// What a statement handler decided about its statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    Keep,
    Drop,
}

/// Rewrite the program in place: fold every read of a local variable into
/// the expression it was assigned, and delete the declarations and
/// assignments that defined it. Parameters and top-level declarations stay.
pub fn substitute(program: &mut Program) {
    let mut preserved = PreservedNames::new();
    let mut env = SymbolicEnv::new();
    rewrite_block(&mut program.body, &mut env, &mut preserved, true);
}

fn rewrite_block(
    stmts: &mut Vec<Stmt>,
    env: &mut SymbolicEnv,
    preserved: &mut PreservedNames,
    global: bool,
) {
    let mut kept = Vec::with_capacity(stmts.len());
    for mut stmt in std::mem::take(stmts) {
        if rewrite_stmt(&mut stmt, env, preserved, global) == Disposition::Keep {
            kept.push(stmt);
        }
    }
    *stmts = kept;
}

fn rewrite_stmt(
    stmt: &mut Stmt,
    env: &mut SymbolicEnv,
    preserved: &mut PreservedNames,
    global: bool,
) -> Disposition {
    match &mut stmt.kind {
        StmtKind::VarDecl { decls } => {
            if global {
                // Globals are referenced by name, never inlined, so they
                // bind to themselves and the declaration stays.
                for decl in decls.iter_mut() {
                    preserved.insert(&decl.name);
                    env.bind(
                        BindingKey::name(&decl.name),
                        Expr::Ident(decl.name.clone()),
                    );
                    if let Some(init) = &mut decl.init {
                        *init = fold_expr(init, env);
                    }
                }
                Disposition::Keep
            } else {
                for decl in decls.iter() {
                    let bound = match &decl.init {
                        Some(init) => fold_expr(init, env),
                        None => Expr::Ident(decl.name.clone()),
                    };
                    env.bind(BindingKey::name(&decl.name), bound);
                }
                Disposition::Drop
            }
        }
        StmtKind::FunctionDecl { params, body, .. } => {
            let mut body_env = env.child();
            for param in params.iter() {
                preserved.insert(param);
                body_env.bind(BindingKey::name(param), Expr::Ident(param.clone()));
            }
            rewrite_block(body, &mut body_env, preserved, false);
            Disposition::Keep
        }
        StmtKind::Assign { target, value } => {
            let folded = fold_expr(value, env);
            let key = match target {
                AssignTarget::Name(name) => BindingKey::name(name),
                AssignTarget::Element { object, index } => BindingKey::element(object, index),
            };
            env.bind(key, folded.clone());
            if preserved.contains(target.name()) {
                // Observable reassignment: the statement stays, with its
                // right-hand side folded so no deleted local leaks into it.
                *value = folded;
                Disposition::Keep
            } else {
                Disposition::Drop
            }
        }
        StmtKind::Expr(expr) => {
            *expr = fold_expr(expr, env);
            Disposition::Keep
        }
        StmtKind::If {
            test,
            consequent,
            alternate,
        } => {
            *test = fold_expr(test, env);
            rewrite_block(consequent, &mut env.child(), preserved, global);
            if let Some(alternate) = alternate {
                rewrite_block(alternate, &mut env.child(), preserved, global);
            }
            Disposition::Keep
        }
        StmtKind::While { test, body } => {
            // One representative rewrite of the body; iteration count is
            // not modeled.
            *test = fold_expr(test, env);
            rewrite_block(body, &mut env.child(), preserved, global);
            Disposition::Keep
        }
        StmtKind::Return { argument } => {
            if let Some(argument) = argument {
                *argument = fold_expr(argument, env);
            }
            Disposition::Keep
        }
    }
}

/// Replace every resolvable read in `expr` with its bound expression.
/// Purely functional over the environment; performs no arithmetic.
pub fn fold_expr(expr: &Expr, env: &SymbolicEnv) -> Expr {
    match expr {
        Expr::Literal(_) => expr.clone(),
        Expr::Ident(name) => match env.lookup(&BindingKey::name(name)) {
            Some(bound) => bound.clone(),
            None => expr.clone(),
        },
        Expr::Binary { op, left, right } => Expr::Binary {
            op: *op,
            left: Box::new(fold_expr(left, env)),
            right: Box::new(fold_expr(right, env)),
        },
        Expr::Logical { op, left, right } => Expr::Logical {
            op: *op,
            left: Box::new(fold_expr(left, env)),
            right: Box::new(fold_expr(right, env)),
        },
        Expr::Member { object, index } => {
            let index = fold_expr(index, env);
            if let (Expr::Ident(name), Expr::Literal(lit)) = (object.as_ref(), &index) {
                // A previously written element wins over the array it was
                // written into.
                if let Some(bound) = env.lookup(&BindingKey::element(name, lit)) {
                    return bound.clone();
                }
            }
            Expr::Member {
                object: Box::new(fold_expr(object, env)),
                index: Box::new(index),
            }
        }
        Expr::Array(elements) => {
            Expr::Array(elements.iter().map(|e| fold_expr(e, env)).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::printer::render;

    fn run(source: &str) -> String {
        let mut program = parse(source).unwrap();
        substitute(&mut program);
        render(&program)
    }

    /// Unused locals fold away entirely, leaving an empty body.
    #[test]
    fn locals_eliminated() {
        let out = run("function foo(x, y, z) { let a = x + 1; let b = a + y; let c = 0; }");
        assert_eq!(out, "function foo(x, y, z) {\n}");
    }

    /// Chained local definitions inline into the test and return value.
    #[test]
    fn chained_definitions_inline() {
        let source = concat!(
            "function foo(x, y, z) {\n",
            "    let a = x + 1;\n",
            "    let b = a + y;\n",
            "    let c = 0;\n",
            "    if (b < z) {\n",
            "        c = c + 5;\n",
            "        return x + y + z + c;\n",
            "    }\n",
            "}",
        );
        let expected = concat!(
            "function foo(x, y, z) {\n",
            "    if (x + 1 + y < z) {\n",
            "        return x + y + z + (0 + 5);\n",
            "    }\n",
            "}",
        );
        assert_eq!(run(source), expected);
    }

    /// An element write takes precedence over the original array literal.
    #[test]
    fn element_write_overrides_array() {
        let source = concat!(
            "function foo(z) {\n",
            "    let a = [1, 2, 3];\n",
            "    a[0] = 5;\n",
            "    if (a[0] < z) {\n",
            "        return z;\n",
            "    }\n",
            "}",
        );
        let expected = concat!(
            "function foo(z) {\n",
            "    if (5 < z) {\n",
            "        return z;\n",
            "    }\n",
            "}",
        );
        assert_eq!(run(source), expected);
    }

    /// An unwritten element of a local array reads through to the literal.
    #[test]
    fn unwritten_element_folds_to_member_of_literal() {
        let source = "function foo(z) { let a = [1, 2, 3]; return a[1]; }";
        let expected = concat!("function foo(z) {\n", "    return [1,2,3][1];\n", "}");
        assert_eq!(run(source), expected);
    }

    /// Globals are referenced by name, never inlined, and their
    /// declarations survive.
    #[test]
    fn globals_preserved_by_name() {
        let source = concat!(
            "let w = 1;\n",
            "function foo(x, y, z) {\n",
            "    let a = w;\n",
            "    if (a < z) {\n",
            "        return w;\n",
            "    }\n",
            "}",
        );
        let expected = concat!(
            "let w = 1;\n",
            "function foo(x, y, z) {\n",
            "    if (w < z) {\n",
            "        return w;\n",
            "    }\n",
            "}",
        );
        assert_eq!(run(source), expected);
    }

    /// A parameter reassignment stays in the output with a folded
    /// right-hand side, and later reads see the new binding.
    #[test]
    fn parameter_reassignment_is_authoritative() {
        let source = "function foo(x) { x = x + 1; return x; }";
        let expected = concat!(
            "function foo(x) {\n",
            "    x = x + 1;\n",
            "    return x + 1;\n",
            "}",
        );
        assert_eq!(run(source), expected);
    }

    /// Rebindings inside a while body do not leak past the loop.
    #[test]
    fn while_body_scope_is_isolated() {
        let source = concat!(
            "function foo(x, z) {\n",
            "    while (x < z) {\n",
            "        z = z * 2;\n",
            "    }\n",
            "    return z;\n",
            "}",
        );
        let expected = concat!(
            "function foo(x, z) {\n",
            "    while (x < z) {\n",
            "        z = z * 2;\n",
            "    }\n",
            "    return z;\n",
            "}",
        );
        assert_eq!(run(source), expected);
    }

    /// Rebindings inside an if branch do not leak past the branch.
    #[test]
    fn branch_scope_is_isolated() {
        let source = concat!(
            "function foo(x) {\n",
            "    let a = 1;\n",
            "    if (x < 2) {\n",
            "        a = 7;\n",
            "        return a;\n",
            "    }\n",
            "    return a;\n",
            "}",
        );
        let expected = concat!(
            "function foo(x) {\n",
            "    if (x < 2) {\n",
            "        return 7;\n",
            "    }\n",
            "    return 1;\n",
            "}",
        );
        assert_eq!(run(source), expected);
    }

    /// Folding an expression with no resolvable reads returns it unchanged.
    #[test]
    fn folding_is_idempotent_on_folded_input() {
        let env = SymbolicEnv::new();
        let program = parse("x + 1 + y < z;").unwrap();
        let StmtKind::Expr(expr) = &program.body[0].kind else {
            panic!("expected expression statement");
        };
        assert_eq!(fold_expr(expr, &env), *expr);
        let once = fold_expr(expr, &env);
        assert_eq!(fold_expr(&once, &env), once);
    }

    /// After substitution no local declaration or local assignment remains.
    #[test]
    fn deletion_invariant() {
        let source = concat!(
            "function foo(x) {\n",
            "    let a = 1, b;\n",
            "    b = a + x;\n",
            "    if (x < a) {\n",
            "        let c = b;\n",
            "        a = c;\n",
            "    }\n",
            "    return b;\n",
            "}",
        );
        let mut program = parse(source).unwrap();
        substitute(&mut program);
        let StmtKind::FunctionDecl { body, .. } = &program.body[0].kind else {
            panic!("expected function");
        };
        assert_no_local_artifacts(body);
    }

    fn assert_no_local_artifacts(stmts: &[Stmt]) {
        for stmt in stmts {
            match &stmt.kind {
                StmtKind::VarDecl { .. } => panic!("local declaration survived"),
                StmtKind::Assign { target, .. } => {
                    panic!("assignment to local `{}` survived", target.name())
                }
                StmtKind::If {
                    consequent,
                    alternate,
                    ..
                } => {
                    assert_no_local_artifacts(consequent);
                    if let Some(alternate) = alternate {
                        assert_no_local_artifacts(alternate);
                    }
                }
                StmtKind::While { body, .. } => assert_no_local_artifacts(body),
                _ => {}
            }
        }
    }
}
