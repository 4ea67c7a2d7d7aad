//! Tree-to-text printer.
//!
//! Emits the formatting contract the rest of the pipeline depends on:
//! 4-space indentation, `} else if (…) {` chains, precedence-based
//! parenthesization, and array literals broken across lines with one element
//! per line. [`render`] runs the printer and then [`rejoin_wrapped_arrays`],
//! the textual post-step that folds those wrapped literals back onto a
//! single line — the rendered text is what callers display and what the
//! branch classifier re-parses, so its line numbering is the one that
//! matters.

use std::fmt::Write;

use crate::ast::{AssignTarget, Expr, Program, Stmt, StmtKind};

/// Print a program and rejoin wrapped array literals. No trailing newline.
pub fn render(program: &Program) -> String {
    rejoin_wrapped_arrays(&print(program))
}

/// Print a program without the post-step (array literals stay multi-line).
pub fn print(program: &Program) -> String {
    let mut out = String::new();
    print_stmts(&program.body, &mut out, "");
    out
}

/// Rejoin any line ending in `[` with the following lines until a `]`
/// appears, dropping the wrapped lines' leading whitespace. Turns
///
/// ```text
/// if ([
///     1,
///     2
/// ][0] < z) {
/// ```
///
/// into `if ([1,2][0] < z) {`.
pub fn rejoin_wrapped_arrays(text: &str) -> String {
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
    let mut i = 0;
    while i < lines.len() {
        if lines[i].ends_with('[') {
            while !lines[i].contains(']') && i + 1 < lines.len() {
                let next = lines.remove(i + 1);
                lines[i].push_str(next.trim());
            }
        }
        i += 1;
    }
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

fn print_stmts(stmts: &[Stmt], out: &mut String, indent: &str) {
    for stmt in stmts {
        print_stmt(stmt, out, indent);
    }
}

fn print_stmt(stmt: &Stmt, out: &mut String, indent: &str) {
    match &stmt.kind {
        StmtKind::VarDecl { decls } => {
            let rendered: Vec<String> = decls
                .iter()
                .map(|d| match &d.init {
                    Some(init) => format!("{} = {}", d.name, print_expr(init, indent)),
                    None => d.name.clone(),
                })
                .collect();
            let _ = writeln!(out, "{indent}let {};", rendered.join(", "));
        }
        StmtKind::FunctionDecl { name, params, body } => {
            let _ = writeln!(out, "{indent}function {name}({}) {{", params.join(", "));
            print_stmts(body, out, &child_indent(indent));
            let _ = writeln!(out, "{indent}}}");
        }
        StmtKind::Assign { target, value } => {
            let target = match target {
                AssignTarget::Name(name) => name.clone(),
                AssignTarget::Element { object, index } => format!("{object}[{}]", index.raw()),
            };
            let _ = writeln!(out, "{indent}{target} = {};", print_expr(value, indent));
        }
        StmtKind::Expr(expr) => {
            let _ = writeln!(out, "{indent}{};", print_expr(expr, indent));
        }
        StmtKind::If {
            test,
            consequent,
            alternate,
        } => {
            let _ = write!(out, "{indent}if (");
            print_if_chain(test, consequent, alternate.as_deref(), out, indent);
        }
        StmtKind::While { test, body } => {
            let _ = writeln!(out, "{indent}while ({}) {{", print_expr(test, indent));
            print_stmts(body, out, &child_indent(indent));
            let _ = writeln!(out, "{indent}}}");
        }
        StmtKind::Return { argument } => match argument {
            Some(arg) => {
                let _ = writeln!(out, "{indent}return {};", print_expr(arg, indent));
            }
            None => {
                let _ = writeln!(out, "{indent}return;");
            }
        },
    }
}

/// Print the rest of an `if` header plus its branches. The caller has
/// already written `if (` (or `} else if (`).
fn print_if_chain(
    test: &Expr,
    consequent: &[Stmt],
    alternate: Option<&[Stmt]>,
    out: &mut String,
    indent: &str,
) {
    let _ = writeln!(out, "{}) {{", print_expr(test, indent));
    print_stmts(consequent, out, &child_indent(indent));
    match alternate {
        None => {
            let _ = writeln!(out, "{indent}}}");
        }
        Some(
            [Stmt {
                kind:
                    StmtKind::If {
                        test,
                        consequent,
                        alternate,
                    },
                ..
            }],
        ) => {
            let _ = write!(out, "{indent}}} else if (");
            print_if_chain(test, consequent, alternate.as_deref(), out, indent);
        }
        Some(stmts) => {
            let _ = writeln!(out, "{indent}}} else {{");
            print_stmts(stmts, out, &child_indent(indent));
            let _ = writeln!(out, "{indent}}}");
        }
    }
}

fn child_indent(indent: &str) -> String {
    format!("{indent}    ")
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

/// Binding strength for parenthesization, low to high. Atoms are tightest.
fn prec(expr: &Expr) -> u8 {
    match expr {
        Expr::Logical { op, .. } => match op {
            crate::ast::LogicalOp::Or => 1,
            crate::ast::LogicalOp::And => 2,
        },
        Expr::Binary { op, .. } => {
            use crate::ast::BinOp::*;
            match op {
                Eq | Ne | StrictEq | StrictNe => 3,
                Lt | Le | Gt | Ge => 4,
                Add | Sub => 5,
                Mul | Div | Rem => 6,
            }
        }
        Expr::Literal(_) | Expr::Ident(_) | Expr::Member { .. } | Expr::Array(_) => 7,
    }
}

fn print_expr(expr: &Expr, indent: &str) -> String {
    match expr {
        Expr::Literal(lit) => lit.raw(),
        Expr::Ident(name) => name.clone(),
        Expr::Binary { op, left, right } => format!(
            "{} {} {}",
            print_operand(left, prec(expr), false, indent),
            op.symbol(),
            print_operand(right, prec(expr), true, indent),
        ),
        Expr::Logical { op, left, right } => format!(
            "{} {} {}",
            print_operand(left, prec(expr), false, indent),
            op.symbol(),
            print_operand(right, prec(expr), true, indent),
        ),
        Expr::Member { object, index } => {
            let obj = print_operand(object, 7, false, indent);
            format!("{obj}[{}]", print_expr(index, indent))
        }
        Expr::Array(elements) => {
            if elements.is_empty() {
                return "[]".to_string();
            }
            let inner = child_indent(indent);
            let mut out = String::from("[");
            for (i, element) in elements.iter().enumerate() {
                let sep = if i + 1 < elements.len() { "," } else { "" };
                let _ = write!(out, "\n{inner}{}{sep}", print_expr(element, &inner));
            }
            let _ = write!(out, "\n{indent}]");
            out
        }
    }
}

/// Print a child operand, parenthesizing when its binding is looser than
/// the parent's — or equal, on the right of a left-associative operator
/// (`x + (0 + 5)` must not flatten to `x + 0 + 5`).
fn print_operand(child: &Expr, parent_prec: u8, is_right: bool, indent: &str) -> String {
    let s = print_expr(child, indent);
    let child_prec = prec(child);
    if child_prec < parent_prec || (child_prec == parent_prec && is_right) {
        format!("({s})")
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn round_trip(source: &str) -> String {
        render(&parse(source).unwrap())
    }

    /// Statements re-print with the canonical spacing and indentation.
    #[test]
    fn canonical_formatting() {
        let out = round_trip("function foo(x,y){let a=1;if(x<y){return a;}}");
        let expected = concat!(
            "function foo(x, y) {\n",
            "    let a = 1;\n",
            "    if (x < y) {\n",
            "        return a;\n",
            "    }\n",
            "}",
        );
        assert_eq!(out, expected);
    }

    /// Right-nested additions keep their grouping parentheses.
    #[test]
    fn right_operand_parenthesized() {
        assert_eq!(round_trip("x + y + (0 + 5);"), "x + y + (0 + 5);");
    }

    /// Lower-precedence children are parenthesized under tighter parents.
    #[test]
    fn precedence_parentheses() {
        assert_eq!(round_trip("(x + 1) * 2;"), "(x + 1) * 2;");
        assert_eq!(round_trip("x + 1 < y * 2;"), "x + 1 < y * 2;");
    }

    /// An `else if` chain prints as a chain, not nested blocks.
    #[test]
    fn else_if_chain() {
        let out = round_trip("if (a < b) { x = a; } else if (a > b) { x = b; } else { x = 0; }");
        let expected = concat!(
            "if (a < b) {\n",
            "    x = a;\n",
            "} else if (a > b) {\n",
            "    x = b;\n",
            "} else {\n",
            "    x = 0;\n",
            "}",
        );
        assert_eq!(out, expected);
    }

    /// Array literals print multi-line and rejoin to the spaceless form.
    #[test]
    fn array_literal_rejoined() {
        assert_eq!(round_trip("let a = [1, 2, 3];"), "let a = [1,2,3];");
    }

    /// An array used inside a condition rejoins onto the `if` line.
    #[test]
    fn array_in_condition_rejoined() {
        let out = round_trip("if ([1, 2, 3][0] < z) { y = z; }");
        let expected = concat!("if ([1,2,3][0] < z) {\n", "    y = z;\n", "}");
        assert_eq!(out, expected);
    }

    /// The rejoin step leaves text without wrapped arrays untouched.
    #[test]
    fn rejoin_is_identity_without_brackets() {
        let text = "function foo(x) {\n    return x;\n}";
        assert_eq!(rejoin_wrapped_arrays(text), text);
    }

    /// The rejoin step glues an externally wrapped literal back together.
    #[test]
    fn rejoin_external_text() {
        let text = "let a = [\n    1,\n    2\n];";
        assert_eq!(rejoin_wrapped_arrays(text), "let a = [1,2];");
    }

    /// Empty array, bare return, and uninitialized declarations print.
    #[test]
    fn degenerate_forms() {
        assert_eq!(round_trip("let a = [], b;"), "let a = [], b;");
        assert_eq!(round_trip("return;"), "return;");
    }
}
