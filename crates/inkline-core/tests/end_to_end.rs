//! Full-pipeline tests: parse, substitute, render, re-parse, classify.

use inkline_core::{analyze, substitute_source, CoreError};

/// All locals eliminated leaves an empty function body.
#[test]
fn unused_locals_leave_empty_body() {
    let out =
        substitute_source("function foo(x,y,z){ let a=x+1; let b=a+y; let c=0; }").unwrap();
    assert_eq!(out, "function foo(x, y, z) {\n}");
}

/// Chained locals inline into the test and the return expression, with
/// grouping parentheses preserved.
#[test]
fn chained_locals_inline_with_grouping() {
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
    assert_eq!(substitute_source(source).unwrap(), expected);
}

/// The worked classification example: params 1,2,3 make `x + 1 + y < z`
/// evaluate 4 < 3, so the if line is a false line.
#[test]
fn concrete_params_classify_false() {
    let source = concat!(
        "function foo(x, y, z) {\n",
        "    if (x + 1 + y < z) {\n",
        "        return 1;\n",
        "    }\n",
        "}",
    );
    let analysis = analyze(source, "1,2,3").unwrap();
    assert_eq!(analysis.classification.true_lines, Vec::<usize>::new());
    assert_eq!(analysis.classification.false_lines, vec![2]);
}

/// An element write beats the array literal it was written into, and the
/// substituted test classifies against the written value.
#[test]
fn element_write_flows_through_pipeline() {
    let source = concat!(
        "function foo(z) {\n",
        "    let a = [1, 2, 3];\n",
        "    a[0] = 5;\n",
        "    if (a[0] < z) {\n",
        "        return z;\n",
        "    }\n",
        "}",
    );
    let analysis = analyze(source, "10").unwrap();
    let expected = concat!(
        "function foo(z) {\n",
        "    if (5 < z) {\n",
        "        return z;\n",
        "    }\n",
        "}",
    );
    assert_eq!(analysis.rendered, expected);
    assert_eq!(analysis.classification.true_lines, vec![2]);
}

/// Globals survive substitution by name and bind concretely for
/// classification.
#[test]
fn globals_survive_and_classify() {
    let source = concat!(
        "let w = 1;\n",
        "function foo(x, y, z) {\n",
        "    let a = w;\n",
        "    if (a < z) {\n",
        "        return w;\n",
        "    }\n",
        "}",
    );
    let analysis = analyze(source, "1,2,3").unwrap();
    let expected = concat!(
        "let w = 1;\n",
        "function foo(x, y, z) {\n",
        "    if (w < z) {\n",
        "        return w;\n",
        "    }\n",
        "}",
    );
    assert_eq!(analysis.rendered, expected);
    assert_eq!(analysis.classification.true_lines, vec![3]);
}

/// Array and quoted-string parameters tokenize as single values with their
/// internal commas intact.
#[test]
fn array_and_string_parameters() {
    let source = concat!(
        "function foo(a, x, s) {\n",
        "    if (a[1] < x) {\n",
        "        return 1;\n",
        "    } else if (s == 'hello, world!') {\n",
        "        return 2;\n",
        "    }\n",
        "}",
    );
    let analysis = analyze(source, "[1,2],2,'hello, world!'").unwrap();
    assert_eq!(analysis.classification.false_lines, vec![2]);
    assert_eq!(analysis.classification.true_lines, vec![4]);
}

/// Every if/else-if line lands in exactly one classification list.
#[test]
fn classification_is_exclusive_and_total() {
    let source = concat!(
        "function foo(x) {\n",
        "    if (x < 0) {\n",
        "        return 0;\n",
        "    } else if (x < 10) {\n",
        "        if (x < 5) {\n",
        "            return 1;\n",
        "        }\n",
        "    } else {\n",
        "        return 2;\n",
        "    }\n",
        "}",
    );
    let analysis = analyze(source, "7").unwrap();
    let classified: Vec<usize> = analysis
        .classification
        .true_lines
        .iter()
        .chain(&analysis.classification.false_lines)
        .copied()
        .collect();
    let test_lines: Vec<usize> = analysis
        .rendered
        .lines()
        .enumerate()
        .filter(|(_, line)| line.trim_start().starts_with("if (") || line.contains("} else if ("))
        .map(|(i, _)| i + 1)
        .collect();
    for line in &test_lines {
        let in_true = analysis.classification.true_lines.contains(line);
        let in_false = analysis.classification.false_lines.contains(line);
        assert!(in_true != in_false, "line {line} must be in exactly one list");
    }
    assert_eq!(classified.len(), test_lines.len());
}

/// The rendered output re-parses and re-renders to itself.
#[test]
fn rendered_output_is_a_fixpoint() {
    let source = concat!(
        "let w = 1;\n",
        "function foo(x, z) {\n",
        "    let a = [1, 2, 3];\n",
        "    while (x < z) {\n",
        "        z = z * 2;\n",
        "    }\n",
        "    if (a[0] < w) {\n",
        "        return z;\n",
        "    }\n",
        "}",
    );
    let rendered = substitute_source(source).unwrap();
    let reparsed = inkline_core::parser::parse(&rendered).unwrap();
    assert_eq!(inkline_core::printer::render(&reparsed), rendered);
}

/// Unsupported constructs are rejected up front.
#[test]
fn unsupported_constructs_rejected() {
    let err = substitute_source("for (;;) {}").unwrap_err();
    assert!(matches!(err, CoreError::Unsupported { line: 1, .. }));
    let err = substitute_source("function foo(x) { return bar(x); }").unwrap_err();
    assert!(matches!(err, CoreError::Unsupported { .. }));
}

/// A malformed parameter string fails before any tree walk.
#[test]
fn malformed_params_fail_first() {
    let err = analyze("function foo(x) { return x; }", "[1,2").unwrap_err();
    assert!(matches!(err, CoreError::Params(_)));
}

/// Too few arguments surface as an unbound identifier during evaluation.
#[test]
fn missing_argument_is_unbound() {
    let source = "function foo(x, y) { if (x < y) { return 1; } }";
    let err = analyze(source, "1").unwrap_err();
    assert!(matches!(err, CoreError::UnboundIdentifier(name) if name == "y"));
}
