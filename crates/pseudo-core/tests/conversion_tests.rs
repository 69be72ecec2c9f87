/*!
# Conversion Integration Tests

End-to-end behaviour of the three strategies over both notations.
*/

use pretty_assertions::assert_eq;
use pseudo_core::{
    convert, convert_with_steps, validate_syntax, ConversionMethod, ConversionOptions,
    ConversionResult, Severity, MAX_INDENT_SIZE,
};

fn convert_as(text: &str, method: ConversionMethod) -> ConversionResult {
    convert(
        text,
        &ConversionOptions {
            method,
            ..Default::default()
        },
    )
}

const METHODS: [ConversionMethod; 3] = [
    ConversionMethod::Pattern,
    ConversionMethod::Tree,
    ConversionMethod::Hybrid,
];

#[test]
fn test_integer_declaration_in_every_method() {
    for method in METHODS {
        let result = convert_as("integer: count", method);
        assert!(result.success, "{method}");
        assert_eq!(result.code, "count = 0", "{method}");
        assert_eq!(result.metadata.method, method);
    }
}

#[test]
fn test_if_header() {
    let result = convert_as("if x > 0 then", ConversionMethod::Pattern);
    assert_eq!(result.code, "if x > 0:");

    let result = convert_as("if x > 0 then", ConversionMethod::Tree);
    assert_eq!(result.code, "if x > 0:");
    assert!(result.success);
}

#[test]
fn test_counted_loop_numeric_bounds() {
    let pattern = convert_as("i from 0 to 9 step 1", ConversionMethod::Pattern);
    assert_eq!(pattern.code, "for i in range(0, 10, 1):");

    let tree = convert_as("i from 0 to 9 step 1", ConversionMethod::Tree);
    assert_eq!(tree.code, "for i in range(0, 10):");

    let japanese = convert_as("i を 0 から 9 まで 1 ずつ増やす", ConversionMethod::Pattern);
    assert_eq!(japanese.code, "for i in range(0, 10, 1):");
}

#[test]
fn test_counted_loop_expression_bound_is_unchanged() {
    let source = "for i from 0 to n-1 step 1";
    assert_eq!(
        convert_as(source, ConversionMethod::Pattern).code,
        "for i in range(0, n-1, 1):"
    );
    assert_eq!(
        convert_as(source, ConversionMethod::Tree).code,
        "for i in range(0, n-1):"
    );
    assert_eq!(
        convert_as("for i from 1 to n step 2", ConversionMethod::Tree).code,
        "for i in range(1, n, 2):"
    );
}

#[test]
fn test_procedure_header_without_parentheses() {
    let source = "procedure sort\nreturn 0";

    let issues = validate_syntax(source);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].line, 1);
    assert_eq!(issues[0].severity, Severity::Error);

    let result = convert_as(source, ConversionMethod::Tree);
    assert!(!result.success);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].line, 1);
    assert_eq!(result.code, "return 0");
}

#[test]
fn test_declarations() {
    let source = "string: name\narray: A(5)\narray: B(integer, 3)";
    let expected = "name = \"\"\nA = [0] * 5\nB = [0] * 3";

    assert_eq!(convert_as(source, ConversionMethod::Pattern).code, expected);
    assert_eq!(convert_as(source, ConversionMethod::Tree).code, expected);
}

#[test]
fn test_integer_list_declaration() {
    // The rule set expands the list; the tree keeps only the first name
    let source = "整数:i, j, temp";
    assert_eq!(
        convert_as(source, ConversionMethod::Pattern).code,
        "i = 0\nj = 0\ntemp = 0"
    );
    assert_eq!(convert_as(source, ConversionMethod::Tree).code, "i = 0");
}

#[test]
fn test_operator_glyphs_translate() {
    let source = "a ← x ≠ y\nb ← x ≤ y\nc ← x ≥ y";
    let expected = "a = x != y\nb = x <= y\nc = x >= y";

    assert_eq!(convert_as(source, ConversionMethod::Pattern).code, expected);
    assert_eq!(convert_as(source, ConversionMethod::Tree).code, expected);
}

#[test]
fn test_pattern_reindents_blocks() {
    let source = "\
もし x ≠ 0 ならば
  y ← 1
そうでなければ
  y ← 2";

    let result = convert_as(source, ConversionMethod::Pattern);
    assert_eq!(result.code, "if x != 0:\n    y = 1\nelse:\n    y = 2");
    assert!(result.warnings.is_empty());
}

#[test]
fn test_oversized_indent_is_clamped() {
    let source = "if x > 0 then\ny ← 1";
    let expected = format!("if x > 0:\n{}y = 1", " ".repeat(MAX_INDENT_SIZE));

    let result = convert(
        source,
        &ConversionOptions {
            method: ConversionMethod::Pattern,
            indent_size: usize::MAX,
            ..Default::default()
        },
    );
    assert!(result.success);
    assert_eq!(result.code, expected);
}

#[test]
fn test_procedure_parameters_keep_their_names() {
    let source = "procedure f(integer: n, m)\nreturn n + m";
    assert_eq!(
        convert_as(source, ConversionMethod::Pattern).code,
        "def f(n, m):\n    return n + m"
    );
    assert_eq!(
        convert_as(source, ConversionMethod::Tree).code,
        "def f(n, m):\n    pass\nreturn n + m"
    );
}

#[test]
fn test_hybrid_errors_concatenate_phases() {
    let sources = [
        "integer: x\nx ← 1",
        "procedure sort\nreturn 0",
        "もし x > 0\nx ← 1",
        "i from 0 to 9\nprocedure",
        "",
    ];

    for source in sources {
        let pattern = convert_as(source, ConversionMethod::Pattern);
        let tree = convert_as(&pattern.code, ConversionMethod::Tree);
        let hybrid = convert_as(source, ConversionMethod::Hybrid);

        let mut expected = pattern.errors.clone();
        expected.extend(tree.errors.clone());
        assert_eq!(hybrid.errors, expected, "{source:?}");
        assert_eq!(hybrid.success, expected.is_empty());
        assert_eq!(hybrid.code, tree.code);
    }
}

#[test]
fn test_conversion_is_total() {
    let inputs = [
        "",
        "   \n\t\n",
        "←",
        "procedure",
        "もし",
        "x ← 99999999999999999999",
        "array: A(99999999999999999999999)",
        "))((][",
        "整数型：",
        "🦀 ← 🦀",
    ];
    let long_chain = format!("x ← {}", vec!["a"; 100_000].join("+"));
    let long_condition = format!("if {} > 0 then", vec!["b"; 100_000].join(" * "));

    for input in inputs.into_iter().chain([long_chain.as_str(), long_condition.as_str()]) {
        for method in METHODS {
            let result = convert_as(input, method);
            if !result.success {
                assert!(!result.errors.is_empty(), "{input:?} {method}");
            }
        }
    }
}

#[test]
fn test_overlong_expression_line_is_skipped() {
    let source = format!("integer: y\ny ← {}\nreturn y", vec!["1"; 5_000].join("+"));

    let result = convert_as(&source, ConversionMethod::Tree);
    assert!(result.success);
    assert_eq!(result.code, "y = 0\nreturn y");
}

#[test]
fn test_pattern_reports_no_complexity() {
    let source = "procedure f(a)\nif a > 0 then";

    let pattern = convert_as(source, ConversionMethod::Pattern);
    assert_eq!(pattern.metadata.complexity_score, 0);
    assert!(pattern.metadata.ast.is_none());

    let tree = convert_as(source, ConversionMethod::Tree);
    assert_eq!(tree.metadata.complexity_score, 3);
    assert!(tree.metadata.ast.is_some());
}

#[test]
fn test_steps_are_numbered_from_one() {
    let result = convert_with_steps(
        "integer: x\nx ← x + 1\nwhile x ≤ 3 do",
        &ConversionOptions {
            method: ConversionMethod::Pattern,
            ..Default::default()
        },
    );

    let numbers: Vec<usize> = result.steps.iter().map(|s| s.step_number).collect();
    assert_eq!(numbers, (1..=result.steps.len()).collect::<Vec<_>>());
    assert_eq!(result.steps.len(), result.metadata.rules_applied);
    for pair in result.steps.windows(2) {
        assert_eq!(pair[0].output_text, pair[1].input_text);
    }
}

#[test]
fn test_result_serializes() -> anyhow::Result<()> {
    let result = convert_as("integer: x", ConversionMethod::Tree);
    let json = serde_json::to_value(&result)?;

    assert_eq!(json["success"], true);
    assert_eq!(json["code"], "x = 0");
    assert_eq!(json["metadata"]["method"], "tree");
    assert_eq!(json["metadata"]["ast"]["body"][0]["type"], "VariableDeclaration");
    Ok(())
}

#[test]
fn test_concurrent_conversions_are_independent() {
    let handles: Vec<_> = (0..8)
        .map(|n| {
            std::thread::spawn(move || {
                let source = format!("integer: v{n}\nfor i from 0 to {n} step 1");
                convert_as(&source, ConversionMethod::Tree).code
            })
        })
        .collect();

    for (n, handle) in handles.into_iter().enumerate() {
        let code = handle.join().expect("conversion thread panicked");
        assert_eq!(code, format!("v{n} = 0\nfor i in range(0, {}):", n + 1));
    }
}
