//! Integration tests for program execution
//!
//! Whole programs run through the embedding API, checking printed output,
//! termination behaviour and the fatal error contract.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use stax_runtime::{ErrorKind, Stax, Termination, Value};

// ============================================================================
// Reference scenarios
// ============================================================================

#[test]
fn test_hello_world() {
    assert_output(&["PUSH_STR Hello World!", "OUTPUT"], "Hello World!\n");
}

#[test]
fn test_add_and_output() {
    assert_output(&["PUSH_NUM 5", "PUSH_NUM 3", "ADD", "OUTPUT"], "8\n");
}

#[test]
fn test_division_by_zero_transcript() {
    let execution = assert_fatal(
        &["PUSH_NUM 10", "PUSH_NUM 0", "DIV"],
        "Division by zero",
        3,
    );
    assert_eq!(execution.stdout, "");
    insta::assert_snapshot!(execution.transcript().trim(), @"Division by zero at line 3");
    assert_eq!(execution.transcript(), "\nDivision by zero at line 3\n");
}

#[test]
fn test_repeat_with_text_count() {
    assert_output(&["PUSH_STR 3", "PUSH_STR ab", "REPEAT"], "ababab\n");
}

#[test]
fn test_halt_alone_prints_nothing() {
    let execution = run(&["HALT"]);
    assert_eq!(execution.outcome, Ok(Termination::Halted { line: 1 }));
    assert_eq!(execution.stdout, "");
}

// ============================================================================
// Termination
// ============================================================================

#[test]
fn test_halt_skips_remaining_lines() {
    let execution = run(&["PUSH_STR before", "OUTPUT", "HALT", "PUSH_STR after", "OUTPUT"]);
    assert_eq!(execution.stdout, "before");
}

#[test]
fn test_blank_lines_are_ignored() {
    assert_output(&["", "  PUSH_NUM 2  ", "\t", "OUTPUT", ""], "2\n");
}

#[test]
fn test_only_blank_lines() {
    assert_output(&["", "   ", ""], "\n");
}

#[test]
fn test_trim_keeps_non_ascii_whitespace() {
    assert_output(&["PUSH_STR ab\u{00A0}", "OUTPUT"], "ab\u{00A0}\n");
}

#[test]
fn test_trim_strips_control_characters() {
    assert_output(&["\x01PUSH_NUM 4\x02", "\x03OUTPUT"], "4\n");
}

#[test]
fn test_crlf_source() {
    let execution = Stax::new().eval("PUSH_NUM 4\r\nPUSH_NUM 5\r\nMUL\r\nOUTPUT\r\n");
    assert_eq!(execution.stdout, "20\n");
}

// ============================================================================
// Arithmetic
// ============================================================================

#[rstest]
#[case("ADD", 17, 5, "22")]
#[case("SUBTRACT", 17, 5, "12")]
#[case("MUL", 17, 5, "85")]
#[case("DIV", 17, 5, "3")]
#[case("DIV", -17, 5, "-3")]
#[case("DIV", 17, -5, "-3")]
#[case("SUBTRACT", 5, 17, "-12")]
fn test_binary_arithmetic(
    #[case] opcode: &str,
    #[case] a: i32,
    #[case] b: i32,
    #[case] expected: &str,
) {
    let push_a = format!("PUSH_NUM {}", a);
    let push_b = format!("PUSH_NUM {}", b);
    assert_output(
        &[push_a.as_str(), push_b.as_str(), opcode, "OUTPUT"],
        &format!("{}\n", expected),
    );
}

#[test]
fn test_nested_expression() {
    // (2 + 3) * (10 - 4) / 3
    assert_output(
        &[
            "PUSH_NUM 2",
            "PUSH_NUM 3",
            "ADD",
            "PUSH_NUM 10",
            "PUSH_NUM 4",
            "SUBTRACT",
            "MUL",
            "PUSH_NUM 3",
            "DIV",
            "OUTPUT",
        ],
        "10\n",
    );
}

#[test]
fn test_increment_counter_in_variable() {
    assert_output(
        &[
            "PUSH_NUM 0",
            "SET_VAR i",
            "GET_VAR i",
            "INCREMENT",
            "SET_VAR i",
            "GET_VAR i",
            "INCREMENT",
            "SET_VAR i",
            "GET_VAR i",
            "OUTPUT",
        ],
        "2\n",
    );
}

#[test]
fn test_numeric_text_in_arithmetic() {
    assert_output(&["PUSH_STR 40", "PUSH_NUM 2", "ADD", "OUTPUT"], "42\n");
}

// ============================================================================
// Text
// ============================================================================

#[test]
fn test_combine_is_order_sensitive() {
    assert_output(
        &["PUSH_STR abc", "PUSH_STR def", "COMBINE", "OUTPUT"],
        "abcdef\n",
    );
}

#[test]
fn test_reverse_then_output() {
    assert_output(&["PUSH_STR stressed", "REVERSE", "OUTPUT"], "desserts\n");
}

#[test]
fn test_repeat_integer_item() {
    assert_output(&["PUSH_NUM 2", "PUSH_NUM 10", "REPEAT"], "1010\n");
}

#[test]
fn test_repeat_zero_then_continue() {
    assert_output(
        &["PUSH_NUM 0", "PUSH_STR x", "REPEAT", "PUSH_STR ok", "OUTPUT"],
        "ok\n",
    );
}

// ============================================================================
// Variables
// ============================================================================

#[rstest]
#[case("PUSH_NUM -15", Value::Integer(-15))]
#[case("PUSH_STR some text", Value::text("some text"))]
#[case("PUSH_STR 99", Value::text("99"))]
fn test_variable_roundtrip(#[case] push: &str, #[case] expected: Value) {
    let execution = run(&[push, "SET_VAR v", "GET_VAR v", "OUTPUT"]);
    assert_eq!(execution.stdout, format!("{}\n", expected));
}

#[test]
fn test_variable_reassignment() {
    assert_output(
        &[
            "PUSH_NUM 1",
            "SET_VAR x",
            "PUSH_STR one",
            "SET_VAR x",
            "GET_VAR x",
            "OUTPUT",
        ],
        "one\n",
    );
}

// ============================================================================
// Input
// ============================================================================

#[test]
fn test_greeting_from_input() {
    let execution = run_with_input(
        &[
            "PUSH_STR Hello, ",
            "ACQUIRE_INPUT",
            "COMBINE",
            "OUTPUT",
        ],
        "Ada\n",
    );
    // Trailing space of the PUSH_STR line is trimmed away
    assert_eq!(execution.stdout, "Hello,Ada\n");
}

#[test]
fn test_input_numbers_are_text_but_coerce() {
    let execution = run_with_input(
        &["ACQUIRE_INPUT", "ACQUIRE_INPUT", "ADD", "OUTPUT"],
        "20\n22\n",
    );
    assert_eq!(execution.stdout, "42\n");
}

#[test]
fn test_exhausted_input_yields_zero() {
    let execution = run_with_input(
        &["ACQUIRE_INPUT", "ACQUIRE_INPUT", "ADD", "OUTPUT"],
        "",
    );
    assert_eq!(execution.stdout, "0\n");
}

// ============================================================================
// Fatal errors
// ============================================================================

#[rstest]
#[case(&["NOP"], "Unknown instruction: NOP", 1)]
#[case(&["push_num 1"], "Unknown instruction: push_num", 1)]
#[case(&["PUSH_NUM"], "Missing number for PUSH_NUM", 1)]
#[case(&["PUSH_NUM ten"], "Invalid number for PUSH_NUM", 1)]
#[case(&["PUSH_STR"], "Missing string for PUSH_STR", 1)]
#[case(&["OUTPUT"], "Stack underflow encountered", 1)]
#[case(&["PUSH_NUM 1", "ADD"], "Stack underflow encountered", 2)]
#[case(&["INCREMENT"], "Stack underflow encountered", 1)]
#[case(&["PUSH_STR x", "INCREMENT"], "Cannot convert string to number: x", 2)]
#[case(&["SET_VAR"], "Missing variable name for SET_VAR", 1)]
#[case(&["SET_VAR a"], "Stack is empty, unable to set variable a", 1)]
#[case(&["GET_VAR"], "Missing variable name for GET_VAR", 1)]
#[case(&["GET_VAR a"], "Variable a not found", 1)]
#[case(&["PUSH_NUM 1", "PUSH_STR a", "COMBINE"], "COMBINE can only operate on two strings or two integers", 3)]
#[case(&["COMBINE"], "Not enough elements on the stack for COMBINE", 1)]
#[case(&["PUSH_NUM 1", "REPEAT"], "Not enough elements on the stack for REPEAT", 2)]
#[case(&["PUSH_NUM -2", "PUSH_STR a", "REPEAT"], "Repeat count must be a positive number", 3)]
#[case(&["PUSH_STR a", "PUSH_STR b", "REPEAT"], "Cannot convert string to number: a", 3)]
#[case(&["REVERSE"], "Not enough elements on the stack for REVERSE_STRING", 1)]
#[case(&["PUSH_NUM 5", "REVERSE"], "Item for REVERSE_STRING must be a string or variable holding a string", 2)]
#[case(&["PUSH_NUM 5", "PUSH_NUM 0", "DIV"], "Division by zero", 3)]
fn test_fatal_messages(#[case] lines: &[&str], #[case] message: &str, #[case] line: usize) {
    assert_fatal(lines, message, line);
}

#[rstest]
#[case(&["HOP"], ErrorKind::MalformedInstruction)]
#[case(&["ADD"], ErrorKind::StackUnderflow)]
#[case(&["PUSH_NUM 1", "REVERSE"], ErrorKind::TypeMismatch)]
#[case(&["REVERSE"], ErrorKind::StackUnderflow)]
#[case(&["PUSH_NUM 1", "PUSH_NUM 0", "DIV"], ErrorKind::Arithmetic)]
#[case(&["GET_VAR nope"], ErrorKind::UndefinedVariable)]
#[case(&["PUSH_STR q", "INCREMENT"], ErrorKind::Conversion)]
fn test_fatal_kinds(#[case] lines: &[&str], #[case] kind: ErrorKind) {
    assert_fatal_kind(lines, kind);
}

#[test]
fn test_output_before_fatal_is_kept() {
    let execution = assert_fatal(
        &["PUSH_STR partial", "OUTPUT", "GET_VAR missing", "PUSH_STR never", "OUTPUT"],
        "Variable missing not found",
        3,
    );
    assert_eq!(
        execution.transcript(),
        "partial\nVariable missing not found at line 3\n"
    );
}

#[test]
fn test_reverse_type_error_transcript() {
    let execution = assert_fatal(
        &["PUSH_NUM 5", "REVERSE"],
        "Item for REVERSE_STRING must be a string or variable holding a string",
        2,
    );
    insta::assert_snapshot!(
        execution.transcript().trim(),
        @"Item for REVERSE_STRING must be a string or variable holding a string at line 2"
    );
}

#[test]
fn test_fatal_line_includes_blank_lines() {
    assert_fatal(&["", "", "", "BOGUS"], "Unknown instruction: BOGUS", 4);
}

#[test]
fn test_unknown_opcode_after_halt_never_seen() {
    assert_output(&["PUSH_NUM 1", "OUTPUT", "HALT", "BOGUS"], "1");
}
