use std::{
    cell::RefCell,
    error::Error,
    fs,
    io::{self, Cursor},
    path::{Path, PathBuf},
    rc::Rc,
    time::Duration,
};

use quill::{
    ast::{Expr, LogicalOperator, Statement},
    config::{DEFAULT_MAX_CALL_DEPTH, Settings},
    error::{ErrorKind, ParseError, RuntimeError},
    interpreter::{
        evaluator::core::Context,
        host::{CapturedOutput, Host, PythonRunner, ScriptOutput, ScriptRunner},
        value::core::Value,
    },
};
use walkdir::WalkDir;

/// Answers every script call with the same output and remembers what it was
/// asked to run.
#[derive(Clone)]
struct FakeRunner {
    calls:     Rc<RefCell<Vec<(PathBuf, Vec<String>)>>>,
    timed_out: bool,
    out:       ScriptOutput,
}

impl FakeRunner {
    fn replying(stdout: &str) -> Self {
        Self { calls:     Rc::default(),
               timed_out: false,
               out:       ScriptOutput { stdout:    stdout.to_string(),
                                         stderr:    String::new(),
                                         exit_code: Some(0), }, }
    }

    fn failing(code: i32, stderr: &str) -> Self {
        Self { out: ScriptOutput { stdout:    String::new(),
                                   stderr:    stderr.to_string(),
                                   exit_code: Some(code), },
               ..Self::replying("") }
    }

    fn timing_out() -> Self {
        Self { timed_out: true,
               ..Self::replying("") }
    }

    fn calls(&self) -> Vec<(PathBuf, Vec<String>)> {
        self.calls.borrow().clone()
    }
}

impl ScriptRunner for FakeRunner {
    fn run(&self, path: &Path, args: &[String]) -> io::Result<ScriptOutput> {
        self.calls
            .borrow_mut()
            .push((path.to_path_buf(), args.to_vec()));
        if self.timed_out {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "killed"));
        }
        Ok(self.out.clone())
    }
}

fn workspace_settings() -> Settings {
    Settings::default().with_working_dir(env!("CARGO_MANIFEST_DIR"))
}

fn host(output: &CapturedOutput, stdin: &str, runner: impl ScriptRunner + 'static) -> Host {
    Host::new(Box::new(output.clone()),
              Box::new(Cursor::new(stdin.as_bytes().to_vec())),
              Box::new(runner))
}

fn run_with(src: &str,
            stdin: &str,
            settings: Settings,
            runner: impl ScriptRunner + 'static)
            -> (Result<(), RuntimeError>, String) {
    let program = quill::parse(src).unwrap_or_else(|e| panic!("Failed to parse:\n{src}\n{e}"));
    let output = CapturedOutput::default();
    let result = quill::run_with(&program, settings, host(&output, stdin, runner));
    (result, output.contents())
}

fn run(src: &str) -> (Result<(), RuntimeError>, String) {
    run_with(src, "", workspace_settings(), FakeRunner::replying(""))
}

fn assert_success(src: &str) -> String {
    match run(src) {
        (Ok(()), output) => output,
        (Err(e), _) => panic!("Script failed: {e}"),
    }
}

fn assert_output(src: &str, expected: &str) {
    assert_eq!(assert_success(src), expected, "for script:\n{src}");
}

fn assert_failure(src: &str) -> RuntimeError {
    match run(src) {
        (Err(e), _) => e,
        (Ok(()), _) => panic!("Script succeeded but was expected to fail"),
    }
}

#[test]
fn round_trip_prints_without_newline() {
    assert_output("x = 1\nwhile x <= 3 begin\nprint(itoa(x))\nx = x + 1\nend", "123");
}

#[test]
fn assignment_and_basic_arithmetic() {
    assert_output("print(2 + 3)", "5");
    assert_output("print(2.0 * 3.0)", "6.0");
    assert_output("print(2 * 3.0)", "6.0");
    assert_output("print(8 - 5)", "3");
    assert_output("print(7 / 2)", "3.5");
    assert_output("print(6 / 3)", "2.0");
    assert_output("print(1 + 2 * 3, \" \", (1 + 2) * 3, \" \", 10 - 2 - 3)", "7 9 5");
    assert_output("x = -4\nprint(-x)", "4");
}

#[test]
fn concatenation_and_repetition() {
    assert_output("print(\"ab\" + \"cd\")", "abcd");
    assert_output("a = [1, 2] + [3]\nprint(a)", "[1, 2, 3]");
    assert_output("print(\"ab\" * 2)", "abab");
    assert_output("print([0] * 3)", "[0, 0, 0]");
    assert_output("print([1, \"a\", [true]])", "[1, 'a', [True]]");
    assert_output("x = [] * 100000000000\nprint(x, len(x))", "[][0]");
    assert_output("s = \"\" * 100000000000\nprint(len(s))", "[0]");
}

#[test]
fn division_by_zero_is_error() {
    let e = assert_failure("x = 1 / 0");
    assert!(matches!(e, RuntimeError::DivisionByZero { line: 1 }));
    assert_eq!(e.kind(), ErrorKind::Arithmetic);
}

#[test]
fn mismatched_operands_are_type_errors() {
    assert_eq!(assert_failure("x = \"1\" + 1").kind(), ErrorKind::Type);
    assert_eq!(assert_failure("x = 2.0 * \"a\"").kind(), ErrorKind::Type);
    assert_eq!(assert_failure("x = [1] - [1]").kind(), ErrorKind::Type);
    assert_eq!(assert_failure("x = -\"a\"").kind(), ErrorKind::Type);
    assert_eq!(assert_failure("if \"a\" < 1 begin end").kind(), ErrorKind::Type);
}

#[test]
fn integer_overflow_is_error() {
    assert_eq!(assert_failure("x = 9223372036854775807 + 1").kind(),
               ErrorKind::Arithmetic);
}

#[test]
fn casts() {
    assert_output("print(atoi(\"41\") + 1)", "42");
    assert_output("print((atoi) \"2.5\" * 2)", "5.0");
    assert_output("print(itoa 1.5 + \"!\")", "1.5!");
    assert_output("print((itoa) 7 + (itoa) 8)", "78");

    let e = assert_failure("x = atoi(\"seven\")");
    assert!(matches!(e, RuntimeError::InvalidConversion { .. }));
    assert_eq!(assert_failure("x = atoi(7)").kind(), ErrorKind::Type);
}

#[test]
fn comparisons_and_equality() {
    assert_output(r#"
        if 1 == 1.0 begin print("a") end
        if not (1 == true) begin print("b") end
        if [1, "x"] == [1, "x"] begin print("c") end
        if "abc" < "abd" begin print("d") end
        if [1, 2] < [1, 3] begin print("e") end
        if 2 >= 2 and 3 > 2 and 1 <= 1 and 1 != 2 begin print("f") end
    "#,
                  "abcdef");
}

#[test]
fn truthiness() {
    assert_output(r#"
        if "" begin print("1") else print("0") end
        if [] begin print("1") else print("0") end
        if 0 begin print("1") else print("0") end
        if 0.0 begin print("1") else print("0") end
        if "x" begin print("1") else print("0") end
        if [0] begin print("1") else print("0") end
    "#,
                  "000011");
}

#[test]
fn logical_chains_short_circuit() {
    assert_output(r#"
        function f() begin
            print("f")
            return true
        end
        if false and f() begin print("x") end
        if true or f() begin print("y") end
        if f() or f() begin print("z") end
    "#,
                  "yfz");
}

#[test]
fn and_or_chains_flatten() {
    let program = quill::parse("if a and b and c begin end").unwrap();
    let Statement::If { condition, .. } = &program.statements[0] else {
        panic!("expected an if statement");
    };
    assert!(matches!(condition,
                     Expr::Chain { op: LogicalOperator::And, operands, .. } if operands.len() == 3));

    let program = quill::parse("if a or b begin end").unwrap();
    let Statement::If { condition, .. } = &program.statements[0] else {
        panic!("expected an if statement");
    };
    assert!(matches!(condition,
                     Expr::Chain { op: LogicalOperator::Or, operands, .. } if operands.len() == 2));

    let program = quill::parse("if a or b and c or d begin end").unwrap();
    let Statement::If { condition: Expr::Chain { op: LogicalOperator::Or,
                                                 operands,
                                                 .. },
                        .. } = &program.statements[0]
    else {
        panic!("expected an or chain");
    };
    assert_eq!(operands.len(), 3);
    assert!(matches!(&operands[1],
                     Expr::Chain { op: LogicalOperator::And, operands, .. } if operands.len() == 2));
}

#[test]
fn nodes_remember_their_lines() {
    let program = quill::parse("x = 1\n\nif x begin\nprint(x)\nend").unwrap();
    assert_eq!(program.statements[0].line_number(), 1);
    assert_eq!(program.statements[1].line_number(), 3);

    let Statement::If { condition, .. } = &program.statements[1] else {
        panic!("expected an if statement");
    };
    assert_eq!(condition.line_number(), 3);
}

#[test]
fn relational_operators_nest() {
    let program = quill::parse("if a < b == c begin end").unwrap();
    let Statement::If { condition: Expr::BinaryOp { left, .. },
                        .. } = &program.statements[0]
    else {
        panic!("expected a binary comparison");
    };
    assert!(matches!(left.as_ref(), Expr::BinaryOp { .. }));
}

#[test]
fn parsing_is_deterministic() {
    let src = fs::read_to_string("tests/example.dsl").expect("missing file");
    assert_eq!(quill::parse(&src).unwrap(), quill::parse(&src).unwrap());
}

#[test]
fn pretty_prints_chains_and_blocks() {
    let program = quill::parse("while a or b begin\nreturn 1\nend").unwrap();
    assert_eq!(program.pretty(),
               "(program, -, -)\n  (while, -, -)\n    (condition, -, or)\n      (ID, a, -)\n      \
                (ID, b, -)\n    (program, -, -)\n      (return, -, -)\n        (NUMBER, 1, -)\n");
}

#[test]
fn undeclared_name_in_function_is_global() {
    assert_output("function setg() begin\ng = 5\nend\nsetg()\nprint(g)", "5");
}

#[test]
fn assignment_updates_nearest_frame() {
    assert_output(r#"
        x = 1
        function outer(x) begin
            inner()
            return x
        end
        function inner() begin
            x = 42
        end
        r = outer(7)
        print(r, " ", x)
    "#,
                  "42 1");
}

#[test]
fn callee_sees_caller_frames() {
    assert_output(r#"
        function callee() begin
            return secret
        end
        function caller(secret) begin
            return callee()
        end
        print(caller(9))
    "#,
                  "9");

    let e = assert_failure("function callee() begin\nreturn secret\nend\ncallee()");
    assert!(matches!(e, RuntimeError::FunctionFailed { .. }));
    assert!(matches!(e.root_cause(), RuntimeError::UnknownVariable { name, .. } if name == "secret"));
    assert_eq!(e.kind(), ErrorKind::Name);
}

#[test]
fn unknown_names_are_errors() {
    assert!(matches!(assert_failure("print(foo)"),
                     RuntimeError::UnknownVariable { .. }));
    assert!(matches!(assert_failure("foo(bar)"),
                     RuntimeError::UnknownFunction { name, .. } if name == "foo"));
}

#[test]
fn user_defined_function_and_calls() {
    assert_output("function add(a, b) begin\nreturn a + b\nend\nprint(add(2, 5))", "7");
    assert_output(r#"
        function fact(n) begin
            if n <= 1 begin return 1 end
            return n * fact(n - 1)
        end
        print(fact(10))
    "#,
                  "3628800");
    assert_output(r#"
        function f() begin return 1 end
        function f() begin return 2 end
        print(f())
    "#,
                  "2");
}

#[test]
fn wrong_function_arity_is_error() {
    let e = assert_failure("function add(a, b) begin\nreturn a + b\nend\nadd(1, 2, 3)");
    assert!(matches!(e,
                     RuntimeError::ArgumentCountMismatch { expected: 2,
                                                           found: 3,
                                                           line: 4,
                                                           .. }));
    assert_eq!(e.kind(), ErrorKind::Definition);
}

#[test]
fn invalid_function_definitions() {
    assert!(matches!(assert_failure("function print(x) begin end"),
                     RuntimeError::BuiltinFunctionRedefinition { .. }));
    assert!(matches!(assert_failure("function len() begin end"),
                     RuntimeError::BuiltinFunctionRedefinition { .. }));
    assert!(matches!(assert_failure("function f(a, a) begin end"),
                     RuntimeError::DuplicateParameter { .. }));
    assert!(matches!(assert_failure("function f(1) begin end"),
                     RuntimeError::InvalidParameter { .. }));
}

#[test]
fn return_propagation() {
    assert_output(r#"
        function loop() begin
            while true begin
                return 1
            end
        end
        print(loop())
    "#,
                  "1");
    assert_output(r#"
        function maybe(x) begin
            if x > 0 begin return "pos" end
        end
        print(maybe(-1), " ", maybe(1))
    "#,
                  "None pos");
    assert_output("function nothing() begin\nreturn\nend\nprint(nothing())", "None");
    assert_output("print(\"a\")\nreturn 0\nprint(\"b\")", "a");
}

#[test]
fn errors_inside_functions_are_wrapped() {
    let e = assert_failure("function f() begin\nreturn 1 / 0\nend\nx = f()");
    let RuntimeError::FunctionFailed { name, line, .. } = &e else {
        panic!("expected a wrapped error, got {e:?}");
    };
    assert_eq!(name, "f");
    assert_eq!(*line, 4);
    assert_eq!(e.kind(), ErrorKind::Arithmetic);
    assert!(matches!(e.root_cause(), RuntimeError::DivisionByZero { line: 2 }));
    assert!(e.source().is_none());

    let message = e.to_string();
    assert!(message.contains("in function 'f'"));
    assert_eq!(message.matches("Division by zero").count(), 1);
}

#[test]
fn scope_is_popped_after_failure() {
    let program = quill::parse("function f(a) begin\nreturn a / 0\nend\nf(1)").unwrap();
    let output = CapturedOutput::default();
    let settings = Settings::default();
    let mut ctx = Context::new(settings, host(&output, "", FakeRunner::replying("")));

    assert!(ctx.run(&program).is_err());
    assert_eq!(ctx.scope_stack.len(), 1);
    assert!(ctx.get_variable("a").is_none());
}

#[test]
fn recursion_limit() {
    let src = "function f(n) begin\nreturn f(n + 1)\nend\nf(0)";
    let settings = workspace_settings().with_max_call_depth(25);
    let (result, _) = run_with(src, "", settings, FakeRunner::replying(""));
    let e = result.expect_err("unbounded recursion should fail");

    assert_eq!(e.kind(), ErrorKind::Resource);
    assert!(matches!(e.root_cause(), RuntimeError::RecursionLimit { limit: 25, .. }));
}

#[test]
fn default_recursion_limit_fits_a_test_thread() {
    let src = "function f(n) begin\nreturn f(n + 1)\nend\nf(0)";
    let program = quill::parse(src).unwrap();
    let output = CapturedOutput::default();
    let settings = Settings::default();
    let result = quill::run_with(&program, settings, host(&output, "", FakeRunner::replying("")));
    let e = result.expect_err("unbounded recursion should fail");

    assert_eq!(e.kind(), ErrorKind::Resource);
    assert!(matches!(e.root_cause(),
                     RuntimeError::RecursionLimit { limit: DEFAULT_MAX_CALL_DEPTH, .. }));
}

#[test]
fn arrays_and_indexing() {
    assert_output("a = [1, 2, 3]\na[0] = 9\nprint(a[0], a[2])", "93");
    assert_output("a = [1, 2, 3]\nb = a\nb[0] = 100\nprint(a[0], \",\", b[0])", "100,100");
    assert_output("a = [1, 2]\nb = a + []\nb[0] = 100\nprint(a, b)", "[1, 2][100, 2]");
    assert_output("a = []\nprint(a)", "[]");
    assert_output("i = 1\na = [5, 6]\nprint(a[i + 0])", "6");
}

#[test]
fn arrays_are_shared_between_names() {
    assert_output(r#"
        function set0(a) begin
            a[0] = 9
        end
        x = [1, 2]
        set0(x)
        print(x)
    "#,
                  "[9, 2]");
    assert_output(r#"
        function fill(a, v) begin
            i = 0
            n = len(a)
            while i < n[0] begin
                a[i] = v
                i = i + 1
            end
            return a
        end
        x = [0, 0, 0]
        y = fill(x, 7)
        y[1] = 8
        print(x, " ", x == y)
    "#,
                  "[7, 8, 7] True");
    assert_output("a = [1]\na[0] = a\nprint(a, a == a)", "[[...]]True");
}

#[test]
fn array_index_errors() {
    let e = assert_failure("a = [1, 2, 3]\na[5] = 1");
    assert!(matches!(e,
                     RuntimeError::IndexOutOfBounds { index: 5,
                                                      len: 3,
                                                      .. }));
    assert_eq!(e.kind(), ErrorKind::Index);

    assert_eq!(assert_failure("a = [1]\nx = a[-1]").kind(), ErrorKind::Index);
    assert!(matches!(assert_failure("a = [1]\nx = a[\"0\"]"),
                     RuntimeError::InvalidIndex { .. }));
    assert!(matches!(assert_failure("n = 3\nx = n[0]"),
                     RuntimeError::NotAnArray { .. }));
    assert!(matches!(assert_failure("n = 3\nn[0] = 1"),
                     RuntimeError::NotAnArray { .. }));
    assert!(matches!(assert_failure("missing[0] = 1"),
                     RuntimeError::UnknownVariable { .. }));
}

#[test]
fn builtin_len() {
    assert_output("l = len(\"abc\", [1, 2], 5)\nprint(l)", "[3, 2, None]");
    assert_output("l = len()\nprint(l)", "[]");
}

#[test]
fn print_expands_escapes() {
    assert_output(r#"print("a\nb\tc")"#, "a\nb\tc");
    assert_output(r"print('it\'s')", "it's");
    assert_output(r#"print("say \"hi\"")"#, "say \"hi\"");
    assert_output(r#"print("back\\slash", "\q")"#, "back\\slash");
    assert_output("print(true, false)", "TrueFalse");
    assert_output("print(itoa(true), \" \", itoa(len(1)))", "True [None]");
}

#[test]
fn input_reads_lines() {
    let src = "name = input(\"name? \")\nprint(\"hi \", name)";
    let (result, output) = run_with(src, "bob\r\nalice\n", workspace_settings(), FakeRunner::replying(""));
    result.unwrap();
    assert_eq!(output, "name? hi bob");

    let (result, _) = run_with("x = input()", "", workspace_settings(), FakeRunner::replying(""));
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Io);
}

#[test]
fn script_calls_use_runner() {
    let runner = FakeRunner::replying("16\n\n");
    let src = "r = ./scripts/square.py(4, \"x\", [1], true)\nprint(r)\n./scripts/square.py()";
    let (result, output) = run_with(src, "", workspace_settings(), runner.clone());
    result.unwrap();

    assert_eq!(output, "16");
    let calls = runner.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].0.ends_with("scripts/square.py"));
    assert!(calls[0].0.is_file());
    assert_eq!(calls[0].1, vec!["4", "x", "[1]", "True"]);
    assert!(calls[1].1.is_empty());
}

#[test]
fn missing_script_is_checked_before_arguments() {
    let runner = FakeRunner::replying("");
    let src = "x = ./scripts/missing.py(undefined)";
    let (result, _) = run_with(src, "", workspace_settings(), runner.clone());

    assert!(matches!(result, Err(RuntimeError::ScriptNotFound { .. })));
    assert!(runner.calls().is_empty());
}

#[test]
fn failing_script_reports_stderr() {
    let runner = FakeRunner::failing(2, "boom\n");
    let (result, _) = run_with("./scripts/square.py(1)", "", workspace_settings(), runner);
    let e = result.unwrap_err();

    assert!(matches!(&e, RuntimeError::ScriptFailed { code: Some(2), stderr, .. } if stderr == "boom"));
    assert_eq!(e.kind(), ErrorKind::ExternalProcess);
    assert!(e.to_string().ends_with("boom"));
}

#[test]
fn script_timeout() {
    let settings = workspace_settings().with_script_timeout(Some(Duration::from_secs(3)));
    let (result, _) = run_with("./scripts/square.py(1)", "", settings, FakeRunner::timing_out());

    assert!(matches!(result, Err(RuntimeError::ScriptTimeout { seconds: 3, .. })));
}

#[test]
fn script_interpreter_missing() {
    let runner = PythonRunner::new("quill-no-such-interpreter", None);
    let (result, _) = run_with("./scripts/square.py(1)", "", workspace_settings(), runner);

    assert!(matches!(result, Err(RuntimeError::ScriptSpawn { .. })));
}

#[test]
fn lex_errors_are_collected() {
    let lexed = quill::tokenize("x = 1 $\nprint(x) @");
    assert_eq!(lexed.errors.len(), 2);
    assert_eq!(lexed.errors[0].line(), 1);
    assert_eq!(lexed.errors[1].line(), 2);
    assert_eq!(lexed.errors[0].to_string(), "Illegal character $ in line 1");

    assert_output("x = 1 $\nprint(x) @", "1");
}

#[test]
fn lexing_resumes_after_the_first_bad_character() {
    let lexed = quill::tokenize("x = \"abc\ny = 2");
    let fragments: Vec<String> = lexed.errors.iter().map(ToString::to_string).collect();
    assert_eq!(fragments, vec!["Illegal character \" in line 1"]);

    let texts: Vec<String> = lexed.tokens.iter().map(|(t, _)| t.to_string()).collect();
    assert_eq!(texts, vec!["x", "=", "abc", "y", "=", "2"]);
    assert_eq!(lexed.tokens[2].1.offset, 5);
    assert_eq!(lexed.tokens[3].1.line, 2);

    let lexed = quill::tokenize("x = 12.");
    assert_eq!(lexed.errors.len(), 1);
    assert_eq!(lexed.errors[0].to_string(), "Illegal character . in line 1");
    assert_eq!(lexed.tokens.last().map(|(t, _)| t.to_string()), Some("12".to_string()));
}

#[test]
fn syntax_errors() {
    assert!(matches!(quill::parse("if x begin print(x)"),
                     Err(ParseError::UnexpectedEndOfInput { .. })));

    let e = quill::parse("x = 1\ny = = 2").unwrap_err();
    assert!(matches!(&e, ParseError::UnexpectedToken { line: 2, token, .. } if token == "="));
    assert!(e.to_string().starts_with("Error on line 2: Syntax error"));

    assert!(quill::parse("end").is_err());
    assert!(quill::parse("x = 1 < 2").is_err());
}

#[test]
fn independent_runs_share_nothing() {
    let program = quill::parse("function f() begin return 1 end\ncount = 1").unwrap();
    let settings = Settings::default();
    let output = CapturedOutput::default();
    let mut first = Context::new(settings.clone(), host(&output, "", FakeRunner::replying("")));
    first.run(&program).unwrap();

    let second = Context::new(settings, host(&output, "", FakeRunner::replying("")));
    assert_eq!(first.get_variable("count"), Some(&Value::Integer(1)));
    assert!(second.get_variable("count").is_none());
    assert!(second.functions.is_empty());
}

#[test]
fn example_works() {
    let contents = fs::read_to_string("tests/example.dsl").unwrap();
    let output = assert_success(&contents);
    assert!(output.ends_with("done\n"));
}

#[test]
fn sample_scripts_match_expected_output() {
    let mut count = 0;

    for entry in
        WalkDir::new("scripts").into_iter()
                               .filter_map(Result::ok)
                               .filter(|e| e.path().extension().is_some_and(|ext| ext == "dsl"))
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        let expected = fs::read_to_string(path.with_extension("out"))
            .unwrap_or_else(|e| panic!("Missing expected output for {path:?}: {e}"));

        count += 1;
        match run(&source) {
            (Ok(()), output) => assert_eq!(output, expected, "output of {path:?}"),
            (Err(e), _) => panic!("Sample {path:?} failed:\n{e}"),
        }
    }

    assert!(count > 0, "No sample scripts found in scripts/");
}
