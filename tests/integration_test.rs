// Integration tests for the code runner contract

use std::time::Duration;

use codemaster::runner::limits::Limits;
use codemaster::runner::{CodeRunner, ExecutionResult, NO_OUTPUT_SENTINEL};

fn output(lines: &[&str]) -> ExecutionResult {
    ExecutionResult::Output(lines.iter().map(|l| l.to_string()).collect())
}

fn failure(message: &str) -> ExecutionResult {
    ExecutionResult::Failure(message.to_string())
}

#[test]
fn test_greeting_function() {
    let source = r#"
        function greetUser(name) {
            return `Hello, ${name}! Welcome to coding!`;
        }
        console.log(greetUser("Developer"));
    "#;
    assert_eq!(
        CodeRunner::default().run(source),
        output(&["Hello, Developer! Welcome to coding!"])
    );
}

#[test]
fn test_doubled_array_with_label() {
    let source = r#"
        let numbers = [1, 2, 3, 4, 5];
        let doubled = numbers.map(n => n * 2);
        console.log("Doubled numbers:", doubled);
    "#;
    assert_eq!(
        CodeRunner::default().run(source),
        output(&["Doubled numbers: 2,4,6,8,10"])
    );
}

#[test]
fn test_undefined_variable_is_reference_failure() {
    assert_eq!(
        CodeRunner::default().run("undefinedVariable"),
        failure("Error: ReferenceError: undefinedVariable is not defined")
    );
}

#[test]
fn test_empty_source_yields_sentinel() {
    let result = CodeRunner::default().run("");
    assert_eq!(result, output(&[NO_OUTPUT_SENTINEL]));
    assert!(result.is_no_output_sentinel());
}

#[test]
fn test_three_lines_in_order() {
    let source = "console.log('one');\nconsole.log('two');\nconsole.log('three');";
    assert_eq!(
        CodeRunner::default().run(source),
        output(&["one", "two", "three"])
    );
}

#[test]
fn test_silent_scripts_yield_sentinel() {
    let runner = CodeRunner::default();
    for source in [
        "let x = 1;",
        "function f() { return 1; }",
        "for (let i = 0; i < 3; i++) {}",
        "// just a comment",
        "const o = { a: [1, 2] }; o.a.push(3);",
    ] {
        assert!(runner.run(source).is_no_output_sentinel(), "{}", source);
    }
}

#[test]
fn test_lines_are_space_joined_string_forms() {
    let source = r#"
        console.log(1, "a", true, null, undefined);
        console.log([1, [2, 3]], {});
        console.log();
        console.info(0.1 + 0.2);
        console.error("boom");
    "#;
    assert_eq!(
        CodeRunner::default().run(source),
        output(&[
            "1 a true null undefined",
            "1,2,3 [object Object]",
            "",
            "0.30000000000000004",
            "boom",
        ])
    );
}

#[test]
fn test_failure_discards_earlier_output() {
    let result = CodeRunner::default().run("console.log('before');\nthrow new Error('bad');");
    assert_eq!(result, failure("Error: Error: bad"));
}

#[test]
fn test_uncaught_error_objects_keep_name_and_message() {
    let runner = CodeRunner::default();
    assert_eq!(
        runner.run("throw new TypeError('bad')"),
        failure("Error: TypeError: bad")
    );
    assert_eq!(
        runner.run("function check(n) {\n  if (n > 2) throw new RangeError('too big: ' + n);\n}\ncheck(5);"),
        failure("Error: RangeError: too big: 5")
    );
    assert_eq!(
        runner.run("try { null.x; } catch (e) { throw e; }"),
        failure("Error: TypeError: Cannot read properties of null (reading 'x')")
    );
}

#[test]
fn test_thrown_primitive() {
    assert_eq!(
        CodeRunner::default().run("throw 'oops';"),
        failure("Error: oops")
    );
}

#[test]
fn test_syntax_error_reports_position() {
    let result = CodeRunner::default().run("let x = ;");
    match result {
        ExecutionResult::Failure(message) => {
            assert!(message.starts_with("Error: SyntaxError: "), "{}", message);
            assert!(message.contains("(line 1, column"), "{}", message);
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[test]
fn test_recovery_after_each_kind_of_failure() {
    let limits = Limits::default()
        .with_max_steps(100_000)
        .with_max_output_lines(10)
        .with_max_call_depth(64);
    let runner = CodeRunner::new(limits);
    let failing = [
        "missing();",
        "throw new TypeError('x');",
        "while (true) {}",
        "function f() { return f(); } f();",
        "for (let i = 0; i < 100; i++) console.log(i);",
        "let = ;",
    ];
    for source in failing {
        assert!(runner.run(source).is_failure(), "{}", source);
        assert_eq!(runner.run("console.log('ok');"), output(&["ok"]));
    }
}

#[test]
fn test_infinite_loop_hits_step_limit() {
    let runner = CodeRunner::new(Limits::default().with_max_steps(10_000));
    assert_eq!(
        runner.run("while (true) {}"),
        failure("Error: RangeError: Execution step limit of 10000 exceeded")
    );
}

#[test]
fn test_infinite_loop_hits_timeout() {
    let limits = Limits::default()
        .with_max_steps(u64::MAX)
        .with_timeout(Duration::from_millis(100));
    let report = CodeRunner::new(limits).run_report("let i = 0;\nwhile (true) { i++; }");
    assert_eq!(
        report.result,
        failure("Error: Execution timed out after 100 ms")
    );
    assert!(report.elapsed >= Duration::from_millis(100));
}

#[test]
fn test_unbounded_recursion_hits_depth_limit() {
    assert_eq!(
        CodeRunner::default().run("function down(n) { return down(n + 1); }\ndown(0);"),
        failure("Error: RangeError: Maximum call stack size exceeded")
    );
}

#[test]
fn test_output_flood_hits_output_limit() {
    let runner = CodeRunner::new(Limits::default().with_max_output_lines(5));
    assert_eq!(
        runner.run("for (let i = 0; i < 6; i++) console.log(i);"),
        failure("Error: RangeError: Output limit of 5 lines exceeded")
    );
    assert_eq!(
        runner.run("for (let i = 0; i < 5; i++) console.log(i);"),
        output(&["0", "1", "2", "3", "4"])
    );
}

#[test]
fn test_limits_cannot_be_caught() {
    let runner = CodeRunner::new(Limits::default().with_max_steps(5_000));
    let source = "try { while (true) {} } catch (e) { console.log('caught'); } finally { console.log('finally'); }";
    assert!(runner.run(source).is_failure());
}

#[test]
fn test_spawned_run_can_be_cancelled() {
    let handle = CodeRunner::default().spawn("while (true) {}");
    std::thread::sleep(Duration::from_millis(20));
    handle.cancel();
    assert_eq!(handle.wait().result, failure("Error: Execution cancelled"));
}

#[test]
fn test_concurrent_runs_do_not_interleave() {
    let runner = CodeRunner::default();
    let handles: Vec<_> = (0..4)
        .map(|n| {
            runner.spawn(&format!(
                "for (let i = 0; i < 50; i++) console.log('{}:' + i);",
                n
            ))
        })
        .collect();

    for (n, handle) in handles.into_iter().enumerate() {
        let expected: Vec<String> = (0..50).map(|i| format!("{}:{}", n, i)).collect();
        assert_eq!(handle.wait().result, ExecutionResult::Output(expected));
    }
}

#[test]
fn test_deep_but_bounded_recursion_succeeds() {
    let source = "function sum(n) { return n === 0 ? 0 : n + sum(n - 1); }\nconsole.log(sum(150));";
    assert_eq!(CodeRunner::default().run(source), output(&["11325"]));
}

fn roomy_runner() -> CodeRunner {
    CodeRunner::new(
        Limits::default()
            .with_max_steps(100_000_000)
            .with_timeout(Duration::from_secs(120)),
    )
}

#[test]
fn test_deeply_nested_source_is_a_syntax_error() {
    let runner = CodeRunner::default();
    let n = 100_000;
    let sources = [
        format!("{}1{}", "(".repeat(n), ")".repeat(n)),
        format!("console.log({}1{})", "[".repeat(n), "]".repeat(n)),
        format!("{}{}", "{".repeat(n), "}".repeat(n)),
    ];
    for source in &sources {
        let result = runner.run(source);
        assert!(
            result
                .text()
                .starts_with("Error: SyntaxError: Maximum nesting depth exceeded"),
            "{}",
            result.text()
        );
        assert_eq!(runner.run("console.log('ok');"), output(&["ok"]));
    }
}

#[test]
fn test_deeply_nested_values_are_released() {
    let runner = roomy_runner();
    assert_eq!(
        runner.run("let a = [];\nfor (let i = 0; i < 1000000; i++) { a = [a]; }\nconsole.log('built');"),
        output(&["built"])
    );
    assert_eq!(
        runner.run("let a = {};\nfor (let i = 0; i < 1000000; i++) { a = { x: a }; }\nconsole.log('built');"),
        output(&["built"])
    );
    // Orphaned mid-run, then swept while later allocations keep coming
    assert_eq!(
        runner.run("let a = [];\nfor (let i = 0; i < 1000000; i++) { a = [a]; }\na = 0;\nlet b = [];\nfor (let i = 0; i < 1000000; i++) { b = [i]; }\nconsole.log(b[0]);"),
        output(&["999999"])
    );
}

#[test]
fn test_stringify_of_deep_value_is_a_range_error() {
    let runner = roomy_runner();
    assert_eq!(
        runner.run("let a = [];\nfor (let i = 0; i < 1000000; i++) { a = [a]; }\nconsole.log(JSON.stringify(a).length);"),
        failure("Error: RangeError: Maximum call stack size exceeded")
    );
    assert_eq!(
        runner.run("let a = [];\nfor (let i = 0; i < 100; i++) { a = [a]; }\nconsole.log(JSON.stringify(a).length);"),
        output(&["202"])
    );
}

