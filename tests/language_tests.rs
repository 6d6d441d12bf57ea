// End-to-end tests of the LearnScript language through the runner

use codemaster::runner::{CodeRunner, ExecutionResult};

fn run(source: &str) -> Vec<String> {
    match CodeRunner::default().run(source) {
        ExecutionResult::Output(lines) => lines,
        ExecutionResult::Failure(message) => panic!("script failed: {}", message),
    }
}

fn run_failure(source: &str) -> String {
    match CodeRunner::default().run(source) {
        ExecutionResult::Failure(message) => message,
        ExecutionResult::Output(lines) => panic!("script succeeded with {:?}", lines),
    }
}

#[test]
fn test_exercise_solutions_run() {
    let variables = "let name = \"Alice\";\nlet age = 25;\nlet likesCoding = true;\n\nconsole.log(\"Name:\", name);\nconsole.log(\"Age:\", age);\nconsole.log(\"Likes coding:\", likesCoding);";
    assert_eq!(run(variables), ["Name: Alice", "Age: 25", "Likes coding: true"]);

    let evens = "let numbers = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];\nlet evenNumbers = numbers.filter(n => n % 2 === 0);\nlet doubledEvens = evenNumbers.map(n => n * 2);\n\nconsole.log(\"Even numbers:\", evenNumbers);\nconsole.log(\"Doubled evens:\", doubledEvens);";
    assert_eq!(
        run(evens),
        ["Even numbers: 2,4,6,8,10", "Doubled evens: 4,8,12,16,20"]
    );

    let rectangle = "let rectangle = {\n  width: 5,\n  height: 3,\n  calculateArea() {\n    return this.width * this.height;\n  },\n  calculatePerimeter() {\n    return 2 * (this.width + this.height);\n  }\n};\n\nconsole.log(\"Area:\", rectangle.calculateArea());\nconsole.log(\"Perimeter:\", rectangle.calculatePerimeter());";
    assert_eq!(run(rectangle), ["Area: 15", "Perimeter: 16"]);
}

#[test]
fn test_practice_snippet_completed() {
    let source = "function calculateArea(length, width) {\n  return length * width;\n}\nconsole.log(calculateArea(5, 3));";
    assert_eq!(run(source), ["15"]);
}

#[test]
fn test_unfinished_practice_snippet_prints_undefined() {
    let source = "function calculateArea(length, width) {\n  // Your code here\n  \n}\nconsole.log(calculateArea(5, 3));";
    assert_eq!(run(source), ["undefined"]);
}

#[test]
fn test_async_solution_is_a_syntax_error() {
    let message = run_failure("async function f() { await g(); }");
    assert!(message.starts_with("Error: SyntaxError:"), "{}", message);
}

#[test]
fn test_closures_and_counters() {
    let source = r#"
        function makeCounter() {
            let count = 0;
            return {
                increment: () => ++count,
                current() { return count; }
            };
        }
        const a = makeCounter();
        const b = makeCounter();
        a.increment(); a.increment(); b.increment();
        console.log(a.current(), b.current());
    "#;
    assert_eq!(run(source), ["2 1"]);
}

#[test]
fn test_control_flow_mix() {
    let source = r#"
        let out = [];
        for (let i = 1; i <= 15; i++) {
            if (i % 15 === 0) out.push("FizzBuzz");
            else if (i % 3 === 0) out.push("Fizz");
            else if (i % 5 === 0) out.push("Buzz");
            else out.push(i);
        }
        console.log(out.join(" "));

        let n = 0;
        do { n++; } while (n < 3);
        switch (n) {
            case 1: console.log("one"); break;
            case 3: console.log("three");
            case 4: console.log("fell through"); break;
            default: console.log("other");
        }
    "#;
    assert_eq!(
        run(source),
        [
            "1 2 Fizz 4 Buzz Fizz 7 8 Fizz Buzz 11 Fizz 13 14 FizzBuzz",
            "three",
            "fell through",
        ]
    );
}

#[test]
fn test_for_of_and_for_in() {
    let source = r#"
        const scores = { ada: 3, alan: 5 };
        for (const name in scores) console.log(name, scores[name]);
        let total = 0;
        for (const s of [1, 2, 3]) total += s;
        let letters = [];
        for (const ch of "hey") letters.push(ch.toUpperCase());
        console.log(total, letters.join("-"));
    "#;
    assert_eq!(run(source), ["ada 3", "alan 5", "6 H-E-Y"]);
}

#[test]
fn test_try_catch_finally() {
    let source = r#"
        function risky(x) {
            if (x < 0) throw new RangeError("negative: " + x);
            return Math.sqrt(x);
        }
        for (const v of [9, -1]) {
            try {
                console.log(risky(v));
            } catch (e) {
                console.log(e.name, e.message);
            } finally {
                console.log("checked", v);
            }
        }
    "#;
    assert_eq!(
        run(source),
        ["3", "checked 9", "RangeError negative: -1", "checked -1"]
    );
}

#[test]
fn test_array_and_string_methods() {
    let source = r#"
        const words = ["pear", "apple", "fig"];
        console.log(words.slice().sort().join(","), words.join(","));
        console.log([3, 1, 10, 2].sort((a, b) => a - b));
        console.log([1, 2, 3, 4].reduce((acc, x) => acc + x, 0));
        console.log(words.map(w => w.length), words.indexOf("fig"), words.includes("kiwi"));
        console.log("  Hello World ".trim().toLowerCase().split(" "));
        console.log("abc".padStart(5, "*"), "ha".repeat(3), "a-b-c".replace("-", "+"));
        console.log([[1, 2], [3]].flat(), [1, 2, 3].find(x => x > 1));
    "#;
    assert_eq!(
        run(source),
        [
            "apple,fig,pear pear,apple,fig",
            "1,2,3,10",
            "10",
            "4,5,3 2 false",
            "hello,world",
            "**abc hahaha a+b-c",
            "1,2,3 2",
        ]
    );
}

#[test]
fn test_numbers_and_math() {
    let source = r#"
        console.log(7 / 2, 7 % 3, 2 ** 10, -7 % 3);
        console.log((1.005).toFixed(2), (255).toString(16), Math.max(1, 5, 3), Math.min());
        console.log(parseInt("42px"), parseFloat("3.5e1"), Number("x"), 1 / 0);
        console.log(0.1 * 3, 5 & 3, 5 | 3, 1 << 4);
    "#;
    assert_eq!(
        run(source),
        [
            "3.5 1 1024 -1",
            "1.00 ff 5 Infinity",
            "42 35 NaN Infinity",
            "0.30000000000000004 1 7 16",
        ]
    );
}

#[test]
fn test_equality_and_typeof() {
    let source = r#"
        console.log(1 == "1", 1 === "1", null == undefined, null === undefined, NaN === NaN);
        console.log(typeof 1, typeof "s", typeof [], typeof {}, typeof null, typeof undefined, typeof (() => 1), typeof notDeclared);
        console.log(null ?? "fallback", 0 || "zero", 0 ?? "kept");
    "#;
    assert_eq!(
        run(source),
        [
            "true false true false false",
            "number string object object object undefined function undefined",
            "fallback zero 0",
        ]
    );
}

#[test]
fn test_json_stringify() {
    let source = r#"
        const user = { name: "Ada", langs: ["js", "rust"], active: true, skip: undefined };
        console.log(JSON.stringify(user));
        console.log(JSON.stringify([1, "two", null]));
    "#;
    assert_eq!(
        run(source),
        [
            r#"{"name":"Ada","langs":["js","rust"],"active":true}"#,
            r#"[1,"two",null]"#,
        ]
    );
}

#[test]
fn test_hoisting_and_tdz() {
    assert_eq!(
        run("console.log(double(4));\nfunction double(x) { return x * 2; }\nconsole.log(v);\nvar v = 1;"),
        ["8", "undefined"]
    );
    assert_eq!(
        run_failure("console.log(x);\nlet x = 1;"),
        "Error: ReferenceError: Cannot access 'x' before initialization"
    );
}

#[test]
fn test_const_reassignment_fails() {
    assert_eq!(
        run_failure("const x = 1;\nx = 2;"),
        "Error: TypeError: Assignment to constant variable."
    );
}

#[test]
fn test_property_of_undefined_fails() {
    assert_eq!(
        run_failure("let user;\nconsole.log(user.name);"),
        "Error: TypeError: Cannot read properties of undefined (reading 'name')"
    );
}

#[test]
fn test_no_host_capabilities() {
    for source in ["require('fs')", "process.exit(1)", "fetch('http://example.com')", "setTimeout(() => 1, 10)"] {
        let message = run_failure(source);
        assert!(message.starts_with("Error: ReferenceError:"), "{}", message);
    }
}
