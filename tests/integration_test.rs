// Integration tests for the simulator

use pretty_assertions::assert_eq;
use steptrace::interpreter::engine::{Simulator, SimulatorConfig};
use steptrace::interpreter::errors::SimError;
use steptrace::memory::Value;
use steptrace::program::ProgramRecord;

const SUM_LOOP: &str = "\
int sum = 0;
for (int i = 0; i < 5; i++) {
    sum = sum + i;
}
printf(\"%d\\n\", sum);";

const NESTED: &str = "\
int total = 0;
for (int i = 0; i < 2; i++) {
    for (int j = 0; j < 3; j++) {
        total = total + 1;
    }
}
printf(\"%d\", total);";

/// Step until the simulator refuses, returning the number of steps taken
fn run_to_end(sim: &mut Simulator) -> usize {
    let mut steps = 0;
    while sim.step_forward().is_ok() {
        steps += 1;
    }
    steps
}

fn number(sim: &Simulator, name: &str) -> Option<f64> {
    sim.variables().get(name).and_then(Value::as_number)
}

fn messages(sim: &Simulator) -> Vec<String> {
    sim.log().iter().map(|e| e.message.clone()).collect()
}

#[test]
fn test_loop_accumulates_sum() {
    let mut sim = Simulator::from_source(SUM_LOOP);

    let steps = run_to_end(&mut sim);

    assert_eq!(steps, 8);
    assert!(sim.is_finished());
    assert_eq!(number(&sim, "sum"), Some(10.0));
    assert_eq!(number(&sim, "i"), Some(5.0));
    assert_eq!(sim.output().text(), "10\n");
    assert!(sim.loop_stack().is_empty());
    assert_eq!(sim.step_forward(), Err(SimError::Finished));
}

#[test]
fn test_loop_log_lines() {
    let mut sim = Simulator::from_source(SUM_LOOP);
    for _ in 0..3 {
        sim.step_forward().unwrap();
    }

    let entries: Vec<(usize, &str)> = sim
        .log()
        .iter()
        .map(|e| (e.line, e.message.as_str()))
        .collect();
    assert_eq!(
        entries,
        vec![
            (1, "Declare sum = 0"),
            (2, "for-init: declare i = 0"),
            (2, "Enter loop (iteration 1)."),
            (3, "Update sum: 0 → 0"),
            (3, "for-update: i++ → 1"),
            (3, "Condition still true, next iteration (2)."),
        ]
    );
    assert_eq!(sim.loop_stack()[0].iteration, 2);
}

#[test]
fn test_step_back_then_forward_is_idempotent() {
    let mut sim = Simulator::from_source(SUM_LOOP);
    for _ in 0..3 {
        sim.step_forward().unwrap();
    }
    let before = sim.state().clone();

    sim.step_forward().unwrap();
    let after = sim.state().clone();

    sim.step_backward().unwrap();
    assert_eq!(sim.state(), &before);

    sim.step_forward().unwrap();
    assert_eq!(sim.state(), &after);
}

#[test]
fn test_step_back_to_start() {
    let mut sim = Simulator::from_source(SUM_LOOP);
    let initial = sim.state().clone();
    sim.step_forward().unwrap();
    sim.step_forward().unwrap();

    sim.step_backward().unwrap();
    sim.step_backward().unwrap();

    assert_eq!(sim.state(), &initial);
    assert_eq!(sim.history().len(), 1);
    assert_eq!(sim.step_backward(), Err(SimError::AtStart));
}

#[test]
fn test_reset_is_deterministic() {
    let mut sim = Simulator::from_source(NESTED);
    run_to_end(&mut sim);
    let first = sim.state().clone();

    sim.reset();
    assert_eq!(sim.position(), Some(0));
    assert!(sim.log().is_empty());
    assert!(sim.variables().is_empty());
    assert_eq!(sim.history().len(), 1);

    run_to_end(&mut sim);
    assert_eq!(sim.state(), &first);
}

#[test]
fn test_nested_loops_return_to_outer_loop() {
    let mut sim = Simulator::from_source(NESTED);

    let steps = run_to_end(&mut sim);

    assert_eq!(number(&sim, "total"), Some(6.0));
    assert_eq!(number(&sim, "i"), Some(2.0));
    assert_eq!(sim.output().text(), "6");
    assert_eq!(steps, 11);
    assert!(sim.is_finished());
}

#[test]
fn test_inner_loop_exit_runs_outer_update_in_same_step() {
    let mut sim = Simulator::from_source(NESTED);
    // total = 0, outer enter, inner enter, then three inner iterations
    for _ in 0..6 {
        sim.step_forward().unwrap();
    }

    assert_eq!(number(&sim, "total"), Some(3.0));
    assert_eq!(number(&sim, "i"), Some(1.0));
    assert_eq!(sim.position(), Some(2));
    assert_eq!(sim.loop_stack().len(), 1);
    assert_eq!(sim.loop_stack()[0].iteration, 2);
}

#[test]
fn test_loop_with_false_condition_is_skipped() {
    let source = "int n = 0;\nfor (int i = 5; i < 3; i++) {\n    n = n + 1;\n}\nn = n + 10;";
    let mut sim = Simulator::from_source(source);

    let steps = run_to_end(&mut sim);

    assert_eq!(steps, 3);
    assert_eq!(number(&sim, "n"), Some(10.0));
    assert_eq!(number(&sim, "i"), Some(5.0));
    assert!(messages(&sim).contains(&"Loop condition false on entry, loop skipped.".to_string()));
}

#[test]
fn test_empty_loop_body_iterates_one_transition_per_step() {
    let mut sim = Simulator::from_source("for (int i = 0; i < 3; i++) {}\nx = i;");

    sim.step_forward().unwrap();
    assert_eq!(number(&sim, "i"), Some(1.0));
    assert_eq!(sim.position(), Some(0));

    let steps = run_to_end(&mut sim);
    assert_eq!(steps, 3);
    assert_eq!(number(&sim, "x"), Some(3.0));
    assert!(sim.loop_stack().is_empty());
}

#[test]
fn test_one_line_loop_runs_body_between_braces() {
    let mut sim = Simulator::from_source("int sum = 0;\nfor (i = 0; i < 5; i++) { sum = sum + i; }");
    assert_eq!(
        sim.loop_table().get(1).map(|m| m.inline_body.as_str()),
        Some("sum = sum + i;")
    );

    let steps = run_to_end(&mut sim);

    assert_eq!(steps, 7);
    assert_eq!(number(&sim, "sum"), Some(10.0));
    assert_eq!(number(&sim, "i"), Some(5.0));
    assert!(sim.is_finished());
    assert!(sim.loop_stack().is_empty());
    assert!(sim.log().iter().all(|e| e.line <= 2));
    assert_eq!(
        messages(&sim).last().map(String::as_str),
        Some("Loop ends: condition is false.")
    );
}

#[test]
fn test_one_line_loop_resumes_after_input() {
    let mut sim = Simulator::from_source("int t = 0;\nfor (i = 0; i < 2; i++) { t = t + 1; cin >> a; }");
    sim.step_forward().unwrap();
    sim.step_forward().unwrap();

    for expected in [1.0, 2.0] {
        sim.step_forward().unwrap();
        assert_eq!(number(&sim, "t"), Some(expected));
        assert!(sim.pending_input().is_some());
        sim.submit_input("5").unwrap();
    }

    assert!(sim.is_finished());
    assert_eq!(number(&sim, "a"), Some(5.0));
    assert_eq!(number(&sim, "i"), Some(2.0));
}

#[test]
fn test_inline_body_on_brace_line_resumes_after_input() {
    let mut sim = Simulator::from_source("for (i = 0; i < 2; i++)\n{ cin >> a; }");
    sim.step_forward().unwrap();
    assert_eq!(sim.position(), Some(0));

    for token in ["4", "9"] {
        sim.step_forward().unwrap();
        assert!(sim.pending_input().is_some());
        sim.submit_input(token).unwrap();
    }

    assert!(sim.is_finished());
    assert_eq!(number(&sim, "a"), Some(9.0));
    assert_eq!(number(&sim, "i"), Some(2.0));
}

#[test]
fn test_inline_statements_after_input_are_skipped_for_that_iteration() {
    let mut sim = Simulator::from_source(
        "int s = 0;\nfor (i = 0; i < 2; i++) { cin >> x; s = s + x; }\nprintf(\"%d\", s);",
    );
    sim.step_forward().unwrap();
    sim.step_forward().unwrap();

    for _ in 0..2 {
        sim.step_forward().unwrap();
        assert!(sim.pending_input().is_some());
        sim.submit_input("5").unwrap();
    }
    assert_eq!(sim.position(), Some(2));

    run_to_end(&mut sim);

    assert_eq!(number(&sim, "x"), Some(5.0));
    assert_eq!(number(&sim, "s"), Some(0.0));
    assert_eq!(number(&sim, "i"), Some(2.0));
    assert_eq!(sim.output().text(), "0");
}

#[test]
fn test_loops_closed_by_double_brace() {
    let source = "\
int t = 0;
for (i = 0; i < 2; i++) {
  for (j = 0; j < 2; j++) {
    t++;
}}";
    let mut sim = Simulator::from_source(source);
    assert!(sim.loop_table().unmatched().is_empty());

    run_to_end(&mut sim);

    assert_eq!(number(&sim, "t"), Some(4.0));
    assert!(sim.is_finished());
    assert!(sim.loop_stack().is_empty());
}

#[test]
fn test_unmatched_brace_runs_header_as_plain_line() {
    let mut sim = Simulator::from_source("for (int i = 0; i < 3; i++) {\nx = 1;");
    assert_eq!(sim.loop_table().unmatched().to_vec(), vec![0]);
    assert!(sim.loop_table().is_empty());

    let steps = run_to_end(&mut sim);

    assert_eq!(steps, 2);
    assert_eq!(number(&sim, "x"), Some(1.0));
    assert!(sim.variables().get("i").is_none());
}

#[test]
fn test_scanf_reuses_last_token() {
    let mut sim = Simulator::from_source("scanf(\"%d %d\", &a, &b);\nc = a + b;");
    sim.step_forward().unwrap();

    let request = sim.pending_input().expect("input request");
    assert_eq!(request.variables, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(request.description, "scanf(\"%d %d\") → a, b");
    assert_eq!(sim.step_forward(), Err(SimError::AwaitingInput));

    sim.submit_input("3").unwrap();
    assert_eq!(number(&sim, "a"), Some(3.0));
    assert_eq!(number(&sim, "b"), Some(3.0));
    assert_eq!(
        sim.log().last().map(|e| e.message.as_str()),
        Some("User input: a=3, b=3")
    );

    sim.step_forward().unwrap();
    assert_eq!(number(&sim, "c"), Some(6.0));
    assert!(sim.is_finished());
}

#[test]
fn test_blank_input_reads_as_zero() {
    let mut sim = Simulator::from_source("cin >> a >> b;");
    sim.step_forward().unwrap();

    sim.submit_input("   ").unwrap();

    assert_eq!(sim.variables().get("a"), Some(&Value::Number(0.0)));
    assert_eq!(sim.variables().get("b"), Some(&Value::Number(0.0)));
    assert!(sim.is_finished());
}

#[test]
fn test_extra_tokens_are_ignored_and_text_is_kept() {
    let mut sim = Simulator::from_source("cin >> a >> b;");
    sim.step_forward().unwrap();

    sim.submit_input("  4  five 6").unwrap();

    assert_eq!(sim.variables().get("a"), Some(&Value::Number(4.0)));
    assert_eq!(sim.variables().get("b"), Some(&Value::Text("five".to_string())));
}

#[test]
fn test_submit_without_request_is_refused() {
    let mut sim = Simulator::from_source("x = 1;");
    let before = sim.state().clone();
    assert_eq!(sim.submit_input("5"), Err(SimError::NoPendingInput));
    assert_eq!(sim.state(), &before);
}

#[test]
fn test_rewinding_past_answered_input_asks_again() {
    let mut sim = Simulator::from_source("int n = sc.nextInt();\nn = n * 2;");
    sim.step_forward().unwrap();
    sim.submit_input("12").unwrap();

    sim.step_backward().unwrap();

    let request = sim.pending_input().expect("request restored");
    assert_eq!(request.description, "Scanner input for n");
    assert!(sim.variables().get("n").is_none());
    assert_eq!(sim.step_backward(), Err(SimError::AwaitingInput));
}

#[test]
fn test_input_syntaxes_across_languages() {
    let source = "\
Scanner sc = new Scanner(System.in);
int n = sc.nextInt();
let age = prompt(\"Age?\");
name = input(\"Name: \")
print(\"Hi\", name, n + age)";
    let mut sim = Simulator::from_source(source);

    sim.step_forward().unwrap();
    assert!(sim.pending_input().is_none());

    sim.step_forward().unwrap();
    sim.submit_input("12").unwrap();

    sim.step_forward().unwrap();
    assert_eq!(
        sim.pending_input().map(|r| r.description.as_str()),
        Some("prompt(): Age?")
    );
    sim.submit_input("30").unwrap();

    sim.step_forward().unwrap();
    sim.submit_input("Ada").unwrap();

    sim.step_forward().unwrap();
    assert_eq!(sim.output().text(), "Hi Ada 42\n");
    assert!(sim.is_finished());
}

#[test]
fn test_output_order_and_formatting() {
    let source = "\
printf(\"a\");
printf(\"b\");
printf(\"%d-%d\", 2, 3);
cout << \" x=\" << 7 << endl;
System.out.println(\"done\");";
    let mut sim = Simulator::from_source(source);

    run_to_end(&mut sim);

    assert_eq!(sim.output().fragments()[..2].to_vec(), vec!["a", "b"]);
    assert_eq!(sim.output().text(), "ab2-3 x=7\ndone\n");
    assert_eq!(sim.output().lines(), vec!["ab2-3 x=7", "done"]);
}

#[test]
fn test_statements_sharing_a_line_run_in_one_step() {
    let mut sim = Simulator::from_source("printf(\"a\"); printf(\"b\");\nint n = 1; n++;");

    sim.step_forward().unwrap();
    assert_eq!(sim.output().text(), "ab");
    assert_eq!(sim.log().iter().filter(|e| e.line == 1).count(), 2);

    sim.step_forward().unwrap();
    assert!(sim.is_finished());
    assert_eq!(number(&sim, "n"), Some(2.0));
}

#[test]
fn test_bare_console_log_prints_nothing() {
    let mut sim = Simulator::from_source("console.log();\nprint()");
    run_to_end(&mut sim);
    assert_eq!(sim.output().text(), "\n");
    assert_eq!(sim.output().fragments().len(), 1);
    assert_eq!(messages(&sim)[0], "Output: nothing printed.");
}

#[test]
fn test_console_log_joins_arguments() {
    let mut sim = Simulator::from_source("let x = 4;\nconsole.log(\"x is\", x * 2);");
    run_to_end(&mut sim);
    assert_eq!(sim.output().text(), "x is 8\n");
    assert_eq!(
        sim.log().last().map(|e| e.message.as_str()),
        Some("Output: x is 8\\n")
    );
}

#[test]
fn test_run_to_line_stops_at_target() {
    let mut sim = Simulator::from_source(SUM_LOOP);
    sim.step_forward().unwrap();

    sim.run_to_line(4).unwrap();

    assert_eq!(sim.position(), Some(4));
    assert_eq!(number(&sim, "sum"), Some(10.0));
    assert!(sim.output().is_empty());
    assert!(!sim.is_finished());
    assert_eq!(sim.history().len(), 8);
}

#[test]
fn test_run_to_line_stops_for_input() {
    let mut sim = Simulator::from_source("x = 1;\ncin >> a;\ny = 2;");

    sim.run_to_line(2).unwrap();
    assert_eq!(sim.position(), Some(1));
    assert!(sim.pending_input().is_some());

    assert_eq!(sim.run_to_line(2), Err(SimError::AwaitingInput));
}

#[test]
fn test_run_to_line_respects_step_limit() {
    let record = ProgramRecord {
        code: SUM_LOOP.to_string(),
        ..Default::default()
    };
    let config = SimulatorConfig {
        step_limit: Some(3),
        ..Default::default()
    };
    let mut sim = Simulator::new(record, config);

    assert_eq!(
        sim.run_to_line(4),
        Err(SimError::StepLimitReached { limit: 3 })
    );
    assert_eq!(sim.history().len(), 4);
}

#[test]
fn test_current_line_description() {
    let mut sim = Simulator::from_source("int sum = 0;\n\tsum++;");
    assert_eq!(sim.current_line_description(), "Line 1: int sum = 0;");
    sim.step_forward().unwrap();
    assert_eq!(sim.current_line_description(), "Line 2: sum++;");
    sim.step_forward().unwrap();
    assert_eq!(sim.current_line_description(), "Program finished.");
}

#[test]
fn test_tabs_expand_to_configured_width() {
    let record = ProgramRecord {
        code: "\tx = 1;".to_string(),
        ..Default::default()
    };
    let sim = Simulator::new(
        record,
        SimulatorConfig {
            tab_width: 2,
            ..Default::default()
        },
    );
    assert_eq!(sim.program().line(0), Some("  x = 1;"));
}

#[test]
fn test_comments_and_braces_change_nothing() {
    let source = "// setup\nint x = 3; // three\n{\n# python style\n}\nx = x + 1;";
    let mut sim = Simulator::from_source(source);

    run_to_end(&mut sim);

    assert_eq!(number(&sim, "x"), Some(4.0));
    assert_eq!(sim.log().len(), 6);
    assert_eq!(messages(&sim)[0], "Blank or comment line.");
    assert_eq!(messages(&sim)[2], "Block delimiter.");
}

#[test]
fn test_unparseable_condition_fails_open() {
    let source = "for (int i = 0; i < limit; i++) {\n    i = i + 1;\n}";
    let config = SimulatorConfig {
        step_limit: Some(20),
        ..Default::default()
    };
    let mut sim = Simulator::new(
        ProgramRecord {
            code: source.to_string(),
            ..Default::default()
        },
        config,
    );

    let steps = run_to_end(&mut sim);

    assert_eq!(steps, 20);
    assert!(!sim.is_finished());
    assert_eq!(sim.loop_stack().len(), 1);
}
