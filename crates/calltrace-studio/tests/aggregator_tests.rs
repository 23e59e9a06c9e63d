use calltrace_studio::aggregator::{
    build_collapsed_stacks, build_thread_stacks, calculate_hot_paths, calculate_time_distribution,
    summarize_counters, summarize_threads, CollapsedStack,
};
use calltrace_studio::parser::TraceParser;
use calltrace_studio::recording::Recording;
use pretty_assertions::assert_eq;
use std::io::Cursor;

fn recording_from(trace: &str) -> Recording {
    let mut recording = Recording::new();
    TraceParser::new(&mut recording)
        .load_reader(Cursor::new(trace))
        .unwrap();
    recording
}

const FRAME_TRACE: &str = "\
T 1 main
F 1 1 frame
F 1 2 update
F 1 3 render
S 1 1 0
S 1 2 10
E 1 2 40
S 1 3 40
E 1 3 90
E 1 1 100
S 1 1 100
S 1 2 110
E 1 2 130
E 1 1 150
";

#[test]
fn test_collapsed_stacks_use_self_time() {
    let recording = recording_from(FRAME_TRACE);
    let stacks = build_collapsed_stacks(&recording);

    assert_eq!(
        stacks,
        vec![
            CollapsedStack::new("main;frame".to_string(), 50, 2),
            CollapsedStack::new("main;frame;render".to_string(), 50, 1),
            CollapsedStack::new("main;frame;update".to_string(), 50, 2),
        ]
    );
}

#[test]
fn test_open_calls_weigh_nothing_but_name_children() {
    let recording = recording_from("T 1 main\nF 1 1 outer\nF 1 2 inner\nS 1 1 0\nS 1 2 5\nE 1 2 8\n");
    let stacks = build_collapsed_stacks(&recording);

    assert_eq!(
        stacks,
        vec![
            CollapsedStack::new("main;outer;inner".to_string(), 3, 1),
            CollapsedStack::new("main;outer".to_string(), 0, 0),
        ]
    );
}

#[test]
fn test_separator_in_labels_is_replaced() {
    let recording = recording_from("T 1 a;b\nF 1 1 ns;fn\nS 1 1 0\nE 1 1 1\n");
    let stacks = build_thread_stacks(&recording.threads()[0]);

    assert_eq!(stacks[0].stack, "a:b;ns:fn");
    assert_eq!(stacks[0].leaf(), "ns:fn");
}

#[test]
fn test_hot_paths_percentages() {
    let recording = recording_from(FRAME_TRACE);
    let stacks = build_collapsed_stacks(&recording);
    let hot_paths = calculate_hot_paths(&stacks, 2);

    assert_eq!(hot_paths.len(), 2);
    assert_eq!(hot_paths[0].stack, "main;frame");
    assert_eq!(hot_paths[0].time, 50);
    assert!((hot_paths[0].percentage - 100.0 / 3.0).abs() < 1e-9);
    assert_eq!(hot_paths[1].stack, "main;frame;render");
    assert_eq!(hot_paths[1].calls, 1);
}

#[test]
fn test_hot_paths_zero_total() {
    let stacks = vec![CollapsedStack::new("main;idle".to_string(), 0, 0)];
    let hot_paths = calculate_hot_paths(&stacks, 10);

    assert_eq!(hot_paths.len(), 1);
    assert_eq!(hot_paths[0].percentage, 0.0);
}

#[test]
fn test_time_distribution() {
    let stacks = vec![
        CollapsedStack::new("a;x".to_string(), 70, 1),
        CollapsedStack::new("a;y".to_string(), 20, 1),
        CollapsedStack::new("a;z".to_string(), 10, 1),
    ];
    let dist = calculate_time_distribution(&stacks);

    assert_eq!(dist.total_time, 100);
    assert_eq!(dist.stack_count, 3);
    assert_eq!(dist.mean_time_per_stack, 33);
    assert_eq!(dist.median_time_per_stack, 20);
    assert!((dist.top_10_percent_percentage - 70.0).abs() < 1e-9);
    assert!(dist.summary().contains("Total: 100"));
}

#[test]
fn test_time_distribution_empty() {
    let dist = calculate_time_distribution(&[]);
    assert_eq!(dist.total_time, 0);
    assert_eq!(dist.stack_count, 0);
}

#[test]
fn test_thread_summaries() {
    let recording = recording_from(
        "T 1 main\nF 1 1 frame\nF 1 2 update\nV 1 5 vsync\n\
         S 1 1 0\nS 1 2 10\nE 1 2 40\nE 1 1 100\nY 1 5 100\nS 1 1 120\n",
    );
    let summaries = summarize_threads(&recording);

    assert_eq!(summaries.len(), 1);
    let main = &summaries[0];
    assert_eq!(main.id, 1);
    assert_eq!(main.label, "main");
    assert_eq!(main.start_time, Some(0));
    assert_eq!(main.finish_time, Some(100));
    assert_eq!(main.max_stack_depth, 2);
    assert_eq!(main.max_child_call_stack_depth, 1);
    assert_eq!(main.call_count, 3);
    assert_eq!(main.top_level_calls, 2);
    assert_eq!(main.open_calls, 1);
    assert_eq!(main.busy_time, 100);
    assert_eq!(main.event_count, 1);
}

#[test]
fn test_thread_summary_reports_child_depth() {
    let recording = recording_from(
        "T 1 main\nF 1 1 a\nF 1 2 b\nF 1 3 c\n\
         S 1 1 0\nE 1 1 5\n\
         S 1 1 10\nS 1 2 11\nS 1 3 12\nE 1 3 13\nE 1 2 14\nE 1 1 15\n",
    );
    let summary = &summarize_threads(&recording)[0];

    assert_eq!(summary.max_child_call_stack_depth, 2);
    assert_eq!(summary.max_stack_depth, 3);

    let json = serde_json::to_string(summary).unwrap();
    assert!(json.contains("\"max_child_call_stack_depth\":2"));
}

#[test]
fn test_counter_summaries() {
    let mut recording = Recording::new();
    recording.declare_counter(9, "heap");
    recording.counter_sample(9, 1, 3.0).unwrap();
    recording.counter_sample(9, 2, -2.0).unwrap();
    recording.declare_counter(10, "unused");

    let summaries = summarize_counters(&recording);

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].label, "heap");
    assert_eq!(summaries[0].samples, 2);
    assert_eq!(summaries[0].max_value, 3.0);
    assert_eq!(summaries[0].min_value, -2.0);
    assert_eq!(summaries[0].last_value, Some(-2.0));
    assert_eq!(summaries[1].samples, 0);
    assert_eq!(summaries[1].min_value, 0.0);
    assert_eq!(summaries[1].last_value, None);
}
