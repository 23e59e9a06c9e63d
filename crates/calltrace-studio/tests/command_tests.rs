use calltrace_studio::commands::{
    execute_analyze, execute_inspect, validate_args, validate_report_file, AnalyzeArgs,
    InspectArgs,
};
use calltrace_studio::flamegraph::FlamegraphConfig;
use calltrace_studio::output::read_report;
use std::path::PathBuf;
use tempfile::TempDir;

const TRACE: &str = "\
T 1 main
F 1 1 frame
F 1 2 update
S 1 1 0
S 1 2 10
E 1 2 40
E 1 1 100
T 2 main
F 2 1 frame
S 2 1 120
E 2 1 150
";

fn trace_dir() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.txt");
    std::fs::write(&path, TRACE).unwrap();
    (dir, path)
}

#[test]
fn test_validate_args_valid() {
    let (_dir, input) = trace_dir();
    let args = AnalyzeArgs {
        input,
        ..Default::default()
    };

    assert!(validate_args(&args).is_ok());
}

#[test]
fn test_validate_args_missing_input() {
    let args = AnalyzeArgs {
        input: PathBuf::from("/nonexistent/trace.txt"),
        ..Default::default()
    };

    assert!(validate_args(&args).is_err());
}

#[test]
fn test_validate_args_input_is_directory() {
    let dir = tempfile::tempdir().unwrap();
    let args = AnalyzeArgs {
        input: dir.path().to_path_buf(),
        ..Default::default()
    };

    assert!(validate_args(&args).is_err());
}

#[test]
fn test_validate_args_top_paths_bounds() {
    let (_dir, input) = trace_dir();

    let zero = AnalyzeArgs {
        input: input.clone(),
        top_paths: 0,
        ..Default::default()
    };
    assert!(validate_args(&zero).is_err());

    let too_many = AnalyzeArgs {
        input: input.clone(),
        top_paths: 1001,
        ..Default::default()
    };
    assert!(validate_args(&too_many).is_err());

    let max = AnalyzeArgs {
        input,
        top_paths: 1000,
        ..Default::default()
    };
    assert!(validate_args(&max).is_ok());
}

#[test]
fn test_validate_args_narrow_flamegraph() {
    let (dir, input) = trace_dir();
    let args = AnalyzeArgs {
        input,
        output_svg: Some(dir.path().join("flamegraph.svg")),
        flamegraph_config: FlamegraphConfig::new().with_width(50),
        ..Default::default()
    };

    assert!(validate_args(&args).is_err());
}

#[test]
fn test_execute_analyze_writes_outputs() {
    let (dir, input) = trace_dir();
    let json_path = dir.path().join("out/report.json");
    let svg_path = dir.path().join("out/flamegraph.svg");

    let report = execute_analyze(AnalyzeArgs {
        input,
        output_json: Some(json_path.clone()),
        output_svg: Some(svg_path.clone()),
        ..Default::default()
    })
    .unwrap();

    assert!(report.merged_threads);
    assert_eq!(report.threads.len(), 1);
    assert_eq!(report.threads[0].call_count, 3);
    assert_eq!(report.finish_time, Some(150));
    assert_eq!(report.hot_paths[0].stack, "main;frame");
    assert_eq!(report.hot_paths[0].time, 100);

    let written = read_report(&json_path).unwrap();
    assert_eq!(written.threads, report.threads);
    assert_eq!(written.hot_paths.len(), report.hot_paths.len());
    assert!(std::fs::read_to_string(&svg_path)
        .unwrap()
        .starts_with("<svg"));

    validate_report_file(json_path).unwrap();
}

#[test]
fn test_execute_analyze_without_merge() {
    let (_dir, input) = trace_dir();

    let report = execute_analyze(AnalyzeArgs {
        input,
        output_json: None,
        merge_threads: false,
        ..Default::default()
    })
    .unwrap();

    assert!(!report.merged_threads);
    assert_eq!(report.threads.len(), 2);
    assert_eq!(report.total_calls(), 3);
}

#[test]
fn test_execute_analyze_bad_trace() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.txt");
    std::fs::write(&input, "T 1 main\nE 1 1 5\n").unwrap();

    let err = execute_analyze(AnalyzeArgs {
        input,
        output_json: None,
        ..Default::default()
    })
    .unwrap_err();

    assert!(format!("{:#}", err).contains("no open call"));
}

#[test]
fn test_execute_inspect() {
    let (_dir, input) = trace_dir();

    assert!(execute_inspect(InspectArgs {
        input,
        show_calls: true,
        ..Default::default()
    })
    .is_ok());
}

#[test]
fn test_validate_report_file_rejects_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    std::fs::write(&path, "[]").unwrap();

    assert!(validate_report_file(path).is_err());
}
