use structural_map::shell::{Session, ShellConfig, ShellError};
use structural_map::{MapError, Value};

fn session() -> Session {
    let _ = env_logger::try_init();
    Session::default()
}

fn run(session: &mut Session, line: &str) -> String {
    println!("Eval: {line}");
    session.eval_line(line).unwrap()
}

#[test]
fn test_insert_and_get() {
    let mut s = session();
    assert_eq!(run(&mut s, "insert #(1, 'a') :x"), "");
    assert_eq!(run(&mut s, "get #(1, \"a\")"), ":x");
    assert_eq!(run(&mut s, "get :missing"), "key not found: :missing");
    assert_eq!(run(&mut s, "has #(1, 'a')"), "True");
    assert_eq!(run(&mut s, "size"), "1");
}

#[test]
fn test_aliases_share_a_command() {
    let mut s = session();
    run(&mut s, "set :a 1");
    assert_eq!(run(&mut s, "len"), "1");
    run(&mut s, "del :a");
    assert_eq!(run(&mut s, "size"), "0");
}

#[test]
fn test_load_take_drop() {
    let mut s = session();
    run(&mut s, "load [#(:a, 1), #(:b, 2), #(:c, 3)]");
    assert_eq!(run(&mut s, "size"), "3");

    assert_eq!(
        run(&mut s, "take :b :nope"),
        "map.from_list([#(:b, 2)])"
    );
    assert_eq!(run(&mut s, "size"), "3");

    run(&mut s, "drop :a :c");
    assert_eq!(run(&mut s, "list"), "[#(:b, 2)]");
    assert_eq!(run(&mut s, "keys"), "[:b]");
    assert_eq!(run(&mut s, "values"), "[2]");
}

#[test]
fn test_merge_and_incr() {
    let mut s = session();
    run(&mut s, "insert 'hits' 1");
    run(&mut s, "merge [#('hits', 5), #('misses', 0)]");
    assert_eq!(run(&mut s, "get 'hits'"), "5");

    assert_eq!(run(&mut s, "incr 'hits' 10"), "15");
    assert_eq!(run(&mut s, "incr 'new' -2"), "-2");
    assert_eq!(run(&mut s, "size"), "3");

    run(&mut s, "clear");
    assert_eq!(run(&mut s, "show"), "map.from_list([])");
}

#[test]
fn test_incr_overflow_is_an_error() {
    let mut s = session();
    run(&mut s, &format!("insert :a {}", isize::MAX));

    assert!(matches!(
        s.eval_line("incr :a 1"),
        Err(ShellError::Overflow { amount: 1, .. })
    ));
    assert_eq!(run(&mut s, "get :a"), isize::MAX.to_string());
    assert_eq!(run(&mut s, "incr :a -1"), (isize::MAX - 1).to_string());
}

#[test]
fn test_errors_leave_the_session_usable() {
    let mut s = session();
    run(&mut s, "insert :name 'x'");

    assert!(matches!(
        s.eval_line("frobnicate"),
        Err(ShellError::UnknownCommand(_))
    ));
    assert!(matches!(
        s.eval_line("get :a :b"),
        Err(ShellError::Arity { arity: 1, num_args_provided: 2, .. })
    ));
    assert!(matches!(
        s.eval_line("get [1, 2"),
        Err(ShellError::Parse(_))
    ));
    assert!(matches!(
        s.eval_line("load [1, 2]"),
        Err(ShellError::Map(MapError::MalformedSequence { .. }))
    ));
    assert!(matches!(
        s.eval_line("incr :name 1"),
        Err(ShellError::Type { .. })
    ));

    // the failed `load` did not replace the map
    assert_eq!(s.map.get(&Value::keyword("name")), Ok(Value::from("x")));
}

#[test]
fn test_help_lists_each_command_once() {
    let mut s = session();
    let help = run(&mut s, "help");

    assert!(help.contains("insert key value"));
    assert!(help.contains("drop key..."));
    assert_eq!(help.lines().filter(|l| l.starts_with("size")).count(), 1);
}

#[test]
fn test_editor_config_follows_shell_config() {
    let config = ShellConfig {
        tab_stop: 4,
        ..ShellConfig::default()
    };
    assert_eq!(config.editor_config().tab_stop(), 4);
    assert_eq!(ShellConfig::default().editor_config().tab_stop(), 2);
}
