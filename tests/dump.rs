mod common;

use common::{capture, indent_of, message_of};
use indentwise::{DepthGuard, Dumper, IndentConfig, Value};

fn sample() -> Value {
    Value::map([
        ("name", Value::from("primary")),
        ("password", Value::from("hunter2")),
        (
            "replicas",
            Value::list([
                Value::map([("host", Value::from("r1")), ("password", Value::from("x"))]),
                Value::map([("host", Value::from("r2"))]),
            ]),
        ),
    ])
}

#[test]
fn dump_macro_lays_out_by_nesting() {
    let value = sample();
    let lines = capture(IndentConfig::new(), || {
        // tracked depth has no effect on dump lines
        let _guard = DepthGuard::enter("busy");
        indentwise::dump!(&value, Dumper::new().with_name("db").exclude("password"));
    });
    let rendered: Vec<_> = lines.iter().map(|l| (indent_of(l) / 4, message_of(l))).collect();
    assert_eq!(
        rendered,
        vec![
            (0, "db:"),
            (1, "name: primary"),
            (1, "replicas: List of length 2"),
            (2, "[0]:"),
            (3, "host: r1"),
            (2, "[1]:"),
            (3, "host: r2"),
        ]
    );
    assert!(lines.iter().all(|l| l.starts_with("DEBUG")));
}

#[test]
fn dump_function_with_base_depth() {
    let value = sample();
    let lines = capture(IndentConfig::new(), || {
        indentwise::dump(&value, 2, &["replicas", "password"], false);
    });
    let rendered: Vec<_> = lines.iter().map(|l| (indent_of(l), message_of(l))).collect();
    assert_eq!(rendered, vec![(8, "name: primary")]);
}

#[test]
fn cyclic_value_dumps_once() {
    let node = Value::map([("id", Value::from(1u32))]);
    let children = Value::list([]);
    node.insert("children", children.clone());
    children.push(node.clone());

    let lines = capture(IndentConfig::new(), || {
        indentwise::dump!(&node, Dumper::new().with_name("node"));
    });
    let markers = lines
        .iter()
        .filter(|l| l.ends_with("<Recursion detected>"))
        .count();
    assert_eq!(markers, 1);
    assert_eq!(lines.len(), 4);
    assert_eq!(message_of(&lines[3]), "[0]: <Recursion detected>");
    assert_eq!(indent_of(&lines[3]), 8);
}

#[test]
fn serializable_structs_are_dumped_by_field() {
    #[derive(serde::Serialize)]
    struct Job {
        id: u32,
        steps: Vec<String>,
    }
    let job = Job {
        id: 7,
        steps: vec!["fetch".to_string(), "build".to_string()],
    };
    let lines = capture(IndentConfig::new(), || {
        indentwise::dump!(&Value::from_serialize(&job), Dumper::new().with_name("job"));
    });
    let rendered: Vec<_> = lines.iter().map(|l| (indent_of(l) / 4, message_of(l))).collect();
    assert_eq!(
        rendered,
        vec![
            (0, "job:"),
            (1, "id: 7"),
            (1, "steps: List of length 2"),
            (2, "[0]: fetch"),
            (2, "[1]: build"),
        ]
    );
}
