#![cfg(unix)]

mod utils;

use moon_nx_compat::executor_invoker::{ExecutorInvoker, NodeExecutorInvoker};
use moon_nx_compat::executor_resolver::{ExecutorIdentifier, ResolvedExecutor};
use moon_nx_compat::moon::ProjectGraph;
use moon_nx_compat::nx::ExecutorContext;
use moon_nx_compat::nx_converter::project_graph_to_nx_project_graph;
use moon_nx_compat::NxCompatError;
use serde_json::{json, Value as JsonValue};
use starbase_sandbox::{create_empty_sandbox, Sandbox};
use std::process::Command;
use utils::*;

fn has_node() -> bool {
    Command::new("node")
        .arg("--version")
        .output()
        .is_ok_and(|output| output.status.success())
}

macro_rules! require_node {
    () => {
        if !has_node() {
            eprintln!("Skipping, node is not available");
            return;
        }
    };
}

fn create_executor(sandbox: &Sandbox, file: &str, export_name: &str) -> ResolvedExecutor {
    ResolvedExecutor {
        export_name: export_name.into(),
        identifier: ExecutorIdentifier::parse("@acme/tools:build").unwrap(),
        module_path: sandbox.path().join(file),
        schema_path: None,
    }
}

fn create_context(sandbox: &Sandbox) -> ExecutorContext {
    let graph: ProjectGraph = serde_json::from_str(PROJECT_GRAPH).unwrap();

    ExecutorContext {
        cwd: sandbox.path().to_path_buf(),
        project_graph: project_graph_to_nx_project_graph(&graph),
        project_name: "app".into(),
        root: sandbox.path().to_path_buf(),
        target_name: "build".into(),
        ..ExecutorContext::default()
    }
}

async fn invoke(
    sandbox: &Sandbox,
    executor: &ResolvedExecutor,
    options: JsonValue,
) -> Result<JsonValue, NxCompatError> {
    let JsonValue::Object(options) = options else {
        panic!("Options must be an object");
    };

    NodeExecutorInvoker::new("node", sandbox.path())
        .invoke(executor, &options, &create_context(sandbox))
        .await
        .map(|outcome| outcome.result)
}

#[tokio::test]
async fn calls_default_export_with_options_and_context() {
    require_node!();

    let sandbox = create_empty_sandbox();
    sandbox.create_file(
        "impl.mjs",
        r#"export default async function (options, context) {
  return { success: true, port: options.port, project: context.projectName };
}"#,
    );

    let result = invoke(
        &sandbox,
        &create_executor(&sandbox, "impl.mjs", "default"),
        json!({ "port": 4200 }),
    )
    .await
    .unwrap();

    assert_eq!(result, json!({ "success": true, "port": 4200, "project": "app" }));
}

#[tokio::test]
async fn aliases_reference_the_same_node() {
    require_node!();

    let sandbox = create_empty_sandbox();
    sandbox.create_file(
        "impl.mjs",
        r#"export default async function (options, context) {
  const { nodes } = context.projectGraph;
  return { success: nodes['app'] === nodes['@acme/app'], names: Object.keys(nodes).sort() };
}"#,
    );

    let result = invoke(
        &sandbox,
        &create_executor(&sandbox, "impl.mjs", "default"),
        json!({}),
    )
    .await
    .unwrap();

    assert_eq!(
        result,
        json!({ "success": true, "names": ["@acme/app", "app", "e2e", "lib"] })
    );
}

#[tokio::test]
async fn calls_named_export() {
    require_node!();

    let sandbox = create_empty_sandbox();
    sandbox.create_file(
        "impl.js",
        r#"exports.default = async () => ({ success: false });
exports.buildExecutor = async () => ({ success: true, named: true });"#,
    );

    let result = invoke(
        &sandbox,
        &create_executor(&sandbox, "impl.js", "buildExecutor"),
        json!({}),
    )
    .await
    .unwrap();

    assert_eq!(result, json!({ "success": true, "named": true }));
}

#[tokio::test]
async fn unwraps_commonjs_default_export() {
    require_node!();

    let sandbox = create_empty_sandbox();
    // Assigned dynamically so named exports can't be detected statically
    sandbox.create_file(
        "impl.cjs",
        r#"const executors = {};
executors['build' + 'Executor'] = async () => ({ success: true, cjs: true });
module.exports = executors;"#,
    );

    let result = invoke(
        &sandbox,
        &create_executor(&sandbox, "impl.cjs", "buildExecutor"),
        json!({}),
    )
    .await
    .unwrap();

    assert_eq!(result, json!({ "success": true, "cjs": true }));
}

#[tokio::test]
async fn uses_last_value_of_async_generators() {
    require_node!();

    let sandbox = create_empty_sandbox();
    sandbox.create_file(
        "impl.mjs",
        r#"export default async function* () {
  yield { success: true };
  yield { success: false, last: true };
}"#,
    );

    let result = invoke(
        &sandbox,
        &create_executor(&sandbox, "impl.mjs", "default"),
        json!({}),
    )
    .await
    .unwrap();

    assert_eq!(result, json!({ "success": false, "last": true }));
}

#[tokio::test]
async fn undefined_result_is_null() {
    require_node!();

    let sandbox = create_empty_sandbox();
    sandbox.create_file("impl.mjs", "export default async function () {}");

    let result = invoke(
        &sandbox,
        &create_executor(&sandbox, "impl.mjs", "default"),
        json!({}),
    )
    .await
    .unwrap();

    assert_eq!(result, JsonValue::Null);
}

#[tokio::test]
async fn errors_for_missing_export() {
    require_node!();

    let sandbox = create_empty_sandbox();
    sandbox.create_file("impl.mjs", "export const other = () => {};");

    let error = invoke(
        &sandbox,
        &create_executor(&sandbox, "impl.mjs", "default"),
        json!({}),
    )
    .await
    .unwrap_err();

    assert!(matches!(error, NxCompatError::MissingExport { export, .. } if export == "default"));
}

#[tokio::test]
async fn errors_for_non_function_export() {
    require_node!();

    let sandbox = create_empty_sandbox();
    sandbox.create_file("impl.mjs", "export const build = { success: true };");

    let error = invoke(
        &sandbox,
        &create_executor(&sandbox, "impl.mjs", "build"),
        json!({}),
    )
    .await
    .unwrap_err();

    assert!(matches!(error, NxCompatError::MissingExport { export, .. } if export == "build"));
}

#[tokio::test]
async fn executor_exit_codes_are_failures() {
    require_node!();

    let sandbox = create_empty_sandbox();
    sandbox.create_file(
        "impl.mjs",
        "export default async function () { process.exit(3); }",
    );

    let error = invoke(
        &sandbox,
        &create_executor(&sandbox, "impl.mjs", "default"),
        json!({}),
    )
    .await
    .unwrap_err();

    assert!(matches!(error, NxCompatError::ExecutorFailed { code: 3, .. }));
}

#[tokio::test]
async fn thrown_errors_are_failures() {
    require_node!();

    let sandbox = create_empty_sandbox();
    sandbox.create_file(
        "impl.mjs",
        "export default async function () { throw new Error('boom'); }",
    );

    let error = invoke(
        &sandbox,
        &create_executor(&sandbox, "impl.mjs", "default"),
        json!({}),
    )
    .await
    .unwrap_err();

    assert!(matches!(error, NxCompatError::ExecutorFailed { code: 1, .. }));
}
