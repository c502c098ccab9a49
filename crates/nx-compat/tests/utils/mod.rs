#![allow(dead_code)]

use moon_nx_compat::env::AdapterEnv;
use starbase_sandbox::Sandbox;
use std::fs;
use std::path::PathBuf;

pub const PROJECT_GRAPH: &str = r#"{
  "graph": {
    "nodes": ["app", "lib", "e2e"],
    "node_holes": [],
    "edge_property": "directed",
    "edges": [[0, 1, null], [2, 0, null], [2, 9, null]]
  },
  "projects": {
    "app": {
      "id": "app",
      "alias": "@acme/app",
      "source": "apps/app",
      "type": "application",
      "config": { "tags": ["frontend"] },
      "dependencies": [
        { "id": "lib", "scope": "production", "source": "explicit" },
        { "id": "types", "scope": "development", "source": "implicit" }
      ],
      "fileGroups": {
        "sources": { "files": ["apps/app/package.json"], "globs": ["apps/app/src/**/*"] }
      },
      "tasks": {
        "build": {
          "command": "nx-compat",
          "deps": ["lib:build"],
          "inputFiles": ["apps/app/package.json"],
          "inputGlobs": ["apps/app/src/**/*"],
          "inputVars": ["NODE_ENV"],
          "outputFiles": ["apps/app/dist"],
          "outputGlobs": [],
          "options": { "cache": true }
        }
      }
    },
    "lib": {
      "id": "lib",
      "source": "packages/lib",
      "type": "library",
      "tasks": {
        "build": {
          "command": "tsc",
          "outputFiles": ["packages/lib/lib"],
          "options": { "cache": false }
        }
      }
    },
    "e2e": {
      "id": "e2e",
      "source": "apps/e2e",
      "type": "automation",
      "tasks": {}
    }
  }
}"#;

pub const ACTION_GRAPH: &str = r#"{
  "nodes": [
    { "id": 0, "label": "SyncWorkspace" },
    { "id": 1, "label": "SetupToolchain(node)" },
    { "id": 2, "label": "RunTask(lib:build)" },
    { "id": 3, "label": "RunTask(app:build)" },
    { "id": 4, "label": "SyncProject(app)" }
  ],
  "edges": [
    { "id": "2 -> 1", "source": 2, "target": 1 },
    { "id": "3 -> 2", "source": 3, "target": 2 },
    { "id": "4 -> 1", "source": 4, "target": 1 }
  ]
}"#;

/// Create a fake `moon` binary that serves graph JSON from files next to it,
/// and records every invocation in `calls.log`.
#[cfg(unix)]
pub fn create_moon_bin(sandbox: &Sandbox) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    sandbox.create_file(".bin/project-graph.json", PROJECT_GRAPH);
    sandbox.create_file(".bin/action-graph.json", ACTION_GRAPH);
    sandbox.create_file(
        ".bin/moon",
        r#"#!/bin/sh
dir="$(dirname "$0")"
echo "$*" >> "$dir/calls.log"
case "$1" in
  project-graph) cat "$dir/project-graph.json" ;;
  action-graph) cat "$dir/action-graph.json" ;;
  *) echo "unknown command $1" >&2; exit 1 ;;
esac
"#,
    );

    let bin = sandbox.path().join(".bin/moon");

    fs::set_permissions(&bin, fs::Permissions::from_mode(0o755)).unwrap();

    bin
}

pub fn read_calls(sandbox: &Sandbox) -> Vec<String> {
    fs::read_to_string(sandbox.path().join(".bin/calls.log"))
        .unwrap_or_default()
        .lines()
        .map(|line| line.to_owned())
        .collect()
}

pub fn create_snapshot(sandbox: &Sandbox) -> PathBuf {
    let graph: serde_json::Value = serde_json::from_str(PROJECT_GRAPH).unwrap();

    sandbox.create_file(
        ".moon/cache/states/app/snapshot.json",
        serde_json::to_string(&graph["projects"]["app"]).unwrap(),
    );

    sandbox.path().join(".moon/cache/states/app/snapshot.json")
}

pub fn create_env(sandbox: &Sandbox, moon_bin: PathBuf) -> AdapterEnv {
    AdapterEnv {
        moon_bin: moon_bin.to_string_lossy().to_string(),
        node_bin: "node".into(),
        project_snapshot: create_snapshot(sandbox),
        target: "app:build".into(),
        verbose: false,
        working_dir: sandbox.path().join("apps/app"),
        workspace_root: sandbox.path().to_path_buf(),
    }
}
