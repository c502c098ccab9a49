use crate::errors::NxCompatError;
use crate::fs::FileSystem;
use serde::Deserialize;
use serde_json::{Map, Number, Value as JsonValue};
use std::collections::BTreeMap;
use std::path::Path;

pub type ExecutorOptions = Map<String, JsonValue>;

fn camel_case(key: &str) -> String {
    let mut result = String::with_capacity(key.len());
    let mut upper_next = false;

    for ch in key.chars() {
        if ch == '-' {
            upper_next = !result.is_empty();
        } else if upper_next {
            result.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            result.push(ch);
        }
    }

    result
}

fn looks_like_number(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);

    if digits.is_empty() || digits == "." {
        return false;
    }

    // Leading zeros are kept as strings, e.g. 007
    if digits.len() > 1 && digits.starts_with('0') && !digits.starts_with("0.") {
        return false;
    }

    digits.parse::<f64>().is_ok() && digits.chars().all(|ch| ch.is_ascii_digit() || ch == '.')
}

fn coerce_value(value: &str) -> JsonValue {
    match value {
        "true" => return JsonValue::Bool(true),
        "false" => return JsonValue::Bool(false),
        _ => {}
    };

    if looks_like_number(value) {
        if let Ok(int) = value.parse::<i64>() {
            return JsonValue::Number(int.into());
        }

        if let Some(float) = value.parse::<f64>().ok().and_then(Number::from_f64) {
            return JsonValue::Number(float);
        }
    }

    JsonValue::String(value.to_owned())
}

/// Insert a value, supporting dot-notation for nested objects, and
/// collecting repeated keys into a list.
fn insert_option(options: &mut ExecutorOptions, key: &str, value: JsonValue) {
    if let Some((head, tail)) = key.split_once('.') {
        let nested = options
            .entry(camel_case(head))
            .or_insert_with(|| JsonValue::Object(Map::new()));

        if !nested.is_object() {
            *nested = JsonValue::Object(Map::new());
        }

        if let JsonValue::Object(map) = nested {
            insert_option(map, tail, value);
        }

        return;
    }

    let key = camel_case(key);

    match options.get_mut(&key) {
        Some(JsonValue::Array(list)) => list.push(value),
        Some(existing) => {
            let previous = existing.take();
            *existing = JsonValue::Array(vec![previous, value]);
        }
        None => {
            options.insert(key, value);
        }
    };
}

fn is_flag(arg: &str) -> bool {
    arg.starts_with('-') && arg.len() > 1 && !looks_like_number(arg)
}

/// Parse CLI arguments into executor options, following the same rules
/// as yargs-parser with `strip-dashed` and `populate--` enabled.
/// Positional arguments are dropped.
pub fn parse_executor_args(args: &[String]) -> ExecutorOptions {
    let mut options = ExecutorOptions::new();
    let mut index = 0;

    while index < args.len() {
        let arg = args[index].as_str();
        index += 1;

        if arg == "--" {
            options.insert(
                "--".into(),
                JsonValue::Array(
                    args[index..]
                        .iter()
                        .map(|rest| JsonValue::String(rest.to_owned()))
                        .collect(),
                ),
            );

            break;
        }

        if !is_flag(arg) {
            continue;
        }

        let (name, inline_value, is_long) = match arg.strip_prefix("--") {
            Some(long) => match long.split_once('=') {
                Some((name, value)) => (name, Some(value), true),
                None => (long, None, true),
            },
            None => {
                let short = &arg[1..];

                match short.split_once('=') {
                    Some((name, value)) => (name, Some(value), false),
                    None => (short, None, false),
                }
            }
        };

        if let Some(value) = inline_value {
            insert_option(&mut options, name, coerce_value(value));
            continue;
        }

        if is_long {
            if let Some(negated) = name.strip_prefix("no-") {
                insert_option(&mut options, negated, JsonValue::Bool(false));
                continue;
            }
        } else if name.chars().count() > 1 {
            // Grouped short flags, e.g. -abc
            for ch in name.chars() {
                insert_option(&mut options, &ch.to_string(), JsonValue::Bool(true));
            }

            continue;
        }

        match args.get(index) {
            Some(next) if next != "--" && !is_flag(next) => {
                insert_option(&mut options, name, coerce_value(next));
                index += 1;
            }
            _ => {
                insert_option(&mut options, name, JsonValue::Bool(true));
            }
        };
    }

    options.remove("$0");
    options.remove("_");
    options
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct SchemaProperty {
    default: Option<JsonValue>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct ExecutorSchema {
    properties: BTreeMap<String, SchemaProperty>,
}

/// Fill in options that weren't passed, using the defaults declared
/// in the executor's JSON schema.
pub fn apply_schema_defaults(
    fs: &dyn FileSystem,
    schema_path: &Path,
    options: &mut ExecutorOptions,
) -> Result<(), NxCompatError> {
    if !fs.is_file(schema_path) {
        return Ok(());
    }

    let schema: ExecutorSchema = serde_json::from_str(&fs.read_to_string(schema_path)?)
        .map_err(|error| NxCompatError::InvalidJson {
            path: schema_path.to_path_buf(),
            error,
        })?;

    for (name, property) in schema.properties {
        if let Some(default) = property.default {
            options.entry(name).or_insert(default);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use serde_json::json;

    fn parse(args: &[&str]) -> JsonValue {
        JsonValue::Object(parse_executor_args(
            &args.iter().map(|arg| arg.to_string()).collect::<Vec<_>>(),
        ))
    }

    #[test]
    fn parses_long_flags() {
        assert_eq!(
            parse(&["--output-path", "dist", "--watch", "--port=4200", "--no-minify"]),
            json!({ "outputPath": "dist", "watch": true, "port": 4200, "minify": false })
        );
    }

    #[test]
    fn parses_short_flags() {
        assert_eq!(
            parse(&["-p", "3000", "-abc", "-v"]),
            json!({ "p": 3000, "a": true, "b": true, "c": true, "v": true })
        );
    }

    #[test]
    fn coerces_values() {
        assert_eq!(
            parse(&["--a", "true", "--b=false", "--c", "1.5", "--d", "007", "--e", "-3"]),
            json!({ "a": true, "b": false, "c": 1.5, "d": "007", "e": -3 })
        );
    }

    #[test]
    fn collects_repeated_keys() {
        assert_eq!(
            parse(&["--asset", "a", "--asset", "b", "--asset=c"]),
            json!({ "asset": ["a", "b", "c"] })
        );
    }

    #[test]
    fn supports_dot_notation() {
        assert_eq!(
            parse(&["--env.name", "prod", "--env.debug"]),
            json!({ "env": { "name": "prod", "debug": true } })
        );
    }

    #[test]
    fn strips_positionals_and_populates_passthrough() {
        assert_eq!(
            parse(&["build", "--prod", "--", "--inspect", "file.js"]),
            json!({ "prod": true, "--": ["--inspect", "file.js"] })
        );
    }

    #[test]
    fn doesnt_consume_separator_as_value() {
        assert_eq!(
            parse(&["--prod", "--", "x"]),
            json!({ "prod": true, "--": ["x"] })
        );
    }

    #[test]
    fn applies_schema_defaults() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "/pkg/schema.json",
            r#"{ "properties": { "main": { "type": "string" }, "watch": { "default": false }, "outputPath": { "default": "dist" } } }"#,
        );

        let mut options = parse_executor_args(&["--output-path".into(), "build".into()]);

        apply_schema_defaults(&fs, Path::new("/pkg/schema.json"), &mut options).unwrap();

        assert_eq!(
            JsonValue::Object(options),
            json!({ "outputPath": "build", "watch": false })
        );
    }

    #[test]
    fn ignores_missing_schema() {
        let mut options = ExecutorOptions::new();

        apply_schema_defaults(&MockFileSystem::new(), Path::new("/schema.json"), &mut options)
            .unwrap();

        assert!(options.is_empty());
    }
}
