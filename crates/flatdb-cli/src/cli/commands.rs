use super::setup::Commands;
use anyhow::{bail, Context, Result};
use flatdb::catalog::{self, BandValidator, BANDS};
use flatdb::{Query, Record, StorageBackend, Store};
use serde_json::Value;
use std::io::Write;

/// Runs one command against `store`, writing user-facing output to `out`.
pub fn execute<B: StorageBackend>(
    store: &Store<B>,
    command: Commands,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Commands::Get {
            collection,
            resource,
        } => {
            let value: Value = store.read(&collection, &resource)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        }
        Commands::Put {
            collection,
            resource,
            json,
        } => {
            let value: Value =
                serde_json::from_str(&json).context("record body is not valid JSON")?;
            store.write(&collection, &resource, &value)?;
            writeln!(out, "Wrote {}/{}", collection, resource)?;
        }
        Commands::Patch {
            collection,
            resource,
            json,
        } => {
            let fields = parse_object(&json)?;
            store.update(&collection, &resource, fields)?;
            writeln!(out, "Updated {}/{}", collection, resource)?;
        }
        Commands::Rm {
            collection,
            resource,
        } => {
            store.delete(&collection, &resource)?;
            writeln!(out, "Deleted {}/{}", collection, resource)?;
        }
        Commands::Ls { collection } => {
            for raw in store.read_all(&collection)? {
                writeln!(out, "{}", compact(&raw))?;
            }
        }
        Commands::Query {
            collection,
            field,
            op,
            value,
        } => {
            let query = Query::new(field, op.into(), parse_value(&value));
            for record in store.query(&collection, &query)? {
                writeln!(out, "{}", Value::Object(record))?;
            }
        }
        Commands::Stats { collection } => {
            let stats = store.get_stats(&collection);
            writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
        }
        Commands::Collections => {
            for name in store.collections()? {
                writeln!(out, "{}", name)?;
            }
        }
        Commands::Seed => {
            store.add_validator(BANDS, BandValidator);
            let count = catalog::seed(store)?;
            writeln!(out, "Seeded {} bands", count)?;
        }
    }
    Ok(())
}

/// JSON if it parses, otherwise the text as a JSON string.
pub fn parse_value(input: &str) -> Value {
    serde_json::from_str(input).unwrap_or_else(|_| Value::String(input.to_string()))
}

fn parse_object(input: &str) -> Result<Record> {
    match serde_json::from_str::<Value>(input).context("patch is not valid JSON")? {
        Value::Object(fields) => Ok(fields),
        _ => bail!("patch must be a JSON object"),
    }
}

/// One-line rendering of a stored record; unparsable text is shown as-is.
fn compact(raw: &str) -> String {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => value.to_string(),
        Err(_) => raw.trim_end().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::setup::Cli;
    use clap::Parser;
    use flatdb::{MemBackend, StoreOptions};
    use serde_json::json;

    fn make_store() -> Store<MemBackend> {
        Store::with_backend(MemBackend::new(), StoreOptions::default())
    }

    fn run(store: &Store<MemBackend>, args: &[&str]) -> Result<String> {
        let mut argv = vec!["flatdb"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv)?;
        let mut out = Vec::new();
        execute(store, cli.command, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn put_then_get() {
        let store = make_store();
        run(&store, &["put", "bands", "yes", r#"{"name":"Yes"}"#]).unwrap();
        let out = run(&store, &["get", "bands", "yes"]).unwrap();
        assert_eq!(out, "{\n  \"name\": \"Yes\"\n}\n");
    }

    #[test]
    fn put_rejects_invalid_json() {
        let store = make_store();
        let err = run(&store, &["put", "bands", "yes", "{oops"]).unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn patch_merges_fields() {
        let store = make_store();
        store.write("bands", "yes", &json!({"a": 1, "b": 2})).unwrap();
        run(&store, &["patch", "bands", "yes", r#"{"b":3}"#]).unwrap();
        let value: Value = store.read("bands", "yes").unwrap();
        assert_eq!(value, json!({"a": 1, "b": 3}));
    }

    #[test]
    fn patch_requires_object() {
        let store = make_store();
        store.write("bands", "yes", &json!({"a": 1})).unwrap();
        let err = run(&store, &["patch", "bands", "yes", "[1]"]).unwrap_err();
        assert!(err.to_string().contains("JSON object"));
    }

    #[test]
    fn rm_missing_record_fails() {
        let store = make_store();
        let err = run(&store, &["rm", "bands", "yes"]).unwrap_err();
        let store_err = err.downcast_ref::<flatdb::StoreError>().unwrap();
        assert!(store_err.is_not_found());
    }

    #[test]
    fn query_accepts_bare_words_and_numbers() {
        let store = make_store();
        store.write("bands", "a", &json!({"genre": "Jazz", "year": 1970})).unwrap();
        store.write("bands", "b", &json!({"genre": "Rock", "year": 1960})).unwrap();

        let out = run(&store, &["query", "bands", "genre", "eq", "Jazz"]).unwrap();
        assert_eq!(out.lines().count(), 1);
        assert!(out.contains("Jazz"));

        let out = run(&store, &["query", "bands", "year", "lt", "1965"]).unwrap();
        assert_eq!(out.trim(), r#"{"genre":"Rock","year":1960}"#);
    }

    #[test]
    fn ls_prints_one_record_per_line() {
        let store = make_store();
        store.write("bands", "a", &json!({"n": 1})).unwrap();
        store.write("bands", "b", &json!({"n": 2})).unwrap();
        let out = run(&store, &["ls", "bands"]).unwrap();
        assert_eq!(out, "{\"n\":1}\n{\"n\":2}\n");
    }

    #[test]
    fn seed_then_stats() {
        let store = make_store();
        let out = run(&store, &["seed"]).unwrap();
        assert_eq!(out, "Seeded 5 bands\n");

        let out = run(&store, &["stats", "bands"]).unwrap();
        let stats: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(stats["record_count"], json!(5));
        assert_eq!(stats["operations"]["updates"], json!(1));
    }

    #[test]
    fn parse_value_falls_back_to_string() {
        assert_eq!(parse_value("42"), json!(42));
        assert_eq!(parse_value("\"x\""), json!("x"));
        assert_eq!(parse_value("Progressive Rock"), json!("Progressive Rock"));
    }
}
