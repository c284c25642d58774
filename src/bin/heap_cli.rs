//! Simple CLI for poking at a heap file.
//!
//! Usage:
//!   heap_cli <db_path> <schema> insert <value>...
//!   heap_cli <db_path> <schema> get <page> <slot>
//!   heap_cli <db_path> <schema> delete <page> <slot>
//!   heap_cli <db_path> <schema> scan
//!   heap_cli <db_path> <schema> stats
//!
//! The schema is a comma separated list of `name:type` pairs, where type is
//! one of `int`, `double` or `char`, e.g. `id:int,name:char,score:double`.

use heap_storage::{DbFile, Field, FieldType, PageId, RecordId, Tuple, TupleDesc};
use std::env;
use std::process::exit;

fn parse_schema(schema: &str) -> Result<TupleDesc, String> {
    let mut fields = Vec::new();
    for part in schema.split(',').filter(|p| !p.is_empty()) {
        let (name, ty) = part
            .split_once(':')
            .ok_or_else(|| format!("expected name:type, got `{}`", part))?;
        fields.push((ty.trim().parse::<FieldType>()?, name.trim().to_string()));
    }
    TupleDesc::from_fields(fields).map_err(|e| e.to_string())
}

fn parse_tuple(desc: &TupleDesc, values: &[String]) -> Result<Tuple, String> {
    if values.len() != desc.len() {
        return Err(format!(
            "expected {} values ({}), got {}",
            desc.len(),
            desc.describe(),
            values.len()
        ));
    }

    desc.types()
        .iter()
        .zip(values)
        .map(|(ty, raw)| match ty {
            FieldType::Int => raw
                .parse::<i32>()
                .map(Field::Int)
                .map_err(|e| format!("bad int `{}`: {}", raw, e)),
            FieldType::Double => raw
                .parse::<f64>()
                .map(Field::Double)
                .map_err(|e| format!("bad double `{}`: {}", raw, e)),
            FieldType::Char => Ok(Field::Char(raw.clone())),
        })
        .collect()
}

fn parse_location(args: &[String]) -> Result<RecordId, String> {
    if args.len() < 2 {
        return Err("expected <page> <slot>".to_string());
    }
    let page = args[0]
        .parse::<u32>()
        .map_err(|e| format!("bad page `{}`: {}", args[0], e))?;
    let slot = args[1]
        .parse::<usize>()
        .map_err(|e| format!("bad slot `{}`: {}", args[1], e))?;
    Ok(RecordId::new(PageId::new(page), slot))
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("ERROR: {}", msg);
    exit(1);
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 4 {
        eprintln!("Usage: heap_cli <db_path> <schema> <command> [args...]");
        eprintln!("Schema: name:type[,name:type...] with type int|double|char");
        eprintln!("Commands:");
        eprintln!("  insert <value>...   - Insert a record, prints its location");
        eprintln!("  get <page> <slot>   - Print the record at a location");
        eprintln!("  delete <page> <slot> - Delete the record at a location");
        eprintln!("  scan                - Print every live record as JSON");
        eprintln!("  stats               - Show file statistics");
        exit(1);
    }

    let db_path = &args[1];
    let command = &args[3];

    let desc = parse_schema(&args[2]).unwrap_or_else(|e| fail(e));
    let mut file = match DbFile::create_or_open(db_path, desc) {
        Ok(file) => file,
        Err(e) => fail(format!("Failed to open heap file: {}", e)),
    };

    match command.as_str() {
        "insert" => {
            let tuple = parse_tuple(file.tuple_desc(), &args[4..]).unwrap_or_else(|e| fail(e));
            match file.insert_tuple(&tuple) {
                Ok(rid) => println!("INSERTED {} {}", rid.page_id, rid.slot),
                Err(e) => fail(e),
            }
        }

        "get" => {
            let rid = parse_location(&args[4..]).unwrap_or_else(|e| fail(e));
            match file.get_tuple(rid) {
                Ok(tuple) => match serde_json::to_string(&tuple) {
                    Ok(json) => println!("{}", json),
                    Err(e) => fail(e),
                },
                Err(e) => fail(e),
            }
        }

        "delete" => {
            let rid = parse_location(&args[4..]).unwrap_or_else(|e| fail(e));
            match file.delete_tuple(rid) {
                Ok(()) => println!("DELETED"),
                Err(e) => fail(e),
            }
        }

        "scan" => {
            let mut count = 0;
            for result in file.scan() {
                let (rid, tuple) = result.unwrap_or_else(|e| fail(e));
                let line = serde_json::json!({
                    "page": rid.page_id,
                    "slot": rid.slot,
                    "tuple": tuple,
                });
                println!("{}", line);
                count += 1;
            }
            println!("COUNT: {}", count);
        }

        "stats" => {
            let stats = file.stats();
            let mut live = 0;
            for result in file.scan() {
                result.unwrap_or_else(|e| fail(e));
                live += 1;
            }
            println!("page_count: {}", stats.page_count);
            println!("page_size: {}", stats.page_size);
            println!("slots_per_page: {}", stats.slots_per_page);
            println!("record_width: {}", stats.record_width);
            println!("live_records: {}", live);
        }

        _ => fail(format!("Unknown command: {}", command)),
    }
}
