extern crate clap;
extern crate faciledb;

use clap::{App, Arg, ArgMatches, SubCommand};
use faciledb::{Context, DataItem, Error, Options, Record, ValueType};

fn parse_value_type(s: &str) -> Result<ValueType, String> {
	match s {
		"uint32" => Ok(ValueType::Uint32),
		"string" => Ok(ValueType::String),
		"int32" => Ok(ValueType::Int32),
		"uint64" => Ok(ValueType::Uint64),
		"int64" => Ok(ValueType::Int64),
		"float" => Ok(ValueType::Float),
		"double" => Ok(ValueType::Double),
		"hash" => Ok(ValueType::Hash),
		other => Err(format!("unknown value type {:?}; expected one of uint32/string/int32/uint64/int64/float/double/hash", other)),
	}
}

fn parse_value(value_type: ValueType, raw: &str) -> Result<Vec<u8>, String> {
	match value_type {
		ValueType::Uint32 => raw.parse::<u32>().map(|v| v.to_le_bytes().to_vec()).map_err(|e| e.to_string()),
		ValueType::Int32 => raw.parse::<i32>().map(|v| v.to_le_bytes().to_vec()).map_err(|e| e.to_string()),
		ValueType::Uint64 | ValueType::Hash => raw.parse::<u64>().map(|v| v.to_le_bytes().to_vec()).map_err(|e| e.to_string()),
		ValueType::Int64 => raw.parse::<i64>().map(|v| v.to_le_bytes().to_vec()).map_err(|e| e.to_string()),
		ValueType::Float => raw.parse::<f32>().map(|v| v.to_le_bytes().to_vec()).map_err(|e| e.to_string()),
		ValueType::Double => raw.parse::<f64>().map(|v| v.to_le_bytes().to_vec()).map_err(|e| e.to_string()),
		ValueType::String => Ok(raw.as_bytes().to_vec()),
	}
}

fn build_record(sub_m: &ArgMatches) -> Result<Record, String> {
	let key = sub_m.value_of("KEY").ok_or("missing --key")?;
	let value_type = parse_value_type(sub_m.value_of("TYPE").unwrap_or("string"))?;
	let value = parse_value(value_type, sub_m.value_of("VALUE").ok_or("missing --value")?)?;
	Ok(Record::new(key.as_bytes().to_vec(), value, value_type))
}

fn do_insert(ctx: &Context, set: &str, sub_m: &ArgMatches) -> Result<(), Error> {
	let record = build_record(sub_m).expect("invalid record");
	let data_item = DataItem::new(vec![record]);
	let inserted = faciledb::insert(ctx, set.as_bytes(), &data_item)?;
	println!("inserted {} data item(s)", inserted);
	Ok(())
}

fn do_search(ctx: &Context, set: &str, sub_m: &ArgMatches) -> Result<(), Error> {
	let probe = build_record(sub_m).expect("invalid probe");
	let hits = faciledb::search_equal(ctx, set.as_bytes(), &probe)?;
	println!("{} match(es)", hits.len());
	for hit in &hits {
		println!("data item #{} ({} record(s)):", hit.meta.data_tag, hit.records.len());
		for record in &hit.records {
			println!("  {:?} = {:?} ({:?})", String::from_utf8_lossy(&record.key), record.value, record.value_type);
		}
	}
	Ok(())
}

fn do_delete(ctx: &Context, set: &str, sub_m: &ArgMatches) -> Result<(), Error> {
	let probe = build_record(sub_m).expect("invalid probe");
	let deleted = faciledb::delete_equal(ctx, set.as_bytes(), &probe)?;
	println!("deleted {} data item(s)", deleted);
	Ok(())
}

fn do_make_index(ctx: &Context, set: &str, sub_m: &ArgMatches) -> Result<(), Error> {
	let key = sub_m.value_of("KEY").expect("missing --key");
	let value_type = parse_value_type(sub_m.value_of("TYPE").unwrap_or("string")).expect("invalid type");
	let already_existed = faciledb::make_record_index(ctx, set.as_bytes(), key.as_bytes(), value_type)?;
	println!("index on {:?} ready (already existed: {})", key, already_existed);
	Ok(())
}

fn record_args<'a, 'b>() -> Vec<Arg<'a, 'b>> {
	vec![
		Arg::with_name("KEY").short("k").long("key").takes_value(true).required(true),
		Arg::with_name("VALUE").short("v").long("value").takes_value(true),
		Arg::with_name("TYPE").short("t").long("type").takes_value(true),
	]
}

fn main() {
	let matches = App::new("faciledb-cli")
		.version("0.1.0")
		.author("FacileDB")
		.about("A simple command line interface for FacileDB")
		.arg(Arg::with_name("DIR").short("d").long("dir").takes_value(true).required(true).global(true))
		.arg(Arg::with_name("SET").short("s").long("set").takes_value(true).required(true).global(true))
		.subcommand(SubCommand::with_name("insert").about("Insert a single-record data item into a set").args(&record_args()))
		.subcommand(SubCommand::with_name("search").about("Find every data item with a record matching key/value/type").args(&record_args()))
		.subcommand(SubCommand::with_name("delete").about("Delete every data item with a record matching key/value/type").args(&record_args()))
		.subcommand(SubCommand::with_name("make-index")
			.about("Build a secondary index over a record key")
			.arg(Arg::with_name("KEY").short("k").long("key").takes_value(true).required(true))
			.arg(Arg::with_name("TYPE").short("t").long("type").takes_value(true)))
		.get_matches();

	let dir = matches.value_of("DIR").expect("--dir is required");
	let set = matches.value_of("SET").expect("--set is required");
	let ctx = Context::init(dir, Options::default()).expect("failed to open context");

	match matches.subcommand() {
		("insert", Some(sub_m)) => do_insert(&ctx, set, sub_m).expect("insert failed"),
		("search", Some(sub_m)) => do_search(&ctx, set, sub_m).expect("search failed"),
		("delete", Some(sub_m)) => do_delete(&ctx, set, sub_m).expect("delete failed"),
		("make-index", Some(sub_m)) => do_make_index(&ctx, set, sub_m).expect("make-index failed"),
		_ => println!("no subcommand given; see --help"),
	}

	ctx.close().expect("failed to close context");
}
