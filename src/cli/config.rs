use serde_json::json;

use crate::cli::commands::ConfigCommands;
use crate::cli::{report, Context};
use crate::config::DeskConfig;
use crate::db::connection;
use crate::error::DeskError;
use crate::output;

pub fn run(cmd: ConfigCommands, ctx: &Context) -> i32 {
    let result = match cmd {
        ConfigCommands::Show => run_show(ctx),
        ConfigCommands::Set { key, value } => run_set(&key, &value, ctx.json),
    };
    report(result, ctx.json)
}

fn run_show(ctx: &Context) -> Result<i32, DeskError> {
    let c = &ctx.config;
    if ctx.json {
        output::json::print(&output::json::success(output::json::to_json(c)));
    } else {
        println!("api_url: {}", c.api_url);
        println!("student_id: {}", c.student_id);
        println!("request_timeout_secs: {}", c.request_timeout_secs);
        println!("write_timeout_secs: {}", c.write_timeout_secs);
        println!("analyze_timeout_secs: {}", c.analyze_timeout_secs);
    }
    Ok(0)
}

fn run_set(key: &str, value: &str, json_output: bool) -> Result<i32, DeskError> {
    // Only persisted values are edited; env and flag overrides stay out of the file.
    connection::open_db()?;
    let mut config = DeskConfig::load_file()?;
    config.set(key, value)?;
    config.save()?;

    if json_output {
        output::json::print(&output::json::success(json!({ "key": key, "config": output::json::to_json(&config) })));
    } else {
        println!("Set {key}");
    }
    Ok(0)
}
