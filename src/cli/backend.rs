use serde_json::json;
use tracing::info;

use crate::cli::commands::{BackendCommands, CacheCommands};
use crate::cli::{report, Context};
use crate::db::connection;
use crate::db::storage_repo::{self, Scope};
use crate::error::DeskError;
use crate::output;

pub fn run_backend(cmd: BackendCommands, ctx: &Context) -> i32 {
    let result = match cmd {
        BackendCommands::Health => run_health(ctx),
    };
    report(result, ctx.json)
}

pub fn run_cache(cmd: CacheCommands, ctx: &Context) -> i32 {
    let result = match cmd {
        CacheCommands::Clear => run_clear(ctx.json),
    };
    report(result, ctx.json)
}

fn run_health(ctx: &Context) -> Result<i32, DeskError> {
    let client = ctx.client();
    let body = client.health()?;

    if ctx.json {
        output::json::print(&output::json::success(json!({
            "api_url": client.base_url(),
            "healthy": true,
            "response": body
        })));
    } else {
        println!("Backend at {} is healthy", client.base_url());
    }
    Ok(0)
}

fn run_clear(json_output: bool) -> Result<i32, DeskError> {
    let conn = connection::open_db()?;
    let removed = storage_repo::clear_scope(&conn, Scope::Session)?;
    info!(removed, "session storage cleared");

    if json_output {
        output::json::print(&output::json::success(json!({ "removed": removed })));
    } else {
        println!("Cleared {removed} session entries");
    }
    Ok(0)
}
