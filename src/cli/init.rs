use serde_json::json;
use tracing::info;

use crate::cli::report;
use crate::db::connection;
use crate::output;

pub fn run(json_output: bool) -> i32 {
    let result = connection::init_db().map(|path| {
        info!(path = %path.display(), "initialized database");
        if json_output {
            output::json::print(&output::json::success(json!({ "path": path.to_string_lossy() })));
        } else {
            println!("Initialized admitdesk at {}", path.display());
        }
        0
    });
    report(result, json_output)
}
