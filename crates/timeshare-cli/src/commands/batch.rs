//! Per-assignment shares for one window.

use clap::Args;

use timeshare_core::{compute_batch, AssignmentShare, BatchRequest, CoreError};

use super::{read_input, report, Context};

#[derive(Args)]
pub struct BatchArgs {
    /// JSON file with `t0`, `t1`, `Tmax`, `k` and `assignments`; `-` for stdin
    file: String,
    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

pub fn run(args: BatchArgs, _ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = batch(&args);
    report(outcome, args.pretty)
}

fn batch(args: &BatchArgs) -> Result<Vec<AssignmentShare>, CoreError> {
    let request: BatchRequest = serde_json::from_str(&read_input(Some(&args.file))?)?;
    tracing::info!(assignments = request.assignments.len(), "running batch");
    Ok(compute_batch(&request)?)
}
