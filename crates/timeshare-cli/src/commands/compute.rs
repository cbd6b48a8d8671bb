//! Single-record time-share computation.

use clap::Args;

use timeshare_core::{compute_time_share, CoreError, IntegrationResult, RawParameters};

use super::{read_input, report, Context};

#[derive(Args)]
pub struct ComputeArgs {
    /// Inline JSON or a path to a JSON file; reads stdin when omitted
    input: Option<String>,
    /// Fill absent `k` and `Tmax` from the config file
    #[arg(long)]
    defaults: bool,
    /// Use the current time for an absent `t1`
    #[arg(long)]
    now: bool,
    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

pub fn run(args: ComputeArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = compute(&args, ctx);
    report(outcome, args.pretty)
}

/// Load the request and apply the CLI-level fallbacks.
pub fn load_request(
    input: Option<&str>,
    defaults: bool,
    now: bool,
    ctx: &Context,
) -> Result<RawParameters, CoreError> {
    let mut raw = RawParameters::from_json(&read_input(input)?)?;
    if defaults {
        ctx.config()?.apply_defaults(&mut raw);
    }
    if now {
        raw.t1.get_or_insert(chrono::Utc::now().timestamp() as f64);
    }
    Ok(raw)
}

fn compute(args: &ComputeArgs, ctx: &Context) -> Result<IntegrationResult, CoreError> {
    let raw = load_request(args.input.as_deref(), args.defaults, args.now, ctx)?;
    let result = compute_time_share(&raw)?;
    tracing::info!(time_share = result.time_share, "time share computed");
    Ok(result)
}
