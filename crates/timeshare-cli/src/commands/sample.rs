//! Urgency breakdown across a window.

use clap::Args;

use timeshare_core::{CoreError, UrgencyBlend, UrgencySample};

use super::compute::load_request;
use super::{report, Context};

#[derive(Args)]
pub struct SampleArgs {
    /// Inline JSON or a path to a JSON file; reads stdin when omitted
    input: Option<String>,
    /// Number of intervals; prints steps + 1 samples
    #[arg(long, default_value_t = 10)]
    steps: usize,
    /// Fill absent `k` and `Tmax` from the config file
    #[arg(long)]
    defaults: bool,
    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

pub fn run(args: SampleArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = sample(&args, ctx);
    report(outcome, args.pretty)
}

fn sample(args: &SampleArgs, ctx: &Context) -> Result<Vec<UrgencySample>, CoreError> {
    let raw = load_request(args.input.as_deref(), args.defaults, false, ctx)?;
    let params = raw.normalize()?;
    let blend = UrgencyBlend::new(&params)?;
    Ok(blend.samples(args.steps))
}
