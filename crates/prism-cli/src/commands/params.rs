//! Parameter listing command.

use clap::Args;
use prism_engine::{PARAMETERS, ParamDescriptor, ParamKind};

#[derive(Args)]
pub struct ParamsArgs {
    /// Only list parameters whose id starts with this prefix (e.g. "chorus")
    #[arg(value_name = "PREFIX")]
    prefix: Option<String>,
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    let prefix = args.prefix.as_deref().unwrap_or("");

    println!("{:<22} {:<26} {:<8} {:<28} DEFAULT", "ID", "NAME", "KIND", "RANGE");
    for descriptor in PARAMETERS.iter().filter(|d| d.id.starts_with(prefix)) {
        println!(
            "{:<22} {:<26} {:<8} {:<28} {}",
            descriptor.id,
            descriptor.name,
            kind_name(descriptor),
            range(descriptor),
            default(descriptor)
        );
    }
    Ok(())
}

fn kind_name(descriptor: &ParamDescriptor) -> &'static str {
    match descriptor.kind {
        ParamKind::Float => "float",
        ParamKind::Choice(_) => "choice",
        ParamKind::Bool => "bool",
    }
}

fn range(descriptor: &ParamDescriptor) -> String {
    match descriptor.kind {
        ParamKind::Float => {
            let unit = descriptor.unit.suffix();
            let unit = if unit.is_empty() { String::new() } else { format!(" {unit}") };
            format!("{} .. {}{unit} (step {})", descriptor.min, descriptor.max, descriptor.step)
        }
        ParamKind::Choice(labels) => labels.join("|"),
        ParamKind::Bool => "off|on".to_string(),
    }
}

fn default(descriptor: &ParamDescriptor) -> String {
    match descriptor.kind {
        ParamKind::Float => descriptor.default.to_string(),
        ParamKind::Choice(labels) => labels
            .get(descriptor.default as usize)
            .map_or_else(|| descriptor.default.to_string(), |label| (*label).to_string()),
        ParamKind::Bool => if descriptor.default >= 0.5 { "on" } else { "off" }.to_string(),
    }
}
