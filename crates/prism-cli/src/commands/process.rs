//! Offline rendering through the engine.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use prism_engine::{
    ChainOrder, Controller, EffectOption, EngineConfig, LevelSnapshot, ParamKind, PersistedState, create,
};

use crate::wav::{StereoAudio, read_stereo, write_stereo};

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file (mono or stereo)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file (32-bit float stereo)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Effect order, e.g. "filter,phaser,chorus,overdrive,ladder"
    #[arg(long)]
    order: Option<ChainOrder>,

    /// Parameter value, e.g. "filter_freq=2000" or "filter_mode=Notch"
    #[arg(long = "set", value_name = "ID=VALUE", value_parser = parse_key_val)]
    set: Vec<(String, String)>,

    /// Bypass an effect (repeatable)
    #[arg(long, value_name = "EFFECT")]
    bypass: Vec<EffectOption>,

    /// Load parameters, order and tab from a state file first
    #[arg(long, value_name = "FILE")]
    state: Option<PathBuf>,

    /// Write the final state to a file
    #[arg(long, value_name = "FILE")]
    save_state: Option<PathBuf>,

    /// Processing block size
    #[arg(long, default_value_t = 512)]
    block_size: usize,

    /// Engine config (TOML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.trim().to_string())),
        _ => Err(format!("invalid parameter format: '{s}' (expected id=value)")),
    }
}

/// Apply one `--set` pair. Choice parameters also accept their labels.
fn apply_setting(controller: &Controller, id: &str, value: &str) -> anyhow::Result<()> {
    let descriptor = controller
        .store()
        .descriptor_by_id(id)
        .with_context(|| format!("unknown parameter '{id}' (see `prism params`)"))?;

    if let ParamKind::Choice(labels) = descriptor.kind {
        if let Some(choice) = labels.iter().position(|label| label.eq_ignore_ascii_case(value)) {
            controller.set_choice(id, choice)?;
            return Ok(());
        }
    }

    let number: f32 = value
        .parse()
        .with_context(|| format!("invalid value '{value}' for {id}"))?;
    let applied = controller.set_param(id, number)?;
    if applied != number {
        tracing::info!(id, requested = number, applied, "value adjusted to parameter range");
    }
    Ok(())
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    if args.block_size == 0 {
        bail!("--block-size must be at least 1");
    }

    println!("Reading {}...", args.input.display());
    let mut audio = read_stereo(&args.input)?;
    println!(
        "  {} frames, {} Hz, {:.2}s",
        audio.frames(),
        audio.sample_rate,
        audio.duration_secs()
    );

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    }
    .with_sample_rate(audio.sample_rate as f32)
    .with_max_block_size(args.block_size);

    let (mut processor, mut controller) = create(config)?;

    if let Some(path) = &args.state {
        let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let state = PersistedState::from_bytes(&bytes).with_context(|| format!("invalid state file {}", path.display()))?;
        controller.apply_state(&state);
    }
    if let Some(order) = args.order {
        controller.commit_order(order);
    }
    for (id, value) in &args.set {
        apply_setting(&controller, id, value)?;
    }
    for option in &args.bypass {
        controller.set_bypass(*option, true);
    }

    // Render with the chosen settings from the first sample
    processor.prepare_to_play(audio.sample_rate as f32, args.block_size);

    println!("Chain: {}", describe_chain(&controller));

    let pb = ProgressBar::new(audio.frames() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let mut input_level = LevelSnapshot::default();
    let mut output_level = LevelSnapshot::default();
    let StereoAudio { left, right, .. } = &mut audio;
    for (l, r) in left.chunks_mut(args.block_size).zip(right.chunks_mut(args.block_size)) {
        processor.process_block(l, r);
        input_level = controller.poll_input_level().unwrap_or(input_level);
        output_level = controller.poll_output_level().unwrap_or(output_level);
        pb.inc(l.len() as u64);
    }
    pb.finish_with_message("done");

    write_stereo(&args.output, &audio)?;
    println!("Wrote {}", args.output.display());

    let (in_l, in_r) = input_level.to_db();
    let (out_l, out_r) = output_level.to_db();
    println!("\nLevels (last block RMS):");
    println!("  Input:  L {in_l:.1} dB, R {in_r:.1} dB");
    println!("  Output: L {out_l:.1} dB, R {out_r:.1} dB");

    if let Some(path) = &args.save_state {
        let bytes = controller.save_state()?;
        std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
        println!("Saved state to {}", path.display());
    }

    Ok(())
}

fn describe_chain(controller: &Controller) -> String {
    controller
        .order()
        .iter()
        .map(|option| {
            if controller.is_bypassed(option) {
                format!("({option})")
            } else {
                option.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" -> ")
}
