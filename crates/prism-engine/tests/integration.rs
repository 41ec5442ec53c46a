//! End-to-end tests through `create`, the controller and the processor.

use prism_core::{Biquad, peaking_eq_coefficients};
use prism_engine::layout::ids;
use prism_engine::{ChainOrder, EffectOption, EngineConfig, PersistedState, create};

const SR: f32 = 48000.0;

fn noise(len: usize, mut seed: u32) -> Vec<f32> {
    (0..len)
        .map(|_| {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            ((seed >> 8) as f32 / (1u32 << 24) as f32 * 2.0 - 1.0) * 0.5
        })
        .collect()
}

fn peak_only_impulse(gain_db: f32) {
    let (mut processor, mut controller) = create(EngineConfig::default()).unwrap();

    let order = ChainOrder::try_from_slice(&[
        EffectOption::LadderFilter,
        EffectOption::Phaser,
        EffectOption::Chorus,
        EffectOption::Overdrive,
        EffectOption::ParametricFilter,
    ])
    .unwrap();
    assert!(controller.commit_order(order));

    for option in EffectOption::ALL {
        controller.set_bypass(option, option != EffectOption::ParametricFilter);
    }
    controller.set_choice(ids::FILTER_MODE, 0).unwrap();
    let freq = controller.set_param(ids::FILTER_FREQ, 1000.0).unwrap();
    let quality = controller.set_param(ids::FILTER_QUALITY, 5.0).unwrap();
    let gain = controller.set_param(ids::FILTER_GAIN, gain_db).unwrap();

    // Start with smoothers resting on the new values
    processor.prepare_to_play(SR, 512);

    let mut left = vec![0.0_f32; 512];
    let mut right = vec![0.0_f32; 512];
    left[0] = 1.0;
    right[0] = 1.0;
    processor.process_block(&mut left, &mut right);
    assert_eq!(processor.order(), order);

    let mut reference = Biquad::with_coefficients(peaking_eq_coefficients(freq, quality, gain, SR));
    for (i, (&l, &r)) in left.iter().zip(&right).enumerate() {
        let expected = reference.process(if i == 0 { 1.0 } else { 0.0 });
        assert!((l - expected).abs() < 1e-6, "left sample {i}: {l} vs {expected}");
        assert!((r - expected).abs() < 1e-6, "right sample {i}: {r} vs {expected}");
    }
}

#[test]
fn peak_filter_alone_matches_reference_biquad() {
    peak_only_impulse(0.0);
}

#[test]
fn boosted_peak_filter_alone_matches_reference_biquad() {
    peak_only_impulse(6.0);
}

#[test]
fn order_drain_keeps_only_last_push() {
    let (mut processor, mut controller) = create(EngineConfig::default()).unwrap();
    let mut last = ChainOrder::identity();
    for step in 0..6 {
        last = last.moved(step % 5, (step * 3 + 1) % 5).unwrap();
        controller.commit_order(last);
    }

    let mut left = vec![0.0; 64];
    let mut right = vec![0.0; 64];
    processor.process_block(&mut left, &mut right);
    assert_eq!(processor.order(), last);

    // Nothing new: the order sticks
    processor.process_block(&mut left, &mut right);
    assert_eq!(processor.order(), last);
}

#[test]
fn bypassed_stage_is_frozen_and_enabled_stage_transforms() {
    let (mut processor, controller) = create(EngineConfig::default()).unwrap();
    controller.set_param(ids::CHORUS_MIX, 0.8).unwrap();
    controller.set_param(ids::CHORUS_DEPTH, 0.6).unwrap();
    processor.prepare_to_play(SR, 512);

    let input = noise(512, 7);

    let mut left = input.clone();
    let mut right = input.clone();
    processor.process_block(&mut left, &mut right);
    let chorus_state = processor.left().chorus().clone();

    controller.set_bypass(EffectOption::Chorus, true);
    let mut bypassed_l = input.clone();
    let mut bypassed_r = input.clone();
    processor.process_block(&mut bypassed_l, &mut bypassed_r);
    assert_eq!(processor.left().chorus(), &chorus_state);

    controller.set_bypass(EffectOption::Chorus, false);
    let mut enabled_l = input.clone();
    let mut enabled_r = input;
    processor.process_block(&mut enabled_l, &mut enabled_r);
    assert_ne!(processor.left().chorus(), &chorus_state);
    assert_ne!(enabled_l, bypassed_l);
}

#[test]
fn levels_reflect_input_and_output_gain() {
    let (mut processor, mut controller) = create(EngineConfig::default()).unwrap();
    for option in EffectOption::ALL {
        controller.set_bypass(option, true);
    }
    controller.set_param(ids::OUTPUT_GAIN, -6.0).unwrap();

    let mut left = vec![0.5; 512];
    let mut right = vec![0.25; 512];
    // Run long enough for the output ramp to settle
    for _ in 0..10 {
        left.fill(0.5);
        right.fill(0.25);
        processor.process_block(&mut left, &mut right);
    }

    let input = controller.poll_input_level().unwrap();
    assert!((input.left - 0.5).abs() < 1e-5);
    assert!((input.right - 0.25).abs() < 1e-5);

    let output = controller.poll_output_level().unwrap();
    let expected = 0.5 * 10f32.powf(-6.0 / 20.0);
    assert!((output.left - expected).abs() < 1e-4, "{output:?}");
    let (db, _) = output.to_db();
    assert!((db - (-12.02)).abs() < 0.05, "{db}");

    assert_eq!(controller.poll_output_level(), None);
}

#[test]
fn unread_meters_never_stall_processing() {
    let (mut processor, _controller) = create(EngineConfig::default()).unwrap();
    let mut left = vec![0.1; 128];
    let mut right = vec![0.1; 128];
    for _ in 0..100 {
        processor.process_block(&mut left, &mut right);
    }
    assert!(left.iter().all(|s| s.is_finite()));
}

#[test]
fn smoothed_change_ramps_over_fifty_ms() {
    let (mut processor, controller) = create(EngineConfig::default()).unwrap();
    let index = controller.store().lookup(ids::FILTER_FREQ).unwrap();
    controller.set_param(ids::FILTER_FREQ, 5000.0).unwrap();

    let mut left = vec![0.0; 480];
    let mut right = vec![0.0; 480];
    processor.process_block(&mut left, &mut right);
    let partial = processor.smoothers().read(index);
    assert!(partial > 1000.0 && partial < 5000.0, "{partial}");

    for _ in 0..4 {
        processor.process_block(&mut left, &mut right);
    }
    assert_eq!(processor.smoothers().read(index), 5000.0);
    let settings = processor.left().filter().settings().unwrap();
    assert_eq!(settings.frequency, 5000.0);
}

#[test]
fn interleaved_matches_planar() {
    let config = EngineConfig::default().with_max_block_size(128);
    let (mut planar, planar_ctl) = create(config.clone()).unwrap();
    let (mut interleaved, inter_ctl) = create(config).unwrap();
    for controller in [&planar_ctl, &inter_ctl] {
        controller.set_param(ids::PHASER_MIX, 0.5).unwrap();
        controller.set_param(ids::OVERDRIVE_DRIVE, 4.0).unwrap();
    }

    let left_in = noise(128, 1);
    let right_in = noise(128, 2);

    let mut left = left_in.clone();
    let mut right = right_in.clone();
    planar.process_block(&mut left, &mut right);

    let mut buffer: Vec<f32> = left_in.iter().zip(&right_in).flat_map(|(&l, &r)| [l, r]).collect();
    interleaved.process_interleaved(&mut buffer);

    for (i, frame) in buffer.chunks_exact(2).enumerate() {
        assert_eq!(frame[0], left[i]);
        assert_eq!(frame[1], right[i]);
    }
}

#[test]
fn state_roundtrip_restores_params_order_and_tab() {
    let (_processor, mut source) = create(EngineConfig::default()).unwrap();
    source.set_param(ids::PHASER_RATE, 1.37).unwrap();
    source.set_param(ids::CHORUS_CENTER_DELAY, 42.0).unwrap();
    source.set_param(ids::FILTER_GAIN, -7.5).unwrap();
    source.set_param(ids::INPUT_GAIN, 3.3).unwrap();
    source.set_choice(ids::LADDER_MODE, 3).unwrap();
    source.set_bypass(EffectOption::Overdrive, true);
    source.move_effect(4, 0).unwrap();
    source.select_tab(EffectOption::LadderFilter);
    let blob = source.save_state().unwrap();

    let (mut processor, mut target) = create(EngineConfig::default()).unwrap();
    target.restore_state(&blob);

    for (index, descriptor) in source.store().iter() {
        assert_eq!(
            target.store().get(index),
            source.store().get(index),
            "{} did not survive the round trip",
            descriptor.id
        );
    }
    assert_eq!(target.order(), source.order());
    assert_eq!(target.selected_tab(), EffectOption::LadderFilter);

    // The restored order reaches the audio thread on the next block
    let mut left = vec![0.0; 32];
    let mut right = vec![0.0; 32];
    processor.process_block(&mut left, &mut right);
    assert_eq!(processor.order(), source.order());
}

#[test]
fn malformed_state_degrades_to_defaults() {
    let (mut processor, mut controller) = create(EngineConfig::default()).unwrap();
    controller.set_param(ids::FILTER_FREQ, 300.0).unwrap();
    controller.move_effect(0, 4).unwrap();

    controller.restore_state(b"{ this is not json");

    assert_eq!(controller.param(ids::FILTER_FREQ).unwrap(), 1000.0);
    assert_eq!(controller.order(), ChainOrder::identity());
    assert_eq!(controller.selected_tab(), EffectOption::Phaser);

    let mut left = vec![0.0; 32];
    let mut right = vec![0.0; 32];
    processor.process_block(&mut left, &mut right);
    assert_eq!(processor.order(), ChainOrder::identity());
}

#[test]
fn blob_without_order_falls_back_to_identity() {
    let (_processor, mut controller) = create(EngineConfig::default()).unwrap();
    controller.move_effect(2, 0).unwrap();
    controller.restore_state(br#"{"version": 1, "params": {"filter_gain": 3.0}}"#);
    assert_eq!(controller.order(), ChainOrder::identity());
    assert_eq!(controller.param(ids::FILTER_GAIN).unwrap(), 3.0);

    let state = controller.capture_state();
    assert_eq!(state.resolved_order(), ChainOrder::identity());
    assert_eq!(PersistedState::from_bytes(&controller.save_state().unwrap()).unwrap(), state);
}

#[test]
fn bad_order_keeps_valid_params() {
    let (_processor, mut controller) = create(EngineConfig::default()).unwrap();
    controller.move_effect(2, 0).unwrap();
    controller.restore_state(br#"{"version": 1, "params": {"filter_freq": 2000.0}, "order": [-1, 0, 1, 2, 3]}"#);
    assert_eq!(controller.param(ids::FILTER_FREQ).unwrap(), 2000.0);
    assert_eq!(controller.order(), ChainOrder::identity());
}

#[test]
fn non_string_tab_keeps_order_and_params() {
    let (mut processor, mut controller) = create(EngineConfig::default()).unwrap();
    controller.select_tab(EffectOption::Chorus);
    controller.restore_state(
        br#"{"version": 1, "params": {"filter_freq": 2000.0, "chorus_mix": null}, "order": [4, 3, 2, 1, 0], "selected_tab": 3}"#,
    );

    let reversed = ChainOrder::try_from_indices(&[4, 3, 2, 1, 0]).unwrap();
    assert_eq!(controller.order(), reversed);
    assert_eq!(controller.param(ids::FILTER_FREQ).unwrap(), 2000.0);
    assert_eq!(controller.param(ids::CHORUS_MIX).unwrap(), 0.05);
    assert_eq!(controller.selected_tab(), EffectOption::Phaser);

    let mut left = vec![0.0; 64];
    let mut right = vec![0.0; 64];
    processor.process_block(&mut left, &mut right);
    assert_eq!(processor.order(), reversed);
}

#[test]
fn processor_moves_to_another_thread() {
    let (mut processor, mut controller) = create(EngineConfig::default()).unwrap();
    let order = ChainOrder::identity().moved(1, 3).unwrap();
    controller.commit_order(order);

    let handle = std::thread::spawn(move || {
        let mut left = vec![0.2; 256];
        let mut right = vec![0.2; 256];
        processor.process_block(&mut left, &mut right);
        processor.order()
    });
    assert_eq!(handle.join().unwrap(), order);
    assert!(controller.poll_output_level().is_some());
}
