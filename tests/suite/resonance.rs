//! Resonance engine and controller behavior over realistic writing sessions.

use notepad_core::{
    AUTOSAVE_MAX_SECONDS, AUTOSAVE_MIN_SECONDS, Guidance, ResonanceController, ResonanceEngine,
    extract,
};
use notepad_types::{AXIS_MAX, AXIS_MIN, HarmonyBand, LOW_HARMONY_THRESHOLD, TargetVector};

use crate::common::{DRAFT_FLOW, INITIAL_HARMONY};

#[test]
fn fresh_controller_sits_on_the_anchor_point() {
    let controller = ResonanceController::new();
    let state = controller.state();
    assert_eq!(state.ticks(), 0);
    assert!((state.harmony() - INITIAL_HARMONY).abs() < 1e-12);
    assert_eq!(state.band(), HarmonyBand::Low);
}

#[test]
fn draft_flow_climbs_steadily() {
    let mut controller = ResonanceController::new();
    let harmonies: Vec<f64> = DRAFT_FLOW
        .iter()
        .map(|chunk| controller.evaluate(chunk).harmony)
        .collect();

    assert!((harmonies[0] - 0.555_554_737_846_947_2).abs() < 1e-9);
    assert!((harmonies[3] - 0.57319).abs() < 1e-4);
    assert!(harmonies.windows(2).all(|w| w[1] > w[0]), "{harmonies:?}");
    assert_eq!(controller.state().ticks(), 4);
}

#[test]
fn chaotic_repetition_climbs_past_the_low_band_sooner_than_draft_flow() {
    let chaotic = "asdf asdf asdf ???";
    let mut controller = ResonanceController::new();
    let chaotic_harmonies: Vec<f64> = (0..4)
        .map(|_| controller.evaluate(chaotic).harmony)
        .collect();
    assert_eq!(controller.state().ticks(), 4);
    assert!(
        chaotic_harmonies.iter().all(|h| *h > 0.0 && *h <= 1.0),
        "{chaotic_harmonies:?}"
    );
    assert!((chaotic_harmonies[0] - 0.55975).abs() < 1e-4);
    assert!((chaotic_harmonies[3] - 0.58632).abs() < 1e-4);

    let mut controller = ResonanceController::new();
    let draft_harmonies: Vec<f64> = DRAFT_FLOW
        .iter()
        .map(|chunk| controller.evaluate(chunk).harmony)
        .collect();

    let low = |hs: &[f64]| hs.iter().filter(|h| **h < LOW_HARMONY_THRESHOLD).count();
    // Repeated short punctuated text scores higher than coherent prose, so
    // the chaotic session spends fewer ticks in the low band, not more.
    assert_eq!(low(&chaotic_harmonies), 3);
    assert_eq!(low(&draft_harmonies), 4);
}

#[test]
fn queries_never_advance_the_engine() {
    let mut controller = ResonanceController::new();
    controller.evaluate(DRAFT_FLOW[0]);
    let before = controller.state();

    for _ in 0..5 {
        let _ = controller.guidance(DRAFT_FLOW[1]);
        let _ = controller.autosave_interval_seconds(DRAFT_FLOW[1]);
    }

    assert_eq!(controller.state(), before);
}

#[test]
fn blank_text_bootstraps_regardless_of_state() {
    let mut controller = ResonanceController::new();
    for chunk in DRAFT_FLOW {
        controller.evaluate(chunk);
    }
    assert_eq!(controller.guidance("  \n\t"), Guidance::Bootstrap);
    assert_eq!(controller.autosave_interval_seconds(""), 30);
}

#[test]
fn low_harmony_drafts_get_low_harmony_guidance_and_fast_autosave() {
    let mut controller = ResonanceController::new();
    let text = DRAFT_FLOW.join("\n");
    controller.evaluate(&text);

    assert_eq!(controller.guidance(&text), Guidance::LowHarmony);
    assert_eq!(controller.autosave_interval_seconds(&text), 6);
}

#[test]
fn long_run_stays_within_axis_bounds() {
    let samples: [&str; 6] = [
        "",
        "and and and and with together because so therefore",
        "?!?!?!?!?!?!?!?!?!?!?!?!?!?!?!?!?!?!?!?!?!?!",
        &"x".repeat(5_000),
        "Why? Because. So? Therefore!\nWith care, and together; always.",
        &"word ".repeat(800),
    ];

    let mut controller = ResonanceController::new();
    for i in 0..400 {
        let text = samples[i % samples.len()];
        let reading = controller.evaluate(text);
        for value in [reading.l, reading.j, reading.p, reading.w] {
            assert!((AXIS_MIN..=AXIS_MAX).contains(&value), "{value} at tick {i}");
        }
        assert!(reading.harmony > 0.0 && reading.harmony <= 1.0);

        let secs = controller.autosave_interval_seconds(text);
        assert!((AUTOSAVE_MIN_SECONDS..=AUTOSAVE_MAX_SECONDS).contains(&secs));
    }
    assert_eq!(controller.state().ticks(), 400);
}

#[test]
fn extracted_targets_are_bounded() {
    let texts: [&str; 5] = [
        "a",
        "plain words only here",
        "Is it? Is it? Is it?",
        &"long line ".repeat(300),
        "one\ntwo\nthree\nfour",
    ];
    for text in texts {
        let t = extract(text);
        for value in [t.l, t.j, t.p, t.w] {
            assert!((0.30..=1.0).contains(&value), "{text:?} -> {value}");
        }
    }
    assert_eq!(extract("   "), TargetVector::BOOTSTRAP);
}

#[test]
fn engine_and_controller_agree() {
    let mut engine = ResonanceEngine::new();
    let mut controller = ResonanceController::new();
    for chunk in DRAFT_FLOW {
        let state = engine.tick(chunk);
        let reading = controller.evaluate(chunk);
        assert!((state.harmony() - reading.harmony).abs() < f64::EPSILON);
    }
}
