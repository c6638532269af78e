use std::rc::Rc;
use tarry_core::{
    Color, Composition, ConfigError, ManualScheduler, Scheduler, TimingConfig, with_scheduler,
    with_timing,
};
use web_time::Duration;
use tarry_ui::*;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

struct Harness {
    sched: Rc<ManualScheduler>,
    comp: Composition,
}

impl Harness {
    fn new() -> Self {
        Self {
            sched: Rc::new(ManualScheduler::new()),
            comp: Composition::new(),
        }
    }

    fn render<R>(&self, f: impl FnOnce() -> R) -> R {
        with_scheduler(self.sched.clone(), || self.comp.render(f))
    }
}

#[test]
fn delayed_reveal_flips_after_delay() {
    let h = Harness::new();
    assert_eq!(h.render(|| delayed_reveal("spinner", ms(200))), Ok(false));

    h.sched.advance(ms(199));
    assert!(!h.comp.needs_render());
    assert_eq!(h.render(|| delayed_reveal("spinner", ms(200))), Ok(false));

    h.sched.advance(ms(1));
    assert!(h.comp.needs_render());
    assert_eq!(h.render(|| delayed_reveal("spinner", ms(200))), Ok(true));
}

#[test]
fn delayed_reveal_rerender_does_not_rearm() {
    let h = Harness::new();
    for _ in 0..5 {
        h.render(|| delayed_reveal("spinner", ms(200))).unwrap();
    }
    assert_eq!(h.sched.stats().scheduled, 1);
    assert_eq!(h.sched.pending(), 1);
}

#[test]
fn delayed_reveal_delay_change_recreates() {
    let h = Harness::new();
    h.render(|| delayed_reveal("spinner", ms(200))).unwrap();
    h.sched.advance(ms(150));
    h.render(|| delayed_reveal("spinner", ms(100))).unwrap();

    let stats = h.sched.stats();
    assert_eq!(stats.scheduled, 2);
    assert_eq!(stats.cancelled, 1);

    h.sched.advance(ms(99));
    assert_eq!(h.render(|| delayed_reveal("spinner", ms(100))), Ok(false));
    h.sched.advance(ms(1));
    assert_eq!(h.render(|| delayed_reveal("spinner", ms(100))), Ok(true));
}

#[test]
fn delayed_reveal_needs_scheduler() {
    let comp = Composition::new();
    let res = comp.render(|| delayed_reveal("spinner", ms(10)));
    assert_eq!(res, Err(HookError::NoScheduler));
}

#[test]
fn delayed_reveal_ms_rejects_negative() {
    let h = Harness::new();
    let res = h.render(|| delayed_reveal_ms("spinner", -200));
    assert_eq!(
        res,
        Err(HookError::Config(ConfigError::NegativeDuration {
            field: "delay_ms",
            value: -200
        }))
    );
    assert_eq!(h.sched.stats().scheduled, 0);
}

#[test]
fn dispose_cancels_outstanding_timers() {
    let h = Harness::new();
    h.render(|| {
        delayed_reveal("a", ms(200)).unwrap();
        debounced_value("b", 1u8, ms(100)).unwrap();
    });
    h.render(|| {
        delayed_reveal("a", ms(200)).unwrap();
        debounced_value("b", 2u8, ms(100)).unwrap();
    });
    assert_eq!(h.sched.pending(), 2);

    h.comp.dispose();
    assert_eq!(h.sched.pending(), 0);
    assert_eq!(h.sched.stats().cancelled, 2);
    assert_eq!(h.sched.advance(ms(1000)), 0);

    h.comp.dispose();
    assert_eq!(h.sched.stats().cancelled, 2);
}

#[test]
fn debounced_value_settles_on_latest() {
    let h = Harness::new();
    let render = |v: &'static str| h.render(|| debounced_value("color", v, ms(100)));

    assert_eq!(render("red"), Ok("red"));
    assert_eq!(h.sched.stats().scheduled, 0);

    assert_eq!(render("blue"), Ok("red"));
    h.sched.advance(ms(99));
    assert_eq!(render("blue"), Ok("red"));
    h.sched.advance(ms(1));
    assert!(h.comp.needs_render());
    assert_eq!(render("blue"), Ok("blue"));
}

#[test]
fn debounced_value_drops_intermediate_inputs() {
    let h = Harness::new();
    let render = |v: u32| h.render(|| debounced_value("n", v, ms(100)));

    render(0).unwrap();
    render(1).unwrap();
    h.sched.advance(ms(50));
    render(2).unwrap();
    h.sched.advance(ms(50));
    assert_eq!(render(2), Ok(0));

    h.sched.advance(ms(50));
    assert_eq!(render(2), Ok(2));
}

#[test]
fn debounced_color_uses_configured_window() {
    let h = Harness::new();
    let timing = TimingConfig {
        color_settle: ms(30),
        ..TimingConfig::default()
    };
    let render = |c: Color| with_timing(timing, || h.render(|| debounced_color("picker", c)));

    let red = Color::from_hex("#FF0000");
    let blue = Color::from_hex("#0000FF");
    assert_eq!(render(red), Ok(red));
    assert_eq!(render(blue), Ok(red));
    h.sched.advance(ms(30));
    assert_eq!(render(blue), Ok(blue));
}

#[test]
fn loading_indicator_waits_each_episode() {
    let h = Harness::new();
    let render = |loading: bool| h.render(|| loading_indicator_visible("page", loading));

    assert_eq!(render(true), Ok(false));
    h.sched.advance(ms(200));
    assert_eq!(render(true), Ok(true));

    assert_eq!(render(false), Ok(false));
    assert_eq!(h.sched.pending(), 0);

    assert_eq!(render(true), Ok(false));
    h.sched.advance(ms(199));
    assert_eq!(render(true), Ok(false));
    h.sched.advance(ms(1));
    assert_eq!(render(true), Ok(true));
}

#[test]
fn loading_finished_before_delay_never_shows() {
    let h = Harness::new();
    let render = |loading: bool| h.render(|| loading_indicator_visible("page", loading));

    render(true).unwrap();
    h.sched.advance(ms(50));
    assert_eq!(render(false), Ok(false));
    assert_eq!(h.sched.stats().cancelled, 1);
    assert_eq!(h.sched.advance(ms(500)), 0);
    assert!(!h.comp.needs_render());
}

#[test]
fn error_state_tracks_and_resets_on_source_change() {
    let h = Harness::new();
    let state = h.render(|| error_state("avatar", "a.png"));
    assert!(!state.has_error());

    state.set("404");
    assert!(h.comp.needs_render());
    let again = h.render(|| error_state("avatar", "a.png"));
    assert_eq!(again.message(), Some("404".to_string()));

    let fresh = h.render(|| error_state("avatar", "b.png"));
    assert!(!fresh.has_error());

    fresh.set("decode failed");
    fresh.clear();
    assert_eq!(fresh.message(), None);
}

#[test]
fn error_state_outside_composition_is_fresh() {
    let first = error_state("avatar", 1);
    first.set("boom");
    let second = error_state("avatar", 1);
    assert!(!second.has_error());
}

#[test]
fn hook_in_disposed_composition_stays_out_of_outer() {
    let h = Harness::new();
    let stale = Composition::new();
    stale.dispose();

    h.render(|| {
        let shown = stale.render(|| delayed_reveal("spinner", ms(200)));
        assert_eq!(shown, Ok(false));
    });
    // Not retained by the outer composition: torn down on the spot.
    assert_eq!(h.sched.pending(), 0);
    assert_eq!(h.sched.stats().cancelled, 1);

    h.render(|| delayed_reveal("spinner", ms(200))).unwrap();
    assert_eq!(h.sched.stats().scheduled, 2);
}
