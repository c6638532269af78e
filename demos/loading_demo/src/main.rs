use std::rc::Rc;

use tarry_core::*;
use tarry_ui::{HookError, debounced_color, loading_indicator_visible};
use web_time::{Duration, Instant};

struct Frame {
    spinner: bool,
    swatch: Color,
}

fn page(loading: bool, picked: Color) -> Result<Frame, HookError> {
    Ok(Frame {
        spinner: loading_indicator_visible("page", loading)?,
        swatch: debounced_color("swatch", picked)?,
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let ev = Rc::new(EventLoop::new());
    let comp = Composition::new();
    let render = |loading: bool, picked: Color| -> Result<Frame, HookError> {
        with_scheduler(ev.clone(), || comp.render(|| page(loading, picked)))
    };

    // A drag across three colors, then a slow load.
    let drag = ["#FF0000", "#00FF00", "#0000FF"].map(Color::from_hex);
    let mut frame = render(true, drag[0])?;
    for c in drag {
        frame = render(true, c)?;
        std::thread::sleep(Duration::from_millis(20));
        ev.run_due();
    }
    log::info!(
        "after drag: spinner={} swatch={}",
        frame.spinner,
        frame.swatch.to_hex()
    );

    while let Some(at) = ev.next_deadline() {
        std::thread::sleep(at.saturating_duration_since(Instant::now()));
        ev.run_due();
        if comp.take_invalidation() {
            frame = render(true, drag[2])?;
            log::info!(
                "re-rendered: spinner={} swatch={}",
                frame.spinner,
                frame.swatch.to_hex()
            );
        }
    }

    frame = render(false, drag[2])?;
    log::info!("load finished: spinner={}", frame.spinner);

    comp.dispose();
    log::info!("timers: {:?}", ev.stats());
    Ok(())
}
