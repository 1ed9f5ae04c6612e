//! Synthetic frame-loop demo: instruments a fake game loop and prints the
//! accumulated call tree.

use std::io::{self, Write as _};
use std::time::{Duration, Instant};

use anyhow::Result;
use frameprof_core::{ProfileSession, ReportOrder, SampleGuard, render_report};

fn main() -> Result<()> {
    env_logger::init();

    let mut frames: u32 = 60;
    let mut order = ReportOrder::Discovery;
    let mut json = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--hot" => order = ReportOrder::HottestFirst,
            "--json" => json = true,
            "--help" | "-h" => {
                eprintln!("Usage: frameprof [FRAMES] [--hot] [--json]");
                return Ok(());
            }
            other => {
                let Ok(n) = other.parse::<u32>() else {
                    eprintln!("Usage: frameprof [FRAMES] [--hot] [--json]");
                    std::process::exit(1);
                };
                frames = n;
            }
        }
    }

    let mut session = ProfileSession::new();
    let started = Instant::now();
    for frame in 0..frames {
        run_frame(&mut session, frame);
        session.advance_frame();
    }
    log::debug!(
        "simulated {frames} frames in {:.1} ms",
        started.elapsed().as_secs_f64() * 1000.0
    );

    let mut stdout = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, &session.snapshot())?;
        writeln!(stdout)?;
    } else {
        stdout.write_all(render_report(&session, order).as_bytes())?;
    }
    Ok(())
}

/// One simulated frame: update { physics (recursive), ai } then
/// render { culling, draw }, with a periodic draw spike.
fn run_frame(session: &mut ProfileSession, frame: u32) {
    {
        let mut update = session.enter("update");
        {
            let mut physics = update.enter("physics");
            integrate(&mut physics, 3);
        }
        let _ai = update.enter("ai");
        spin(Duration::from_micros(150));
    }

    session.scoped("render", |s| {
        s.scoped("culling", |_| spin(Duration::from_micros(80)));
        s.scoped("draw", |_| {
            let cost = if frame % 10 == 0 { 900 } else { 300 };
            spin(Duration::from_micros(cost));
        });
    });
}

/// Recursive sub-stepping: re-entrant samples collapse into one node.
fn integrate(scope: &mut SampleGuard<'_>, depth: u32) {
    spin(Duration::from_micros(60));
    if depth > 0 {
        let mut nested = scope.enter("physics");
        integrate(&mut nested, depth - 1);
    }
}

/// Busy-wait so spans have a measurable width without sleep jitter.
fn spin(budget: Duration) {
    let start = Instant::now();
    while start.elapsed() < budget {
        std::hint::spin_loop();
    }
}
