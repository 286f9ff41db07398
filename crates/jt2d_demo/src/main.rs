//! Thin runnable driver: builds an `Engine`, runs a named scenario to a
//! final time, and writes a PGM snapshot of the depth field. Everything
//! here is outside the solver's core contract (spec.md scopes argument
//! parsing and run scheduling out of the core); it exists only to give the
//! workspace a runnable artifact.

use anyhow::Result;
use jt2d_core::scenarios::{circular_dam_break, still_pond};
use jt2d_core::{Engine, ShallowWater};

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let scenario = args.next().unwrap_or_else(|| "dam-break".to_string());
    let tfinal: f64 = args
        .next()
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or(0.5);

    let mut engine = Engine::new(2.0, 2.0, 200, 200, 0.2, 2.0, ShallowWater::default())?;

    match scenario.as_str() {
        "still-pond" => engine.init(still_pond),
        "dam-break" => {
            let init = circular_dam_break(1.0, 1.0, 0.5);
            engine.init(init);
        }
        other => anyhow::bail!("unknown scenario {other:?} (expected still-pond or dam-break)"),
    }

    engine.run(tfinal).map_err(anyhow::Error::from)?;
    engine.write_pgm("out.pgm", |u| (u[0] * 100.0) as i32)?;
    println!("wrote out.pgm at t = {}", engine.t);
    Ok(())
}
