mod sketches;

use std::process;

use anyhow::{Context, Result, bail};

use turtle_canvas::{Session, Sketch, logging};

use sketches::{doodle::Doodle, polygons::Polygons, rings::Rings, spiral::Spiral, tree::Tree};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

const RINGS_USAGE: &str = "turtle-canvas rings <sides 3-12> <side length> <count>";

fn run() -> Result<()> {
    logging::init_from_env()?;
    let mut args = std::env::args().skip(1);

    match args.next().as_deref() {
        Some("tree") => show(&mut Tree),
        Some("polygons") => show(&mut Polygons),
        Some("spiral") => show(&mut Spiral),
        Some("doodle") => show(&mut Doodle::default()),
        Some("rings") => {
            let mut number = |what: &str| -> Result<u32> {
                let arg = args.next().context(RINGS_USAGE)?;
                arg.parse()
                    .with_context(|| format!("{what} must be a whole number, got {arg:?}"))
            };
            let sides = number("sides")?;
            let side = number("side length")?;
            let count = number("count")?;
            if !(3..=12).contains(&sides) {
                bail!("sides must be between 3 and 12, got {sides}");
            }
            show(&mut Rings {
                sides,
                side: side as f64,
                count,
            })
        }
        _ => bail!(
            "Turtle Canvas — turtle graphics in the terminal\n\nUsage:\n  turtle-canvas tree\n  turtle-canvas polygons\n  turtle-canvas spiral\n  turtle-canvas doodle\n  {RINGS_USAGE}"
        ),
    }
}

fn show(sketch: &mut impl Sketch) -> Result<()> {
    let session = Session::new(WIDTH, HEIGHT)?;
    session.run(sketch)?;
    Ok(())
}
