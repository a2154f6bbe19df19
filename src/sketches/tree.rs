//! A recursive fractal tree, greener and thinner toward the tips.

use turtle_canvas::{Rgb, Session, Sketch, Turtle};

use super::unit_rgb;

const DEPTH: u32 = 10;

#[derive(Default)]
pub struct Tree;

impl Sketch for Tree {
    fn setup(&mut self, session: &Session) {
        session.disable_looping();
        session.set_title("Fractal Tree");
        session.set_background(Rgb::new(50, 50, 100));

        let mut t = session.create_turtle();
        t.set_speed(1);
        t.hide();
        t.set_pen_size(2.0);

        t.pen_up();
        t.teleport(0.0, -250.0);
        t.pen_down();
        t.set_heading(90.0);

        branch(&mut t, 100.0, DEPTH);
    }
}

fn branch(t: &mut Turtle, length: f64, depth: u32) {
    if depth == 0 || length < 2.0 {
        return;
    }

    let green = (0.2 + (DEPTH - depth) as f64 * 0.08).min(1.0);
    let red = (0.4 - depth as f64 * 0.03).max(0.1);
    t.set_pen_color(unit_rgb(red, green, 0.1));
    t.set_pen_size(depth as f64 + 1.0);
    t.forward(length);

    let fork = t.position();
    let heading = t.heading();

    for turn in [30.0, -30.0] {
        t.left(turn);
        branch(t, length * 0.7, depth - 1);
        t.pen_up();
        t.teleport(fork.x, fork.y);
        t.set_heading(heading);
        t.pen_down();
    }
}
