//! Regular polygons and a circle, mostly filled.

use turtle_canvas::{Rgb, Session, Sketch, Turtle};

#[derive(Default)]
pub struct Polygons;

impl Sketch for Polygons {
    fn setup(&mut self, session: &Session) {
        session.disable_looping();
        session.set_title("Polygons");

        let mut t = session.create_turtle();
        t.set_speed(10);
        t.set_pen_size(2.0);

        move_to(&mut t, -250.0, 100.0);
        t.set_pen_color("red");
        polygon(&mut t, 3, 80.0);

        move_to(&mut t, -50.0, 100.0);
        t.set_pen_color("blue");
        t.set_fill_color((200, 200, 255));
        filled(&mut t, |t| polygon(t, 4, 70.0));

        move_to(&mut t, 150.0, 100.0);
        t.set_pen_color("green");
        t.set_fill_color((200, 255, 200));
        filled(&mut t, |t| polygon(t, 5, 50.0));

        move_to(&mut t, -150.0, -150.0);
        t.set_pen_color("orange");
        t.set_fill_color(Rgb::new(255, 230, 200));
        filled(&mut t, |t| t.circle(50.0));

        move_to(&mut t, 100.0, -150.0);
        t.set_pen_color("magenta");
        t.set_fill_color("#ffc8ff");
        filled(&mut t, |t| polygon(t, 6, 40.0));

        t.hide();
    }
}

fn move_to(t: &mut Turtle, x: f64, y: f64) {
    t.pen_up();
    t.teleport(x, y);
    t.pen_down();
}

fn filled(t: &mut Turtle, outline: impl FnOnce(&mut Turtle)) {
    t.begin_fill();
    outline(t);
    t.end_fill();
}

/// Trace a regular polygon counter-clockwise from the current pose.
pub fn polygon(t: &mut Turtle, sides: u32, side: f64) {
    let turn = 360.0 / sides as f64;
    for _ in 0..sides {
        t.forward(side);
        t.left(turn);
    }
}
