//! Nested polygon outlines of growing size, all starting from the same
//! corner offset.

use turtle_canvas::{Rgb, Session, Sketch};

use super::polygons::polygon;

pub struct Rings {
    pub sides: u32,
    pub side: f64,
    pub count: u32,
}

impl Sketch for Rings {
    fn setup(&mut self, session: &Session) {
        session.disable_looping();
        session.set_title("Polygon Rings");
        session.set_background(Rgb::new(50, 50, 100));

        let mut t = session.create_turtle();
        t.set_speed(1);
        t.hide();
        t.set_pen_size(2.0);
        t.set_color("blue");

        let mut side = self.side;
        for _ in 0..self.count {
            t.pen_up();
            t.teleport(-side / 2.0 - 20.0, -side / 2.0 - 20.0);
            t.pen_down();
            t.set_heading(0.0);
            polygon(&mut t, self.sides.max(3), side);
            side += 20.0;
        }
    }
}
