//! A rainbow spiral on gray.

use turtle_canvas::{NamedColor, Rgb, Session, Sketch};

const SEGMENTS: u32 = 360;

#[derive(Default)]
pub struct Spiral;

impl Sketch for Spiral {
    fn setup(&mut self, session: &Session) {
        session.disable_looping();
        session.set_title("Color Spiral");
        session.set_background(NamedColor::Gray);

        let mut t = session.create_turtle();
        t.set_speed(1);
        t.set_pen_size(2.0);

        for i in 0..SEGMENTS {
            let hue = i as f64 / SEGMENTS as f64;
            t.set_pen_color(Rgb::from_hsb(hue, 1.0, 1.0));
            t.forward(i as f64 * 0.5);
            t.left(59.0);
        }

        t.hide();
    }
}
