//! Interactive doodling: arrow keys steer, a click jumps there, `space`
//! toggles the pen and `c` wipes the drawing.

use turtle_canvas::{Align, Font, Point, Rgb, Session, Sketch, Turtle};

const STEP: f64 = 10.0;
const TURN: f64 = 15.0;
const INK: Rgb = Rgb::new(128, 0, 128);
const INK_WIDTH: f64 = 3.0;

#[derive(Default)]
pub struct Doodle {
    pen: Option<Turtle>,
    label: Option<Turtle>,
    /// Turtle-space polylines drawn so far. The animated loop clears the
    /// canvas every frame, so they are replayed each time.
    strokes: Vec<Vec<Point>>,
}

impl Sketch for Doodle {
    fn setup(&mut self, session: &Session) {
        session.set_title("Doodle");
        session.set_frame_rate(30);

        let mut pen = session.create_turtle();
        pen.set_speed(0);
        pen.set_shape("turtle");
        pen.set_scale(1.5);
        pen.set_fill_color("green");
        pen.set_pen_size(INK_WIDTH);
        pen.set_pen_color(INK);
        self.strokes.push(vec![pen.position()]);

        let mut label = session.create_turtle();
        label.hide();
        label.pen_up();
        label.set_speed(0);
        label.set_pen_color("gray");
        label.teleport(
            -(session.width() as f64) / 2.0 + 8.0,
            session.height() as f64 / 2.0 - 20.0,
        );

        self.pen = Some(pen);
        self.label = Some(label);
    }

    fn draw(&mut self, session: &Session) {
        let (Some(pen), Some(label)) = (self.pen.as_mut(), self.label.as_mut()) else {
            return;
        };

        if session.is_mouse_clicked() {
            let down = pen.is_down();
            pen.pen_up();
            pen.teleport(session.mouse_x() as f64, session.mouse_y() as f64);
            if down {
                pen.pen_down();
            }
            self.strokes.push(vec![pen.position()]);
        }

        if let Some(key) = session.last_key() {
            match key.as_str() {
                "up" => pen.forward(STEP),
                "down" => pen.backward(STEP),
                "left" => pen.left(TURN),
                "right" => pen.right(TURN),
                "space" if pen.is_down() => pen.pen_up(),
                "space" => {
                    pen.pen_down();
                    self.strokes.push(vec![pen.position()]);
                }
                "c" => {
                    pen.pen_up();
                    pen.home();
                    pen.pen_down();
                    self.strokes = vec![vec![pen.position()]];
                }
                _ => {}
            }
            if pen.is_down() {
                if let Some(stroke) = self.strokes.last_mut() {
                    if stroke.last() != Some(&pen.position()) {
                        stroke.push(pen.position());
                    }
                }
            }
        }

        let canvas = session.canvas();
        for stroke in &self.strokes {
            for pair in stroke.windows(2) {
                let from = canvas.map_to_screen(pair[0]);
                let to = canvas.map_to_screen(pair[1]);
                canvas.draw_segment(from, to, INK, INK_WIDTH);
            }
        }

        let status = format!(
            "x {:.0}  y {:.0}  heading {:.0}",
            pen.x(),
            pen.y(),
            pen.heading()
        );
        label.write_with(&status, Align::Left, Font::new(12.0));
    }
}
