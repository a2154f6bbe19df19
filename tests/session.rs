use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use turtle_canvas::canvas::Surface;
use turtle_canvas::window::{HeadlessHandle, HeadlessWindow, Window, WindowEvent};
use turtle_canvas::{Error, Point, Rgb, Session, SessionConfig, Sketch};

fn session(width: u32, height: u32) -> Session {
    Session::with_config(width, height, SessionConfig::default()).unwrap()
}

fn close_after(handle: &HeadlessHandle, delay: Duration) -> thread::JoinHandle<()> {
    let handle = handle.clone();
    thread::spawn(move || {
        thread::sleep(delay);
        handle.close();
    })
}

fn assert_near(actual: Point, expected: (f64, f64)) {
    assert!(
        (actual.x - expected.0).abs() < 1e-9 && (actual.y - expected.1).abs() < 1e-9,
        "expected {expected:?}, got {actual:?}"
    );
}

// ---------------------------------------------------------------------------
// Drawing scenarios
// ---------------------------------------------------------------------------

#[test]
fn trunk_of_the_tree_ends_where_expected() {
    let s = session(800, 600);
    let mut t = s.create_turtle();
    t.set_speed(0);
    t.pen_up();
    t.teleport(0.0, -250.0);
    t.pen_down();
    t.set_heading(90.0);
    t.forward(100.0);

    assert_near(t.position(), (0.0, -150.0));
    // The trunk runs up the screen column x = 400 from y = 550 to 450.
    let trunk = s.canvas().read_back(|back| back.rgb(400, 500));
    assert_ne!(trunk, Some(Rgb::WHITE));
    let above = s.canvas().read_back(|back| back.rgb(400, 400));
    assert_eq!(above, Some(Rgb::WHITE));
}

#[test]
fn hexagon_closes_with_equal_sides() {
    let s = session(400, 400);
    let mut t = s.create_turtle();
    t.set_speed(0);

    let mut corners = vec![t.position()];
    for _ in 0..6 {
        t.forward(50.0);
        t.left(60.0);
        corners.push(t.position());
    }

    assert_near(t.position(), (0.0, 0.0));
    assert!(t.heading().abs() < 1e-9 || (t.heading() - 360.0).abs() < 1e-9);
    for pair in corners.windows(2) {
        assert!((pair[0].distance(pair[1]) - 50.0).abs() < 1e-9);
    }
}

#[test]
fn filled_square_covers_exactly_its_box() {
    let s = session(800, 600);
    let mut t = s.create_turtle();
    t.set_speed(0);
    t.pen_up();
    t.set_fill_color("red");
    t.begin_fill();
    for _ in 0..4 {
        t.forward(100.0);
        t.left(90.0);
    }
    t.end_fill();

    // Turtle square (0,0)-(100,100) lands on screen x 400..500, y 200..300.
    s.canvas().read_back(|back| {
        assert_eq!(back.rgb(400, 200), Some(Rgb::new(255, 0, 0)));
        assert_eq!(back.rgb(499, 299), Some(Rgb::new(255, 0, 0)));
        assert_eq!(back.rgb(399, 250), Some(Rgb::WHITE));
        assert_eq!(back.rgb(500, 250), Some(Rgb::WHITE));
        assert_eq!(back.rgb(450, 199), Some(Rgb::WHITE));
        assert_eq!(back.rgb(450, 300), Some(Rgb::WHITE));
    });
}

#[test]
fn filled_square_with_pen_down_gets_an_outline() {
    let s = session(800, 600);
    let mut t = s.create_turtle();
    t.set_speed(0);
    t.set_pen_size(4.0);
    t.set_pen_color("blue");
    t.set_fill_color("red");
    t.begin_fill();
    for _ in 0..4 {
        t.forward(100.0);
        t.left(90.0);
    }
    t.end_fill();

    // Same box as above; the 4px outline reaches 2px either side of each edge.
    let blue = Some(Rgb::new(0, 0, 255));
    s.canvas().read_back(|back| {
        assert_eq!(back.rgb(450, 250), Some(Rgb::new(255, 0, 0)));
        for (x, y) in [(450, 198), (450, 199), (450, 201), (398, 250), (501, 250), (450, 301)] {
            assert_eq!(back.rgb(x, y), blue, "({x}, {y})");
        }
        for (x, y) in [(450, 196), (450, 197), (397, 250), (502, 250), (450, 302)] {
            assert_eq!(back.rgb(x, y), Some(Rgb::WHITE), "({x}, {y})");
        }
    });
}

#[test]
fn drawing_before_run_stays_off_screen_until_refresh() {
    let s = session(100, 100);
    let mut t = s.create_turtle();
    t.set_speed(0);
    t.dot(20.0);

    assert_eq!(s.canvas().read_front(|front| front.rgb(50, 50)), Some(Rgb::WHITE));
    s.refresh();
    assert_eq!(s.canvas().read_front(|front| front.rgb(50, 50)), Some(Rgb::BLACK));
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Counting {
    looping: bool,
    stop_after: Option<usize>,
    setups: usize,
    draws: usize,
}

impl Sketch for Counting {
    fn setup(&mut self, session: &Session) {
        self.setups += 1;
        if !self.looping {
            session.disable_looping();
        }
        session.set_frame_rate(200);
    }

    fn draw(&mut self, session: &Session) {
        self.draws += 1;
        if self.stop_after == Some(self.draws) {
            session.stop();
        }
    }
}

#[test]
fn static_sketch_never_draws_and_ends_on_close() {
    let s = session(200, 100);
    let (window, handle) = HeadlessWindow::new();
    let closer = close_after(&handle, Duration::from_millis(200));

    let mut sketch = Counting::default();
    s.run_with(&mut sketch, window).unwrap();
    closer.join().unwrap();

    assert_eq!(sketch.setups, 1);
    assert_eq!(sketch.draws, 0);
    assert!(!s.is_running());
    assert_eq!(handle.opened(), Some((200, 100)));
    assert!(handle.presented() >= 1);
    assert!(handle.is_closed());
}

#[test]
fn animated_sketch_runs_until_it_stops_itself() {
    let s = session(50, 50);
    let (window, handle) = HeadlessWindow::new();

    let mut sketch = Counting {
        looping: true,
        stop_after: Some(5),
        ..Counting::default()
    };
    s.run_with(&mut sketch, window).unwrap();

    assert_eq!(sketch.setups, 1);
    assert_eq!(sketch.draws, 5);
    assert!(handle.is_closed());
}

#[test]
fn closing_the_window_stops_an_animation() {
    let s = session(50, 50);
    let (window, handle) = HeadlessWindow::new();
    let closer = close_after(&handle, Duration::from_millis(100));

    let mut sketch = Counting {
        looping: true,
        ..Counting::default()
    };
    s.run_with(&mut sketch, window).unwrap();
    closer.join().unwrap();

    assert!(sketch.draws >= 1);
    assert!(!s.is_running());
}

#[test]
fn a_session_runs_only_once() {
    let s = session(50, 50);
    let mut sketch = Counting {
        looping: true,
        stop_after: Some(1),
        ..Counting::default()
    };
    let (window, _handle) = HeadlessWindow::new();
    s.run_with(&mut sketch, window).unwrap();

    let (window, _handle) = HeadlessWindow::new();
    assert!(matches!(s.run_with(&mut sketch, window), Err(Error::AlreadyStarted)));
    assert_eq!(sketch.setups, 1);
}

#[derive(Default)]
struct SlowWalk {
    landed: Vec<Point>,
    took: Duration,
}

impl Sketch for SlowWalk {
    fn setup(&mut self, session: &Session) {
        session.disable_looping();
        let mut t = session.create_turtle();
        t.set_speed(255);
        let started = Instant::now();
        // 4 sub-steps each, 85ms apart.
        t.forward(5.0);
        self.landed.push(t.position());
        t.teleport(3.0, 4.0);
        self.landed.push(t.position());
        self.took = started.elapsed();
        session.stop();
    }
}

#[test]
fn slowest_moves_still_land_exactly_while_running() {
    let s = session(100, 100);
    let (window, handle) = HeadlessWindow::new();

    let mut sketch = SlowWalk::default();
    s.run_with(&mut sketch, window).unwrap();

    assert_eq!(sketch.landed, vec![Point::new(5.0, 0.0), Point::new(3.0, 4.0)]);
    assert!(sketch.took >= Duration::from_millis(8 * 85), "{:?}", sketch.took);
    assert!(handle.presented() >= 2);
}

/// Counts polls on the way through to a headless window.
struct CountingPolls {
    inner: HeadlessWindow,
    polls: Arc<AtomicUsize>,
}

impl Window for CountingPolls {
    fn open(&mut self, width: u32, height: u32, title: &str) -> anyhow::Result<()> {
        self.inner.open(width, height, title)
    }

    fn set_title(&mut self, title: &str) -> anyhow::Result<()> {
        self.inner.set_title(title)
    }

    fn poll(&mut self, timeout: Duration) -> anyhow::Result<Vec<WindowEvent>> {
        self.polls.fetch_add(1, Ordering::Relaxed);
        self.inner.poll(timeout)
    }

    fn present(&mut self, frame: &Surface) -> anyhow::Result<()> {
        self.inner.present(frame)
    }

    fn close(&mut self) -> anyhow::Result<()> {
        self.inner.close()
    }
}

struct StopsLater;

impl Sketch for StopsLater {
    fn setup(&mut self, session: &Session) {
        session.disable_looping();
        thread::sleep(Duration::from_millis(300));
        session.stop();
    }
}

#[test]
fn display_keeps_its_pace_without_a_handle() {
    let s = session(20, 20);
    let (inner, handle) = HeadlessWindow::new();
    drop(handle);
    let polls = Arc::new(AtomicUsize::new(0));
    let window = CountingPolls {
        inner,
        polls: Arc::clone(&polls),
    };

    s.run_with(&mut StopsLater, window).unwrap();

    // 60 repaints a second over 300ms is about 18 polls.
    let polls = polls.load(Ordering::Relaxed);
    assert!((1..=40).contains(&polls), "{polls} polls");
}

// ---------------------------------------------------------------------------
// Display and input
// ---------------------------------------------------------------------------

struct Square;

impl Sketch for Square {
    fn setup(&mut self, session: &Session) {
        session.disable_looping();
        session.set_title("Renamed");
        let mut t = session.create_turtle();
        t.set_fill_color("blue");
        t.begin_fill();
        for _ in 0..4 {
            t.forward(40.0);
            t.left(90.0);
        }
        t.end_fill();
        t.hide();
    }
}

#[test]
fn static_frame_reaches_the_window() {
    let s = session(100, 100);
    let (window, handle) = HeadlessWindow::new();
    let closer = close_after(&handle, Duration::from_millis(300));

    s.run_with(&mut Square, window).unwrap();
    closer.join().unwrap();

    let frame = handle.last_frame().unwrap();
    // Turtle square (0,0)-(40,40) is screen x 50..90, y 10..50.
    assert_eq!(frame.rgb(70, 30), Some(Rgb::new(0, 0, 255)));
    assert_eq!(frame.rgb(20, 80), Some(Rgb::WHITE));
    assert_eq!(handle.title(), "Renamed");
}

#[derive(Default)]
struct Listener {
    keys: Vec<Option<String>>,
    click: Option<(i32, i32)>,
    clicked_twice: bool,
}

impl Sketch for Listener {
    fn setup(&mut self, session: &Session) {
        session.disable_looping();
        thread::sleep(Duration::from_millis(200));
        self.keys.push(session.last_key());
        self.keys.push(session.last_key());
        if session.is_mouse_clicked() {
            self.click = Some((session.mouse_x(), session.mouse_y()));
        }
        self.clicked_twice = session.is_mouse_clicked();
        session.stop();
    }
}

#[test]
fn input_keeps_only_the_latest_event() {
    let s = session(200, 100);
    let (window, handle) = HeadlessWindow::new();
    handle.key("a");
    handle.key("b");
    handle.click(150.0, 20.0);

    let mut sketch = Listener::default();
    s.run_with(&mut sketch, window).unwrap();

    assert_eq!(sketch.keys, vec![Some("b".to_string()), None]);
    assert_eq!(sketch.click, Some((50, 30)));
    assert!(!sketch.clicked_twice);
}
