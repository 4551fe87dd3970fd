//! Integration tests for xredirect-input
//!
//! Tests that talk to a real X server are marked #[ignore].
//! Run with: DISPLAY=:0 cargo test -- --ignored

use std::sync::Arc;
use x11rb::connection::Connection;
use xredirect_input::{MouseButton, PointerInjector, Result, XTestPointer};

#[derive(Debug, PartialEq)]
enum Event {
    Move(i32, i32),
    Down(MouseButton),
    Up(MouseButton),
    Flush,
}

#[derive(Default)]
struct Recorder {
    events: Vec<Event>,
}

impl PointerInjector for Recorder {
    fn move_to(&mut self, x: i32, y: i32) -> Result<()> {
        self.events.push(Event::Move(x, y));
        Ok(())
    }

    fn button_down(&mut self, button: MouseButton) -> Result<()> {
        self.events.push(Event::Down(button));
        Ok(())
    }

    fn button_up(&mut self, button: MouseButton) -> Result<()> {
        self.events.push(Event::Up(button));
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.events.push(Event::Flush);
        Ok(())
    }
}

#[test]
fn click_is_move_press_release_flush() {
    let mut rec = Recorder::default();
    rec.click_at(1839, 60, MouseButton::Left).expect("click");
    assert_eq!(
        rec.events,
        vec![
            Event::Move(1839, 60),
            Event::Down(MouseButton::Left),
            Event::Up(MouseButton::Left),
            Event::Flush,
        ]
    );
}

#[test]
fn click_passes_off_screen_coordinates_through() {
    let mut rec = Recorder::default();
    rec.click_at(-20, 99_999, MouseButton::Right).expect("click");
    assert_eq!(rec.events[0], Event::Move(-20, 99_999));
}

fn live_pointer() -> XTestPointer<x11rb::rust_connection::RustConnection> {
    let (conn, screen_num) = x11rb::connect(None).expect("failed to connect to X server");
    let root = conn.setup().roots[screen_num].root;
    XTestPointer::new(Arc::new(conn), root)
}

#[test]
#[ignore = "requires a running X server with XTEST"]
fn live_click() {
    let mut pointer = live_pointer();
    let result = pointer.click_at(10, 10, MouseButton::Left);
    assert!(result.is_ok(), "should click: {:?}", result.err());
    assert!(!pointer.is_button_held(MouseButton::Left));
}

#[test]
#[ignore = "requires a running X server with XTEST"]
fn live_release_all_after_press() {
    let mut pointer = live_pointer();
    pointer.button_down(MouseButton::Middle).expect("press");
    assert!(pointer.is_button_held(MouseButton::Middle));
    pointer.release_all().expect("release");
    assert!(!pointer.is_button_held(MouseButton::Middle));
}
