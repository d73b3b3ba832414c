//! Event translation and queueing tests against the headless platform

use std::cell::Cell;
use std::rc::Rc;

use native_window::message::opcode;
use native_window::platform::headless::Headless;
use native_window::prelude::*;

fn open() -> Window<Headless> {
    Window::new(800, 600, "events", WindowStyle::DEFAULT).unwrap()
}

#[test]
fn test_empty_queue() {
    let mut window = open();
    window.pump_events();

    assert!(!window.has_event());
    assert_eq!(window.pop_event(), None);
    assert!(window.pop_all_events().is_empty());
}

#[test]
fn test_pop_all_preserves_order_and_empties() {
    let mut window = open();
    let handle = window.native_handle();

    Headless::post(handle, RawMessage::set_focus());
    Headless::post(handle, RawMessage::key_down(0x41, false));
    Headless::post(handle, RawMessage::char_unit(u16::from(b'a')));
    Headless::post(handle, RawMessage::key_up(0x41));
    Headless::post(handle, RawMessage::button(opcode::LBUTTON_DOWN, 10, 20));
    Headless::post(handle, RawMessage::wheel(-240));
    Headless::post(handle, RawMessage::close());
    window.pump_events();

    assert_eq!(window.pending_events(), 7);
    let events = window.pop_all_events();
    assert_eq!(
        events,
        vec![
            Event::FocusGained,
            Event::KeyDown { key: KeyCode::A, modifiers: Modifiers::empty(), repeat: false },
            Event::TextInput('a'),
            Event::KeyUp { key: KeyCode::A, modifiers: Modifiers::empty(), repeat: false },
            Event::MouseButtonDown { button: MouseButton::Left, x: 10, y: 20 },
            Event::MouseWheel { delta_x: 0.0, delta_y: -2.0 },
            Event::Close,
        ]
    );
    assert!(!window.has_event());
}

#[test]
fn test_pop_event_is_fifo() {
    let mut window = open();
    let handle = window.native_handle();

    Headless::post(handle, RawMessage::set_focus());
    Headless::post(handle, RawMessage::close());
    window.pump_events();

    assert_eq!(window.pop_event(), Some(Event::FocusGained));
    assert!(window.has_event());
    assert_eq!(window.pop_event(), Some(Event::Close));
    assert_eq!(window.pop_event(), None);
}

#[test]
fn test_close_does_not_destroy_window() {
    let mut window = open();
    let handle = window.native_handle();

    Headless::post(handle, RawMessage::close());
    Headless::post(handle, RawMessage::close());
    window.pump_events();

    assert_eq!(window.pop_all_events(), vec![Event::Close, Event::Close]);
    assert!(Headless::window_exists(handle));
}

#[test]
fn test_set_size_to_current_size_is_silent() {
    let mut window = open();

    window.set_size(800, 600);
    window.pump_events();

    assert!(!window.has_event());
    assert_eq!(Headless::pending_messages(), 0);
}

#[test]
fn test_resize_emits_exactly_one_event() {
    let mut window = open();

    window.set_size(1024, 768);
    window.pump_events();
    assert_eq!(window.pop_all_events(), vec![Event::Resize { width: 1024, height: 768 }]);
    assert_eq!(window.size(), (1024, 768));

    window.set_size(1024, 768);
    window.pump_events();
    assert!(!window.has_event());
}

#[test]
fn test_oversized_resize_reports_stored_size() {
    let mut window = open();

    window.set_size(70_000, 100);
    window.pump_events();

    assert_eq!(window.pop_all_events(), vec![Event::Resize { width: 65_535, height: 100 }]);
    assert_eq!(window.size(), (65_535, 100));
}

#[test]
fn test_duplicate_size_notifications_are_collapsed() {
    let mut window = open();
    let handle = window.native_handle();

    Headless::post(handle, RawMessage::size(800, 600));
    Headless::post(handle, RawMessage::size(640, 480));
    Headless::post(handle, RawMessage::size(640, 480));
    window.pump_events();

    assert_eq!(window.pop_all_events(), vec![Event::Resize { width: 640, height: 480 }]);
}

#[test]
fn test_move_reports_client_origin() {
    let mut window = open();

    window.set_position(5, -6);
    window.pump_events();

    assert_eq!(window.pop_all_events(), vec![Event::Move { x: 5, y: -6 }]);
    assert_eq!(window.position(), (5, -6));

    window.set_position(5, -6);
    window.pump_events();
    assert!(!window.has_event());
}

#[test]
fn test_key_repeat_suppression() {
    let mut window = open();
    let handle = window.native_handle();
    let key_down = |repeat| Event::KeyDown { key: KeyCode::W, modifiers: Modifiers::empty(), repeat };

    Headless::post(handle, RawMessage::key_down(0x57, false));
    Headless::post(handle, RawMessage::key_down(0x57, true));
    window.pump_events();
    assert_eq!(window.pop_all_events(), vec![key_down(false), key_down(true)]);

    window.set_key_repeat(false);
    Headless::post(handle, RawMessage::key_down(0x57, true));
    Headless::post(handle, RawMessage::key_down(0x57, true));
    Headless::post(handle, RawMessage::key_up(0x57));
    Headless::post(handle, RawMessage::key_down(0x57, false));
    window.pump_events();
    assert_eq!(
        window.pop_all_events(),
        vec![
            Event::KeyUp { key: KeyCode::W, modifiers: Modifiers::empty(), repeat: false },
            key_down(false),
        ]
    );

    window.set_key_repeat(true);
    Headless::post(handle, RawMessage::key_down(0x57, true));
    window.pump_events();
    assert_eq!(window.pop_all_events(), vec![key_down(true)]);
}

#[test]
fn test_modifiers_captured_at_delivery() {
    let mut window = open();
    let handle = window.native_handle();

    Headless::set_modifiers(Modifiers::SHIFT | Modifiers::CONTROL);
    Headless::post(handle, RawMessage::key_down(0x53, false));
    Headless::set_modifiers(Modifiers::empty());
    window.pump_events();

    assert_eq!(
        window.pop_event(),
        Some(Event::KeyDown { key: KeyCode::S, modifiers: Modifiers::SHIFT | Modifiers::CONTROL, repeat: false })
    );
}

#[test]
fn test_mouse_enter_precedes_first_move() {
    let mut window = open();
    let handle = window.native_handle();

    Headless::post(handle, RawMessage::mouse_move(1, 2));
    Headless::post(handle, RawMessage::mouse_move(3, 4));
    window.pump_events();
    assert_eq!(
        window.pop_all_events(),
        vec![Event::MouseEnter, Event::MouseMove { x: 1, y: 2 }, Event::MouseMove { x: 3, y: 4 }]
    );
    assert!(Headless::is_leave_tracking_armed(handle));

    assert!(Headless::post_mouse_leave(handle));
    Headless::post(handle, RawMessage::mouse_move(5, 6));
    window.pump_events();
    assert_eq!(
        window.pop_all_events(),
        vec![Event::MouseLeave, Event::MouseEnter, Event::MouseMove { x: 5, y: 6 }]
    );

    // Entering again re-armed the one-shot leave notification
    assert!(Headless::is_leave_tracking_armed(handle));
}

#[test]
fn test_focus_loss_resets_pointer_inside() {
    let mut window = open();
    let handle = window.native_handle();

    Headless::post(handle, RawMessage::mouse_move(1, 1));
    Headless::post(handle, RawMessage::kill_focus());
    Headless::post(handle, RawMessage::mouse_move(2, 2));
    window.pump_events();

    assert_eq!(
        window.pop_all_events(),
        vec![
            Event::MouseEnter,
            Event::MouseMove { x: 1, y: 1 },
            Event::FocusLost,
            Event::MouseEnter,
            Event::MouseMove { x: 2, y: 2 },
        ]
    );
}

#[test]
fn test_leave_pairs_with_enter_across_focus_loss() {
    let mut window = open();
    let handle = window.native_handle();

    Headless::post(handle, RawMessage::mouse_move(1, 1));
    window.pump_events();
    Headless::post(handle, RawMessage::kill_focus());
    assert!(Headless::post_mouse_leave(handle));
    window.pump_events();

    assert_eq!(
        window.pop_all_events(),
        vec![Event::MouseEnter, Event::MouseMove { x: 1, y: 1 }, Event::FocusLost]
    );
}

#[test]
fn test_surrogate_pair_becomes_one_character() {
    let mut window = open();
    let handle = window.native_handle();

    Headless::post(handle, RawMessage::char_unit(0xD83D));
    Headless::post(handle, RawMessage::char_unit(0xDE00));
    window.pump_events();

    assert_eq!(window.pop_all_events(), vec![Event::TextInput('\u{1F600}')]);
}

#[test]
fn test_hook_handling_close_suppresses_every_close() {
    let mut window = open();
    let handle = window.native_handle();
    let intercepted = Rc::new(Cell::new(0));

    let counter = Rc::clone(&intercepted);
    window.set_message_hook(move |message: &RawMessage| {
        if message.opcode == opcode::CLOSE {
            counter.set(counter.get() + 1);
            HookResponse::Handled
        } else {
            HookResponse::Declined
        }
    });

    for _ in 0..5 {
        Headless::post(handle, RawMessage::close());
    }
    Headless::post(handle, RawMessage::set_focus());
    window.pump_events();

    assert_eq!(intercepted.get(), 5);
    assert_eq!(window.pop_all_events(), vec![Event::FocusGained]);

    window.clear_message_hook();
    Headless::post(handle, RawMessage::close());
    window.pump_events();
    assert_eq!(window.pop_all_events(), vec![Event::Close]);
}

#[test]
fn test_handled_message_does_not_update_stored_size() {
    let mut window = open();
    let handle = window.native_handle();

    window.set_message_hook(|message: &RawMessage| {
        if message.opcode == opcode::SIZE {
            HookResponse::Handled
        } else {
            HookResponse::Declined
        }
    });
    Headless::post(handle, RawMessage::size(1024, 768));
    window.pump_events();
    assert!(!window.has_event());

    window.clear_message_hook();
    Headless::post(handle, RawMessage::size(1024, 768));
    window.pump_events();
    assert_eq!(window.pop_all_events(), vec![Event::Resize { width: 1024, height: 768 }]);
}

#[test]
fn test_pump_routes_to_each_owner() {
    let mut first = open();
    let mut second = open();

    Headless::post(first.native_handle(), RawMessage::close());
    Headless::post(second.native_handle(), RawMessage::set_focus());
    first.pump_events();

    assert_eq!(first.pop_all_events(), vec![Event::Close]);
    assert_eq!(second.pop_all_events(), vec![Event::FocusGained]);
}

#[test]
fn test_messages_for_dropped_window_are_ignored() {
    let gone = open();
    let mut window = open();
    let stale = gone.native_handle();
    drop(gone);

    Headless::post(stale, RawMessage::close());
    window.pump_events();

    assert!(!window.has_event());
}
