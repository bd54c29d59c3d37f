//! The global console on a hosted build renders into memory.
//!
//! Kept in its own test binary: the console is process-wide state.

use tiny_console::vga_buffer::constants::VGA_HEIGHT;
use tiny_console::vga_buffer::{self, Row};

fn row_text(row: usize) -> String {
    vga_buffer::with_console(|console| {
        let row = Row::new(row).expect("row in range");
        String::from_utf8_lossy(&console.buffer().row_text(row))
            .trim_end()
            .to_string()
    })
}

#[test]
fn test_global_console_free_functions() {
    assert!(!vga_buffer::is_accessible());
    assert_eq!(vga_buffer::init(), Ok(()));
    assert!(vga_buffer::is_accessible());

    vga_buffer::emit_char(b'A');
    vga_buffer::emit(b"B\n\0ignored");
    assert_eq!(row_text(VGA_HEIGHT - 2), "AB");

    vga_buffer::emit_hex(0xff);
    tiny_console::println!(" {}", 7);
    assert_eq!(row_text(VGA_HEIGHT - 2), "0xff 7");

    vga_buffer::clear();
    assert_eq!(row_text(VGA_HEIGHT - 2), "");
    assert_eq!(vga_buffer::try_with_console(|console| console.column()), Some(0));
}
