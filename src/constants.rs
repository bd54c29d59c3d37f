// src/constants.rs

//! Kernel constants and configuration values
//!
//! Hardware addresses, the loader handoff layout, and the text shown during
//! boot live here so the rest of the kernel does not hard-code them.

/// COM1 base I/O port
pub const SERIAL_IO_PORT: u16 = 0x3F8;

/// Physical address of the slot where the loader stores the control block
/// pointer
pub const CONTROL_BLOCK_SLOT: u64 = 0x800;

/// Lowest address a control block may live at (the first page is never
/// handed out)
pub const MIN_CONTROL_BLOCK_ADDR: u64 = 0x1000;

/// End of the window the loader can place the control block in. It runs in
/// 32-bit mode, so everything it builds sits below 4 GiB.
pub const MAX_CONTROL_BLOCK_ADDR: u64 = 0x1_0000_0000;

/// Banner printed once the console is up
pub const BANNER: &str = "tiny_console";

/// List of major kernel features
///
/// Displayed during boot when the `verbose-boot` feature is enabled.
pub const FEATURES: &[&str] = &[
    "Bottom-row cursor with auto-wrap",
    "Scroll on newline and on full line",
    "Bounds carried by Row/Column types",
    "Validated loader control block read",
    "Serial log channel (COM1)",
    "CPU hlt idle loop",
];

/// Usage hints displayed to serial output
pub const SERIAL_HINTS: &[&str] = &[
    "Kernel running. System in low-power hlt loop.",
    "Press Ctrl+A, X to exit QEMU.",
];
