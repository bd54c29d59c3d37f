//! tiny_console kernel entry
//!
//! On the bare-metal target the loader jumps to `kernel_main`. Hosted builds
//! run the same screen sequence against a stub buffer and dump the grid to
//! stdout.

#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![allow(missing_docs)]

use tiny_console::constants::BANNER;
#[cfg(feature = "verbose-boot")]
use tiny_console::constants::FEATURES;
use tiny_console::loader::{ControlBlock, LoaderError, report_control_block};
use tiny_console::vga_buffer::{Console, VgaBufferAccess};

/// Banner, greeting and the control block report, in boot order.
fn render_boot_screen<B: VgaBufferAccess>(
    console: &mut Console<B>,
    block: &Result<ControlBlock, LoaderError>,
) {
    console.emit_str(BANNER);
    console.emit_str(" (");
    console.emit_str(env!("BUILD_PROFILE"));
    console.emit_str(")\n");

    #[cfg(feature = "verbose-boot")]
    for feature in FEATURES {
        console.emit_str("  - ");
        console.emit_str(feature);
        console.emit_char(b'\n');
    }

    console.emit(b"hello world!\n\0");
    report_control_block(console, block);
}

#[cfg(target_os = "none")]
mod kernel {
    use super::render_boot_screen;
    use bootloader::{BootInfo, entry_point};
    use core::panic::PanicInfo;
    use tiny_console::constants::SERIAL_HINTS;
    use tiny_console::errors::{ErrorContext, KernelError};
    use tiny_console::loader::{ControlBlockReader, report_descriptors};
    use tiny_console::vga_buffer::HexDigits;
    use tiny_console::{init, serial, vga_buffer};

    entry_point!(kernel_main);

    /// Report a fatal boot error over COM1 and stop.
    fn give_up(err: KernelError) -> ! {
        // Without a console there is nowhere left to report to but COM1.
        tiny_console::serial_println!("[FATAL] {} ({})", err, err.context());

        #[cfg(feature = "qemu-exit")]
        tiny_console::exit_qemu(tiny_console::QemuExitCode::Failed);

        #[cfg(not(feature = "qemu-exit"))]
        init::halt_forever()
    }

    fn kernel_main(boot_info: &'static BootInfo) -> ! {
        if let Err(err) = init::initialize_all() {
            give_up(err);
        }

        log::info!(
            "{} booted ({}, {})",
            tiny_console::constants::BANNER,
            env!("BUILD_PROFILE"),
            env!("BUILD_TARGET")
        );
        log::debug!(
            "text buffer at {}",
            HexDigits::new(vga_buffer::constants::VGA_BUFFER_ADDR as u64)
        );

        let reader = ControlBlockReader::new(boot_info.physical_memory_offset);
        // SAFETY: the loader maps all physical memory at physical_memory_offset,
        // which covers both the slot and the control block window.
        let block = unsafe { reader.read() };
        let descriptors = block
            .map_err(KernelError::from)
            // SAFETY: the descriptor table lies in physical memory, which the
            // loader maps at the same offset.
            .and_then(|block| unsafe { block.descriptors() }.map_err(KernelError::from));
        if let Err(err) = &descriptors {
            log::warn!("{} ({})", err, err.context());
        }

        vga_buffer::with_console(|console| {
            render_boot_screen(console, &block);
            if let Ok(descriptors) = descriptors {
                report_descriptors(console, descriptors);
            }
        });

        serial::log_lines(SERIAL_HINTS);

        #[cfg(feature = "qemu-exit")]
        tiny_console::exit_qemu(tiny_console::QemuExitCode::Success);

        #[cfg(not(feature = "qemu-exit"))]
        tiny_console::hlt_loop()
    }

    #[panic_handler]
    fn panic(info: &PanicInfo<'_>) -> ! {
        tiny_console::panic::handle_panic(info)
    }
}

#[cfg(not(target_os = "none"))]
fn main() {
    use tiny_console::vga_buffer::{Row, StubBuffer};

    let mut console = Console::new(StubBuffer::new());
    console.clear();
    render_boot_screen(&mut console, &Err(LoaderError::NullPointer));

    let rule = "-".repeat(tiny_console::vga_buffer::constants::VGA_WIDTH);
    println!("+{}+", rule);
    for row in Row::all() {
        let text = console.buffer().row_text(row);
        println!("|{}|", String::from_utf8_lossy(&text));
    }
    println!("+{}+", rule);
    println!("scrolls: {}", console.scroll_count());
}
