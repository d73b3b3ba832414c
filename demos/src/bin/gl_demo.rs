//! Attaches a legacy OpenGL context and clears the window to a cycling color.

#[cfg(windows)]
fn main() -> anyhow::Result<()> {
    use std::ffi::{c_void, CStr};

    use anyhow::{bail, Context};
    use log::info;
    use native_window_demos::{run_until_closed, DemoArgs};

    type ClearColorFn = unsafe extern "system" fn(f32, f32, f32, f32);
    type ClearFn = unsafe extern "system" fn(u32);

    const COLOR_BUFFER_BIT: u32 = 0x0000_4000;

    fn load<T: Copy>(address: *const c_void, name: &str) -> anyhow::Result<T> {
        if address.is_null() {
            bail!("{name} is not available");
        }
        // SAFETY: a non-null entry point has the signature its name declares
        Ok(unsafe { std::mem::transmute_copy(&address) })
    }

    native_window::logging::init_with_default("info");
    let args = DemoArgs::parse("gl_demo", "Clears a window through a legacy OpenGL context");
    let config = args.window_config("gl_demo")?;
    let mut window = args.open_window(&config)?;

    let context = window.attach_legacy_context().context("Failed to attach OpenGL context")?;
    let clear_color: ClearColorFn = load(context.proc_address(CStr::from_bytes_with_nul(b"glClearColor\0")?), "glClearColor")?;
    let clear: ClearFn = load(context.proc_address(CStr::from_bytes_with_nul(b"glClear\0")?), "glClear")?;
    info!("OpenGL context ready");

    run_until_closed(&mut window, args.frames, |window, frame| {
        let phase = (frame % 240) as f32 / 240.0 * std::f32::consts::TAU;
        unsafe {
            clear_color(0.5 + 0.5 * phase.sin(), 0.2, 0.5 + 0.5 * phase.cos(), 1.0);
            clear(COLOR_BUFFER_BIT);
        }
        window.present_frame()?;
        Ok(())
    })
}

#[cfg(not(windows))]
fn main() {
    native_window::logging::init_with_default("info");
    log::error!("gl_demo needs the Win32 backend");
}
