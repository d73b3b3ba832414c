//! Opens one window per decoration preset, one after another.
//!
//! Close each window (or press Escape) to move on to the next.

#[cfg(windows)]
fn main() -> anyhow::Result<()> {
    use log::info;
    use native_window::WindowStyle;
    use native_window_demos::{run_until_closed, DemoArgs};

    native_window::logging::init_with_default("info");
    let args = DemoArgs::parse("style_demo", "Shows every window decoration preset");
    let base = args.window_config("style_demo")?;

    let presets = [
        ("default", WindowStyle::DEFAULT),
        ("no resize", WindowStyle::NO_RESIZE),
        ("no close", WindowStyle::NO_CLOSE),
        ("borderless", WindowStyle::empty()),
    ];

    for (name, style) in presets {
        let config = native_window::WindowConfig {
            title: format!("{} ({name})", base.title),
            style,
            ..base.clone()
        };
        info!("Opening {name} window");

        let mut window = args.open_window(&config)?;
        run_until_closed(&mut window, args.frames, |_, _| Ok(()))?;
    }
    Ok(())
}

#[cfg(not(windows))]
fn main() {
    native_window::logging::init_with_default("info");
    log::error!("style_demo needs the Win32 backend");
}
