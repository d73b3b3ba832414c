//! Shared plumbing for the demo binaries: command line, window setup and the
//! pump loop.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, Command};
use log::{debug, info};
use native_window::prelude::*;

const FRAME_TIME: Duration = Duration::from_millis(16);

/// Options common to every demo
#[derive(Debug, Default)]
pub struct DemoArgs {
    /// Window configuration file (`.toml` or `.ron`)
    pub config: Option<PathBuf>,
    /// PNG icon overriding the configured one
    pub icon: Option<PathBuf>,
    /// Stop after this many frames
    pub frames: Option<u64>,
}

impl DemoArgs {
    /// Parse the process arguments for the demo called `name`
    pub fn parse(name: &'static str, about: &'static str) -> Self {
        let matches = Command::new(name)
            .about(about)
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .value_parser(value_parser!(PathBuf))
                    .help("Window configuration file (.toml or .ron)"),
            )
            .arg(
                Arg::new("icon")
                    .short('i')
                    .long("icon")
                    .value_name("PNG")
                    .value_parser(value_parser!(PathBuf))
                    .help("Window icon"),
            )
            .arg(
                Arg::new("frames")
                    .short('f')
                    .long("frames")
                    .value_name("COUNT")
                    .value_parser(value_parser!(u64))
                    .help("Exit after this many frames"),
            )
            .get_matches();

        Self {
            config: matches.get_one::<PathBuf>("config").cloned(),
            icon: matches.get_one::<PathBuf>("icon").cloned(),
            frames: matches.get_one::<u64>("frames").copied(),
        }
    }

    /// Window configuration from `--config`, or the defaults titled `title`
    pub fn window_config(&self, title: &str) -> Result<WindowConfig> {
        match &self.config {
            Some(path) => WindowConfig::load_from_file(path)
                .with_context(|| format!("Failed to load window config {}", path.display())),
            None => Ok(WindowConfig { title: title.to_string(), ..WindowConfig::default() }),
        }
    }

    /// Open a window from the configuration and apply the icon, if any
    pub fn open_window(&self, config: &WindowConfig) -> Result<Window> {
        let mut window = Window::from_config(config).context("Failed to create window")?;

        let icon = self.icon.as_deref().or_else(|| config.icon_path.as_deref().map(Path::new));
        if let Some(path) = icon {
            set_icon_from_png(&mut window, path)?;
        }
        Ok(window)
    }
}

/// Decode a PNG and install it as the window icon
pub fn set_icon_from_png(window: &mut Window, path: &Path) -> Result<()> {
    let image = image::open(path)
        .with_context(|| format!("Failed to open icon {}", path.display()))?
        .to_rgba8();
    window.set_icon(image.width(), image.height(), image.as_raw())?;
    debug!("Icon set from {}", path.display());
    Ok(())
}

/// Pump events and call `frame` until the window is closed, Escape is
/// pressed, or `frame_limit` frames have run
pub fn run_until_closed<F>(window: &mut Window, frame_limit: Option<u64>, mut frame: F) -> Result<()>
where
    F: FnMut(&mut Window, u64) -> Result<()>,
{
    let mut frame_index = 0;
    loop {
        window.pump_events();
        for event in window.pop_all_events() {
            debug!("{event:?}");
            match event {
                Event::Close | Event::KeyDown { key: KeyCode::Escape, .. } => {
                    info!("Closing after {frame_index} frames");
                    return Ok(());
                }
                _ => {}
            }
        }

        frame(window, frame_index)?;
        frame_index += 1;

        if frame_limit.is_some_and(|limit| frame_index >= limit) {
            info!("Frame limit reached");
            return Ok(());
        }
        thread::sleep(FRAME_TIME);
    }
}
