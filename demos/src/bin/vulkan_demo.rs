//! Creates a Vulkan instance and a presentation surface for a window.

#[cfg(windows)]
fn main() -> anyhow::Result<()> {
    use std::ffi::CString;

    use anyhow::Context;
    use ash::{vk, Entry};
    use log::info;
    use native_window::graphics::{required_instance_extensions, Surface};
    use native_window::platform::DefaultPlatform;
    use native_window_demos::{run_until_closed, DemoArgs};

    native_window::logging::init_with_default("info");
    let args = DemoArgs::parse("vulkan_demo", "Attaches a Vulkan surface to a window");
    let config = args.window_config("vulkan_demo")?;
    let mut window = args.open_window(&config)?;

    let entry = unsafe { Entry::load() }.context("Failed to load Vulkan")?;
    let extensions = required_instance_extensions::<DefaultPlatform>()?;
    for name in &extensions {
        info!("Enabling {}", name.to_string_lossy());
    }
    let extension_ptrs: Vec<_> = extensions.iter().map(|name| name.as_ptr()).collect();

    let app_name = CString::new(config.title.as_str())?;
    let app_info = vk::ApplicationInfo::builder()
        .application_name(&app_name)
        .application_version(vk::make_api_version(0, 1, 0, 0))
        .api_version(vk::API_VERSION_1_0);
    let create_info = vk::InstanceCreateInfo::builder()
        .application_info(&app_info)
        .enabled_extension_names(&extension_ptrs);
    let instance = unsafe { entry.create_instance(&create_info, None) }.context("Failed to create instance")?;

    let surface = Surface::new(&entry, &instance, &window)?;
    info!("Surface {:?} created", surface.handle());

    let result = run_until_closed(&mut window, args.frames, |_, _| Ok(()));

    drop(surface);
    unsafe { instance.destroy_instance(None) };
    result
}

#[cfg(not(windows))]
fn main() {
    native_window::logging::init_with_default("info");
    log::error!("vulkan_demo needs the Win32 backend");
}
