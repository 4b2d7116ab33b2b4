use std::{ffi::CString, io::{self, BufRead, Write}};

use anyhow::Result;
use ash::{vk, Entry, Instance};
use device_select::{assign_queues, AshDeviceQuery, DeviceQuery, DeviceSelector, Requirement};

const VALIDATION_LAYERS: &[&str] = &["VK_LAYER_KHRONOS_validation"];

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn get_layer_names(with_validation: bool) -> Result<Vec<CString>> {
    if with_validation {
        Ok(VALIDATION_LAYERS.iter().cloned()
            .map(CString::new)
            .collect::<Result<Vec<_>, _>>()?)
    } else {
        Ok(vec![])
    }
}

struct InstanceCtx {
    _entry: Entry,
    instance: Instance
}

impl InstanceCtx {
    fn new(layer_names: &[CString]) -> Result<Self> {
        let entry = unsafe { Entry::load()? };
        let application_name = CString::new("device-select")?;
        let app_info = vk::ApplicationInfo::builder()
            .application_name(&application_name)
            .application_version(vk::make_api_version(0, 0, 1, 0))
            .engine_name(&application_name)
            .engine_version(vk::make_api_version(0, 0, 1, 0))
            .api_version(vk::API_VERSION_1_0);
        let layer_name_pointers = layer_names.iter().map(|name| name.as_ptr()).collect::<Vec<_>>();
        let instance_create_info = vk::InstanceCreateInfo::builder()
            .application_info(&app_info)
            .enabled_layer_names(&layer_name_pointers);
        let instance = unsafe { entry.create_instance(&instance_create_info, None) }?;

        log::debug!("InstanceCtx created");
        Ok(Self { _entry: entry, instance })
    }
}

impl Drop for InstanceCtx {
    fn drop(&mut self) {
        unsafe {
            self.instance.destroy_instance(None);
        }
        log::debug!("InstanceCtx dropped");
    }
}

fn prompt_for_device(query: &AshDeviceQuery, candidates: &[vk::PhysicalDevice]) -> Option<vk::PhysicalDevice> {
    for (index, device) in candidates.iter().enumerate() {
        let name = query.query_profile(*device)
            .map(|profile| profile.device_name)
            .unwrap_or_else(|_| "(unknown device)".to_string());
        println!("[{index}] {name}");
    }
    print!("Select a device: ");
    io::stdout().flush().ok()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).ok()?;
    candidates.get(line.trim().parse::<usize>().ok()?).copied()
}

fn main() -> Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "DEBUG");
    }
    env_logger::init();
    log::debug!("Starting!");

    let layer_names = get_layer_names(env_flag("DEVICE_SELECT_VALIDATION"))?;
    let instance_ctx = InstanceCtx::new(&layer_names)?;
    let query = AshDeviceQuery::new(&instance_ctx.instance).with_layers(&layer_names);
    let candidates = query.enumerate_devices()?;

    let requirement = Requirement {
        force_manual_selection: env_flag("DEVICE_SELECT_MANUAL"),
        ..Requirement::headless_compute()
    };
    let chooser = |candidates: &[vk::PhysicalDevice]| prompt_for_device(&query, candidates);
    let selected = DeviceSelector::new(&requirement)
        .manual_chooser(&chooser)
        .verbose(true)
        .select(&query, &candidates)?;

    let assignment = assign_queues(&query, selected.device, &requirement.queues)?;
    for (index, binding) in assignment.bindings.iter().enumerate() {
        log::info!(
            "Queue requirement {} -> family {}, queues {}..{}",
            index,
            binding.family_index,
            binding.first_queue_index,
            binding.first_queue_index + binding.priorities.len() as u32
        );
    }
    log::info!("Selected {} (score {})", selected.profile.device_name, selected.score.map(|s| s.to_string()).unwrap_or_else(|| "manual".into()));
    Ok(())
}
