use std::{ffi::{CStr, CString}, ptr};

use ash::{extensions::khr::Surface, prelude::VkResult, vk, Instance};

use crate::{
    error::Result,
    profile::{CapabilityProfile, MemoryHeap, QueueFamilyDescriptor, SurfaceCapabilityTable},
    select::DeviceQuery
};

/// Builds capability profiles from a live Vulkan instance.
pub struct AshDeviceQuery<'ins> {
    instance: &'ins Instance,
    surface: Option<(&'ins Surface, vk::SurfaceKHR)>,
    layer_names: Vec<CString>
}

impl<'ins> AshDeviceQuery<'ins> {
    pub fn new(instance: &'ins Instance) -> Self {
        Self {
            instance,
            surface: None,
            layer_names: vec![]
        }
    }

    /// Queue family presentability and surface capabilities are queried
    /// against this surface.
    pub fn with_surface(mut self, surface: &'ins Surface, surface_khr: vk::SurfaceKHR) -> Self {
        self.surface = Some((surface, surface_khr));
        self
    }

    /// Active layers whose device extensions count as supported.
    pub fn with_layers(mut self, layer_names: &[CString]) -> Self {
        self.layer_names = layer_names.to_vec();
        self
    }

    pub fn enumerate_devices(&self) -> Result<Vec<vk::PhysicalDevice>> {
        Ok(unsafe { self.instance.enumerate_physical_devices() }?)
    }

    fn queue_families(&self, device: vk::PhysicalDevice) -> Result<Vec<QueueFamilyDescriptor>> {
        let props = unsafe { self.instance.get_physical_device_queue_family_properties(device) };
        props.iter().enumerate()
            .map(|(index, family)| -> Result<QueueFamilyDescriptor> {
                let index = index as u32;
                let presentable = match self.surface {
                    Some((surface, surface_khr)) => unsafe { surface.get_physical_device_surface_support(device, index, surface_khr)? },
                    None => false
                };
                Ok(QueueFamilyDescriptor::new(index, family.queue_flags, family.queue_count, presentable))
            })
            .collect()
    }

    fn surface_table(&self, device: vk::PhysicalDevice) -> Result<Option<SurfaceCapabilityTable>> {
        let Some((surface, surface_khr)) = self.surface else {
            return Ok(None);
        };
        let table = unsafe {
            SurfaceCapabilityTable {
                capabilities: surface.get_physical_device_surface_capabilities(device, surface_khr)?,
                formats: surface.get_physical_device_surface_formats(device, surface_khr)?,
                present_modes: surface.get_physical_device_surface_present_modes(device, surface_khr)?
            }
        };
        Ok(Some(table))
    }

    unsafe fn layer_extensions(&self, device: vk::PhysicalDevice, layer_name: &CStr) -> VkResult<Vec<vk::ExtensionProperties>> {
        let enumerate = self.instance.fp_v1_0().enumerate_device_extension_properties;
        loop {
            let mut count = 0;
            enumerate(device, layer_name.as_ptr(), &mut count, ptr::null_mut()).result()?;
            let mut properties = Vec::with_capacity(count as usize);
            let status = enumerate(device, layer_name.as_ptr(), &mut count, properties.as_mut_ptr());
            if status != vk::Result::INCOMPLETE {
                status.result()?;
                properties.set_len(count as usize);
                return Ok(properties);
            }
        }
    }
}

impl DeviceQuery for AshDeviceQuery<'_> {
    type Device = vk::PhysicalDevice;

    fn query_profile(&self, device: vk::PhysicalDevice) -> Result<CapabilityProfile> {
        let props = unsafe { self.instance.get_physical_device_properties(device) };
        let features = unsafe { self.instance.get_physical_device_features(device) };
        let memory = unsafe { self.instance.get_physical_device_memory_properties(device) };
        let extensions = unsafe { self.instance.enumerate_device_extension_properties(device)? };

        let mut layer_extensions = Vec::new();
        for layer_name in &self.layer_names {
            layer_extensions.extend(unsafe { self.layer_extensions(device, layer_name)? });
        }

        let profile = CapabilityProfile {
            device_name: unsafe { CStr::from_ptr(props.device_name.as_ptr()) }.to_string_lossy().into_owned(),
            device_type: props.device_type,
            limits: props.limits,
            features,
            memory_heaps: memory.memory_heaps[..memory.memory_heap_count as usize].iter()
                .copied()
                .map(MemoryHeap::from)
                .collect(),
            queue_families: self.queue_families(device)?,
            extensions: extensions.iter().map(extension_name).collect(),
            layer_extensions: layer_extensions.iter().map(extension_name).collect(),
            surface: self.surface_table(device)?
        };
        log::debug!(
            "Queried {} ({} heaps, {} queue families, {} extensions)",
            profile.device_name, profile.memory_heaps.len(), profile.queue_families.len(), profile.extensions.len()
        );
        Ok(profile)
    }
}

fn extension_name(props: &vk::ExtensionProperties) -> String {
    unsafe { CStr::from_ptr(props.extension_name.as_ptr()) }.to_string_lossy().into_owned()
}
