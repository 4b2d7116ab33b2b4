use std::collections::BTreeSet;

use ash::vk;

pub mod features;
pub mod limits;
pub mod surface;

pub use features::{FeatureEntry, FEATURES};
pub use limits::{Comparison, LimitEntry, LimitValue, LIMITS};
pub use surface::{SurfaceCapabilityTable, SurfaceChoice};

/// Everything the selection pipeline knows about one device.
///
/// The same shape doubles as the minimal-requirement profile: there the
/// limits and features are the floor a device must reach, `extensions` is
/// the list of device extensions to demand and `surface` is the acceptable
/// presentation setup. Memory heaps and queue families are ignored on a
/// requirement.
#[derive(Debug, Clone, Default)]
pub struct CapabilityProfile {
    pub device_name: String,
    pub device_type: vk::PhysicalDeviceType,
    pub limits: vk::PhysicalDeviceLimits,
    pub features: vk::PhysicalDeviceFeatures,
    pub memory_heaps: Vec<MemoryHeap>,
    pub queue_families: Vec<QueueFamilyDescriptor>,
    pub extensions: BTreeSet<String>,
    /// Extensions injected by active validation layers.
    pub layer_extensions: BTreeSet<String>,
    pub surface: Option<SurfaceCapabilityTable>
}

impl CapabilityProfile {
    pub fn supports_extension(&self, name: &str) -> bool {
        self.extensions.contains(name) || self.layer_extensions.contains(name)
    }

    pub fn enabled_features(&self) -> impl Iterator<Item = &'static FeatureEntry> + '_ {
        FEATURES.iter().filter(|entry| entry.enabled(&self.features))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryHeap {
    pub size: vk::DeviceSize,
    pub device_local: bool
}

impl From<vk::MemoryHeap> for MemoryHeap {
    fn from(value: vk::MemoryHeap) -> Self {
        Self {
            size: value.size,
            device_local: value.flags.contains(vk::MemoryHeapFlags::DEVICE_LOCAL)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamilyDescriptor {
    pub index: u32,
    pub flags: vk::QueueFlags,
    pub max_queue_count: u32,
    /// Can present to the surface the profile was queried against.
    pub presentable: bool
}

impl QueueFamilyDescriptor {
    pub fn new(index: u32, flags: vk::QueueFlags, max_queue_count: u32, presentable: bool) -> Self {
        Self {
            index,
            flags,
            max_queue_count,
            presentable
        }
    }
}

/// Coarse classification of `vk::PhysicalDeviceType` used by scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum DeviceClass {
    Discrete,
    Integrated,
    Virtual,
    Cpu,
    Other
}

impl From<vk::PhysicalDeviceType> for DeviceClass {
    fn from(value: vk::PhysicalDeviceType) -> Self {
        match value {
            vk::PhysicalDeviceType::DISCRETE_GPU => Self::Discrete,
            vk::PhysicalDeviceType::INTEGRATED_GPU => Self::Integrated,
            vk::PhysicalDeviceType::VIRTUAL_GPU => Self::Virtual,
            vk::PhysicalDeviceType::CPU => Self::Cpu,
            _ => Self::Other
        }
    }
}

impl From<DeviceClass> for vk::PhysicalDeviceType {
    fn from(value: DeviceClass) -> Self {
        match value {
            DeviceClass::Discrete => Self::DISCRETE_GPU,
            DeviceClass::Integrated => Self::INTEGRATED_GPU,
            DeviceClass::Virtual => Self::VIRTUAL_GPU,
            DeviceClass::Cpu => Self::CPU,
            DeviceClass::Other => Self::OTHER
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn device_class_round_trips_through_vk_type() {
        for class in DeviceClass::iter() {
            let raw: vk::PhysicalDeviceType = class.into();
            assert_eq!(DeviceClass::from(raw), class);
        }
    }

    #[test]
    fn heap_device_local_flag_is_read_from_vk_flags() {
        let heap = MemoryHeap::from(vk::MemoryHeap {
            size: 1 << 30,
            flags: vk::MemoryHeapFlags::DEVICE_LOCAL | vk::MemoryHeapFlags::MULTI_INSTANCE
        });
        assert!(heap.device_local);
        let host = MemoryHeap::from(vk::MemoryHeap { size: 1 << 20, flags: vk::MemoryHeapFlags::empty() });
        assert!(!host.device_local);
    }

    #[test]
    fn layer_extensions_count_as_supported() {
        let mut profile = CapabilityProfile::default();
        profile.extensions.insert("VK_KHR_swapchain".into());
        profile.layer_extensions.insert("VK_EXT_debug_marker".into());
        assert!(profile.supports_extension("VK_KHR_swapchain"));
        assert!(profile.supports_extension("VK_EXT_debug_marker"));
        assert!(!profile.supports_extension("VK_KHR_ray_query"));
    }
}
