use ash::vk;

use crate::{
    assign::QueueRequirement,
    profile::{CapabilityProfile, SurfaceCapabilityTable}
};

/// The application's minimal-requirement declaration.
///
/// Built once by the caller and handed to [`crate::DeviceSelector`] by
/// reference; nothing in the crate keeps it in global state.
#[derive(Debug, Clone, Default)]
pub struct Requirement {
    pub profile: CapabilityProfile,
    pub queues: Vec<QueueRequirement>,
    /// Skip automatic ranking and always ask the manual chooser.
    pub force_manual_selection: bool
}

impl Requirement {
    pub fn new(
        mut profile: CapabilityProfile,
        queues: Vec<QueueRequirement>,
        surface: Option<SurfaceCapabilityTable>,
        force_manual_selection: bool
    ) -> Self {
        profile.surface = surface;
        Self {
            profile,
            queues,
            force_manual_selection
        }
    }

    /// A single compute queue, no presentation and no limits.
    pub fn headless_compute() -> Self {
        Self::new(
            CapabilityProfile::default(),
            vec![QueueRequirement::new(vk::QueueFlags::COMPUTE, 1, false)],
            None,
            false
        )
    }

    /// A presentable graphics queue plus a transfer queue, with the
    /// swapchain extension and a FIFO-capable colour surface.
    pub fn graphics_presentation() -> Self {
        let mut profile = CapabilityProfile::default();
        profile.extensions.insert(SWAPCHAIN_EXTENSION.to_owned());
        let surface = SurfaceCapabilityTable {
            capabilities: vk::SurfaceCapabilitiesKHR {
                min_image_count: 2,
                max_image_array_layers: 1,
                supported_usage_flags: vk::ImageUsageFlags::COLOR_ATTACHMENT,
                ..Default::default()
            },
            formats: vec![
                vk::SurfaceFormatKHR { format: vk::Format::B8G8R8A8_SRGB, color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR },
                vk::SurfaceFormatKHR { format: vk::Format::B8G8R8A8_UNORM, color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR }
            ],
            present_modes: vec![vk::PresentModeKHR::MAILBOX, vk::PresentModeKHR::FIFO]
        };
        Self::new(
            profile,
            vec![
                QueueRequirement::new(vk::QueueFlags::GRAPHICS, 1, true),
                QueueRequirement::new(vk::QueueFlags::TRANSFER, 1, false)
            ],
            Some(surface),
            false
        )
    }
}

const SWAPCHAIN_EXTENSION: &str = "VK_KHR_swapchain";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_is_stored_on_profile() {
        let requirement = Requirement::graphics_presentation();
        assert!(requirement.profile.surface.is_some());
        assert!(requirement.profile.extensions.contains(SWAPCHAIN_EXTENSION));
        assert_eq!(requirement.queues.len(), 2);
    }

    #[test]
    fn headless_has_no_surface() {
        let requirement = Requirement::headless_compute();
        assert!(requirement.profile.surface.is_none());
        assert!(!requirement.force_manual_selection);
    }
}
