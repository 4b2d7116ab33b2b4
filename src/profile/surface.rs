use ash::vk;

/// Stand-in for `max_image_count == 0`, which Vulkan uses for "no upper bound".
pub const UNBOUNDED_IMAGE_COUNT: u32 = u32::MAX;

/// Presentation capabilities of a device for one surface.
///
/// On a requirement the `formats` and `present_modes` lists are ordered by
/// preference, most preferred first. An empty list accepts anything.
#[derive(Debug, Clone, Default)]
pub struct SurfaceCapabilityTable {
    pub capabilities: vk::SurfaceCapabilitiesKHR,
    pub formats: Vec<vk::SurfaceFormatKHR>,
    pub present_modes: Vec<vk::PresentModeKHR>
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceMismatch {
    #[error("no surface capabilities were queried for this device")]
    NoSurface,
    #[error("image count range {device:?} does not intersect required {required:?}")]
    ImageCount { device: (u32, u32), required: (u32, u32) },
    #[error("max image array layers {device} < required {required}")]
    ArrayLayers { device: u32, required: u32 },
    #[error("missing surface transforms {0:?}")]
    Transforms(vk::SurfaceTransformFlagsKHR),
    #[error("missing composite alpha modes {0:?}")]
    CompositeAlpha(vk::CompositeAlphaFlagsKHR),
    #[error("missing image usage flags {0:?}")]
    Usage(vk::ImageUsageFlags),
    #[error("none of the acceptable surface formats is supported")]
    Format,
    #[error("none of the acceptable present modes is supported")]
    PresentMode
}

impl SurfaceCapabilityTable {
    pub fn image_count_range(&self) -> (u32, u32) {
        let max = match self.capabilities.max_image_count {
            0 => UNBOUNDED_IMAGE_COUNT,
            max => max
        };
        (self.capabilities.min_image_count, max)
    }

    pub fn check(&self, required: &Self) -> Result<(), SurfaceMismatch> {
        let (device_min, device_max) = self.image_count_range();
        let (required_min, required_max) = required.image_count_range();
        if device_min.max(required_min) > device_max.min(required_max) {
            return Err(SurfaceMismatch::ImageCount {
                device: (device_min, device_max),
                required: (required_min, required_max)
            });
        }

        let (device, required_caps) = (&self.capabilities, &required.capabilities);
        if device.max_image_array_layers < required_caps.max_image_array_layers {
            return Err(SurfaceMismatch::ArrayLayers {
                device: device.max_image_array_layers,
                required: required_caps.max_image_array_layers
            });
        }
        if !device.supported_transforms.contains(required_caps.supported_transforms) {
            return Err(SurfaceMismatch::Transforms(required_caps.supported_transforms & !device.supported_transforms));
        }
        if !device.supported_composite_alpha.contains(required_caps.supported_composite_alpha) {
            return Err(SurfaceMismatch::CompositeAlpha(required_caps.supported_composite_alpha & !device.supported_composite_alpha));
        }
        if !device.supported_usage_flags.contains(required_caps.supported_usage_flags) {
            return Err(SurfaceMismatch::Usage(required_caps.supported_usage_flags & !device.supported_usage_flags));
        }

        if !required.formats.is_empty() && self.preferred_format(&required.formats).is_none() {
            return Err(SurfaceMismatch::Format);
        }
        if !required.present_modes.is_empty() && self.preferred_present_mode(&required.present_modes).is_none() {
            return Err(SurfaceMismatch::PresentMode);
        }
        Ok(())
    }

    fn preferred_format(&self, acceptable: &[vk::SurfaceFormatKHR]) -> Option<vk::SurfaceFormatKHR> {
        acceptable.iter()
            .find(|wanted| self.formats.iter().any(|x| x.format == wanted.format && x.color_space == wanted.color_space))
            .copied()
    }

    fn preferred_present_mode(&self, acceptable: &[vk::PresentModeKHR]) -> Option<vk::PresentModeKHR> {
        acceptable.iter()
            .find(|wanted| self.present_modes.contains(wanted))
            .copied()
    }

    /// Picks concrete swapchain parameters for a compatible device.
    pub fn negotiate(
        &self,
        required: &Self,
        preferred_extent: vk::Extent2D
    ) -> Result<SurfaceChoice, SurfaceMismatch> {
        self.check(required)?;
        let format = self.preferred_format(&required.formats)
            .or_else(|| fallback_format(&self.formats))
            .ok_or(SurfaceMismatch::Format)?;
        let present_mode = self.preferred_present_mode(&required.present_modes)
            .unwrap_or(vk::PresentModeKHR::FIFO);
        let image_count = {
            let (device_min, device_max) = self.image_count_range();
            let (required_min, required_max) = required.image_count_range();
            let (low, high) = (device_min.max(required_min), device_max.min(required_max));
            device_min.saturating_add(1).clamp(low, high)
        };
        let composite_alpha = {
            let wanted = required.capabilities.supported_composite_alpha;
            let pool = if wanted.is_empty() { self.capabilities.supported_composite_alpha } else { wanted };
            let raw = pool.as_raw();
            vk::CompositeAlphaFlagsKHR::from_raw(raw & raw.wrapping_neg())
        };

        Ok(SurfaceChoice {
            format,
            present_mode,
            image_count,
            extent: select_extent(&self.capabilities, preferred_extent),
            pre_transform: self.capabilities.current_transform,
            composite_alpha
        })
    }
}

fn fallback_format(available_formats: &[vk::SurfaceFormatKHR]) -> Option<vk::SurfaceFormatKHR> {
    match available_formats {
        [only] if only.format == vk::Format::UNDEFINED => Some(vk::SurfaceFormatKHR {
            format: vk::Format::B8G8R8A8_UNORM,
            color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR
        }),
        _ => available_formats.iter()
            .find(|x| x.format == vk::Format::B8G8R8A8_UNORM && x.color_space == vk::ColorSpaceKHR::SRGB_NONLINEAR)
            .or_else(|| available_formats.first())
            .copied()
    }
}

fn select_extent(
    capabilities: &vk::SurfaceCapabilitiesKHR,
    preferred_extent: vk::Extent2D
) -> vk::Extent2D {
    // A u32::MAX current extent leaves the size to the swapchain.
    // Some drivers report max below min, so min wins.
    if capabilities.current_extent.width != u32::MAX {
        capabilities.current_extent
    } else {
        let (min, max) = (capabilities.min_image_extent, capabilities.max_image_extent);
        vk::Extent2D {
            width: preferred_extent.width.clamp(min.width, max.width.max(min.width)),
            height: preferred_extent.height.clamp(min.height, max.height.max(min.height))
        }
    }
}

// SUPPORTING TYPES

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceChoice {
    pub format: vk::SurfaceFormatKHR,
    pub present_mode: vk::PresentModeKHR,
    pub image_count: u32,
    pub extent: vk::Extent2D,
    pub pre_transform: vk::SurfaceTransformFlagsKHR,
    pub composite_alpha: vk::CompositeAlphaFlagsKHR
}
