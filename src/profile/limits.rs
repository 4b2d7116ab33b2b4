use std::{cmp::Ordering, fmt};

use ash::vk;

/// How a device limit is compared against the requirement's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Comparison {
    /// Upper capability bound, the device must reach at least the requirement.
    AtLeast,
    /// Lower operating bound (offsets, alignments, granularities). A zero
    /// requirement leaves the field unconstrained.
    AtMost,
    /// Bitmask or `Bool32`, every requested bit must be present on the device.
    Contains
}

impl Comparison {
    pub fn satisfied(self, device: LimitValue, required: LimitValue) -> bool {
        match self {
            Self::AtLeast => matches!(device.partial_cmp(&required), Some(Ordering::Greater | Ordering::Equal)),
            Self::AtMost => required.is_zero() || matches!(device.partial_cmp(&required), Some(Ordering::Less | Ordering::Equal)),
            Self::Contains => match (device, required) {
                (LimitValue::Unsigned(device), LimitValue::Unsigned(required)) => required & !device == 0,
                _ => false
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LimitValue {
    Unsigned(u64),
    Signed(i64),
    Float(f32)
}

impl LimitValue {
    /// Non-negative integer magnitude, floats truncated.
    pub fn magnitude(self) -> u64 {
        match self {
            Self::Unsigned(value) => value,
            Self::Signed(value) => value.unsigned_abs(),
            Self::Float(value) => value.abs().trunc() as u64
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Self::Unsigned(value) => value == 0,
            Self::Signed(value) => value == 0,
            Self::Float(value) => value == 0.0
        }
    }
}

impl PartialOrd for LimitValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Unsigned(a), Self::Unsigned(b)) => a.partial_cmp(b),
            (Self::Signed(a), Self::Signed(b)) => a.partial_cmp(b),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            _ => None
        }
    }
}

impl fmt::Display for LimitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsigned(value) => write!(f, "{value}"),
            Self::Signed(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}")
        }
    }
}

impl From<u32> for LimitValue {
    fn from(value: u32) -> Self {
        Self::Unsigned(value.into())
    }
}

impl From<u64> for LimitValue {
    fn from(value: u64) -> Self {
        Self::Unsigned(value)
    }
}

impl From<usize> for LimitValue {
    fn from(value: usize) -> Self {
        Self::Unsigned(value as u64)
    }
}

impl From<i32> for LimitValue {
    fn from(value: i32) -> Self {
        Self::Signed(value.into())
    }
}

impl From<f32> for LimitValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<vk::SampleCountFlags> for LimitValue {
    fn from(value: vk::SampleCountFlags) -> Self {
        Self::Unsigned(value.as_raw().into())
    }
}

pub struct LimitEntry {
    pub name: &'static str,
    pub comparison: Comparison,
    pub value: fn(&vk::PhysicalDeviceLimits) -> LimitValue
}

impl LimitEntry {
    pub fn read(&self, limits: &vk::PhysicalDeviceLimits) -> LimitValue {
        (self.value)(limits)
    }
}

macro_rules! limit {
    ($field:ident, $comparison:ident) => {
        LimitEntry {
            name: stringify!($field),
            comparison: Comparison::$comparison,
            value: |limits| LimitValue::from(limits.$field)
        }
    };
    ($field:ident[$i:literal], $comparison:ident) => {
        LimitEntry {
            name: concat!(stringify!($field), "[", stringify!($i), "]"),
            comparison: Comparison::$comparison,
            value: |limits| LimitValue::from(limits.$field[$i])
        }
    };
}

/// Every numeric field of `vk::PhysicalDeviceLimits`, arrays flattened.
pub static LIMITS: &[LimitEntry] = &[
    limit!(max_image_dimension1_d, AtLeast),
    limit!(max_image_dimension2_d, AtLeast),
    limit!(max_image_dimension3_d, AtLeast),
    limit!(max_image_dimension_cube, AtLeast),
    limit!(max_image_array_layers, AtLeast),
    limit!(max_texel_buffer_elements, AtLeast),
    limit!(max_uniform_buffer_range, AtLeast),
    limit!(max_storage_buffer_range, AtLeast),
    limit!(max_push_constants_size, AtLeast),
    limit!(max_memory_allocation_count, AtLeast),
    limit!(max_sampler_allocation_count, AtLeast),
    limit!(buffer_image_granularity, AtMost),
    limit!(sparse_address_space_size, AtLeast),
    limit!(max_bound_descriptor_sets, AtLeast),
    limit!(max_per_stage_descriptor_samplers, AtLeast),
    limit!(max_per_stage_descriptor_uniform_buffers, AtLeast),
    limit!(max_per_stage_descriptor_storage_buffers, AtLeast),
    limit!(max_per_stage_descriptor_sampled_images, AtLeast),
    limit!(max_per_stage_descriptor_storage_images, AtLeast),
    limit!(max_per_stage_descriptor_input_attachments, AtLeast),
    limit!(max_per_stage_resources, AtLeast),
    limit!(max_descriptor_set_samplers, AtLeast),
    limit!(max_descriptor_set_uniform_buffers, AtLeast),
    limit!(max_descriptor_set_uniform_buffers_dynamic, AtLeast),
    limit!(max_descriptor_set_storage_buffers, AtLeast),
    limit!(max_descriptor_set_storage_buffers_dynamic, AtLeast),
    limit!(max_descriptor_set_sampled_images, AtLeast),
    limit!(max_descriptor_set_storage_images, AtLeast),
    limit!(max_descriptor_set_input_attachments, AtLeast),
    limit!(max_vertex_input_attributes, AtLeast),
    limit!(max_vertex_input_bindings, AtLeast),
    limit!(max_vertex_input_attribute_offset, AtLeast),
    limit!(max_vertex_input_binding_stride, AtLeast),
    limit!(max_vertex_output_components, AtLeast),
    limit!(max_tessellation_generation_level, AtLeast),
    limit!(max_tessellation_patch_size, AtLeast),
    limit!(max_tessellation_control_per_vertex_input_components, AtLeast),
    limit!(max_tessellation_control_per_vertex_output_components, AtLeast),
    limit!(max_tessellation_control_per_patch_output_components, AtLeast),
    limit!(max_tessellation_control_total_output_components, AtLeast),
    limit!(max_tessellation_evaluation_input_components, AtLeast),
    limit!(max_tessellation_evaluation_output_components, AtLeast),
    limit!(max_geometry_shader_invocations, AtLeast),
    limit!(max_geometry_input_components, AtLeast),
    limit!(max_geometry_output_components, AtLeast),
    limit!(max_geometry_output_vertices, AtLeast),
    limit!(max_geometry_total_output_components, AtLeast),
    limit!(max_fragment_input_components, AtLeast),
    limit!(max_fragment_output_attachments, AtLeast),
    limit!(max_fragment_dual_src_attachments, AtLeast),
    limit!(max_fragment_combined_output_resources, AtLeast),
    limit!(max_compute_shared_memory_size, AtLeast),
    limit!(max_compute_work_group_count[0], AtLeast),
    limit!(max_compute_work_group_count[1], AtLeast),
    limit!(max_compute_work_group_count[2], AtLeast),
    limit!(max_compute_work_group_invocations, AtLeast),
    limit!(max_compute_work_group_size[0], AtLeast),
    limit!(max_compute_work_group_size[1], AtLeast),
    limit!(max_compute_work_group_size[2], AtLeast),
    limit!(sub_pixel_precision_bits, AtLeast),
    limit!(sub_texel_precision_bits, AtLeast),
    limit!(mipmap_precision_bits, AtLeast),
    limit!(max_draw_indexed_index_value, AtLeast),
    limit!(max_draw_indirect_count, AtLeast),
    limit!(max_sampler_lod_bias, AtLeast),
    limit!(max_sampler_anisotropy, AtLeast),
    limit!(max_viewports, AtLeast),
    limit!(max_viewport_dimensions[0], AtLeast),
    limit!(max_viewport_dimensions[1], AtLeast),
    limit!(viewport_bounds_range[0], AtMost),
    limit!(viewport_bounds_range[1], AtLeast),
    limit!(viewport_sub_pixel_bits, AtLeast),
    limit!(min_memory_map_alignment, AtMost),
    limit!(min_texel_buffer_offset_alignment, AtMost),
    limit!(min_uniform_buffer_offset_alignment, AtMost),
    limit!(min_storage_buffer_offset_alignment, AtMost),
    limit!(min_texel_offset, AtMost),
    limit!(max_texel_offset, AtLeast),
    limit!(min_texel_gather_offset, AtMost),
    limit!(max_texel_gather_offset, AtLeast),
    limit!(min_interpolation_offset, AtMost),
    limit!(max_interpolation_offset, AtLeast),
    limit!(sub_pixel_interpolation_offset_bits, AtLeast),
    limit!(max_framebuffer_width, AtLeast),
    limit!(max_framebuffer_height, AtLeast),
    limit!(max_framebuffer_layers, AtLeast),
    limit!(framebuffer_color_sample_counts, Contains),
    limit!(framebuffer_depth_sample_counts, Contains),
    limit!(framebuffer_stencil_sample_counts, Contains),
    limit!(framebuffer_no_attachments_sample_counts, Contains),
    limit!(max_color_attachments, AtLeast),
    limit!(sampled_image_color_sample_counts, Contains),
    limit!(sampled_image_integer_sample_counts, Contains),
    limit!(sampled_image_depth_sample_counts, Contains),
    limit!(sampled_image_stencil_sample_counts, Contains),
    limit!(storage_image_sample_counts, Contains),
    limit!(max_sample_mask_words, AtLeast),
    limit!(timestamp_compute_and_graphics, Contains),
    limit!(timestamp_period, AtMost),
    limit!(max_clip_distances, AtLeast),
    limit!(max_cull_distances, AtLeast),
    limit!(max_combined_clip_and_cull_distances, AtLeast),
    limit!(discrete_queue_priorities, AtLeast),
    limit!(point_size_range[0], AtMost),
    limit!(point_size_range[1], AtLeast),
    limit!(line_width_range[0], AtMost),
    limit!(line_width_range[1], AtLeast),
    limit!(point_size_granularity, AtMost),
    limit!(line_width_granularity, AtMost),
    limit!(strict_lines, Contains),
    limit!(standard_sample_locations, Contains),
    limit!(optimal_buffer_copy_offset_alignment, AtMost),
    limit!(optimal_buffer_copy_row_pitch_alignment, AtMost),
    limit!(non_coherent_atom_size, AtMost),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> &'static LimitEntry {
        LIMITS.iter().find(|entry| entry.name == name).unwrap()
    }

    #[test]
    fn upper_bounds_need_device_at_least_requirement() {
        let limit = entry("max_image_dimension2_d");
        let device = vk::PhysicalDeviceLimits { max_image_dimension2_d: 16384, ..Default::default() };
        let small = vk::PhysicalDeviceLimits { max_image_dimension2_d: 4096, ..Default::default() };
        assert!(limit.comparison.satisfied(limit.read(&device), limit.read(&small)));
        assert!(!limit.comparison.satisfied(limit.read(&small), limit.read(&device)));
    }

    #[test]
    fn lower_bounds_are_inverted() {
        let limit = entry("min_uniform_buffer_offset_alignment");
        let tight = vk::PhysicalDeviceLimits { min_uniform_buffer_offset_alignment: 64, ..Default::default() };
        let loose = vk::PhysicalDeviceLimits { min_uniform_buffer_offset_alignment: 256, ..Default::default() };
        assert!(limit.comparison.satisfied(limit.read(&tight), limit.read(&loose)));
        assert!(!limit.comparison.satisfied(limit.read(&loose), limit.read(&tight)));
    }

    #[test]
    fn zero_lower_bound_requirement_is_unconstrained() {
        let limit = entry("non_coherent_atom_size");
        let device = vk::PhysicalDeviceLimits { non_coherent_atom_size: 256, ..Default::default() };
        let required = vk::PhysicalDeviceLimits::default();
        assert!(limit.comparison.satisfied(limit.read(&device), limit.read(&required)));
    }

    #[test]
    fn negative_offsets_compare_as_signed() {
        let limit = entry("min_texel_offset");
        let device = vk::PhysicalDeviceLimits { min_texel_offset: -8, ..Default::default() };
        let required = vk::PhysicalDeviceLimits { min_texel_offset: -4, ..Default::default() };
        assert!(limit.comparison.satisfied(limit.read(&device), limit.read(&required)));
        assert!(!limit.comparison.satisfied(limit.read(&required), limit.read(&device)));
        assert_eq!(limit.read(&device).magnitude(), 8);
    }

    #[test]
    fn sample_counts_use_bit_implication() {
        let limit = entry("framebuffer_color_sample_counts");
        let device = vk::PhysicalDeviceLimits {
            framebuffer_color_sample_counts: vk::SampleCountFlags::TYPE_1 | vk::SampleCountFlags::TYPE_4,
            ..Default::default()
        };
        let four = vk::PhysicalDeviceLimits { framebuffer_color_sample_counts: vk::SampleCountFlags::TYPE_4, ..Default::default() };
        let eight = vk::PhysicalDeviceLimits { framebuffer_color_sample_counts: vk::SampleCountFlags::TYPE_8, ..Default::default() };
        assert!(limit.comparison.satisfied(limit.read(&device), limit.read(&four)));
        assert!(!limit.comparison.satisfied(limit.read(&device), limit.read(&eight)));
    }

    #[test]
    fn float_magnitude_is_truncated() {
        assert_eq!(LimitValue::Float(16.75).magnitude(), 16);
        assert_eq!(LimitValue::Float(-0.5).magnitude(), 0);
    }

    #[test]
    fn array_limits_are_flattened() {
        let names: Vec<_> = LIMITS.iter().map(|entry| entry.name).collect();
        assert!(names.contains(&"max_compute_work_group_size[2]"));
        assert!(names.contains(&"point_size_range[0]"));
        assert_eq!(names.iter().filter(|name| name.starts_with("max_compute_work_group_count")).count(), 3);
    }
}
