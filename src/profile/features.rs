use ash::vk;

pub struct FeatureEntry {
    pub name: &'static str,
    /// Score multiplier is `1 + weight` when the feature is enabled.
    pub weight: u32,
    pub value: fn(&vk::PhysicalDeviceFeatures) -> vk::Bool32
}

impl FeatureEntry {
    pub fn enabled(&self, features: &vk::PhysicalDeviceFeatures) -> bool {
        (self.value)(features) != vk::FALSE
    }
}

macro_rules! feature {
    ($field:ident) => {
        feature!($field, 1)
    };
    ($field:ident, $weight:literal) => {
        FeatureEntry {
            name: stringify!($field),
            weight: $weight,
            value: |features| features.$field
        }
    };
}

pub static FEATURES: &[FeatureEntry] = &[
    feature!(robust_buffer_access, 500),
    feature!(full_draw_index_uint32),
    feature!(image_cube_array),
    feature!(independent_blend),
    feature!(geometry_shader, 10000),
    feature!(tessellation_shader),
    feature!(sample_rate_shading),
    feature!(dual_src_blend),
    feature!(logic_op, 1000),
    feature!(multi_draw_indirect),
    feature!(draw_indirect_first_instance),
    feature!(depth_clamp),
    feature!(depth_bias_clamp),
    feature!(fill_mode_non_solid),
    feature!(depth_bounds),
    feature!(wide_lines),
    feature!(large_points),
    feature!(alpha_to_one),
    feature!(multi_viewport),
    feature!(sampler_anisotropy),
    feature!(texture_compression_etc2),
    feature!(texture_compression_astc_ldr),
    feature!(texture_compression_bc),
    feature!(occlusion_query_precise),
    feature!(pipeline_statistics_query),
    feature!(vertex_pipeline_stores_and_atomics),
    feature!(fragment_stores_and_atomics),
    feature!(shader_tessellation_and_geometry_point_size),
    feature!(shader_image_gather_extended),
    feature!(shader_storage_image_extended_formats),
    feature!(shader_storage_image_multisample),
    feature!(shader_storage_image_read_without_format),
    feature!(shader_storage_image_write_without_format),
    feature!(shader_uniform_buffer_array_dynamic_indexing),
    feature!(shader_sampled_image_array_dynamic_indexing),
    feature!(shader_storage_buffer_array_dynamic_indexing),
    feature!(shader_storage_image_array_dynamic_indexing),
    feature!(shader_clip_distance),
    feature!(shader_cull_distance),
    feature!(shader_float64, 100000),
    feature!(shader_int64, 50000),
    feature!(shader_int16, 5000),
    feature!(shader_resource_residency),
    feature!(shader_resource_min_lod),
    feature!(sparse_binding),
    feature!(sparse_residency_buffer),
    feature!(sparse_residency_image2_d),
    feature!(sparse_residency_image3_d),
    feature!(sparse_residency2_samples),
    feature!(sparse_residency4_samples),
    feature!(sparse_residency8_samples),
    feature!(sparse_residency16_samples),
    feature!(sparse_residency_aliased),
    feature!(variable_multisample_rate),
    feature!(inherited_queries),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_feature_is_listed_once() {
        let mut names: Vec<_> = FEATURES.iter().map(|entry| entry.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 55);
    }

    #[test]
    fn premium_features_carry_large_weights() {
        let weight = |name: &str| FEATURES.iter().find(|entry| entry.name == name).unwrap().weight;
        assert_eq!(weight("shader_float64"), 100000);
        assert_eq!(weight("robust_buffer_access"), 500);
        assert_eq!(weight("wide_lines"), 1);
    }

    #[test]
    fn enabled_reads_bool32() {
        let features = vk::PhysicalDeviceFeatures { geometry_shader: vk::TRUE, ..Default::default() };
        let geometry = FEATURES.iter().find(|entry| entry.name == "geometry_shader").unwrap();
        let tessellation = FEATURES.iter().find(|entry| entry.name == "tessellation_shader").unwrap();
        assert!(geometry.enabled(&features));
        assert!(!tessellation.enabled(&features));
    }
}
