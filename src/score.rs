use num_bigint::BigUint;
use num_traits::Zero;

use crate::profile::{CapabilityProfile, DeviceClass, LIMITS};

/// Fitness of a device, larger is better.
pub type Score = BigUint;

/// Sums limits and heap sizes (device local heaps count twice), multiplies
/// by `1 + weight` for every enabled feature and finishes with
/// [`apply_device_class`].
pub fn score(profile: &CapabilityProfile) -> Score {
    let mut score = Score::zero();
    for entry in LIMITS {
        score += entry.read(&profile.limits).magnitude();
    }
    for heap in &profile.memory_heaps {
        let weight: u32 = if heap.device_local { 2 } else { 1 };
        score += Score::from(heap.size) * weight;
    }
    for feature in profile.enabled_features() {
        score *= 1 + feature.weight;
    }
    apply_device_class(score, profile.device_type.into())
}

/// Scales by twice half the decimal digit count of the score itself:
/// discrete devices are multiplied, integrated/virtual/CPU devices divided
/// and unclassified devices zeroed. A zero scale zeroes the score.
pub fn apply_device_class(score: Score, class: DeviceClass) -> Score {
    let digits = score.to_str_radix(10).len() as u32;
    let scale = 2 * (digits / 2);
    match class {
        DeviceClass::Discrete => score * scale,
        DeviceClass::Integrated | DeviceClass::Virtual | DeviceClass::Cpu => {
            if scale == 0 {
                Score::zero()
            } else {
                score / scale
            }
        }
        DeviceClass::Other => Score::zero()
    }
}

#[cfg(test)]
mod tests {
    use ash::vk;
    use strum::IntoEnumIterator;

    use super::*;
    use crate::profile::MemoryHeap;

    fn profile(device_type: vk::PhysicalDeviceType, heaps: &[MemoryHeap]) -> CapabilityProfile {
        CapabilityProfile {
            device_type,
            memory_heaps: heaps.to_vec(),
            ..Default::default()
        }
    }

    fn host_heap(size: u64) -> MemoryHeap {
        MemoryHeap { size, device_local: false }
    }

    #[test]
    fn degenerate_profile_scores_zero() {
        for class in DeviceClass::iter() {
            assert_eq!(score(&profile(class.into(), &[])), Score::zero());
        }
    }

    #[test]
    fn device_class_scaling() {
        let heaps = [host_heap(1000)];
        assert_eq!(score(&profile(vk::PhysicalDeviceType::DISCRETE_GPU, &heaps)), Score::from(4000u32));
        assert_eq!(score(&profile(vk::PhysicalDeviceType::INTEGRATED_GPU, &heaps)), Score::from(250u32));
        assert_eq!(score(&profile(vk::PhysicalDeviceType::CPU, &heaps)), Score::from(250u32));
        assert_eq!(score(&profile(vk::PhysicalDeviceType::OTHER, &heaps)), Score::zero());
    }

    #[test]
    fn device_local_heaps_count_twice() {
        let local = [MemoryHeap { size: 1000, device_local: true }];
        assert_eq!(score(&profile(vk::PhysicalDeviceType::DISCRETE_GPU, &local)), Score::from(8000u32));
    }

    #[test]
    fn limits_are_summed_by_magnitude() {
        let mut device = profile(vk::PhysicalDeviceType::INTEGRATED_GPU, &[]);
        device.limits.max_image_dimension2_d = 60;
        device.limits.min_texel_offset = -8;
        device.limits.max_sampler_anisotropy = 16.9;
        // 60 + 8 + 16 = 84, two digits, divided by 2
        assert_eq!(score(&device), Score::from(42u32));
    }

    #[test]
    fn premium_feature_multiplies_score() {
        let mut device = profile(vk::PhysicalDeviceType::DISCRETE_GPU, &[host_heap(1000)]);
        device.features.geometry_shader = vk::TRUE;
        // 1000 * 10001 = 10001000, eight digits
        assert_eq!(score(&device), Score::from(80_008_000u64));
    }

    #[test]
    fn extra_feature_never_lowers_score() {
        for class in DeviceClass::iter() {
            for size in [7u64, 99, 99_999, 123_456_789, 1 << 33] {
                let base = profile(class.into(), &[host_heap(size)]);
                let mut extra = base.clone();
                extra.features.wide_lines = vk::TRUE;
                assert!(score(&extra) >= score(&base), "{class} with heap {size}");
            }
        }
    }

    #[test]
    fn scoring_is_idempotent() {
        let mut device = profile(vk::PhysicalDeviceType::DISCRETE_GPU, &[host_heap(1 << 34)]);
        device.features.shader_float64 = vk::TRUE;
        device.features.shader_int64 = vk::TRUE;
        device.limits.max_memory_allocation_count = 4096;
        assert_eq!(score(&device), score(&device));
    }

    #[test]
    fn large_scores_do_not_overflow() {
        let mut device = profile(vk::PhysicalDeviceType::DISCRETE_GPU, &[host_heap(u64::MAX), host_heap(u64::MAX)]);
        device.features = vk::PhysicalDeviceFeatures {
            shader_float64: vk::TRUE,
            shader_int64: vk::TRUE,
            shader_int16: vk::TRUE,
            geometry_shader: vk::TRUE,
            logic_op: vk::TRUE,
            robust_buffer_access: vk::TRUE,
            ..Default::default()
        };
        assert!(score(&device) > Score::from(u64::MAX));
    }
}
