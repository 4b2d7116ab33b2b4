use crate::{
    assign::{self, AssignError},
    profile::{surface::SurfaceMismatch, CapabilityProfile, Comparison, LimitValue, FEATURES, LIMITS},
    requirement::Requirement
};

/// Why a device failed [`check`]. Only used for diagnostics.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Rejection {
    #[error("limit {name} is {device}, required {comparison} {required}")]
    Limit {
        name: &'static str,
        comparison: Comparison,
        device: LimitValue,
        required: LimitValue
    },
    #[error("feature {0} is not supported")]
    MissingFeature(&'static str),
    #[error("queue requirements cannot be met: {0}")]
    Queues(#[from] AssignError),
    #[error("extension {0} is not supported")]
    MissingExtension(String),
    #[error("surface is incompatible: {0}")]
    Surface(#[from] SurfaceMismatch)
}

/// Tests a device against the minimal requirement, stopping at the first
/// failing check.
pub fn check(device: &CapabilityProfile, requirement: &Requirement) -> Result<(), Rejection> {
    let required = &requirement.profile;

    for entry in LIMITS {
        let (device_value, required_value) = (entry.read(&device.limits), entry.read(&required.limits));
        if !entry.comparison.satisfied(device_value, required_value) {
            return Err(Rejection::Limit {
                name: entry.name,
                comparison: entry.comparison,
                device: device_value,
                required: required_value
            });
        }
    }

    if let Some(missing) = FEATURES.iter().find(|entry| entry.enabled(&required.features) && !entry.enabled(&device.features)) {
        return Err(Rejection::MissingFeature(missing.name));
    }

    assign::assign(&requirement.queues, &device.queue_families)?;

    if let Some(missing) = required.extensions.iter().find(|name| !device.supports_extension(name)) {
        return Err(Rejection::MissingExtension(missing.clone()));
    }

    if let Some(required_surface) = &required.surface {
        let device_surface = device.surface.as_ref().ok_or(SurfaceMismatch::NoSurface)?;
        device_surface.check(required_surface)?;
    }
    Ok(())
}
