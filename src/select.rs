use std::fmt;

use crate::{
    assign::{self, Assignment, QueueRequirement},
    error::{Result, SelectionError},
    filter,
    profile::{CapabilityProfile, DeviceClass},
    requirement::Requirement,
    score::{self, Score}
};

/// Source of capability snapshots, one per device handle.
pub trait DeviceQuery {
    type Device: Copy + PartialEq + fmt::Debug;

    fn query_profile(&self, device: Self::Device) -> Result<CapabilityProfile>;
}

pub type ManualChooser<'a, D> = &'a dyn Fn(&[D]) -> Option<D>;

pub struct SelectedDevice<D> {
    pub device: D,
    pub profile: CapabilityProfile,
    /// `None` when the device came from the manual chooser.
    pub score: Option<Score>
}

impl<D> SelectedDevice<D> {
    pub fn assign_queues(&self, requirements: &[QueueRequirement]) -> Result<Assignment> {
        Ok(assign::assign(requirements, &self.profile.queue_families)?)
    }
}

pub struct DeviceSelector<'a, D> {
    requirement: &'a Requirement,
    manual_chooser: Option<ManualChooser<'a, D>>,
    verbose: bool
}

impl<'a, D: Copy + PartialEq + fmt::Debug> DeviceSelector<'a, D> {
    pub fn new(requirement: &'a Requirement) -> Self {
        Self {
            requirement,
            manual_chooser: None,
            verbose: false
        }
    }

    /// Called with the full, unfiltered candidate list when automatic
    /// selection finds nothing or is disabled.
    pub fn manual_chooser(mut self, chooser: ManualChooser<'a, D>) -> Self {
        self.manual_chooser = Some(chooser);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn select<Q: DeviceQuery<Device = D>>(
        &self,
        query: &Q,
        candidates: &[D]
    ) -> Result<SelectedDevice<D>> {
        if self.requirement.force_manual_selection {
            log::debug!("Automatic device selection disabled, asking manual chooser");
            return self.select_manually(query, candidates);
        }

        let mut compliant = Vec::new();
        for &device in candidates {
            let profile = query.query_profile(device)?;
            match filter::check(&profile, self.requirement) {
                Ok(()) => {
                    let score = score::score(&profile);
                    compliant.push(SelectedDevice { device, profile, score: Some(score) });
                }
                Err(rejection) if self.verbose => log::info!("Rejected {}: {}", profile.device_name, rejection),
                Err(rejection) => log::debug!("Rejected {}: {}", profile.device_name, rejection)
            }
        }
        if self.verbose {
            report(&compliant);
        }

        let best = compliant.into_iter()
            .reduce(|best, next| if next.score > best.score { next } else { best });
        match best {
            Some(best) => {
                log::debug!("Selected physical device: {}", best.profile.device_name);
                Ok(best)
            }
            None => {
                log::warn!("No compliant device among {} candidates", candidates.len());
                self.select_manually(query, candidates)
            }
        }
    }

    fn select_manually<Q: DeviceQuery<Device = D>>(
        &self,
        query: &Q,
        candidates: &[D]
    ) -> Result<SelectedDevice<D>> {
        let chooser = match self.manual_chooser {
            Some(chooser) => chooser,
            None if self.requirement.force_manual_selection => return Err(SelectionError::ManualSelectionUnavailable),
            None => return Err(SelectionError::NoCompliantDevice { candidates: candidates.len() })
        };
        let device = chooser(candidates)
            .filter(|device| candidates.contains(device))
            .ok_or(SelectionError::ManualSelectionFailed)?;
        let profile = query.query_profile(device)?;
        log::debug!("Manually selected physical device: {}", profile.device_name);
        Ok(SelectedDevice { device, profile, score: None })
    }
}

fn report<D>(compliant: &[SelectedDevice<D>]) {
    let mut ranked = compliant.iter().collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    for (rank, candidate) in ranked.iter().enumerate() {
        let score = candidate.score.as_ref().map(ToString::to_string).unwrap_or_default();
        log::info!("#{} {} ({}) score {}", rank + 1, candidate.profile.device_name, DeviceClass::from(candidate.profile.device_type), score);
    }
}

/// Queries `device` again and binds the queue requests to its families.
pub fn assign_queues<Q: DeviceQuery>(
    query: &Q,
    device: Q::Device,
    requirements: &[QueueRequirement]
) -> Result<Assignment> {
    let profile = query.query_profile(device)?;
    let assignment = assign::assign(requirements, &profile.queue_families)?;
    log::debug!("Assigned {} queue requirements on {}", requirements.len(), profile.device_name);
    Ok(assignment)
}
