use std::{cmp::Reverse, collections::BTreeMap};

use ash::vk;

use crate::profile::QueueFamilyDescriptor;

/// An abstract request for `count` queues supporting `flags`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueRequirement {
    pub flags: vk::QueueFlags,
    pub presentable: bool,
    priorities: Vec<f32>
}

impl QueueRequirement {
    /// `count` is raised to one if zero; every queue gets priority 1.0.
    pub fn new(flags: vk::QueueFlags, count: u32, presentable: bool) -> Self {
        Self {
            flags,
            presentable,
            priorities: vec![1.0; count.max(1) as usize]
        }
    }

    /// Replaces the priorities; the instance count follows their length.
    pub fn with_priorities(mut self, priorities: &[f32]) -> Self {
        if !priorities.is_empty() {
            self.priorities = priorities.to_vec();
        }
        self
    }

    pub fn count(&self) -> u32 {
        self.priorities.len() as u32
    }

    pub fn priorities(&self) -> &[f32] {
        &self.priorities
    }

    /// Operations and presentation match, ignoring the queue count.
    pub fn is_compatible_with(&self, family: &QueueFamilyDescriptor) -> bool {
        family.flags.contains(self.flags) && (family.presentable || !self.presentable)
    }

    pub fn is_satisfied_by(&self, family: &QueueFamilyDescriptor) -> bool {
        self.is_compatible_with(family) && family.max_queue_count >= self.count()
    }

    /// Number of operation bits the family offers that this requirement
    /// does not use. Presentation support does not count.
    pub fn distance(&self, family: &QueueFamilyDescriptor) -> u32 {
        (family.flags & !self.flags).as_raw().count_ones()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssignError {
    #[error("no suitable queue family for requirement {requirement}")]
    NoSuitableFamily { requirement: usize },
    #[error("queue family {family} has {available} free queues, requirement {requirement} needs {requested}")]
    CapacityExceeded {
        requirement: usize,
        family: u32,
        requested: u32,
        available: u32
    }
}

/// Binds every requirement to exactly one queue family without exceeding
/// any family's queue count.
///
/// Requirements with a single remaining candidate are placed first. When
/// none is left, the worst remaining edge (largest distance, then lowest
/// requirement index, then lowest family index) is dropped and the loop
/// starts over.
pub fn assign(
    requirements: &[QueueRequirement],
    families: &[QueueFamilyDescriptor]
) -> Result<Assignment, AssignError> {
    let capacity: BTreeMap<u32, u32> = families.iter()
        .map(|family| (family.index, family.max_queue_count))
        .collect();
    let mut candidates = requirements.iter().enumerate()
        .map(|(requirement_index, requirement)| {
            let suitable: BTreeMap<u32, u32> = families.iter()
                .filter(|family| requirement.is_satisfied_by(family))
                .map(|family| (family.index, requirement.distance(family)))
                .collect();
            if !suitable.is_empty() {
                return Ok(suitable);
            }
            // Distinguish "too small" from "wrong kind of family".
            let largest = families.iter()
                .filter(|family| requirement.is_compatible_with(family))
                .min_by_key(|family| Reverse(family.max_queue_count));
            match largest {
                Some(largest) => Err(AssignError::CapacityExceeded {
                    requirement: requirement_index,
                    family: largest.index,
                    requested: requirement.count(),
                    available: largest.max_queue_count
                }),
                None => Err(AssignError::NoSuitableFamily { requirement: requirement_index })
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut allocated: BTreeMap<u32, u32> = BTreeMap::new();
    let mut bound: Vec<Option<QueueBinding>> = vec![None; requirements.len()];

    while bound.iter().any(Option::is_none) {
        let singleton = (0..requirements.len())
            .find(|&i| bound[i].is_none() && candidates[i].len() <= 1);

        if let Some(i) = singleton {
            let requirement = &requirements[i];
            let family = match candidates[i].keys().next() {
                Some(&family) => family,
                // Every candidate was exhausted by earlier placements.
                None => return Err(AssignError::CapacityExceeded {
                    requirement: i,
                    family: last_family_of(requirement, families),
                    requested: requirement.count(),
                    available: 0
                })
            };
            let used = allocated.entry(family).or_insert(0);
            let limit = capacity.get(&family).copied().unwrap_or(0);
            let available = limit - *used;
            if available < requirement.count() {
                return Err(AssignError::CapacityExceeded {
                    requirement: i,
                    family,
                    requested: requirement.count(),
                    available
                });
            }

            bound[i] = Some(QueueBinding {
                family_index: family,
                first_queue_index: *used,
                priorities: requirement.priorities.clone()
            });
            *used += requirement.count();
            log::debug!("Queue requirement {} -> family {} (queues {}..{})", i, family, *used - requirement.count(), *used);

            if *used == limit {
                for (j, other) in candidates.iter_mut().enumerate() {
                    if bound[j].is_none() {
                        other.remove(&family);
                    }
                }
            }
            continue;
        }

        let worst = candidates.iter().enumerate()
            .filter(|(i, _)| bound[*i].is_none())
            .flat_map(|(i, edges)| edges.iter().map(move |(&family, &distance)| (i, family, distance)))
            .fold(None, |worst: Option<(usize, u32, u32)>, edge| match worst {
                Some(current) if current.2 >= edge.2 => Some(current),
                _ => Some(edge)
            });
        if let Some((i, family, distance)) = worst {
            log::debug!("Dropping queue family {} for requirement {} (distance {})", family, i, distance);
            candidates[i].remove(&family);
        }
    }

    Ok(Assignment {
        bindings: bound.into_iter().flatten().collect(),
        allocated
    })
}

fn last_family_of(requirement: &QueueRequirement, families: &[QueueFamilyDescriptor]) -> u32 {
    families.iter()
        .filter(|family| requirement.is_satisfied_by(family))
        .map(|family| family.index)
        .last()
        .unwrap_or_default()
}

// SUPPORTING TYPES

#[derive(Debug, Clone, PartialEq)]
pub struct QueueBinding {
    pub family_index: u32,
    /// Index of the first queue inside the family owned by this requirement.
    pub first_queue_index: u32,
    pub priorities: Vec<f32>
}

/// Result of a successful [`assign`], indexed like the input requirements.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub bindings: Vec<QueueBinding>,
    /// Queues taken from each family index.
    pub allocated: BTreeMap<u32, u32>
}

impl Assignment {
    pub fn family_of(&self, requirement: usize) -> Option<u32> {
        self.bindings.get(requirement).map(|binding| binding.family_index)
    }

    /// Concatenated queue priorities per family, in queue index order.
    pub fn family_priorities(&self) -> BTreeMap<u32, Vec<f32>> {
        let mut per_family: BTreeMap<u32, Vec<(u32, &[f32])>> = BTreeMap::new();
        for binding in &self.bindings {
            per_family.entry(binding.family_index)
                .or_default()
                .push((binding.first_queue_index, &binding.priorities));
        }
        per_family.into_iter()
            .map(|(family, mut slices)| {
                slices.sort_by_key(|(first, _)| *first);
                (family, slices.into_iter().flat_map(|(_, p)| p.iter().copied()).collect())
            })
            .collect()
    }
}
