//! Kinematic chain contract and a FABRIK reference solver.
//!
//! The segment tree only needs three things from a solver: append a link,
//! read a link's solved end point, and (for the host) solve toward a target.
//! [`KinematicChain`] is that seam. [`FabrikChain`] is a small single-chain
//! FABRIK solver implementing it so the whole pipeline runs without an
//! external engine.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use armature_core::{ArmatureError, Result};

/// An open chain of rigid links solved toward a target point.
pub trait KinematicChain {
    /// Appends a link continuing from the previous link's end point and
    /// returns its index.
    fn add_link(&mut self, direction: Vec3, length: f32) -> usize;

    fn link_count(&self) -> usize;

    /// World-space end point of link `index` after the latest solve.
    fn end_point(&self, index: usize) -> Option<Vec3>;

    /// Re-solves the chain so its last end point approaches `target`.
    fn solve(&mut self, target: Vec3);

    /// Removes every link.
    fn clear(&mut self);
}

/// Solver tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Forward/backward pass pairs per solve.
    pub max_iterations: u32,
    /// Solve stops early once the end effector is this close to the target.
    pub tolerance: f32,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            tolerance: 1e-3,
        }
    }
}

impl SolverSettings {
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(ArmatureError::InvalidSettings(
                "solver max_iterations must be at least 1".into(),
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ArmatureError::InvalidSettings(format!(
                "solver tolerance must be a non-negative number, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// One rigid link of a [`FabrikChain`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    start: Vec3,
    end: Vec3,
    length: f32,
}

impl Link {
    #[inline]
    #[must_use]
    pub fn start(&self) -> Vec3 {
        self.start
    }

    #[inline]
    #[must_use]
    pub fn end(&self) -> Vec3 {
        self.end
    }

    #[inline]
    #[must_use]
    pub fn length(&self) -> f32 {
        self.length
    }

    fn direction(&self) -> Vec3 {
        (self.end - self.start).try_normalize().unwrap_or(Vec3::Y)
    }
}

/// Single-chain FABRIK solver with a fixed base.
#[derive(Debug, Clone)]
pub struct FabrikChain {
    base: Vec3,
    links: Vec<Link>,
    settings: SolverSettings,
    distance_to_target: f32,
}

impl FabrikChain {
    #[must_use]
    pub fn new(base: Vec3) -> Self {
        Self::with_settings(base, SolverSettings::default())
    }

    #[must_use]
    pub fn with_settings(base: Vec3, settings: SolverSettings) -> Self {
        Self {
            base,
            links: Vec::new(),
            settings,
            distance_to_target: 0.0,
        }
    }

    #[inline]
    #[must_use]
    pub fn base(&self) -> Vec3 {
        self.base
    }

    #[inline]
    #[must_use]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Sum of all link lengths.
    #[must_use]
    pub fn reach(&self) -> f32 {
        self.links.iter().map(Link::length).sum()
    }

    /// End effector position (the base for an empty chain).
    #[must_use]
    pub fn effector(&self) -> Vec3 {
        self.links.last().map_or(self.base, Link::end)
    }

    /// Distance between the end effector and the target of the last solve.
    #[inline]
    #[must_use]
    pub fn distance_to_target(&self) -> f32 {
        self.distance_to_target
    }

    fn joints(&self) -> Vec<Vec3> {
        let mut joints = Vec::with_capacity(self.links.len() + 1);
        joints.push(self.base);
        joints.extend(self.links.iter().map(Link::end));
        joints
    }

    fn store_joints(&mut self, joints: &[Vec3]) {
        for (i, link) in self.links.iter_mut().enumerate() {
            link.start = joints[i];
            link.end = joints[i + 1];
        }
    }
}

impl KinematicChain for FabrikChain {
    fn add_link(&mut self, direction: Vec3, length: f32) -> usize {
        let start = self.effector();
        let direction = direction.try_normalize().unwrap_or(Vec3::Y);
        self.links.push(Link {
            start,
            end: start + direction * length,
            length,
        });
        self.links.len() - 1
    }

    fn link_count(&self) -> usize {
        self.links.len()
    }

    fn end_point(&self, index: usize) -> Option<Vec3> {
        self.links.get(index).map(Link::end)
    }

    fn solve(&mut self, target: Vec3) {
        if self.links.is_empty() {
            return;
        }

        let mut joints = self.joints();
        let n = self.links.len();

        if self.base.distance(target) >= self.reach() {
            // Out of reach: stretch straight toward the target.
            let direction = (target - self.base)
                .try_normalize()
                .unwrap_or_else(|| self.links[0].direction());
            for i in 0..n {
                joints[i + 1] = joints[i] + direction * self.links[i].length;
            }
        } else {
            for _ in 0..self.settings.max_iterations {
                if joints[n].distance(target) <= self.settings.tolerance {
                    break;
                }

                // Forward: pin the effector to the target, walk to the base.
                joints[n] = target;
                for i in (0..n).rev() {
                    let dir = (joints[i] - joints[i + 1])
                        .try_normalize()
                        .unwrap_or_else(|| -self.links[i].direction());
                    joints[i] = joints[i + 1] + dir * self.links[i].length;
                }

                // Backward: pin the base, walk back out.
                joints[0] = self.base;
                for i in 0..n {
                    let dir = (joints[i + 1] - joints[i])
                        .try_normalize()
                        .unwrap_or_else(|| self.links[i].direction());
                    joints[i + 1] = joints[i] + dir * self.links[i].length;
                }
            }
        }

        self.store_joints(&joints);
        self.distance_to_target = joints[n].distance(target);
    }

    fn clear(&mut self) {
        self.links.clear();
        self.distance_to_target = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn straight_chain() -> FabrikChain {
        let mut chain = FabrikChain::new(Vec3::ZERO);
        chain.add_link(Vec3::Y, 0.5);
        chain.add_link(Vec3::Y, 0.4);
        chain.add_link(Vec3::Y, 0.4);
        chain
    }

    #[test]
    fn links_are_consecutive() {
        let chain = straight_chain();
        assert_eq!(chain.link_count(), 3);
        assert!(chain.end_point(0).unwrap().abs_diff_eq(Vec3::new(0.0, 0.5, 0.0), EPSILON));
        assert!(chain.end_point(2).unwrap().abs_diff_eq(Vec3::new(0.0, 1.3, 0.0), EPSILON));
        assert_eq!(chain.links()[1].start(), chain.links()[0].end());
        assert!(chain.end_point(3).is_none());
    }

    #[test]
    fn reachable_target_converges() {
        let mut chain = FabrikChain::with_settings(
            Vec3::ZERO,
            SolverSettings {
                max_iterations: 100,
                ..Default::default()
            },
        );
        chain.add_link(Vec3::Y, 0.5);
        chain.add_link(Vec3::Y, 0.4);
        chain.add_link(Vec3::Y, 0.4);
        let target = Vec3::new(0.6, 0.5, -0.3);
        chain.solve(target);

        assert!(chain.distance_to_target() <= 1e-3, "error {}", chain.distance_to_target());
        for link in chain.links() {
            assert!((link.start().distance(link.end()) - link.length()).abs() < EPSILON);
        }
        assert_eq!(chain.links()[0].start(), Vec3::ZERO);
    }

    #[test]
    fn unreachable_target_stretches() {
        let mut chain = straight_chain();
        chain.solve(Vec3::new(10.0, 0.0, 0.0));
        assert!(chain.effector().abs_diff_eq(Vec3::new(1.3, 0.0, 0.0), EPSILON));
        assert!((chain.distance_to_target() - 8.7).abs() < EPSILON);
    }

    #[test]
    fn clear_removes_links() {
        let mut chain = straight_chain();
        chain.clear();
        assert_eq!(chain.link_count(), 0);
        assert_eq!(chain.effector(), Vec3::ZERO);
        chain.solve(Vec3::X);
        assert_eq!(chain.link_count(), 0);
    }

    #[test]
    fn settings_validation() {
        assert!(SolverSettings::default().validate().is_ok());
        let none = SolverSettings {
            max_iterations: 0,
            ..Default::default()
        };
        assert!(none.validate().is_err());
        let negative = SolverSettings {
            tolerance: -1.0,
            ..Default::default()
        };
        assert!(negative.validate().is_err());
    }
}
