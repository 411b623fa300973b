//! Kinematic value types shared across the crate.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn norm(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn scale(self, k: f32) -> Self {
        Self::new(self.x * k, self.y * k, self.z * k)
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// Unit vector for a geographic heading (degrees, clockwise from north),
/// the convention the traffic simulation reports.
pub fn heading_unit(heading_deg: f32) -> Vec3 {
    let geometric = (360.0 - heading_deg + 90.0).rem_euclid(360.0).to_radians();
    Vec3::new(geometric.cos(), geometric.sin(), 0.0)
}

/// One vehicle's kinematic snapshot, overwritten each step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Geographic heading in degrees, clockwise from north.
    pub heading_deg: f32,
}

impl Pose {
    pub fn new(position: Vec3, velocity: Vec3, heading_deg: f32) -> Self {
        Self {
            position,
            velocity,
            heading_deg,
        }
    }

    /// Pose with the velocity vector derived from scalar speed and heading.
    pub fn from_speed(position: Vec3, speed: f32, heading_deg: f32) -> Self {
        Self {
            position,
            velocity: heading_unit(heading_deg).scale(speed),
            heading_deg,
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.norm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) {
        assert!((a - b).norm() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn heading_north_points_up_y() {
        close(heading_unit(0.0), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn heading_east_points_up_x() {
        close(heading_unit(90.0), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn heading_wraps_past_full_turn() {
        close(heading_unit(450.0), heading_unit(90.0));
        close(heading_unit(-90.0), heading_unit(270.0));
    }

    #[test]
    fn speed_is_velocity_magnitude() {
        let pose = Pose::from_speed(Vec3::ZERO, 12.5, 45.0);
        assert!((pose.speed() - 12.5).abs() < 1e-4);
    }
}
