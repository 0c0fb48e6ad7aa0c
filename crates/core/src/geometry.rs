//! Angle sampling and ring geometry shared by the mesh and ray generators.

use glam::DVec2;
use std::f64::consts::TAU;

/// `count` evenly spaced values over `[start, stop]`, both ends included.
///
/// The last value is exactly `stop`. A single sample yields `[start]`; zero
/// samples yield an empty vector.
pub fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            let mut values: Vec<f64> = (0..count).map(|i| start + i as f64 * step).collect();
            values[count - 1] = stop;
            values
        }
    }
}

/// `count` angles over the closed interval `[0, 2π]`.
///
/// The first and last angle land on the same point of the circle; the ray
/// and mesh patterns depend on that duplicate.
pub fn full_turn(count: usize) -> Vec<f64> {
    linspace(0.0, TAU, count)
}

/// Rotates `values` so the element at position `i` moves to
/// `(i + shift) mod len`. Negative shifts rotate the other way.
pub fn circular_shift<T: Clone>(values: &[T], shift: i64) -> Vec<T> {
    let len = values.len();
    if len == 0 {
        return Vec::new();
    }
    let mut out = values.to_vec();
    let k = shift.rem_euclid(len as i64) as usize;
    out.rotate_right(k);
    out
}

/// Point at `angle` on a circle of `radius` around `center`, using
/// `(cos, sin)` so angle 0 points along +x.
pub fn ring_point(center: DVec2, radius: f64, angle: f64) -> DVec2 {
    center + DVec2::new(angle.cos(), angle.sin()) * radius
}
