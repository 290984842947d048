use rand::Rng;

/// Fresh noise seed, drawn once per process.
pub fn generate_seed() -> u32 {
    rand::rng().random()
}

/// gsap-style wrap: maps `value` into the half-open span between `min` and `max`.
/// Works with `max < min`, the span is simply walked in the other direction.
pub fn wrap(min: f32, max: f32, value: f32) -> f32 {
    let range = max - min;
    if range == 0.0 {
        return min;
    }
    min + ((value - min) % range + range) % range
}

/// Linear remap of `value` from `[in_min, in_max]` to `[out_min, out_max]`.
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    out_min + (value - in_min) * (out_max - out_min) / (in_max - in_min)
}
