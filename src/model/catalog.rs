//! Static, versioned lookup tables the renderer treats as read-only.

/// Output canvas catalog entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceSize {
    /// Stable identifier used by configuration.
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Marketing category.
    pub category: &'static str,
}

/// Built-in output device sizes (App Store screenshot dimensions).
pub const DEVICE_SIZES: &[DeviceSize] = &[
    DeviceSize {
        id: "iphone-6.9",
        name: "iPhone 16/17 Pro Max (1320×2868)",
        width: 1320,
        height: 2868,
        category: "iPhone 6.9\"",
    },
    DeviceSize {
        id: "iphone-6.9-1290",
        name: "iPhone 16/17 6.9\" (1290×2796)",
        width: 1290,
        height: 2796,
        category: "iPhone 6.9\"",
    },
    DeviceSize {
        id: "iphone-6.9-1260",
        name: "iPhone 17 6.9\" (1260×2736)",
        width: 1260,
        height: 2736,
        category: "iPhone 6.9\"",
    },
    DeviceSize {
        id: "iphone-6.3-1206",
        name: "iPhone 16/17 Pro (1206×2622)",
        width: 1206,
        height: 2622,
        category: "iPhone 6.3\"",
    },
    DeviceSize {
        id: "iphone-6.3-1179",
        name: "iPhone 16/17 (1179×2556)",
        width: 1179,
        height: 2556,
        category: "iPhone 6.3\"",
    },
];

/// Look up a device by id, falling back to the first catalog entry.
pub fn device_size_by_id(id: &str) -> &'static DeviceSize {
    DEVICE_SIZES
        .iter()
        .find(|d| d.id == id)
        .unwrap_or(&DEVICE_SIZES[0])
}

/// Which side of the phone the simulated depth edge extends toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeDirection {
    /// Edge face on the left.
    Left,
    /// Edge face on the right.
    Right,
    /// No edge face (front-facing presets).
    None,
}

/// Raw 2×2 affine applied about the subject center (no translation).
///
/// Matches the 2D canvas `transform(a, b, c, d, 0, 0)` convention:
/// `x' = a·x + c·y`, `y' = b·x + d·y`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTransform {
    /// Horizontal scale.
    pub a: f64,
    /// Vertical shear.
    pub b: f64,
    /// Horizontal shear.
    pub c: f64,
    /// Vertical scale.
    pub d: f64,
}

/// Named isometric projection preset for the phone chrome.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IsometricPreset {
    /// Stable identifier used by configuration.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Projection matrix.
    pub transform: FrameTransform,
    /// Side the depth edge extends toward.
    pub edge_direction: EdgeDirection,
    /// Edge thickness as a fraction of phone width.
    pub edge_thickness: f64,
}

const fn preset(
    id: &'static str,
    name: &'static str,
    m: [f64; 4],
    edge_direction: EdgeDirection,
    edge_thickness: f64,
) -> IsometricPreset {
    IsometricPreset {
        id,
        name,
        transform: FrameTransform {
            a: m[0],
            b: m[1],
            c: m[2],
            d: m[3],
        },
        edge_direction,
        edge_thickness,
    }
}

/// Built-in isometric presets. The first entry (`front`) is the fallback.
pub const ISOMETRIC_PRESETS: &[IsometricPreset] = &[
    preset("front", "Front", [1.0, 0.0, 0.0, 1.0], EdgeDirection::None, 0.0),
    preset(
        "tilt-left",
        "Tilt Left",
        [0.97, -0.15, 0.0, 1.0],
        EdgeDirection::Right,
        0.035,
    ),
    preset(
        "tilt-right",
        "Tilt Right",
        [0.97, 0.15, 0.0, 1.0],
        EdgeDirection::Left,
        0.035,
    ),
    preset(
        "iso-left",
        "Iso Left",
        [0.9, -0.32, 0.0, 0.97],
        EdgeDirection::Right,
        0.065,
    ),
    preset(
        "iso-right",
        "Iso Right",
        [0.9, 0.32, 0.0, 0.97],
        EdgeDirection::Left,
        0.065,
    ),
    preset(
        "3q-left",
        "3/4 Left",
        [0.84, -0.38, 0.1, 0.95],
        EdgeDirection::Right,
        0.085,
    ),
    preset(
        "3q-right",
        "3/4 Right",
        [0.84, 0.38, -0.1, 0.95],
        EdgeDirection::Left,
        0.085,
    ),
    preset(
        "dramatic-left",
        "Drama L",
        [0.76, -0.5, 0.12, 0.92],
        EdgeDirection::Right,
        0.11,
    ),
    preset(
        "dramatic-right",
        "Drama R",
        [0.76, 0.5, -0.12, 0.92],
        EdgeDirection::Left,
        0.11,
    ),
    preset(
        "lay-left",
        "Lay Left",
        [0.95, -0.18, 0.32, 0.72],
        EdgeDirection::Right,
        0.04,
    ),
    preset(
        "lay-right",
        "Lay Right",
        [0.95, 0.18, -0.32, 0.72],
        EdgeDirection::Left,
        0.04,
    ),
    preset(
        "float",
        "Float",
        [0.95, 0.0, 0.1, 0.9],
        EdgeDirection::None,
        0.0,
    ),
];

/// Look up an isometric preset by id, falling back to `front`.
pub fn isometric_preset_by_id(id: &str) -> &'static IsometricPreset {
    ISOMETRIC_PRESETS
        .iter()
        .find(|p| p.id == id)
        .unwrap_or(&ISOMETRIC_PRESETS[0])
}

#[cfg(test)]
#[path = "../../tests/unit/model/catalog.rs"]
mod tests;
