//! Styling data for track rendering: color tables, width curves and the
//! symbol rule table, all pure data evaluated in priority order
use serde_json::{json, Value};

/// One entry of the surface quality legend
#[derive(Clone, Copy, Debug)]
pub struct ColorMapping {
    pub value: &'static str,
    pub color: &'static str,
    pub label: &'static str,
}

/// Surface quality category palette, paved blues into unpaved pinks
pub const SURFACE_COLOR_MAPPING: [ColorMapping; 9] = [
    ColorMapping {
        value: "PAVED_EXCELLENT",
        color: "#1E40AF",
        label: "Paved - Excellent",
    },
    ColorMapping {
        value: "PAVED_GOOD",
        color: "#3B82F6",
        label: "Paved - Good",
    },
    ColorMapping {
        value: "PAVED_INTERMEDIATE",
        color: "#60A5FA",
        label: "Paved - Intermediate",
    },
    ColorMapping {
        value: "PAVED_BAD",
        color: "#93C5FD",
        label: "Paved - Bad",
    },
    ColorMapping {
        value: "UNPAVED_INTERMEDIATE",
        color: "#C084FC",
        label: "Unpaved - Intermediate",
    },
    ColorMapping {
        value: "UNPAVED_BAD",
        color: "#E879F9",
        label: "Unpaved - Bad",
    },
    ColorMapping {
        value: "UNPAVED_HORRIBLE",
        color: "#F472B6",
        label: "Unpaved - Horrible",
    },
    ColorMapping {
        value: "UNPAVED_IMPASSABLE",
        color: "#EC4899",
        label: "Unpaved - Impassable",
    },
    ColorMapping {
        value: "UNKNOWN",
        color: "#6B7280",
        label: "Unknown",
    },
];

/// Fallback color when a segment carries an unmapped surface value
pub const DEFAULT_SURFACE_COLOR: &str = "#6B7280";

/// Ordered warning palette used by the symbol rules, mild to severe
pub const WARNING_PALETTE: [&str; 5] = ["#e2d705", "#eab35a", "#ed8c82", "#ea5fa4", "#e205c4"];

/// Bright saturated palette for assigning track colors
pub const TRACK_COLORS: [&str; 8] = [
    "#FF1493", // DeepPink
    "#FF4500", // OrangeRed
    "#FFD700", // Gold
    "#ADFF2F", // GreenYellow
    "#00FFFF", // Aqua
    "#1E90FF", // DodgerBlue
    "#9932CC", // DarkOrchid
    "#FF00FF", // Magenta
];

/// Palette for coloring route alternatives by index
pub const ROUTE_COLORS: [&str; 8] = [
    "#3B82F6", // blue
    "#EF4444", // red
    "#10B981", // green
    "#F59E0B", // amber
    "#8B5CF6", // violet
    "#EC4899", // pink
    "#14B8A6", // teal
    "#F97316", // orange
];

/// Deterministic track color derived from the id's byte sum, stable across
/// re-renders of the same track without a persisted color
pub fn color_for_id(id: &str) -> &'static str {
    let sum: usize = id.bytes().map(usize::from).sum();
    TRACK_COLORS[sum % TRACK_COLORS.len()]
}

/// Route alternative color by position in the response
pub fn color_for_route_index(index: usize) -> &'static str {
    ROUTE_COLORS[index % ROUTE_COLORS.len()]
}

/// Main line width, zoom interpolated
pub fn line_width_expression() -> Value {
    json!(["interpolate", ["linear"], ["zoom"], 5, 4, 14, 10])
}

/// Outline width, wider than the main line at every zoom
pub fn outline_width_expression() -> Value {
    json!(["interpolate", ["linear"], ["zoom"], 5, 8, 14, 14])
}

/// Data-driven case expression mapping each segment's surface category to
/// its legend color
pub fn surface_color_expression() -> Value {
    let mut case = vec![json!("case")];
    for mapping in SURFACE_COLOR_MAPPING {
        case.push(json!(["==", ["get", "surfaceSmoothness"], mapping.value]));
        case.push(json!(mapping.color));
    }
    case.push(json!(DEFAULT_SURFACE_COLOR));
    Value::Array(case)
}

/// A chosen warning symbol for one segment
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SymbolSpec {
    pub icon: &'static str,
    pub color: &'static str,
    /// Icon rotation in degrees, 180 flips a climb glyph into a descent
    pub rotation: f64,
    /// Symbol sort key, lower renders with higher precedence
    pub sort_key: i64,
}

/// One row of the symbol rule table: a stress or slope threshold plus the
/// glyph it selects
struct SymbolRule {
    min_stress: Option<u8>,
    min_abs_slope: Option<f64>,
    icon: &'static str,
    color: &'static str,
    sort_key: i64,
}

/// Ordered rule table, first match wins. High traffic stress outranks any
/// slope, steeper slope classes outrank moderate ones.
const SYMBOL_RULES: [SymbolRule; 8] = [
    SymbolRule {
        min_stress: Some(5),
        min_abs_slope: None,
        icon: "car",
        color: WARNING_PALETTE[4],
        sort_key: 0,
    },
    SymbolRule {
        min_stress: Some(4),
        min_abs_slope: None,
        icon: "car",
        color: WARNING_PALETTE[3],
        sort_key: 0,
    },
    SymbolRule {
        min_stress: Some(3),
        min_abs_slope: None,
        icon: "car",
        color: WARNING_PALETTE[1],
        sort_key: 10,
    },
    SymbolRule {
        min_stress: None,
        min_abs_slope: Some(20.0),
        icon: "chevron_4",
        color: WARNING_PALETTE[4],
        sort_key: 20,
    },
    SymbolRule {
        min_stress: None,
        min_abs_slope: Some(15.0),
        icon: "chevron_3",
        color: WARNING_PALETTE[3],
        sort_key: 20,
    },
    SymbolRule {
        min_stress: None,
        min_abs_slope: Some(10.0),
        icon: "chevron_2",
        color: WARNING_PALETTE[2],
        sort_key: 30,
    },
    SymbolRule {
        min_stress: None,
        min_abs_slope: Some(6.0),
        icon: "chevron_1",
        color: WARNING_PALETTE[1],
        sort_key: 30,
    },
    SymbolRule {
        min_stress: None,
        min_abs_slope: Some(2.0),
        icon: "chevron_1",
        color: WARNING_PALETTE[0],
        sort_key: 30,
    },
];

/// Pick the warning symbol for a segment, None when neither stress nor
/// slope crosses a threshold
pub fn symbol_for(stress: u8, slope: f64) -> Option<SymbolSpec> {
    for rule in &SYMBOL_RULES {
        let matched = match (rule.min_stress, rule.min_abs_slope) {
            (Some(min), _) => stress >= min,
            (None, Some(min)) => slope.abs() > min,
            (None, None) => false,
        };
        if matched {
            let rotation = if rule.min_abs_slope.is_some() && slope < 0.0 {
                180.0
            } else {
                0.0
            };
            return Some(SymbolSpec {
                icon: rule.icon,
                color: rule.color,
                rotation,
                sort_key: rule.sort_key,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_stress_outranks_steep_slope() {
        let spec = symbol_for(5, 25.0).unwrap();
        assert_eq!(spec.icon, "car");
        assert_eq!(spec.color, WARNING_PALETTE[4]);
        assert_eq!(spec.rotation, 0.0);
    }

    #[test]
    fn downhill_flips_the_chevron() {
        let up = symbol_for(1, 12.0).unwrap();
        let down = symbol_for(1, -12.0).unwrap();
        assert_eq!(up.icon, "chevron_2");
        assert_eq!(down.icon, "chevron_2");
        assert_eq!(up.rotation, 0.0);
        assert_eq!(down.rotation, 180.0);
    }

    #[test]
    fn slope_classes_select_distinct_glyphs() {
        assert_eq!(symbol_for(1, 21.0).unwrap().icon, "chevron_4");
        assert_eq!(symbol_for(1, 16.0).unwrap().icon, "chevron_3");
        assert_eq!(symbol_for(1, 11.0).unwrap().icon, "chevron_2");
        assert_eq!(symbol_for(1, 7.0).unwrap().icon, "chevron_1");
        assert_eq!(symbol_for(1, 3.0).unwrap().icon, "chevron_1");
    }

    #[test]
    fn flat_low_stress_segment_has_no_symbol() {
        assert_eq!(symbol_for(2, 1.5), None);
        assert_eq!(symbol_for(0, 2.0), None);
    }

    #[test]
    fn surface_expression_maps_every_category() {
        let expression = surface_color_expression();
        let rendered = expression.to_string();
        for mapping in SURFACE_COLOR_MAPPING {
            assert!(rendered.contains(mapping.value), "missing {}", mapping.value);
            assert!(rendered.contains(mapping.color), "missing {}", mapping.color);
        }
    }

    #[test]
    fn id_color_is_stable() {
        assert_eq!(color_for_id("temp-123-0"), color_for_id("temp-123-0"));
        let color = color_for_id("perm-42");
        assert!(TRACK_COLORS.contains(&color));
    }
}
