//! Barbell plate loadout resolution.
//!
//! Converts a target total bar weight into the plates to load on each side,
//! and decides whether an exercise is a barbell lift at all.

use crate::config::{ClassifierConfig, PlatesConfig};
use crate::types::{format_magnitude, PlateBreakdown, PlateCount, WeightUnit};
use once_cell::sync::Lazy;

/// Leftover per-side weight below this is considered loaded exactly
pub const PLATE_TOLERANCE: f64 = 0.01;

/// Guards the greedy division against float noise (e.g. 44.99999999 / 45)
const FIT_EPSILON: f64 = 1e-9;

const STANDARD_LBS_PLATES: [f64; 6] = [45.0, 35.0, 25.0, 10.0, 5.0, 2.5];
const STANDARD_KG_PLATES: [f64; 7] = [25.0, 20.0, 15.0, 10.0, 5.0, 2.5, 1.25];

// ============================================================================
// Plate Inventory
// ============================================================================

/// Plate sizes available for one unit, heaviest first
#[derive(Clone, Debug, PartialEq)]
pub struct PlateInventory {
    sizes: Vec<f64>,
}

impl PlateInventory {
    /// Build an inventory from arbitrary sizes
    ///
    /// Non-positive and non-finite sizes are dropped, duplicates collapsed.
    pub fn new(sizes: impl IntoIterator<Item = f64>) -> Self {
        let mut sizes: Vec<f64> = sizes
            .into_iter()
            .filter(|s| s.is_finite() && *s > 0.0)
            .collect();
        sizes.sort_by(|a, b| b.total_cmp(a));
        sizes.dedup();
        Self { sizes }
    }

    /// Standard commercial gym plates for the unit
    pub fn standard(unit: WeightUnit) -> Self {
        match unit {
            WeightUnit::Lbs => Self::new(STANDARD_LBS_PLATES),
            WeightUnit::Kg => Self::new(STANDARD_KG_PLATES),
        }
    }

    pub fn sizes(&self) -> &[f64] {
        &self.sizes
    }
}

// ============================================================================
// Plate Resolver
// ============================================================================

/// Resolves plate loadouts against a per-unit inventory and bar weight
#[derive(Clone, Debug)]
pub struct PlateResolver {
    lbs_plates: PlateInventory,
    kg_plates: PlateInventory,
    bar_lbs: f64,
    bar_kg: f64,
}

impl Default for PlateResolver {
    fn default() -> Self {
        Self {
            lbs_plates: PlateInventory::standard(WeightUnit::Lbs),
            kg_plates: PlateInventory::standard(WeightUnit::Kg),
            bar_lbs: WeightUnit::Lbs.standard_bar_weight(),
            bar_kg: WeightUnit::Kg.standard_bar_weight(),
        }
    }
}

impl PlateResolver {
    /// Build a resolver from configuration
    ///
    /// Empty plate lists keep the standard inventory for that unit.
    pub fn from_config(config: &PlatesConfig) -> Self {
        let inventory = |sizes: &[f64], unit| {
            if sizes.is_empty() {
                PlateInventory::standard(unit)
            } else {
                PlateInventory::new(sizes.iter().copied())
            }
        };

        Self {
            lbs_plates: inventory(&config.lbs, WeightUnit::Lbs),
            kg_plates: inventory(&config.kg, WeightUnit::Kg),
            bar_lbs: config.bar_lbs,
            bar_kg: config.bar_kg,
        }
    }

    pub fn inventory(&self, unit: WeightUnit) -> &PlateInventory {
        match unit {
            WeightUnit::Lbs => &self.lbs_plates,
            WeightUnit::Kg => &self.kg_plates,
        }
    }

    pub fn bar_weight(&self, unit: WeightUnit) -> f64 {
        match unit {
            WeightUnit::Lbs => self.bar_lbs,
            WeightUnit::Kg => self.bar_kg,
        }
    }

    /// Compute the plates to load on each side to reach `total_weight`
    ///
    /// Uses a greedy largest-first fill, which is exact for the
    /// denomination-like inventories found in gyms. Targets below the bar
    /// weight and leftovers that no plate can cover come back as an
    /// unachievable breakdown rather than an error.
    pub fn calculate(
        &self,
        total_weight: f64,
        unit: WeightUnit,
        bar_weight: Option<f64>,
    ) -> PlateBreakdown {
        let bar_weight = bar_weight.unwrap_or_else(|| self.bar_weight(unit));
        let weight_per_side = (total_weight - bar_weight) / 2.0;

        if !weight_per_side.is_finite() || weight_per_side < 0.0 {
            tracing::debug!(
                "Target {}{} cannot be loaded on the {}{} bar",
                total_weight,
                unit,
                bar_weight,
                unit
            );
            return PlateBreakdown {
                weight_per_side,
                unit,
                bar_weight,
                plates: Vec::new(),
                is_achievable: false,
                remainder: Some(weight_per_side),
            };
        }

        let mut remaining = weight_per_side;
        let mut plates = Vec::new();

        for &plate in self.inventory(unit).sizes() {
            // Counts past u32::MAX are capped; whatever they would have loaded
            // stays in the remainder
            let count = ((remaining + FIT_EPSILON) / plate)
                .floor()
                .min(f64::from(u32::MAX));
            if count >= 1.0 {
                let count = count as u32;
                plates.push(PlateCount {
                    plate_weight: plate,
                    count,
                });
                remaining -= f64::from(count) * plate;
            }
        }

        let is_achievable = remaining.abs() <= PLATE_TOLERANCE;
        if !is_achievable {
            tracing::debug!(
                "{}{} per side leaves {}{} unloaded",
                weight_per_side,
                unit,
                remaining,
                unit
            );
        }

        PlateBreakdown {
            weight_per_side,
            unit,
            bar_weight,
            plates,
            is_achievable,
            remainder: if is_achievable { None } else { Some(remaining) },
        }
    }
}

/// Compute plates per side using the standard inventory
///
/// `bar_weight` defaults to 45 lbs or 20 kg.
pub fn calculate_plates(
    total_weight: f64,
    unit: WeightUnit,
    bar_weight: Option<f64>,
) -> PlateBreakdown {
    PlateResolver::default().calculate(total_weight, unit, bar_weight)
}

// ============================================================================
// Formatting
// ============================================================================

fn plate_list(breakdown: &PlateBreakdown) -> String {
    breakdown
        .plates
        .iter()
        .map(|p| {
            format!(
                "{}×{}{}",
                p.count,
                format_magnitude(p.plate_weight),
                breakdown.unit
            )
        })
        .collect::<Vec<_>>()
        .join(" + ")
}

fn short_suffix(breakdown: &PlateBreakdown) -> String {
    match breakdown.remainder {
        Some(_) if breakdown.is_achievable => String::new(),
        Some(remainder) if remainder < 0.0 => format!(
            " ({}{} below bar)",
            format_magnitude(-2.0 * remainder),
            breakdown.unit
        ),
        Some(remainder) => {
            format!(" (+{}{} short)", format_magnitude(remainder), breakdown.unit)
        }
        None => String::new(),
    }
}

/// Render the plates for one side, e.g. `2×45lbs + 1×10lbs`
pub fn format_plate_breakdown(breakdown: &PlateBreakdown) -> String {
    if breakdown.plates.is_empty() {
        return format!("Bar only{}", short_suffix(breakdown));
    }
    format!("{}{}", plate_list(breakdown), short_suffix(breakdown))
}

/// Render the full loadout, e.g. `45lbs bar + 2×45lbs per side`
pub fn format_plates_per_side(breakdown: &PlateBreakdown) -> String {
    let bar = format!("{}{}", format_magnitude(breakdown.bar_weight), breakdown.unit);
    if breakdown.plates.is_empty() {
        return format!("Bar only ({}){}", bar, short_suffix(breakdown));
    }
    format!(
        "{} bar + {} per side{}",
        bar,
        plate_list(breakdown),
        short_suffix(breakdown)
    )
}

// ============================================================================
// Barbell Classification
// ============================================================================

/// Decides whether an exercise is loaded on a barbell
///
/// Implementations are heuristics; hosts with unusual naming supply their own.
pub trait BarbellClassifier {
    fn is_barbell(&self, name: &str, equipment_type: Option<&str>) -> bool;
}

const EXCLUDED_EQUIPMENT: [&str; 5] = ["dumbbell", "kettlebell", "bodyweight", "cable", "machine"];

const BARBELL_EXERCISES: [&str; 27] = [
    "deadlift",
    "bench press",
    "overhead press",
    "military press",
    "push press",
    "squat",
    "back squat",
    "front squat",
    "box squat",
    "pause squat",
    "barbell row",
    "bent over row",
    "bent-over row",
    "pendlay row",
    "t-bar row",
    "power clean",
    "hang clean",
    "clean and jerk",
    "clean & jerk",
    "snatch",
    "push jerk",
    "split jerk",
    "hip thrust",
    "good morning",
    "rdl",
    "romanian deadlift",
    "shrug",
];

/// Keyword-based classifier over lowercase name fragments
#[derive(Clone, Debug)]
pub struct KeywordClassifier {
    barbell: Vec<String>,
    excluded: Vec<String>,
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self {
            barbell: BARBELL_EXERCISES.iter().map(|s| s.to_string()).collect(),
            excluded: EXCLUDED_EQUIPMENT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl KeywordClassifier {
    /// Default keywords plus any extras from configuration
    pub fn from_config(config: &ClassifierConfig) -> Self {
        let mut classifier = Self::default();
        classifier
            .barbell
            .extend(config.extra_barbell.iter().map(|s| s.trim().to_lowercase()));
        classifier
            .excluded
            .extend(config.extra_excluded.iter().map(|s| s.trim().to_lowercase()));
        classifier.barbell.retain(|s| !s.is_empty());
        classifier.excluded.retain(|s| !s.is_empty());
        classifier
    }
}

impl BarbellClassifier for KeywordClassifier {
    fn is_barbell(&self, name: &str, equipment_type: Option<&str>) -> bool {
        if let Some(equipment) = equipment_type {
            if equipment.to_lowercase().contains("barbell") {
                return true;
            }
        }

        let name = name.to_lowercase();
        if name.contains("barbell") {
            return true;
        }

        if self.excluded.iter().any(|k| name.contains(k.as_str())) {
            return false;
        }

        self.barbell.iter().any(|k| name.contains(k.as_str()))
    }
}

static DEFAULT_CLASSIFIER: Lazy<KeywordClassifier> = Lazy::new(KeywordClassifier::default);

/// Classify with the built-in keyword lists
pub fn is_barbell_exercise(name: &str, equipment_type: Option<&str>) -> bool {
    DEFAULT_CLASSIFIER.is_barbell(name, equipment_type)
}
