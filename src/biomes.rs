//! Static biome configuration.
//!
//! The resampling pipeline never classifies biomes itself, it copies
//! previously assigned ids forward and applies the island/coastal recolor
//! rules. The full default table (including the classification matrix) is
//! carried here as injected configuration so ids stay meaningful across
//! datasets; [`BiomeTable::classify`] reproduces the reference decision
//! function for callers that build maps from scratch.

use serde::{Deserialize, Serialize};

use crate::mesh::MIN_LAND_HEIGHT;

// Base biome ids.
pub const MARINE: u8 = 0;
pub const SAVANNA: u8 = 1;
pub const PRAIRIE: u8 = 2;
pub const FOLKVANGR: u8 = 3;
pub const DEADWOOD: u8 = 4;
pub const RAINFOREST: u8 = 5;
pub const GRASSLAND: u8 = 6;
pub const SWAMP: u8 = 7;
pub const FOREST: u8 = 8;
pub const TAIGA: u8 = 9;
pub const TUNDRA: u8 = 10;
pub const BAMBOO_GROVE: u8 = 11;
pub const MARSH: u8 = 12;
pub const CLOUD_MOUNTAIN: u8 = 13;
pub const SNOW_MOUNTAIN: u8 = 14;

// Variants assigned by the post-migration recolor passes.
pub const TROPICAL_ISLAND: u8 = 15;
pub const POLAR_ISLAND: u8 = 16;
pub const CORAL_SHELF: u8 = 17;
pub const LAGOON: u8 = 18;
pub const ICE_SHELF: u8 = 19;

/// Static per-biome data plus the moisture x temperature classification
/// matrix.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BiomeTable {
    pub names: Vec<String>,
    pub colors: Vec<String>,
    /// Habitability score, 0-100.
    pub habitability: Vec<u8>,
    /// Relief icon density used by renderers; carried as opaque data.
    pub icon_density: Vec<u16>,
    /// Movement cost per biome.
    pub cost: Vec<u16>,
    /// Biome id by moisture band (0-4) and temperature band (0-25).
    pub matrix: Vec<Vec<u8>>,
}

impl Default for BiomeTable {
    fn default() -> Self {
        let names = [
            "Marine",
            "Savanna",
            "Prarie",
            "Folkvangr",
            "Deadwood",
            "Rainforest",
            "Grassland",
            "Swamp",
            "Forest",
            "Taiga",
            "Tundra",
            "Bamboo grove",
            "Marsh",
            "Cloud mountain",
            "Snow mountain",
            "Tropical island",
            "Polar island",
            "Coral shelf",
            "Lagoon",
            "Ice shelf",
        ];
        let colors = [
            "#466eab", "#fbe79f", "#b5b887", "#475161", "#1c040d", "#03420b", "#29bc56",
            "#e85f94", "#409c43", "#4b6b32", "#96784b", "#61eda0", "#78042c", "#07a3a6",
            "#ffffff", "#d5e7eb", "#cbe1e4", "#52a595", "#6bc4b1", "#e9f5f5",
        ];
        let habitability = vec![0, 4, 10, 22, 30, 50, 100, 80, 90, 12, 4, 0, 12, 50, 20, 20, 2, 0, 0, 0];
        let icon_density = vec![0, 3, 2, 120, 120, 120, 120, 150, 150, 100, 5, 0, 250, 200, 10, 60, 10, 0, 0, 0];
        let cost = vec![10, 200, 150, 60, 50, 70, 70, 80, 90, 200, 1000, 5000, 150, 1000, 1000, 80, 300, 10, 10, 10];

        // hot <-> cold [>19C; <-4C]; dry (top row) to wet (bottom row)
        let matrix = vec![
            vec![1, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 10, 10, 10],
            vec![1, 1, 1, 6, 6, 6, 6, 6, 6, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 9, 9, 10, 10, 10, 3],
            vec![5, 11, 4, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 2, 2, 2, 2, 9, 9, 9, 9, 9, 9, 10, 10, 3],
            vec![5, 11, 4, 4, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 9, 9, 9, 9, 9, 9, 10, 3, 3],
            vec![5, 11, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 9, 9, 9, 9, 9, 10, 3, 3, 3],
        ];

        Self {
            names: names.iter().map(|s| s.to_string()).collect(),
            colors: colors.iter().map(|s| s.to_string()).collect(),
            habitability,
            icon_density,
            cost,
            matrix,
        }
    }
}

impl BiomeTable {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Reference classification by moisture, temperature and height.
    pub fn classify(&self, moisture: f32, temperature: i8, height: u8) -> u8 {
        if height > 45 {
            return if temperature > 16 { CLOUD_MOUNTAIN } else { SNOW_MOUNTAIN };
        }
        if height < MIN_LAND_HEIGHT {
            return MARINE;
        }
        if temperature > 20 && moisture > 30.0 && height < 25 {
            return SWAMP;
        }
        if is_marsh(moisture, temperature, height) {
            return MARSH;
        }

        let moisture_band = ((moisture / 5.0) as usize).min(4);
        let temperature_band = (20 - temperature as i32).clamp(0, 25) as usize;
        self.matrix[moisture_band][temperature_band]
    }
}

fn is_marsh(moisture: f32, temperature: i8, height: u8) -> bool {
    if temperature <= 0 || temperature > 20 {
        return false;
    }
    moisture > 30.0 && height < 25
}

/// One coastal recolor rule: a shallow-water cell bordering any of
/// `neighbors` takes `variant`. Rules are checked in order, first match
/// wins.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShelfRule {
    pub neighbors: Vec<u8>,
    pub variant: u8,
}

/// Injected configuration for the post-migration recolor passes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IslandRules {
    /// Ordered coastal recolor rules.
    pub shelf_rules: Vec<ShelfRule>,
    /// Absolute latitude at or below which islands are tropical.
    pub tropical_max_lat: f32,
    /// Absolute latitude at or above which islands are polar.
    pub polar_min_lat: f32,
    pub tropical_island: u8,
    pub polar_island: u8,
    /// Connectivity cap: a land component whose walk exceeds this many
    /// cells is treated as mainland and left untouched.
    pub max_island_cells: usize,
}

impl Default for IslandRules {
    fn default() -> Self {
        Self {
            shelf_rules: vec![
                ShelfRule {
                    neighbors: vec![FOREST, GRASSLAND, PRAIRIE, CLOUD_MOUNTAIN],
                    variant: CORAL_SHELF,
                },
                ShelfRule {
                    neighbors: vec![RAINFOREST, CLOUD_MOUNTAIN, TROPICAL_ISLAND],
                    variant: LAGOON,
                },
                ShelfRule {
                    neighbors: vec![FOLKVANGR, POLAR_ISLAND],
                    variant: ICE_SHELF,
                },
            ],
            tropical_max_lat: 23.5,
            polar_min_lat: 60.0,
            tropical_island: TROPICAL_ISLAND,
            polar_island: POLAR_ISLAND,
            max_island_cells: 30,
        }
    }
}
