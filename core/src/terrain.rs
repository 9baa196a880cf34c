//! Terrain kinds and the catalog that prices them.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::GridError;

/// Categorical cell type painted onto the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainKind {
    /// Open ground.
    Floor,
    /// Shallow water that slows movement.
    Water,
    /// Crossing laid over water.
    Bridge,
    /// Solid obstacle that can never be entered.
    Wall,
}

impl TerrainKind {
    /// Every terrain kind in declaration order.
    pub const ALL: [Self; 4] = [Self::Floor, Self::Water, Self::Bridge, Self::Wall];

    /// Lowercase name used by configuration files and the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Floor => "floor",
            Self::Water => "water",
            Self::Bridge => "bridge",
            Self::Wall => "wall",
        }
    }
}

impl fmt::Display for TerrainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TerrainKind {
    type Err = GridError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| GridError::InvalidTerrainKind {
                name: trimmed.to_owned(),
            })
    }
}

/// Movement cost and passability assigned to a terrain kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TerrainProfile {
    movement_cost: u32,
    passable: bool,
}

impl TerrainProfile {
    /// Profile used for cells that can never be entered.
    pub const IMPASSABLE: Self = Self {
        movement_cost: 0,
        passable: false,
    };

    /// Creates a passable profile charging `movement_cost` on entry.
    #[must_use]
    pub const fn passable(movement_cost: u32) -> Self {
        Self {
            movement_cost,
            passable: true,
        }
    }

    /// Cost charged for entering a cell with this profile.
    #[must_use]
    pub const fn movement_cost(&self) -> u32 {
        self.movement_cost
    }

    /// Reports whether a cell with this profile may be entered.
    #[must_use]
    pub const fn is_passable(&self) -> bool {
        self.passable
    }
}

/// Entry costs for the passable terrain kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainCosts {
    /// Cost of entering a floor cell.
    pub floor: u32,
    /// Cost of entering a water cell.
    pub water: u32,
    /// Cost of entering a bridge cell.
    pub bridge: u32,
}

impl Default for TerrainCosts {
    fn default() -> Self {
        Self {
            floor: 10,
            water: 30,
            bridge: 10,
        }
    }
}

/// Maps each recognised terrain kind to its movement profile.
///
/// The catalog is plain data so cost balancing stays a configuration change.
/// Walls are always impassable: any profile registered for
/// [`TerrainKind::Wall`] is replaced by [`TerrainProfile::IMPASSABLE`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerrainCatalog {
    profiles: BTreeMap<TerrainKind, TerrainProfile>,
}

impl TerrainCatalog {
    /// Creates a catalog that recognises no terrain at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            profiles: BTreeMap::new(),
        }
    }

    /// Builds the standard four-kind catalog from the provided entry costs.
    pub fn from_costs(costs: &TerrainCosts) -> Result<Self, GridError> {
        Self::empty()
            .with_profile(TerrainKind::Floor, TerrainProfile::passable(costs.floor))?
            .with_profile(TerrainKind::Water, TerrainProfile::passable(costs.water))?
            .with_profile(TerrainKind::Bridge, TerrainProfile::passable(costs.bridge))?
            .with_profile(TerrainKind::Wall, TerrainProfile::IMPASSABLE)
    }

    /// Registers or overrides the profile of a single terrain kind.
    pub fn with_profile(
        mut self,
        kind: TerrainKind,
        profile: TerrainProfile,
    ) -> Result<Self, GridError> {
        let profile = if kind == TerrainKind::Wall {
            TerrainProfile::IMPASSABLE
        } else {
            profile
        };

        if profile.is_passable() && profile.movement_cost() == 0 {
            return Err(GridError::ZeroCost { kind });
        }

        let _ = self.profiles.insert(kind, profile);
        Ok(self)
    }

    /// Looks up the profile registered for `kind`.
    pub fn profile(&self, kind: TerrainKind) -> Result<TerrainProfile, GridError> {
        self.profiles
            .get(&kind)
            .copied()
            .ok_or(GridError::UnregisteredTerrain { kind })
    }

    /// Cost charged for entering a cell of the provided kind.
    pub fn cost_of(&self, kind: TerrainKind) -> Result<u32, GridError> {
        self.profile(kind).map(|profile| profile.movement_cost())
    }

    /// Reports whether cells of the provided kind may be entered.
    pub fn is_passable(&self, kind: TerrainKind) -> Result<bool, GridError> {
        self.profile(kind).map(|profile| profile.is_passable())
    }

    /// Reports whether the catalog has a profile for `kind`.
    #[must_use]
    pub fn recognises(&self, kind: TerrainKind) -> bool {
        self.profiles.contains_key(&kind)
    }
}

impl Default for TerrainCatalog {
    fn default() -> Self {
        let costs = TerrainCosts::default();
        let profiles = BTreeMap::from([
            (TerrainKind::Floor, TerrainProfile::passable(costs.floor)),
            (TerrainKind::Water, TerrainProfile::passable(costs.water)),
            (TerrainKind::Bridge, TerrainProfile::passable(costs.bridge)),
            (TerrainKind::Wall, TerrainProfile::IMPASSABLE),
        ]);
        Self { profiles }
    }
}
