//! Configuration file loading and command-line value parsing.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use clap::Args;
use gridpath_core::{CellCoord, GridConfig, TerrainKind};
use serde::Deserialize;

/// Contents of a gridpath TOML configuration file.
///
/// ```toml
/// [grid]
/// width = 12
/// wall_percent = 25.0
///
/// [[paint]]
/// cell = { x = 0, y = 3 }
/// kind = "bridge"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ConfigFile {
    /// Grid dimensions, seeding shares and terrain costs.
    pub(crate) grid: GridConfig,
    /// Edits applied after the grid has been seeded.
    pub(crate) paint: Vec<PaintEdit>,
}

/// Single terrain edit requested by the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub(crate) struct PaintEdit {
    /// Cell to repaint.
    pub(crate) cell: CellCoord,
    /// Terrain painted onto the cell.
    pub(crate) kind: TerrainKind,
}

/// Command-line overrides for individual grid settings.
#[derive(Args, Clone, Debug, Default, PartialEq)]
pub(crate) struct GridOverrides {
    /// Half-width of the grid; columns span -width..=width
    #[arg(long)]
    pub(crate) width: Option<u32>,
    /// Half-height of the grid; rows span -height..=height
    #[arg(long)]
    pub(crate) height: Option<u32>,
    /// Distance between adjacent cells
    #[arg(long)]
    pub(crate) pitch: Option<u32>,
    /// Share of cells seeded as walls, in percent
    #[arg(long)]
    pub(crate) walls: Option<f32>,
    /// Share of the remaining cells seeded as water, in percent
    #[arg(long)]
    pub(crate) water: Option<f32>,
    /// Seed for the terrain generator
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

impl GridOverrides {
    /// Replaces every configured field that was given on the command line.
    pub(crate) fn apply(&self, config: &mut GridConfig) {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(pitch) = self.pitch {
            config.pitch = pitch;
        }
        if let Some(walls) = self.walls {
            config.wall_percent = walls;
        }
        if let Some(water) = self.water {
            config.water_percent = water;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
    }
}

/// Loads the configuration file at `path`, or the defaults when none is given.
pub(crate) fn load(path: Option<&Path>) -> Result<ConfigFile> {
    let Some(path) = path else {
        return Ok(ConfigFile::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid configuration in {}", path.display()))
}

/// Parses configuration file contents.
pub(crate) fn parse(contents: &str) -> Result<ConfigFile> {
    toml::from_str(contents).context("failed to parse grid configuration toml")
}

/// Parses a cell written as `x,y`.
pub(crate) fn parse_cell(value: &str) -> Result<CellCoord> {
    let Some((x, y)) = value.split_once(',') else {
        bail!("expected a cell as `x,y`, got `{value}`");
    };
    let x = x
        .trim()
        .parse()
        .with_context(|| format!("invalid x coordinate in `{value}`"))?;
    let y = y
        .trim()
        .parse()
        .with_context(|| format!("invalid y coordinate in `{value}`"))?;
    Ok(CellCoord::new(x, y))
}

/// Parses a terrain edit written as `x,y=kind`.
pub(crate) fn parse_paint(value: &str) -> Result<PaintEdit> {
    let Some((cell, kind)) = value.split_once('=') else {
        bail!("expected an edit as `x,y=kind`, got `{value}`");
    };
    Ok(PaintEdit {
        cell: parse_cell(cell)?,
        kind: kind.parse()?,
    })
}
