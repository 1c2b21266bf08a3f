//! Game configuration types.
//!
//! Hosts configure the engine at startup by providing:
//! - `DifficultyTable`: pair count and grid shape per difficulty
//! - `ThemeConfig`: the ordered face tokens a theme deals from
//! - `GameConfig`: combines both with timing and scoring knobs
//!
//! The defaults reproduce the classic browser game. A host may instead load
//! a TOML file; any section left out keeps its default.
//!
//! ```
//! use memory_match::core::{Difficulty, GameConfig};
//!
//! let config = GameConfig::from_toml("hint_allowance = 5").unwrap();
//! assert_eq!(config.hint_allowance, 5);
//! assert_eq!(config.difficulty(Difficulty::Hard).pairs, 8);
//! ```

use std::str::FromStr;
use std::time::Duration;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::card::Token;
use crate::error::{MemoryMatchError, Result};

/// Difficulty level. Each level keeps its own leaderboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Every level, easiest first.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Storage and display key.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = MemoryMatchError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(MemoryMatchError::UnknownDifficulty(value.to_string())),
        }
    }
}

/// Board shape for one difficulty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    /// Number of pairs dealt.
    pub pairs: usize,
    /// Grid columns.
    pub grid_cols: usize,
    /// Grid rows.
    pub grid_rows: usize,
}

impl DifficultyConfig {
    #[must_use]
    pub const fn new(pairs: usize, grid_cols: usize, grid_rows: usize) -> Self {
        Self {
            pairs,
            grid_cols,
            grid_rows,
        }
    }

    /// Cards on the board, or `None` if the count overflows.
    #[must_use]
    pub const fn card_count(&self) -> Option<usize> {
        self.pairs.checked_mul(2)
    }

    /// Grid cells, or `None` if the count overflows.
    #[must_use]
    pub const fn cell_count(&self) -> Option<usize> {
        self.grid_cols.checked_mul(self.grid_rows)
    }
}

/// Board shapes for every difficulty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTable {
    pub easy: DifficultyConfig,
    pub medium: DifficultyConfig,
    pub hard: DifficultyConfig,
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            easy: DifficultyConfig::new(4, 4, 2),
            medium: DifficultyConfig::new(6, 4, 3),
            hard: DifficultyConfig::new(8, 4, 4),
        }
    }
}

impl DifficultyTable {
    #[must_use]
    pub fn get(&self, difficulty: Difficulty) -> &DifficultyConfig {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    pub fn get_mut(&mut self, difficulty: Difficulty) -> &mut DifficultyConfig {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }

    /// Largest pair count across all levels.
    #[must_use]
    pub fn max_pairs(&self) -> usize {
        Difficulty::ALL
            .iter()
            .map(|&d| self.get(d).pairs)
            .max()
            .unwrap_or(0)
    }
}

/// Theme identifier. Hosts define which themes exist.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeId(String);

impl ThemeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ThemeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ThemeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A theme: an ordered list of distinct face tokens.
///
/// A deal of `n` pairs uses the first `n` tokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub id: ThemeId,
    pub tokens: Vec<Token>,
}

impl ThemeConfig {
    pub fn new<I, T>(id: impl Into<ThemeId>, tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Token>,
    {
        Self {
            id: id.into(),
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }
}

fn default_themes() -> Vec<ThemeConfig> {
    vec![
        ThemeConfig::new(
            "numbers",
            [
                "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13", "14", "15", "16",
            ],
        ),
        ThemeConfig::new(
            "letters",
            [
                "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P",
            ],
        ),
        ThemeConfig::new("emoji", ["💀", "🚀", "🧸", "⚽", "🍎", "🌟", "🎵", "🐱"]),
        ThemeConfig::new("animals", ["🐶", "🐱", "🐭", "🐹", "🐰", "🦊", "🐻", "🐼"]),
    ]
}

fn default_theme_id() -> ThemeId {
    ThemeId::new("numbers")
}

fn default_hint_allowance() -> u32 {
    3
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_leaderboard_capacity() -> usize {
    5
}

fn default_storage_key() -> String {
    "memoryGameTally".to_string()
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Board shape per difficulty.
    #[serde(default)]
    pub difficulties: DifficultyTable,

    /// Available themes, in menu order.
    #[serde(default = "default_themes")]
    pub themes: Vec<ThemeConfig>,

    /// Theme used when a requested theme is unknown.
    #[serde(default = "default_theme_id")]
    pub default_theme: ThemeId,

    /// Hints granted at the start of every session.
    #[serde(default = "default_hint_allowance")]
    pub hint_allowance: u32,

    /// How long a mismatched pair stays face up.
    #[serde(default = "default_delay_ms")]
    pub mismatch_delay_ms: u64,

    /// How long a hint peek stays face up.
    #[serde(default = "default_delay_ms")]
    pub hint_peek_ms: u64,

    /// Best times kept per difficulty.
    #[serde(default = "default_leaderboard_capacity")]
    pub leaderboard_capacity: usize,

    /// Key the leaderboard is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulties: DifficultyTable::default(),
            themes: default_themes(),
            default_theme: default_theme_id(),
            hint_allowance: default_hint_allowance(),
            mismatch_delay_ms: default_delay_ms(),
            hint_peek_ms: default_delay_ms(),
            leaderboard_capacity: default_leaderboard_capacity(),
            storage_key: default_storage_key(),
        }
    }
}

impl GameConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `MemoryMatchError::Config` if the TOML is invalid or fails validation.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| MemoryMatchError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Replace the board shape for one difficulty.
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty, shape: DifficultyConfig) -> Self {
        *self.difficulties.get_mut(difficulty) = shape;
        self
    }

    /// Add a theme, replacing any theme with the same id.
    #[must_use]
    pub fn with_theme(mut self, theme: ThemeConfig) -> Self {
        self.themes.retain(|t| t.id != theme.id);
        self.themes.push(theme);
        self
    }

    /// Set the fallback theme.
    #[must_use]
    pub fn with_default_theme(mut self, theme: impl Into<ThemeId>) -> Self {
        self.default_theme = theme.into();
        self
    }

    /// Set the hints granted per session.
    #[must_use]
    pub fn with_hint_allowance(mut self, hints: u32) -> Self {
        self.hint_allowance = hints;
        self
    }

    /// Set the mismatch display time.
    #[must_use]
    pub fn with_mismatch_delay(mut self, delay: Duration) -> Self {
        self.mismatch_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the hint peek display time.
    #[must_use]
    pub fn with_hint_peek(mut self, delay: Duration) -> Self {
        self.hint_peek_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set how many best times each difficulty keeps.
    #[must_use]
    pub fn with_leaderboard_capacity(mut self, capacity: usize) -> Self {
        self.leaderboard_capacity = capacity;
        self
    }

    /// Set the storage key for the leaderboard.
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Board shape for a difficulty.
    #[must_use]
    pub fn difficulty(&self, difficulty: Difficulty) -> &DifficultyConfig {
        self.difficulties.get(difficulty)
    }

    /// Get a theme by id.
    #[must_use]
    pub fn get_theme(&self, id: &ThemeId) -> Option<&ThemeConfig> {
        self.themes.iter().find(|t| &t.id == id)
    }

    #[must_use]
    pub fn mismatch_delay(&self) -> Duration {
        Duration::from_millis(self.mismatch_delay_ms)
    }

    #[must_use]
    pub fn hint_peek(&self) -> Duration {
        Duration::from_millis(self.hint_peek_ms)
    }

    /// Check the configuration for structural errors.
    ///
    /// Themes shorter than a difficulty's pair count pass here; dealing such
    /// a session fails with `InsufficientThemeTokens` instead.
    ///
    /// # Errors
    /// Returns `MemoryMatchError::Config` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        for difficulty in Difficulty::ALL {
            let shape = self.difficulty(difficulty);
            if shape.pairs == 0 {
                return Err(MemoryMatchError::Config(format!(
                    "difficulty {difficulty} has no pairs"
                )));
            }
            let (Some(cards), Some(cells)) = (shape.card_count(), shape.cell_count()) else {
                return Err(MemoryMatchError::Config(format!(
                    "difficulty {difficulty}: board is too large"
                )));
            };
            if cells < cards {
                return Err(MemoryMatchError::Config(format!(
                    "difficulty {difficulty}: {}x{} grid cannot hold {cards} cards",
                    shape.grid_cols, shape.grid_rows,
                )));
            }
        }

        let mut seen_themes = FxHashSet::default();
        for theme in &self.themes {
            if !seen_themes.insert(&theme.id) {
                return Err(MemoryMatchError::Config(format!(
                    "theme {} defined twice",
                    theme.id
                )));
            }
            let mut seen_tokens = FxHashSet::default();
            for token in &theme.tokens {
                if !seen_tokens.insert(token) {
                    return Err(MemoryMatchError::Config(format!(
                        "theme {} repeats token {token}",
                        theme.id
                    )));
                }
            }
        }

        if self.get_theme(&self.default_theme).is_none() {
            return Err(MemoryMatchError::Config(format!(
                "default theme {} is not defined",
                self.default_theme
            )));
        }

        if self.leaderboard_capacity == 0 {
            return Err(MemoryMatchError::Config(
                "leaderboard capacity must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
