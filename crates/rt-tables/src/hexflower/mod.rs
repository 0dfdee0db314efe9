//! Hexflowers: a graph of hexes walked one dice-driven step at a time.
//!
//! A hexflower file is JSON:
//!
//! ```json
//! {
//!   "navigator": {
//!     "formula": "2d6",
//!     "start": 1,
//!     "navigation": { "2": "self", "3": "top", "4": "bottom" }
//!   },
//!   "hex-list": [
//!     { "id": 1, "content": "Clear", "neighbours": { "top": 2 } },
//!     { "id": 2, "content": "Rain", "neighbours": { "bottom": 1 } }
//!   ],
//!   "comment": { "description": "Weather", "source": "homebrew" }
//! }
//! ```
//!
//! A roll with no navigation entry means "stay"; a direction with no
//! neighbour loops back to the current hex.

pub mod direction;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use rt_dice::{DiceExpr, DiceRoller};
use serde::Deserialize;

use crate::error::{TableError, TableResult};
use crate::format::TableFormat;

pub use direction::Direction;

/// One cell of a hexflower.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hexagon {
    /// Unique id within the flower.
    pub id: u32,
    /// What the hex produces when visited.
    pub content: String,
    neighbours: HashMap<Direction, u32>,
}

impl Hexagon {
    /// The hex reached by moving `direction`; the hex itself if unset.
    pub fn neighbour(&self, direction: Direction) -> u32 {
        self.neighbours.get(&direction).copied().unwrap_or(self.id)
    }
}

impl fmt::Display for Hexagon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

/// Maps navigation rolls to directions.
#[derive(Debug, Clone)]
pub struct Navigator {
    /// Formula rolled once per step.
    pub formula: DiceExpr,
    /// Default start hex.
    pub start: u32,
    navigation: BTreeMap<i64, Direction>,
}

impl Navigator {
    /// Roll the next direction.
    pub fn next_direction(&self, dice: &mut DiceRoller) -> Direction {
        let rolled = dice.roll_expr(&self.formula);
        self.navigation
            .get(&rolled)
            .copied()
            .unwrap_or(Direction::Stay)
    }
}

/// A parsed hexflower.
#[derive(Debug, Clone)]
pub struct Hexflower {
    navigator: Navigator,
    hexes: BTreeMap<u32, Hexagon>,
    description: Option<String>,
}

#[derive(Deserialize)]
struct RawFlower {
    navigator: RawNavigator,
    #[serde(rename = "hex-list")]
    hex_list: Vec<RawHex>,
    #[serde(default)]
    comment: Option<RawComment>,
}

#[derive(Deserialize)]
struct RawNavigator {
    formula: String,
    start: u32,
    navigation: HashMap<String, String>,
}

#[derive(Deserialize)]
struct RawHex {
    id: u32,
    content: String,
    #[serde(default)]
    neighbours: HashMap<String, u32>,
}

#[derive(Deserialize)]
struct RawComment {
    #[serde(default)]
    description: String,
    #[serde(default)]
    source: Option<String>,
}

fn invalid(reason: impl Into<String>) -> TableError {
    TableError::invalid(TableFormat::Hexflower, reason)
}

fn direction(name: &str) -> TableResult<Direction> {
    Direction::from_name(name).ok_or_else(|| invalid(format!("unknown direction '{name}'")))
}

impl Hexflower {
    /// Parse a hexflower document.
    pub fn parse(raw: &str) -> TableResult<Self> {
        let flower: RawFlower = serde_json::from_str(raw).map_err(|e| invalid(e.to_string()))?;

        let formula = DiceExpr::parse(&flower.navigator.formula)?;
        let mut navigation = BTreeMap::new();
        for (roll, name) in &flower.navigator.navigation {
            let roll = roll
                .trim()
                .parse::<i64>()
                .map_err(|_| invalid(format!("navigation key '{roll}' is not an integer")))?;
            navigation.insert(roll, direction(name)?);
        }

        let mut hexes = BTreeMap::new();
        for hex in flower.hex_list {
            let neighbours = hex
                .neighbours
                .iter()
                .map(|(name, id)| Ok((direction(name)?, *id)))
                .collect::<TableResult<HashMap<_, _>>>()?;
            let id = hex.id;
            let previous = hexes.insert(
                id,
                Hexagon {
                    id,
                    content: hex.content,
                    neighbours,
                },
            );
            if previous.is_some() {
                return Err(invalid(format!("hex {id} is defined twice")));
            }
        }

        for hex in hexes.values() {
            for (dir, target) in &hex.neighbours {
                if !hexes.contains_key(target) {
                    return Err(invalid(format!(
                        "hex {} points {dir} to missing hex {target}",
                        hex.id
                    )));
                }
            }
        }

        let start = flower.navigator.start;
        if !hexes.contains_key(&start) {
            return Err(invalid(format!("start hex {start} is not defined")));
        }

        let description = flower.comment.map(|c| match c.source {
            Some(source) => format!("{}\n\nSource: {source}", c.description),
            None => c.description,
        });

        Ok(Self {
            navigator: Navigator {
                formula,
                start,
                navigation,
            },
            hexes,
            description,
        })
    }

    /// The navigator.
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Hexes ordered by id.
    pub fn hexes(&self) -> impl Iterator<Item = &Hexagon> {
        self.hexes.values()
    }

    /// Number of hexes.
    pub fn len(&self) -> usize {
        self.hexes.len()
    }

    /// True if the flower has no hexes.
    pub fn is_empty(&self) -> bool {
        self.hexes.is_empty()
    }

    /// Description and source from the file's comment block.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Look up a hex.
    pub fn hex(&self, id: u32) -> TableResult<&Hexagon> {
        self.hexes.get(&id).ok_or(TableError::UnknownHex(id))
    }

    /// Visit `count` hexes, beginning at `start` (or the navigator's start)
    /// and taking one navigated step between visits.
    pub fn walk(
        &self,
        start: Option<u32>,
        count: usize,
        dice: &mut DiceRoller,
    ) -> TableResult<Vec<String>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let mut current = self.hex(start.unwrap_or(self.navigator.start))?;
        let mut visited = Vec::with_capacity(count);
        visited.push(current.to_string());
        for _ in 1..count {
            let direction = self.navigator.next_direction(dice);
            current = self.hex(current.neighbour(direction))?;
            visited.push(current.to_string());
        }
        Ok(visited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEATHER: &str = r#"{
        "navigator": {
            "formula": "d2",
            "start": 1,
            "navigation": { "1": "top", "2": "bottom" }
        },
        "hex-list": [
            { "id": 1, "content": "Clear", "neighbours": { "top": 2, "bottom": 3 } },
            { "id": 2, "content": "Rain", "neighbours": { "bottom": 1 } },
            { "id": 3, "content": "Fog", "neighbours": { "top": 1 } }
        ],
        "comment": { "description": "Weather", "source": "homebrew" }
    }"#;

    #[test]
    fn parse_flower() {
        let flower = Hexflower::parse(WEATHER).unwrap();
        assert_eq!(flower.len(), 3);
        assert_eq!(flower.navigator().start, 1);
        assert_eq!(flower.description(), Some("Weather\n\nSource: homebrew"));
        let clear = flower.hex(1).unwrap();
        assert_eq!(clear.neighbour(Direction::Top), 2);
        assert_eq!(clear.neighbour(Direction::TopLeft), 1);
    }

    #[test]
    fn walk_follows_neighbours() {
        let flower = Hexflower::parse(WEATHER).unwrap();
        let mut dice = DiceRoller::from_seed(4);
        let visited = flower.walk(None, 20, &mut dice).unwrap();
        assert_eq!(visited.len(), 20);
        assert_eq!(visited[0], "Clear");
        for pair in visited.windows(2) {
            let from_clear = pair[0] == "Clear";
            assert_eq!(from_clear, pair[1] != "Clear", "bad step {pair:?}");
        }
    }

    #[test]
    fn unmapped_rolls_stay_put() {
        let raw = r#"{
            "navigator": { "formula": "d6", "start": 7, "navigation": {} },
            "hex-list": [ { "id": 7, "content": "Calm", "neighbours": {} } ]
        }"#;
        let flower = Hexflower::parse(raw).unwrap();
        let mut dice = DiceRoller::from_seed(1);
        assert_eq!(flower.walk(None, 5, &mut dice).unwrap(), vec!["Calm"; 5]);
        assert!(flower.walk(None, 0, &mut dice).unwrap().is_empty());
        assert_eq!(flower.description(), None);
    }

    #[test]
    fn start_override() {
        let flower = Hexflower::parse(WEATHER).unwrap();
        let mut dice = DiceRoller::from_seed(1);
        assert_eq!(flower.walk(Some(3), 1, &mut dice).unwrap(), vec!["Fog"]);
        assert!(matches!(
            flower.walk(Some(9), 1, &mut dice),
            Err(TableError::UnknownHex(9))
        ));
    }

    #[test]
    fn rejects_broken_documents() {
        let cases = [
            "not json",
            r#"{"navigator": {"formula": "d6", "start": 1, "navigation": {"1": "left"}},
                "hex-list": [{"id": 1, "content": "a"}]}"#,
            r#"{"navigator": {"formula": "d6", "start": 2, "navigation": {}},
                "hex-list": [{"id": 1, "content": "a"}]}"#,
            r#"{"navigator": {"formula": "d6", "start": 1, "navigation": {}},
                "hex-list": [{"id": 1, "content": "a", "neighbours": {"top": 5}}]}"#,
            r#"{"navigator": {"formula": "d6", "start": 1, "navigation": {"x": "top"}},
                "hex-list": [{"id": 1, "content": "a"}]}"#,
        ];
        for raw in cases {
            assert!(
                matches!(
                    Hexflower::parse(raw),
                    Err(TableError::InvalidFormat {
                        format: TableFormat::Hexflower,
                        ..
                    })
                ),
                "accepted {raw}"
            );
        }
    }

    #[test]
    fn bad_navigator_formula() {
        let raw = r#"{"navigator": {"formula": "2d", "start": 1, "navigation": {}},
                      "hex-list": [{"id": 1, "content": "a"}]}"#;
        assert!(Hexflower::parse(raw).unwrap_err().is_dice_error());
    }
}
