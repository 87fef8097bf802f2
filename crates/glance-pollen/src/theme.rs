//! Per-level colours, labels and icons.

use glance_render::{DynamicColor, Symbol};

use crate::types::MAX_POLLEN_INDEX;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelTheme {
    pub label: &'static str,
    pub gradient_start: DynamicColor,
    pub gradient_end: DynamicColor,
    pub text: DynamicColor,
    pub symbol: Symbol,
}

struct Row {
    label: &'static str,
    start: &'static str,
    end: &'static str,
    text: &'static str,
    dark_text: &'static str,
    symbol: Symbol,
}

const DARK_START: &str = "333333";
const DARK_END: &str = "000000";

const LEVELS: [Row; 6] = [
    Row {
        label: "None",
        start: "8fec74",
        end: "77c853",
        text: "1f1f1f",
        dark_text: "6de46d",
        symbol: Symbol::AqiLow,
    },
    Row {
        label: "Very Low",
        start: "f2e269",
        end: "dfb743",
        text: "1f1f1f",
        dark_text: "f2e269",
        symbol: Symbol::AqiLow,
    },
    Row {
        label: "Low",
        start: "f5ba2a",
        end: "d3781c",
        text: "1f1f1f",
        dark_text: "f7a021",
        symbol: Symbol::AqiLow,
    },
    Row {
        label: "Medium",
        start: "da5340",
        end: "bc2f26",
        text: "eaeaea",
        dark_text: "f16745",
        symbol: Symbol::AqiMedium,
    },
    Row {
        label: "High",
        start: "9c2424",
        end: "661414",
        text: "f0f0f0",
        dark_text: "f33939",
        symbol: Symbol::AqiHigh,
    },
    Row {
        label: "Very High",
        start: "76205d",
        end: "521541",
        text: "f0f0f0",
        dark_text: "ce4ec5",
        symbol: Symbol::AqiHigh,
    },
];

/// Theme for a pollen level. Levels above the top of the scale use the top row.
pub fn level_theme(level: u8) -> LevelTheme {
    let row = &LEVELS[usize::from(level.min(MAX_POLLEN_INDEX))];
    LevelTheme {
        label: row.label,
        gradient_start: DynamicColor::new(row.start, DARK_START),
        gradient_end: DynamicColor::new(row.end, DARK_END),
        text: DynamicColor::new(row.text, row.dark_text),
        symbol: row.symbol,
    }
}
