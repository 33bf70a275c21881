//! Classification of raw mapping strings
//!
//! ```text
//! "Throttle.Delta 0.5"  -> Delta    Throttle  0.5
//! "Pitch"               -> Range    Pitch     0
//! "[Roll 0.3]"          -> Absolute Roll      0.3
//! ""                    -> unmapped
//! ```

use super::mapping_types::{Mapping, MappingType};
use super::resolver::parse_or_default;

const SEPARATORS: [char; 4] = ['[', ']', ' ', '\t'];
const DELTA_SUFFIX: &str = ".Delta";

/// Parses a raw mapping string. Never fails; bad numbers leave the value at 0.
pub fn classify(raw: &str) -> Mapping {
    let tokens: Vec<&str> = raw
        .split(|c: char| SEPARATORS.contains(&c))
        .filter(|t| !t.is_empty())
        .collect();

    let Some(&first) = tokens.first() else {
        return Mapping::default();
    };
    let value = tokens
        .get(1)
        .map(|raw| parse_or_default(raw, 0.0f32))
        .unwrap_or(0.0);

    if let Some(action) = first.strip_suffix(DELTA_SUFFIX) {
        Mapping {
            mapping_type: MappingType::Delta,
            action: action.to_string(),
            value,
        }
    } else if tokens.len() == 1 {
        Mapping {
            mapping_type: MappingType::Range,
            action: first.to_string(),
            value: 0.0,
        }
    } else {
        Mapping {
            mapping_type: MappingType::Absolute,
            action: first.to_string(),
            value,
        }
    }
}
