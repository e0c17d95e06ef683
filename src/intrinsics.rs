/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! The intrinsic function registry.
//!
//! Bytecode refers to intrinsics by their position in this table, so the
//! ordering is part of the binary contract for a protocol version. Index 0
//! is reserved and unused.

use crate::errors::CompilerError;

pub struct Intrinsic {
    pub name: &'static str,
    pub minimum: u8,
    pub maximum: u8,
}

const fn intrinsic(name: &'static str, minimum: u8, maximum: u8) -> Intrinsic {
    Intrinsic {
        name,
        minimum,
        maximum,
    }
}

// Positions are fixed; append-only across protocol versions.
static REGISTRY: &[Intrinsic] = &[
    intrinsic("<reserved>", 0, 0),
    intrinsic("$addItem", 2, 2),
    intrinsic("$and", 2, 2),
    intrinsic("$arccosine", 1, 1),
    intrinsic("$arcsine", 1, 1),
    intrinsic("$arctangent", 1, 2),
    intrinsic("$association", 2, 2),
    intrinsic("$catalog", 0, 1),
    intrinsic("$complement", 1, 1),
    intrinsic("$concatenation", 2, 2),
    intrinsic("$conjugate", 1, 1),
    intrinsic("$cosine", 1, 1),
    intrinsic("$default", 2, 2),
    intrinsic("$difference", 2, 2),
    intrinsic("$exponential", 2, 2),
    intrinsic("$factorial", 1, 1),
    intrinsic("$inverse", 1, 1),
    intrinsic("$isEqualTo", 2, 2),
    intrinsic("$isLessThan", 2, 2),
    intrinsic("$isMatchedBy", 2, 2),
    intrinsic("$isMoreThan", 2, 2),
    intrinsic("$isSameAs", 2, 2),
    intrinsic("$list", 0, 1),
    intrinsic("$logarithm", 1, 2),
    intrinsic("$magnitude", 1, 1),
    intrinsic("$or", 2, 2),
    intrinsic("$parameters", 1, 1),
    intrinsic("$product", 2, 2),
    intrinsic("$queue", 0, 1),
    intrinsic("$quotient", 2, 2),
    intrinsic("$random", 0, 0),
    intrinsic("$range", 2, 3),
    intrinsic("$reciprocal", 1, 1),
    intrinsic("$remainder", 2, 2),
    intrinsic("$sans", 2, 2),
    intrinsic("$set", 0, 1),
    intrinsic("$setParameters", 2, 2),
    intrinsic("$sine", 1, 1),
    intrinsic("$stack", 0, 1),
    intrinsic("$sum", 2, 2),
    intrinsic("$tangent", 1, 1),
    intrinsic("$xor", 2, 2),
];

/// The 1-based index of a named intrinsic.
pub fn index_of(name: &str) -> Option<u16> {
    REGISTRY
        .iter()
        .skip(1)
        .position(|entry| entry.name == name)
        .map(|position| position as u16 + 1)
}

/// The name registered at an index.
pub fn name_at(index: u16) -> Option<&'static str> {
    if index == 0 {
        return None;
    }
    REGISTRY.get(index as usize).map(|entry| entry.name)
}

/// Argument shape validation used by the runtime before dispatching an
/// intrinsic call.
pub fn validate_argument_count(name: &str, count: u8) -> Result<(), CompilerError> {
    let index = index_of(name).ok_or_else(|| CompilerError::ArgumentValue {
        intrinsic: name.to_string(),
        reason: "the intrinsic is not registered".to_string(),
    })?;
    let entry = &REGISTRY[index as usize];
    if count < entry.minimum || count > entry.maximum {
        return Err(CompilerError::ArgumentValue {
            intrinsic: name.to_string(),
            reason: format!(
                "{} arguments were passed, {} through {} are allowed",
                count, entry.minimum, entry.maximum
            ),
        });
    }
    Ok(())
}

// ------------- unit tests -------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_zero_is_reserved() {
        assert_eq!(name_at(0), None);
        assert_eq!(index_of("<reserved>"), None);
    }

    #[test]
    fn test_lookup_round_trips() {
        let index = index_of("$isMatchedBy").unwrap();
        assert_eq!(name_at(index), Some("$isMatchedBy"));
        assert_eq!(index_of("$undefined"), None);
    }

    #[test]
    fn test_registry_order_is_part_of_the_contract() {
        assert_eq!(index_of("$addItem"), Some(1));
        assert_eq!(index_of("$xor"), Some((REGISTRY.len() - 1) as u16));
        // The table is kept alphabetical so new protocol versions append
        // past the end rather than re-sorting.
        let mut names: Vec<&str> = REGISTRY.iter().skip(1).map(|entry| entry.name).collect();
        let original = names.clone();
        names.sort_unstable();
        assert_eq!(names, original);
    }

    #[test]
    fn test_argument_shape_validation() {
        assert!(validate_argument_count("$sum", 2).is_ok());
        assert!(validate_argument_count("$range", 3).is_ok());
        assert_eq!(
            validate_argument_count("$sum", 1),
            Err(CompilerError::ArgumentValue {
                intrinsic: "$sum".to_string(),
                reason: "1 arguments were passed, 2 through 2 are allowed".to_string(),
            })
        );
        assert!(validate_argument_count("$undefined", 0).is_err());
    }
}
