//! pgvector literal codec
//!
//! Both the insert path and the search path hand vectors to PostgreSQL as
//! textual literals cast to `vector(d)`. Components are rendered with
//! exactly 7 fractional digits: fixed precision keeps payloads bounded,
//! avoids scientific notation, and is stable enough for cosine ranking.

use streamrag_core::error::{Result, StreamragError};

/// Encode a vector as a pgvector literal, e.g. `[0.1000000,-0.2000000]`
///
/// Fails with `NonFiniteComponent` if any component is NaN or infinite.
pub fn encode(vector: &[f32]) -> Result<String> {
    let mut parts = Vec::with_capacity(vector.len());
    for (index, component) in vector.iter().enumerate() {
        if !component.is_finite() {
            return Err(StreamragError::NonFiniteComponent { index });
        }
        parts.push(format!("{:.7}", component));
    }
    Ok(format!("[{}]", parts.join(",")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encodes_with_exactly_seven_fractional_digits() {
        let literal = encode(&[0.1234567, -0.9999999]).unwrap();
        assert_eq!(literal, "[0.1234567,-0.9999999]");
    }

    #[test]
    fn encodes_whole_numbers_without_exponent() {
        let literal = encode(&[1.0, 0.0, -2.0]).unwrap();
        assert_eq!(literal, "[1.0000000,0.0000000,-2.0000000]");
    }

    #[test]
    fn encodes_empty_vector() {
        assert_eq!(encode(&[]).unwrap(), "[]");
    }

    #[test]
    fn rejects_nan_component() {
        let err = encode(&[0.5, f32::NAN]).unwrap_err();
        assert!(matches!(err, StreamragError::NonFiniteComponent { index: 1 }));
    }

    #[test]
    fn rejects_infinite_component() {
        let err = encode(&[f32::INFINITY]).unwrap_err();
        assert!(matches!(err, StreamragError::NonFiniteComponent { index: 0 }));
    }

    proptest! {
        #[test]
        fn literal_shape_holds_for_finite_vectors(
            vector in proptest::collection::vec(-1.0f32..=1.0, 1..64)
        ) {
            let literal = encode(&vector).unwrap();
            prop_assert!(literal.starts_with('['));
            prop_assert!(literal.ends_with(']'));
            prop_assert!(!literal.contains('e') && !literal.contains('E'));

            let inner = &literal[1..literal.len() - 1];
            let components: Vec<&str> = inner.split(',').collect();
            prop_assert_eq!(components.len(), vector.len());
            for component in components {
                let fraction = component.split('.').nth(1).unwrap();
                prop_assert_eq!(fraction.len(), 7);
            }
        }
    }
}
