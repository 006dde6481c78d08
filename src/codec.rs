//! Compact text encoding of problems
//!
//! A problem is shared as the JSON form of its [`Parts`], wrapped in
//! URL-safe base64 without padding, so that the result can be pasted into
//! the query string or fragment of a link as is.
//!
//! ```
//! use multi_covers::{codec, Problem};
//!
//! let mut problem = Problem::new(["x", "y"])?;
//! problem.set_target(&"x", 2)?;
//! problem.add_row(1, [("x", 2), ("y", 1)])?;
//!
//! let link = codec::encode(&problem)?;
//! assert!(link.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_'));
//! let shared: Problem<String, u32> = codec::decode(&link)?;
//! assert_eq!(shared.target(&"x".to_string()), Some(2));
//! assert_eq!(shared.amount(&1, &"x".to_string()), Some(2));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::{CodecError, Parts, Problem};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// Encodes a problem as a URL-safe string.
///
/// Every target and every amount is written out explicitly, so the string
/// does not depend on the defaults applied by [`Problem::from_parts`].
///
/// # Errors
///
/// Fails only if the identifiers cannot be serialized as JSON.
pub fn encode<C, R>(problem: &Problem<C, R>) -> Result<String, CodecError>
where
    C: Ord + Clone + Serialize,
    R: Ord + Clone + Serialize,
{
    let json = serde_json::to_vec(&problem.to_parts())?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Decodes a problem produced by [`encode`].
///
/// The decoded fields go through [`Problem::from_parts`], so a hand-written
/// payload may leave out targets and amounts that equal 1.
///
/// # Errors
///
/// Fails if `text` is not URL-safe base64, if the bytes are not the JSON
/// form of [`Parts`], or if the parts describe an invalid problem.
pub fn decode<C, R>(text: &str) -> Result<Problem<C, R>, CodecError>
where
    C: Ord + Debug + DeserializeOwned,
    R: Ord + Debug + DeserializeOwned,
{
    let json = URL_SAFE_NO_PAD.decode(text.trim())?;
    let parts: Parts<C, R> = serde_json::from_slice(&json)?;
    let problem = Problem::from_parts(parts)?;
    tracing::debug!(
        columns = problem.columns().len(),
        rows = problem.row_count(),
        "decoded problem"
    );
    Ok(problem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProblemError;
    use proptest::prelude::*;

    fn example() -> Problem<u8, char> {
        let mut problem = Problem::new(1..=5).unwrap();
        problem.set_target(&3, 2).unwrap();
        problem.add_unit_row('A', [2, 3, 4]).unwrap();
        problem.add_unit_row('B', [1, 2, 4, 5]).unwrap();
        problem.add_unit_row('C', [1, 5]).unwrap();
        problem.add_unit_row('D', [1, 2, 3, 4]).unwrap();
        problem.add_row('E', [(3, 2)]).unwrap();
        problem
    }

    #[test]
    fn decoding_restores_every_field() {
        let problem = example();
        let text = encode(&problem).unwrap();
        assert!(!text.contains('='));
        let decoded: Problem<u8, char> = decode(&text).unwrap();
        assert_eq!(decoded.columns(), problem.columns());
        assert!(decoded.targets().eq(problem.targets()));
        assert_eq!(decoded.to_parts().rows, problem.to_parts().rows);
        assert_eq!(decoded.to_parts().amounts, problem.to_parts().amounts);
        assert_eq!(decoded, problem);
    }

    #[test]
    fn missing_fields_default_to_one() {
        let json = r#"{"columns":["a","b"],"rows":[["r",["a","b"]]],"targets":[],"amounts":[]}"#;
        let text = URL_SAFE_NO_PAD.encode(json);
        let problem: Problem<String, String> = decode(&text).unwrap();
        assert_eq!(problem.target(&"a".to_string()), Some(1));
        assert_eq!(problem.amount(&"r".to_string(), &"b".to_string()), Some(1));
    }

    #[test]
    fn malformed_payloads_are_rejected() {
        let err = decode::<u8, u8>("not base64!").unwrap_err();
        assert!(matches!(err, CodecError::Base64(_)));

        let text = URL_SAFE_NO_PAD.encode("[1, 2");
        let err = decode::<u8, u8>(&text).unwrap_err();
        assert!(matches!(err, CodecError::Json(_)));

        let json = r#"{"columns":[1],"rows":[[7,[2]]],"targets":[],"amounts":[]}"#;
        let text = URL_SAFE_NO_PAD.encode(json);
        let err = decode::<u8, u8>(&text).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Problem(ProblemError::UnknownColumn(_))
        ));
        assert_eq!(err.to_string(), "column 2 is not in the universe");
    }

    /// Generates problems on string columns and numbered rows.
    fn problems() -> impl Strategy<Value = Problem<String, u16>> {
        (
            prop::collection::btree_map("[a-z]{1,3}", 1u32..=4, 1..=6),
            prop::collection::vec(
                prop::collection::vec((any::<prop::sample::Index>(), 1u32..=3), 1..=4),
                0..=6,
            ),
        )
            .prop_map(|(targets, rows)| {
                let columns: Vec<String> = targets.keys().cloned().collect();
                let mut problem = Problem::new(columns.iter().cloned()).unwrap();
                for (column, target) in &targets {
                    problem.set_target(column, *target).unwrap();
                }
                for (id, cover) in rows.into_iter().enumerate() {
                    let cover = cover
                        .into_iter()
                        .map(|(ix, amount)| (ix.get(&columns).clone(), amount));
                    problem.add_row(id as u16, cover).unwrap();
                }
                problem
            })
    }

    proptest! {
        #[test]
        fn prop_decode_inverts_encode(problem in problems()) {
            let text = encode(&problem).unwrap();
            let decoded: Problem<String, u16> = decode(&text).unwrap();
            prop_assert_eq!(decoded, problem);
        }
    }
}
