//! Key signature matching
//!
//! Scores every signature in a table by how many candidate notes it
//! contains and keeps the first one with the highest score.

use super::signatures::KeySignatureTable;
use crate::types::{KeyMatchResult, PitchClass};
use tracing::trace;

/// Key name reported when no signature contains any candidate note
pub const UNKNOWN_KEY: &str = "Unknown";

/// Find the signature containing the most candidate notes.
///
/// A note listed twice among the candidates counts twice. Ties go to the
/// signature listed first in `table`; a best score of zero is "Unknown".
pub fn match_key(candidates: &[PitchClass], table: &KeySignatureTable) -> KeyMatchResult {
    let mut best: Option<(&str, usize)> = None;

    for signature in table.iter() {
        let score = candidates.iter().filter(|pc| signature.contains(**pc)).count();
        trace!("{}: {} of {} notes", signature.name(), score, candidates.len());

        if score > best.map_or(0, |(_, s)| s) {
            best = Some((signature.name(), score));
        }
    }

    match best {
        Some((name, match_count)) => KeyMatchResult {
            key: name.to_string(),
            match_count,
        },
        None => KeyMatchResult {
            key: UNKNOWN_KEY.to_string(),
            match_count: 0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::key::signatures::KeySignature;
    use crate::types::Mode;
    use crate::types::PitchClass::*;

    #[test]
    fn test_c_e_g_is_c_major() {
        // A Minor also scores 3; C Major is listed first
        let result = match_key(&[C, E, G], &KeySignatureTable::builtin());
        assert_eq!(result.key, "C Major");
        assert_eq!(result.match_count, 3);
    }

    #[test]
    fn test_empty_candidates_are_unknown() {
        let result = match_key(&[], &KeySignatureTable::builtin());
        assert_eq!(result.key, UNKNOWN_KEY);
        assert_eq!(result.match_count, 0);
    }

    #[test]
    fn test_no_matching_notes_are_unknown() {
        let result = match_key(&[Cs, Ds, Gs], &KeySignatureTable::builtin());
        assert_eq!(result.key, UNKNOWN_KEY);
        assert_eq!(result.match_count, 0);
    }

    #[test]
    fn test_f_sharp_selects_g_major() {
        let result = match_key(&[Fs, G, D], &KeySignatureTable::builtin());
        assert_eq!(result.key, "G Major");
        assert_eq!(result.match_count, 3);
    }

    #[test]
    fn test_strictly_greater_score_wins() {
        let result = match_key(&[Fs, Cs, E], &KeySignatureTable::builtin());
        // G Major: F#, E (2); E Minor: E, F# (2); G Major is first
        assert_eq!(result.key, "G Major");
        assert_eq!(result.match_count, 2);
    }

    #[test]
    fn test_duplicates_count_each_occurrence() {
        let result = match_key(&[A, A, Fs], &KeySignatureTable::builtin());
        assert_eq!(result.key, "G Major");
        assert_eq!(result.match_count, 3);
    }

    #[test]
    fn test_empty_table_is_unknown() {
        let result = match_key(&[C, E, G], &KeySignatureTable::new(vec![]));
        assert_eq!(result.key, UNKNOWN_KEY);
    }

    #[test]
    fn test_table_order_decides_ties() {
        let table = KeySignatureTable::new(vec![
            KeySignature::diatonic(A, Mode::Minor),
            KeySignature::diatonic(C, Mode::Major),
        ]);
        assert_eq!(match_key(&[C, E, G], &table).key, "A Minor");
    }

    #[test]
    fn test_extended_table_finds_other_keys() {
        let result = match_key(&[D, Fs, Cs], &KeySignatureTable::circle_of_fifths());
        assert_eq!(result.key, "D Major");
        assert_eq!(result.match_count, 3);
    }
}
