//!  Brisa Quote Agent
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # Text Normalization
//!
//! Side-effect free text helpers shared by offer correlation and promotion
//! classification. The remote site mixes accents, casing, and punctuation
//! freely between page renders, so every comparison goes through `normalize`.

use std::collections::HashSet;

/// Fold Spanish diacritics to their ASCII base letter.
fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        _ => c,
    }
}

/// Lower-case, fold diacritics, strip punctuation, collapse whitespace.
pub(crate) fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_space = false;
    for c in input.chars().flat_map(char::to_lowercase).map(fold_diacritic) {
        if c.is_alphanumeric() || c == '%' {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            // Whitespace and punctuation both act as word separators.
            pending_space = true;
        }
    }
    out
}

/// Jaccard similarity over words longer than 3 characters.
pub(crate) fn word_jaccard(a: &str, b: &str) -> f64 {
    fn words(s: &str) -> HashSet<&str> {
        s.split_whitespace().filter(|w| w.len() > 3).collect()
    }
    let wa = words(a);
    let wb = words(b);
    let total = wa.union(&wb).count();
    if total == 0 {
        return 0.0;
    }
    let shared = wa.intersection(&wb).count();
    shared as f64 / total as f64
}
