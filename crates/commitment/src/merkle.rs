use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Digest size of the commitment hash
const DIGEST_LEN: usize = 32;

/// Defined root for an empty evidence set; empty input is a valid case, not
/// an error.
pub const ZERO_ROOT: [u8; DIGEST_LEN] = [0u8; DIGEST_LEN];

/// The audit commitment for one run: ordered leaf digests and the Merkle
/// root that binds them. Built fresh per run, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Commitment {
    /// One digest per canonicalized evidence text, in input order
    pub leaves: Vec<[u8; DIGEST_LEN]>,

    /// Root of the binary hash tree; `ZERO_ROOT` for an empty leaf set
    pub root: [u8; DIGEST_LEN],
}

impl Commitment {
    /// Hex rendering of the root, for audit logs and the notarization caller
    #[must_use]
    pub fn root_hex(&self) -> String {
        hex(&self.root)
    }

    /// Hex renderings of the leaves, in order
    #[must_use]
    pub fn leaf_hexes(&self) -> Vec<String> {
        self.leaves.iter().map(|leaf| hex(leaf)).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }
}

/// Canonical form of an evidence text: whitespace runs collapsed to single
/// spaces, trimmed, lowercased. Two texts differing only in formatting
/// commit identically.
#[must_use]
pub fn canonicalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Build the commitment for an ordered evidence text sequence.
///
/// Leaves are SHA-256 over the canonical texts. Levels are folded by hashing
/// adjacent pairs, duplicating the last node when a level has odd
/// cardinality, until one root remains. A single leaf is its own root.
#[must_use]
pub fn build_commitment<T: AsRef<str>>(texts: &[T]) -> Commitment {
    let leaves: Vec<[u8; DIGEST_LEN]> = texts
        .iter()
        .map(|text| {
            let mut hasher = Sha256::new();
            hasher.update(canonicalize(text.as_ref()).as_bytes());
            hasher.finalize().into()
        })
        .collect();

    let root = fold(&leaves);
    Commitment { leaves, root }
}

fn fold(leaves: &[[u8; DIGEST_LEN]]) -> [u8; DIGEST_LEN] {
    if leaves.is_empty() {
        return ZERO_ROOT;
    }

    let mut level = leaves.to_vec();
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        for pair in level.chunks(2) {
            let left = pair[0];
            let right = if pair.len() == 2 { pair[1] } else { pair[0] };
            let mut hasher = Sha256::new();
            hasher.update(left);
            hasher.update(right);
            next.push(hasher.finalize().into());
        }
        level = next;
    }
    level[0]
}

fn hex(digest: &[u8; DIGEST_LEN]) -> String {
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_input_yields_the_zero_root() {
        let commitment = build_commitment::<&str>(&[]);
        assert!(commitment.is_empty());
        assert_eq!(commitment.root, ZERO_ROOT);
        assert_eq!(commitment.root_hex(), "0".repeat(64));
    }

    #[test]
    fn building_is_deterministic_and_idempotent() {
        let texts = ["The possession was continuous.", "The suit is within limitation."];
        let first = build_commitment(&texts);
        let second = build_commitment(&texts);
        assert_eq!(first, second);
    }

    #[test]
    fn whitespace_only_differences_do_not_change_the_root() {
        let a = build_commitment(&["The  possession\twas continuous. "]);
        let b = build_commitment(&["the possession was\ncontinuous."]);
        assert_eq!(a.root, b.root);
    }

    #[test]
    fn content_changes_change_the_root() {
        let a = build_commitment(&["para one", "para two"]);
        let b = build_commitment(&["para one", "para two tampered"]);
        assert_ne!(a.root, b.root);
    }

    #[test]
    fn leaf_order_is_part_of_the_commitment() {
        let a = build_commitment(&["para one", "para two"]);
        let b = build_commitment(&["para two", "para one"]);
        assert_ne!(a.root, b.root);
    }

    #[test]
    fn single_leaf_is_its_own_root() {
        let commitment = build_commitment(&["only paragraph"]);
        assert_eq!(commitment.leaves.len(), 1);
        assert_eq!(commitment.root, commitment.leaves[0]);
    }

    #[test]
    fn odd_levels_duplicate_the_last_node() {
        let commitment = build_commitment(&["one", "two", "three"]);

        // Reconstruct by hand: H(H(l0,l1), H(l2,l2)).
        let pair = |a: &[u8; 32], b: &[u8; 32]| -> [u8; 32] {
            let mut hasher = Sha256::new();
            hasher.update(a);
            hasher.update(b);
            hasher.finalize().into()
        };
        let left = pair(&commitment.leaves[0], &commitment.leaves[1]);
        let right = pair(&commitment.leaves[2], &commitment.leaves[2]);
        assert_eq!(commitment.root, pair(&left, &right));
    }

    #[test]
    fn canonicalization_collapses_and_lowercases() {
        assert_eq!(canonicalize("  The   QUICK\n\tfox  "), "the quick fox");
        assert_eq!(canonicalize(""), "");
    }
}
