//! Deterministic round-robin pairing generation
//!
//! Every unordered pair of player indices, self-pairs included, is
//! enumerated exactly once: increasing `i`, then increasing `j >= i`.

/// Total number of pairings for `k` players: `k(k+1)/2`
pub fn pairing_count(player_count: usize) -> usize {
    player_count * (player_count + 1) / 2
}

/// Lazily yield every pair `(i, j)` with `i <= j < player_count`
pub fn complete_graph(player_count: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..player_count).flat_map(move |i| (i..player_count).map(move |j| (i, j)))
}

/// The pair at position `index` of [`complete_graph`], or `None` when out of range.
///
/// Row `i` of the enumeration holds `player_count - i` pairs.
pub fn pairing_for_index(player_count: usize, index: usize) -> Option<(usize, usize)> {
    let mut remaining = index;
    for i in 0..player_count {
        let row = player_count - i;
        if remaining < row {
            return Some((i, i + remaining));
        }
        remaining -= row;
    }
    None
}

/// Position of `(i, j)` in the enumeration order; inverse of [`pairing_for_index`].
pub fn index_for_pairing(player_count: usize, pair: (usize, usize)) -> Option<usize> {
    let (i, j) = pair;
    if i > j || j >= player_count {
        return None;
    }
    // rows 0..i hold sum(player_count - r) pairs
    let before = i * player_count - i * i.saturating_sub(1) / 2;
    Some(before + (j - i))
}

/// Whether every player appears in at least one edge.
///
/// This does not test that every player is reachable from every other.
pub fn graph_is_connected(edges: &[(usize, usize)], player_count: usize) -> bool {
    let mut seen = vec![false; player_count];
    for &(a, b) in edges {
        for node in [a, b] {
            if let Some(slot) = seen.get_mut(node) {
                *slot = true;
            }
        }
    }
    seen.into_iter().all(|s| s)
}
