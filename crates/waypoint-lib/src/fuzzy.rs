//! Edit-distance computation and approximate name resolution.

use crate::map::PoiMap;

/// Levenshtein distance between two strings, counted over characters.
///
/// Bottom-up dynamic programming with rows `0..=|a|` and columns `0..=|b|`;
/// `dp[i][0] = i` and `dp[0][j] = j` seed the deletion/insertion base cases.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut dp = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=b.len() {
        dp[0][j] = j;
    }

    for i in 0..a.len() {
        for j in 0..b.len() {
            dp[i + 1][j + 1] = if a[i] == b[j] {
                dp[i][j]
            } else {
                dp[i][j].min(dp[i][j + 1]).min(dp[i + 1][j]) + 1
            };
        }
    }

    dp[a.len()][b.len()]
}

/// Return the first stored name (in ascending-id order) whose
/// case-insensitive edit distance to the query is exactly 2.
///
/// The threshold is fixed: a nearest name at distance 1 or 3+ yields no
/// match. Callers that want ranked near-misses should use [`suggestions`]
/// instead.
pub fn closest_name(map: &PoiMap, query: &str) -> Option<String> {
    let query = query.to_lowercase();
    map.nodes()
        .find(|node| edit_distance(&query, &node.name.to_lowercase()) == 2)
        .map(|node| node.name.clone())
}

/// Ranked near-miss suggestions for error messages: non-empty names within
/// edit distance 2 of the query, closest first, ties broken by name.
pub fn suggestions(map: &PoiMap, query: &str, limit: usize) -> Vec<String> {
    let query = query.to_lowercase();
    let mut ranked: Vec<(usize, String)> = map
        .nodes()
        .filter(|node| !node.name.is_empty())
        .filter_map(|node| {
            let distance = edit_distance(&query, &node.name.to_lowercase());
            (distance <= 2).then(|| (distance, node.name.clone()))
        })
        .collect();

    ranked.sort();
    ranked.dedup_by(|a, b| a.1 == b.1);
    ranked.truncate(limit);
    ranked.into_iter().map(|(_, name)| name).collect()
}
