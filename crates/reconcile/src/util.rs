/// Length of the longest common subsequence of two character slices, using
/// the two-row O(min(m,n)) space algorithm.
pub fn lcs_len(a: &[char], b: &[char]) -> usize {
    // Keep the shorter slice in the inner loop to minimise allocation.
    let (a, b) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let n = b.len();
    if n == 0 {
        return 0;
    }

    let mut prev = vec![0usize; n + 1];
    let mut curr = vec![0usize; n + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}
