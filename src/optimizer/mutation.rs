use fastrand::Rng;

/// Uniformly shuffled `0..n`.
pub fn random_permutation(rng: &mut Rng, n: usize) -> Vec<u8> {
    let mut perm: Vec<u8> = (0..n as u8).collect();
    rng.shuffle(&mut perm);
    perm
}

/// `inverse[perm[i]] == i`
pub fn invert(perm: &[u8]) -> Vec<usize> {
    let mut inverse = vec![0usize; perm.len()];
    for (i, &p) in perm.iter().enumerate() {
        inverse[p as usize] = i;
    }
    inverse
}

pub fn is_permutation(perm: &[u8], n: usize) -> bool {
    if perm.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &p in perm {
        let p = p as usize;
        if p >= n || seen[p] {
            return false;
        }
        seen[p] = true;
    }
    true
}
