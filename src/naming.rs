/// Platform naming rules, supplied by the caller.
///
/// dirsift consumes this surface but never implements it: legal-name and
/// reserved-name policy is per-platform knowledge that belongs to whatever
/// layer owns filesystem writes. The traversal engine never consults these
/// rules — they exist for callers that want to construct new filesystem
/// entries safely alongside a walk.
///
/// # Object Safety
///
/// `NamingRules` is object-safe; callers may hold a `Box<dyn NamingRules>`
/// provided by a platform crate.
pub trait NamingRules {
    /// Whether `candidate` is a legal entry name on the target platform.
    fn is_legal_name(&self, candidate: &str) -> bool;

    /// Whether `candidate` is reserved (e.g. `CON` on Windows, `CVS` for a
    /// version-control-aware policy).
    fn is_reserved_name(&self, candidate: &str) -> bool;

    /// The characters the platform forbids in entry names, in a stable order.
    fn illegal_characters(&self) -> Vec<char>;

    /// Rewrite `candidate` with every illegal character replaced.
    ///
    /// The default implementation substitutes `replacement` for each
    /// character reported by [`illegal_characters`](NamingRules::illegal_characters).
    fn sanitize(&self, candidate: &str, replacement: char) -> String {
        let illegal = self.illegal_characters();
        candidate
            .chars()
            .map(|c| if illegal.contains(&c) { replacement } else { c })
            .collect()
    }
}
