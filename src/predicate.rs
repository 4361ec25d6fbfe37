use std::time::SystemTime;

use globset::{Glob, GlobMatcher};
use regex::Regex;

use crate::entry::Entry;
use crate::error::SiftError;

// ---------------------------------------------------------------------------
// Predicate
// ---------------------------------------------------------------------------

/// A pure boolean test over a filesystem [`Entry`].
///
/// Predicates are plain immutable values: construction fixes them, evaluation
/// never mutates them or touches the filesystem, and `Clone` is cheap. A
/// single predicate may be reused across any number of walks and shared
/// across threads (`Send + Sync`).
///
/// Leaves test one attribute; [`all`](Predicate::all), [`any`](Predicate::any)
/// and [`not`](Predicate::not) compose them under standard boolean algebra:
/// a conjunction over no children is `true`, a disjunction over no children
/// is `false`, and double negation is the identity.
///
/// # Example
///
/// ```rust
/// use dirsift::Predicate;
///
/// // xml/txt files, or anything named README
/// let pred = Predicate::extensions(&["xml", "txt"]).or(Predicate::name("README"));
/// ```
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Accepts every entry. Identity of [`all`](Predicate::all).
    True,

    /// Rejects every entry. Identity of [`any`](Predicate::any).
    False,

    /// Accepts non-directory entries.
    IsFile,

    /// Accepts directory entries.
    IsDirectory,

    /// Exact, case-sensitive name match.
    Name(String),

    /// Name starts with the given string.
    Prefix(String),

    /// Name ends with the given string.
    Suffix(String),

    /// Name's extension — the substring after the final `.` — is one of the
    /// given set. A name with no `.` never matches.
    Extension {
        exts: Vec<String>,
        ignore_case: bool,
    },

    /// Glob match over the full name: `*` matches any run of characters,
    /// `?` exactly one. Anchored — the whole name must match.
    Wildcard(GlobMatcher),

    /// Regex match over the full name. Anchored — the whole name must match.
    Regex(Regex),

    /// Size is within the inclusive bounds. An unset bound is unbounded.
    Size {
        min: Option<u64>,
        max: Option<u64>,
    },

    /// Modification time is within the inclusive bounds. An unset bound is
    /// unbounded. Entries with no reported modification time never match.
    Modified {
        min: Option<SystemTime>,
        max: Option<SystemTime>,
    },

    /// Walk depth is at most the given value. The root sits at depth 0, so
    /// `MaxDepth(0)` as a directory predicate accepts the root and prunes
    /// every subdirectory — the non-recursive mode of
    /// [`stream_files`](crate::stream_files).
    MaxDepth(usize),

    /// Conjunction, short-circuiting left to right. Empty accepts everything.
    All(Vec<Predicate>),

    /// Disjunction, short-circuiting left to right. Empty rejects everything.
    Any(Vec<Predicate>),

    /// Negation of a single child.
    Not(Box<Predicate>),
}

// ---------------------------------------------------------------------------
// Constructors
// ---------------------------------------------------------------------------

impl Predicate {
    /// Exact name match, case-sensitive.
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Name starts with `prefix`.
    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self::Prefix(prefix.into())
    }

    /// Name ends with `suffix`.
    pub fn suffix(suffix: impl Into<String>) -> Self {
        Self::Suffix(suffix.into())
    }

    /// Extension is one of `exts`, compared case-sensitively.
    ///
    /// Pass extensions without the leading dot: `&["xml", "txt"]`.
    pub fn extensions(exts: &[&str]) -> Self {
        Self::Extension {
            exts: exts.iter().map(|e| e.to_string()).collect(),
            ignore_case: false,
        }
    }

    /// Extension is one of `exts`, compared ASCII case-insensitively.
    pub fn extensions_ignore_case(exts: &[&str]) -> Self {
        Self::Extension {
            exts: exts.iter().map(|e| e.to_string()).collect(),
            ignore_case: true,
        }
    }

    /// Full-name glob match (`*` any run, `?` one character).
    ///
    /// The pattern is compiled once, here; an invalid pattern is a
    /// construction error, never a traversal error.
    pub fn wildcard(pattern: &str) -> Result<Self, SiftError> {
        Ok(Self::Wildcard(Glob::new(pattern)?.compile_matcher()))
    }

    /// Full-name regex match. The pattern is implicitly anchored at both
    /// ends — `"dummy.*"` matches `dummy-build.xml`, `"build"` does not.
    pub fn regex(pattern: &str) -> Result<Self, SiftError> {
        Ok(Self::Regex(Regex::new(&format!(r"\A(?:{pattern})\z"))?))
    }

    /// Size within the inclusive bounds; `None` is unbounded on that side.
    pub fn size_between(min: Option<u64>, max: Option<u64>) -> Self {
        Self::Size { min, max }
    }

    /// Modification time within the inclusive bounds; `None` is unbounded
    /// on that side.
    pub fn modified_between(min: Option<SystemTime>, max: Option<SystemTime>) -> Self {
        Self::Modified { min, max }
    }

    /// Walk depth at most `depth`.
    pub fn max_depth(depth: usize) -> Self {
        Self::MaxDepth(depth)
    }

    /// Conjunction over `children`, in order. Empty accepts everything.
    pub fn all(children: Vec<Predicate>) -> Self {
        Self::All(children)
    }

    /// Disjunction over `children`, in order. Empty rejects everything.
    pub fn any(children: Vec<Predicate>) -> Self {
        Self::Any(children)
    }

    /// Negation of `child`.
    pub fn not(child: Predicate) -> Self {
        Self::Not(Box::new(child))
    }

    /// Compose a directory predicate that additionally skips a reserved
    /// directory name (case-sensitive exact match).
    ///
    /// `inner` of `None` means "accept all, except the reserved name" —
    /// handy for excluding version-control metadata like `CVS` or `.git`
    /// from a recursive walk without touching the engine:
    ///
    /// ```rust
    /// use dirsift::Predicate;
    ///
    /// let dir_pred = Predicate::excluding_name(None, "CVS");
    /// ```
    pub fn excluding_name(inner: Option<Predicate>, name: &str) -> Self {
        Self::all(vec![
            inner.unwrap_or(Self::True),
            Self::not(Self::name(name)),
        ])
    }

    // ── Instance combinators ──────────────────────────────────────────────

    /// Both `self` and `other` accept.
    pub fn and(self, other: Predicate) -> Self {
        Self::All(vec![self, other])
    }

    /// Either `self` or `other` accepts.
    pub fn or(self, other: Predicate) -> Self {
        Self::Any(vec![self, other])
    }

    /// `self` rejects.
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

impl Predicate {
    /// Returns `true` if `entry` satisfies this predicate.
    ///
    /// Pure: no I/O beyond what the caller already read into `entry`, no
    /// mutation, idempotent on the same entry.
    pub fn matches(&self, entry: &Entry) -> bool {
        match self {
            Self::True => true,
            Self::False => false,
            Self::IsFile => !entry.is_dir,
            Self::IsDirectory => entry.is_dir,
            Self::Name(name) => entry.name == *name,
            Self::Prefix(prefix) => entry.name.starts_with(prefix),
            Self::Suffix(suffix) => entry.name.ends_with(suffix),
            Self::Extension { exts, ignore_case } => match extension_of(&entry.name) {
                Some(ext) if *ignore_case => exts.iter().any(|e| e.eq_ignore_ascii_case(ext)),
                Some(ext) => exts.iter().any(|e| e == ext),
                None => false,
            },
            Self::Wildcard(glob) => glob.is_match(&entry.name),
            Self::Regex(re) => re.is_match(&entry.name),
            Self::Size { min, max } => {
                min.map_or(true, |m| entry.len >= m) && max.map_or(true, |m| entry.len <= m)
            }
            Self::Modified { min, max } => match entry.modified {
                Some(t) => min.map_or(true, |m| t >= m) && max.map_or(true, |m| t <= m),
                None => false,
            },
            Self::MaxDepth(limit) => entry.depth <= *limit,
            Self::All(children) => children.iter().all(|c| c.matches(entry)),
            Self::Any(children) => children.iter().any(|c| c.matches(entry)),
            Self::Not(child) => !child.matches(entry),
        }
    }
}

/// The substring after the final `.` of `name`, or `None` if there is no dot.
fn extension_of(name: &str) -> Option<&str> {
    name.rfind('.').map(|i| &name[i + 1..])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{Duration, UNIX_EPOCH};

    fn file(name: &str) -> Entry {
        Entry {
            path: PathBuf::from(name),
            name: name.to_string(),
            is_dir: false,
            len: 0,
            modified: Some(UNIX_EPOCH),
            depth: 1,
        }
    }

    fn dir(name: &str, depth: usize) -> Entry {
        Entry {
            path: PathBuf::from(name),
            name: name.to_string(),
            is_dir: true,
            len: 0,
            modified: Some(UNIX_EPOCH),
            depth,
        }
    }

    #[test]
    fn predicates_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Predicate>();
    }

    #[test]
    fn empty_conjunction_accepts_everything() {
        let pred = Predicate::all(vec![]);
        assert!(pred.matches(&file("anything.txt")));
        assert!(pred.matches(&dir("anydir", 3)));
    }

    #[test]
    fn empty_disjunction_rejects_everything() {
        let pred = Predicate::any(vec![]);
        assert!(!pred.matches(&file("anything.txt")));
        assert!(!pred.matches(&dir("anydir", 3)));
    }

    #[test]
    fn double_negation_is_identity() {
        let base = Predicate::extensions(&["xml"]);
        let doubled = base.clone().negate().negate();
        for entry in [file("a.xml"), file("a.txt"), file("noext"), dir("x", 0)] {
            assert_eq!(base.matches(&entry), doubled.matches(&entry));
        }
    }

    #[test]
    fn name_prefix_suffix() {
        assert!(Predicate::name("CVS").matches(&dir("CVS", 1)));
        assert!(!Predicate::name("CVS").matches(&dir("cvs", 1)));
        assert!(Predicate::prefix("dummy").matches(&file("dummy-build.xml")));
        assert!(!Predicate::prefix("dummy").matches(&file("build.xml")));
        assert!(Predicate::suffix("-build.xml").matches(&file("dummy-build.xml")));
        assert!(!Predicate::suffix("-build.xml").matches(&file("dummy-build.xml.bak")));
    }

    #[test]
    fn extension_uses_final_dot() {
        let pred = Predicate::extensions(&["gz"]);
        assert!(pred.matches(&file("archive.tar.gz")));
        assert!(!Predicate::extensions(&["tar"]).matches(&file("archive.tar.gz")));
    }

    #[test]
    fn extension_never_matches_dotless_name() {
        let pred = Predicate::extensions(&["xml", "txt"]);
        assert!(!pred.matches(&file("README")));
    }

    #[test]
    fn extension_case_sensitivity() {
        let strict = Predicate::extensions(&["xml"]);
        assert!(!strict.matches(&file("A.XML")));
        assert!(strict.matches(&file("a.xml")));

        let relaxed = Predicate::extensions_ignore_case(&["xml"]);
        assert!(relaxed.matches(&file("A.XML")));
        assert!(relaxed.matches(&file("a.xml")));
    }

    #[test]
    fn wildcard_is_anchored() {
        let pred = Predicate::wildcard("*.txt").unwrap();
        assert!(pred.matches(&file("notes.txt")));
        assert!(!pred.matches(&file("notes.txt.bak")));

        let one = Predicate::wildcard("file?.txt").unwrap();
        assert!(one.matches(&file("file1.txt")));
        assert!(!one.matches(&file("file10.txt")));
        assert!(!one.matches(&file("file.txt")));
    }

    #[test]
    fn wildcard_rejects_bad_pattern() {
        assert!(matches!(
            Predicate::wildcard("a[").unwrap_err(),
            SiftError::Pattern(_)
        ));
    }

    #[test]
    fn regex_matches_full_name_only() {
        let pred = Predicate::regex("dummy.*").unwrap();
        assert!(pred.matches(&file("dummy-build.xml")));

        let partial = Predicate::regex("build").unwrap();
        assert!(!partial.matches(&file("dummy-build.xml")));
    }

    #[test]
    fn regex_rejects_bad_pattern() {
        assert!(matches!(
            Predicate::regex("(unclosed").unwrap_err(),
            SiftError::Regex(_)
        ));
    }

    #[test]
    fn size_bounds_are_inclusive() {
        let pred = Predicate::size_between(Some(10), Some(20));
        let mut entry = file("f");
        for (len, expect) in [(9, false), (10, true), (20, true), (21, false)] {
            entry.len = len;
            assert_eq!(pred.matches(&entry), expect, "len={len}");
        }

        let unbounded = Predicate::size_between(Some(10), None);
        entry.len = u64::MAX;
        assert!(unbounded.matches(&entry));
    }

    #[test]
    fn modified_bounds_are_inclusive() {
        let lo = UNIX_EPOCH + Duration::from_secs(100);
        let hi = UNIX_EPOCH + Duration::from_secs(200);
        let pred = Predicate::modified_between(Some(lo), Some(hi));

        let mut entry = file("f");
        entry.modified = Some(lo);
        assert!(pred.matches(&entry));
        entry.modified = Some(hi);
        assert!(pred.matches(&entry));
        entry.modified = Some(UNIX_EPOCH + Duration::from_secs(99));
        assert!(!pred.matches(&entry));
        entry.modified = None;
        assert!(!pred.matches(&entry));
    }

    #[test]
    fn max_depth_accepts_root_level_only() {
        let pred = Predicate::max_depth(0);
        assert!(pred.matches(&dir("root", 0)));
        assert!(!pred.matches(&dir("sub", 1)));
        assert!(!pred.matches(&dir("subsub", 2)));
    }

    #[test]
    fn excluding_name_composes_with_inner() {
        let bare = Predicate::excluding_name(None, "CVS");
        assert!(bare.matches(&dir("src", 1)));
        assert!(!bare.matches(&dir("CVS", 1)));

        let with_inner = Predicate::excluding_name(Some(Predicate::prefix("sub")), "CVS");
        assert!(with_inner.matches(&dir("subdir1", 1)));
        assert!(!with_inner.matches(&dir("CVS", 1)));
        assert!(!with_inner.matches(&dir("other", 1)));
    }

    #[test]
    fn kind_leaves() {
        assert!(Predicate::IsFile.matches(&file("a")));
        assert!(!Predicate::IsFile.matches(&dir("a", 1)));
        assert!(Predicate::IsDirectory.matches(&dir("a", 1)));
        assert!(!Predicate::IsDirectory.matches(&file("a")));
    }

    #[test]
    fn combinators_short_circuit_semantics() {
        // False AND anything is false; True OR anything is true.
        let conj = Predicate::False.and(Predicate::True);
        assert!(!conj.matches(&file("x")));
        let disj = Predicate::True.or(Predicate::False);
        assert!(disj.matches(&file("x")));
    }
}
