//! Phase tree composition
//!
//! Pure tree assembly: children are appended by value and chained through
//! `requires` edges so callers never stitch dependencies by hand. No
//! validation happens here (no cycle or duplicate detection); a finished
//! plan is checked by the resolver before anything consumes it.

use super::Phase;

impl Phase {
    /// Appends the given phases as children, chaining each one after the
    /// first to its immediately-preceding sibling. A phase appended onto a
    /// non-empty parent is chained to the current last sibling, so repeated
    /// calls extend one unbroken sequence. Pre-existing `requires` on the
    /// appended phases survive; the first phase of a fresh sequence gains
    /// no edge at all.
    pub fn add_sequential<I>(&mut self, subs: I)
    where
        I: IntoIterator<Item = Phase>,
    {
        for mut sub in subs {
            sub.reroot(self.child_literal(&sub.id));
            if let Some(prev) = self.phases.last() {
                sub.requires.push(prev.id.clone());
            }
            self.phases.push(sub);
        }
    }

    /// Appends the given phases as children with no inter-sibling edges.
    /// Only `requires` the caller pre-populated survive; the phases become
    /// eligible to run concurrently once those are satisfied.
    pub fn add_parallel<I>(&mut self, subs: I)
    where
        I: IntoIterator<Item = Phase>,
    {
        for mut sub in subs {
            sub.reroot(self.child_literal(&sub.id));
            self.phases.push(sub);
        }
    }

    /// Appends the IDs of the given phases to this phase's `requires`.
    /// For cross-branch dependencies that sequential/parallel composition
    /// cannot express.
    pub fn require<'a, I>(&mut self, reqs: I)
    where
        I: IntoIterator<Item = &'a Phase>,
    {
        for req in reqs {
            self.requires.push(req.id.clone());
        }
    }

    /// Appends a single requirement by ID, for referencing phases that do
    /// not exist yet (paths predicted via [`Phase::child_literal`]).
    pub fn require_id(&mut self, id: impl Into<String>) {
        self.requires.push(id.into());
    }

    /// The path a child with the given literal ID would have under this
    /// phase, without creating it.
    pub fn child_literal(&self, id: &str) -> String {
        format!("{}/{}", self.id, id)
    }

    /// Rewrites this phase's ID and re-prefixes every descendant ID and
    /// intra-subtree requirement accordingly.
    fn reroot(&mut self, new_id: String) {
        let old_prefix = format!("{}/", self.id);
        let new_prefix = format!("{}/", new_id);
        self.id = new_id;
        for child in &mut self.phases {
            child.rewrite_prefix(&old_prefix, &new_prefix);
        }
    }

    fn rewrite_prefix(&mut self, old: &str, new: &str) {
        if let Some(rest) = self.id.strip_prefix(old) {
            self.id = format!("{}{}", new, rest);
        }
        for req in &mut self.requires {
            if let Some(rest) = req.strip_prefix(old) {
                *req = format!("{}{}", new, rest);
            }
        }
        for child in &mut self.phases {
            child.rewrite_prefix(old, new);
        }
    }
}

/// Marks the given phase as a plan root by prefixing its ID with `/`.
///
/// Must be called exactly once per root: a second application yields a
/// double-prefixed ID (`//x`).
pub fn root(mut phase: Phase) -> Phase {
    let id = format!("/{}", phase.id);
    phase.reroot(id);
    phase
}

/// The path a child with the given literal ID would have under `parent`;
/// `/id` when there is no parent.
pub fn child_path(parent: Option<&Phase>, id: &str) -> String {
    match parent {
        Some(parent) => parent.child_literal(id),
        None => format!("/{}", id),
    }
}
